use crate::{
    error::{PlannerError, Result},
    schemas::ResponseSchema,
    types::packing_list::PackingList,
};

/// Parse the model's text answer into the requested schema type.
///
/// The text is trimmed first. A single surrounding Markdown code fence is tolerated
/// because some providers add one even in JSON mode.
pub fn deserialize_structured_response<T>(text: &str) -> Result<T>
where
    T: ResponseSchema,
{
    let raw = strip_code_fence(text.trim());
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Parse(format!(
            "failed to deserialize `{}` at {}: {}",
            T::schema().schema_name(),
            location,
            err.inner()
        ))
    })?;

    deserializer.end().map_err(|err| {
        PlannerError::Parse(format!(
            "unexpected text after `{}` payload: {}",
            T::schema().schema_name(),
            err
        ))
    })?;

    Ok(value)
}

pub fn parse_packing_list(text: &str) -> Result<PackingList> {
    deserialize_structured_response::<PackingList>(text)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = body.strip_suffix("```") else {
        return text;
    };
    // drop an optional language tag on the opening fence
    match body.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('{') => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        {
          "outfitSuggestions": [
            {
              "activity": "Obilazak gradskih zidina",
              "rationale": "Lagana odjeća za vrućinu i puno hodanja",
              "items": ["Lanena košulja", "Kratke hlače", "Šešir"]
            }
          ],
          "baseClothing": ["Majice", "Donje rublje"],
          "footwear": [],
          "toiletries": ["Krema za sunčanje"],
          "accessoriesAndElectronics": ["Punjač"],
          "documentsAndMoney": ["Osobna iskaznica"]
        }
    "#;

    #[test]
    fn parses_trimmed_payload_with_empty_groups() {
        let list = parse_packing_list(SAMPLE).unwrap();

        assert_eq!(list.outfit_suggestions.len(), 1);
        assert_eq!(list.outfit_suggestions[0].items.len(), 3);
        assert!(list.footwear.is_empty());
        assert_eq!(list.documents_and_money, vec!["Osobna iskaznica"]);
    }

    #[test]
    fn accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", SAMPLE.trim());
        let list = parse_packing_list(&fenced).unwrap();
        assert_eq!(list.base_clothing.len(), 2);
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let err = parse_packing_list("Evo vašeg popisa!").unwrap_err();
        assert!(matches!(err, PlannerError::Parse(_)));
        assert!(err.to_string().contains("packing_list"));
    }

    #[test]
    fn missing_group_reports_its_path() {
        let err = parse_packing_list(
            r#"{"outfitSuggestions": [{"activity": "Plaža", "rationale": "Sunce", "items": 3}]}"#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("outfitSuggestions[0].items"), "{message}");
    }
}
