use crate::types::{Activity, Formality, TripDetails};

/// Build the instruction sent to the model for one trip.
pub fn build_prompt(details: &TripDetails) -> String {
    let mut lines = vec![
        "Ti si iskusni putni savjetnik. Sastavi praktičan popis stvari za pakiranje za sljedeće putovanje.".to_string(),
        String::new(),
        format!("Odredište: {}", details.destination.trim()),
        format!(
            "Datumi: od {} do {} ({} {})",
            details.start_date,
            details.end_date,
            details.duration,
            days_label(details.duration)
        ),
        String::new(),
        "Planirane aktivnosti:".to_string(),
    ];

    lines.extend(activity_lines(&details.activities));

    let guidance = preference_guidance(details);
    if !guidance.is_empty() {
        lines.push(String::new());
        lines.extend(guidance);
    }

    lines.push(String::new());
    lines.push(
        "Uzmi u obzir uobičajeno vrijeme na odredištu u tom razdoblju. Za svaku aktivnost predloži jednu odjevnu kombinaciju s kratkim obrazloženjem, a ostale stvari razvrstaj po kategorijama.".to_string(),
    );
    lines.push(
        "Odgovori isključivo JSON objektom prema zadanoj shemi, bez dodatnog teksta, na hrvatskom jeziku.".to_string(),
    );

    lines.join("\n")
}

fn activity_lines(activities: &[Activity]) -> Vec<String> {
    if activities.is_empty() {
        return vec!["- nema posebno planiranih aktivnosti".to_string()];
    }

    activities
        .iter()
        .map(|activity| {
            format!(
                "- {} ({})",
                activity.description.trim(),
                activity.time.prompt_label()
            )
        })
        .collect()
}

fn preference_guidance(details: &TripDetails) -> Vec<String> {
    let mut guidance = Vec::new();

    match details.formality {
        Formality::Casual => {}
        Formality::BusinessCasual => guidance.push(
            "Stil odijevanja: poslovno-ležeran. Prijedlozi odjeće trebaju biti uredni, ali ne strogo formalni.".to_string(),
        ),
        Formality::Formal => guidance.push(
            "Stil odijevanja: formalan. Uključi elegantnu odjeću i obuću prikladnu za svečane prilike.".to_string(),
        ),
    }

    if details.light_luggage {
        guidance.push(
            "Putnik putuje s laganom prtljagom: predloži što manje stvari, prednost daj višenamjenskim komadima koji se lako kombiniraju.".to_string(),
        );
    }

    guidance
}

/// Croatian noun form for a day count: 1 dan, 21 dan, 2 dana, 5 dana, 11 dana.
fn days_label(count: i64) -> &'static str {
    let count = count.abs();
    if count % 10 == 1 && count % 100 != 11 {
        "dan"
    } else {
        "dana"
    }
}
