use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::schemas::{ResponseSchema, SchemaHandle};

/// Categorised packing list returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackingList {
    /// One outfit suggestion for each planned activity
    pub outfit_suggestions: Vec<OutfitSuggestion>,
    /// Basic clothing for the whole trip (underwear, t-shirts, trousers, layers)
    pub base_clothing: Vec<String>,
    /// Shoes suited to the destination and activities
    pub footwear: Vec<String>,
    /// Toiletries and personal care items
    pub toiletries: Vec<String>,
    /// Accessories, gadgets, chargers and adapters
    pub accessories_and_electronics: Vec<String>,
    /// Travel documents, cards and cash
    pub documents_and_money: Vec<String>,
}

/// Clothing combination recommended for one activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutfitSuggestion {
    /// Name of the activity the outfit is meant for
    pub activity: String,
    /// Short explanation of why the outfit suits the activity
    pub rationale: String,
    /// Clothing items that make up the outfit
    pub items: Vec<String>,
}

/// Group keys in display order.
pub const CATEGORY_KEYS: [&str; 6] = [
    "outfitSuggestions",
    "baseClothing",
    "footwear",
    "toiletries",
    "accessoriesAndElectronics",
    "documentsAndMoney",
];

impl PackingList {
    /// The five flat groups paired with their JSON keys.
    pub fn item_groups(&self) -> [(&'static str, &[String]); 5] {
        [
            ("baseClothing", self.base_clothing.as_slice()),
            ("footwear", self.footwear.as_slice()),
            ("toiletries", self.toiletries.as_slice()),
            ("accessoriesAndElectronics", self.accessories_and_electronics.as_slice()),
            ("documentsAndMoney", self.documents_and_money.as_slice()),
        ]
    }

    pub fn item_count(&self) -> usize {
        let outfit_items: usize = self.outfit_suggestions.iter().map(|o| o.items.len()).sum();
        outfit_items
            + self
                .item_groups()
                .iter()
                .map(|(_, items)| items.len())
                .sum::<usize>()
    }
}

impl ResponseSchema for PackingList {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| SchemaHandle::generate::<PackingList>("packing_list"))
    }
}

/// Display title for a packing list group key.
pub fn category_title(key: &str) -> String {
    match key {
        "outfitSuggestions" => "Prijedlozi odjevnih kombinacija".to_string(),
        "baseClothing" => "Osnovna odjeća".to_string(),
        "footwear" => "Obuća".to_string(),
        "toiletries" => "Toaletne potrepštine".to_string(),
        "accessoriesAndElectronics" => "Dodaci i elektronika".to_string(),
        "documentsAndMoney" => "Dokumenti i novac".to_string(),
        other => humanize_key(other),
    }
}

/// `someCamelKey` -> `Some Camel Key`
fn humanize_key(key: &str) -> String {
    let mut title = String::with_capacity(key.len() + 4);
    for (idx, ch) in key.chars().enumerate() {
        if idx == 0 {
            title.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            title.push(' ');
            title.push(ch);
        } else {
            title.push(ch);
        }
    }
    title
}
