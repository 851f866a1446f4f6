use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::Result,
    providers::TextGenerator,
    schemas::ResponseSchema,
    services::prompt::build_prompt,
    types::{parse_packing_list, PackingList, TripDetails},
};

/// Turns trip details into a prompt, calls the provider and maps the answer.
///
/// Input is not validated here; [`crate::PackingSession`] refuses bad trips
/// before they reach the planner.
#[derive(Debug, Clone)]
pub struct PackingPlanner {
    generator: Arc<dyn TextGenerator>,
}

impl PackingPlanner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn provider_name(&self) -> &'static str {
        self.generator.name()
    }

    /// One provider call; errors are returned as the provider or parser produced them.
    pub async fn generate_packing_list(&self, details: &TripDetails) -> Result<PackingList> {
        let prompt = build_prompt(details);
        let schema = PackingList::schema();

        info!(
            target: "packing::planner",
            provider = self.provider_name(),
            destination = %details.destination,
            duration = details.duration,
            activities = details.activities.len(),
            "Requesting packing list"
        );
        debug!(target: "packing::planner", %prompt, "Prompt built");

        let text = self.generator.generate(&prompt, schema).await?;
        let list = parse_packing_list(&text)?;

        info!(
            target: "packing::planner",
            outfits = list.outfit_suggestions.len(),
            items = list.item_count(),
            "Packing list received"
        );
        Ok(list)
    }
}
