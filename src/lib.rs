//! packing-planner-rs: trip packing lists from a generative model with a strict JSON schema
//!
//! The crate turns structured trip details into a prompt, asks a provider for a JSON
//! answer shaped like [`PackingList`], and keeps the result in a [`PackingSession`]
//! that can save, restore and share it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use packing_planner_rs::{
//!     Activity, ActivityTime, GeminiClient, MemoryStore, PackingPlanner, PackingSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("GEMINI_API_KEY")?;
//!     let planner = PackingPlanner::new(Arc::new(GeminiClient::new(api_key)));
//!     let mut session = PackingSession::new(planner, Box::new(MemoryStore::new()));
//!
//!     session.destination = "Dubrovnik".to_string();
//!     session.start_date = "2025-07-01".to_string();
//!     session.end_date = "2025-07-05".to_string();
//!     session.activities = vec![Activity::new("Obilazak zidina", ActivityTime::Day)];
//!
//!     session.generate_packing_list().await;
//!     println!("{:#?}", session.packing_list());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod providers;
pub mod schemas;
pub(crate) mod services;
pub mod types;

pub use config::{PlannerConfig, Provider};
pub use crate::core::{
    render_share_text, JsonFileStore, KeyValueStore, MemoryStore, PackingPlanner,
    PackingSession, SessionStatus, ShareOutcome, ShareTarget, StdoutShare, SystemClipboard,
    SAVED_LIST_KEY, SAVED_TRIP_KEY,
};
pub use error::{PlannerError, Result};
pub use providers::{GeminiClient, OpenAiCompatibleClient, TextGenerator};
pub use schemas::{ResponseSchema, SchemaHandle};
pub use services::prompt::build_prompt;
pub use types::{
    category_title, parse_packing_list, trip_duration, Activity, ActivityTime, Formality,
    OutfitSuggestion, PackingList, TripDetails, TripSnapshot,
};

#[cfg(feature = "cli")]
pub mod cli;
