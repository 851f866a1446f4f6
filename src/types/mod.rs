pub mod packing_list;
pub mod response;
pub mod trip;

pub use packing_list::{category_title, OutfitSuggestion, PackingList, CATEGORY_KEYS};
pub use response::{deserialize_structured_response, parse_packing_list};
pub use trip::{trip_duration, Activity, ActivityTime, Formality, TripDetails, TripSnapshot};
