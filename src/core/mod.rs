pub mod planner;
pub mod session;
pub mod share;
pub mod storage;

pub use planner::PackingPlanner;
pub use session::{PackingSession, SessionStatus, SAVED_LIST_KEY, SAVED_TRIP_KEY};
pub use share::{
    render_share_text, share_title, ShareOutcome, ShareTarget, StdoutShare, SystemClipboard,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
