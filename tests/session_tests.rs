use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use packing_planner_rs::{
    Activity, ActivityTime, Formality, JsonFileStore, KeyValueStore, MemoryStore, OutfitSuggestion,
    PackingList, PackingPlanner, PackingSession, PlannerError, SchemaHandle, SessionStatus,
    ShareOutcome, ShareTarget, TextGenerator, TripSnapshot, SAVED_LIST_KEY, SAVED_TRIP_KEY,
};

const VALID_REPLY: &str = r#"
{
  "outfitSuggestions": [
    {
      "activity": "Obilazak gradskih zidina",
      "rationale": "Prozračna odjeća za vrućinu i dugo hodanje",
      "items": ["Lanena košulja", "Kratke hlače", "Šešir"]
    },
    {
      "activity": "Večera u staroj jezgri",
      "rationale": "Ležerno elegantno za ljetnu večer",
      "items": ["Chino hlače", "Polo majica"]
    }
  ],
  "baseClothing": ["Majice", "Donje rublje", "Čarape"],
  "footwear": ["Udobne tenisice", "Sandale"],
  "toiletries": ["Krema za sunčanje SPF 50"],
  "accessoriesAndElectronics": [],
  "documentsAndMoney": ["Osobna iskaznica", "Kartica"]
}
"#;

#[derive(Debug)]
enum Reply {
    Text(String),
    /// Text on the first call, failure afterwards.
    Once(String),
    Fail,
}

#[derive(Debug)]
struct StubGenerator {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn replying_once(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Once(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str, _schema: &SchemaHandle) -> packing_planner_rs::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Once(text) if call == 0 => Ok(text.clone()),
            Reply::Once(_) | Reply::Fail => Err(PlannerError::Provider {
                status: 403,
                message: "API key not valid".to_string(),
            }),
        }
    }
}

/// Store handle shared between the session and the test body.
#[derive(Debug, Clone, Default)]
struct SharedStore(Arc<Mutex<MemoryStore>>);

impl SharedStore {
    fn with_quota(bytes: usize) -> Self {
        Self(Arc::new(Mutex::new(MemoryStore::with_quota(bytes))))
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).unwrap()
    }

    fn put(&self, key: &str, value: &str) {
        self.0.lock().unwrap().set(key, value).unwrap();
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> packing_planner_rs::Result<Option<String>> {
        self.0.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> packing_planner_rs::Result<()> {
        self.0.lock().unwrap().set(key, value)
    }

    fn remove(&mut self, key: &str) -> packing_planner_rs::Result<()> {
        self.0.lock().unwrap().remove(key)
    }
}

#[derive(Debug, Default)]
struct RecordingShare {
    native: bool,
    fail: bool,
    shared: Mutex<Vec<(String, String)>>,
    copied: Mutex<Vec<String>>,
}

impl ShareTarget for RecordingShare {
    fn can_share(&self) -> bool {
        self.native
    }

    fn share(&self, title: &str, text: &str) -> packing_planner_rs::Result<()> {
        if self.fail {
            return Err(PlannerError::Share("share sheet dismissed".to_string()));
        }
        self.shared
            .lock()
            .unwrap()
            .push((title.to_string(), text.to_string()));
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> packing_planner_rs::Result<()> {
        if self.fail {
            return Err(PlannerError::Share("clipboard denied".to_string()));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn session_with(generator: Arc<StubGenerator>, store: SharedStore) -> PackingSession {
    let mut session = PackingSession::new(PackingPlanner::new(generator), Box::new(store));
    session.destination = "Dubrovnik".to_string();
    session.start_date = "2025-07-01".to_string();
    session.end_date = "2025-07-05".to_string();
    session.activities = vec![
        Activity::new("Obilazak gradskih zidina", ActivityTime::Day),
        Activity::new("Večera u staroj jezgri", ActivityTime::Night),
    ];
    session
}

#[test]
fn duration_follows_dates() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());
    assert_eq!(session.duration(), 5);

    session.start_date = "2025-07-05".to_string();
    session.end_date = "2025-07-01".to_string();
    assert_eq!(session.duration(), 0);

    session.end_date = "nije datum".to_string();
    assert_eq!(session.duration(), 0);
}

#[test]
fn activities_can_be_added_and_removed() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());

    session.add_activity();
    assert_eq!(session.activities.len(), 3);
    assert_eq!(session.activities[2], Activity::default());

    session.remove_activity(0);
    assert_eq!(session.activities[0].description, "Večera u staroj jezgri");

    session.remove_activity(10);
    assert_eq!(session.activities.len(), 2);
}

#[tokio::test]
async fn successful_generation_stores_all_groups() {
    let generator = StubGenerator::replying(VALID_REPLY);
    let mut session = session_with(generator.clone(), SharedStore::default());
    session.formality = Formality::Formal;

    session.generate_packing_list().await;

    assert_eq!(generator.calls(), 1);
    assert!(!session.is_loading());
    assert_eq!(session.error_message(), None);
    assert_eq!(session.status(), SessionStatus::Loaded);

    let list = session.packing_list().unwrap();
    assert_eq!(list.outfit_suggestions.len(), 2);
    assert_eq!(list.footwear.len(), 2);
    assert!(list.accessories_and_electronics.is_empty());
    assert_eq!(session.list_trip().unwrap().destination, "Dubrovnik");

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].contains("Dubrovnik"));
    assert!(prompts[0].contains("formalan"));
}

#[tokio::test]
async fn inverted_dates_block_generation() {
    let generator = StubGenerator::replying(VALID_REPLY);
    let mut session = session_with(generator.clone(), SharedStore::default());
    session.start_date = "2025-07-05".to_string();
    session.end_date = "2025-07-01".to_string();

    session.generate_packing_list().await;

    assert_eq!(generator.calls(), 0);
    assert!(session.error_message().unwrap().contains("datume"));
    assert_eq!(session.status(), SessionStatus::Errored);
}

#[tokio::test]
async fn blank_activity_blocks_generation_even_with_valid_dates() {
    let generator = StubGenerator::replying(VALID_REPLY);
    let mut session = session_with(generator.clone(), SharedStore::default());
    session.activities = vec![Activity::new("", ActivityTime::Day)];

    session.generate_packing_list().await;
    assert_eq!(generator.calls(), 0);
    assert!(session.error_message().unwrap().contains("aktivnosti"));

    session.activities = vec![Activity::new("   ", ActivityTime::Night)];
    session.generate_packing_list().await;
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn provider_failure_sets_generic_message() {
    let generator = StubGenerator::failing();
    let mut session = session_with(generator.clone(), SharedStore::default());

    session.generate_packing_list().await;

    assert_eq!(generator.calls(), 1);
    assert!(!session.is_loading());
    assert!(session.packing_list().is_none());
    let message = session.error_message().unwrap();
    assert!(message.contains("pogreške"));
    assert!(!message.contains("API key"));
}

#[tokio::test]
async fn unparsable_reply_is_reported() {
    let mut broken = session_with(StubGenerator::replying("nije JSON"), SharedStore::default());
    broken.generate_packing_list().await;
    assert!(broken.packing_list().is_none());
    assert_eq!(broken.status(), SessionStatus::Errored);
}

#[tokio::test]
async fn failed_regeneration_clears_previous_list() {
    let generator = StubGenerator::replying_once(VALID_REPLY);
    let mut session = session_with(generator.clone(), SharedStore::default());
    session.generate_packing_list().await;
    assert!(session.packing_list().is_some());
    assert!(session.list_trip().is_some());

    session.generate_packing_list().await;

    assert_eq!(generator.calls(), 2);
    assert!(!session.is_loading());
    assert!(session.packing_list().is_none());
    assert!(session.list_trip().is_none());
    assert_eq!(session.status(), SessionStatus::Errored);
}

#[tokio::test]
async fn saved_list_loads_back_equal() {
    let store = SharedStore::default();
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), store.clone());
    session.generate_packing_list().await;
    session.save_list();
    assert_eq!(session.error_message(), None);

    let saved_trip: TripSnapshot =
        serde_json::from_str(&store.raw(SAVED_TRIP_KEY).unwrap()).unwrap();
    assert_eq!(
        saved_trip,
        TripSnapshot {
            destination: "Dubrovnik".to_string(),
            start_date: "2025-07-01".to_string(),
            end_date: "2025-07-05".to_string(),
        }
    );

    let mut restored = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(store.clone()),
    );
    restored.load_saved_list();

    assert_eq!(restored.packing_list(), session.packing_list());
    assert_eq!(restored.list_trip(), Some(&saved_trip));
    assert_eq!(restored.destination, "Dubrovnik");
    assert_eq!(restored.duration(), 5);
}

#[test]
fn corrupted_entries_are_removed_on_load() {
    let store = SharedStore::default();
    store.put(SAVED_LIST_KEY, "{not json");
    store.put(SAVED_TRIP_KEY, "{\"destination\": \"Split\"}");

    let mut session = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(store.clone()),
    );
    session.load_saved_list();

    assert!(session.packing_list().is_none());
    assert_eq!(session.error_message(), None);
    assert_eq!(store.raw(SAVED_LIST_KEY), None);
    assert_eq!(store.raw(SAVED_TRIP_KEY), None);
}

#[test]
fn corrupted_snapshot_discards_both_entries() {
    let store = SharedStore::default();
    store.put(
        SAVED_LIST_KEY,
        &serde_json::to_string(&PackingList::default()).unwrap(),
    );
    store.put(SAVED_TRIP_KEY, "[]");

    let mut session = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(store.clone()),
    );
    session.load_saved_list();

    assert!(session.packing_list().is_none());
    assert_eq!(store.raw(SAVED_LIST_KEY), None);
    assert_eq!(store.raw(SAVED_TRIP_KEY), None);
}

#[test]
fn snapshot_without_list_loads_nothing() {
    let store = SharedStore::default();
    store.put(
        SAVED_TRIP_KEY,
        r#"{"destination":"Split","startDate":"2025-08-01","endDate":"2025-08-03"}"#,
    );

    let mut session = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(store),
    );
    session.load_saved_list();

    assert!(session.packing_list().is_none());
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn full_storage_surfaces_error_and_keeps_list() {
    let store = SharedStore::with_quota(64);
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), store.clone());
    session.generate_packing_list().await;

    session.save_list();

    assert!(session.error_message().unwrap().contains("Spremanje"));
    assert!(session.packing_list().is_some());
    assert_eq!(store.raw(SAVED_LIST_KEY), None);
}

#[tokio::test]
async fn failed_snapshot_write_keeps_previous_saved_pair() {
    let previous_list =
        serde_json::to_string(&serde_json::from_str::<PackingList>(VALID_REPLY).unwrap()).unwrap();
    let previous_trip = r#"{"destination":"Split","startDate":"2025-08-01","endDate":"2025-08-03"}"#;
    // room for exactly the previous pair
    let quota = SAVED_LIST_KEY.len() + previous_list.len() + SAVED_TRIP_KEY.len() + previous_trip.len();
    let store = SharedStore::with_quota(quota);
    store.put(SAVED_LIST_KEY, &previous_list);
    store.put(SAVED_TRIP_KEY, previous_trip);

    let small_reply = r#"{"outfitSuggestions":[],"baseClothing":["X"],"footwear":[],
        "toiletries":[],"accessoriesAndElectronics":[],"documentsAndMoney":[]}"#;
    let mut session = session_with(StubGenerator::replying(small_reply), store.clone());
    session.destination = "D".repeat(1000);
    session.generate_packing_list().await;
    assert!(session.packing_list().is_some());

    session.save_list();

    assert!(session.error_message().unwrap().contains("Spremanje"));
    assert_eq!(store.raw(SAVED_LIST_KEY).as_deref(), Some(previous_list.as_str()));
    assert_eq!(store.raw(SAVED_TRIP_KEY).as_deref(), Some(previous_trip));

    let mut restored = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(store),
    );
    restored.load_saved_list();
    assert_eq!(restored.list_trip().unwrap().destination, "Split");
    assert_eq!(restored.packing_list().unwrap().footwear.len(), 2);
}

#[tokio::test]
async fn clearing_removes_entries_and_result() {
    let store = SharedStore::default();
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), store.clone());
    session.generate_packing_list().await;
    session.save_list();

    session.clear_saved_list();

    assert!(session.packing_list().is_none());
    assert!(session.list_trip().is_none());
    assert_eq!(store.raw(SAVED_LIST_KEY), None);
    assert_eq!(store.raw(SAVED_TRIP_KEY), None);
}

#[tokio::test]
async fn share_prefers_native_target() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());
    session.generate_packing_list().await;
    let target = RecordingShare {
        native: true,
        ..Default::default()
    };

    let outcome = session.share_list(&target);

    assert_eq!(outcome, Some(ShareOutcome::Shared));
    let shared = target.shared.lock().unwrap();
    let (title, text) = &shared[0];
    assert_eq!(title, "Popis za pakiranje: Dubrovnik");
    assert!(text.contains("Prijedlozi odjevnih kombinacija:"));
    assert!(text.contains(
        "- Obilazak gradskih zidina: Prozračna odjeća za vrućinu i dugo hodanje"
    ));
    assert!(text.contains("Dodaci i elektronika:"));
    assert!(target.copied.lock().unwrap().is_empty());
}

#[tokio::test]
async fn share_falls_back_to_clipboard() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());
    session.generate_packing_list().await;
    let target = RecordingShare::default();

    assert_eq!(session.share_list(&target), Some(ShareOutcome::Copied));
    assert_eq!(target.copied.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn share_failure_is_reported_without_touching_list() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());
    session.generate_packing_list().await;
    let target = RecordingShare {
        fail: true,
        ..Default::default()
    };

    assert_eq!(session.share_list(&target), None);
    assert!(session.error_message().unwrap().contains("Dijeljenje"));
    assert!(session.packing_list().is_some());
}

#[test]
fn sharing_without_list_is_reported() {
    let mut session = session_with(StubGenerator::replying(VALID_REPLY), SharedStore::default());
    assert_eq!(session.share_list(&RecordingShare::default()), None);
    assert!(session.error_message().is_some());
}

#[test]
fn file_store_survives_new_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("packing-list.json");

    let list = PackingList {
        outfit_suggestions: vec![OutfitSuggestion {
            activity: "Jedrenje".to_string(),
            rationale: "Vjetar na moru".to_string(),
            items: vec!["Vjetrovka".to_string()],
        }],
        ..PackingList::default()
    };
    let mut store = JsonFileStore::new(&path);
    store
        .set(SAVED_LIST_KEY, &serde_json::to_string(&list).unwrap())
        .unwrap();

    let mut session = PackingSession::new(
        PackingPlanner::new(StubGenerator::failing()),
        Box::new(JsonFileStore::new(&path)),
    );
    session.load_saved_list();

    assert_eq!(session.packing_list(), Some(&list));
    assert!(session.list_trip().is_none());
}
