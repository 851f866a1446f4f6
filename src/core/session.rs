use tracing::{error, info, warn};

use super::{
    planner::PackingPlanner,
    share::{render_share_text, share_title, ShareOutcome, ShareTarget},
    storage::KeyValueStore,
};
use crate::{
    error::Result,
    types::{trip_duration, Activity, Formality, PackingList, TripDetails, TripSnapshot},
};

/// Storage key of the saved packing list.
pub const SAVED_LIST_KEY: &str = "packingList";
/// Storage key of the saved trip snapshot.
pub const SAVED_TRIP_KEY: &str = "packingTripDetails";

pub const INVALID_DATES_MESSAGE: &str =
    "Molimo unesite ispravne datume putovanja (datum povratka ne može biti prije datuma polaska).";
pub const BLANK_ACTIVITY_MESSAGE: &str = "Molimo opišite sve planirane aktivnosti.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Došlo je do pogreške prilikom generiranja popisa. Molimo pokušajte ponovno.";
pub const SAVE_FAILED_MESSAGE: &str =
    "Spremanje popisa nije uspjelo. Lokalna pohrana je možda puna ili nedostupna.";
pub const NOTHING_TO_SAVE_MESSAGE: &str = "Nema popisa za spremanje.";
pub const NOTHING_TO_SHARE_MESSAGE: &str = "Nema popisa za dijeljenje.";
pub const SHARE_FAILED_MESSAGE: &str = "Dijeljenje popisa nije uspjelo.";

/// Generation status derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Editable trip form plus the generated result.
///
/// Actions never return errors: failures end up in [`PackingSession::error_message`]
/// and leave the session usable for the next action.
#[derive(Debug)]
pub struct PackingSession {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub activities: Vec<Activity>,
    pub formality: Formality,
    pub light_luggage: bool,

    planner: PackingPlanner,
    store: Box<dyn KeyValueStore>,
    packing_list: Option<PackingList>,
    list_trip: Option<TripSnapshot>,
    loading: bool,
    error_message: Option<String>,
}

impl PackingSession {
    pub fn new(planner: PackingPlanner, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            destination: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            activities: vec![Activity::default()],
            formality: Formality::default(),
            light_luggage: false,
            planner,
            store,
            packing_list: None,
            list_trip: None,
            loading: false,
            error_message: None,
        }
    }

    /// Inclusive day count of the current dates, 0 when they are unusable.
    pub fn duration(&self) -> i64 {
        trip_duration(&self.start_date, &self.end_date)
    }

    pub fn add_activity(&mut self) {
        self.activities.push(Activity::default());
    }

    pub fn remove_activity(&mut self, index: usize) {
        if index < self.activities.len() {
            self.activities.remove(index);
        }
    }

    pub fn packing_list(&self) -> Option<&PackingList> {
        self.packing_list.as_ref()
    }

    /// Trip the displayed list belongs to.
    pub fn list_trip(&self) -> Option<&TripSnapshot> {
        self.list_trip.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Loading
        } else if self.error_message.is_some() {
            SessionStatus::Errored
        } else if self.packing_list.is_some() {
            SessionStatus::Loaded
        } else {
            SessionStatus::Idle
        }
    }

    /// Fresh trip details built from the form fields.
    pub fn trip_details(&self) -> TripDetails {
        TripDetails::new(&self.destination, &self.start_date, &self.end_date)
            .with_activities(self.activities.clone())
            .with_formality(self.formality)
            .with_light_luggage(self.light_luggage)
    }

    /// First user-facing problem with the form, if any.
    pub fn validate(&self) -> Option<&'static str> {
        if self.duration() <= 0 {
            return Some(INVALID_DATES_MESSAGE);
        }
        if self.activities.iter().any(|activity| !activity.is_valid()) {
            return Some(BLANK_ACTIVITY_MESSAGE);
        }
        None
    }

    pub async fn generate_packing_list(&mut self) {
        if let Some(message) = self.validate() {
            warn!(target: "packing::session", reason = message, "Generation refused");
            self.error_message = Some(message.to_string());
            return;
        }

        let details = self.trip_details();
        self.packing_list = None;
        self.list_trip = None;
        self.error_message = None;
        self.loading = true;

        let outcome = self.planner.generate_packing_list(&details).await;
        self.loading = false;

        match outcome {
            Ok(list) => {
                self.packing_list = Some(list);
                self.list_trip = Some(details.snapshot());
            }
            Err(err) => {
                error!(
                    target: "packing::session",
                    code = err.error_code(),
                    error = %err,
                    "Packing list generation failed"
                );
                self.error_message = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn save_list(&mut self) {
        let Some(list) = self.packing_list.as_ref() else {
            self.error_message = Some(NOTHING_TO_SAVE_MESSAGE.to_string());
            return;
        };
        let trip = self.current_trip_snapshot();

        match persist(self.store.as_mut(), list, &trip) {
            Ok(()) => {
                info!(target: "packing::session", destination = %trip.destination, "Packing list saved");
                self.error_message = None;
            }
            Err(err) => {
                error!(
                    target: "packing::session",
                    code = err.error_code(),
                    error = %err,
                    "Saving packing list failed"
                );
                self.error_message = Some(SAVE_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Restore a previously saved list. Unreadable entries are dropped silently.
    pub fn load_saved_list(&mut self) {
        match self.read_saved() {
            Ok(Some((list, trip))) => {
                info!(target: "packing::session", "Saved packing list restored");
                if let Some(trip) = &trip {
                    self.destination = trip.destination.clone();
                    self.start_date = trip.start_date.clone();
                    self.end_date = trip.end_date.clone();
                }
                self.packing_list = Some(list);
                self.list_trip = trip;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    target: "packing::session",
                    error = %err,
                    "Discarding unreadable saved packing list"
                );
                self.remove_saved_entries();
                self.packing_list = None;
                self.list_trip = None;
            }
        }
    }

    pub fn clear_saved_list(&mut self) {
        self.remove_saved_entries();
        self.packing_list = None;
        self.list_trip = None;
        self.error_message = None;
    }

    /// Share the current list natively, or copy it to the clipboard.
    pub fn share_list(&mut self, target: &dyn ShareTarget) -> Option<ShareOutcome> {
        let Some(list) = self.packing_list.as_ref() else {
            self.error_message = Some(NOTHING_TO_SHARE_MESSAGE.to_string());
            return None;
        };
        let trip = self.current_trip_snapshot();
        let text = render_share_text(list, &trip);

        let outcome = if target.can_share() {
            target
                .share(&share_title(&trip), &text)
                .map(|_| ShareOutcome::Shared)
        } else {
            target
                .copy_to_clipboard(&text)
                .map(|_| ShareOutcome::Copied)
        };

        match outcome {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(target: "packing::session", error = %err, "Sharing packing list failed");
                self.error_message = Some(SHARE_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    fn current_trip_snapshot(&self) -> TripSnapshot {
        self.list_trip
            .clone()
            .unwrap_or_else(|| self.trip_details().snapshot())
    }

    fn read_saved(&self) -> Result<Option<(PackingList, Option<TripSnapshot>)>> {
        let Some(list_json) = self.store.get(SAVED_LIST_KEY)? else {
            return Ok(None);
        };
        let list: PackingList = serde_json::from_str(&list_json)?;
        let trip = match self.store.get(SAVED_TRIP_KEY)? {
            Some(trip_json) => Some(serde_json::from_str(&trip_json)?),
            None => None,
        };
        Ok(Some((list, trip)))
    }

    fn remove_saved_entries(&mut self) {
        for key in [SAVED_LIST_KEY, SAVED_TRIP_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(target: "packing::session", key, error = %err, "Could not remove saved entry");
            }
        }
    }
}

/// Write list and snapshot as a pair. If the snapshot write fails the previous
/// list value is put back so the stored pair stays consistent.
fn persist(store: &mut dyn KeyValueStore, list: &PackingList, trip: &TripSnapshot) -> Result<()> {
    let list_json = serde_json::to_string(list)?;
    let trip_json = serde_json::to_string(trip)?;
    let previous_list = store.get(SAVED_LIST_KEY)?;

    store.set(SAVED_LIST_KEY, &list_json)?;
    if let Err(err) = store.set(SAVED_TRIP_KEY, &trip_json) {
        let restored = match &previous_list {
            Some(previous) => store.set(SAVED_LIST_KEY, previous),
            None => store.remove(SAVED_LIST_KEY),
        };
        if let Err(rollback_err) = restored {
            warn!(
                target: "packing::session",
                error = %rollback_err,
                "Rolling back saved list failed, dropping saved entries"
            );
            let _ = store.remove(SAVED_LIST_KEY);
            let _ = store.remove(SAVED_TRIP_KEY);
        }
        return Err(err);
    }
    Ok(())
}
