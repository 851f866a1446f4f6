use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::PlannerError;

/// Date format used by the form fields and the saved snapshot.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// When during the day an activity takes place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityTime {
    #[default]
    #[serde(rename = "dan", alias = "day")]
    Day,
    #[serde(rename = "noć", alias = "noc", alias = "night")]
    Night,
}

impl ActivityTime {
    /// Phrase used in the prompt's activity bullets.
    pub fn prompt_label(self) -> &'static str {
        match self {
            ActivityTime::Day => "dnevna aktivnost",
            ActivityTime::Night => "večernja/noćna aktivnost",
        }
    }
}

impl FromStr for ActivityTime {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "dan" | "day" => Ok(ActivityTime::Day),
            "noć" | "noc" | "night" => Ok(ActivityTime::Night),
            other => Err(PlannerError::Validation(format!(
                "unknown activity time `{other}` (expected day or night)"
            ))),
        }
    }
}

/// One planned activity of the trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub time: ActivityTime,
}

impl Activity {
    pub fn new(description: impl Into<String>, time: ActivityTime) -> Self {
        Self {
            description: description.into(),
            time,
        }
    }

    /// Blank descriptions are not accepted for generation.
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Parses `description[:day|night]`, defaulting to a daytime activity.
impl FromStr for Activity {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.rsplit_once(':') {
            Some((description, time)) if time.trim().parse::<ActivityTime>().is_ok() => {
                Ok(Activity::new(description.trim(), time.parse()?))
            }
            _ => Ok(Activity::new(value.trim(), ActivityTime::Day)),
        }
    }
}

/// Dress code the traveller expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formality {
    #[default]
    Casual,
    BusinessCasual,
    Formal,
}

impl Formality {
    pub fn as_str(self) -> &'static str {
        match self {
            Formality::Casual => "casual",
            Formality::BusinessCasual => "business-casual",
            Formality::Formal => "formal",
        }
    }
}

impl fmt::Display for Formality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formality {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "casual" => Ok(Formality::Casual),
            "business-casual" => Ok(Formality::BusinessCasual),
            "formal" => Ok(Formality::Formal),
            other => Err(PlannerError::Validation(format!(
                "unknown formality `{other}` (expected casual, business-casual or formal)"
            ))),
        }
    }
}

/// Everything the planner needs to describe one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// Inclusive day count; zero when the dates are unusable
    pub duration: i64,
    pub activities: Vec<Activity>,
    pub formality: Formality,
    pub light_luggage: bool,
}

impl TripDetails {
    pub fn new(
        destination: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        let start_date = start_date.into();
        let end_date = end_date.into();
        Self {
            destination: destination.into(),
            duration: trip_duration(&start_date, &end_date),
            start_date,
            end_date,
            activities: Vec::new(),
            formality: Formality::default(),
            light_luggage: false,
        }
    }

    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    pub fn with_light_luggage(mut self, light_luggage: bool) -> Self {
        self.light_luggage = light_luggage;
        self
    }

    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            destination: self.destination.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// Reduced trip details stored next to a saved packing list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSnapshot {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
}

/// Inclusive number of days between two `YYYY-MM-DD` dates.
///
/// Returns 0 when either date does not parse or the end precedes the start.
pub fn trip_duration(start_date: &str, end_date: &str) -> i64 {
    let (Ok(start), Ok(end)) = (
        NaiveDate::parse_from_str(start_date.trim(), DATE_FORMAT),
        NaiveDate::parse_from_str(end_date.trim(), DATE_FORMAT),
    ) else {
        return 0;
    };

    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}
