//! Public transport schedules

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Status of the next rail departure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RailSchedule {
    pub status: String,
    pub next_departure: DateTime<Utc>,
}

/// Schedules per transport mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportSchedules {
    pub rail: RailSchedule,
}

impl TransportSchedules {
    /// Fixed rail timetable until a live schedule feed is wired in
    pub fn static_rail() -> Self {
        Self {
            rail: RailSchedule {
                status: "on time".to_string(),
                next_departure: Utc
                    .with_ymd_and_hms(2023, 10, 10, 10, 0, 0)
                    .single()
                    .unwrap_or_default(),
            },
        }
    }
}
