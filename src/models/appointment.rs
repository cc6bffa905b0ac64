use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, PropertyId, UserId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingType {
    Online,
    Offline,
}

/// Lifecycle of an appointment. `Canceled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MeetingStatus::Pending => "PENDING",
            MeetingStatus::Confirmed => "CONFIRMED",
            MeetingStatus::Canceled => "CANCELED",
        };
        f.write_str(label)
    }
}

/// Meeting between an agent and a client, optionally about a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub meeting_time: DateTime<Utc>,
    pub meeting_type: MeetingType,
    pub meeting_status: MeetingStatus,
    pub realtor_id: UserId,
    pub client_id: UserId,
    #[serde(default)]
    pub real_estate_id: Option<PropertyId>,
}
