mod appointment;
mod property;
mod review;
mod user;

pub use appointment::{Appointment, MeetingStatus, MeetingType};
pub use property::{
    Address, ContractType, Property, PropertyKind, PropertyStatus, PropertyType, UnknownVariant,
};
pub use review::{NewReview, Review};
pub use user::{AuthResponse, Credentials, PersonalInformation, Registration, Role, User};

use serde::{Deserialize, Serialize};

pub type PropertyId = i64;
pub type ReviewId = i64;
pub type AppointmentId = i64;
pub type UserId = i64;

/// One page of a server-paginated collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
        }
    }
}
