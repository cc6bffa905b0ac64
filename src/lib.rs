//! Client library for the real-estate brokerage REST API: listing filters and
//! pagination, review statistics, the appointment workflow and batched user
//! resolution.

pub mod api;
pub mod appointments;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod listing;
pub mod models;
pub mod resolve;
pub mod reviews;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{BrokerageApi, HttpBrokerageApi, PageRequest};
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::{Session, SessionStore};
