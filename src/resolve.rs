//! Resolution of foreign user ids to full user records.
//!
//! Ids are deduplicated before any request goes out, so each unique id costs
//! at most one `GET /profile/{id}` per directory. Lookups for one batch run
//! concurrently.

use crate::api::BrokerageApi;
use crate::error::ApiError;
use crate::models::{Appointment, Review, User, UserId};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
#[error("failed to resolve users {failed:?}")]
pub struct ResolveError {
    /// Ids whose lookup failed, in first-seen order
    pub failed: Vec<UserId>,
    #[source]
    pub source: ApiError,
}

/// Unique ids in first-seen order
pub fn unique_ids(ids: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Memo of users resolved during one page load
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<UserId, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Look up every id not already known.
    ///
    /// Successful lookups are kept even when others fail; the error lists
    /// the ids that could not be resolved.
    pub async fn resolve(
        &mut self,
        api: &dyn BrokerageApi,
        ids: impl IntoIterator<Item = UserId>,
    ) -> Result<(), ResolveError> {
        let missing: Vec<UserId> = unique_ids(ids)
            .into_iter()
            .filter(|id| !self.users.contains_key(id))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        debug!("Resolving {} users", missing.len());
        let lookups = missing.iter().map(|id| async move { (*id, api.get_profile(*id).await) });

        let mut failed = Vec::new();
        let mut first_error = None;
        for (id, result) in join_all(lookups).await {
            match result {
                Ok(user) => {
                    self.users.insert(id, user);
                }
                Err(e) => {
                    warn!("Failed to resolve user {}: {}", id, e);
                    failed.push(id);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => Err(ResolveError { failed, source }),
            None => Ok(()),
        }
    }

    /// Resolve the agents and authors referenced by `reviews`
    pub async fn resolve_reviews(
        &mut self,
        api: &dyn BrokerageApi,
        reviews: &[Review],
    ) -> Result<(), ResolveError> {
        let ids = reviews
            .iter()
            .flat_map(|r| [r.realtor_id, r.author_client_id]);
        self.resolve(api, ids).await
    }

    /// Resolve the agents and clients referenced by `appointments`
    pub async fn resolve_appointments(
        &mut self,
        api: &dyn BrokerageApi,
        appointments: &[Appointment],
    ) -> Result<(), ResolveError> {
        let ids = appointments
            .iter()
            .flat_map(|a| [a.realtor_id, a.client_id]);
        self.resolve(api, ids).await
    }

    pub fn join_reviews<'a>(&'a self, reviews: &'a [Review]) -> Vec<ResolvedReview<'a>> {
        reviews
            .iter()
            .map(|review| ResolvedReview {
                review,
                realtor: self.get(review.realtor_id),
                author: self.get(review.author_client_id),
            })
            .collect()
    }

    pub fn join_appointments<'a>(
        &'a self,
        appointments: &'a [Appointment],
    ) -> Vec<ResolvedAppointment<'a>> {
        appointments
            .iter()
            .map(|appointment| ResolvedAppointment {
                appointment,
                realtor: self.get(appointment.realtor_id),
                client: self.get(appointment.client_id),
            })
            .collect()
    }
}

/// A review with its agent and author, where known
#[derive(Debug, Clone, Copy)]
pub struct ResolvedReview<'a> {
    pub review: &'a Review,
    pub realtor: Option<&'a User>,
    pub author: Option<&'a User>,
}

/// An appointment with its agent and client, where known
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAppointment<'a> {
    pub appointment: &'a Appointment,
    pub realtor: Option<&'a User>,
    pub client: Option<&'a User>,
}
