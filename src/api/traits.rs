use crate::api::types::PageRequest;
use crate::error::Result;
use crate::models::{
    Appointment, AuthResponse, Credentials, NewReview, Page, Property, PropertyId, Registration,
    Review, ReviewId, User, UserId,
};
use async_trait::async_trait;

/// REST surface of the brokerage backend.
///
/// Views and workflows only talk to this trait, so they can run against the
/// HTTP client or an in-memory stand-in.
#[async_trait]
pub trait BrokerageApi: Send + Sync {
    /// `GET /real-estates?page&limit`
    async fn list_properties(&self, request: PageRequest) -> Result<Page<Property>>;

    /// `GET /real-estates/{id}`; a missing listing is `Ok(None)`
    async fn get_property(&self, id: PropertyId) -> Result<Option<Property>>;

    /// `GET /real-estates/by-realtor/{agentId}`
    async fn properties_by_realtor(&self, agent_id: UserId) -> Result<Vec<Property>>;

    /// `GET /reviews`
    async fn list_reviews(&self) -> Result<Vec<Review>>;

    /// `GET /reviews/realtor/{agentId}`
    async fn reviews_for_realtor(&self, agent_id: UserId) -> Result<Vec<Review>>;

    /// `POST /reviews`
    async fn create_review(&self, review: &NewReview) -> Result<Review>;

    /// `PUT /reviews/{id}` with the full review
    async fn update_review(&self, review: &Review) -> Result<Review>;

    /// `DELETE /reviews/{id}`
    async fn delete_review(&self, id: ReviewId) -> Result<()>;

    /// `GET /appointments` for the signed-in user
    async fn my_appointments(&self) -> Result<Vec<Appointment>>;

    /// `PUT /appointments/{id}` with the full appointment
    async fn update_appointment(&self, appointment: &Appointment) -> Result<Appointment>;

    /// `GET /profile/{id}`
    async fn get_profile(&self, id: UserId) -> Result<User>;

    /// `PUT /profile/{id}`
    async fn update_profile(&self, user: &User) -> Result<User>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, registration: &Registration) -> Result<AuthResponse>;
}
