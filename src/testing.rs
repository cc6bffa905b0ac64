//! In-memory stand-in for the backend and record builders for unit tests.

use crate::api::{BrokerageApi, PageRequest};
use crate::error::{ApiError, Result};
use crate::models::{
    Address, Appointment, AuthResponse, ContractType, Credentials, MeetingStatus, MeetingType,
    NewReview, Page, PersonalInformation, Property, PropertyId, PropertyKind, PropertyStatus,
    Registration, Review, ReviewId, Role, User, UserId,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn property(id: PropertyId, kind: PropertyKind, price: f64) -> Property {
    Property {
        id,
        name: format!("Listing {}", id),
        description: String::new(),
        kind,
        status: PropertyStatus::Available,
        contract_type: ContractType::Sale,
        price,
        previous_price: None,
        usable_area: 80.0,
        address: Address {
            street: "Náměstí Míru".to_string(),
            city: "Praha".to_string(),
            ..Default::default()
        },
        agent_id: 7,
        images: vec![],
    }
}

pub fn user(id: UserId, role: Role) -> User {
    User {
        id,
        email: format!("user{}@example.cz", id),
        role,
        personal_information: PersonalInformation {
            first_name: "User".to_string(),
            last_name: id.to_string(),
            ..Default::default()
        },
    }
}

pub fn review(id: ReviewId, overall: u8, realtor_id: UserId, author_client_id: UserId) -> Review {
    Review {
        id,
        overall,
        text: format!("review {}", id),
        realtor_id,
        author_client_id,
    }
}

pub fn appointment(id: i64, status: MeetingStatus, realtor_id: UserId, client_id: UserId) -> Appointment {
    Appointment {
        id,
        meeting_time: Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0).unwrap(),
        meeting_type: MeetingType::Offline,
        meeting_status: status,
        realtor_id,
        client_id,
        real_estate_id: Some(1),
    }
}

#[derive(Default)]
struct FakeState {
    properties: Vec<Property>,
    reviews: Vec<Review>,
    appointments: Vec<Appointment>,
    users: HashMap<UserId, User>,
    failing_profiles: HashSet<UserId>,
    profile_calls: Vec<UserId>,
    page_requests: Vec<PageRequest>,
    appointment_updates: Vec<Appointment>,
    reject_writes: bool,
    next_id: i64,
}

/// Backend double holding records in memory
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(self, properties: Vec<Property>) -> Self {
        self.state.lock().unwrap().properties = properties;
        self
    }

    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.state.lock().unwrap().reviews = reviews;
        self
    }

    pub fn with_appointments(self, appointments: Vec<Appointment>) -> Self {
        self.state.lock().unwrap().appointments = appointments;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().unwrap().users = users.into_iter().map(|u| (u.id, u)).collect();
        self
    }

    /// Profile lookups for this id fail with a server error
    pub fn failing_profile(self, id: UserId) -> Self {
        self.state.lock().unwrap().failing_profiles.insert(id);
        self
    }

    /// Every mutating call fails with a server error
    pub fn rejecting_writes(self) -> Self {
        self.state.lock().unwrap().reject_writes = true;
        self
    }

    pub fn profile_calls(&self) -> Vec<UserId> {
        self.state.lock().unwrap().profile_calls.clone()
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.state.lock().unwrap().page_requests.clone()
    }

    pub fn appointment_updates(&self) -> Vec<Appointment> {
        self.state.lock().unwrap().appointment_updates.clone()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.state.lock().unwrap().reviews.clone()
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        }
    }

    fn check_writable(state: &FakeState) -> Result<()> {
        if state.reject_writes {
            return Err(Self::server_error());
        }
        Ok(())
    }
}

#[async_trait]
impl BrokerageApi for FakeApi {
    async fn list_properties(&self, request: PageRequest) -> Result<Page<Property>> {
        let mut state = self.state.lock().unwrap();
        state.page_requests.push(request);
        let content = state
            .properties
            .iter()
            .skip((request.page * request.limit) as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();
        Ok(Page {
            content,
            total_elements: state.properties.len() as u64,
        })
    }

    async fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let state = self.state.lock().unwrap();
        Ok(state.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn properties_by_realtor(&self, agent_id: UserId) -> Result<Vec<Property>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .properties
            .iter()
            .filter(|p| p.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.state.lock().unwrap().reviews.clone())
    }

    async fn reviews_for_realtor(&self, agent_id: UserId) -> Result<Vec<Review>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reviews
            .iter()
            .filter(|r| r.realtor_id == agent_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        state.next_id += 1;
        let created = Review {
            id: 1000 + state.next_id,
            overall: review.overall,
            text: review.text.clone(),
            realtor_id: review.realtor_id,
            author_client_id: review.author_client_id,
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        let slot = state
            .reviews
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or(ApiError::NotFound)?;
        *slot = review.clone();
        Ok(review.clone())
    }

    async fn delete_review(&self, id: ReviewId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        if state.reviews.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn my_appointments(&self) -> Result<Vec<Appointment>> {
        Ok(self.state.lock().unwrap().appointments.clone())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<Appointment> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        state.appointment_updates.push(appointment.clone());
        if let Some(slot) = state.appointments.iter_mut().find(|a| a.id == appointment.id) {
            *slot = appointment.clone();
        }
        Ok(appointment.clone())
    }

    async fn get_profile(&self, id: UserId) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        state.profile_calls.push(id);
        if state.failing_profiles.contains(&id) {
            return Err(Self::server_error());
        }
        state.users.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn update_profile(&self, user: &User) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let state = self.state.lock().unwrap();
        let user = state
            .users
            .values()
            .find(|u| u.email == credentials.email)
            .cloned()
            .ok_or(ApiError::Unauthorized(StatusCode::UNAUTHORIZED))?;
        Ok(AuthResponse {
            token: format!("token-{}", user.id),
            user,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state)?;
        state.next_id += 1;
        let user = User {
            id: 500 + state.next_id,
            email: registration.email.clone(),
            role: registration.role,
            personal_information: registration.personal_information.clone(),
        };
        state.users.insert(user.id, user.clone());
        Ok(AuthResponse {
            token: format!("token-{}", user.id),
            user,
        })
    }
}
