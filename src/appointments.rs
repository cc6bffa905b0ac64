//! Appointment status workflow.
//!
//! ```text
//! PENDING --agent--> CONFIRMED --client--> CANCELED
//!    |                                        ^
//!    +------------agent or client-------------+
//! ```
//!
//! A status change is sent as the full appointment. Local state changes only
//! after the backend accepted it.

use crate::api::BrokerageApi;
use crate::error::ApiError;
use crate::models::{Appointment, AppointmentId, MeetingStatus, Role, User, UserId};
use thiserror::Error;
use tracing::{info, warn};

/// Who is asking for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("appointment {0} is canceled")]
    Terminal(AppointmentId),

    #[error("user {user_id} is not part of appointment {appointment_id}")]
    NotAssociated {
        appointment_id: AppointmentId,
        user_id: UserId,
    },

    #[error("{role} may not move an appointment from {from} to {to}")]
    NotPermitted {
        role: Role,
        from: MeetingStatus,
        to: MeetingStatus,
    },

    #[error("appointment {0} is not loaded")]
    Unknown(AppointmentId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The actor's side of the appointment, if any
fn side(appointment: &Appointment, actor: Actor) -> Option<Role> {
    match actor.role {
        Role::Agent if appointment.realtor_id == actor.user_id => Some(Role::Agent),
        Role::Client if appointment.client_id == actor.user_id => Some(Role::Client),
        _ => None,
    }
}

fn allowed(side: Role, from: MeetingStatus, to: MeetingStatus) -> bool {
    use crate::models::MeetingStatus::*;

    matches!(
        (side, from, to),
        (Role::Agent, Pending, Confirmed)
            | (Role::Agent, Pending, Canceled)
            | (Role::Client, Pending, Canceled)
            | (Role::Client, Confirmed, Canceled)
    )
}

/// Check a transition without performing it
pub fn check_transition(
    appointment: &Appointment,
    actor: Actor,
    to: MeetingStatus,
) -> Result<(), WorkflowError> {
    let from = appointment.meeting_status;
    if from == MeetingStatus::Canceled {
        return Err(WorkflowError::Terminal(appointment.id));
    }

    let side = side(appointment, actor).ok_or(WorkflowError::NotAssociated {
        appointment_id: appointment.id,
        user_id: actor.user_id,
    })?;

    if !allowed(side, from, to) {
        return Err(WorkflowError::NotPermitted {
            role: side,
            from,
            to,
        });
    }
    Ok(())
}

/// Statuses the actor can move the appointment to, in button order
pub fn available_transitions(appointment: &Appointment, actor: Actor) -> Vec<MeetingStatus> {
    [MeetingStatus::Confirmed, MeetingStatus::Canceled]
        .into_iter()
        .filter(|to| check_transition(appointment, actor, *to).is_ok())
        .collect()
}

/// Request a status change and apply it once the backend accepts.
///
/// On failure `appointment` is left untouched.
pub async fn change_status(
    api: &dyn BrokerageApi,
    appointment: &mut Appointment,
    actor: Actor,
    to: MeetingStatus,
) -> Result<(), WorkflowError> {
    check_transition(appointment, actor, to)?;

    let mut payload = appointment.clone();
    payload.meeting_status = to;

    match api.update_appointment(&payload).await {
        Ok(_) => {
            info!(
                "Appointment {}: {} -> {}",
                appointment.id, appointment.meeting_status, to
            );
            appointment.meeting_status = to;
            Ok(())
        }
        Err(e) => {
            warn!("Failed to update appointment {}: {}", appointment.id, e);
            Err(e.into())
        }
    }
}

/// Local cache of the signed-in user's appointments
#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Replace the cache with the backend's current list
    pub async fn refresh(&mut self, api: &dyn BrokerageApi) -> Result<(), ApiError> {
        self.appointments = api.my_appointments().await?;
        info!("Loaded {} appointments", self.appointments.len());
        Ok(())
    }

    pub fn with_status(&self, status: MeetingStatus) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(move |a| a.meeting_status == status)
    }

    pub async fn change_status(
        &mut self,
        api: &dyn BrokerageApi,
        id: AppointmentId,
        actor: Actor,
        to: MeetingStatus,
    ) -> Result<(), WorkflowError> {
        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(WorkflowError::Unknown(id))?;
        change_status(api, appointment, actor, to).await
    }
}
