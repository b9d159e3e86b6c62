//! Event opt-in for existing attendees.

use crate::cpf::Cpf;
use crate::error::{FlowError, StoreError};
use crate::store::{AttendeeStore, OptinStore};
use crate::types::{EventOptin, Notice};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of a successful opt-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new opt-in row was written.
    Registered(EventOptin),
    /// The pair was already registered; nothing was written.
    AlreadyRegistered,
}

impl RegistrationOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            RegistrationOutcome::Registered(_) => Notice::RegistrationComplete,
            RegistrationOutcome::AlreadyRegistered => Notice::AlreadyRegistered,
        }
    }
}

/// Opts attendees into events, at most once per (event, attendee) pair.
///
/// The existence check and the insert are not atomic. Two concurrent attempts can both
/// see no opt-in; the store's pair uniqueness rejects the loser, and that conflict is
/// reported as [`RegistrationOutcome::AlreadyRegistered`].
#[derive(Clone)]
pub struct OptinService {
    attendees: Arc<dyn AttendeeStore>,
    optins: Arc<dyn OptinStore>,
}

impl OptinService {
    pub fn new(attendees: Arc<dyn AttendeeStore>, optins: Arc<dyn OptinStore>) -> Self {
        Self { attendees, optins }
    }

    /// Register the attendee owning `cpf` for `event_id`.
    #[instrument(skip(self, cpf), fields(cpf = %cpf))]
    pub async fn register(
        &self,
        event_id: &str,
        cpf: &Cpf,
    ) -> Result<RegistrationOutcome, FlowError> {
        let attendee = self
            .attendees
            .find_by_cpf(cpf)
            .await?
            .ok_or(FlowError::AttendeeNotFound)?;

        if self.optins.find(event_id, &attendee.id).await?.is_some() {
            info!(attendee_id = %attendee.id, "Attendee already registered");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        match self.optins.create(event_id, &attendee.id).await {
            Ok(optin) => {
                info!(attendee_id = %attendee.id, "Registration complete");
                Ok(RegistrationOutcome::Registered(optin))
            }
            Err(StoreError::Conflict(msg)) => {
                warn!(attendee_id = %attendee.id, conflict = %msg, "Concurrent opt-in won the race");
                Ok(RegistrationOutcome::AlreadyRegistered)
            }
            Err(e) => Err(e.into()),
        }
    }
}
