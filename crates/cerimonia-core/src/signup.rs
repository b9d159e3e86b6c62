//! Attendee signup.

use crate::error::{FlowError, StoreError};
use crate::store::AttendeeStore;
use crate::types::{Attendee, NewAttendee};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Creates attendees, at most one per CPF.
#[derive(Clone)]
pub struct SignupService {
    attendees: Arc<dyn AttendeeStore>,
}

impl SignupService {
    pub fn new(attendees: Arc<dyn AttendeeStore>) -> Self {
        Self { attendees }
    }

    /// Create a new attendee.
    ///
    /// An existing CPF, whether seen by the pre-check or rejected by the store, yields
    /// [`FlowError::CpfAlreadyRegistered`] so the caller can send the user back to the lookup.
    #[instrument(skip_all, fields(cpf = %attendee.cpf))]
    pub async fn sign_up(&self, attendee: NewAttendee) -> Result<Attendee, FlowError> {
        if self.attendees.find_by_cpf(&attendee.cpf).await?.is_some() {
            warn!("Signup attempted for existing CPF");
            return Err(FlowError::CpfAlreadyRegistered);
        }

        match self.attendees.create(attendee).await {
            Ok(created) => {
                info!(attendee_id = %created.id, "Attendee signed up");
                Ok(created)
            }
            Err(StoreError::Conflict(_)) => {
                warn!("Signup lost a race against a concurrent signup");
                Err(FlowError::CpfAlreadyRegistered)
            }
            Err(e) => Err(e.into()),
        }
    }
}
