//! Contracts for the backing data stores.
//!
//! Uniqueness of attendee CPFs and of (event, attendee) opt-in pairs is enforced by
//! the store; a violating `create` returns [`StoreError::Conflict`].

mod memory;

pub use memory::MemoryStore;

use crate::cpf::Cpf;
use crate::error::StoreError;
use crate::types::{Attendee, Event, EventOptin, NewAttendee};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Attendee>, StoreError>;

    async fn create(&self, attendee: NewAttendee) -> Result<Attendee, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptinStore: Send + Sync {
    async fn find(
        &self,
        event_id: &str,
        attendee_id: &str,
    ) -> Result<Option<EventOptin>, StoreError>;

    async fn create(&self, event_id: &str, attendee_id: &str) -> Result<EventOptin, StoreError>;

    /// Opt-ins for one event, oldest first.
    async fn list_for_event(&self, event_id: &str) -> Result<Vec<EventOptin>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_by_id(&self, event_id: &str) -> Result<Option<Event>, StoreError>;

    /// All events, latest start time first.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;
}

/// Handles to every store the flow talks to.
#[derive(Clone)]
pub struct Stores {
    pub attendees: Arc<dyn AttendeeStore>,
    pub optins: Arc<dyn OptinStore>,
    pub events: Arc<dyn EventStore>,
}

impl Stores {
    /// Use one backend for all three contracts.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: AttendeeStore + OptinStore + EventStore + 'static,
    {
        Self {
            attendees: backend.clone(),
            optins: backend.clone(),
            events: backend,
        }
    }
}
