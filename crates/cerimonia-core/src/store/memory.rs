//! In-process store implementation.

use super::{AttendeeStore, EventStore, OptinStore};
use crate::cpf::Cpf;
use crate::error::StoreError;
use crate::types::{Attendee, Event, EventOptin, NewAttendee};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryData {
    /// Attendees indexed by canonical CPF
    attendees: HashMap<Cpf, Attendee>,
    /// Opt-ins indexed by (event id, attendee id)
    optins: HashMap<(String, String), EventOptin>,
    /// Events indexed by id
    events: HashMap<String, Event>,
}

/// Store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an event.
    pub async fn insert_event(&self, event: Event) {
        let mut data = self.data.write().await;
        data.events.insert(event.id.clone(), event);
    }

    /// Load events from a JSON array file.
    pub async fn load_events(&self, path: &Path) -> Result<usize, StoreError> {
        let raw = fs::read(path)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to read {}: {}", path.display(), e)))?;
        let events: Vec<Event> = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Backend(format!("Invalid events file: {}", e)))?;

        let count = events.len();
        let mut data = self.data.write().await;
        for event in events {
            data.events.insert(event.id.clone(), event);
        }

        info!(path = %path.display(), count, "Loaded events");
        Ok(count)
    }

    /// Number of stored attendees.
    pub async fn attendee_count(&self) -> usize {
        self.data.read().await.attendees.len()
    }

    /// Number of stored opt-ins across all events.
    pub async fn optin_count(&self) -> usize {
        self.data.read().await.optins.len()
    }
}

#[async_trait]
impl AttendeeStore for MemoryStore {
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Attendee>, StoreError> {
        Ok(self.data.read().await.attendees.get(cpf).cloned())
    }

    async fn create(&self, attendee: NewAttendee) -> Result<Attendee, StoreError> {
        let mut data = self.data.write().await;
        if data.attendees.contains_key(&attendee.cpf) {
            return Err(StoreError::Conflict(format!(
                "attendee with cpf {} already exists",
                attendee.cpf
            )));
        }

        let record = Attendee {
            id: Uuid::new_v4().to_string(),
            cpf: attendee.cpf,
            full_name: attendee.full_name,
            email: attendee.email,
            created_at: Utc::now(),
        };
        data.attendees.insert(record.cpf.clone(), record.clone());

        debug!(attendee_id = %record.id, "Attendee created");
        Ok(record)
    }
}

#[async_trait]
impl OptinStore for MemoryStore {
    async fn find(
        &self,
        event_id: &str,
        attendee_id: &str,
    ) -> Result<Option<EventOptin>, StoreError> {
        let key = (event_id.to_string(), attendee_id.to_string());
        Ok(self.data.read().await.optins.get(&key).cloned())
    }

    async fn create(&self, event_id: &str, attendee_id: &str) -> Result<EventOptin, StoreError> {
        let mut data = self.data.write().await;
        let key = (event_id.to_string(), attendee_id.to_string());
        if data.optins.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "attendee {} already opted into event {}",
                attendee_id, event_id
            )));
        }

        let optin = EventOptin::new(event_id, attendee_id);
        data.optins.insert(key, optin.clone());

        debug!(event_id, attendee_id, "Opt-in created");
        Ok(optin)
    }

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<EventOptin>, StoreError> {
        let data = self.data.read().await;
        let mut optins: Vec<EventOptin> = data
            .optins
            .values()
            .filter(|o| o.event_id == event_id)
            .cloned()
            .collect();
        optins.sort_by_key(|o| o.created_at);
        Ok(optins)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find_by_id(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.data.read().await.events.get(event_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let data = self.data.read().await;
        let mut events: Vec<Event> = data.events.values().cloned().collect();
        events.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        Ok(events)
    }
}
