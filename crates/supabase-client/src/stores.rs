//! Store contracts backed by Supabase tables.

use crate::client::SupabaseClient;
use crate::types::{NewOptinRow, ATTENDEES_TABLE, EVENTS_TABLE, OPTINS_TABLE};
use async_trait::async_trait;
use cerimonia_core::{
    Attendee, AttendeeStore, Cpf, Event, EventOptin, EventStore, NewAttendee, OptinStore,
    StoreError,
};

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl AttendeeStore for SupabaseClient {
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Attendee>, StoreError> {
        let rows: Vec<Attendee> = self
            .select(
                ATTENDEES_TABLE,
                &[
                    ("select", "*".into()),
                    ("cpf", eq(cpf.as_str())),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, attendee: NewAttendee) -> Result<Attendee, StoreError> {
        Ok(self.insert(ATTENDEES_TABLE, &attendee).await?)
    }
}

#[async_trait]
impl OptinStore for SupabaseClient {
    async fn find(
        &self,
        event_id: &str,
        attendee_id: &str,
    ) -> Result<Option<EventOptin>, StoreError> {
        let rows: Vec<EventOptin> = self
            .select(
                OPTINS_TABLE,
                &[
                    ("select", "*".into()),
                    ("event_id", eq(event_id)),
                    ("attendee_id", eq(attendee_id)),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, event_id: &str, attendee_id: &str) -> Result<EventOptin, StoreError> {
        let row = NewOptinRow {
            event_id,
            attendee_id,
        };
        Ok(self.insert(OPTINS_TABLE, &row).await?)
    }

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<EventOptin>, StoreError> {
        Ok(self
            .select(
                OPTINS_TABLE,
                &[
                    ("select", "*".into()),
                    ("event_id", eq(event_id)),
                    ("order", "created_at.asc".into()),
                ],
            )
            .await?)
    }
}

#[async_trait]
impl EventStore for SupabaseClient {
    async fn find_by_id(&self, event_id: &str) -> Result<Option<Event>, StoreError> {
        let rows: Vec<Event> = self
            .select(
                EVENTS_TABLE,
                &[
                    ("select", "*".into()),
                    ("id", eq(event_id)),
                    ("limit", "1".into()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .select(
                EVENTS_TABLE,
                &[("select", "*".into()), ("order", "datetime.desc".into())],
            )
            .await?)
    }
}
