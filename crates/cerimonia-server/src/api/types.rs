//! API request and response types.

use cerimonia_core::{Attendee, Event, EventOptin, Existence, Notice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub backend_healthy: bool,
}

/// Public view of an event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub datetime: DateTime<Utc>,
    pub pix_key: Option<String>,
    pub image_url: Option<String>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            name: e.name,
            location: e.location,
            datetime: e.datetime,
            pix_key: e.pix_key,
            image_url: e.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventResponse>,
    pub total: usize,
}

/// Result of a CPF existence check.
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    /// Display form of the submitted CPF
    pub cpf: String,
    pub status: Existence,
}

/// Attendee signup form.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub cpf: String,
    pub full_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttendeeResponse {
    pub id: String,
    pub cpf: String,
    pub full_name: String,
    pub email: Option<String>,
    pub message: String,
}

impl From<Attendee> for AttendeeResponse {
    fn from(a: Attendee) -> Self {
        Self {
            id: a.id,
            cpf: a.cpf.formatted(),
            full_name: a.full_name,
            email: a.email,
            message: Notice::SignupComplete.message().to_string(),
        }
    }
}

/// Request to opt into an event.
#[derive(Debug, Deserialize)]
pub struct OptinRequest {
    pub cpf: String,
}

#[derive(Debug, Serialize)]
pub struct OptinResponse {
    pub event_id: String,
    pub status: Notice,
    pub message: String,
    /// PIX key for manual payment
    pub pix_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptinsResponse {
    pub optins: Vec<EventOptin>,
    pub total: usize,
}
