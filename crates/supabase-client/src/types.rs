//! PostgREST wire types.

use serde::{Deserialize, Serialize};

pub const ATTENDEES_TABLE: &str = "attendees";
pub const EVENTS_TABLE: &str = "events";
pub const OPTINS_TABLE: &str = "event_optins";

/// Postgres unique violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Error body returned by PostgREST.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

/// Row inserted into `event_optins`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOptinRow<'a> {
    pub event_id: &'a str,
    pub attendee_id: &'a str,
}
