//! Supabase client errors.

use cerimonia_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed")]
    Unauthorized,

    /// Unique constraint violation (HTTP 409 or Postgres code 23505).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from backend")]
    EmptyResponse,
}

impl From<SupabaseError> for StoreError {
    fn from(e: SupabaseError) -> Self {
        match e {
            SupabaseError::Conflict(message) => StoreError::Conflict(message),
            SupabaseError::Api { message, .. } => StoreError::Backend(message),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
