//! Supabase PostgREST client.
//!
//! Implements the cerimonia store contracts against the `attendees`, `events` and
//! `event_optins` tables. Unique violations come back as `StoreError::Conflict`.

mod client;
mod error;
mod stores;
mod types;

pub use client::SupabaseClient;
pub use error::SupabaseError;
pub use types::*;
