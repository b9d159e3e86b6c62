//! Cerimonia registration server.
//!
//! Serves the attendee-facing flow to the PWA:
//! - CPF existence checks that route unknown attendees to signup
//! - Attendee signup, one record per CPF
//! - Event opt-in, at most once per attendee and event, returning the PIX key

pub mod api;
pub mod backend;
pub mod config;
pub mod error;

pub use backend::Backend;
pub use config::Config;
pub use error::ApiError;
