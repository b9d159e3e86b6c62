//! CPF-gated attendee registration and event opt-in.
//!
//! Attendees identify themselves by CPF. A complete CPF is looked up in the attendee
//! store; known attendees can opt into an event (once per event), unknown ones are
//! handed off to signup. Persistence is delegated to the store traits in [`store`].

pub mod clipboard;
pub mod cpf;
pub mod error;
pub mod flow;
pub mod optin;
pub mod resolver;
pub mod signup;
pub mod store;
pub mod types;

pub use clipboard::Clipboard;
pub use cpf::Cpf;
pub use error::{ClipboardError, FlowError, StoreError};
pub use flow::{FlowState, PrimaryAction, RegistrationFlow};
pub use optin::{OptinService, RegistrationOutcome};
pub use resolver::{Existence, ExistenceResolver, LookupResult, LookupTicket};
pub use signup::SignupService;
pub use store::{AttendeeStore, EventStore, MemoryStore, OptinStore, Stores};
pub use types::{Attendee, Event, EventOptin, NewAttendee, Notice};
