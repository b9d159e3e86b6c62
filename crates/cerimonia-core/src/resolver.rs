//! CPF existence lookups.

use crate::cpf::{self, Cpf};
use crate::store::AttendeeStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Outcome of an existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Existence {
    /// Input is not a complete CPF; no lookup was made.
    Unknown,
    Found,
    NotFound,
}

/// A lookup requested by the registration flow, tagged with the input sequence number
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub(crate) seq: u64,
    pub(crate) cpf: Cpf,
}

impl LookupTicket {
    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }
}

/// A completed lookup, still tagged with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub ticket: LookupTicket,
    pub existence: Existence,
}

/// Resolves whether an attendee exists for a CPF.
///
/// Lookup failures resolve to [`Existence::NotFound`] so that the attendee is routed to
/// signup; a resulting duplicate signup is rejected later by the store.
#[derive(Clone)]
pub struct ExistenceResolver {
    attendees: Arc<dyn AttendeeStore>,
}

impl ExistenceResolver {
    pub fn new(attendees: Arc<dyn AttendeeStore>) -> Self {
        Self { attendees }
    }

    /// Check raw user input.
    pub async fn check(&self, raw: &str) -> Existence {
        match Cpf::parse(raw) {
            Ok(cpf) => self.lookup(&cpf).await,
            Err(_) => {
                debug!(digits = cpf::normalize(raw).len(), "Incomplete CPF, skipping lookup");
                Existence::Unknown
            }
        }
    }

    /// Run the lookup for a flow ticket.
    pub async fn resolve(&self, ticket: LookupTicket) -> LookupResult {
        let existence = self.lookup(&ticket.cpf).await;
        LookupResult { ticket, existence }
    }

    #[instrument(skip_all, fields(cpf = %cpf))]
    async fn lookup(&self, cpf: &Cpf) -> Existence {
        match self.attendees.find_by_cpf(cpf).await {
            Ok(Some(_)) => Existence::Found,
            Ok(None) => Existence::NotFound,
            Err(e) => {
                warn!(error = %e, "CPF lookup failed, routing to signup");
                Existence::NotFound
            }
        }
    }
}
