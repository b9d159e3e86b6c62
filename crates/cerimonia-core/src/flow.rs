//! Attendee-facing registration flow for a single event.
//!
//! ```text
//! Idle -> Checking -> Found    -> Registering -> Registered | Failed
//!                  -> NotFound -> (signup handoff)
//! ```
//!
//! Every CPF edit bumps a sequence number. Lookups carry the number they were issued
//! under, and [`RegistrationFlow::apply`] drops results from any earlier edit, so the
//! state always reflects the latest input regardless of completion order.

use crate::clipboard::Clipboard;
use crate::cpf::{self, Cpf};
use crate::error::FlowError;
use crate::optin::OptinService;
use crate::resolver::{Existence, ExistenceResolver, LookupResult, LookupTicket};
use crate::store::Stores;
use crate::types::{Event, Notice};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// No complete CPF entered.
    Idle,
    /// Existence lookup in flight.
    Checking { cpf: Cpf },
    Found { cpf: Cpf },
    NotFound { cpf: Cpf },
    Registering { cpf: Cpf },
    Registered { cpf: Cpf, notice: Notice },
    Failed { cpf: Cpf, message: String },
}

/// Action offered by the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Register,
    SignUp,
}

pub struct RegistrationFlow {
    event: Event,
    display: String,
    state: FlowState,
    seq: u64,
    resolver: ExistenceResolver,
    optins: OptinService,
}

impl RegistrationFlow {
    pub fn new(event: Event, stores: &Stores) -> Self {
        Self {
            event,
            display: String::new(),
            state: FlowState::Idle,
            seq: 0,
            resolver: ExistenceResolver::new(stores.attendees.clone()),
            optins: OptinService::new(stores.attendees.clone(), stores.optins.clone()),
        }
    }

    /// Start a flow for a stored event.
    pub async fn load(event_id: &str, stores: &Stores) -> Result<Self, FlowError> {
        match stores.events.find_by_id(event_id).await? {
            Some(event) => Ok(Self::new(event, stores)),
            None => Err(FlowError::EventNotFound(event_id.to_string())),
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Current contents of the CPF field, formatted for display.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn resolver(&self) -> &ExistenceResolver {
        &self.resolver
    }

    /// Record an edit of the CPF field.
    ///
    /// Returns a ticket when the edit completes a CPF and a lookup must run. Any edit
    /// supersedes lookups issued before it.
    pub fn input(&mut self, raw: &str) -> Option<LookupTicket> {
        self.display = cpf::format(raw);
        self.seq += 1;

        if cpf::should_lookup(&self.display) {
            if let Ok(cpf) = Cpf::parse(&self.display) {
                self.state = FlowState::Checking { cpf: cpf.clone() };
                return Some(LookupTicket { seq: self.seq, cpf });
            }
        }

        self.state = FlowState::Idle;
        None
    }

    /// Apply a completed lookup. Returns false when the result was stale and dropped.
    pub fn apply(&mut self, result: LookupResult) -> bool {
        let current = matches!(
            &self.state,
            FlowState::Checking { cpf } if *cpf == result.ticket.cpf
        );
        if result.ticket.seq != self.seq || !current {
            debug!(
                ticket = result.ticket.seq,
                current = self.seq,
                "Discarding stale CPF lookup"
            );
            return false;
        }

        let cpf = result.ticket.cpf;
        self.state = match result.existence {
            Existence::Found => FlowState::Found { cpf },
            Existence::NotFound => FlowState::NotFound { cpf },
            Existence::Unknown => FlowState::Idle,
        };
        true
    }

    /// Edit the CPF field and, if complete, look it up.
    pub async fn enter_cpf(&mut self, raw: &str) -> &FlowState {
        if let Some(ticket) = self.input(raw) {
            let result = self.resolver.resolve(ticket).await;
            self.apply(result);
        }
        &self.state
    }

    /// Opt the found attendee into the event.
    ///
    /// Store failures end in [`FlowState::Failed`] carrying the error message; only a call
    /// from a state other than `Found` is returned as an error.
    pub async fn register(&mut self) -> Result<&FlowState, FlowError> {
        let cpf = match &self.state {
            FlowState::Found { cpf } => cpf.clone(),
            _ => {
                return Err(FlowError::InvalidTransition(
                    "inscrição requer um participante encontrado",
                ))
            }
        };

        self.state = FlowState::Registering { cpf: cpf.clone() };

        self.state = match self.optins.register(&self.event.id, &cpf).await {
            Ok(outcome) => {
                info!(event_id = %self.event.id, notice = ?outcome.notice(), "Registration finished");
                FlowState::Registered {
                    cpf,
                    notice: outcome.notice(),
                }
            }
            Err(e) => {
                warn!(event_id = %self.event.id, error = %e, "Registration failed");
                FlowState::Failed {
                    cpf,
                    message: e.to_string(),
                }
            }
        };

        Ok(&self.state)
    }

    /// CPF to hand to the signup collaborator when the attendee is unknown.
    pub fn signup_handoff(&self) -> Option<&Cpf> {
        match &self.state {
            FlowState::NotFound { cpf } => Some(cpf),
            _ => None,
        }
    }

    pub fn primary_action(&self) -> Option<PrimaryAction> {
        match self.state {
            FlowState::Found { .. } => Some(PrimaryAction::Register),
            FlowState::NotFound { .. } => Some(PrimaryAction::SignUp),
            _ => None,
        }
    }

    /// PIX key shown on the confirmation panel.
    pub fn payment_key(&self) -> Option<&str> {
        match self.state {
            FlowState::Registered { .. } => self.event.pix_key.as_deref(),
            _ => None,
        }
    }

    /// Copy the PIX key. Clipboard failures are reported as a notice, never as an error.
    pub async fn copy_payment_key(&self, clipboard: &dyn Clipboard) -> Option<Notice> {
        let key = self.payment_key()?;
        match clipboard.write_text(key).await {
            Ok(()) => Some(Notice::PaymentKeyCopied),
            Err(e) => {
                warn!(error = %e, "Failed to copy PIX key");
                Some(Notice::CopyFailed)
            }
        }
    }
}
