//! Error types for the registration flow and its backing stores.

use thiserror::Error;

/// Failure reported by a backing store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Registro duplicado: {0}")]
    Conflict(String),

    /// The backend was unreachable or answered with an error. The message is kept verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Clipboard write failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Errors raised by the registration and signup services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("CPF deve ter 11 dígitos (recebido {0})")]
    InvalidCpf(usize),

    #[error("Nome deve ter pelo menos 3 caracteres")]
    InvalidName,

    #[error("E-mail inválido: {0}")]
    InvalidEmail(String),

    #[error("Evento não encontrado: {0}")]
    EventNotFound(String),

    /// The attendee disappeared between the existence check and the opt-in.
    #[error("Participante não encontrado")]
    AttendeeNotFound,

    #[error("Este CPF já está cadastrado")]
    CpfAlreadyRegistered,

    #[error("Operação inválida: {0}")]
    InvalidTransition(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = FlowError::from(StoreError::Backend("connection reset".into()));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_conflict_message() {
        let err = StoreError::Conflict("duplicate key".into());
        assert_eq!(err.to_string(), "Registro duplicado: duplicate key");
    }

    #[test]
    fn test_transition_message() {
        let err = FlowError::InvalidTransition("inscrição requer um participante encontrado");
        assert_eq!(
            err.to_string(),
            "Operação inválida: inscrição requer um participante encontrado"
        );
    }
}
