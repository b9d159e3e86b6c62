//! Attendees, events and opt-ins.

use crate::cpf::Cpf;
use crate::error::FlowError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of an attendee's full name after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// A person who can opt into events, keyed by CPF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: String,
    pub cpf: Cpf,
    pub full_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated signup form for a new attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAttendee {
    pub cpf: Cpf,
    pub full_name: String,
    pub email: Option<String>,
}

impl NewAttendee {
    /// Validate raw form input.
    pub fn new(cpf: &str, full_name: &str, email: Option<&str>) -> Result<Self, FlowError> {
        let cpf = Cpf::parse(cpf)?;

        let full_name = full_name.trim();
        if full_name.chars().count() < MIN_NAME_LEN {
            return Err(FlowError::InvalidName);
        }

        let email = match email.map(str::trim) {
            None | Some("") => None,
            Some(e) if looks_like_email(e) => Some(e.to_string()),
            Some(e) => return Err(FlowError::InvalidEmail(e.to_string())),
        };

        Ok(Self {
            cpf,
            full_name: full_name.to_string(),
            email,
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !host.contains('@'))
            .unwrap_or(false)
}

/// A ceremony attendees can opt into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub location: String,
    pub datetime: DateTime<Utc>,
    /// PIX key shown to attendees for manual payment
    #[serde(default)]
    pub pix_key: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-text guest list kept by the organizer
    #[serde(default)]
    pub guests: Option<String>,
    /// Owning organizer
    #[serde(default)]
    pub admin_id: Option<String>,
}

/// An attendee's registration for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOptin {
    pub event_id: String,
    pub attendee_id: String,
    pub created_at: DateTime<Utc>,
}

impl EventOptin {
    pub fn new(event_id: impl Into<String>, attendee_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            attendee_id: attendee_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// User-facing outcome messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    RegistrationComplete,
    AlreadyRegistered,
    PaymentKeyCopied,
    CopyFailed,
    SignupComplete,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::RegistrationComplete => "Inscrição realizada com sucesso!",
            Notice::AlreadyRegistered => "Você já está inscrito neste evento!",
            Notice::PaymentKeyCopied => "Chave PIX copiada!",
            Notice::CopyFailed => "Erro ao copiar chave PIX",
            Notice::SignupComplete => "Cadastro realizado com sucesso!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attendee_trims_fields() {
        let a = NewAttendee::new("111.444.777-35", "  Maria Silva ", Some(" maria@example.com "))
            .unwrap();
        assert_eq!(a.cpf.as_str(), "11144477735");
        assert_eq!(a.full_name, "Maria Silva");
        assert_eq!(a.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn test_new_attendee_blank_email_is_absent() {
        let a = NewAttendee::new("11144477735", "Ana", Some("   ")).unwrap();
        assert!(a.email.is_none());
        let a = NewAttendee::new("11144477735", "Ana", None).unwrap();
        assert!(a.email.is_none());
    }

    #[test]
    fn test_new_attendee_rejects_bad_input() {
        assert_eq!(
            NewAttendee::new("1114447773", "Maria", None),
            Err(FlowError::InvalidCpf(10))
        );
        assert_eq!(
            NewAttendee::new("11144477735", " Al ", None),
            Err(FlowError::InvalidName)
        );
        assert!(matches!(
            NewAttendee::new("11144477735", "Maria", Some("maria@")),
            Err(FlowError::InvalidEmail(_))
        ));
        assert!(matches!(
            NewAttendee::new("11144477735", "Maria", Some("maria example.com")),
            Err(FlowError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_event_deserialization_defaults() {
        let json = r#"{
            "id": "evt-1",
            "name": "Cerimônia da Lua",
            "location": "Alto Paraíso",
            "datetime": "2026-11-01T20:00:00Z"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.name, "Cerimônia da Lua");
        assert!(event.pix_key.is_none());
        assert!(event.admin_id.is_none());
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_string(&Notice::AlreadyRegistered).unwrap();
        assert_eq!(json, "\"already_registered\"");
    }
}
