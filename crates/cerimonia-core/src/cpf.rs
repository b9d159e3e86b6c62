//! CPF normalization, display formatting and length validation.
//!
//! Validation only counts digits. No check-digit verification is performed, so any
//! eleven digits are accepted as a CPF.

use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a canonical CPF.
pub const CPF_DIGITS: usize = 11;

/// Length of the display form `XXX.XXX.XXX-XX`.
pub const FORMATTED_LEN: usize = 14;

/// Strip every non-digit character.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render the display form of a CPF.
///
/// Punctuation is inserted only once at least eleven digits are present; the first
/// eleven digits are grouped as `XXX.XXX.XXX-XX` and any surplus digits are kept after
/// the suffix. Shorter inputs come back as bare digits.
pub fn format(raw: &str) -> String {
    let digits = normalize(raw);
    if digits.len() < CPF_DIGITS {
        return digits;
    }

    let (head, rest) = digits.split_at(CPF_DIGITS);
    format!(
        "{}.{}.{}-{}{}",
        &head[0..3],
        &head[3..6],
        &head[6..9],
        &head[9..11],
        rest
    )
}

/// True iff the input carries exactly eleven digits.
pub fn is_valid(raw: &str) -> bool {
    normalize(raw).len() == CPF_DIGITS
}

/// True once the display string is complete and a lookup should be issued.
pub fn should_lookup(display: &str) -> bool {
    display.chars().count() == FORMATTED_LEN
}

/// Canonical CPF: exactly eleven ASCII digits, no punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Parse free-text input into a canonical CPF.
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        let digits = normalize(raw);
        if digits.len() != CPF_DIGITS {
            return Err(FlowError::InvalidCpf(digits.len()));
        }
        Ok(Self(digits))
    }

    /// The canonical digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The punctuated display form.
    pub fn formatted(&self) -> String {
        format(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Cpf {
    type Error = FlowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpf::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}
