//! Email Address Value Object
//!
//! Borrowers are identified by email (loan limits, analytics grouping), so
//! the address is normalized once at the boundary: trimmed, lowercased, and
//! format-checked. Everything downstream can compare addresses directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeweyError, DeweyResult};

/// A validated, normalized email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize an address.
    ///
    /// Accepts `local@domain` where the local part is non-empty, the domain
    /// contains a dot, and nothing contains whitespace. This is the same
    /// pragmatic check the rest of the backend applies before handing
    /// addresses to the mailer; full RFC 5321 parsing is the mailer's job.
    pub fn parse(raw: &str) -> DeweyResult<Self> {
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(DeweyError::validation("borrower_email", "must not be empty"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DeweyError::validation(
                "borrower_email",
                "must not contain whitespace",
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DeweyError::validation("borrower_email", "missing '@'"));
        };
        if local.is_empty() {
            return Err(DeweyError::validation(
                "borrower_email",
                "missing local part before '@'",
            ));
        }
        if domain.contains('@') {
            return Err(DeweyError::validation(
                "borrower_email",
                "more than one '@'",
            ));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(DeweyError::validation(
                "borrower_email",
                format!("invalid domain '{domain}'"),
            ));
        }

        Ok(Self(normalized))
    }

    /// The normalized address
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
