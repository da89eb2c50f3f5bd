//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string is not an acceptable email address.
#[derive(thiserror::Error, Debug, Clone)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    #[error("email domain cannot be empty")]
    EmptyDomain,
    #[error("email domain must contain a top-level domain")]
    MissingTld,
}

/// A validated email address.
///
/// Account and checkout forms accept an address only once it parses into
/// this type, so everything downstream (identity calls, order snapshots,
/// feedback records) can carry the string without re-checking it. The
/// check is structural, not a deliverability test: one `@` with a
/// non-empty local part, and a domain with a dot-separated top-level
/// domain. Whitespace anywhere is rejected rather than silently trimmed;
/// trimming is the form's job.
///
/// ```
/// use medimart_core::Email;
///
/// assert!(Email::parse("asha@clinic.example.in").is_ok());
/// assert!(Email::parse("asha@clinic").is_err()); // no top-level domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 length ceiling.
    pub const MAX_LENGTH: usize = 254;

    /// Parse and validate an address.
    ///
    /// # Errors
    ///
    /// Returns the first structural rule the input breaks: emptiness,
    /// length, whitespace, the `@` split, or the missing top-level domain.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) if !host.is_empty() && !tld.is_empty() => {}
            _ => return Err(EmailError::MissingTld),
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
