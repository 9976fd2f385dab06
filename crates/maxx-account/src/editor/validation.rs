//! Per-field input rules.
//!
//! Text and multi-line fields refuse `@` both while typing and at commit
//! time. The email field must look like `local@domain.tld`; it is checked live
//! so the input can be marked invalid, and commit is refused while it is.

use std::sync::LazyLock;

use regex::Regex;

use super::field::FieldKind;
use crate::error::AppError;

pub const AT_SIGN_NOTICE: &str = "The @ symbol is not allowed here.";
pub const INVALID_EMAIL_NOTICE: &str = "Please enter a valid email address.";

static PROFILE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("static pattern"));

// Registration additionally forbids whitespace anywhere in the address.
static REGISTRATION_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));

pub fn is_valid_email(value: &str) -> bool {
    PROFILE_EMAIL.is_match(value)
}

pub fn is_valid_registration_email(value: &str) -> bool {
    REGISTRATION_EMAIL.is_match(value)
}

/// Commit-time rule for a field of the given kind.
pub fn validate(kind: FieldKind, value: &str) -> Result<(), AppError> {
    match kind {
        FieldKind::Text | FieldKind::MultiLine if value.contains('@') => {
            Err(AppError::InvalidInput(AT_SIGN_NOTICE.into()))
        }
        FieldKind::Email if !is_valid_email(value) => {
            Err(AppError::InvalidInput(INVALID_EMAIL_NOTICE.into()))
        }
        _ => Ok(()),
    }
}

/// Keystroke rule: a single typed character is refused before it reaches the
/// buffer.
pub fn check_keystroke(kind: FieldKind, ch: char) -> Result<(), AppError> {
    match kind {
        FieldKind::Text | FieldKind::MultiLine if ch == '@' => {
            Err(AppError::InvalidInput(AT_SIGN_NOTICE.into()))
        }
        _ => Ok(()),
    }
}

/// Live feedback while typing. Returns the notice to attach to the input, or
/// `None` when the current buffer is acceptable.
pub fn live_check(kind: FieldKind, buffer: &str) -> Option<&'static str> {
    match kind {
        FieldKind::Email if !is_valid_email(buffer) => Some(INVALID_EMAIL_NOTICE),
        _ => None,
    }
}

/// For UI layers that only see the buffer after the edit landed: drops every
/// refused character and reports whether anything was dropped.
pub fn strip_refused(kind: FieldKind, buffer: &mut String) -> bool {
    let before = buffer.len();
    buffer.retain(|ch| check_keystroke(kind, ch).is_ok());
    buffer.len() != before
}
