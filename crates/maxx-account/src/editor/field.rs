use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix of the cache keys that mirror profile values.
pub const CACHE_PREFIX: &str = "profile_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Name,
    Email,
    Location,
    About,
    Skills,
}

/// Which validation rule and input widget a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultiLine,
    Email,
}

impl FieldKey {
    pub const ALL: [FieldKey; 5] = [
        FieldKey::Name,
        FieldKey::Email,
        FieldKey::Location,
        FieldKey::About,
        FieldKey::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Location => "location",
            Self::About => "about",
            Self::Skills => "skills",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Location => "Location",
            Self::About => "About",
            Self::Skills => "Skills",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Name | Self::Location => FieldKind::Text,
            Self::About | Self::Skills => FieldKind::MultiLine,
            Self::Email => FieldKind::Email,
        }
    }

    /// Key under which the last known value lives in the local cache.
    pub fn cache_key(&self) -> String {
        format!("{CACHE_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Display,
    Editing,
}

#[derive(Debug, Clone)]
pub struct Field {
    key: FieldKey,
    pub(crate) displayed_value: String,
    pub(crate) edit_buffer: String,
    pub(crate) state: FieldState,
}

impl Field {
    pub fn new(key: FieldKey, displayed_value: impl Into<String>) -> Self {
        Self {
            key,
            displayed_value: displayed_value.into(),
            edit_buffer: String::new(),
            state: FieldState::Display,
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn displayed_value(&self) -> &str {
        &self.displayed_value
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == FieldState::Editing
    }
}

/// Exists only while one field is being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub field: FieldKey,
    pub original_value: String,
    /// Value sent to the backend and not yet answered.
    pub pending: Option<String>,
}

impl EditSession {
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }
}
