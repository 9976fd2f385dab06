//! Client core for MAXX accounts.
//!
//! Holds everything the account UI needs that is not drawing: the backend
//! client and its routes, the local cache, the session gate, the inline
//! profile-field editor and the password-change flow.

pub mod config;
pub mod editor;
pub mod error;
pub mod infra;
pub mod notify;
pub mod password;
pub mod service;
pub mod session;

pub use config::ApiSettings;
pub use editor::field::{FieldKey, FieldKind, FieldState};
pub use editor::{CommitOutcome, CommitStep, EditorError, FieldEditor, FieldView};
pub use error::{AppError, Result};
pub use infra::http_client::HttpClient;
pub use infra::local_storage::{LocalCache, LocalStorage, MemoryCache};
pub use notify::{Notice, ToastLevel, Toasts};
pub use password::PasswordChangeForm;
pub use service::profile::{ProfileRecord, ProfileService, ProfileUpdate, RemoteProfileService};
pub use session::{GateDecision, SessionGate, TokenManager};
