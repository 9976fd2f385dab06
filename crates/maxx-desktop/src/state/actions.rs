use maxx_account::service::profile::ProfileOrigin;
use maxx_account::{AppError, FieldKey, ProfileRecord};

/// Messages sent from background tasks to the UI thread via mpsc.
#[derive(Debug)]
pub enum AppMessage {
    // Backend
    HealthChecked(bool),

    // Auth / Session
    LoginSucceeded { token: String },
    LoginFailed(String),
    Registered,
    RegistrationFailed(String),

    // Profile
    ProfileLoaded {
        record: ProfileRecord,
        origin: ProfileOrigin,
    },
    ProfileSaved {
        key: FieldKey,
        result: Result<(), AppError>,
    },
    PasswordChanged(Result<(), AppError>),
}
