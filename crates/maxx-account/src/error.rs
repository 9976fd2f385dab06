use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    // Network
    ServerUnreachable,
    Timeout,
    RateLimited { retry_after: Duration },
    NonJsonResponse(u16),

    // Auth
    NotAuthenticated,
    InvalidCredentials,
    // Carry the message the server sent with the rejection, if any.
    SessionExpired(Option<String>),
    Forbidden(Option<String>),

    // Validation
    InvalidInput(String),

    // Server
    ServerError(u16, String),
    Rejected(String),
    MissingToken,

    // Local
    StorageError(String),
}

impl AppError {
    /// True for failures that never reached the backend or never got a usable
    /// answer from it.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ServerUnreachable | Self::Timeout | Self::NonJsonResponse(_)
        )
    }

    /// The explanation the backend put in an error body, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerError(_, msg) | Self::Rejected(msg) => Some(msg.as_str()),
            Self::SessionExpired(msg) | Self::Forbidden(msg) => msg.as_deref(),
            _ => None,
        }
        .filter(|msg| !msg.is_empty())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerUnreachable => write!(f, "Cannot connect to server. Please check your internet connection and backend status."),
            Self::Timeout => write!(f, "Request timed out. Please check your connection and try again."),
            Self::RateLimited { retry_after } => write!(f, "Too many requests. Please wait {} seconds.", retry_after.as_secs()),
            Self::NonJsonResponse(status) => write!(f, "Server returned non-JSON response. Status: {status}"),
            Self::NotAuthenticated => write!(f, "No authentication token found"),
            Self::InvalidCredentials => write!(f, "Invalid username or password. Please check your credentials."),
            Self::SessionExpired(_) => write!(f, "Your session has expired. Please log in again."),
            Self::Forbidden(_) => write!(f, "Access denied. Please contact your administrator."),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
            Self::ServerError(code, msg) => write!(f, "Server error ({code}): {msg}"),
            Self::Rejected(msg) => write!(f, "{msg}"),
            Self::MissingToken => write!(f, "Login failed. Invalid response from server."),
            Self::StorageError(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ServerUnreachable
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 => Self::SessionExpired(None),
                403 => Self::Forbidden(None),
                429 => Self::RateLimited {
                    retry_after: Duration::from_secs(30),
                },
                code => Self::ServerError(code, err.to_string()),
            }
        } else {
            Self::ServerUnreachable
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
