use serde::Serialize;

use crate::config::Endpoints;
use crate::editor::validation;
use crate::error::AppError;
use crate::infra::http_client::HttpClient;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize, Debug, Clone)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub employee_id: String,
}

impl Registration {
    /// Local checks made before anything is sent.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            &self.username,
            &self.email,
            &self.password,
            &self.name,
            &self.employee_id,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(AppError::InvalidInput("Please fill in all fields".into()));
        }
        if !validation::is_valid_registration_email(&self.email) {
            return Err(AppError::InvalidInput(
                "Please enter a valid email address".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }
}

pub async fn health(client: &HttpClient, endpoints: &Endpoints) -> Result<(), AppError> {
    let _: serde_json::Value = client.get(&endpoints.health).await?;
    Ok(())
}

/// Logs in and returns the bearer token found in the response.
pub async fn login(
    client: &HttpClient,
    endpoints: &Endpoints,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput("Please fill in all fields".into()));
    }

    tracing::info!(%username, "Attempting login");
    let body = LoginBody { username, password };
    let resp: serde_json::Value = client
        .post(&endpoints.login, &body)
        .await
        .map_err(|e| match e {
            AppError::SessionExpired(_) => AppError::InvalidCredentials,
            other => other,
        })?;

    extract_token(&resp).ok_or_else(|| {
        tracing::warn!("No token found in login response");
        AppError::MissingToken
    })
}

pub async fn register(
    client: &HttpClient,
    endpoints: &Endpoints,
    registration: &Registration,
) -> Result<(), AppError> {
    registration.validate()?;

    tracing::info!(username = %registration.username, "Attempting registration");
    let resp: serde_json::Value = client.post(&endpoints.register, registration).await?;

    let acknowledged = resp.get("message").is_some_and(|m| !m.is_null())
        || resp.get("success").and_then(|s| s.as_bool()).unwrap_or(false);
    if acknowledged {
        Ok(())
    } else {
        Err(AppError::Rejected(
            "Registration failed. Please try again.".into(),
        ))
    }
}

/// Backends disagree on where the token lives; the first match wins.
pub fn extract_token(resp: &serde_json::Value) -> Option<String> {
    let candidates = [
        resp.get("token"),
        resp.get("data").and_then(|d| d.get("token")),
        resp.get("access_token"),
        resp.get("jwt"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Message shown on the login form for a failed attempt.
pub fn login_error_message(err: &AppError) -> String {
    match err {
        AppError::Timeout => {
            "Login request timed out. Please check your connection and try again.".into()
        }
        AppError::NonJsonResponse(_) => {
            "Server is not responding properly. Please check if your backend is running.".into()
        }
        AppError::InvalidCredentials | AppError::SessionExpired(_) => {
            "Invalid username or password. Please check your credentials.".into()
        }
        AppError::ServerError(_, msg) | AppError::Rejected(msg) | AppError::InvalidInput(msg) => {
            msg.clone()
        }
        other => other.to_string(),
    }
}

/// Message shown on the registration form for a failed attempt.
pub fn registration_error_message(err: &AppError) -> String {
    match err {
        AppError::NonJsonResponse(_) => {
            "Server is not responding properly. Please check if your backend is running.".into()
        }
        AppError::ServerError(_, msg) if msg.contains("Username") => {
            "Username may already be taken. Please try a different username.".into()
        }
        AppError::ServerError(_, msg) | AppError::Rejected(msg) | AppError::InvalidInput(msg) => {
            msg.clone()
        }
        other => other.to_string(),
    }
}
