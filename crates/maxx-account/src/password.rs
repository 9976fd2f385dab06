use crate::error::AppError;
use crate::notify::Notice;
use crate::service::auth::MIN_PASSWORD_LEN;
use crate::service::profile::ProfileService;

pub const CHANGED_NOTICE: &str = "Password changed successfully!";
pub const FALLBACK_NOTICE: &str = "Failed to change password. Please try again.";

/// Old/new pair captured when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// State of the change-password form. Inputs survive a failed attempt so the
/// user can correct them; they are cleared only on success.
#[derive(Debug, Default, Clone)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password: String,
    submitting: bool,
}

impl PasswordChangeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// False while a request is outstanding; the submit control follows it.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.old_password.is_empty() || self.new_password.is_empty() {
            return Err(AppError::InvalidInput("Please fill in all fields".into()));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "New password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }

    /// Validates and disables the form. A refused submission returns the
    /// notice to show and leaves the form enabled.
    pub fn begin_submit(&mut self) -> Result<PasswordChange, Notice> {
        if self.submitting {
            return Err(Notice::warning("Password change already in progress"));
        }
        self.validate().map_err(|e| Notice::error(e.to_string()))?;

        self.submitting = true;
        Ok(PasswordChange {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        })
    }

    /// Re-enables the form and reports the outcome.
    pub fn finish_submit(&mut self, result: Result<(), AppError>) -> Notice {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.old_password.clear();
                self.new_password.clear();
                tracing::info!("Password changed");
                Notice::success(CHANGED_NOTICE)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Password change failed");
                Notice::error(failure_message(&e))
            }
        }
    }

    pub async fn submit(&mut self, service: &dyn ProfileService, token: Option<&str>) -> Notice {
        let change = match self.begin_submit() {
            Ok(change) => change,
            Err(notice) => return notice,
        };
        let result = match token {
            Some(token) => {
                service
                    .change_password(&change.old_password, &change.new_password, token)
                    .await
            }
            None => Err(AppError::NotAuthenticated),
        };
        self.finish_submit(result)
    }
}

/// What the server said, whatever the status; transport failures describe
/// themselves.
fn failure_message(err: &AppError) -> String {
    match err.server_message() {
        Some(msg) => msg.to_string(),
        None if err.is_transport() => err.to_string(),
        None => FALLBACK_NOTICE.to_string(),
    }
}
