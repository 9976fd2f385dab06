pub mod actions;
pub mod types;

use std::sync::Arc;

use tokio::sync::mpsc;

use maxx_account::service::profile::ProfileOrigin;
use maxx_account::{
    ApiSettings, AppError, FieldEditor, FieldKey, GateDecision, HttpClient, LocalStorage, Notice,
    PasswordChangeForm, RemoteProfileService, SessionGate, ToastLevel, Toasts, TokenManager,
};
use actions::AppMessage;
use types::*;

pub struct AppState {
    // Navigation
    pub current_page: Page,

    // Session
    pub token: Option<String>,

    // Forms
    pub login: LoginForm,
    pub register: RegisterForm,
    pub password: PasswordChangeForm,

    // Profile
    pub editor: FieldEditor,
    pub profile_form: ProfileForm,
    pub profile_status: LoadStatus,

    // Notifications
    pub toasts: Toasts,

    // Dialogs
    pub confirm_logout: bool,

    // Backend
    pub backend_online: Option<bool>,

    // Infra
    pub settings: ApiSettings,
    pub http_client: HttpClient,
    pub profile_service: RemoteProfileService,
    pub storage: Arc<LocalStorage>,
    pub tx: mpsc::UnboundedSender<AppMessage>,
}

impl AppState {
    pub fn new(
        settings: ApiSettings,
        storage: LocalStorage,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> Result<Self, AppError> {
        let http_client = HttpClient::new(&settings)?;
        let profile_service =
            RemoteProfileService::new(http_client.clone(), settings.endpoints.clone());

        let (current_page, token) = match SessionGate::check(&storage) {
            GateDecision::Authenticated(token) => (Page::Profile, Some(token)),
            GateDecision::RedirectToLogin => (Page::Login, None),
        };

        Ok(Self {
            current_page,
            token,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            password: PasswordChangeForm::new(),
            editor: FieldEditor::default(),
            profile_form: ProfileForm::default(),
            profile_status: LoadStatus::Idle,
            toasts: Toasts::new(),
            confirm_logout: false,
            backend_online: None,
            settings,
            http_client,
            profile_service,
            storage: Arc::new(storage),
            tx,
        })
    }

    pub fn navigate(&mut self, page: Page) {
        if page == Page::Profile && self.token.is_none() {
            self.current_page = Page::Login;
            return;
        }
        self.current_page = page;
    }

    pub fn add_toast(&mut self, level: ToastLevel, text: String) {
        self.toasts.push(Notice { level, text });
    }

    pub fn notify(&mut self, notice: Notice) {
        self.toasts.push(notice);
    }

    pub fn clear_expired_toasts(&mut self) {
        self.toasts.clear_expired();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn begin_edit(&mut self, key: FieldKey) {
        match self.editor.begin_edit(key) {
            Ok(()) => {
                let seed = self
                    .editor
                    .field(key)
                    .map(|f| f.edit_buffer().to_string())
                    .unwrap_or_default();
                self.profile_form.open(key, &seed);
            }
            Err(e) => self.add_toast(ToastLevel::Warning, e.to_string()),
        }
    }

    pub fn cancel_edit(&mut self, key: FieldKey) {
        match self.editor.cancel_edit(key) {
            Ok(()) => self.profile_form.close(),
            Err(e) => self.add_toast(ToastLevel::Warning, e.to_string()),
        }
    }

    pub fn logout(&mut self) {
        self.end_session();
        self.add_toast(ToastLevel::Info, "Logged out".into());
    }

    /// Drops the stored token and every piece of per-user state, then goes
    /// back to the login page.
    fn end_session(&mut self) {
        if let Err(e) = TokenManager::new(self.storage.as_ref()).remove_token() {
            tracing::warn!(error = %e, "Failed to remove stored token");
        }
        self.token = None;
        self.editor = FieldEditor::default();
        self.profile_form = ProfileForm::default();
        self.profile_status = LoadStatus::Idle;
        self.password = PasswordChangeForm::new();
        self.confirm_logout = false;
        self.current_page = Page::Login;
    }

    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::HealthChecked(online) => {
                self.backend_online = Some(online);
                if !online {
                    let text = match self.current_page {
                        Page::Profile => "Backend is not reachable. Showing cached profile data.",
                        Page::Login | Page::Register => {
                            "Backend is not reachable. Login and registration may fail."
                        }
                    };
                    self.add_toast(ToastLevel::Warning, text.into());
                }
            }

            AppMessage::LoginSucceeded { token } => {
                if let Err(e) = TokenManager::new(self.storage.as_ref()).set_token(&token) {
                    tracing::warn!(error = %e, "Failed to persist session token");
                }
                self.token = Some(token);
                self.login = LoginForm::default();
                self.profile_status = LoadStatus::Idle;
                self.current_page = Page::Profile;
                self.add_toast(ToastLevel::Success, "Login successful!".into());
            }

            AppMessage::LoginFailed(message) => {
                self.login.submitting = false;
                self.login.error = Some(message.clone());
                self.add_toast(ToastLevel::Error, message);
            }

            AppMessage::Registered => {
                self.register = RegisterForm::default();
                self.current_page = Page::Login;
                self.add_toast(
                    ToastLevel::Success,
                    "Registration successful! Please login.".into(),
                );
            }

            AppMessage::RegistrationFailed(message) => {
                self.register.submitting = false;
                self.register.error = Some(message.clone());
                self.add_toast(ToastLevel::Error, message);
            }

            AppMessage::ProfileLoaded { record, origin } => {
                self.editor.load(&record);
                self.profile_status = LoadStatus::Loaded;
                if origin == ProfileOrigin::Cache {
                    tracing::info!("Profile shown from local cache");
                }
            }

            AppMessage::ProfileSaved { key, result } => {
                let expired = match &result {
                    Err(e @ AppError::SessionExpired(_)) => Some(e.to_string()),
                    _ => None,
                };
                match self.editor.finish_commit(key, result, self.storage.as_ref()) {
                    Ok(notice) => {
                        self.profile_form.close();
                        if expired.is_none() {
                            self.notify(notice);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Save result arrived for no pending save"),
                }
                if let Some(text) = expired {
                    tracing::info!("Session expired while saving, returning to login");
                    self.end_session();
                    self.add_toast(ToastLevel::Error, text);
                }
            }

            AppMessage::PasswordChanged(result) => {
                let notice = self.password.finish_submit(result);
                self.notify(notice);
            }
        }
    }
}
