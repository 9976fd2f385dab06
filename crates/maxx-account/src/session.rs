use crate::error::AppError;
use crate::infra::local_storage::LocalCache;

/// Cache key holding the bearer token between runs.
pub const TOKEN_KEY: &str = "maxx_energy_token";

/// Token persistence on top of the local cache.
pub struct TokenManager<'a> {
    cache: &'a dyn LocalCache,
}

impl<'a> TokenManager<'a> {
    pub fn new(cache: &'a dyn LocalCache) -> Self {
        Self { cache }
    }

    pub fn token(&self) -> Option<String> {
        self.cache.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.cache.set(TOKEN_KEY, token)
    }

    pub fn remove_token(&self) -> Result<(), AppError> {
        self.cache.remove(TOKEN_KEY)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Authenticated(String),
    RedirectToLogin,
}

/// Decides on start-up whether the profile page may be shown.
pub struct SessionGate;

impl SessionGate {
    pub fn check(cache: &dyn LocalCache) -> GateDecision {
        match TokenManager::new(cache).token() {
            Some(token) => GateDecision::Authenticated(token),
            None => {
                tracing::info!("No session token, redirecting to login");
                GateDecision::RedirectToLogin
            }
        }
    }
}
