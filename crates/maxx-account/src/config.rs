use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "MAXX_SERVER_URL";

/// Backend location and routes. Persisted as `settings.json` in the data
/// directory; any missing key falls back to its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_headers")]
    pub extra_headers: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Endpoints {
    #[serde(default = "default_health")]
    pub health: String,
    #[serde(default = "default_register")]
    pub register: String,
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_change_password")]
    pub change_password: String,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            endpoints: Endpoints::default(),
            extra_headers: default_headers(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            health: default_health(),
            register: default_register(),
            login: default_login(),
            change_password: default_change_password(),
            profile: default_profile(),
        }
    }
}

impl ApiSettings {
    /// Applies `MAXX_SERVER_URL` on top of whatever was loaded from disk.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
        self
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_health() -> String {
    "/health".to_string()
}

fn default_register() -> String {
    "/auth/register".to_string()
}

fn default_login() -> String {
    "/auth/login".to_string()
}

fn default_change_password() -> String {
    "/auth/change-password".to_string()
}

fn default_profile() -> String {
    "/auth/profile".to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("ngrok-skip-browser-warning".to_string(), "true".to_string());
    headers
}
