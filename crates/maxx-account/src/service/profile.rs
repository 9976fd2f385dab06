use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::editor::field::FieldKey;
use crate::error::AppError;
use crate::infra::http_client::HttpClient;
use crate::infra::local_storage::LocalCache;

/// Field values as known at load time.
pub type ProfileRecord = BTreeMap<FieldKey, String>;

/// A single-field update sent on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub key: FieldKey,
    pub value: String,
}

impl ProfileUpdate {
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.key.as_str().to_string(),
            serde_json::Value::String(self.value.clone()),
        );
        serde_json::Value::Object(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOrigin {
    Remote,
    Cache,
}

/// The backend operations the profile page depends on.
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> Result<ProfileRecord, AppError>;
    async fn update_profile(&self, update: &ProfileUpdate, token: &str) -> Result<(), AppError>;
    async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        token: &str,
    ) -> Result<(), AppError>;
}

#[derive(Deserialize, Debug)]
struct ProfileEnvelope {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
struct UpdateAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// `ProfileService` over the HTTP backend.
#[derive(Clone)]
pub struct RemoteProfileService {
    client: HttpClient,
    endpoints: Endpoints,
}

impl RemoteProfileService {
    pub fn new(client: HttpClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    fn authorized(&self, token: &str) -> HttpClient {
        let mut client = self.client.clone();
        client.set_access_token(Some(token.to_string()));
        client
    }
}

#[async_trait]
impl ProfileService for RemoteProfileService {
    async fn fetch_profile(&self, token: &str) -> Result<ProfileRecord, AppError> {
        let envelope: ProfileEnvelope = self.authorized(token).get(&self.endpoints.profile).await?;
        let data = envelope
            .data
            .ok_or_else(|| AppError::Rejected("Profile response carried no data".into()))?;
        Ok(record_from_json(&data))
    }

    async fn update_profile(&self, update: &ProfileUpdate, token: &str) -> Result<(), AppError> {
        let ack: UpdateAck = self
            .authorized(token)
            .put(&self.endpoints.profile, &update.to_body())
            .await?;
        if ack.success || ack.message.is_some() {
            Ok(())
        } else {
            Err(AppError::Rejected("Profile update failed".into()))
        }
    }

    async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let body = ChangePasswordBody {
            old_password,
            new_password,
        };
        let _: serde_json::Value = self
            .authorized(token)
            .post(&self.endpoints.change_password, &body)
            .await?;
        Ok(())
    }
}

/// Keeps known fields with non-empty string values; everything else in the
/// payload is ignored.
pub fn record_from_json(data: &serde_json::Map<String, serde_json::Value>) -> ProfileRecord {
    data.iter()
        .filter_map(|(name, value)| {
            let key = name.parse::<FieldKey>().ok()?;
            let value = value.as_str().filter(|v| !v.is_empty())?;
            Some((key, value.to_string()))
        })
        .collect()
}

pub fn record_from_cache(cache: &dyn LocalCache) -> ProfileRecord {
    FieldKey::ALL
        .into_iter()
        .filter_map(|key| {
            cache
                .get(&key.cache_key())
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
}

/// Fetches the profile, mirroring every received value into the cache. When
/// the backend cannot be used the cached copy is returned instead.
pub async fn load_profile(
    service: &dyn ProfileService,
    cache: &dyn LocalCache,
    token: &str,
) -> (ProfileRecord, ProfileOrigin) {
    match service.fetch_profile(token).await {
        Ok(record) => {
            for (key, value) in &record {
                if let Err(e) = cache.set(&key.cache_key(), value) {
                    tracing::warn!(field = %key, error = %e, "Failed to mirror profile value");
                }
            }
            tracing::info!(fields = record.len(), "Profile loaded from backend");
            (record, ProfileOrigin::Remote)
        }
        Err(e) if e.is_transport() => {
            tracing::info!(error = %e, "Backend unreachable, using cached profile");
            (record_from_cache(cache), ProfileOrigin::Cache)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Profile fetch rejected, using cached profile");
            (record_from_cache(cache), ProfileOrigin::Cache)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiSettings;
    use crate::infra::local_storage::MemoryCache;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> RemoteProfileService {
        let settings = ApiSettings {
            server_url: server.uri(),
            ..ApiSettings::default()
        };
        RemoteProfileService::new(HttpClient::new(&settings).unwrap(), settings.endpoints)
    }

    #[test]
    fn test_record_from_json_skips_unknown_and_empty() {
        let data = serde_json::json!({
            "name": "Jane Doe",
            "email": "",
            "skills": null,
            "employeeId": "E-17",
            "about": "Solar ops"
        });
        let record = record_from_json(data.as_object().unwrap());

        assert_eq!(record.len(), 2);
        assert_eq!(record[&FieldKey::Name], "Jane Doe");
        assert_eq!(record[&FieldKey::About], "Solar ops");
    }

    #[test]
    fn test_record_from_json_needs_exact_key_and_string_value() {
        let data = serde_json::json!({
            "Name": "Capitalised",
            "location": 78701,
            "skills": ["welding"],
            "email": "jane@maxx.energy"
        });
        let record = record_from_json(data.as_object().unwrap());

        assert_eq!(record.len(), 1);
        assert_eq!(record[&FieldKey::Email], "jane@maxx.energy");
    }

    #[test]
    fn test_update_body_is_single_key_object() {
        let update = ProfileUpdate {
            key: FieldKey::Location,
            value: "Austin".into(),
        };
        assert_eq!(update.to_body(), serde_json::json!({ "location": "Austin" }));
    }

    #[tokio::test]
    async fn test_update_sends_partial_record_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/profile"))
            .and(header("authorization", "Bearer t0k"))
            .and(body_json(serde_json::json!({ "name": "Jane Doe" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "updated" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let update = ProfileUpdate {
            key: FieldKey::Name,
            value: "Jane Doe".into(),
        };
        service_for(&server).update_profile(&update, "t0k").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_without_ack_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
            .mount(&server)
            .await;

        let update = ProfileUpdate {
            key: FieldKey::Name,
            value: "Jane".into(),
        };
        let err = service_for(&server)
            .update_profile(&update, "t0k")
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Rejected("Profile update failed".into()));
    }

    #[tokio::test]
    async fn test_change_password_uses_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/change-password"))
            .and(body_json(serde_json::json!({
                "oldPassword": "hunter22",
                "newPassword": "hunter222"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        service_for(&server)
            .change_password("hunter22", "hunter222", "t0k")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_load_profile_mirrors_remote_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "name": "Jane Doe", "location": "Austin" }
            })))
            .mount(&server)
            .await;

        let cache = MemoryCache::new();
        let (record, origin) = load_profile(&service_for(&server), &cache, "t0k").await;

        assert_eq!(origin, ProfileOrigin::Remote);
        assert_eq!(record[&FieldKey::Location], "Austin");
        assert_eq!(cache.get("profile_name").as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_load_profile_falls_back_to_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
            .mount(&server)
            .await;

        let cache = MemoryCache::new();
        cache.set("profile_email", "jane@maxx.energy").unwrap();

        let (record, origin) = load_profile(&service_for(&server), &cache, "t0k").await;

        assert_eq!(origin, ProfileOrigin::Cache);
        assert_eq!(record.len(), 1);
        assert_eq!(record[&FieldKey::Email], "jane@maxx.energy");
    }

    #[tokio::test]
    async fn test_missing_data_envelope_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let cache = MemoryCache::new();
        cache.set("profile_name", "Cached Jane").unwrap();

        let (record, origin) = load_profile(&service_for(&server), &cache, "t0k").await;
        assert_eq!(origin, ProfileOrigin::Cache);
        assert_eq!(record[&FieldKey::Name], "Cached Jane");
    }
}
