use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ApiSettings;
use crate::error::AppError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct ServerErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl HttpClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .default_headers(default_headers(settings))
            .build()
            .map_err(|_| AppError::ServerUnreachable)?;

        Ok(Self {
            client,
            base_url: settings.server_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, AppError> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Response received");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30);
            return Err(AppError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !is_json(&response) {
            let code = status.as_u16();
            let text = response.text().await.unwrap_or_default();
            let preview: String = text.chars().take(200).collect();
            tracing::warn!(status = code, body = %preview, "Non-JSON response received");
            return Err(AppError::NonJsonResponse(code));
        }

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AppError::ServerError(status.as_u16(), e.to_string()));
        }

        let code = status.as_u16();
        let msg = server_message(response).await;

        match code {
            401 => Err(AppError::SessionExpired(msg)),
            403 => Err(AppError::Forbidden(msg)),
            _ => Err(AppError::ServerError(
                code,
                msg.unwrap_or_else(|| format!("HTTP error! status: {code}")),
            )),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let req = self.authorize(self.client.get(self.url(path)));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let req = self.authorize(self.client.post(self.url(path)).json(body));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let req = self.authorize(self.client.put(self.url(path)).json(body));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }
}

fn default_headers(settings: &ApiSettings) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &settings.extra_headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid header from settings"),
        }
    }
    headers
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

/// `message`, then `error` (a string or an object with a `message`).
async fn server_message(response: Response) -> Option<String> {
    let body = response.json::<ServerErrorBody>().await.ok()?;
    match body {
        ServerErrorBody {
            message: Some(message),
            ..
        } => Some(message),
        ServerErrorBody {
            error: Some(serde_json::Value::String(error)),
            ..
        } => Some(error),
        ServerErrorBody {
            error: Some(serde_json::Value::Object(details)),
            ..
        } => details
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    }
}
