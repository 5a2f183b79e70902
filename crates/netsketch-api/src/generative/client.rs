// Hand-crafted async HTTP client for the Generative Language API.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use super::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::Error;
use crate::transport::TransportConfig;

/// Public endpoint of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for single-turn `generateContent` calls.
pub struct GenerativeClient {
    http: reqwest::Client,
    base_url: Url,
    model: String,
}

impl GenerativeClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `x-goog-api-key` as a sensitive default header on every
    /// request. An empty key is [`Error::MissingCredentials`].
    pub fn from_api_key(
        endpoint: &str,
        model: impl Into<String>,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let key = api_key.expose_secret();
        if key.trim().is_empty() {
            return Err(Error::MissingCredentials);
        }

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(key).map_err(|_| Error::InvalidApiKey)?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(endpoint, model, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        endpoint: &str,
        model: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(endpoint)?,
            model: model.into(),
        })
    }

    /// Ensure the base path ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn generate_url(&self) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Send `prompt` as a single user turn and return the answer text.
    ///
    /// A successful response without any text is [`Error::EmptyResponse`].
    pub async fn generate_content(&self, prompt: &str) -> Result<String, Error> {
        let url = self.generate_url()?;
        debug!(model = %self.model, prompt_len = prompt.len(), "POST {url}");

        let body = GenerateContentRequest::from_text(prompt);
        let resp = self.http.post(url).json(&body).send().await?;
        let parsed: GenerateContentResponse = self.handle_response(resp).await?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(text)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if matches!(
            status,
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) => {
                // The service reports a bad key as 400 INVALID_ARGUMENT.
                let bad_key = err
                    .error
                    .message
                    .as_deref()
                    .is_some_and(|m| m.contains("API key not valid"));
                if bad_key {
                    return Error::InvalidApiKey;
                }
                err.error
                    .message
                    .or(err.error.status)
                    .unwrap_or_else(|| status.to_string())
            }
            Err(_) if raw.is_empty() => status.to_string(),
            Err(_) => raw,
        };

        Error::Service {
            status: status.as_u16(),
            message,
        }
    }
}
