use std::time::Duration;

use http::{
    Method,
    StatusCode,
    header::{COOKIE, SET_COOKIE},
};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    api::{error::ApiError, lenient::is_truthy},
    prelude::*,
    session::SessionManager,
};

/// Whether a `401 Unauthorized` response means that the session has expired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AuthCheck {
    /// Clear the session and fail with [`ApiError::SessionExpired`].
    Enforce,

    /// Treat it as any other failed request. Used by the login and registration calls.
    Bypass,
}

/// EnerTrack backend client.
pub struct Client {
    inner: reqwest::Client,
    base_url: String,
    session: SessionManager,
}

impl Client {
    pub fn new(base_url: &Url, timeout: Duration, session: SessionManager) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("enertrack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let base_url = base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self { inner, base_url, session })
    }

    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, ApiError> {
        self.request::<(), R>(Method::GET, path, None, AuthCheck::Enforce).await
    }

    pub async fn send<B, R>(&self, method: Method, path: &str, body: &B) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(method, path, Some(body), AuthCheck::Enforce).await
    }

    /// Call the endpoint and decode the JSON response.
    ///
    /// A successful response with a blank body yields `None`.
    #[instrument(skip_all, level = Level::DEBUG, fields(method = %method, path = path))]
    pub async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth_check: AuthCheck,
    ) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.inner.request(method, format!("{}{path}", self.base_url));
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(cookie) = self.session.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let transport_error = |source| ApiError::Transport { path: path.to_string(), source };
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        self.session
            .absorb_set_cookies(
                response.headers().get_all(SET_COOKIE).iter().filter_map(|value| value.to_str().ok()),
            )
            .map_err(ApiError::session)?;
        let text = response.text().await.map_err(transport_error)?;
        debug!(%status, length = text.len(), "received");

        if status == StatusCode::UNAUTHORIZED && auth_check == AuthCheck::Enforce {
            warn!("session expired, signing out…");
            self.session.clear().map_err(ApiError::session)?;
            let message = extract_message(&text, || "Session expired".to_string());
            return Err(ApiError::SessionExpired { message });
        }

        if !status.is_success() {
            let message = extract_message(&text, || {
                format!("Request failed with status {}", status.as_u16())
            });
            error!(%status, reason = %message, "request failed");
            return Err(ApiError::Status { status, message });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| ApiError::MalformedJson { path: path.to_string(), source })
    }
}

/// Best-effort human-readable failure message: the JSON `error` or `message` field,
/// else the raw body, else the fallback.
fn extract_message(text: &str, fallback: impl FnOnce() -> String) -> String {
    let Ok(json) = serde_json::from_str::<Value>(text) else {
        return if text.trim().is_empty() { fallback() } else { text.to_string() };
    };
    ["error", "message"]
        .into_iter()
        .filter_map(|key| json.get(key))
        .find(|value| is_truthy(value))
        .map(|value| value.as_str().map_or_else(|| value.to_string(), str::to_string))
        .unwrap_or_else(|| text.to_string())
}
