//! Blocking HTTP client for the MELCloud cloud API.
//!
//! - Blocking client using `ureq` (no async).
//! - Uses the wire models in `crate::models::melcloud`.
//!
//! Authentication
//! - Single credential login at startup; the returned context key is attached
//!   to every later request as `X-MitsContextKey`. There is no re-login on
//!   expiry: once the key goes stale, requests fail until the process restarts.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::hierarchy;
use crate::models::melcloud::{Building, Device, LoginRequest, LoginResponse};

const BASE_URL: &str = "https://app.melcloud.com/Mitsubishi.Wifi.Client";
const APP_VERSION: &str = "1.21.6.0";
const CONTEXT_KEY_HEADER: &str = "X-MitsContextKey";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum MelCloudError {
    MissingAuth,
    Transport(String),
    Http { status: u16, message: String },
    Decode(String),
    Json(serde_json::Error),
    Login { error_id: i64 },
}

impl core::fmt::Display for MelCloudError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MelCloudError::MissingAuth => write!(f, "missing context key for authenticated endpoint"),
            MelCloudError::Transport(s) => write!(f, "transport error: {}", s),
            MelCloudError::Http { status, message } => write!(f, "http {}: {}", status, message),
            MelCloudError::Decode(s) => write!(f, "decode error: {}", s),
            MelCloudError::Json(e) => write!(f, "json error: {}", e),
            MelCloudError::Login { error_id } => {
                write!(f, "login rejected by MELCloud (bad email/password combo?), error id: {}", error_id)
            }
        }
    }
}

impl std::error::Error for MelCloudError {}

impl From<serde_json::Error> for MelCloudError {
    fn from(value: serde_json::Error) -> Self {
        MelCloudError::Json(value)
    }
}

pub struct MelCloudClient {
    agent: ureq::Agent,
    base_url: String,
    context_key: Option<String>,
}

impl MelCloudClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub(crate) fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        MelCloudClient {
            agent,
            base_url: base_url.into(),
            context_key: None,
        }
    }

    /// Exchange credentials for a context key. On any failure the client stays
    /// unauthenticated and later calls fail with `MissingAuth`.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), MelCloudError> {
        let body = LoginRequest {
            app_version: APP_VERSION.to_string(),
            captcha_response: None,
            email: email.to_string(),
            language: 0,
            password: password.to_string(),
            persist: false,
        };

        let response: LoginResponse = self.post_json("/Login/ClientLogin", &body)?;
        self.context_key = Some(context_key_from(response)?);
        Ok(())
    }

    /// Fetch the raw building hierarchy with no further processing.
    pub fn list_buildings(&self) -> Result<Vec<Building>, MelCloudError> {
        self.get_json("/User/ListDevices")
    }

    /// Fetch the hierarchy and flatten it into a device list.
    pub fn devices(&self) -> Result<Vec<Device>, MelCloudError> {
        Ok(hierarchy::flatten(self.list_buildings()?))
    }

    #[cfg(test)]
    pub(crate) fn set_context_key(&mut self, key: impl Into<String>) {
        self.context_key = Some(key.into());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, MelCloudError> {
        let key = self.context_key.as_deref().ok_or(MelCloudError::MissingAuth)?;
        let request = self
            .agent
            .get(&self.url(path))
            .set("Accept", "application/json")
            .set(CONTEXT_KEY_HEADER, key);
        Self::read_response(request.call())
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, MelCloudError> {
        let request = self
            .agent
            .post(&self.url(path))
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        Self::read_response(request.send_string(&serde_json::to_string(body)?))
    }

    fn read_response<T: DeserializeOwned>(
        response: Result<ureq::Response, ureq::Error>,
    ) -> Result<T, MelCloudError> {
        match response {
            Ok(res) => {
                let mut de = serde_json::Deserializer::from_reader(res.into_reader());
                serde_path_to_error::deserialize(&mut de).map_err(|e| MelCloudError::Decode(e.to_string()))
            }
            Err(ureq::Error::Transport(t)) => Err(MelCloudError::Transport(t.to_string())),
            Err(ureq::Error::Status(status, res)) => {
                let message = res.into_string().unwrap_or_else(|_| String::from("<no body>"));
                Err(MelCloudError::Http { status, message })
            }
        }
    }
}

impl Default for MelCloudClient {
    fn default() -> Self {
        Self::new()
    }
}

fn context_key_from(response: LoginResponse) -> Result<String, MelCloudError> {
    if let Some(error_id) = response.error_id {
        return Err(MelCloudError::Login { error_id });
    }
    response
        .login_data
        .map(|d| d.context_key)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| MelCloudError::Decode("login response missing LoginData.ContextKey".to_string()))
}
