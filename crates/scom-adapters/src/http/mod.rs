//! Host-platform transport over HTTP.
//!
//! Resource calls go to `<host>/api/plugins/<pluginId>/resources/<path>` and settings to
//! `<host>/api/plugins/<pluginId>/settings`. Non-2xx responses become
//! [`PortError::Status`] carrying the host's `message` when it sends one.

mod resource;
mod settings;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use scom_core::ids::PluginId;
use scom_ports::error::PortError;

pub use resource::HttpResourceClient;
pub use settings::HttpSettingsStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub base_url: String,
    pub plugin_id: PluginId,
    pub api_token: Option<String>,
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

impl HostConfig {
    pub fn new(base_url: impl Into<String>, plugin_id: PluginId) -> Self {
        Self {
            base_url: base_url.into(),
            plugin_id,
            api_token: None,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Shared reqwest client bound to one plugin on one host.
#[derive(Clone)]
pub struct HostClient {
    client: Client,
    base_url: String,
    plugin_id: PluginId,
    api_token: Option<String>,
}

impl HostClient {
    pub fn new(config: &HostConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| PortError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            plugin_id: config.plugin_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn plugin_base(&self, plugin_id: &PluginId) -> String {
        format!("{}/api/plugins/{plugin_id}", self.base_url)
    }

    pub fn resource_url(&self, path: &str) -> String {
        format!(
            "{}/resources/{}",
            self.plugin_base(&self.plugin_id),
            path.trim_start_matches('/')
        )
    }

    pub fn settings_url(&self) -> String {
        self.settings_url_for(&self.plugin_id)
    }

    pub fn settings_url_for(&self, plugin_id: &PluginId) -> String {
        format!("{}/settings", self.plugin_base(plugin_id))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    /// Sends the request and decodes the body as JSON. An empty body is `Null`.
    pub(crate) async fn send_json(&self, request: RequestBuilder) -> Result<Value, PortError> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let response = check_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| PortError::Decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());
    tracing::debug!(status = status.as_u16(), %message, "host returned an error");

    Err(PortError::Status {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_scoped_to_plugin() {
        let client = HostClient::new(&HostConfig::new(
            "http://grafana.local:3000/",
            PluginId::scom_alerts_app(),
        ))
        .unwrap();

        assert_eq!(
            client.resource_url("alerts"),
            "http://grafana.local:3000/api/plugins/opslogix-scomalerts-app/resources/alerts"
        );
        assert_eq!(
            client.settings_url(),
            "http://grafana.local:3000/api/plugins/opslogix-scomalerts-app/settings"
        );
        assert_eq!(
            client.settings_url_for(&PluginId::parse("some-other-app").unwrap()),
            "http://grafana.local:3000/api/plugins/some-other-app/settings"
        );
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"message":"Plugin not found"}"#).as_deref(),
            Some("Plugin not found")
        );
        assert_eq!(error_message("bad gateway").as_deref(), Some("bad gateway"));
        assert_eq!(error_message("  "), None);
        assert_eq!(error_message(r#"{"status":1}"#), None);
    }
}
