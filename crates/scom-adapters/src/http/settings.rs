use async_trait::async_trait;

use scom_core::ids::PluginId;
use scom_core::settings::{PluginMeta, SettingsPayload};
use scom_ports::error::PortError;
use scom_ports::outbound::SettingsStore;

use super::{HostClient, HostConfig};

pub struct HttpSettingsStore {
    host: HostClient,
}

impl HttpSettingsStore {
    pub fn new(config: &HostConfig) -> Result<Self, PortError> {
        Ok(Self::with_host(HostClient::new(config)?))
    }

    pub fn with_host(host: HostClient) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SettingsStore for HttpSettingsStore {
    async fn load(&self, plugin_id: &PluginId) -> Result<PluginMeta, PortError> {
        let url = self.host.settings_url_for(plugin_id);
        let value = self.host.send_json(self.host.get(&url)).await?;
        if value.is_null() {
            return Err(PortError::NotFound);
        }
        serde_json::from_value(value).map_err(|e| PortError::Decode(e.to_string()))
    }

    async fn save(&self, plugin_id: &PluginId, payload: &SettingsPayload) -> Result<(), PortError> {
        let request = self.host.post(&self.host.settings_url_for(plugin_id)).json(payload);
        self.host.send_json(request).await?;
        tracing::info!(%plugin_id, "plugin settings persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scom_core::settings::{ConnectionSettings, SecureJsonData};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SETTINGS_PATH: &str = "/api/plugins/opslogix-scomalerts-app/settings";

    fn store(server: &MockServer) -> HttpSettingsStore {
        HttpSettingsStore::new(&HostConfig::new(server.uri(), PluginId::scom_alerts_app()))
            .unwrap()
    }

    #[tokio::test]
    async fn load_decodes_meta() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SETTINGS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "opslogix-scomalerts-app",
                "enabled": true,
                "jsonData": {
                    "url": "https://scom.contoso.local",
                    "resolutionStates": [{ "label": "0 - New", "value": "0" }]
                },
                "secureJsonFields": { "password": true }
            })))
            .mount(&server)
            .await;

        let meta = store(&server)
            .load(&PluginId::scom_alerts_app())
            .await
            .unwrap();

        assert!(meta.enabled);
        assert!(meta.secure_json_fields.password);
        assert_eq!(meta.json_data.resolution_states().len(), 1);
    }

    #[tokio::test]
    async fn save_posts_payload() {
        let server = MockServer::start().await;
        let payload = SettingsPayload {
            enabled: true,
            pinned: false,
            json_data: ConnectionSettings {
                url: "https://scom.contoso.local".into(),
                ..Default::default()
            },
            secure_json_data: Some(SecureJsonData {
                password: "s3cret".into(),
            }),
        };
        Mock::given(method("POST"))
            .and(path(SETTINGS_PATH))
            .and(body_json(json!({
                "enabled": true,
                "pinned": false,
                "jsonData": {
                    "url": "https://scom.contoso.local",
                    "userName": "",
                    "isSkipTlsVerifyCheck": false
                },
                "secureJsonData": { "password": "s3cret" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .save(&PluginId::scom_alerts_app(), &payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_save_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SETTINGS_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Permission denied"
            })))
            .mount(&server)
            .await;

        let payload = SettingsPayload {
            enabled: true,
            pinned: false,
            json_data: ConnectionSettings::default(),
            secure_json_data: None,
        };
        let err = store(&server)
            .save(&PluginId::scom_alerts_app(), &payload)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Permission denied (HTTP 403)");
    }

    #[tokio::test]
    async fn settings_are_addressed_by_requested_plugin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/plugins/some-other-app/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "some-other-app",
                "enabled": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let other = PluginId::parse("some-other-app").unwrap();
        let meta = store(&server).load(&other).await.unwrap();
        assert!(!meta.enabled);
    }

    #[tokio::test]
    async fn unknown_plugin_is_status_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/plugins/missing-app/settings"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Plugin not found"
            })))
            .mount(&server)
            .await;

        let missing = PluginId::parse("missing-app").unwrap();
        let err = store(&server).load(&missing).await.unwrap_err();
        assert!(matches!(err, PortError::Status { status: 404, .. }), "got {err:?}");
    }
}
