use async_trait::async_trait;
use serde_json::Value;

use scom_ports::error::PortError;
use scom_ports::outbound::ResourceClient;
use scom_ports::types::ResourceRequest;

use super::{HostClient, HostConfig};

pub struct HttpResourceClient {
    host: HostClient,
}

impl HttpResourceClient {
    pub fn new(config: &HostConfig) -> Result<Self, PortError> {
        Ok(Self::with_host(HostClient::new(config)?))
    }

    pub fn with_host(host: HostClient) -> Self {
        Self { host }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn get_resource(&self, request: &ResourceRequest) -> Result<Value, PortError> {
        let url = self.host.resource_url(&request.path);
        tracing::debug!(%url, "GET resource");
        let builder = self.host.get(&url).query(&request.params);
        self.host.send_json(builder).await
    }

    async fn post_resource(
        &self,
        request: &ResourceRequest,
        body: Option<&Value>,
    ) -> Result<Value, PortError> {
        let url = self.host.resource_url(&request.path);
        tracing::debug!(%url, "POST resource");
        let mut builder = self.host.post(&url).query(&request.params);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.host.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scom_core::ids::PluginId;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALERTS_PATH: &str = "/api/plugins/opslogix-scomalerts-app/resources/alerts";

    fn client(server: &MockServer) -> HttpResourceClient {
        let mut config = HostConfig::new(server.uri(), PluginId::scom_alerts_app());
        config.api_token = Some("glsa_test".into());
        HttpResourceClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn get_sends_criteria_as_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ALERTS_PATH))
            .and(query_param("criteria", "Severity = 2 AND ResolutionState = 0"))
            .and(header("authorization", "Bearer glsa_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "a-1" }])))
            .expect(1)
            .mount(&server)
            .await;

        let request = ResourceRequest::new("alerts")
            .param("criteria", "Severity = 2 AND ResolutionState = 0");
        let value = client(&server).get_resource(&request).await.unwrap();

        assert_eq!(value, json!([{ "id": "a-1" }]));
    }

    #[tokio::test]
    async fn post_sends_update_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/api/plugins/opslogix-scomalerts-app/resources/updateAlertResolutionState",
            ))
            .and(query_param("alertId", "a-1"))
            .and(query_param("resolutionState", "254"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request = ResourceRequest::new("updateAlertResolutionState")
            .param("alertId", "a-1")
            .param("resolutionState", "254");
        let value = client(&server).post_resource(&request, None).await.unwrap();

        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn error_status_carries_host_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ALERTS_PATH))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "message": "SCOM unreachable" })),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .get_resource(&ResourceRequest::new("alerts"))
            .await
            .unwrap_err();

        match err {
            PortError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "SCOM unreachable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ALERTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_resource(&ResourceRequest::new("alerts"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let config = HostConfig::new("http://127.0.0.1:9", PluginId::scom_alerts_app());
        let err = HttpResourceClient::new(&config)
            .unwrap()
            .get_resource(&ResourceRequest::new("alerts"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Transport(_)));
    }
}
