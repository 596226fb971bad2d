use async_trait::async_trait;
use serde_json::Value;

use scom_core::alert::Alert;
use scom_core::ids::AlertId;
use scom_core::query::Query;
use scom_ports::error::PortError;
use scom_ports::outbound::{AlertSource, ResourceClient};
use scom_ports::types::ResourceRequest;

pub const ALERTS_RESOURCE: &str = "alerts";
pub const UPDATE_RESOLUTION_STATE_RESOURCE: &str = "updateAlertResolutionState";

const DEFAULT_DATASOURCE_CRITERIA: &str = "ResolutionState = 0";

/// Typed alert calls over the host's generic resource primitives.
pub struct ScomDataSource<R>
where
    R: ResourceClient,
{
    client: R,
}

impl<R> ScomDataSource<R>
where
    R: ResourceClient,
{
    pub fn new(client: R) -> Self {
        Self { client }
    }

    /// Query a fresh panel starts with.
    pub fn default_query(&self, ref_id: &str) -> Query {
        Query::alerts(ref_id, DEFAULT_DATASOURCE_CRITERIA)
    }
}

#[async_trait]
impl<R> AlertSource for ScomDataSource<R>
where
    R: ResourceClient,
{
    async fn get_alerts(&self, criteria: &str) -> Result<Vec<Alert>, PortError> {
        let request = ResourceRequest::new(ALERTS_RESOURCE).param("criteria", criteria);
        let response = self.client.get_resource(&request).await?;

        match response {
            Value::Array(_) => {
                serde_json::from_value(response).map_err(|e| PortError::Decode(e.to_string()))
            }
            Value::Null => Ok(Vec::new()),
            other => {
                tracing::warn!(kind = %json_kind(&other), "alerts resource did not return an array");
                Ok(Vec::new())
            }
        }
    }

    async fn update_alert_resolution_state(
        &self,
        alert_id: &AlertId,
        resolution_state: &str,
    ) -> Result<(), PortError> {
        let request = ResourceRequest::new(UPDATE_RESOLUTION_STATE_RESOURCE)
            .param("alertId", alert_id.as_str())
            .param("resolutionState", resolution_state);
        self.client.post_resource(&request, None).await?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
