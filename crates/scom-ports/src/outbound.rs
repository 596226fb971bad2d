use async_trait::async_trait;
use serde_json::Value;

use scom_core::alert::Alert;
use scom_core::ids::{AlertId, PluginId};
use scom_core::settings::{PluginMeta, SettingsPayload};

use crate::error::PortError;
use crate::types::ResourceRequest;

/// The host's two remote-call primitives for plugin resources.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn get_resource(&self, request: &ResourceRequest) -> Result<Value, PortError>;
    async fn post_resource(
        &self,
        request: &ResourceRequest,
        body: Option<&Value>,
    ) -> Result<Value, PortError>;
}

/// Typed alert operations on top of [`ResourceClient`].
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn get_alerts(&self, criteria: &str) -> Result<Vec<Alert>, PortError>;
    async fn update_alert_resolution_state(
        &self,
        alert_id: &AlertId,
        resolution_state: &str,
    ) -> Result<(), PortError>;
}

/// The host's plugin settings endpoint.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self, plugin_id: &PluginId) -> Result<PluginMeta, PortError>;
    async fn save(&self, plugin_id: &PluginId, payload: &SettingsPayload)
        -> Result<(), PortError>;
}

/// Scoped key-value storage that survives between sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PortError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PortError>;
}
