use serde::{Deserialize, Serialize};

use crate::column::{default_column_config, ColumnConfig};
use crate::resolution::{default_resolution_states, ResolutionState};

pub const DEFAULT_PLUGIN_ID: &str = "opslogix-scomalerts-app";

/// The `jsonData` block the host keeps for the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub is_skip_tls_verify_check: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_states: Option<Vec<ResolutionState>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_config: Option<Vec<ColumnConfig>>,
}

impl ConnectionSettings {
    /// Configured vocabulary, or the built-in one when nothing was saved.
    pub fn resolution_states(&self) -> Vec<ResolutionState> {
        self.resolution_states
            .clone()
            .unwrap_or_else(default_resolution_states)
    }

    pub fn column_config(&self) -> Vec<ColumnConfig> {
        self.column_config
            .clone()
            .unwrap_or_else(default_column_config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureJsonData {
    pub password: String,
}

/// Only whether a secret is set ever comes back from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureJsonFields {
    #[serde(default)]
    pub password: bool,
}

/// Body of the combined persist call to the host's settings endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub enabled: bool,
    pub pinned: bool,
    pub json_data: ConnectionSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_data: Option<SecureJsonData>,
}

/// What the host reports about the plugin when settings are loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub json_data: ConnectionSettings,
    #[serde(default)]
    pub secure_json_fields: SecureJsonFields,
}

/// Per-panel options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    #[serde(default = "default_show_context_menu")]
    pub show_context_menu: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            show_context_menu: default_show_context_menu(),
        }
    }
}

fn default_show_context_menu() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_vocabularies_fall_back_to_defaults() {
        let settings = ConnectionSettings::default();
        assert_eq!(settings.resolution_states().len(), 8);
        assert_eq!(settings.column_config().len(), 26);
    }

    #[test]
    fn payload_omits_secret_when_not_set() {
        let payload = SettingsPayload {
            enabled: true,
            pinned: false,
            json_data: ConnectionSettings {
                url: "https://scom.contoso.local".into(),
                user_name: "contoso\\svc".into(),
                ..Default::default()
            },
            secure_json_data: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["jsonData"]["userName"], json!("contoso\\svc"));
        assert_eq!(value["jsonData"]["isSkipTlsVerifyCheck"], json!(false));
        assert!(value.get("secureJsonData").is_none());
    }

    #[test]
    fn meta_decodes_configured_flag() {
        let meta: PluginMeta = serde_json::from_value(json!({
            "id": "opslogix-scomalerts-app",
            "enabled": true,
            "jsonData": { "url": "http://scom" },
            "secureJsonFields": { "password": true }
        }))
        .unwrap();
        assert!(meta.secure_json_fields.password);
        assert_eq!(meta.json_data.url, "http://scom");
    }

    #[test]
    fn panel_options_default_to_context_menu_on() {
        let options: PanelOptions = serde_json::from_value(json!({})).unwrap();
        assert!(options.show_context_menu);
    }
}
