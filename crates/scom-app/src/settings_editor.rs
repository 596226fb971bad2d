//! Administrator-facing settings form.
//!
//! The vocabularies are edited as raw JSON text. A save validates both buffers before
//! anything leaves the process, so a typo in one array never persists half a config.

use serde::Serialize;

use scom_core::column::{default_column_config, ColumnConfig};
use scom_core::ids::PluginId;
use scom_core::notice::{Notice, NoticeKind};
use scom_core::resolution::{default_resolution_states, ResolutionState};
use scom_core::settings::{ConnectionSettings, PluginMeta, SecureJsonData, SettingsPayload};
use scom_core::validation::{parse_column_config, parse_resolution_states, InvalidBuffer};
use scom_ports::outbound::SettingsStore;

use crate::error::AppError;

pub const SAVE_SUCCESS_MESSAGE: &str =
    "Settings saved successfully! The plugin will reload with new settings.";

const PASSWORD_CONFIGURED_PLACEHOLDER: &str = "configured";
const PASSWORD_EMPTY_PLACEHOLDER: &str = "Password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub reload_required: bool,
}

pub struct SettingsEditor {
    plugin_id: PluginId,
    enabled: bool,
    saved: ConnectionSettings,
    password_configured: bool,

    pub url: String,
    pub user_name: String,
    pub skip_tls_verify: bool,
    password: String,
    resolution_states_text: String,
    column_config_text: String,
    status: Option<Notice>,
}

impl SettingsEditor {
    pub fn new(plugin_id: PluginId, meta: PluginMeta) -> Self {
        let saved = meta.json_data;
        Self {
            plugin_id,
            enabled: meta.enabled,
            password_configured: meta.secure_json_fields.password,
            url: saved.url.clone(),
            user_name: saved.user_name.clone(),
            skip_tls_verify: saved.is_skip_tls_verify_check,
            password: String::new(),
            resolution_states_text: pretty(&saved.resolution_states()),
            column_config_text: pretty(&saved.column_config()),
            status: None,
            saved,
        }
    }

    pub async fn load<S: SettingsStore>(store: &S, plugin_id: PluginId) -> Result<Self, AppError> {
        let meta = store.load(&plugin_id).await?;
        Ok(Self::new(plugin_id, meta))
    }

    /// Settings as last persisted. Untouched by a failed save.
    pub fn saved(&self) -> &ConnectionSettings {
        &self.saved
    }

    pub fn resolution_states_text(&self) -> &str {
        &self.resolution_states_text
    }

    pub fn column_config_text(&self) -> &str {
        &self.column_config_text
    }

    pub fn set_resolution_states_text(&mut self, text: impl Into<String>) {
        self.resolution_states_text = text.into();
    }

    pub fn set_column_config_text(&mut self, text: impl Into<String>) {
        self.column_config_text = text.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn password_configured(&self) -> bool {
        self.password_configured
    }

    pub fn password_placeholder(&self) -> &'static str {
        if self.password_configured {
            PASSWORD_CONFIGURED_PLACEHOLDER
        } else {
            PASSWORD_EMPTY_PLACEHOLDER
        }
    }

    pub fn reset_resolution_states(&mut self) {
        self.resolution_states_text = pretty(&default_resolution_states());
    }

    pub fn reset_column_config(&mut self) {
        self.column_config_text = pretty(&default_column_config());
    }

    pub fn status(&self) -> Option<&Notice> {
        self.status.as_ref()
    }

    pub async fn save<S: SettingsStore>(&mut self, store: &S) -> Result<SaveOutcome, AppError> {
        let (resolution_states, column_config) = match self.validated() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "settings rejected");
                self.status = Some(Notice::persistent(NoticeKind::Error, e.to_string()));
                return Err(e.into());
            }
        };

        let json_data = ConnectionSettings {
            url: self.url.clone(),
            user_name: self.user_name.clone(),
            is_skip_tls_verify_check: self.skip_tls_verify,
            resolution_states: Some(resolution_states),
            column_config: Some(column_config),
        };
        let secure_json_data = (!self.password.is_empty()).then(|| SecureJsonData {
            password: self.password.clone(),
        });
        let payload = SettingsPayload {
            enabled: self.enabled,
            pinned: false,
            json_data,
            secure_json_data,
        };

        if let Err(e) = store.save(&self.plugin_id, &payload).await {
            tracing::warn!(plugin_id = %self.plugin_id, error = %e, "settings save failed");
            self.status = Some(Notice::persistent(
                NoticeKind::Error,
                format!("Failed to save settings: {e}"),
            ));
            return Err(e.into());
        }

        tracing::info!(plugin_id = %self.plugin_id, "settings saved");
        if payload.secure_json_data.is_some() {
            self.password_configured = true;
        }
        self.password.clear();
        self.saved = payload.json_data;
        self.status = Some(Notice::persistent(
            NoticeKind::Success,
            SAVE_SUCCESS_MESSAGE,
        ));
        Ok(SaveOutcome {
            reload_required: true,
        })
    }

    fn validated(&self) -> Result<(Vec<ResolutionState>, Vec<ColumnConfig>), InvalidBuffer> {
        let states = parse_resolution_states(&self.resolution_states_text)?;
        let columns = parse_column_config(&self.column_config_text)?;
        Ok((states, columns))
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableConfig;
    use async_trait::async_trait;
    use scom_core::settings::PanelOptions;
    use scom_ports::error::PortError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        meta: Mutex<PluginMeta>,
        saved: Mutex<Vec<SettingsPayload>>,
        fail_with: Mutex<Option<PortError>>,
    }

    #[async_trait]
    impl SettingsStore for MockStore {
        async fn load(&self, _plugin_id: &PluginId) -> Result<PluginMeta, PortError> {
            Ok(self.meta.lock().unwrap().clone())
        }

        async fn save(
            &self,
            _plugin_id: &PluginId,
            payload: &SettingsPayload,
        ) -> Result<(), PortError> {
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            self.saved.lock().unwrap().push(payload.clone());
            let mut meta = self.meta.lock().unwrap();
            meta.json_data = payload.json_data.clone();
            if payload.secure_json_data.is_some() {
                meta.secure_json_fields.password = true;
            }
            Ok(())
        }
    }

    fn editor() -> SettingsEditor {
        SettingsEditor::new(
            PluginId::scom_alerts_app(),
            PluginMeta {
                enabled: true,
                ..PluginMeta::default()
            },
        )
    }

    #[test]
    fn buffers_start_pretty_printed_from_defaults() {
        let editor = editor();
        assert!(editor.resolution_states_text().starts_with("[\n  {\n    \"label\": \"0 - New\""));
        assert_eq!(
            parse_column_config(editor.column_config_text()).unwrap(),
            default_column_config()
        );
        assert_eq!(editor.password_placeholder(), "Password");
    }

    #[tokio::test]
    async fn column_missing_order_aborts_whole_save() {
        let store = MockStore::default();
        let mut editor = editor();
        editor.url = "https://scom.contoso.local".into();
        editor.set_column_config_text(
            r#"[{"id":"name","label":"Name","visible":true,"order":0},
                {"id":"severity","label":"Severity","visible":true}]"#,
        );

        let err = editor.save(&store).await.unwrap_err();

        let AppError::Config(invalid) = &err else {
            panic!("expected config error, got {err:?}");
        };
        assert_eq!(invalid.source.index(), Some(1));
        assert_eq!(invalid.source.field(), Some("order"));
        assert!(store.saved.lock().unwrap().is_empty());
        assert_eq!(editor.saved().url, "");
        assert_eq!(
            editor.status().unwrap().message(),
            "Invalid column configuration JSON: Column at index 1 is missing required field 'order'"
        );
    }

    #[tokio::test]
    async fn single_state_save_drives_menu_vocabulary() {
        let store = MockStore::default();
        let mut editor = editor();
        editor.set_resolution_states_text(r#"[{"label":"0 - New","value":"0"}]"#);

        let outcome = editor.save(&store).await.unwrap();
        assert!(outcome.reload_required);

        let persisted = store.saved.lock().unwrap()[0].json_data.clone();
        let config = TableConfig::from_settings(&persisted, PanelOptions::default());
        assert_eq!(
            config.resolution_states,
            vec![ResolutionState::new("0 - New", "0")]
        );
    }

    #[tokio::test]
    async fn saved_states_reload_identically() {
        let store = MockStore::default();
        let mut editor = editor();
        let states = vec![
            ResolutionState::new("0 - New", "0"),
            ResolutionState::new("42 - Parked", "42"),
        ];
        editor.set_resolution_states_text(serde_json::to_string(&states).unwrap());
        editor.save(&store).await.unwrap();

        let reloaded = SettingsEditor::load(&store, PluginId::scom_alerts_app())
            .await
            .unwrap();
        assert_eq!(
            parse_resolution_states(reloaded.resolution_states_text()).unwrap(),
            states
        );
    }

    #[tokio::test]
    async fn password_sent_only_when_entered() {
        let store = MockStore::default();
        let mut editor = editor();

        editor.save(&store).await.unwrap();
        assert!(store.saved.lock().unwrap()[0].secure_json_data.is_none());
        assert!(!editor.password_configured());

        editor.set_password("s3cret");
        editor.save(&store).await.unwrap();
        assert_eq!(
            store.saved.lock().unwrap()[1].secure_json_data,
            Some(SecureJsonData {
                password: "s3cret".into()
            })
        );
        assert!(editor.password_configured());
        assert_eq!(editor.password_placeholder(), "configured");
        assert_eq!(editor.status().unwrap().message(), SAVE_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn payload_is_unpinned_and_keeps_scalars() {
        let store = MockStore::default();
        let mut editor = editor();
        editor.url = "https://scom.contoso.local".into();
        editor.user_name = "contoso\\svc".into();
        editor.skip_tls_verify = true;

        editor.save(&store).await.unwrap();

        let payload = store.saved.lock().unwrap()[0].clone();
        assert!(payload.enabled);
        assert!(!payload.pinned);
        assert_eq!(payload.json_data.user_name, "contoso\\svc");
        assert!(payload.json_data.is_skip_tls_verify_check);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let store = MockStore::default();
        *store.fail_with.lock().unwrap() = Some(PortError::Status {
            status: 403,
            message: "Permission denied".into(),
        });
        let mut editor = editor();
        editor.set_password("s3cret");

        assert!(editor.save(&store).await.is_err());
        assert_eq!(
            editor.status().unwrap().message(),
            "Failed to save settings: Permission denied (HTTP 403)"
        );
        assert!(!editor.password_configured());
    }

    #[test]
    fn reset_restores_default_vocabulary() {
        let mut editor = editor();
        editor.set_resolution_states_text("[]");
        editor.reset_resolution_states();
        assert_eq!(
            parse_resolution_states(editor.resolution_states_text()).unwrap(),
            default_resolution_states()
        );
    }
}
