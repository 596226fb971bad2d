use std::path::Path;

use serde::{Deserialize, Serialize};

use scom_core::settings::DEFAULT_PLUGIN_ID;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub host: HostSection,
    #[serde(default)]
    pub console: ConsoleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSection {
    #[serde(default = "default_host_url")]
    pub url: String,
    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,
    /// Service-account token sent as a bearer header.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            url: default_host_url(),
            plugin_id: default_plugin_id(),
            api_token: None,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSection {
    /// 0 disables auto-refresh in `watch`.
    #[serde(default)]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_show_context_menu")]
    pub show_context_menu: bool,
    /// SQLite URL for remembered criteria. Unset keeps them in memory only.
    #[serde(default)]
    pub session_db: Option<String>,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 0,
            show_context_menu: default_show_context_menu(),
            session_db: None,
        }
    }
}

fn default_host_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_plugin_id() -> String {
    DEFAULT_PLUGIN_ID.to_string()
}

fn default_show_context_menu() -> bool {
    true
}

impl ConsoleConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.host.url, "http://localhost:3000");
        assert_eq!(config.host.plugin_id, "opslogix-scomalerts-app");
        assert!(config.console.show_context_menu);
        assert_eq!(config.console.refresh_interval_secs, 0);
        assert!(config.console.session_db.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[host]
url = "https://grafana.contoso.local"
api_token = "glsa_abc"
accept_invalid_certs = true

[console]
refresh_interval_secs = 30
show_context_menu = false
session_db = "sqlite://scom-console.db?mode=rwc"
"#
        )
        .unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.host.url, "https://grafana.contoso.local");
        assert_eq!(config.host.api_token.as_deref(), Some("glsa_abc"));
        assert!(config.host.accept_invalid_certs);
        assert_eq!(config.console.refresh_interval_secs, 30);
        assert!(!config.console.show_context_menu);
        assert_eq!(
            config.console.session_db.as_deref(),
            Some("sqlite://scom-console.db?mode=rwc")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[console]\nrefresh_interval_secs = \"soon\"").unwrap();
        assert!(ConsoleConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_path_means_defaults() {
        let config = ConsoleConfig::load_or_default(None).unwrap();
        assert_eq!(config.host.plugin_id, DEFAULT_PLUGIN_ID);
    }
}
