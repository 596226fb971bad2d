use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "scom-console", version, about = "Browse and triage SCOM alerts from a terminal")]
pub struct Cli {
    /// TOML config file with [host] and [console] sections.
    #[arg(long, short, env = "SCOM_CONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub host: HostArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the `[host]` section.
#[derive(Debug, Args)]
pub struct HostArgs {
    #[arg(long, env = "SCOM_HOST_URL", global = true)]
    pub host_url: Option<String>,
    #[arg(long, env = "SCOM_PLUGIN_ID", global = true)]
    pub plugin_id: Option<String>,
    #[arg(long, env = "SCOM_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    /// Fetch alerts once and print them.
    Alerts {
        /// Filter criteria; defaults to the last criteria used.
        #[arg(long)]
        criteria: Option<String>,
    },
    /// Interactive view with auto-refresh and resolution-state updates.
    Watch {
        /// Refresh interval such as 30s, 5m or off.
        #[arg(long)]
        interval: Option<String>,
    },
    /// Change one alert's resolution state.
    SetState { alert_id: String, resolution_state: String },
    /// Render a query-result file (JSON array of data frames).
    Panel { frames: PathBuf },
    /// Inspect or change the plugin's connection settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum SettingsCommand {
    Show,
    Save(SaveArgs),
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub user_name: Option<String>,
    #[arg(long)]
    pub skip_tls_verify: Option<bool>,
    /// Read from the environment so it never lands in shell history.
    #[arg(long, env = "SCOM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// File holding the resolution states JSON array.
    #[arg(long, conflicts_with = "reset_resolution_states")]
    pub resolution_states: Option<PathBuf>,
    /// File holding the column configuration JSON array.
    #[arg(long, conflicts_with = "reset_columns")]
    pub columns: Option<PathBuf>,
    #[arg(long)]
    pub reset_resolution_states: bool,
    #[arg(long)]
    pub reset_columns: bool,
}
