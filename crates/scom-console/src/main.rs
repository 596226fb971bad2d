mod cli;
mod config;
mod output;
mod session;
mod watch;

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scom_adapters::http::{HostClient, HostConfig, HttpResourceClient, HttpSettingsStore};
use scom_app::datasource::ScomDataSource;
use scom_app::settings_editor::SettingsEditor;
use scom_app::table::{AlertTable, FetchOutcome, TableConfig};
use scom_core::alert::DataFrame;
use scom_core::ids::PluginId;
use scom_core::query::Query;
use scom_core::refresh::RefreshInterval;
use scom_core::settings::{ConnectionSettings, PanelOptions};
use scom_ports::outbound::SettingsStore;

use crate::cli::{Cli, Command, SaveArgs, SettingsCommand};
use crate::config::ConsoleConfig;
use crate::session::ConsoleSession;

type ConsoleTable = AlertTable<ScomDataSource<HttpResourceClient>, ConsoleSession>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("scom=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::load_or_default(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;
    apply_overrides(&mut config, &cli);

    let plugin_id = PluginId::parse(&config.host.plugin_id).context("host.plugin_id")?;
    let host = HostClient::new(&host_config(&config, &plugin_id))?;

    match cli.command {
        Command::Alerts { criteria } => {
            let table = open_table(&config, &host, &plugin_id).await?;
            table.mount().await;
            if let Some(criteria) = criteria {
                let mut editor = scom_app::query_editor::QueryEditor::new(
                    Some(Query::alerts("A", table.criteria())),
                    "A",
                    table.clone(),
                );
                editor.on_criteria_change(&criteria);
                editor.on_key_down("Enter").await?;
            }
            print_table(&table)?;
        }
        Command::Watch { interval } => {
            let interval = match interval {
                Some(value) => RefreshInterval::parse(&value)?,
                None => RefreshInterval::from_secs(config.console.refresh_interval_secs),
            };
            let table = open_table(&config, &host, &plugin_id).await?;
            watch::run(table, interval).await?;
        }
        Command::SetState {
            alert_id,
            resolution_state,
        } => {
            let table = open_table(&config, &host, &plugin_id).await?;
            let outcome = table
                .update_resolution_state(&alert_id, &resolution_state, Utc::now())
                .await;
            if let Some(notice) = table.snapshot(Utc::now()).notice {
                println!("{}", output::render_notice(&notice));
            }
            match outcome? {
                FetchOutcome::Failed(message) => bail!("refetch failed: {message}"),
                _ => print_table(&table)?,
            }
        }
        Command::Panel { frames } => {
            let table = open_table(&config, &host, &plugin_id).await?;
            let content = std::fs::read_to_string(&frames)
                .with_context(|| format!("reading {}", frames.display()))?;
            let frames: Vec<DataFrame> = serde_json::from_str(&content)?;
            let count = table.load_frames(&frames);
            tracing::info!(count, "frames loaded");
            print_table(&table)?;
        }
        Command::Settings(SettingsCommand::Show) => {
            let store = HttpSettingsStore::with_host(host);
            let meta = store.load(&plugin_id).await?;
            let editor = SettingsEditor::new(plugin_id, meta);
            print_settings(&editor);
        }
        Command::Settings(SettingsCommand::Save(args)) => {
            let store = HttpSettingsStore::with_host(host);
            let mut editor = SettingsEditor::load(&store, plugin_id).await?;
            apply_save_args(&mut editor, &args)?;

            let result = editor.save(&store).await;
            if let Some(status) = editor.status() {
                println!("{}", output::render_notice(status));
            }
            result?;
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut ConsoleConfig, cli: &Cli) {
    if let Some(url) = &cli.host.host_url {
        config.host.url = url.clone();
    }
    if let Some(plugin_id) = &cli.host.plugin_id {
        config.host.plugin_id = plugin_id.clone();
    }
    if let Some(token) = &cli.host.api_token {
        config.host.api_token = Some(token.clone());
    }
}

fn host_config(config: &ConsoleConfig, plugin_id: &PluginId) -> HostConfig {
    let mut host = HostConfig::new(config.host.url.clone(), plugin_id.clone());
    host.api_token = config.host.api_token.clone();
    host.accept_invalid_certs = config.host.accept_invalid_certs;
    host
}

async fn open_table(
    config: &ConsoleConfig,
    host: &HostClient,
    plugin_id: &PluginId,
) -> Result<ConsoleTable> {
    let settings = match HttpSettingsStore::with_host(host.clone())
        .load(plugin_id)
        .await
    {
        Ok(meta) => meta.json_data,
        Err(e) => {
            tracing::warn!(error = %e, "could not load plugin settings, using defaults");
            ConnectionSettings::default()
        }
    };
    let options = PanelOptions {
        show_context_menu: config.console.show_context_menu,
    };

    let source = ScomDataSource::new(HttpResourceClient::with_host(host.clone()));
    let session = ConsoleSession::open(config.console.session_db.as_deref()).await?;
    Ok(AlertTable::new(
        source,
        session,
        TableConfig::from_settings(&settings, options),
    ))
}

fn print_table(table: &ConsoleTable) -> Result<()> {
    let snapshot = table.snapshot(Utc::now());
    println!("{}", output::render_snapshot(&snapshot));
    if let Some(error) = snapshot.error {
        bail!(error);
    }
    Ok(())
}

fn print_settings(editor: &SettingsEditor) {
    let saved = editor.saved();
    println!("url:              {}", saved.url);
    println!("user name:        {}", saved.user_name);
    println!("skip TLS verify:  {}", saved.is_skip_tls_verify_check);
    println!("password:         {}", editor.password_placeholder());
    println!("resolution states:\n{}", editor.resolution_states_text());
    println!("columns:\n{}", editor.column_config_text());
}

fn apply_save_args(editor: &mut SettingsEditor, args: &SaveArgs) -> Result<()> {
    if let Some(url) = &args.url {
        editor.url = url.clone();
    }
    if let Some(user_name) = &args.user_name {
        editor.user_name = user_name.clone();
    }
    if let Some(skip) = args.skip_tls_verify {
        editor.skip_tls_verify = skip;
    }
    if let Some(password) = &args.password {
        editor.set_password(password.clone());
    }
    if let Some(path) = &args.resolution_states {
        editor.set_resolution_states_text(read_buffer(path)?);
    }
    if let Some(path) = &args.columns {
        editor.set_column_config_text(read_buffer(path)?);
    }
    if args.reset_resolution_states {
        editor.reset_resolution_states();
    }
    if args.reset_columns {
        editor.reset_column_config();
    }
    Ok(())
}

fn read_buffer(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
