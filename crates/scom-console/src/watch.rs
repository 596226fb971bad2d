use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use scom_app::query_editor::QueryEditor;
use scom_app::table::{AlertTable, FetchOutcome, UpdateOutcome};
use scom_app::timer::{Refresh, RefreshTimer};
use scom_core::query::Query;
use scom_core::refresh::RefreshInterval;
use scom_ports::outbound::{AlertSource, SessionStore};

use crate::output;

const HELP: &str = "\
commands:
  refresh                   fetch now
  criteria <text>           set filter criteria and fetch
  interval <30s|5m|off>     change auto-refresh
  menu <row>                open the resolution-state menu for a row
  select <value>            apply a menu entry
  dismiss                   close the menu
  set <alert-id> <state>    update an alert directly
  show                      redraw
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Refresh,
    Criteria(String),
    Interval(RefreshInterval),
    Menu(i32),
    Select(String),
    Dismiss,
    Set { alert_id: String, state: String },
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<WatchCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" | "show" => WatchCommand::Show,
        "r" | "refresh" => WatchCommand::Refresh,
        "criteria" => WatchCommand::Criteria(rest.to_string()),
        "interval" => {
            WatchCommand::Interval(RefreshInterval::parse(rest).map_err(|e| e.to_string())?)
        }
        "menu" => {
            let row = rest
                .parse::<i32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("not a row number: {rest:?}"))?;
            WatchCommand::Menu(row)
        }
        "select" if !rest.is_empty() => WatchCommand::Select(rest.to_string()),
        "dismiss" | "esc" => WatchCommand::Dismiss,
        "set" => {
            let mut parts = rest.split_whitespace();
            WatchCommand::Set {
                alert_id: parts.next().unwrap_or_default().to_string(),
                state: parts.next().unwrap_or_default().to_string(),
            }
        }
        "help" | "?" => WatchCommand::Help,
        "q" | "quit" | "exit" => WatchCommand::Quit,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(command)
}

/// Timer target that redraws after every tick.
struct Redraw<S, K>
where
    S: AlertSource,
    K: SessionStore,
{
    table: AlertTable<S, K>,
}

#[async_trait]
impl<S, K> Refresh for Redraw<S, K>
where
    S: AlertSource + 'static,
    K: SessionStore + 'static,
{
    async fn refresh_tick(&self) {
        self.table.refresh_tick().await;
        println!("{}", output::render_snapshot(&self.table.snapshot(Utc::now())));
    }
}

pub async fn run<S, K>(table: AlertTable<S, K>, interval: RefreshInterval) -> anyhow::Result<()>
where
    S: AlertSource + 'static,
    K: SessionStore + 'static,
{
    report(table.mount().await);
    let mut editor = QueryEditor::new(
        Some(Query::alerts("A", table.criteria())),
        "A",
        table.clone(),
    );

    let redraw = Arc::new(Redraw {
        table: table.clone(),
    });
    let mut timer = RefreshTimer::new();
    timer.set_interval(interval, Arc::clone(&redraw));

    println!("{}", output::render_snapshot(&table.snapshot(Utc::now())));
    println!("auto-refresh: {}  (type help for commands)", timer.interval());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            WatchCommand::Quit => break,
            WatchCommand::Help => {
                println!("{HELP}");
                continue;
            }
            WatchCommand::Show => {}
            WatchCommand::Refresh => report(table.refresh().await),
            WatchCommand::Criteria(criteria) => {
                editor.on_criteria_change(&criteria);
                if let Err(e) = editor.on_key_down("Enter").await {
                    eprintln!("{e}");
                }
            }
            WatchCommand::Interval(interval) => {
                timer.set_interval(interval, Arc::clone(&redraw));
                println!("auto-refresh: {interval}");
            }
            WatchCommand::Menu(row) => {
                let snapshot = table.snapshot(Utc::now());
                let view = usize::try_from(row - 1)
                    .ok()
                    .and_then(|index| snapshot.rows.get(index));
                match view {
                    Some(view) => {
                        if !table.open_context_menu(0, row, &view.alert_id) {
                            eprintln!("context menu is disabled or the row has no id");
                        }
                    }
                    None => eprintln!("no row {row}"),
                }
            }
            WatchCommand::Select(value) => {
                match table.select_resolution_state(&value, Utc::now()).await {
                    UpdateOutcome::NoMenu => eprintln!("open a menu first"),
                    UpdateOutcome::Failed(message) => eprintln!("{message}"),
                    UpdateOutcome::Updated(outcome) => report(outcome),
                }
            }
            WatchCommand::Dismiss => table.dismiss_context_menu(),
            WatchCommand::Set { alert_id, state } => {
                if let Err(e) = table
                    .update_resolution_state(&alert_id, &state, Utc::now())
                    .await
                {
                    tracing::debug!(error = %e, "manual update failed");
                }
            }
        }

        println!("{}", output::render_snapshot(&table.snapshot(Utc::now())));
    }

    timer.cancel();
    Ok(())
}

fn report(outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Applied(count) => tracing::debug!(count, "fetch applied"),
        FetchOutcome::Failed(message) => tracing::debug!(%message, "fetch failed"),
        FetchOutcome::Superseded => tracing::debug!("fetch superseded"),
    }
}
