//! Alert table: owns the current alert collection, the filter criteria, the context menu
//! and the resolution-state update flow.
//!
//! Every fetch takes a token from a monotonically increasing counter and its result is
//! applied only while that token is still the latest one issued. A slow response can
//! therefore never overwrite the result of a newer fetch. The state mutex is never held
//! across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use scom_core::alert::{alerts_from_frames, Alert, DataFrame, Severity};
use scom_core::column::{visible_columns, ColumnConfig};
use scom_core::error::DomainError;
use scom_core::ids::AlertId;
use scom_core::notice::{Notice, NoticeKind};
use scom_core::query::Query;
use scom_core::resolution::ResolutionState;
use scom_core::settings::{ConnectionSettings, PanelOptions};
use scom_ports::error::PortError;
use scom_ports::inbound::QueryRunner;
use scom_ports::outbound::{AlertSource, SessionStore};

use crate::error::AppError;
use crate::timer::Refresh;

pub const CRITERIA_STORAGE_KEY: &str = "scom-alerts-criteria";
pub const DEFAULT_SESSION_CRITERIA: &str = "ResolutionState = 0";
pub const NO_ALERTS_MESSAGE: &str = "No alerts found";

const UPDATE_SUCCESS_MESSAGE: &str = "Resolution state updated successfully";

/// Configuration handed to the table at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub resolution_states: Vec<ResolutionState>,
    pub column_config: Vec<ColumnConfig>,
    pub options: PanelOptions,
}

impl TableConfig {
    pub fn from_settings(settings: &ConnectionSettings, options: PanelOptions) -> Self {
        Self {
            resolution_states: settings.resolution_states(),
            column_config: settings.column_config(),
            options,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::from_settings(&ConnectionSettings::default(), PanelOptions::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub x: i32,
    pub y: i32,
    pub alert_id: AlertId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied; carries the new row count.
    Applied(usize),
    /// The fetch failed; the previous collection is still shown.
    Failed(String),
    /// A newer fetch was issued while this one was in flight.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(FetchOutcome),
    Failed(String),
    NoMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub alert_id: String,
    pub severity: Severity,
    pub cells: Vec<String>,
}

/// Everything needed to draw the table once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub phase: Phase,
    pub criteria: String,
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub error: Option<String>,
    pub notice: Option<Notice>,
    pub menu: Option<ContextMenu>,
    pub menu_items: Vec<MenuItem>,
}

impl TableSnapshot {
    pub fn placeholder(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(NO_ALERTS_MESSAGE)
    }
}

struct TableState {
    alerts: Vec<Alert>,
    phase: Phase,
    criteria: String,
    error: Option<String>,
    notice: Option<Notice>,
    menu: Option<ContextMenu>,
    issued: u64,
}

pub struct AlertTable<S, K>
where
    S: AlertSource,
    K: SessionStore,
{
    source: Arc<S>,
    session: Arc<K>,
    config: Arc<TableConfig>,
    state: Arc<Mutex<TableState>>,
}

impl<S, K> Clone for AlertTable<S, K>
where
    S: AlertSource,
    K: SessionStore,
{
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            session: Arc::clone(&self.session),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S, K> AlertTable<S, K>
where
    S: AlertSource,
    K: SessionStore,
{
    pub fn new(source: S, session: K, config: TableConfig) -> Self {
        Self::from_shared(Arc::new(source), Arc::new(session), config)
    }

    pub fn from_shared(source: Arc<S>, session: Arc<K>, config: TableConfig) -> Self {
        Self {
            source,
            session,
            config: Arc::new(config),
            state: Arc::new(Mutex::new(TableState {
                alerts: Vec::new(),
                phase: Phase::Idle,
                criteria: DEFAULT_SESSION_CRITERIA.to_string(),
                error: None,
                notice: None,
                menu: None,
                issued: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Restores the last criteria from the session store and performs the first fetch.
    pub async fn mount(&self) -> FetchOutcome {
        let saved = match self.session.get(CRITERIA_STORAGE_KEY).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved criteria");
                None
            }
        };
        let criteria = saved
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_CRITERIA.to_string());
        self.lock().criteria = criteria;
        self.refresh().await
    }

    pub fn criteria(&self) -> String {
        self.lock().criteria.clone()
    }

    /// Stores new criteria for the next fetch and remembers them for the next session.
    pub async fn set_criteria(&self, criteria: &str) {
        self.lock().criteria = criteria.to_string();
        if let Err(e) = self.session.set(CRITERIA_STORAGE_KEY, criteria).await {
            tracing::warn!(error = %e, "could not persist criteria");
        }
    }

    pub async fn refresh(&self) -> FetchOutcome {
        let (token, criteria) = {
            let mut st = self.lock();
            st.issued += 1;
            st.phase = Phase::Loading;
            (st.issued, st.criteria.clone())
        };
        tracing::debug!(token, criteria = %criteria, "fetching alerts");

        let result = self.source.get_alerts(&criteria).await;

        let mut st = self.lock();
        if token != st.issued {
            tracing::debug!(token, latest = st.issued, "discarding stale alert response");
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(alerts) => {
                let count = alerts.len();
                st.alerts = alerts;
                st.phase = Phase::Loaded;
                st.error = None;
                tracing::info!(count, "alerts loaded");
                FetchOutcome::Applied(count)
            }
            Err(e) => {
                let message = failure_message(&e, "Failed to load alerts");
                tracing::warn!(error = %e, "alert fetch failed");
                st.phase = Phase::Error;
                st.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Replaces the collection from a host-delivered query result.
    pub fn load_frames(&self, frames: &[DataFrame]) -> usize {
        let alerts = alerts_from_frames(frames);
        let count = alerts.len();
        let mut st = self.lock();
        st.issued += 1;
        st.alerts = alerts;
        st.phase = Phase::Loaded;
        st.error = None;
        count
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    /// Records a right-click on a row. Refused when the panel disables the menu or the
    /// row has no id.
    pub fn open_context_menu(&self, x: i32, y: i32, alert_id: &str) -> bool {
        if !self.config.options.show_context_menu {
            return false;
        }
        let Ok(alert_id) = AlertId::parse(alert_id) else {
            return false;
        };
        self.lock().menu = Some(ContextMenu { x, y, alert_id });
        true
    }

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.lock().menu.clone()
    }

    pub fn dismiss_context_menu(&self) {
        self.lock().menu = None;
    }

    /// One entry per configured resolution state, in configured order.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        if self.lock().menu.is_none() {
            return Vec::new();
        }
        self.config
            .resolution_states
            .iter()
            .map(|s| MenuItem {
                label: s.label.clone(),
                value: s.value.clone(),
            })
            .collect()
    }

    /// Applies a context-menu choice to the alert the menu was opened on.
    pub async fn select_resolution_state(&self, value: &str, now: DateTime<Utc>) -> UpdateOutcome {
        let menu = self.lock().menu.clone();
        let Some(menu) = menu else {
            return UpdateOutcome::NoMenu;
        };

        match self.apply_update(&menu.alert_id, value, now).await {
            Ok(outcome) => UpdateOutcome::Updated(outcome),
            Err(e) => UpdateOutcome::Failed(failure_message(&e, "Failed to update resolution state")),
        }
    }

    /// Explicit update by id, as typed into the manual form.
    pub async fn update_resolution_state(
        &self,
        alert_id: &str,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, AppError> {
        let parsed = AlertId::parse(alert_id).ok();
        let (Some(alert_id), false) = (parsed, value.trim().is_empty()) else {
            let err = DomainError::MissingUpdateFields;
            self.lock().notice = Some(Notice::transient(NoticeKind::Warning, err.to_string(), now));
            return Err(err.into());
        };

        Ok(self.apply_update(&alert_id, value, now).await?)
    }

    async fn apply_update(
        &self,
        alert_id: &AlertId,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, PortError> {
        tracing::info!(alert_id = %alert_id, resolution_state = value, "updating resolution state");
        let result = self
            .source
            .update_alert_resolution_state(alert_id, value)
            .await;

        {
            let mut st = self.lock();
            st.menu = None;
            match &result {
                Ok(()) => {
                    st.notice = Some(Notice::transient(
                        NoticeKind::Success,
                        UPDATE_SUCCESS_MESSAGE,
                        now,
                    ));
                }
                Err(e) => {
                    tracing::warn!(alert_id = %alert_id, error = %e, "resolution state update failed");
                    st.notice = Some(Notice::transient(
                        NoticeKind::Error,
                        format!("Failed to update: {}", failure_message(e, "unknown error")),
                        now,
                    ));
                }
            }
        }

        result?;
        Ok(self.refresh().await)
    }

    /// Renderable view. Expired notices are dropped here.
    pub fn snapshot(&self, now: DateTime<Utc>) -> TableSnapshot {
        let columns = visible_columns(&self.config.column_config);
        let menu_items = self.menu_items();

        let mut st = self.lock();
        if st.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            st.notice = None;
        }

        let rows = st
            .alerts
            .iter()
            .map(|alert| RowView {
                alert_id: alert.id().to_string(),
                severity: alert.severity_class(),
                cells: columns
                    .iter()
                    .map(|c| alert.cell(&c.id).to_string())
                    .collect(),
            })
            .collect();

        TableSnapshot {
            phase: st.phase,
            criteria: st.criteria.clone(),
            headers: columns.iter().map(|c| c.label.clone()).collect(),
            rows,
            error: st.error.clone(),
            notice: st.notice.clone(),
            menu: st.menu.clone(),
            menu_items,
        }
    }
}

fn failure_message(err: &PortError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[async_trait]
impl<S, K> Refresh for AlertTable<S, K>
where
    S: AlertSource + 'static,
    K: SessionStore + 'static,
{
    async fn refresh_tick(&self) {
        if let FetchOutcome::Failed(message) = self.refresh().await {
            tracing::debug!(error = %message, "timed refresh failed");
        }
    }
}

#[async_trait]
impl<S, K> QueryRunner for AlertTable<S, K>
where
    S: AlertSource,
    K: SessionStore,
{
    async fn run_query(&self, query: &Query) -> Result<(), PortError> {
        let alerts = query
            .as_alerts()
            .map_err(|_| PortError::Unsupported(query.kind().to_string()))?;
        self.set_criteria(alerts.criteria()).await;
        self.refresh().await;
        Ok(())
    }
}
