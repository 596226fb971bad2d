use serde_json::Value;

use scom_core::query::{AlertQuery, Query};
use scom_ports::inbound::QueryRunner;

use crate::error::AppError;

/// Edits the criteria of one panel query and hands it to the runner on commit.
pub struct QueryEditor<R>
where
    R: QueryRunner,
{
    query: Query,
    needs_default_run: bool,
    runner: R,
}

impl<R> QueryEditor<R>
where
    R: QueryRunner,
{
    /// `stored` is `None` when the host hands over a query without a type tag.
    pub fn new(stored: Option<Query>, ref_id: &str, runner: R) -> Self {
        let (query, needs_default_run) = match stored {
            Some(query) => (query, false),
            None => (Query::default_alerts(ref_id), true),
        };
        Self {
            query,
            needs_default_run,
            runner,
        }
    }

    pub fn from_stored(value: Value, ref_id: &str, runner: R) -> Result<Self, AppError> {
        let stored = Query::from_stored(value)?;
        Ok(Self::new(stored, ref_id, runner))
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn criteria(&self) -> &str {
        match &self.query {
            Query::Alerts(q) => q.criteria(),
            _ => "",
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the default query once if the stored query had to be replaced.
    pub async fn mount(&mut self) -> Result<bool, AppError> {
        if !self.needs_default_run {
            return Ok(false);
        }
        self.needs_default_run = false;
        tracing::debug!(ref_id = %self.query.ref_id(), "normalized untyped query to alerts default");
        self.run().await?;
        Ok(true)
    }

    /// Stores the text and forces the `alerts` tag. Does not run anything.
    pub fn on_criteria_change(&mut self, criteria: &str) {
        let ref_id = self.query.ref_id().to_string();
        self.query = Query::Alerts(AlertQuery {
            ref_id,
            criteria: Some(criteria.to_string()),
        });
    }

    pub async fn on_key_down(&self, key: &str) -> Result<bool, AppError> {
        if key != "Enter" {
            return Ok(false);
        }
        self.run().await?;
        Ok(true)
    }

    pub async fn on_blur(&self) -> Result<(), AppError> {
        self.run().await
    }

    async fn run(&self) -> Result<(), AppError> {
        self.runner.run_query(&self.query).await?;
        Ok(())
    }
}
