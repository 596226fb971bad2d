use async_trait::async_trait;

use scom_core::query::Query;

use crate::error::PortError;

/// Whatever executes a query once an editor submits it.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run_query(&self, query: &Query) -> Result<(), PortError>;
}
