use async_trait::async_trait;

use scom_ports::error::PortError;
use scom_ports::outbound::SessionStore;

use super::SqliteDb;

pub struct SqliteSessionStore {
    db: SqliteDb,
    scope: String,
}

impl SqliteSessionStore {
    pub fn new(db: SqliteDb, scope: impl Into<String>) -> Self {
        Self {
            db,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM session_values WHERE scope = ? AND key = ?")
                .bind(&self.scope)
                .bind(key)
                .fetch_optional(self.db.pool())
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        sqlx::query(
            "INSERT INTO session_values (scope, key, value) VALUES (?, ?, ?)
             ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value",
        )
        .bind(&self.scope)
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        tracing::debug!(scope = %self.scope, key, "session value stored");
        Ok(())
    }
}
