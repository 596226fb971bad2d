use async_trait::async_trait;

use scom_adapters::persistence::memory::InMemorySessionStore;
use scom_adapters::persistence::sqlite::{SqliteDb, SqliteSessionStore};
use scom_ports::error::PortError;
use scom_ports::outbound::SessionStore;

const SESSION_SCOPE: &str = "scom-console";

/// Session storage picked from config: SQLite when `session_db` is set.
pub enum ConsoleSession {
    Sqlite(SqliteSessionStore),
    Memory(InMemorySessionStore),
}

impl ConsoleSession {
    pub async fn open(session_db: Option<&str>) -> Result<Self, PortError> {
        match session_db {
            Some(url) => {
                let db = SqliteDb::new(url).await?;
                tracing::debug!(url, "session values stored in sqlite");
                Ok(Self::Sqlite(db.session(SESSION_SCOPE)))
            }
            None => Ok(Self::Memory(InMemorySessionStore::new())),
        }
    }
}

#[async_trait]
impl SessionStore for ConsoleSession {
    async fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        match self {
            Self::Sqlite(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        match self {
            Self::Sqlite(store) => store.set(key, value).await,
            Self::Memory(store) => store.set(key, value).await,
        }
    }
}
