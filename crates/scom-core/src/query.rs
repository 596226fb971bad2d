use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

pub const DEFAULT_QUERY_CRITERIA: &str = "Severity = 2 AND ResolutionState = 0";

const KINDS: [&str; 3] = ["alerts", "state", "performance"];

/// Outbound query, tagged by `type` the same way the host stores it.
///
/// Only [`Query::Alerts`] has an editor and a backend call. The other variants exist so
/// stored queries round-trip, and are rejected by [`Query::as_alerts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Query {
    Alerts(AlertQuery),
    State(OpaqueQuery),
    Performance(OpaqueQuery),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueQuery {
    #[serde(default)]
    pub ref_id: String,
    #[serde(flatten)]
    pub rest: BTreeMap<String, Value>,
}

impl Query {
    pub fn alerts(ref_id: impl Into<String>, criteria: impl Into<String>) -> Self {
        Query::Alerts(AlertQuery {
            ref_id: ref_id.into(),
            criteria: Some(criteria.into()),
        })
    }

    pub fn default_alerts(ref_id: impl Into<String>) -> Self {
        Self::alerts(ref_id, DEFAULT_QUERY_CRITERIA)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Query::Alerts(_) => "alerts",
            Query::State(_) => "state",
            Query::Performance(_) => "performance",
        }
    }

    pub fn ref_id(&self) -> &str {
        match self {
            Query::Alerts(q) => &q.ref_id,
            Query::State(q) | Query::Performance(q) => &q.ref_id,
        }
    }

    pub fn as_alerts(&self) -> Result<&AlertQuery, DomainError> {
        match self {
            Query::Alerts(q) => Ok(q),
            other => Err(DomainError::UnsupportedQuery(other.kind().into())),
        }
    }

    /// Decodes a stored query. A value without a `type` tag yields `None` so the caller
    /// can substitute the default alerts query. An unknown tag is
    /// [`DomainError::UnsupportedQuery`]; a known tag with a malformed body is
    /// [`DomainError::InvalidQuery`].
    pub fn from_stored(value: Value) -> Result<Option<Self>, DomainError> {
        match value.get("type") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(tag)) if !KINDS.contains(&tag.as_str()) => {
                return Err(DomainError::UnsupportedQuery(tag.clone()));
            }
            Some(_) => {}
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }
}

impl AlertQuery {
    pub fn criteria(&self) -> &str {
        self.criteria.as_deref().unwrap_or("")
    }
}
