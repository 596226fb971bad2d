//! Shape checks for the two JSON buffers edited on the settings page.
//!
//! Errors name the buffer, the element index and the offending field, so an operator can
//! find the problem in a hand-edited array. Nothing is defaulted on failure.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::column::ColumnConfig;
use crate::resolution::ResolutionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBuffer {
    ResolutionStates,
    ColumnConfig,
}

impl fmt::Display for ConfigBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigBuffer::ResolutionStates => write!(f, "resolution states"),
            ConfigBuffer::ColumnConfig => write!(f, "column configuration"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}")]
    Syntax(String),
    #[error("{0} must be an array")]
    NotAnArray(&'static str),
    #[error("{item} at index {index} must be an object")]
    NotAnObject { item: &'static str, index: usize },
    #[error("{item} at index {index} is missing required field '{field}'")]
    MissingField {
        item: &'static str,
        index: usize,
        field: &'static str,
    },
    #[error("{item} at index {index}: '{field}' must be {expected}")]
    WrongType {
        item: &'static str,
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl ConfigError {
    pub fn index(&self) -> Option<usize> {
        match self {
            ConfigError::NotAnObject { index, .. }
            | ConfigError::MissingField { index, .. }
            | ConfigError::WrongType { index, .. } => Some(*index),
            ConfigError::Syntax(_) | ConfigError::NotAnArray(_) => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField { field, .. } | ConfigError::WrongType { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

/// A rejected buffer. Displays as the banner text shown to the operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {buffer} JSON: {source}")]
pub struct InvalidBuffer {
    pub buffer: ConfigBuffer,
    #[source]
    pub source: ConfigError,
}

pub fn parse_resolution_states(text: &str) -> Result<Vec<ResolutionState>, InvalidBuffer> {
    let wrap = |source| InvalidBuffer {
        buffer: ConfigBuffer::ResolutionStates,
        source,
    };
    let items = parse_array(text, "Resolution states").map_err(wrap)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(item, "State", index)?;
            Ok(ResolutionState {
                label: required_string(obj, "State", index, "label")?,
                value: required_string(obj, "State", index, "value")?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()
        .map_err(wrap)
}

pub fn parse_column_config(text: &str) -> Result<Vec<ColumnConfig>, InvalidBuffer> {
    let wrap = |source| InvalidBuffer {
        buffer: ConfigBuffer::ColumnConfig,
        source,
    };
    let items = parse_array(text, "Column configuration").map_err(wrap)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(item, "Column", index)?;
            Ok(ColumnConfig {
                id: required_string(obj, "Column", index, "id")?,
                label: required_string(obj, "Column", index, "label")?,
                visible: required_bool(obj, "Column", index, "visible")?,
                order: required_integer(obj, "Column", index, "order")?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()
        .map_err(wrap)
}

fn parse_array(text: &str, what: &'static str) -> Result<Vec<Value>, ConfigError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ConfigError::Syntax(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ConfigError::NotAnArray(what)),
    }
}

fn as_object<'a>(
    item: &'a Value,
    kind: &'static str,
    index: usize,
) -> Result<&'a Map<String, Value>, ConfigError> {
    item.as_object().ok_or(ConfigError::NotAnObject { item: kind, index })
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    item: &'static str,
    index: usize,
    field: &'static str,
) -> Result<&'a Value, ConfigError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ConfigError::MissingField { item, index, field }),
        Some(v) => Ok(v),
    }
}

fn required_string(
    obj: &Map<String, Value>,
    item: &'static str,
    index: usize,
    name: &'static str,
) -> Result<String, ConfigError> {
    match field(obj, item, index, name)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ConfigError::WrongType {
            item,
            index,
            field: name,
            expected: "a non-empty string",
        }),
    }
}

fn required_bool(
    obj: &Map<String, Value>,
    item: &'static str,
    index: usize,
    name: &'static str,
) -> Result<bool, ConfigError> {
    field(obj, item, index, name)?
        .as_bool()
        .ok_or(ConfigError::WrongType {
            item,
            index,
            field: name,
            expected: "a boolean",
        })
}

fn required_integer(
    obj: &Map<String, Value>,
    item: &'static str,
    index: usize,
    name: &'static str,
) -> Result<i64, ConfigError> {
    let value = field(obj, item, index, name)?;
    let wrong = |expected| ConfigError::WrongType {
        item,
        index,
        field: name,
        expected,
    };
    let number = match value {
        Value::Number(n) => n,
        _ => return Err(wrong("a number")),
    };
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    // 3.0 is accepted, 3.5 is not
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(wrong("an integer")),
    }
}
