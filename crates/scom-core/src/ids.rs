use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Opaque string identifiers handed out by SCOM or the host. Only emptiness is checked.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::InvalidId(stringify!($name).into()));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(AlertId);
define_id!(PluginId);

impl PluginId {
    pub fn scom_alerts_app() -> Self {
        Self(crate::settings::DEFAULT_PLUGIN_ID.to_string())
    }
}
