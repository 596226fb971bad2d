pub mod frame;
pub mod severity;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use frame::{alerts_from_frames, DataFrame, FrameField};
pub use severity::Severity;

/// One SCOM alert as returned by the `alerts` resource.
///
/// Every attribute is carried as display text. Missing or `null` attributes decode to the
/// empty string and numeric or boolean attributes are stringified, so a partially
/// populated payload never fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) severity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) object_display_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) age: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) resolution_state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) monitoring_object_path: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) priority: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) time_raised: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) time_added: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) time_resolved: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) maintenance_mode: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) owner: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) context: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field1: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field3: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field4: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field5: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field6: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field7: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field8: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field9: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) custom_field10: String,
}

impl Alert {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    pub fn severity_class(&self) -> Severity {
        Severity::from_code(&self.severity)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn object_display_name(&self) -> &str {
        &self.object_display_name
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn resolution_state(&self) -> &str {
        &self.resolution_state
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Cell text for a configured column id. Unknown ids render as an empty cell.
    pub fn cell(&self, column_id: &str) -> &str {
        match column_id.to_ascii_lowercase().as_str() {
            "name" => &self.name,
            // the time column shows the alert age
            "time" | "age" => &self.age,
            "severity" => &self.severity,
            "object" => &self.object_display_name,
            "resolutionstate" => &self.resolution_state,
            "id" => &self.id,
            "description" => &self.description,
            "monitoringobjectpath" => &self.monitoring_object_path,
            "priority" => &self.priority,
            "timeraised" => &self.time_raised,
            "timeadded" => &self.time_added,
            "timeresolved" => &self.time_resolved,
            "maintenancemode" => &self.maintenance_mode,
            "owner" => &self.owner,
            "context" => &self.context,
            "customfield1" => &self.custom_field1,
            "customfield2" => &self.custom_field2,
            "customfield3" => &self.custom_field3,
            "customfield4" => &self.custom_field4,
            "customfield5" => &self.custom_field5,
            "customfield6" => &self.custom_field6,
            "customfield7" => &self.custom_field7,
            "customfield8" => &self.custom_field8,
            "customfield9" => &self.custom_field9,
            "customfield10" => &self.custom_field10,
            _ => "",
        }
    }
}

pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}
