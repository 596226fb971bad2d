use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{value_to_text, Alert};

/// Column-oriented query result as delivered by the host's query pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(default)]
    pub fields: Vec<FrameField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameField {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl DataFrame {
    /// Row count. Falls back to the longest field when the host omits `length`.
    pub fn len(&self) -> usize {
        self.length
            .unwrap_or_else(|| self.fields.iter().map(|f| f.values.len()).max().unwrap_or(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive field lookup by display name.
    pub fn field(&self, name: &str) -> Option<&FrameField> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    fn column(&self, name: &str, rows: usize) -> Vec<String> {
        match self.field(name) {
            Some(field) => (0..rows)
                .map(|i| field.values.get(i).map(value_to_text).unwrap_or_default())
                .collect(),
            None => vec![String::new(); rows],
        }
    }
}

/// Builds alerts from the first frame of a query result. Absent fields yield empty strings.
pub fn alerts_from_frames(frames: &[DataFrame]) -> Vec<Alert> {
    match frames.first() {
        Some(frame) => alerts_from_frame(frame),
        None => Vec::new(),
    }
}

pub fn alerts_from_frame(frame: &DataFrame) -> Vec<Alert> {
    let rows = frame.len();
    let mut ids = frame.column("id", rows).into_iter();
    let mut names = frame.column("name", rows).into_iter();
    let mut severities = frame.column("severity", rows).into_iter();
    let mut descriptions = frame.column("description", rows).into_iter();
    let mut objects = frame.column("object display name", rows).into_iter();
    let mut ages = frame.column("age", rows).into_iter();
    let mut states = frame.column("resolution state", rows).into_iter();
    let mut paths = frame.column("monitoring object path", rows).into_iter();
    let mut priorities = frame.column("priority", rows).into_iter();
    let mut raised = frame.column("time raised", rows).into_iter();
    let mut added = frame.column("time added", rows).into_iter();
    let mut resolved = frame.column("time resolved", rows).into_iter();
    let mut maintenance = frame.column("maintenance mode", rows).into_iter();
    let mut owners = frame.column("owner", rows).into_iter();
    let mut contexts = frame.column("context", rows).into_iter();
    let mut custom: Vec<std::vec::IntoIter<String>> = (1..=10)
        .map(|n| frame.column(&format!("custom field {n}"), rows).into_iter())
        .collect();

    let mut next_custom = |idx: usize| custom[idx].next().unwrap_or_default();

    (0..rows)
        .map(|_| Alert {
            id: ids.next().unwrap_or_default(),
            name: names.next().unwrap_or_default(),
            severity: severities.next().unwrap_or_default(),
            description: descriptions.next().unwrap_or_default(),
            object_display_name: objects.next().unwrap_or_default(),
            age: ages.next().unwrap_or_default(),
            resolution_state: states.next().unwrap_or_default(),
            monitoring_object_path: paths.next().unwrap_or_default(),
            priority: priorities.next().unwrap_or_default(),
            time_raised: raised.next().unwrap_or_default(),
            time_added: added.next().unwrap_or_default(),
            time_resolved: resolved.next().unwrap_or_default(),
            maintenance_mode: maintenance.next().unwrap_or_default(),
            owner: owners.next().unwrap_or_default(),
            context: contexts.next().unwrap_or_default(),
            custom_field1: next_custom(0),
            custom_field2: next_custom(1),
            custom_field3: next_custom(2),
            custom_field4: next_custom(3),
            custom_field5: next_custom(4),
            custom_field6: next_custom(5),
            custom_field7: next_custom(6),
            custom_field8: next_custom(7),
            custom_field9: next_custom(8),
            custom_field10: next_custom(9),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, values: Vec<Value>) -> FrameField {
        FrameField {
            name: name.into(),
            values,
        }
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let frame = DataFrame {
            fields: vec![
                field("ID", vec![json!("a-1"), json!("a-2")]),
                field("Object Display Name", vec![json!("web-01"), json!("db-01")]),
                field("Resolution State", vec![json!(0), json!(255)]),
            ],
            length: Some(2),
        };

        let alerts = alerts_from_frame(&frame);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id(), "a-1");
        assert_eq!(alerts[1].object_display_name(), "db-01");
        assert_eq!(alerts[1].resolution_state(), "255");
    }

    #[test]
    fn missing_field_is_empty_for_every_row() {
        let frame = DataFrame {
            fields: vec![field("id", vec![json!("a"), json!("b"), json!("c")])],
            length: Some(3),
        };

        let alerts = alerts_from_frame(&frame);
        assert_eq!(alerts.len(), 3);
        assert!(alerts.iter().all(|a| a.name().is_empty()));
        assert!(alerts.iter().all(|a| a.description().is_empty()));
        assert!(alerts.iter().all(|a| a.cell("customfield10").is_empty()));
    }

    #[test]
    fn short_field_pads_with_empty() {
        let frame = DataFrame {
            fields: vec![
                field("id", vec![json!("a"), json!("b")]),
                field("name", vec![json!("only one")]),
            ],
            length: None,
        };

        let alerts = alerts_from_frame(&frame);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].name(), "only one");
        assert_eq!(alerts[1].name(), "");
    }

    #[test]
    fn zero_severity_is_kept() {
        let frame = DataFrame {
            fields: vec![field("severity", vec![json!(0)])],
            length: Some(1),
        };
        let alerts = alerts_from_frame(&frame);
        assert_eq!(alerts[0].severity(), "0");
    }

    #[test]
    fn custom_fields_use_spaced_names() {
        let frame = DataFrame {
            fields: vec![field("Custom Field 7", vec![json!("x")])],
            length: Some(1),
        };
        let alerts = alerts_from_frame(&frame);
        assert_eq!(alerts[0].cell("customfield7"), "x");
    }

    #[test]
    fn no_frames_yields_no_alerts() {
        assert!(alerts_from_frames(&[]).is_empty());
    }
}
