use serde::{Deserialize, Serialize};

/// One renderable alert attribute and where it sits in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub label: String,
    pub visible: bool,
    pub order: i64,
}

impl ColumnConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>, visible: bool, order: i64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            visible,
            order,
        }
    }
}

pub fn default_column_config() -> Vec<ColumnConfig> {
    let mut columns: Vec<ColumnConfig> = [
        ("name", "Name"),
        ("time", "Time"),
        ("severity", "Severity"),
        ("object", "Object"),
        ("age", "Age"),
        ("resolutionState", "Resolution State"),
        ("id", "ID"),
        ("description", "Description"),
    ]
    .into_iter()
    .zip(0..)
    .map(|((id, label), order)| ColumnConfig::new(id, label, true, order))
    .collect();

    let hidden = [
        ("monitoringobjectpath", "Object Path"),
        ("priority", "Priority"),
        ("timeraised", "Time Raised"),
        ("timeadded", "Time Added"),
        ("timeresolved", "Time Resolved"),
        ("maintenancemode", "Maintenance Mode"),
        ("owner", "Owner"),
        ("context", "Context"),
    ];
    let next = columns.len() as i64;
    columns.extend(
        hidden
            .into_iter()
            .zip(next..)
            .map(|((id, label), order)| ColumnConfig::new(id, label, false, order)),
    );

    let next = columns.len() as i64;
    columns.extend((1..=10).zip(next..).map(|(n, order)| {
        ColumnConfig::new(
            format!("customfield{n}"),
            format!("Custom Field {n}"),
            false,
            order,
        )
    }));

    columns
}

/// Visible columns in display order. The sort is stable, so equal `order` values keep
/// their configured position.
pub fn visible_columns(columns: &[ColumnConfig]) -> Vec<&ColumnConfig> {
    let mut visible: Vec<&ColumnConfig> = columns.iter().filter(|c| c.visible).collect();
    visible.sort_by_key(|c| c.order);
    visible
}
