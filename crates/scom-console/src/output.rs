use comfy_table::{Cell, Color, Table};

use scom_app::table::TableSnapshot;
use scom_core::alert::Severity;
use scom_core::notice::{Notice, NoticeKind};

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .apply_modifier(comfy_table::modifiers::UTF8_SOLID_INNER_BORDERS);

    table.set_header(headers);
    table
}

fn severity_color(severity: Severity) -> Option<Color> {
    match severity {
        Severity::Critical => Some(Color::Red),
        Severity::Warning => Some(Color::Yellow),
        Severity::Information => Some(Color::Green),
        Severity::Unknown => None,
    }
}

/// Alert grid with a leading row number used by the `menu` command.
pub fn alerts_table(snapshot: &TableSnapshot) -> Table {
    let mut headers = vec!["#"];
    headers.extend(snapshot.headers.iter().map(String::as_str));
    let mut table = new_table(headers);

    for (n, row) in snapshot.rows.iter().enumerate() {
        let color = severity_color(row.severity);
        let mut cells = vec![Cell::new(n + 1)];
        cells.extend(row.cells.iter().map(|text| match color {
            Some(color) => Cell::new(text).fg(color),
            None => Cell::new(text),
        }));
        table.add_row(cells);
    }
    table
}

pub fn render_snapshot(snapshot: &TableSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("Criteria: {}\n", snapshot.criteria));

    if let Some(error) = &snapshot.error {
        out.push_str(&format!("Error: {error}\n"));
    }
    if let Some(notice) = &snapshot.notice {
        out.push_str(&render_notice(notice));
        out.push('\n');
    }

    match snapshot.placeholder() {
        Some(placeholder) => out.push_str(placeholder),
        None => out.push_str(&alerts_table(snapshot).to_string()),
    }
    out.push('\n');

    if let Some(menu) = &snapshot.menu {
        out.push_str(&format!(
            "Set resolution state for {} (at {},{}):\n",
            menu.alert_id, menu.x, menu.y
        ));
        for item in &snapshot.menu_items {
            out.push_str(&format!("  {:>5}  {}\n", item.value, item.label));
        }
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let prefix = match notice.kind() {
        NoticeKind::Success => "OK",
        NoticeKind::Warning => "Warning",
        NoticeKind::Error => "Error",
    };
    format!("{prefix}: {}", notice.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scom_app::table::{Phase, RowView};

    fn snapshot(rows: Vec<RowView>) -> TableSnapshot {
        TableSnapshot {
            phase: Phase::Loaded,
            criteria: "ResolutionState = 0".into(),
            headers: vec!["Name".into(), "Severity".into()],
            rows,
            error: None,
            notice: None,
            menu: None,
            menu_items: Vec::new(),
        }
    }

    #[test]
    fn empty_collection_shows_placeholder() {
        let text = render_snapshot(&snapshot(Vec::new()));
        assert!(text.contains("No alerts found"));
        assert!(text.starts_with("Criteria: ResolutionState = 0"));
    }

    #[test]
    fn rows_are_numbered() {
        let snap = snapshot(vec![RowView {
            alert_id: "a-1".into(),
            severity: Severity::Critical,
            cells: vec!["Disk full".into(), "2".into()],
        }]);
        let table = alerts_table(&snap);
        assert_eq!(table.row_count(), 1);

        let text = render_snapshot(&snap);
        assert!(text.contains("Disk full"));
        assert!(!text.contains("No alerts found"));
    }

    #[test]
    fn error_and_notice_are_listed() {
        let mut snap = snapshot(Vec::new());
        snap.error = Some("request failed: connection refused".into());
        snap.notice = Some(Notice::persistent(NoticeKind::Success, "saved"));

        let text = render_snapshot(&snap);
        assert!(text.contains("Error: request failed: connection refused"));
        assert!(text.contains("OK: saved"));
    }
}
