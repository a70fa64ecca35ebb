use client_core::render::{render_row, RowView};
use shared::{domain::EmployeeId, protocol::Employee};

const HEADERS: [&str; 6] = ["", "Id", "Full Name", "Department", "Status", "Actions"];

fn cells(row: &RowView, selected: bool) -> [String; 6] {
    [
        if selected { "*".into() } else { String::new() },
        row.id.clone(),
        row.full_name.clone(),
        row.department.clone(),
        row.status.text.to_string(),
        row.actions.label().to_string(),
    ]
}

/// Plain-text grid; selected rows are marked with `*`.
pub fn render_table<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    selection: &[EmployeeId],
) -> String {
    let lines: Vec<[String; 6]> = rows
        .into_iter()
        .map(|employee| {
            let selected = employee.id.is_some_and(|id| selection.contains(&id));
            cells(&render_row(employee), selected)
        })
        .collect();

    if lines.is_empty() {
        return "(no rows)\n".to_string();
    }

    let mut widths = HEADERS.map(str::len);
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(String::from);
    for line in std::iter::once(&header).chain(lines.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}
