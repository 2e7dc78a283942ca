//! CLI presentation: text and json formatters.

use crate::cli::fixture::ImportSummary;
use crate::error::QueryError;
use crate::query::{Projection, StackVersionField};
use crate::types::LifecycleState;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::Value;

fn paint_state(state: &str, color: bool) -> String {
    if !color {
        return state.to_string();
    }
    match state.parse::<LifecycleState>() {
        Ok(LifecycleState::Current) => state.green().to_string(),
        Ok(LifecycleState::Installed) => state.cyan().to_string(),
        Ok(LifecycleState::Installing) => state.yellow().to_string(),
        Ok(LifecycleState::InstallFailed) | Ok(LifecycleState::OutOfSync) => {
            state.red().to_string()
        }
        Err(_) => state.to_string(),
    }
}

fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_cell(field: StackVersionField, value: Option<&Value>, color: bool) -> String {
    match (field, value) {
        (_, None) => "-".to_string(),
        (StackVersionField::State, Some(Value::String(state))) => paint_state(state, color),
        (StackVersionField::NodeStates, Some(Value::Object(buckets))) => buckets
            .iter()
            .map(|(state, nodes)| {
                let nodes = nodes.as_array().map(|n| render_list(n)).unwrap_or_default();
                format!("{}: {}", paint_state(state, color), nodes)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        (StackVersionField::Repositories, Some(Value::Array(repositories))) => {
            format!("{} repositories", repositories.len())
        }
        (_, Some(Value::Array(items))) => render_list(items),
        (_, Some(Value::String(text))) => text.clone(),
        (_, Some(other)) => other.to_string(),
    }
}

pub fn format_versions_text(projections: &[Projection], color: bool) -> String {
    if projections.is_empty() {
        return "No stack versions found.".to_string();
    }
    let columns: Vec<StackVersionField> = StackVersionField::ALL
        .iter()
        .copied()
        .filter(|field| projections.iter().any(|p| p.contains(*field)))
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(columns.iter().map(|field| field.name()).collect::<Vec<_>>());
    for projection in projections {
        table.add_row(
            columns
                .iter()
                .map(|field| render_cell(*field, projection.get(*field), color))
                .collect::<Vec<_>>(),
        );
    }
    format!("{}\n\nTotal: {} stack version(s)", table, projections.len())
}

pub fn format_versions_json(projections: &[Projection]) -> Result<String, QueryError> {
    serde_json::to_string_pretty(projections)
        .map_err(|e| QueryError::InvalidArgument(format!("Failed to render JSON: {}", e)))
}

pub fn format_import_summary(summary: &ImportSummary) -> String {
    format!(
        "Imported {} catalog entr{}, {} cluster version(s), {} node record(s)",
        summary.catalog_entries,
        if summary.catalog_entries == 1 { "y" } else { "ies" },
        summary.cluster_versions,
        summary.node_versions
    )
}
