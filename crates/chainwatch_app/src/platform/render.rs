use std::fmt::Write;
use std::time::Duration;

use chainwatch_core::{AppViewModel, HealthCondition, RecordRowView};
use serde_json::Value;

const MAX_ROWS: usize = 20;

/// Text rendering of the dashboard. `next_refresh` is the time left on the
/// refresh timer, when it runs.
pub fn render(view: &AppViewModel, next_refresh: Option<Duration>) -> String {
    let mut out = String::new();

    let health = match view.health {
        None => "ok",
        Some(HealthCondition::BackendUnreachable) => "backend unreachable",
        Some(HealthCondition::ModelNotReady) => "model loading",
    };
    let _ = writeln!(
        out,
        "== chainwatch | health: {} | model: {}{}",
        health,
        if view.model_enabled { "on" } else { "off" },
        if view.loading { " | fetching..." } else { "" }
    );

    if let Some(advisory) = &view.advisory {
        let _ = writeln!(out, "!! {advisory}");
    }

    let Some(mode) = view.mode else {
        let _ = writeln!(out, "Pick a mode: `mode scheduled` or `mode realtime`");
        return out;
    };
    let _ = writeln!(out, "Mode: {mode} | blocks per fetch: {}", view.block_count);

    for option in &view.options {
        let marker = if view.selected_option == Some(option.id) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, " {marker} [{}] {}", option.id, option.name);
    }
    if view.selected_option.is_none() {
        let _ = writeln!(out, "Pick an option: `select <id>`");
    }

    let _ = writeln!(out, "Auto refresh: {}", refresh_line(view, next_refresh));

    if let Some(stats) = &view.stats {
        let _ = writeln!(out, "Stats: {}", compact(stats));
    }

    let _ = writeln!(out, "Records: {}", view.records.len());
    for row in view.records.iter().take(MAX_ROWS) {
        let _ = writeln!(out, "  {}", row_line(row));
    }
    if view.records.len() > MAX_ROWS {
        let _ = writeln!(out, "  ... {} older", view.records.len() - MAX_ROWS);
    }

    if let Some(detail) = &view.detail {
        let pretty = serde_json::to_string_pretty(detail).unwrap_or_else(|_| compact(detail));
        let _ = writeln!(out, "-- detail (`close` to hide)\n{pretty}");
    }

    out
}

fn refresh_line(view: &AppViewModel, next_refresh: Option<Duration>) -> String {
    if !view.auto_refresh {
        return "off".to_string();
    }
    let cadence = format!(
        "{} ({})",
        format_duration(Duration::from_millis(view.refresh_interval_ms)),
        view.frequency
    );
    match (view.refresh_armed, next_refresh) {
        (true, Some(left)) => format!("every {cadence}, next in {}", format_duration(left)),
        (true, None) => format!("every {cadence}"),
        (false, _) => format!("every {cadence}, waiting for a first fetch"),
    }
}

fn row_line(row: &RecordRowView) -> String {
    let key = row.key.as_deref().unwrap_or("(no hash)");
    let risk = ["risk_score", "fraud_probability", "score"]
        .iter()
        .find_map(|field| row.payload.get(*field))
        .map(compact);
    match risk {
        Some(risk) => format!("{key}  risk={risk}"),
        None => key.to_string(),
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 if secs % 60 == 0 => format!("{}m", secs / 60),
        60..=3599 => format!("{}m{:02}s", secs / 60, secs % 60),
        _ if secs % 3600 == 0 => format!("{}h", secs / 3600),
        _ => format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60),
    }
}
