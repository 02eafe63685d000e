//! Log command handlers.

use std::collections::HashSet;

use tabled::Tabled;
use zhome_core::{Console, Feed, HomeClient, LogEntry, LogFilter};

use crate::cli::{GlobalOpts, LogFilterArgs, LogsArgs, LogsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn row(entry: &LogEntry) -> LogRow {
    LogRow {
        time: entry.timestamp.clone().unwrap_or_default(),
        device: device_label(entry),
        level: output::level_label(entry.level, &entry.log_type, false),
        message: entry.message.clone(),
    }
}

fn device_label(entry: &LogEntry) -> String {
    if entry.display_name.is_empty() {
        entry.unit_id.clone()
    } else {
        entry.display_name.clone()
    }
}

/// One log line for streaming output.
fn line(entry: &LogEntry, color: bool) -> String {
    format!(
        "{} {} [{}] {}",
        entry.timestamp.as_deref().unwrap_or("-"),
        output::level_label(entry.level, &entry.log_type, color),
        device_label(entry),
        entry.message,
    )
}

/// Identity used to print each entry once while following.
fn entry_key(entry: &LogEntry) -> String {
    entry.id.as_ref().map_or_else(
        || {
            format!(
                "{}|{}|{}",
                entry.unit_id,
                entry.timestamp.as_deref().unwrap_or_default(),
                entry.message
            )
        },
        ToString::to_string,
    )
}

fn filter(args: LogFilterArgs) -> LogFilter {
    LogFilter {
        device: args.device,
        min_level: args.min_level,
        limit: args.limit,
    }
}

pub async fn handle(
    console: &Console<HomeClient>,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List(args) => {
            let filter = filter(args);
            console.refresh_once(Feed::Logs).await?;
            let snap = console.snapshot();
            let logs: Vec<LogEntry> = filter.apply(&snap.logs).into_iter().cloned().collect();
            let out = output::render_list(&global.output, &logs, row, |e| e.message.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LogsCommand::Watch(args) => watch(console, filter(args), global).await,
    }
}

/// Print entries as polls bring them in, until interrupted. Structured
/// formats emit one compact JSON document per entry.
async fn watch(
    console: &Console<HomeClient>,
    filter: LogFilter,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut rx = console.store().subscribe();
    console.start().await;

    let mut seen: HashSet<String> = HashSet::new();
    let mut last_refresh = None;
    loop {
        let state = rx.borrow_and_update().clone();
        let refreshed = state.refreshed_at(Feed::Logs);
        if refreshed.is_some() && refreshed != last_refresh {
            last_refresh = refreshed;
            for entry in filter.apply(&state.logs) {
                if !seen.insert(entry_key(entry)) {
                    continue;
                }
                let out = match global.output {
                    OutputFormat::Table | OutputFormat::Plain => line(entry, color),
                    _ => output::render_json_compact(entry),
                };
                output::print_output(&out, global.quiet);
            }
        }

        tokio::select! {
            () = util::interrupted() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhome_core::RecordId;

    fn entry(id: Option<i64>, message: &str) -> LogEntry {
        LogEntry {
            id: id.map(RecordId::Numeric),
            unit_id: "e661".into(),
            display_name: String::new(),
            message: message.into(),
            log_type: "warning".into(),
            level: 3,
            version: None,
            timestamp: Some("2024-05-01T10:00:00".into()),
        }
    }

    #[test]
    fn line_falls_back_to_unit_id() {
        assert_eq!(
            line(&entry(Some(1), "pin busy"), false),
            "2024-05-01T10:00:00 warning(3) [e661] pin busy"
        );
    }

    #[test]
    fn key_prefers_record_id() {
        assert_eq!(entry_key(&entry(Some(42), "a")), "42");
        assert_eq!(
            entry_key(&entry(None, "a")),
            "e661|2024-05-01T10:00:00|a"
        );
    }
}
