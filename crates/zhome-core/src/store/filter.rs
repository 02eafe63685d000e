// ── Log filters ──
//
// Narrow a log snapshot without re-querying the backend.

use zhome_api::LogEntry;

/// Filter for log views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Match `unit_id` exactly or `display_name` ignoring case.
    pub device: Option<String>,
    /// Keep entries whose level is at least this.
    pub min_level: Option<u8>,
    /// Keep only the newest `limit` entries.
    pub limit: Option<usize>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let device_ok = self.device.as_deref().is_none_or(|d| {
            entry.unit_id == d || entry.display_name.eq_ignore_ascii_case(d)
        });
        let level_ok = self.min_level.is_none_or(|min| entry.level >= min);
        device_ok && level_ok
    }

    /// Matching entries, newest last, trimmed to `limit` from the end.
    pub fn apply<'a>(&self, logs: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        let matched: Vec<&LogEntry> = logs.iter().filter(|e| self.matches(e)).collect();
        match self.limit {
            Some(limit) if matched.len() > limit => matched[matched.len() - limit..].to_vec(),
            _ => matched,
        }
    }
}
