use burgerlog_core::Record;

use crate::LedgerStats;

pub fn render_records(records: &[Record]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

pub fn render_stats(stats: &LedgerStats) -> String {
    serde_json::to_string_pretty(stats).unwrap_or_else(|_| "{}".to_string())
}
