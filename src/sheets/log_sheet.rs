// 📒 Log Sheet - savings history, newest first
//
// Layout (header row skipped): Tanggal | Nilai | Perubahan | Keterangan

use super::{SheetExtractor, SheetKind};
use crate::currency::parse_rupiah;
use crate::dates::{format_display_date, parse_date_safe};
use crate::tokenizer::Row;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Minimum columns for a log row
pub const LOG_MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// "05 Mar 2024", or the raw cell when the date didn't parse
    pub date: String,

    /// Sort key; "now" for unparseable dates
    pub raw_date: DateTime<Local>,

    pub value: f64,
    pub change: f64,
    pub description: String,
}

pub struct LogSheet;

impl LogSheet {
    pub fn new() -> Self {
        LogSheet
    }

    /// Build entries with an explicit "now" for rows whose date didn't parse
    pub fn extract_at(&self, rows: &[Row], now: DateTime<Local>) -> Vec<LogEntry> {
        let mut entries: Vec<LogEntry> = rows
            .iter()
            .skip(1)
            .filter_map(|row| Self::entry_from_row(row, now))
            .collect();

        // Stable: equal timestamps keep sheet order
        entries.sort_by(|a, b| b.raw_date.cmp(&a.raw_date));

        tracing::debug!(
            rows = rows.len().saturating_sub(1),
            entries = entries.len(),
            "log sheet extracted"
        );
        entries
    }

    fn entry_from_row(row: &Row, now: DateTime<Local>) -> Option<LogEntry> {
        if row.len() < LOG_MIN_FIELDS || row[0].is_empty() {
            return None;
        }

        let raw = &row[0];
        let parsed = parse_date_safe(raw);
        if parsed.is_none() {
            tracing::debug!(date = %raw, "unparseable log date, showing raw text");
        }

        let description = if row[3].is_empty() {
            "-".to_string()
        } else {
            row[3].clone()
        };

        Some(LogEntry {
            date: parsed
                .as_ref()
                .map(format_display_date)
                .unwrap_or_else(|| raw.clone()),
            raw_date: parsed.unwrap_or(now),
            value: parse_rupiah(&row[1]),
            change: parse_rupiah(&row[2]),
            description,
        })
    }
}

impl Default for LogSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetExtractor for LogSheet {
    type Output = Vec<LogEntry>;

    fn kind(&self) -> SheetKind {
        SheetKind::Log
    }

    fn extract(&self, rows: &[Row]) -> Vec<LogEntry> {
        self.extract_at(rows, Local::now())
    }
}

// ============================================================================
// TESTS
// ============================================================================
