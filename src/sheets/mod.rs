// 🗂️ Sheet Extractors - rows → typed dashboard records
// One extractor per exported sheet (config, log, yearly series)

pub mod config_sheet;
pub mod labels;
pub mod log_sheet;
pub mod yearly;

pub use config_sheet::{ConfigRecord, ConfigSheet};
pub use labels::LabelRule;
pub use log_sheet::{LogEntry, LogSheet};
pub use yearly::{YearlyPoint, YearlySheet};

use crate::tokenizer::Row;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SheetKind - which exported sheet a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Config,
    Log,
    Yearly,
}

impl SheetKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SheetKind::Config => "Konfigurasi",
            SheetKind::Log => "Log Tabungan",
            SheetKind::Yearly => "Rekap Tahunan",
        }
    }

    /// Default file name inside a data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SheetKind::Config => "config.csv",
            SheetKind::Log => "log.csv",
            SheetKind::Yearly => "yearly.csv",
        }
    }
}

/// SheetExtractor - builds one record shape from tokenized rows
///
/// Extraction never fails: bad cells degrade to defaults and bad rows are skipped.
pub trait SheetExtractor {
    type Output: Serialize;

    /// Sheet this extractor understands
    fn kind(&self) -> SheetKind;

    /// Build records from every row of the sheet (header included)
    fn extract(&self, rows: &[Row]) -> Self::Output;
}

// ============================================================================
// DETECTION
// ============================================================================

/// Detect the sheet kind from a file name
///
/// # Examples:
/// ```
/// use savings_dashboard::sheets::{detect_sheet, SheetKind};
/// use std::path::Path;
///
/// assert_eq!(detect_sheet(Path::new("Bekal - Config.csv")).unwrap(), SheetKind::Config);
/// assert_eq!(detect_sheet(Path::new("log_transaksi.csv")).unwrap(), SheetKind::Log);
/// assert_eq!(detect_sheet(Path::new("rekap-tahunan.csv")).unwrap(), SheetKind::Yearly);
/// ```
pub fn detect_sheet(file_path: &Path) -> Result<SheetKind> {
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let filename_lower = filename.to_lowercase();

    if filename_lower.contains("config") || filename_lower.contains("konfigurasi") {
        return Ok(SheetKind::Config);
    }

    // Yearly before log: "log_tahunan" is a yearly export
    if filename_lower.contains("yearly") || filename_lower.contains("tahunan") {
        return Ok(SheetKind::Yearly);
    }

    if filename_lower.contains("log") || filename_lower.contains("transaksi") {
        return Ok(SheetKind::Log);
    }

    Err(anyhow::anyhow!(
        "Could not detect sheet type from filename: {}",
        filename
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_sheet() {
        assert_eq!(detect_sheet(Path::new("data/config.csv")).unwrap(), SheetKind::Config);
        assert_eq!(detect_sheet(Path::new("KONFIGURASI.CSV")).unwrap(), SheetKind::Config);
        assert_eq!(detect_sheet(Path::new("log.csv")).unwrap(), SheetKind::Log);
        assert_eq!(detect_sheet(Path::new("transaksi-2024.csv")).unwrap(), SheetKind::Log);
        assert_eq!(detect_sheet(Path::new("yearly.csv")).unwrap(), SheetKind::Yearly);
        assert_eq!(detect_sheet(Path::new("log_tahunan.csv")).unwrap(), SheetKind::Yearly);
    }

    #[test]
    fn test_detect_sheet_unknown() {
        let err = detect_sheet(Path::new("notes.csv")).unwrap_err();
        assert!(err.to_string().contains("notes.csv"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SheetKind::Log.file_name(), "log.csv");
        assert_eq!(SheetKind::Yearly.name(), "Rekap Tahunan");
    }
}
