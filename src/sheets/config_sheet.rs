// ⚙️ Config Sheet - label-driven dashboard settings
//
// Layout: column A = label, column B = numeric value, column C = text value.
//   Total Aset Bruto   | Rp 150.000.000,00 |
//   Running_Text       |                   | Semangat nabung!
//   Foto Profil        |                   | https://drive.google.com/file/d/...

use super::labels::{apply_first_match, LabelRule};
use super::{SheetExtractor, SheetKind};
use crate::avatar::AvatarResolver;
use crate::currency::{parse_int_prefix, parse_rupiah};
use crate::tokenizer::Row;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RUNNING_TEXT: &str = "Rheiwa lagi di-update nih...";
pub const DEFAULT_DASHBOARD_NAME: &str = "Halo, Bekalaner! 👋";

// ============================================================================
// RECORD
// ============================================================================

/// ConfigRecord - everything the dashboard header and progress cards need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub total_gross_assets: f64,
    pub total_liabilities: f64,
    pub net_assets: f64,
    pub remaining_target: f64,
    pub ideal_target_days: i64,
    pub daily_rate: f64,
    pub target_asset: f64,

    /// Shown as-is, never parsed
    pub estimated_date: String,
    pub running_text: String,
    pub dashboard_name: String,
    pub contact_email: String,
    pub avatar_id: String,

    /// ISO-8601 UTC, millisecond precision
    pub last_updated: String,
}

impl ConfigRecord {
    /// Record with every field at its default
    pub fn with_defaults(default_target: f64, avatar_id: String, now: DateTime<Utc>) -> Self {
        ConfigRecord {
            total_gross_assets: 0.0,
            total_liabilities: 0.0,
            net_assets: 0.0,
            remaining_target: 0.0,
            ideal_target_days: 0,
            daily_rate: 0.0,
            target_asset: default_target,
            estimated_date: String::new(),
            running_text: DEFAULT_RUNNING_TEXT.to_string(),
            dashboard_name: DEFAULT_DASHBOARD_NAME.to_string(),
            contact_email: String::new(),
            avatar_id,
            last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Savings progress toward the target, 0-100 (0 when no target is set)
    pub fn progress_percent(&self) -> f64 {
        if self.target_asset <= 0.0 {
            return 0.0;
        }
        (self.net_assets / self.target_asset * 100.0).clamp(0.0, 100.0)
    }
}

// ============================================================================
// LABEL TABLES
// ============================================================================

/// Numeric rows, value in column B. Order matters: first match per row.
fn numeric_rules() -> [LabelRule<ConfigRecord>; 7] {
    [
        LabelRule { keyword: "total aset bruto", apply: |r, v| r.total_gross_assets = parse_rupiah(v) },
        LabelRule { keyword: "total liabilitas", apply: |r, v| r.total_liabilities = parse_rupiah(v) },
        LabelRule { keyword: "aset netto", apply: |r, v| r.net_assets = parse_rupiah(v) },
        LabelRule { keyword: "sisa target", apply: |r, v| r.remaining_target = parse_rupiah(v) },
        LabelRule { keyword: "target hari ideal", apply: |r, v| r.ideal_target_days = parse_int_prefix(v) },
        LabelRule { keyword: "daily rate", apply: |r, v| r.daily_rate = parse_rupiah(v) },
        LabelRule { keyword: "target aset", apply: |r, v| r.target_asset = parse_rupiah(v) },
    ]
}

/// Text rows, value in column C copied verbatim
fn text_rules() -> [LabelRule<ConfigRecord>; 4] {
    [
        LabelRule { keyword: "estimasi tercapai", apply: |r, v| r.estimated_date = v.to_string() },
        LabelRule { keyword: "running_text", apply: |r, v| r.running_text = v.to_string() },
        LabelRule { keyword: "nama_pengguna", apply: |r, v| r.dashboard_name = v.to_string() },
        LabelRule { keyword: "email_kontak", apply: |r, v| r.contact_email = v.to_string() },
    ]
}

// ============================================================================
// EXTRACTOR
// ============================================================================

pub struct ConfigSheet {
    resolver: AvatarResolver,
    default_target: f64,
}

impl ConfigSheet {
    pub fn new(resolver: AvatarResolver, default_target: f64) -> Self {
        ConfigSheet {
            resolver,
            default_target,
        }
    }

    /// Build the record with an explicit "now" for `last_updated`
    pub fn extract_at(&self, rows: &[Row], now: DateTime<Utc>) -> ConfigRecord {
        // Avatar search is its own pass: first valid labeled row wins
        let avatar_id = self.resolver.find_in_rows(rows);
        let mut record = ConfigRecord::with_defaults(self.default_target, avatar_id, now);

        let numeric = numeric_rules();
        let text = text_rules();
        let mut matched = 0usize;

        // Label pass: every match is applied, later rows overwrite earlier ones
        for row in rows {
            if row.len() < 2 {
                continue;
            }
            let label = row[0].to_lowercase();

            if apply_first_match(&numeric, &label, &mut record, &row[1]).is_some() {
                matched += 1;
            }

            if let Some(value) = row.get(2).filter(|v| !v.is_empty()) {
                if apply_first_match(&text, &label, &mut record, value).is_some() {
                    matched += 1;
                }
            }
        }

        tracing::debug!(rows = rows.len(), matched, "config sheet extracted");
        record
    }
}

impl SheetExtractor for ConfigSheet {
    type Output = ConfigRecord;

    fn kind(&self) -> SheetKind {
        SheetKind::Config
    }

    fn extract(&self, rows: &[Row]) -> ConfigRecord {
        self.extract_at(rows, Utc::now())
    }
}

// ============================================================================
// TESTS
// ============================================================================
