// 📈 Yearly Series - chart points from the yearly sheet
//
// The series lives in columns F (date) and G (value) next to other tables,
// so there's no header skip: rows whose date doesn't parse just drop out.

use super::{SheetExtractor, SheetKind};
use crate::currency::parse_rupiah;
use crate::dates::parse_date_safe;
use crate::tokenizer::Row;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const YEARLY_MIN_FIELDS: usize = 7;
pub const YEARLY_DATE_COL: usize = 5;
pub const YEARLY_VALUE_COL: usize = 6;

/// YearlyPoint - one chart point (x = time, y = amount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyPoint {
    pub x: DateTime<Local>,
    pub y: f64,
}

pub struct YearlySheet;

impl YearlySheet {
    pub fn new() -> Self {
        YearlySheet
    }
}

impl Default for YearlySheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetExtractor for YearlySheet {
    type Output = Vec<YearlyPoint>;

    fn kind(&self) -> SheetKind {
        SheetKind::Yearly
    }

    fn extract(&self, rows: &[Row]) -> Vec<YearlyPoint> {
        let mut points: Vec<YearlyPoint> = rows
            .iter()
            .filter(|row| row.len() >= YEARLY_MIN_FIELDS)
            .filter_map(|row| {
                let x = parse_date_safe(&row[YEARLY_DATE_COL])?;
                Some(YearlyPoint {
                    x,
                    y: parse_rupiah(&row[YEARLY_VALUE_COL]),
                })
            })
            .collect();

        points.sort_by(|a, b| a.x.cmp(&b.x));

        tracing::debug!(rows = rows.len(), points = points.len(), "yearly series extracted");
        points
    }
}

// ============================================================================
// TESTS
// ============================================================================
