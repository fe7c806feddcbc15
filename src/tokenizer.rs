// 🧾 CSV Tokenizer - quote-aware line scanner
// Turns spreadsheet-exported text into rows of raw string fields

/// Row - one parsed CSV line, fields in column order
pub type Row = Vec<String>;

// ============================================================================
// SCANNER STATE
// ============================================================================

/// Scanner states for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// At the start of a field (line start or right after a comma)
    FieldStart,
    /// Inside a `"..."` span
    InQuoted,
    /// Inside a bare span, terminated by comma or end of line
    InUnquoted,
    /// Just saw a `"` while in a quoted span: either an escaped quote or the close
    AfterQuote,
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Split raw text into rows
///
/// The whole text is trimmed once (not per line), then split on `\n`.
/// A trailing `\r` on each line is dropped so Windows exports behave the same.
/// Rows keep whatever field count the line had; consumers validate lengths.
///
/// # Example:
/// ```
/// use savings_dashboard::tokenizer::parse_csv;
///
/// let rows = parse_csv("Tanggal,Nilai\n\"1 Jan, 2024\",\"Rp 1.000\"");
/// assert_eq!(rows[1], vec!["1 Jan, 2024", "Rp 1.000"]);
/// ```
pub fn parse_csv(text: &str) -> Vec<Row> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Tokenize a single line into fields
pub fn parse_line(line: &str) -> Row {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::FieldStart;

    for ch in line.chars() {
        state = match (state, ch) {
            (ScanState::FieldStart, '"') => ScanState::InQuoted,
            (ScanState::FieldStart, ',') => {
                fields.push(std::mem::take(&mut current));
                ScanState::FieldStart
            }
            (ScanState::FieldStart, c) => {
                current.push(c);
                ScanState::InUnquoted
            }

            (ScanState::InQuoted, '"') => ScanState::AfterQuote,
            (ScanState::InQuoted, c) => {
                current.push(c);
                ScanState::InQuoted
            }

            // `""` inside quotes is one literal quote
            (ScanState::AfterQuote, '"') => {
                current.push('"');
                ScanState::InQuoted
            }
            (ScanState::AfterQuote, ',') => {
                fields.push(std::mem::take(&mut current));
                ScanState::FieldStart
            }
            // Stray text after the closing quote stays in the same field
            (ScanState::AfterQuote, c) => {
                current.push(c);
                ScanState::InUnquoted
            }

            (ScanState::InUnquoted, ',') => {
                fields.push(std::mem::take(&mut current));
                ScanState::FieldStart
            }
            (ScanState::InUnquoted, c) => {
                current.push(c);
                ScanState::InUnquoted
            }
        };
    }

    // Whatever is open at end of line is the last field (also covers a trailing comma)
    fields.push(current);
    fields
}

/// Safe field access: missing columns read as empty
pub fn field(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

// ============================================================================
// TESTS
// ============================================================================
