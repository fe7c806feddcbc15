// 🖼️ Avatar Resolver - Google Drive profile picture lookup
//
// The config sheet carries the profile picture as a Drive file id or a share
// link. This module finds it, validates it, normalizes it to a bare id and
// builds a displayable URL. When nothing usable exists the dashboard gets a
// generated initials avatar instead of a broken image.

use crate::config::DashboardConfig;
use crate::tokenizer::{field, Row};
use regex::Regex;
use std::sync::OnceLock;

/// Labels (lower-case substring match on column A) that mark an avatar row
pub const AVATAR_LABELS: &[&str] = &["avatar", "foto", "photo", "profile"];

/// Avatar cell in the stock sheet layout (row 12, column C)
pub const POSITIONAL_AVATAR_ROW: usize = 11;
pub const POSITIONAL_AVATAR_COL: usize = 2;

const DRIVE_THUMBNAIL_URL: &str = "https://drive.google.com/thumbnail";
const PLACEHOLDER_AVATAR_URL: &str = "https://ui-avatars.com/api/";

/// Shapes accepted by validation (all anchored at the start)
fn valid_shapes() -> &'static [Regex] {
    static SHAPES: OnceLock<Vec<Regex>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        [
            r"^[a-zA-Z0-9_-]{15,}$",
            r"^https?://drive\.google\.com/file/d/[a-zA-Z0-9_-]+",
            r"^https?://drive\.google\.com/thumbnail\?id=[a-zA-Z0-9_-]+",
            r"^https?://drive\.google\.com/open\?id=[a-zA-Z0-9_-]+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid drive id pattern"))
        .collect()
    })
}

/// Shapes stripped during extraction; group 1 is the id
fn extract_shapes() -> &'static [Regex] {
    static SHAPES: OnceLock<Vec<Regex>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        [
            r"https?://drive\.google\.com/file/d/([^/]+)",
            r"https?://drive\.google\.com/thumbnail\?id=([^&]+)",
            r"https?://drive\.google\.com/open\?id=([^&]+)",
            r"https?://drive\.google\.com/uc\?id=([^&]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid drive url pattern"))
        .collect()
    })
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Check whether a cell holds a usable Drive id or Drive link
///
/// Trimmed length must be 10..=50 characters with no spaces, and the value must
/// be either a bare token of 15+ `[A-Za-z0-9_-]` or one of the file/d,
/// thumbnail?id=, open?id= link shapes.
pub fn is_valid_drive_id(candidate: &str) -> bool {
    let id = candidate.trim();
    let len = id.chars().count();

    if !(10..=50).contains(&len) || id.contains(' ') {
        return false;
    }

    valid_shapes().iter().any(|re| re.is_match(id))
}

/// Initials for the placeholder avatar: "Jane Doe" → "JD", "budi@mail.com" → "B"
pub fn initials(user_name: Option<&str>) -> String {
    let name = user_name.filter(|n| !n.is_empty()).unwrap_or("User");
    let local_part = name.split('@').next().unwrap_or("");

    local_part
        .split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves avatar ids and URLs against the configured defaults
#[derive(Debug, Clone)]
pub struct AvatarResolver {
    default_id: String,
    thumbnail_size: String,
    placeholder_background: String,
    placeholder_color: String,
    placeholder_size: u32,
}

impl AvatarResolver {
    pub fn new(config: &DashboardConfig) -> Self {
        AvatarResolver {
            default_id: config.default_avatar_id.clone(),
            thumbnail_size: config.thumbnail_size.clone(),
            placeholder_background: config.placeholder_background.clone(),
            placeholder_color: config.placeholder_color.clone(),
            placeholder_size: config.placeholder_size,
        }
    }

    /// Configured fallback id
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Find the avatar id in the config sheet
    ///
    /// # Strategy:
    /// 1. First labeled row (avatar/foto/photo/profile) with a valid value;
    ///    column C is preferred over column B
    /// 2. Positional cell (row 12, column C)
    /// 3. Configured default
    pub fn find_in_rows(&self, rows: &[Row]) -> String {
        for (index, row) in rows.iter().enumerate() {
            let Some(label) = row.first() else { continue };
            let label = label.to_lowercase();
            if !AVATAR_LABELS.iter().any(|kw| label.contains(kw)) {
                continue;
            }

            for col in [2, 1] {
                let value = field(row, col).trim();
                if !value.is_empty() && is_valid_drive_id(value) {
                    tracing::debug!(row = index, col, "avatar id found in labeled row");
                    return value.to_string();
                }
            }
        }

        let positional = rows
            .get(POSITIONAL_AVATAR_ROW)
            .map(|row| field(row, POSITIONAL_AVATAR_COL).trim())
            .filter(|v| !v.is_empty());

        if let Some(value) = positional {
            if is_valid_drive_id(value) {
                tracing::debug!("avatar id taken from positional cell");
                return value.to_string();
            }
        }

        tracing::debug!("no avatar id in config sheet, using default");
        self.default_id.clone()
    }

    /// Reduce any accepted shape to the bare Drive id
    ///
    /// "https://drive.google.com/file/d/ID/view?usp=sharing" → "ID"
    pub fn extract_drive_id(&self, input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return self.default_id.clone();
        }

        let mut id = trimmed;
        for re in extract_shapes() {
            if let Some(m) = re.captures(trimmed).and_then(|caps| caps.get(1)) {
                id = m.as_str();
                break;
            }
        }

        let id = id.split('/').next().unwrap_or("");
        let id = id.split('?').next().unwrap_or("");

        if id.is_empty() {
            self.default_id.clone()
        } else {
            id.to_string()
        }
    }

    /// Drive thumbnail URL for a valid id, otherwise an initials placeholder
    pub fn avatar_url(&self, candidate: &str, user_name: Option<&str>) -> String {
        if !is_valid_drive_id(candidate) {
            return self.placeholder_url(user_name);
        }

        let id = self.extract_drive_id(candidate);
        format!("{}?id={}&sz={}", DRIVE_THUMBNAIL_URL, id, self.thumbnail_size)
    }

    /// Generated initials avatar
    pub fn placeholder_url(&self, user_name: Option<&str>) -> String {
        format!(
            "{}?name={}&background={}&color={}&bold=true&size={}",
            PLACEHOLDER_AVATAR_URL,
            urlencoding::encode(&initials(user_name)),
            self.placeholder_background,
            self.placeholder_color,
            self.placeholder_size,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_16: &str = "aB3dE5gH7jK9mN1p";

    fn resolver() -> AvatarResolver {
        AvatarResolver::new(&DashboardConfig::default())
    }

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_bare_token() {
        assert!(is_valid_drive_id(TOKEN_16));
        assert!(is_valid_drive_id("  1a_B-2c3D4e5F6g7  "));
    }

    #[test]
    fn test_valid_url_shapes() {
        assert!(is_valid_drive_id("https://drive.google.com/file/d/abc123XYZ/view"));
        assert!(is_valid_drive_id("https://drive.google.com/thumbnail?id=abc123XYZ"));
        assert!(is_valid_drive_id("http://drive.google.com/open?id=abc123XYZ"));
    }

    #[test]
    fn test_rejects_length_bounds() {
        assert!(!is_valid_drive_id("short"));
        assert!(!is_valid_drive_id("abcdefghi"));
        assert!(!is_valid_drive_id(&"a".repeat(51)));
        assert!(is_valid_drive_id(&"a".repeat(50)));
    }

    #[test]
    fn test_rejects_spaces_and_unknown_shapes() {
        assert!(!is_valid_drive_id("abcdefgh ijklmnopq"));
        // 10-14 char bare token: long enough overall, too short for the token shape
        assert!(!is_valid_drive_id("abcdefghij"));
        assert!(!is_valid_drive_id("https://example.com/image.png"));
        assert!(!is_valid_drive_id(""));
    }

    #[test]
    fn test_extract_from_links() {
        let r = resolver();
        assert_eq!(
            r.extract_drive_id("https://drive.google.com/file/d/FILE_id-123/view?usp=sharing"),
            "FILE_id-123"
        );
        assert_eq!(r.extract_drive_id("https://drive.google.com/thumbnail?id=THUMB123&sz=w1"), "THUMB123");
        assert_eq!(r.extract_drive_id("https://drive.google.com/open?id=OPEN123"), "OPEN123");
        assert_eq!(r.extract_drive_id("https://drive.google.com/uc?id=UC123&export=view"), "UC123");
        assert_eq!(r.extract_drive_id(TOKEN_16), TOKEN_16);
    }

    #[test]
    fn test_extract_truncates_and_falls_back() {
        let r = resolver();
        assert_eq!(r.extract_drive_id("abc/def"), "abc");
        assert_eq!(r.extract_drive_id("abc?x=1"), "abc");
        assert_eq!(r.extract_drive_id(""), r.default_id());
        assert_eq!(r.extract_drive_id("/leading"), r.default_id());
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials(Some("Jane Doe")), "JD");
        assert_eq!(initials(Some("budi santoso wijaya")), "BS");
        assert_eq!(initials(Some("siti@example.com")), "S");
        assert_eq!(initials(Some("  ana   maria ")), "AM");
        assert_eq!(initials(None), "U");
        assert_eq!(initials(Some("")), "U");
    }

    #[test]
    fn test_avatar_url_placeholder_for_invalid_id() {
        let url = resolver().avatar_url("not valid", Some("Jane Doe"));
        assert!(url.starts_with("https://ui-avatars.com/api/?name=JD&"));
        assert!(url.contains("background=667eea"));
        assert!(url.ends_with("size=150"));
    }

    #[test]
    fn test_avatar_url_thumbnail_for_valid_id() {
        let url = resolver().avatar_url("https://drive.google.com/file/d/abc123XYZ/view", None);
        assert_eq!(url, "https://drive.google.com/thumbnail?id=abc123XYZ&sz=w500");
    }

    #[test]
    fn test_find_prefers_column_c_then_b() {
        let rows = vec![
            row(&["Nama", "x", "Budi"]),
            row(&["Foto Profil", "bbbbbbbbbbbbbbbbbb", "cccccccccccccccccc"]),
        ];
        assert_eq!(resolver().find_in_rows(&rows), "cccccccccccccccccc");

        let rows = vec![row(&["Avatar", "bbbbbbbbbbbbbbbbbb", "nope"])];
        assert_eq!(resolver().find_in_rows(&rows), "bbbbbbbbbbbbbbbbbb");
    }

    #[test]
    fn test_find_first_labeled_row_wins() {
        let rows = vec![
            row(&["avatar", "", "firstfirstfirst1"]),
            row(&["profile", "", "secondsecondsec2"]),
        ];
        assert_eq!(resolver().find_in_rows(&rows), "firstfirstfirst1");
    }

    #[test]
    fn test_find_skips_labeled_row_without_valid_value() {
        let rows = vec![
            row(&["avatar", "tidak ada"]),
            row(&["PROFILE picture", "", "  secondsecondsec2  "]),
        ];
        assert_eq!(resolver().find_in_rows(&rows), "secondsecondsec2");
    }

    #[test]
    fn test_find_positional_fallback() {
        let mut rows: Vec<Row> = (0..11).map(|i| row(&[&format!("label {}", i), "1"])).collect();
        rows.push(row(&["unlabeled", "", "positionalpositional"]));
        assert_eq!(resolver().find_in_rows(&rows), "positionalpositional");
    }

    #[test]
    fn test_find_default_when_nothing_usable() {
        let r = resolver();
        assert_eq!(r.find_in_rows(&[]), r.default_id());
        assert_eq!(r.find_in_rows(&[row(&["avatar", "bad", "bad too"])]), r.default_id());
    }
}
