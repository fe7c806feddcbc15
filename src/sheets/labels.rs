// 🏷️ Label Rules - column A keyword → record field
//
// Config rows are identified by substring match on their lower-cased label.
// Each table is ordered: within ONE row the first matching rule applies
// (e.g. "sisa target aset" is a remaining-target row, not a target-asset row).
// Across rows every match is applied in row order, so the last row wins.

/// One keyword → setter entry
pub struct LabelRule<T> {
    /// Lower-case substring looked up in the label
    pub keyword: &'static str,

    /// Writes the cell value into the record
    pub apply: fn(&mut T, &str),
}

impl<T> LabelRule<T> {
    /// Check if the (already lower-cased) label carries this keyword
    pub fn matches(&self, label_lower: &str) -> bool {
        label_lower.contains(self.keyword)
    }
}

/// Apply the first rule whose keyword appears in the label
///
/// Returns the keyword that fired, if any.
pub fn apply_first_match<T>(
    rules: &[LabelRule<T>],
    label_lower: &str,
    target: &mut T,
    value: &str,
) -> Option<&'static str> {
    let rule = rules.iter().find(|rule| rule.matches(label_lower))?;
    (rule.apply)(target, value);
    Some(rule.keyword)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        hits: Vec<String>,
    }

    fn rules() -> Vec<LabelRule<Target>> {
        vec![
            LabelRule {
                keyword: "sisa target",
                apply: |t, v| t.hits.push(format!("sisa:{}", v)),
            },
            LabelRule {
                keyword: "target",
                apply: |t, v| t.hits.push(format!("target:{}", v)),
            },
        ]
    }

    #[test]
    fn test_first_rule_wins_within_a_row() {
        let mut target = Target::default();
        let fired = apply_first_match(&rules(), "sisa target aset", &mut target, "1");

        assert_eq!(fired, Some("sisa target"));
        assert_eq!(target.hits, vec!["sisa:1"]);
    }

    #[test]
    fn test_no_match_leaves_target_untouched() {
        let mut target = Target::default();
        assert_eq!(apply_first_match(&rules(), "catatan", &mut target, "x"), None);
        assert!(target.hits.is_empty());
    }

    #[test]
    fn test_matches_is_substring() {
        let rules = rules();
        let rule = &rules[1];
        assert!(rule.matches("target aset (rp)"));
        assert!(!rule.matches("tujuan"));
    }
}
