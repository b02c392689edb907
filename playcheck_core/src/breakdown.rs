//! # Formula Breakdown
//!
//! The derivation trail that accompanies every safety result. Each entry is a
//! `(label, detail)` pair; entry order is part of the output contract because
//! report renderers embed the entries verbatim.
//!
//! Entries serialize as two-element JSON arrays:
//!
//! ```json
//! [["Front/back area", "4m (W) × 3m (H) = 12m²"], ["Sides area", "5m (L) × 3m (H) = 15m²"]]
//! ```
//!
//! Numbers are formatted by [`format_number`] and [`format_constant`] so that
//! identical inputs always yield byte-identical text.

use serde::{Deserialize, Serialize};

/// One line of a derivation trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "(String, String)", from = "(String, String)")]
pub struct BreakdownEntry {
    pub label: String,
    pub detail: String,
}

impl BreakdownEntry {
    pub fn new(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
        }
    }
}

impl From<(String, String)> for BreakdownEntry {
    fn from((label, detail): (String, String)) -> Self {
        Self { label, detail }
    }
}

impl From<BreakdownEntry> for (String, String) {
    fn from(entry: BreakdownEntry) -> Self {
        (entry.label, entry.detail)
    }
}

/// Ordered sequence of breakdown entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaBreakdown {
    entries: Vec<BreakdownEntry>,
}

impl FormulaBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line to the trail
    pub fn push(&mut self, label: impl Into<String>, detail: impl Into<String>) {
        self.entries.push(BreakdownEntry::new(label, detail));
    }

    /// Append every entry of another trail, preserving order
    pub fn extend(&mut self, other: FormulaBreakdown) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[BreakdownEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BreakdownEntry> {
        self.entries.iter()
    }

    /// Labels in order, mostly useful for assertions
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Look up the detail text for a label
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.detail.as_str())
    }
}

impl<'a> IntoIterator for &'a FormulaBreakdown {
    type Item = &'a BreakdownEntry;
    type IntoIter = std::slice::Iter<'a, BreakdownEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Number formatting
// ============================================================================

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Format a measured or derived quantity: rounded to 3 dp, no trailing zeros.
///
/// ```rust
/// use playcheck_core::breakdown::format_number;
///
/// assert_eq!(format_number(12.0), "12");
/// assert_eq!(format_number(1.5 * 1.25), "1.875");
/// assert_eq!(format_number(2.0 / 3.0), "0.667");
/// assert_eq!(format_number(0.30000000000000004), "0.3");
/// ```
pub fn format_number(value: f64) -> String {
    // + 0.0 folds -0.0 into 0.0
    format!("{}", round_to(value, 3) + 0.0)
}

/// Format a standard constant the way the standard prints it: always with a
/// decimal part (`114.0`, `1.5`, `1600.0`).
pub fn format_constant(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut breakdown = FormulaBreakdown::new();
        breakdown.push("b", "second");
        breakdown.push("a", "first");
        assert_eq!(breakdown.labels(), vec!["b", "a"]);
    }

    #[test]
    fn test_serializes_as_pairs() {
        let mut breakdown = FormulaBreakdown::new();
        breakdown.push("Sides area", "5m (L) × 3m (H) = 15m²");
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"[["Sides area","5m (L) × 3m (H) = 15m²"]]"#);

        let back: FormulaBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(back, breakdown);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 * 3.0), "0.3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_constant() {
        assert_eq!(format_constant(114.0), "114.0");
        assert_eq!(format_constant(1.5), "1.5");
        assert_eq!(format_constant(1600.0), "1600.0");
    }

    #[test]
    fn test_detail_lookup() {
        let mut breakdown = FormulaBreakdown::new();
        breakdown.push("Usable area", "18m²");
        assert_eq!(breakdown.detail("Usable area"), Some("18m²"));
        assert_eq!(breakdown.detail("Missing"), None);
    }
}
