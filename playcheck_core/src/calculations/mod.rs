//! # Compliance Calculations
//!
//! This module contains the EN 14960 calculators. Each one is a small `Copy`
//! value that captures its constants and exposes pure functions:
//!
//! - [`anchor`] - Annex A ground anchor count
//! - [`slide`] - Slide runout and slide containing walls
//! - [`wall_height`] - General containing walls and capacity per band
//! - [`user_capacity`] - Maximum users per height band
//!
//! Calculations that produce an audited figure return a [`CalculationResult`]:
//! the required value plus the ordered [`FormulaBreakdown`] that derived it.

pub mod anchor;
pub mod slide;
pub mod user_capacity;
pub mod wall_height;

use serde::{Deserialize, Serialize};

use crate::breakdown::FormulaBreakdown;
use crate::constants::UserHeightBand;

// Re-export commonly used types
pub use anchor::AnchorCalculator;
pub use slide::SlideCalculator;
pub use user_capacity::{CapacityResult, UserCapacityCalculator};
pub use wall_height::{BandAssessment, WallHeightAssessment, WallHeightCalculator};

/// The figure a calculation arrives at.
///
/// Serializes as a bare JSON number or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredValue {
    /// Whole counts (anchors, users)
    Count(u32),
    /// Measured quantities in metres
    Number(f64),
    /// Pass/fail determinations
    Verdict(bool),
}

impl RequiredValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RequiredValue::Count(n) => Some(f64::from(*n)),
            RequiredValue::Number(x) => Some(*x),
            RequiredValue::Verdict(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RequiredValue::Verdict(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequiredValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequiredValue::Count(n) => write!(f, "{}", n),
            RequiredValue::Number(x) => write!(f, "{}", crate::breakdown::format_number(*x)),
            RequiredValue::Verdict(true) => write!(f, "PASS"),
            RequiredValue::Verdict(false) => write!(f, "FAIL"),
        }
    }
}

/// Required value plus the derivation trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub value: RequiredValue,
    pub breakdown: FormulaBreakdown,
}

impl CalculationResult {
    pub fn new(value: RequiredValue, breakdown: FormulaBreakdown) -> Self {
        Self { value, breakdown }
    }
}

/// AND of `check` over every user height band in ascending order.
///
/// Returns at the first failing band; the remaining bands are never checked.
pub fn all_bands_pass<F>(mut check: F) -> bool
where
    F: FnMut(UserHeightBand) -> bool,
{
    for band in UserHeightBand::ALL {
        if !check(band) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_bands_pass_short_circuits() {
        let mut checked = Vec::new();
        let passed = all_bands_pass(|band| {
            checked.push(band);
            band < UserHeightBand::Band1200
        });
        assert!(!passed);
        // 1.0 passes, 1.2 fails, 1.5 and 1.8 never evaluated
        assert_eq!(checked, vec![UserHeightBand::Band1000, UserHeightBand::Band1200]);
    }

    #[test]
    fn test_all_bands_pass_visits_every_band() {
        let mut calls = 0;
        assert!(all_bands_pass(|_| {
            calls += 1;
            true
        }));
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_required_value_json() {
        assert_eq!(serde_json::to_string(&RequiredValue::Count(8)).unwrap(), "8");
        assert_eq!(serde_json::to_string(&RequiredValue::Number(1.25)).unwrap(), "1.25");
        assert_eq!(serde_json::to_string(&RequiredValue::Verdict(false)).unwrap(), "false");
    }

    #[test]
    fn test_required_value_display() {
        assert_eq!(RequiredValue::Number(1.5).to_string(), "1.5");
        assert_eq!(RequiredValue::Verdict(true).to_string(), "PASS");
    }
}
