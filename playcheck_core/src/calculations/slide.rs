//! # Slide Calculation
//!
//! Slide runout (EN 14960-1:2019 4.2.11) and slide platform containing walls
//! (4.2.9).
//!
//! ```text
//!   required runout = max(platform height × 0.5, 0.3m)  [+ 0.5m with a stop wall]
//! ```
//!
//! ## Missing measurements
//!
//! Boolean checks given a missing measurement answer `false`. Numeric
//! calculations given a missing measurement answer `None`, so callers can tell
//! "not assessed" apart from "fails".
//!
//! ## Example
//!
//! ```rust
//! use playcheck_core::calculations::slide::SlideCalculator;
//!
//! let slide = SlideCalculator::default();
//! assert_eq!(slide.calculate_runout_value(Some(2.5)), Some(1.25));
//! assert!(slide.meets_runout_requirements(Some(1.5), Some(2.5)));
//! assert!(!slide.meets_runout_requirements(None, Some(2.5)));
//! ```

use serde::{Deserialize, Serialize};

use crate::breakdown::{format_constant, format_number, round_to, FormulaBreakdown};
use crate::calculations::wall_height::{requirement_result, ContainmentRequirement};
use crate::calculations::{all_bands_pass, CalculationResult, RequiredValue};
use crate::constants::{ContainmentConstants, RunoutConstants, UserHeightBand};

/// Measurements of a slide as recorded during an inspection.
///
/// ## JSON Example
///
/// ```json
/// {
///   "platform_height": 2.5,
///   "runout": 1.5,
///   "wall_height": 1.8,
///   "permanent_roof": false,
///   "stop_wall": false
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideParameters {
    pub platform_height: Option<f64>,
    #[serde(default)]
    pub runout: Option<f64>,
    #[serde(default)]
    pub wall_height: Option<f64>,
    #[serde(default)]
    pub permanent_roof: Option<bool>,
    #[serde(default)]
    pub stop_wall: bool,
}

impl SlideParameters {
    /// Runout adequacy for the recorded measurements
    pub fn meets_runout_requirements(&self, slide: &SlideCalculator) -> bool {
        match (self.runout, self.required_runout_length(slide)) {
            (Some(runout), Some(required)) if runout.is_finite() => runout >= required,
            _ => false,
        }
    }

    pub fn required_runout_length(&self, slide: &SlideCalculator) -> Option<f64> {
        slide.required_runout(self.platform_height, self.stop_wall)
    }

    /// Wall adequacy for every user height band
    pub fn meets_wall_height_requirements(&self, slide: &SlideCalculator) -> bool {
        slide.meets_all_band_requirements(self.platform_height, self.wall_height, self.permanent_roof)
    }
}

/// Present and finite, otherwise treated as blank
fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Slide runout and containment calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlideCalculator {
    runout: RunoutConstants,
    containment: ContainmentConstants,
}

impl SlideCalculator {
    pub fn new(runout: RunoutConstants, containment: ContainmentConstants) -> Self {
        Self { runout, containment }
    }

    pub fn runout_constants(&self) -> &RunoutConstants {
        &self.runout
    }

    /// Minimum runout length for a platform height (no stop wall).
    ///
    /// `None` for a blank height. Zero is a real measurement and yields the
    /// absolute minimum.
    pub fn calculate_runout_value(&self, platform_height: Option<f64>) -> Option<f64> {
        self.required_runout(platform_height, false)
    }

    /// Minimum runout length, adding the stop-wall allowance when present.
    pub fn required_runout(&self, platform_height: Option<f64>, stop_wall: bool) -> Option<f64> {
        let platform_height = measured(platform_height)?;
        let base = (platform_height * self.runout.height_multiplier).max(self.runout.minimum_runout);
        let required = if stop_wall {
            base + self.runout.stop_wall_addition
        } else {
            base
        };
        Some(round_to(required, 2))
    }

    /// Whether the measured runout is long enough for the platform height.
    pub fn meets_runout_requirements(&self, runout: Option<f64>, platform_height: Option<f64>) -> bool {
        match (measured(runout), self.calculate_runout_value(platform_height)) {
            (Some(runout), Some(required)) => runout >= required,
            _ => false,
        }
    }

    /// Required runout with derivation.
    pub fn calculate_required_runout(&self, platform_height: f64, stop_wall: bool) -> CalculationResult {
        let r = &self.runout;
        let mut breakdown = FormulaBreakdown::new();

        let height_based = round_to(platform_height * r.height_multiplier, 2);
        let base = height_based.max(r.minimum_runout);

        breakdown.push(
            "50% calculation",
            format!(
                "{}m × {} = {}m",
                format_number(platform_height),
                format_constant(r.height_multiplier),
                format_number(height_based)
            ),
        );
        breakdown.push(
            "Minimum requirement",
            format!(
                "{}m ({}mm)",
                format_number(r.minimum_runout),
                format_number(r.minimum_runout * 1000.0)
            ),
        );
        breakdown.push(
            "Base runout",
            format!(
                "Maximum of {}m and {}m = {}m",
                format_number(height_based),
                format_number(r.minimum_runout),
                format_number(base)
            ),
        );

        let required = if stop_wall {
            let total = round_to(base + r.stop_wall_addition, 2);
            breakdown.push(
                "Stop-wall addition",
                format!(
                    "{}m + {}m = {}m",
                    format_number(base),
                    format_number(r.stop_wall_addition),
                    format_number(total)
                ),
            );
            total
        } else {
            base
        };

        CalculationResult::new(RequiredValue::Number(required), breakdown)
    }

    /// Containing wall adequacy for one user height.
    ///
    /// A missing argument fails the check. A missing roof status counts as no
    /// roof.
    pub fn meets_height_requirements(
        &self,
        platform_height: Option<f64>,
        user_height: Option<f64>,
        wall_height: Option<f64>,
        permanent_roof: Option<bool>,
    ) -> bool {
        let (Some(platform_height), Some(user_height), Some(wall_height)) =
            (measured(platform_height), measured(user_height), measured(wall_height))
        else {
            return false;
        };
        ContainmentRequirement::classify(&self.containment, platform_height, user_height)
            .is_met(wall_height, permanent_roof.unwrap_or(false))
    }

    /// Containing wall adequacy across every user height band, lowest first.
    /// Stops at the first band that fails.
    pub fn meets_all_band_requirements(
        &self,
        platform_height: Option<f64>,
        wall_height: Option<f64>,
        permanent_roof: Option<bool>,
    ) -> bool {
        all_bands_pass(|band| {
            self.meets_height_requirements(platform_height, Some(band.meters()), wall_height, permanent_roof)
        })
    }

    /// Slide containment check with derivation for one user height.
    pub fn calculate_height_requirements(
        &self,
        platform_height: f64,
        user_height: f64,
        wall_height: f64,
        permanent_roof: bool,
    ) -> CalculationResult {
        let (_, mut result) = requirement_result(
            &self.containment,
            platform_height,
            user_height,
            Some(wall_height),
            permanent_roof,
        );
        let passed = self.meets_height_requirements(
            Some(platform_height),
            Some(user_height),
            Some(wall_height),
            Some(permanent_roof),
        );
        result.value = RequiredValue::Verdict(passed);
        result
    }

    /// Slide containment across every band, with one derivation line per band
    /// evaluated. Bands after the first failure do not appear.
    pub fn calculate_all_band_requirements(
        &self,
        platform_height: f64,
        wall_height: f64,
        permanent_roof: bool,
    ) -> CalculationResult {
        let mut breakdown = FormulaBreakdown::new();
        breakdown.push("Platform height", format!("{}m", format_number(platform_height)));
        breakdown.push("Containing wall", format!("{}m", format_number(wall_height)));

        let passed = all_bands_pass(|band: UserHeightBand| {
            let requirement = ContainmentRequirement::classify(&self.containment, platform_height, band.meters());
            let ok = self.meets_height_requirements(
                Some(platform_height),
                Some(band.meters()),
                Some(wall_height),
                Some(permanent_roof),
            );
            let needed = match requirement.required_wall_height() {
                Some(h) if h > 0.0 && requirement.requires_roof() => {
                    format!("walls ≥ {}m and permanent roof", format_number(h))
                }
                Some(h) if h > 0.0 => format!("walls ≥ {}m", format_number(h)),
                Some(_) => "no walls required".to_string(),
                None => "not permitted".to_string(),
            };
            breakdown.push(
                format!("{} users", band),
                format!("{} - {}", needed, if ok { "pass" } else { "fail" }),
            );
            ok
        });

        CalculationResult::new(RequiredValue::Verdict(passed), breakdown)
    }
}
