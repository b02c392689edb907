//! # Containing Wall Height
//!
//! Containing wall adequacy per EN 14960-1:2019 4.2.9, and the per-band
//! capacity figures that accompany it on an inspection record.
//!
//! The required wall height depends on the platform height range:
//!
//! | Platform height | Requirement |
//! |---|---|
//! | ≤ 0.6m | No containing walls |
//! | ≤ 3.0m | Walls ≥ user height |
//! | ≤ 6.0m | Walls ≥ user height × 1.25 |
//! | ≤ 8.0m | Walls ≥ user height × 1.25 and a permanent roof |
//! | > 8.0m | Not permitted |
//!
//! [`ContainmentRequirement`] carries this rule; [`crate::calculations::slide`]
//! applies the same rule to slide platforms.
//!
//! ## Example
//!
//! ```rust
//! use playcheck_core::calculations::wall_height::{WallHeightCalculator, WallHeightInput};
//!
//! let input = WallHeightInput {
//!     platform_height: 2.0,
//!     containing_wall_height: 1.6,
//!     permanent_roof: false,
//!     length: 5.0,
//!     width: 4.0,
//!     negative_adjustment: 0.0,
//! };
//! let assessment = WallHeightCalculator::default().assess(&input);
//! // 1.6m walls contain 1.0, 1.2 and 1.5m users but not 1.8m users
//! assert!(!assessment.all_bands_pass);
//! assert_eq!(assessment.bands[0].capacity, 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::breakdown::{format_constant, format_number, FormulaBreakdown};
use crate::calculations::user_capacity::{PlayArea, UserCapacityCalculator};
use crate::calculations::{CalculationResult, RequiredValue};
use crate::constants::{CapacityConstants, ContainmentConstants, UserHeightBand};

/// What 4.2.9 demands of a platform for one user height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContainmentRequirement {
    NoWallsRequired,
    Walls { required_height: f64 },
    EnhancedWalls { required_height: f64 },
    WallsAndRoof { required_height: f64 },
    NotPermitted,
}

impl ContainmentRequirement {
    /// Classify a platform height for a user height.
    pub fn classify(constants: &ContainmentConstants, platform_height: f64, user_height: f64) -> Self {
        let enhanced = user_height * constants.enhanced_height_multiplier;
        if platform_height <= constants.no_walls_required {
            ContainmentRequirement::NoWallsRequired
        } else if platform_height <= constants.basic_walls {
            ContainmentRequirement::Walls { required_height: user_height }
        } else if platform_height <= constants.enhanced_walls {
            ContainmentRequirement::EnhancedWalls { required_height: enhanced }
        } else if platform_height <= constants.max_safe_height {
            ContainmentRequirement::WallsAndRoof { required_height: enhanced }
        } else {
            ContainmentRequirement::NotPermitted
        }
    }

    /// Minimum containing wall height, if walls are what is being asked for
    pub fn required_wall_height(&self) -> Option<f64> {
        match self {
            ContainmentRequirement::NoWallsRequired => Some(0.0),
            ContainmentRequirement::Walls { required_height }
            | ContainmentRequirement::EnhancedWalls { required_height }
            | ContainmentRequirement::WallsAndRoof { required_height } => Some(*required_height),
            ContainmentRequirement::NotPermitted => None,
        }
    }

    pub fn requires_roof(&self) -> bool {
        matches!(self, ContainmentRequirement::WallsAndRoof { .. })
    }

    /// Whether a wall of `wall_height` (and the roof status) satisfies this requirement
    pub fn is_met(&self, wall_height: f64, permanent_roof: bool) -> bool {
        match self {
            ContainmentRequirement::NoWallsRequired => true,
            ContainmentRequirement::Walls { required_height }
            | ContainmentRequirement::EnhancedWalls { required_height } => wall_height >= *required_height,
            ContainmentRequirement::WallsAndRoof { required_height } => {
                permanent_roof && wall_height >= *required_height
            }
            ContainmentRequirement::NotPermitted => false,
        }
    }
}

/// Containment rule with its derivation trail.
///
/// Shared by the slide and general wall calculators so both print the same
/// lines for the same inputs.
pub(crate) fn requirement_result(
    constants: &ContainmentConstants,
    platform_height: f64,
    user_height: f64,
    wall_height: Option<f64>,
    permanent_roof: bool,
) -> (ContainmentRequirement, CalculationResult) {
    let c = constants;
    let requirement = ContainmentRequirement::classify(c, platform_height, user_height);
    let mut breakdown = FormulaBreakdown::new();

    breakdown.push("Platform height", format!("{}m", format_number(platform_height)));
    breakdown.push("User height", format!("{}m", format_number(user_height)));

    let value = match requirement {
        ContainmentRequirement::NoWallsRequired => {
            breakdown.push("Height range", format!("Up to {}m", format_constant(c.no_walls_required)));
            breakdown.push("Required wall height", "No containing walls required");
            RequiredValue::Number(0.0)
        }
        ContainmentRequirement::Walls { required_height } => {
            breakdown.push(
                "Height range",
                format!("{}m - {}m", format_constant(c.no_walls_required), format_constant(c.basic_walls)),
            );
            breakdown.push(
                "Required wall height",
                format!("{}m (user height)", format_number(required_height)),
            );
            RequiredValue::Number(required_height)
        }
        ContainmentRequirement::EnhancedWalls { required_height }
        | ContainmentRequirement::WallsAndRoof { required_height } => {
            let (low, high) = if requirement.requires_roof() {
                (c.enhanced_walls, c.max_safe_height)
            } else {
                (c.basic_walls, c.enhanced_walls)
            };
            breakdown.push(
                "Height range",
                format!("{}m - {}m", format_constant(low), format_constant(high)),
            );
            breakdown.push(
                "Required wall height",
                format!(
                    "{}m × {} = {}m",
                    format_number(user_height),
                    format_constant(c.enhanced_height_multiplier),
                    format_number(required_height)
                ),
            );
            if requirement.requires_roof() {
                breakdown.push(
                    "Permanent roof",
                    format!("Required above {}m", format_constant(c.enhanced_walls)),
                );
            }
            RequiredValue::Number(required_height)
        }
        ContainmentRequirement::NotPermitted => {
            breakdown.push("Height range", format!("Above {}m", format_constant(c.max_safe_height)));
            breakdown.push(
                "Required wall height",
                format!(
                    "Platforms above {}m are not permitted",
                    format_constant(c.max_safe_height)
                ),
            );
            RequiredValue::Verdict(false)
        }
    };

    if let (Some(wall), Some(required)) = (wall_height, requirement.required_wall_height()) {
        if required > 0.0 {
            let verdict = if wall >= required {
                format!("{}m ≥ {}m - meets requirement", format_number(wall), format_number(required))
            } else {
                format!("{}m < {}m - below requirement", format_number(wall), format_number(required))
            };
            breakdown.push("Containing wall", verdict);
        }
        if requirement.requires_roof() {
            let status = if permanent_roof { "Permanent roof fitted" } else { "No permanent roof" };
            breakdown.push("Roof status", status);
        }
    }

    (requirement, CalculationResult::new(value, breakdown))
}

/// Inputs for a general containing-wall assessment.
///
/// ## JSON Example
///
/// ```json
/// {
///   "platform_height": 2.0,
///   "containing_wall_height": 1.6,
///   "permanent_roof": false,
///   "length": 5.0,
///   "width": 4.0,
///   "negative_adjustment": 0.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallHeightInput {
    pub platform_height: f64,
    pub containing_wall_height: f64,
    #[serde(default)]
    pub permanent_roof: bool,
    /// Play area length (m)
    pub length: f64,
    /// Play area width (m)
    pub width: f64,
    /// Area taken up by obstacles (m²)
    #[serde(default)]
    pub negative_adjustment: f64,
}

impl WallHeightInput {
    pub fn play_area(&self) -> PlayArea {
        PlayArea {
            length: self.length,
            width: self.width,
            negative_adjustment: self.negative_adjustment,
        }
    }
}

/// Outcome for one user height band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandAssessment {
    pub user_height: UserHeightBand,
    pub meets_requirements: bool,
    /// None when the platform is not permitted at any wall height
    pub required_wall_height: Option<f64>,
    /// Maximum users of this height the play area can hold
    pub capacity: u32,
}

/// Every band plus the aggregate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallHeightAssessment {
    pub usable_area: f64,
    pub bands: Vec<BandAssessment>,
    pub all_bands_pass: bool,
}

impl WallHeightAssessment {
    /// Derivation trail: usable area, then one line per band
    pub fn breakdown(&self) -> FormulaBreakdown {
        let mut breakdown = FormulaBreakdown::new();
        breakdown.push("Usable area", format!("{}m²", format_number(self.usable_area)));
        for band in &self.bands {
            let wall = match band.required_wall_height {
                Some(h) if h > 0.0 => format!("walls ≥ {}m", format_number(h)),
                Some(_) => "no walls required".to_string(),
                None => "not permitted".to_string(),
            };
            let verdict = if band.meets_requirements { "pass" } else { "fail" };
            breakdown.push(
                format!("{} users", band.user_height),
                format!("{} - {}, capacity {}", wall, verdict, band.capacity),
            );
        }
        breakdown
    }
}

impl From<WallHeightAssessment> for CalculationResult {
    fn from(assessment: WallHeightAssessment) -> Self {
        let breakdown = assessment.breakdown();
        CalculationResult::new(RequiredValue::Verdict(assessment.all_bands_pass), breakdown)
    }
}

/// General containing wall calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallHeightCalculator {
    containment: ContainmentConstants,
    capacity: UserCapacityCalculator,
}

impl WallHeightCalculator {
    pub fn new(containment: ContainmentConstants, capacity: CapacityConstants) -> Self {
        Self {
            containment,
            capacity: UserCapacityCalculator::new(capacity),
        }
    }

    pub fn containment(&self) -> &ContainmentConstants {
        &self.containment
    }

    /// Required containing wall height for one user height, with derivation.
    pub fn calculate_wall_height_requirements(
        &self,
        platform_height: f64,
        user_height: f64,
        containing_wall_height: Option<f64>,
        permanent_roof: bool,
    ) -> CalculationResult {
        requirement_result(
            &self.containment,
            platform_height,
            user_height,
            containing_wall_height,
            permanent_roof,
        )
        .1
    }

    /// Whether the containing wall is adequate for one band
    pub fn meets_band_requirements(
        &self,
        band: UserHeightBand,
        platform_height: f64,
        containing_wall_height: f64,
        permanent_roof: bool,
    ) -> bool {
        if !(platform_height.is_finite() && containing_wall_height.is_finite()) {
            return false;
        }
        ContainmentRequirement::classify(&self.containment, platform_height, band.meters())
            .is_met(containing_wall_height, permanent_roof)
    }

    /// Pass/fail and capacity for one band
    pub fn assess_band(&self, band: UserHeightBand, input: &WallHeightInput) -> BandAssessment {
        let requirement =
            ContainmentRequirement::classify(&self.containment, input.platform_height, band.meters());
        let usable_area = input.play_area().usable_area();
        BandAssessment {
            user_height: band,
            meets_requirements: self.meets_band_requirements(
                band,
                input.platform_height,
                input.containing_wall_height,
                input.permanent_roof,
            ),
            required_wall_height: requirement.required_wall_height(),
            capacity: self.capacity.capacity_for(usable_area, band),
        }
    }

    /// Assess every band. Each band is checked once; the aggregate verdict
    /// stops reading the list at the first failing band.
    pub fn assess(&self, input: &WallHeightInput) -> WallHeightAssessment {
        let bands: Vec<BandAssessment> = UserHeightBand::ALL
            .into_iter()
            .map(|band| self.assess_band(band, input))
            .collect();
        let all_pass = bands.iter().all(|assessment| assessment.meets_requirements);

        tracing::trace!(
            platform_height = input.platform_height,
            containing_wall_height = input.containing_wall_height,
            all_bands_pass = all_pass,
            "wall height assessment"
        );

        WallHeightAssessment {
            usable_area: input.play_area().usable_area(),
            bands,
            all_bands_pass: all_pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(platform_height: f64, wall: f64, roof: bool) -> WallHeightInput {
        WallHeightInput {
            platform_height,
            containing_wall_height: wall,
            permanent_roof: roof,
            length: 5.0,
            width: 4.0,
            negative_adjustment: 0.0,
        }
    }

    fn classify(platform: f64, user: f64) -> ContainmentRequirement {
        ContainmentRequirement::classify(&ContainmentConstants::default(), platform, user)
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(0.6, 1.5), ContainmentRequirement::NoWallsRequired);
        assert_eq!(classify(0.61, 1.5), ContainmentRequirement::Walls { required_height: 1.5 });
        assert_eq!(classify(3.0, 1.5), ContainmentRequirement::Walls { required_height: 1.5 });
        assert_eq!(
            classify(3.5, 1.2),
            ContainmentRequirement::EnhancedWalls { required_height: 1.5 }
        );
        assert_eq!(
            classify(7.0, 1.8),
            ContainmentRequirement::WallsAndRoof { required_height: 2.25 }
        );
        assert_eq!(classify(8.01, 1.0), ContainmentRequirement::NotPermitted);
    }

    #[test]
    fn test_requirement_breakdown_enhanced() {
        let calc = WallHeightCalculator::default();
        let result = calc.calculate_wall_height_requirements(4.0, 1.5, Some(2.0), false);
        assert_eq!(result.value, RequiredValue::Number(1.875));
        assert_eq!(
            result.breakdown.labels(),
            vec!["Platform height", "User height", "Height range", "Required wall height", "Containing wall"]
        );
        assert_eq!(result.breakdown.detail("Height range"), Some("3.0m - 6.0m"));
        assert_eq!(
            result.breakdown.detail("Required wall height"),
            Some("1.5m × 1.25 = 1.875m")
        );
        assert_eq!(
            result.breakdown.detail("Containing wall"),
            Some("2m ≥ 1.875m - meets requirement")
        );
    }

    #[test]
    fn test_requirement_breakdown_no_walls() {
        let calc = WallHeightCalculator::default();
        let result = calc.calculate_wall_height_requirements(0.5, 1.8, Some(0.0), false);
        assert_eq!(result.value, RequiredValue::Number(0.0));
        assert_eq!(
            result.breakdown.detail("Required wall height"),
            Some("No containing walls required")
        );
        assert!(result.breakdown.detail("Containing wall").is_none());
    }

    #[test]
    fn test_requirement_breakdown_roof_band() {
        let calc = WallHeightCalculator::default();
        let result = calc.calculate_wall_height_requirements(7.0, 1.2, Some(1.5), true);
        assert_eq!(result.breakdown.detail("Permanent roof"), Some("Required above 6.0m"));
        assert_eq!(result.breakdown.detail("Roof status"), Some("Permanent roof fitted"));
    }

    #[test]
    fn test_requirement_not_permitted() {
        let calc = WallHeightCalculator::default();
        let result = calc.calculate_wall_height_requirements(9.0, 1.0, Some(5.0), true);
        assert_eq!(result.value, RequiredValue::Verdict(false));
        assert_eq!(result.breakdown.detail("Height range"), Some("Above 8.0m"));
    }

    #[test]
    fn test_assess_all_bands() {
        let assessment = WallHeightCalculator::default().assess(&input(2.0, 1.6, false));
        let verdicts: Vec<bool> = assessment.bands.iter().map(|b| b.meets_requirements).collect();
        assert_eq!(verdicts, vec![true, true, true, false]);
        assert!(!assessment.all_bands_pass);

        // 20m² ÷ 1.0 / 1.33 / 1.66 / 2.0
        let capacities: Vec<u32> = assessment.bands.iter().map(|b| b.capacity).collect();
        assert_eq!(capacities, vec![20, 15, 12, 10]);
    }

    #[test]
    fn test_roof_flips_high_platform() {
        let calc = WallHeightCalculator::default();
        assert!(!calc.assess(&input(7.0, 2.5, false)).all_bands_pass);
        assert!(calc.assess(&input(7.0, 2.5, true)).all_bands_pass);
    }

    #[test]
    fn test_assessment_breakdown() {
        let assessment = WallHeightCalculator::default().assess(&input(2.0, 1.6, false));
        let breakdown = assessment.breakdown();
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown.detail("Usable area"), Some("20m²"));
        assert_eq!(breakdown.detail("1.0m users"), Some("walls ≥ 1m - pass, capacity 20"));
        assert_eq!(breakdown.detail("1.8m users"), Some("walls ≥ 1.8m - fail, capacity 10"));
    }

    #[test]
    fn test_aggregate_matches_band_verdicts() {
        let calc = WallHeightCalculator::default();
        let cases = [
            input(0.5, 0.0, false),
            input(2.0, 1.8, false),
            input(2.0, 1.3, false),
            input(4.0, 2.25, false),
            input(4.0, 2.0, false),
            input(7.0, 2.25, true),
            input(7.0, 2.25, false),
            input(9.0, 5.0, true),
        ];
        for case in cases {
            let assessment = calc.assess(&case);
            assert_eq!(assessment.bands.len(), UserHeightBand::ALL.len());
            let expected = assessment.bands.iter().all(|band| band.meets_requirements);
            assert_eq!(assessment.all_bands_pass, expected, "{:?}", case);
        }
    }

    #[test]
    fn test_non_finite_wall_fails() {
        let calc = WallHeightCalculator::default();
        assert!(!calc.meets_band_requirements(UserHeightBand::Band1000, 2.0, f64::NAN, false));
    }
}
