//! # User Capacity
//!
//! Maximum number of users per height band, per EN 14960-1:2019 4.3.
//!
//! ```text
//!   usable area = L × W − |obstacles|
//!   users       = ⌊usable area ÷ area per user⌋
//! ```
//!
//! Area per user grows with user height: 1.0m², 1.33m², 1.66m² and 2.0m² for
//! the 1.0, 1.2, 1.5 and 1.8m bands.

use serde::{Deserialize, Serialize};

use crate::breakdown::{format_constant, format_number, round_to, FormulaBreakdown};
use crate::calculations::{CalculationResult, RequiredValue};
use crate::constants::{CapacityConstants, UserHeightBand};

/// Play area footprint (m) and the area lost to obstacles (m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub length: f64,
    pub width: f64,
    #[serde(default)]
    pub negative_adjustment: f64,
}

impl PlayArea {
    pub fn total_area(&self) -> f64 {
        if !(self.length.is_finite() && self.width.is_finite()) || self.length <= 0.0 || self.width <= 0.0 {
            return 0.0;
        }
        round_to(self.length * self.width, 2)
    }

    /// Obstacle area as a positive figure; sign on input is ignored
    pub fn adjustment(&self) -> f64 {
        if self.negative_adjustment.is_finite() {
            self.negative_adjustment.abs()
        } else {
            0.0
        }
    }

    /// Total area less obstacles, never below zero
    pub fn usable_area(&self) -> f64 {
        round_to((self.total_area() - self.adjustment()).max(0.0), 2)
    }
}

/// Users allowed for one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCapacity {
    pub user_height: UserHeightBand,
    pub users: u32,
}

/// Capacity figures plus derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    pub usable_area: f64,
    pub capacities: Vec<BandCapacity>,
    pub breakdown: FormulaBreakdown,
}

impl CapacityResult {
    pub fn users_for(&self, band: UserHeightBand) -> u32 {
        self.capacities
            .iter()
            .find(|c| c.user_height == band)
            .map(|c| c.users)
            .unwrap_or(0)
    }

    /// Largest occupancy across permitted bands
    pub fn max_users(&self) -> u32 {
        self.capacities.iter().map(|c| c.users).max().unwrap_or(0)
    }
}

impl From<CapacityResult> for CalculationResult {
    fn from(result: CapacityResult) -> Self {
        CalculationResult::new(RequiredValue::Count(result.max_users()), result.breakdown)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserCapacityCalculator {
    constants: CapacityConstants,
}

impl UserCapacityCalculator {
    pub fn new(constants: CapacityConstants) -> Self {
        Self { constants }
    }

    /// Users of one band that fit in `usable_area`
    pub fn capacity_for(&self, usable_area: f64, band: UserHeightBand) -> u32 {
        let per_user = self.constants.area_per_user(band);
        if !(usable_area.is_finite() && per_user.is_finite()) || usable_area <= 0.0 || per_user <= 0.0 {
            return 0;
        }
        // tolerance keeps exact multiples such as 2.66 ÷ 1.33 from flooring to one less
        ((usable_area / per_user) + 1e-9).floor() as u32
    }

    /// Capacity for every band. Bands taller than `max_user_height` are not
    /// allowed on the unit and get zero users.
    pub fn calculate(
        &self,
        length: f64,
        width: f64,
        max_user_height: Option<f64>,
        negative_adjustment: f64,
    ) -> CapacityResult {
        let area = PlayArea {
            length,
            width,
            negative_adjustment,
        };
        let mut breakdown = FormulaBreakdown::new();

        breakdown.push(
            "Total area",
            format!(
                "{}m × {}m = {}m²",
                format_number(length),
                format_number(width),
                format_number(area.total_area())
            ),
        );
        if area.adjustment() > 0.0 {
            breakdown.push(
                "Obstacles/adjustments",
                format!("- {}m²", format_number(area.adjustment())),
            );
        }
        let usable_area = area.usable_area();
        breakdown.push("Usable area", format!("{}m²", format_number(usable_area)));

        let capacities = UserHeightBand::ALL
            .into_iter()
            .map(|band| {
                let label = format!("{} users", band);
                let allowed = max_user_height.map_or(true, |max| band.meters() <= max + 1e-9);
                let users = if allowed {
                    let users = self.capacity_for(usable_area, band);
                    breakdown.push(
                        label,
                        format!(
                            "{} ÷ {} = {} users",
                            format_number(usable_area),
                            format_constant(self.constants.area_per_user(band)),
                            users
                        ),
                    );
                    users
                } else {
                    let max = max_user_height.unwrap_or_default();
                    breakdown.push(
                        label,
                        format!("Not allowed (max user height {}m)", format_number(max)),
                    );
                    0
                };
                BandCapacity {
                    user_height: band,
                    users,
                }
            })
            .collect();

        CapacityResult {
            usable_area,
            capacities,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> UserCapacityCalculator {
        UserCapacityCalculator::default()
    }

    #[test]
    fn test_capacity_per_band() {
        let result = calc().calculate(5.0, 4.0, None, 0.0);
        assert_eq!(result.users_for(UserHeightBand::Band1000), 20);
        assert_eq!(result.users_for(UserHeightBand::Band1200), 15);
        assert_eq!(result.users_for(UserHeightBand::Band1500), 12);
        assert_eq!(result.users_for(UserHeightBand::Band1800), 10);
        assert_eq!(result.max_users(), 20);
    }

    #[test]
    fn test_breakdown_with_adjustment() {
        let result = calc().calculate(5.0, 4.0, None, 2.0);
        assert_eq!(
            result.breakdown.labels(),
            vec![
                "Total area",
                "Obstacles/adjustments",
                "Usable area",
                "1.0m users",
                "1.2m users",
                "1.5m users",
                "1.8m users",
            ]
        );
        assert_eq!(result.breakdown.detail("Total area"), Some("5m × 4m = 20m²"));
        assert_eq!(result.breakdown.detail("Obstacles/adjustments"), Some("- 2m²"));
        assert_eq!(result.breakdown.detail("Usable area"), Some("18m²"));
        assert_eq!(result.breakdown.detail("1.2m users"), Some("18 ÷ 1.33 = 13 users"));
    }

    #[test]
    fn test_adjustment_line_omitted_when_zero() {
        let result = calc().calculate(5.0, 4.0, None, 0.0);
        assert!(result.breakdown.detail("Obstacles/adjustments").is_none());
        assert_eq!(result.breakdown.len(), 6);
    }

    #[test]
    fn test_max_user_height_restricts_bands() {
        let result = calc().calculate(5.0, 4.0, Some(1.5), 0.0);
        assert_eq!(result.users_for(UserHeightBand::Band1500), 12);
        assert_eq!(result.users_for(UserHeightBand::Band1800), 0);
        assert_eq!(
            result.breakdown.detail("1.8m users"),
            Some("Not allowed (max user height 1.5m)")
        );
    }

    #[test]
    fn test_exact_multiple_not_floored_down() {
        assert_eq!(calc().capacity_for(2.66, UserHeightBand::Band1200), 2);
        assert_eq!(calc().capacity_for(3.32, UserHeightBand::Band1500), 2);
    }

    #[test]
    fn test_adjustment_larger_than_area() {
        let result = calc().calculate(2.0, 2.0, None, -10.0);
        assert_eq!(result.usable_area, 0.0);
        assert_eq!(result.max_users(), 0);
    }

    #[test]
    fn test_degenerate_dimensions() {
        let result = calc().calculate(0.0, 4.0, None, 0.0);
        assert_eq!(result.max_users(), 0);
        assert_eq!(result.breakdown.detail("Total area"), Some("0m × 4m = 0m²"));
    }
}
