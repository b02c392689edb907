//! # Anchor Calculation
//!
//! Required ground anchor count for an inflatable per EN 14960-1:2019 Annex A.
//!
//! Each face exposed to wind needs enough anchors to resist the wind load on
//! it. The load on one face is its area times the wind pressure coefficient
//! (114 N/m²) times a 1.5 safety factor; one anchor is rated at 1600 N.
//!
//! ```text
//!   anchors per face = ⌈(A × 114.0 × 1.5) ÷ 1600.0⌉
//!   total            = (front/back + sides) × 2,  never below 6
//! ```
//!
//! ## Example
//!
//! ```rust
//! use playcheck_core::calculations::anchor::AnchorCalculator;
//!
//! let result = AnchorCalculator::default().calculate(5.0, 4.0, 3.0);
//! assert_eq!(result.required_anchors, 8);
//! assert_eq!(result.formula_breakdown.len(), 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::breakdown::{format_constant, format_number, round_to, FormulaBreakdown};
use crate::calculations::{CalculationResult, RequiredValue};
use crate::constants::AnchorCalculationConstants;

/// Overall dimensions of an inflatable in metres.
///
/// ## JSON Example
///
/// ```json
/// { "length": 5.0, "width": 4.0, "height": 3.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self { length, width, height }
    }

    /// Area of the front and back faces (W × H)
    pub fn front_back_area(&self) -> f64 {
        face_area(self.width, self.height)
    }

    /// Area of the left and right faces (L × H)
    pub fn sides_area(&self) -> f64 {
        face_area(self.length, self.height)
    }
}

/// Face area rounded to 2 dp. A face with a non-positive or non-finite side
/// has no area. Products too large to round are kept as computed.
fn face_area(a: f64, b: f64) -> f64 {
    if !(a.is_finite() && b.is_finite()) || a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    let area = a * b;
    let rounded = round_to(area, 2);
    if rounded.is_finite() {
        rounded
    } else {
        area
    }
}

/// Upper bound on anchors for one face; four faces' worth still fits in a `u32`.
pub const MAX_ANCHORS_PER_FACE: u32 = u32::MAX / 4;

/// Anchor count plus derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorResult {
    pub required_anchors: u32,
    pub formula_breakdown: FormulaBreakdown,
}

impl From<AnchorResult> for CalculationResult {
    fn from(result: AnchorResult) -> Self {
        CalculationResult::new(
            RequiredValue::Count(result.required_anchors),
            result.formula_breakdown,
        )
    }
}

/// Annex A anchorage calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorCalculator {
    constants: AnchorCalculationConstants,
}

impl AnchorCalculator {
    pub fn new(constants: AnchorCalculationConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &AnchorCalculationConstants {
        &self.constants
    }

    /// Anchors needed for one face of the given area.
    ///
    /// Returns 0 for a missing, zero, negative or NaN area; otherwise the
    /// Annex A figure rounded up to the next whole anchor, capped at
    /// [`MAX_ANCHORS_PER_FACE`]. An infinite area gets the cap.
    pub fn calculate_required_anchors(&self, area: Option<f64>) -> u32 {
        let area = match area {
            Some(a) if a > 0.0 => a,
            _ => return 0,
        };
        let c = &self.constants;
        let anchors = ((area * c.area_coefficient * c.safety_factor) / c.base_divisor).ceil();
        if anchors.is_nan() {
            return 0;
        }
        if anchors >= f64::from(MAX_ANCHORS_PER_FACE) {
            MAX_ANCHORS_PER_FACE
        } else {
            anchors as u32
        }
    }

    /// Required anchors for an inflatable of the given size (metres).
    pub fn calculate(&self, length: f64, width: f64, height: f64) -> AnchorResult {
        self.calculate_for(&Dimensions::new(length, width, height))
    }

    pub fn calculate_for(&self, dims: &Dimensions) -> AnchorResult {
        let c = &self.constants;
        let mut breakdown = FormulaBreakdown::new();

        let front_back_area = dims.front_back_area();
        let sides_area = dims.sides_area();

        breakdown.push(
            "Front/back area",
            format!(
                "{}m (W) × {}m (H) = {}m²",
                format_number(dims.width),
                format_number(dims.height),
                format_number(front_back_area)
            ),
        );
        breakdown.push(
            "Sides area",
            format!(
                "{}m (L) × {}m (H) = {}m²",
                format_number(dims.length),
                format_number(dims.height),
                format_number(sides_area)
            ),
        );

        let front_back_anchors = self.calculate_required_anchors(Some(front_back_area));
        let sides_anchors = self.calculate_required_anchors(Some(sides_area));

        breakdown.push(
            "Front & back anchor counts",
            self.per_face_detail(front_back_area, front_back_anchors),
        );
        breakdown.push(
            "Left & right anchor counts",
            self.per_face_detail(sides_area, sides_anchors),
        );

        // Each pairing covers two opposing faces
        let calculated = front_back_anchors.saturating_add(sides_anchors).saturating_mul(2);
        breakdown.push(
            "Calculated total anchors",
            format!("({} + {}) × 2 = {}", front_back_anchors, sides_anchors, calculated),
        );

        let required_anchors = if calculated < c.minimum_anchors {
            breakdown.push(
                "Minimum anchors override",
                format!(
                    "{} is below the minimum of {}, using {}",
                    calculated, c.minimum_anchors, c.minimum_anchors
                ),
            );
            c.minimum_anchors
        } else {
            calculated
        };

        tracing::trace!(
            length = dims.length,
            width = dims.width,
            height = dims.height,
            required_anchors,
            "anchor calculation"
        );

        AnchorResult {
            required_anchors,
            formula_breakdown: breakdown,
        }
    }

    fn per_face_detail(&self, area: f64, anchors: u32) -> String {
        let c = &self.constants;
        format!(
            "(({} × {} * {}) ÷ {} = {}",
            format_number(area),
            format_constant(c.area_coefficient),
            format_constant(c.safety_factor),
            format_constant(c.base_divisor),
            anchors
        )
    }
}
