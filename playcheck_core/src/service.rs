//! # Calculation Service
//!
//! Dispatches a calculation request to the matching calculator and wraps the
//! outcome in a uniform envelope:
//!
//! ```json
//! {
//!   "passed": true,
//!   "status": "Calculation completed successfully",
//!   "result": { "value": 8, "breakdown": [["Front/back area", "4m (W) × 3m (H) = 12m²"], ...] }
//! }
//! ```
//!
//! Requests arrive as `{"calculation": {"type": "anchors", "length": 5, ...}}`.
//! A request that cannot be understood (unknown type, missing field) produces
//! `passed: false` with the reason in `status` and a null `result`; it never
//! panics.
//!
//! `passed` reports that the calculation ran. Pass/fail verdicts of the
//! checks themselves are carried in `result.value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::breakdown::format_number;
use crate::calculations::anchor::Dimensions;
use crate::calculations::wall_height::WallHeightInput;
use crate::calculations::{
    AnchorCalculator, CalculationResult, RequiredValue, SlideCalculator, UserCapacityCalculator,
    WallHeightCalculator,
};
use crate::config::EngineConfig;
use crate::errors::{CalcError, CalcResult};
use crate::references::Formula;

pub const SUCCESS_STATUS: &str = "Calculation completed successfully";

/// The closed set of calculations the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    Anchors,
    SlideRunout,
    SlideHeight,
    WallHeight,
    UserCapacity,
}

impl CalculationType {
    pub const ALL: [CalculationType; 5] = [
        CalculationType::Anchors,
        CalculationType::SlideRunout,
        CalculationType::SlideHeight,
        CalculationType::WallHeight,
        CalculationType::UserCapacity,
    ];

    /// Wire name used in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationType::Anchors => "anchors",
            CalculationType::SlideRunout => "slide_runout",
            CalculationType::SlideHeight => "slide_height",
            CalculationType::WallHeight => "wall_height",
            CalculationType::UserCapacity => "user_capacity",
        }
    }

    pub fn parse(name: &str) -> CalcResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| CalcError::unknown_calculation_type(name))
    }

    /// Formula this calculation applies
    pub fn formula(&self) -> Formula {
        match self {
            CalculationType::Anchors => Formula::AnchorCount,
            CalculationType::SlideRunout => Formula::RunoutLength,
            CalculationType::SlideHeight | CalculationType::WallHeight => Formula::ContainingWallHeight,
            CalculationType::UserCapacity => Formula::UserCapacity,
        }
    }
}

impl std::fmt::Display for CalculationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calculation request with its type-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationRequest {
    /// Required anchors for an inflatable of the given size
    Anchors(Dimensions),
    /// Required runout; with `runout` the measured runout is checked against it
    SlideRunout {
        platform_height: f64,
        #[serde(default)]
        runout: Option<f64>,
        #[serde(default)]
        stop_wall: bool,
    },
    /// Slide containing walls for one user height, or every band when
    /// `user_height` is omitted
    SlideHeight {
        platform_height: f64,
        #[serde(default)]
        user_height: Option<f64>,
        wall_height: f64,
        #[serde(default)]
        permanent_roof: bool,
    },
    /// General containing walls and capacity for every band
    WallHeight(WallHeightInput),
    /// Users per height band
    UserCapacity {
        length: f64,
        width: f64,
        #[serde(default)]
        max_user_height: Option<f64>,
        #[serde(default)]
        negative_adjustment: f64,
    },
}

impl CalculationRequest {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            CalculationRequest::Anchors(_) => CalculationType::Anchors,
            CalculationRequest::SlideRunout { .. } => CalculationType::SlideRunout,
            CalculationRequest::SlideHeight { .. } => CalculationType::SlideHeight,
            CalculationRequest::WallHeight(_) => CalculationType::WallHeight,
            CalculationRequest::UserCapacity { .. } => CalculationType::UserCapacity,
        }
    }
}

/// Decode a `{"calculation": {...}}` request document.
pub fn parse_request(document: &Value) -> CalcResult<CalculationRequest> {
    let calculation = document
        .get("calculation")
        .ok_or_else(|| CalcError::missing_field("calculation"))?;
    let type_name = calculation
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CalcError::missing_field("calculation.type"))?;
    CalculationType::parse(type_name)?;

    serde_json::from_value(calculation.clone())
        .map_err(|e| CalcError::invalid_input("calculation", type_name, e.to_string()))
}

/// Envelope returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub passed: bool,
    pub status: String,
    pub result: Option<CalculationResult>,
}

impl CalculationResponse {
    pub fn success(result: CalculationResult) -> Self {
        Self {
            passed: true,
            status: SUCCESS_STATUS.to_string(),
            result: Some(result),
        }
    }

    pub fn failure(error: &CalcError) -> Self {
        Self {
            passed: false,
            status: error.to_string(),
            result: None,
        }
    }
}

/// Composes the calculators behind one entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalculationService {
    anchor: AnchorCalculator,
    slide: SlideCalculator,
    wall_height: WallHeightCalculator,
    capacity: UserCapacityCalculator,
}

impl CalculationService {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            anchor: AnchorCalculator::new(config.anchors),
            slide: SlideCalculator::new(config.runout, config.containment),
            wall_height: WallHeightCalculator::new(config.containment, config.capacity),
            capacity: UserCapacityCalculator::new(config.capacity),
        }
    }

    pub fn anchor(&self) -> &AnchorCalculator {
        &self.anchor
    }

    pub fn slide(&self) -> &SlideCalculator {
        &self.slide
    }

    pub fn wall_height(&self) -> &WallHeightCalculator {
        &self.wall_height
    }

    pub fn capacity(&self) -> &UserCapacityCalculator {
        &self.capacity
    }

    /// Run a typed request.
    pub fn calculate(&self, request: &CalculationRequest) -> CalculationResult {
        match *request {
            CalculationRequest::Anchors(dims) => self.anchor.calculate_for(&dims).into(),
            CalculationRequest::SlideRunout {
                platform_height,
                runout,
                stop_wall,
            } => self.slide_runout(platform_height, runout, stop_wall),
            CalculationRequest::SlideHeight {
                platform_height,
                user_height: Some(user_height),
                wall_height,
                permanent_roof,
            } => self
                .slide
                .calculate_height_requirements(platform_height, user_height, wall_height, permanent_roof),
            CalculationRequest::SlideHeight {
                platform_height,
                user_height: None,
                wall_height,
                permanent_roof,
            } => self
                .slide
                .calculate_all_band_requirements(platform_height, wall_height, permanent_roof),
            CalculationRequest::WallHeight(input) => self.wall_height.assess(&input).into(),
            CalculationRequest::UserCapacity {
                length,
                width,
                max_user_height,
                negative_adjustment,
            } => self
                .capacity
                .calculate(length, width, max_user_height, negative_adjustment)
                .into(),
        }
    }

    fn slide_runout(&self, platform_height: f64, runout: Option<f64>, stop_wall: bool) -> CalculationResult {
        let mut result = self.slide.calculate_required_runout(platform_height, stop_wall);
        if let (Some(runout), Some(required)) = (runout, result.value.as_f64()) {
            let meets = runout.is_finite() && runout >= required;
            let detail = if meets {
                format!("{}m ≥ {}m - meets requirement", format_number(runout), format_number(required))
            } else {
                format!("{}m < {}m - below requirement", format_number(runout), format_number(required))
            };
            result.breakdown.push("Runout check", detail);
            result.value = RequiredValue::Verdict(meets);
        }
        result
    }

    /// Run a typed request and wrap it in the response envelope.
    pub fn evaluate(&self, request: &CalculationRequest) -> CalculationResponse {
        debug!(calculation_type = %request.calculation_type(), "evaluating calculation");
        CalculationResponse::success(self.calculate(request))
    }

    /// Decode and run a request document.
    pub fn evaluate_json(&self, document: &Value) -> CalculationResponse {
        match parse_request(document) {
            Ok(request) => self.evaluate(&request),
            Err(error) => {
                warn!(code = error.error_code(), %error, "rejected calculation request");
                CalculationResponse::failure(&error)
            }
        }
    }

    /// Decode and run a request document given as text.
    pub fn evaluate_str(&self, json: &str) -> CalculationResponse {
        match serde_json::from_str::<Value>(json) {
            Ok(document) => self.evaluate_json(&document),
            Err(e) => {
                let error = CalcError::from(e);
                warn!(code = error.error_code(), %error, "rejected calculation request");
                CalculationResponse::failure(&error)
            }
        }
    }
}
