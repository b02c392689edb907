//! # Engine Configuration
//!
//! All standard-derived constants in one serializable value. The default is
//! EN 14960-1:2019; a JSON document may override any subset of fields, which
//! is how a revision of the standard would be rolled out.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "anchors": { "minimum_anchors": 8 },
//!   "runout": { "minimum_runout": 0.3 }
//! }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AnchorCalculationConstants, CapacityConstants, ContainmentConstants, RunoutConstants,
};
use crate::errors::{CalcError, CalcResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub anchors: AnchorCalculationConstants,
    pub runout: RunoutConstants,
    pub containment: ContainmentConstants,
    pub capacity: CapacityConstants,
}

impl EngineConfig {
    /// Parse a config document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject constants that would make the formulas meaningless.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("anchors.area_coefficient", self.anchors.area_coefficient),
            ("anchors.safety_factor", self.anchors.safety_factor),
            ("anchors.base_divisor", self.anchors.base_divisor),
            ("runout.height_multiplier", self.runout.height_multiplier),
            ("containment.enhanced_height_multiplier", self.containment.enhanced_height_multiplier),
            ("capacity.area_per_user_1000", self.capacity.area_per_user_1000),
            ("capacity.area_per_user_1200", self.capacity.area_per_user_1200),
            ("capacity.area_per_user_1500", self.capacity.area_per_user_1500),
            ("capacity.area_per_user_1800", self.capacity.area_per_user_1800),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
            }
        }

        let non_negative = [
            ("runout.minimum_runout", self.runout.minimum_runout),
            ("runout.stop_wall_addition", self.runout.stop_wall_addition),
            ("containment.no_walls_required", self.containment.no_walls_required),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be zero or a positive number"));
            }
        }

        if self.anchors.minimum_anchors == 0 {
            return Err(CalcError::invalid_input(
                "anchors.minimum_anchors",
                "0",
                "At least one anchor is required",
            ));
        }

        let c = &self.containment;
        if !(c.no_walls_required <= c.basic_walls
            && c.basic_walls <= c.enhanced_walls
            && c.enhanced_walls <= c.max_safe_height)
        {
            return Err(CalcError::invalid_input(
                "containment",
                format!(
                    "{} / {} / {} / {}",
                    c.no_walls_required, c.basic_walls, c.enhanced_walls, c.max_safe_height
                ),
                "Platform height thresholds must be ascending",
            ));
        }
        Ok(())
    }
}

/// Load an engine config from a JSON file.
pub fn load_config(path: &Path) -> CalcResult<EngineConfig> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let config: EngineConfig =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "loaded engine config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_en14960_2019() {
        let config = EngineConfig::default();
        assert_eq!(config.anchors.minimum_anchors, 6);
        assert_eq!(config.runout.minimum_runout, 0.3);
        assert_eq!(config.containment.max_safe_height, 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(r#"{"anchors": {"minimum_anchors": 8}}"#).unwrap();
        assert_eq!(config.anchors.minimum_anchors, 8);
        assert_eq!(config.anchors.area_coefficient, 114.0);
        assert_eq!(config.runout, RunoutConstants::default());
    }

    #[test]
    fn test_rejects_zero_divisor() {
        let err = EngineConfig::from_json_str(r#"{"anchors": {"base_divisor": 0.0}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let err = EngineConfig::from_json_str(r#"{"containment": {"basic_walls": 7.0}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    fn rejected_field(config: &EngineConfig) -> String {
        match config.validate() {
            Err(CalcError::InvalidInput { field, .. }) => field,
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_negative_runout_allowances() {
        let err = EngineConfig::from_json_str(r#"{"runout": {"minimum_runout": -0.3}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut config = EngineConfig::default();
        config.runout.stop_wall_addition = -0.5;
        assert_eq!(rejected_field(&config), "runout.stop_wall_addition");

        let mut config = EngineConfig::default();
        config.runout.minimum_runout = f64::NAN;
        assert_eq!(rejected_field(&config), "runout.minimum_runout");
    }

    #[test]
    fn test_rejects_negative_no_walls_threshold() {
        let mut config = EngineConfig::default();
        config.containment.no_walls_required = -1.0;
        assert_eq!(rejected_field(&config), "containment.no_walls_required");

        let mut config = EngineConfig::default();
        config.containment.no_walls_required = f64::NEG_INFINITY;
        assert_eq!(rejected_field(&config), "containment.no_walls_required");
    }

    #[test]
    fn test_zero_allowances_are_accepted() {
        let config = EngineConfig::from_json_str(
            r#"{"runout": {"minimum_runout": 0.0, "stop_wall_addition": 0.0}, "containment": {"no_walls_required": 0.0}}"#,
        )
        .unwrap();
        assert_eq!(config.runout.minimum_runout, 0.0);
    }

    #[test]
    fn test_rejects_zero_minimum_anchors() {
        let err = EngineConfig::from_json_str(r#"{"anchors": {"minimum_anchors": 0}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "anchors.minimum_anchors"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/playcheck.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("playcheck_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"runout": {"stop_wall_addition": 0.6}}"#).unwrap();
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.runout.stop_wall_addition, 0.6);
    }
}
