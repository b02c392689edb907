//! # EN 14960 Constants
//!
//! Standard-derived configuration values for the compliance calculators.
//! Every calculator captures one of these structs by value, so a revision of
//! the standard is a single substitution of the `Default` values here (or of a
//! JSON config document, see [`crate::config`]).
//!
//! ## References
//!
//! - EN 14960-1:2019 Annex A: Wind loads and anchorage
//! - EN 14960-1:2019 4.2.9: Containment
//! - EN 14960-1:2019 4.2.11: Slide runout
//! - EN 14960-1:2019 4.3: Number of users

use serde::{Deserialize, Serialize};

// ============================================================================
// User Height Bands
// ============================================================================

/// Reference user statures used throughout EN 14960.
///
/// The set is fixed by the standard and always iterated in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserHeightBand {
    #[serde(rename = "1.0")]
    Band1000,
    #[serde(rename = "1.2")]
    Band1200,
    #[serde(rename = "1.5")]
    Band1500,
    #[serde(rename = "1.8")]
    Band1800,
}

impl UserHeightBand {
    /// All bands in ascending order
    pub const ALL: [UserHeightBand; 4] = [
        UserHeightBand::Band1000,
        UserHeightBand::Band1200,
        UserHeightBand::Band1500,
        UserHeightBand::Band1800,
    ];

    /// User height in metres
    pub fn meters(&self) -> f64 {
        match self {
            UserHeightBand::Band1000 => 1.0,
            UserHeightBand::Band1200 => 1.2,
            UserHeightBand::Band1500 => 1.5,
            UserHeightBand::Band1800 => 1.8,
        }
    }

    /// User height in millimetres, as printed on certificates
    pub fn millimeters(&self) -> u32 {
        match self {
            UserHeightBand::Band1000 => 1000,
            UserHeightBand::Band1200 => 1200,
            UserHeightBand::Band1500 => 1500,
            UserHeightBand::Band1800 => 1800,
        }
    }

    /// Find the band matching a height in metres, if it is one of the four.
    pub fn from_meters(height_m: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|band| (band.meters() - height_m).abs() < 1e-9)
    }
}

impl std::fmt::Display for UserHeightBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}m", self.meters())
    }
}

// ============================================================================
// Anchorage (Annex A)
// ============================================================================

/// Constants for the Annex A anchorage formula.
///
/// `area_coefficient` is the wind pressure term 0.5 × Cw 1.5 × ρ 1.24 kg/m³ ×
/// v² (11.1 m/s)² ≈ 114, `base_divisor` the 1600 N rated pull of one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorCalculationConstants {
    pub area_coefficient: f64,
    pub safety_factor: f64,
    pub base_divisor: f64,
    pub minimum_anchors: u32,
}

impl AnchorCalculationConstants {
    pub const EN14960_2019: Self = Self {
        area_coefficient: 114.0,
        safety_factor: 1.5,
        base_divisor: 1600.0,
        minimum_anchors: 6,
    };
}

impl Default for AnchorCalculationConstants {
    fn default() -> Self {
        Self::EN14960_2019
    }
}

// ============================================================================
// Slide Runout (4.2.11)
// ============================================================================

/// Runout length constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunoutConstants {
    /// Runout must be at least this fraction of the platform height
    pub height_multiplier: f64,
    /// Absolute minimum runout in metres
    pub minimum_runout: f64,
    /// Extra runout required when the runout ends in a stop wall (m)
    pub stop_wall_addition: f64,
}

impl RunoutConstants {
    pub const EN14960_2019: Self = Self {
        height_multiplier: 0.5,
        minimum_runout: 0.3,
        stop_wall_addition: 0.5,
    };
}

impl Default for RunoutConstants {
    fn default() -> Self {
        Self::EN14960_2019
    }
}

// ============================================================================
// Containment (4.2.9)
// ============================================================================

/// Platform height thresholds and wall multipliers for containing walls.
///
/// Thresholds are inclusive upper bounds of each platform-height range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentConstants {
    /// Up to this platform height no containing walls are required
    pub no_walls_required: f64,
    /// Up to this height walls must be at least the user height
    pub basic_walls: f64,
    /// Up to this height walls must be user height × `enhanced_height_multiplier`
    pub enhanced_walls: f64,
    /// Up to this height enhanced walls plus a permanent roof are required;
    /// above it the platform is not permitted at all
    pub max_safe_height: f64,
    pub enhanced_height_multiplier: f64,
}

impl ContainmentConstants {
    pub const EN14960_2019: Self = Self {
        no_walls_required: 0.6,
        basic_walls: 3.0,
        enhanced_walls: 6.0,
        max_safe_height: 8.0,
        enhanced_height_multiplier: 1.25,
    };
}

impl Default for ContainmentConstants {
    fn default() -> Self {
        Self::EN14960_2019
    }
}

// ============================================================================
// User Capacity (4.3)
// ============================================================================

/// Play area required per user (m²) for each height band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConstants {
    pub area_per_user_1000: f64,
    pub area_per_user_1200: f64,
    pub area_per_user_1500: f64,
    pub area_per_user_1800: f64,
}

impl CapacityConstants {
    pub const EN14960_2019: Self = Self {
        area_per_user_1000: 1.0,
        area_per_user_1200: 1.33,
        area_per_user_1500: 1.66,
        area_per_user_1800: 2.0,
    };

    /// Area per user for a band
    pub fn area_per_user(&self, band: UserHeightBand) -> f64 {
        match band {
            UserHeightBand::Band1000 => self.area_per_user_1000,
            UserHeightBand::Band1200 => self.area_per_user_1200,
            UserHeightBand::Band1500 => self.area_per_user_1500,
            UserHeightBand::Band1800 => self.area_per_user_1800,
        }
    }
}

impl Default for CapacityConstants {
    fn default() -> Self {
        Self::EN14960_2019
    }
}
