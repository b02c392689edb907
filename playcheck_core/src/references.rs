//! # Formula References
//!
//! Metadata for every formula the calculators apply: the clause of EN 14960
//! it comes from, the plain-text formula, its variables and assumptions. Used
//! to print an audit appendix next to calculation results.
//!
//! ```rust
//! use playcheck_core::references::Formula;
//!
//! let meta = Formula::AnchorCount.metadata();
//! assert_eq!(meta.reference.citation(), "EN 14960-1:2019 Annex A");
//! ```

use serde::Serialize;

use crate::breakdown::format_constant;
use crate::config::EngineConfig;
use crate::constants::UserHeightBand;

// ============================================================================
// Code References
// ============================================================================

/// Reference to a clause of a published standard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// EN 14960 - Inflatable play equipment
    EN14960 {
        part: u8,
        year: u16,
        clause: &'static str,
    },
}

impl CodeReference {
    const fn en14960(clause: &'static str) -> Self {
        CodeReference::EN14960 {
            part: 1,
            year: 2019,
            clause,
        }
    }

    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::EN14960 { part, year, clause } => {
                format!("EN 14960-{}:{} {}", part, year, clause)
            }
        }
    }
}

// ============================================================================
// Formula Metadata
// ============================================================================

/// Definition of a variable used in a formula.
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: String,
    pub units: &'static str,
}

impl Variable {
    pub fn new(symbol: &'static str, description: impl Into<String>, units: &'static str) -> Self {
        Self {
            symbol,
            description: description.into(),
            units,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormulaMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub formula_plain: String,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<String>,
    /// Function implementing the formula
    pub source_function: &'static str,
}

/// Every formula applied by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Formula {
    AnchorCount,
    RunoutLength,
    ContainingWallHeight,
    UserCapacity,
}

pub static ALL_FORMULAS: &[Formula] = &[
    Formula::AnchorCount,
    Formula::RunoutLength,
    Formula::ContainingWallHeight,
    Formula::UserCapacity,
];

impl Formula {
    /// Metadata for the EN 14960-1:2019 constants.
    pub fn metadata(&self) -> FormulaMetadata {
        self.metadata_for(&EngineConfig::default())
    }

    /// Metadata with the constants of `config` written into the formulas.
    pub fn metadata_for(&self, config: &EngineConfig) -> FormulaMetadata {
        match self {
            Formula::AnchorCount => {
                let c = &config.anchors;
                FormulaMetadata {
                    name: "Required Anchor Count",
                    description: "Ground anchors needed to resist wind load on each pair of opposing faces",
                    formula_plain: format!(
                        "n = ⌈(A × {} × {}) ÷ {}⌉ per face; total = (n_fb + n_lr) × 2, minimum {}",
                        format_constant(c.area_coefficient),
                        format_constant(c.safety_factor),
                        format_constant(c.base_divisor),
                        c.minimum_anchors
                    ),
                    reference: CodeReference::en14960("Annex A"),
                    variables: vec![
                        Variable::new("A", "Face area (W × H or L × H)", "m²"),
                        Variable::new(
                            "c_w",
                            format!("Wind pressure coefficient, {}", format_constant(c.area_coefficient)),
                            "N/m²",
                        ),
                        Variable::new("γ", format!("Safety factor, {}", format_constant(c.safety_factor)), "-"),
                        Variable::new(
                            "F_a",
                            format!("Rated pull of one anchor, {}", format_constant(c.base_divisor)),
                            "N",
                        ),
                    ],
                    assumptions: vec![
                        "Standard coefficient 114.0 is 0.5 × 1.5 × 1.24 × 11.1²".to_string(),
                        "Design wind speed 11.1 m/s (Beaufort 6), air density 1.24 kg/m³".to_string(),
                    ],
                    source_function: "AnchorCalculator::calculate",
                }
            }
            Formula::RunoutLength => {
                let r = &config.runout;
                FormulaMetadata {
                    name: "Slide Runout Length",
                    description: "Minimum obstruction-free runout beyond the slide base",
                    formula_plain: format!(
                        "runout = max({} × h_p, {}) + {} if stop wall",
                        format_constant(r.height_multiplier),
                        format_constant(r.minimum_runout),
                        format_constant(r.stop_wall_addition)
                    ),
                    reference: CodeReference::en14960("4.2.11"),
                    variables: vec![Variable::new("h_p", "Platform height", "m")],
                    assumptions: vec![
                        "Stop wall allowance applies only when the runout ends in a wall".to_string(),
                    ],
                    source_function: "SlideCalculator::calculate_required_runout",
                }
            }
            Formula::ContainingWallHeight => {
                let w = &config.containment;
                let none = format_constant(w.no_walls_required);
                let basic = format_constant(w.basic_walls);
                let enhanced = format_constant(w.enhanced_walls);
                let max = format_constant(w.max_safe_height);
                let multiplier = format_constant(w.enhanced_height_multiplier);
                FormulaMetadata {
                    name: "Containing Wall Height",
                    description: "Minimum containing wall height for a platform and user height",
                    formula_plain: format!(
                        "h_w ≥ h_u ({none} < h_p ≤ {basic}); h_w ≥ {multiplier} × h_u ({basic} < h_p ≤ {enhanced}); plus permanent roof ({enhanced} < h_p ≤ {max})"
                    ),
                    reference: CodeReference::en14960("4.2.9"),
                    variables: vec![
                        Variable::new("h_p", "Platform height", "m"),
                        Variable::new("h_u", "User height", "m"),
                        Variable::new("h_w", "Containing wall height", "m"),
                    ],
                    assumptions: vec![
                        format!("No walls required for platforms up to {}m", none),
                        format!("Platforms above {}m are not permitted", max),
                    ],
                    source_function: "WallHeightCalculator::calculate_wall_height_requirements",
                }
            }
            Formula::UserCapacity => {
                let areas = UserHeightBand::ALL
                    .iter()
                    .map(|band| format_constant(config.capacity.area_per_user(*band)))
                    .collect::<Vec<_>>()
                    .join(" / ");
                FormulaMetadata {
                    name: "User Capacity",
                    description: "Maximum simultaneous users of one height band",
                    formula_plain: "users = ⌊(L × W − A_obs) ÷ a_u⌋".to_string(),
                    reference: CodeReference::en14960("4.3"),
                    variables: vec![
                        Variable::new("A_obs", "Area occupied by obstacles", "m²"),
                        Variable::new("a_u", format!("Area per user: {} by band", areas), "m²"),
                    ],
                    assumptions: vec![
                        "Bands above the unit's maximum user height have zero capacity".to_string(),
                    ],
                    source_function: "UserCapacityCalculator::calculate",
                }
            }
        }
    }
}

/// Render all formulas as a markdown audit reference, using the constants
/// in `config`.
pub fn generate_formulas_markdown(config: &EngineConfig) -> String {
    let mut output = String::from("# Playcheck Formula Reference\n\n");
    output.push_str("Formulas applied by the EN 14960 compliance calculators.\n\n---\n\n");

    for formula in ALL_FORMULAS {
        let meta = formula.metadata_for(config);
        output.push_str(&format!("## {}\n\n", meta.name));
        output.push_str(&format!("{}\n\n", meta.description));
        output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

        if !meta.variables.is_empty() {
            output.push_str("| Symbol | Description | Units |\n");
            output.push_str("|--------|-------------|-------|\n");
            for var in &meta.variables {
                output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
            }
            output.push('\n');
        }

        output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
        output.push_str(&format!("**Source:** `{}`\n\n", meta.source_function));

        if !meta.assumptions.is_empty() {
            output.push_str("**Assumptions:**\n");
            for assumption in &meta.assumptions {
                output.push_str(&format!("- {}\n", assumption));
            }
            output.push('\n');
        }
        output.push_str("---\n\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_formulas_have_metadata() {
        for formula in ALL_FORMULAS {
            let meta = formula.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_plain.is_empty());
        }
    }

    #[test]
    fn test_citations() {
        assert_eq!(Formula::RunoutLength.metadata().reference.citation(), "EN 14960-1:2019 4.2.11");
        assert_eq!(Formula::UserCapacity.metadata().reference.citation(), "EN 14960-1:2019 4.3");
    }

    #[test]
    fn test_markdown_lists_every_formula() {
        let markdown = generate_formulas_markdown(&EngineConfig::default());
        for formula in ALL_FORMULAS {
            assert!(markdown.contains(formula.metadata().name));
        }
        assert!(markdown.contains("EN 14960-1:2019 Annex A"));
        assert!(markdown.contains("n = ⌈(A × 114.0 × 1.5) ÷ 1600.0⌉"));
        assert!(markdown.contains("1.0 / 1.33 / 1.66 / 2.0"));
    }

    #[test]
    fn test_markdown_follows_configured_constants() {
        let mut config = EngineConfig::default();
        config.anchors.minimum_anchors = 8;
        config.anchors.base_divisor = 2000.0;
        config.runout.minimum_runout = 0.4;
        config.containment.max_safe_height = 7.5;
        config.capacity.area_per_user_1800 = 2.5;

        let markdown = generate_formulas_markdown(&config);
        assert!(markdown.contains("÷ 2000.0⌉"));
        assert!(markdown.contains("minimum 8"));
        assert!(!markdown.contains("minimum 6"));
        assert!(markdown.contains("max(0.5 × h_p, 0.4)"));
        assert!(markdown.contains("Platforms above 7.5m are not permitted"));
        assert!(markdown.contains("1.0 / 1.33 / 1.66 / 2.5"));
    }
}
