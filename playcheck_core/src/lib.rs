//! # playcheck_core - EN 14960 Compliance Calculation Engine
//!
//! `playcheck_core` turns physical measurements of inflatable play equipment
//! into EN 14960 safety determinations. Every figure comes with an ordered
//! derivation trail so that it can be printed on an inspection certificate
//! and audited against the standard.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over read-only constants, safe to call from
//!   any number of threads
//! - **Never fails on geometry**: Zero, negative or missing measurements give a
//!   defined safe value (0, `None` or `false`)
//! - **Deterministic**: Identical inputs give byte-identical breakdowns
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use playcheck_core::CalculationService;
//! use serde_json::json;
//!
//! let service = CalculationService::default();
//! let response = service.evaluate_json(&json!({
//!     "calculation": { "type": "anchors", "length": 5, "width": 4, "height": 3 }
//! }));
//! assert!(response.passed);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Anchor, slide, wall height and capacity calculators
//! - [`service`] - Request dispatch and response envelope
//! - [`breakdown`] - Derivation trail types and number formatting
//! - [`constants`] - Standard-derived constants and user height bands
//! - [`config`] - Loading constants from JSON
//! - [`references`] - Clause citations and formula metadata
//! - [`errors`] - Structured error types

pub mod breakdown;
pub mod calculations;
pub mod config;
pub mod constants;
pub mod errors;
pub mod references;
pub mod service;

// Re-export commonly used types at crate root for convenience
pub use breakdown::{BreakdownEntry, FormulaBreakdown};
pub use calculations::{CalculationResult, RequiredValue};
pub use config::{load_config, EngineConfig};
pub use errors::{CalcError, CalcResult};
pub use service::{CalculationRequest, CalculationResponse, CalculationService, CalculationType};
