//! # tank_core - Composite Pressure Vessel Calculation Engine
//!
//! `tank_core` provides the analysis chain for filament-wound hydrogen
//! storage tanks: membrane stresses and pressure ratings, ply failure
//! criteria, dome contours, pressure-cycle fatigue, and Monte Carlo
//! reliability. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: Records implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Repeatable**: Every random calculation has a seeded `*_with_rng` form
//!
//! ## Quick Start
//!
//! ```rust
//! use tank_core::calculations::pressure_vessel::{hoop_stress, axial_stress};
//!
//! let hoop = hoop_stress(70.0, 175.0, 25.0).unwrap();
//! let axial = axial_stress(70.0, 175.0, 25.0).unwrap();
//! assert_eq!(hoop, 490.0);
//! assert_eq!(axial, 245.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Pressure vessel, composite failure, dome, fatigue, reliability
//! - [`design`] - Full evaluation of a tank design record
//! - [`settings`] - Analysis settings with defaults
//! - [`materials`] - Composite strength and S-N databases
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod design;
pub mod errors;
pub mod materials;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use design::{evaluate, evaluate_with_rng, DesignEvaluation, TankDesign};
pub use errors::{CalcError, CalcResult};
pub use materials::CompositeMaterial;
pub use settings::AnalysisSettings;
