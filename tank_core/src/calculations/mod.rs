//! # Vessel Calculations
//!
//! Calculation modules for composite-overwrapped pressure vessels. Modules
//! expose plain functions over `f64` MPa/mm values, plus `*Input` and
//! `*Result` structs where a calculation has enough parameters to be worth
//! sending as JSON.
//!
//! ## Available Calculations
//!
//! - [`pressure_vessel`] - Membrane stresses, burst/working/test pressures
//! - [`composite_failure`] - Tsai-Wu and Hashin ply failure
//! - [`dome`] - Isotensoid, hemispherical, and elliptical dome profiles
//! - [`fatigue`] - S-N life, Goodman correction, Miner's rule
//! - [`reliability`] - Monte Carlo failure probability and sensitivity

pub mod composite_failure;
pub mod dome;
pub mod fatigue;
pub mod pressure_vessel;
pub mod reliability;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

// Re-export commonly used types
pub use composite_failure::{FailureMode, HashinIndices, PlyFailureResult, PlyStresses};
pub use dome::{DomeInput, DomePoint, DomeProfile, DomeShape};
pub use fatigue::{HydrogenCycleResult, LoadBlock};
pub use pressure_vessel::{CylinderInput, CylinderStressResult, PressureRatings};
pub use reliability::{DistributionStats, MonteCarloResult, ReliabilityInput, SensitivityParameter, SensitivityResult};

/// A single stand-alone calculation request.
///
/// Lets one JSON document name the calculation it wants:
///
/// ```json
/// { "type": "Cylinder", "pressure_mpa": 70.0, "radius_mm": 175.0, "thickness_mm": 25.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Thin-wall cylinder membrane stresses
    Cylinder(CylinderInput),
    /// Dome profile generation
    Dome(DomeInput),
    /// Stress-strength Monte Carlo run
    Reliability(ReliabilityInput),
}

/// Result of a [`CalculationItem`], serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationOutput {
    Cylinder(CylinderStressResult),
    Dome(DomeProfile),
    Reliability(MonteCarloResult),
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Cylinder(_) => "Cylinder",
            CalculationItem::Dome(_) => "Dome",
            CalculationItem::Reliability(_) => "Reliability",
        }
    }

    /// Run the calculation, drawing Monte Carlo samples from the thread RNG.
    pub fn run(&self) -> CalcResult<CalculationOutput> {
        self.run_with_rng(&mut rand::rng())
    }

    /// Run the calculation with a caller-supplied RNG.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::Cylinder(input) => CalculationOutput::Cylinder(pressure_vessel::analyze_cylinder(input)?),
            CalculationItem::Dome(input) => CalculationOutput::Dome(dome::generate_dome(input)?),
            CalculationItem::Reliability(input) => {
                CalculationOutput::Reliability(reliability::calculate_reliability_with_rng(input, rng)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_item_from_json() {
        let json = r#"{ "type": "Cylinder", "pressure_mpa": 70.0, "radius_mm": 175.0, "thickness_mm": 25.0 }"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.calc_type(), "Cylinder");

        match item.run().unwrap() {
            CalculationOutput::Cylinder(result) => {
                assert!((result.hoop_stress_mpa - 490.0).abs() < 1e-9);
                assert!((result.axial_stress_mpa - 245.0).abs() < 1e-9);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_dome_item_uses_default_points() {
        let json = r#"{ "type": "Dome", "r0_mm": 150.0, "boss_radius_mm": 25.0, "shape": { "shape": "Hemispherical" } }"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        match item.run().unwrap() {
            CalculationOutput::Dome(profile) => assert_eq!(profile.points.len(), dome::DEFAULT_DOME_POINTS),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_reliability_item_is_repeatable_with_seed() {
        let item = CalculationItem::Reliability(ReliabilityInput::new(200.0, 260.0, 0.1, 0.1).with_samples(1_000));
        let a = item.run_with_rng(&mut reliability::create_rng(9)).unwrap();
        let b = item.run_with_rng(&mut reliability::create_rng(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_item_propagates_error() {
        let item = CalculationItem::Cylinder(CylinderInput {
            pressure_mpa: 70.0,
            radius_mm: 175.0,
            thickness_mm: 0.0,
        });
        assert_eq!(item.run().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_untagged_output_serialization() {
        let item: CalculationItem = serde_json::from_str(
            r#"{ "type": "Cylinder", "pressure_mpa": 10.0, "radius_mm": 100.0, "thickness_mm": 10.0 }"#,
        )
        .unwrap();
        let value = serde_json::to_value(item.run().unwrap()).unwrap();
        assert!(value.get("hoop_stress_mpa").is_some());
        assert!(value.get("Cylinder").is_none());
    }
}
