//! # Analysis Settings
//!
//! Knobs for a full design evaluation: rating factors, profile resolution,
//! Monte Carlo scatter and sample count, fatigue requirement, and an
//! optional seed for repeatable runs.
//!
//! Every field has a default, so a settings file only needs the fields it
//! changes:
//!
//! ```rust
//! use tank_core::settings::AnalysisSettings;
//!
//! let settings = AnalysisSettings::from_json(r#"{ "reliability_samples": 50000, "seed": 7 }"#).unwrap();
//! assert_eq!(settings.reliability_samples, 50_000);
//! assert_eq!(settings.burst_ratio, 2.25);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::dome::{DEFAULT_DOME_POINTS, MIN_DOME_POINTS};
use crate::calculations::pressure_vessel::{DEFAULT_BURST_RATIO, DEFAULT_TEST_FACTOR};
use crate::calculations::reliability::{DEFAULT_SAMPLES, DEFAULT_SENSITIVITY_DELTA, MIN_SAMPLES};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Full fill/empty cycles a hydrogen vehicle tank is qualified for
pub const DEFAULT_REQUIRED_CYCLES: f64 = 11_000.0;

/// Settings for [`crate::design::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Minimum burst pressure / nominal working pressure
    pub burst_ratio: f64,

    /// Proof-test pressure / nominal working pressure
    pub test_factor: f64,

    /// Points per dome profile
    pub dome_points: usize,

    /// Monte Carlo trials per reliability run
    pub reliability_samples: usize,

    /// Coefficient of variation of fiber strength
    pub strength_cov: f64,

    /// Coefficient of variation of applied stress
    pub stress_cov: f64,

    /// Acceptable probability of failure for the reliability check
    pub target_failure_probability: f64,

    /// Pressure cycles the design must survive
    pub required_cycles: f64,

    /// Run the four-parameter sensitivity study
    pub sensitivity: bool,

    /// Finite-difference step for the sensitivity study
    pub sensitivity_delta: f64,

    /// RNG seed; `None` draws from the thread RNG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            burst_ratio: DEFAULT_BURST_RATIO,
            test_factor: DEFAULT_TEST_FACTOR,
            dome_points: DEFAULT_DOME_POINTS,
            reliability_samples: DEFAULT_SAMPLES,
            strength_cov: 0.05,
            stress_cov: 0.10,
            target_failure_probability: 1e-3,
            required_cycles: DEFAULT_REQUIRED_CYCLES,
            sensitivity: false,
            sensitivity_delta: DEFAULT_SENSITIVITY_DELTA,
            seed: None,
        }
    }
}

impl AnalysisSettings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: AnalysisSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings with the same rules the calculations apply.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.burst_ratio > 1.0) {
            return Err(CalcError::invalid_input(
                "burst_ratio",
                self.burst_ratio.to_string(),
                "Burst ratio must be greater than 1",
            ));
        }
        if !(self.test_factor > 1.0) {
            return Err(CalcError::invalid_input(
                "test_factor",
                self.test_factor.to_string(),
                "Test factor must be greater than 1",
            ));
        }
        if self.dome_points < MIN_DOME_POINTS {
            return Err(CalcError::invalid_input(
                "dome_points",
                self.dome_points.to_string(),
                format!("At least {} points are required", MIN_DOME_POINTS),
            ));
        }
        if self.reliability_samples < MIN_SAMPLES {
            return Err(CalcError::invalid_input(
                "reliability_samples",
                self.reliability_samples.to_string(),
                format!("At least {} samples are required", MIN_SAMPLES),
            ));
        }
        require_non_negative("strength_cov", self.strength_cov)?;
        require_non_negative("stress_cov", self.stress_cov)?;
        if !(self.target_failure_probability > 0.0 && self.target_failure_probability < 1.0) {
            return Err(CalcError::invalid_input(
                "target_failure_probability",
                self.target_failure_probability.to_string(),
                "Probability must be strictly between 0 and 1",
            ));
        }
        require_positive("required_cycles", self.required_cycles)?;
        if self.sensitivity_delta == 0.0 || !self.sensitivity_delta.is_finite() {
            return Err(CalcError::invalid_input(
                "sensitivity_delta",
                self.sensitivity_delta.to_string(),
                "Perturbation step must be finite and non-zero",
            ));
        }
        Ok(())
    }
}
