//! # Fatigue Analysis
//!
//! Stress-life (S-N) fatigue for pressure cycling: life from a power-law
//! curve, Goodman mean-stress correction, and Palmgren-Miner damage
//! accumulation.
//!
//! Infinite life (zero amplitude, or amplitude below the endurance limit)
//! is a valid answer and comes back as `f64::INFINITY`.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::fatigue::{estimate_hydrogen_cycle_life, fatigue_safety_factor};
//! use tank_core::materials::CARBON_EPOXY_SN;
//!
//! // 70 MPa (700 bar) fill cycles, r = 175 mm, t = 25 mm
//! let cycle = estimate_hydrogen_cycle_life(70.0, 175.0, 25.0, 2500.0, &CARBON_EPOXY_SN).unwrap();
//! let sf = fatigue_safety_factor(cycle.predicted_cycles, 11_000.0).unwrap();
//! assert!(sf > 1.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::pressure_vessel::hoop_stress;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::materials::SNParameters;

/// Cycles to failure `N = C / S^m` at stress amplitude `S` (MPa).
///
/// Returns infinity when the amplitude is not positive or is below the
/// curve's endurance limit.
pub fn fatigue_life(stress_amplitude: f64, sn: &SNParameters) -> f64 {
    if stress_amplitude <= 0.0 {
        return f64::INFINITY;
    }
    if let Some(limit) = sn.endurance_limit_mpa {
        if stress_amplitude < limit {
            return f64::INFINITY;
        }
    }
    sn.coefficient / stress_amplitude.powf(sn.exponent)
}

/// Stress amplitude (MPa) that gives exactly `target_cycles`, `(C/N)^(1/m)`.
pub fn allowable_stress(target_cycles: f64, sn: &SNParameters) -> CalcResult<f64> {
    require_positive("target_cycles", target_cycles)?;
    Ok((sn.coefficient / target_cycles).powf(1.0 / sn.exponent))
}

/// Alternating component `(max − min) / 2`.
pub fn stress_amplitude(min_stress: f64, max_stress: f64) -> f64 {
    (max_stress - min_stress) / 2.0
}

/// Mean component `(max + min) / 2`.
pub fn mean_stress(min_stress: f64, max_stress: f64) -> f64 {
    (max_stress + min_stress) / 2.0
}

/// Stress ratio `R = min / max`.
pub fn stress_ratio(min_stress: f64, max_stress: f64) -> CalcResult<f64> {
    if max_stress == 0.0 {
        return Err(CalcError::invalid_input(
            "max_stress",
            max_stress.to_string(),
            "Maximum stress must be non-zero to form a stress ratio",
        ));
    }
    Ok(min_stress / max_stress)
}

/// Goodman equivalent fully-reversed amplitude `Sa / (1 − Sm/Su)`.
pub fn goodman_correction(amplitude: f64, mean_stress: f64, ultimate_strength: f64) -> CalcResult<f64> {
    require_positive("ultimate_strength", ultimate_strength)?;
    let denominator = 1.0 - mean_stress / ultimate_strength;
    if denominator <= 0.0 {
        return Err(CalcError::invalid_input(
            "mean_stress",
            mean_stress.to_string(),
            format!("Mean stress must be below the ultimate strength ({} MPa)", ultimate_strength),
        ));
    }
    Ok(amplitude / denominator)
}

/// Miner damage per cycle `1/N`; zero for infinite life.
pub fn damage_per_cycle(stress_amplitude: f64, sn: &SNParameters) -> f64 {
    let life = fatigue_life(stress_amplitude, sn);
    if life.is_infinite() {
        0.0
    } else {
        1.0 / life
    }
}

/// A block of constant-amplitude cycles for damage summation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadBlock {
    /// Stress amplitude (MPa)
    pub stress_amplitude_mpa: f64,
    /// Number of applied cycles
    pub cycles: u64,
}

impl LoadBlock {
    pub fn new(stress_amplitude_mpa: f64, cycles: u64) -> Self {
        LoadBlock {
            stress_amplitude_mpa,
            cycles,
        }
    }
}

/// Palmgren-Miner damage `Σ nᵢ/Nᵢ`. Failure is predicted at 1.0.
///
/// Blocks with infinite life add nothing.
pub fn cumulative_damage(blocks: &[LoadBlock], sn: &SNParameters) -> f64 {
    blocks
        .iter()
        .map(|block| block.cycles as f64 * damage_per_cycle(block.stress_amplitude_mpa, sn))
        .sum()
}

/// Cycles left at `stress_amplitude` after `current_damage` has accrued.
///
/// Zero once damage reaches 1.0; infinite if the amplitude has infinite life.
pub fn remaining_life(current_damage: f64, stress_amplitude: f64, sn: &SNParameters) -> f64 {
    if current_damage >= 1.0 {
        return 0.0;
    }
    let life = fatigue_life(stress_amplitude, sn);
    if life.is_infinite() {
        return f64::INFINITY;
    }
    (1.0 - current_damage.max(0.0)) * life
}

/// Intermediate values of a 0 → NWP hydrogen fill cycle life estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrogenCycleResult {
    /// Hoop stress at nominal working pressure (MPa)
    pub max_stress_mpa: f64,
    /// Alternating stress (MPa)
    pub stress_amplitude_mpa: f64,
    /// Mean stress (MPa)
    pub mean_stress_mpa: f64,
    /// Goodman-corrected fully-reversed amplitude (MPa)
    pub equivalent_amplitude_mpa: f64,
    /// Predicted cycles to failure (may be infinite)
    pub predicted_cycles: f64,
}

impl HydrogenCycleResult {
    /// Fill cycle whose mean stress already reaches the ultimate strength.
    ///
    /// No Goodman amplitude exists, so the equivalent amplitude is infinite
    /// and the predicted life is zero cycles.
    pub fn exhausted(max_stress_mpa: f64) -> Self {
        let amplitude = stress_amplitude(0.0, max_stress_mpa);
        HydrogenCycleResult {
            max_stress_mpa,
            stress_amplitude_mpa: amplitude,
            mean_stress_mpa: mean_stress(0.0, max_stress_mpa),
            equivalent_amplitude_mpa: f64::INFINITY,
            predicted_cycles: 0.0,
        }
    }
}

/// Fatigue life for repeated empty → full → empty hydrogen fills.
///
/// The hoop stress swings from 0 to `p·r/t`, giving equal amplitude and
/// mean. The amplitude is Goodman-corrected against `ultimate_strength`
/// before the S-N lookup.
pub fn estimate_hydrogen_cycle_life(
    working_pressure: f64,
    radius: f64,
    thickness: f64,
    ultimate_strength: f64,
    sn: &SNParameters,
) -> CalcResult<HydrogenCycleResult> {
    let max_stress = hoop_stress(working_pressure, radius, thickness)?;
    let min_stress = 0.0;

    let amplitude = stress_amplitude(min_stress, max_stress);
    let mean = mean_stress(min_stress, max_stress);
    let equivalent = goodman_correction(amplitude, mean, ultimate_strength)?;

    if equivalent > ultimate_strength {
        warn!(
            equivalent_amplitude_mpa = equivalent,
            ultimate_strength_mpa = ultimate_strength,
            "Goodman-corrected amplitude exceeds ultimate strength"
        );
    }

    Ok(HydrogenCycleResult {
        max_stress_mpa: max_stress,
        stress_amplitude_mpa: amplitude,
        mean_stress_mpa: mean,
        equivalent_amplitude_mpa: equivalent,
        predicted_cycles: fatigue_life(equivalent, sn),
    })
}

/// Ratio of predicted to required life; infinite when predicted is infinite.
pub fn fatigue_safety_factor(predicted: f64, required: f64) -> CalcResult<f64> {
    require_positive("required", required)?;
    if predicted.is_infinite() {
        return Ok(f64::INFINITY);
    }
    Ok(predicted / required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{CARBON_EPOXY_SN, GLASS_EPOXY_SN};

    fn simple_curve() -> SNParameters {
        SNParameters {
            coefficient: 1.0e12,
            exponent: 3.0,
            endurance_limit_mpa: Some(50.0),
        }
    }

    #[test]
    fn test_fatigue_life_basic() {
        // 1e12 / 100^3 = 1e6
        assert!((fatigue_life(100.0, &simple_curve()) - 1.0e6).abs() < 1e-3);
    }

    #[test]
    fn test_infinite_life_cases() {
        let sn = simple_curve();
        assert!(fatigue_life(0.0, &sn).is_infinite());
        assert!(fatigue_life(-10.0, &sn).is_infinite());
        assert!(fatigue_life(49.9, &sn).is_infinite());
        assert!(fatigue_life(50.0, &sn).is_finite());
        assert!(fatigue_life(0.0, &CARBON_EPOXY_SN).is_infinite());
    }

    #[test]
    fn test_life_strictly_decreasing() {
        let sn = simple_curve();
        let lives: Vec<f64> = (0..20).map(|i| fatigue_life(50.0 + 25.0 * i as f64, &sn)).collect();
        for pair in lives.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_allowable_stress_inverts_life() {
        for sn in [CARBON_EPOXY_SN, GLASS_EPOXY_SN] {
            let s = allowable_stress(1.0e5, &sn).unwrap();
            let n = fatigue_life(s, &sn);
            assert!((n - 1.0e5).abs() / 1.0e5 < 1e-9);
        }
        assert!(allowable_stress(0.0, &CARBON_EPOXY_SN).is_err());
        assert!(allowable_stress(-5.0, &CARBON_EPOXY_SN).is_err());
    }

    #[test]
    fn test_cyclic_bookkeeping() {
        assert_eq!(stress_amplitude(0.0, 490.0), 245.0);
        assert_eq!(mean_stress(0.0, 490.0), 245.0);
        assert_eq!(stress_ratio(49.0, 490.0).unwrap(), 0.1);
        assert!(stress_ratio(10.0, 0.0).is_err());
    }

    #[test]
    fn test_goodman() {
        // 245 / (1 - 245/2500) = 271.6186
        let eq = goodman_correction(245.0, 245.0, 2500.0).unwrap();
        assert!((eq - 271.6186).abs() < 1e-3);
        assert_eq!(goodman_correction(100.0, 0.0, 2500.0).unwrap(), 100.0);
        assert!(goodman_correction(100.0, 2500.0, 2500.0).is_err());
        assert!(goodman_correction(100.0, 3000.0, 2500.0).is_err());
    }

    #[test]
    fn test_miner_summation() {
        let sn = simple_curve();
        // N(100) = 1e6, N(200) = 1.25e5, N(10) = inf
        let blocks = [
            LoadBlock::new(100.0, 250_000),
            LoadBlock::new(200.0, 62_500),
            LoadBlock::new(10.0, 1_000_000_000),
        ];
        let damage = cumulative_damage(&blocks, &sn);
        assert!((damage - 0.75).abs() < 1e-9);
        assert_eq!(cumulative_damage(&[], &sn), 0.0);
        assert_eq!(damage_per_cycle(10.0, &sn), 0.0);
    }

    #[test]
    fn test_remaining_life() {
        let sn = simple_curve();
        assert!((remaining_life(0.75, 100.0, &sn) - 250_000.0).abs() < 1e-3);
        assert_eq!(remaining_life(1.0, 100.0, &sn), 0.0);
        assert_eq!(remaining_life(1.3, 100.0, &sn), 0.0);
        assert!(remaining_life(0.5, 10.0, &sn).is_infinite());
    }

    #[test]
    fn test_hydrogen_cycle_life() {
        let result = estimate_hydrogen_cycle_life(70.0, 175.0, 25.0, 2500.0, &CARBON_EPOXY_SN).unwrap();
        assert!((result.max_stress_mpa - 490.0).abs() < 1e-9);
        assert_eq!(result.stress_amplitude_mpa, result.mean_stress_mpa);
        assert!(result.equivalent_amplitude_mpa > result.stress_amplitude_mpa);
        let expected = fatigue_life(result.equivalent_amplitude_mpa, &CARBON_EPOXY_SN);
        assert_eq!(result.predicted_cycles, expected);
        assert!(result.predicted_cycles > 1.0e6);

        assert!(estimate_hydrogen_cycle_life(70.0, 175.0, 0.0, 2500.0, &CARBON_EPOXY_SN).is_err());
        // Peak hoop stress of 7000 MPa puts the mean above ultimate
        assert!(estimate_hydrogen_cycle_life(1000.0, 175.0, 25.0, 2500.0, &CARBON_EPOXY_SN).is_err());
    }

    #[test]
    fn test_exhausted_cycle() {
        let result = HydrogenCycleResult::exhausted(6000.0);
        assert_eq!(result.stress_amplitude_mpa, 3000.0);
        assert_eq!(result.mean_stress_mpa, 3000.0);
        assert!(result.equivalent_amplitude_mpa.is_infinite());
        assert_eq!(result.predicted_cycles, 0.0);
        assert_eq!(fatigue_safety_factor(result.predicted_cycles, 11_000.0).unwrap(), 0.0);
    }

    #[test]
    fn test_fatigue_safety_factor() {
        assert_eq!(fatigue_safety_factor(22_000.0, 11_000.0).unwrap(), 2.0);
        assert!(fatigue_safety_factor(f64::INFINITY, 11_000.0).unwrap().is_infinite());
        assert!(fatigue_safety_factor(22_000.0, 0.0).is_err());
    }
}
