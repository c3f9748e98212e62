//! # Pressure-Vessel Mechanics
//!
//! Thin-wall membrane stresses and pressure-rating relations for the
//! cylindrical section of a vessel under internal pressure.
//!
//! ## Assumptions
//!
//! - Thin wall (r/t > ~10), membrane stresses only
//! - Closed ends, so the axial stress carries the end-cap load
//! - Radius and thickness in the same length unit (stresses only depend on r/t)
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::pressure_vessel::{hoop_stress, axial_stress};
//!
//! let hoop = hoop_stress(70.0, 0.175, 0.025).unwrap();
//! let axial = axial_stress(70.0, 0.175, 0.025).unwrap();
//! assert!((hoop - 490.0).abs() < 1e-9);
//! assert!((axial - 245.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Default burst ratio (minimum burst / nominal working pressure)
pub const DEFAULT_BURST_RATIO: f64 = 2.25;

/// Default hydrostatic proof-test factor (test / working pressure)
pub const DEFAULT_TEST_FACTOR: f64 = 1.5;

fn validate_geometry(radius: f64, thickness: f64) -> CalcResult<()> {
    require_positive("radius", radius)?;
    require_positive("thickness", thickness)?;
    Ok(())
}

/// Circumferential (hoop) stress `σθ = p·r / t` in MPa.
pub fn hoop_stress(pressure: f64, radius: f64, thickness: f64) -> CalcResult<f64> {
    validate_geometry(radius, thickness)?;
    Ok(pressure * radius / thickness)
}

/// Longitudinal (axial) stress `σz = p·r / 2t` in MPa.
///
/// Always exactly half the hoop stress for the same inputs.
pub fn axial_stress(pressure: f64, radius: f64, thickness: f64) -> CalcResult<f64> {
    validate_geometry(radius, thickness)?;
    Ok(pressure * radius / (2.0 * thickness))
}

/// Burst pressure `σu·t / (r·SF)` in MPa.
pub fn burst_pressure(tensile_strength: f64, thickness: f64, radius: f64, safety_factor: f64) -> CalcResult<f64> {
    require_positive("radius", radius)?;
    require_positive("safety_factor", safety_factor)?;
    Ok(tensile_strength * thickness / (radius * safety_factor))
}

/// Netting-theory optimal helical winding angle `atan(√2)` ≈ 54.7356°.
///
/// At this angle a helical layer alone carries the 2:1 hoop/axial stress
/// ratio of a closed cylinder with fibers in pure tension.
pub fn netting_theory_angle() -> f64 {
    2.0_f64.sqrt().atan().to_degrees()
}

/// Fiber stress in a helical layer by netting analysis, in MPa.
///
/// Fibers alone carry the membrane load: `σθ / sin²α` in hoop and
/// `σz / cos²α` axially. The larger of the two governs; they are equal at
/// the netting angle under a 2:1 stress ratio.
pub fn netting_fiber_stress(sigma_hoop: f64, sigma_axial: f64, winding_angle_deg: f64) -> CalcResult<f64> {
    if !(winding_angle_deg > 0.0 && winding_angle_deg < 90.0) {
        return Err(CalcError::invalid_input(
            "winding_angle_deg",
            winding_angle_deg.to_string(),
            "Helical winding angle must be between 0 and 90 degrees",
        ));
    }
    let alpha = winding_angle_deg.to_radians();
    let from_hoop = sigma_hoop / alpha.sin().powi(2);
    let from_axial = sigma_axial / alpha.cos().powi(2);
    Ok(from_hoop.max(from_axial))
}

/// Nominal working pressure from a burst pressure and burst ratio.
pub fn working_pressure(burst_pressure: f64, burst_ratio: f64) -> CalcResult<f64> {
    if !(burst_ratio > 1.0) {
        return Err(CalcError::invalid_input(
            "burst_ratio",
            burst_ratio.to_string(),
            "Burst ratio must be greater than 1",
        ));
    }
    Ok(burst_pressure / burst_ratio)
}

/// Proof-test pressure from the working pressure.
pub fn test_pressure(working_pressure: f64, test_factor: f64) -> CalcResult<f64> {
    if !(test_factor > 1.0) {
        return Err(CalcError::invalid_input(
            "test_factor",
            test_factor.to_string(),
            "Test factor must be greater than 1",
        ));
    }
    Ok(working_pressure * test_factor)
}

/// Wall thickness needed to hold `pressure` at `allowable_stress` in hoop.
pub fn required_thickness(pressure: f64, radius: f64, allowable_stress: f64) -> CalcResult<f64> {
    require_positive("allowable_stress", allowable_stress)?;
    Ok(pressure * radius / allowable_stress)
}

/// Stored pressure-volume energy `p·V`.
///
/// With `pressure` in MPa and `volume` in m³ the result is in MJ.
pub fn stored_energy(pressure: f64, volume: f64) -> CalcResult<f64> {
    require_non_negative("pressure", pressure)?;
    require_non_negative("volume", volume)?;
    Ok(pressure * volume)
}

/// Input for a cylinder stress check.
///
/// ## JSON Example
///
/// ```json
/// { "pressure_mpa": 70.0, "radius_mm": 175.0, "thickness_mm": 25.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderInput {
    /// Internal pressure (MPa)
    pub pressure_mpa: f64,
    /// Mid-wall radius (mm)
    pub radius_mm: f64,
    /// Wall thickness (mm)
    pub thickness_mm: f64,
}

/// Membrane stresses in the cylindrical section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderStressResult {
    /// Hoop stress (MPa)
    pub hoop_stress_mpa: f64,
    /// Axial stress (MPa)
    pub axial_stress_mpa: f64,
    /// Hoop/axial ratio, 2.0 for a closed thin-wall cylinder
    pub stress_ratio: f64,
    /// Radius-to-thickness ratio (thin-wall validity indicator)
    pub radius_to_thickness: f64,
}

impl CylinderStressResult {
    /// Thin-wall theory is only accurate above r/t of about 10
    pub fn is_thin_wall(&self) -> bool {
        self.radius_to_thickness >= 10.0
    }
}

/// Compute hoop and axial stress together.
pub fn analyze_cylinder(input: &CylinderInput) -> CalcResult<CylinderStressResult> {
    let hoop = hoop_stress(input.pressure_mpa, input.radius_mm, input.thickness_mm)?;
    let axial = axial_stress(input.pressure_mpa, input.radius_mm, input.thickness_mm)?;

    Ok(CylinderStressResult {
        hoop_stress_mpa: hoop,
        axial_stress_mpa: axial,
        stress_ratio: if axial != 0.0 { hoop / axial } else { 2.0 },
        radius_to_thickness: input.radius_mm / input.thickness_mm,
    })
}

/// Burst, working, and proof-test pressures for one vessel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureRatings {
    /// Burst pressure (MPa)
    pub burst_pressure_mpa: f64,
    /// Nominal working pressure (MPa)
    pub working_pressure_mpa: f64,
    /// Proof-test pressure (MPa)
    pub test_pressure_mpa: f64,
}

/// Derive working and test pressures from a burst pressure.
pub fn pressure_ratings(burst_pressure_mpa: f64, burst_ratio: f64, test_factor: f64) -> CalcResult<PressureRatings> {
    let working = working_pressure(burst_pressure_mpa, burst_ratio)?;
    let test = test_pressure(working, test_factor)?;
    Ok(PressureRatings {
        burst_pressure_mpa,
        working_pressure_mpa: working,
        test_pressure_mpa: test,
    })
}
