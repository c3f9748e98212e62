//! # Design Evaluation
//!
//! Runs one tank design record through the whole calculation chain:
//! geometry → membrane stresses → ply failure, pressure rating, fatigue,
//! and reliability. This is the entry point a CLI, web service, or
//! optimizer calls to score a candidate design.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::design::{evaluate, TankDesign};
//! use tank_core::settings::AnalysisSettings;
//!
//! let design = TankDesign::from_json(r#"{
//!     "label": "T4-700-A",
//!     "nominal_working_pressure_bar": 700.0,
//!     "inner_radius_mm": 175.0,
//!     "wall_thickness_mm": 25.0,
//!     "cylinder_length_mm": 800.0,
//!     "winding_angle_deg": 54.7,
//!     "boss_radius_mm": 25.0,
//!     "material": "carbon-epoxy"
//! }"#).unwrap();
//!
//! let settings = AnalysisSettings { seed: Some(1), ..AnalysisSettings::default() };
//! let eval = evaluate(&design, &settings).unwrap();
//! assert!((eval.cylinder.stress_ratio - 2.0).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::composite_failure::{analyze_ply, PlyFailureResult};
use crate::calculations::dome::{generate_dome, DomeInput, DomeProfile, DomeShape};
use crate::calculations::fatigue::{estimate_hydrogen_cycle_life, fatigue_safety_factor, mean_stress, HydrogenCycleResult};
use crate::calculations::pressure_vessel::{
    analyze_cylinder, burst_pressure, netting_fiber_stress, pressure_ratings, required_thickness, stored_energy,
    CylinderInput, CylinderStressResult, PressureRatings,
};
use crate::calculations::reliability::{
    calculate_reliability_with_rng, create_rng, required_beta, sensitivity_analysis_with_rng, MonteCarloResult,
    ReliabilityInput, SensitivityParameter, SensitivityResult,
};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::CompositeMaterial;
use crate::settings::AnalysisSettings;
use crate::units::{Bar, CubicMeters, CubicMillimeters, Megajoules, Megapascals};

/// A candidate tank design as stored in a JSON design record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "T4-700-A",
///   "nominal_working_pressure_bar": 700.0,
///   "inner_radius_mm": 175.0,
///   "wall_thickness_mm": 25.0,
///   "cylinder_length_mm": 800.0,
///   "winding_angle_deg": 54.7,
///   "boss_radius_mm": 25.0,
///   "material": "carbon-epoxy"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDesign {
    /// User label (e.g., "T4-700-A")
    pub label: String,

    /// Nominal working pressure in bar (350 and 700 are the common ratings)
    pub nominal_working_pressure_bar: f64,

    /// Liner outer / laminate inner radius (mm)
    pub inner_radius_mm: f64,

    /// Composite wall thickness in the cylinder (mm)
    pub wall_thickness_mm: f64,

    /// Length of the cylindrical section between dome junctions (mm)
    pub cylinder_length_mm: f64,

    /// Helical winding angle from the vessel axis (degrees)
    pub winding_angle_deg: f64,

    /// Polar boss opening radius (mm)
    pub boss_radius_mm: f64,

    /// Composite material name, e.g. "carbon-epoxy"
    pub material: String,
}

impl TankDesign {
    /// Parse and validate a design record.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let design: TankDesign = serde_json::from_str(json)?;
        design.validate()?;
        Ok(design)
    }

    /// Validate geometry and resolve the material name.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("nominal_working_pressure_bar", self.nominal_working_pressure_bar)?;
        require_positive("inner_radius_mm", self.inner_radius_mm)?;
        require_positive("wall_thickness_mm", self.wall_thickness_mm)?;
        if !(self.winding_angle_deg > 0.0 && self.winding_angle_deg < 90.0) {
            return Err(CalcError::invalid_input(
                "winding_angle_deg",
                self.winding_angle_deg.to_string(),
                "Helical winding angle must be between 0 and 90 degrees",
            ));
        }
        require_non_negative("cylinder_length_mm", self.cylinder_length_mm)?;
        require_non_negative("boss_radius_mm", self.boss_radius_mm)?;
        self.composite_material()?;
        Ok(())
    }

    /// Look up the named material
    pub fn composite_material(&self) -> CalcResult<CompositeMaterial> {
        self.material.parse()
    }

    /// Nominal working pressure in MPa
    pub fn working_pressure(&self) -> Megapascals {
        Bar(self.nominal_working_pressure_bar).into()
    }

    /// Mid-wall radius used for membrane stresses (mm)
    pub fn mid_wall_radius_mm(&self) -> f64 {
        self.inner_radius_mm + 0.5 * self.wall_thickness_mm
    }
}

/// Everything computed for one design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignEvaluation {
    pub label: String,
    pub material: CompositeMaterial,
    pub working_pressure: Megapascals,

    /// Membrane stresses at nominal working pressure
    pub cylinder: CylinderStressResult,

    /// Ply check of the helical layer at nominal working pressure
    pub ply: PlyFailureResult,

    /// Netting-analysis fiber stress at nominal working pressure (MPa)
    pub fiber_stress_mpa: f64,

    /// Fiber stress / fiber tensile strength
    pub fiber_stress_ratio: f64,

    /// Ratings implied by the laminate's burst capacity
    pub ratings: PressureRatings,

    /// Thickness needed for the burst requirement at this pressure (mm)
    pub required_thickness_mm: f64,

    /// One end dome built on the inner radius
    pub dome: DomeProfile,

    /// Internal volume of cylinder plus both domes
    pub internal_volume: CubicMeters,

    /// Pressure-volume energy at working pressure
    pub stored_energy: Megajoules,

    /// 0 → NWP fill-cycle fatigue estimate
    pub fatigue: HydrogenCycleResult,

    /// Predicted / required cycles (serialized as null when infinite)
    pub fatigue_safety_factor: f64,

    /// Fiber-direction stress vs. strength Monte Carlo run
    pub reliability: MonteCarloResult,

    /// β needed for the target failure probability
    pub required_reliability_index: f64,

    /// Present when sensitivity analysis was requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sensitivities: Vec<SensitivityResult>,
}

impl DesignEvaluation {
    /// Working pressure is within the rated working pressure
    pub fn meets_pressure_rating(&self) -> bool {
        self.working_pressure.0 <= self.ratings.working_pressure_mpa
    }

    /// Names of the checks that fail, in evaluation order
    pub fn failed_checks(&self) -> Vec<&'static str> {
        let checks = [
            ("Fiber stress", self.fiber_stress_ratio <= 1.0),
            ("Pressure rating", self.meets_pressure_rating()),
            ("Fatigue", self.fatigue_safety_factor >= 1.0),
            ("Reliability", self.reliability.reliability_index >= self.required_reliability_index),
        ];
        checks
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// All checks pass
    pub fn passes(&self) -> bool {
        self.failed_checks().is_empty()
    }
}

/// Evaluate a design, seeding the RNG from `settings.seed` when present.
pub fn evaluate(design: &TankDesign, settings: &AnalysisSettings) -> CalcResult<DesignEvaluation> {
    match settings.seed {
        Some(seed) => evaluate_with_rng(design, settings, &mut create_rng(seed)),
        None => evaluate_with_rng(design, settings, &mut rand::rng()),
    }
}

/// Evaluate a design with a caller-supplied RNG for the Monte Carlo runs.
pub fn evaluate_with_rng<R: Rng>(design: &TankDesign, settings: &AnalysisSettings, rng: &mut R) -> CalcResult<DesignEvaluation> {
    design.validate()?;
    settings.validate()?;

    let material = design.composite_material()?;
    let strengths = material.strengths();
    let ultimate = material.fiber_tensile_strength_mpa();
    let pressure = design.working_pressure();
    let radius = design.mid_wall_radius_mm();
    let thickness = design.wall_thickness_mm;

    // Stresses
    let cylinder = analyze_cylinder(&CylinderInput {
        pressure_mpa: pressure.0,
        radius_mm: radius,
        thickness_mm: thickness,
    })?;
    let ply = analyze_ply(
        cylinder.hoop_stress_mpa,
        cylinder.axial_stress_mpa,
        design.winding_angle_deg,
        &strengths,
    );
    let fiber_stress_mpa = netting_fiber_stress(
        cylinder.hoop_stress_mpa,
        cylinder.axial_stress_mpa,
        design.winding_angle_deg,
    )?;

    // Ratings: burst at full fiber strength, derated by the burst ratio
    let burst = burst_pressure(ultimate, thickness, radius, 1.0)?;
    let ratings = pressure_ratings(burst, settings.burst_ratio, settings.test_factor)?;
    let required_thickness_mm = required_thickness((pressure * settings.burst_ratio).value(), radius, ultimate)?;

    // Geometry
    let dome = generate_dome(&DomeInput {
        r0_mm: design.inner_radius_mm,
        boss_radius_mm: design.boss_radius_mm,
        num_points: settings.dome_points,
        shape: DomeShape::Isotensoid {
            alpha0_deg: design.winding_angle_deg,
        },
    })?;
    let cylinder_volume = CubicMillimeters(PI * design.inner_radius_mm.powi(2) * design.cylinder_length_mm);
    let internal_volume: CubicMeters = (cylinder_volume + CubicMillimeters(dome.volume_mm3) * 2.0).into();
    let stored_energy = Megajoules(stored_energy(pressure.0, internal_volume.0)?);

    // Fatigue: a fill cycle whose mean stress reaches ultimate has no life
    let fatigue = if mean_stress(0.0, cylinder.hoop_stress_mpa) >= ultimate {
        warn!(
            label = %design.label,
            hoop_stress_mpa = cylinder.hoop_stress_mpa,
            ultimate_strength_mpa = ultimate,
            "fill-cycle mean stress at or above ultimate strength"
        );
        HydrogenCycleResult::exhausted(cylinder.hoop_stress_mpa)
    } else {
        estimate_hydrogen_cycle_life(pressure.0, radius, thickness, ultimate, &material.sn_parameters())?
    };
    let fatigue_sf = fatigue_safety_factor(fatigue.predicted_cycles, settings.required_cycles)?;

    // Reliability
    let reliability_input = ReliabilityInput {
        design_stress_mpa: fiber_stress_mpa,
        material_strength_mpa: ultimate,
        strength_cov: settings.strength_cov,
        stress_cov: settings.stress_cov,
        num_samples: settings.reliability_samples,
    };
    let reliability = calculate_reliability_with_rng(&reliability_input, rng)?;
    let required_reliability_index = required_beta(settings.target_failure_probability)?;

    let sensitivities = if settings.sensitivity {
        SensitivityParameter::ALL
            .iter()
            .map(|&param| sensitivity_analysis_with_rng(&reliability_input, param, settings.sensitivity_delta, rng))
            .collect::<CalcResult<Vec<_>>>()?
    } else {
        Vec::new()
    };

    debug!(
        label = %design.label,
        hoop_stress_mpa = cylinder.hoop_stress_mpa,
        tsai_wu = ply.tsai_wu_index,
        dome_depth_mm = dome.depth_mm,
        "design stresses and geometry computed"
    );

    let evaluation = DesignEvaluation {
        label: design.label.clone(),
        material,
        working_pressure: pressure,
        cylinder,
        ply,
        fiber_stress_mpa,
        fiber_stress_ratio: fiber_stress_mpa / ultimate,
        ratings,
        required_thickness_mm,
        dome,
        internal_volume,
        stored_energy,
        fatigue,
        fatigue_safety_factor: fatigue_sf,
        reliability,
        required_reliability_index,
        sensitivities,
    };

    info!(
        label = %evaluation.label,
        passes = evaluation.passes(),
        failed = ?evaluation.failed_checks(),
        "design evaluated"
    );

    Ok(evaluation)
}
