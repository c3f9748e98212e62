//! # Composite Failure Analysis
//!
//! Ply-level failure prediction under combined in-plane stress using the
//! Tsai-Wu quadratic criterion and the four-mode Hashin criteria.
//!
//! Stresses are in MPa in the fiber-aligned frame: `sigma1` along the fiber,
//! `sigma2` transverse, `tau12` in-plane shear. Use [`transform_stresses`]
//! to rotate vessel hoop/axial stresses into that frame first.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::composite_failure::{tsai_wu_index, margin_of_safety};
//! use tank_core::materials::CARBON_EPOXY;
//!
//! let index = tsai_wu_index(490.0, 30.0, 10.0, &CARBON_EPOXY);
//! assert!(index < 1.0);
//! assert!(margin_of_safety(index) > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::materials::MaterialStrengths;

/// Tsai-Wu failure index. Below 1.0 is safe, 1.0 and above predicts failure.
///
/// The interaction coefficient uses the conservative estimate
/// `F12 = -0.5·√(F11·F22)` rather than a biaxial-test value.
///
/// Zero strengths are not rejected; the resulting infinities propagate.
pub fn tsai_wu_index(sigma1: f64, sigma2: f64, tau12: f64, strengths: &MaterialStrengths) -> f64 {
    let MaterialStrengths {
        xt_mpa: xt,
        xc_mpa: xc,
        yt_mpa: yt,
        yc_mpa: yc,
        s_mpa: s,
    } = *strengths;

    let f1 = 1.0 / xt - 1.0 / xc;
    let f2 = 1.0 / yt - 1.0 / yc;
    let f11 = 1.0 / (xt * xc);
    let f22 = 1.0 / (yt * yc);
    let f66 = 1.0 / (s * s);
    let f12 = -0.5 * (f11 * f22).sqrt();

    f1 * sigma1
        + f2 * sigma2
        + f11 * sigma1 * sigma1
        + f22 * sigma2 * sigma2
        + f66 * tau12 * tau12
        + 2.0 * f12 * sigma1 * sigma2
}

/// Margin of safety `1/√index − 1`; infinite when the index is not positive.
pub fn margin_of_safety(index: f64) -> f64 {
    if index <= 0.0 {
        return f64::INFINITY;
    }
    1.0 / index.sqrt() - 1.0
}

/// Safety factor `1/√index`; infinite when the index is not positive.
pub fn safety_factor(index: f64) -> f64 {
    if index <= 0.0 {
        return f64::INFINITY;
    }
    1.0 / index.sqrt()
}

/// Load multiplier to reach failure, `1/√index`.
///
/// Same value as [`safety_factor`], named for load-scaling use.
pub fn failure_multiplier(index: f64) -> f64 {
    safety_factor(index)
}

/// Hashin failure indices, one per mode. Any value above 1.0 is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HashinIndices {
    pub fiber_tension: f64,
    pub fiber_compression: f64,
    pub matrix_tension: f64,
    pub matrix_compression: f64,
}

impl HashinIndices {
    /// Largest of the four indices
    pub fn max_index(&self) -> f64 {
        self.by_mode()
            .iter()
            .fold(0.0_f64, |best, &(_, value)| best.max(value))
    }

    /// Indices paired with their mode, in declaration order
    fn by_mode(&self) -> [(FailureMode, f64); 4] {
        [
            (FailureMode::FiberTension, self.fiber_tension),
            (FailureMode::FiberCompression, self.fiber_compression),
            (FailureMode::MatrixTension, self.matrix_tension),
            (FailureMode::MatrixCompression, self.matrix_compression),
        ]
    }
}

/// Hashin (1980) criteria.
///
/// The sign of `sigma1` selects the fiber mode and the sign of `sigma2`
/// selects the matrix mode; a zero stress counts as tension. The other
/// index of each pair stays 0.0.
pub fn hashin_indices(sigma1: f64, sigma2: f64, tau12: f64, strengths: &MaterialStrengths) -> HashinIndices {
    let MaterialStrengths {
        xt_mpa: xt,
        xc_mpa: xc,
        yt_mpa: yt,
        yc_mpa: yc,
        s_mpa: s,
    } = *strengths;

    let shear_term = (tau12 / s).powi(2);
    let mut indices = HashinIndices::default();

    if sigma1 >= 0.0 {
        indices.fiber_tension = (sigma1 / xt).powi(2) + shear_term;
    } else {
        indices.fiber_compression = (sigma1 / xc).powi(2);
    }

    if sigma2 >= 0.0 {
        indices.matrix_tension = (sigma2 / yt).powi(2) + shear_term;
    } else {
        indices.matrix_compression =
            (sigma2 / (2.0 * s)).powi(2) + ((yc / (2.0 * s)).powi(2) - 1.0) * (sigma2 / yc) + shear_term;
    }

    indices
}

/// Ply failure mode predicted by the Hashin criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureMode {
    None,
    FiberTension,
    FiberCompression,
    MatrixTension,
    MatrixCompression,
}

impl FailureMode {
    /// True for every mode except `None`
    pub fn is_failure(&self) -> bool {
        !matches!(self, FailureMode::None)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FailureMode::None => "No failure",
            FailureMode::FiberTension => "Fiber tension",
            FailureMode::FiberCompression => "Fiber compression",
            FailureMode::MatrixTension => "Matrix tension",
            FailureMode::MatrixCompression => "Matrix compression",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mode with the largest index, or `None` when that index is below 1.0.
///
/// Ties go to the mode declared first (fiber before matrix, tension before
/// compression).
pub fn predict_failure_mode(indices: &HashinIndices) -> FailureMode {
    let (mode, max) = indices
        .by_mode()
        .into_iter()
        .fold((FailureMode::None, f64::NEG_INFINITY), |(best_mode, best), (mode, value)| {
            if value > best {
                (mode, value)
            } else {
                (best_mode, best)
            }
        });

    if max < 1.0 {
        FailureMode::None
    } else {
        mode
    }
}

/// Stresses in the fiber-aligned frame (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyStresses {
    pub sigma1: f64,
    pub sigma2: f64,
    pub tau12: f64,
}

/// Rotate hoop/axial membrane stresses into the fiber frame.
///
/// `fiber_angle` is the winding angle in degrees measured from the vessel
/// axis: 0° puts the fiber along the axial direction, 90° is a hoop wrap.
/// The global shear stress is zero for a pressurized cylinder.
pub fn transform_stresses(sigma_hoop: f64, sigma_axial: f64, fiber_angle: f64) -> PlyStresses {
    let theta = fiber_angle.to_radians();
    let c = theta.cos();
    let s = theta.sin();

    PlyStresses {
        sigma1: sigma_axial * c * c + sigma_hoop * s * s,
        sigma2: sigma_axial * s * s + sigma_hoop * c * c,
        tau12: (sigma_hoop - sigma_axial) * s * c,
    }
}

/// Complete ply check at one winding angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyFailureResult {
    /// Stresses in the fiber frame
    pub stresses: PlyStresses,
    /// Tsai-Wu index
    pub tsai_wu_index: f64,
    /// Tsai-Wu margin of safety (infinite when unloaded)
    pub margin_of_safety: f64,
    /// Hashin indices
    pub hashin: HashinIndices,
    /// Governing Hashin mode
    pub failure_mode: FailureMode,
}

impl PlyFailureResult {
    /// Both criteria agree the ply survives
    pub fn passes(&self) -> bool {
        self.tsai_wu_index < 1.0 && !self.failure_mode.is_failure()
    }
}

/// Transform vessel stresses to the ply frame and run both criteria.
pub fn analyze_ply(sigma_hoop: f64, sigma_axial: f64, fiber_angle: f64, strengths: &MaterialStrengths) -> PlyFailureResult {
    let stresses = transform_stresses(sigma_hoop, sigma_axial, fiber_angle);
    let index = tsai_wu_index(stresses.sigma1, stresses.sigma2, stresses.tau12, strengths);
    let hashin = hashin_indices(stresses.sigma1, stresses.sigma2, stresses.tau12, strengths);

    PlyFailureResult {
        stresses,
        tsai_wu_index: index,
        margin_of_safety: margin_of_safety(index),
        hashin,
        failure_mode: predict_failure_mode(&hashin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::CARBON_EPOXY;

    #[test]
    fn test_tsai_wu_fixtures() {
        assert!(tsai_wu_index(490.0, 30.0, 10.0, &CARBON_EPOXY) < 1.0);
        assert!(tsai_wu_index(3000.0, 30.0, 10.0, &CARBON_EPOXY) > 1.0);
    }

    #[test]
    fn test_tsai_wu_uniaxial_at_strength() {
        // Pure longitudinal tension at Xt: F1*Xt + F11*Xt^2 = 1 exactly
        let index = tsai_wu_index(2500.0, 0.0, 0.0, &CARBON_EPOXY);
        assert!((index - 1.0).abs() < 1e-12);
        let index = tsai_wu_index(0.0, -200.0, 0.0, &CARBON_EPOXY);
        assert!((index - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_stress_margins_are_infinite() {
        assert_eq!(tsai_wu_index(0.0, 0.0, 0.0, &CARBON_EPOXY), 0.0);
        assert!(margin_of_safety(0.0).is_infinite());
        assert!(safety_factor(-0.2).is_infinite());
        assert!(failure_multiplier(0.0).is_infinite());
    }

    #[test]
    fn test_margin_from_index() {
        assert!((safety_factor(0.25) - 2.0).abs() < 1e-12);
        assert!((margin_of_safety(0.25) - 1.0).abs() < 1e-12);
        assert!(margin_of_safety(4.0) < 0.0);
    }

    #[test]
    fn test_hashin_tension_modes() {
        let idx = hashin_indices(1250.0, 40.0, 50.0, &CARBON_EPOXY);
        // (0.5)^2 + (0.5)^2
        assert!((idx.fiber_tension - 0.5).abs() < 1e-12);
        assert_eq!(idx.fiber_compression, 0.0);
        assert!((idx.matrix_tension - 0.5).abs() < 1e-12);
        assert_eq!(idx.matrix_compression, 0.0);
    }

    #[test]
    fn test_hashin_compression_modes() {
        let idx = hashin_indices(-600.0, -100.0, 0.0, &CARBON_EPOXY);
        assert_eq!(idx.fiber_tension, 0.0);
        assert!((idx.fiber_compression - 0.25).abs() < 1e-12);
        assert_eq!(idx.matrix_tension, 0.0);
        // (100/200)^2 + ((200/200)^2 - 1)(-100/200) = 0.25
        assert!((idx.matrix_compression - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_hashin_matrix_compression_at_strength() {
        let idx = hashin_indices(0.0, -200.0, 0.0, &CARBON_EPOXY);
        assert!((idx.matrix_compression - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_failure_mode() {
        let safe = hashin_indices(490.0, 30.0, 10.0, &CARBON_EPOXY);
        assert_eq!(predict_failure_mode(&safe), FailureMode::None);

        let matrix = hashin_indices(490.0, 120.0, 10.0, &CARBON_EPOXY);
        assert_eq!(predict_failure_mode(&matrix), FailureMode::MatrixTension);

        let fiber = hashin_indices(-1500.0, 10.0, 0.0, &CARBON_EPOXY);
        assert_eq!(predict_failure_mode(&fiber), FailureMode::FiberCompression);
    }

    #[test]
    fn test_predict_failure_mode_tie_break() {
        let tied = HashinIndices {
            fiber_tension: 0.0,
            fiber_compression: 1.5,
            matrix_tension: 1.5,
            matrix_compression: 0.0,
        };
        assert_eq!(predict_failure_mode(&tied), FailureMode::FiberCompression);
        assert_eq!(tied.max_index(), 1.5);
    }

    #[test]
    fn test_transform_stresses() {
        let hoop_wrap = transform_stresses(490.0, 245.0, 90.0);
        assert!((hoop_wrap.sigma1 - 490.0).abs() < 1e-9);
        assert!((hoop_wrap.sigma2 - 245.0).abs() < 1e-9);
        assert!(hoop_wrap.tau12.abs() < 1e-9);

        let axial = transform_stresses(490.0, 245.0, 0.0);
        assert!((axial.sigma1 - 245.0).abs() < 1e-9);
        assert!((axial.sigma2 - 490.0).abs() < 1e-9);

        // Invariant: sigma1 + sigma2 equals hoop + axial at any angle
        let helical = transform_stresses(490.0, 245.0, 54.7356);
        assert!((helical.sigma1 + helical.sigma2 - 735.0).abs() < 1e-9);
        assert!((helical.tau12 - 245.0 * (2.0_f64).sqrt() / 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_analyze_ply() {
        let result = analyze_ply(490.0, 245.0, 54.7356, &CARBON_EPOXY);
        assert!(result.tsai_wu_index > 0.0);
        assert_eq!(result.failure_mode, predict_failure_mode(&result.hashin));
        assert!(result.margin_of_safety.is_finite());
        // A lone helical ply carries the transverse load in the matrix
        assert_eq!(result.failure_mode, FailureMode::MatrixTension);
        assert!(!result.passes());
    }
}
