//! # Dome Geometry
//!
//! Meridian profiles for the end caps of a filament-wound vessel.
//!
//! A profile is an ordered list of [`DomePoint`]s from the cylinder/dome
//! junction (`r = r0`, `z = 0`) to the boss opening (`r = boss_radius`).
//! Every generator guarantees that `r` never increases and `z` never
//! decreases along the list.
//!
//! ## Shapes
//!
//! - **Isotensoid**: geodesic-winding profile with approximately constant
//!   fiber stress, obtained by integrating the meridian slope ODE
//! - **Hemispherical**: `r² + z² = r0²`
//! - **Elliptical**: `(r/r0)² + (z/h)² = 1` for dome depth `h`
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::dome::{generate_isotensoid_dome, calculate_dome_depth};
//!
//! let profile = generate_isotensoid_dome(175.0, 20.0, 25.0, 50).unwrap();
//! assert_eq!(profile.len(), 50);
//! assert_eq!(profile[0].r_mm, 175.0);
//! assert!(calculate_dome_depth(&profile) > 0.0);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Default number of profile points
pub const DEFAULT_DOME_POINTS: usize = 50;

/// Fewest points a generator will produce
pub const MIN_DOME_POINTS: usize = 10;

/// One sample on a dome meridian (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomePoint {
    /// Radial coordinate from the vessel axis (mm)
    pub r_mm: f64,
    /// Axial coordinate from the cylinder/dome junction toward the pole (mm)
    pub z_mm: f64,
}

impl DomePoint {
    pub fn new(r_mm: f64, z_mm: f64) -> Self {
        DomePoint { r_mm, z_mm }
    }
}

fn validate_profile_args(r0: f64, boss_radius: f64, num_points: usize) -> CalcResult<()> {
    require_positive("r0", r0)?;
    require_non_negative("boss_radius", boss_radius)?;
    if boss_radius >= r0 {
        return Err(CalcError::invalid_input(
            "boss_radius",
            boss_radius.to_string(),
            format!("Boss radius must be smaller than r0 ({})", r0),
        ));
    }
    if num_points < MIN_DOME_POINTS {
        return Err(CalcError::invalid_input(
            "num_points",
            num_points.to_string(),
            format!("At least {} points are required", MIN_DOME_POINTS),
        ));
    }
    Ok(())
}

/// Radii from `r0` down to `boss_radius` in equal steps; the last entry is
/// exactly `boss_radius`.
fn radial_stations(r0: f64, boss_radius: f64, num_points: usize) -> impl Iterator<Item = f64> {
    let step = (r0 - boss_radius) / (num_points - 1) as f64;
    (0..num_points).map(move |i| {
        if i == num_points - 1 {
            boss_radius
        } else {
            r0 - step * i as f64
        }
    })
}

/// Meridian slope dz/dr of the isotensoid profile at radius `r`.
///
/// Inside the geodesic limit (`r < r0·sin α0`) the geodesic slope applies;
/// at and beyond it the hemispherical-cap slope is used. Both are ≤ 0.
fn isotensoid_slope(r: f64, r0: f64, tan_alpha0: f64, geodesic_radius: f64) -> f64 {
    let ratio = r / geodesic_radius;
    if ratio < 1.0 {
        -tan_alpha0 * (1.0 - ratio * ratio).sqrt()
    } else {
        -(r0 * r0 - r * r).max(0.0).sqrt() / r
    }
}

/// Generate an isotensoid dome profile.
///
/// Integrates `dz/dr = -tan(α0)·√(1 - (r / (r0·sin α0))²)` from `(r0, 0)`
/// down to `boss_radius` over `num_points` equally spaced radii. Each step
/// uses Simpson's rule on the slope, which is RK4 for an ODE whose right
/// side depends on `r` alone.
///
/// # Arguments
///
/// * `r0` - Cylinder radius at the junction (mm)
/// * `alpha0_deg` - Winding angle at the junction, strictly between 0 and 90
/// * `boss_radius` - Polar opening radius (mm), `0 <= boss_radius < r0`
/// * `num_points` - Profile points, at least [`MIN_DOME_POINTS`]
pub fn generate_isotensoid_dome(r0: f64, alpha0_deg: f64, boss_radius: f64, num_points: usize) -> CalcResult<Vec<DomePoint>> {
    validate_profile_args(r0, boss_radius, num_points)?;
    if !(alpha0_deg > 0.0 && alpha0_deg < 90.0) {
        return Err(CalcError::invalid_input(
            "alpha0_deg",
            alpha0_deg.to_string(),
            "Winding angle must be between 0 and 90 degrees (exclusive)",
        ));
    }

    let alpha0 = alpha0_deg.to_radians();
    let tan_alpha0 = alpha0.tan();
    let geodesic_radius = r0 * alpha0.sin();
    let slope = |r: f64| isotensoid_slope(r, r0, tan_alpha0, geodesic_radius);

    let radii: Vec<f64> = radial_stations(r0, boss_radius, num_points).collect();
    let mut profile = Vec::with_capacity(num_points);
    profile.push(DomePoint::new(r0, 0.0));

    let mut z = 0.0;
    for pair in radii.windows(2) {
        let (r_prev, r_next) = (pair[0], pair[1]);
        let h = r_next - r_prev;
        let r_mid = 0.5 * (r_prev + r_next);
        let dz = h * (slope(r_prev) + 4.0 * slope(r_mid) + slope(r_next)) / 6.0;
        // h < 0 and every slope <= 0, so dz >= 0; clamp guards rounding
        z += dz.max(0.0);
        profile.push(DomePoint::new(r_next, z));
    }

    debug!(
        r0,
        alpha0_deg,
        boss_radius,
        num_points,
        depth_mm = z,
        "generated isotensoid dome"
    );

    Ok(profile)
}

/// Generate a hemispherical dome profile `z = √(r0² − r²)`.
pub fn generate_hemispherical_dome(r0: f64, boss_radius: f64, num_points: usize) -> CalcResult<Vec<DomePoint>> {
    validate_profile_args(r0, boss_radius, num_points)?;
    Ok(radial_stations(r0, boss_radius, num_points)
        .map(|r| DomePoint::new(r, (r0 * r0 - r * r).max(0.0).sqrt()))
        .collect())
}

/// Generate an elliptical dome profile `z = h·√(1 − (r/r0)²)`.
///
/// `depth` is the semi-minor axis `h` (mm); `depth == r0` is a hemisphere.
pub fn generate_elliptical_dome(r0: f64, depth: f64, boss_radius: f64, num_points: usize) -> CalcResult<Vec<DomePoint>> {
    validate_profile_args(r0, boss_radius, num_points)?;
    require_positive("depth", depth)?;
    Ok(radial_stations(r0, boss_radius, num_points)
        .map(|r| {
            let x = r / r0;
            DomePoint::new(r, depth * (1.0 - x * x).max(0.0).sqrt())
        })
        .collect())
}

/// Axial extent of a profile (mm); 0.0 for fewer than two points.
pub fn calculate_dome_depth(points: &[DomePoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let (min_z, max_z) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.z_mm), hi.max(p.z_mm)));
    max_z - min_z
}

/// Surface of revolution area (mm²) by trapezoidal arc-length summation.
///
/// Each segment contributes `2π · r_avg · ds`. Returns 0.0 for fewer than
/// two points.
pub fn calculate_dome_surface_area(points: &[DomePoint]) -> f64 {
    points
        .windows(2)
        .map(|seg| {
            let (a, b) = (seg[0], seg[1]);
            let ds = (b.r_mm - a.r_mm).hypot(b.z_mm - a.z_mm);
            2.0 * PI * 0.5 * (a.r_mm + b.r_mm) * ds
        })
        .sum()
}

/// Enclosed volume (mm³) by disk-method integration along z.
///
/// Each segment contributes `π · avg(r²) · |dz|`. Returns 0.0 for fewer
/// than two points.
pub fn calculate_dome_volume(points: &[DomePoint]) -> f64 {
    points
        .windows(2)
        .map(|seg| {
            let (a, b) = (seg[0], seg[1]);
            PI * 0.5 * (a.r_mm * a.r_mm + b.r_mm * b.r_mm) * (b.z_mm - a.z_mm).abs()
        })
        .sum()
}

/// Geodesic winding angle (degrees) at radius `r` from Clairaut's relation
/// `r·sin α = r0·sin α0`.
///
/// The sine is clamped to [-1, 1], so radii inside the geodesic limit
/// return 90° instead of NaN.
pub fn calculate_fiber_angle(r: f64, r0: f64, alpha0_deg: f64) -> f64 {
    let sin_alpha = (r0 * alpha0_deg.to_radians().sin() / r).clamp(-1.0, 1.0);
    sin_alpha.asin().to_degrees()
}

/// Laminate thickness at radius `r`, `t0·(r0/r)·(sin α0 / sin α)`.
///
/// `t0` is the thickness at the junction radius `r0`.
pub fn calculate_dome_thickness(r: f64, r0: f64, t0: f64, alpha0_deg: f64) -> f64 {
    let alpha = calculate_fiber_angle(r, r0, alpha0_deg).to_radians();
    t0 * (r0 / r) * (alpha0_deg.to_radians().sin() / alpha.sin())
}

/// Dome cap shape selection.
///
/// ## JSON Example
///
/// ```json
/// { "shape": "Elliptical", "depth_mm": 120.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum DomeShape {
    /// Geodesic isotensoid at the given junction winding angle
    Isotensoid { alpha0_deg: f64 },
    /// Hemisphere of the cylinder radius
    Hemispherical,
    /// Ellipse with the given depth
    Elliptical { depth_mm: f64 },
}

/// Input for a full dome generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomeInput {
    /// Cylinder radius at the junction (mm)
    pub r0_mm: f64,
    /// Polar boss opening radius (mm)
    pub boss_radius_mm: f64,
    /// Number of profile points
    #[serde(default = "default_dome_points")]
    pub num_points: usize,
    /// Profile shape
    pub shape: DomeShape,
}

fn default_dome_points() -> usize {
    DEFAULT_DOME_POINTS
}

/// Profile plus its derived properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomeProfile {
    pub points: Vec<DomePoint>,
    /// Axial depth (mm)
    pub depth_mm: f64,
    /// Outer surface area of one cap (mm²)
    pub surface_area_mm2: f64,
    /// Enclosed volume of one cap (mm³)
    pub volume_mm3: f64,
}

/// Generate a dome of any supported shape with its derived properties.
pub fn generate_dome(input: &DomeInput) -> CalcResult<DomeProfile> {
    let points = match input.shape {
        DomeShape::Isotensoid { alpha0_deg } => {
            generate_isotensoid_dome(input.r0_mm, alpha0_deg, input.boss_radius_mm, input.num_points)?
        }
        DomeShape::Hemispherical => generate_hemispherical_dome(input.r0_mm, input.boss_radius_mm, input.num_points)?,
        DomeShape::Elliptical { depth_mm } => {
            generate_elliptical_dome(input.r0_mm, depth_mm, input.boss_radius_mm, input.num_points)?
        }
    };

    Ok(DomeProfile {
        depth_mm: calculate_dome_depth(&points),
        surface_area_mm2: calculate_dome_surface_area(&points),
        volume_mm3: calculate_dome_volume(&points),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotone(points: &[DomePoint]) {
        for pair in points.windows(2) {
            assert!(pair[1].r_mm <= pair[0].r_mm, "r increased: {:?}", pair);
            assert!(pair[1].z_mm >= pair[0].z_mm, "z decreased: {:?}", pair);
        }
    }

    #[test]
    fn test_isotensoid_invariants() {
        for &(r0, alpha0, boss, n) in &[
            (175.0, 20.0, 25.0, 50),
            (175.0, 54.7, 40.0, 10),
            (200.0, 5.0, 0.0, 200),
            (100.0, 89.0, 99.0, 13),
        ] {
            let profile = generate_isotensoid_dome(r0, alpha0, boss, n).unwrap();
            assert_eq!(profile.len(), n);
            assert_eq!(profile[0], DomePoint::new(r0, 0.0));
            assert!((profile[n - 1].r_mm - boss).abs() < 1e-9);
            assert_monotone(&profile);
        }
    }

    #[test]
    fn test_isotensoid_preconditions() {
        assert!(generate_isotensoid_dome(100.0, 30.0, 100.0, 50).is_err());
        assert!(generate_isotensoid_dome(100.0, 30.0, 120.0, 50).is_err());
        assert!(generate_isotensoid_dome(100.0, 0.0, 10.0, 50).is_err());
        assert!(generate_isotensoid_dome(100.0, 90.0, 10.0, 50).is_err());
        assert!(generate_isotensoid_dome(100.0, 30.0, 10.0, 9).is_err());
        assert!(generate_isotensoid_dome(100.0, 30.0, -1.0, 50).is_err());
    }

    #[test]
    fn test_hemispherical_dome() {
        let profile = generate_hemispherical_dome(100.0, 0.0, 101).unwrap();
        assert_monotone(&profile);
        assert!((calculate_dome_depth(&profile) - 100.0).abs() < 1e-9);

        // Hemisphere volume 2/3 πr³; the disk method converges from below
        let exact = 2.0 / 3.0 * PI * 100.0_f64.powi(3);
        let volume = calculate_dome_volume(&profile);
        assert!((volume - exact).abs() / exact < 0.02);

        // Hemisphere area 2πr²
        let exact_area = 2.0 * PI * 100.0_f64.powi(2);
        let area = calculate_dome_surface_area(&profile);
        assert!((area - exact_area).abs() / exact_area < 0.01);
    }

    #[test]
    fn test_elliptical_dome() {
        let profile = generate_elliptical_dome(150.0, 75.0, 20.0, 40).unwrap();
        assert_monotone(&profile);
        assert_eq!(profile[0].z_mm, 0.0);
        assert!(calculate_dome_depth(&profile) < 75.0);
        assert!(generate_elliptical_dome(150.0, 0.0, 20.0, 40).is_err());
    }

    #[test]
    fn test_derived_properties_degenerate() {
        assert_eq!(calculate_dome_depth(&[]), 0.0);
        let single = [DomePoint::new(10.0, 0.0)];
        assert_eq!(calculate_dome_depth(&single), 0.0);
        assert_eq!(calculate_dome_surface_area(&single), 0.0);
        assert_eq!(calculate_dome_volume(&single), 0.0);
    }

    #[test]
    fn test_flat_disk_area() {
        // Annulus from r=10 to r=0 at constant z: π·r²
        let disk = [DomePoint::new(10.0, 5.0), DomePoint::new(0.0, 5.0)];
        assert!((calculate_dome_surface_area(&disk) - PI * 100.0).abs() < 1e-9);
        assert_eq!(calculate_dome_volume(&disk), 0.0);
    }

    #[test]
    fn test_fiber_angle() {
        // At r0 the angle is alpha0
        assert!((calculate_fiber_angle(175.0, 175.0, 20.0) - 20.0).abs() < 1e-9);
        // Angle grows toward the pole
        assert!(calculate_fiber_angle(100.0, 175.0, 20.0) > 20.0);
        // Inside the geodesic limit the sine clamps to 1
        assert!((calculate_fiber_angle(30.0, 175.0, 20.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_dome_thickness() {
        assert!((calculate_dome_thickness(175.0, 175.0, 10.0, 20.0) - 10.0).abs() < 1e-9);
        // Clamped region: sin α = 1, t = t0 · (r0/r) · sin α0
        let r = 30.0;
        let expected = 10.0 * (175.0 / r) * 20.0_f64.to_radians().sin();
        assert!((calculate_dome_thickness(r, 175.0, 10.0, 20.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_generate_dome_by_shape() {
        let input = DomeInput {
            r0_mm: 175.0,
            boss_radius_mm: 25.0,
            num_points: DEFAULT_DOME_POINTS,
            shape: DomeShape::Isotensoid { alpha0_deg: 15.0 },
        };
        let dome = generate_dome(&input).unwrap();
        assert_eq!(dome.points.len(), DEFAULT_DOME_POINTS);
        assert!(dome.depth_mm > 0.0);
        assert!(dome.surface_area_mm2 > 0.0);
        assert!(dome.volume_mm3 > 0.0);

        let json = r#"{ "r0_mm": 100.0, "boss_radius_mm": 10.0, "shape": { "shape": "Hemispherical" } }"#;
        let parsed: DomeInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.num_points, DEFAULT_DOME_POINTS);
        assert!(generate_dome(&parsed).is_ok());
    }
}
