//! # Unit Types
//!
//! Type-safe wrappers for the handful of units a tank evaluation crosses.
//! The calculation functions themselves take plain `f64` in the documented
//! unit; these wrappers exist for the boundary where design records arrive
//! in bar or metres.
//!
//! ## Conventions
//!
//! - Stress and pressure: MPa (design records usually quote bar; 1 MPa = 10 bar)
//! - Length: mm for geometry, m where volumes feed energy calculations
//! - Energy: MJ (MPa × m³)
//!
//! ## Example
//!
//! ```rust
//! use tank_core::units::{Bar, Megapascals, Millimeters, Meters};
//!
//! let nwp: Megapascals = Bar(700.0).into();
//! assert_eq!(nwp.0, 70.0);
//!
//! let r: Meters = Millimeters(175.0).into();
//! assert!((r.0 - 0.175).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

// ============================================================================
// Pressure / Stress Units
// ============================================================================

/// Pressure or stress in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

/// Pressure in bar
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

impl From<Bar> for Megapascals {
    fn from(bar: Bar) -> Self {
        Megapascals(bar.0 / 10.0)
    }
}

impl From<Megapascals> for Bar {
    fn from(mpa: Megapascals) -> Self {
        Bar(mpa.0 * 10.0)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Volume / Energy Units
// ============================================================================

/// Volume in cubic millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMillimeters(pub f64);

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicMillimeters> for CubicMeters {
    fn from(mm3: CubicMillimeters) -> Self {
        CubicMeters(mm3.0 * 1e-9)
    }
}

impl From<CubicMeters> for CubicMillimeters {
    fn from(m3: CubicMeters) -> Self {
        CubicMillimeters(m3.0 * 1e9)
    }
}

/// Energy in megajoules (1 MPa·m³ = 1 MJ)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megajoules(pub f64);

// ============================================================================
// Scaling
// ============================================================================

/// Sum and scalar multiple, for totals built from several contributions
macro_rules! impl_scaling {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_scaling!(Megapascals);
impl_scaling!(CubicMillimeters);
