//! # Materials Database
//!
//! Reference composite systems for overwrapped pressure vessels. Each
//! system bundles ply strengths (for Tsai-Wu / Hashin checks) with an S-N
//! curve (for pressure-cycle fatigue).
//!
//! ## Example
//!
//! ```rust
//! use tank_core::materials::CompositeMaterial;
//!
//! let mat: CompositeMaterial = "carbon-epoxy".parse().unwrap();
//! assert_eq!(mat.strengths().xt_mpa, 2500.0);
//! assert!("kevlar".parse::<CompositeMaterial>().is_err());
//! ```

pub mod composite;

pub use composite::{
    MaterialStrengths, SNParameters, CARBON_EPOXY, CARBON_EPOXY_SN, GLASS_EPOXY, GLASS_EPOXY_SN,
};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Named composite system as it appears in a design record.
///
/// ## JSON Serialization
///
/// ```json
/// "carbon-epoxy"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMaterial {
    /// Carbon-fiber reinforced epoxy (Type III/IV hydrogen tanks)
    CarbonEpoxy,
    /// E-glass reinforced epoxy
    GlassEpoxy,
}

impl CompositeMaterial {
    /// All materials for selection lists
    pub const ALL: [CompositeMaterial; 2] = [CompositeMaterial::CarbonEpoxy, CompositeMaterial::GlassEpoxy];

    /// Ply strengths for failure criteria
    pub fn strengths(&self) -> MaterialStrengths {
        match self {
            CompositeMaterial::CarbonEpoxy => CARBON_EPOXY,
            CompositeMaterial::GlassEpoxy => GLASS_EPOXY,
        }
    }

    /// S-N curve for pressure-cycle fatigue
    pub fn sn_parameters(&self) -> SNParameters {
        match self {
            CompositeMaterial::CarbonEpoxy => CARBON_EPOXY_SN,
            CompositeMaterial::GlassEpoxy => GLASS_EPOXY_SN,
        }
    }

    /// Fiber-direction tensile strength, used as the netting-analysis
    /// ultimate strength of the laminate (MPa)
    pub fn fiber_tensile_strength_mpa(&self) -> f64 {
        self.strengths().xt_mpa
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CompositeMaterial::CarbonEpoxy => "Carbon/Epoxy",
            CompositeMaterial::GlassEpoxy => "Glass/Epoxy",
        }
    }
}

impl FromStr for CompositeMaterial {
    type Err = CalcError;

    /// Parse from common string representations ("carbon-epoxy", "CFRP", "carbon/epoxy")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace([' ', '_', '/'], "-").as_str() {
            "CARBON-EPOXY" | "CARBON" | "CFRP" | "T700" => Ok(CompositeMaterial::CarbonEpoxy),
            "GLASS-EPOXY" | "GLASS" | "GFRP" | "E-GLASS" => Ok(CompositeMaterial::GlassEpoxy),
            _ => Err(CalcError::material_not_found(s)),
        }
    }
}

impl std::fmt::Display for CompositeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible() {
        assert_eq!("Carbon/Epoxy".parse::<CompositeMaterial>().unwrap(), CompositeMaterial::CarbonEpoxy);
        assert_eq!("cfrp".parse::<CompositeMaterial>().unwrap(), CompositeMaterial::CarbonEpoxy);
        assert_eq!("glass_epoxy".parse::<CompositeMaterial>().unwrap(), CompositeMaterial::GlassEpoxy);
    }

    #[test]
    fn test_unknown_material() {
        let err = "unobtainium".parse::<CompositeMaterial>().unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&CompositeMaterial::GlassEpoxy).unwrap();
        assert_eq!(json, "\"glass-epoxy\"");
        let roundtrip: CompositeMaterial = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, CompositeMaterial::GlassEpoxy);
    }

    #[test]
    fn test_all_materials_have_valid_data() {
        for mat in CompositeMaterial::ALL {
            assert!(mat.strengths().validate().is_ok());
            assert!(mat.sn_parameters().validate().is_ok());
        }
    }
}
