//! Composite Ply Materials
//!
//! Unidirectional ply strengths for the quadratic failure criteria and
//! two-parameter S-N curves for fatigue. Reference values are typical
//! handbook numbers for aerospace-grade prepreg; a real design should use
//! coupon data for the specific fiber/resin system.

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcResult};

/// Ply strengths in the principal material directions (MPa).
///
/// All five values are positive magnitudes; compressive strengths are NOT
/// entered as negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialStrengths {
    /// Longitudinal (fiber-direction) tensile strength Xt (MPa)
    pub xt_mpa: f64,
    /// Longitudinal compressive strength Xc (MPa)
    pub xc_mpa: f64,
    /// Transverse tensile strength Yt (MPa)
    pub yt_mpa: f64,
    /// Transverse compressive strength Yc (MPa)
    pub yc_mpa: f64,
    /// In-plane shear strength S (MPa)
    pub s_mpa: f64,
}

/// Carbon-fiber/epoxy (T700-class) unidirectional ply
pub const CARBON_EPOXY: MaterialStrengths = MaterialStrengths {
    xt_mpa: 2500.0,
    xc_mpa: 1200.0,
    yt_mpa: 80.0,
    yc_mpa: 200.0,
    s_mpa: 100.0,
};

/// E-glass/epoxy unidirectional ply
pub const GLASS_EPOXY: MaterialStrengths = MaterialStrengths {
    xt_mpa: 1080.0,
    xc_mpa: 620.0,
    yt_mpa: 39.0,
    yc_mpa: 128.0,
    s_mpa: 89.0,
};

impl MaterialStrengths {
    /// Validate that all five strengths are positive.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("xt_mpa", self.xt_mpa)?;
        require_positive("xc_mpa", self.xc_mpa)?;
        require_positive("yt_mpa", self.yt_mpa)?;
        require_positive("yc_mpa", self.yc_mpa)?;
        require_positive("s_mpa", self.s_mpa)?;
        Ok(())
    }
}

/// Power-law S-N curve `N = C / S^m`.
///
/// `S` is the stress amplitude in MPa. Below `endurance_limit_mpa` (when
/// defined) the life is taken as infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SNParameters {
    /// Curve coefficient C (cycles × MPa^m)
    pub coefficient: f64,
    /// Curve exponent m (inverse slope on log-log axes)
    pub exponent: f64,
    /// Stress amplitude below which life is infinite (MPa)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endurance_limit_mpa: Option<f64>,
}

/// Carbon/epoxy: flat curve, ~1e3 cycles at 1000 MPa amplitude
pub const CARBON_EPOXY_SN: SNParameters = SNParameters {
    coefficient: 1.0e45,
    exponent: 14.0,
    endurance_limit_mpa: None,
};

/// Glass/epoxy: steeper curve, ~1e3 cycles at 500 MPa amplitude
pub const GLASS_EPOXY_SN: SNParameters = SNParameters {
    coefficient: 9.765625e29,
    exponent: 10.0,
    endurance_limit_mpa: None,
};

impl SNParameters {
    /// Validate curve constants.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("coefficient", self.coefficient)?;
        require_positive("exponent", self.exponent)?;
        if let Some(limit) = self.endurance_limit_mpa {
            require_non_negative("endurance_limit_mpa", limit)?;
        }
        Ok(())
    }

    /// Same curve with an endurance limit applied
    pub fn with_endurance_limit(mut self, limit_mpa: f64) -> Self {
        self.endurance_limit_mpa = Some(limit_mpa);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_strengths_valid() {
        assert!(CARBON_EPOXY.validate().is_ok());
        assert!(GLASS_EPOXY.validate().is_ok());
    }

    #[test]
    fn test_negative_strength_rejected() {
        let mut bad = CARBON_EPOXY;
        bad.yc_mpa = -200.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_reference_curves_anchor_points() {
        // N = C / S^m at the documented anchor amplitudes
        let n_carbon = CARBON_EPOXY_SN.coefficient / 1000.0_f64.powf(CARBON_EPOXY_SN.exponent);
        assert!((n_carbon - 1000.0).abs() / 1000.0 < 1e-9);

        let n_glass = GLASS_EPOXY_SN.coefficient / 500.0_f64.powf(GLASS_EPOXY_SN.exponent);
        assert!((n_glass - 1000.0).abs() / 1000.0 < 1e-9);
    }

    #[test]
    fn test_sn_serialization_omits_missing_limit() {
        let json = serde_json::to_string(&CARBON_EPOXY_SN).unwrap();
        assert!(!json.contains("endurance_limit_mpa"));

        let with_limit = CARBON_EPOXY_SN.with_endurance_limit(150.0);
        let json = serde_json::to_string(&with_limit).unwrap();
        let roundtrip: SNParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.endurance_limit_mpa, Some(150.0));
    }
}
