//! # Reliability Analysis
//!
//! Monte Carlo estimation of structural failure probability under
//! strength and load scatter, plus the normal-distribution machinery to
//! convert between failure probability and reliability index β.
//!
//! ## Randomness
//!
//! Every sampling function comes in two forms: a convenience form that
//! draws from the thread-local RNG, and a `*_with_rng` form taking any
//! [`rand::Rng`]. Pass a seeded generator from [`create_rng`] to get
//! bit-for-bit repeatable results.
//!
//! ## Example
//!
//! ```rust
//! use tank_core::calculations::reliability::{calculate_reliability_with_rng, create_rng, ReliabilityInput};
//!
//! let input = ReliabilityInput::new(200.0, 2500.0, 0.05, 0.10);
//! let mut rng = create_rng(42);
//! let result = calculate_reliability_with_rng(&input, &mut rng).unwrap();
//! assert!(result.probability_of_failure < 0.001);
//! assert_eq!(result.samples_run, 10_000);
//! ```

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{require_non_negative, CalcError, CalcResult};

/// Default Monte Carlo trial count
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Fewest trials accepted by [`calculate_reliability`]
pub const MIN_SAMPLES: usize = 100;

/// Default finite-difference step for [`sensitivity_analysis`]
pub const DEFAULT_SENSITIVITY_DELTA: f64 = 0.01;

/// Seeded generator for reproducible runs.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Standard-normal deviate by the Box-Muller transform.
///
/// Consumes two uniform draws. A zero first draw (which would take
/// `ln(0)`) is rejected and redrawn.
pub fn gaussian_random<R: Rng>(rng: &mut R) -> f64 {
    let u1 = loop {
        let u: f64 = rng.random();
        if u > 0.0 {
            break u;
        }
    };
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

// Beasley-Springer-Moro coefficients
const BSM_A: [f64; 4] = [2.50662823884, -18.61500062529, 41.39119773534, -25.44106049637];
const BSM_B: [f64; 4] = [-8.47351093090, 23.08336743743, -21.06224101826, 3.13082909833];
const BSM_C: [f64; 9] = [
    0.3374754822726147,
    0.9761690190917186,
    0.1607979714918209,
    0.0276438810333863,
    0.0038405729373609,
    0.0003951896511919,
    0.0000321767881768,
    0.0000002888167364,
    0.0000003960315187,
];

/// Inverse standard-normal CDF Φ⁻¹(p) (Beasley-Springer-Moro).
///
/// Rational approximation in the central region `|p − 0.5| < 0.42`,
/// Chebyshev series in `ln(−ln r)` in the tails. Absolute error is around
/// 3e-9 over the usable range.
pub fn normal_inverse(p: f64) -> CalcResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(CalcError::invalid_input(
            "p",
            p.to_string(),
            "Probability must be strictly between 0 and 1",
        ));
    }

    let y = p - 0.5;
    if y.abs() < 0.42 {
        let r = y * y;
        let num = y * (((BSM_A[3] * r + BSM_A[2]) * r + BSM_A[1]) * r + BSM_A[0]);
        let den = (((BSM_B[3] * r + BSM_B[2]) * r + BSM_B[1]) * r + BSM_B[0]) * r + 1.0;
        return Ok(num / den);
    }

    let tail = if y > 0.0 { 1.0 - p } else { p };
    let r = (-tail.ln()).ln();
    let x = BSM_C.iter().rev().fold(0.0, |acc, &c| acc * r + c);
    Ok(if y < 0.0 { -x } else { x })
}

/// Failure probability `Φ(−β)` for a reliability index β.
///
/// Zelen-Severo polynomial (Abramowitz & Stegun 26.2.17), absolute error
/// below 7.5e-8.
pub fn reliability_index_to_probability(beta: f64) -> f64 {
    const P: f64 = 0.2316419;
    const B: [f64; 5] = [0.319381530, -0.356563782, 1.781477937, -1.821255978, 1.330274429];

    let x = beta.abs();
    let t = 1.0 / (1.0 + P * x);
    let density = (-0.5 * x * x).exp() / (2.0 * PI).sqrt();
    let poly = B.iter().rev().fold(0.0, |acc, &b| acc * t + b) * t;
    let upper_tail = density * poly;

    if beta >= 0.0 {
        upper_tail
    } else {
        1.0 - upper_tail
    }
}

/// Reliability index needed to reach a target failure probability.
pub fn required_beta(target_probability: f64) -> CalcResult<f64> {
    Ok(-normal_inverse(target_probability)?)
}

/// Input for a Monte Carlo reliability run.
///
/// Strength and stress are each normal with the given mean and
/// coefficient of variation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "design_stress_mpa": 200.0,
///   "material_strength_mpa": 2500.0,
///   "strength_cov": 0.05,
///   "stress_cov": 0.10,
///   "num_samples": 10000
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityInput {
    /// Mean applied stress (MPa)
    pub design_stress_mpa: f64,
    /// Mean material strength (MPa)
    pub material_strength_mpa: f64,
    /// Strength coefficient of variation
    pub strength_cov: f64,
    /// Stress coefficient of variation
    pub stress_cov: f64,
    /// Number of Monte Carlo trials
    #[serde(default = "default_samples")]
    pub num_samples: usize,
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

impl ReliabilityInput {
    /// Input with the default sample count.
    pub fn new(design_stress_mpa: f64, material_strength_mpa: f64, strength_cov: f64, stress_cov: f64) -> Self {
        ReliabilityInput {
            design_stress_mpa,
            material_strength_mpa,
            strength_cov,
            stress_cov,
            num_samples: DEFAULT_SAMPLES,
        }
    }

    /// Same input with a different sample count
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.num_samples < MIN_SAMPLES {
            return Err(CalcError::invalid_input(
                "num_samples",
                self.num_samples.to_string(),
                format!("At least {} samples are required", MIN_SAMPLES),
            ));
        }
        require_non_negative("strength_cov", self.strength_cov)?;
        require_non_negative("stress_cov", self.stress_cov)?;
        Ok(())
    }
}

/// Outcome of one Monte Carlo reliability run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Fraction of trials where stress exceeded strength, in [0, 1]
    pub probability_of_failure: f64,
    /// Reliability index β
    pub reliability_index: f64,
    /// Trials run
    pub samples_run: usize,
    /// Trials that failed
    pub failures: usize,
}

impl MonteCarloResult {
    /// No trial failed, so β is only a lower bound
    pub fn is_lower_bound(&self) -> bool {
        self.failures == 0
    }
}

/// β from a failure count.
///
/// Zero failures cannot justify infinite reliability, so the index is the
/// one a single failure in `samples` would not yet reach: Φ⁻¹(1 − 1/n).
/// All-failed runs get β = 0.
fn reliability_index_from_counts(failures: usize, samples: usize) -> CalcResult<f64> {
    let n = samples as f64;
    if failures == 0 {
        normal_inverse(1.0 - 1.0 / n)
    } else if failures == samples {
        Ok(0.0)
    } else {
        Ok(-normal_inverse(failures as f64 / n)?)
    }
}

/// Monte Carlo failure probability using the thread-local RNG.
pub fn calculate_reliability(input: &ReliabilityInput) -> CalcResult<MonteCarloResult> {
    calculate_reliability_with_rng(input, &mut rand::rng())
}

/// Monte Carlo failure probability with a caller-supplied RNG.
///
/// Each trial draws `strength = R·(1 + covR·Z1)` and
/// `stress = S·(1 + covS·Z2)` from independent standard normals and counts
/// a failure when stress exceeds strength.
pub fn calculate_reliability_with_rng<R: Rng>(input: &ReliabilityInput, rng: &mut R) -> CalcResult<MonteCarloResult> {
    input.validate()?;

    let failures = (0..input.num_samples)
        .filter(|_| {
            let strength = input.material_strength_mpa * (1.0 + input.strength_cov * gaussian_random(rng));
            let stress = input.design_stress_mpa * (1.0 + input.stress_cov * gaussian_random(rng));
            stress > strength
        })
        .count();

    let probability_of_failure = failures as f64 / input.num_samples as f64;
    let reliability_index = reliability_index_from_counts(failures, input.num_samples)?;

    debug!(
        samples = input.num_samples,
        failures,
        probability_of_failure,
        reliability_index,
        lower_bound = failures == 0,
        "monte carlo reliability run"
    );

    Ok(MonteCarloResult {
        probability_of_failure,
        reliability_index,
        samples_run: input.num_samples,
        failures,
    })
}

/// Input parameter perturbed by [`sensitivity_analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityParameter {
    /// Mean strength, perturbed by the relative step `R·(1 + δ)`
    Strength,
    /// Mean stress, perturbed by the relative step `S·(1 + δ)`
    Stress,
    /// Strength COV, perturbed by the absolute step `cov + δ`
    StrengthCov,
    /// Stress COV, perturbed by the absolute step `cov + δ`
    StressCov,
}

impl SensitivityParameter {
    pub const ALL: [SensitivityParameter; 4] = [
        SensitivityParameter::Strength,
        SensitivityParameter::Stress,
        SensitivityParameter::StrengthCov,
        SensitivityParameter::StressCov,
    ];

    fn perturb(&self, input: &ReliabilityInput, delta: f64) -> ReliabilityInput {
        let mut perturbed = *input;
        match self {
            SensitivityParameter::Strength => perturbed.material_strength_mpa *= 1.0 + delta,
            SensitivityParameter::Stress => perturbed.design_stress_mpa *= 1.0 + delta,
            SensitivityParameter::StrengthCov => perturbed.strength_cov += delta,
            SensitivityParameter::StressCov => perturbed.stress_cov += delta,
        }
        perturbed
    }
}

/// Finite-difference sensitivity of failure probability to one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub parameter: SensitivityParameter,
    pub delta: f64,
    pub baseline_probability: f64,
    pub perturbed_probability: f64,
    /// `(P_f(perturbed) − P_f(baseline)) / δ`
    pub sensitivity: f64,
}

/// Sensitivity using the thread-local RNG.
pub fn sensitivity_analysis(input: &ReliabilityInput, parameter: SensitivityParameter, delta: f64) -> CalcResult<SensitivityResult> {
    sensitivity_analysis_with_rng(input, parameter, delta, &mut rand::rng())
}

/// Sensitivity with a caller-supplied RNG.
///
/// Baseline and perturbed runs are independent Monte Carlo passes drawing
/// successive values from `rng`; expect sampling noise in the difference.
pub fn sensitivity_analysis_with_rng<R: Rng>(
    input: &ReliabilityInput,
    parameter: SensitivityParameter,
    delta: f64,
    rng: &mut R,
) -> CalcResult<SensitivityResult> {
    if !delta.is_finite() || delta == 0.0 {
        return Err(CalcError::invalid_input(
            "delta",
            delta.to_string(),
            "Perturbation step must be finite and non-zero",
        ));
    }

    let perturbed_input = parameter.perturb(input, delta);
    let baseline = calculate_reliability_with_rng(input, rng)?;
    let perturbed = calculate_reliability_with_rng(&perturbed_input, rng)?;

    Ok(SensitivityResult {
        parameter,
        delta,
        baseline_probability: baseline.probability_of_failure,
        perturbed_probability: perturbed.probability_of_failure,
        sensitivity: (perturbed.probability_of_failure - baseline.probability_of_failure) / delta,
    })
}

/// Sampled burst pressures using the thread-local RNG.
pub fn generate_burst_distribution(nominal_burst: f64, burst_cov: f64, num_samples: usize) -> CalcResult<Vec<f64>> {
    generate_burst_distribution_with_rng(nominal_burst, burst_cov, num_samples, &mut rand::rng())
}

/// Normal burst-pressure samples `B·(1 + cov·Z)`, floored at zero.
pub fn generate_burst_distribution_with_rng<R: Rng>(
    nominal_burst: f64,
    burst_cov: f64,
    num_samples: usize,
    rng: &mut R,
) -> CalcResult<Vec<f64>> {
    require_non_negative("burst_cov", burst_cov)?;
    Ok((0..num_samples)
        .map(|_| (nominal_burst * (1.0 + burst_cov * gaussian_random(rng))).max(0.0))
        .collect())
}

/// Summary statistics of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator)
    pub std_dev: f64,
    /// Coefficient of variation, 0.0 when the mean is zero
    pub cov: f64,
    pub min: f64,
    pub max: f64,
    /// 5th percentile (nearest rank)
    pub p5: f64,
    /// 95th percentile (nearest rank)
    pub p95: f64,
}

/// Describe a sample set.
pub fn distribution_stats(samples: &[f64]) -> CalcResult<DistributionStats> {
    if samples.is_empty() {
        return Err(CalcError::invalid_input("samples", "[]", "At least one sample is required"));
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let std_dev = if n > 1 {
        let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let percentile = |q: f64| sorted[((n - 1) as f64 * q).round() as usize];

    Ok(DistributionStats {
        count: n,
        mean,
        std_dev,
        cov: if mean != 0.0 { std_dev / mean } else { 0.0 },
        min: sorted[0],
        max: sorted[n - 1],
        p5: percentile(0.05),
        p95: percentile(0.95),
    })
}
