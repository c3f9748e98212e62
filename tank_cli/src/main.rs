//! # tank_cli
//!
//! Command-line front end for `tank_core`. Reads design records and
//! calculation requests as JSON, writes results to stdout, and logs to
//! stderr (filter with `RUST_LOG`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tank_core::calculations::reliability::create_rng;
use tank_core::{evaluate, AnalysisSettings, CalculationItem, CompositeMaterial, DesignEvaluation, TankDesign};

#[derive(Parser, Debug)]
#[command(author, version, about = "Composite hydrogen pressure vessel calculations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a tank design record against every check.
    Evaluate {
        /// Design record (JSON).
        design: PathBuf,
        /// Analysis settings (JSON); defaults are used for missing fields.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// RNG seed for repeatable Monte Carlo runs.
        #[arg(long)]
        seed: Option<u64>,
        /// Monte Carlo trials per reliability run.
        #[arg(long)]
        samples: Option<usize>,
        /// Include the reliability sensitivity study.
        #[arg(long)]
        sensitivity: bool,
        /// Print only the JSON result.
        #[arg(long)]
        json: bool,
    },
    /// Run a single calculation request (JSON with a "type" field).
    Calc {
        /// Calculation request (JSON).
        request: PathBuf,
        /// RNG seed for reliability requests.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the built-in composite materials.
    Materials,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate {
            design,
            settings,
            seed,
            samples,
            sensitivity,
            json,
        } => handle_evaluate(&design, settings.as_deref(), seed, samples, sensitivity, json),
        Command::Calc { request, seed } => handle_calc(&request, seed),
        Command::Materials => handle_materials(),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_settings(path: Option<&Path>, seed: Option<u64>, samples: Option<usize>, sensitivity: bool) -> Result<AnalysisSettings> {
    let mut settings = match path {
        Some(path) => AnalysisSettings::from_json(&read_file(path)?)
            .with_context(|| format!("invalid settings in {}", path.display()))?,
        None => AnalysisSettings::default(),
    };

    // Command-line flags override the file
    if seed.is_some() {
        settings.seed = seed;
    }
    if let Some(samples) = samples {
        settings.reliability_samples = samples;
    }
    settings.sensitivity |= sensitivity;

    settings.validate().context("invalid analysis settings")?;
    Ok(settings)
}

fn handle_evaluate(
    design_path: &Path,
    settings_path: Option<&Path>,
    seed: Option<u64>,
    samples: Option<usize>,
    sensitivity: bool,
    json: bool,
) -> Result<()> {
    let design = TankDesign::from_json(&read_file(design_path)?)
        .with_context(|| format!("invalid design record in {}", design_path.display()))?;
    let settings = load_settings(settings_path, seed, samples, sensitivity)?;

    info!(label = %design.label, samples = settings.reliability_samples, "evaluating design");
    let evaluation = evaluate(&design, &settings).with_context(|| format!("evaluation of {} failed", design.label))?;

    if !json {
        print_summary(&evaluation, &settings);
        println!();
    }
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

fn handle_calc(request_path: &Path, seed: Option<u64>) -> Result<()> {
    let item: CalculationItem = serde_json::from_str(&read_file(request_path)?)
        .with_context(|| format!("invalid calculation request in {}", request_path.display()))?;

    info!(calc_type = item.calc_type(), "running calculation");
    let output = match seed {
        Some(seed) => item.run_with_rng(&mut create_rng(seed)),
        None => item.run(),
    };
    let output = match output {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e)?);
            bail!("{} calculation failed: {}", item.calc_type(), e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_materials() -> Result<()> {
    println!("{:<14} {:>8} {:>8} {:>8} {:>8} {:>8}", "Material", "Xt", "Xc", "Yt", "Yc", "S");
    for material in CompositeMaterial::ALL {
        let s = material.strengths();
        println!(
            "{:<14} {:>8.0} {:>8.0} {:>8.0} {:>8.0} {:>8.0}",
            material.display_name(),
            s.xt_mpa,
            s.xc_mpa,
            s.yt_mpa,
            s.yc_mpa,
            s.s_mpa
        );
    }
    Ok(())
}

fn print_summary(eval: &DesignEvaluation, settings: &AnalysisSettings) {
    println!("═══════════════════════════════════════");
    println!("  TANK DESIGN: {} ({})", eval.label, eval.material);
    println!("═══════════════════════════════════════");
    println!();
    println!("Stresses at {:.1} MPa:", eval.working_pressure.0);
    println!("  Hoop:   {:.1} MPa", eval.cylinder.hoop_stress_mpa);
    println!("  Axial:  {:.1} MPa", eval.cylinder.axial_stress_mpa);
    println!(
        "  Ply:    σ1={:.1} σ2={:.1} τ12={:.1} MPa (Tsai-Wu {:.3}, {})",
        eval.ply.stresses.sigma1,
        eval.ply.stresses.sigma2,
        eval.ply.stresses.tau12,
        eval.ply.tsai_wu_index,
        eval.ply.failure_mode
    );
    println!();
    println!("Geometry:");
    println!("  Dome depth:   {:.1} mm", eval.dome.depth_mm);
    println!("  Volume:       {:.1} L", eval.internal_volume.0 * 1000.0);
    println!("  Stored energy {:.2} MJ", eval.stored_energy.0);
    println!();
    println!("Checks:");
    println!(
        "  Fiber:       {:.1} MPa ({:.0}% of strength) {}",
        eval.fiber_stress_mpa,
        eval.fiber_stress_ratio * 100.0,
        status_icon(eval.fiber_stress_ratio <= 1.0)
    );
    println!(
        "  Rating:      burst {:.1} / working {:.1} MPa {}",
        eval.ratings.burst_pressure_mpa,
        eval.ratings.working_pressure_mpa,
        status_icon(eval.meets_pressure_rating())
    );
    println!(
        "  Fatigue:     {:.3e} cycles vs {:.0} {}",
        eval.fatigue.predicted_cycles,
        settings.required_cycles,
        status_icon(eval.fatigue_safety_factor >= 1.0)
    );
    println!(
        "  Reliability: β {}{:.2} vs {:.2} {}",
        if eval.reliability.is_lower_bound() { "≥ " } else { "" },
        eval.reliability.reliability_index,
        eval.required_reliability_index,
        status_icon(eval.reliability.reliability_index >= eval.required_reliability_index)
    );
    for s in &eval.sensitivities {
        println!("    d(Pf)/d({:?}) = {:.4e}", s.parameter, s.sensitivity);
    }
    println!();
    println!("═══════════════════════════════════════");
    let failed = eval.failed_checks();
    if failed.is_empty() {
        println!("  RESULT: PASS");
    } else {
        println!("  RESULT: FAIL ({})", failed.join(", "));
    }
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
