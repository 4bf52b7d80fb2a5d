//! Camera Coverage - command line entry point
//!
//! Usage: `camera-coverage <run-config> [--out DIR]`
//!
//! Loads a run configuration (JSON or XML), computes the visibility matrix
//! and writes `visibility.vismat` and `report.json` into the output
//! directory.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use camera_coverage::export::{save_visibility, write_report, VisibilityReport};
use camera_coverage::telemetry::{init_logging, LogConfig};
use camera_coverage::{build_run, load_run_config, Diagnostics, ProviderRegistry, RunControl};

const DEFAULT_OUTPUT_DIR: &str = "coverage_output";

struct Args {
    config: PathBuf,
    out_dir: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut out_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let dir = args.next().context("--out needs a directory")?;
                out_dir = PathBuf::from(dir);
            }
            "--help" | "-h" => {
                println!("Usage: camera-coverage <run-config> [--out DIR]");
                std::process::exit(0);
            }
            _ if config.is_none() => config = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument `{}`", arg),
        }
    }

    let Some(config) = config else {
        bail!("Usage: camera-coverage <run-config> [--out DIR]");
    };
    Ok(Args { config, out_dir })
}

fn main() -> Result<()> {
    let _log_guard = init_logging(&LogConfig::default())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let args = parse_args()?;
    let started = Instant::now();

    let config = load_run_config(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    tracing::info!(config = %args.config.display(), "Loaded run configuration");

    let diagnostics = Diagnostics::new();
    let control = RunControl::new();
    let output = build_run(&config, &ProviderRegistry::with_builtins(), &diagnostics, &control)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let matrix_path = args.out_dir.join("visibility.vismat");
    save_visibility(&matrix_path, &output.environment, &output.visibility)?;

    let report = VisibilityReport::new(
        &output.environment,
        &output.cameras,
        &output.visibility,
        &diagnostics.entries(),
    );
    let report_path = args.out_dir.join("report.json");
    write_report(&report_path, &report)?;

    tracing::info!(
        visible_pairs = report.visible_pairs,
        unseen_targets = report.unseen_targets,
        warnings = report.warnings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        out = %args.out_dir.display(),
        "Done"
    );

    Ok(())
}
