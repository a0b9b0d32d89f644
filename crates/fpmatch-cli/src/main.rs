// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fpmatch_config::{load as load_config, Algorithm, AppConfig};
use fpmatch_core::Fingerprint;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compare two raw Chromaprint fingerprints.
#[derive(Debug, Parser)]
#[command(name = "fpmatch", version)]
struct Cli {
    /// First fingerprint file
    a: PathBuf,
    /// Second fingerprint file
    b: PathBuf,

    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// Offset window in frames (0 = unbounded alignment)
    #[arg(long, allow_negative_numbers = true)]
    max_offset: Option<i32>,

    /// Duplicate cutoff and correlation early-exit threshold
    #[arg(long)]
    threshold: Option<f32>,

    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// TOML configuration file
    #[arg(long, env = "FPMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Score,
    Correlate,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Score => Algorithm::Score,
            AlgorithmArg::Correlate => Algorithm::Correlate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// `.txt` files are text, everything else binary
    Auto,
    /// Little-endian 32-bit words
    Binary,
    /// `fpcalc -raw` output or a comma separated list
    Text,
}

#[derive(Debug, Serialize)]
struct Report {
    algorithm: Algorithm,
    similarity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i32>,
    duplicate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    init_tracing(&config.telemetry.log_level);

    let a = read_fingerprint(&cli.a, cli.format)?;
    let b = read_fingerprint(&cli.b, cli.format)?;
    info!(target: "cli", len_a = a.len(), len_b = b.len(), "fingerprints loaded");

    let report = compare(&a, &b, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", render(&report));
    }
    Ok(())
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(algorithm) = cli.algorithm {
        config.matching.algorithm = algorithm.into();
    }
    if let Some(max_offset) = cli.max_offset {
        config.matching.max_offset = max_offset;
    }
    if let Some(threshold) = cli.threshold {
        config.matching.threshold = threshold;
    }
}

fn is_text(path: &Path, format: InputFormat) -> bool {
    match format {
        InputFormat::Text => true,
        InputFormat::Binary => false,
        InputFormat::Auto => path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt")),
    }
}

fn read_fingerprint(path: &Path, format: InputFormat) -> Result<Fingerprint> {
    let fingerprint = if is_text(path, format) {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Fingerprint::parse_raw(&text)
    } else {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Fingerprint::from_le_bytes(&bytes)
    };
    let fingerprint = fingerprint.with_context(|| format!("failed to decode {}", path.display()))?;
    debug!(target: "cli", file = %path.display(), frames = fingerprint.len(), "fingerprint decoded");
    Ok(fingerprint)
}

fn compare(a: &Fingerprint, b: &Fingerprint, config: &AppConfig) -> Result<Report> {
    let matching = &config.matching;
    let (similarity, offset) = match matching.algorithm {
        Algorithm::Score => (a.score(b, matching.max_offset)?, None),
        Algorithm::Correlate => {
            let correlation = a.correlate(b, matching.max_offset, matching.threshold)?;
            (correlation.score, Some(correlation.offset))
        }
    };

    Ok(Report {
        algorithm: matching.algorithm,
        similarity,
        offset,
        duplicate: similarity >= matching.threshold,
    })
}

fn render(report: &Report) -> String {
    let verdict = if report.duplicate { "duplicate" } else { "distinct" };
    match report.offset {
        Some(offset) => format!(
            "similarity {:.4} at offset {} ({})",
            report.similarity, offset, verdict
        ),
        None => format!("similarity {:.4} ({})", report.similarity, verdict),
    }
}
