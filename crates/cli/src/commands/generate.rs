use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use hdrgen_core::config::{load_config, ClosingPolicy, HeaderConfig};
use hdrgen_core::services::dump::dumper_for;
use hdrgen_core::services::generator::{GenerationReport, HeaderGenerator};

use crate::{canonicalize_or_current, sha256_file};

/// Command-line overrides applied on top of the config file (or defaults).
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub intermediate: Option<PathBuf>,
    /// Directory that relative output/intermediate paths are resolved against.
    pub dir: String,
    pub converter: Option<String>,
    pub xxd: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub ensure_closed: bool,
    pub json: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: None,
            intermediate: None,
            dir: ".".to_string(),
            converter: None,
            xxd: None,
            config: None,
            ensure_closed: false,
            json: false,
        }
    }
}

/// JSON report printed by `--json`.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    #[serde(flatten)]
    pub report: GenerationReport,
    pub sha256: String,
}

/// Build the effective config: file (if any), then command-line overrides.
pub fn resolve_config(opts: &GenerateOptions) -> Result<HeaderConfig> {
    let mut config = match &opts.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HeaderConfig::default(),
    };

    if let Some(output) = &opts.output {
        config.output = output.clone();
    }
    if let Some(intermediate) = &opts.intermediate {
        config.intermediate = intermediate.clone();
    }
    if let Some(converter) = &opts.converter {
        config.converter = converter.clone();
    }
    if let Some(xxd) = &opts.xxd {
        config.xxd_path = Some(xxd.clone());
    }
    if opts.ensure_closed {
        config.closing = ClosingPolicy::Ensure;
    }

    config.validate().context("Invalid header configuration")?;
    Ok(config)
}

/// Generate the header for `binary` and optionally print a JSON report.
pub fn generate_command(binary: &Path, opts: &GenerateOptions) -> Result<GenerationReport> {
    let config = resolve_config(opts)?;
    let dir = canonicalize_or_current(&opts.dir)?;
    debug!(
        converter = %config.converter,
        closing = config.closing.as_str(),
        dir = %dir.display(),
        "resolved configuration"
    );

    let dumper = dumper_for(&config).context("Failed to select converter")?;
    let generator = HeaderGenerator::new(config, dumper).in_dir(dir);
    let report = generator
        .generate(binary)
        .with_context(|| format!("Failed to generate header from {}", binary.display()))?;
    info!(output = %report.output.display(), lines = report.body_lines, "generated header");

    if opts.json {
        let sha256 = sha256_file(binary)?;
        let out = ReportOutput { report: report.clone(), sha256 };
        println!("{}", serde_json::to_string_pretty(&out).context("Failed to serialize report")?);
    }

    Ok(report)
}
