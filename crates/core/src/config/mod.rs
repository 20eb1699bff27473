use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the generated header.
pub const DEFAULT_OUTPUT: &str = "mxbl_first_stage_image.h";
/// Default name of the transient dump file.
pub const DEFAULT_INTERMEDIATE: &str = "temp.h";
pub const DEFAULT_GUARD: &str = "MXBL_FIRST_STAGE_IMAGE_HEADER_";
pub const DEFAULT_INCLUDE: &str = "<linux/types.h>";
pub const DEFAULT_ELEMENT_TYPE: &str = "u8";
pub const DEFAULT_SYMBOL: &str = "mxbl_first_stage_image";
pub const DEFAULT_CONVERTER: &str = "xxd";

/// What to do when the transcribed dump does not end with `};`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingPolicy {
    /// Copy the dump interior as-is and only log a warning.
    #[default]
    Verbatim,
    /// Append a closing `};` line when the interior lacks one.
    Ensure,
}

impl ClosingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosingPolicy::Verbatim => "verbatim",
            ClosingPolicy::Ensure => "ensure",
        }
    }
}

/// Serializable configuration for a header generation run.
///
/// Every field has a default, so a config file only needs to name what it
/// overrides. Relative paths are resolved by the caller against its working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Path of the generated header.
    pub output: PathBuf,
    /// Path of the transient dump file, removed before the run finishes.
    pub intermediate: PathBuf,
    /// Include-guard token.
    pub guard: String,
    /// Argument of the `#include` line, including its `<>` or `""`.
    pub include: String,
    /// Element type of the emitted array.
    pub element_type: String,
    /// Name of the emitted array.
    pub symbol: String,
    /// Name of the hex dumper to use (see `DumperRegistry`).
    pub converter: String,
    /// Explicit path to the `xxd` executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xxd_path: Option<PathBuf>,
    pub closing: ClosingPolicy,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            intermediate: PathBuf::from(DEFAULT_INTERMEDIATE),
            guard: DEFAULT_GUARD.to_string(),
            include: DEFAULT_INCLUDE.to_string(),
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            converter: DEFAULT_CONVERTER.to_string(),
            xxd_path: None,
            closing: ClosingPolicy::Verbatim,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config at {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported config format '{0}' (expected json, yaml or yml)")]
    UnsupportedFormat(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl HeaderConfig {
    /// Check the fields that end up verbatim in C source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_c_identifier(&self.guard) {
            return Err(ConfigError::Invalid(format!(
                "guard '{}' is not a valid C identifier",
                self.guard
            )));
        }
        if !is_c_identifier(&self.symbol) {
            return Err(ConfigError::Invalid(format!(
                "symbol '{}' is not a valid C identifier",
                self.symbol
            )));
        }
        if self.element_type.trim().is_empty() {
            return Err(ConfigError::Invalid("element_type is required".into()));
        }
        if self.include.trim().is_empty() {
            return Err(ConfigError::Invalid("include is required".into()));
        }
        if self.output.as_os_str().is_empty() || self.intermediate.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output and intermediate paths are required".into()));
        }
        if same_lexical_path(&self.output, &self.intermediate) {
            return Err(ConfigError::Invalid(format!(
                "output and intermediate must differ (both are {})",
                self.output.display()
            )));
        }
        Ok(())
    }
}

/// Load a config file, picking the parser from the file extension.
pub fn load_config(path: &Path) -> Result<HeaderConfig, ConfigError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_string();
    if !matches!(ext.as_str(), "json" | "yaml" | "yml") {
        return Err(ConfigError::UnsupportedFormat(ext));
    }
    let body = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config: HeaderConfig = if ext == "json" {
        serde_json::from_str(&body).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&body).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };
    Ok(config)
}

/// Path equality ignoring `.` components (`temp.h` vs `./temp.h`).
fn same_lexical_path(a: &Path, b: &Path) -> bool {
    fn strip<'a>(p: &'a Path) -> Vec<Component<'a>> {
        p.components().filter(|c| *c != Component::CurDir).collect()
    }
    strip(a) == strip(b)
}

/// True when `s` is a non-empty ASCII C identifier.
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
