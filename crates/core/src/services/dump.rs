use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use crate::config::HeaderConfig;
use crate::services::dumpers::{BuiltinDumper, XxdDumper};

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}{}", stderr_suffix(.stderr))]
    Failed { program: PathBuf, status: ExitStatus, stderr: String },
    #[error("Unknown converter '{name}' (available: {available})")]
    UnknownConverter { name: String, available: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Capability that renders a binary file as a C array declaration.
///
/// The returned text has one declaration line, the byte-literal lines, and
/// one trailing line. Callers keep only the interior.
pub trait HexDumper: Send + Sync {
    fn dump(&self, input: &Path) -> Result<String, DumpError>;
    fn name(&self) -> &'static str;
}

/// Registry for hex dumpers; callers select by name.
#[derive(Default)]
pub struct DumperRegistry {
    dumpers: HashMap<String, Box<dyn HexDumper>>,
}

impl DumperRegistry {
    pub fn new() -> Self {
        Self { dumpers: HashMap::new() }
    }

    pub fn register<D: HexDumper + 'static>(&mut self, dumper: D) -> &mut Self {
        self.dumpers.insert(dumper.name().to_string(), Box::new(dumper));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn HexDumper> {
        self.dumpers.get(name).map(|d| &**d)
    }

    /// Remove and return a dumper so it can be owned by a generator.
    pub fn take(&mut self, name: &str) -> Result<Box<dyn HexDumper>, DumpError> {
        let available = self.names().join(", ");
        self.dumpers
            .remove(name)
            .ok_or_else(|| DumpError::UnknownConverter { name: name.to_string(), available })
    }

    /// Sorted list of registered dumper names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.dumpers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Registry populated with `xxd` and `builtin`.
///
/// `xxd_path` overrides the `XXD_BIN`/`PATH` lookup for the external dumper.
pub fn default_dumper_registry(xxd_path: Option<&Path>) -> DumperRegistry {
    let mut registry = DumperRegistry::new();
    let xxd = match xxd_path {
        Some(path) => XxdDumper::new(path),
        None => XxdDumper::from_env(),
    };
    registry.register(xxd);
    registry.register(BuiltinDumper::default());
    registry
}

/// Resolve the dumper named by `config.converter`.
pub fn dumper_for(config: &HeaderConfig) -> Result<Box<dyn HexDumper>, DumpError> {
    default_dumper_registry(config.xxd_path.as_deref()).take(&config.converter)
}
