use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::services::dump::{DumpError, HexDumper};

/// Dumper that shells out to `xxd -i <input>` and captures its stdout.
#[derive(Debug, Clone)]
pub struct XxdDumper {
    program: PathBuf,
}

impl XxdDumper {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Use `XXD_BIN` when set, otherwise whatever `xxd` resolves to on `PATH`.
    pub fn from_env() -> Self {
        Self::new(resolve_xxd_path())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl HexDumper for XxdDumper {
    fn dump(&self, input: &Path) -> Result<String, DumpError> {
        debug!(program = %self.program.display(), input = %input.display(), "running xxd -i");
        // The input is passed through untouched: xxd derives its own array name from it.
        let output = Command::new(&self.program)
            .arg("-i")
            .arg(input)
            .output()
            .map_err(|source| DumpError::Spawn { program: self.program.clone(), source })?;
        if !output.status.success() {
            return Err(DumpError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn name(&self) -> &'static str {
        "xxd"
    }
}

fn resolve_xxd_path() -> PathBuf {
    std::env::var_os("XXD_BIN").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("xxd"))
}
