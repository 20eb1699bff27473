use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ClosingPolicy, HeaderConfig};
use crate::header::{self, ARRAY_CLOSE};
use crate::services::dump::{DumpError, HexDumper};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Hex dump failed: {0}")]
    ExternalTool(DumpError),
    #[error("Output and intermediate both resolve to {0}")]
    PathCollision(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<DumpError> for GenerateError {
    fn from(err: DumpError) -> Self {
        match err {
            // An unreadable input is an environment problem, not a tool failure.
            DumpError::Read { path, source } => GenerateError::Io { path, source },
            other => GenerateError::ExternalTool(other),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> GenerateError + '_ {
    move |source| GenerateError::Io { path: path.to_path_buf(), source }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Text of the `// ...` comment line.
    pub label: String,
    pub converter: String,
    /// Dump lines copied into the array body.
    pub body_lines: usize,
    /// Whether the copied body ended with `};`.
    pub closed: bool,
    /// Whether a `};` line was appended because of `ClosingPolicy::Ensure`.
    pub appended_close: bool,
}

/// Final path component of the input, or the input text when there is none.
pub fn input_label(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| input.display().to_string())
}

/// Transient dump file; removed when dropped unless already removed.
struct IntermediateArtifact {
    path: PathBuf,
    live: bool,
}

impl IntermediateArtifact {
    fn write(path: PathBuf, contents: &[u8]) -> Result<Self, GenerateError> {
        // Not armed until the file is ours: a failed create must not remove
        // whatever already sits at `path`.
        let mut file = File::create(&path).map_err(io_err(&path))?;
        let artifact = Self { path, live: true };
        file.write_all(contents).map_err(io_err(&artifact.path))?;
        Ok(artifact)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn remove(mut self) -> Result<(), GenerateError> {
        self.live = false;
        fs::remove_file(&self.path).map_err(io_err(&self.path))
    }
}

impl Drop for IntermediateArtifact {
    fn drop(&mut self) {
        if self.live {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Absolute, lexically normalized form of `path` (`.` dropped, `..` folded).
///
/// Symlinks are not followed; the files need not exist yet.
fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute =
        if path.is_absolute() { path.to_path_buf() } else { std::env::current_dir()?.join(path) };
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

fn remove_if_exists(path: &Path) -> Result<(), GenerateError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GenerateError::Io { path: path.to_path_buf(), source: e }),
    }
}

/// Wraps a binary image's hex dump into the configured C header.
pub struct HeaderGenerator {
    config: HeaderConfig,
    dumper: Box<dyn HexDumper>,
    base_dir: Option<PathBuf>,
}

impl HeaderGenerator {
    pub fn new(config: HeaderConfig, dumper: Box<dyn HexDumper>) -> Self {
        Self { config, dumper, base_dir: None }
    }

    /// Resolve relative output/intermediate paths against `dir` instead of
    /// the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.config.output)
    }

    pub fn intermediate_path(&self) -> PathBuf {
        self.resolve(&self.config.intermediate)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Dump `input` and rewrite the output header from the dump.
    ///
    /// A failed dump leaves the previous output untouched. The intermediate
    /// file never outlives this call.
    pub fn generate(&self, input: &Path) -> Result<GenerationReport, GenerateError> {
        let output_path = self.output_path();
        let intermediate_path = self.intermediate_path();
        let absolute_output = normalize(&output_path).map_err(io_err(&output_path))?;
        if absolute_output == normalize(&intermediate_path).map_err(io_err(&intermediate_path))? {
            return Err(GenerateError::PathCollision(absolute_output));
        }

        let dump = self.dumper.dump(input)?;
        debug!(
            converter = self.dumper.name(),
            bytes = dump.len(),
            intermediate = %intermediate_path.display(),
            "captured hex dump"
        );
        let artifact = IntermediateArtifact::write(intermediate_path, dump.as_bytes())?;

        remove_if_exists(&output_path)?;

        let reader = File::open(artifact.path()).map_err(io_err(artifact.path()))?;
        let mut reader = BufReader::new(reader);
        let writer = File::create(&output_path).map_err(io_err(&output_path))?;
        let mut out = BufWriter::new(writer);

        let label = input_label(input);
        let write_result = (|| -> io::Result<(header::Transcript, bool)> {
            header::write_prologue(&mut out, &self.config)?;
            header::write_declaration(&mut out, &self.config, &label)?;
            let transcript = header::transcribe_body(&mut reader, &mut out)?;
            let mut appended = false;
            if !transcript.is_closed() && self.config.closing == ClosingPolicy::Ensure {
                if transcript.last_line.is_some() && !transcript.ends_with_newline {
                    // Keep `};` on its own line when the dump lacked a trailing newline.
                    writeln!(out)?;
                }
                writeln!(out, "{ARRAY_CLOSE}")?;
                appended = true;
            }
            header::write_epilogue(&mut out)?;
            out.flush()?;
            Ok((transcript, appended))
        })();
        let (transcript, appended_close) = write_result.map_err(io_err(&output_path))?;
        drop(out);
        drop(reader);

        if !transcript.is_closed() && !appended_close {
            warn!(
                output = %output_path.display(),
                "array initializer is not closed with `{ARRAY_CLOSE}` before #endif"
            );
        }

        artifact.remove()?;
        debug!(output = %output_path.display(), lines = transcript.lines, "header written");

        Ok(GenerationReport {
            input: input.to_path_buf(),
            output: output_path,
            label,
            converter: self.dumper.name().to_string(),
            body_lines: transcript.lines,
            closed: transcript.is_closed(),
            appended_close,
        })
    }
}
