//! Text pieces of the generated header.
//!
//! The generator writes, in order: the prologue, the label comment, the array
//! declaration, the transcribed dump interior, and the epilogue.

use std::io::{self, BufRead, Write};

use crate::config::HeaderConfig;

/// Line that closes the array initializer in `xxd -i` output.
pub const ARRAY_CLOSE: &str = "};";

/// Include guard and the `#include` that provides the element type.
pub fn write_prologue<W: Write>(out: &mut W, config: &HeaderConfig) -> io::Result<()> {
    writeln!(out, "#ifndef {}", config.guard)?;
    writeln!(out, "#define {}", config.guard)?;
    writeln!(out, "#include {}", config.include)
}

/// `// <label>` followed by the opening of the array declaration.
pub fn write_declaration<W: Write>(
    out: &mut W,
    config: &HeaderConfig,
    label: &str,
) -> io::Result<()> {
    writeln!(out, "// {label}")?;
    writeln!(out, "const {} {}[] = {{", config.element_type, config.symbol)
}

pub fn write_epilogue<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "#endif")
}

/// Outcome of copying the dump interior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    /// Number of lines copied.
    pub lines: usize,
    /// Last copied line without its line terminator.
    pub last_line: Option<String>,
    /// Whether the last copied line carried a `\n`.
    pub ends_with_newline: bool,
}

impl Transcript {
    /// True when the copied interior ends with the initializer's `};`.
    pub fn is_closed(&self) -> bool {
        self.last_line.as_deref().is_some_and(|l| l.trim() == ARRAY_CLOSE)
    }
}

/// Copy every line of `dump` except the first and the last, byte for byte.
///
/// Line terminators are kept as they appear in the input, including a missing
/// terminator on the final retained line.
pub fn transcribe_body<R: BufRead, W: Write>(dump: &mut R, out: &mut W) -> io::Result<Transcript> {
    let mut transcript = Transcript::default();
    let mut first = true;
    // Held back one line so the last one is never written.
    let mut pending: Option<Vec<u8>> = None;

    loop {
        let mut line = Vec::new();
        if dump.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if first {
            first = false;
            continue;
        }
        if let Some(prev) = pending.replace(line) {
            out.write_all(&prev)?;
            transcript.lines += 1;
            transcript.ends_with_newline = prev.ends_with(b"\n");
            transcript.last_line = Some(strip_terminator(&prev));
        }
    }

    Ok(transcript)
}

fn strip_terminator(line: &[u8]) -> String {
    let text = String::from_utf8_lossy(line);
    text.trim_end_matches(['\n', '\r']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcribe(input: &str) -> (String, Transcript) {
        let mut out = Vec::new();
        let t = transcribe_body(&mut input.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), t)
    }

    #[test]
    fn drops_first_and_last_lines() {
        let (body, t) = transcribe("decl\n  0x01\n};\nlen\n");
        assert_eq!(body, "  0x01\n};\n");
        assert_eq!(t.lines, 2);
        assert!(t.is_closed());
    }

    #[test]
    fn short_inputs_yield_nothing() {
        assert_eq!(transcribe("").0, "");
        assert_eq!(transcribe("only\n").0, "");
        assert_eq!(transcribe("decl\nlast\n").0, "");
    }

    #[test]
    fn last_line_without_newline_is_still_dropped() {
        let (body, t) = transcribe("decl\n  0x01, 0x02\n};");
        assert_eq!(body, "  0x01, 0x02\n");
        assert!(!t.is_closed());
    }
}
