use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::services::dump::{DumpError, HexDumper};

/// Byte literals per line, matching `xxd -i`.
pub const DEFAULT_COLUMNS: usize = 12;

/// In-process dumper producing the same text as `xxd -i <input>`.
#[derive(Debug, Clone)]
pub struct BuiltinDumper {
    columns: usize,
}

impl Default for BuiltinDumper {
    fn default() -> Self {
        Self { columns: DEFAULT_COLUMNS }
    }
}

impl BuiltinDumper {
    /// Use `columns` literals per line (clamped to at least one).
    pub fn with_columns(columns: usize) -> Self {
        Self { columns: columns.max(1) }
    }

    /// Render `bytes` as if they had been read from a file named `label`.
    pub fn render(&self, label: &Path, bytes: &[u8]) -> String {
        let ident = c_array_ident(label);
        let mut out = String::with_capacity(bytes.len() * 6 + 64);
        out.push_str("unsigned char ");
        out.push_str(&ident);
        out.push_str("[] = {\n");

        for (idx, byte) in bytes.iter().enumerate() {
            let sep = if idx % self.columns != 0 {
                ", "
            } else if idx == 0 {
                "  "
            } else {
                ",\n  "
            };
            // Writing into a String cannot fail.
            let _ = write!(out, "{sep}0x{byte:02x}");
        }
        if !bytes.is_empty() {
            out.push('\n');
        }

        out.push_str("};\n");
        let _ = writeln!(out, "unsigned int {ident}_len = {};", bytes.len());
        out
    }
}

impl HexDumper for BuiltinDumper {
    fn dump(&self, input: &Path) -> Result<String, DumpError> {
        let bytes =
            fs::read(input).map_err(|source| DumpError::Read { path: input.to_path_buf(), source })?;
        Ok(self.render(input, &bytes))
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}

/// Array name `xxd -i` derives from its path argument: every byte that is not
/// ASCII alphanumeric becomes `_`, and a leading digit gets a `__` prefix.
pub fn c_array_ident(path: &Path) -> String {
    let raw = path.as_os_str().as_encoded_bytes();
    let mut ident = String::with_capacity(raw.len() + 2);
    if raw.first().is_some_and(|b| b.is_ascii_digit()) {
        ident.push_str("__");
    }
    ident.extend(raw.iter().map(|&b| if b.is_ascii_alphanumeric() { b as char } else { '_' }));
    ident
}
