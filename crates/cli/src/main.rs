use std::path::PathBuf;
use std::process::ExitCode;

use bin_to_hdr::commands::{generate_command, GenerateOptions};
use bin_to_hdr::logging::init_tracing;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

/// Exit status for usage errors and failed runs alike.
const FAILURE: u8 = 1;

/// Wrap a binary image into the mxbl first-stage image C header.
///
/// The image is dumped with `xxd -i` (or the built-in dumper), and the dump's
/// byte literals are re-declared as `const u8 mxbl_first_stage_image[]` inside
/// an include guard. The header is written to the working directory.
#[derive(Parser, Debug)]
#[command(name = "bin-to-hdr", version, about = "Embed a binary image in a C header", long_about = None)]
struct Cli {
    /// Path to the binary image.
    binary: PathBuf,

    /// Header to write. Defaults to `mxbl_first_stage_image.h`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Transient dump file. Defaults to `temp.h`.
    #[arg(long)]
    intermediate: Option<PathBuf>,

    /// Directory for relative output/intermediate paths. Defaults to the current directory.
    #[arg(long, default_value = ".")]
    dir: String,

    /// Hex dumper to use: `xxd` or `builtin`.
    #[arg(long)]
    converter: Option<String>,

    /// Path to the xxd executable (otherwise `XXD_BIN` or `xxd` on PATH).
    #[arg(long)]
    xxd: Option<PathBuf>,

    /// JSON or YAML file with header settings; other flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append `};` when the dump interior does not close the array.
    #[arg(long, default_value_t = false)]
    ensure_closed: bool,

    /// Print a JSON report (including the image's SHA-256) on success.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(FAILURE),
            };
        }
    };

    init_tracing(cli.verbose);

    let opts = GenerateOptions {
        output: cli.output,
        intermediate: cli.intermediate,
        dir: cli.dir,
        converter: cli.converter,
        xxd: cli.xxd,
        config: cli.config,
        ensure_closed: cli.ensure_closed,
        json: cli.json,
    };

    match generate_command(&cli.binary, &opts) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(FAILURE)
        }
    }
}
