use std::fs;
use std::path::PathBuf;

use bin_to_hdr::commands::{generate_command, resolve_config, GenerateOptions};
use hdrgen_core::config::ClosingPolicy;
use tempfile::tempdir;

#[test]
fn defaults_resolve_without_config_file() {
    let config = resolve_config(&GenerateOptions::default()).unwrap();
    assert_eq!(config.output, PathBuf::from("mxbl_first_stage_image.h"));
    assert_eq!(config.converter, "xxd");
    assert_eq!(config.closing, ClosingPolicy::Verbatim);
}

#[test]
fn flags_override_config_file() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("hdr.json");
    fs::write(&cfg, r#"{"output":"cfg.h","intermediate":"cfg.dump","converter":"xxd"}"#).unwrap();

    let opts = GenerateOptions {
        config: Some(cfg),
        output: Some(PathBuf::from("flag.h")),
        converter: Some("builtin".into()),
        xxd: Some(PathBuf::from("/opt/xxd")),
        ensure_closed: true,
        ..GenerateOptions::default()
    };
    let config = resolve_config(&opts).unwrap();
    assert_eq!(config.output, PathBuf::from("flag.h"));
    assert_eq!(config.intermediate, PathBuf::from("cfg.dump"));
    assert_eq!(config.converter, "builtin");
    assert_eq!(config.xxd_path, Some(PathBuf::from("/opt/xxd")));
    assert_eq!(config.closing, ClosingPolicy::Ensure);
}

#[test]
fn colliding_paths_are_rejected() {
    let opts = GenerateOptions {
        output: Some(PathBuf::from("same.h")),
        intermediate: Some(PathBuf::from("same.h")),
        ..GenerateOptions::default()
    };
    let err = resolve_config(&opts).unwrap_err();
    assert!(format!("{err:#}").contains("must differ"), "unexpected error: {err:#}");
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempdir().unwrap();
    let opts = GenerateOptions {
        config: Some(dir.path().join("absent.json")),
        ..GenerateOptions::default()
    };
    let err = resolve_config(&opts).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"), "unexpected error: {err}");
}

#[test]
fn generate_command_writes_into_dir() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fw.bin");
    fs::write(&input, [0xDEu8, 0xAD, 0xBE, 0xEF]).unwrap();

    let opts = GenerateOptions {
        dir: dir.path().to_string_lossy().to_string(),
        converter: Some("builtin".into()),
        ..GenerateOptions::default()
    };
    let report = generate_command(&input, &opts).unwrap();
    assert_eq!(report.label, "fw.bin");
    assert_eq!(report.output, dir.path().canonicalize().unwrap().join("mxbl_first_stage_image.h"));

    let header = fs::read_to_string(&report.output).unwrap();
    assert!(header.contains("  0xde, 0xad, 0xbe, 0xef\n};\n#endif\n"));
}

#[test]
fn generate_command_adds_context_to_failures() {
    let dir = tempdir().unwrap();
    let opts = GenerateOptions {
        dir: dir.path().to_string_lossy().to_string(),
        converter: Some("builtin".into()),
        ..GenerateOptions::default()
    };
    let err = generate_command(&dir.path().join("nope.bin"), &opts).unwrap_err();
    assert!(err.to_string().contains("Failed to generate header from"), "unexpected: {err}");
}
