use std::fs;

use bin_to_hdr::logging::default_directive;
use bin_to_hdr::{canonicalize_or_current, sha256_file};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().expect("cwd").canonicalize().expect("cwd"));
}

#[test]
fn canonicalize_or_current_folds_dot_segments() {
    let tmp = tempdir().expect("tempdir");
    fs::create_dir_all(tmp.path().join("a/b")).expect("create nested");
    let spelled = tmp.path().join("a/./b/..");

    let result = canonicalize_or_current(spelled.to_str().unwrap()).expect("canonicalize");
    assert_eq!(result, tmp.path().join("a").canonicalize().unwrap());
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does-not-exist-yet").expect("canonicalize");
    assert_eq!(result, std::env::current_dir().unwrap().join("does-not-exist-yet"));
}

#[test]
fn sha256_file_matches_known_digest() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("abc.bin");
    fs::write(&path, b"abc").unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_reports_missing_file() {
    let tmp = tempdir().expect("tempdir");
    let err = sha256_file(&tmp.path().join("absent.bin")).unwrap_err();
    assert!(err.to_string().contains("Failed to open image for hashing"));
}

#[test]
fn verbosity_maps_to_filter() {
    assert_eq!(default_directive(0), "warn");
    assert_eq!(default_directive(1), "info");
    assert_eq!(default_directive(2), "debug");
    assert_eq!(default_directive(9), "trace");
}
