//! hdrgen-core
//!
//! Core library for embedding a bootloader's first-stage image into a C header.
//!
//! This crate defines the generator configuration, the hex-dump capability
//! (external `xxd` or an in-process dumper), header rendering, and the
//! generation pipeline that ties them together.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from the CLI or from a `build.rs`.

pub mod config;
pub mod header;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
