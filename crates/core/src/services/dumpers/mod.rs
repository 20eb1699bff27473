//! Hex dumpers that turn a binary file into a C initializer list.
//!
//! - `xxd`: shells out to `xxd -i`.
//! - `builtin`: produces the same text in-process.

pub mod builtin;
pub mod xxd;

pub use builtin::BuiltinDumper;
pub use xxd::XxdDumper;
