//! Command-line glue that lets a Meson build drive Cargo.
//!
//! Three binaries share this library: `cargo-wrapper` builds or tests a crate
//! and harvests the produced library artifacts into Meson's current build
//! directory, `check-is-version-string` classifies version-shaped strings for
//! Meson conditionals, and `project-version` prints the version declared in
//! `Cargo.toml`. They are independent leaf utilities; Meson invokes each one
//! as its own process.

pub mod artifacts;
pub mod cargo;
pub mod console_utils;
pub mod manifest;
pub mod opt;
pub mod version;
