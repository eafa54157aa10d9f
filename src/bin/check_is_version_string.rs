//! Classifies a string as version-shaped, for Meson conditionals.
//!
//! Prints `check` when the string looks like a two- or three-component
//! dotted version, `skip` otherwise. Meson matches the token literally to
//! decide whether a toolchain version check applies.

use clap::Parser;

use meson_cargo_glue::opt::CheckVersionOpts;
use meson_cargo_glue::version::VersionShape;

fn main() {
    let opts = CheckVersionOpts::parse();
    println!("{}", VersionShape::classify(&opts.string));
}
