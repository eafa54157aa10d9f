//! Prints the package version declared in `Cargo.toml`.

use clap::Parser;
use miette::IntoDiagnostic;

use meson_cargo_glue::console_utils::init_logging;
use meson_cargo_glue::manifest;
use meson_cargo_glue::opt::ProjectVersionOpts;

fn main() -> miette::Result<()> {
    let opts = ProjectVersionOpts::parse();
    init_logging(&opts.verbose);

    let manifest = manifest::read_manifest(&opts).into_diagnostic()?;
    println!("{}", manifest.version);

    Ok(())
}
