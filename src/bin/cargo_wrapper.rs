//! Meson custom-target entry point driving `cargo build`/`test`/`rustc`.
//!
//! Runs exactly one cargo invocation and, for library builds, copies the
//! produced artifacts into Meson's current build directory afterwards.

use clap::Parser;
use miette::IntoDiagnostic;

use meson_cargo_glue::artifacts::{self, Profile};
use meson_cargo_glue::cargo;
use meson_cargo_glue::console_utils::init_logging;
use meson_cargo_glue::opt::{CommandKind, WrapperOpts};

fn main() -> miette::Result<()> {
    let opts = WrapperOpts::parse();
    init_logging(&opts.verbose);

    let invocation = cargo::wrapper_invocation(&opts).into_diagnostic()?;
    invocation.run().into_diagnostic()?;

    // `test` produces nothing to harvest
    if let (CommandKind::Cbuild | CommandKind::Build, Some(extension)) =
        (opts.command, opts.extension.as_deref())
    {
        let target_dir = opts.project_build_root.join("target");
        let profile = Profile::from_release_flag(opts.release);
        let copied =
            artifacts::copy_artifacts(&target_dir, profile, extension, &opts.current_build_dir)
                .into_diagnostic()?;
        tracing::info!(
            "copied {} artifact(s) into {}",
            copied.len(),
            opts.current_build_dir.display()
        );
    }

    Ok(())
}
