//! Command-line options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum, crate_version};
use clap_verbosity_flag::{InfoLevel, Verbosity};

/// Inconsistent flag combinations, rejected before any subprocess is spawned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("--target and/or --build-triplet is required when --toolchain-version is given")]
    ToolchainWithoutTriplet,

    #[error("`cargo test` does not take --extension or --bin")]
    TestTakesNoLibraryArgs,

    #[error("--extension is required for the `{0}` command")]
    MissingExtension(&'static str),
}

/// The cargo subcommand the wrapper drives.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Compile the crate as a C library (`cargo rustc --crate-type ...`)
    Cbuild,
    /// Run the test suite (`cargo test`)
    Test,
    /// Plain `cargo build`
    Build,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Cbuild => "cbuild",
            CommandKind::Test => "test",
            CommandKind::Build => "build",
        }
    }
}

/// Toolchain selection flags shared by `cargo-wrapper` and `project-version`.
#[derive(Parser, Debug, Clone, Default)]
pub struct ToolchainOpts {
    /// Rust toolchain version to use, e.g. `1.89.0`
    #[arg(long)]
    pub toolchain_version: Option<String>,

    /// Target triplet for cross compilation
    #[arg(long)]
    pub target: Option<String>,

    /// Build toolchain triplet (for cross builds using a specific toolchain version)
    #[arg(long)]
    pub build_triplet: Option<String>,
}

impl ToolchainOpts {
    /// The `+<version>-<triplet>` token passed to cargo directly after the
    /// program name. The build triplet wins over the target when both are set.
    pub fn selector(&self) -> Option<String> {
        let version = self.toolchain_version.as_ref()?;
        let triplet = self.build_triplet.as_ref().or(self.target.as_ref())?;
        Some(format!("+{version}-{triplet}"))
    }

    /// A toolchain version on its own is ambiguous: rustup toolchain names
    /// are version-triplet pairs.
    pub fn validate(&self) -> Result<(), ArgsError> {
        if self.toolchain_version.is_some() && self.target.is_none() && self.build_triplet.is_none()
        {
            return Err(ArgsError::ToolchainWithoutTriplet);
        }
        Ok(())
    }
}

/// Options for the `cargo-wrapper` binary.
#[derive(Parser, Debug)]
#[command(version = crate_version!(), about = "Drive cargo from a Meson custom target")]
pub struct WrapperOpts {
    /// Cargo command to run
    #[arg(long, value_enum)]
    pub command: CommandKind,

    /// Path to the cargo executable
    #[arg(long)]
    pub cargo: PathBuf,

    /// Path to Cargo.toml
    #[arg(long)]
    pub manifest_path: PathBuf,

    /// Value of meson.current_build_dir()
    #[arg(long)]
    pub current_build_dir: PathBuf,

    /// Value of meson.current_source_dir()
    #[arg(long)]
    pub current_source_dir: PathBuf,

    /// Value of meson.project_build_root()
    #[arg(long)]
    pub project_build_root: PathBuf,

    #[command(flatten)]
    pub toolchain: ToolchainOpts,

    /// Build artifacts in release mode
    #[arg(long)]
    pub release: bool,

    /// Filename extension of the library to harvest (so, a, dll, lib, dylib)
    #[arg(long)]
    pub extension: Option<String>,

    /// Build only the named binary target
    #[arg(long)]
    pub bin: Option<String>,

    /// Cargo features to enable. For more than one feature use it multiple times.
    #[arg(long)]
    pub features: Vec<String>,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl WrapperOpts {
    /// Cross-field validation, run before constructing the command line.
    pub fn validate(&self) -> Result<(), ArgsError> {
        self.toolchain.validate()?;

        match self.command {
            CommandKind::Test => {
                if self.extension.is_some() || self.bin.is_some() {
                    return Err(ArgsError::TestTakesNoLibraryArgs);
                }
            }
            // the extension drives both crate-type selection and the harvest glob
            CommandKind::Cbuild | CommandKind::Build => {
                if self.extension.is_none() {
                    return Err(ArgsError::MissingExtension(self.command.as_str()));
                }
            }
        }

        Ok(())
    }
}

/// Options for the `project-version` binary.
#[derive(Parser, Debug)]
#[command(version = crate_version!(), about = "Print the version declared in Cargo.toml")]
pub struct ProjectVersionOpts {
    /// Path to the cargo executable
    #[arg(long)]
    pub cargo: PathBuf,

    /// Path to Cargo.toml
    #[arg(long)]
    pub manifest_path: PathBuf,

    #[command(flatten)]
    pub toolchain: ToolchainOpts,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// Options for the `check-is-version-string` binary.
#[derive(Parser, Debug)]
#[command(version = crate_version!(), about = "Check whether a string is shaped like a dotted version")]
pub struct CheckVersionOpts {
    /// String to check for a version-like shape
    #[arg(long)]
    pub string: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse_wrapper(extra: &[&str]) -> Result<WrapperOpts, clap::Error> {
        let base = [
            "cargo-wrapper",
            "--cargo",
            "/usr/bin/cargo",
            "--manifest-path",
            "Cargo.toml",
            "--current-build-dir",
            "builddir/sub",
            "--current-source-dir",
            "sub",
            "--project-build-root",
            "builddir",
        ];
        WrapperOpts::try_parse_from(base.iter().chain(extra))
    }

    #[test]
    fn selector_prefers_build_triplet() {
        let toolchain = ToolchainOpts {
            toolchain_version: Some("1.89.0".into()),
            target: Some("aarch64-unknown-linux-gnu".into()),
            build_triplet: Some("x86_64-unknown-linux-gnu".into()),
        };
        assert_eq!(
            toolchain.selector().as_deref(),
            Some("+1.89.0-x86_64-unknown-linux-gnu")
        );
    }

    #[test]
    fn selector_falls_back_to_target() {
        let toolchain = ToolchainOpts {
            toolchain_version: Some("1.89.0".into()),
            target: Some("aarch64-unknown-linux-gnu".into()),
            build_triplet: None,
        };
        assert_eq!(
            toolchain.selector().as_deref(),
            Some("+1.89.0-aarch64-unknown-linux-gnu")
        );
    }

    #[test]
    fn no_selector_without_toolchain_version() {
        let toolchain = ToolchainOpts {
            toolchain_version: None,
            target: Some("aarch64-unknown-linux-gnu".into()),
            build_triplet: None,
        };
        assert_eq!(toolchain.selector(), None);
    }

    #[test]
    fn toolchain_version_requires_a_triplet() {
        let opts = parse_wrapper(&[
            "--command",
            "build",
            "--extension",
            "so",
            "--toolchain-version",
            "1.89.0",
        ])
        .unwrap();
        assert_eq!(opts.validate(), Err(ArgsError::ToolchainWithoutTriplet));
    }

    #[rstest]
    #[case::with_target(&["--target", "x86_64-unknown-linux-gnu"])]
    #[case::with_build_triplet(&["--build-triplet", "x86_64-unknown-linux-gnu"])]
    fn toolchain_version_with_triplet_is_accepted(#[case] triplet_args: &[&str]) {
        let mut args = vec![
            "--command",
            "build",
            "--extension",
            "so",
            "--toolchain-version",
            "1.89.0",
        ];
        args.extend_from_slice(triplet_args);
        let opts = parse_wrapper(&args).unwrap();
        assert_eq!(opts.validate(), Ok(()));
    }

    #[rstest]
    #[case::extension(&["--extension", "so"])]
    #[case::bin(&["--bin", "tool"])]
    fn test_command_rejects_library_args(#[case] library_args: &[&str]) {
        let mut args = vec!["--command", "test"];
        args.extend_from_slice(library_args);
        let opts = parse_wrapper(&args).unwrap();
        assert_eq!(opts.validate(), Err(ArgsError::TestTakesNoLibraryArgs));
    }

    #[test]
    fn test_command_without_library_args_is_accepted() {
        let opts = parse_wrapper(&["--command", "test"]).unwrap();
        assert_eq!(opts.validate(), Ok(()));
    }

    #[rstest]
    #[case::cbuild("cbuild")]
    #[case::build("build")]
    fn library_builds_require_an_extension(#[case] command: &str) {
        let opts = parse_wrapper(&["--command", command]).unwrap();
        assert!(matches!(
            opts.validate(),
            Err(ArgsError::MissingExtension(_))
        ));
    }
}
