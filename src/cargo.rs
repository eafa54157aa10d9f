//! Construction and execution of the single cargo invocation.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::opt::{ArgsError, CommandKind, ToolchainOpts, WrapperOpts};

/// Directory Meson stages uninstalled pkg-config files in.
const MESON_UNINSTALLED: &str = "meson-uninstalled";

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error("could not assemble PKG_CONFIG_PATH")]
    PkgConfigPath(#[from] env::JoinPathsError),

    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("`{program}` exited with {status}:\n{stderr}")]
    FailedWithStderr {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// The library crate type requested from `cargo rustc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrateType {
    Staticlib,
    Cdylib,
}

impl CrateType {
    /// Map the artifact filename extension to the crate type producing it.
    /// `a` and `lib` denote static archives; everything else (`so`, `dll`,
    /// `dylib`) is a dynamic library.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "a" | "lib" => CrateType::Staticlib,
            _ => CrateType::Cdylib,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrateType::Staticlib => "staticlib",
            CrateType::Cdylib => "cdylib",
        }
    }
}

/// A fully constructed cargo command line, executed at most once.
///
/// Kept as a token sequence rather than a bare [`Command`] so the
/// construction logic stays inspectable in tests.
#[derive(Debug)]
pub struct CargoInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl CargoInvocation {
    /// Start a cargo command line. The toolchain selector, when one applies,
    /// must come directly after the program name.
    pub fn new(cargo: &Path, toolchain: &ToolchainOpts) -> Self {
        let mut invocation = Self {
            program: cargo.to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
        };
        if let Some(selector) = toolchain.selector() {
            invocation.arg(selector);
        }
        invocation
    }

    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    /// Set an environment variable on the child only; the parent environment
    /// is never touched.
    pub fn env(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> &mut Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The command line as displayable tokens, program first.
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Run the command with inherited stdio and fail on non-zero exit.
    pub fn run(&self) -> Result<(), InvokeError> {
        tracing::info!("running: {}", self.tokens().join(" "));
        let status = self
            .command()
            .status()
            .map_err(|source| InvokeError::Spawn {
                program: self.program_name(),
                source,
            })?;
        if !status.success() {
            return Err(InvokeError::Failed {
                program: self.program_name(),
                status,
            });
        }
        Ok(())
    }

    /// Run the command capturing stdout. A non-zero exit carries the captured
    /// stderr in the error.
    pub fn read_stdout(&self) -> Result<Vec<u8>, InvokeError> {
        tracing::debug!("running: {}", self.tokens().join(" "));
        let output = self
            .command()
            .output()
            .map_err(|source| InvokeError::Spawn {
                program: self.program_name(),
                source,
            })?;
        if !output.status.success() {
            return Err(InvokeError::FailedWithStderr {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Build the cargo command line for a `cargo-wrapper` invocation.
///
/// Validation runs first so no subprocess is ever spawned for an
/// inconsistent flag set.
pub fn wrapper_invocation(opts: &WrapperOpts) -> Result<CargoInvocation, InvokeError> {
    opts.validate()?;

    let target_dir = opts.project_build_root.join("target");
    let mut invocation = CargoInvocation::new(&opts.cargo, &opts.toolchain);

    match opts.command {
        CommandKind::Cbuild => {
            let extension = opts
                .extension
                .as_deref()
                .ok_or(ArgsError::MissingExtension("cbuild"))?;
            // `cargo rustc` rather than `cargo build`, so the crate type can
            // be overridden to what the linker step expects
            let crate_type = CrateType::from_extension(extension);
            invocation.args(["rustc", "--locked", "--crate-type", crate_type.as_str()]);
        }
        CommandKind::Test => {
            invocation.args(["test", "--locked", "--no-fail-fast", "--color=always"]);
        }
        CommandKind::Build => {
            invocation.args(["build", "--locked"]);
            if let Some(bin) = &opts.bin {
                invocation.args(["--bin", bin.as_str()]);
            }
        }
    }

    invocation.arg("--manifest-path");
    invocation.arg(opts.manifest_path.as_os_str());
    invocation.arg("--target-dir");
    invocation.arg(target_dir.as_os_str());

    if opts.release {
        invocation.arg("--release");
    }

    if let Some(target) = &opts.toolchain.target {
        invocation.args(["--target", target.as_str()]);
    }

    if !opts.features.is_empty() {
        invocation.arg("--features");
        invocation.arg(opts.features.join(","));
    }

    // harness flags go after `--` so cargo forwards them to the test binary
    if opts.command == CommandKind::Test {
        invocation.args(["--", "--include-ignored"]);
    }

    let pkg_config_path = pkg_config_path_with_uninstalled(
        &opts.project_build_root,
        env::var_os("PKG_CONFIG_PATH").as_deref(),
    )?;
    invocation.env("PKG_CONFIG_PATH", pkg_config_path);

    Ok(invocation)
}

/// Prepend `<project-build-root>/meson-uninstalled` to an inherited
/// `PKG_CONFIG_PATH` so in-tree libraries resolve ahead of installed ones.
/// Empty entries in the inherited value are dropped.
pub fn pkg_config_path_with_uninstalled(
    project_build_root: &Path,
    existing: Option<&OsStr>,
) -> Result<OsString, env::JoinPathsError> {
    let mut paths = vec![project_build_root.join(MESON_UNINSTALLED)];
    if let Some(existing) = existing {
        paths.extend(env::split_paths(existing).filter(|path| !path.as_os_str().is_empty()));
    }
    env::join_paths(paths)
}
