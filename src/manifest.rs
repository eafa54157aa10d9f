//! Reading the declared package version via `cargo read-manifest`.

use serde::Deserialize;

use crate::cargo::{CargoInvocation, InvokeError};
use crate::opt::ProjectVersionOpts;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error("could not parse `cargo read-manifest` output")]
    Parse(#[from] serde_json::Error),
}

/// The subset of the `cargo read-manifest` document these tools consume.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
}

/// Run `cargo read-manifest` and deserialize the result.
///
/// The toolchain consistency rule is the same as for the build wrapper and
/// is checked before the subprocess runs.
pub fn read_manifest(opts: &ProjectVersionOpts) -> Result<PackageManifest, ManifestError> {
    opts.toolchain.validate().map_err(InvokeError::from)?;

    let mut invocation = CargoInvocation::new(&opts.cargo, &opts.toolchain);
    invocation.arg("read-manifest");
    invocation.arg("--manifest-path");
    invocation.arg(opts.manifest_path.as_os_str());

    let stdout = invocation.read_stdout()?;
    Ok(serde_json::from_slice(&stdout)?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::opt::ArgsError;

    #[test]
    fn manifest_parses_and_ignores_unknown_fields() {
        // trimmed-down `cargo read-manifest` output
        let json = r#"{
            "name": "librsvg",
            "version": "2.59.0",
            "id": "path+file:///src/librsvg#2.59.0",
            "license": "LGPL-2.1-or-later",
            "dependencies": [],
            "targets": [{"kind": ["staticlib", "cdylib"], "name": "rsvg"}],
            "features": {},
            "edition": "2021"
        }"#;

        let manifest: PackageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.name, "librsvg");
        assert_eq!(manifest.version, "2.59.0");
    }

    #[test]
    fn malformed_output_is_a_parse_error() {
        let result = serde_json::from_str::<PackageManifest>("error: not json");
        assert!(result.is_err());
    }

    #[test]
    fn toolchain_rule_applies_before_the_subprocess() {
        let opts = ProjectVersionOpts::try_parse_from([
            "project-version",
            "--cargo",
            "/does/not/exist/cargo",
            "--manifest-path",
            "Cargo.toml",
            "--toolchain-version",
            "1.89.0",
        ])
        .unwrap();

        // the bogus cargo path is never spawned; validation fails first
        assert!(matches!(
            read_manifest(&opts),
            Err(ManifestError::Invoke(InvokeError::Args(
                ArgsError::ToolchainWithoutTriplet
            )))
        ));
    }
}
