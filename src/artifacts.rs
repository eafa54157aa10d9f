//! Harvesting built library artifacts out of the cargo target directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("invalid artifact glob")]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    Copy(#[from] std::io::Error),
}

/// Build profile, named after the target subdirectory artifacts land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Debug,
    Release,
}

impl Profile {
    pub fn from_release_flag(release: bool) -> Self {
        if release { Profile::Release } else { Profile::Debug }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }
}

/// Files under `target_dir` matching `**/<profile>/*.<extension>`.
///
/// The leading `**` matches zero or more components, so both the top-level
/// profile directory and nested target-triplet directories are covered.
/// A missing or empty target directory yields no matches, not an error.
pub fn collect_artifacts(
    target_dir: &Path,
    profile: Profile,
    extension: &str,
) -> Result<Vec<PathBuf>, HarvestError> {
    let matcher = globset::Glob::new(&format!("**/{}/*.{}", profile.dir_name(), extension))?
        .compile_matcher();

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(target_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let Ok(relative) = entry.path().strip_prefix(target_dir) else {
            continue;
        };
        if matcher.is_match(relative) {
            artifacts.push(entry.into_path());
        }
    }

    artifacts.sort();
    Ok(artifacts)
}

/// Copy every matching artifact into `destination`, returning what was
/// copied. Zero matches is fine; a failing copy is not.
pub fn copy_artifacts(
    target_dir: &Path,
    profile: Profile,
    extension: &str,
    destination: &Path,
) -> Result<Vec<PathBuf>, HarvestError> {
    let artifacts = collect_artifacts(target_dir, profile, extension)?;

    for artifact in &artifacts {
        if let Some(file_name) = artifact.file_name() {
            fs_err::copy(artifact, destination.join(file_name))?;
            tracing::debug!("copied {} to {}", artifact.display(), destination.display());
        }
    }

    Ok(artifacts)
}
