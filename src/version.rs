//! Version-shaped string classification.

use std::fmt;

/// Outcome of the version-shape check. The token is printed verbatim on
/// stdout and matched literally by the Meson build files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionShape {
    /// Two or three dotted integer components
    Check,
    /// Anything else
    Skip,
}

impl VersionShape {
    /// Split on `.` and require exactly two or three components, each of
    /// which parses as an integer. Any parse failure short-circuits to
    /// [`VersionShape::Skip`].
    pub fn classify(string: &str) -> Self {
        let parts: Vec<&str> = string.split('.').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return VersionShape::Skip;
        }
        if parts.iter().all(|part| part.parse::<i64>().is_ok()) {
            VersionShape::Check
        } else {
            VersionShape::Skip
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VersionShape::Check => "check",
            VersionShape::Skip => "skip",
        }
    }
}

impl fmt::Display for VersionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
