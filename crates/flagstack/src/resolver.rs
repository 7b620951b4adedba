//! Layered raw-value resolution.
//!
//! A flag that was not set explicitly on the command line may pull its raw
//! text from environment variables or a fallback file. Sources are consulted
//! in a fixed order and the first one that yields text wins; the winning
//! layer is reported alongside the text so callers can record provenance.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::env::{EnvReader, FileReader};

/// The layer that supplied a flag's effective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Explicit command-line text.
    CommandLine,
    /// An environment variable.
    Env,
    /// The fallback file.
    File,
    /// The compile-time default; nothing else supplied a value.
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::Env => write!(f, "environment variable"),
            Self::File => write!(f, "fallback file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Scan `env_vars` in order, then the fallback file.
///
/// The first environment variable that is set and non-empty wins. A file
/// read failure is "no value from this source", not an error; readable
/// contents are trimmed before use, and trimmed-empty contents supply
/// nothing. Returns the raw text together with the layer that supplied it.
pub(crate) fn resolve_raw(
    env_vars: &[String],
    file_path: Option<&Path>,
    env: &dyn EnvReader,
    fs: &dyn FileReader,
) -> Option<(String, ValueSource)> {
    for name in env_vars {
        match env.var(name) {
            Some(value) if !value.is_empty() => {
                debug!(var = %name, "raw value resolved from environment");
                return Some((value, ValueSource::Env));
            }
            _ => {}
        }
    }

    if let Some(path) = file_path {
        if let Ok(contents) = fs.read(path) {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                debug!(path = %path.display(), "raw value resolved from fallback file");
                return Some((trimmed.to_string(), ValueSource::File));
            }
        }
    }

    None
}
