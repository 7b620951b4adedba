//! Error types for flag registration, resolution, and parsing.

use crate::flag::FlagKind;

/// Errors produced while registering flags, resolving values, or parsing
/// argument tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raw text sourced from an environment variable, fallback file, or the
    /// command line could not be converted to the flag's kind.
    #[error("could not parse {raw:?} as {kind} value for flag {flag}: {reason}")]
    Conversion {
        /// Primary name of the flag being resolved.
        flag: String,
        /// The kind the text was parsed as.
        kind: FlagKind,
        /// The offending raw text.
        raw: String,
        /// Conversion-specific failure description.
        reason: String,
    },

    /// A dash token matched no registered flag name and could not be
    /// explained by short-option bundling.
    #[error("flag provided but not defined: -{name}")]
    UnknownFlag {
        /// The flag name as written, without dashes.
        name: String,
    },

    /// A value-taking flag appeared as the final token with nothing after it.
    #[error("flag needs an argument: -{flag}")]
    MissingValue {
        /// The name as written on the command line.
        flag: String,
    },

    /// A name or alias was registered twice within one flag set.
    #[error("flag redefined: {name}")]
    DuplicateFlag {
        /// The colliding name.
        name: String,
    },

    /// One or more required flags were never set by any source.
    #[error("required flag(s) {} not set", .names.join(", "))]
    RequiredMissing {
        /// Primary names of every missing flag, in registration order.
        names: Vec<String>,
    },
}

impl Error {
    /// Create a conversion error for a flag and the raw text that failed.
    pub(crate) fn conversion(
        flag: impl Into<String>,
        kind: FlagKind,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            flag: flag.into(),
            kind,
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
