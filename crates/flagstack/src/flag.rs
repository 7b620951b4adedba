//! Flag definitions and layered value application.
//!
//! A [`Flag`] pairs a name (plus aliases) with a typed default and the
//! sources it may resolve from. The value kinds form a closed set,
//! [`FlagKind`], and every kind shares one resolution routine; kinds
//! differ only in the string-to-value conversion.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::env::{EnvReader, FileReader};
use crate::error::Error;
use crate::resolver::{resolve_raw, ValueSource};
use crate::slice::{UintSlice, SERIALIZED_PREFIX};

/// The closed set of value kinds a flag can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Boolean toggle; the only kind that takes no value token.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    Uint,
    /// 64-bit float.
    Float,
    /// Duration in humantime notation (`300ms`, `2s`, `1h30m`).
    Duration,
    /// Arbitrary string.
    Str,
    /// Accumulating sequence of unsigned integers.
    UintSlice,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Uint => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::Duration => write!(f, "duration"),
            Self::Str => write!(f, "string"),
            Self::UintSlice => write!(f, "uint slice"),
        }
    }
}

/// A flag's current value, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    /// Boolean toggle value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Float value.
    Float(f64),
    /// Duration value.
    Duration(Duration),
    /// String value.
    Str(String),
    /// Unsigned-integer slice value.
    UintSlice(UintSlice),
}

impl FlagValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> FlagKind {
        match self {
            Self::Bool(_) => FlagKind::Bool,
            Self::Int(_) => FlagKind::Int,
            Self::Uint(_) => FlagKind::Uint,
            Self::Float(_) => FlagKind::Float,
            Self::Duration(_) => FlagKind::Duration,
            Self::Str(_) => FlagKind::Str,
            Self::UintSlice(_) => FlagKind::UintSlice,
        }
    }

    /// Parse raw text as a scalar of `kind`, returning the reason on failure.
    ///
    /// Slices are stateful (append vs overwrite) and are assigned through
    /// [`UintSlice::set`] instead.
    fn parse_scalar(kind: FlagKind, text: &str) -> Result<FlagValue, String> {
        match kind {
            FlagKind::Bool => parse_bool(text).map(FlagValue::Bool),
            FlagKind::Int => text
                .parse::<i64>()
                .map(FlagValue::Int)
                .map_err(|e| e.to_string()),
            FlagKind::Uint => text
                .parse::<u64>()
                .map(FlagValue::Uint)
                .map_err(|e| e.to_string()),
            FlagKind::Float => text
                .parse::<f64>()
                .map(FlagValue::Float)
                .map_err(|e| e.to_string()),
            FlagKind::Duration => humantime::parse_duration(text)
                .map(FlagValue::Duration)
                .map_err(|e| e.to_string()),
            FlagKind::Str => Ok(FlagValue::Str(text.to_string())),
            FlagKind::UintSlice => Err("slice values are assigned incrementally".to_string()),
        }
    }
}

/// Boolean spellings accepted on the command line and from sources.
fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("invalid boolean value {text:?}")),
    }
}

/// A named, typed, independently resolvable program option.
///
/// Construct with the per-kind constructors and chain builder methods:
///
/// ```
/// use flagstack::Flag;
///
/// let flag = Flag::int("jobs")
///     .alias("j")
///     .usage("number of parallel jobs")
///     .env("APP_JOBS")
///     .default_int(1);
/// assert_eq!(flag.names().collect::<Vec<_>>(), ["jobs", "j"]);
/// ```
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    aliases: Vec<String>,
    usage: String,
    env_vars: Vec<String>,
    file_path: Option<PathBuf>,
    required: bool,
    hidden: bool,
    default: FlagValue,
    value: FlagValue,
    has_been_set: bool,
    source: ValueSource,
}

impl Flag {
    fn with_default(name: impl Into<String>, default: FlagValue) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            usage: String::new(),
            env_vars: Vec::new(),
            file_path: None,
            required: false,
            hidden: false,
            value: default.clone(),
            default,
            has_been_set: false,
            source: ValueSource::Default,
        }
    }

    /// A boolean toggle flag, defaulting to `false`.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Bool(false))
    }

    /// A signed integer flag, defaulting to `0`.
    pub fn int(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Int(0))
    }

    /// An unsigned integer flag, defaulting to `0`.
    pub fn uint(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Uint(0))
    }

    /// A float flag, defaulting to `0.0`.
    pub fn float(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Float(0.0))
    }

    /// A duration flag, defaulting to zero.
    pub fn duration(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Duration(Duration::ZERO))
    }

    /// A string flag, defaulting to the empty string.
    pub fn string(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::Str(String::new()))
    }

    /// An unsigned-integer slice flag, defaulting to empty.
    pub fn uint_slice(name: impl Into<String>) -> Self {
        Self::with_default(name, FlagValue::UintSlice(UintSlice::new()))
    }

    // === Builder methods ===

    /// Add an alternate name resolving to this flag.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    /// Set the usage text. Presentation only; never consulted by resolution.
    pub fn usage(mut self, text: impl Into<String>) -> Self {
        self.usage = text.into();
        self
    }

    /// Add an environment variable to consult. Variables are consulted in
    /// the order added; the first one set and non-empty wins.
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_vars.push(var.into());
        self
    }

    /// Set a fallback file whose trimmed contents supply a value when no
    /// environment variable does.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Mark the flag required: omission from every source is a parse error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Hide the flag from help listings. Presentation only.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    fn set_default(&mut self, default: FlagValue) {
        self.value = default.clone();
        self.default = default;
    }

    /// Set the default boolean value. The default fixes the flag's kind.
    pub fn default_bool(mut self, value: bool) -> Self {
        self.set_default(FlagValue::Bool(value));
        self
    }

    /// Set the default integer value. The default fixes the flag's kind.
    pub fn default_int(mut self, value: i64) -> Self {
        self.set_default(FlagValue::Int(value));
        self
    }

    /// Set the default unsigned value. The default fixes the flag's kind.
    pub fn default_uint(mut self, value: u64) -> Self {
        self.set_default(FlagValue::Uint(value));
        self
    }

    /// Set the default float value. The default fixes the flag's kind.
    pub fn default_float(mut self, value: f64) -> Self {
        self.set_default(FlagValue::Float(value));
        self
    }

    /// Set the default duration value. The default fixes the flag's kind.
    pub fn default_duration(mut self, value: Duration) -> Self {
        self.set_default(FlagValue::Duration(value));
        self
    }

    /// Set the default string value. The default fixes the flag's kind.
    pub fn default_string(mut self, value: impl Into<String>) -> Self {
        self.set_default(FlagValue::Str(value.into()));
        self
    }

    /// Set the default slice contents. The default fixes the flag's kind,
    /// and the first assignment from any source discards the defaults.
    pub fn default_uints(mut self, values: impl Into<Vec<u64>>) -> Self {
        self.set_default(FlagValue::UintSlice(UintSlice::from_values(values)));
        self
    }

    // === Capability surface ===

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary name followed by aliases, the order used for registration
    /// and token matching.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// The kind of value this flag carries.
    pub fn kind(&self) -> FlagKind {
        self.value.kind()
    }

    /// Whether the parser expects a following token as the value. `false`
    /// only for boolean toggles, where presence alone is the signal.
    pub fn takes_value(&self) -> bool {
        self.kind() != FlagKind::Bool
    }

    /// Whether any source assigned a value. `false` means the flag still
    /// holds its static default.
    pub fn is_set(&self) -> bool {
        self.has_been_set
    }

    /// Whether omission from every source is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the flag is hidden from help listings.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The usage text.
    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    /// The current resolved value.
    pub fn value(&self) -> &FlagValue {
        &self.value
    }

    /// The static default value.
    pub fn default(&self) -> &FlagValue {
        &self.default
    }

    /// The layer that supplied the current value.
    pub fn source(&self) -> ValueSource {
        self.source
    }

    /// The fallback file path, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    // === Resolution ===

    /// Resolve the effective value from environment variables or the
    /// fallback file.
    ///
    /// The parser applies every flag before scanning tokens, and explicit
    /// command-line text always wins, so a flag that is already set stays
    /// untouched. Re-applying with unchanged environment state is a no-op.
    pub(crate) fn apply(&mut self, env: &dyn EnvReader, fs: &dyn FileReader) -> Result<(), Error> {
        if self.has_been_set {
            return Ok(());
        }
        let Some((raw, source)) = resolve_raw(&self.env_vars, self.file_path.as_deref(), env, fs)
        else {
            return Ok(());
        };

        let kind = self.value.kind();
        if kind == FlagKind::UintSlice {
            // Sourced text replaces slice defaults. A serialized payload is
            // handed over whole; plain text is comma-split with per-element
            // trim.
            let mut fresh = UintSlice::new();
            if raw.starts_with(SERIALIZED_PREFIX) {
                fresh
                    .set(&raw)
                    .map_err(|reason| Error::conversion(&self.name, kind, &raw, reason))?;
            } else {
                for part in raw.split(',') {
                    fresh
                        .set(part.trim())
                        .map_err(|reason| Error::conversion(&self.name, kind, &raw, reason))?;
                }
            }
            self.value = FlagValue::UintSlice(fresh);
        } else {
            self.value = FlagValue::parse_scalar(kind, &raw)
                .map_err(|reason| Error::conversion(&self.name, kind, &raw, reason))?;
        }

        debug!(flag = %self.name, source = %source, "flag resolved");
        self.has_been_set = true;
        self.source = source;
        Ok(())
    }

    /// Assign explicit command-line text. Scalars overwrite; slices append,
    /// except that the first explicit occurrence discards anything a lower
    /// layer supplied.
    pub(crate) fn set_explicit(&mut self, text: &str) -> Result<(), Error> {
        if let FlagValue::UintSlice(slice) = &mut self.value {
            if self.source != ValueSource::CommandLine {
                *slice = UintSlice::new();
            }
            slice
                .set(text)
                .map_err(|reason| Error::conversion(&self.name, FlagKind::UintSlice, text, reason))?;
        } else {
            self.value = FlagValue::parse_scalar(self.value.kind(), text)
                .map_err(|reason| Error::conversion(&self.name, self.value.kind(), text, reason))?;
        }
        self.has_been_set = true;
        self.source = ValueSource::CommandLine;
        Ok(())
    }
}
