//! Unsigned-integer slice values.
//!
//! Slice flags accumulate across repeated plain-text assignments but are
//! replaced wholesale by a serialized payload. The serialized form is a
//! prefixed JSON array, which survives transport through environment
//! variables and fallback files.

use std::fmt;

/// Marks a raw value as a serialized JSON array rather than plain text.
/// Control characters cannot appear in legitimate plain-text values.
pub(crate) const SERIALIZED_PREFIX: &str = "\u{1f}\u{1f}";

/// An ordered sequence of `u64` values with set-tracking.
///
/// Plain-text assignment appends, so repeated occurrences accumulate
/// (`--port 80 --port 443`). Serialized-payload assignment overwrites,
/// so a single transported value replaces everything. The first
/// assignment after construction clears any default contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UintSlice {
    values: Vec<u64>,
    has_been_set: bool,
}

impl UintSlice {
    /// Create an empty slice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slice with default contents. The defaults do not count as
    /// set and are discarded by the first assignment.
    pub fn from_values(defaults: impl Into<Vec<u64>>) -> Self {
        Self {
            values: defaults.into(),
            has_been_set: false,
        }
    }

    /// Assign from raw text.
    ///
    /// Plain text parses one unsigned integer and appends it. Text carrying
    /// the serialized-payload prefix decodes a JSON array and overwrites the
    /// current contents. Either way the slice counts as set afterwards.
    pub fn set(&mut self, text: &str) -> Result<(), String> {
        if !self.has_been_set {
            self.values.clear();
            self.has_been_set = true;
        }

        if let Some(payload) = text.strip_prefix(SERIALIZED_PREFIX) {
            self.values = serde_json::from_str(payload).map_err(|e| e.to_string())?;
            return Ok(());
        }

        let value: u64 = text.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
        self.values.push(value);
        Ok(())
    }

    /// The serialized form: payload prefix plus JSON array.
    pub fn serialize(&self) -> String {
        let json = serde_json::to_string(&self.values).unwrap_or_default();
        format!("{SERIALIZED_PREFIX}{json}")
    }

    /// The current contents.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Whether any assignment has happened.
    pub fn is_set(&self) -> bool {
        self.has_been_set
    }
}

impl fmt::Display for UintSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.values)
    }
}
