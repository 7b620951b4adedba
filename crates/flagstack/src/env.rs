//! Environment and filesystem abstractions for testability.
//!
//! Layered resolution reads process environment variables and fallback
//! files. These traits abstract both so tests can exercise precedence
//! without mutating real process state.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over environment variable access.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value, or `None` if unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Abstraction over fallback-file reads.
pub trait FileReader: Send + Sync {
    /// Read the entire contents of a file.
    fn read(&self, path: &Path) -> io::Result<String>;
}

// === Real implementations ===

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Real filesystem reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileReader for RealFs {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

// === Mock implementations for testing ===

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Mock filesystem reader for testing.
///
/// Paths not added with [`with_file`](Self::with_file) read as not found.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: HashMap<PathBuf, String>,
}

impl MockFs {
    /// Create an empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FileReader for MockFs {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}
