//! Error conversion helpers for store and catalog I/O
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read adjustment store", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::operation(format!("{}: {}", action, path.display()), e))
    }
}

/// Same as [`IoResultExt`] for TOML (de)serialization results.
pub trait TomlResultExt<T> {
    fn with_toml_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> TomlResultExt<T> for Result<T, toml::de::Error> {
    fn with_toml_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::operation(format!("{}: {}", action, path.display()), e))
    }
}

impl<T> TomlResultExt<T> for Result<T, toml::ser::Error> {
    fn with_toml_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::operation(format!("{}: {}", action, path.display()), e))
    }
}
