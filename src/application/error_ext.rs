//! Error conversion helpers for I/O and input-source results
//!
//! Adds path context when lifting lower-level errors into `ApplicationError`.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read(&photo)
    ///     .with_path_context("read photo", &photo)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait for input readers that report errors as plain messages.
pub trait SourceResultExt<T> {
    /// Attribute the failure to the inventory spreadsheet at `path`.
    fn spreadsheet_context(self, path: &Path) -> ApplicationResult<T>;

    /// Attribute the failure to the boundary shapefile at `path`.
    fn boundary_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> SourceResultExt<T> for Result<T, String> {
    fn spreadsheet_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|message| ApplicationError::Spreadsheet {
            path: path.to_path_buf(),
            message,
        })
    }

    fn boundary_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|message| ApplicationError::Boundary {
            path: path.to_path_buf(),
            message,
        })
    }
}
