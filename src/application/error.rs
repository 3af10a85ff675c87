//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no .{extension} inventory spreadsheet found in {}", dir.display())]
    InventoryNotFound { dir: PathBuf, extension: String },

    #[error("missing boundary shapefile: {0}")]
    BoundaryNotFound(PathBuf),

    #[error("cannot read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("cannot read boundary {}: {message}", path.display())]
    Boundary { path: PathBuf, message: String },

    #[error("reprojection failed: {message}")]
    Projection { message: String },

    #[error("no map center: inventory has no located trees and the boundary is empty")]
    NoMapCenter,

    #[error("cannot write map document {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
