//! Errors raised outside the map pipeline itself.

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// `-C` was not given and the process has no usable working directory.
    #[error("cannot determine site directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
