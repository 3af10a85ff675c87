//! Domain layer: entities and map rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod canopy;
pub mod entities;
pub mod error;
pub mod inventory;
pub mod site;
pub mod style;

pub use canopy::canopy_radius;
pub use entities::*;
pub use error::DomainError;
pub use inventory::Inventory;
pub use site::SiteNamer;
pub use style::{GenusStyle, GenusStyles, MarkerColor, MarkerStyle, ShapeSpec, FALLBACK_STYLE};

/// Expand environment variables and `~` in a path string.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
