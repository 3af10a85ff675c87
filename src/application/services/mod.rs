//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, SpreadsheetSource, ...)
//! but are themselves concrete structs, not traits.

mod boundary;
mod inventory;
mod locator;
mod map;
mod photos;

pub use boundary::{
    normalize_esri_wkt, wkt_to_proj_string, BoundaryService, Reprojector, WEB_MERCATOR, WGS84,
};
pub use inventory::InventoryService;
pub use locator::InputLocator;
pub use map::{MapReport, MapService};
pub use photos::{EmbeddedPhoto, PhotoEntry, PhotoIndex, PhotoService, PhotoSlot};
