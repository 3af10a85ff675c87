//! arbormap: render a site's tree inventory as a self-contained interactive map.
//!
//! Layers:
//! - `domain`: records, styles, canopy geometry, site naming
//! - `application`: services that locate inputs and build the map document
//! - `infrastructure`: file system, spreadsheet and shapefile adapters
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
