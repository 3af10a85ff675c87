//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    BoundaryService, InputLocator, InventoryService, MapService,
};
use crate::config::Settings;
use crate::infrastructure::shapes::ShapefileBoundary;
use crate::infrastructure::spreadsheet::CalamineSpreadsheet;
use crate::infrastructure::traits::{BoundarySource, FileSystem, RealFileSystem, SpreadsheetSource};

/// Container holding the I/O implementations shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Inventory workbook reader
    pub spreadsheet: Arc<dyn SpreadsheetSource>,

    /// Boundary geometry reader
    pub boundary: Arc<dyn BoundarySource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(CalamineSpreadsheet),
            Arc::new(ShapefileBoundary),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        spreadsheet: Arc<dyn SpreadsheetSource>,
        boundary: Arc<dyn BoundarySource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            spreadsheet,
            boundary,
        }
    }

    pub fn locator(&self) -> InputLocator {
        InputLocator::new(self.fs.clone(), self.settings.clone())
    }

    pub fn inventory_service(&self) -> InventoryService {
        InventoryService::new(self.spreadsheet.clone())
    }

    pub fn boundary_service(&self) -> BoundaryService {
        BoundaryService::new(self.fs.clone(), self.boundary.clone())
    }

    pub fn map_service(&self) -> MapService {
        MapService::new(
            self.fs.clone(),
            self.settings.clone(),
            self.inventory_service(),
            self.boundary_service(),
        )
    }
}
