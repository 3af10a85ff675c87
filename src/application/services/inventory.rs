//! Inventory loading service
//!
//! Reads the inventory worksheet and turns its rows into tree records.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, SourceResultExt};
use crate::domain::Inventory;
use crate::infrastructure::traits::SpreadsheetSource;

/// Service for loading the tree inventory.
pub struct InventoryService {
    source: Arc<dyn SpreadsheetSource>,
}

impl InventoryService {
    /// Create a new inventory service.
    pub fn new(source: Arc<dyn SpreadsheetSource>) -> Self {
        Self { source }
    }

    /// Load the inventory from `sheet`, or from the first worksheet when the
    /// workbook has no sheet of that name.
    #[instrument(skip(self))]
    pub fn load(&self, path: &Path, sheet: &str) -> ApplicationResult<Inventory> {
        let sheet = self.resolve_sheet(path, sheet)?;
        let rows = self
            .source
            .read_sheet(path, &sheet)
            .spreadsheet_context(path)?;
        debug!("load: {} rows in sheet '{}'", rows.len(), sheet);

        let inventory = Inventory::from_rows(&rows)?;
        if inventory.dropped_rows > 0 {
            warn!(
                "Dropped {} row(s) without lat/lon from sheet '{}'",
                inventory.dropped_rows, sheet
            );
        }
        info!(
            "Loaded {} tree(s) from {}",
            inventory.len(),
            path.display()
        );
        Ok(inventory)
    }

    fn resolve_sheet(&self, path: &Path, wanted: &str) -> ApplicationResult<String> {
        let names = self.source.sheet_names(path).spreadsheet_context(path)?;
        if names.iter().any(|n| n == wanted) {
            return Ok(wanted.to_string());
        }
        match names.into_iter().next() {
            Some(first) => {
                warn!(
                    "No sheet named '{}' in {}, using first sheet '{}'",
                    wanted,
                    path.display(),
                    first
                );
                Ok(first)
            }
            None => Err(ApplicationError::Spreadsheet {
                path: path.to_path_buf(),
                message: "workbook has no worksheets".into(),
            }),
        }
    }
}
