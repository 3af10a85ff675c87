//! Input locator service
//!
//! Resolves the fixed site folder layout into explicit input paths:
//!
//! ```text
//! <site_dir>/
//! ├── <Site Name> Tree Data.xlsx
//! ├── Boundaries/
//! │     └── Boundaries.shp
//! └── Photos/   (optional)
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{SiteInputs, SiteNamer};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Service for finding a site's input files.
pub struct InputLocator {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl InputLocator {
    /// Create a new input locator.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Locate inventory, boundary and photos under `site_dir`.
    ///
    /// # Errors
    /// - `InventoryNotFound` if no workbook exists in `site_dir`
    /// - `BoundaryNotFound` if the boundary shapefile is missing
    #[instrument(skip(self))]
    pub fn locate(&self, site_dir: &Path) -> ApplicationResult<SiteInputs> {
        let inventory = self.find_inventory(site_dir)?;

        let boundary = site_dir.join(&self.settings.boundary_path);
        if !self.fs.is_file(&boundary) {
            return Err(ApplicationError::BoundaryNotFound(boundary));
        }

        let photos_dir = site_dir.join(&self.settings.photos_dir);
        let photos = self.fs.is_dir(&photos_dir).then_some(photos_dir);

        let namer = SiteNamer::new(
            &self.settings.site_suffix_pattern,
            &self.settings.output_suffix,
        )?;
        let site_name = namer.site_name(&inventory.stem_lossy());
        let output_dir = self
            .settings
            .output_dir
            .clone()
            .unwrap_or_else(|| site_dir.to_path_buf());
        let output = output_dir.join(namer.output_file_name(&site_name));

        debug!(
            "locate: site={:?} inventory={} boundary={} photos={:?}",
            site_name,
            inventory.display(),
            boundary.display(),
            photos
        );

        Ok(SiteInputs {
            site_name,
            inventory,
            boundary,
            photos,
            output,
        })
    }

    /// First workbook in file-name order, skipping Excel lock files (`~$...`).
    fn find_inventory(&self, site_dir: &Path) -> ApplicationResult<PathBuf> {
        let extension = &self.settings.inventory_extension;
        let not_found = || ApplicationError::InventoryNotFound {
            dir: site_dir.to_path_buf(),
            extension: extension.clone(),
        };

        if !self.fs.is_dir(site_dir) {
            return Err(not_found());
        }

        let files = self
            .fs
            .list_files(site_dir)
            .with_path_context("list site directory", site_dir)?;

        files
            .into_iter()
            .find(|p| p.has_extension_ci(std::slice::from_ref(extension)) && !p.is_office_lock_file())
            .ok_or_else(not_found)
    }
}
