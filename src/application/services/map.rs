//! Map rendering service
//!
//! Runs the whole pipeline for one site: inventory, boundary, genus styles,
//! canopy circles, info panels, then writes the HTML document.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::document::MapDocument;
use crate::application::services::{
    BoundaryService, InventoryService, PhotoService, PhotoSlot,
};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{GenusStyles, SiteInputs};
use crate::infrastructure::traits::FileSystem;

/// Outcome of rendering one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapReport {
    pub site_name: String,
    pub output: PathBuf,
    pub trees: usize,
    pub dropped_rows: usize,
    pub genera: usize,
    pub canopies: usize,
    pub photos_embedded: usize,
    pub photos_missing: usize,
}

/// Service that turns site inputs into a map document.
pub struct MapService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    inventory: InventoryService,
    boundary: BoundaryService,
}

impl MapService {
    /// Create a new map service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        settings: Arc<Settings>,
        inventory: InventoryService,
        boundary: BoundaryService,
    ) -> Self {
        Self {
            fs,
            settings,
            inventory,
            boundary,
        }
    }

    /// Build the document without writing it.
    #[instrument(skip(self, inputs), fields(site = %inputs.site_name))]
    pub fn build_document(&self, inputs: &SiteInputs) -> ApplicationResult<(MapDocument, MapReport)> {
        let map = &self.settings.map;

        let inventory = self
            .inventory
            .load(&inputs.inventory, &self.settings.inventory_sheet)?;
        let boundary = self
            .boundary
            .load(&inputs.boundary, &self.settings.fallback_projection)?;

        let center = inventory
            .center()
            .or_else(|| boundary.bbox_center())
            .ok_or(ApplicationError::NoMapCenter)?;
        debug!("build_document: center {}", center);

        let styles = GenusStyles::assign(inventory.genera());
        let photos = match &inputs.photos {
            Some(dir) => PhotoService::scan(self.fs.clone(), dir, &self.settings.photo_extensions)?,
            None => PhotoService::disabled(self.fs.clone()),
        };

        let mut document = MapDocument::new(format!("{} tree map", inputs.site_name), center, map);
        for tile in &map.tiles {
            document.add_tile_layer(tile);
        }
        document.set_boundary(&boundary, map);

        let mut report = MapReport {
            site_name: inputs.site_name.clone(),
            output: inputs.output.clone(),
            trees: inventory.len(),
            dropped_rows: inventory.dropped_rows,
            genera: styles.len(),
            canopies: 0,
            photos_embedded: 0,
            photos_missing: 0,
        };

        for record in &inventory.records {
            let slot = photos.slot_for(&record.code);
            match slot {
                PhotoSlot::Embedded(_) => report.photos_embedded += 1,
                PhotoSlot::Missing => report.photos_missing += 1,
                PhotoSlot::Omitted => {}
            }
            if record.canopy_radius().is_some() {
                report.canopies += 1;
            }
            document.add_tree(record, styles.style_for(record.genus.as_deref()), &slot, map);
        }
        document.add_layer_control();

        Ok((document, report))
    }

    /// Build the document and write it to `inputs.output`.
    ///
    /// Nothing is written if any step before serialization fails.
    #[instrument(skip(self, inputs), fields(site = %inputs.site_name))]
    pub fn render_site(&self, inputs: &SiteInputs) -> ApplicationResult<MapReport> {
        let (document, report) = self.build_document(inputs)?;
        let html = document.to_html()?;

        self.fs
            .write_atomic(&inputs.output, html.as_bytes())
            .map_err(|source| ApplicationError::WriteOutput {
                path: inputs.output.clone(),
                source,
            })?;

        info!(
            "Wrote {} ({} trees, {} bytes)",
            inputs.output.display(),
            report.trees,
            html.len()
        );
        Ok(report)
    }
}
