//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/arbormap/arbormap.toml`
//! 3. Site config: `<site_dir>/.arbormap.toml`
//! 4. Environment variables: `ARBORMAP_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// EPSG:3310, NAD83 / California Albers.
pub const CALIFORNIA_ALBERS: &str = "+proj=aea +lat_0=0 +lon_0=-120 +lat_1=34 +lat_2=40.5 \
+x_0=0 +y_0=-4000000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Background tile layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileLayerConfig {
    /// Name shown in the layer control
    pub name: String,
    /// URL template with `{z}`, `{x}`, `{y}` placeholders
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayerConfig {
    fn new(name: &str, url: &str, attribution: &str, max_zoom: u8) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            attribution: attribution.into(),
            max_zoom,
        }
    }
}

/// Map appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub zoom_start: u8,
    /// Marker radius in pixels
    pub marker_radius: f64,
    pub marker_fill_opacity: f64,
    pub canopy_color: String,
    pub canopy_fill_opacity: f64,
    /// Embedded photo width in pixels
    pub photo_width: u32,
    pub popup_max_width: u32,
    /// Layer control label of the boundary overlay
    pub boundary_name: String,
    pub boundary_color: String,
    pub boundary_weight: f64,
    /// Background layers; the first one is shown initially
    pub tiles: Vec<TileLayerConfig>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_start: 18,
            marker_radius: 7.0,
            marker_fill_opacity: 0.9,
            canopy_color: "#3388ff".into(),
            canopy_fill_opacity: 0.3,
            photo_width: 200,
            popup_max_width: 300,
            boundary_name: "School boundary".into(),
            boundary_color: "black".into(),
            boundary_weight: 1.0,
            tiles: default_tiles(),
        }
    }
}

fn default_tiles() -> Vec<TileLayerConfig> {
    vec![
        TileLayerConfig::new(
            "OpenStreetMap",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
            19,
        ),
        TileLayerConfig::new(
            "CartoDB Positron",
            "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            "&copy; OpenStreetMap contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
            20,
        ),
        TileLayerConfig::new(
            "Satellite",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            "ESRI World Imagery",
            19,
        ),
    ]
}

/// Raw map config for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMapConfig {
    pub zoom_start: Option<u8>,
    pub marker_radius: Option<f64>,
    pub marker_fill_opacity: Option<f64>,
    pub canopy_color: Option<String>,
    pub canopy_fill_opacity: Option<f64>,
    pub photo_width: Option<u32>,
    pub popup_max_width: Option<u32>,
    pub boundary_name: Option<String>,
    pub boundary_color: Option<String>,
    pub boundary_weight: Option<f64>,
    pub tiles: Option<Vec<TileLayerConfig>>,
}

impl MapConfig {
    /// Overlay wins where specified. Tile lists are replaced, never merged.
    pub fn merge(&self, overlay: &RawMapConfig) -> Self {
        Self {
            zoom_start: overlay.zoom_start.unwrap_or(self.zoom_start),
            marker_radius: overlay.marker_radius.unwrap_or(self.marker_radius),
            marker_fill_opacity: overlay
                .marker_fill_opacity
                .unwrap_or(self.marker_fill_opacity),
            canopy_color: overlay
                .canopy_color
                .clone()
                .unwrap_or_else(|| self.canopy_color.clone()),
            canopy_fill_opacity: overlay
                .canopy_fill_opacity
                .unwrap_or(self.canopy_fill_opacity),
            photo_width: overlay.photo_width.unwrap_or(self.photo_width),
            popup_max_width: overlay.popup_max_width.unwrap_or(self.popup_max_width),
            boundary_name: overlay
                .boundary_name
                .clone()
                .unwrap_or_else(|| self.boundary_name.clone()),
            boundary_color: overlay
                .boundary_color
                .clone()
                .unwrap_or_else(|| self.boundary_color.clone()),
            boundary_weight: overlay.boundary_weight.unwrap_or(self.boundary_weight),
            tiles: overlay.tiles.clone().unwrap_or_else(|| self.tiles.clone()),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub inventory_extension: Option<String>,
    pub inventory_sheet: Option<String>,
    pub boundary_path: Option<PathBuf>,
    pub photos_dir: Option<PathBuf>,
    pub site_suffix_pattern: Option<String>,
    pub output_suffix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub fallback_projection: Option<String>,
    pub photo_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub map: RawMapConfig,
}

/// Unified configuration for arbormap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Extension of the inventory workbook searched in the site directory
    pub inventory_extension: String,
    /// Worksheet holding the inventory (first sheet if missing)
    pub inventory_sheet: String,
    /// Boundary shapefile, relative to the site directory
    pub boundary_path: PathBuf,
    /// Optional photo directory, relative to the site directory
    pub photos_dir: PathBuf,
    /// Regex removed from the workbook name to get the site name
    pub site_suffix_pattern: String,
    /// Appended to the site name to form the output file name
    pub output_suffix: String,
    /// Output directory (default: the site directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Proj string assumed for boundaries without a `.prj` sidecar
    pub fallback_projection: String,
    /// Photo file extensions, lowercase without dot
    pub photo_extensions: Vec<String>,
    pub map: MapConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inventory_extension: "xlsx".into(),
            inventory_sheet: "Trees".into(),
            boundary_path: PathBuf::from("Boundaries").join("Boundaries.shp"),
            photos_dir: PathBuf::from("Photos"),
            site_suffix_pattern: "(?i)tree data".into(),
            output_suffix: "_tree_map.html".into(),
            output_dir: None,
            fallback_projection: CALIFORNIA_ALBERS.into(),
            photo_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            map: MapConfig::default(),
        }
    }
}

/// Get the XDG config directory for arbormap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "arbormap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("arbormap.toml"))
}

/// Get the path to the site-local config file.
pub fn site_config_path(site_dir: &Path) -> PathBuf {
    site_dir.join(".arbormap.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["jpg", "png"], &["webp"])        // → ["jpg", "png", "webp"]
/// merge_array(&["jpg", "png"], &["!png", "gif"]) // → ["gif", "jpg"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for item in overlay {
        if let Some(negated) = item.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(item.clone());
        }
    }

    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.output_dir {
            self.output_dir = Some(PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        }
        self.boundary_path = PathBuf::from(expand_env_vars(&self.boundary_path.to_string_lossy()));
        self.photos_dir = PathBuf::from(expand_env_vars(&self.photos_dir.to_string_lossy()));
    }

    /// Lowercase, dot-free photo extensions.
    fn normalize_extensions(&mut self) {
        for ext in &mut self.photo_extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
        self.photo_extensions.sort();
        self.photo_extensions.dedup();
    }

    /// Scalars from the overlay win; `photo_extensions` uses `combine` for the list.
    fn overlay_with(
        &self,
        overlay: &RawSettings,
        combine: impl Fn(&[String], &[String]) -> Vec<String>,
    ) -> Self {
        Self {
            inventory_extension: overlay
                .inventory_extension
                .clone()
                .unwrap_or_else(|| self.inventory_extension.clone()),
            inventory_sheet: overlay
                .inventory_sheet
                .clone()
                .unwrap_or_else(|| self.inventory_sheet.clone()),
            boundary_path: overlay
                .boundary_path
                .clone()
                .unwrap_or_else(|| self.boundary_path.clone()),
            photos_dir: overlay
                .photos_dir
                .clone()
                .unwrap_or_else(|| self.photos_dir.clone()),
            site_suffix_pattern: overlay
                .site_suffix_pattern
                .clone()
                .unwrap_or_else(|| self.site_suffix_pattern.clone()),
            output_suffix: overlay
                .output_suffix
                .clone()
                .unwrap_or_else(|| self.output_suffix.clone()),
            output_dir: overlay.output_dir.clone().or_else(|| self.output_dir.clone()),
            fallback_projection: overlay
                .fallback_projection
                .clone()
                .unwrap_or_else(|| self.fallback_projection.clone()),
            photo_extensions: overlay
                .photo_extensions
                .as_ref()
                .map(|o| combine(&self.photo_extensions, o))
                .unwrap_or_else(|| self.photo_extensions.clone()),
            map: self.map.merge(&overlay.map),
        }
    }

    /// Apply global config onto defaults: lists REPLACE the defaults.
    fn apply_global(&self, global: &RawSettings) -> Self {
        self.overlay_with(global, |_, o| o.to_vec())
    }

    /// Merge site config onto the current settings: lists UNION, `!item` removes.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        self.overlay_with(overlay, merge_array)
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `site_dir` - Optional site directory for a local `.arbormap.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (lists REPLACE defaults)
    /// 3. Site config (lists UNION with global)
    /// 4. Environment variables: `ARBORMAP_*` prefix (REPLACES)
    pub fn load(site_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(site) = site_dir {
            let local_path = site_config_path(site);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.normalize_extensions();

        Ok(current)
    }

    /// Apply ARBORMAP_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ARBORMAP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("photo_extensions"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("inventory_extension") {
            settings.inventory_extension = val;
        }
        if let Ok(val) = config.get_string("inventory_sheet") {
            settings.inventory_sheet = val;
        }
        if let Ok(val) = config.get_string("boundary_path") {
            settings.boundary_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("photos_dir") {
            settings.photos_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("site_suffix_pattern") {
            settings.site_suffix_pattern = val;
        }
        if let Ok(val) = config.get_string("output_suffix") {
            settings.output_suffix = val;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("fallback_projection") {
            settings.fallback_projection = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("photo_extensions") {
            settings.photo_extensions = val;
        }
        if let Ok(val) = config.get::<u8>("map.zoom_start") {
            settings.map.zoom_start = val;
        }
        if let Ok(val) = config.get_float("map.marker_radius") {
            settings.map.marker_radius = val;
        }
        if let Ok(val) = config.get_float("map.canopy_fill_opacity") {
            settings.map.canopy_fill_opacity = val;
        }
        if let Ok(val) = config.get::<u32>("map.photo_width") {
            settings.map.photo_width = val;
        }
        if let Ok(val) = config.get_string("map.boundary_name") {
            settings.map.boundary_name = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# arbormap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/arbormap/arbormap.toml  (defines your baseline)
#   Site:   <site_dir>/.arbormap.toml         (site-specific additions)
#   Env:    ARBORMAP_* environment variables  (explicit overrides, e.g. ARBORMAP_MAP__ZOOM_START=17)
#
# List Merge Semantics (photo_extensions):
#   Global config REPLACES compiled defaults.
#   Site config UNIONS with global. Use "!item" to REMOVE an inherited item:
#     photo_extensions = ["webp", "!png"]

# Inventory workbook extension and worksheet
# inventory_extension = "xlsx"
# inventory_sheet = "Trees"

# Boundary shapefile and photo directory, relative to the site directory
# boundary_path = "Boundaries/Boundaries.shp"
# photos_dir = "Photos"

# Removed from the workbook name to form the site name
# site_suffix_pattern = "(?i)tree data"
# output_suffix = "_tree_map.html"
# output_dir = "~/maps"

# Coordinate system assumed when the shapefile has no .prj (EPSG:3310)
# fallback_projection = "+proj=aea +lat_0=0 +lon_0=-120 +lat_1=34 +lat_2=40.5 +x_0=0 +y_0=-4000000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"

# photo_extensions = ["jpg", "jpeg", "png"]

[map]
# zoom_start = 18
# marker_radius = 7.0
# marker_fill_opacity = 0.9
# canopy_color = "#3388ff"
# canopy_fill_opacity = 0.3
# photo_width = 200
# popup_max_width = 300
# boundary_name = "School boundary"
# boundary_color = "black"
# boundary_weight = 1.0

# Background layers replace the defaults when given; the first is shown initially
# [[map.tiles]]
# name = "OpenStreetMap"
# url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
# attribution = "&copy; OpenStreetMap contributors"
# max_zoom = 19
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
