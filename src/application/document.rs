//! Map document: the layers of the interactive map and their HTML serialization.
//!
//! The document is rendered as a single HTML page. Layer data is embedded as a
//! JSON island and drawn by Leaflet; regular polygon markers come from the
//! Leaflet DVF plugin. Photos are already inlined as data URIs, so the page
//! needs nothing from the site directory once written.

use serde::Serialize;
use serde_json::{json, Value};

use crate::application::services::PhotoSlot;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{MapConfig, TileLayerConfig};
use crate::domain::{BoundaryGeometry, BoundaryPolygon, Coord, LatLon, MarkerStyle, TreeRecord};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_DVF_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet-dvf/0.3.0/leaflet-dvf.markers.min.js";

pub const NO_PHOTO_PLACEHOLDER: &str = "No photo available";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
    /// Shown when the page opens
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutlineStyle {
    pub color: String,
    pub weight: f64,
    pub fill: bool,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoundaryOverlay {
    pub name: String,
    pub style: OutlineStyle,
    pub geojson: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanopyCircle {
    /// Ground radius in meters
    pub radius: f64,
    pub color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeMarker {
    pub sides: u8,
    pub rotation: u16,
    pub color: String,
    /// Screen radius in pixels
    pub radius: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TreeFeature {
    pub lat: f64,
    pub lon: f64,
    pub canopy: Option<CanopyCircle>,
    pub marker: TreeMarker,
    pub popup: String,
}

/// Everything drawn on the map, serialized once at the end.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
    pub popup_max_width: u32,
    pub tiles: Vec<TileLayer>,
    pub boundary: Option<BoundaryOverlay>,
    pub trees: Vec<TreeFeature>,
    pub layer_control: bool,
}

impl MapDocument {
    pub fn new(title: impl Into<String>, center: LatLon, map: &MapConfig) -> Self {
        Self {
            title: title.into(),
            center: [center.lat, center.lon],
            zoom: map.zoom_start,
            popup_max_width: map.popup_max_width,
            tiles: Vec::new(),
            boundary: None,
            trees: Vec::new(),
            layer_control: false,
        }
    }

    /// Add a background layer. The first layer added is the active one.
    pub fn add_tile_layer(&mut self, tile: &TileLayerConfig) -> &mut Self {
        let active = self.tiles.is_empty();
        self.tiles.push(TileLayer {
            name: tile.name.clone(),
            url: tile.url.clone(),
            attribution: tile.attribution.clone(),
            max_zoom: tile.max_zoom,
            active,
        });
        self
    }

    /// Outline-only overlay of the site boundary.
    pub fn set_boundary(&mut self, geometry: &BoundaryGeometry, map: &MapConfig) -> &mut Self {
        self.boundary = Some(BoundaryOverlay {
            name: map.boundary_name.clone(),
            style: OutlineStyle {
                color: map.boundary_color.clone(),
                weight: map.boundary_weight,
                fill: false,
                fill_opacity: 0.0,
            },
            geojson: boundary_geojson(geometry, &map.boundary_name),
        });
        self
    }

    /// Marker, optional canopy circle and info panel for one tree.
    pub fn add_tree(
        &mut self,
        record: &TreeRecord,
        style: MarkerStyle,
        photo: &PhotoSlot,
        map: &MapConfig,
    ) -> &mut Self {
        let canopy = record.canopy_radius().map(|radius| CanopyCircle {
            radius,
            color: map.canopy_color.clone(),
            fill_opacity: map.canopy_fill_opacity,
        });
        self.trees.push(TreeFeature {
            lat: record.latitude,
            lon: record.longitude,
            canopy,
            marker: TreeMarker {
                sides: style.shape.sides,
                rotation: style.shape.rotation_degrees,
                color: style.color.as_str().to_string(),
                radius: map.marker_radius,
                fill_opacity: map.marker_fill_opacity,
            },
            popup: popup_html(record, photo, map.photo_width),
        });
        self
    }

    pub fn add_layer_control(&mut self) -> &mut Self {
        self.layer_control = true;
        self
    }

    /// Serialize to a self-contained HTML page.
    pub fn to_html(&self) -> ApplicationResult<String> {
        let data = serde_json::to_string(self).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize map document".into(),
            source: Box::new(e),
        })?;
        // `<` only occurs inside JSON strings, where < is equivalent and
        // cannot close the script element.
        let data = data.replace('<', "\\u003c");

        Ok(format!(
            include_str!("document.html"),
            title = htmlize::escape_text(self.title.as_str()),
            version = env!("CARGO_PKG_VERSION"),
            generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            leaflet_css = LEAFLET_CSS,
            leaflet_js = LEAFLET_JS,
            leaflet_dvf_js = LEAFLET_DVF_JS,
            data = data,
        ))
    }
}

fn ring_coordinates(ring: &[Coord]) -> Vec<[f64; 2]> {
    ring.iter().map(|c| [c.x, c.y]).collect()
}

fn polygon_coordinates(polygon: &BoundaryPolygon) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(&polygon.exterior)
        .chain(polygon.holes.iter())
        .map(|ring| ring_coordinates(ring))
        .collect()
}

/// GeoJSON FeatureCollection of the boundary (Polygon or MultiPolygon).
pub fn boundary_geojson(geometry: &BoundaryGeometry, name: &str) -> Value {
    let features = match geometry.polygons.as_slice() {
        [] => Vec::new(),
        [single] => vec![json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": {
                "type": "Polygon",
                "coordinates": polygon_coordinates(single),
            },
        })],
        many => vec![json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": many.iter().map(polygon_coordinates).collect::<Vec<_>>(),
            },
        })],
    };
    json!({ "type": "FeatureCollection", "features": features })
}

fn text(value: Option<&str>) -> String {
    value
        .map(|v| htmlize::escape_text(v).into_owned())
        .unwrap_or_default()
}

/// Measurement as shown in the panel: whole numbers keep one decimal (`12.0`).
fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.1}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Info panel HTML for one tree. All field values are escaped.
pub fn popup_html(record: &TreeRecord, photo: &PhotoSlot, photo_width: u32) -> String {
    let photo_html = match photo {
        PhotoSlot::Omitted => String::new(),
        PhotoSlot::Missing => format!("<br><i>{NO_PHOTO_PLACEHOLDER}</i>"),
        PhotoSlot::Embedded(p) => format!(
            "<br><img src=\"{}\" width=\"{}\" style=\"border-radius:8px;margin-top:6px;\">",
            p.data_uri, photo_width
        ),
    };

    format!(
        concat!(
            "<div style=\"font-size:13px;\">",
            "<b>Tree code:</b> {code}<br>",
            "<b>Genus:</b> {genus}<br>",
            "<b>Species:</b> {species}<br>",
            "<b>DBH (cm):</b> {dbh}<br>",
            "<b>Height (m):</b> {height}",
            "{photo}",
            "</div>"
        ),
        code = text(Some(record.code.as_str())),
        genus = text(record.genus.as_deref()),
        species = text(record.species.as_deref()),
        dbh = number(record.diameter_cm),
        height = number(record.height_m),
        photo = photo_html,
    )
}
