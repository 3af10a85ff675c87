//! Domain entities: core data structures

use std::fmt;
use std::path::PathBuf;

/// A single spreadsheet cell, reduced to the shapes the inventory cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Numeric view of the cell.
    ///
    /// Numeric strings are accepted; blank, boolean and non-finite values are absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Text view of the cell, `None` for empty or blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) if !n.is_finite() => None,
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

/// One tree from the inventory sheet.
///
/// Only rows with both coordinates become records.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRecord {
    pub code: String,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub diameter_cm: Option<f64>,
    pub height_m: Option<f64>,
    pub crown_north_south_m: Option<f64>,
    pub crown_east_west_m: Option<f64>,
}

/// Geographic position in decimal degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Planar or geographic coordinate pair in source order (x = easting/longitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

/// Polygon with one exterior ring and any number of holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPolygon {
    pub exterior: Vec<Coord>,
    pub holes: Vec<Vec<Coord>>,
}

/// Site boundary: one or more polygons.
///
/// After loading, coordinates are longitude/latitude degrees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryGeometry {
    pub polygons: Vec<BoundaryPolygon>,
}

impl BoundaryGeometry {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// All coordinates, exterior and hole rings alike.
    pub fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.polygons.iter().flat_map(|p| {
            p.exterior
                .iter()
                .chain(p.holes.iter().flat_map(|h| h.iter()))
        })
    }

    /// Center of the bounding box, if there is at least one coordinate.
    pub fn bbox_center(&self) -> Option<LatLon> {
        let mut iter = self.coords();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for c in iter {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        Some(LatLon {
            lat: (min_y + max_y) / 2.0,
            lon: (min_x + max_x) / 2.0,
        })
    }
}

/// Input files for one site, resolved before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInputs {
    /// Human-readable site name derived from the spreadsheet name
    pub site_name: String,
    pub inventory: PathBuf,
    pub boundary: PathBuf,
    /// Photo directory, when the site has one
    pub photos: Option<PathBuf>,
    /// Where the finished HTML document goes
    pub output: PathBuf,
}
