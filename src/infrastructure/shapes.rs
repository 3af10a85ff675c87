//! ESRI shapefile boundary reader.
//!
//! Only the `.shp` geometry is read; attributes are not needed for the outline.

use std::path::Path;

use shapefile::{PolygonRing, Shape, ShapeReader};
use tracing::{debug, warn};

use crate::domain::{BoundaryGeometry, BoundaryPolygon, Coord};
use crate::infrastructure::traits::BoundarySource;

/// Reads polygon shapefiles.
#[derive(Debug, Default)]
pub struct ShapefileBoundary;

/// Outer rings open a new polygon, inner rings attach to the last one.
fn push_rings<P>(
    rings: &[PolygonRing<P>],
    xy: impl Fn(&P) -> Coord,
    polygons: &mut Vec<BoundaryPolygon>,
) {
    for ring in rings {
        let coords: Vec<Coord> = ring.points().iter().map(&xy).collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(BoundaryPolygon {
                exterior: coords,
                holes: Vec::new(),
            }),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(polygon) => polygon.holes.push(coords),
                None => polygons.push(BoundaryPolygon {
                    exterior: coords,
                    holes: Vec::new(),
                }),
            },
        }
    }
}

impl BoundarySource for ShapefileBoundary {
    fn read_geometry(&self, path: &Path) -> Result<BoundaryGeometry, String> {
        let reader = ShapeReader::from_path(path).map_err(|e| e.to_string())?;
        let shapes = reader.read().map_err(|e| e.to_string())?;
        debug!("read_geometry: {} shapes in {}", shapes.len(), path.display());

        let mut polygons = Vec::new();
        for shape in &shapes {
            match shape {
                Shape::Polygon(p) => {
                    push_rings(p.rings(), |pt| Coord { x: pt.x, y: pt.y }, &mut polygons)
                }
                Shape::PolygonM(p) => {
                    push_rings(p.rings(), |pt| Coord { x: pt.x, y: pt.y }, &mut polygons)
                }
                Shape::PolygonZ(p) => {
                    push_rings(p.rings(), |pt| Coord { x: pt.x, y: pt.y }, &mut polygons)
                }
                Shape::NullShape => {}
                other => warn!(
                    "Skipping non-polygon shape ({:?}) in {}",
                    other.shapetype(),
                    path.display()
                ),
            }
        }

        Ok(BoundaryGeometry { polygons })
    }
}
