//! Boundary loading and reprojection
//!
//! The boundary is read in its source coordinate system and reprojected to
//! WGS84 longitude/latitude (EPSG:4326). The source system comes from the
//! `.prj` sidecar; without one, or when the sidecar cannot be interpreted, the
//! configured fallback projection is assumed.

use std::path::Path;
use std::sync::Arc;

use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, SourceResultExt};
use crate::domain::{BoundaryGeometry, BoundaryPolygon, Coord};
use crate::infrastructure::traits::{BoundarySource, FileSystem};

/// EPSG:4326 as a proj string.
pub const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

fn projection_err(message: impl Into<String>) -> ApplicationError {
    ApplicationError::Projection {
        message: message.into(),
    }
}

fn is_geographic(proj_string: &str) -> bool {
    proj_string.contains("+proj=longlat") || proj_string.contains("+proj=latlong")
}

/// Converts coordinates from a source system to WGS84 degrees.
pub struct Reprojector {
    source: Proj,
    target: Proj,
    source_geographic: bool,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("source_geographic", &self.source_geographic)
            .finish_non_exhaustive()
    }
}

impl Reprojector {
    /// Reprojector from the system described by `proj_string` to WGS84.
    pub fn to_wgs84(proj_string: &str) -> ApplicationResult<Self> {
        let source = Proj::from_proj_string(proj_string)
            .map_err(|e| projection_err(format!("invalid projection '{proj_string}': {e}")))?;
        let target = Proj::from_proj_string(WGS84)
            .map_err(|e| projection_err(format!("invalid projection '{WGS84}': {e}")))?;
        Ok(Self {
            source,
            target,
            source_geographic: is_geographic(proj_string),
        })
    }

    /// Project one coordinate; the result is (longitude, latitude) in degrees.
    pub fn project(&self, coord: Coord) -> ApplicationResult<Coord> {
        // Geographic systems take and return radians.
        let mut point = if self.source_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.source, &self.target, &mut point)
            .map_err(|e| projection_err(format!("({}, {}): {e}", coord.x, coord.y)))?;
        Ok(Coord {
            x: point.0.to_degrees(),
            y: point.1.to_degrees(),
        })
    }

    fn project_ring(&self, ring: &[Coord]) -> ApplicationResult<Vec<Coord>> {
        ring.iter().map(|c| self.project(*c)).collect()
    }

    pub fn project_geometry(&self, geometry: &BoundaryGeometry) -> ApplicationResult<BoundaryGeometry> {
        let polygons = geometry
            .polygons
            .iter()
            .map(|p| {
                Ok(BoundaryPolygon {
                    exterior: self.project_ring(&p.exterior)?,
                    holes: p
                        .holes
                        .iter()
                        .map(|h| self.project_ring(h))
                        .collect::<ApplicationResult<_>>()?,
                })
            })
            .collect::<ApplicationResult<_>>()?;
        Ok(BoundaryGeometry { polygons })
    }
}

/// Service for loading the site boundary in geographic coordinates.
pub struct BoundaryService {
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn BoundarySource>,
}

impl BoundaryService {
    /// Create a new boundary service.
    pub fn new(fs: Arc<dyn FileSystem>, source: Arc<dyn BoundarySource>) -> Self {
        Self { fs, source }
    }

    /// Read the boundary at `path` and reproject it to WGS84.
    #[instrument(skip(self, fallback_projection))]
    pub fn load(&self, path: &Path, fallback_projection: &str) -> ApplicationResult<BoundaryGeometry> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::BoundaryNotFound(path.to_path_buf()));
        }

        let geometry = self.source.read_geometry(path).boundary_context(path)?;
        if geometry.is_empty() {
            warn!("Boundary {} contains no polygons", path.display());
        }

        let projection = self.source_projection(path, fallback_projection)?;
        debug!("load: source projection {}", projection);

        Reprojector::to_wgs84(&projection)?.project_geometry(&geometry)
    }

    /// Proj string of the boundary's coordinate system.
    pub fn source_projection(&self, path: &Path, fallback_projection: &str) -> ApplicationResult<String> {
        let prj = path.with_extension("prj");
        if !self.fs.is_file(&prj) {
            debug!("No {} sidecar, assuming fallback projection", prj.display());
            return Ok(fallback_projection.to_string());
        }

        let wkt = self
            .fs
            .read_to_string(&prj)
            .with_path_context("read projection", &prj)?;
        if wkt.trim().is_empty() {
            return Ok(fallback_projection.to_string());
        }
        match wkt_to_proj_string(wkt.trim()) {
            Ok(projection) => Ok(projection),
            Err(e) => {
                warn!(
                    "Cannot interpret {} ({}), assuming fallback projection",
                    prj.display(),
                    e
                );
                Ok(fallback_projection.to_string())
            }
        }
    }
}

/// EPSG:3857 on the sphere ArcGIS calls "Auxiliary Sphere".
pub const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";

/// Rewrite ArcGIS method and parameter names to their OGC spelling.
///
/// ArcGIS writes Albers as `PROJECTION["Albers"]` with `Central_Meridian` and
/// `Latitude_Of_Origin`; OGC names them `Albers_Conic_Equal_Area`,
/// `longitude_of_center` and `latitude_of_center`.
pub fn normalize_esri_wkt(wkt: &str) -> String {
    if !wkt.contains(r#"PROJECTION["Albers"]"#) {
        return wkt.to_string();
    }
    wkt.replace(
        r#"PROJECTION["Albers"]"#,
        r#"PROJECTION["Albers_Conic_Equal_Area"]"#,
    )
    .replace(
        r#"PARAMETER["Central_Meridian""#,
        r#"PARAMETER["longitude_of_center""#,
    )
    .replace(
        r#"PARAMETER["Latitude_Of_Origin""#,
        r#"PARAMETER["latitude_of_center""#,
    )
}

/// Proj string for a `.prj` WKT, ArcGIS dialect included.
///
/// The result is checked to be usable as a reprojection source.
pub fn wkt_to_proj_string(wkt: &str) -> ApplicationResult<String> {
    if wkt.contains("Mercator_Auxiliary_Sphere") {
        return Ok(WEB_MERCATOR.to_string());
    }
    let projection = proj4wkt::wkt_to_projstring(&normalize_esri_wkt(wkt))
        .map_err(|e| projection_err(format!("{e:?}")))?;
    Proj::from_proj_string(&projection)
        .map_err(|e| projection_err(format!("unsupported projection '{projection}': {e}")))?;
    Ok(projection)
}
