//! Test support: logging setup and small input fixtures.

use std::env;
use std::path::Path;
use std::sync::Once;

use shapefile::{Point, Polygon, PolygonRing, ShapeWriter};
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = env::var("RUST_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new("arbormap=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Write `path` (`.shp` plus `.shx`) holding one polygon with the given rings.
///
/// The writer closes rings and fixes their orientation.
pub fn write_polygon_shp(path: &Path, rings: Vec<PolygonRing<Point>>) -> Result<(), shapefile::Error> {
    let polygon = Polygon::with_rings(rings);
    ShapeWriter::from_path(path)?.write_shapes(&vec![polygon])
}

/// Square ring around (`cx`, `cy`), clockwise and closed.
pub fn square_ring(cx: f64, cy: f64, half: f64) -> Vec<Point> {
    vec![
        Point::new(cx - half, cy - half),
        Point::new(cx - half, cy + half),
        Point::new(cx + half, cy + half),
        Point::new(cx + half, cy - half),
        Point::new(cx - half, cy - half),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }
}
