//! End-to-end tests: site folder in, HTML map out

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use shapefile::PolygonRing;
use tempfile::TempDir;

use arbormap::application::ApplicationError;
use arbormap::config::Settings;
use arbormap::infrastructure::di::ServiceContainer;
use arbormap::util::testing::{init_test_setup, square_ring, write_polygon_shp};

enum Cell {
    Text(&'static str),
    Number(f64),
    Blank,
}

const HEADER: [&str; 9] = [
    "TreeCode", "Genus", "Species", "lat", "lon", "DBH1cm", "Heightm", "CrownNSm", "CrownEWm",
];

fn write_workbook(path: &Path, sheet: &str, rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    for (col, name) in HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

fn tree(code: &'static str, genus: &'static str, lat: f64, lon: f64) -> Vec<Cell> {
    vec![
        Cell::Text(code),
        Cell::Text(genus),
        Cell::Text("sp."),
        Cell::Number(lat),
        Cell::Number(lon),
        Cell::Number(25.0),
        Cell::Number(9.5),
        Cell::Number(4.0),
        Cell::Number(6.0),
    ]
}

/// Site folder with a two-tree inventory, one unlocated row and an Albers boundary.
fn site() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_workbook(
        &temp.path().join("Oak Park Tree Data.xlsx"),
        "Trees",
        &[
            tree("AB12", "Quercus", 36.10, -120.00),
            tree("AB13", "Acer", 36.11, -120.01),
            vec![Cell::Text("AB14"), Cell::Text("Pinus"), Cell::Blank, Cell::Blank],
        ],
    );
    let boundaries = temp.path().join("Boundaries");
    fs::create_dir_all(&boundaries).unwrap();
    write_polygon_shp(
        &boundaries.join("Boundaries.shp"),
        vec![PolygonRing::Outer(square_ring(0.0, 0.0, 150.0))],
    )
    .unwrap();
    temp
}

#[test]
fn given_complete_site_when_rendering_then_writes_named_html() {
    init_test_setup();
    let temp = site();
    let photos = temp.path().join("Photos");
    fs::create_dir_all(&photos).unwrap();
    fs::write(photos.join("ab12_front.jpg"), b"\xFF\xD8\xFF").unwrap();
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let report = container.map_service().render_site(&inputs).unwrap();

    let output = temp.path().join("Oak_Park_tree_map.html");
    assert_eq!(report.output, output);
    assert_eq!(report.site_name, "Oak Park");
    assert_eq!(report.trees, 2);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.genera, 2);
    assert_eq!(report.canopies, 2);
    assert_eq!(report.photos_embedded, 1);
    assert_eq!(report.photos_missing, 1);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("Oak Park tree map"));
    assert!(html.contains("data:image/jpeg;base64,/9j/"));
    assert!(html.contains("No photo available"));
    assert!(html.contains("MultiPolygon") || html.contains("\"Polygon\""));
    assert!(!html.contains("AB14"));
}

#[test]
fn given_site_without_photos_when_rendering_then_no_photo_sections() {
    let temp = site();
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let report = container.map_service().render_site(&inputs).unwrap();

    assert_eq!(report.photos_embedded, 0);
    assert_eq!(report.photos_missing, 0);
    let html = fs::read_to_string(&report.output).unwrap();
    assert!(!html.contains("No photo available"));
}

#[test]
fn given_trees_when_building_document_then_centers_on_tree_mean() {
    let temp = site();
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let (document, _) = container.map_service().build_document(&inputs).unwrap();

    assert!((document.center[0] - 36.105).abs() < 1e-9);
    assert!((document.center[1] + 120.005).abs() < 1e-9);
    assert_eq!(document.zoom, 18);
    assert!(document.layer_control);
}

#[test]
fn given_sheet_with_other_name_when_rendering_then_uses_first_sheet() {
    let temp = site();
    write_workbook(
        &temp.path().join("Oak Park Tree Data.xlsx"),
        "Inventory",
        &[tree("AB12", "Quercus", 36.10, -120.00)],
    );
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let report = container.map_service().render_site(&inputs).unwrap();

    assert_eq!(report.trees, 1);
}

#[test]
fn given_no_located_trees_when_rendering_then_centers_on_boundary() {
    let temp = site();
    write_workbook(
        &temp.path().join("Oak Park Tree Data.xlsx"),
        "Trees",
        &[vec![Cell::Text("AB14"), Cell::Text("Pinus")]],
    );
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let (document, report) = container.map_service().build_document(&inputs).unwrap();

    assert_eq!(report.trees, 0);
    assert!((document.center[1] + 120.0).abs() < 1e-6);
}

#[test]
fn given_boundary_removed_after_locating_when_rendering_then_no_output_file() {
    let temp = site();
    let container = ServiceContainer::new(Settings::default());
    let inputs = container.locator().locate(temp.path()).unwrap();
    fs::remove_file(&inputs.boundary).unwrap();

    let result = container.map_service().render_site(&inputs);

    assert!(matches!(result, Err(ApplicationError::BoundaryNotFound(_))));
    assert!(!inputs.output.exists());
}

#[test]
fn given_workbook_missing_lat_column_when_rendering_then_no_output_file() {
    let temp = site();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Trees").unwrap();
    worksheet.write_string(0, 0, "TreeCode").unwrap();
    worksheet.write_string(0, 1, "lon").unwrap();
    workbook
        .save(temp.path().join("Oak Park Tree Data.xlsx"))
        .unwrap();
    let container = ServiceContainer::new(Settings::default());

    let inputs = container.locator().locate(temp.path()).unwrap();
    let result = container.map_service().render_site(&inputs);

    assert!(matches!(result, Err(ApplicationError::Domain(_))));
    assert!(!inputs.output.exists());
}

#[test]
fn given_output_dir_in_new_folder_when_rendering_then_creates_it() {
    let temp = site();
    let settings = Settings {
        output_dir: Some(temp.path().join("maps").join("2024")),
        ..Settings::default()
    };
    let container = ServiceContainer::new(settings);

    let inputs = container.locator().locate(temp.path()).unwrap();
    let report = container.map_service().render_site(&inputs).unwrap();

    assert!(report.output.is_file());
    assert!(report.output.starts_with(temp.path().join("maps")));
}
