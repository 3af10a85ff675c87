//! Tests for site input discovery

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use arbormap::application::services::InputLocator;
use arbormap::application::ApplicationError;
use arbormap::config::Settings;
use arbormap::infrastructure::traits::RealFileSystem;

fn locator(settings: Settings) -> InputLocator {
    InputLocator::new(Arc::new(RealFileSystem), Arc::new(settings))
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Site folder with a workbook and a boundary file.
fn site(workbook: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    touch(&temp.path().join(workbook));
    touch(&temp.path().join("Boundaries").join("Boundaries.shp"));
    temp
}

#[test]
fn given_complete_site_when_locating_then_resolves_all_inputs() {
    let temp = site("Lincoln Elementary Tree Data.xlsx");
    fs::create_dir_all(temp.path().join("Photos")).unwrap();

    let inputs = locator(Settings::default()).locate(temp.path()).unwrap();

    assert_eq!(inputs.site_name, "Lincoln Elementary");
    assert_eq!(
        inputs.inventory,
        temp.path().join("Lincoln Elementary Tree Data.xlsx")
    );
    assert_eq!(
        inputs.boundary,
        temp.path().join("Boundaries").join("Boundaries.shp")
    );
    assert_eq!(inputs.photos, Some(temp.path().join("Photos")));
    assert_eq!(
        inputs.output,
        temp.path().join("Lincoln_Elementary_tree_map.html")
    );
}

#[test]
fn given_site_without_photos_when_locating_then_photos_absent() {
    let temp = site("Oak Park Tree Data.xlsx");

    let inputs = locator(Settings::default()).locate(temp.path()).unwrap();

    assert_eq!(inputs.photos, None);
}

#[test]
fn given_workbook_without_suffix_when_locating_then_site_name_is_stem() {
    let temp = site("Inventory 2024.xlsx");

    let inputs = locator(Settings::default()).locate(temp.path()).unwrap();

    assert_eq!(inputs.site_name, "Inventory 2024");
    assert_eq!(
        inputs.output.file_name().unwrap(),
        "Inventory_2024_tree_map.html"
    );
}

#[test]
fn given_no_workbook_when_locating_then_inventory_not_found() {
    let temp = TempDir::new().unwrap();
    touch(&temp.path().join("Boundaries").join("Boundaries.shp"));
    touch(&temp.path().join("notes.txt"));

    let result = locator(Settings::default()).locate(temp.path());

    assert!(matches!(
        result,
        Err(ApplicationError::InventoryNotFound { .. })
    ));
}

#[test]
fn given_only_lock_file_when_locating_then_inventory_not_found() {
    let temp = TempDir::new().unwrap();
    touch(&temp.path().join("~$Oak Park Tree Data.xlsx"));
    touch(&temp.path().join("Boundaries").join("Boundaries.shp"));

    let result = locator(Settings::default()).locate(temp.path());

    assert!(matches!(
        result,
        Err(ApplicationError::InventoryNotFound { .. })
    ));
}

#[test]
fn given_lock_file_and_workbook_when_locating_then_skips_lock_file() {
    let temp = site("Oak Park Tree Data.xlsx");
    touch(&temp.path().join("~$Oak Park Tree Data.xlsx"));

    let inputs = locator(Settings::default()).locate(temp.path()).unwrap();

    assert_eq!(inputs.inventory, temp.path().join("Oak Park Tree Data.xlsx"));
}

#[test]
fn given_two_workbooks_when_locating_then_first_by_name_wins() {
    let temp = site("B Site Tree Data.xlsx");
    touch(&temp.path().join("A Site Tree Data.xlsx"));

    let inputs = locator(Settings::default()).locate(temp.path()).unwrap();

    assert_eq!(inputs.site_name, "A Site");
}

#[test]
fn given_missing_boundary_when_locating_then_boundary_not_found() {
    let temp = TempDir::new().unwrap();
    touch(&temp.path().join("Oak Park Tree Data.xlsx"));

    let result = locator(Settings::default()).locate(temp.path());

    match result {
        Err(ApplicationError::BoundaryNotFound(path)) => {
            assert!(path.ends_with("Boundaries/Boundaries.shp"));
        }
        other => panic!("expected BoundaryNotFound, got {other:?}"),
    }
}

#[test]
fn given_output_dir_setting_when_locating_then_output_goes_there() {
    let temp = site("Oak Park Tree Data.xlsx");
    let out = TempDir::new().unwrap();
    let settings = Settings {
        output_dir: Some(out.path().to_path_buf()),
        ..Settings::default()
    };

    let inputs = locator(settings).locate(temp.path()).unwrap();

    assert_eq!(inputs.output, out.path().join("Oak_Park_tree_map.html"));
}

#[test]
fn given_invalid_suffix_pattern_when_locating_then_domain_error() {
    let temp = site("Oak Park Tree Data.xlsx");
    let settings = Settings {
        site_suffix_pattern: "(unclosed".into(),
        ..Settings::default()
    };

    let result = locator(settings).locate(temp.path());

    assert!(matches!(result, Err(ApplicationError::Domain(_))));
}
