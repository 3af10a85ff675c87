//! Tests for the map document and its HTML rendering

use arbormap::application::document::{boundary_geojson, popup_html, NO_PHOTO_PLACEHOLDER};
use arbormap::application::services::{EmbeddedPhoto, PhotoSlot};
use arbormap::application::MapDocument;
use arbormap::config::MapConfig;
use arbormap::domain::{
    BoundaryGeometry, BoundaryPolygon, Coord, GenusStyles, LatLon, TreeRecord, FALLBACK_STYLE,
};

fn record(code: &str, genus: Option<&str>) -> TreeRecord {
    TreeRecord {
        code: code.into(),
        genus: genus.map(Into::into),
        species: Some("rubrum".into()),
        latitude: 38.5,
        longitude: -121.5,
        diameter_cm: Some(31.5),
        height_m: Some(12.0),
        crown_north_south_m: Some(4.0),
        crown_east_west_m: Some(6.0),
    }
}

fn square(cx: f64, cy: f64) -> BoundaryPolygon {
    BoundaryPolygon {
        exterior: vec![
            Coord { x: cx, y: cy },
            Coord { x: cx, y: cy + 1.0 },
            Coord { x: cx + 1.0, y: cy + 1.0 },
            Coord { x: cx, y: cy },
        ],
        holes: Vec::new(),
    }
}

fn document() -> MapDocument {
    let map = MapConfig::default();
    let mut doc = MapDocument::new("Oak Park tree map", LatLon { lat: 38.5, lon: -121.5 }, &map);
    for tile in &map.tiles {
        doc.add_tile_layer(tile);
    }
    doc.set_boundary(
        &BoundaryGeometry {
            polygons: vec![square(-121.5, 38.5)],
        },
        &map,
    );
    doc
}

#[test]
fn given_default_tiles_when_adding_then_only_first_is_active() {
    let doc = document();

    let active: Vec<&str> = doc
        .tiles
        .iter()
        .filter(|t| t.active)
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(active, vec!["OpenStreetMap"]);
    assert_eq!(doc.tiles.len(), 3);
}

#[test]
fn given_tree_with_crown_when_adding_then_canopy_and_marker_are_set() {
    let map = MapConfig::default();
    let mut doc = document();
    let styles = GenusStyles::assign(["Acer"]);
    let tree = record("AB12", Some("Acer"));

    doc.add_tree(&tree, styles.style_for(tree.genus.as_deref()), &PhotoSlot::Omitted, &map);

    let feature = &doc.trees[0];
    assert_eq!(feature.canopy.as_ref().map(|c| c.radius), Some(2.5));
    assert_eq!(feature.marker.sides, 3);
    assert_eq!(feature.marker.color, "red");
    assert_eq!(feature.marker.radius, 7.0);
}

#[test]
fn given_tree_without_crown_when_adding_then_no_canopy() {
    let map = MapConfig::default();
    let mut doc = document();
    let mut tree = record("AB12", None);
    tree.crown_north_south_m = None;
    tree.crown_east_west_m = None;

    doc.add_tree(&tree, FALLBACK_STYLE, &PhotoSlot::Omitted, &map);

    assert!(doc.trees[0].canopy.is_none());
    assert_eq!(doc.trees[0].marker.color, "gray");
}

#[test]
fn given_missing_photo_when_rendering_popup_then_shows_placeholder() {
    let html = popup_html(&record("AB12", Some("Acer")), &PhotoSlot::Missing, 200);

    assert!(html.contains(NO_PHOTO_PLACEHOLDER));
    assert!(html.contains("<b>Tree code:</b> AB12"));
    assert!(html.contains("<b>DBH (cm):</b> 31.5"));
    assert!(html.contains("<b>Height (m):</b> 12.0"));
}

#[test]
fn given_whole_number_measurements_when_rendering_popup_then_keeps_one_decimal() {
    let mut tree = record("AB12", Some("Acer"));
    tree.diameter_cm = Some(40.0);
    tree.height_m = None;

    let html = popup_html(&tree, &PhotoSlot::Omitted, 200);

    assert!(html.contains("<b>DBH (cm):</b> 40.0<br>"));
    assert!(html.contains("<b>Height (m):</b> </div>"));
}

#[test]
fn given_omitted_photo_when_rendering_popup_then_no_photo_section() {
    let html = popup_html(&record("AB12", Some("Acer")), &PhotoSlot::Omitted, 200);

    assert!(!html.contains(NO_PHOTO_PLACEHOLDER));
    assert!(!html.contains("<img"));
}

#[test]
fn given_embedded_photo_when_rendering_popup_then_image_has_configured_width() {
    let slot = PhotoSlot::Embedded(EmbeddedPhoto {
        data_uri: "data:image/jpeg;base64,AAAA".into(),
    });

    let html = popup_html(&record("AB12", Some("Acer")), &slot, 200);

    assert!(html.contains("<img src=\"data:image/jpeg;base64,AAAA\" width=\"200\""));
}

#[test]
fn given_markup_in_fields_when_rendering_popup_then_values_are_escaped() {
    let tree = record("<script>alert(1)</script>", Some("Acer & Co"));

    let html = popup_html(&tree, &PhotoSlot::Omitted, 200);

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("Acer &amp; Co"));
}

#[test]
fn given_two_polygons_when_building_geojson_then_multipolygon() {
    let geometry = BoundaryGeometry {
        polygons: vec![square(0.0, 0.0), square(5.0, 5.0)],
    };

    let geojson = boundary_geojson(&geometry, "School boundary");

    assert_eq!(geojson["type"], "FeatureCollection");
    assert_eq!(geojson["features"][0]["geometry"]["type"], "MultiPolygon");
    assert_eq!(geojson["features"][0]["properties"]["name"], "School boundary");
}

#[test]
fn given_one_polygon_when_building_geojson_then_polygon_in_lon_lat_order() {
    let geojson = boundary_geojson(
        &BoundaryGeometry {
            polygons: vec![square(-121.5, 38.5)],
        },
        "School boundary",
    );

    let geometry = &geojson["features"][0]["geometry"];
    assert_eq!(geometry["type"], "Polygon");
    assert_eq!(geometry["coordinates"][0][0][0], -121.5);
    assert_eq!(geometry["coordinates"][0][0][1], 38.5);
}

#[test]
fn given_document_when_rendering_html_then_page_is_self_contained() {
    let map = MapConfig::default();
    let mut doc = document();
    let tree = record("</script><b>x", Some("Acer"));
    doc.add_tree(&tree, FALLBACK_STYLE, &PhotoSlot::Missing, &map);
    doc.add_layer_control();

    let html = doc.to_html().unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Oak Park tree map</title>"));
    assert!(html.contains("leaflet@1.9.4"));
    assert!(html.contains("RegularPolygonMarker"));
    assert!(html.contains("World_Imagery/MapServer/tile/{z}/{y}/{x}"));
    assert!(html.contains("\"layerControl\":true"));
    assert!(html.contains("School boundary"));
    assert!(html.contains(NO_PHOTO_PLACEHOLDER));
    // only the template's own closing script tags remain
    assert_eq!(html.matches("</script>").count(), 4);
}
