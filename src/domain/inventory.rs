//! Tree inventory: rows of the inventory sheet turned into records.

use std::collections::HashMap;

use itertools::Itertools;

use crate::domain::entities::{CellValue, LatLon, TreeRecord};
use crate::domain::error::DomainError;

/// Column headers consumed from the inventory sheet.
pub mod columns {
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
    pub const GENUS: &str = "Genus";
    pub const SPECIES: &str = "Species";
    pub const TREE_CODE: &str = "TreeCode";
    pub const DIAMETER: &str = "DBH1cm";
    pub const HEIGHT: &str = "Heightm";
    pub const CROWN_NS: &str = "CrownNSm";
    pub const CROWN_EW: &str = "CrownEWm";
}

/// Parsed inventory, in sheet order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    pub records: Vec<TreeRecord>,
    /// Data rows skipped because latitude or longitude was missing
    pub dropped_rows: usize,
}

/// Header name to column index, first occurrence wins.
struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    fn new(header: &[CellValue]) -> Self {
        let mut map = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            if let Some(name) = cell.as_text() {
                map.entry(name).or_insert(idx);
            }
        }
        Self(map)
    }

    fn require(&self, column: &str) -> Result<usize, DomainError> {
        self.0
            .get(column)
            .copied()
            .ok_or_else(|| DomainError::MissingColumn {
                column: column.to_string(),
            })
    }

    fn get(&self, column: &str) -> Option<usize> {
        self.0.get(column).copied()
    }
}

fn cell(row: &[CellValue], idx: Option<usize>) -> Option<&CellValue> {
    idx.and_then(|i| row.get(i))
}

impl Inventory {
    /// Build the inventory from raw sheet rows; the first row is the header.
    ///
    /// Rows without a usable `lat`/`lon` pair are dropped and counted.
    /// Every other field is optional and passed through as found.
    pub fn from_rows(rows: &[Vec<CellValue>]) -> Result<Self, DomainError> {
        let (header, data) = rows.split_first().ok_or(DomainError::EmptySheet)?;
        let index = HeaderIndex::new(header);

        let lat_idx = index.require(columns::LAT)?;
        let lon_idx = index.require(columns::LON)?;
        let genus_idx = index.get(columns::GENUS);
        let species_idx = index.get(columns::SPECIES);
        let code_idx = index.get(columns::TREE_CODE);
        let diameter_idx = index.get(columns::DIAMETER);
        let height_idx = index.get(columns::HEIGHT);
        let ns_idx = index.get(columns::CROWN_NS);
        let ew_idx = index.get(columns::CROWN_EW);

        let mut records = Vec::with_capacity(data.len());
        let mut dropped_rows = 0;

        for row in data {
            let latitude = cell(row, Some(lat_idx)).and_then(CellValue::as_f64);
            let longitude = cell(row, Some(lon_idx)).and_then(CellValue::as_f64);
            let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
                dropped_rows += 1;
                continue;
            };

            records.push(TreeRecord {
                code: cell(row, code_idx)
                    .and_then(CellValue::as_text)
                    .unwrap_or_default(),
                genus: cell(row, genus_idx).and_then(CellValue::as_text),
                species: cell(row, species_idx).and_then(CellValue::as_text),
                latitude,
                longitude,
                diameter_cm: cell(row, diameter_idx).and_then(CellValue::as_f64),
                height_m: cell(row, height_idx).and_then(CellValue::as_f64),
                crown_north_south_m: cell(row, ns_idx).and_then(CellValue::as_f64),
                crown_east_west_m: cell(row, ew_idx).and_then(CellValue::as_f64),
            });
        }

        Ok(Self {
            records,
            dropped_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arithmetic mean of all retained coordinates.
    pub fn center(&self) -> Option<LatLon> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        let (lat_sum, lon_sum) = self
            .records
            .iter()
            .fold((0.0, 0.0), |(la, lo), r| (la + r.latitude, lo + r.longitude));
        Some(LatLon {
            lat: lat_sum / n,
            lon: lon_sum / n,
        })
    }

    /// Distinct genus values in sorted order.
    pub fn genera(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.genus.clone())
            .sorted()
            .dedup()
            .collect()
    }
}
