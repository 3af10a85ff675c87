//! Genus marker styles.
//!
//! Each distinct genus, taken in sorted order, gets the next entry of two
//! independently cycling palettes: 7 marker shapes and 12 colors. The i-th
//! genus therefore gets `SHAPES[i % 7]` and `COLORS[i % 12]`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Regular polygon marker outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeSpec {
    pub sides: u8,
    pub rotation_degrees: u16,
}

impl ShapeSpec {
    pub const fn new(sides: u8, rotation_degrees: u16) -> Self {
        Self {
            sides,
            rotation_degrees,
        }
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.sides {
            3 => "triangle",
            4 if self.rotation_degrees % 90 == 45 => "diamond",
            4 => "square",
            5 => "pentagon",
            6 => "hexagon",
            8 => "octagon",
            _ => "polygon",
        };
        if self.rotation_degrees == 0 || (self.sides == 4 && self.rotation_degrees == 45) {
            write!(f, "{name}")
        } else {
            write!(f, "{name} (rotated {}°)", self.rotation_degrees)
        }
    }
}

/// Marker color palette. Names are CSS color keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
    DarkRed,
    DarkBlue,
    DarkGreen,
    CadetBlue,
    Pink,
    Black,
    Gray,
}

impl MarkerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Purple => "purple",
            MarkerColor::Orange => "orange",
            MarkerColor::DarkRed => "darkred",
            MarkerColor::DarkBlue => "darkblue",
            MarkerColor::DarkGreen => "darkgreen",
            MarkerColor::CadetBlue => "cadetblue",
            MarkerColor::Pink => "pink",
            MarkerColor::Black => "black",
            MarkerColor::Gray => "gray",
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SHAPES: [ShapeSpec; 7] = [
    ShapeSpec::new(3, 0),
    ShapeSpec::new(4, 45),
    ShapeSpec::new(5, 0),
    ShapeSpec::new(6, 0),
    ShapeSpec::new(8, 0),
    ShapeSpec::new(3, 180),
    ShapeSpec::new(4, 0),
];

pub const COLORS: [MarkerColor; 12] = [
    MarkerColor::Red,
    MarkerColor::Blue,
    MarkerColor::Green,
    MarkerColor::Purple,
    MarkerColor::Orange,
    MarkerColor::DarkRed,
    MarkerColor::DarkBlue,
    MarkerColor::DarkGreen,
    MarkerColor::CadetBlue,
    MarkerColor::Pink,
    MarkerColor::Black,
    MarkerColor::Gray,
];

/// Style for records with no genus.
pub const FALLBACK_STYLE: MarkerStyle = MarkerStyle {
    shape: ShapeSpec::new(4, 0),
    color: MarkerColor::Gray,
};

/// Shape and color drawn for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerStyle {
    pub shape: ShapeSpec,
    pub color: MarkerColor,
}

/// Style assigned to one genus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenusStyle {
    pub genus: String,
    pub style: MarkerStyle,
}

/// Style of the i-th genus in sorted order.
pub fn style_at(index: usize) -> MarkerStyle {
    MarkerStyle {
        shape: SHAPES[index % SHAPES.len()],
        color: COLORS[index % COLORS.len()],
    }
}

/// Genus to style lookup for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenusStyles {
    styles: BTreeMap<String, MarkerStyle>,
}

impl GenusStyles {
    /// Assign styles to the given genera.
    ///
    /// Input order does not matter: genera are deduplicated and sorted first,
    /// so the same set always produces the same assignment.
    pub fn assign<I, S>(genera: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = genera.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();

        let styles = sorted
            .into_iter()
            .enumerate()
            .map(|(i, genus)| (genus, style_at(i)))
            .collect();
        Self { styles }
    }

    /// Style for a record's genus; absent or unknown genera get the fallback.
    pub fn style_for(&self, genus: Option<&str>) -> MarkerStyle {
        genus
            .and_then(|g| self.styles.get(g))
            .copied()
            .unwrap_or(FALLBACK_STYLE)
    }

    pub fn get(&self, genus: &str) -> Option<MarkerStyle> {
        self.styles.get(genus).copied()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Legend entries in genus order.
    pub fn legend(&self) -> Vec<GenusStyle> {
        self.styles
            .iter()
            .map(|(genus, style)| GenusStyle {
                genus: genus.clone(),
                style: *style,
            })
            .collect()
    }
}
