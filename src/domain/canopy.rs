//! Canopy circle size from crown-width measurements.

use crate::domain::entities::TreeRecord;

/// Canopy radius in meters from north-south and east-west crown widths.
///
/// - both widths: half their mean, `(ns + ew) / 4`
/// - one width: half of it
/// - neither: no canopy
///
/// A zero or negative radius means no canopy is drawn.
pub fn canopy_radius(north_south_m: Option<f64>, east_west_m: Option<f64>) -> Option<f64> {
    let radius = match (north_south_m, east_west_m) {
        (Some(ns), Some(ew)) => (ns + ew) / 4.0,
        (Some(width), None) | (None, Some(width)) => width / 2.0,
        (None, None) => return None,
    };
    (radius.is_finite() && radius > 0.0).then_some(radius)
}

impl TreeRecord {
    pub fn canopy_radius(&self) -> Option<f64> {
        canopy_radius(self.crown_north_south_m, self.crown_east_west_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_zero_widths_when_computing_radius_then_no_canopy() {
        assert_eq!(canopy_radius(Some(0.0), Some(0.0)), None);
        assert_eq!(canopy_radius(Some(0.0), None), None);
    }
}
