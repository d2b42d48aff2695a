//! Radar coverage bounds.
//!
//! Per-site image overlays are placed on a lat/lon square centered on the
//! radar. Longitude degrees are treated as the same length as latitude
//! degrees, so the box is not geodesically exact and widens in error toward
//! the poles. The image servers render with the same assumption.

/// Level III composite coverage radius in kilometers.
pub const COVERAGE_RADIUS_KM: f64 = 230.0;

/// Approximate length of one degree of latitude in kilometers.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Axis-aligned geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Computes the overlay box for a radar at (`lat`, `lon`) with the given
/// coverage radius.
pub fn calculate_bounds(lat: f64, lon: f64, radius_km: f64) -> GeoBounds {
    let delta = radius_km / KM_PER_DEGREE;
    GeoBounds {
        south: lat - delta,
        west: lon - delta,
        north: lat + delta,
        east: lon + delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_width_and_symmetry() {
        let bounds = calculate_bounds(35.3331, -97.2775, COVERAGE_RADIUS_KM);
        let expected = 2.0 * 230.0 / 111.32;

        assert!((bounds.east - bounds.west - expected).abs() < 1e-9);
        assert!((bounds.north - bounds.south - expected).abs() < 1e-9);

        assert!(((bounds.south + bounds.north) / 2.0 - 35.3331).abs() < 1e-9);
        assert!(((bounds.west + bounds.east) / 2.0 - -97.2775).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_radius() {
        let bounds = calculate_bounds(40.0, -100.0, KM_PER_DEGREE);
        assert!((bounds.south - 39.0).abs() < 1e-9);
        assert!((bounds.west - -101.0).abs() < 1e-9);
        assert!((bounds.north - 41.0).abs() < 1e-9);
        assert!((bounds.east - -99.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains() {
        let bounds = calculate_bounds(35.0, -97.0, COVERAGE_RADIUS_KM);
        assert!(bounds.contains(35.0, -97.0));
        assert!(bounds.contains(36.0, -96.0));
        assert!(!bounds.contains(40.0, -97.0));
        assert!(!bounds.contains(35.0, -80.0));
    }
}
