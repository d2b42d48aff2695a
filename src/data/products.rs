//! Level III radar product definitions.
//!
//! Contains static metadata about the pre-rendered products offered by the
//! per-site image servers, including the scan tilts each product exists at.

/// A Level III product with its available elevation tilts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarProduct {
    /// Product code (e.g., "N0Q")
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Elevation angles in degrees, lowest first
    pub tilts: &'static [f32],
}

impl RadarProduct {
    /// Product code to request for the given tilt.
    ///
    /// Base products are published per tilt by swapping the elevation digit
    /// (N0Q, N1Q, N2Q, N3Q). Only the lowest four tilts have their own
    /// images; higher tilts resolve to the highest available one.
    pub fn code_for_tilt(&self, tilt_index: usize) -> String {
        if self.tilts.len() <= 1 || !self.id.starts_with("N0") {
            return self.id.to_string();
        }
        let digit = tilt_index.min(MAX_TILT_DIGIT);
        format!("N{}{}", digit, &self.id[2..])
    }

    /// Number of tilts that publish their own imagery.
    ///
    /// Only base products are split per tilt, and only the lowest four tilts
    /// are published.
    pub fn tilt_count(&self) -> usize {
        if self.id.starts_with("N0") {
            self.tilts.len().min(MAX_TILT_DIGIT + 1)
        } else {
            self.tilts.len().min(1)
        }
    }

    /// Label for a tilt entry, e.g. "0.5°".
    pub fn tilt_label(&self, tilt_index: usize) -> String {
        match self.tilts.get(tilt_index) {
            Some(tilt) => format!("{}°", tilt),
            None => "--".to_string(),
        }
    }
}

const MAX_TILT_DIGIT: usize = 3;

/// VCP 215 precipitation-mode elevations.
static VCP_215_TILTS: &[f32] = &[
    0.5, 0.9, 1.3, 1.8, 2.4, 3.1, 4.0, 5.1, 6.4, 8.0, 10.0, 12.5, 15.6, 19.5,
];

static COMPOSITE_TILTS: &[f32] = &[0.5, 1.5, 2.4, 3.4, 4.3, 6.0, 9.9, 14.6, 19.5];

static SINGLE_TILT: &[f32] = &[0.5];

/// All products offered in the product selector, in display order.
pub static RADAR_PRODUCTS: &[RadarProduct] = &[
    RadarProduct {
        id: "N0Q",
        name: "Base Reflectivity",
        tilts: VCP_215_TILTS,
    },
    RadarProduct {
        id: "NCR",
        name: "Composite Reflectivity",
        tilts: COMPOSITE_TILTS,
    },
    RadarProduct {
        id: "N0U",
        name: "Base Velocity",
        tilts: VCP_215_TILTS,
    },
    RadarProduct {
        id: "N0S",
        name: "Storm Relative Motion",
        tilts: VCP_215_TILTS,
    },
    RadarProduct {
        id: "NET",
        name: "Echo Tops",
        tilts: SINGLE_TILT,
    },
    RadarProduct {
        id: "NVL",
        name: "Vertically Integrated Liquid",
        tilts: SINGLE_TILT,
    },
    RadarProduct {
        id: "N1P",
        name: "1-Hour Precipitation",
        tilts: SINGLE_TILT,
    },
    RadarProduct {
        id: "NTP",
        name: "Storm Total Precipitation",
        tilts: SINGLE_TILT,
    },
];

/// Default product when nothing else is selected.
pub fn default_product() -> &'static RadarProduct {
    &RADAR_PRODUCTS[0]
}

/// Looks up a product by code (case-insensitive).
pub fn get_product(id: &str) -> Option<&'static RadarProduct> {
    RADAR_PRODUCTS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id.trim()))
}

/// Products available for a site, or every product for the national view.
pub fn products_for_site(site: Option<&super::RadarSite>) -> Vec<&'static RadarProduct> {
    RADAR_PRODUCTS
        .iter()
        .filter(|p| site.map(|s| s.supports(p.id)).unwrap_or(true))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::get_site;

    #[test]
    fn test_code_for_tilt() {
        let reflectivity = get_product("N0Q").unwrap();
        assert_eq!(reflectivity.code_for_tilt(0), "N0Q");
        assert_eq!(reflectivity.code_for_tilt(2), "N2Q");
        // Clamped to the highest published tilt
        assert_eq!(reflectivity.code_for_tilt(9), "N3Q");

        // Single-tilt and composite products never change code
        assert_eq!(get_product("NET").unwrap().code_for_tilt(0), "NET");
        assert_eq!(get_product("NCR").unwrap().code_for_tilt(4), "NCR");
    }

    #[test]
    fn test_tilt_count_matches_distinct_codes() {
        let reflectivity = get_product("N0Q").unwrap();
        assert_eq!(reflectivity.tilt_count(), 4);
        let codes: Vec<String> = (0..reflectivity.tilt_count())
            .map(|i| reflectivity.code_for_tilt(i))
            .collect();
        assert_eq!(codes, vec!["N0Q", "N1Q", "N2Q", "N3Q"]);

        assert_eq!(get_product("NCR").unwrap().tilt_count(), 1);
        assert_eq!(get_product("NET").unwrap().tilt_count(), 1);
    }

    #[test]
    fn test_tilt_labels() {
        let velocity = get_product("n0u").unwrap();
        assert_eq!(velocity.tilt_label(0), "0.5°");
        assert_eq!(velocity.tilt_label(13), "19.5°");
        assert_eq!(velocity.tilt_label(14), "--");
    }

    #[test]
    fn test_products_for_site() {
        assert_eq!(products_for_site(None).len(), RADAR_PRODUCTS.len());

        let san_juan = get_site("TJUA");
        let ids: Vec<&str> = products_for_site(san_juan).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["N0Q", "NCR", "N0U"]);
    }
}
