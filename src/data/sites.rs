//! NEXRAD radar site definitions.
//!
//! Static table of WSR-88D sites shown on the map and offered in the site
//! selector. Coordinates are the antenna location in decimal degrees.

/// A single NEXRAD radar site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarSite {
    /// Four-letter ICAO identifier (e.g., "KTLX")
    pub id: &'static str,
    /// Human readable location name
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    /// Antenna elevation above sea level in meters, when known
    pub elevation: Option<f64>,
    /// Supported product codes. `None` means every product is available.
    pub products: Option<&'static [&'static str]>,
}

impl RadarSite {
    /// Whether the site publishes the given product code.
    pub fn supports(&self, product_id: &str) -> bool {
        match self.products {
            Some(products) => products.iter().any(|p| p.eq_ignore_ascii_case(product_id)),
            None => true,
        }
    }

    /// Label used in dropdowns and marker tooltips.
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }
}

const ALL_PRODUCTS: &[&str] = &["N0Q", "NCR", "N0U", "N0S", "NET", "NVL", "N1P", "NTP"];

// Sites outside CONUS publish a reduced Level III product set on Ridge2.
const OCONUS_PRODUCTS: &[&str] = &["N0Q", "NCR", "N0U"];

const fn site(id: &'static str, name: &'static str, lat: f64, lon: f64) -> RadarSite {
    RadarSite {
        id,
        name,
        lat,
        lon,
        elevation: None,
        products: None,
    }
}

/// All known NEXRAD sites.
pub static NEXRAD_SITES: &[RadarSite] = &[
    RadarSite {
        products: Some(ALL_PRODUCTS),
        ..site("KABR", "Aberdeen, SD", 45.4558, -98.4131)
    },
    RadarSite {
        products: Some(ALL_PRODUCTS),
        ..site("KENX", "Albany, NY", 42.5864, -74.0639)
    },
    RadarSite {
        elevation: Some(1789.0),
        products: Some(ALL_PRODUCTS),
        ..site("KABX", "Albuquerque, NM", 35.1497, -106.8239)
    },
    RadarSite {
        elevation: Some(1093.0),
        products: Some(ALL_PRODUCTS),
        ..site("KAMA", "Amarillo, TX", 35.2333, -101.7089)
    },
    RadarSite {
        products: Some(OCONUS_PRODUCTS),
        ..site("PAHG", "Anchorage, AK", 60.7259, -151.3515)
    },
    site("KFFC", "Atlanta, GA", 33.3636, -84.5658),
    site("KEWX", "Austin/San Antonio, TX", 29.7039, -98.0286),
    site("KBGM", "Binghamton, NY", 42.1997, -75.9847),
    site("KBMX", "Birmingham, AL", 33.1722, -86.7697),
    site("KBIS", "Bismarck, ND", 46.7708, -100.7603),
    site("KCBX", "Boise, ID", 43.4906, -116.2361),
    site("KBOX", "Boston, MA", 41.9558, -71.1369),
    site("KBRO", "Brownsville, TX", 25.9161, -97.4189),
    site("KBUF", "Buffalo, NY", 42.9489, -78.7367),
    site("KCLX", "Charleston, SC", 32.6556, -81.0422),
    site("KRLX", "Charleston, WV", 38.3111, -81.7231),
    site("KCYS", "Cheyenne, WY", 41.1519, -104.8061),
    site("KLOT", "Chicago, IL", 41.6044, -88.0847),
    site("KILN", "Cincinnati, OH", 39.4203, -83.8217),
    site("KCLE", "Cleveland, OH", 41.4131, -81.8597),
    site("KGWX", "Columbus AFB, MS", 33.8967, -88.3292),
    RadarSite {
        elevation: Some(208.0),
        ..site("KFWS", "Dallas/Fort Worth, TX", 32.5731, -97.3031)
    },
    site("KDVN", "Davenport, IA", 41.6117, -90.5808),
    RadarSite {
        elevation: Some(1675.0),
        ..site("KFTG", "Denver, CO", 39.7867, -104.5458)
    },
    RadarSite {
        elevation: Some(299.0),
        ..site("KDMX", "Des Moines, IA", 41.7311, -93.7229)
    },
    site("KDTX", "Detroit, MI", 42.6999, -83.4718),
    site("KDDC", "Dodge City, KS", 37.7608, -99.9689),
    site("KDLH", "Duluth, MN", 46.8369, -92.2097),
    site("KEPZ", "El Paso, TX", 31.8731, -106.6981),
    site("KFDR", "Frederick, OK", 34.3622, -98.9764),
    site("KGLD", "Goodland, KS", 39.3667, -101.7003),
    site("KGRR", "Grand Rapids, MI", 42.8939, -85.5449),
    site("KGSP", "Greer, SC", 34.8833, -82.2200),
    site("KUEX", "Hastings, NE", 40.3208, -98.4419),
    site("KHGX", "Houston, TX", 29.4719, -95.0792),
    site("KHTX", "Huntsville, AL", 34.9306, -86.0833),
    site("KIND", "Indianapolis, IN", 39.7075, -86.2803),
    site("KJAX", "Jacksonville, FL", 30.4847, -81.7019),
    site("KEAX", "Kansas City, MO", 38.8103, -94.2644),
    site("KMRX", "Knoxville, TN", 36.1686, -83.4017),
    site("KARX", "La Crosse, WI", 43.8228, -91.1911),
    site("KESX", "Las Vegas, NV", 35.7011, -114.8914),
    site("KLZK", "Little Rock, AR", 34.8364, -92.2622),
    site("KVTX", "Los Angeles, CA", 34.4117, -119.1794),
    site("KLVX", "Louisville, KY", 37.9753, -85.9439),
    site("KLBB", "Lubbock, TX", 33.6539, -101.8142),
    site("KAMX", "Miami, FL", 25.6111, -80.4128),
    site("KMAF", "Midland/Odessa, TX", 31.9433, -102.1892),
    site("KMKX", "Milwaukee, WI", 42.9678, -88.5506),
    site("KMPX", "Minneapolis, MN", 44.8489, -93.5656),
    RadarSite {
        products: Some(OCONUS_PRODUCTS),
        ..site("PHMO", "Molokai, HI", 21.1328, -157.1803)
    },
    site("KOHX", "Nashville, TN", 36.2472, -86.5625),
    site("KLIX", "New Orleans, LA", 30.3367, -89.8256),
    site("KOKX", "New York City, NY", 40.8656, -72.8639),
    RadarSite {
        elevation: Some(370.0),
        products: Some(ALL_PRODUCTS),
        ..site("KTLX", "Oklahoma City, OK", 35.3331, -97.2775)
    },
    site("KOAX", "Omaha, NE", 41.3203, -96.3667),
    site("KPAH", "Paducah, KY", 37.0683, -88.7719),
    site("KDIX", "Philadelphia, PA", 39.9469, -74.4108),
    site("KIWA", "Phoenix, AZ", 33.2892, -111.6700),
    site("KPBZ", "Pittsburgh, PA", 40.5317, -80.2183),
    site("KRTX", "Portland, OR", 45.7150, -122.9650),
    site("KRAX", "Raleigh/Durham, NC", 35.6653, -78.4897),
    site("KMTX", "Salt Lake City, UT", 41.2628, -112.4478),
    site("KNKX", "San Diego, CA", 32.9189, -117.0419),
    site("KMUX", "San Francisco, CA", 37.1553, -121.8983),
    RadarSite {
        products: Some(OCONUS_PRODUCTS),
        ..site("TJUA", "San Juan, PR", 18.1156, -66.0781)
    },
    site("KATX", "Seattle, WA", 48.1947, -122.4958),
    site("KSHV", "Shreveport, LA", 32.4508, -93.8414),
    site("KFSD", "Sioux Falls, SD", 43.5878, -96.7294),
    site("KSGF", "Springfield, MO", 37.2353, -93.4006),
    site("KLSX", "St. Louis, MO", 38.6989, -90.6828),
    site("KLWX", "Sterling, VA", 38.9753, -77.4778),
    site("KTBW", "Tampa Bay, FL", 27.7056, -82.4017),
    site("KINX", "Tulsa, OK", 36.1750, -95.5644),
    site("KVNX", "Vance AFB, OK", 36.7408, -98.1275),
    site("KICT", "Wichita, KS", 37.6544, -97.4428),
];

/// Looks up a site by identifier (case-insensitive).
pub fn get_site(id: &str) -> Option<&'static RadarSite> {
    let id = id.trim();
    NEXRAD_SITES.iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

/// All sites sorted by identifier, for the site selector.
pub fn all_sites_sorted() -> Vec<&'static RadarSite> {
    let mut sites: Vec<&'static RadarSite> = NEXRAD_SITES.iter().collect();
    sites.sort_by(|a, b| a.id.cmp(b.id));
    sites
}
