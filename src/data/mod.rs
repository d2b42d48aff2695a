//! Static reference data.
//!
//! ## Static Data
//! - `sites`: NEXRAD radar site definitions
//! - `products`: Level III product codes and their tilts
//!
//! Both tables are immutable and loaded at compile time.

pub mod products;
pub mod sites;

pub use products::{default_product, get_product, products_for_site, RadarProduct};
pub use sites::{all_sites_sorted, get_site, RadarSite, NEXRAD_SITES};
