//! Reference data for record classification.
//!
//! Both taxonomies are compiled once at startup from their configuration
//! form and shared read-only across the run. Region matching is an ordered
//! regex cascade, weapon matching an exact lookup table.

/// Region cascade tables and the 25-region reference set.
pub mod region;
/// Weapon category term lists and the exact-lookup table.
pub mod weapon;

pub use region::{Region, RegionPatterns, RegionTaxonomy};
pub use weapon::{WeaponCategory, WeaponTaxonomy, WeaponTerms};
