use chrono::NaiveDateTime;

use crate::constants::extract::REQUIRED_COLUMNS;
use crate::frame::ColumnStats;
use crate::taxonomy::{Region, WeaponCategory};

pub use crate::types::{ReasonText, UnitName, WeaponName};

/// Search reason mapped to its reporting label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Report {
    /// The weapon was stolen ("ВИКРАДЕННЯ").
    Theft,
    /// The weapon was lost ("ВТРАТА").
    Loss,
}

impl Report {
    /// Label written to the output artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Report::Theft => "Theft",
            Report::Loss => "Loss",
        }
    }

    /// Map a raw `reasonsearch` value, or `None` for reasons outside the
    /// known pair.
    pub fn from_reason(reason: &ReasonText) -> Option<Report> {
        match reason.as_str() {
            "ВИКРАДЕННЯ" => Some(Report::Theft),
            "ВТРАТА" => Some(Report::Loss),
            _ => None,
        }
    }

    /// Resolve an output label back to its variant.
    pub fn from_label(label: &str) -> Option<Report> {
        match label {
            "Theft" => Some(Report::Theft),
            "Loss" => Some(Report::Loss),
            _ => None,
        }
    }
}

/// A record as projected from the source feed, before any typing. Every
/// field is nullable and dates are still text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub weaponkind: Option<WeaponName>,
    pub organunit: Option<UnitName>,
    pub reasonsearch: Option<ReasonText>,
    /// Registration timestamp, still in source text form.
    pub insertdate: Option<String>,
    /// Event timestamp, still in source text form.
    pub theftdate: Option<String>,
}

/// A record after datatype casting. Dates that failed to parse are null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedRecord {
    pub weaponkind: Option<WeaponName>,
    pub organunit: Option<UnitName>,
    pub reasonsearch: Option<ReasonText>,
    pub insertdate: Option<NaiveDateTime>,
    pub theftdate: Option<NaiveDateTime>,
}

/// A record that survived null filtering: text fields are guaranteed
/// present and at least one of the two dates is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VettedRecord {
    pub weaponkind: WeaponName,
    pub organunit: UnitName,
    pub reasonsearch: ReasonText,
    pub insertdate: Option<NaiveDateTime>,
    pub theftdate: Option<NaiveDateTime>,
}

/// A record whose search reason has been mapped to a [`Report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRecord {
    pub weaponkind: WeaponName,
    pub organunit: UnitName,
    pub report: Report,
    pub insertdate: Option<NaiveDateTime>,
    pub theftdate: Option<NaiveDateTime>,
}

/// A record whose registering unit has been resolved to a [`Region`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionRecord {
    pub weaponkind: WeaponName,
    pub report: Report,
    pub region: Region,
    pub insertdate: Option<NaiveDateTime>,
    pub theftdate: Option<NaiveDateTime>,
}

/// A record whose weapon description has been resolved to a
/// [`WeaponCategory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorizedRecord {
    pub report: Report,
    pub region: Region,
    pub weaponcategory: WeaponCategory,
    pub insertdate: Option<NaiveDateTime>,
    pub theftdate: Option<NaiveDateTime>,
}

/// A fully resolved record, ready for sorting and export. The two source
/// dates have been coalesced into a single event date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanRecord {
    pub report: Report,
    pub region: Region,
    pub weaponcategory: WeaponCategory,
    pub date: NaiveDateTime,
}

impl ColumnStats for RawRecord {
    fn columns() -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.weaponkind.is_none(),
            self.organunit.is_none(),
            self.reasonsearch.is_none(),
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for TypedRecord {
    fn columns() -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            self.weaponkind.is_none(),
            self.organunit.is_none(),
            self.reasonsearch.is_none(),
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for VettedRecord {
    fn columns() -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            false,
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for ReportRecord {
    fn columns() -> &'static [&'static str] {
        &["weaponkind", "organunit", "report", "insertdate", "theftdate"]
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            false,
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for RegionRecord {
    fn columns() -> &'static [&'static str] {
        &["weaponkind", "report", "region", "insertdate", "theftdate"]
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            false,
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for CategorizedRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "report",
            "region",
            "weaponcategory",
            "insertdate",
            "theftdate",
        ]
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            false,
            self.insertdate.is_none(),
            self.theftdate.is_none(),
        ]
    }
}

impl ColumnStats for CleanRecord {
    fn columns() -> &'static [&'static str] {
        &crate::constants::export::OUTPUT_COLUMNS
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![false; Self::columns().len()]
    }
}
