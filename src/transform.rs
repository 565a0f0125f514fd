//! Transformation phase: report mapping, region resolution, weapon
//! categorization, and event date resolution.
//!
//! The three classification stages each return the narrowed plan along
//! with an audit of what the plan will drop. Audits are computed eagerly
//! by running the incoming plan once, so drop counts are available for
//! logging and the run summary before the output plan ever executes.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::constants::{crimea_cutoff, independence_day};
use crate::data::{
    CategorizedRecord, CleanRecord, RegionRecord, Report, ReportRecord, VettedRecord,
};
use crate::frame::Frame;
use crate::taxonomy::{Region, RegionTaxonomy, WeaponTaxonomy};
use crate::types::WeaponName;

/// Drop audit for the report mapping stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportAudit {
    /// Records whose search reason is outside the known pair.
    pub dropped: usize,
}

/// Drop audit for the region resolution stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionAudit {
    /// Records whose registering unit matched no region pattern.
    pub dropped: usize,
}

/// Drop audit for the weapon categorization stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponAudit {
    /// Distinct weapon descriptions missing from the term lists.
    pub unmatched_terms: BTreeSet<WeaponName>,
    /// Records carrying one of those descriptions.
    pub dropped: usize,
}

/// Map raw search reasons to report labels. Records with reasons outside
/// the known pair are counted, warned about, and dropped.
pub fn classify_reports(frame: Frame<VettedRecord>) -> (Frame<ReportRecord>, ReportAudit) {
    let dropped = frame
        .clone()
        .filter(|row| Report::from_reason(&row.reasonsearch).is_none())
        .count();
    if dropped > 0 {
        warn!("{dropped} records have search reasons outside the known report pair. Dropping them.");
    }

    let mapped = frame.filter_map(|row| {
        let report = Report::from_reason(&row.reasonsearch)?;
        Some(ReportRecord {
            weaponkind: row.weaponkind,
            organunit: row.organunit,
            report,
            insertdate: row.insertdate,
            theftdate: row.theftdate,
        })
    });
    (mapped, ReportAudit { dropped })
}

/// Resolve registering unit names to regions through the two-pass regex
/// cascade. Records matching no pattern are counted, warned about, and
/// dropped.
pub fn classify_regions(
    frame: Frame<ReportRecord>,
    taxonomy: &Arc<RegionTaxonomy>,
) -> (Frame<RegionRecord>, RegionAudit) {
    let audit_taxonomy = Arc::clone(taxonomy);
    let dropped = frame
        .clone()
        .filter(move |row| audit_taxonomy.classify(&row.organunit).is_none())
        .count();
    if dropped > 0 {
        warn!("{dropped} records have registering units matching no region pattern. Dropping them.");
    }

    let map_taxonomy = Arc::clone(taxonomy);
    let mapped = frame.filter_map(move |row| {
        let region = map_taxonomy.classify(&row.organunit)?;
        Some(RegionRecord {
            weaponkind: row.weaponkind,
            report: row.report,
            region,
            insertdate: row.insertdate,
            theftdate: row.theftdate,
        })
    });
    (mapped, RegionAudit { dropped })
}

/// Resolve weapon descriptions to categories by exact lookup. Unknown
/// descriptions never fail the run: they are collected, warned about, and
/// their records dropped.
pub fn classify_weapons(
    frame: Frame<RegionRecord>,
    taxonomy: &Arc<WeaponTaxonomy>,
) -> (Frame<CategorizedRecord>, WeaponAudit) {
    let mut unmatched_terms = BTreeSet::new();
    let mut dropped = 0usize;
    for row in frame.rows() {
        if taxonomy.classify(&row.weaponkind).is_none() {
            unmatched_terms.insert(row.weaponkind.clone());
            dropped += 1;
        }
    }
    if dropped > 0 {
        let terms = unmatched_terms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("', '");
        warn!(
            "{dropped} records of {} new weapons present: '{terms}'. Update the weapon term lists!",
            unmatched_terms.len()
        );
    } else {
        info!("No records with new weapons found.");
    }

    let map_taxonomy = Arc::clone(taxonomy);
    let mapped = frame.filter_map(move |row| {
        let weaponcategory = map_taxonomy.classify(&row.weaponkind)?;
        Some(CategorizedRecord {
            report: row.report,
            region: row.region,
            weaponcategory,
            insertdate: row.insertdate,
            theftdate: row.theftdate,
        })
    });
    (mapped, WeaponAudit { unmatched_terms, dropped })
}

/// Coalesce the two source dates into a single event date, drop records
/// predating independence, and clip Crimean records to the last day of
/// Ukrainian control.
pub fn resolve_dates(frame: Frame<CategorizedRecord>) -> Frame<CleanRecord> {
    frame.filter_map(|row| {
        let date = row.theftdate.or(row.insertdate)?;
        if date < independence_day() {
            return None;
        }
        let date = if row.region == Region::Simferopol && date > crimea_cutoff() {
            crimea_cutoff()
        } else {
            date
        };
        Some(CleanRecord {
            report: row.report,
            region: row.region,
            weaponcategory: row.weaponcategory,
            date,
        })
    })
}
