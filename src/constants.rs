use chrono::NaiveDateTime;

/// Constants used by ingestion and type normalization.
pub mod extract {
    /// Source columns retained by projection, in source order.
    pub const REQUIRED_COLUMNS: [&str; 5] = [
        "weaponkind",
        "organunit",
        "reasonsearch",
        "insertdate",
        "theftdate",
    ];
    /// Textual timestamp pattern used by the raw feed for both date columns.
    pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
}

/// Constants used by export and artifact layout.
pub mod export {
    /// Output columns in canonical order.
    pub const OUTPUT_COLUMNS: [&str; 4] = ["report", "region", "weaponcategory", "date"];
    /// Maximum rows written per parquet row group.
    pub const ROW_GROUP_SIZE: usize = 65_536;
    /// Suffix appended to the output file name while the artifact is being written.
    pub const PARTIAL_SUFFIX: &str = ".tmp";
}

/// Default locations used when no configuration overrides them.
pub mod paths {
    /// Default raw JSON input path.
    pub const DEFAULT_INPUT: &str = "assets/weapons-wanted.json";
    /// Default compressed parquet output path.
    pub const DEFAULT_OUTPUT: &str = "assets/ua-mia-weapons.parquet.gzip";
}

/// Midnight on Ukrainian independence day. Earlier records describe the
/// Ukrainian SSR and are out of this dataset's domain.
pub fn independence_day() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("1991-08-24T00:00:00", extract::EVENT_DATE_FORMAT)
        .expect("literal timestamp parses")
}

/// Last date under Ukrainian administrative control in Crimea. Later-dated
/// Simferopol records are delayed bureaucratic entries, not later events,
/// and are clipped to this boundary.
pub fn crimea_cutoff() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2014-03-24T00:00:00", extract::EVENT_DATE_FORMAT)
        .expect("literal timestamp parses")
}
