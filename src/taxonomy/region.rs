//! Region reference data and the two-pass regex cascade.
//!
//! Raw `organunit` strings are long MIA unit names in Ukrainian, with
//! grammatical case variation and mixed Cyrillic homoglyphs. Two ordered
//! pattern tables map them to 25 canonical regions: a broad oblast-phrasing
//! pass, then an administrative-center pass that both catches city-level
//! names and overrides the first pass for ambiguous territory. Within each
//! pass the last matching rule wins.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::{PatternSource, RegionLabel, UnitName};

/// One of the 25 canonical regions, named after the oblast's administrative
/// center. `Simferopol` is a composite covering Crimea, Sevastopol, and
/// Yalta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Uzhhorod,
    Lviv,
    IvanoFrankivsk,
    Chernivtsi,
    Ternopil,
    Lutsk,
    Rivne,
    Zhytomyr,
    Khmelnytskyi,
    Vinnytsia,
    Kyiv,
    Cherkasy,
    Kropyvnytskyi,
    Odesa,
    Mykolaiv,
    Kherson,
    Simferopol,
    Zaporizhzhia,
    Dnipro,
    Poltava,
    Chernihiv,
    Sumy,
    Kharkiv,
    Luhansk,
    Donetsk,
}

impl Region {
    /// All regions, in taxonomy declaration order.
    pub const ALL: [Region; 25] = [
        Region::Uzhhorod,
        Region::Lviv,
        Region::IvanoFrankivsk,
        Region::Chernivtsi,
        Region::Ternopil,
        Region::Lutsk,
        Region::Rivne,
        Region::Zhytomyr,
        Region::Khmelnytskyi,
        Region::Vinnytsia,
        Region::Kyiv,
        Region::Cherkasy,
        Region::Kropyvnytskyi,
        Region::Odesa,
        Region::Mykolaiv,
        Region::Kherson,
        Region::Simferopol,
        Region::Zaporizhzhia,
        Region::Dnipro,
        Region::Poltava,
        Region::Chernihiv,
        Region::Sumy,
        Region::Kharkiv,
        Region::Luhansk,
        Region::Donetsk,
    ];

    /// Canonical English label, as written to the output artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Uzhhorod => "Uzhhorod",
            Region::Lviv => "Lviv",
            Region::IvanoFrankivsk => "Ivano-Frankivsk",
            Region::Chernivtsi => "Chernivtsi",
            Region::Ternopil => "Ternopil",
            Region::Lutsk => "Lutsk",
            Region::Rivne => "Rivne",
            Region::Zhytomyr => "Zhytomyr",
            Region::Khmelnytskyi => "Khmelnytskyi",
            Region::Vinnytsia => "Vinnytsia",
            Region::Kyiv => "Kyiv",
            Region::Cherkasy => "Cherkasy",
            Region::Kropyvnytskyi => "Kropyvnytskyi",
            Region::Odesa => "Odesa",
            Region::Mykolaiv => "Mykolaiv",
            Region::Kherson => "Kherson",
            Region::Simferopol => "Simferopol",
            Region::Zaporizhzhia => "Zaporizhzhia",
            Region::Dnipro => "Dnipro",
            Region::Poltava => "Poltava",
            Region::Chernihiv => "Chernihiv",
            Region::Sumy => "Sumy",
            Region::Kharkiv => "Kharkiv",
            Region::Luhansk => "Luhansk",
            Region::Donetsk => "Donetsk",
        }
    }

    /// Resolve a canonical label back to its region.
    pub fn from_label(label: &str) -> Option<Region> {
        Region::ALL
            .iter()
            .find(|region| region.as_str() == label)
            .copied()
    }
}

/// Built-in oblast-phrasing patterns, in precedence order.
const OBLAST_PATTERNS: [(&str, &str); 25] = [
    ("Uzhhorod", r"(?i)\bЗАКАРПАТ\w{0,6}.{1,5}\bобл"),
    ("Lviv", r"(?i)\bЛЬВ[іо]ВС\w{0,1}К\w{0,6}.{1,5}\bобл"),
    ("Ivano-Frankivsk", r"(?i)\b[іи]В\w{0,3}[.\-]ФР\w{0,10}.{1,5}\bобл"),
    ("Chernivtsi", r"(?i)\bЧЕРН[іо]В\w{0,1}Ц\w{0,6}.{1,5}\bобл"),
    ("Ternopil", r"(?i)\bТЕРНОП[іо]ЛЬС\w{0,6}.{1,5}\bобл"),
    ("Lutsk", r"(?i)\bВОЛ\w{1,2}Н\w{0,6}.{1,5}\bобл"),
    ("Rivne", r"(?i)\bР[іо]ВНЕНС\w{0,6}.{1,5}\bобл"),
    ("Zhytomyr", r"(?i)\bЖИТОМИРС\w{0,6}.{1,5}\bобл"),
    ("Khmelnytskyi", r"(?i)\bХМЕЛЬНИЦ\w{0,6}.{1,5}\bобл"),
    ("Vinnytsia", r"(?i)\bВ[іи]ННИЦ\w{0,6}.{1,5}\bобл"),
    ("Kyiv", r"(?i)\bКИ[їе]В\w{0,6}.{1,5}\bобл"),
    ("Cherkasy", r"(?i)\bЧЕРКАC\w{0,6}.{1,5}\bобл"),
    ("Kropyvnytskyi", r"(?i)\bК[іи]РОВОГРАДС\w{0,6}.{1,5}\bобл"),
    ("Odesa", r"(?i)\bОДЕС\w{0,6}.{1,5}\bобл"),
    ("Mykolaiv", r"(?i)\b[мн]ИКОЛА[їеє]ВС\w{0,6}.{1,5}\bобл"),
    ("Kherson", r"(?i)\bХЕРСОНС\w{0,6}.{1,5}\bобл"),
    (
        "Simferopol",
        r"(?i)\bКР\w{1,2}М\b|\bСЕВАСТ\w{0,1}ПОЛ\w{1,10}\b|\bЯЛТ\w{1,10}|\bАР\b|\bС[іи]МФЕРОПОЛ\w{1,10}\b",
    ),
    ("Zaporizhzhia", r"(?i)\bЗАПОР[іо]\w{0,6}.{1,5}\bобл"),
    ("Dnipro", r"(?i)\bДН[іе]ПРОПЕТРОВС\w{0,6}.{1,5}\bобл"),
    ("Poltava", r"(?i)\bПОЛТАВС\w{0,6}.{1,5}\bобл"),
    ("Chernihiv", r"(?i)\bЧЕРН[іи]Г[іо]В\w{0,6}.{1,5}\bобл"),
    ("Sumy", r"(?i)\bСУМ\w{0,6}.{1,5}\bобл"),
    ("Kharkiv", r"(?i)\bХАР\w{0,1}К[іо]В\w{0,6}.{1,5}\bобл"),
    ("Luhansk", r"(?i)\bЛУГАНС\w{0,6}.{1,5}\bобл"),
    ("Donetsk", r"(?i)\bДОНЕЦ\w{0,6}.{1,5}\bобл"),
];

/// Built-in administrative-center patterns, in precedence order. These
/// catch unit names that reference a city or district instead of the
/// oblast, and take precedence over oblast matches.
const CENTER_PATTERNS: [(&str, &str); 25] = [
    ("Uzhhorod", r"(?i)\bУЖГОРОД\w{0,6}\b"),
    ("Lviv", r"(?i)\bЛЬВ[іо]В\w{0,6}\b"),
    ("Ivano-Frankivsk", r"(?i)\b[іи]В\w{0,3}[.\-]ФРАНК\w{0,3}ВС\w{0,6}\b"),
    ("Chernivtsi", r"(?i)\bЧЕРН[іо]В\w{0,1}Ц\w{0,6}\b"),
    ("Ternopil", r"(?i)\bТЕРНОП[іо]ЛЬ\w{0,6}\b"),
    ("Lutsk", r"(?i)\bВОЛ\w{1,2}Н\w{0,6}\b|\bЛУЦ\w{0,1}К\w{0,6}\b"),
    ("Rivne", r"(?i)\bР[іо]ВН[ео]\w{0,6}\b|\bГОЩАНС\w{0,5}\b"),
    ("Zhytomyr", r"(?i)\bЖИТОМИР\w{0,6}\b"),
    ("Khmelnytskyi", r"(?i)\bХМЕЛЬНИЦ\w{0,6}\b"),
    ("Vinnytsia", r"(?i)\bВ[іи]ННИЦ\w{0,6}\b"),
    ("Kyiv", r"(?i)\bКИ[їеє]В\w{0,6}\b|\bПЕЧЕРСЬК\w{0,6}\b|\bГОЛОСІЇВ\w{0,6}\b"),
    ("Cherkasy", r"(?i)\bЧЕРКАС\w{0,6}\b"),
    ("Kropyvnytskyi", r"(?i)\bК[іи]РОВОГРАД\w{0,6}\b|\bКРОПИВНИЦ\w{0,6}\b"),
    ("Odesa", r"(?i)\bОДЕС\w{0,6}\b"),
    ("Mykolaiv", r"(?i)\b[мн]ИКОЛА[їеє]В\w{0,6}\b"),
    ("Kherson", r"(?i)\bХЕРСОН\w{0,6}\b"),
    (
        "Simferopol",
        r"(?i)\bКР\w{1,2}М\b|\bСЕВАСТ\w{0,1}ПОЛ\w{1,10}\b|\bЯЛТ\w{1,10}|\bАР\b|\bС[іи]МФЕРОПОЛ\w{1,10}\b",
    ),
    ("Zaporizhzhia", r"(?i)\bЗАПОР[іо]\w{0,6}\b"),
    (
        "Dnipro",
        r"(?i)\bДН[іе]ПР\w{0,10}\b|\bДН[іе]ПРОПЕТРОВС\w{0,6}\b|\bКРИВ\w{0,3}\W{0,5}Р\w{1,6}\b",
    ),
    ("Poltava", r"(?i)\bПОЛТАВ\w{0,6}\b"),
    ("Chernihiv", r"(?i)\bЧЕРН[іи]Г[іо]В\w{0,6}\b|\bН[іе]ЖИН\w{0,6}\b|\bБАХМА\w{0,6}\b"),
    ("Sumy", r"(?i)\bСУМ\w{0,6}\b|\bЛЮБОТ\w{1,6}\b"),
    ("Kharkiv", r"(?i)\bХАР\w{0,1}К[іо]В\w{0,6}\b|\bЛОЗОВ\w{0,6}\b|\bОСНОВ\w{0,6}\b"),
    ("Luhansk", r"(?i)\bЛУГАНС\w{0,6}\b"),
    ("Donetsk", r"(?i)\bДОНЕЦ\w{0,6}\b"),
];

/// Ordered region pattern tables in their configuration form.
///
/// Both maps go label to pattern source; insertion order is precedence
/// order, so config files control rule priority by listing order. A map
/// omitted from a configuration file keeps its built-in contents.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPatterns {
    /// Broad oblast-phrasing patterns, applied first.
    pub oblasts: IndexMap<RegionLabel, PatternSource>,
    /// Narrower administrative-center patterns, applied second.
    pub centers: IndexMap<RegionLabel, PatternSource>,
}

impl Default for RegionPatterns {
    fn default() -> Self {
        Self {
            oblasts: pattern_table(&OBLAST_PATTERNS),
            centers: pattern_table(&CENTER_PATTERNS),
        }
    }
}

impl RegionPatterns {
    /// Compile both tables into a ready-to-use taxonomy. Fails when a label
    /// is not one of the 25 regions or a pattern does not compile.
    pub fn compile(&self) -> Result<RegionTaxonomy, PipelineError> {
        Ok(RegionTaxonomy {
            oblasts: compile_rules(&self.oblasts)?,
            centers: compile_rules(&self.centers)?,
        })
    }
}

fn pattern_table(entries: &[(&str, &str)]) -> IndexMap<RegionLabel, PatternSource> {
    entries
        .iter()
        .map(|(label, pattern)| (label.to_string(), pattern.to_string()))
        .collect()
}

fn compile_rules(
    patterns: &IndexMap<RegionLabel, PatternSource>,
) -> Result<Vec<RegionRule>, PipelineError> {
    patterns
        .iter()
        .map(|(label, pattern)| {
            let region = Region::from_label(label).ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "unknown region label '{label}' in pattern table"
                ))
            })?;
            let pattern = Regex::new(pattern).map_err(|err| {
                PipelineError::Configuration(format!(
                    "invalid pattern for region '{label}': {err}"
                ))
            })?;
            Ok(RegionRule { region, pattern })
        })
        .collect()
}

/// A single compiled cascade rule.
#[derive(Clone, Debug)]
pub struct RegionRule {
    /// Region assigned when the pattern matches.
    pub region: Region,
    /// Compiled unit-name pattern.
    pub pattern: Regex,
}

/// Compiled two-pass region cascade, immutable for the duration of a run.
#[derive(Clone, Debug)]
pub struct RegionTaxonomy {
    oblasts: Vec<RegionRule>,
    centers: Vec<RegionRule>,
}

impl RegionTaxonomy {
    /// Classify a raw unit name, or `None` when no rule matches.
    ///
    /// Both passes run in declared order and every match overwrites the
    /// previous outcome, so the last matching rule of the center pass is
    /// authoritative, then the last of the oblast pass.
    pub fn classify(&self, organunit: &UnitName) -> Option<Region> {
        let mut region = None;
        for rule in &self.oblasts {
            if rule.pattern.is_match(organunit) {
                region = Some(rule.region);
            }
        }
        for rule in &self.centers {
            if rule.pattern.is_match(organunit) {
                region = Some(rule.region);
            }
        }
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> RegionTaxonomy {
        RegionPatterns::default()
            .compile()
            .expect("built-in patterns compile")
    }

    #[test]
    fn built_in_tables_cover_all_regions() {
        let patterns = RegionPatterns::default();
        assert_eq!(patterns.oblasts.len(), 25);
        assert_eq!(patterns.centers.len(), 25);
        for label in patterns.oblasts.keys() {
            assert!(Region::from_label(label).is_some(), "label {label}");
        }
    }

    #[test]
    fn oblast_phrasing_resolves_declined_unit_names() {
        let taxonomy = taxonomy();
        assert_eq!(
            taxonomy.classify(&"ГУ МВС УКРАЇНИ У ЛЬВІВСЬКІЙ ОБЛАСТІ".to_string()),
            Some(Region::Lviv)
        );
        assert_eq!(
            taxonomy.classify(&"УМВС УКРАЇНИ В ЗАКАРПАТСЬКІЙ ОБЛАСТІ".to_string()),
            Some(Region::Uzhhorod)
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let taxonomy = taxonomy();
        assert_eq!(
            taxonomy.classify(&"гунп в донецькій області".to_string()),
            Some(Region::Donetsk)
        );
    }

    #[test]
    fn homoglyph_variants_match_crimea_patterns() {
        let taxonomy = taxonomy();
        // Ukrainian і spelling.
        assert_eq!(
            taxonomy.classify(&"СІМФЕРОПОЛЬСЬКЕ МІСЬКЕ УПРАВЛІННЯ".to_string()),
            Some(Region::Simferopol)
        );
        // Russian и spelling.
        assert_eq!(
            taxonomy.classify(&"СИМФЕРОПОЛЬСКОЕ ГОРОДСКОЕ УПРАВЛЕНИЕ".to_string()),
            Some(Region::Simferopol)
        );
    }

    #[test]
    fn crimea_terms_resolve_to_simferopol_in_both_passes() {
        let taxonomy = taxonomy();
        assert_eq!(
            taxonomy.classify(&"УМВС УКРАЇНИ В АР КРИМ".to_string()),
            Some(Region::Simferopol)
        );
        assert_eq!(
            taxonomy.classify(&"СЕВАСТОПОЛЬСЬКЕ МІСЬКЕ УПРАВЛІННЯ".to_string()),
            Some(Region::Simferopol)
        );
    }

    #[test]
    fn city_reference_overrides_oblast_phrasing() {
        let taxonomy = taxonomy();
        // Pass 1 resolves Luhansk from the oblast phrasing; the trailing
        // city reference matches later in the center pass and wins.
        assert_eq!(
            taxonomy.classify(&"ВІДДІЛ ПОЛІЦІЇ В ЛУГАНСЬКІЙ ОБЛАСТІ (М. ДОНЕЦЬК)".to_string()),
            Some(Region::Donetsk)
        );
    }

    #[test]
    fn unmatched_unit_names_classify_to_none() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.classify(&"ЦЕНТРАЛЬНИЙ АПАРАТ".to_string()), None);
        assert_eq!(taxonomy.classify(&String::new()), None);
    }

    #[test]
    fn compile_rejects_unknown_labels_and_bad_patterns() {
        let mut patterns = RegionPatterns::default();
        patterns
            .oblasts
            .insert("Atlantis".to_string(), r"\bATLANT\w*".to_string());
        let err = patterns.compile().expect_err("unknown label must fail");
        assert!(err.to_string().contains("Atlantis"));

        let mut patterns = RegionPatterns::default();
        patterns
            .centers
            .insert("Lviv".to_string(), r"(?i)\bЛЬВ[".to_string());
        let err = patterns.compile().expect_err("broken pattern must fail");
        assert!(err.to_string().contains("Lviv"));
    }

    #[test]
    fn later_rules_override_earlier_matches_within_a_pass() {
        let mut oblasts = IndexMap::new();
        oblasts.insert("Lviv".to_string(), "(?i)unit".to_string());
        oblasts.insert("Kyiv".to_string(), "(?i)unit".to_string());
        let taxonomy = RegionPatterns {
            oblasts,
            centers: IndexMap::new(),
        }
        .compile()
        .expect("synthetic patterns compile");
        assert_eq!(
            taxonomy.classify(&"some unit".to_string()),
            Some(Region::Kyiv)
        );
    }
}
