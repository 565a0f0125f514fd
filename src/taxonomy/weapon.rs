//! Weapon category reference data and the exact-lookup table.
//!
//! Unlike region matching this is not a cascade: raw `weaponkind` strings
//! in the feed are already normalized uppercase descriptions, so each maps
//! to its category by exact string equality. The term lists are maintained
//! by hand; the pipeline warns when the feed introduces terms missing from
//! them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::WeaponName;

/// One of the 8 canonical weapon categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponCategory {
    Bladed,
    Handguns,
    LightFirearms,
    HeavyFirearms,
    PneumaticFlobert,
    Artillery,
    Explosives,
    Other,
}

impl WeaponCategory {
    /// All categories, in taxonomy declaration order.
    pub const ALL: [WeaponCategory; 8] = [
        WeaponCategory::Bladed,
        WeaponCategory::Handguns,
        WeaponCategory::LightFirearms,
        WeaponCategory::HeavyFirearms,
        WeaponCategory::PneumaticFlobert,
        WeaponCategory::Artillery,
        WeaponCategory::Explosives,
        WeaponCategory::Other,
    ];

    /// Canonical label, as written to the output artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponCategory::Bladed => "Bladed",
            WeaponCategory::Handguns => "Handguns",
            WeaponCategory::LightFirearms => "Light firearms",
            WeaponCategory::HeavyFirearms => "Heavy firearms",
            WeaponCategory::PneumaticFlobert => "Pneumatic&Flobert",
            WeaponCategory::Artillery => "Artillery",
            WeaponCategory::Explosives => "Explosives",
            WeaponCategory::Other => "Other",
        }
    }

    /// Resolve a canonical label back to its category.
    pub fn from_label(label: &str) -> Option<WeaponCategory> {
        WeaponCategory::ALL
            .iter()
            .find(|category| category.as_str() == label)
            .copied()
    }
}

/// Weapon term lists in their configuration form, one list per category.
/// Lists omitted from a configuration file keep their built-in contents.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTerms {
    /// Knives, sabres, bayonets.
    pub bladed: Vec<WeaponName>,
    /// Pistols and revolvers of all kinds.
    pub handguns: Vec<WeaponName>,
    /// Rifles, carbines, shotguns, and their sawn-off variants.
    pub light_firearms: Vec<WeaponName>,
    /// Machine guns and cannons.
    pub heavy_firearms: Vec<WeaponName>,
    /// Air guns and Flobert-cartridge arms.
    pub pneumatic_flobert: Vec<WeaponName>,
    /// Launchers, mortars, and man-portable systems.
    pub artillery: Vec<WeaponName>,
    /// Grenades, rockets, shells, and explosive substances.
    pub explosives: Vec<WeaponName>,
    /// Parts, ammunition, training arms, and the rest.
    pub other: Vec<WeaponName>,
}

impl Default for WeaponTerms {
    fn default() -> Self {
        Self {
            bladed: term_list(&[
                "КИНДЖАЛ",
                "КОРТИК",
                "МЕЧ",
                "НІЖ МИСЛИВСЬКИЙ",
                "НІЖ",
                "ШАБЛЯ",
                "ШАШКА",
                "ШТИК НІЖ",
                "ШТИК",
            ]),
            handguns: term_list(&[
                "ПІСТОЛЕТ ГАЗОВИЙ",
                "ПІСТОЛЕТ КУЛЕМЕТ",
                "ПІСТОЛЕТ МК",
                "ПІСТОЛЕТ ПІД ГУМОВУ КУЛЮ",
                "ПІСТОЛЕТ САМОРОБНИЙ",
                "ПІСТОЛЕТ СИГНАЛЬНИЙ",
                "ПІСТОЛЕТ СТАРТОВИЙ",
                "ПІСТОЛЕТ",
                "РЕВОЛЬВЕР ГАЗОВИЙ",
                "РЕВОЛЬВЕР ГАЗОВОДРОБОВИЙ",
                "РЕВОЛЬВЕР ПІД ГУМОВУ КУЛЮ",
                "РЕВОЛЬВЕР СИГНАЛЬНИЙ",
                "РЕВОЛЬВЕР СТАРТОВИЙ",
                "РЕВОЛЬВЕР",
                "ПІСТОЛЕТ АВТОРУЧКА",
            ]),
            light_firearms: term_list(&[
                "АВТОМАТ",
                "ГВИНТІВКА МК",
                "ГВИНТІВКА",
                "КАРАБІН",
                "ОБРІЗ ГВИНТІВКИ МК",
                "ОБРІЗ ГВИНТІВКИ",
                "ОБРІЗ КАРАБІНА",
                "ОБРІЗ РУШНИЦІ",
                "РУШНИЦЯ ЗБІРНА",
                "РУШНИЦЯ МИСЛИВСЬКА",
                "РУШНИЦЯ ПОМПОВА",
                "РУШНИЦЯ",
            ]),
            heavy_firearms: term_list(&[
                "ГАРМАТА АВТОМАТИЧНА",
                "ГАРМАТА",
                "КУЛЕМЕТ СТАНКОВИЙ",
                "КУЛЕМЕТ",
                "РУШНИЦЯ ПРОТИТАНКОВА",
            ]),
            pneumatic_flobert: term_list(&[
                "ГВИНТІВКА ПНЕВМАТИЧНА",
                "КАРАБІН ПІД ПАТРОН ФЛОБЕРА",
                "ПІСТОЛЕТ ПІД ПАТРОН ФЛОБЕРА",
                "ПІСТОЛЕТ ПНЕВМАТИЧНИЙ",
                "РЕВОЛЬВЕР ПІД ПАТРОН ФЛОБЕРА",
                "РЕВОЛЬВЕР ПНЕВМАТИЧНИЙ",
            ]),
            artillery: term_list(&[
                "ГРАНАТОМЕТ",
                "МІНОМЕТ",
                "ПЗРК",
                "ПТРК",
                "РАКЕТНИЦЯ",
                "ПУСКОВІ УСТАНОВКИ",
                "ЗЕНІТНА УСТАНОВКА",
            ]),
            explosives: term_list(&["ВИБУХОВІ РЕЧОВИНИ", "ГРАНАТА", "РАКЕТА", "СНАРЯД"]),
            other: term_list(&[
                "ДЕТАЛІ",
                "ЗАПАЛ",
                "ЗАТВОР ДЕТАЛЬ",
                "ІНШІ ДЕТАЛІ ЗБРОЇ",
                "МАГАЗИН ПІСТОЛЕТНИЙ",
                "МАГАЗИН",
                "НАБОЇ БОЄВІ",
                "ПРИЦІЛ ОПТИЧНИЙ",
                "РАМКА ДЕТАЛЬ",
                "СТВОЛ ДЕТАЛЬ",
                "СТВОЛЬНА КОРОБКА ДЕТАЛЬ",
                "АРБАЛЕТ",
                "РУШНИЦЯ ДЛЯ ПІДВОДНОГО ПОЛЮВАННЯ",
                "АВТОМАТ УЧБОВИЙ",
                "ГВИНТІВКА УЧБОВА",
                "КАРАБІН УЧБОВИЙ",
                "КУЛЕМЕТ УЧБОВИЙ",
                "ПІСТОЛЕТ МОНТАЖНИЙ",
                "ПІСТОЛЕТ УЧБОВИЙ",
                "КИСТЕНЬ",
            ]),
        }
    }
}

impl WeaponTerms {
    /// Compile the lists into an exact-lookup taxonomy. Fails when a term
    /// appears under two different categories.
    pub fn compile(&self) -> Result<WeaponTaxonomy, PipelineError> {
        let mut table = HashMap::new();
        for (category, terms) in self.by_category() {
            for term in terms {
                if let Some(previous) = table.insert(term.clone(), category) {
                    if previous != category {
                        return Err(PipelineError::Configuration(format!(
                            "weapon term '{term}' is listed under both '{}' and '{}'",
                            previous.as_str(),
                            category.as_str()
                        )));
                    }
                }
            }
        }
        Ok(WeaponTaxonomy { table })
    }

    fn by_category(&self) -> [(WeaponCategory, &Vec<WeaponName>); 8] {
        [
            (WeaponCategory::Bladed, &self.bladed),
            (WeaponCategory::Handguns, &self.handguns),
            (WeaponCategory::LightFirearms, &self.light_firearms),
            (WeaponCategory::HeavyFirearms, &self.heavy_firearms),
            (WeaponCategory::PneumaticFlobert, &self.pneumatic_flobert),
            (WeaponCategory::Artillery, &self.artillery),
            (WeaponCategory::Explosives, &self.explosives),
            (WeaponCategory::Other, &self.other),
        ]
    }
}

fn term_list(terms: &[&str]) -> Vec<WeaponName> {
    terms.iter().map(|term| term.to_string()).collect()
}

/// Compiled exact-lookup weapon table, immutable for the duration of a run.
#[derive(Clone, Debug)]
pub struct WeaponTaxonomy {
    table: HashMap<WeaponName, WeaponCategory>,
}

impl WeaponTaxonomy {
    /// Classify a raw weapon description by exact equality, or `None` when
    /// the term is not in the table.
    pub fn classify(&self, weaponkind: &WeaponName) -> Option<WeaponCategory> {
        self.table.get(weaponkind).copied()
    }

    /// Number of known terms.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when the table holds no terms.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
