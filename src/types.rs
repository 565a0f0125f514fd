/// Raw organizational-unit text as it appears in the source feed.
/// Example: `ГУ МВС УКРАЇНИ У ЛЬВІВСЬКІЙ ОБЛАСТІ`
pub type UnitName = String;
/// Raw weapon-description text as it appears in the source feed.
/// Examples: `ПІСТОЛЕТ ГАЗОВИЙ`, `НІЖ МИСЛИВСЬКИЙ`
pub type WeaponName = String;
/// Raw report-reason text as it appears in the source feed.
/// Examples: `ВИКРАДЕННЯ`, `ВТРАТА`
pub type ReasonText = String;
/// Canonical English region label used in taxonomy tables.
/// Examples: `Lviv`, `Ivano-Frankivsk`, `Simferopol`
pub type RegionLabel = String;
/// Regular-expression source text for region matching.
/// Example: `(?i)\bЛЬВ[іо]ВС\w{0,1}К\w{0,6}.{1,5}\bобл`
pub type PatternSource = String;
