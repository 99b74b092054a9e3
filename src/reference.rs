//! Static reference tables for the EU agent-based model output.
//!
//! Nothing here is read at runtime by the aggregation core directly; the
//! tables seed [`crate::config::Dimensions`] and
//! [`crate::data::sectors::SectorMap::nace62_to_nace1`].

/// Two-letter country codes, in model order.
pub const COUNTRY_CODES: [&str; 26] = [
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "EL", "ES", "FI", "FR", "HR", "HU", "IE",
    "IT", "LT", "LU", "LV", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// ISO 3166 alpha-3 codes, index-aligned with [`COUNTRY_CODES`].
pub const COUNTRY_CODES_ISO3: [&str; 26] = [
    "AUT", "BEL", "BGR", "CYP", "CZE", "DEU", "DNK", "EST", "GRC", "ESP", "FIN", "FRA", "HRV",
    "HUN", "IRL", "ITA", "LTU", "LUX", "LVA", "NLD", "POL", "PRT", "ROU", "SWE", "SVN", "SVK",
];

/// The 62 NACE Rev. 2 industry codes used on the model's sector axis.
pub const SECTORS_NACE_62: [&str; 62] = [
    "A01", "A02", "A03", "B", "C10-C12", "C13-C15", "C16", "C17", "C18", "C19", "C20", "C21",
    "C22", "C23", "C24", "C25", "C26", "C27", "C28", "C29", "C30", "C31_C32", "C33", "D", "E36",
    "E37-E39", "F", "G45", "G46", "G47", "H49", "H50", "H51", "H52", "H53", "I", "J58",
    "J59_J60", "J61", "J62_J63", "K64", "K65", "K66", "L", "M69_M70", "M71", "M72", "M73",
    "M74_M75", "N77", "N78", "N79", "N80-N82", "O", "P", "Q86", "Q87_Q88", "R90-R92", "R93",
    "S94", "S95", "S96",
];

/// NACE sections. Each fine code above starts with exactly one of these.
pub const SECTORS_NACE_1: [&str; 19] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
];

/// Quarters simulated per run (quarter 0 is the pre-shock state).
pub const TIME_STEPS: usize = 13;

/// Monte Carlo experiments per scenario file.
pub const EXPERIMENTS: usize = 18;

/// Model output variables the analysis derives means, aggregates and comparisons for.
pub const VARIABLES_OF_INTEREST: [&str; 37] = [
    "capital_consumption",
    "capital_loss",
    "compensation_employees",
    "euribor",
    "government_debt",
    "government_deficit",
    "nominal_capitalformation",
    "nominal_exports",
    "nominal_fixed_capitalformation",
    "nominal_fixed_capitalformation_dwellings",
    "nominal_gdp",
    "nominal_government_consumption",
    "nominal_gva",
    "nominal_household_consumption",
    "nominal_imports",
    "nominal_output",
    "nominal_sector_gva",
    "nominal_sector_output",
    "operating_surplus",
    "real_capitalformation",
    "real_exports",
    "real_fixed_capitalformation",
    "real_fixed_capitalformation_dwellings",
    "real_gdp",
    "real_government_consumption",
    "real_gva",
    "real_household_consumption",
    "real_imports",
    "real_output",
    "real_sector_gva",
    "real_sector_output",
    "sector_capital_consumption",
    "sector_capital_loss",
    "sector_operating_surplus",
    "taxes_production",
    "unemployment_rate",
    "wages",
];
