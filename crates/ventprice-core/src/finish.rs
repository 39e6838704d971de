//! Surface finishes

use std::fmt;

/// Display name of the unfinished option
pub const NO_FINISH: &str = "No Finish";
/// Display name of the anodized finish
pub const ANODIZED_ALUMINUM: &str = "Anodized Aluminum";
/// Display name of the powder coated finish family
pub const POWDER_COATED: &str = "Powder Coated";
/// Display name of the caller-priced special colour
pub const SPECIAL_COLOR: &str = "Special Color";

/// A finish selected for a priced item
///
/// Powder coated finishes carry their colour (`"Powder Coated - RAL 9010"`),
/// which never changes the price. Special colours are priced with a
/// multiplier supplied by the caller rather than one stored per product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Finish {
    NoFinish,
    Anodized,
    PowderCoated { color: Option<String> },
    SpecialColor,
    /// A name that matches no known finish
    Other(String),
}

impl Finish {
    /// Interpret a finish name as shown in the catalog.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();

        if name.eq_ignore_ascii_case(NO_FINISH) {
            return Finish::NoFinish;
        }
        if name.eq_ignore_ascii_case(ANODIZED_ALUMINUM) {
            return Finish::Anodized;
        }
        if let Some(pos) = name.find(POWDER_COATED) {
            let rest = name[pos + POWDER_COATED.len()..]
                .trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == ':')
                .trim();
            let color = (!rest.is_empty()).then(|| rest.to_string());
            return Finish::PowderCoated { color };
        }
        if name.contains(SPECIAL_COLOR) {
            return Finish::SpecialColor;
        }

        Finish::Other(name.to_string())
    }

    /// Catalog name of the finish family, without any colour suffix.
    pub fn family_name(&self) -> &str {
        match self {
            Finish::NoFinish => NO_FINISH,
            Finish::Anodized => ANODIZED_ALUMINUM,
            Finish::PowderCoated { .. } => POWDER_COATED,
            Finish::SpecialColor => SPECIAL_COLOR,
            Finish::Other(name) => name,
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finish::PowderCoated { color: Some(color) } => {
                write!(f, "{} - {}", POWDER_COATED, color)
            }
            other => f.write_str(other.family_name()),
        }
    }
}

impl From<&str> for Finish {
    fn from(name: &str) -> Self {
        Finish::parse(name)
    }
}
