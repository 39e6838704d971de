//! Products and their modifier slots

use crate::finish::{Finish, ANODIZED_ALUMINUM, NO_FINISH, POWDER_COATED, SPECIAL_COLOR};

/// A sellable model and the modifiers stored for it
///
/// Many models may share one price table (`table_id`). Every modifier slot
/// holds either a plain number, a formula, or nothing. For the finish slots
/// nothing means the finish is not offered for the model.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    pub product_id: i64,
    pub table_id: i64,
    pub model: String,
    /// Table price → base price
    pub tb_modifier: Option<String>,
    /// With-damper price → modified with-damper price
    pub wd_modifier: Option<String>,
    pub anodized_multiplier: Option<String>,
    pub powder_coated_multiplier: Option<String>,
    pub no_finish_multiplier: Option<String>,
}

impl Product {
    pub fn new(product_id: i64, table_id: i64, model: impl Into<String>) -> Self {
        Self {
            product_id,
            table_id,
            model: model.into(),
            ..Default::default()
        }
    }

    /// TB modifier, with blank values treated as absent.
    pub fn tb_modifier(&self) -> Option<&str> {
        non_blank(&self.tb_modifier)
    }

    /// WD modifier, with blank values treated as absent.
    pub fn wd_modifier(&self) -> Option<&str> {
        non_blank(&self.wd_modifier)
    }

    /// Stored multiplier for a finish.
    ///
    /// Returns `None` for special colours (priced by the caller) and for
    /// names outside the catalog.
    pub fn finish_multiplier(&self, finish: &Finish) -> Option<&str> {
        match finish {
            Finish::NoFinish => non_blank(&self.no_finish_multiplier),
            Finish::Anodized => non_blank(&self.anodized_multiplier),
            Finish::PowderCoated { .. } => non_blank(&self.powder_coated_multiplier),
            Finish::SpecialColor | Finish::Other(_) => None,
        }
    }

    /// Finishes offered for this model, in catalog order.
    ///
    /// Special Color is always offered.
    pub fn available_finishes(&self) -> Vec<String> {
        let slots = [
            (NO_FINISH, &self.no_finish_multiplier),
            (ANODIZED_ALUMINUM, &self.anodized_multiplier),
            (POWDER_COATED, &self.powder_coated_multiplier),
        ];

        let mut finishes: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| non_blank(slot).is_some())
            .map(|(name, _)| name.to_string())
            .collect();
        finishes.push(SPECIAL_COLOR.to_string());
        finishes
    }

    /// Whether the model can be ordered with a damper.
    pub fn has_damper_option(&self) -> bool {
        self.wd_modifier().is_some()
    }
}

/// How a price table is indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Indexed by width and height
    Rectangular,
    /// Indexed by a single diameter stored in the height column
    Diameter,
    /// Per-foot rate indexed by one matching dimension
    PricePerFoot,
    /// Rows without dimensions, selected by position
    Dimensionless { per_foot: bool },
}

impl Shape {
    pub fn is_per_foot(self) -> bool {
        matches!(
            self,
            Shape::PricePerFoot | Shape::Dimensionless { per_foot: true }
        )
    }
}

fn non_blank(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn product() -> Product {
        Product {
            anodized_multiplier: Some("1.2".into()),
            powder_coated_multiplier: Some("BP*1.3".into()),
            ..Product::new(1, 10, "ABC")
        }
    }

    #[test]
    fn test_available_finishes_in_catalog_order() {
        let mut p = product();
        assert_eq!(
            p.available_finishes(),
            vec!["Anodized Aluminum", "Powder Coated", "Special Color"]
        );

        p.no_finish_multiplier = Some("1".into());
        assert_eq!(
            p.available_finishes(),
            vec![
                "No Finish",
                "Anodized Aluminum",
                "Powder Coated",
                "Special Color"
            ]
        );
    }

    #[test]
    fn test_blank_slots_are_absent() {
        let mut p = product();
        p.anodized_multiplier = Some("   ".into());
        p.wd_modifier = Some("".into());

        assert_eq!(p.finish_multiplier(&Finish::Anodized), None);
        assert_eq!(p.available_finishes(), vec!["Powder Coated", "Special Color"]);
        assert!(!p.has_damper_option());

        p.wd_modifier = Some("WD*1.1".into());
        assert!(p.has_damper_option());
    }

    #[test]
    fn test_finish_multiplier_slots() {
        let p = product();
        assert_eq!(p.finish_multiplier(&Finish::Anodized), Some("1.2"));
        assert_eq!(
            p.finish_multiplier(&Finish::PowderCoated {
                color: Some("Red".into())
            }),
            Some("BP*1.3")
        );
        assert_eq!(p.finish_multiplier(&Finish::SpecialColor), None);
        assert_eq!(p.finish_multiplier(&Finish::NoFinish), None);
    }
}
