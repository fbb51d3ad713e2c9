use super::charge::charge_one_letter_peptide;
use super::convert::{
    ALLOWED_ONE_LETTER_CHARACTERS, has_one_letter_charge, one_to_three_letter,
    remove_one_letter_charges, three_to_one_letter,
};
use super::error::NotationError;
use super::spices::one_letter_to_spices;
use super::symbols::symbols;
use super::validator::{CodeWidth, check_definition, validate};
use crate::core::catalog::registry::AminoAcidCatalog;
use std::sync::Arc;

/// Peptide notation service bound to one amino acid catalog.
///
/// Cloning is cheap; all clones share the catalog.
#[derive(Debug, Clone)]
pub struct PeptideToSpices {
    catalog: Arc<AminoAcidCatalog>,
}

impl PeptideToSpices {
    pub fn new(catalog: Arc<AminoAcidCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<AminoAcidCatalog> {
        &self.catalog
    }

    pub fn validate(&self, definition: &str, width: CodeWidth) -> Result<(), NotationError> {
        validate(&self.catalog, definition, width)
    }

    /// Empty string if the one letter sequence is valid, the error message otherwise.
    pub fn check_one_letter(&self, definition: &str) -> String {
        check_definition(&self.catalog, definition, CodeWidth::OneLetter)
    }

    pub fn check_three_letter(&self, definition: &str) -> String {
        check_definition(&self.catalog, definition, CodeWidth::ThreeLetter)
    }

    pub fn one_to_three_letter(&self, definition: &str) -> Result<String, NotationError> {
        one_to_three_letter(&self.catalog, definition)
    }

    pub fn three_to_one_letter(&self, definition: &str) -> Result<String, NotationError> {
        three_to_one_letter(&self.catalog, definition)
    }

    pub fn one_letter_to_spices(
        &self,
        definition: &str,
        line_breaks: bool,
    ) -> Result<String, NotationError> {
        one_letter_to_spices(&self.catalog, definition, line_breaks)
    }

    pub fn three_letter_to_spices(&self, definition: &str) -> Result<String, NotationError> {
        let one_letter = three_to_one_letter(&self.catalog, definition)?;
        one_letter_to_spices(&self.catalog, &one_letter, false)
    }

    pub fn charge_one_letter(
        &self,
        definition: &str,
        ph: f64,
        circular: bool,
    ) -> Result<String, NotationError> {
        charge_one_letter_peptide(&self.catalog, definition, ph, circular)
    }

    pub fn remove_one_letter_charges(&self, definition: &str) -> String {
        remove_one_letter_charges(definition)
    }

    pub fn has_one_letter_charge(&self, definition: &str) -> bool {
        has_one_letter_charge(definition)
    }

    pub fn allowed_one_letter_characters(&self) -> &'static str {
        ALLOWED_ONE_LETTER_CHARACTERS
    }

    pub fn one_letter_symbols(&self) -> Vec<String> {
        symbols(&self.catalog, CodeWidth::OneLetter)
    }

    pub fn three_letter_symbols(&self) -> Vec<String> {
        symbols(&self.catalog, CodeWidth::ThreeLetter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> PeptideToSpices {
        PeptideToSpices::new(Arc::new(AminoAcidCatalog::builtin().unwrap()))
    }

    #[test]
    fn string_checks_return_empty_on_success() {
        let converter = converter();
        assert_eq!(converter.check_one_letter("AC[1]GC[1]"), "");
        assert!(!converter.check_one_letter("AC[1]GC[2]").is_empty());
        assert_eq!(converter.check_three_letter("Ala Gly"), "");
    }

    #[test]
    fn three_letter_input_converts_like_one_letter() {
        let converter = converter();
        assert_eq!(
            converter.three_letter_to_spices("Ala Gly").unwrap(),
            converter.one_letter_to_spices("AG", false).unwrap()
        );
    }

    #[test]
    fn clones_share_the_catalog() {
        let converter = converter();
        let clone = converter.clone();
        assert!(Arc::ptr_eq(converter.catalog(), clone.catalog()));
    }

    #[test]
    fn validated_then_charged_then_converted() {
        let converter = converter();
        let sequence = "KGDC[1]AC[1]";
        converter.validate(sequence, CodeWidth::OneLetter).unwrap();
        let charged = converter.charge_one_letter(sequence, 7.0, false).unwrap();
        assert!(converter.has_one_letter_charge(&charged));
        converter.validate(&charged, CodeWidth::OneLetter).unwrap();
        let spices = converter.one_letter_to_spices(&charged, true).unwrap();
        assert!(spices.starts_with("Ntp(Ks1-Ksp)\n"));
        assert_eq!(spices.matches("[1]").count(), 2);
    }
}
