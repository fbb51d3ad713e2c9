use crate::core::catalog::registry::AminoAcidCatalog;
use crate::core::notation::converter::PeptideToSpices;
use crate::core::notation::error::NotationError;
use crate::core::notation::validator::CodeWidth;
use crate::engine::progress::{Progress, ProgressReporter};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub width: CodeWidth,
    pub line_breaks: bool,
    /// Charges the peptide for this pH before conversion.
    pub ph: Option<f64>,
    pub circular: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            width: CodeWidth::OneLetter,
            line_breaks: false,
            ph: None,
            circular: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Input in one letter code, after charging if a pH was given.
    pub one_letter: String,
    pub spices: String,
}

/// Validates a peptide and converts it into SPICES.
///
/// Three letter input is translated to one letter code first. With a pH, the
/// translated sequence is charged before the conversion.
#[instrument(skip_all, name = "conversion_workflow")]
pub fn run(
    catalog: Arc<AminoAcidCatalog>,
    definition: &str,
    options: &ConversionOptions,
    reporter: &ProgressReporter,
) -> Result<ConversionResult, NotationError> {
    let converter = PeptideToSpices::new(catalog);

    reporter.report(Progress::PhaseStart { name: "Validation" });
    info!("Validating peptide definition.");
    converter.validate(definition, options.width)?;
    let mut one_letter = match options.width {
        CodeWidth::OneLetter => definition.to_string(),
        CodeWidth::ThreeLetter => converter.three_to_one_letter(definition)?,
    };
    reporter.report(Progress::PhaseFinish);

    if let Some(ph) = options.ph {
        reporter.report(Progress::PhaseStart { name: "Charging" });
        one_letter = converter.charge_one_letter(&one_letter, ph, options.circular)?;
        debug!("Charged sequence at pH {}: {}", ph, one_letter);
        reporter.report(Progress::PhaseFinish);
    }

    reporter.report(Progress::PhaseStart { name: "Conversion" });
    let spices = converter.one_letter_to_spices(&one_letter, options.line_breaks)?;
    reporter.report(Progress::PhaseFinish);

    info!("Conversion complete ({} characters of SPICES).", spices.len());
    Ok(ConversionResult { one_letter, spices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn catalog() -> Arc<AminoAcidCatalog> {
        Arc::new(AminoAcidCatalog::builtin().unwrap())
    }

    #[test]
    fn one_letter_peptide_is_converted() {
        let result = run(
            catalog(),
            "AG",
            &ConversionOptions::default(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result.one_letter, "AG");
        assert_eq!(result.spices, "Nt-Ala-Gly-Ct");
    }

    #[test]
    fn three_letter_input_is_translated_first() {
        let options = ConversionOptions {
            width: CodeWidth::ThreeLetter,
            line_breaks: true,
            ..Default::default()
        };
        let result = run(catalog(), "AlaGlyLys", &options, &ProgressReporter::new()).unwrap();
        assert_eq!(result.one_letter, "AGK");
        assert_eq!(result.spices, "Nt-Ala\n-Gly\n-Lys(Ks1-Ks2)-Ct");
    }

    #[test]
    fn invalid_peptide_fails_before_conversion() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));
        let result = run(catalog(), "AXG", &ConversionOptions::default(), &reporter);
        assert!(matches!(result, Err(NotationError::Syntax { position: 2 })));
        drop(reporter);
        assert_eq!(
            events.into_inner().unwrap(),
            vec![Progress::PhaseStart { name: "Validation" }]
        );
    }

    #[test]
    fn ph_charges_before_conversion() {
        let options = ConversionOptions {
            ph: Some(7.0),
            ..Default::default()
        };
        let result = run(catalog(), "GK", &options, &ProgressReporter::new()).unwrap();
        assert_eq!(result.one_letter, "G{N+}K{C-S+}");
        assert!(result.spices.starts_with("Ntp-Gly"));
    }
}
