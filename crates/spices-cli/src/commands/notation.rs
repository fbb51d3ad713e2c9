use crate::cli::{ChargeArgs, CodeWidthArg, ConvertArgs, SymbolsArgs, TranslateArgs, ValidateArgs};
use crate::error::Result;
use spices::core::catalog::registry::AminoAcidCatalog;
use spices::core::notation::converter::PeptideToSpices;
use spices::core::notation::validator::CodeWidth;
use spices::engine::progress::ProgressReporter;
use spices::workflows::convert::{self, ConversionOptions};
use std::sync::Arc;

fn width(three_letter: bool) -> CodeWidth {
    if three_letter {
        CodeWidth::ThreeLetter
    } else {
        CodeWidth::OneLetter
    }
}

/// `OK` or the validation message.
pub fn validate(args: &ValidateArgs, catalog: Arc<AminoAcidCatalog>) -> String {
    let converter = PeptideToSpices::new(catalog);
    let message = if args.three_letter {
        converter.check_three_letter(&args.sequence)
    } else {
        converter.check_one_letter(&args.sequence)
    };
    if message.is_empty() {
        "OK".to_string()
    } else {
        message
    }
}

pub fn convert(args: &ConvertArgs, catalog: Arc<AminoAcidCatalog>) -> Result<String> {
    let options = ConversionOptions {
        width: width(args.three_letter),
        line_breaks: args.line_breaks,
        ph: args.ph,
        circular: args.circular,
    };
    let result = convert::run(catalog, &args.sequence, &options, &ProgressReporter::new())?;
    Ok(result.spices)
}

pub fn translate(args: &TranslateArgs, catalog: Arc<AminoAcidCatalog>) -> Result<String> {
    let converter = PeptideToSpices::new(catalog);
    Ok(match args.to {
        CodeWidthArg::One => converter.three_to_one_letter(&args.sequence)?,
        CodeWidthArg::Three => converter.one_to_three_letter(&args.sequence)?,
    })
}

pub fn charge(args: &ChargeArgs, catalog: Arc<AminoAcidCatalog>) -> Result<String> {
    let converter = PeptideToSpices::new(catalog);
    converter.validate(&args.sequence, CodeWidth::OneLetter)?;
    Ok(converter.charge_one_letter(&args.sequence, args.ph, args.circular)?)
}

pub fn symbols(args: &SymbolsArgs, catalog: Arc<AminoAcidCatalog>) -> String {
    let converter = PeptideToSpices::new(catalog);
    let lines = if args.three_letter {
        converter.three_letter_symbols()
    } else {
        converter.one_letter_symbols()
    };
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn catalog() -> Arc<AminoAcidCatalog> {
        Arc::new(AminoAcidCatalog::builtin().unwrap())
    }

    #[test]
    fn validate_prints_ok_or_the_message() {
        let ok = ValidateArgs {
            sequence: "AC[1]GC[1]".to_string(),
            three_letter: false,
        };
        assert_eq!(validate(&ok, catalog()), "OK");

        let bad = ValidateArgs {
            sequence: "AXG".to_string(),
            three_letter: false,
        };
        assert!(validate(&bad, catalog()).contains("position 2"));
    }

    #[test]
    fn convert_reads_three_letter_input() {
        let args = ConvertArgs {
            sequence: "Ala Gly".to_string(),
            line_breaks: false,
            three_letter: true,
            ph: None,
            circular: false,
        };
        assert_eq!(convert(&args, catalog()).unwrap(), "Nt-Ala-Gly-Ct");
    }

    #[test]
    fn translate_goes_both_ways() {
        let args = TranslateArgs {
            sequence: "AGK".to_string(),
            to: CodeWidthArg::Three,
        };
        let three = translate(&args, catalog()).unwrap();
        let back = TranslateArgs {
            sequence: three,
            to: CodeWidthArg::One,
        };
        assert_eq!(translate(&back, catalog()).unwrap(), "AGK");
    }

    #[test]
    fn charge_rejects_invalid_sequences() {
        let args = ChargeArgs {
            sequence: "GK".to_string(),
            ph: 7.0,
            circular: false,
        };
        assert_eq!(charge(&args, catalog()).unwrap(), "G{N+}K{C-S+}");

        let bad = ChargeArgs {
            sequence: "G]".to_string(),
            ph: 7.0,
            circular: false,
        };
        assert!(matches!(charge(&bad, catalog()), Err(CliError::Notation(_))));
    }

    #[test]
    fn symbols_list_every_amino_acid() {
        let table = symbols(&SymbolsArgs { three_letter: false }, catalog());
        assert!(table.contains("Lysine"));
        assert!(table.lines().count() > 20);
    }
}
