use super::validator::CodeWidth;
use crate::core::catalog::amino_acid::AminoAcid;
use crate::core::catalog::registry::AminoAcidCatalog;
use std::collections::BTreeMap;

fn code_of(amino_acid: &AminoAcid, width: CodeWidth) -> String {
    match width {
        CodeWidth::OneLetter => amino_acid.one_letter().to_string(),
        CodeWidth::ThreeLetter => amino_acid.three_letter_title(),
    }
}

/// All non-empty ordered selections of `arguments`, e.g. `C-`, `N+`, `C-N+`.
fn argument_combinations(arguments: &[String]) -> Vec<String> {
    let count = arguments.len();
    (1u32..(1 << count))
        .map(|mask| {
            arguments
                .iter()
                .enumerate()
                .filter(|(j, _)| mask & (1 << (count - 1 - j)) != 0)
                .map(|(_, argument)| argument.as_str())
                .collect::<String>()
        })
        .collect()
}

/// Help table of the notation symbols, one `symbol : description` line each.
///
/// Lists the bracket symbols, the frequency digits, every amino acid code and
/// every charged code the catalog accepts. Charged codes are sorted and padded
/// to a common width.
pub fn symbols(catalog: &AminoAcidCatalog, width: CodeWidth) -> Vec<String> {
    let mut lines = vec![
        "[ : Disulfide bond open".to_string(),
        "] : Disulfide bond close".to_string(),
    ];
    lines.extend((0..10).map(|digit| format!("{} : Frequency digit", digit)));
    lines.extend(
        catalog
            .iter()
            .map(|aa| format!("{} : {}", code_of(aa, width), aa.name())),
    );

    let mut charged: BTreeMap<String, &str> = BTreeMap::new();
    for amino_acid in catalog.iter() {
        let code = code_of(amino_acid, width);
        for combination in argument_combinations(&amino_acid.charge_arguments()) {
            charged.insert(format!("{}{{{}}}", code, combination), amino_acid.name());
        }
    }
    let column = charged.keys().map(String::len).max().unwrap_or_default();
    lines.extend(
        charged
            .iter()
            .map(|(symbol, name)| format!("{:<column$} : {}", symbol, name)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_keep_argument_order() {
        let arguments = vec!["C-".to_string(), "N+".to_string(), "S+".to_string()];
        let mut combinations = argument_combinations(&arguments);
        combinations.sort();
        assert_eq!(
            combinations,
            vec!["C-", "C-N+", "C-N+S+", "C-S+", "N+", "N+S+", "S+"]
        );
    }

    #[test]
    fn one_letter_table_lists_codes_and_charges() {
        let catalog = AminoAcidCatalog::builtin().unwrap();
        let lines = symbols(&catalog, CodeWidth::OneLetter);
        assert_eq!(lines[0], "[ : Disulfide bond open");
        assert_eq!(lines[2], "0 : Frequency digit");
        assert!(lines.contains(&"K : Lysine".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("K{C-N+S+} : Lysine")));
        assert!(lines.iter().any(|l| l.starts_with("G{N+}") && l.ends_with(": Glycine")));
        assert!(!lines.iter().any(|l| l.starts_with("G{S")));
    }

    #[test]
    fn charged_symbols_share_a_column() {
        let catalog = AminoAcidCatalog::builtin().unwrap();
        let lines = symbols(&catalog, CodeWidth::ThreeLetter);
        assert!(lines.contains(&"Lys : Lysine".to_string()));
        let charged: Vec<&String> = lines.iter().filter(|l| l.contains('{')).collect();
        let column = charged[0].find(" : ").unwrap();
        assert!(charged.iter().all(|l| l.find(" : ") == Some(column)));
    }
}
