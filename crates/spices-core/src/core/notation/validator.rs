use super::error::NotationError;
use crate::core::catalog::amino_acid::AminoAcid;
use crate::core::catalog::registry::AminoAcidCatalog;
use std::collections::BTreeMap;

/// Width of the amino acid codes in a peptide sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidth {
    OneLetter,
    ThreeLetter,
}

impl CodeWidth {
    pub fn len(self) -> usize {
        match self {
            CodeWidth::OneLetter => 1,
            CodeWidth::ThreeLetter => 3,
        }
    }
}

/// Upper-cases a sequence and drops all whitespace.
pub(crate) fn normalize(definition: &str) -> Vec<char> {
    definition
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

pub(crate) fn code_at<'a>(
    catalog: &'a AminoAcidCatalog,
    chars: &[char],
    index: usize,
    width: CodeWidth,
) -> Option<&'a AminoAcid> {
    match width {
        CodeWidth::OneLetter => chars
            .get(index)
            .filter(|c| c.is_ascii_alphabetic())
            .and_then(|c| catalog.by_one_letter(*c)),
        CodeWidth::ThreeLetter => {
            let code: String = chars.get(index..index + 3)?.iter().collect();
            catalog.by_three_letter(&code)
        }
    }
}

/// Start index of the last amino acid code outside of charge blocks.
fn last_code_index(chars: &[char], width: CodeWidth) -> usize {
    let mut last = 0;
    let mut i = 0;
    let mut in_charge = false;
    while i < chars.len() {
        match chars[i] {
            '{' => in_charge = true,
            '}' => in_charge = false,
            c if c.is_alphabetic() && !in_charge => {
                last = i;
                i += width.len();
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    last
}

/// Checks a peptide sequence and reports the first error found.
///
/// The grammar is `Digits? Code {Args}? ([n] | [*])*` per residue. Disulfide bond
/// markers `[n]` must follow a cysteine and each index must occur exactly twice.
/// Ring closures `[*]` may only follow the first or the last residue and must occur
/// zero or two times. An empty sequence is valid.
pub fn validate(
    catalog: &AminoAcidCatalog,
    definition: &str,
    width: CodeWidth,
) -> Result<(), NotationError> {
    let chars = normalize(definition);
    if chars.is_empty() {
        return Ok(());
    }
    let n = chars.len();
    let last_code = last_code_index(&chars, width);

    let mut ring_closures = 0usize;
    let mut bonds: BTreeMap<u32, usize> = BTreeMap::new();
    let mut first = true;
    let mut i = 0;

    while i < n {
        while i < n && chars[i].is_ascii_digit() {
            i += 1;
        }
        let amino_acid =
            code_at(catalog, &chars, i, width).ok_or(NotationError::Syntax { position: i + 1 })?;
        i += width.len();
        if i >= n {
            break;
        }
        if chars[i].is_ascii_digit() || code_at(catalog, &chars, i, width).is_some() {
            first = false;
            continue;
        }
        if chars[i] != '[' && chars[i] != '{' {
            return Err(NotationError::Syntax { position: i + 1 });
        }

        let mut directly_after_code = true;
        while i < n && (chars[i] == '[' || chars[i] == '{') {
            if chars[i] == '[' {
                i += 1;
                match chars.get(i).copied() {
                    Some(digit) if digit.is_ascii_digit() => {
                        if amino_acid.one_letter() != 'C' {
                            return Err(NotationError::IncorrectDisulfideBondDefinition {
                                position: i + 1,
                            });
                        }
                        let index = digit.to_digit(10).unwrap_or_default();
                        *bonds.entry(index).or_default() += 1;
                        i += 1;
                        if chars.get(i) != Some(&']') {
                            return Err(NotationError::Syntax { position: i + 1 });
                        }
                        i += 1;
                    }
                    Some('*') => {
                        if !first && i < last_code {
                            return Err(NotationError::IllegalRingClosure { position: i + 1 });
                        }
                        i += 1;
                        if chars.get(i) != Some(&']') {
                            return Err(NotationError::Syntax { position: i + 1 });
                        }
                        ring_closures += 1;
                        i += 1;
                    }
                    _ => return Err(NotationError::Syntax { position: i + 1 }),
                }
            } else {
                if !directly_after_code {
                    return Err(NotationError::Syntax { position: i + 1 });
                }
                let close = chars[i + 1..]
                    .iter()
                    .position(|c| *c == '}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(NotationError::Syntax { position: n + 1 })?;
                let argument: String = chars[i + 1..close].iter().collect();
                if !amino_acid.is_valid_charge_argument(&argument) {
                    return Err(NotationError::IncorrectChargeArgument(argument));
                }
                i = close + 1;
            }
            directly_after_code = false;
        }
        first = false;
    }

    if ring_closures != 0 && ring_closures != 2 {
        return Err(NotationError::IllegalNumberOfRingClosures {
            count: ring_closures,
        });
    }
    if let Some((&index, _)) = bonds.iter().find(|(_, count)| **count != 2) {
        return Err(NotationError::IncorrectDisulfideBondCount { index });
    }
    Ok(())
}

/// Message form of [`validate`]: empty on success, the error text otherwise.
pub fn check_definition(catalog: &AminoAcidCatalog, definition: &str, width: CodeWidth) -> String {
    match validate(catalog, definition, width) {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AminoAcidCatalog {
        AminoAcidCatalog::builtin().unwrap()
    }

    fn one(definition: &str) -> Result<(), NotationError> {
        validate(&catalog(), definition, CodeWidth::OneLetter)
    }

    fn three(definition: &str) -> Result<(), NotationError> {
        validate(&catalog(), definition, CodeWidth::ThreeLetter)
    }

    #[test]
    fn empty_and_plain_sequences_are_valid() {
        assert!(one("").is_ok());
        assert!(one("   ").is_ok());
        assert!(one("ACDEFGHIKLMNPQRSTVWY").is_ok());
        assert!(one("a c d").is_ok());
        assert!(one("3A2GK").is_ok());
    }

    #[test]
    fn paired_disulfide_bonds_are_valid() {
        assert!(one("AC[1]GC[1]").is_ok());
        assert!(one("C[1]C[2]GC[2]C[1]").is_ok());
        assert_eq!(check_definition(&catalog(), "AC[1]GC[1]", CodeWidth::OneLetter), "");
    }

    #[test]
    fn unpaired_disulfide_bond_reports_lowest_index() {
        assert!(matches!(
            one("AC[1]GC[2]"),
            Err(NotationError::IncorrectDisulfideBondCount { index: 1 })
        ));
        assert!(matches!(
            one("C[3]C[3]C[3]"),
            Err(NotationError::IncorrectDisulfideBondCount { index: 3 })
        ));
    }

    #[test]
    fn disulfide_bond_requires_cysteine() {
        assert!(matches!(
            one("AG[1]C[1]"),
            Err(NotationError::IncorrectDisulfideBondDefinition { position: 4 })
        ));
        assert!(one("C{S-}[1]AC[1]").is_ok());
    }

    #[test]
    fn ring_closure_count_must_be_zero_or_two() {
        assert!(one("A[*]GKA[*]").is_ok());
        assert!(matches!(
            one("A[*]GKA"),
            Err(NotationError::IllegalNumberOfRingClosures { count: 1 })
        ));
    }

    #[test]
    fn ring_closure_only_at_ends() {
        assert!(matches!(
            one("AG[*]KA[*]"),
            Err(NotationError::IllegalRingClosure { position: 4 })
        ));
    }

    #[test]
    fn charge_arguments_are_checked_per_residue() {
        assert!(one("K{S+}D{S-}").is_ok());
        assert!(one("A{N+}GK{C-}").is_ok());
        assert!(matches!(
            one("A{S+}G"),
            Err(NotationError::IncorrectChargeArgument(arg)) if arg == "S+"
        ));
        assert!(matches!(one("K{S+"), Err(NotationError::Syntax { .. })));
    }

    #[test]
    fn syntax_errors_carry_positions() {
        assert!(matches!(one("AXG"), Err(NotationError::Syntax { position: 2 })));
        assert!(matches!(one("3"), Err(NotationError::Syntax { position: 2 })));
        assert!(matches!(one("C[1"), Err(NotationError::Syntax { position: 4 })));
        assert!(matches!(one("C[x]"), Err(NotationError::Syntax { position: 3 })));
        assert!(matches!(one("A]"), Err(NotationError::Syntax { position: 2 })));
    }

    #[test]
    fn three_letter_sequences_are_validated() {
        assert!(three("Ala Cys[1] Gly Cys[1]").is_ok());
        assert!(three("2Ala Lys{S+}").is_ok());
        assert!(matches!(three("Ala Xyz"), Err(NotationError::Syntax { position: 4 })));
        assert!(matches!(
            three("Ala[1]Cys[1]"),
            Err(NotationError::IncorrectDisulfideBondDefinition { .. })
        ));
    }
}
