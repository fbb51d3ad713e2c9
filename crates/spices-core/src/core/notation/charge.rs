use super::convert::{has_one_letter_charge, remove_one_letter_charges};
use super::error::NotationError;
use super::validator::normalize;
use crate::core::catalog::charge::SideChainBehaviour;
use crate::core::catalog::registry::AminoAcidCatalog;

/// A residue with its frequency prefix and the markers that follow it.
#[derive(Debug)]
struct Token {
    frequency: Option<u32>,
    code: char,
    trailing: String,
}

fn tokenize(chars: &[char]) -> Result<Vec<Token>, NotationError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut digits = String::new();
    let mut in_bracket = false;
    for (i, &c) in chars.iter().enumerate() {
        if in_bracket || c == '[' || c == ']' {
            in_bracket = c != ']';
            match tokens.last_mut() {
                Some(token) => token.trailing.push(c),
                None => return Err(NotationError::Syntax { position: i + 1 }),
            }
        } else if c.is_ascii_digit() {
            digits.push(c);
        } else {
            let frequency = if digits.is_empty() {
                None
            } else {
                Some(
                    digits
                        .parse()
                        .map_err(|_| NotationError::Syntax { position: i + 1 })?,
                )
            };
            digits.clear();
            tokens.push(Token {
                frequency,
                code: c,
                trailing: String::new(),
            });
        }
    }
    if !digits.is_empty() {
        return Err(NotationError::Syntax {
            position: chars.len() + 1,
        });
    }
    Ok(tokens)
}

fn push_count(out: &mut String, count: u32) {
    if count > 1 {
        out.push_str(&count.to_string());
    }
}

/// Splits the outermost occurrences off terminal frequency groups, so that only
/// they receive terminal charges: `3A` becomes `AAA`, `4AG` becomes `A3AG` and
/// `G4A` becomes `G3AA`.
fn separate_terminal_repeats(tokens: &[Token]) -> String {
    let mut out = String::new();
    let last = tokens.len().saturating_sub(1);
    for (index, token) in tokens.iter().enumerate() {
        let code = token.code;
        match token.frequency {
            Some(f) if f > 1 && index == 0 && index == last => {
                out.push(code);
                if f > 2 {
                    push_count(&mut out, f - 2);
                    out.push(code);
                }
                out.push(code);
            }
            Some(f) if f > 1 && index == 0 => {
                out.push(code);
                push_count(&mut out, f - 1);
                out.push(code);
            }
            Some(f) if f > 1 && index == last => {
                push_count(&mut out, f - 1);
                out.push(code);
                out.push(code);
            }
            Some(f) if index != 0 && index != last => {
                out.push_str(&f.to_string());
                out.push(code);
            }
            _ => out.push(code),
        }
        out.push_str(&token.trailing);
    }
    out
}

/// Annotates every residue with the charge arguments valid at `ph`.
///
/// Existing charge blocks are dropped first. Side chains are charged as peptide
/// bound unless a cysteine is followed by a bracket marker. A linear peptide's
/// first residue also receives its N-terminal state and its last residue its
/// C-terminal state. A single residue is charged as a free amino acid.
///
/// Terminal frequency groups are split, so stripping the charges from the
/// result can yield `AA` where the input read `2A`.
pub fn charge_one_letter_peptide(
    catalog: &AminoAcidCatalog,
    definition: &str,
    ph: f64,
    circular: bool,
) -> Result<String, NotationError> {
    let uncharged = if has_one_letter_charge(definition) {
        remove_one_letter_charges(definition)
    } else {
        definition.to_string()
    };
    let chars = normalize(&uncharged);
    if chars.is_empty() {
        return Ok(String::new());
    }
    if chars.len() == 1 {
        let amino_acid = catalog
            .by_one_letter(chars[0])
            .ok_or_else(|| NotationError::UnknownAminoAcid(chars[0].to_string()))?;
        return Ok(amino_acid.one_letter_code_charged_free(ph));
    }

    let rewritten: Vec<char> = separate_terminal_repeats(&tokenize(&chars)?)
        .chars()
        .collect();
    let last_code = rewritten
        .iter()
        .rposition(|c| c.is_alphabetic())
        .unwrap_or_default();

    let mut charged = String::with_capacity(rewritten.len() * 4);
    let mut first = true;
    let mut in_bracket = false;
    for (i, &c) in rewritten.iter().enumerate() {
        if c == '[' {
            in_bracket = true;
        } else if c == ']' {
            in_bracket = false;
        }
        if in_bracket || !c.is_alphabetic() {
            charged.push(c);
            continue;
        }
        let amino_acid = catalog
            .by_one_letter(c)
            .ok_or(NotationError::Syntax { position: i + 1 })?;
        let behaviour = if c == 'C' && rewritten.get(i + 1) == Some(&'[') {
            SideChainBehaviour::Ignore
        } else {
            SideChainBehaviour::Bound
        };
        let code = if first && !circular {
            first = false;
            amino_acid.one_letter_code_charged(ph, behaviour, true, false)
        } else if i == last_code && !circular {
            amino_acid.one_letter_code_charged(ph, behaviour, false, true)
        } else {
            amino_acid.one_letter_code_charged(ph, behaviour, true, true)
        };
        charged.push_str(&code);
    }
    Ok(charged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> AminoAcidCatalog {
        AminoAcidCatalog::builtin().unwrap()
    }

    fn charge(definition: &str, ph: f64) -> String {
        charge_one_letter_peptide(&catalog(), definition, ph, false).unwrap()
    }

    #[test]
    fn single_residue_is_charged_as_free_amino_acid() {
        assert_eq!(charge("K", 7.0), "K{C-N+S+}");
        assert_eq!(charge("G", 7.0), "G{C-N+}");
        assert_eq!(charge("G", 1.0), "G{N+}");
    }

    #[test]
    fn terminal_states_only_at_peptide_ends() {
        assert_eq!(charge("KGD", 7.0), "K{N+S+}GD{C-S-}");
        assert_eq!(charge("AGA", 12.0), "AGA{C-}");
    }

    #[test]
    fn circular_peptide_has_no_terminal_states() {
        let charged = charge_one_letter_peptide(&catalog(), "K[*]GD[*]", 7.0, true).unwrap();
        assert_eq!(charged, "K{S+}[*]GD{S-}[*]");
    }

    #[test]
    fn bonded_cysteine_keeps_neutral_side_chain() {
        assert_eq!(charge("AC[1]GC[1]C", 10.0), "AC[1]GC[1]C{C-S-}");
    }

    #[test]
    fn existing_charges_are_replaced() {
        assert_eq!(charge("K{C-}G{S+}D", 7.0), charge("KGD", 7.0));
    }

    #[test]
    fn interior_frequencies_are_kept() {
        assert_eq!(charge("G3KG", 7.0), "G{N+}3K{S+}G{C-}");
    }

    #[test]
    fn terminal_frequencies_are_split() {
        assert_eq!(
            remove_one_letter_charges(&charge("3AG4K", 7.0)),
            "A2AG3KK"
        );
        assert_eq!(remove_one_letter_charges(&charge("4K", 7.0)), "K2KK");
        assert_eq!(remove_one_letter_charges(&charge("2K", 7.0)), "KK");
    }

    #[test]
    fn charge_removal_restores_plain_sequences() {
        for sequence in ["ACDEFGHIKLMNPQRSTVWY", "KG3DK", "AC[1]GC[1]"] {
            for ph in [1.0, 7.0, 13.0] {
                assert_eq!(remove_one_letter_charges(&charge(sequence, ph)), sequence);
            }
        }
    }

    #[test]
    fn empty_sequence_stays_empty() {
        assert_eq!(charge("", 7.0), "");
    }
}
