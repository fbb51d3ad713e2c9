use super::builder::SpicesBuilder;
use super::error::NotationError;
use super::validator::{CodeWidth, code_at, normalize};
use crate::core::catalog::amino_acid::{AminoAcid, charge_argument_parts};
use crate::core::catalog::charge::{ChargeSetting, ChargeType};
use crate::core::catalog::error::CatalogError;
use crate::core::catalog::registry::AminoAcidCatalog;
use crate::core::utils::particles::replace_first_particle;

/// Position of a residue occurrence within the expanded sequence.
#[derive(Debug, Clone, Copy)]
struct Placement {
    first: bool,
    last: bool,
    disulfide: bool,
    circular: bool,
}

fn terminal_setting<'a>(
    amino_acid: &'a AminoAcid,
    charge_type: ChargeType,
) -> Result<&'a ChargeSetting, CatalogError> {
    amino_acid
        .charge_setting(charge_type)
        .ok_or_else(|| CatalogError::MissingChargeSetting {
            amino_acid: amino_acid.name().to_string(),
            charge_type: charge_type.code(),
        })
}

/// Fragment text of one residue occurrence and the length of its terminal tail.
fn residue_fragment(
    catalog: &AminoAcidCatalog,
    amino_acid: &AminoAcid,
    argument: Option<&str>,
    at: Placement,
) -> Result<(String, usize), NotationError> {
    let mut fragment = match argument {
        Some(argument) => {
            catalog.charged_spices(amino_acid, argument, at.first, at.last, at.disulfide)?
        }
        None if at.disulfide => catalog.spices_in_disulfide_bond(amino_acid.spices())?,
        None => amino_acid.spices().to_string(),
    };

    let mut tail_len = 0;
    if let Some(argument) = argument {
        if let Some(setting) = amino_acid.charge_setting(ChargeType::TerminalC) {
            let charged_c = setting.argument().is_some_and(|tc| {
                charge_argument_parts(argument).is_some_and(|parts| parts.contains(&tc.as_str()))
            });
            if charged_c {
                tail_len = 1 + setting.charged_particle().len();
            }
        }
    }

    if at.first && !at.circular && argument.is_none_or(|a| !a.contains('N')) {
        let n_terminal = terminal_setting(amino_acid, ChargeType::TerminalN)?.uncharged_particle();
        fragment = if amino_acid.is_single_particle() {
            format!("{}-{}", n_terminal, fragment)
        } else {
            replace_first_particle(&fragment, amino_acid.backbone_particle(), n_terminal)
        };
    }
    if at.last && !at.circular && argument.is_none_or(|a| !a.contains('C')) {
        let c_terminal = terminal_setting(amino_acid, ChargeType::TerminalC)?.uncharged_particle();
        fragment.push('-');
        fragment.push_str(c_terminal);
        tail_len = 1 + c_terminal.len();
    }
    Ok((fragment, tail_len))
}

/// Whether the residue at `index` carries a `[n]` disulfide marker, possibly after
/// a charge block and a ring closure.
fn is_disulfide_bonded(chars: &[char], index: usize) -> bool {
    let mut j = index + 1;
    if chars.get(j) == Some(&'{') {
        match chars[j..].iter().position(|c| *c == '}') {
            Some(offset) => j += offset + 1,
            None => return false,
        }
    }
    if chars.get(j..j + 3) == Some(&['[', '*', ']'][..]) {
        j += 3;
    }
    chars.get(j) == Some(&'[') && chars.get(j + 1).is_some_and(|c| *c != '*')
}

fn read_number(chars: &[char], start: usize) -> Option<(u32, usize)> {
    let end = chars[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |offset| start + offset);
    let digits: String = chars[start..end].iter().collect();
    digits.parse().ok().map(|value| (value, end))
}

/// Converts a one letter peptide sequence into fragment based SPICES.
///
/// Each residue becomes its catalog fragment, linked by `-`. Frequency prefixes
/// are expanded. A `{...}` block selects the charged fragment. A `[n]` marker
/// selects the disulfide variant and is carried over into the SPICES on the
/// residue's last side chain particle. A ring closure `[*]` is emitted as a
/// fresh ring index on the backbone particle. Linear peptides get the uncharged
/// N- and C-terminal particles unless the terminal residues state them
/// explicitly. With `line_breaks`, every residue but the last ends with `\n`.
pub fn one_letter_to_spices(
    catalog: &AminoAcidCatalog,
    definition: &str,
    line_breaks: bool,
) -> Result<String, NotationError> {
    if !catalog.is_complete() {
        return Err(NotationError::MissingAminoAcidData {
            found: catalog.len(),
        });
    }
    let chars = normalize(definition);
    let n = chars.len();
    let circular = definition.contains("[*]");

    let mut last_code = 0;
    let mut in_charge = false;
    for (i, c) in chars.iter().enumerate() {
        match c {
            '{' => in_charge = true,
            '}' => in_charge = false,
            c if c.is_alphabetic() && !in_charge => last_code = i,
            _ => {}
        }
    }

    let mut free_ring = 0;
    let mut i = 0;
    while i + 1 < n {
        if chars[i] == '[' && chars[i + 1] != '*' {
            if let Some((index, end)) = read_number(&chars, i + 1) {
                free_ring = free_ring.max(index);
                i = end;
                continue;
            }
        }
        i += 1;
    }
    free_ring += 1;

    let mut builder = SpicesBuilder::new();
    let mut first = true;
    let mut i = 0;
    while i < n {
        let mut frequency = 1;
        if chars[i].is_ascii_digit() {
            let (value, end) =
                read_number(&chars, i).ok_or(NotationError::Syntax { position: i + 1 })?;
            if value == 0 {
                return Err(NotationError::Syntax { position: i + 1 });
            }
            frequency = value;
            i = end;
        }

        if let Some(amino_acid) = code_at(catalog, &chars, i, CodeWidth::OneLetter) {
            let code_index = i;
            let disulfide = is_disulfide_bonded(&chars, code_index);
            i += 1;
            let mut argument: Option<String> = None;
            if chars.get(i) == Some(&'{') {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == '}')
                    .map(|offset| i + offset)
                    .ok_or(NotationError::Syntax { position: n + 1 })?;
                argument = Some(chars[i + 1..close].iter().collect());
                i = close + 1;
            }

            for repeat in 0..frequency {
                let last = code_index == last_code && repeat == frequency - 1;
                let placement = Placement {
                    first,
                    last,
                    disulfide,
                    circular,
                };
                let (fragment, tail_len) =
                    residue_fragment(catalog, amino_acid, argument.as_deref(), placement)?;
                builder.push_fragment(&fragment, tail_len);
                first = false;
                if line_breaks && !last {
                    builder.push_line_break();
                }
                if repeat + 1 < frequency {
                    builder.push_link();
                }
            }
        } else if chars.get(i) == Some(&'[') {
            if chars.get(i + 1) == Some(&'*') {
                if chars.get(i + 2) != Some(&']') || !builder.insert_ring_closure(free_ring) {
                    return Err(NotationError::Syntax { position: i + 1 });
                }
                i += 3;
            } else {
                let (index, end) = read_number(&chars, i + 1)
                    .ok_or(NotationError::Syntax { position: i + 2 })?;
                if chars.get(end) != Some(&']') || !builder.insert_bond(index) {
                    return Err(NotationError::Syntax { position: end + 1 });
                }
                i = end + 1;
            }
        } else {
            return Err(NotationError::Syntax { position: i + 1 });
        }

        if i < n
            && (chars[i].is_ascii_digit()
                || code_at(catalog, &chars, i, CodeWidth::OneLetter).is_some())
        {
            builder.push_link();
        }
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::particles::split_particles;

    fn catalog() -> AminoAcidCatalog {
        AminoAcidCatalog::builtin().unwrap()
    }

    fn convert(definition: &str) -> String {
        one_letter_to_spices(&catalog(), definition, false).unwrap()
    }

    #[test]
    fn linear_peptide_gets_terminal_particles() {
        assert_eq!(convert("AG"), "Nt-Ala-Gly-Ct");
        assert_eq!(convert("KA"), "Nt(Ks1-Ks2)-Ala-Ct");
    }

    #[test]
    fn line_breaks_separate_residues() {
        assert_eq!(
            one_letter_to_spices(&catalog(), "AGK", true).unwrap(),
            "Nt-Ala\n-Gly\n-Lys(Ks1-Ks2)-Ct"
        );
    }

    #[test]
    fn frequency_expands_like_repetition() {
        assert_eq!(convert("3A"), convert("AAA"));
        assert_eq!(convert("G2KG"), convert("GKKG"));
        let expanded = convert("3A");
        assert_eq!(expanded, "Nt-Ala-Ala-Ala-Ct");
        assert_eq!(expanded.matches("Nt").count(), 1);
        assert_eq!(expanded.matches("Ct").count(), 1);
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert!(matches!(
            one_letter_to_spices(&catalog(), "0A", false),
            Err(NotationError::Syntax { position: 1 })
        ));
    }

    #[test]
    fn charge_blocks_select_charged_fragments() {
        assert_eq!(convert("K{N+S+}GD{S-C-}"), "Ntp(Ks1-Ksp)-Gly-Asp(Adm)-Ctm");
    }

    #[test]
    fn disulfide_bonds_mark_sulfur_particles() {
        assert_eq!(
            convert("AC[1]GC[1]"),
            "Nt-Ala-Cys(Css[1])-Gly-Cys(Css[1])-Ct"
        );
        assert_eq!(
            convert("C{S-}[1]AC[1]"),
            "Nt(Csm[1])-Ala-Cys(Css[1])-Ct"
        );
    }

    #[test]
    fn ring_closure_uses_next_free_index() {
        assert_eq!(convert("A[*]GK[*]"), "Ala[1]-Gly-Lys[1](Ks1-Ks2)");
        assert_eq!(
            convert("C[1][*]AC[1][*]"),
            "Cys[2](Css[1])-Ala-Cys[2](Css[1])"
        );
    }

    #[test]
    fn ring_closure_with_line_breaks_stays_before_break() {
        assert_eq!(
            one_letter_to_spices(&catalog(), "A[*]GA[*]", true).unwrap(),
            "Ala[1]\n-Gly\n-Ala[1]"
        );
    }

    #[test]
    fn incomplete_catalog_is_rejected() {
        let mut catalog = AminoAcidCatalog::new();
        catalog
            .add(AminoAcid::new("Alanine", "A", "Ala", "Ala", Vec::new()).unwrap())
            .unwrap();
        assert!(matches!(
            one_letter_to_spices(&catalog, "A", false),
            Err(NotationError::MissingAminoAcidData { found: 1 })
        ));
    }

    #[test]
    fn particle_count_matches_expansion() {
        let converted = convert("2K3G");
        let particles = split_particles(&converted);
        assert_eq!(particles.len(), 2 * 3 + 3 + 1);
    }

    #[test]
    fn unknown_code_is_a_syntax_error() {
        assert!(matches!(
            one_letter_to_spices(&catalog(), "AXG", false),
            Err(NotationError::Syntax { position: 2 })
        ));
    }
}
