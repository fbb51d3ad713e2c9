use super::error::NotationError;
use super::validator::normalize;
use crate::core::catalog::registry::AminoAcidCatalog;

/// Characters allowed in an uncharged one letter sequence.
pub const ALLOWED_ONE_LETTER_CHARACTERS: &str = "[]*0123456789ARNDCQEGHILKMFPSTWYV";

/// Rewrites a one letter sequence with title-case three letter codes.
///
/// Codes are separated by single spaces; charge blocks stay attached to their code.
pub fn one_to_three_letter(
    catalog: &AminoAcidCatalog,
    definition: &str,
) -> Result<String, NotationError> {
    let chars = normalize(definition);
    let mut converted = String::with_capacity(chars.len() * 4);
    let mut in_charge = false;
    for (i, &c) in chars.iter().enumerate() {
        let is_last = i + 1 == chars.len();
        if c.is_alphabetic() && !in_charge {
            let code = catalog
                .one_to_three_letter(c)
                .map_err(|_| NotationError::UnknownAminoAcid(c.to_string()))?;
            converted.push_str(&code);
            if !is_last && chars[i + 1] != '{' {
                converted.push(' ');
            }
        } else {
            converted.push(c);
            match c {
                '{' => in_charge = true,
                '}' => {
                    in_charge = false;
                    if !is_last {
                        converted.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
    Ok(converted)
}

/// Rewrites a three letter sequence with one letter codes.
pub fn three_to_one_letter(
    catalog: &AminoAcidCatalog,
    definition: &str,
) -> Result<String, NotationError> {
    let chars = normalize(definition);
    let mut converted = String::with_capacity(chars.len() / 3 + 1);
    let mut in_charge = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_alphabetic() && !in_charge {
            let code: String = chars[i..(i + 3).min(chars.len())].iter().collect();
            let one_letter = catalog
                .three_to_one_letter(&code)
                .map_err(|_| NotationError::UnknownAminoAcid(code.clone()))?;
            converted.push(one_letter);
            i += 3;
            continue;
        }
        match c {
            '{' => in_charge = true,
            '}' => in_charge = false,
            _ => {}
        }
        converted.push(c);
        i += 1;
    }
    Ok(converted)
}

/// Drops all `{...}` charge blocks.
pub fn remove_one_letter_charges(definition: &str) -> String {
    let mut in_charge = false;
    definition
        .chars()
        .filter(|&c| match c {
            '{' => {
                in_charge = true;
                false
            }
            '}' => {
                in_charge = false;
                false
            }
            _ => !in_charge,
        })
        .collect()
}

pub fn has_one_letter_charge(definition: &str) -> bool {
    definition.contains('{') && definition.contains('}')
}
