fn is_particle_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Byte ranges of all maximal particle-name runs in a SPICES string.
fn particle_spans(spices: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in spices.char_indices() {
        match (is_particle_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, spices.len()));
    }
    spans
}

/// Particle names appearing in a SPICES string, in textual order. Bond indices are skipped.
pub fn particle_names(spices: &str) -> impl Iterator<Item = &str> {
    particle_spans(spices)
        .into_iter()
        .map(move |(start, end)| &spices[start..end])
        .filter(|name| name.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn replace_spans(spices: &str, from: &str, to: &str, limit: usize) -> String {
    let mut result = String::with_capacity(spices.len());
    let mut cursor = 0;
    let mut replaced = 0;
    for (start, end) in particle_spans(spices) {
        if replaced == limit {
            break;
        }
        if &spices[start..end] == from {
            result.push_str(&spices[cursor..start]);
            result.push_str(to);
            cursor = end;
            replaced += 1;
        }
    }
    result.push_str(&spices[cursor..]);
    result
}

/// Replaces every whole particle named `from` with `to`.
///
/// Particles are matched as complete names, so replacing `Cs` leaves `Csm` untouched.
pub fn replace_particle(spices: &str, from: &str, to: &str) -> String {
    replace_spans(spices, from, to, usize::MAX)
}

/// Replaces the first whole particle named `from` with `to`.
pub fn replace_first_particle(spices: &str, from: &str, to: &str) -> String {
    replace_spans(spices, from, to, 1)
}

/// Splits a SPICES string into its particle tokens.
///
/// Group brackets and branch closings are dropped; `[n]` markers stay attached to
/// their particle.
pub fn split_particles(spices: &str) -> Vec<&str> {
    spices
        .split(['<', '>', '-', '(', ')', '\n'])
        .filter(|token| !token.is_empty())
        .collect()
}

/// Strips `[n]` bond markers from a particle token.
pub fn strip_markers(token: &str) -> &str {
    match token.find('[') {
        Some(i) => &token[..i],
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_matches_whole_names_only() {
        assert_eq!(replace_particle("Cys(Csm)-Cs", "Cs", "Css"), "Cys(Csm)-Css");
        assert_eq!(replace_particle("Cs-Cs", "Cs", "Css"), "Css-Css");
    }

    #[test]
    fn replace_first_stops_after_one_match() {
        assert_eq!(replace_first_particle("Ala\n-Ala", "Ala", "Pb"), "Pb\n-Ala");
        assert_eq!(replace_first_particle("Gly", "Ala", "Pb"), "Gly");
    }

    #[test]
    fn split_drops_structure_characters() {
        assert_eq!(
            split_particles("<Nt(Ks1-Ks2)\n-Cys(Css[1])-Ct>"),
            vec!["Nt", "Ks1", "Ks2", "Cys", "Css[1]", "Ct"]
        );
    }

    #[test]
    fn particle_names_skip_bond_indices() {
        let names: Vec<&str> = particle_names("Cys(Css[12])-Ct").collect();
        assert_eq!(names, vec!["Cys", "Css", "Ct"]);
    }

    #[test]
    fn markers_are_stripped() {
        assert_eq!(strip_markers("Css[12]"), "Css");
        assert_eq!(strip_markers("Ala"), "Ala");
    }
}
