use super::charge::{ChargeSetting, ChargeType, SideChainBehaviour};
use super::error::CatalogError;
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const DEFINITION_VERSION: &str = "1.0.0.0";
pub(crate) const LINE_SEPARATOR: char = '~';

const ONE_LETTER_CODES: &str = "ARNDCEQGHILKMFPSTWYV";

static THREE_LETTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z][A-Za-z]$").expect("valid three letter pattern"));
static SINGLE_PARTICLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]{0,9}$").expect("valid particle pattern"));
static SIDE_CHAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9]{0,9}\(.+\)$").expect("valid side chain pattern")
});

/// Splits a charge argument such as `S-C-N+` into its two-character parts.
///
/// Returns `None` for empty or odd-length arguments.
pub(crate) fn charge_argument_parts(argument: &str) -> Option<Vec<&str>> {
    if argument.is_empty() || argument.len() % 2 != 0 || !argument.is_ascii() {
        return None;
    }
    Some(
        (0..argument.len() / 2)
            .map(|i| &argument[i * 2..i * 2 + 2])
            .collect(),
    )
}

/// A residue template: codes, SPICES fragment and protonation behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct AminoAcid {
    name: String,                          // Full name, e.g. "Lysine"
    one_letter: char,                      // Upper-case one letter code
    three_letter: String,                  // Upper-case three letter code
    spices: String,                        // Fragment SPICES, backbone particle first
    single_particle: bool,                 // Fragment consists of the backbone particle only
    charge_settings: Vec<ChargeSetting>,   // Ordered protonation equilibria
}

impl AminoAcid {
    pub fn new(
        name: &str,
        one_letter: &str,
        three_letter: &str,
        spices: &str,
        charge_settings: Vec<ChargeSetting>,
    ) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidDefinition(
                "amino acid name is empty".to_string(),
            ));
        }

        let one_letter = one_letter.trim().to_ascii_uppercase();
        let code = match one_letter.chars().collect::<Vec<_>>().as_slice() {
            [c] if ONE_LETTER_CODES.contains(*c) => *c,
            _ => return Err(CatalogError::InvalidCode(one_letter)),
        };

        let three_letter = three_letter.trim();
        if !THREE_LETTER_PATTERN.is_match(three_letter) {
            return Err(CatalogError::InvalidCode(three_letter.to_string()));
        }

        let mut amino_acid = Self {
            name: name.to_string(),
            one_letter: code,
            three_letter: three_letter.to_ascii_uppercase(),
            spices: String::new(),
            single_particle: true,
            charge_settings,
        };
        amino_acid.set_spices(spices)?;
        Ok(amino_acid)
    }

    /// Parses a `1.0.0.0~name~one~three~spices~charges` definition line.
    pub fn from_definition(definition: &str) -> Result<Self, CatalogError> {
        let items: Vec<&str> = definition.split(LINE_SEPARATOR).collect();
        match items.as_slice() {
            [version, name, one, three, spices, charges] if *version == DEFINITION_VERSION => {
                Self::new(name, one, three, spices, ChargeSetting::parse_list(charges)?)
            }
            _ => Err(CatalogError::InvalidDefinition(definition.to_string())),
        }
    }

    pub fn definition(&self) -> String {
        [
            DEFINITION_VERSION,
            &self.name,
            &self.one_letter.to_string(),
            &self.three_letter,
            &self.spices,
            &ChargeSetting::format_list(&self.charge_settings),
        ]
        .join(&LINE_SEPARATOR.to_string())
    }

    pub fn set_spices(&mut self, spices: &str) -> Result<(), CatalogError> {
        let spices = spices.trim();
        let single_particle = SINGLE_PARTICLE_PATTERN.is_match(spices);
        if !single_particle && !SIDE_CHAIN_PATTERN.is_match(spices) {
            return Err(CatalogError::InvalidSpices(spices.to_string()));
        }
        self.spices = spices.to_string();
        self.single_particle = single_particle;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn one_letter(&self) -> char {
        self.one_letter
    }

    pub fn three_letter(&self) -> &str {
        &self.three_letter
    }

    /// Three letter code as written in sequences, e.g. `Lys`.
    pub fn three_letter_title(&self) -> String {
        let mut chars = self.three_letter.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    pub fn spices(&self) -> &str {
        &self.spices
    }

    pub fn is_single_particle(&self) -> bool {
        self.single_particle
    }

    /// The backbone forming particle, which is by definition the first one.
    pub fn backbone_particle(&self) -> &str {
        self.spices
            .split(['(', '-'])
            .next()
            .unwrap_or(self.spices.as_str())
    }

    pub fn charge_settings(&self) -> &[ChargeSetting] {
        &self.charge_settings
    }

    pub fn charge_setting(&self, charge_type: ChargeType) -> Option<&ChargeSetting> {
        self.charge_settings
            .iter()
            .find(|s| s.charge_type() == charge_type)
    }

    /// Distinct charge arguments in setting order, disulfide settings excluded.
    pub fn charge_arguments(&self) -> Vec<String> {
        let mut arguments: Vec<String> = Vec::new();
        for argument in self.charge_settings.iter().filter_map(ChargeSetting::argument) {
            if !arguments.contains(&argument) {
                arguments.push(argument);
            }
        }
        arguments
    }

    pub fn is_valid_charge_argument(&self, argument: &str) -> bool {
        match charge_argument_parts(argument) {
            Some(parts) => parts.iter().all(|part| {
                self.charge_settings
                    .iter()
                    .any(|s| s.argument().as_deref() == Some(*part))
            }),
            None => false,
        }
    }

    /// One letter code followed by the `{...}` arguments of all sites charged at `ph`.
    pub fn one_letter_code_charged(
        &self,
        ph: f64,
        behaviour: SideChainBehaviour,
        terminal_c_bound: bool,
        terminal_n_bound: bool,
    ) -> String {
        let mut code = self.one_letter.to_string();
        let mut opened = false;
        for setting in &self.charge_settings {
            let applies = match setting.charge_type() {
                ChargeType::TerminalC => !terminal_c_bound,
                ChargeType::TerminalN => !terminal_n_bound,
                ChargeType::SideChainFree => behaviour == SideChainBehaviour::Free,
                ChargeType::SideChainBound => behaviour == SideChainBehaviour::Bound,
                ChargeType::Disulfide => false,
            };
            if !applies || !setting.is_charged_at(ph) {
                continue;
            }
            if let Some(argument) = setting.argument() {
                if !opened {
                    code.push('{');
                    opened = true;
                }
                code.push_str(&argument);
            }
        }
        if opened {
            code.push('}');
        }
        code
    }

    /// Charged code of a free amino acid at the given pH.
    pub fn one_letter_code_charged_free(&self, ph: f64) -> String {
        self.one_letter_code_charged(ph, SideChainBehaviour::Free, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lysine() -> AminoAcid {
        AminoAcid::new(
            "Lysine",
            "K",
            "Lys",
            "Lys(Ks1-Ks2)",
            ChargeSetting::parse_list(
                "TC&2.18?Ct:Ctm-;TN&8.95?Ntp+:Nt;SCF&10.53?Ksp+:Ks2;SCB&10.53?Ksp+:Ks2",
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn codes_are_normalized_to_upper_case() {
        let aa = AminoAcid::new("Alanine", "a", "ala", "Ala", Vec::new()).unwrap();
        assert_eq!(aa.one_letter(), 'A');
        assert_eq!(aa.three_letter(), "ALA");
        assert_eq!(aa.three_letter_title(), "Ala");
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert!(AminoAcid::new("X", "X", "Xaa", "Xa", Vec::new()).is_err());
        assert!(AminoAcid::new("Alanine", "AA", "Ala", "Ala", Vec::new()).is_err());
        assert!(AminoAcid::new("Alanine", "A", "Al1", "Ala", Vec::new()).is_err());
    }

    #[test]
    fn spices_shape_determines_single_particle_flag() {
        let single = AminoAcid::new("Glycine", "G", "Gly", "Gly", Vec::new()).unwrap();
        assert!(single.is_single_particle());
        assert_eq!(single.backbone_particle(), "Gly");

        let branched = lysine();
        assert!(!branched.is_single_particle());
        assert_eq!(branched.backbone_particle(), "Lys");
    }

    #[test]
    fn malformed_spices_are_rejected() {
        let mut aa = lysine();
        assert!(aa.set_spices("lys(Ks1)").is_err());
        assert!(aa.set_spices("Lys-Ks1").is_err());
        assert!(aa.set_spices("Lys()").is_err());
        assert!(aa.set_spices("Lysine12345").is_err());
        assert_eq!(aa.spices(), "Lys(Ks1-Ks2)");
    }

    #[test]
    fn charge_argument_validation_uses_two_character_parts() {
        let aa = lysine();
        assert!(aa.is_valid_charge_argument("S+"));
        assert!(aa.is_valid_charge_argument("N+S+C-"));
        assert!(!aa.is_valid_charge_argument("S-"));
        assert!(!aa.is_valid_charge_argument("S+C"));
        assert!(!aa.is_valid_charge_argument(""));
    }

    #[test]
    fn charged_code_follows_ph_and_position() {
        let aa = lysine();
        assert_eq!(aa.one_letter_code_charged_free(7.0), "K{C-N+S+}");
        assert_eq!(
            aa.one_letter_code_charged(7.0, SideChainBehaviour::Bound, true, true),
            "K{S+}"
        );
        assert_eq!(
            aa.one_letter_code_charged(7.0, SideChainBehaviour::Ignore, true, true),
            "K"
        );
        assert_eq!(
            aa.one_letter_code_charged(12.0, SideChainBehaviour::Bound, false, true),
            "K{C-}"
        );
    }

    #[test]
    fn definition_round_trips() {
        let aa = lysine();
        let parsed = AminoAcid::from_definition(&aa.definition()).unwrap();
        assert_eq!(parsed, aa);
        assert!(aa.definition().starts_with("1.0.0.0~Lysine~K~LYS~Lys(Ks1-Ks2)~TC&2.18"));
    }

    #[test]
    fn charge_arguments_are_distinct() {
        assert_eq!(lysine().charge_arguments(), vec!["C-", "N+", "S+"]);
    }
}
