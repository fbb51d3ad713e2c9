use super::error::CatalogError;
use std::fmt;
use std::str::FromStr;

/// The protonation site a [`ChargeSetting`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChargeType {
    TerminalC,
    TerminalN,
    SideChainFree,
    SideChainBound,
    Disulfide,
}

impl ChargeType {
    pub fn code(&self) -> &'static str {
        match self {
            ChargeType::TerminalC => "TC",
            ChargeType::TerminalN => "TN",
            ChargeType::SideChainFree => "SCF",
            ChargeType::SideChainBound => "SCB",
            ChargeType::Disulfide => "SS",
        }
    }

    fn argument_prefix(&self) -> Option<char> {
        match self {
            ChargeType::TerminalC => Some('C'),
            ChargeType::TerminalN => Some('N'),
            ChargeType::SideChainFree | ChargeType::SideChainBound => Some('S'),
            ChargeType::Disulfide => None,
        }
    }
}

impl FromStr for ChargeType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TC" => Ok(ChargeType::TerminalC),
            "TN" => Ok(ChargeType::TerminalN),
            "SCF" => Ok(ChargeType::SideChainFree),
            "SCB" => Ok(ChargeType::SideChainBound),
            "SS" => Ok(ChargeType::Disulfide),
            _ => Err(CatalogError::InvalidChargeSetting {
                setting: s.to_string(),
                reason: "unknown charge type",
            }),
        }
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How a residue's side chain takes part in charging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideChainBehaviour {
    /// Free amino acid: the `SCF` setting applies.
    Free,
    /// Amino acid inside a peptide: the `SCB` setting applies.
    Bound,
    /// Side chain is not charged at all (cysteine in a disulfide bond).
    Ignore,
}

/// A single protonation equilibrium of an amino acid.
///
/// The compact textual form is `TYPE&pKs?protonated:deprotonated`, where the
/// charged state carries a trailing `+` or `-`. Disulfide settings use
/// `SS&particle?bondedParticle` and carry no pKs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeSetting {
    charge_type: ChargeType,
    pks: f64,
    protonated: String,
    deprotonated: String,
    protonated_charged: bool,
    sign: Option<char>,
}

impl ChargeSetting {
    pub fn charge_type(&self) -> ChargeType {
        self.charge_type
    }

    pub fn pks(&self) -> f64 {
        self.pks
    }

    pub fn protonated_particle(&self) -> &str {
        &self.protonated
    }

    pub fn deprotonated_particle(&self) -> &str {
        &self.deprotonated
    }

    pub fn is_protonated_charged(&self) -> bool {
        self.protonated_charged
    }

    pub fn charged_particle(&self) -> &str {
        if self.protonated_charged {
            &self.protonated
        } else {
            &self.deprotonated
        }
    }

    pub fn uncharged_particle(&self) -> &str {
        if self.protonated_charged {
            &self.deprotonated
        } else {
            &self.protonated
        }
    }

    /// Two-character charge argument (`C-`, `N+`, `S+`, ...). `None` for disulfide settings.
    pub fn argument(&self) -> Option<String> {
        let prefix = self.charge_type.argument_prefix()?;
        let sign = self.sign?;
        Some(format!("{}{}", prefix, sign))
    }

    /// Whether this site is in its charged state at the given pH.
    pub fn is_charged_at(&self, ph: f64) -> bool {
        (ph <= self.pks && self.protonated_charged) || (ph > self.pks && !self.protonated_charged)
    }

    /// Parses a `;`-separated list of settings. Empty input yields an empty list.
    pub fn parse_list(s: &str) -> Result<Vec<ChargeSetting>, CatalogError> {
        s.split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn format_list(settings: &[ChargeSetting]) -> String {
        settings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn strip_signs(particle: &str) -> String {
    particle.chars().filter(|c| *c != '+' && *c != '-').collect()
}

impl FromStr for ChargeSetting {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| CatalogError::InvalidChargeSetting {
            setting: s.to_string(),
            reason,
        };

        let (type_str, rest) = s.split_once('&').ok_or_else(|| invalid("missing '&'"))?;
        let charge_type: ChargeType = type_str.parse()?;
        let (head, tail) = rest.split_once('?').ok_or_else(|| invalid("missing '?'"))?;

        if charge_type == ChargeType::Disulfide {
            let (particle, bonded) = (head.trim(), tail.trim());
            if particle.is_empty() || bonded.is_empty() {
                return Err(invalid("empty disulfide particle"));
            }
            return Ok(Self {
                charge_type,
                pks: 0.0,
                protonated: particle.to_string(),
                deprotonated: bonded.to_string(),
                protonated_charged: false,
                sign: None,
            });
        }

        let pks: f64 = head.trim().parse().map_err(|_| invalid("pKs is not a number"))?;
        let (protonated, deprotonated) = tail
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' between states"))?;
        let (protonated, deprotonated) = (protonated.trim(), deprotonated.trim());

        let (protonated_charged, charged) = if protonated.ends_with('+') || protonated.contains('-') {
            (true, protonated)
        } else {
            (false, deprotonated)
        };
        let sign = if charged.contains('+') {
            '+'
        } else if charged.contains('-') {
            '-'
        } else {
            return Err(invalid("neither state carries a charge sign"));
        };

        let (protonated, deprotonated) = (strip_signs(protonated), strip_signs(deprotonated));
        if protonated.is_empty() || deprotonated.is_empty() {
            return Err(invalid("empty particle name"));
        }

        Ok(Self {
            charge_type,
            pks,
            protonated,
            deprotonated,
            protonated_charged,
            sign: Some(sign),
        })
    }
}

impl fmt::Display for ChargeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            None => write!(
                f,
                "{}&{}?{}",
                self.charge_type, self.protonated, self.deprotonated
            ),
            Some(sign) if self.protonated_charged => write!(
                f,
                "{}&{}?{}{}:{}",
                self.charge_type, self.pks, self.protonated, sign, self.deprotonated
            ),
            Some(sign) => write!(
                f,
                "{}&{}?{}:{}{}",
                self.charge_type, self.pks, self.protonated, self.deprotonated, sign
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deprotonated_charged_setting_parses() {
        let setting: ChargeSetting = "TC&2.34?Ct:Ctm-".parse().unwrap();
        assert_eq!(setting.charge_type(), ChargeType::TerminalC);
        assert_eq!(setting.pks(), 2.34);
        assert!(!setting.is_protonated_charged());
        assert_eq!(setting.charged_particle(), "Ctm");
        assert_eq!(setting.uncharged_particle(), "Ct");
        assert_eq!(setting.argument().as_deref(), Some("C-"));
    }

    #[test]
    fn protonated_charged_setting_parses() {
        let setting: ChargeSetting = "TN&9.69?Ntp+:Nt".parse().unwrap();
        assert!(setting.is_protonated_charged());
        assert_eq!(setting.charged_particle(), "Ntp");
        assert_eq!(setting.uncharged_particle(), "Nt");
        assert_eq!(setting.argument().as_deref(), Some("N+"));
    }

    #[test]
    fn side_chain_settings_share_argument_prefix() {
        let free: ChargeSetting = "SCF&10.53?Ksp+:Ks2".parse().unwrap();
        let bound: ChargeSetting = "SCB&10.53?Ksp+:Ks2".parse().unwrap();
        assert_eq!(free.argument(), bound.argument());
        assert_eq!(free.argument().as_deref(), Some("S+"));
    }

    #[test]
    fn disulfide_setting_has_no_argument() {
        let setting: ChargeSetting = "SS&Cs?Css".parse().unwrap();
        assert_eq!(setting.charge_type(), ChargeType::Disulfide);
        assert_eq!(setting.protonated_particle(), "Cs");
        assert_eq!(setting.deprotonated_particle(), "Css");
        assert!(setting.argument().is_none());
    }

    #[test]
    fn charged_state_follows_pks() {
        let acid: ChargeSetting = "TC&2.34?Ct:Ctm-".parse().unwrap();
        assert!(!acid.is_charged_at(2.0));
        assert!(acid.is_charged_at(7.0));

        let base: ChargeSetting = "TN&9.69?Ntp+:Nt".parse().unwrap();
        assert!(base.is_charged_at(7.0));
        assert!(base.is_charged_at(9.69));
        assert!(!base.is_charged_at(11.0));
    }

    #[test]
    fn display_reproduces_compact_form() {
        for text in ["TC&2.34?Ct:Ctm-", "TN&9.69?Ntp+:Nt", "SS&Cs?Css"] {
            let setting: ChargeSetting = text.parse().unwrap();
            assert_eq!(setting.to_string(), text);
        }
    }

    #[test]
    fn list_parsing_skips_empty_entries() {
        let settings = ChargeSetting::parse_list("TC&2.34?Ct:Ctm-;;TN&9.69?Ntp+:Nt;").unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(
            ChargeSetting::format_list(&settings),
            "TC&2.34?Ct:Ctm-;TN&9.69?Ntp+:Nt"
        );
        assert!(ChargeSetting::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn malformed_settings_are_rejected() {
        assert!("XX&1.0?A:B-".parse::<ChargeSetting>().is_err());
        assert!("TC&abc?A:B-".parse::<ChargeSetting>().is_err());
        assert!("TC&2.0?A:B".parse::<ChargeSetting>().is_err());
        assert!("TC2.0?A:B-".parse::<ChargeSetting>().is_err());
        assert!("TC&2.0?AB-".parse::<ChargeSetting>().is_err());
    }
}
