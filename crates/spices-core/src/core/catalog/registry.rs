use super::amino_acid::{AminoAcid, DEFINITION_VERSION, charge_argument_parts};
use super::charge::{ChargeSetting, ChargeType};
use super::error::CatalogError;
use crate::core::utils::particles::{particle_names, replace_particle};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../../../data/amino_acids.toml");
const DEFINITION_SEPARATOR: char = '|';
const STANDARD_AMINO_ACID_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    version: Option<String>,
    residues: Vec<ResidueEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ResidueEntry {
    name: String,
    one_letter: String,
    three_letter: String,
    spices: String,
    #[serde(default)]
    charges: String,
}

/// The set of amino acid templates used by all conversions.
///
/// A catalog is an ordinary value: build one with [`AminoAcidCatalog::builtin`],
/// [`AminoAcidCatalog::load`] or [`AminoAcidCatalog::from_definition`] and hand it
/// (usually behind an `Arc`) to the converters that need it.
#[derive(Debug, Clone, Default)]
pub struct AminoAcidCatalog {
    amino_acids: Vec<AminoAcid>,
    by_one_letter: HashMap<char, usize>,
    by_three_letter: HashMap<String, usize>,
}

impl AminoAcidCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The embedded default catalog of the 20 standard amino acids.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG, "<builtin>")
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    fn from_toml_str(content: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| CatalogError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        if let Some(version) = &file.version {
            if version != DEFINITION_VERSION {
                return Err(CatalogError::InvalidDefinition(format!(
                    "unsupported catalog version '{}'",
                    version
                )));
            }
        }

        let mut catalog = Self::new();
        for entry in file.residues {
            let settings = ChargeSetting::parse_list(&entry.charges)?;
            catalog.add(AminoAcid::new(
                &entry.name,
                &entry.one_letter,
                &entry.three_letter,
                &entry.spices,
                settings,
            )?)?;
        }
        debug!(
            "Loaded amino acid catalog from {} with {} residues.",
            origin,
            catalog.len()
        );
        Ok(catalog)
    }

    /// Parses the legacy `1.0.0.0|<residue>|<residue>...` catalog definition.
    pub fn from_definition(definition: &str) -> Result<Self, CatalogError> {
        let mut items = definition.trim().split(DEFINITION_SEPARATOR);
        if items.next() != Some(DEFINITION_VERSION) {
            return Err(CatalogError::InvalidDefinition(
                "catalog definition has no supported version prefix".to_string(),
            ));
        }
        let mut catalog = Self::new();
        for item in items.filter(|item| !item.trim().is_empty()) {
            catalog.add(AminoAcid::from_definition(item.trim())?)?;
        }
        Ok(catalog)
    }

    pub fn definition(&self) -> String {
        std::iter::once(DEFINITION_VERSION.to_string())
            .chain(self.amino_acids.iter().map(AminoAcid::definition))
            .collect::<Vec<_>>()
            .join(&DEFINITION_SEPARATOR.to_string())
    }

    pub fn add(&mut self, amino_acid: AminoAcid) -> Result<(), CatalogError> {
        if self.by_one_letter.contains_key(&amino_acid.one_letter())
            || self.by_three_letter.contains_key(amino_acid.three_letter())
        {
            return Err(CatalogError::InvalidDefinition(format!(
                "duplicate amino acid code {} / {}",
                amino_acid.one_letter(),
                amino_acid.three_letter()
            )));
        }
        let index = self.amino_acids.len();
        self.by_one_letter.insert(amino_acid.one_letter(), index);
        self.by_three_letter
            .insert(amino_acid.three_letter().to_string(), index);
        self.amino_acids.push(amino_acid);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.amino_acids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amino_acids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AminoAcid> {
        self.amino_acids.iter()
    }

    /// True when all 20 standard amino acids are defined.
    pub fn is_complete(&self) -> bool {
        self.amino_acids.len() == STANDARD_AMINO_ACID_COUNT
    }

    pub fn is_only_single_particle(&self) -> bool {
        self.amino_acids.iter().all(AminoAcid::is_single_particle)
    }

    pub fn by_one_letter(&self, code: char) -> Option<&AminoAcid> {
        self.by_one_letter
            .get(&code.to_ascii_uppercase())
            .map(|&i| &self.amino_acids[i])
    }

    pub fn by_three_letter(&self, code: &str) -> Option<&AminoAcid> {
        self.by_three_letter
            .get(&code.trim().to_ascii_uppercase())
            .map(|&i| &self.amino_acids[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&AminoAcid> {
        self.amino_acids.iter().find(|aa| aa.name() == name)
    }

    pub fn require_one_letter(&self, code: char) -> Result<&AminoAcid, CatalogError> {
        self.by_one_letter(code)
            .ok_or_else(|| CatalogError::UnknownAminoAcid(code.to_string()))
    }

    pub fn require_three_letter(&self, code: &str) -> Result<&AminoAcid, CatalogError> {
        self.by_three_letter(code)
            .ok_or_else(|| CatalogError::UnknownAminoAcid(code.to_string()))
    }

    pub fn is_one_letter_code(&self, code: char) -> bool {
        self.by_one_letter(code).is_some()
    }

    pub fn is_three_letter_code(&self, code: &str) -> bool {
        self.by_three_letter(code).is_some()
    }

    /// One letter code to title-case three letter code, e.g. `K` to `Lys`.
    pub fn one_to_three_letter(&self, code: char) -> Result<String, CatalogError> {
        Ok(self.require_one_letter(code)?.three_letter_title())
    }

    pub fn three_to_one_letter(&self, code: &str) -> Result<char, CatalogError> {
        Ok(self.require_three_letter(code)?.one_letter())
    }

    pub fn set_spices(&mut self, name: &str, spices: &str) -> Result<(), CatalogError> {
        let amino_acid = self
            .amino_acids
            .iter_mut()
            .find(|aa| aa.name() == name)
            .ok_or_else(|| CatalogError::UnknownAminoAcid(name.to_string()))?;
        amino_acid.set_spices(spices)
    }

    /// All particle names used by fragments and charge settings, sorted.
    pub fn used_particles(&self) -> BTreeSet<String> {
        let mut particles = BTreeSet::new();
        for amino_acid in &self.amino_acids {
            particles.extend(particle_names(amino_acid.spices()).map(str::to_string));
            for setting in amino_acid.charge_settings() {
                particles.insert(setting.protonated_particle().to_string());
                particles.insert(setting.deprotonated_particle().to_string());
            }
        }
        particles
    }

    fn disulfide_setting(&self) -> Result<&ChargeSetting, CatalogError> {
        let cysteine = self.require_one_letter('C')?;
        cysteine
            .charge_setting(ChargeType::Disulfide)
            .ok_or_else(|| CatalogError::MissingChargeSetting {
                amino_acid: cysteine.name().to_string(),
                charge_type: ChargeType::Disulfide.code(),
            })
    }

    /// Exchanges the cysteine sulfur particle for its disulfide-bonded variant.
    pub fn spices_in_disulfide_bond(&self, spices: &str) -> Result<String, CatalogError> {
        let setting = self.disulfide_setting()?;
        Ok(replace_particle(
            spices,
            setting.protonated_particle(),
            setting.deprotonated_particle(),
        ))
    }

    /// Fragment SPICES of `amino_acid` with the states named in `argument` charged.
    ///
    /// Parts are applied in argument order. Side chain parts only change the
    /// fragment for peptide-bound (`SCB`) settings.
    pub fn charged_spices(
        &self,
        amino_acid: &AminoAcid,
        argument: &str,
        first: bool,
        last: bool,
        disulfide: bool,
    ) -> Result<String, CatalogError> {
        let mut spices = amino_acid.spices().to_string();
        let parts = charge_argument_parts(argument).unwrap_or_default();
        for part in parts {
            for setting in amino_acid
                .charge_settings()
                .iter()
                .filter(|s| s.argument().as_deref() == Some(part))
            {
                let charged = setting.charged_particle();
                match setting.charge_type() {
                    ChargeType::TerminalC => {
                        spices.push('-');
                        spices.push_str(charged);
                        if disulfide {
                            spices = self.spices_in_disulfide_bond(&spices)?;
                        }
                    }
                    ChargeType::TerminalN => {
                        spices = if self.is_only_single_particle() {
                            format!("{}-{}", charged, spices)
                        } else if amino_acid.is_single_particle() {
                            charged.to_string()
                        } else {
                            match first_link_index(&spices) {
                                Some(i) => format!("{}{}", charged, &spices[i..]),
                                None => charged.to_string(),
                            }
                        };
                        if disulfide {
                            spices = self.spices_in_disulfide_bond(&spices)?;
                        }
                    }
                    ChargeType::SideChainBound => {
                        spices = if amino_acid.is_single_particle() {
                            if (first || last) && spices.contains('-') {
                                replace_particle(&spices, setting.uncharged_particle(), charged)
                            } else {
                                charged.to_string()
                            }
                        } else {
                            replace_last_side_chain_particle(&spices, charged)
                        };
                    }
                    ChargeType::SideChainFree | ChargeType::Disulfide => {}
                }
            }
        }
        Ok(spices)
    }
}

/// Position of the first `-` or `(` following the backbone particle.
fn first_link_index(spices: &str) -> Option<usize> {
    match (spices.find('-'), spices.find('(')) {
        (Some(dash), Some(paren)) => Some(dash.min(paren)),
        (dash, paren) => dash.or(paren),
    }
}

fn replace_last_side_chain_particle(spices: &str, particle: &str) -> String {
    let Some(close) = spices.rfind(')') else {
        return spices.to_string();
    };
    let start = spices[..close].rfind(['-', '(']).map_or(0, |i| i + 1);
    format!("{}{}{}", &spices[..start], particle, &spices[close..])
}
