use super::config::{DEFAULT_DECIMALS, DEFAULT_SEED};
use super::error::EngineError;
use super::masterdata::{ASYMMETRIC_UNIT, MASTERDATA_VERSION, Masterdata, keys};
use super::protein::Protein;
use crate::core::catalog::amino_acid::AminoAcid;
use crate::core::catalog::error::CatalogError;
use crate::core::catalog::registry::AminoAcidCatalog;
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::probes::read_probes_from_path;
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::ProteinStructure;
use crate::core::notation::converter::PeptideToSpices;
use crate::core::topology::connection::{
    ChainLayout, RESIDUE_SEPARATOR, build_coordinate_table, residue_trees,
};
use crate::core::topology::forces::{
    BackboneParticle, distance_forces, max_distance_type,
};
use crate::core::utils::geometry::{
    euler_to_quaternion, fit_into_sphere, quaternion_to_euler, random_quaternion,
};
use crate::core::utils::particles::replace_first_particle;
use nalgebra::{Point3, Quaternion, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const ASSEMBLY_PREFIX: &str = "Biological Assembly ";

/// SPICES of one chain together with the disulfide serials written into it.
struct ChainSpices {
    spices: String,
    disulfide_bonds: BTreeSet<u32>,
}

/// `"Asymmetric Unit"` -> `None`, `"Biological Assembly 2"` -> `Some(2)`.
fn parse_assembly_name(name: &str) -> Result<Option<usize>, EngineError> {
    if name == ASYMMETRIC_UNIT {
        return Ok(None);
    }
    name.strip_prefix(ASSEMBLY_PREFIX)
        .and_then(|n| n.trim().parse().ok())
        .map(Some)
        .ok_or_else(|| EngineError::UnknownAssembly(name.to_string()))
}

/// Run length encodes identical consecutive chain groups as `N<group>\n`.
fn frequency_spices(text: &str) -> String {
    let without_open = text.replace('<', "");
    let mut tokens: Vec<&str> = without_open.split('>').collect();
    if tokens.last() == Some(&"") {
        tokens.pop();
    }
    let mut out = String::new();
    let mut i = 0;
    while i < tokens.len() {
        let run = tokens[i..].iter().take_while(|t| **t == tokens[i]).count();
        if run > 1 {
            out.push_str(&run.to_string());
        }
        out.push('<');
        out.push_str(tokens[i]);
        out.push_str(">\n");
        i += run;
    }
    out
}

/// Maps a PDB structure onto coarse-grained SPICES and simulation tables.
///
/// All settings live in the [`Masterdata`], so that a mapper can be persisted
/// and rebuilt from it. The parsed asymmetric unit is kept to rebuild
/// biological assemblies without reading the PDB text again.
#[derive(Debug, Clone)]
pub struct PdbToDpd {
    catalog: Arc<AminoAcidCatalog>,
    converter: PeptideToSpices,
    asymmetric_unit: ProteinStructure,
    protein: Protein,
    masterdata: Masterdata,
    rng: Option<StdRng>,
}

impl PdbToDpd {
    /// Creates a mapper for the given PDB file content. All chains are active.
    pub fn from_pdb(pdb: &str, catalog: Arc<AminoAcidCatalog>) -> Result<Self, EngineError> {
        let mut masterdata = Masterdata::new();
        masterdata.set(keys::ORIGINAL_PDB, pdb);
        masterdata.set(keys::AMINO_ACIDS_DEFINITION, catalog.definition());
        masterdata.set(keys::VERSION, MASTERDATA_VERSION);
        masterdata.set(keys::BIOLOGICAL_ASSEMBLY, ASYMMETRIC_UNIT);
        masterdata.set_value(keys::USE_FSMILES_FREQUENCIES, true);
        let mut mapper = Self::from_masterdata(masterdata, catalog)?;
        let chains = mapper.chain_ids();
        mapper.masterdata.set_list(keys::ACTIVE_CHAINS, chains);
        Ok(mapper)
    }

    pub fn from_pdb_path(path: &Path, catalog: Arc<AminoAcidCatalog>) -> Result<Self, EngineError> {
        let pdb = std::fs::read_to_string(path).map_err(PdbError::from)?;
        Self::from_pdb(&pdb, catalog)
    }

    /// Rebuilds a mapper from persisted masterdata.
    ///
    /// The stored catalog definition takes precedence over `catalog` when the
    /// two differ.
    pub fn from_masterdata(
        masterdata: Masterdata,
        catalog: Arc<AminoAcidCatalog>,
    ) -> Result<Self, EngineError> {
        let pdb = masterdata
            .get(keys::ORIGINAL_PDB)
            .ok_or(EngineError::NoProteinData)?;
        let catalog = match masterdata.get(keys::AMINO_ACIDS_DEFINITION) {
            Some(definition) if definition != catalog.definition() => {
                Arc::new(AminoAcidCatalog::from_definition(definition)?)
            }
            _ => catalog,
        };
        let asymmetric_unit = PdbFile::read_from_str(pdb)?;
        let assembly = masterdata
            .get(keys::BIOLOGICAL_ASSEMBLY)
            .map(parse_assembly_name)
            .transpose()?
            .flatten();
        let structure = Self::build_structure(&asymmetric_unit, assembly)?;
        let protein = Protein::new(structure, &catalog);
        debug!(
            "Mapper holds {} chains ({}).",
            protein.chain_ids().len(),
            masterdata.get(keys::BIOLOGICAL_ASSEMBLY).unwrap_or(ASYMMETRIC_UNIT)
        );
        Ok(Self {
            converter: PeptideToSpices::new(catalog.clone()),
            catalog,
            asymmetric_unit,
            protein,
            masterdata,
            rng: None,
        })
    }

    fn build_structure(
        asymmetric_unit: &ProteinStructure,
        assembly: Option<usize>,
    ) -> Result<ProteinStructure, EngineError> {
        match assembly {
            None => Ok(asymmetric_unit.clone()),
            Some(number) => asymmetric_unit
                .assembly(number)
                .ok_or_else(|| EngineError::UnknownAssembly(format!("{}{}", ASSEMBLY_PREFIX, number))),
        }
    }

    pub fn catalog(&self) -> &Arc<AminoAcidCatalog> {
        &self.catalog
    }

    pub fn protein(&self) -> &Protein {
        &self.protein
    }

    pub fn masterdata(&self) -> &Masterdata {
        &self.masterdata
    }

    /// Replaces the state of this mapper by the one stored in `masterdata`.
    pub fn set_masterdata(&mut self, masterdata: Masterdata) -> Result<(), EngineError> {
        *self = Self::from_masterdata(masterdata, self.catalog.clone())?;
        Ok(())
    }

    pub fn pdb(&self) -> &str {
        self.masterdata.get(keys::ORIGINAL_PDB).unwrap_or_default()
    }

    pub fn pdb_code(&self) -> Option<&str> {
        self.protein.structure().id_code()
    }

    /// `CODE - title`, falling back to the first compound name.
    pub fn title(&self) -> String {
        let structure = self.protein.structure();
        let description = structure
            .title()
            .or_else(|| structure.compounds().first().map(|c| c.molecule.as_str()))
            .filter(|d| !d.is_empty());
        match (structure.id_code(), description) {
            (Some(code), Some(description)) => format!("{} - {}", code, description),
            (Some(code), None) => code.to_string(),
            (None, Some(description)) => description.to_string(),
            (None, None) => String::new(),
        }
    }

    fn require_protein(&self) -> Result<(), EngineError> {
        if self.protein.has_backbone() {
            Ok(())
        } else {
            Err(EngineError::NoProteinData)
        }
    }

    // --- Chains ---

    pub fn chain_ids(&self) -> Vec<String> {
        self.protein.chain_ids()
    }

    /// Active chains in ascending order.
    pub fn active_chains(&self) -> Vec<String> {
        self.masterdata.list(keys::ACTIVE_CHAINS)
    }

    /// Activates the given chains and discards backbone status and segments.
    pub fn set_active_chains<S: AsRef<str>>(&mut self, chains: &[S]) -> Result<(), EngineError> {
        let mut active = BTreeSet::new();
        for chain in chains {
            let chain = chain.as_ref();
            if !self.protein.contains_chain(chain) {
                return Err(EngineError::UnknownChain(chain.to_string()));
            }
            active.insert(chain.to_string());
        }
        self.masterdata.set_list(keys::ACTIVE_CHAINS, active);
        self.clear_backbone_particle_status();
        self.clear_backbone_particle_segments();
        Ok(())
    }

    pub fn has_chain_selection(&self) -> bool {
        let active = self.active_chains();
        !active.is_empty() && active.len() != self.chain_ids().len()
    }

    /// Makes all chains active again.
    pub fn clear_chain_selection(&mut self) {
        let chains = self.chain_ids();
        self.masterdata.set_list(keys::ACTIVE_CHAINS, chains);
        self.clear_backbone_particle_status();
        self.clear_backbone_particle_segments();
    }

    pub fn compound_names(&self) -> Vec<String> {
        self.active_chains()
            .iter()
            .map(|chain| self.protein.compound_string(chain))
            .collect()
    }

    // --- Sequences ---

    pub fn original_amino_acid_sequence(&self, chain: &str) -> Result<String, EngineError> {
        if !self.protein.contains_chain(chain) {
            return Err(EngineError::UnknownChain(chain.to_string()));
        }
        Ok(self.protein.raw_sequence(chain))
    }

    pub fn overridden_sequences(&self) -> Result<BTreeMap<String, String>, EngineError> {
        self.masterdata.pairs(keys::OVERRIDDEN_SEQUENCES)
    }

    /// Current one letter sequence of the chain, with overrides applied.
    pub fn amino_acid_sequence(&self, chain: &str) -> Result<String, EngineError> {
        let original = self.original_amino_acid_sequence(chain)?;
        Ok(self
            .overridden_sequences()?
            .remove(chain)
            .unwrap_or(original))
    }

    /// Replaces the residues of a chain without touching its coordinates.
    pub fn set_amino_acid_sequence(&mut self, chain: &str, sequence: &str) -> Result<(), EngineError> {
        let expected = self.original_amino_acid_sequence(chain)?.chars().count();
        let found = sequence.chars().count();
        if expected != found {
            return Err(EngineError::IncorrectAminoAcidCount {
                chain: chain.to_string(),
                expected,
                found,
            });
        }
        if let Some(code) = sequence.chars().find(|c| !self.catalog.is_one_letter_code(*c)) {
            return Err(CatalogError::UnknownAminoAcid(code.to_string()).into());
        }
        let mut overrides = self.overridden_sequences()?;
        overrides.insert(chain.to_string(), sequence.to_string());
        self.masterdata.set_pairs(keys::OVERRIDDEN_SEQUENCES, &overrides);
        Ok(())
    }

    pub fn has_changed_amino_acid_sequence(&self) -> bool {
        self.masterdata.contains(keys::OVERRIDDEN_SEQUENCES)
    }

    pub fn restore_original_amino_acid_sequence(&mut self) {
        self.masterdata.remove(keys::OVERRIDDEN_SEQUENCES);
    }

    /// Amino acid at 1-based `index` counted over the active chains.
    pub fn amino_acid(&self, index: usize) -> Result<&AminoAcid, EngineError> {
        let mut codes = Vec::new();
        for chain in self.active_chains() {
            codes.extend(self.amino_acid_sequence(&chain)?.chars());
        }
        let code = index
            .checked_sub(1)
            .and_then(|i| codes.get(i))
            .ok_or(EngineError::IndexOutOfRange {
                index,
                max: codes.len(),
            })?;
        Ok(self.catalog.require_one_letter(*code)?)
    }

    /// One letter sequence of the chain with ring, disulfide and charge markers.
    fn chain_sequence(&self, chain: &str) -> Result<(String, BTreeSet<u32>), EngineError> {
        let codes: Vec<char> = self.amino_acid_sequence(chain)?.chars().collect();
        let active = self.active_chains();
        let circular = self.is_circular()?;
        let (sequence, serials) = self
            .protein
            .marked_sequence(chain, &codes, &active, circular);
        let sequence = match self.ph()? {
            Some(ph) => self.converter.charge_one_letter(&sequence, ph, circular)?,
            None => sequence,
        };
        Ok((sequence, serials))
    }

    fn chain_spices(&self, chain: &str) -> Result<ChainSpices, EngineError> {
        let (sequence, disulfide_bonds) = self.chain_sequence(chain)?;
        let spices = self.converter.one_letter_to_spices(&sequence, true)?;
        Ok(ChainSpices {
            spices,
            disulfide_bonds,
        })
    }

    /// Compound header and sequence of every active chain.
    pub fn sequences(&self) -> Result<String, EngineError> {
        self.require_protein()?;
        let mut out = String::new();
        for chain in self.active_chains() {
            let (sequence, _) = self.chain_sequence(&chain)?;
            out.push_str(&self.protein.compound_string(&chain));
            out.push_str(":\n");
            out.push_str(&sequence);
            out.push('\n');
        }
        Ok(out)
    }

    // --- SPICES ---

    /// SPICES of the active chains.
    ///
    /// Each chain ends with a line break. Backbone particles listed in the
    /// probe map are replaced. With more than one active chain, chains joined by
    /// disulfide bonds form one `<...>` group whose members are each written as
    /// `(\n...)`. When frequency SPICES are enabled, runs of identical groups are
    /// compressed to `N<...>`.
    pub fn spices(&self) -> Result<String, EngineError> {
        self.require_protein()?;
        let active = self.active_chains();
        if active.is_empty() {
            return Ok(String::new());
        }
        let probes = self.probes()?;

        let mut texts: BTreeMap<&str, String> = BTreeMap::new();
        for chain in &active {
            let spices = self.chain_spices(chain)?.spices;
            let roots = Self::root_particles(&spices)?;
            let fragments: Vec<String> = spices
                .split(RESIDUE_SEPARATOR)
                .zip(self.protein.backbone(chain))
                .zip(&roots)
                .map(|((fragment, backbone), root)| {
                    let key = self.protein.alpha_carbon_key(chain, backbone);
                    match probes.get(&key) {
                        Some(probe) => replace_first_particle(fragment, root, probe),
                        None => fragment.to_string(),
                    }
                })
                .collect();
            let mut text = fragments.join(RESIDUE_SEPARATOR);
            if !text.ends_with('\n') {
                text.push('\n');
            }
            texts.insert(chain.as_str(), text);
        }

        let groups = self.protein.chain_groups(&active);
        debug!("{} active chains form {} groups.", active.len(), groups.len());
        let wrap = active.len() > 1;
        let mut out = String::new();
        for group in &groups {
            if wrap {
                out.push('<');
            }
            for chain in group {
                let text = texts.get(chain.as_str()).map(String::as_str).unwrap_or_default();
                if group.len() == 1 {
                    out.push_str(text);
                } else {
                    out.push_str("(\n");
                    out.push_str(text);
                    out.push(')');
                }
            }
            if wrap {
                out.push('>');
            }
        }

        if out.contains('<') && self.uses_frequency_spices()? {
            Ok(frequency_spices(&out))
        } else {
            Ok(out)
        }
    }

    fn root_particles(spices: &str) -> Result<Vec<String>, EngineError> {
        Ok(residue_trees(spices)?
            .iter()
            .filter_map(|tree| tree.root().map(|node| node.name.clone()))
            .collect())
    }

    /// Backbone particle name of every residue of the active chains.
    pub fn ca_particles(&self) -> Result<Vec<String>, EngineError> {
        let mut particles = Vec::new();
        for chain in self.active_chains() {
            particles.extend(Self::root_particles(&self.chain_spices(&chain)?.spices)?);
        }
        Ok(particles)
    }

    /// Number of particles of the active chains.
    pub fn max_number_of_particles(&self) -> Result<usize, EngineError> {
        let mut count = 0;
        for chain in self.active_chains() {
            count += residue_trees(&self.chain_spices(&chain)?.spices)?
                .iter()
                .map(|tree| tree.len())
                .sum::<usize>();
        }
        Ok(count)
    }

    pub fn ca_keys(&self) -> Vec<String> {
        self.active_chains()
            .iter()
            .flat_map(|chain| {
                self.protein
                    .backbone(chain)
                    .iter()
                    .map(|b| self.protein.alpha_carbon_key(chain, b))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// `n - key` for every alpha carbon key, counting from 1.
    pub fn indexed_ca_keys(&self) -> Vec<String> {
        self.ca_keys()
            .iter()
            .enumerate()
            .map(|(i, key)| format!("{} - {}", i + 1, key))
            .collect()
    }

    /// Raw position of the alpha carbon with the given key.
    pub fn raw_ca_position(&self, key: &str) -> Option<Point3<f64>> {
        self.chain_ids().iter().find_map(|chain| {
            self.protein
                .backbone(chain)
                .iter()
                .find(|b| self.protein.alpha_carbon_key(chain, b) == key)
                .and_then(|b| self.protein.alpha_carbon(b))
                .map(|a| a.position)
        })
    }

    // --- Coordinates ---

    /// Coordinate/connection table lines of the active chains.
    ///
    /// Backbone coordinates are centered, optionally rotated, scaled to the
    /// radius and moved to the center. Records the last used indices.
    pub fn coordinate_connection_table(
        &mut self,
        start_index: usize,
        start_backbone_index: usize,
    ) -> Result<Vec<String>, EngineError> {
        self.require_protein()?;
        let center = self.center()?.ok_or(EngineError::MissingData("Protein center"))?;
        let radius = self.radius()?.ok_or(EngineError::MissingData("Protein radius"))?;
        let active = self.active_chains();
        let probes = self.probes()?;
        let rotation = self.rotation_quaternion()?;
        let status = self.backbone_particle_status()?;

        let mut chain_spices = Vec::with_capacity(active.len());
        let mut chain_probes = Vec::with_capacity(active.len());
        let mut raw = Vec::new();
        let mut lengths = Vec::with_capacity(active.len());
        for chain in &active {
            chain_spices.push(self.chain_spices(chain)?);
            chain_probes.push(
                self.protein
                    .backbone(chain)
                    .iter()
                    .map(|b| probes.get(&self.protein.alpha_carbon_key(chain, b)).cloned())
                    .collect::<Vec<_>>(),
            );
            let positions = self.protein.alpha_carbon_positions(chain);
            lengths.push(positions.len());
            raw.extend(positions);
        }

        let positions = fit_into_sphere(&raw, &center, radius, rotation.as_ref());
        let mut layouts = Vec::with_capacity(active.len());
        let mut offset = 0;
        for (i, chain) in active.iter().enumerate() {
            layouts.push(ChainLayout {
                chain_id: chain,
                spices: &chain_spices[i].spices,
                positions: &positions[offset..offset + lengths[i]],
                probes: &chain_probes[i],
                disulfide_bonds: &chain_spices[i].disulfide_bonds,
            });
            offset += lengths[i];
        }

        let table = build_coordinate_table(&layouts, start_index, start_backbone_index, &status)?;
        debug!(
            "Coordinate table has {} particles, last backbone index {}.",
            table.records.len(),
            table.last_backbone_index
        );
        let lines = table.lines(self.decimals()?);
        self.masterdata.set_value(keys::LAST_INDEX, table.last_index);
        self.masterdata
            .set_value(keys::LAST_CALPHA_INDEX, table.last_backbone_index);
        Ok(lines)
    }

    pub fn last_index(&self) -> Result<Option<usize>, EngineError> {
        self.masterdata.parsed(keys::LAST_INDEX)
    }

    pub fn last_backbone_index(&self) -> Result<Option<usize>, EngineError> {
        self.masterdata.parsed(keys::LAST_CALPHA_INDEX)
    }

    // --- Distance forces ---

    fn backbone_particles(&self) -> Result<Vec<BackboneParticle>, EngineError> {
        let status = self.backbone_particle_status()?;
        let segments = self.backbone_particle_segments()?;
        let positions = self
            .active_chains()
            .iter()
            .flat_map(|chain| self.protein.alpha_carbon_positions(chain))
            .collect::<Vec<_>>();
        Ok(positions
            .into_iter()
            .zip(status)
            .zip(segments)
            .map(|((position, included), segment)| BackboneParticle {
                included,
                segment,
                position,
            })
            .collect())
    }

    pub fn max_distance_type_of_protein_distance_forces(&self) -> Result<usize, EngineError> {
        Ok(max_distance_type(&self.backbone_particles()?))
    }

    /// Distance force lines between included backbone particles `k` apart.
    ///
    /// Distances are taken from the untransformed coordinates and multiplied by
    /// `conversion`.
    pub fn protein_distance_forces(
        &self,
        distance_type: usize,
        conversion: f64,
        force_constant: f64,
    ) -> Result<Vec<String>, EngineError> {
        let decimals = self.decimals()?;
        Ok(distance_forces(
            &self.backbone_particles()?,
            distance_type,
            conversion,
            force_constant,
        )
        .iter()
        .map(|force| force.to_line(decimals))
        .collect())
    }

    pub fn number_of_protein_distance_forces(&self, distance_type: usize) -> Result<usize, EngineError> {
        Ok(distance_forces(&self.backbone_particles()?, distance_type, 1.0, 1.0).len())
    }

    // --- Backbone status and segments ---

    pub fn number_of_backbone_particles(&self) -> usize {
        self.active_chains()
            .iter()
            .map(|chain| self.protein.backbone(chain).len())
            .sum()
    }

    fn check_backbone_count(&self, found: usize) -> Result<(), EngineError> {
        let expected = self.number_of_backbone_particles();
        if expected == found {
            Ok(())
        } else {
            Err(EngineError::BackboneParticleCount { expected, found })
        }
    }

    /// Inclusion of every backbone particle in distance forces; all included by
    /// default.
    pub fn backbone_particle_status(&self) -> Result<Vec<bool>, EngineError> {
        match self.masterdata.parsed_list(keys::BACKBONE_PARTICLE_STATUS)? {
            Some(status) => {
                self.check_backbone_count(status.len())?;
                Ok(status)
            }
            None => Ok(vec![true; self.number_of_backbone_particles()]),
        }
    }

    pub fn set_backbone_particle_status(&mut self, status: &[bool]) -> Result<(), EngineError> {
        self.check_backbone_count(status.len())?;
        self.masterdata
            .set_list(keys::BACKBONE_PARTICLE_STATUS, status.iter());
        Ok(())
    }

    pub fn has_backbone_particle_status(&self) -> bool {
        self.masterdata.contains(keys::BACKBONE_PARTICLE_STATUS)
    }

    pub fn clear_backbone_particle_status(&mut self) {
        self.masterdata.remove(keys::BACKBONE_PARTICLE_STATUS);
    }

    /// Segment of every backbone particle; all in segment 0 by default.
    pub fn backbone_particle_segments(&self) -> Result<Vec<i32>, EngineError> {
        match self.masterdata.parsed_list(keys::BACKBONE_PARTICLE_SEGMENTS)? {
            Some(segments) => {
                self.check_backbone_count(segments.len())?;
                Ok(segments)
            }
            None => Ok(vec![0; self.number_of_backbone_particles()]),
        }
    }

    pub fn set_backbone_particle_segments(&mut self, segments: &[i32]) -> Result<(), EngineError> {
        self.check_backbone_count(segments.len())?;
        self.masterdata
            .set_list(keys::BACKBONE_PARTICLE_SEGMENTS, segments.iter());
        Ok(())
    }

    /// Segments numbering the active chains from 1, one segment per chain.
    pub fn backbone_particle_segments_chains_applied(&self) -> Vec<i32> {
        self.active_chains()
            .iter()
            .enumerate()
            .flat_map(|(i, chain)| {
                std::iter::repeat_n(i as i32 + 1, self.protein.backbone(chain).len())
            })
            .collect()
    }

    pub fn has_backbone_particle_segments(&self) -> bool {
        self.masterdata.contains(keys::BACKBONE_PARTICLE_SEGMENTS)
    }

    pub fn clear_backbone_particle_segments(&mut self) {
        self.masterdata.remove(keys::BACKBONE_PARTICLE_SEGMENTS);
    }

    // --- Biological assemblies ---

    pub fn biological_assemblies(&self) -> Vec<String> {
        std::iter::once(ASYMMETRIC_UNIT.to_string())
            .chain(
                self.asymmetric_unit
                    .assemblies()
                    .iter()
                    .map(|a| format!("{}{}", ASSEMBLY_PREFIX, a.number)),
            )
            .collect()
    }

    pub fn biological_assembly(&self) -> &str {
        self.masterdata
            .get(keys::BIOLOGICAL_ASSEMBLY)
            .unwrap_or(ASYMMETRIC_UNIT)
    }

    pub fn is_biological_assembly(&self) -> bool {
        self.biological_assembly() != ASYMMETRIC_UNIT
    }

    /// Switches to another assembly.
    ///
    /// Every setting except the PDB text and the catalog definition is
    /// discarded and all chains of the new structure become active.
    pub fn set_biological_assembly(&mut self, name: &str) -> Result<(), EngineError> {
        let assembly = parse_assembly_name(name)?;
        if name == self.biological_assembly() {
            return Ok(());
        }
        let structure = Self::build_structure(&self.asymmetric_unit, assembly)?;

        let mut masterdata = Masterdata::new();
        for key in [
            keys::ORIGINAL_PDB,
            keys::AMINO_ACIDS_DEFINITION,
            keys::VERSION,
            keys::USE_FSMILES_FREQUENCIES,
        ] {
            if let Some(value) = self.masterdata.get(key) {
                masterdata.set(key, value);
            }
        }
        masterdata.set(keys::BIOLOGICAL_ASSEMBLY, name);
        if let Some(number) = assembly {
            masterdata.set(
                keys::BIOLOGICAL_ASSEMBLY_FILTER,
                format!(" filter \"BIOMOLECULE {}\"", number),
            );
        }
        masterdata.set_value(keys::NUMBER_OF_MODELS_ASSEMBLY, structure.model_count());

        self.protein = Protein::new(structure, &self.catalog);
        masterdata.set_list(keys::ACTIVE_CHAINS, self.protein.chain_ids());
        self.masterdata = masterdata;
        self.rng = None;
        Ok(())
    }

    // --- Structure statistics ---

    pub fn has_disulfide_bonds(&self) -> bool {
        !self.protein.disulfide_bonds(&self.active_chains()).is_empty()
    }

    pub fn mean_disulfide_bond_length(&self) -> f64 {
        self.protein.mean_disulfide_bond_length()
    }

    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        self.protein.center_of_mass(&self.active_chains())
    }

    pub fn radius_of_gyration(&self) -> Option<f64> {
        self.protein.radius_of_gyration(&self.active_chains())
    }

    pub fn longest_atom_distance(&self) -> f64 {
        self.protein.longest_atom_distance(&self.active_chains())
    }

    pub fn mean_backbone_particle_distance(&self) -> Option<f64> {
        self.protein.mean_backbone_distance(&self.active_chains())
    }

    // --- Orientation ---

    pub fn seed(&self) -> Result<u64, EngineError> {
        Ok(self.masterdata.parsed(keys::SEED)?.unwrap_or(DEFAULT_SEED))
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.masterdata.set_value(keys::SEED, seed);
        self.rng = None;
    }

    /// Rotates by a uniform random orientation. The generator is seeded from
    /// the stored seed on first use.
    pub fn set_random_orientation(&mut self) -> Result<(), EngineError> {
        let seed = self.seed()?;
        let rng = self.rng.get_or_insert_with(|| StdRng::seed_from_u64(seed));
        let rotation = random_quaternion(rng);
        self.set_rotation(&rotation);
        Ok(())
    }

    pub fn rotation_quaternion(&self) -> Result<Option<Quaternion<f64>>, EngineError> {
        self.masterdata.quaternion(keys::ROTATION)
    }

    /// Rotation as Euler angles in radians, zero when none is set.
    pub fn rotation(&self) -> Result<Vector3<f64>, EngineError> {
        Ok(self
            .rotation_quaternion()?
            .map(|q| quaternion_to_euler(&q))
            .unwrap_or_else(Vector3::zeros))
    }

    pub fn set_rotation(&mut self, rotation: &Quaternion<f64>) {
        self.masterdata.set_quaternion(keys::ROTATION, rotation);
    }

    pub fn set_rotation_euler(&mut self, angles: &Vector3<f64>) {
        self.set_rotation(&euler_to_quaternion(angles));
    }

    pub fn set_rotation_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.set_rotation_euler(&Vector3::new(x, y, z));
    }

    pub fn has_rotation(&self) -> bool {
        self.masterdata.contains(keys::ROTATION)
    }

    pub fn clear_rotation(&mut self) {
        self.masterdata.remove(keys::ROTATION);
    }

    /// Stores the current rotation as the default one.
    pub fn copy_rotation_to_default(&mut self) {
        match self.masterdata.get(keys::ROTATION).map(str::to_string) {
            Some(rotation) => self.masterdata.set(keys::DEFAULT_ROTATION, rotation),
            None => {
                self.masterdata.remove(keys::DEFAULT_ROTATION);
            }
        }
    }

    /// Restores the default rotation.
    pub fn set_default_rotation(&mut self) {
        match self.masterdata.get(keys::DEFAULT_ROTATION).map(str::to_string) {
            Some(rotation) => self.masterdata.set(keys::ROTATION, rotation),
            None => {
                self.masterdata.remove(keys::ROTATION);
            }
        }
    }

    // --- Placement and output settings ---

    pub fn center(&self) -> Result<Option<Point3<f64>>, EngineError> {
        self.masterdata.point(keys::CENTER)
    }

    pub fn set_center(&mut self, center: &Point3<f64>) {
        self.masterdata.set_point(keys::CENTER, center);
    }

    pub fn radius(&self) -> Result<Option<f64>, EngineError> {
        self.masterdata.parsed(keys::RADIUS)
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.masterdata.set_value(keys::RADIUS, radius);
    }

    pub fn decimals(&self) -> Result<usize, EngineError> {
        Ok(self
            .masterdata
            .parsed(keys::NUMBER_OF_DECIMALS_FOR_COORDINATES)?
            .unwrap_or(DEFAULT_DECIMALS))
    }

    pub fn set_decimals(&mut self, decimals: usize) {
        self.masterdata
            .set_value(keys::NUMBER_OF_DECIMALS_FOR_COORDINATES, decimals);
    }

    pub fn ph(&self) -> Result<Option<f64>, EngineError> {
        self.masterdata.parsed(keys::PH_VALUE)
    }

    pub fn set_ph(&mut self, ph: f64) {
        self.masterdata.set_value(keys::PH_VALUE, ph);
    }

    pub fn has_ph(&self) -> bool {
        self.masterdata.contains(keys::PH_VALUE)
    }

    pub fn clear_ph(&mut self) {
        self.masterdata.remove(keys::PH_VALUE);
    }

    pub fn is_circular(&self) -> Result<bool, EngineError> {
        Ok(self.masterdata.flag(keys::IS_CIRCULAR)?.unwrap_or(false))
    }

    pub fn set_circular(&mut self, circular: bool) {
        self.masterdata.set_value(keys::IS_CIRCULAR, circular);
    }

    pub fn uses_frequency_spices(&self) -> Result<bool, EngineError> {
        Ok(self
            .masterdata
            .flag(keys::USE_FSMILES_FREQUENCIES)?
            .unwrap_or(false))
    }

    pub fn set_frequency_spices(&mut self, enabled: bool) {
        self.masterdata
            .set_value(keys::USE_FSMILES_FREQUENCIES, enabled);
    }

    // --- Probes ---

    /// Backbone particle replacements keyed by alpha carbon key.
    pub fn probes(&self) -> Result<BTreeMap<String, String>, EngineError> {
        self.masterdata.pairs(keys::CA_ATOM_INDEX_PROBE_MAP)
    }

    pub fn set_probes(&mut self, probes: &BTreeMap<String, String>) {
        if probes.is_empty() {
            self.clear_probes();
        } else {
            self.masterdata
                .set_pairs(keys::CA_ATOM_INDEX_PROBE_MAP, probes);
        }
    }

    pub fn load_probes(&mut self, path: &Path) -> Result<(), EngineError> {
        let probes = read_probes_from_path(path)?;
        self.set_probes(&probes);
        Ok(())
    }

    pub fn has_probes(&self) -> bool {
        self.masterdata.contains(keys::CA_ATOM_INDEX_PROBE_MAP)
    }

    pub fn clear_probes(&mut self) {
        self.masterdata.remove(keys::CA_ATOM_INDEX_PROBE_MAP);
    }
}
