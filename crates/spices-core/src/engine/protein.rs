use crate::core::catalog::registry::AminoAcidCatalog;
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::Residue;
use crate::core::models::structure::{DisulfideBond, ProteinStructure};
use crate::core::utils::geometry::{center, diameter};
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

const CYSTEINE_CODE: char = 'C';

/// A residue that maps onto one backbone particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackboneResidue {
    pub residue_id: ResidueId,
    pub alpha_carbon: AtomId,
    pub code: char,
}

/// A protein structure viewed through an amino acid catalog.
///
/// Only residues known to the catalog and carrying an alpha carbon take part in
/// the backbone; chains without such residues are not listed.
#[derive(Debug, Clone)]
pub struct Protein {
    structure: ProteinStructure,
    backbones: BTreeMap<String, Vec<BackboneResidue>>,
}

impl Protein {
    pub fn new(structure: ProteinStructure, catalog: &AminoAcidCatalog) -> Self {
        let mut backbones = BTreeMap::new();
        let mut skipped = 0usize;
        for (_, chain) in structure.chains_iter() {
            let mut residues = Vec::new();
            for &residue_id in chain.residues() {
                let Some(residue) = structure.residue(residue_id) else {
                    continue;
                };
                let alpha_carbon = residue.atom_id_by_name("CA");
                match (catalog.by_three_letter(&residue.name), alpha_carbon) {
                    (Some(amino_acid), Some(alpha_carbon)) => residues.push(BackboneResidue {
                        residue_id,
                        alpha_carbon,
                        code: amino_acid.one_letter(),
                    }),
                    (None, Some(_)) => {
                        warn!(
                            "Residue {} {} of chain {} is not in the amino acid catalog; skipped.",
                            residue.pdb_name, residue.number, chain.id
                        );
                        skipped += 1;
                    }
                    _ => skipped += 1,
                }
            }
            if !residues.is_empty() {
                backbones.insert(chain.id.clone(), residues);
            }
        }
        debug!(
            "Protein has {} chains with backbone residues; {} residues skipped.",
            backbones.len(),
            skipped
        );
        Self {
            structure,
            backbones,
        }
    }

    pub fn structure(&self) -> &ProteinStructure {
        &self.structure
    }

    pub fn has_backbone(&self) -> bool {
        !self.backbones.is_empty()
    }

    /// Chain identifiers in ascending order.
    pub fn chain_ids(&self) -> Vec<String> {
        self.backbones.keys().cloned().collect()
    }

    pub fn contains_chain(&self, chain: &str) -> bool {
        self.backbones.contains_key(chain)
    }

    pub fn backbone(&self, chain: &str) -> &[BackboneResidue] {
        self.backbones
            .get(chain)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn residue(&self, backbone: &BackboneResidue) -> Option<&Residue> {
        self.structure.residue(backbone.residue_id)
    }

    pub fn alpha_carbon(&self, backbone: &BackboneResidue) -> Option<&Atom> {
        self.structure.atom(backbone.alpha_carbon)
    }

    pub fn start_residue_number(&self, chain: &str) -> Option<isize> {
        self.backbone(chain)
            .first()
            .and_then(|b| self.residue(b))
            .map(|r| r.number)
    }

    /// One letter sequence of the chain as read from the structure.
    pub fn raw_sequence(&self, chain: &str) -> String {
        self.backbone(chain).iter().map(|b| b.code).collect()
    }

    /// `[RES]number:chain.CA #serial`
    pub fn alpha_carbon_key(&self, chain: &str, backbone: &BackboneResidue) -> String {
        let (name, number) = self.residue(backbone).map_or((String::new(), String::new()), |r| {
            let insertion = r.insertion_code.map(String::from).unwrap_or_default();
            (r.pdb_name.clone(), format!("{}{}", r.number, insertion))
        });
        let serial = self.alpha_carbon(backbone).map_or(0, |a| a.serial);
        format!("[{}]{}:{}.CA #{}", name, number, chain, serial)
    }

    /// Raw alpha carbon positions of the chain.
    pub fn alpha_carbon_positions(&self, chain: &str) -> Vec<Point3<f64>> {
        self.backbone(chain)
            .iter()
            .filter_map(|b| self.alpha_carbon(b).map(|a| a.position))
            .collect()
    }

    /// Compound name of the chain: `Name`, `Name - ChainID: X` or `ChainID: X`.
    pub fn compound_string(&self, chain: &str) -> String {
        let molecule = self
            .structure
            .compound_for_chain(chain)
            .map(|c| c.molecule.as_str())
            .filter(|m| !m.is_empty());
        match molecule {
            Some(name) if self.backbones.len() == 1 => name.to_string(),
            Some(name) => format!("{} - ChainID: {}", name, chain),
            None => format!("ChainID: {}", chain),
        }
    }

    /// Disulfide bonds whose chains are both active.
    pub fn disulfide_bonds(&self, active: &[String]) -> Vec<&DisulfideBond> {
        self.structure
            .disulfide_bonds()
            .iter()
            .filter(|b| active.contains(&b.chain1) && active.contains(&b.chain2))
            .collect()
    }

    /// Writes `codes` as a one letter sequence with ring closures and disulfide
    /// markers. Returns the sequence and the disulfide serials it uses.
    ///
    /// A circular chain gets `[*]` on its first and last residue. A disulfide
    /// bond between active chains is written as `[serial]` after each cysteine
    /// whose residue number matches the bond.
    pub fn marked_sequence(
        &self,
        chain: &str,
        codes: &[char],
        active: &[String],
        circular: bool,
    ) -> (String, BTreeSet<u32>) {
        let bonds = self.disulfide_bonds(active);
        let residues = self.backbone(chain);
        let ring = circular && residues.len() > 1;
        let mut sequence = String::with_capacity(codes.len() * 2);
        let mut serials = BTreeSet::new();

        for (i, (backbone, &code)) in residues.iter().zip(codes).enumerate() {
            sequence.push(code);
            if ring && (i == 0 || i + 1 == residues.len()) {
                sequence.push_str("[*]");
            }
            if code != CYSTEINE_CODE {
                continue;
            }
            let Some(number) = self.residue(backbone).map(|r| r.number) else {
                continue;
            };
            for bond in &bonds {
                let first = bond.chain1 == chain && bond.residue1 == number;
                let second = bond.chain2 == chain && bond.residue2 == number;
                if first != second {
                    sequence.push_str(&format!("[{}]", bond.serial));
                    serials.insert(bond.serial);
                }
            }
        }
        (sequence, serials)
    }

    /// Active chains grouped by disulfide connectivity.
    ///
    /// Each group is sorted and groups are ordered by their first chain; a
    /// chain without inter-chain bonds forms its own group.
    pub fn chain_groups(&self, active: &[String]) -> Vec<Vec<String>> {
        let bonds = self.disulfide_bonds(active);
        let mut sorted: Vec<&String> = active.iter().collect();
        sorted.sort();
        sorted.dedup();

        let mut assigned: BTreeSet<&str> = BTreeSet::new();
        let mut groups = Vec::new();
        for start in sorted {
            if assigned.contains(start.as_str()) {
                continue;
            }
            let mut group: BTreeSet<&str> = BTreeSet::new();
            let mut pending = vec![start.as_str()];
            while let Some(chain) = pending.pop() {
                if !group.insert(chain) {
                    continue;
                }
                for bond in &bonds {
                    if bond.chain1 == chain {
                        pending.push(bond.chain2.as_str());
                    } else if bond.chain2 == chain {
                        pending.push(bond.chain1.as_str());
                    }
                }
            }
            assigned.extend(group.iter().copied());
            groups.push(group.into_iter().map(str::to_string).collect());
        }
        groups
    }

    fn amino_acid_positions(&self, active: &[String]) -> Vec<Point3<f64>> {
        active
            .iter()
            .flat_map(|chain| self.backbone(chain))
            .filter_map(|b| self.residue(b))
            .flat_map(|r| r.atoms())
            .filter_map(|&id| self.structure.atom(id))
            .map(|a| a.position)
            .collect()
    }

    /// Mean position of all amino acid atoms of the active chains.
    pub fn center_of_mass(&self, active: &[String]) -> Option<Point3<f64>> {
        center(&self.amino_acid_positions(active))
    }

    pub fn radius_of_gyration(&self, active: &[String]) -> Option<f64> {
        let positions = self.amino_acid_positions(active);
        let centroid = center(&positions)?;
        let sum: f64 = positions
            .iter()
            .map(|p| nalgebra::distance_squared(p, &centroid))
            .sum();
        Some((sum / positions.len() as f64).sqrt())
    }

    pub fn longest_atom_distance(&self, active: &[String]) -> f64 {
        diameter(&self.amino_acid_positions(active))
    }

    fn sulfur_position(&self, chain: &str, number: isize) -> Option<Point3<f64>> {
        let chain_id = self.structure.find_chain_by_id(chain)?;
        let chain = self.structure.chain(chain_id)?;
        chain
            .residues()
            .iter()
            .filter_map(|&id| self.structure.residue(id))
            .filter(|r| r.number == number)
            .flat_map(|r| r.atoms())
            .filter_map(|&id| self.structure.atom(id))
            .find(|a| a.is_sulfur_gamma() || a.element.eq_ignore_ascii_case("S"))
            .map(|a| a.position)
    }

    /// Mean sulfur-sulfur distance of all disulfide bonds, -1 without bonds.
    pub fn mean_disulfide_bond_length(&self) -> f64 {
        let lengths: Vec<f64> = self
            .structure
            .disulfide_bonds()
            .iter()
            .filter_map(|b| {
                let a = self.sulfur_position(&b.chain1, b.residue1)?;
                let c = self.sulfur_position(&b.chain2, b.residue2)?;
                Some(nalgebra::distance(&a, &c))
            })
            .collect();
        if lengths.is_empty() {
            return -1.0;
        }
        lengths.iter().sum::<f64>() / lengths.len() as f64
    }

    /// Mean distance between consecutive alpha carbons within each chain.
    pub fn mean_backbone_distance(&self, active: &[String]) -> Option<f64> {
        let distances: Vec<f64> = active
            .iter()
            .flat_map(|chain| {
                let positions = self.alpha_carbon_positions(chain);
                positions
                    .windows(2)
                    .map(|w| nalgebra::distance(&w[0], &w[1]))
                    .collect::<Vec<_>>()
            })
            .collect();
        if distances.is_empty() {
            return None;
        }
        Some(distances.iter().sum::<f64>() / distances.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::Compound;

    fn catalog() -> AminoAcidCatalog {
        AminoAcidCatalog::builtin().unwrap()
    }

    fn add_residue(
        structure: &mut ProteinStructure,
        chain: &str,
        number: isize,
        name: &str,
        atoms: &[(&str, f64)],
    ) {
        let chain_id = structure.add_chain(chain);
        let residue_id = structure
            .add_residue(chain_id, number, None, name, name)
            .unwrap();
        for (atom, x) in atoms {
            let serial = structure.atom_count() + 1;
            structure.add_atom(Atom::new(serial, atom, residue_id, Point3::new(*x, 0.0, 0.0)));
        }
    }

    fn structure() -> ProteinStructure {
        let mut s = ProteinStructure::new();
        add_residue(&mut s, "A", 1, "GLY", &[("CA", 0.0)]);
        add_residue(&mut s, "A", 2, "CYS", &[("CA", 4.0), ("SG", 5.0)]);
        add_residue(&mut s, "A", 3, "HOH", &[("O", 50.0)]);
        add_residue(&mut s, "B", 7, "CYS", &[("CA", 8.0), ("SG", 7.0)]);
        add_residue(&mut s, "B", 8, "LYS", &[("CA", 12.0)]);
        add_residue(&mut s, "C", 1, "ALA", &[("CA", 20.0)]);
        add_residue(&mut s, "D", 1, "HEM", &[("FE", 30.0)]);
        s.add_disulfide_bond(DisulfideBond {
            serial: 1,
            chain1: "A".into(),
            residue1: 2,
            chain2: "B".into(),
            residue2: 7,
        });
        s.add_compound(Compound {
            molecule: "TOXIN".into(),
            chains: vec!["A".into(), "B".into()],
        });
        s
    }

    fn chains(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn backbone_holds_catalog_residues_with_alpha_carbons() {
        let protein = Protein::new(structure(), &catalog());
        assert_eq!(protein.chain_ids(), chains(&["A", "B", "C"]));
        assert_eq!(protein.raw_sequence("A"), "GC");
        assert_eq!(protein.raw_sequence("B"), "CK");
        assert_eq!(protein.start_residue_number("B"), Some(7));
        assert!(protein.backbone("D").is_empty());
    }

    #[test]
    fn alpha_carbon_keys_name_residue_and_serial() {
        let protein = Protein::new(structure(), &catalog());
        let backbone = protein.backbone("B")[0];
        assert_eq!(protein.alpha_carbon_key("B", &backbone), "[CYS]7:B.CA #5");
    }

    #[test]
    fn compound_strings_fall_back_to_chain_id() {
        let protein = Protein::new(structure(), &catalog());
        assert_eq!(protein.compound_string("A"), "TOXIN - ChainID: A");
        assert_eq!(protein.compound_string("C"), "ChainID: C");
    }

    #[test]
    fn disulfide_markers_follow_matching_cysteines() {
        let protein = Protein::new(structure(), &catalog());
        let active = chains(&["A", "B"]);
        let (sequence, serials) = protein.marked_sequence("A", &['G', 'C'], &active, false);
        assert_eq!(sequence, "GC[1]");
        assert_eq!(serials, BTreeSet::from([1]));

        let (sequence, serials) = protein.marked_sequence("A", &['G', 'C'], &chains(&["A"]), false);
        assert_eq!(sequence, "GC");
        assert!(serials.is_empty());

        let (sequence, _) = protein.marked_sequence("B", &['C', 'K'], &active, true);
        assert_eq!(sequence, "C[*][1]K[*]");
    }

    #[test]
    fn chain_groups_join_bonded_chains() {
        let protein = Protein::new(structure(), &catalog());
        assert_eq!(
            protein.chain_groups(&chains(&["C", "B", "A"])),
            vec![chains(&["A", "B"]), chains(&["C"])]
        );
        assert_eq!(
            protein.chain_groups(&chains(&["A", "C"])),
            vec![chains(&["A"]), chains(&["C"])]
        );
    }

    #[test]
    fn statistics_cover_active_amino_acid_atoms() {
        let protein = Protein::new(structure(), &catalog());
        let active = chains(&["A"]);
        assert_eq!(protein.center_of_mass(&active), Some(Point3::new(3.0, 0.0, 0.0)));
        assert_eq!(protein.longest_atom_distance(&active), 5.0);
        let rg = protein.radius_of_gyration(&active).unwrap();
        assert!((rg - (14.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(protein.mean_backbone_distance(&active), Some(4.0));
        assert_eq!(protein.mean_disulfide_bond_length(), 2.0);
    }
}
