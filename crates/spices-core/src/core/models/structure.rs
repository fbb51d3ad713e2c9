use super::atom::Atom;
use super::chain::{Chain, base_chain_id};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use nalgebra::{Matrix3, Point3, Vector3};
use slotmap::SlotMap;
use std::collections::HashMap;

/// A disulfide bridge declared by an `SSBOND` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisulfideBond {
    pub serial: u32,
    pub chain1: String,
    pub residue1: isize,
    pub chain2: String,
    pub residue2: isize,
}

impl DisulfideBond {
    pub fn is_intra_chain(&self) -> bool {
        self.chain1 == self.chain2
    }
}

/// A molecule entry of the `COMPND` records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub molecule: String,
    pub chains: Vec<String>,
}

/// One `BIOMT` operator applied to a list of chains.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOperation {
    pub operator: usize,
    pub chains: Vec<String>,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl AssemblyOperation {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }
}

/// A `REMARK 350` biological assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct BiologicalAssembly {
    pub number: usize,
    pub operations: Vec<AssemblyOperation>,
}

/// Atoms, residues and chains of one protein model, plus the header records the
/// mapper needs.
#[derive(Debug, Clone, Default)]
pub struct ProteinStructure {
    id_code: Option<String>,
    title: Option<String>,
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    chain_id_map: HashMap<String, ChainId>,
    disulfide_bonds: Vec<DisulfideBond>,
    compounds: Vec<Compound>,
    assemblies: Vec<BiologicalAssembly>,
    model_count: usize,
}

impl ProteinStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_code(&self) -> Option<&str> {
        self.id_code.as_deref()
    }

    pub fn set_id_code(&mut self, id_code: &str) {
        self.id_code = Some(id_code.to_string()).filter(|s| !s.is_empty());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string()).filter(|s| !s.is_empty());
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn find_chain_by_id(&self, id: &str) -> Option<ChainId> {
        self.chain_id_map.get(id).copied()
    }

    /// Chain identifiers in ascending order.
    pub fn chain_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.chain_id_map.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the chain with the given identifier, creating it if needed.
    pub fn add_chain(&mut self, id: &str) -> ChainId {
        if let Some(&chain_id) = self.chain_id_map.get(id) {
            return chain_id;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id.to_string(), chain_id);
        chain_id
    }

    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        pdb_name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let residue_id = self
            .residues
            .insert(Residue::new(number, insertion_code, name, pdb_name, chain_id));
        chain.residues.push(residue_id);
        Some(residue_id)
    }

    /// Adds an atom to its residue. Returns `None` if the residue does not exist
    /// or already holds an atom of that name.
    pub fn add_atom(&mut self, atom: Atom) -> Option<AtomId> {
        let residue_id = atom.residue_id;
        if self.residues.get(residue_id)?.atom_id_by_name(&atom.name).is_some() {
            return None;
        }
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);
        Some(atom_id)
    }

    pub fn disulfide_bonds(&self) -> &[DisulfideBond] {
        &self.disulfide_bonds
    }

    pub fn add_disulfide_bond(&mut self, bond: DisulfideBond) {
        self.disulfide_bonds.push(bond);
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn add_compound(&mut self, compound: Compound) {
        self.compounds.push(compound);
    }

    /// The compound listing the chain, ignoring any assembly model suffix.
    pub fn compound_for_chain(&self, chain_id: &str) -> Option<&Compound> {
        let base = base_chain_id(chain_id);
        self.compounds
            .iter()
            .find(|c| c.chains.iter().any(|id| id == base))
    }

    pub fn assemblies(&self) -> &[BiologicalAssembly] {
        &self.assemblies
    }

    pub fn add_assembly(&mut self, assembly: BiologicalAssembly) {
        self.assemblies.push(assembly);
    }

    pub fn model_count(&self) -> usize {
        self.model_count
    }

    pub fn set_model_count(&mut self, count: usize) {
        self.model_count = count;
    }

    /// Builds the structure of biological assembly `number`.
    ///
    /// Every distinct operator becomes a model numbered from 1 in order of first
    /// appearance, and each transformed chain is named `<chain>/<model>`.
    /// Disulfide bonds are repeated for every model holding both partner chains
    /// and renumbered consecutively from 1.
    pub fn assembly(&self, number: usize) -> Option<ProteinStructure> {
        let assembly = self.assemblies.iter().find(|a| a.number == number)?;
        let mut built = ProteinStructure {
            id_code: self.id_code.clone(),
            title: self.title.clone(),
            compounds: self.compounds.clone(),
            assemblies: self.assemblies.clone(),
            ..Default::default()
        };

        let mut operators: Vec<usize> = Vec::new();
        for operation in &assembly.operations {
            let model = match operators.iter().position(|&o| o == operation.operator) {
                Some(index) => index + 1,
                None => {
                    operators.push(operation.operator);
                    operators.len()
                }
            };
            for chain_name in &operation.chains {
                if let Some(&source) = self.chain_id_map.get(chain_name) {
                    let target = format!("{}/{}", chain_name, model);
                    built.copy_chain(self, source, &target, |p| operation.apply(p));
                }
            }
        }
        built.model_count = operators.len();

        let mut serial = 0;
        for model in 1..=operators.len() {
            for bond in &self.disulfide_bonds {
                let chain1 = format!("{}/{}", bond.chain1, model);
                let chain2 = format!("{}/{}", bond.chain2, model);
                if built.chain_id_map.contains_key(&chain1)
                    && built.chain_id_map.contains_key(&chain2)
                {
                    serial += 1;
                    built.disulfide_bonds.push(DisulfideBond {
                        serial,
                        chain1,
                        residue1: bond.residue1,
                        chain2,
                        residue2: bond.residue2,
                    });
                }
            }
        }
        Some(built)
    }

    fn copy_chain<F>(&mut self, source: &ProteinStructure, chain: ChainId, target: &str, transform: F)
    where
        F: Fn(&Point3<f64>) -> Point3<f64>,
    {
        let Some(source_chain) = source.chains.get(chain) else {
            return;
        };
        let chain_id = self.add_chain(target);
        for &residue_id in source_chain.residues() {
            let Some(residue) = source.residues.get(residue_id) else {
                continue;
            };
            let Some(new_residue) = self.add_residue(
                chain_id,
                residue.number,
                residue.insertion_code,
                &residue.name,
                &residue.pdb_name,
            ) else {
                continue;
            };
            for &atom_id in residue.atoms() {
                if let Some(atom) = source.atoms.get(atom_id) {
                    let mut copy = atom.clone();
                    copy.residue_id = new_residue;
                    copy.position = transform(&atom.position);
                    self.add_atom(copy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_residue_with_ca(structure: &mut ProteinStructure, chain: &str, number: isize, x: f64) {
        let chain_id = structure.add_chain(chain);
        let residue_id = structure
            .add_residue(chain_id, number, None, "CYS", "CYS")
            .unwrap();
        structure.add_atom(Atom::new(number as usize, "CA", residue_id, Point3::new(x, 0.0, 0.0)));
    }

    fn two_chain_structure() -> ProteinStructure {
        let mut structure = ProteinStructure::new();
        add_residue_with_ca(&mut structure, "B", 1, 1.0);
        add_residue_with_ca(&mut structure, "A", 1, 2.0);
        add_residue_with_ca(&mut structure, "A", 2, 3.0);
        structure.add_disulfide_bond(DisulfideBond {
            serial: 1,
            chain1: "A".to_string(),
            residue1: 2,
            chain2: "B".to_string(),
            residue2: 1,
        });
        structure.add_compound(Compound {
            molecule: "INSULIN".to_string(),
            chains: vec!["A".to_string(), "B".to_string()],
        });
        structure
    }

    fn operation(operator: usize, chains: &[&str], shift: f64) -> AssemblyOperation {
        AssemblyOperation {
            operator,
            chains: chains.iter().map(|c| c.to_string()).collect(),
            rotation: Matrix3::identity(),
            translation: Vector3::new(shift, 0.0, 0.0),
        }
    }

    #[test]
    fn chain_ids_are_sorted_and_unique() {
        let structure = two_chain_structure();
        assert_eq!(structure.chain_ids(), vec!["A", "B"]);
        let a = structure.find_chain_by_id("A").unwrap();
        assert_eq!(structure.chain(a).unwrap().residues().len(), 2);
        assert_eq!(structure.atom_count(), 3);
    }

    #[test]
    fn duplicate_atom_names_are_rejected() {
        let mut structure = ProteinStructure::new();
        let chain_id = structure.add_chain("A");
        let residue_id = structure.add_residue(chain_id, 1, None, "ALA", "ALA").unwrap();
        assert!(structure.add_atom(Atom::new(1, "CA", residue_id, Point3::origin())).is_some());
        assert!(structure.add_atom(Atom::new(2, "CA", residue_id, Point3::origin())).is_none());
        assert_eq!(structure.atom_count(), 1);
    }

    #[test]
    fn compound_lookup_ignores_model_suffix() {
        let structure = two_chain_structure();
        assert_eq!(structure.compound_for_chain("B/2").unwrap().molecule, "INSULIN");
        assert!(structure.compound_for_chain("C").is_none());
    }

    #[test]
    fn assembly_builds_one_model_per_operator() {
        let mut structure = two_chain_structure();
        structure.add_assembly(BiologicalAssembly {
            number: 1,
            operations: vec![
                operation(1, &["A", "B"], 0.0),
                operation(2, &["A", "B"], 10.0),
            ],
        });

        let built = structure.assembly(1).unwrap();
        assert_eq!(built.chain_ids(), vec!["A/1", "A/2", "B/1", "B/2"]);
        assert_eq!(built.model_count(), 2);

        let shifted = built.find_chain_by_id("B/2").unwrap();
        let residue = built.chain(shifted).unwrap().residues()[0];
        let ca = built.residue(residue).unwrap().atom_id_by_name("CA").unwrap();
        assert_eq!(built.atom(ca).unwrap().position, Point3::new(11.0, 0.0, 0.0));

        let bonds = built.disulfide_bonds();
        assert_eq!(bonds.len(), 2);
        assert_eq!((bonds[0].serial, bonds[0].chain1.as_str()), (1, "A/1"));
        assert_eq!((bonds[1].serial, bonds[1].chain2.as_str()), (2, "B/2"));
    }

    #[test]
    fn assembly_drops_bonds_to_chains_outside_the_model() {
        let mut structure = two_chain_structure();
        structure.add_assembly(BiologicalAssembly {
            number: 1,
            operations: vec![operation(1, &["A"], 0.0)],
        });
        let built = structure.assembly(1).unwrap();
        assert_eq!(built.chain_ids(), vec!["A/1"]);
        assert!(built.disulfide_bonds().is_empty());
        assert!(structure.assembly(2).is_none());
    }
}
