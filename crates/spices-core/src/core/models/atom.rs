use super::ids::ResidueId;
use nalgebra::Point3;

const SULFUR_GAMMA_ATOM_NAME: &str = "SG";
const ALPHA_CARBON_ATOM_NAME: &str = "CA";

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub serial: usize,         // Atom serial number from source file
    pub name: String,          // Atom name (e.g., "CA", "SG")
    pub element: String,       // Element symbol, may be empty
    pub residue_id: ResidueId, // ID of the parent residue
    pub position: Point3<f64>, // Cartesian coordinates in Ångström
}

impl Atom {
    /// Creates a new `Atom` with an empty element symbol.
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: String::new(),
            residue_id,
            position,
        }
    }

    pub fn is_alpha_carbon(&self) -> bool {
        self.name == ALPHA_CARBON_ATOM_NAME
    }

    pub fn is_sulfur_gamma(&self) -> bool {
        self.name == SULFUR_GAMMA_ATOM_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new(7, "CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, "");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn role_predicates_match_atom_names() {
        let residue_id = ResidueId::default();
        let ca = Atom::new(1, "CA", residue_id, Point3::origin());
        let sg = Atom::new(2, "SG", residue_id, Point3::origin());

        assert!(ca.is_alpha_carbon());
        assert!(!ca.is_sulfur_gamma());
        assert!(sg.is_sulfur_gamma());
        assert!(!sg.is_alpha_carbon());
    }
}
