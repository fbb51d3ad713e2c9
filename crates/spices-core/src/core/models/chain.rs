use super::ids::ResidueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,                      // Chain identifier (e.g., "A", or "A/2" inside an assembly)
    pub(crate) residues: Vec<ResidueId>, // Ordered list of residue IDs belonging to this chain
}

impl Chain {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    /// Chain identifier with any assembly model suffix removed.
    pub fn base_id(&self) -> &str {
        base_chain_id(&self.id)
    }
}

/// `"A/2"` -> `"A"`, `"A"` -> `"A"`.
pub fn base_chain_id(id: &str) -> &str {
    id.split_once('/').map_or(id, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_strips_the_model_suffix() {
        assert_eq!(Chain::new("A/2").base_id(), "A");
        assert_eq!(Chain::new("B").base_id(), "B");
        assert_eq!(base_chain_id("AB/10"), "AB");
    }
}
