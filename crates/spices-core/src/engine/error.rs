use thiserror::Error;

use crate::core::catalog::error::CatalogError;
use crate::core::io::pdb::PdbError;
use crate::core::io::probes::ProbeError;
use crate::core::notation::error::NotationError;
use crate::core::topology::error::TopologyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No protein data available")]
    NoProteinData,

    #[error("Missing data: {0}")]
    MissingData(&'static str),

    #[error("Index {index} is out of range (1..={max})")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("Incorrect number of amino acids for chain '{chain}': expected {expected}, found {found}")]
    IncorrectAminoAcidCount {
        chain: String,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected} backbone particle entries, found {found}")]
    BackboneParticleCount { expected: usize, found: usize },

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Unknown biological assembly: {0}")]
    UnknownAssembly(String),

    #[error("Malformed masterdata entry {key}: '{value}'")]
    Masterdata { key: &'static str, value: String },

    #[error("Masterdata could not be read: {source}")]
    MasterdataRead {
        #[from]
        source: toml::de::Error,
    },

    #[error("Masterdata could not be written: {source}")]
    MasterdataWrite {
        #[from]
        source: toml::ser::Error,
    },

    #[error("Notation error: {source}")]
    Notation {
        #[from]
        source: NotationError,
    },

    #[error("Amino acid catalog error: {source}")]
    Catalog {
        #[from]
        source: CatalogError,
    },

    #[error("PDB error: {source}")]
    Pdb {
        #[from]
        source: PdbError,
    },

    #[error("Topology error: {source}")]
    Topology {
        #[from]
        source: TopologyError,
    },

    #[error("Probe file error: {source}")]
    Probe {
        #[from]
        source: ProbeError,
    },
}
