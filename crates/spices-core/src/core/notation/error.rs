use crate::core::catalog::error::CatalogError;
use thiserror::Error;

/// Failures of peptide notation scanning and conversion. Positions are 1-based.
#[derive(Debug, Error)]
pub enum NotationError {
    #[error("Syntax error at position {position}")]
    Syntax { position: usize },

    #[error("Incorrect disulfide bond definition at position {position}: only cysteine can form a disulfide bond")]
    IncorrectDisulfideBondDefinition { position: usize },

    #[error("Incorrect disulfide bond count for bond index {index}: exactly two cysteines are required")]
    IncorrectDisulfideBondCount { index: u32 },

    #[error("Illegal ring closure at position {position}: only the first and the last amino acid may close a ring")]
    IllegalRingClosure { position: usize },

    #[error("Illegal number of ring closures ({count}): either none or exactly two are required")]
    IllegalNumberOfRingClosures { count: usize },

    #[error("Incorrect charge argument: '{0}'")]
    IncorrectChargeArgument(String),

    #[error("Amino acid data is incomplete: {found} of 20 amino acids are defined")]
    MissingAminoAcidData { found: usize },

    #[error("Unknown amino acid: '{0}'")]
    UnknownAminoAcid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
