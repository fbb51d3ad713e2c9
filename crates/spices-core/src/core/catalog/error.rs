use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid amino acid definition: {0}")]
    InvalidDefinition(String),
    #[error("Not a valid amino acid code: '{0}'")]
    InvalidCode(String),
    #[error("Invalid amino acid SPICES: '{0}'")]
    InvalidSpices(String),
    #[error("Unknown amino acid: '{0}'")]
    UnknownAminoAcid(String),
    #[error("Invalid charge setting '{setting}': {reason}")]
    InvalidChargeSetting { setting: String, reason: &'static str },
    #[error("Amino acid '{amino_acid}' has no {charge_type} charge setting")]
    MissingChargeSetting {
        amino_acid: String,
        charge_type: &'static str,
    },
}
