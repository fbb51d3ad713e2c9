use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Malformed residue fragment '{fragment}' at position {position}")]
    MalformedFragment { fragment: String, position: usize },
    #[error("Chain '{chain}' has {fragments} residue fragments but {positions} backbone positions")]
    ResidueCountMismatch {
        chain: String,
        fragments: usize,
        positions: usize,
    },
    #[error("Backbone status array has no entry for backbone particle {index}")]
    StatusOutOfRange { index: usize },
}
