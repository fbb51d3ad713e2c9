use crate::core::models::structure::ProteinStructure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading protein structure file formats.
///
/// Implementors handle format-specific parsing; opening files and wrapping
/// in-memory text are shared default methods.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a protein structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<ProteinStructure, Self::Error>;

    /// Reads a protein structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ProteinStructure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads a protein structure from file content held in memory.
    fn read_from_str(content: &str) -> Result<ProteinStructure, Self::Error> {
        let mut reader = content.as_bytes();
        Self::read_from(&mut reader)
    }
}
