//! Provides input for protein structure files and probe tables.
//!
//! This module contains the PDB reader that fills a
//! [`ProteinStructure`](crate::core::models::structure::ProteinStructure), the
//! trait shared by structure readers, and the CSV reader for backbone probe
//! substitutions.

pub mod pdb;
pub mod probes;
pub mod traits;
