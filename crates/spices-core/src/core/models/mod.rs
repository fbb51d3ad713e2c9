//! # Models Module
//!
//! In-memory representation of a protein structure read from a PDB file.
//!
//! ## Overview
//!
//! Atoms, residues and chains are stored in slot maps and addressed through
//! stable keys, so that derived views can hold ids instead of references. The
//! structure also keeps the header records used during mapping: disulfide
//! bonds, compounds and biological assembly operators.
//!
//! ## Key Components
//!
//! - [`structure::ProteinStructure`] - Container for all components and header records
//! - [`atom::Atom`], [`residue::Residue`], [`chain::Chain`] - Individual components
//! - [`ids`] - Stable key types
//!
//! ## Usage
//!
//! ```ignore
//! use spices::core::models::structure::ProteinStructure;
//!
//! let mut structure = ProteinStructure::new();
//! let chain = structure.add_chain("A");
//! let residue = structure.add_residue(chain, 1, None, "ALA", "ALA");
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
