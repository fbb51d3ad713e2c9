//! # SPICES Core Library
//!
//! Conversion of peptide notations into SPICES, the line notation of
//! coarse-grained particle molecules, and mapping of PDB protein structures onto
//! the particle tables of a dissipative particle dynamics (DPD) simulation.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a three-layer structure to separate stateless building
//! blocks from stateful services and user-facing procedures.
//!
//! - **[`core`]: The Foundation.** The amino acid catalog, peptide notation
//!   converters, the protein structure model with its PDB reader and the pure
//!   topology builders.
//!
//! - **[`engine`]: The Logic Core.** The PDB-to-DPD mapper with its persistable
//!   masterdata, the mapper pool and the mapping configuration.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that combine a
//!   configuration with the engine, such as converting a peptide or mapping a
//!   PDB file in one call.

pub mod core;
pub mod engine;
pub mod workflows;
