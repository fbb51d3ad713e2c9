//! # Core Module
//!
//! Stateless data structures and algorithms for peptide notation and
//! coarse-grained protein topology.
//!
//! ## Overview
//!
//! The core module holds everything that does not keep state between calls:
//! the amino acid catalog, the peptide notation converters, the protein
//! structure model with its readers, geometry helpers and the pure topology
//! builders. Stateful services built on top of it live in the engine.
//!
//! ## Key Components
//!
//! - [`catalog`] - Amino acid definitions and charge settings
//! - [`notation`] - Validation, conversion and charging of peptide notation
//! - [`models`] - Protein structure representation
//! - [`io`] - PDB and probe file readers
//! - [`topology`] - Coordinate/connection tables and distance forces
//! - [`utils`] - Geometry and SPICES particle helpers
//!
//! ## Usage
//!
//! ```ignore
//! use spices::core::catalog::registry::AminoAcidCatalog;
//! use spices::core::notation::converter::PeptideToSpices;
//! use std::sync::Arc;
//!
//! let converter = PeptideToSpices::new(Arc::new(AminoAcidCatalog::builtin()?));
//! let spices = converter.one_letter_to_spices("ACD", false)?;
//! ```

pub mod catalog;
pub mod io;
pub mod models;
pub mod notation;
pub mod topology;
pub mod utils;
