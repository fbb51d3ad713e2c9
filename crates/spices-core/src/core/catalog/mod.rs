//! # Amino Acid Catalog
//!
//! Coarse-grained templates for the 20 standard amino acids.
//!
//! ## Overview
//!
//! Each [`amino_acid::AminoAcid`] carries a SPICES fragment whose first particle is the
//! backbone particle, plus an ordered list of [`charge::ChargeSetting`]s describing its
//! terminal, side chain and disulfide states. The [`registry::AminoAcidCatalog`] owns
//! the templates and answers code lookups for the notation layer.
//!
//! ## Key Components
//!
//! - [`charge`] - Protonation equilibria and their `TYPE&pKs?protonated:deprotonated` form
//! - [`amino_acid`] - A single residue template and its pH-dependent charged code
//! - [`registry`] - The catalog: TOML loading, legacy definition strings, charged fragments
//! - [`error`] - Loading and lookup failures
//!
//! ## Usage
//!
//! ```ignore
//! use spices::core::catalog::registry::AminoAcidCatalog;
//!
//! let catalog = AminoAcidCatalog::builtin()?;
//! let lysine = catalog.by_three_letter("Lys").unwrap();
//! assert_eq!(lysine.one_letter_code_charged_free(7.0), "K{C-N+S+}");
//! ```

pub mod amino_acid;
pub mod charge;
pub mod error;
pub mod registry;
