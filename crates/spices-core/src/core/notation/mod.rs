//! # Peptide Notation
//!
//! Scanning, charging and translation of peptide sequences into SPICES.
//!
//! ## Overview
//!
//! A peptide sequence is a run of one or three letter codes. Each code may carry a
//! frequency prefix (`3A`), a charge block (`K{S+}`), disulfide bond markers (`C[1]`)
//! and ring closure markers (`A[*]`). This module validates such sequences, assigns
//! pH-dependent charge blocks and expands them into fragment based SPICES, where each
//! residue becomes its catalog fragment and fragments are joined by `-`.
//!
//! ## Key Components
//!
//! - [`validator`] - Grammar and marker-count checks with 1-based error positions
//! - [`convert`] - One/three letter translation and charge block removal
//! - [`charge`] - pH-dependent charge assignment
//! - [`builder`] - Incremental SPICES writer with marker insertion anchors
//! - [`spices`] - Sequence to SPICES expansion
//! - [`symbols`] - Help table of all accepted symbols
//! - [`converter`] - [`converter::PeptideToSpices`], the catalog-bound entry point
//!
//! ## Usage
//!
//! ```ignore
//! let converter = PeptideToSpices::new(Arc::new(AminoAcidCatalog::builtin()?));
//! converter.validate("AC[1]GC[1]", CodeWidth::OneLetter)?;
//! let charged = converter.charge_one_letter("AC[1]GC[1]", 7.0, false)?;
//! let spices = converter.one_letter_to_spices(&charged, true)?;
//! ```

pub mod builder;
pub mod charge;
pub mod convert;
pub mod converter;
pub mod error;
pub mod spices;
pub mod symbols;
pub mod validator;
