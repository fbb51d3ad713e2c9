//! # Workflows Module
//!
//! High-level entry points that run a complete procedure in one call.
//!
//! ## Overview
//!
//! Workflows combine the catalog, the notation converters and the mapper with
//! a configuration, report their phases through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and return
//! plain result structures ready to be printed or written to files.
//!
//! ## Architecture
//!
//! - **Conversion Workflow** ([`convert`]) - Validation, translation, charging and
//!   SPICES conversion of a single peptide.
//! - **Mapping Workflow** ([`map`]) - SPICES, coordinate/connection table and
//!   distance force tables of a PDB structure.

pub mod convert;
pub mod map;
