//! # Engine Module
//!
//! Stateful services that map a PDB structure onto coarse-grained SPICES and
//! the tables read by a DPD simulation.
//!
//! ## Overview
//!
//! A [`mapper::PdbToDpd`] owns one parsed structure together with its
//! [`masterdata::Masterdata`], the flat key/value record of every setting made
//! on it. Because the masterdata fully describes a mapper, it can be persisted,
//! handed between callers and used as the key of the [`pool::MapperPool`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated mapping parameters and their builder
//! - **State** ([`masterdata`]) - Persistable settings of a mapper
//! - **Protein View** ([`protein`]) - Backbone residues, sequences and structure statistics
//! - **Mapping** ([`mapper`]) - SPICES, coordinate tables and distance forces
//! - **Reuse** ([`pool`]) - Thread-safe checkout and release of mappers
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Usage
//!
//! ```ignore
//! use spices::engine::mapper::PdbToDpd;
//!
//! let mut mapper = PdbToDpd::from_pdb(&pdb_text, catalog)?;
//! mapper.set_ph(7.0);
//! println!("{}", mapper.spices()?);
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod masterdata;
pub mod pool;
pub mod progress;
pub mod protein;
