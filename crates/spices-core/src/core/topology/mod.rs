//! # Topology Module
//!
//! Turns per-chain SPICES and backbone coordinates into the numeric tables read
//! by the simulation engine.
//!
//! ## Overview
//!
//! Each residue fragment of a chain is parsed into a small arena tree, whose
//! parent/child links give the relative connection offsets of the coordinate
//! table. Bond markers (`[n]`) found while walking the fragments are collected and
//! resolved into symmetric connections once the whole table is known. Backbone
//! distance restraints are generated separately from the backbone inclusion and
//! segment state.
//!
//! ## Key Components
//!
//! - [`fragment`] - Arena tree of one residue fragment
//! - [`connection`] - Coordinate/connection table and bond resolution
//! - [`forces`] - Backbone distance-force tables
//! - [`error`] - Errors raised while reading fragments or mismatched inputs
//!
//! ## Usage
//!
//! ```ignore
//! use spices::core::topology::forces::{distance_forces, BackboneParticle};
//!
//! let forces = distance_forces(&particles, 1, 0.1, 100.0);
//! for force in &forces {
//!     println!("{}", force.to_line(6));
//! }
//! ```

pub mod connection;
pub mod error;
pub mod forces;
pub mod fragment;
