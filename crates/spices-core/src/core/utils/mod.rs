//! Small helpers shared by the catalog, notation and topology modules.
//!
//! - [`particles`] - Token-aware scanning and replacement of particle names in SPICES text
//! - [`geometry`] - Centroids, diameters, quaternion/Euler conversion and sphere fitting

pub mod geometry;
pub mod particles;
