use nalgebra::{Point3, Vector3};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DECIMALS: usize = 6;
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// How the backbone coordinates are oriented before they are fitted into the
/// target sphere.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Orientation {
    /// Keep the orientation of the PDB file.
    #[default]
    Unchanged,
    /// Rotate by Euler angles in radians.
    Euler(Vector3<f64>),
    /// Uniform random orientation drawn from a seeded generator.
    Random { seed: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub center: Point3<f64>,
    pub radius: f64,
    pub orientation: Orientation,
    pub start_index: usize,
    pub start_backbone_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceForceConfig {
    /// Largest neighbour distance `k`; `None` uses the largest one available.
    pub max_distance_type: Option<usize>,
    pub conversion_factor: f64,
    pub force_constant: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    pub ph: Option<f64>,
    pub circular: bool,
    pub active_chains: Option<Vec<String>>,
    pub biological_assembly: Option<String>,
    pub decimals: usize,
    pub frequency_spices: bool,
    pub probe_file: Option<PathBuf>,
    pub placement: PlacementConfig,
    pub distance_forces: DistanceForceConfig,
}

#[derive(Default)]
pub struct MappingConfigBuilder {
    ph: Option<f64>,
    circular: Option<bool>,
    active_chains: Option<Vec<String>>,
    biological_assembly: Option<String>,
    decimals: Option<usize>,
    frequency_spices: Option<bool>,
    probe_file: Option<PathBuf>,
    center: Option<Point3<f64>>,
    radius: Option<f64>,
    orientation: Option<Orientation>,
    start_index: Option<usize>,
    start_backbone_index: Option<usize>,
    max_distance_type: Option<usize>,
    conversion_factor: Option<f64>,
    force_constant: Option<f64>,
}

impl MappingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }
    pub fn circular(mut self, circular: bool) -> Self {
        self.circular = Some(circular);
        self
    }
    pub fn active_chains(mut self, chains: Vec<String>) -> Self {
        self.active_chains = Some(chains);
        self
    }
    pub fn biological_assembly(mut self, assembly: String) -> Self {
        self.biological_assembly = Some(assembly);
        self
    }
    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }
    pub fn frequency_spices(mut self, enabled: bool) -> Self {
        self.frequency_spices = Some(enabled);
        self
    }
    pub fn probe_file(mut self, path: PathBuf) -> Self {
        self.probe_file = Some(path);
        self
    }
    pub fn center(mut self, center: Point3<f64>) -> Self {
        self.center = Some(center);
        self
    }
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = Some(index);
        self
    }
    pub fn start_backbone_index(mut self, index: usize) -> Self {
        self.start_backbone_index = Some(index);
        self
    }
    pub fn max_distance_type(mut self, k: usize) -> Self {
        self.max_distance_type = Some(k);
        self
    }
    pub fn conversion_factor(mut self, factor: f64) -> Self {
        self.conversion_factor = Some(factor);
        self
    }
    pub fn force_constant(mut self, constant: f64) -> Self {
        self.force_constant = Some(constant);
        self
    }

    pub fn build(self) -> Result<MappingConfig, ConfigError> {
        let radius = self.radius.ok_or(ConfigError::MissingParameter("radius"))?;
        if radius.is_nan() || radius <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "radius",
                reason: format!("{} is not positive", radius),
            });
        }
        if let Some(ph) = self.ph {
            if !(0.0..=14.0).contains(&ph) {
                return Err(ConfigError::InvalidParameter {
                    parameter: "ph",
                    reason: format!("{} is outside 0-14", ph),
                });
            }
        }
        let start_index = self.start_index.unwrap_or(1);
        let start_backbone_index = self.start_backbone_index.unwrap_or(1);
        if start_index == 0 || start_backbone_index == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "start-index",
                reason: "indices start at 1".to_string(),
            });
        }

        let placement = PlacementConfig {
            center: self.center.ok_or(ConfigError::MissingParameter("center"))?,
            radius,
            orientation: self.orientation.unwrap_or_default(),
            start_index,
            start_backbone_index,
        };
        let distance_forces = DistanceForceConfig {
            max_distance_type: self.max_distance_type,
            conversion_factor: self
                .conversion_factor
                .ok_or(ConfigError::MissingParameter("conversion_factor"))?,
            force_constant: self
                .force_constant
                .ok_or(ConfigError::MissingParameter("force_constant"))?,
        };
        Ok(MappingConfig {
            ph: self.ph,
            circular: self.circular.unwrap_or(false),
            active_chains: self.active_chains,
            biological_assembly: self.biological_assembly,
            decimals: self.decimals.unwrap_or(DEFAULT_DECIMALS),
            frequency_spices: self.frequency_spices.unwrap_or(true),
            probe_file: self.probe_file,
            placement,
            distance_forces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> MappingConfigBuilder {
        MappingConfigBuilder::new()
            .center(Point3::new(10.0, 10.0, 10.0))
            .radius(5.0)
            .conversion_factor(0.1)
            .force_constant(100.0)
    }

    #[test]
    fn build_applies_defaults() {
        let config = complete().build().unwrap();
        assert_eq!(config.decimals, DEFAULT_DECIMALS);
        assert!(config.frequency_spices);
        assert!(!config.circular);
        assert_eq!(config.placement.orientation, Orientation::Unchanged);
        assert_eq!(config.placement.start_index, 1);
        assert_eq!(config.distance_forces.max_distance_type, None);
    }

    #[test]
    fn build_fails_without_required_parameters() {
        assert_eq!(
            MappingConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("radius")
        );
        assert_eq!(
            MappingConfigBuilder::new().radius(1.0).build().unwrap_err(),
            ConfigError::MissingParameter("center")
        );
        assert_eq!(
            MappingConfigBuilder::new()
                .radius(1.0)
                .center(Point3::origin())
                .build()
                .unwrap_err(),
            ConfigError::MissingParameter("conversion_factor")
        );
    }

    #[test]
    fn build_rejects_out_of_range_values() {
        assert!(matches!(
            complete().radius(0.0).build(),
            Err(ConfigError::InvalidParameter { parameter: "radius", .. })
        ));
        assert!(matches!(
            complete().ph(15.0).build(),
            Err(ConfigError::InvalidParameter { parameter: "ph", .. })
        ));
        assert!(matches!(
            complete().start_index(0).build(),
            Err(ConfigError::InvalidParameter { parameter: "start-index", .. })
        ));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = complete()
            .ph(7.0)
            .circular(true)
            .decimals(3)
            .frequency_spices(false)
            .orientation(Orientation::Random { seed: 42 })
            .active_chains(vec!["B".into()])
            .build()
            .unwrap();
        assert_eq!(config.ph, Some(7.0));
        assert!(config.circular);
        assert_eq!(config.decimals, 3);
        assert!(!config.frequency_spices);
        assert_eq!(config.placement.orientation, Orientation::Random { seed: 42 });
        assert_eq!(config.active_chains, Some(vec!["B".to_string()]));
    }
}
