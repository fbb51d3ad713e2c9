use crate::cli::MapArgs;
use crate::error::{CliError, Result};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use spices::engine::config::{self as core_config, DEFAULT_SEED, Orientation};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPlacementConfig {
    center: Option<[f64; 3]>,
    radius: Option<f64>,
    rotation: Option<[f64; 3]>,
    random_orientation: Option<bool>,
    seed: Option<u64>,
    start_index: Option<usize>,
    start_backbone_index: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialDistanceForceConfig {
    max_distance_type: Option<usize>,
    conversion_factor: Option<f64>,
    force_constant: Option<f64>,
}

/// Mapping settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialMappingConfig {
    ph: Option<f64>,
    circular: Option<bool>,
    chains: Option<Vec<String>>,
    biological_assembly: Option<String>,
    decimals: Option<usize>,
    frequency_spices: Option<bool>,
    probe_file: Option<PathBuf>,
    placement: Option<PartialPlacementConfig>,
    distance_forces: Option<PartialDistanceForceConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

impl PartialMappingConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        // Relative probe files are resolved against the config file.
        if let Some(dir) = path.parent() {
            config.probe_file = config
                .probe_file
                .take()
                .map(|p| if p.is_relative() { dir.join(p) } else { p });
        }
        Ok(config)
    }

    /// Merges the file values with the command line. `--set` values replace
    /// file values and flags win over both.
    pub fn merge_with_cli(mut self, args: &MapArgs) -> Result<core_config::MappingConfig> {
        self.apply_set_values(&args.set_values)?;

        let placement = self.placement.take().unwrap_or_default();
        let forces = self.distance_forces.take().unwrap_or_default();

        let center = match &args.center {
            Some(values) => Some(Self::triple("center", values)?),
            None => placement.center,
        }
        .ok_or_else(|| {
            CliError::Config("`placement.center` is required (or --center X,Y,Z).".to_string())
        })?;
        let radius = args.radius.or(placement.radius).ok_or_else(|| {
            CliError::Config("`placement.radius` is required (or --radius).".to_string())
        })?;

        let rotation = match &args.rotation {
            Some(values) => Some(Self::triple("rotation", values)?),
            None => placement.rotation,
        };
        let orientation = if args.random_orientation || placement.random_orientation == Some(true)
        {
            Orientation::Random {
                seed: args.seed.or(placement.seed).unwrap_or(DEFAULT_SEED),
            }
        } else if let Some([x, y, z]) = rotation {
            Orientation::Euler(Vector3::new(x, y, z))
        } else {
            Orientation::Unchanged
        };

        let mut builder = core_config::MappingConfigBuilder::new()
            .center(Point3::from(center))
            .radius(radius)
            .orientation(orientation)
            .circular(args.circular || self.circular.unwrap_or(false))
            .frequency_spices(!args.no_frequencies && self.frequency_spices.unwrap_or(true))
            .conversion_factor(
                args.conversion_factor
                    .or(forces.conversion_factor)
                    .unwrap_or(1.0),
            )
            .force_constant(args.force_constant.or(forces.force_constant).unwrap_or(1.0));

        if let Some(ph) = args.ph.or(self.ph) {
            builder = builder.ph(ph);
        }
        let chains = if args.chains.is_empty() {
            self.chains
        } else {
            Some(args.chains.clone())
        };
        if let Some(chains) = chains {
            builder = builder.active_chains(chains);
        }
        if let Some(assembly) = args.assembly.clone().or(self.biological_assembly) {
            builder = builder.biological_assembly(assembly);
        }
        if let Some(decimals) = args.decimals.or(self.decimals) {
            builder = builder.decimals(decimals);
        }
        if let Some(path) = args.probes.clone().or(self.probe_file) {
            builder = builder.probe_file(path);
        }
        if let Some(index) = args.start_index.or(placement.start_index) {
            builder = builder.start_index(index);
        }
        if let Some(index) = args.start_backbone_index.or(placement.start_backbone_index) {
            builder = builder.start_backbone_index(index);
        }
        if let Some(k) = args.max_distance_type.or(forces.max_distance_type) {
            builder = builder.max_distance_type(k);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn triple(name: &str, values: &[f64]) -> Result<[f64; 3]> {
        <[f64; 3]>::try_from(values).map_err(|_| {
            CliError::Argument(format!("--{} expects exactly three values", name))
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "ph" => self.ph = Some(parse_value(key, value)?),
                "circular" => self.circular = Some(parse_value(key, value)?),
                "biological-assembly" => self.biological_assembly = Some(value.trim().to_string()),
                "decimals" => self.decimals = Some(parse_value(key, value)?),
                "frequency-spices" => self.frequency_spices = Some(parse_value(key, value)?),
                "placement.radius" => {
                    self.placement.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value)?)
                }
                "placement.seed" => {
                    self.placement.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value)?)
                }
                "placement.random-orientation" => {
                    self.placement
                        .get_or_insert_with(Default::default)
                        .random_orientation = Some(parse_value(key, value)?)
                }
                "placement.start-index" => {
                    self.placement.get_or_insert_with(Default::default).start_index =
                        Some(parse_value(key, value)?)
                }
                "placement.start-backbone-index" => {
                    self.placement
                        .get_or_insert_with(Default::default)
                        .start_backbone_index = Some(parse_value(key, value)?)
                }
                "distance-forces.max-distance-type" => {
                    self.distance_forces
                        .get_or_insert_with(Default::default)
                        .max_distance_type = Some(parse_value(key, value)?)
                }
                "distance-forces.conversion-factor" => {
                    self.distance_forces
                        .get_or_insert_with(Default::default)
                        .conversion_factor = Some(parse_value(key, value)?)
                }
                "distance-forces.force-constant" => {
                    self.distance_forces
                        .get_or_insert_with(Default::default)
                        .force_constant = Some(parse_value(key, value)?)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    const FULL_CONFIG: &str = r#"
        ph = 7.0
        chains = ["A", "B"]
        decimals = 3
        probe-file = "probes.csv"

        [placement]
        center = [10.0, 10.0, 10.0]
        radius = 5.0
        rotation = [0.0, 1.0, 0.0]
        start-index = 20

        [distance-forces]
        max-distance-type = 2
        conversion-factor = 0.1
        force-constant = 100.0
    "#;

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn map_args(extra: &[&str]) -> MapArgs {
        let mut argv = vec!["spices", "map", "-i", "in.pdb"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Map(args) => args,
            _ => panic!("Expected 'map' subcommand"),
        }
    }

    #[test]
    fn file_values_fill_the_config() {
        let path = write_config_file("full.toml", FULL_CONFIG);
        let config = PartialMappingConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&map_args(&[]))
            .unwrap();

        assert_eq!(config.ph, Some(7.0));
        assert_eq!(config.active_chains, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(config.decimals, 3);
        assert_eq!(config.probe_file, Some(TEST_DIR.path().join("probes.csv")));
        assert!(config.frequency_spices);
        assert_eq!(config.placement.center, Point3::new(10.0, 10.0, 10.0));
        assert_eq!(config.placement.start_index, 20);
        assert_eq!(config.placement.start_backbone_index, 1);
        assert_eq!(
            config.placement.orientation,
            Orientation::Euler(Vector3::new(0.0, 1.0, 0.0))
        );
        assert_eq!(config.distance_forces.max_distance_type, Some(2));
        assert_eq!(config.distance_forces.force_constant, 100.0);
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let path = write_config_file("override.toml", FULL_CONFIG);
        let args = map_args(&[
            "--radius",
            "8",
            "--chains",
            "B",
            "--random-orientation",
            "--seed",
            "42",
            "--no-frequencies",
        ]);
        let config = PartialMappingConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.placement.radius, 8.0);
        assert_eq!(config.active_chains, Some(vec!["B".to_string()]));
        assert_eq!(config.placement.orientation, Orientation::Random { seed: 42 });
        assert!(!config.frequency_spices);
    }

    #[test]
    fn set_values_override_file_and_flags() {
        let path = write_config_file("set.toml", FULL_CONFIG);
        let args = map_args(&[
            "--radius",
            "8",
            "-S",
            "placement.radius=12.5",
            "-S",
            "distance-forces.force-constant=50",
        ]);
        let config = PartialMappingConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        // Flags still win: --set only edits the file layer.
        assert_eq!(config.placement.radius, 8.0);
        assert_eq!(config.distance_forces.force_constant, 50.0);
    }

    #[test]
    fn missing_center_is_reported() {
        let result = PartialMappingConfig::default().merge_with_cli(&map_args(&["--radius", "3"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("center")));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        let args = map_args(&["--center", "0,0,0", "--radius", "1", "-S", "placement.radius=big"]);
        assert!(matches!(
            PartialMappingConfig::default().merge_with_cli(&args),
            Err(CliError::Config(_))
        ));
        let args = map_args(&["--center", "0,0,0", "--radius", "1", "-S", "unknown=1"]);
        assert!(matches!(
            PartialMappingConfig::default().merge_with_cli(&args),
            Err(CliError::Config(msg)) if msg.contains("unknown")
        ));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let path = write_config_file("unknown.toml", "colour = \"red\"\n");
        assert!(matches!(
            PartialMappingConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn builder_validation_surfaces_as_config_error() {
        let args = map_args(&["--center", "0,0,0", "--radius=-1"]);
        assert!(matches!(
            PartialMappingConfig::default().merge_with_cli(&args),
            Err(CliError::Config(msg)) if msg.contains("radius")
        ));
    }
}
