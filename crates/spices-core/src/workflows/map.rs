use crate::core::catalog::registry::AminoAcidCatalog;
use crate::engine::config::{MappingConfig, Orientation};
use crate::engine::error::EngineError;
use crate::engine::mapper::PdbToDpd;
use crate::engine::masterdata::Masterdata;
use crate::engine::progress::{Progress, ProgressReporter};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Distance force lines of one neighbour distance `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceForceTable {
    pub distance_type: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MappingResult {
    pub title: String,
    pub spices: String,
    pub sequences: String,
    pub coordinate_table: Vec<String>,
    pub distance_forces: Vec<DistanceForceTable>,
    pub last_index: usize,
    pub last_backbone_index: usize,
    /// Settings of the mapper after the run, enough to rebuild it.
    pub masterdata: Masterdata,
}

/// Maps a PDB file onto SPICES, the coordinate/connection table and the
/// backbone distance force tables for every `k` up to the configured maximum.
#[instrument(skip_all, name = "mapping_workflow")]
pub fn run(
    pdb: &str,
    catalog: Arc<AminoAcidCatalog>,
    config: &MappingConfig,
    reporter: &ProgressReporter,
) -> Result<MappingResult, EngineError> {
    // === Phase 1: Read structure and apply settings ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!("Reading structure and applying mapping settings.");
    let mut mapper = PdbToDpd::from_pdb(pdb, catalog)?;
    apply_config(&mut mapper, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: SPICES ===
    let (spices, sequences) = reporter.phase("SPICES", || {
        Ok::<_, EngineError>((mapper.spices()?, mapper.sequences()?))
    })?;

    // === Phase 3: Coordinates ===
    reporter.report(Progress::PhaseStart {
        name: "Coordinates",
    });
    let coordinate_table = mapper.coordinate_connection_table(
        config.placement.start_index,
        config.placement.start_backbone_index,
    )?;
    let last_index = mapper.last_index()?.unwrap_or_default();
    let last_backbone_index = mapper.last_backbone_index()?.unwrap_or_default();
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Distance forces ===
    reporter.report(Progress::PhaseStart {
        name: "Distance Forces",
    });
    let available = mapper.max_distance_type_of_protein_distance_forces()?;
    let max_distance_type = match config.distance_forces.max_distance_type {
        Some(requested) if requested > available => {
            warn!(
                "Requested distance type {} exceeds the largest available ({}); using {}.",
                requested, available, available
            );
            available
        }
        Some(requested) => requested,
        None => available,
    };
    reporter.report(Progress::TaskStart {
        total_steps: max_distance_type as u64,
    });
    let mut distance_forces = Vec::with_capacity(max_distance_type);
    for k in 1..=max_distance_type {
        let lines = mapper.protein_distance_forces(
            k,
            config.distance_forces.conversion_factor,
            config.distance_forces.force_constant,
        )?;
        debug!("Distance type {}: {} forces.", k, lines.len());
        distance_forces.push(DistanceForceTable {
            distance_type: k,
            lines,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        "Mapping complete: {} particles, {} backbone particles, {} distance force tables.",
        coordinate_table.len(),
        mapper.number_of_backbone_particles(),
        distance_forces.len()
    );
    Ok(MappingResult {
        title: mapper.title(),
        spices,
        sequences,
        coordinate_table,
        distance_forces,
        last_index,
        last_backbone_index,
        masterdata: mapper.masterdata().clone(),
    })
}

/// Transfers a mapping configuration onto a mapper.
///
/// The biological assembly is selected first, since switching it resets all
/// other settings.
pub fn apply_config(mapper: &mut PdbToDpd, config: &MappingConfig) -> Result<(), EngineError> {
    if let Some(assembly) = &config.biological_assembly {
        mapper.set_biological_assembly(assembly)?;
    }
    if let Some(chains) = &config.active_chains {
        mapper.set_active_chains(chains)?;
    }
    match config.ph {
        Some(ph) => mapper.set_ph(ph),
        None => mapper.clear_ph(),
    }
    mapper.set_circular(config.circular);
    mapper.set_decimals(config.decimals);
    mapper.set_frequency_spices(config.frequency_spices);
    if let Some(path) = &config.probe_file {
        mapper.load_probes(path)?;
    }

    let placement = &config.placement;
    mapper.set_center(&placement.center);
    mapper.set_radius(placement.radius);
    match &placement.orientation {
        Orientation::Unchanged => mapper.clear_rotation(),
        Orientation::Euler(angles) => mapper.set_rotation_euler(angles),
        Orientation::Random { seed } => {
            mapper.set_seed(*seed);
            mapper.set_random_orientation()?;
        }
    }
    Ok(())
}
