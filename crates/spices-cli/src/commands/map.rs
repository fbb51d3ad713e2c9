use crate::cli::{AssembliesArgs, MapArgs};
use crate::config::PartialMappingConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::ProgressDisplay;
use spices::core::catalog::registry::AminoAcidCatalog;
use spices::engine::mapper::PdbToDpd;
use spices::engine::progress::ProgressReporter;
use spices::workflows::{self, map::MappingResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub fn run(args: MapArgs, catalog: Arc<AminoAcidCatalog>, quiet: bool) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialMappingConfig::from_file(path)?,
        None => PartialMappingConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(&args)?;

    info!("Loading input structure from {:?}", &args.input);
    let pdb = fs::read_to_string(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let progress = if quiet {
        ProgressDisplay::hidden()
    } else {
        ProgressDisplay::new()
    };
    let reporter = ProgressReporter::with_callback(progress.callback());
    info!("Invoking the core mapping workflow...");
    let result = workflows::map::run(&pdb, catalog, &final_config, &reporter)?;
    drop(reporter);

    match &args.output {
        Some(dir) => {
            let stem = output_stem(&args.input);
            let written = write_outputs(&result, dir, &stem)?;
            println!("Mapped {} into {} files:", result.title, written.len());
            for path in written {
                println!("  {}", path.display());
            }
        }
        None => print!("{}", render(&result)),
    }
    Ok(())
}

pub fn assemblies(args: AssembliesArgs, catalog: Arc<AminoAcidCatalog>) -> Result<()> {
    info!("Loading input structure from {:?}", &args.input);
    let mapper = PdbToDpd::from_pdb_path(&args.input, catalog)?;
    for assembly in mapper.biological_assemblies() {
        println!("{}", assembly);
    }
    Ok(())
}

fn output_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string())
}

fn lines_to_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Writes every section of a mapping result as a separate file into `dir`.
pub fn write_outputs(result: &MappingResult, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut files = vec![
        (format!("{}.spices", stem), result.spices.clone()),
        (format!("{}.sequences.txt", stem), result.sequences.clone()),
        (
            format!("{}.coordinates.txt", stem),
            lines_to_text(&result.coordinate_table),
        ),
    ];
    for table in &result.distance_forces {
        files.push((
            format!("{}.distance-forces-k{}.txt", stem, table.distance_type),
            lines_to_text(&table.lines),
        ));
    }
    files.push((
        format!("{}.masterdata.toml", stem),
        result.masterdata.to_toml()?,
    ));

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        info!("Writing {:?}", &path);
        fs::write(&path, content)?;
        written.push(path);
    }
    Ok(written)
}

/// All sections of a mapping result as one text for the terminal.
pub fn render(result: &MappingResult) -> String {
    let mut text = format!("# {}\n\n## SPICES\n{}", result.title, result.spices);
    if !result.spices.ends_with('\n') {
        text.push('\n');
    }
    text.push_str("\n## Sequences\n");
    text.push_str(&result.sequences);
    if !result.sequences.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&format!(
        "\n## Coordinates (last index {}, last backbone index {})\n",
        result.last_index, result.last_backbone_index
    ));
    text.push_str(&lines_to_text(&result.coordinate_table));
    for table in &result.distance_forces {
        text.push_str(&format!("\n## Distance forces k={}\n", table.distance_type));
        text.push_str(&lines_to_text(&table.lines));
    }
    text
}
