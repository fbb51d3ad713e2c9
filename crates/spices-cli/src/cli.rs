use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "SPICES CLI - Converts peptide notations into SPICES and maps PDB protein structures onto DPD particle tables.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Amino acid catalog in TOML format, replacing the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a peptide sequence and print OK or the first error.
    Validate(ValidateArgs),
    /// Convert a peptide sequence into SPICES.
    Convert(ConvertArgs),
    /// Translate a peptide sequence between one and three letter codes.
    Translate(TranslateArgs),
    /// Charge a one letter peptide sequence for a pH value.
    Charge(ChargeArgs),
    /// Print the symbols allowed in peptide sequences.
    Symbols(SymbolsArgs),
    /// Map a PDB structure onto SPICES, coordinates and distance forces.
    Map(MapArgs),
    /// List the biological assemblies of a PDB structure.
    Assemblies(AssembliesArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidthArg {
    One,
    Three,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Peptide sequence, e.g. "AC[1]GC[1]" or "Ala Cys Gly".
    pub sequence: String,

    /// Read the sequence as three letter codes.
    #[arg(long)]
    pub three_letter: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    pub sequence: String,

    /// Start every residue on a new line.
    #[arg(long)]
    pub line_breaks: bool,

    /// Read the sequence as three letter codes.
    #[arg(long)]
    pub three_letter: bool,

    /// Charge the peptide for this pH before converting.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Treat the peptide as a ring when charging.
    #[arg(long, requires = "ph")]
    pub circular: bool,
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    pub sequence: String,

    /// Target code width.
    #[arg(long, value_enum)]
    pub to: CodeWidthArg,
}

#[derive(Args, Debug)]
pub struct ChargeArgs {
    /// One letter peptide sequence.
    pub sequence: String,

    #[arg(long, value_name = "FLOAT")]
    pub ph: f64,

    /// The peptide is a ring without terminal groups.
    #[arg(long)]
    pub circular: bool,
}

#[derive(Args, Debug)]
pub struct SymbolsArgs {
    /// List three letter symbols instead of one letter symbols.
    #[arg(long)]
    pub three_letter: bool,
}

/// Arguments for the `map` subcommand.
#[derive(Args, Debug, Default)]
pub struct MapArgs {
    // --- Core Arguments ---
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a mapping configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for the output files. Results are printed when omitted.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    // --- Structure Overrides ---
    /// Comma separated chain ids to map.
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    pub chains: Vec<String>,

    /// Biological assembly, e.g. "Biological Assembly 1".
    #[arg(long, value_name = "NAME")]
    pub assembly: Option<String>,

    /// pH used to charge the peptide chains.
    #[arg(long, value_name = "FLOAT")]
    pub ph: Option<f64>,

    /// Close every chain into a ring.
    #[arg(long)]
    pub circular: bool,

    /// Replacement particles for backbone particles, as `ca-key,probe` CSV.
    #[arg(long, value_name = "PATH")]
    pub probes: Option<PathBuf>,

    // --- Placement Overrides ---
    /// Center of the protein in the simulation box.
    #[arg(long, value_delimiter = ',', num_args = 3, value_name = "X,Y,Z", allow_negative_numbers = true)]
    pub center: Option<Vec<f64>>,

    /// Radius of the sphere the protein is fitted into.
    #[arg(long, value_name = "FLOAT")]
    pub radius: Option<f64>,

    /// Euler rotation angles in radians.
    #[arg(long, value_delimiter = ',', num_args = 3, value_name = "X,Y,Z", allow_negative_numbers = true, conflicts_with = "random_orientation")]
    pub rotation: Option<Vec<f64>>,

    /// Rotate the protein randomly.
    #[arg(long)]
    pub random_orientation: bool,

    /// Seed of the random orientation.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[arg(long, value_name = "INT")]
    pub start_index: Option<usize>,

    #[arg(long, value_name = "INT")]
    pub start_backbone_index: Option<usize>,

    /// Number of decimals of coordinates and distances.
    #[arg(long, value_name = "INT")]
    pub decimals: Option<usize>,

    /// Do not compress identical chain groups in the SPICES.
    #[arg(long)]
    pub no_frequencies: bool,

    // --- Distance Force Overrides ---
    /// Largest neighbour distance for distance forces.
    #[arg(long, value_name = "INT")]
    pub max_distance_type: Option<usize>,

    /// Factor converting Angstrom into DPD length units.
    #[arg(long, value_name = "FLOAT")]
    pub conversion_factor: Option<f64>,

    #[arg(long, value_name = "FLOAT")]
    pub force_constant: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S placement.radius=12.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AssembliesArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}
