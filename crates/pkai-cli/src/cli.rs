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
    author = "pKAI-rs contributors",
    version,
    about = "pKAI CLI - Predict pKa values of titratable residues from a protein structure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the pKa of every titratable residue in a PDB file.
    Predict(PredictArgs),
    /// Inspect and locate the local model store.
    Models(ModelsArgs),
}

/// Output layout of the predictions.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Fixed-width columns: chain, residue number, residue type, pKa.
    #[default]
    Text,
    /// Comma-separated values with a header row.
    Csv,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to the input structure in PDB format.
    #[arg(required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output file. Predictions go to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the model to use (e.g., 'pkai' or 'pkai+').
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Directory holding the model artifacts, overriding the configured store.
    #[arg(long, value_name = "PATH")]
    pub model_store: Option<PathBuf>,

    /// Radius in Angstroms of the environment around each site.
    #[arg(long = "cutoff", value_name = "FLOAT")]
    pub cutoff_radius: Option<f64>,

    /// What to do with environment atoms the model has no class for: 'fail' or 'skip'.
    #[arg(long = "unmapped", value_name = "POLICY")]
    pub unmapped_policy: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S encoding.cutoff-radius=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `models` subcommand.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

/// Available commands for the model store.
#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List the known models and whether each is installed.
    List,
    /// Show the absolute path to the local model store.
    Path,
    /// Set a custom absolute path for the local model store.
    SetPath {
        /// The new directory to look for models in.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the model store path to its default, OS-specific location.
    ResetPath,
}
