use std::path::PathBuf;

use region_recom::Division;

/// Region-aware ReCom chains for redistricting
#[derive(clap::Parser, Debug)]
#[command(name = "region-recom", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run a ReCom chain and record every state as JSON lines
    Chain(ChainArgs),

    /// Count the regions a plan splits
    Splits(SplitsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ChainArgs {
    /// Dual graph in NetworkX JSON (adjacency or node-link layout)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Chain settings as JSON; flags below override its fields
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Node attribute holding population
    #[arg(long = "pop-col")]
    pub pop_col: Option<String>,

    /// Number of districts
    #[arg(short, long)]
    pub districts: Option<u32>,

    /// Allowed relative deviation from the ideal district population, e.g. 0.02
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Number of states to record, including the initial plan
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// Random seed; drawn from the OS if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Region column to keep whole, highest priority first (repeatable)
    #[arg(long = "division", value_name = "COLUMN[:WEIGHT]")]
    pub divisions: Vec<Division>,

    /// Prefer cuts along division boundaries on the first search of each tree
    #[arg(long)]
    pub first_check_division: bool,

    /// Searches per spanning tree, each from a fresh random root
    #[arg(long)]
    pub node_repeats: Option<usize>,

    /// Spanning trees to draw before a recombination gives up
    #[arg(long = "attempts")]
    pub attempts: Option<usize>,

    /// Initial plan (geo_id,district CSV); built by recursive tree partitioning if omitted
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub initial: Option<PathBuf>,

    /// Label column whose split count is recorded with every state
    #[arg(long = "region-col")]
    pub region_col: Option<String>,

    /// Node attribute keying plan files, e.g. GEOID20 (defaults to the graph's node ids)
    #[arg(long = "unit-col")]
    pub unit_col: Option<String>,

    /// Output chain file (JSON lines)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Also write the final plan as geo_id,district CSV
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub plan_out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SplitsArgs {
    /// Dual graph in NetworkX JSON
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub graph: PathBuf,

    /// Plan as geo_id,district CSV
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub plan: PathBuf,

    /// Label column defining the regions (e.g. COUNTYFP)
    #[arg(long = "region-col")]
    pub region_col: String,

    /// Node attribute keying the plan file, e.g. GEOID20 (defaults to the graph's node ids)
    #[arg(long = "unit-col")]
    pub unit_col: Option<String>,

    /// Placeholder label to ignore, e.g. 99999 for unincorporated area
    #[arg(long)]
    pub exclude: Option<String>,
}
