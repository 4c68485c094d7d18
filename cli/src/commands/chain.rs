use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use rand::{SeedableRng, rngs::StdRng};
use region_recom::{
    ChainConfig, ChainRecorder, MarkovChain, Partition, ReCom, RegionIndex,
    read_graph_json, read_plan_csv, recursive_tree_part, write_plan_csv,
};
use tracing::info;

use crate::cli::{ChainArgs, Cli};

/// Merge the config file (if any) with command-line overrides.
pub(crate) fn resolve_config(args: &ChainArgs) -> Result<ChainConfig> {
    let mut config = match &args.config {
        Some(path) => ChainConfig::from_json_file(path)?,
        None => {
            let (Some(pop_col), Some(districts), Some(epsilon), Some(steps)) =
                (&args.pop_col, args.districts, args.epsilon, args.steps)
            else {
                bail!("[chain] --pop-col, --districts, --epsilon and --steps are required without --config");
            };
            ChainConfig::new(pop_col.clone(), districts, epsilon, steps)
        }
    };

    if let Some(pop_col) = &args.pop_col { config.pop_column = pop_col.clone() }
    if let Some(districts) = args.districts { config.num_districts = districts }
    if let Some(epsilon) = args.epsilon { config.epsilon = epsilon }
    if let Some(steps) = args.steps { config.steps = steps }
    if args.seed.is_some() { config.seed = args.seed }
    if !args.divisions.is_empty() { config.divisions = args.divisions.clone() }
    if args.first_check_division { config.first_check_division = true }
    if let Some(node_repeats) = args.node_repeats { config.node_repeats = node_repeats }
    if let Some(attempts) = args.attempts { config.attempts_before_giveup = attempts }
    if args.region_col.is_some() { config.region_column = args.region_col.clone() }
    if args.unit_col.is_some() { config.unit_column = args.unit_col.clone() }

    config.validate().context("[chain] Invalid chain configuration")?;
    Ok(config)
}

pub fn run(_cli: &Cli, args: &ChainArgs) -> Result<()> {
    let config = resolve_config(args)?;

    let mut label_columns = config.divisions.iter().map(|division| division.column.as_str()).collect::<Vec<_>>();
    label_columns.extend(config.region_column.as_deref());

    info!("[chain] loading graph from {}", args.graph.display());
    let graph = Arc::new(read_graph_json(&args.graph, &label_columns, config.unit_column.as_deref())?);
    info!("[chain] {} nodes, {} edges", graph.node_count(), graph.edge_count());

    let total = graph.series(&config.pop_column)?.iter().sum::<f64>();
    let ideal = total / config.num_districts as f64;
    let params = config.bipartition_params(ideal);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let initial = match &args.initial {
        Some(path) => {
            info!("[chain] reading initial plan from {}", path.display());
            let partition = Partition::new(Arc::clone(&graph), &read_plan_csv(path, &graph)?)?;
            ensure!(partition.num_parts() == config.num_districts,
                "[chain] Initial plan has {} districts, expected {}", partition.num_parts(), config.num_districts);
            partition
        }
        None => {
            info!("[chain] building initial plan with {} districts", config.num_districts);
            recursive_tree_part(Arc::clone(&graph), config.num_districts, &params, &mut rng)?
        }
    };

    let mut recorder = ChainRecorder::create(&args.output)?;
    if let Some(column) = &config.region_column {
        recorder = recorder.with_regions(RegionIndex::from_graph(&graph, column)?);
    }

    info!("[chain] running {} steps (ideal population {ideal:.1}, epsilon {})", config.steps, config.epsilon);
    let mut chain = MarkovChain::new(ReCom::new(params), initial, config.steps, &mut rng)?;
    let report_every = (config.steps / 10).max(1);
    for state in chain.by_ref() {
        let state = state?;
        recorder.record(&state)?;
        if state.step % report_every == 0 {
            info!("[chain] step {}/{}", state.step, config.steps);
        }
    }

    info!("[chain] accepted {} of {} proposals", chain.accepted(), config.steps - 1);
    recorder.finish()?;

    if let Some(path) = &args.plan_out {
        info!("[chain] writing final plan to {}", path.display());
        write_plan_csv(path, chain.state())?;
    }

    Ok(())
}
