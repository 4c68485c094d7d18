use anyhow::Result;
use region_recom::{Partition, RegionIndex, num_region_splits, num_traversals, read_graph_json, read_plan_csv, region_pieces, region_split_details};

use crate::cli::{Cli, SplitsArgs};

pub fn run(cli: &Cli, args: &SplitsArgs) -> Result<()> {
    let graph = read_graph_json(&args.graph, &[args.region_col.as_str()], args.unit_col.as_deref())?;
    let districts = read_plan_csv(&args.plan, &graph)?;

    let mut regions = RegionIndex::from_graph(&graph, &args.region_col)?;
    if let Some(label) = &args.exclude { regions = regions.excluding(label) }

    let partition = Partition::new(graph, &districts)?;
    let assignment = partition.assignments();
    let traversals = num_traversals(partition.graph(), assignment, &regions);

    println!("regions: {}", regions.num_regions());
    println!("split: {}", num_region_splits(assignment, &regions));
    println!("pieces: {}", region_pieces(assignment, &regions));
    println!("traversals: {traversals}");

    if cli.verbose > 0 {
        for (name, parts) in regions.names().iter().zip(region_split_details(assignment, &regions)) {
            if parts.len() < 2 { continue }
            let districts = parts.iter().map(|&part| partition.district(part).to_string()).collect::<Vec<_>>();
            println!("  {name}: {}", districts.join(", "));
        }
    }

    Ok(())
}
