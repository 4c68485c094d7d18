use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::{
    error::{RecomError, Result},
    graph::Graph,
    partition::{BipartitionParams, Partition, bipartition_tree},
};

/// Build a contiguous plan with `num_parts` districts by carving parts off one at a time.
///
/// `params.pop_target` is the ideal district population and `params.epsilon` its tolerance.
/// Each carved part shifts the balance window of the next by the accumulated deviation from
/// ideal, so the final remainder also lands within tolerance.
pub fn recursive_tree_part<R: Rng + ?Sized>(
    graph: impl Into<Arc<Graph>>,
    num_parts: u32,
    params: &BipartitionParams,
    rng: &mut R,
) -> Result<Partition> {
    let graph: Arc<Graph> = graph.into();
    if num_parts == 0 {
        return Err(RecomError::InvalidConfig("number of parts must be at least 1".into()));
    }
    params.validate()?;

    let population = graph.series(&params.pop_column)?;
    let (ideal, epsilon) = (params.pop_target, params.epsilon);

    let mut districts = vec![num_parts - 1; graph.node_count()];
    let mut remaining = (0..graph.node_count()).collect::<Vec<_>>();
    let mut debt = 0.0;

    for part in 0..num_parts - 1 {
        let min_pop = (ideal * (1.0 - epsilon)).max(ideal * (1.0 - epsilon) - debt);
        let max_pop = (ideal * (1.0 + epsilon)).min(ideal * (1.0 + epsilon) - debt);
        let target = (min_pop + max_pop) / 2.0;
        let step = params.with_target(target, (max_pop - min_pop) / (2.0 * target));

        // Local node i of the subgraph is remaining[i].
        let subgraph = graph.induced_subgraph(&remaining);
        let Some(cut) = bipartition_tree(&subgraph, &step, rng)? else {
            return Err(RecomError::Exhausted { part });
        };

        let mut carved = vec![false; remaining.len()];
        let mut part_pop = 0.0;
        for &i in &cut.subset {
            carved[i] = true;
            districts[remaining[i]] = part;
            part_pop += population[remaining[i]];
        }
        debt += part_pop - ideal;
        debug!(part, population = part_pop, debt, "carved district");

        remaining = remaining.iter().zip(carved)
            .filter_map(|(&u, carved)| (!carved).then_some(u))
            .collect();
    }

    Partition::new(graph, &districts)
}
