use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    division::{self, Division, ResolvedDivision},
    error::{RecomError, Result},
    graph::Graph,
    tree::{Cut, PopulatedTree, balanced_cuts, weighted_spanning_tree},
};

pub(crate) fn default_node_repeats() -> usize { 1 }
pub(crate) fn default_attempts() -> usize { 100 }

/// Parameters for a single region-aware bipartition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BipartitionParams {
    /// Numeric node series holding population.
    pub pop_column: String,
    /// Ideal population of the carved-out side.
    pub pop_target: f64,
    /// Allowed relative deviation from `pop_target`.
    pub epsilon: f64,
    /// Region columns to avoid splitting, with their penalty weights.
    #[serde(default)]
    pub divisions: Vec<Division>,
    /// Rank balanced cuts by division alignment on the first search of each tree.
    #[serde(default)]
    pub first_check_division: bool,
    /// Searches (each with a fresh random root) per spanning tree.
    #[serde(default = "default_node_repeats")]
    pub node_repeats: usize,
    /// Spanning trees to draw before giving up.
    #[serde(default = "default_attempts")]
    pub attempts_before_giveup: usize,
}

impl BipartitionParams {
    pub fn new(pop_column: impl Into<String>, pop_target: f64, epsilon: f64) -> Self {
        Self {
            pop_column: pop_column.into(),
            pop_target,
            epsilon,
            divisions: Vec::new(),
            first_check_division: false,
            node_repeats: default_node_repeats(),
            attempts_before_giveup: default_attempts(),
        }
    }

    pub fn with_divisions(mut self, divisions: impl IntoIterator<Item = Division>) -> Self {
        self.divisions = divisions.into_iter().collect();
        self
    }

    pub fn with_first_check_division(mut self, first_check_division: bool) -> Self {
        self.first_check_division = first_check_division;
        self
    }

    pub fn with_node_repeats(mut self, node_repeats: usize) -> Self {
        self.node_repeats = node_repeats;
        self
    }

    pub fn with_attempts_before_giveup(mut self, attempts: usize) -> Self {
        self.attempts_before_giveup = attempts;
        self
    }

    /// Copy of these parameters with a different balance window.
    pub fn with_target(&self, pop_target: f64, epsilon: f64) -> Self {
        Self { pop_target, epsilon, ..self.clone() }
    }

    /// Check the parameters that do not depend on a graph.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(RecomError::InvalidEpsilon(self.epsilon));
        }
        if !(self.pop_target.is_finite() && self.pop_target > 0.0) {
            return Err(RecomError::InvalidTarget(self.pop_target));
        }
        if self.node_repeats == 0 || self.attempts_before_giveup == 0 {
            return Err(RecomError::InvalidRetryBudget {
                node_repeats: self.node_repeats,
                attempts: self.attempts_before_giveup,
            });
        }
        if self.first_check_division && self.divisions.is_empty() {
            return Err(RecomError::MissingDivisions);
        }
        if self.divisions.len() > division::MAX_DIVISIONS {
            return Err(RecomError::TooManyDivisions(self.divisions.len()));
        }
        Ok(())
    }
}

/// Split a connected graph into two contiguous pieces, one of which is population-balanced.
///
/// Spanning trees are drawn with division-crossing edges penalized. Each tree is searched
/// up to `node_repeats` times, each time from a fresh random root; when
/// `first_check_division` is set, the first search of each tree keeps only the balanced
/// cuts that best follow division boundaries and falls back to a plain balance search if
/// there are none. One of the candidate cuts is chosen uniformly at random.
///
/// Returns `Ok(None)` once `attempts_before_giveup` trees have been tried without success.
/// Malformed input (bad parameters, unknown columns, a disconnected graph, or zero total
/// population) is reported as an error before any tree is drawn.
pub fn bipartition_tree<R: Rng + ?Sized>(graph: &Graph, params: &BipartitionParams, rng: &mut R) -> Result<Option<Cut>> {
    params.validate()?;
    if graph.node_count() == 0 { return Err(RecomError::EmptyGraph) }

    let population = graph.series(&params.pop_column)?;
    let divisions = division::resolve(graph, &params.divisions)?;

    let components = graph.num_components();
    if components > 1 { return Err(RecomError::Disconnected { components }) }

    let total = population.iter().sum::<f64>();
    if !(total > 0.0) { return Err(RecomError::ZeroPopulation(total)) }

    let ranked = division::by_priority(&divisions);
    let ranked = (params.first_check_division && !ranked.is_empty()).then_some(&ranked[..]);

    for attempt in 0..params.attempts_before_giveup {
        let tree = weighted_spanning_tree(graph, &divisions, rng);
        let mut populated = PopulatedTree::new(&tree, population, params.pop_target, params.epsilon);

        for repeat in 0..params.node_repeats {
            let mut cuts = search_tree(&mut populated, ranked, repeat, rng);
            if !cuts.is_empty() {
                let cut = cuts.swap_remove(rng.random_range(0..cuts.len()));
                debug!(attempt, repeat, candidates = cuts.len() + 1, size = cut.subset.len(), "found balanced cut");
                return Ok(Some(cut));
            }
        }

        trace!(attempt, "no balanced cut on spanning tree, redrawing");
    }

    debug!(attempts = params.attempts_before_giveup, "gave up looking for a balanced cut");
    Ok(None)
}

/// Balanced cuts for one search of a tree from a fresh random root.
///
/// Only the first search (`repeat == 0`) ranks by division, falling back to a plain search
/// when the ranked one finds nothing.
fn search_tree<R: Rng + ?Sized>(
    populated: &mut PopulatedTree,
    ranked: Option<&[ResolvedDivision]>,
    repeat: usize,
    rng: &mut R,
) -> Vec<Cut> {
    if let Some(ranked) = ranked.filter(|_| repeat == 0) {
        let cuts = balanced_cuts(populated, Some(ranked), rng);
        if !cuts.is_empty() { return cuts }
    }
    balanced_cuts(populated, None, rng)
}
