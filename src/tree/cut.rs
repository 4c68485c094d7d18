use rand::{Rng, seq::IndexedRandom};

use crate::{
    division::{self, Division, ResolvedDivision},
    error::{RecomError, Result},
    graph::Graph,
    tree::{PopulatedTree, SpanningTree, populated::within_tolerance},
};

/// A tree edge together with the node set on its balanced side.
///
/// `edge` is `(node, parent)` relative to the root chosen for the search, and `subset` is
/// sorted ascending. When both sides are balanced, `subset` is the side below `node`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    pub edge: (usize, usize),
    pub subset: Vec<usize>,
}

/// Priority-weighted count of the divisions the edge (u, v) crosses.
///
/// With `k` divisions ranked highest first, crossing division `i` adds `2^(k - i - 1)`, so
/// crossing any division outranks crossing every lower-priority one combined.
pub(crate) fn split_score(divisions: &[ResolvedDivision], u: usize, v: usize) -> u64 {
    let k = divisions.len();
    divisions.iter().enumerate()
        .filter(|(_, division)| division.crosses(u, v))
        .map(|(i, _)| 1u64 << (k - i - 1))
        .sum()
}

/// Choose a non-leaf root uniformly at random. A single-edge tree may be rooted at either end.
fn choose_root<R: Rng + ?Sized>(tree: &SpanningTree, rng: &mut R) -> Option<usize> {
    let internal = (0..tree.node_count())
        .filter(|&u| tree.degree(u) > 1)
        .collect::<Vec<_>>();

    match internal.choose(rng) {
        Some(&root) => Some(root),
        None if tree.node_count() == 2 => Some(rng.random_range(0..2)),
        None => None,
    }
}

/// Find every balanced cut of `tree`, optionally keeping only the best division-aligned ones.
///
/// With `divisions` (ordered highest priority first), candidates are streamed through a running
/// maximum of [`split_score`]: ties with the maximum are kept, a strictly higher score discards
/// everything found so far. Returns an empty list when no balanced cut exists or the tree is
/// too small to root.
pub fn find_balanced_edge_cuts<R: Rng + ?Sized>(
    graph: &Graph,
    tree: &mut PopulatedTree,
    divisions: Option<&[Division]>,
    rng: &mut R,
) -> Result<Vec<Cut>> {
    if let Some(divisions) = divisions.filter(|divisions| divisions.len() > division::MAX_DIVISIONS) {
        return Err(RecomError::TooManyDivisions(divisions.len()));
    }
    let resolved = divisions.map(|divisions| division::resolve(graph, divisions)).transpose()?;
    Ok(balanced_cuts(tree, resolved.as_deref(), rng))
}

pub(crate) fn balanced_cuts<R: Rng + ?Sized>(
    tree: &mut PopulatedTree,
    divisions: Option<&[ResolvedDivision]>,
    rng: &mut R,
) -> Vec<Cut> {
    let Some(root) = choose_root(tree.tree(), rng) else { return Vec::new() };

    let (total, target, epsilon) = (tree.total_population(), tree.target(), tree.epsilon());
    let n = tree.tree().node_count();
    let rooted = tree.root_at(root);

    // (node, parent, whether the side below `node` is the balanced one)
    let mut candidates = Vec::new();
    let mut best_score = 0;
    for &node in &rooted.order()[1..] {
        let Some(parent) = rooted.parent(node) else { continue };
        let below = rooted.subtree_population(node);
        let below_balanced = within_tolerance(below, target, epsilon);
        let above_balanced = within_tolerance(total - below, target, epsilon);
        if !(below_balanced || above_balanced) { continue }

        if let Some(divisions) = divisions {
            let score = split_score(divisions, parent, node);
            if score < best_score { continue }
            if score > best_score {
                best_score = score;
                candidates.clear();
            }
        }
        candidates.push((node, parent, below_balanced));
    }

    candidates.into_iter()
        .map(|(node, parent, below_balanced)| {
            let subset = if below_balanced {
                let mut subset = rooted.subtree(node).to_vec();
                subset.sort_unstable();
                subset
            } else {
                (0..n).filter(|&u| !rooted.in_subtree(u, node)).collect()
            };
            Cut { edge: (node, parent), subset }
        })
        .collect()
}
