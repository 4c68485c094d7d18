use rand::{Rng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    error::Result,
    partition::{BipartitionParams, Partition},
};

/// ReCom proposal: merge the two districts on either side of a random cut edge and redraw
/// the line between them with a region-aware bipartition.
#[derive(Clone, Debug)]
pub struct ReCom {
    params: BipartitionParams,
}

impl ReCom {
    /// `params.pop_target` is the ideal district population.
    pub fn new(params: BipartitionParams) -> Self { Self { params } }

    #[inline] pub fn params(&self) -> &BipartitionParams { &self.params }

    /// Propose a neighbouring plan. Returns `Ok(None)` if the plan has no cut edges
    /// or the merged pair could not be split within the attempt budget.
    pub fn propose<R: Rng + ?Sized>(&self, partition: &Partition, rng: &mut R) -> Result<Option<Partition>> {
        let cut_edges = partition.cut_edges();
        let Some(&(u, v)) = cut_edges.choose(rng) else { return Ok(None) };
        let (a, b) = (partition.assignment(u), partition.assignment(v));

        let mut proposal = partition.clone();
        if proposal.recombine_parts(a, b, &self.params, rng)? {
            Ok(Some(proposal))
        } else {
            trace!(a, b, "recombination exhausted");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::{Graph, NodeAttributes};

    fn make_test_graph() -> Graph {
        // 4x4 grid, unit population
        let mut adjacency = vec![Vec::new(); 16];
        for u in 0..16u32 {
            if u % 4 < 3 { adjacency[u as usize].push(u + 1); adjacency[u as usize + 1].push(u); }
            if u < 12 { adjacency[u as usize].push(u + 4); adjacency[u as usize + 4].push(u); }
        }
        Graph::new(
            (0..16).map(|i| format!("n{i}")).collect(),
            &adjacency,
            NodeAttributes::new().with_series("pop", vec![1.0; 16]),
        ).unwrap()
    }

    #[test]
    fn proposal_changes_only_two_districts() {
        let districts = (0..16).map(|u| (u % 4 / 2 + 2 * (u / 8)) as u32).collect::<Vec<_>>();
        let partition = Partition::new(make_test_graph(), &districts).unwrap();
        let recom = ReCom::new(BipartitionParams::new("pop", 4.0, 0.01));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10 {
            let proposal = recom.propose(&partition, &mut rng).unwrap().unwrap();
            let changed = (0..16)
                .filter(|&u| partition.assignment(u) != proposal.assignment(u))
                .flat_map(|u| [partition.assignment(u), proposal.assignment(u)])
                .collect::<ahash::AHashSet<_>>();
            assert!(changed.len() <= 2);
            assert_eq!(proposal.part_totals("pop").unwrap(), vec![4.0; 4]);
            assert!((0..4).all(|part| proposal.is_part_contiguous(part)));
        }
    }

    #[test]
    fn single_district_has_nothing_to_propose() {
        let partition = Partition::new(make_test_graph(), &[0; 16]).unwrap();
        let recom = ReCom::new(BipartitionParams::new("pop", 16.0, 0.01));
        let mut rng = StdRng::seed_from_u64(0);

        assert!(recom.propose(&partition, &mut rng).unwrap().is_none());
    }
}
