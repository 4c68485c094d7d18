use rand::Rng;

use crate::{
    error::Result,
    partition::{BipartitionParams, Partition, bipartition_tree},
};

impl Partition {
    /// Merge parts `a` and `b` and split the merged region again with a region-aware bipartition.
    ///
    /// The balanced side of the cut becomes part `a` and the remainder part `b`. Returns false,
    /// leaving the partition untouched, if the parts are not adjacent or no balanced cut was found.
    pub fn recombine_parts<R: Rng + ?Sized>(&mut self, a: u32, b: u32, params: &BipartitionParams, rng: &mut R) -> Result<bool> {
        if !self.part_borders_part(a, b) { return Ok(false) }

        let mut merged = [self.part_nodes(a), self.part_nodes(b)].concat();
        merged.sort_unstable();

        // Local node i of the subgraph is merged[i].
        let subgraph = self.graph().induced_subgraph(&merged);
        let Some(cut) = bipartition_tree(&subgraph, params, rng)? else { return Ok(false) };

        let subset = cut.subset.iter().map(|&i| merged[i]).collect::<Vec<_>>();
        self.reassign_pair(a, b, &merged, &subset);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{
        division::Division,
        graph::{Graph, NodeAttributes},
        partition::{BipartitionParams, Partition},
    };

    /// 2x4 grid with unit populations; columns 0-1 in county "W", columns 2-3 in county "E".
    ///   0 1 2 3
    ///   4 5 6 7
    fn make_test_graph() -> Graph {
        let mut adjacency = vec![Vec::new(); 8];
        for u in 0..8u32 {
            if u % 4 < 3 { adjacency[u as usize].push(u + 1); adjacency[u as usize + 1].push(u); }
            if u < 4 { adjacency[u as usize].push(u + 4); adjacency[u as usize + 4].push(u); }
        }
        Graph::new(
            (0..8).map(|i| i.to_string()).collect(),
            &adjacency,
            NodeAttributes::new()
                .with_series("pop", vec![1.0; 8])
                .with_labels("county", (0..8).map(|u| if u % 4 < 2 { "W" } else { "E" })),
        ).unwrap()
    }

    #[test]
    fn recombination_keeps_parts_balanced_and_contiguous() {
        let mut partition = Partition::new(make_test_graph(), &[0, 0, 0, 1, 0, 1, 1, 1]).unwrap();
        let params = BipartitionParams::new("pop", 4.0, 0.01);
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..20 {
            assert!(partition.recombine_parts(0, 1, &params, &mut rng).unwrap());
            assert_eq!(partition.part_totals("pop").unwrap(), vec![4.0, 4.0]);
            assert!(partition.is_part_contiguous(0));
            assert!(partition.is_part_contiguous(1));
            assert_eq!(partition.part_nodes(0).len() + partition.part_nodes(1).len(), 8);
        }
    }

    #[test]
    fn division_aware_recombination_follows_county_line() {
        let mut partition = Partition::new(make_test_graph(), &[0, 0, 0, 1, 0, 1, 1, 1]).unwrap();
        let params = BipartitionParams::new("pop", 4.0, 0.01)
            .with_divisions([Division::new("county", 1.0)])
            .with_first_check_division(true);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..10 {
            assert!(partition.recombine_parts(1, 0, &params, &mut rng).unwrap());
            let county = partition.graph().labels("county").unwrap();
            for part in 0..2 {
                let nodes = partition.part_nodes(part);
                assert!(nodes.iter().all(|&u| county.code(u) == county.code(nodes[0])));
            }
        }
    }

    #[test]
    fn failed_recombination_leaves_partition_unchanged() {
        let mut partition = Partition::new(make_test_graph(), &[0, 0, 0, 1, 0, 1, 1, 1]).unwrap();
        let params = BipartitionParams::new("pop", 3.5, 0.01).with_attempts_before_giveup(3);
        let mut rng = StdRng::seed_from_u64(2);

        let before = partition.assignments().to_vec();
        assert!(!partition.recombine_parts(0, 1, &params, &mut rng).unwrap());
        assert_eq!(partition.assignments(), before.as_slice());
    }

    #[test]
    fn non_adjacent_parts_are_not_recombined() {
        let mut partition = Partition::new(make_test_graph(), &[0, 1, 1, 2, 0, 1, 1, 2]).unwrap();
        let params = BipartitionParams::new("pop", 2.0, 0.01);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(!partition.recombine_parts(0, 2, &params, &mut rng).unwrap());
    }
}
