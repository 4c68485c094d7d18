use std::sync::Arc;

use crate::{
    error::{RecomError, Result},
    graph::Graph,
    tree::within_tolerance,
};

/// A partition of a graph into contiguous parts (districts).
///
/// Parts are indexed densely from 0; each part remembers the district label it was created with.
#[derive(Clone, Debug)]
pub struct Partition {
    graph: Arc<Graph>,
    pub(super) assignments: Vec<u32>,   // part index of each node
    pub(super) parts: Vec<Vec<usize>>,  // sorted nodes of each part
    labels: Vec<u32>,                   // district label of each part
}

impl Partition {
    /// Construct a partition from a district label for every node.
    ///
    /// Labels need not be dense: distinct labels are mapped to parts in ascending order.
    pub fn new(graph: impl Into<Arc<Graph>>, districts: &[u32]) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        if districts.len() != graph.node_count() {
            return Err(RecomError::InvalidAssignment(format!(
                "assignment has {} entries, graph has {} nodes", districts.len(), graph.node_count()
            )));
        }

        let mut labels = districts.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let assignments = districts.iter()
            .map(|district| labels.binary_search(district).unwrap_or_default() as u32)
            .collect::<Vec<_>>();

        let mut parts = vec![Vec::new(); labels.len()];
        for (node, &part) in assignments.iter().enumerate() {
            parts[part as usize].push(node);
        }

        Ok(Self { graph, assignments, parts, labels })
    }

    /// Construct a partition from a numeric node series holding district labels.
    pub fn from_series(graph: impl Into<Arc<Graph>>, series: &str) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();
        let districts = graph.series(series)?.iter().enumerate()
            .map(|(node, &value)| {
                if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 { Ok(value as u32) }
                else { Err(RecomError::InvalidAssignment(format!(
                    "node '{}' has non-integer district {value} in '{series}'", graph.node_id(node)
                ))) }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(graph, &districts)
    }

    /// Get the number of parts.
    #[inline] pub fn num_parts(&self) -> u32 { self.parts.len() as u32 }

    /// Get the number of nodes in the underlying graph.
    #[inline] pub fn num_nodes(&self) -> usize { self.graph.node_count() }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// Get a shared handle to the underlying graph.
    #[inline] pub fn graph_handle(&self) -> Arc<Graph> { Arc::clone(&self.graph) }

    /// Get the part index of a given node.
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.assignments[node] }

    /// Get the part index of every node.
    #[inline] pub fn assignments(&self) -> &[u32] { &self.assignments }

    /// Get the district label of a part.
    #[inline] pub fn district(&self, part: u32) -> u32 { self.labels[part as usize] }

    /// Get the district label of every node.
    pub fn districts(&self) -> Vec<u32> {
        self.assignments.iter().map(|&part| self.district(part)).collect()
    }

    /// Get the nodes of a part, in ascending order.
    #[inline] pub fn part_nodes(&self, part: u32) -> &[usize] { &self.parts[part as usize] }

    /// Sum of a given series for a specific part.
    pub fn part_total(&self, series: &str, part: u32) -> Result<f64> {
        let values = self.graph.series(series)?;
        Ok(self.part_nodes(part).iter().map(|&u| values[u]).sum())
    }

    /// Sum of a given series for each part.
    pub fn part_totals(&self, series: &str) -> Result<Vec<f64>> {
        let values = self.graph.series(series)?;
        let mut totals = vec![0.0; self.parts.len()];
        for (node, &part) in self.assignments.iter().enumerate() {
            totals[part as usize] += values[node];
        }
        Ok(totals)
    }

    /// Check if part `a` borders part `b`.
    pub fn part_borders_part(&self, a: u32, b: u32) -> bool {
        assert!(a < self.num_parts() && b < self.num_parts() && a != b,
            "a and b must be distinct parts in range [0, {})", self.num_parts());

        self.part_nodes(a).iter()
            .any(|&u| self.graph.edges(u).any(|v| self.assignments[v] == b))
    }

    /// Every edge whose endpoints lie in different parts, as `(u, v)` with `u < v`.
    pub fn cut_edges(&self) -> Vec<(usize, usize)> {
        self.graph.edge_pairs()
            .filter(|&(u, v)| self.assignments[u] != self.assignments[v])
            .collect()
    }

    /// Check if a part induces a connected subgraph.
    #[inline] pub fn is_part_contiguous(&self, part: u32) -> bool { self.graph.is_connected_subset(self.part_nodes(part)) }

    /// Check if every part's total of `series` is within `epsilon * ideal` of `ideal`.
    pub fn within_population_tolerance(&self, series: &str, ideal: f64, epsilon: f64) -> Result<bool> {
        Ok(self.part_totals(series)?.iter().all(|&total| within_tolerance(total, ideal, epsilon)))
    }

    /// Reassign the nodes of parts `a` and `b`: `subset` goes to `a`, the rest to `b`.
    pub(super) fn reassign_pair(&mut self, a: u32, b: u32, merged: &[usize], subset: &[usize]) {
        for &u in merged { self.assignments[u] = b }
        for &u in subset { self.assignments[u] = a }

        let (mut nodes_a, mut nodes_b): (Vec<_>, Vec<_>) = merged.iter().copied().partition(|&u| self.assignments[u] == a);
        nodes_a.sort_unstable();
        nodes_b.sort_unstable();
        self.parts[a as usize] = nodes_a;
        self.parts[b as usize] = nodes_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeAttributes;

    /// 2x3 grid:
    ///   0 1 2
    ///   3 4 5
    fn make_test_graph() -> Graph {
        Graph::new(
            (0..6).map(|i| format!("g{i}")).collect(),
            &[vec![1, 3], vec![0, 2, 4], vec![1, 5], vec![0, 4], vec![1, 3, 5], vec![2, 4]],
            NodeAttributes::new()
                .with_series("pop", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
                .with_series("cd", vec![7.0, 7.0, 9.0, 7.0, 7.0, 9.0]),
        ).unwrap()
    }

    #[test]
    fn labels_are_densified_in_ascending_order() {
        let partition = Partition::new(make_test_graph(), &[5, 5, 2, 5, 5, 2]).unwrap();

        assert_eq!(partition.num_parts(), 2);
        assert_eq!(partition.assignments(), &[1, 1, 0, 1, 1, 0]);
        assert_eq!(partition.district(0), 2);
        assert_eq!(partition.districts(), vec![5, 5, 2, 5, 5, 2]);
        assert_eq!(partition.part_nodes(1), &[0, 1, 3, 4]);
    }

    #[test]
    fn from_series_reads_numeric_districts() {
        let partition = Partition::from_series(make_test_graph(), "cd").unwrap();
        assert_eq!(partition.districts(), vec![7, 7, 9, 7, 7, 9]);
        assert!(Partition::from_series(make_test_graph(), "missing").is_err());
    }

    #[test]
    fn from_series_rejects_fractional_districts() {
        let graph = Graph::new(
            vec!["a".into()],
            &[vec![]],
            NodeAttributes::new().with_series("cd", vec![1.5]),
        ).unwrap();
        assert!(matches!(Partition::from_series(graph, "cd"), Err(RecomError::InvalidAssignment(_))));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Partition::new(make_test_graph(), &[0, 1]).is_err());
    }

    #[test]
    fn totals_and_tolerance() {
        let partition = Partition::new(make_test_graph(), &[0, 0, 1, 0, 0, 1]).unwrap();

        assert_eq!(partition.part_totals("pop").unwrap(), vec![12.0, 9.0]);
        assert_eq!(partition.part_total("pop", 1).unwrap(), 9.0);
        assert!(partition.within_population_tolerance("pop", 10.5, 0.15).unwrap());
        assert!(!partition.within_population_tolerance("pop", 10.5, 0.1).unwrap());
    }

    #[test]
    fn borders_and_cut_edges() {
        let partition = Partition::new(make_test_graph(), &[0, 0, 1, 0, 0, 1]).unwrap();

        assert!(partition.part_borders_part(0, 1));
        assert_eq!(partition.cut_edges(), vec![(1, 2), (4, 5)]);
        assert!(partition.is_part_contiguous(0));
        assert!(partition.is_part_contiguous(1));
    }

    #[test]
    fn detects_non_contiguous_part() {
        let partition = Partition::new(make_test_graph(), &[0, 1, 0, 1, 1, 1]).unwrap();
        assert!(!partition.is_part_contiguous(0));
    }

    #[test]
    fn reassign_pair_updates_assignments_and_parts() {
        let mut partition = Partition::new(make_test_graph(), &[0, 0, 1, 0, 0, 1]).unwrap();
        let merged = [0, 1, 2, 3, 4, 5];
        partition.reassign_pair(0, 1, &merged, &[0, 3]);

        assert_eq!(partition.assignments(), &[0, 1, 1, 0, 1, 1]);
        assert_eq!(partition.part_nodes(0), &[0, 3]);
        assert_eq!(partition.part_nodes(1), &[1, 2, 4, 5]);
    }
}
