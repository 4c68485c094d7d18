use std::collections::VecDeque;

use crate::graph::Graph;

impl Graph {
    /// Count the connected components of the graph.
    pub fn num_components(&self) -> usize {
        let mut visited = vec![false; self.node_count()];
        let mut components = 0;
        let mut queue = VecDeque::new();

        for start in 0..self.node_count() {
            if visited[start] { continue }
            components += 1;
            visited[start] = true;
            queue.push_back(start);
            while let Some(u) = queue.pop_front() {
                for v in self.edges(u) {
                    if !visited[v] {
                        visited[v] = true;
                        queue.push_back(v);
                    }
                }
            }
        }

        components
    }

    /// Check if the graph is non-empty and connected.
    #[inline] pub fn is_connected(&self) -> bool { self.num_components() == 1 }

    /// Check if a set of nodes induces a connected subgraph. The empty set is not connected.
    pub fn is_connected_subset(&self, nodes: &[usize]) -> bool {
        let Some(&start) = nodes.first() else { return false };

        let mut in_subset = vec![false; self.node_count()];
        for &u in nodes {
            assert!(u < self.node_count(), "node {} out of range", u);
            in_subset[u] = true;
        }
        let expected = in_subset.iter().filter(|&&b| b).count();

        let mut seen = 1;
        let mut visited = vec![false; self.node_count()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(u) = queue.pop_front() {
            for v in self.edges(u) {
                if in_subset[v] && !visited[v] {
                    seen += 1;
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }

        seen == expected
    }
}
