use rand::Rng;
use smallvec::SmallVec;

use crate::{
    division::{self, Division, ResolvedDivision},
    error::Result,
    graph::Graph,
    tree::union_find::UnionFind,
};

/// An undirected spanning tree over the nodes `0..n` of a graph.
#[derive(Clone, Debug)]
pub struct SpanningTree {
    adjacency: Vec<SmallVec<[u32; 4]>>,
    num_edges: usize,
}

impl SpanningTree {
    /// Build a tree from an explicit edge list. Assumes the edges form a tree over `0..num_nodes`.
    pub fn from_edges(num_nodes: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut adjacency = vec![SmallVec::new(); num_nodes];
        let mut num_edges = 0;
        for (u, v) in edges {
            assert!(u < num_nodes && v < num_nodes && u != v, "invalid tree edge ({u}, {v})");
            adjacency[u].push(v as u32);
            adjacency[v].push(u as u32);
            num_edges += 1;
        }
        debug_assert!(num_nodes == 0 || num_edges == num_nodes - 1, "tree over {num_nodes} nodes must have {} edges", num_nodes.saturating_sub(1));

        Self { adjacency, num_edges }
    }

    /// Get the number of nodes spanned by the tree.
    #[inline] pub fn node_count(&self) -> usize { self.adjacency.len() }

    /// Get the number of tree edges.
    #[inline] pub fn edge_count(&self) -> usize { self.num_edges }

    /// Get the degree of a node within the tree.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.adjacency[node].len() }

    /// Get an iterator over the tree neighbors of a node.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[node].iter().map(|&v| v as usize)
    }

    /// Iterate over every tree edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.node_count()).flat_map(move |u| {
            self.neighbors(u).filter(move |&v| u < v).map(move |v| (u, v))
        })
    }
}

/// Draw a random spanning tree of `graph` that discourages edges crossing division boundaries.
///
/// Each edge is weighted by the summed penalty of every division it crosses plus a fresh
/// uniform value in [0, 1), and the minimum spanning tree of those weights is returned.
/// Division-crossing edges are therefore less likely to survive into the tree at all.
/// Assumes `graph` is connected.
pub fn division_random_spanning_tree<R: Rng + ?Sized>(graph: &Graph, divisions: &[Division], rng: &mut R) -> Result<SpanningTree> {
    let divisions = division::resolve(graph, divisions)?;
    Ok(weighted_spanning_tree(graph, &divisions, rng))
}

/// Kruskal's algorithm over per-call edge weights; nothing is written back to `graph`.
pub(crate) fn weighted_spanning_tree<R: Rng + ?Sized>(graph: &Graph, divisions: &[ResolvedDivision], rng: &mut R) -> SpanningTree {
    let mut weighted = graph.edge_pairs()
        .map(|(u, v)| {
            let penalty = divisions.iter()
                .filter(|division| division.crosses(u, v))
                .map(|division| division.weight())
                .sum::<f64>();
            (penalty + rng.random::<f64>(), u, v)
        })
        .collect::<Vec<_>>();
    weighted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let target = graph.node_count().saturating_sub(1);
    let mut components = UnionFind::new(graph.node_count());
    let mut edges = Vec::with_capacity(target);
    for (_, u, v) in weighted {
        if edges.len() == target { break }
        if components.union(u, v) { edges.push((u, v)) }
    }

    SpanningTree::from_edges(graph.node_count(), edges)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graph::NodeAttributes;

    /// 3x3 grid; left column in county "L", the rest in "R".
    fn grid() -> Graph {
        let mut adjacency = vec![Vec::new(); 9];
        for r in 0..3 {
            for c in 0..3 {
                let u = r * 3 + c;
                if c < 2 { adjacency[u].push((u + 1) as u32); adjacency[u + 1].push(u as u32); }
                if r < 2 { adjacency[u].push((u + 3) as u32); adjacency[u + 3].push(u as u32); }
            }
        }
        let county = (0..9).map(|u| if u % 3 == 0 { "L" } else { "R" });
        Graph::new(
            (0..9).map(|i| i.to_string()).collect(),
            &adjacency,
            NodeAttributes::new().with_labels("county", county),
        ).unwrap()
    }

    fn is_spanning_tree(graph: &Graph, tree: &SpanningTree) -> bool {
        let n = graph.node_count();
        let mut uf = UnionFind::new(n);
        tree.edge_count() == n - 1
            && tree.edges().all(|(u, v)| graph.edges(u).any(|w| w == v) && uf.union(u, v))
    }

    #[test]
    fn produces_a_spanning_tree_of_the_graph() {
        let graph = grid();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let tree = division_random_spanning_tree(&graph, &[], &mut rng).unwrap();
            assert_eq!(tree.node_count(), 9);
            assert!(is_spanning_tree(&graph, &tree));
        }
    }

    #[test]
    fn heavy_penalty_keeps_a_single_crossing_edge() {
        // Each county is connected on its own, so a minimum tree needs exactly one crossing edge.
        let graph = grid();
        let county = graph.labels("county").unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let tree = division_random_spanning_tree(&graph, &[Division::new("county", 10.0)], &mut rng).unwrap();
            let crossing = tree.edges().filter(|&(u, v)| county.code(u) != county.code(v)).count();
            assert_eq!(crossing, 1);
        }
    }

    #[test]
    fn same_seed_draws_same_tree() {
        let graph = grid();
        let divisions = [Division::new("county", 1.0)];

        let a = division_random_spanning_tree(&graph, &divisions, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = division_random_spanning_tree(&graph, &divisions, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.edges().collect::<Vec<_>>(), b.edges().collect::<Vec<_>>());
    }

    #[test]
    fn unknown_division_column_is_an_error() {
        let graph = grid();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(division_random_spanning_tree(&graph, &[Division::new("muni", 1.0)], &mut rng).is_err());
    }

    #[test]
    fn single_node_tree_has_no_edges() {
        let tree = SpanningTree::from_edges(1, std::iter::empty());
        assert_eq!(tree.edge_count(), 0);
        assert_eq!(tree.degree(0), 0);
    }
}
