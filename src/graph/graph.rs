use ahash::{AHashMap, AHashSet};

use crate::{
    error::{RecomError, Result},
    graph::{LabelColumn, NodeAttributes},
};

/// An undirected, simple dual graph in compressed sparse row format.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    node_ids: Vec<String>,
    index: AHashMap<String, usize>,
    attributes: NodeAttributes,
}

impl Graph {
    /// Construct a graph from node identifiers, adjacency lists and node attributes.
    ///
    /// Adjacency must be symmetric and free of self loops; repeated neighbors are collapsed.
    pub fn new(node_ids: Vec<String>, adjacency: &[Vec<u32>], attributes: NodeAttributes) -> Result<Self> {
        let size = node_ids.len();
        if adjacency.len() != size {
            return Err(RecomError::InvalidGraph(format!(
                "adjacency has {} rows, expected {size}", adjacency.len()
            )));
        }
        if let Some((name, len)) = attributes.mismatched_column(size) {
            return Err(RecomError::InvalidGraph(format!(
                "column '{name}' has {len} values, expected {size}"
            )));
        }

        let mut index = AHashMap::with_capacity(size);
        for (i, id) in node_ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(RecomError::InvalidGraph(format!("duplicate node id '{id}'")));
            }
        }

        // Collapse repeated neighbors, preserving first-seen order.
        let mut directed = AHashSet::new();
        let mut rows = Vec::with_capacity(size);
        for (u, neighbors) in adjacency.iter().enumerate() {
            let mut row = Vec::with_capacity(neighbors.len());
            for &v in neighbors {
                if v as usize >= size {
                    return Err(RecomError::InvalidGraph(format!("node {u} has out-of-range neighbor {v}")));
                }
                if v as usize == u {
                    return Err(RecomError::InvalidGraph(format!("node {u} has a self loop")));
                }
                if directed.insert((u as u32, v)) { row.push(v) }
            }
            rows.push(row);
        }

        if let Some(&(u, v)) = directed.iter().find(|&&(u, v)| !directed.contains(&(v, u))) {
            return Err(RecomError::InvalidGraph(format!("edge {u}->{v} has no reverse edge")));
        }

        Ok(Self {
            size,
            offsets: std::iter::once(0u32).chain(
                rows.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
            ).collect(),
            edges: rows.into_iter().flatten().collect(),
            node_ids,
            index,
            attributes,
        })
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Iterate over every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |u| {
            self.edges(u).filter(move |&v| u < v).map(move |v| (u, v))
        })
    }

    /// Get the identifier of a node.
    #[inline] pub fn node_id(&self, node: usize) -> &str { &self.node_ids[node] }

    /// Get all node identifiers, indexed by node.
    #[inline] pub fn node_ids(&self) -> &[String] { &self.node_ids }

    /// Look up the node index for an identifier.
    #[inline] pub fn index_of(&self, id: &str) -> Option<usize> { self.index.get(id).copied() }

    /// Get a reference to the node attributes.
    #[inline] pub fn attributes(&self) -> &NodeAttributes { &self.attributes }

    /// Get a numeric node series by name.
    pub fn series(&self, name: &str) -> Result<&[f64]> {
        self.attributes.series(name).ok_or_else(|| RecomError::UnknownSeries(name.to_string()))
    }

    /// Get a label column by name.
    pub fn labels(&self, column: &str) -> Result<&LabelColumn> {
        self.attributes.labels(column).ok_or_else(|| RecomError::UnknownColumn(column.to_string()))
    }

    /// Build the subgraph induced by `nodes`. Node `i` of the result is `nodes[i]` of `self`.
    pub fn induced_subgraph(&self, nodes: &[usize]) -> Self {
        let mut local = vec![None; self.size];
        for (i, &u) in nodes.iter().enumerate() {
            assert!(u < self.size, "node {} out of range", u);
            assert!(local[u].is_none(), "node {} listed more than once", u);
            local[u] = Some(i as u32);
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut edges = Vec::new();
        offsets.push(0);
        for &u in nodes {
            edges.extend(self.edges(u).filter_map(|v| local[v]));
            offsets.push(edges.len() as u32);
        }

        let node_ids = nodes.iter().map(|&u| self.node_ids[u].clone()).collect::<Vec<_>>();
        let index = node_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

        Self {
            size: nodes.len(),
            offsets,
            edges,
            node_ids,
            index,
            attributes: self.attributes.select(nodes),
        }
    }
}
