use ahash::AHashSet;

use crate::{error::Result, graph::{Graph, LabelColumn}};

/// Member nodes of every region in a label column (county, municipality, ...).
#[derive(Clone, Debug, Default)]
pub struct RegionIndex {
    names: Vec<String>,
    members: Vec<Vec<usize>>,
}

impl RegionIndex {
    /// Group nodes by label; regions appear in first-seen order.
    pub fn from_labels(column: &LabelColumn) -> Self {
        let mut members = vec![Vec::new(); column.num_labels()];
        for (node, &code) in column.codes().iter().enumerate() {
            members[code as usize].push(node);
        }

        Self {
            names: (0..column.num_labels() as u32).map(|code| column.label(code).to_string()).collect(),
            members,
        }
    }

    /// Group the nodes of `graph` by the labels in `column`.
    pub fn from_graph(graph: &Graph, column: &str) -> Result<Self> {
        Ok(Self::from_labels(graph.labels(column)?))
    }

    /// Drop a placeholder region (e.g. "99999" for unincorporated area).
    pub fn excluding(mut self, label: &str) -> Self {
        if let Some(i) = self.names.iter().position(|name| name == label) {
            self.names.remove(i);
            self.members.remove(i);
        }
        self
    }

    #[inline] pub fn num_regions(&self) -> usize { self.names.len() }

    #[inline] pub fn names(&self) -> &[String] { &self.names }

    #[inline] pub fn members(&self, region: usize) -> &[usize] { &self.members[region] }
}

/// Count the regions touched by two or more districts.
///
/// Each region is scanned only until a second district is seen.
pub fn num_region_splits(assignment: &[u32], regions: &RegionIndex) -> usize {
    regions.members.iter()
        .filter(|members| {
            let mut districts = members.iter().map(|&u| assignment[u]);
            match districts.next() {
                Some(first) => districts.any(|district| district != first),
                None => false,
            }
        })
        .count()
}

/// Distinct districts touching each region, sorted ascending.
pub fn region_split_details(assignment: &[u32], regions: &RegionIndex) -> Vec<Vec<u32>> {
    regions.members.iter()
        .map(|members| {
            let mut districts = members.iter().map(|&u| assignment[u]).collect::<Vec<_>>();
            districts.sort_unstable();
            districts.dedup();
            districts
        })
        .collect()
}

/// Total number of district pieces across split regions (unsplit regions count zero).
pub fn region_pieces(assignment: &[u32], regions: &RegionIndex) -> usize {
    region_split_details(assignment, regions).iter()
        .map(Vec::len)
        .filter(|&pieces| pieces > 1)
        .sum()
}

/// Count the distinct region pairs each district crosses, summed over districts.
///
/// A pair is crossed when an edge inside one district joins nodes of two regions;
/// edges touching an excluded region are ignored.
pub fn num_traversals(graph: &Graph, assignment: &[u32], regions: &RegionIndex) -> usize {
    let mut region_of = vec![None; graph.node_count()];
    for (region, members) in regions.members.iter().enumerate() {
        for &u in members { region_of[u] = Some(region) }
    }

    let mut crossed = AHashSet::new();
    for (u, v) in graph.edge_pairs() {
        if assignment[u] != assignment[v] { continue }
        let (Some(a), Some(b)) = (region_of[u], region_of[v]) else { continue };
        if a != b { crossed.insert((assignment[u], a.min(b), a.max(b))); }
    }
    crossed.len()
}
