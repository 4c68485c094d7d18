mod cut;
mod populated;
mod spanning;
mod union_find;

pub use cut::{Cut, find_balanced_edge_cuts};
pub use populated::{PopulatedTree, RootedTree};
pub use spanning::{SpanningTree, division_random_spanning_tree};

pub(crate) use cut::balanced_cuts;
pub(crate) use populated::within_tolerance;
pub(crate) use spanning::weighted_spanning_tree;
