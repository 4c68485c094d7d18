mod attributes;
mod connectivity;
mod graph;

pub use attributes::{LabelColumn, NodeAttributes};
pub use graph::Graph;
