mod bipartition;
mod partition;
mod recombine;
mod recursive;

pub use bipartition::{BipartitionParams, bipartition_tree};
pub(crate) use bipartition::{default_attempts, default_node_repeats};
pub use partition::Partition;
pub use recursive::recursive_tree_part;
