#![doc = "Region-aware ReCom redistricting chains"]
mod chain;
mod config;
mod division;
mod error;
mod graph;
mod io;
mod metrics;
mod partition;
mod tree;

#[doc(inline)]
pub use error::{RecomError, Result};

#[doc(inline)]
pub use graph::{Graph, LabelColumn, NodeAttributes};

#[doc(inline)]
pub use division::Division;

#[doc(inline)]
pub use tree::{Cut, PopulatedTree, RootedTree, SpanningTree, division_random_spanning_tree, find_balanced_edge_cuts};

#[doc(inline)]
pub use partition::{BipartitionParams, Partition, bipartition_tree, recursive_tree_part};

#[doc(inline)]
pub use metrics::{RegionIndex, num_region_splits, num_traversals, region_pieces, region_split_details};

#[doc(inline)]
pub use chain::{ChainRecorder, ChainState, MarkovChain, ReCom};

#[doc(inline)]
pub use config::ChainConfig;

#[doc(inline)]
pub use io::{parse_graph_json, read_graph_json, read_plan_csv, write_plan_csv};
