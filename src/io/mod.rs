//! File formats for dual graphs and plans.
//!
//! - `json` - NetworkX dual graphs (adjacency or node-link layout)
//! - `csv` - `geo_id,district` plan assignments

mod csv;
mod json;

pub use csv::{read_plan_csv, write_plan_csv};
pub use json::{parse_graph_json, read_graph_json};
