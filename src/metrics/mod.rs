mod splits;

pub use splits::{RegionIndex, num_region_splits, num_traversals, region_pieces, region_split_details};
