pub mod candidate_set;
pub mod distance_table;
pub mod graph;
pub mod optimizer;
pub mod utils;
