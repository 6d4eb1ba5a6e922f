pub mod error;
pub mod graph;
pub mod push_relabel;
