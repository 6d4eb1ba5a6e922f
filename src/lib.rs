pub mod assignment;
pub mod maximum_flow;
