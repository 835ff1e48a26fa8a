//! Nodal load types

mod node_load;

pub use node_load::{distribute_at_level, LoadComponent, NodeLoad};
