pub mod bootstrap;
pub mod dependency_graph;
pub mod permissions;

pub use bootstrap::*;
pub use dependency_graph::*;
pub use permissions::*;
