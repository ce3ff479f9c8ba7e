pub mod common;
pub mod descriptor;
pub mod tenant;

pub use common::*;
pub use descriptor::*;
pub use tenant::*;
