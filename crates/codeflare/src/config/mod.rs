pub mod cli;
pub mod cluster;
pub mod resources;

pub use cli::*;
pub use cluster::*;
pub use resources::*;
