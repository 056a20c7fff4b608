//! Loads module - concentrated nodal loads grouped into load cases

mod load_case;
mod node_load;

pub use load_case::LoadCase;
pub use node_load::NodeLoad;
