pub mod plan;
pub mod types;

pub use plan::*;
pub use types::*;
