pub mod error;
pub mod greedy;
pub mod merit_order;
pub mod planner;
pub mod search;
pub mod settings;
pub mod types;

pub use error::*;
pub use greedy::*;
pub use merit_order::*;
pub use planner::*;
pub use search::*;
pub use settings::*;
pub use types::*;
