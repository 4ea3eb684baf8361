#![forbid(unsafe_code)]

mod analysis;
mod error;
mod guard;
mod ids;
mod store;
mod types;

pub use error::*;
pub use ids::*;
pub use store::BeatGraph;
pub use types::*;
