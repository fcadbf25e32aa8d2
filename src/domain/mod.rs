//! Request model: targets and the (target, iteration, thread) plan grid.
mod plan;
mod target;

pub use plan::{Coordinate, GridShape, RequestGrid, RequestPlan};
pub use target::Target;
