mod runner;
pub(crate) mod summary;
mod targets;

#[cfg(test)]
mod tests;

pub use runner::{RunOutput, execute_grid, run_charge};
pub use targets::{TargetSource, load_targets, pair_targets};
