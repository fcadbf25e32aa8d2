use thiserror::Error;

use crate::domain::Coordinate;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Request grid is too large ({targets} x {iterations} x {threads} cells).")]
    GridTooLarge {
        targets: usize,
        iterations: usize,
        threads: usize,
    },
    #[error("Coordinate {coordinate} is outside the request grid.")]
    CellOutOfBounds { coordinate: Coordinate },
    #[error("Outcome for {coordinate} was already recorded.")]
    CellAlreadyRecorded { coordinate: Coordinate },
    #[error("No wave planned for target {target}, iteration {iteration}.")]
    MissingWave { target: usize, iteration: usize },
    #[error("Result store is incomplete: {missing} outcome(s) missing.")]
    IncompleteStore { missing: usize },
}
