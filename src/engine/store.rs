use crate::domain::{Coordinate, GridShape};
use crate::error::EngineError;
use crate::metrics::Outcome;

/// Outcomes indexed by (target, iteration, thread). Each cell is written
/// once; reads happen only after the owning wave has been joined.
#[derive(Debug)]
pub struct ResultStore {
    shape: GridShape,
    cells: Vec<Option<Outcome>>,
    filled: usize,
}

impl ResultStore {
    /// Allocates an empty store sized for `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error when the cell count overflows `usize`.
    pub fn new(shape: GridShape) -> Result<Self, EngineError> {
        let cells = shape.cell_count().ok_or(EngineError::GridTooLarge {
            targets: shape.targets(),
            iterations: shape.iterations(),
            threads: shape.threads(),
        })?;
        let mut slots = Vec::with_capacity(cells);
        slots.resize_with(cells, || None);
        Ok(Self {
            shape,
            cells: slots,
            filled: 0,
        })
    }

    #[must_use]
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Stores the outcome for `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns an error when the coordinate is outside the grid or its cell
    /// already holds an outcome.
    pub fn record(&mut self, coordinate: Coordinate, outcome: Outcome) -> Result<(), EngineError> {
        let cell = self
            .shape
            .index_of(coordinate)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(EngineError::CellOutOfBounds { coordinate })?;
        if cell.is_some() {
            return Err(EngineError::CellAlreadyRecorded { coordinate });
        }
        *cell = Some(outcome);
        self.filled = self.filled.saturating_add(1);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, coordinate: Coordinate) -> Option<&Outcome> {
        self.shape
            .index_of(coordinate)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Number of cells, filled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub const fn filled_count(&self) -> usize {
        self.filled
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.cells.len().saturating_sub(self.filled)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Filled cells in target-major / iteration-major / thread-minor order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Outcome)> + '_ {
        self.shape
            .coordinates()
            .zip(self.cells.iter())
            .filter_map(|(coordinate, cell)| cell.as_ref().map(|outcome| (coordinate, outcome)))
    }

    /// Coordinates whose cell is still empty.
    pub fn missing(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.shape
            .coordinates()
            .zip(self.cells.iter())
            .filter(|(_, cell)| cell.is_none())
            .map(|(coordinate, _)| coordinate)
    }
}
