use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use super::target::Target;
use crate::args::PositiveUsize;
use crate::error::{AppError, AppResult, EngineError, ValidationError};

/// Position of one request in the run: zero-based target, iteration and
/// thread-slot indices. Orders target-major, then iteration, then thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coordinate {
    pub target: usize,
    pub iteration: usize,
    pub thread: usize,
}

impl Coordinate {
    #[must_use]
    pub const fn new(target: usize, iteration: usize, thread: usize) -> Self {
        Self {
            target,
            iteration,
            thread,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.target, self.iteration, self.thread)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    targets: PositiveUsize,
    iterations: PositiveUsize,
    threads: PositiveUsize,
}

impl GridShape {
    #[must_use]
    pub const fn new(
        targets: PositiveUsize,
        iterations: PositiveUsize,
        threads: PositiveUsize,
    ) -> Self {
        Self {
            targets,
            iterations,
            threads,
        }
    }

    #[must_use]
    pub const fn targets(self) -> usize {
        self.targets.get()
    }

    #[must_use]
    pub const fn iterations(self) -> usize {
        self.iterations.get()
    }

    #[must_use]
    pub const fn threads(self) -> usize {
        self.threads.get()
    }

    /// Total number of requests, or `None` when it does not fit in `usize`.
    #[must_use]
    pub fn cell_count(self) -> Option<usize> {
        self.targets()
            .checked_mul(self.iterations())?
            .checked_mul(self.threads())
    }

    #[must_use]
    pub const fn contains(self, coordinate: Coordinate) -> bool {
        coordinate.target < self.targets()
            && coordinate.iteration < self.iterations()
            && coordinate.thread < self.threads()
    }

    /// Row-major position of `coordinate` in a flattened grid.
    #[must_use]
    pub fn index_of(self, coordinate: Coordinate) -> Option<usize> {
        if !self.contains(coordinate) {
            return None;
        }
        coordinate
            .target
            .checked_mul(self.iterations())?
            .checked_add(coordinate.iteration)?
            .checked_mul(self.threads())?
            .checked_add(coordinate.thread)
    }

    /// Every coordinate, target-major / iteration-major / thread-minor.
    pub fn coordinates(self) -> impl Iterator<Item = Coordinate> {
        let iterations = self.iterations();
        let threads = self.threads();
        (0..self.targets()).flat_map(move |target| {
            (0..iterations).flat_map(move |iteration| {
                (0..threads).map(move |thread| Coordinate::new(target, iteration, thread))
            })
        })
    }

    /// Every `(target, iteration)` wave in execution order.
    pub fn waves(self) -> impl Iterator<Item = (usize, usize)> {
        let iterations = self.iterations();
        (0..self.targets())
            .flat_map(move |target| (0..iterations).map(move |iteration| (target, iteration)))
    }
}

#[derive(Debug, Clone)]
pub struct RequestPlan {
    coordinate: Coordinate,
    target: Arc<Target>,
}

impl RequestPlan {
    #[must_use]
    pub const fn new(coordinate: Coordinate, target: Arc<Target>) -> Self {
        Self { coordinate, target }
    }

    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        self.target.url()
    }

    #[must_use]
    pub fn payload(&self) -> Bytes {
        self.target.payload()
    }
}

/// All planned requests, stored so that each wave is one contiguous,
/// thread-ordered slice.
#[derive(Debug, Clone)]
pub struct RequestGrid {
    shape: GridShape,
    targets: Vec<Arc<Target>>,
    plans: Vec<RequestPlan>,
}

impl RequestGrid {
    /// Builds one plan per (target, iteration, thread) cell.
    ///
    /// # Errors
    ///
    /// Returns an error when `targets` is empty or the grid size overflows.
    pub fn build(
        targets: Vec<Arc<Target>>,
        iterations: PositiveUsize,
        threads: PositiveUsize,
    ) -> AppResult<Self> {
        let target_count = PositiveUsize::try_from(targets.len())
            .ok()
            .ok_or_else(|| AppError::validation(ValidationError::NoTargets))?;
        let shape = GridShape::new(target_count, iterations, threads);
        let cells = shape.cell_count().ok_or_else(|| {
            AppError::engine(EngineError::GridTooLarge {
                targets: shape.targets(),
                iterations: shape.iterations(),
                threads: shape.threads(),
            })
        })?;

        let mut plans = Vec::with_capacity(cells);
        for (target_index, target) in targets.iter().enumerate() {
            for iteration in 0..shape.iterations() {
                for thread in 0..shape.threads() {
                    plans.push(RequestPlan::new(
                        Coordinate::new(target_index, iteration, thread),
                        Arc::clone(target),
                    ));
                }
            }
        }

        Ok(Self {
            shape,
            targets,
            plans,
        })
    }

    #[must_use]
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    #[must_use]
    pub fn targets(&self) -> &[Arc<Target>] {
        &self.targets
    }

    #[must_use]
    pub fn plans(&self) -> &[RequestPlan] {
        &self.plans
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// The thread-ordered plans of one wave.
    #[must_use]
    pub fn wave(&self, target: usize, iteration: usize) -> Option<&[RequestPlan]> {
        let start = self
            .shape
            .index_of(Coordinate::new(target, iteration, 0))?;
        let end = start.checked_add(self.shape.threads())?;
        self.plans.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(value: usize) -> Result<PositiveUsize, String> {
        PositiveUsize::try_from(value).map_err(|err| err.to_string())
    }

    fn target(url: &str, payload: &'static [u8]) -> Result<Arc<Target>, String> {
        let url = Url::parse(url).map_err(|err| format!("bad url: {}", err))?;
        Ok(Arc::new(Target::new(url, Bytes::from_static(payload))))
    }

    #[test]
    fn coordinates_are_target_major() -> Result<(), String> {
        let shape = GridShape::new(positive(2)?, positive(2)?, positive(2)?);
        let coords: Vec<Coordinate> = shape.coordinates().collect();
        if coords.len() != 8 {
            return Err(format!("Expected 8 coordinates, got {}", coords.len()));
        }
        let mut sorted = coords.clone();
        sorted.sort();
        if sorted != coords {
            return Err("Coordinates are not in target-major order".to_owned());
        }
        for (expected, coordinate) in coords.iter().enumerate() {
            if shape.index_of(*coordinate) != Some(expected) {
                return Err(format!("Unexpected index for {}", coordinate));
            }
        }
        Ok(())
    }

    #[test]
    fn index_of_rejects_out_of_bounds() -> Result<(), String> {
        let shape = GridShape::new(positive(1)?, positive(2)?, positive(3)?);
        for coordinate in [
            Coordinate::new(1, 0, 0),
            Coordinate::new(0, 2, 0),
            Coordinate::new(0, 0, 3),
        ] {
            if shape.index_of(coordinate).is_some() {
                return Err(format!("Expected {} to be out of bounds", coordinate));
            }
        }
        Ok(())
    }

    #[test]
    fn grid_waves_are_contiguous_and_share_payload() -> Result<(), String> {
        let first = target("http://svc/ok", b"<xml/>")?;
        let second = target("http://svc/other", b"<other/>")?;
        let grid = RequestGrid::build(vec![first, second], positive(2)?, positive(3)?)
            .map_err(|err| err.to_string())?;

        if grid.len() != 12 {
            return Err(format!("Expected 12 plans, got {}", grid.len()));
        }

        let wave = grid
            .wave(1, 1)
            .ok_or_else(|| "Missing wave (1, 1)".to_owned())?;
        if wave.len() != 3 {
            return Err(format!("Expected 3 plans in wave, got {}", wave.len()));
        }
        for (thread, plan) in wave.iter().enumerate() {
            if plan.coordinate() != Coordinate::new(1, 1, thread) {
                return Err(format!("Unexpected coordinate {}", plan.coordinate()));
            }
            if plan.url().as_str() != "http://svc/other" {
                return Err(format!("Unexpected url {}", plan.url()));
            }
        }

        let payloads: Vec<Bytes> = grid
            .plans()
            .iter()
            .filter(|plan| plan.coordinate().target == 0)
            .map(RequestPlan::payload)
            .collect();
        let base = payloads
            .first()
            .ok_or_else(|| "Missing payload".to_owned())?;
        if payloads
            .iter()
            .any(|payload| payload.as_ptr() != base.as_ptr() || payload != &b"<xml/>"[..])
        {
            return Err("Payload storage was not shared".to_owned());
        }

        if grid.wave(2, 0).is_some() {
            return Err("Expected no wave for missing target".to_owned());
        }
        Ok(())
    }

    #[test]
    fn grid_requires_targets() -> Result<(), String> {
        if RequestGrid::build(Vec::new(), positive(1)?, positive(1)?).is_ok() {
            return Err("Expected empty target list to be rejected".to_owned());
        }
        Ok(())
    }

    #[test]
    fn grid_rejects_overflowing_shape() -> Result<(), String> {
        let huge = positive(usize::MAX)?;
        let result = RequestGrid::build(vec![target("http://svc/ok", b"x")?], huge, huge);
        match result {
            Err(AppError::Engine(EngineError::GridTooLarge { .. })) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Expected overflow to be rejected".to_owned()),
        }
    }
}
