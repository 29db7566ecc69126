//! Point-in-time copies of the monitor state.

use rm_core::{CarId, Position, RoadConfig, Tick};
use rm_occupancy::CarState;

use crate::RequestKind;

/// A consistent copy of the road taken under the monitor lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadSnapshot {
    pub now: Tick,

    /// Active cars, sorted by id.
    pub cars: Vec<(CarId, CarState)>,

    /// Occupied grid cells in segment-then-lane order.
    pub cells: Vec<(Position, CarId)>,

    /// Pending requests in queue order (head first).
    pub pending: Vec<(CarId, RequestKind)>,
}

impl RoadSnapshot {
    pub fn state_of(&self, car: &CarId) -> Option<&CarState> {
        self.cars
            .binary_search_by(|(id, _)| id.cmp(car))
            .ok()
            .map(|i| &self.cars[i].1)
    }

    /// Number of cars in `segment`.
    pub fn cars_in(&self, segment: u32) -> usize {
        self.cells.iter().filter(|(pos, _)| pos.segment == segment).count()
    }

    /// Check the occupancy invariants against `config`:
    ///
    /// - every cell is on the road and holds a distinct car;
    /// - no segment holds more than `lanes` cars;
    /// - the grid and the registry agree on where every car is.
    pub fn check_invariants(&self, config: RoadConfig) -> Result<(), String> {
        let mut seen: Vec<&CarId> = Vec::with_capacity(self.cells.len());
        for (pos, car) in &self.cells {
            if !config.contains(*pos) {
                return Err(format!("{car} occupies off-road cell {pos}"));
            }
            if seen.contains(&car) {
                return Err(format!("{car} occupies more than one cell"));
            }
            seen.push(car);
        }
        for segment in 1..=config.segments {
            let n = self.cars_in(segment);
            if n > config.lanes as usize {
                return Err(format!("segment {segment} holds {n} cars on {} lanes", config.lanes));
            }
        }
        if self.cells.len() != self.cars.len() {
            return Err(format!(
                "grid holds {} cars but registry holds {}",
                self.cells.len(),
                self.cars.len()
            ));
        }
        for (pos, car) in &self.cells {
            match self.state_of(car) {
                Some(state) if state.position == *pos => {}
                Some(state) => {
                    return Err(format!("{car} is at {pos} in the grid but {} in the registry", state.position));
                }
                None => return Err(format!("{car} is in the grid but not the registry")),
            }
        }
        Ok(())
    }
}
