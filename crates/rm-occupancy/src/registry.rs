//! The `CarRegistry` — per-car state for every car currently on the road.

use rm_core::{CarId, Position};

#[cfg(feature = "fx-hash")]
type CarMap<V> = rustc_hash::FxHashMap<CarId, V>;
#[cfg(not(feature = "fx-hash"))]
type CarMap<V> = std::collections::HashMap<CarId, V>;

/// Where a car is and how long it must stay there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarState {
    pub position: Position,

    /// Ticks left before the car may leave `position`.  Set by `enter` /
    /// `advance`, counted down by `tick`, never below zero.
    pub remaining_ticks: u32,
}

impl CarState {
    #[inline]
    pub fn new(position: Position, remaining_ticks: u32) -> Self {
        Self { position, remaining_ticks }
    }

    /// `true` once the dwell has fully elapsed.
    #[inline]
    pub fn dwell_elapsed(&self) -> bool {
        self.remaining_ticks == 0
    }
}

/// Plain keyed store of active cars.  No ordering semantics.
#[derive(Debug, Clone, Default)]
pub struct CarRegistry {
    cars: CarMap<CarState>,
}

impl CarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, car: &CarId) -> Option<&CarState> {
        self.cars.get(car)
    }

    pub fn contains(&self, car: &CarId) -> bool {
        self.cars.contains_key(car)
    }

    /// Insert or overwrite `car`'s state, returning the previous one.
    pub fn put(&mut self, car: CarId, state: CarState) -> Option<CarState> {
        self.cars.insert(car, state)
    }

    pub fn remove(&mut self, car: &CarId) -> Option<CarState> {
        self.cars.remove(car)
    }

    /// Count every car's dwell down by one tick, saturating at zero.
    pub fn tick_all(&mut self) {
        for state in self.cars.values_mut() {
            state.remaining_ticks = state.remaining_ticks.saturating_sub(1);
        }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// All active cars in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&CarId, &CarState)> {
        self.cars.iter()
    }
}
