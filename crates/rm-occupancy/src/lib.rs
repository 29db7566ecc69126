//! `rm-occupancy` — who is where on the road.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`grid`]     | `OccupancyGrid` — `segments × lanes` cells of `Option<CarId>` |
//! | [`registry`] | `CarRegistry`, `CarState` — active car → position + dwell  |
//!
//! Neither type synchronises anything.  Both are owned by the road monitor and
//! only touched while its lock is held, so they are plain single-threaded
//! stores that trust their caller to keep them consistent with each other.

pub mod grid;
pub mod registry;

#[cfg(test)]
mod tests;

pub use grid::OccupancyGrid;
pub use registry::{CarRegistry, CarState};
