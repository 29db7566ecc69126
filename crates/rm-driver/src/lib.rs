//! `rm-driver` — threads that drive cars and the clock through a
//! [`RoadMonitor`][rm_monitor::RoadMonitor].
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`rng`]    | `CarRng` — per-car deterministic RNG for dwell durations    |
//! | [`plan`]   | `CarPlan`, `Trip`, `drive_car` — one car, end to end        |
//! | [`clock`]  | `ClockDriver` — background thread calling `tick()`          |
//! | [`fleet`]  | `DriverConfig`, `run_fleet`, `FleetReport`, `PeakOccupancy` |
//! | [`error`]  | `DriverError`, `DriverResult<T>`                            |
//!
//! # Car life cycle
//!
//! ```text
//! enter(d1)
//! for each further segment k:
//!     circulate      ← wait out the dwell in segment k-1
//!     advance(dk)
//! circulate
//! exit
//! ```

pub mod clock;
pub mod error;
pub mod fleet;
pub mod plan;
pub mod rng;

#[cfg(test)]
mod tests;

pub use clock::ClockDriver;
pub use error::{DriverError, DriverResult};
pub use fleet::{DriverConfig, FleetReport, PeakOccupancy, run_fleet};
pub use plan::{CarPlan, Trip, drive_car};
pub use rng::CarRng;
