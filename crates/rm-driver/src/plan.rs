//! Driving a single car from entry to exit.

use rm_core::{CarId, Position};
use rm_monitor::RoadMonitor;
use tracing::debug;

use crate::{CarRng, DriverError, DriverResult};

/// How long a car stays in each segment, first segment first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarPlan {
    pub car:    CarId,
    pub dwells: Vec<u32>,
}

impl CarPlan {
    pub fn new(car: impl Into<CarId>, dwells: Vec<u32>) -> Self {
        Self { car: car.into(), dwells }
    }

    /// One random dwell in `[min_dwell, max_dwell]` per segment.
    pub fn random(
        car:       impl Into<CarId>,
        segments:  u32,
        rng:       &mut CarRng,
        min_dwell: u32,
        max_dwell: u32,
    ) -> Self {
        let dwells = (0..segments).map(|_| rng.dwell(min_dwell, max_dwell)).collect();
        Self::new(car, dwells)
    }
}

/// What a car saw on its way through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub car:     CarId,
    /// Position granted in each segment, in order.
    pub visited: Vec<Position>,
}

/// Drive `plan.car` through the road: `enter`, then `circulate` + `advance`
/// for each further dwell, then a final `circulate` and `exit`.
///
/// Blocks the calling thread; something else must be ticking the clock.  On
/// error the car is taken off the road so it cannot block anyone else.
pub fn drive_car(road: &RoadMonitor, plan: &CarPlan) -> DriverResult<Trip> {
    let result = drive(road, plan);
    if result.is_err() {
        road.exit(&plan.car);
    }
    result
}

fn drive(road: &RoadMonitor, plan: &CarPlan) -> DriverResult<Trip> {
    let car = &plan.car;
    let (&first, rest) = plan
        .dwells
        .split_first()
        .ok_or_else(|| DriverError::EmptyPlan(car.clone()))?;

    let mut visited = Vec::with_capacity(plan.dwells.len());
    visited.push(road.enter(car, first)?);
    for &dwell in rest {
        road.circulate(car)?;
        visited.push(road.advance(car, dwell)?);
    }
    road.circulate(car)?;
    road.exit(car);

    debug!(car = %car, segments = visited.len(), "trip complete");
    Ok(Trip { car: car.clone(), visited })
}
