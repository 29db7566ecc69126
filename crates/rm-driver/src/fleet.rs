//! Running many cars at once against one monitor.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rm_core::{CarId, Position, RoadConfig};
use rm_monitor::{MonitorObserver, RoadMonitor};
use tracing::{info, warn};

use crate::{CarPlan, CarRng, ClockDriver, DriverError, DriverResult, Trip, drive_car};

// ── DriverConfig ──────────────────────────────────────────────────────────────

/// Everything needed for one fleet run.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub road: RoadConfig,

    /// Number of car threads.  Cars are named `car-0`, `car-1`, ….
    pub cars: usize,

    /// Master seed for dwell durations.  The same seed gives the same plans.
    pub seed: u64,

    /// Inclusive dwell range drawn for every segment.  `min_dwell ≥ 1`.
    pub min_dwell: u32,
    pub max_dwell: u32,

    /// Real time between clock ticks.
    pub tick_interval: Duration,
}

impl DriverConfig {
    pub fn validate(&self) -> DriverResult<()> {
        self.road.validate()?;
        if self.min_dwell == 0 {
            return Err(DriverError::Config("min_dwell must be at least 1".into()));
        }
        if self.min_dwell > self.max_dwell {
            return Err(DriverError::Config(format!(
                "min_dwell {} exceeds max_dwell {}",
                self.min_dwell, self.max_dwell
            )));
        }
        Ok(())
    }

    /// Deterministic per-car plans for this config.
    pub fn plans(&self) -> Vec<CarPlan> {
        (0..self.cars)
            .map(|i| {
                let mut rng = CarRng::new(self.seed, i as u64);
                CarPlan::random(
                    format!("car-{i}"),
                    self.road.segments,
                    &mut rng,
                    self.min_dwell,
                    self.max_dwell,
                )
            })
            .collect()
    }
}

// ── PeakOccupancy ─────────────────────────────────────────────────────────────

struct Occupancy {
    current: Vec<usize>,
    peak:    Vec<usize>,
}

impl Occupancy {
    fn shift(&mut self, from: Option<Position>, to: Option<Position>) {
        if let Some(p) = from {
            if let Some(slot) = self.current.get_mut(p.segment as usize - 1) {
                *slot = slot.saturating_sub(1);
            }
        }
        if let Some(p) = to {
            let i = p.segment as usize - 1;
            if let Some(slot) = self.current.get_mut(i) {
                *slot += 1;
                self.peak[i] = self.peak[i].max(*slot);
            }
        }
    }
}

/// Observer tracking the highest number of cars seen in each segment at once.
#[derive(Clone)]
pub struct PeakOccupancy {
    inner: Arc<Mutex<Occupancy>>,
}

impl PeakOccupancy {
    pub fn new(segments: u32) -> Self {
        let n = segments as usize;
        Self {
            inner: Arc::new(Mutex::new(Occupancy { current: vec![0; n], peak: vec![0; n] })),
        }
    }

    /// Peak car count per segment, segment 1 first.
    pub fn peaks(&self) -> Vec<usize> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).peak.clone()
    }

    fn shift(&self, from: Option<Position>, to: Option<Position>) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).shift(from, to);
    }
}

impl MonitorObserver for PeakOccupancy {
    fn on_enter(&mut self, _car: &CarId, at: Position) {
        self.shift(None, Some(at));
    }

    fn on_advance(&mut self, _car: &CarId, from: Position, to: Position) {
        self.shift(Some(from), Some(to));
    }

    fn on_exit(&mut self, _car: &CarId, from: Position) {
        self.shift(Some(from), None);
    }
}

// ── run_fleet ─────────────────────────────────────────────────────────────────

/// Outcome of a fleet run.
#[derive(Debug, Clone)]
pub struct FleetReport {
    /// One trip per car, in car order.
    pub trips: Vec<Trip>,

    /// Ticks the clock issued before it was stopped.
    pub ticks: u64,

    /// Highest simultaneous car count per segment.
    pub peak_per_segment: Vec<usize>,
}

/// Build a monitor for `config.road`, start the clock, drive every car on its
/// own thread, and wait for all of them.
///
/// Every car thread is joined before the first failure is returned.
pub fn run_fleet(config: &DriverConfig) -> DriverResult<FleetReport> {
    config.validate()?;

    let peaks = PeakOccupancy::new(config.road.segments);
    let road = Arc::new(
        RoadMonitor::builder(config.road.segments, config.road.lanes)
            .observer(peaks.clone())
            .build()?,
    );
    info!(
        segments = config.road.segments,
        lanes = config.road.lanes,
        cars = config.cars,
        seed = config.seed,
        "fleet starting"
    );

    let clock = ClockDriver::start(Arc::clone(&road), config.tick_interval)?;

    let mut handles = Vec::with_capacity(config.cars);
    for plan in config.plans() {
        let road = Arc::clone(&road);
        let name = plan.car.to_string();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || drive_car(&road, &plan))?;
        handles.push((name, handle));
    }

    let mut trips = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (name, handle) in handles {
        let result = handle
            .join()
            .map_err(|_| DriverError::Panicked { what: name.clone() })
            .and_then(|r| r);
        match result {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                warn!(car = %name, error = %e, "car failed");
                first_error.get_or_insert(e);
            }
        }
    }

    let ticks = clock.stop()?;
    if let Some(e) = first_error {
        return Err(e);
    }

    info!(cars = trips.len(), ticks, "fleet finished");
    Ok(FleetReport { trips, ticks, peak_per_segment: peaks.peaks() })
}
