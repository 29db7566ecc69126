//! Shared road state and the wakeup policy.
//!
//! Everything here runs with the monitor lock held.

use rm_core::{CarId, CoreResult, Position, RoadConfig, Ticket, Tick};
use rm_occupancy::{CarRegistry, CarState, OccupancyGrid};
use tracing::debug;

use crate::request::{Outcome, Request, RequestQueue};
use crate::{MonitorObserver, RequestKind};

/// What granting a request will do, decided while evaluating its predicate.
#[derive(Debug, Clone, Copy)]
enum Admission {
    /// Take `at`, which is free.
    Place { at: Position },
    /// Leave `from` for `to`, which is free.
    Move { from: Position, to: Position },
    /// Nothing to change; the wait is over.
    Release,
}

/// Grid + registry + queue, owned by one monitor.
#[derive(Debug)]
pub(crate) struct RoadState {
    pub grid:     OccupancyGrid,
    pub registry: CarRegistry,
    pub queue:    RequestQueue,
    pub now:      Tick,
}

impl RoadState {
    pub fn new(config: RoadConfig) -> CoreResult<Self> {
        Ok(Self {
            grid:     OccupancyGrid::new(config)?,
            registry: CarRegistry::new(),
            queue:    RequestQueue::new(),
            now:      Tick::ZERO,
        })
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Put a new car at `at` with a fresh dwell.  `at` must be free.
    pub fn place(&mut self, car: &CarId, at: Position, dwell: u32) {
        self.grid.place(at, car.clone());
        self.registry.put(car.clone(), CarState::new(at, dwell));
    }

    /// Move an active car from `from` to the free cell `to`, resetting its
    /// dwell.
    pub fn relocate(&mut self, car: &CarId, from: Position, to: Position, dwell: u32) {
        self.grid.clear(from);
        self.grid.place(to, car.clone());
        self.registry.put(car.clone(), CarState::new(to, dwell));
    }

    /// Take a car off the road entirely.
    pub fn remove(&mut self, car: &CarId) -> Option<CarState> {
        let state = self.registry.remove(car)?;
        self.grid.clear(state.position);
        Some(state)
    }

    // ── Wakeup policy ─────────────────────────────────────────────────────

    /// Scan the queue head to tail and grant the first request whose
    /// predicate holds against the current state.  At most one request is
    /// granted per call; the rest keep their place.
    ///
    /// The granted transition is applied here, under the lock, and the result
    /// is parked in the queue for the woken thread.  A grant therefore cannot
    /// be invalidated by another caller slipping in before the waiter runs.
    ///
    /// Observer hooks run only once the grid, registry and queue agree, so a
    /// panicking hook leaves nothing half-granted behind the poisoned lock.
    pub fn evaluate_and_wake(&mut self, observer: &mut dyn MonitorObserver) -> Option<Ticket> {
        if self.queue.is_empty() {
            return None;
        }
        let (ticket, car, kind, admission) = self.queue.iter().find_map(|req| {
            admissible(&self.grid, &self.registry, req)
                .map(|admission| (req.ticket, req.car.clone(), req.kind, admission))
        })?;

        let outcome = match (kind, admission) {
            (RequestKind::Enter { dwell }, Admission::Place { at }) => {
                self.place(&car, at, dwell);
                Outcome::Entered(at)
            }
            (RequestKind::Advance { dwell, .. }, Admission::Move { from, to }) => {
                self.relocate(&car, from, to, dwell);
                Outcome::Advanced { from, to }
            }
            _ => Outcome::Circulated,
        };
        self.queue.resolve(ticket, outcome);
        debug!(car = %car, kind = %kind, ticket = %ticket, now = %self.now, "granted");

        observer.on_grant(&car, kind);
        match outcome {
            Outcome::Entered(at) => observer.on_enter(&car, at),
            Outcome::Advanced { from, to } => observer.on_advance(&car, from, to),
            _ => {}
        }
        Some(ticket)
    }
}

/// The per-kind predicate.  `Some` means the request can be granted now.
fn admissible(grid: &OccupancyGrid, registry: &CarRegistry, req: &Request) -> Option<Admission> {
    match req.kind {
        RequestKind::Enter { .. } => {
            let lane = grid.free_lane(1)?;
            Some(Admission::Place { at: Position::new(1, lane) })
        }
        RequestKind::Advance { to_segment, .. } => {
            let state = registry.get(&req.car)?;
            if !state.dwell_elapsed() {
                return None;
            }
            let lane = grid.free_lane(to_segment)?;
            Some(Admission::Move { from: state.position, to: Position::new(to_segment, lane) })
        }
        RequestKind::Circulate => {
            registry.get(&req.car).filter(|s| s.dwell_elapsed()).map(|_| Admission::Release)
        }
    }
}
