//! The `RoadMonitor` and its five operations.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use rm_core::{CarId, Position, RoadConfig, Ticket, Tick};
use rm_occupancy::CarState;
use tracing::{debug, trace, warn};

use crate::request::Outcome;
use crate::state::RoadState;
use crate::{MonitorObserver, RequestKind, RoadError, RoadMonitorBuilder, RoadResult, RoadSnapshot};

// ── Inner ─────────────────────────────────────────────────────────────────────

/// Everything behind the monitor lock.
struct Inner {
    state:    RoadState,
    observer: Box<dyn MonitorObserver>,
}

impl Inner {
    /// Run one wakeup-policy cycle.
    fn wake_next(&mut self) -> Option<Ticket> {
        let Inner { state, observer } = self;
        state.evaluate_and_wake(observer.as_mut())
    }

    /// Queue a request for `car` and tell the observer.
    fn block(&mut self, car: CarId, kind: RequestKind) -> (Ticket, Arc<Condvar>) {
        self.observer.on_block(&car, kind);
        debug!(car = %car, kind = %kind, now = %self.state.now, "blocked");
        self.state.queue.enqueue(car, kind)
    }

    fn ensure_not_waiting(&self, car: &CarId) -> RoadResult<()> {
        if self.state.queue.contains_car(car) {
            return Err(RoadError::AlreadyWaiting(car.clone()));
        }
        Ok(())
    }
}

// ── RoadMonitor ───────────────────────────────────────────────────────────────

/// Exclusive-access coordinator for a segmented, multi-lane road.
///
/// One mutex guards the occupancy grid, the car registry and the request
/// queue; every operation holds it for its whole duration except while
/// suspended.  Blocked calls wait on a condition variable private to their
/// request and are released strictly in arrival order, one grant per
/// state change.
///
/// Share between threads with `Arc<RoadMonitor>`.
///
/// ```rust,ignore
/// let road = Arc::new(RoadMonitor::new(RoadConfig::new(3, 1)?)?);
/// let pos = road.enter("A", 2)?;      // (1,1)
/// road.tick();
/// road.tick();
/// road.circulate("A")?;               // returns at once: dwell elapsed
/// let pos = road.advance("A", 3)?;    // (2,1)
/// road.exit("A");
/// ```
pub struct RoadMonitor {
    config: RoadConfig,
    inner:  Mutex<Inner>,
}

impl RoadMonitor {
    /// Build a monitor with no observer.  Fails on an empty road.
    pub fn new(config: RoadConfig) -> RoadResult<Self> {
        RoadMonitorBuilder::from_config(config).build()
    }

    /// Start a [`RoadMonitorBuilder`] for a `segments × lanes` road.
    pub fn builder(segments: u32, lanes: u32) -> RoadMonitorBuilder {
        RoadMonitorBuilder::new(segments, lanes)
    }

    pub(crate) fn from_parts(config: RoadConfig, observer: Box<dyn MonitorObserver>) -> RoadResult<Self> {
        let state = RoadState::new(config)?;
        Ok(Self { config, inner: Mutex::new(Inner { state, observer }) })
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Take the first free lane of segment 1 with a dwell of `ticks`.
    ///
    /// Blocks while segment 1 is full.  Fails without blocking if `ticks` is
    /// zero or `car` is already on the road or already waiting.
    pub fn enter(&self, car: impl Into<CarId>, ticks: u32) -> RoadResult<Position> {
        let car = car.into();
        if ticks == 0 {
            return Err(RoadError::InvalidDwell { car });
        }

        let mut guard = self.lock();
        guard.ensure_not_waiting(&car)?;
        if guard.state.registry.contains(&car) {
            return Err(RoadError::AlreadyActive(car));
        }

        if let Some(lane) = guard.state.grid.free_lane(1) {
            let at = Position::new(1, lane);
            let inner = &mut *guard;
            inner.state.place(&car, at, ticks);
            inner.observer.on_enter(&car, at);
            debug!(car = %car, at = %at, dwell = ticks, "entered");
            inner.wake_next();
            return Ok(at);
        }

        let (ticket, handle) = guard.block(car.clone(), RequestKind::Enter { dwell: ticks });
        let (mut guard, outcome) = self.await_outcome(guard, ticket, &handle);
        match outcome {
            Outcome::Entered(at) => {
                debug!(car = %car, at = %at, dwell = ticks, "entered after waiting");
                guard.wake_next();
                Ok(at)
            }
            _ => Err(RoadError::Withdrawn(car)),
        }
    }

    /// Move `car` to the first free lane of the next segment, with a new dwell
    /// of `ticks`.
    ///
    /// Blocks until the current dwell has elapsed and the next segment has a
    /// free lane.  Fails without blocking if `ticks` is zero, `car` is not on
    /// the road, is already waiting, or is in the last segment.
    pub fn advance(&self, car: impl Into<CarId>, ticks: u32) -> RoadResult<Position> {
        let car = car.into();
        if ticks == 0 {
            return Err(RoadError::InvalidDwell { car });
        }

        let mut guard = self.lock();
        guard.ensure_not_waiting(&car)?;
        let Some(&CarState { position: from, remaining_ticks }) = guard.state.registry.get(&car) else {
            return Err(RoadError::UnknownCar(car));
        };
        if self.config.is_last_segment(from.segment) {
            return Err(RoadError::BoundaryOverrun { car, segment: from.segment });
        }
        let next = from.segment + 1;

        if remaining_ticks == 0 {
            if let Some(lane) = guard.state.grid.free_lane(next) {
                let to = Position::new(next, lane);
                let inner = &mut *guard;
                inner.state.relocate(&car, from, to, ticks);
                inner.observer.on_advance(&car, from, to);
                debug!(car = %car, from = %from, to = %to, dwell = ticks, "advanced");
                inner.wake_next();
                return Ok(to);
            }
        }

        let kind = RequestKind::Advance { to_segment: next, dwell: ticks };
        let (ticket, handle) = guard.block(car.clone(), kind);
        let (mut guard, outcome) = self.await_outcome(guard, ticket, &handle);
        match outcome {
            Outcome::Advanced { from, to } => {
                debug!(car = %car, from = %from, to = %to, dwell = ticks, "advanced after waiting");
                guard.wake_next();
                Ok(to)
            }
            _ => Err(RoadError::Withdrawn(car)),
        }
    }

    /// Wait until `car`'s dwell in its current segment has elapsed.
    ///
    /// Returns immediately if it already has.  Fails without blocking if `car`
    /// is not on the road or is already waiting.
    pub fn circulate(&self, car: impl Into<CarId>) -> RoadResult<()> {
        let car = car.into();

        let mut guard = self.lock();
        guard.ensure_not_waiting(&car)?;
        let Some(state) = guard.state.registry.get(&car) else {
            return Err(RoadError::UnknownCar(car));
        };
        if state.dwell_elapsed() {
            return Ok(());
        }

        let (ticket, handle) = guard.block(car.clone(), RequestKind::Circulate);
        let (mut guard, outcome) = self.await_outcome(guard, ticket, &handle);
        match outcome {
            Outcome::Withdrawn => Err(RoadError::Withdrawn(car)),
            _ => {
                guard.wake_next();
                Ok(())
            }
        }
    }

    /// Take `car` off the road.  Never blocks; does nothing for an unknown
    /// car.
    ///
    /// A call still blocked on behalf of `car` is woken with
    /// [`RoadError::Withdrawn`].
    pub fn exit(&self, car: impl Into<CarId>) {
        let car = car.into();

        let mut guard = self.lock();
        let inner = &mut *guard;

        let withdrawn = inner.state.queue.withdraw(&car);
        if let Some(request) = &withdrawn {
            warn!(car = %car, kind = %request.kind, "exit withdrew a blocked request");
            inner.observer.on_withdraw(&car, request.kind);
        }

        let removed = inner.state.remove(&car);
        if let Some(state) = removed {
            inner.observer.on_exit(&car, state.position);
            debug!(car = %car, from = %state.position, "exited");
        }

        if removed.is_some() || withdrawn.is_some() {
            inner.wake_next();
        }
    }

    /// Advance logical time by one tick: every active car's dwell counts down
    /// by one (never below zero), then one wakeup cycle runs.
    ///
    /// Meant for a single clock-driver thread.
    pub fn tick(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let now = inner.state.now.next();
        inner.state.now = now;
        inner.state.registry.tick_all();
        inner.observer.on_tick(now);
        trace!(
            now = %now,
            cars = inner.state.registry.len(),
            pending = inner.state.queue.len(),
            "tick"
        );
        inner.wake_next();
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn config(&self) -> RoadConfig {
        self.config
    }

    /// Ticks issued so far.
    pub fn now(&self) -> Tick {
        self.lock().state.now
    }

    pub fn position_of(&self, car: impl Into<CarId>) -> Option<Position> {
        self.lock().state.registry.get(&car.into()).map(|s| s.position)
    }

    pub fn remaining_ticks(&self, car: impl Into<CarId>) -> Option<u32> {
        self.lock().state.registry.get(&car.into()).map(|s| s.remaining_ticks)
    }

    /// The request `car` is currently blocked on, if any.
    pub fn waiting_on(&self, car: impl Into<CarId>) -> Option<RequestKind> {
        self.lock().state.queue.pending_for(&car.into()).map(|r| r.kind)
    }

    pub fn active_cars(&self) -> usize {
        self.lock().state.registry.len()
    }

    pub fn pending_requests(&self) -> usize {
        self.lock().state.queue.len()
    }

    /// Consistent copy of the whole road.
    pub fn snapshot(&self) -> RoadSnapshot {
        let guard = self.lock();
        let state = &guard.state;

        let mut cars: Vec<(CarId, CarState)> =
            state.registry.iter().map(|(id, s)| (id.clone(), *s)).collect();
        cars.sort_by(|a, b| a.0.cmp(&b.0));

        RoadSnapshot {
            now:     state.now,
            cars,
            cells:   state.grid.iter_occupied().map(|(p, c)| (p, c.clone())).collect(),
            pending: state.queue.iter().map(|r| (r.car.clone(), r.kind)).collect(),
        }
    }

    // ── Locking ───────────────────────────────────────────────────────────

    /// Acquire the monitor lock.  A panic inside an observer hook poisons the
    /// mutex.  Hooks only run after a transition is fully applied, so the
    /// state behind a poisoned lock is consistent and is recovered.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("road monitor lock poisoned; recovering inner state");
                poisoned.into_inner()
            }
        }
    }

    /// Sleep on `handle` until `ticket` is resolved, then hand back the lock
    /// and the outcome.  Loops over spurious wakeups.
    fn await_outcome<'a>(
        &'a self,
        mut guard: MutexGuard<'a, Inner>,
        ticket:    Ticket,
        handle:    &Condvar,
    ) -> (MutexGuard<'a, Inner>, Outcome) {
        loop {
            if let Some(outcome) = guard.state.queue.take_outcome(ticket) {
                return (guard, outcome);
            }
            guard = match handle.wait(guard) {
                Ok(guard) => guard,
                Err(poisoned) => {
                    warn!(ticket = %ticket, "road monitor lock poisoned while waiting; recovering");
                    poisoned.into_inner()
                }
            };
        }
    }
}
