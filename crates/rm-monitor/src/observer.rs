//! Observer hooks for watching the monitor from the outside.

use std::sync::{Arc, Mutex, PoisonError};

use rm_core::{CarId, Position, Tick};

use crate::RequestKind;

/// Callbacks invoked by [`RoadMonitor`][crate::RoadMonitor] as state changes.
///
/// Hooks run while the monitor lock is held, so the sequence an observer sees
/// is exactly the order in which the changes happened.  Keep them short and
/// never call back into the monitor from a hook: that deadlocks.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait MonitorObserver: Send {
    /// A car took a lane in segment 1.
    fn on_enter(&mut self, _car: &CarId, _at: Position) {}

    /// A car moved to the next segment.
    fn on_advance(&mut self, _car: &CarId, _from: Position, _to: Position) {}

    /// A car left the road.
    fn on_exit(&mut self, _car: &CarId, _from: Position) {}

    /// A call could not proceed and was queued.
    fn on_block(&mut self, _car: &CarId, _kind: RequestKind) {}

    /// The wakeup policy granted a queued request.
    fn on_grant(&mut self, _car: &CarId, _kind: RequestKind) {}

    /// A queued request was discarded because its car exited.
    fn on_withdraw(&mut self, _car: &CarId, _kind: RequestKind) {}

    /// The clock advanced to `now`.
    fn on_tick(&mut self, _now: Tick) {}
}

/// A [`MonitorObserver`] that does nothing.
pub struct NoopObserver;

impl MonitorObserver for NoopObserver {}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// One recorded observer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    Enter { car: CarId, at: Position },
    Advance { car: CarId, from: Position, to: Position },
    Exit { car: CarId, from: Position },
    Block { car: CarId, kind: RequestKind },
    Grant { car: CarId, kind: RequestKind },
    Withdraw { car: CarId, kind: RequestKind },
    Tick(Tick),
}

/// Records every event in order.  Cloning shares the same log, so keep one
/// clone and hand the other to the builder.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MonitorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Cars granted so far, in grant order.
    pub fn grants(&self) -> Vec<CarId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MonitorEvent::Grant { car, .. } => Some(car),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: MonitorEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl MonitorObserver for EventLog {
    fn on_enter(&mut self, car: &CarId, at: Position) {
        self.push(MonitorEvent::Enter { car: car.clone(), at });
    }

    fn on_advance(&mut self, car: &CarId, from: Position, to: Position) {
        self.push(MonitorEvent::Advance { car: car.clone(), from, to });
    }

    fn on_exit(&mut self, car: &CarId, from: Position) {
        self.push(MonitorEvent::Exit { car: car.clone(), from });
    }

    fn on_block(&mut self, car: &CarId, kind: RequestKind) {
        self.push(MonitorEvent::Block { car: car.clone(), kind });
    }

    fn on_grant(&mut self, car: &CarId, kind: RequestKind) {
        self.push(MonitorEvent::Grant { car: car.clone(), kind });
    }

    fn on_withdraw(&mut self, car: &CarId, kind: RequestKind) {
        self.push(MonitorEvent::Withdraw { car: car.clone(), kind });
    }

    fn on_tick(&mut self, now: Tick) {
        self.push(MonitorEvent::Tick(now));
    }
}
