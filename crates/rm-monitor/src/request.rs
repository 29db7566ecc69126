//! Pending requests and the arrival-ordered queue that holds them.
//!
//! # Layout
//!
//! ```text
//! order:    VecDeque<Ticket>          arrival order, never reordered
//! pending:  HashMap<Ticket, Request>  arena of live requests
//! by_car:   HashMap<CarId, Ticket>    one pending request per car
//! resolved: HashMap<Ticket, Outcome>  granted/withdrawn, not yet collected
//! ```
//!
//! Every request owns its own `Condvar`, so a grant wakes exactly the thread
//! that asked and nobody else.  The waiter keeps an `Arc` to the handle, which
//! lets the queue drop the request record as soon as it is resolved.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Condvar};

use rm_core::{CarId, Position, Ticket};

// ── RequestKind ───────────────────────────────────────────────────────────────

/// What a blocked call is waiting for.  Carries only the data needed to
/// evaluate its predicate and to apply the transition once granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Waiting for a free lane in segment 1.
    Enter { dwell: u32 },
    /// Waiting for the dwell to elapse and a free lane in `to_segment`.
    Advance { to_segment: u32, dwell: u32 },
    /// Waiting for the dwell to elapse.
    Circulate,
}

impl RequestKind {
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Enter { .. } => "enter",
            RequestKind::Advance { .. } => "advance",
            RequestKind::Circulate => "circulate",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// How a request was resolved.  Left in the queue for the woken thread to
/// collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Entered(Position),
    Advanced { from: Position, to: Position },
    Circulated,
    Withdrawn,
}

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct Request {
    pub ticket: Ticket,
    pub car:    CarId,
    pub kind:   RequestKind,
    handle:     Arc<Condvar>,
}

// ── RequestQueue ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct RequestQueue {
    order:       VecDeque<Ticket>,
    pending:     HashMap<Ticket, Request>,
    by_car:      HashMap<CarId, Ticket>,
    resolved:    HashMap<Ticket, Outcome>,
    next_ticket: Ticket,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self {
            order:       VecDeque::new(),
            pending:     HashMap::new(),
            by_car:      HashMap::new(),
            resolved:    HashMap::new(),
            next_ticket: Ticket(0),
        }
    }

    /// Append a request at the tail.  Returns its ticket and the wait handle
    /// the caller should block on.
    ///
    /// The caller must have checked that `car` has nothing pending.
    pub fn enqueue(&mut self, car: CarId, kind: RequestKind) -> (Ticket, Arc<Condvar>) {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();

        let handle = Arc::new(Condvar::new());
        debug_assert!(!self.by_car.contains_key(&car), "{car} already has a pending request");
        self.by_car.insert(car.clone(), ticket);
        self.pending.insert(ticket, Request { ticket, car, kind, handle: Arc::clone(&handle) });
        self.order.push_back(ticket);
        (ticket, handle)
    }

    /// Live requests, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Request> + '_ {
        self.order.iter().filter_map(|t| self.pending.get(t))
    }

    pub fn pending_for(&self, car: &CarId) -> Option<&Request> {
        self.pending.get(self.by_car.get(car)?)
    }

    pub fn contains_car(&self, car: &CarId) -> bool {
        self.by_car.contains_key(car)
    }

    /// Remove `ticket` from the queue, record `outcome` for its waiter, and
    /// signal the waiter's handle once.  Remaining requests keep their order.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Outcome) -> Option<Request> {
        let request = self.pending.remove(&ticket)?;
        if let Some(i) = self.order.iter().position(|&t| t == ticket) {
            self.order.remove(i);
        }
        self.by_car.remove(&request.car);
        self.resolved.insert(ticket, outcome);
        request.handle.notify_one();
        Some(request)
    }

    /// Resolve `car`'s pending request, if any, as withdrawn.
    pub fn withdraw(&mut self, car: &CarId) -> Option<Request> {
        let ticket = *self.by_car.get(car)?;
        self.resolve(ticket, Outcome::Withdrawn)
    }

    /// Collect the outcome for `ticket`, if it has been resolved.
    pub fn take_outcome(&mut self, ticket: Ticket) -> Option<Outcome> {
        self.resolved.remove(&ticket)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
