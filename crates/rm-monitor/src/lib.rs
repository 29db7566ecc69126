//! `rm-monitor` — the road monitor.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`monitor`]  | `RoadMonitor` — `enter`, `advance`, `circulate`, `exit`, `tick` |
//! | [`builder`]  | `RoadMonitorBuilder`                                       |
//! | [`request`]  | `RequestKind`, the arrival-ordered request queue           |
//! | [`observer`] | `MonitorObserver` trait, `NoopObserver`, `EventLog`        |
//! | [`snapshot`] | `RoadSnapshot` and the occupancy invariant check           |
//! | [`error`]    | `RoadError`, `RoadResult<T>`                               |
//!
//! # Wakeup policy
//!
//! ```text
//! after every enter / advance / circulate wake / exit / tick:
//!   for request in queue (head → tail):
//!     Enter      → free lane in segment 1?
//!     Advance    → dwell elapsed  and  free lane in target segment?
//!     Circulate  → dwell elapsed?
//!     first match: apply it, remove it, signal its waiter, stop.
//! ```
//!
//! One grant per cycle keeps every decision based on fresh state; the woken
//! thread runs the next cycle itself when it resumes.  Requests that do not
//! match keep their place, so older waiters always win over younger ones
//! contending for the same thing.

pub mod builder;
pub mod error;
pub mod monitor;
pub mod observer;
pub mod request;
pub mod snapshot;
mod state;


pub use builder::RoadMonitorBuilder;
pub use error::{RoadError, RoadResult};
pub use monitor::RoadMonitor;
pub use observer::{EventLog, MonitorEvent, MonitorObserver, NoopObserver};
pub use request::RequestKind;
pub use snapshot::RoadSnapshot;

pub use rm_occupancy::CarState;
