//! `rm-core` — foundational types for the `road_monitor` workspace.
//!
//! This crate is a dependency of every other `rm-*` crate.  It has no `rm-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CarId`, `Ticket`                                     |
//! | [`position`]    | `Position`, `RoadConfig`                              |
//! | [`time`]        | `Tick`                                                |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod position;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{CarId, Ticket};
pub use position::{MAX_CELLS, Position, RoadConfig};
pub use time::Tick;
