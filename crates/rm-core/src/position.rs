//! Road geometry: where a car is, and how big the road is.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Position ──────────────────────────────────────────────────────────────────

/// A `(segment, lane)` cell on the road.  Both coordinates are 1-based.
///
/// Positions handed back to callers are snapshots: the monitor never keeps a
/// reference to a returned value, so later moves do not affect it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub segment: u32,
    pub lane:    u32,
}

impl Position {
    #[inline]
    pub const fn new(segment: u32, lane: u32) -> Self {
        Self { segment, lane }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.segment, self.lane)
    }
}

// ── RoadConfig ────────────────────────────────────────────────────────────────

/// Largest road, in cells, a monitor will allocate.  The occupancy table is
/// dense, so this bounds its memory up front.
pub const MAX_CELLS: usize = 1 << 24;

/// Shape of the road, fixed for the monitor's lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadConfig {
    /// Number of segments, indexed `1..=segments`.  Must be at least 1.
    pub segments: u32,
    /// Parallel lanes per segment, indexed `1..=lanes`.  Must be at least 1.
    pub lanes: u32,
}

impl RoadConfig {
    /// Build and validate a config.
    pub fn new(segments: u32, lanes: u32) -> CoreResult<Self> {
        let config = Self { segments, lanes };
        config.validate()?;
        Ok(config)
    }

    /// Reject empty roads and roads above [`MAX_CELLS`].  Called again by the monitor builder, since the
    /// fields are public and a config may arrive through deserialization.
    pub fn validate(&self) -> CoreResult<()> {
        if self.segments == 0 {
            return Err(CoreError::Config("road must have at least one segment".into()));
        }
        if self.lanes == 0 {
            return Err(CoreError::Config("road must have at least one lane".into()));
        }
        if self.capacity() > MAX_CELLS {
            return Err(CoreError::Config(format!(
                "road of {} segments x {} lanes exceeds {MAX_CELLS} cells",
                self.segments, self.lanes
            )));
        }
        Ok(())
    }

    /// Total number of cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        (self.segments as usize).saturating_mul(self.lanes as usize)
    }

    #[inline]
    pub fn is_last_segment(&self, segment: u32) -> bool {
        segment >= self.segments
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.segments).contains(&pos.segment) && (1..=self.lanes).contains(&pos.lane)
    }
}
