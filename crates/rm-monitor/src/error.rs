//! Error type for monitor operations.

use rm_core::{CarId, CoreError};
use thiserror::Error;

/// Everything a monitor call can report.  All variants except `Withdrawn` are
/// detected before the call mutates state or blocks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoadError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("car {car} requested a dwell of zero ticks")]
    InvalidDwell { car: CarId },

    #[error("car {0} is not on the road")]
    UnknownCar(CarId),

    #[error("car {0} is already on the road")]
    AlreadyActive(CarId),

    #[error("car {0} already has a blocked call pending")]
    AlreadyWaiting(CarId),

    #[error("car {car} is in the last segment ({segment}) and cannot advance")]
    BoundaryOverrun { car: CarId, segment: u32 },

    #[error("car {0} exited while one of its calls was blocked")]
    Withdrawn(CarId),
}

pub type RoadResult<T> = Result<T, RoadError>;
