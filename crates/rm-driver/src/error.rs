//! Error type for the traffic driver.

use rm_core::{CarId, CoreError};
use rm_monitor::RoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Road(#[from] RoadError),

    #[error("driver configuration error: {0}")]
    Config(String),

    #[error("car {0} has an empty plan")]
    EmptyPlan(CarId),

    #[error("{what} thread panicked")]
    Panicked { what: String },

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<CoreError> for DriverError {
    fn from(e: CoreError) -> Self {
        DriverError::Road(e.into())
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
