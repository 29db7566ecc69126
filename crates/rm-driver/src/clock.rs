//! The clock driver: one thread calling `tick()` until told to stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rm_monitor::RoadMonitor;
use tracing::debug;

use crate::{DriverError, DriverResult};

/// Background clock.  Dropping it stops and joins the thread.
pub struct ClockDriver {
    stop:   Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl ClockDriver {
    /// Start ticking `road` every `interval`.  A zero interval yields between
    /// ticks instead of sleeping.
    pub fn start(road: Arc<RoadMonitor>, interval: Duration) -> DriverResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("road-clock".into())
            .spawn(move || {
                let mut issued = 0u64;
                while !flag.load(Ordering::Acquire) {
                    road.tick();
                    issued += 1;
                    if interval.is_zero() {
                        thread::yield_now();
                    } else {
                        thread::sleep(interval);
                    }
                }
                issued
            })?;
        debug!(?interval, "clock started");
        Ok(Self { stop, handle: Some(handle) })
    }

    /// Stop the clock and return how many ticks it issued.
    pub fn stop(mut self) -> DriverResult<u64> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> DriverResult<u64> {
        self.stop.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return Ok(0);
        };
        let issued = handle
            .join()
            .map_err(|_| DriverError::Panicked { what: "clock".into() })?;
        debug!(issued, "clock stopped");
        Ok(issued)
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
