//! Fluent builder for constructing a [`RoadMonitor`].

use rm_core::RoadConfig;

use crate::{MonitorObserver, NoopObserver, RoadMonitor, RoadResult};

/// Fluent builder for [`RoadMonitor`].
///
/// | Method          | Default          |
/// |-----------------|------------------|
/// | `.observer(o)`  | [`NoopObserver`] |
///
/// ```rust,ignore
/// let log = EventLog::new();
/// let road = RoadMonitor::builder(3, 2).observer(log.clone()).build()?;
/// ```
pub struct RoadMonitorBuilder {
    config:   RoadConfig,
    observer: Option<Box<dyn MonitorObserver>>,
}

impl RoadMonitorBuilder {
    pub fn new(segments: u32, lanes: u32) -> Self {
        Self::from_config(RoadConfig { segments, lanes })
    }

    pub fn from_config(config: RoadConfig) -> Self {
        Self { config, observer: None }
    }

    /// Receive state-change callbacks.  Replaces any earlier observer.
    pub fn observer<O: MonitorObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Validate the road shape, allocate it, and return a ready monitor.
    pub fn build(self) -> RoadResult<RoadMonitor> {
        self.config.validate()?;
        let observer = self.observer.unwrap_or_else(|| Box::new(NoopObserver));
        RoadMonitor::from_parts(self.config, observer)
    }
}
