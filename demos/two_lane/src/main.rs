//! two_lane — smallest runnable demo for the road_monitor workspace.
//!
//! Drives 8 cars over a 4-segment, 2-lane road with a background clock, then
//! prints every car's trip and the peak occupancy of each segment.  Set
//! `RUST_LOG=debug` to watch blocks and grants as they happen.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rm_core::RoadConfig;
use rm_driver::{DriverConfig, run_fleet};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEGMENTS:      u32      = 4;
const LANES:         u32      = 2;
const CARS:          usize    = 8;
const SEED:          u64      = 42;
const MIN_DWELL:     u32      = 1;
const MAX_DWELL:     u32      = 4;
const TICK_INTERVAL: Duration = Duration::from_millis(2);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    let config = DriverConfig {
        road:          RoadConfig::new(SEGMENTS, LANES)?,
        cars:          CARS,
        seed:          SEED,
        min_dwell:     MIN_DWELL,
        max_dwell:     MAX_DWELL,
        tick_interval: TICK_INTERVAL,
    };

    println!("=== two_lane ===");
    println!("Road:  {SEGMENTS} segments x {LANES} lanes");
    println!("Cars:  {CARS}  (dwell {MIN_DWELL}..={MAX_DWELL} ticks, seed {SEED})");
    for plan in config.plans() {
        println!("  {:<6} dwells {:?}", plan.car, plan.dwells);
    }
    println!();

    let t0 = Instant::now();
    let report = run_fleet(&config)?;
    let elapsed = t0.elapsed();
    info!(ticks = report.ticks, ?elapsed, "run complete");

    for trip in &report.trips {
        let path: Vec<String> = trip.visited.iter().map(ToString::to_string).collect();
        println!("  {:<6} {}", trip.car, path.join(" -> "));
    }
    println!();
    println!("Ticks issued:    {}", report.ticks);
    println!("Peak per segment: {:?}", report.peak_per_segment);
    println!("Wall time:        {:.1} ms", elapsed.as_secs_f64() * 1_000.0);
    Ok(())
}
