//! Tests for rm-driver.

use std::sync::Arc;
use std::time::Duration;

use rm_core::{CarId, Position, RoadConfig};
use rm_monitor::{RoadError, RoadMonitor};

use crate::{
    CarPlan, CarRng, ClockDriver, DriverConfig, DriverError, PeakOccupancy, drive_car, run_fleet,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(segments: u32, lanes: u32, cars: usize) -> DriverConfig {
    DriverConfig {
        road:          RoadConfig::new(segments, lanes).unwrap(),
        cars,
        seed:          42,
        min_dwell:     1,
        max_dwell:     3,
        tick_interval: Duration::from_micros(100),
    }
}

fn road(segments: u32, lanes: u32) -> Arc<RoadMonitor> {
    Arc::new(RoadMonitor::new(RoadConfig::new(segments, lanes).unwrap()).unwrap())
}

// ── CarRng ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod car_rng {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = CarRng::new(7, 3);
        let mut b = CarRng::new(7, 3);
        let xs: Vec<u32> = (0..16).map(|_| a.dwell(1, 100)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.dwell(1, 100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_cars_diverge() {
        let mut a = CarRng::new(7, 0);
        let mut b = CarRng::new(7, 1);
        let xs: Vec<u32> = (0..16).map(|_| a.dwell(1, 1_000)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.dwell(1, 1_000)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn dwell_stays_in_range_and_positive() {
        let mut rng = CarRng::new(1, 1);
        for _ in 0..200 {
            let d = rng.dwell(2, 5);
            assert!((2..=5).contains(&d));
        }
        // A zero lower bound is lifted to one.
        for _ in 0..50 {
            assert!(rng.dwell(0, 0) >= 1);
        }
    }
}

// ── CarPlan / drive_car ───────────────────────────────────────────────────────

#[cfg(test)]
mod driving {
    use super::*;

    #[test]
    fn random_plan_has_one_dwell_per_segment() {
        let mut rng = CarRng::new(42, 0);
        let plan = CarPlan::random("A", 4, &mut rng, 1, 3);
        assert_eq!(plan.car, CarId::from("A"));
        assert_eq!(plan.dwells.len(), 4);
        assert!(plan.dwells.iter().all(|d| (1..=3).contains(d)));
    }

    #[test]
    fn single_car_visits_every_segment() {
        let road = road(3, 2);
        let clock = ClockDriver::start(Arc::clone(&road), Duration::from_micros(100)).unwrap();

        let trip = drive_car(&road, &CarPlan::new("A", vec![2, 1, 3])).unwrap();
        assert_eq!(
            trip.visited,
            vec![Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)]
        );
        assert_eq!(road.active_cars(), 0);

        let ticks = clock.stop().unwrap();
        assert!(ticks >= 6, "only {ticks} ticks for a 6-tick trip");
    }

    #[test]
    fn empty_plan_is_rejected() {
        let road = road(2, 1);
        let err = drive_car(&road, &CarPlan::new("A", vec![])).unwrap_err();
        assert!(matches!(err, DriverError::EmptyPlan(car) if car == CarId::from("A")));
    }

    #[test]
    fn failed_trip_leaves_the_road_clear() {
        let road = road(2, 1);
        let _clock = ClockDriver::start(Arc::clone(&road), Duration::from_micros(100)).unwrap();

        let err = drive_car(&road, &CarPlan::new("A", vec![1, 0])).unwrap_err();
        assert!(matches!(err, DriverError::Road(RoadError::InvalidDwell { .. })));
        assert_eq!(road.position_of("A"), None);
        assert_eq!(road.active_cars(), 0);
    }

    #[test]
    fn too_long_plan_overruns_the_road() {
        let road = road(1, 1);
        let _clock = ClockDriver::start(Arc::clone(&road), Duration::from_micros(100)).unwrap();

        let err = drive_car(&road, &CarPlan::new("A", vec![1, 1])).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Road(RoadError::BoundaryOverrun { segment: 1, .. })
        ));
        assert_eq!(road.active_cars(), 0);
    }
}

// ── ClockDriver ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock_driver {
    use super::*;

    #[test]
    fn stop_reports_issued_ticks() {
        let road = road(1, 1);
        let clock = ClockDriver::start(Arc::clone(&road), Duration::ZERO).unwrap();
        while road.now().0 < 10 {
            std::thread::yield_now();
        }
        let issued = clock.stop().unwrap();
        assert!(issued >= 10);
        assert_eq!(road.now().0, issued);
    }

    #[test]
    fn drop_stops_the_thread() {
        let road = road(1, 1);
        {
            let _clock = ClockDriver::start(Arc::clone(&road), Duration::ZERO).unwrap();
            while road.now().0 < 3 {
                std::thread::yield_now();
            }
        }
        let after_drop = road.now();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(road.now(), after_drop);
    }
}

// ── run_fleet ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet {
    use super::*;
    use rm_monitor::MonitorObserver;

    #[test]
    fn config_validation() {
        let mut cfg = config(2, 1, 1);
        cfg.min_dwell = 0;
        assert!(matches!(cfg.validate(), Err(DriverError::Config(_))));

        let mut cfg = config(2, 1, 1);
        cfg.min_dwell = 4;
        cfg.max_dwell = 2;
        assert!(matches!(cfg.validate(), Err(DriverError::Config(_))));

        let mut cfg = config(2, 1, 1);
        cfg.road.lanes = 0;
        assert!(matches!(cfg.validate(), Err(DriverError::Road(RoadError::Config(_)))));
    }

    #[test]
    fn plans_are_deterministic() {
        let cfg = config(4, 2, 5);
        assert_eq!(cfg.plans(), cfg.plans());
        assert_eq!(cfg.plans()[3].car, CarId::from("car-3"));
    }

    #[test]
    fn every_car_completes_and_capacity_holds() {
        let cfg = config(4, 2, 10);
        let report = run_fleet(&cfg).unwrap();

        assert_eq!(report.trips.len(), 10);
        for trip in &report.trips {
            let segments: Vec<u32> = trip.visited.iter().map(|p| p.segment).collect();
            assert_eq!(segments, vec![1, 2, 3, 4]);
            assert!(trip.visited.iter().all(|p| p.lane <= 2));
        }
        assert_eq!(report.peak_per_segment.len(), 4);
        assert!(report.peak_per_segment.iter().all(|&n| (1..=2).contains(&n)));
        assert!(report.ticks > 0);
    }

    #[test]
    fn peak_occupancy_tracks_moves() {
        let mut peaks = PeakOccupancy::new(2);
        peaks.on_enter(&CarId::from("A"), Position::new(1, 1));
        peaks.on_enter(&CarId::from("B"), Position::new(1, 2));
        peaks.on_advance(&CarId::from("A"), Position::new(1, 1), Position::new(2, 1));
        peaks.on_exit(&CarId::from("A"), Position::new(2, 1));
        peaks.on_advance(&CarId::from("B"), Position::new(1, 2), Position::new(2, 1));
        assert_eq!(peaks.peaks(), vec![2, 1]);
    }
}
