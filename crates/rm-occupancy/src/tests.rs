//! Unit tests for rm-occupancy.

use rm_core::{CarId, Position, RoadConfig};

use crate::{CarRegistry, CarState, OccupancyGrid};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grid(segments: u32, lanes: u32) -> OccupancyGrid {
    OccupancyGrid::new(RoadConfig::new(segments, lanes).unwrap()).unwrap()
}

fn car(name: &str) -> CarId {
    CarId::from(name)
}

// ── OccupancyGrid ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod occupancy_grid {
    use super::*;

    #[test]
    fn empty_grid_offers_lane_one() {
        let g = grid(3, 2);
        for seg in 1..=3 {
            assert_eq!(g.free_lane(seg), Some(1));
            assert_eq!(g.occupied_in(seg), 0);
        }
    }

    #[test]
    fn free_lane_scans_in_increasing_order() {
        let mut g = grid(1, 3);
        g.place(Position::new(1, 1), car("A"));
        assert_eq!(g.free_lane(1), Some(2));
        g.place(Position::new(1, 2), car("B"));
        assert_eq!(g.free_lane(1), Some(3));
        // A gap below an occupied lane is found first.
        g.clear(Position::new(1, 1));
        assert_eq!(g.free_lane(1), Some(1));
    }

    #[test]
    fn full_segment_has_no_free_lane() {
        let mut g = grid(2, 2);
        g.place(Position::new(2, 1), car("A"));
        g.place(Position::new(2, 2), car("B"));
        assert_eq!(g.free_lane(2), None);
        assert_eq!(g.free_lane(1), Some(1));
        assert_eq!(g.occupied_in(2), 2);
    }

    #[test]
    fn out_of_range_segment_is_never_free() {
        let g = grid(2, 2);
        assert_eq!(g.free_lane(0), None);
        assert_eq!(g.free_lane(3), None);
        assert_eq!(g.occupied_in(3), 0);
    }

    #[test]
    fn clear_returns_occupant() {
        let mut g = grid(2, 1);
        g.place(Position::new(2, 1), car("A"));
        assert_eq!(g.occupant(Position::new(2, 1)), Some(&car("A")));
        assert_eq!(g.clear(Position::new(2, 1)), Some(car("A")));
        assert_eq!(g.occupant(Position::new(2, 1)), None);
        assert_eq!(g.clear(Position::new(2, 1)), None);
    }

    #[test]
    fn iter_occupied_reports_positions() {
        let mut g = grid(3, 2);
        g.place(Position::new(3, 2), car("B"));
        g.place(Position::new(1, 1), car("A"));
        let cells: Vec<(Position, CarId)> =
            g.iter_occupied().map(|(p, c)| (p, c.clone())).collect();
        assert_eq!(
            cells,
            vec![(Position::new(1, 1), car("A")), (Position::new(3, 2), car("B"))]
        );
    }
}

// ── CarRegistry ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod car_registry {
    use super::*;

    #[test]
    fn put_get_remove() {
        let mut r = CarRegistry::new();
        assert!(r.is_empty());
        let state = CarState::new(Position::new(1, 1), 3);
        assert_eq!(r.put(car("A"), state), None);
        assert_eq!(r.get(&car("A")), Some(&state));
        assert!(r.contains(&car("A")));
        assert_eq!(r.len(), 1);
        assert_eq!(r.remove(&car("A")), Some(state));
        assert!(r.get(&car("A")).is_none());
    }

    #[test]
    fn put_overwrites() {
        let mut r = CarRegistry::new();
        r.put(car("A"), CarState::new(Position::new(1, 1), 3));
        let old = r.put(car("A"), CarState::new(Position::new(2, 1), 5));
        assert_eq!(old.map(|s| s.position), Some(Position::new(1, 1)));
        assert_eq!(r.get(&car("A")).unwrap().remaining_ticks, 5);
    }

    #[test]
    fn tick_all_saturates_at_zero() {
        let mut r = CarRegistry::new();
        r.put(car("A"), CarState::new(Position::new(1, 1), 2));
        r.put(car("B"), CarState::new(Position::new(1, 2), 0));
        r.tick_all();
        assert_eq!(r.get(&car("A")).unwrap().remaining_ticks, 1);
        assert_eq!(r.get(&car("B")).unwrap().remaining_ticks, 0);
        r.tick_all();
        r.tick_all();
        assert!(r.get(&car("A")).unwrap().dwell_elapsed());
        assert!(r.get(&car("B")).unwrap().dwell_elapsed());
    }
}
