//! The `OccupancyGrid` — a dense table of lane cells.

use rm_core::{CarId, CoreError, CoreResult, Position, RoadConfig};

/// `segments × lanes` cells, stored row-major by segment.
///
/// A cell holds at most one car.  Keeping a car in at most one cell is the
/// caller's job: `place` and `clear` do not search for other copies.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    lanes: u32,
    cells: Vec<Option<CarId>>,
}

impl OccupancyGrid {
    /// An empty grid shaped like `config`.  Fails if the table cannot be
    /// allocated.
    pub fn new(config: RoadConfig) -> CoreResult<Self> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(config.capacity()).map_err(|e| {
            CoreError::Config(format!(
                "cannot allocate a road of {} segments x {} lanes: {e}",
                config.segments, config.lanes
            ))
        })?;
        cells.resize(config.capacity(), None);
        Ok(Self { lanes: config.lanes, cells })
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.segment >= 1 && pos.lane >= 1 && pos.lane <= self.lanes);
        (pos.segment - 1) as usize * self.lanes as usize + (pos.lane - 1) as usize
    }

    /// The cells of `segment`, lane 1 first.  Empty for out-of-range segments.
    fn row(&self, segment: u32) -> &[Option<CarId>] {
        let lanes = self.lanes as usize;
        let start = (segment as usize).wrapping_sub(1).saturating_mul(lanes);
        self.cells.get(start..start.saturating_add(lanes)).unwrap_or(&[])
    }

    /// First unoccupied lane of `segment` in increasing lane order, or `None`
    /// if every lane is taken.  O(lanes).
    pub fn free_lane(&self, segment: u32) -> Option<u32> {
        self.row(segment)
            .iter()
            .position(Option::is_none)
            .map(|i| i as u32 + 1)
    }

    /// Put `car` into `pos`.  The cell must be free.
    pub fn place(&mut self, pos: Position, car: CarId) {
        let i = self.index(pos);
        debug_assert!(self.cells[i].is_none(), "cell {pos} already occupied");
        self.cells[i] = Some(car);
    }

    /// Empty `pos`, returning whoever was there.
    pub fn clear(&mut self, pos: Position) -> Option<CarId> {
        let i = self.index(pos);
        self.cells[i].take()
    }

    pub fn occupant(&self, pos: Position) -> Option<&CarId> {
        self.cells.get(self.index(pos))?.as_ref()
    }

    /// Number of occupied lanes in `segment`.
    pub fn occupied_in(&self, segment: u32) -> usize {
        self.row(segment).iter().filter(|c| c.is_some()).count()
    }

    /// Every occupied cell as `(position, car)`, in segment-then-lane order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (Position, &CarId)> + '_ {
        let lanes = self.lanes as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let car = cell.as_ref()?;
            let pos = Position::new((i / lanes) as u32 + 1, (i % lanes) as u32 + 1);
            Some((pos, car))
        })
    }
}
