//! Sparse hash grid for radius queries against dynamic actors

use ahash::AHashMap;

use crate::core::types::Vec2;

/// Buckets actor slot indices by cell
///
/// Rebuilt every combat tick; stores indices into the caller's target slice
/// rather than ids so lookups need no second map.
#[derive(Debug, Clone)]
pub struct ActorGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<usize>>,
}

impl ActorGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, slot: usize, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(slot);
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, entries: impl Iterator<Item = (usize, Vec2)>) {
        self.clear();
        for (slot, pos) in entries {
            self.insert(slot, pos);
        }
    }

    /// Candidate slots whose cell touches the circle's bounding box
    ///
    /// Callers still run the exact distance test; this only prunes.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let (min_x, min_y) = self.cell_coord(Vec2::new(center.x - radius, center.y - radius));
        let (max_x, max_y) = self.cell_coord(Vec2::new(center.x + radius, center.y + radius));

        let span = (max_x as i64 - min_x as i64 + 1) * (max_y as i64 - min_y as i64 + 1);
        if span > self.cells.len() as i64 * 4 {
            // Query box dwarfs the occupied cells; scanning them is cheaper
            let mut found: Vec<usize> = self.cells.values().flatten().copied().collect();
            found.sort_unstable();
            return found;
        }

        let mut found = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(cell);
                }
            }
        }
        found.sort_unstable();
        found
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
