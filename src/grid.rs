// src/grid.rs
//! The discrete solver's integer grid: a fixed `width x height` buffer of
//! classified cells, built from a boundary polygon's bounding box.

use crate::geometry::{Polygon, Vec2};

pub const CELL_EMPTY: i32 = 0;
pub const CELL_CORRIDOR: i32 = -1;
pub const CELL_OUT_OF_BOUNDS: i32 = -2;

/// Row-major integer grid. Dimensions are fixed for the buffer's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBuffer {
    width: i32,
    height: i32,
    cells: Vec<i32>,
}

impl GridBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![CELL_EMPTY; size],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Returns `-2` for any out-of-range coordinate.
    pub fn get(&self, x: i32, y: i32) -> i32 {
        if self.in_range(x, y) {
            self.cells[self.index(x, y)]
        } else {
            CELL_OUT_OF_BOUNDS
        }
    }

    /// Silently ignores out-of-range coordinates.
    pub fn set(&mut self, x: i32, y: i32, value: i32) {
        if self.in_range(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = value;
        }
    }

    /// Resets every cell to `0`, preserving dimensions.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = CELL_EMPTY);
    }

    /// Marks every cell whose center lies outside `boundary` as `-2`.
    pub fn rasterize_polygon(&mut self, boundary: &Polygon) {
        for y in 0..self.height {
            for x in 0..self.width {
                let center = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if !boundary.contains_point(&center) {
                    self.set(x, y, CELL_OUT_OF_BOUNDS);
                }
            }
        }
    }

    /// The 4-connected neighbor coordinates of `(x, y)`.
    pub fn neighbors_4(x: i32, y: i32) -> [(i32, i32); 4] {
        [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
    }

    /// Counts occupied cells (`>0` or `-1`) among `(x, y)`'s 4-neighbors.
    /// Empty (`0`) and out-of-bounds (`-2`) neighbors never count.
    pub fn occupied_neighbor_count(&self, x: i32, y: i32) -> usize {
        Self::neighbors_4(x, y)
            .iter()
            .filter(|&&(nx, ny)| {
                let v = self.get(nx, ny);
                v == CELL_CORRIDOR || v >= 1
            })
            .count()
    }

    /// True if any 4-neighbor of `(x, y)` is a corridor cell.
    pub fn has_corridor_neighbor(&self, x: i32, y: i32) -> bool {
        Self::neighbors_4(x, y)
            .iter()
            .any(|&(nx, ny)| self.get(nx, ny) == CELL_CORRIDOR)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &v)| ((idx as i32) % width, (idx as i32) / width, v))
    }

    pub fn count_value(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_empty() {
        let g = GridBuffer::new(5, 4);
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 4);
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(g.get(x, y), CELL_EMPTY);
            }
        }
    }

    #[test]
    fn out_of_range_reads_oob_and_writes_are_noop() {
        let mut g = GridBuffer::new(3, 3);
        assert_eq!(g.get(-1, 0), CELL_OUT_OF_BOUNDS);
        assert_eq!(g.get(3, 0), CELL_OUT_OF_BOUNDS);
        assert_eq!(g.get(0, 3), CELL_OUT_OF_BOUNDS);
        g.set(-1, 0, 7);
        g.set(3, 3, 7);
        assert_eq!(g.get(-1, 0), CELL_OUT_OF_BOUNDS);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut g = GridBuffer::new(4, 4);
        g.set(2, 1, 3);
        assert_eq!(g.get(2, 1), 3);
    }

    #[test]
    fn rasterize_then_clear_restores_all_zero() {
        let boundary = Polygon::create_rectangle(0.0, 0.0, 4.0, 4.0);
        let mut g = GridBuffer::new(8, 8);
        g.rasterize_polygon(&boundary);
        assert!(g.count_value(CELL_OUT_OF_BOUNDS) > 0);
        g.clear();
        assert_eq!(g.count_value(CELL_OUT_OF_BOUNDS), 0);
        assert_eq!(g.count_value(CELL_EMPTY), 64);
    }

    #[test]
    fn rasterize_marks_outside_cells_only() {
        let boundary = Polygon::create_rectangle(0.0, 0.0, 4.0, 4.0);
        let mut g = GridBuffer::new(8, 8);
        g.rasterize_polygon(&boundary);
        // cell (1,1) center (1.5,1.5) is inside the 4x4 box.
        assert_eq!(g.get(1, 1), CELL_EMPTY);
        // cell (6,6) center (6.5,6.5) is outside.
        assert_eq!(g.get(6, 6), CELL_OUT_OF_BOUNDS);
    }

    #[test]
    fn rasterize_l_shape_excludes_notch() {
        let boundary = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(50.0, 20.0),
            Vec2::new(30.0, 20.0),
            Vec2::new(30.0, 40.0),
            Vec2::new(0.0, 40.0),
        ]);
        let mut g = GridBuffer::new(50, 40);
        g.rasterize_polygon(&boundary);
        for y in 20..40 {
            for x in 30..50 {
                assert_eq!(g.get(x, y), CELL_OUT_OF_BOUNDS, "({x},{y}) should be OOB");
            }
        }
        // a cell well inside the remaining L.
        assert_eq!(g.get(10, 10), CELL_EMPTY);
    }

    #[test]
    fn occupied_neighbor_count_ignores_empty_and_oob() {
        let mut g = GridBuffer::new(5, 5);
        g.set(2, 1, CELL_CORRIDOR);
        g.set(1, 2, 1);
        assert_eq!(g.occupied_neighbor_count(2, 2), 2);
        assert_eq!(g.occupied_neighbor_count(0, 0), 0);
    }
}
