// src/discrete/placed_room.rs

use crate::room::CorridorRule;

/// A room stamped onto the discrete grid, in cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRoom {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// 1-based index into the original room request list; matches the
    /// value stamped into the grid's core cells.
    pub room_index: usize,
    pub corridor_rule: CorridorRule,
}

impl PlacedRoom {
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// The core cells this room occupies, row-major within its rectangle.
    pub fn core_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        (0..h).flat_map(move |dy| (0..w).map(move |dx| (x + dx, y + dy)))
    }

    /// The footprint cells claimed beyond the core rectangle, per the
    /// room's corridor rule.
    pub fn footprint_cells(&self) -> Vec<(i32, i32)> {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        match self.corridor_rule {
            CorridorRule::None => Vec::new(),
            CorridorRule::OneSide => (0..w).map(|dx| (x + dx, y + h)).collect(),
            CorridorRule::TwoSides => {
                let mut cells: Vec<(i32, i32)> = (0..=w).map(|dx| (x + dx, y + h)).collect();
                cells.extend((0..h).map(|dy| (x + w, y + dy)));
                cells
            }
            CorridorRule::AllSides => {
                let mut cells = Vec::with_capacity(2 * (w + h) as usize + 4);
                for dx in -1..=w {
                    cells.push((x + dx, y - 1));
                    cells.push((x + dx, y + h));
                }
                for dy in 0..h {
                    cells.push((x - 1, y + dy));
                    cells.push((x + w, y + dy));
                }
                cells
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(rule: CorridorRule) -> PlacedRoom {
        PlacedRoom {
            id: "r".into(),
            x: 2,
            y: 3,
            width: 3,
            height: 2,
            room_index: 1,
            corridor_rule: rule,
        }
    }

    #[test]
    fn none_has_no_footprint() {
        assert!(room(CorridorRule::None).footprint_cells().is_empty());
    }

    #[test]
    fn one_side_is_bottom_row() {
        let cells = room(CorridorRule::OneSide).footprint_cells();
        assert_eq!(cells, vec![(2, 5), (3, 5), (4, 5)]);
    }

    #[test]
    fn two_sides_is_l_shape() {
        let cells = room(CorridorRule::TwoSides).footprint_cells();
        assert_eq!(cells.len(), 4 + 2);
        assert!(cells.contains(&(2, 5)));
        assert!(cells.contains(&(5, 5)));
        assert!(cells.contains(&(5, 3)));
        assert!(cells.contains(&(5, 4)));
    }

    #[test]
    fn all_sides_is_full_halo() {
        let cells = room(CorridorRule::AllSides).footprint_cells();
        // top row (y=2): x in -1..=3 -> 5 cells; bottom row (y=5): 5 cells;
        // left/right columns for dy in 0..2 -> 2+2 cells.
        assert_eq!(cells.len(), 5 + 5 + 2 + 2);
        assert!(cells.contains(&(1, 2)));
        assert!(cells.contains(&(5, 5)));
    }

    #[test]
    fn core_cells_match_rectangle() {
        let r = room(CorridorRule::None);
        let cells: Vec<_> = r.core_cells().collect();
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&(2, 3)));
        assert!(cells.contains(&(4, 4)));
    }
}
