// src/discrete/solver.rs
//! The discrete topological solver: greedy-plus-mutation placement on an
//! integer grid, with a "magnetizing" corridor network.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace, warn};

use crate::error::Result;
use crate::geometry::{Polygon, Vec2};
use crate::grid::{GridBuffer, CELL_CORRIDOR, CELL_EMPTY};
use crate::room::{Adjacency, CorridorRule, RoomRequest};
use crate::rng::SeededRng;
use crate::validate::validate_inputs;

use super::config::DiscreteConfig;
use super::placed_room::PlacedRoom;

/// Lifecycle state of the grid, advanced monotonically by `solve()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Init,
    GreedyDone,
    Refining,
    Pruned,
    Validated,
}

pub struct DiscreteSolver {
    rooms: Vec<RoomRequest>,
    adjacencies: Vec<Adjacency>,
    config: DiscreteConfig,
    rng: SeededRng,

    grid: GridBuffer,
    placed: HashMap<String, PlacedRoom>,
    start_cell: (i32, i32),
    grid_resolution: f64,

    state: GridState,
    connected: bool,
}

impl DiscreteSolver {
    pub fn new(
        boundary: Vec<Vec2>,
        rooms: Vec<RoomRequest>,
        adjacencies: Vec<Adjacency>,
        config: DiscreteConfig,
        seed: u32,
    ) -> Result<Self> {
        validate_inputs(&boundary, &rooms, &adjacencies)?;

        let boundary_poly = Polygon::new(boundary);
        let bbox = boundary_poly.aabb();
        let res = config.grid_resolution;

        let width = ((bbox.width() / res).ceil() as i32).max(1);
        let height = ((bbox.height() / res).ceil() as i32).max(1);

        let grid_points: Vec<Vec2> = boundary_poly
            .points
            .iter()
            .map(|p| Vec2::new((p.x - bbox.min_x) / res, (p.y - bbox.min_y) / res))
            .collect();
        let grid_boundary = Polygon::new(grid_points);

        let mut grid = GridBuffer::new(width, height);
        grid.rasterize_polygon(&grid_boundary);

        let start_cell = match config.start_point {
            Some(p) => (
                (((p.x - bbox.min_x) / res).floor() as i32).clamp(0, width - 1),
                (((p.y - bbox.min_y) / res).floor() as i32).clamp(0, height - 1),
            ),
            None => (width / 2, height / 2),
        };
        grid.set(start_cell.0, start_cell.1, CELL_CORRIDOR);

        debug!(
            "discrete solver initialized: {}x{} grid, start=({}, {})",
            width, height, start_cell.0, start_cell.1
        );

        Ok(Self {
            rooms,
            adjacencies,
            config,
            rng: SeededRng::new(seed),
            grid,
            placed: HashMap::new(),
            start_cell,
            grid_resolution: res,
            state: GridState::Init,
            connected: false,
        })
    }

    pub fn get_grid(&self) -> &GridBuffer {
        &self.grid
    }

    pub fn get_placed_rooms(&self) -> &HashMap<String, PlacedRoom> {
        &self.placed
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Runs the full discrete algorithm to completion: greedy placement,
    /// evolutionary refinement, dead-end pruning, connectivity validation.
    pub fn solve(&mut self) {
        self.greedy_initial_placement();
        self.state = GridState::GreedyDone;

        self.evolutionary_refine();
        self.state = GridState::Refining;

        self.prune_dead_ends();
        self.state = GridState::Pruned;

        self.connected = self.validate_connectivity();
        self.state = GridState::Validated;

        debug!(
            "solve() complete: {}/{} rooms placed, connected={}",
            self.placed.len(),
            self.rooms.len(),
            self.connected
        );
    }

    fn degree_sorted_indices(&self) -> Vec<usize> {
        let mut degree = vec![0u32; self.rooms.len()];
        for (i, room) in self.rooms.iter().enumerate() {
            for adj in &self.adjacencies {
                if adj.touches(&room.id) {
                    degree[i] += 1;
                }
            }
        }
        let mut indices: Vec<usize> = (0..self.rooms.len()).collect();
        indices.sort_by(|&a, &b| degree[b].cmp(&degree[a]));
        indices
    }

    fn greedy_initial_placement(&mut self) {
        for idx in self.degree_sorted_indices() {
            let room = self.rooms[idx].clone();
            if let Some((x, y, w, h)) = self.find_best_placement(&room) {
                self.stamp_room(&room, idx, x, y, w, h);
            } else {
                trace!("greedy: no placement found for room `{}`", room.id);
            }
        }
    }

    fn evolutionary_refine(&mut self) {
        let mut best_score = self.calculate_global_score();
        let mut best_grid = self.grid.clone();
        let mut best_placed = self.placed.clone();

        for round in 0..self.config.max_iterations {
            let snapshot_grid = self.grid.clone();
            let snapshot_placed = self.placed.clone();

            let mut placed_ids: Vec<String> = self.placed.keys().cloned().collect();
            placed_ids.sort();
            self.rng.shuffle(&mut placed_ids);
            let remove_count = ((placed_ids.len() as f64) * self.config.mutation_rate).ceil() as usize;
            for id in placed_ids.into_iter().take(remove_count) {
                self.remove_room(&id);
            }

            for idx in 0..self.rooms.len() {
                let room = self.rooms[idx].clone();
                if self.placed.contains_key(&room.id) {
                    continue;
                }
                if let Some((x, y, w, h)) = self.find_best_placement(&room) {
                    self.stamp_room(&room, idx, x, y, w, h);
                }
            }

            let score = self.calculate_global_score();
            if score > best_score {
                best_score = score;
                best_grid = self.grid.clone();
                best_placed = self.placed.clone();
                trace!("round {round}: improved score to {best_score}");
            } else {
                self.grid = snapshot_grid;
                self.placed = snapshot_placed;
            }
        }

        self.grid = best_grid;
        self.placed = best_placed;
    }

    /// Samples one aspect ratio, scans every legal `(x, y)` row-major, and
    /// returns the highest-scoring valid placement (ties keep the first
    /// encountered).
    fn find_best_placement(&mut self, room: &RoomRequest) -> Option<(i32, i32, i32, i32)> {
        let (lo, hi) = room.ratio_bounds();
        let ratio = self.rng.next_float(lo, hi);
        let area_cells = room.target_area / (self.grid_resolution * self.grid_resolution);

        let w = (area_cells * ratio).sqrt().round().max(1.0) as i32;
        let h = (area_cells / w as f64).round().max(1.0) as i32;

        let width = self.grid.width();
        let height = self.grid.height();

        let mut best: Option<(i32, i32, i32, i32)> = None;
        let mut best_score = f64::NEG_INFINITY;

        if w > width || h > height {
            return None;
        }

        for y in 0..=(height - h) {
            for x in 0..=(width - w) {
                if !self.is_valid_placement(x, y, w, h, room.corridor_rule) {
                    continue;
                }
                let score = self.score_placement(x, y, w, h, room);
                if score > best_score {
                    best_score = score;
                    best = Some((x, y, w, h));
                }
            }
        }

        best
    }

    fn is_valid_placement(&self, x: i32, y: i32, w: i32, h: i32, rule: CorridorRule) -> bool {
        // A core cell is available if it is empty or already a (non-exclusive)
        // corridor cell; a room is free to reclaim the seed/corridor
        // network it grows out of. It must never overlap another room.
        for dy in 0..h {
            for dx in 0..w {
                let v = self.grid.get(x + dx, y + dy);
                if v != CELL_EMPTY && v != CELL_CORRIDOR {
                    return false;
                }
            }
        }

        let footprint = footprint_cells_for(x, y, w, h, rule);
        for &(fx, fy) in &footprint {
            let v = self.grid.get(fx, fy);
            if v != CELL_EMPTY && v != CELL_CORRIDOR {
                return false;
            }
        }

        if rule == CorridorRule::None {
            return true;
        }

        footprint
            .iter()
            .any(|&(fx, fy)| self.grid.has_corridor_neighbor(fx, fy))
    }

    fn score_placement(&self, x: i32, y: i32, w: i32, h: i32, room: &RoomRequest) -> f64 {
        let mut compactness = 0u32;
        for dy in 0..h {
            for dx in 0..w {
                compactness += self.grid.occupied_neighbor_count(x + dx, y + dy) as u32;
            }
        }

        let center = (x as f64 + w as f64 / 2.0, y as f64 + h as f64 / 2.0);
        let mut weighted_dist_sum = 0.0;
        let mut weight_sum = 0.0;
        for adj in &self.adjacencies {
            let partner_id = if adj.a == room.id {
                Some(adj.b.as_str())
            } else if adj.b == room.id {
                Some(adj.a.as_str())
            } else {
                None
            };
            if let Some(pid) = partner_id {
                if let Some(placed) = self.placed.get(pid) {
                    let (pcx, pcy) = placed.center();
                    let dist = ((center.0 - pcx).powi(2) + (center.1 - pcy).powi(2)).sqrt();
                    weighted_dist_sum += adj.weight * dist;
                    weight_sum += adj.weight;
                }
            }
        }
        let mean_distance = if weight_sum > 0.0 {
            weighted_dist_sum / weight_sum
        } else {
            0.0
        };

        self.config.weights.compactness * compactness as f64
            - self.config.weights.adjacency * mean_distance
    }

    fn stamp_room(&mut self, room: &RoomRequest, room_index: usize, x: i32, y: i32, w: i32, h: i32) {
        let one_based = room_index + 1;
        for dy in 0..h {
            for dx in 0..w {
                self.grid.set(x + dx, y + dy, one_based as i32);
            }
        }
        for (fx, fy) in footprint_cells_for(x, y, w, h, room.corridor_rule) {
            self.grid.set(fx, fy, CELL_CORRIDOR);
        }
        self.placed.insert(
            room.id.clone(),
            PlacedRoom {
                id: room.id.clone(),
                x,
                y,
                width: w,
                height: h,
                room_index: one_based,
                corridor_rule: room.corridor_rule,
            },
        );
    }

    fn remove_room(&mut self, id: &str) {
        let Some(placed) = self.placed.remove(id) else {
            return;
        };
        for (cx, cy) in placed.core_cells() {
            self.grid.set(cx, cy, CELL_EMPTY);
        }
        for (fx, fy) in placed.footprint_cells() {
            if self.grid.get(fx, fy) == CELL_CORRIDOR {
                self.grid.set(fx, fy, CELL_EMPTY);
            }
        }
    }

    fn calculate_global_score(&self) -> f64 {
        let mut score = 100.0 * self.placed.len() as f64;
        for adj in &self.adjacencies {
            if let (Some(a), Some(b)) = (self.placed.get(&adj.a), self.placed.get(&adj.b)) {
                let (ax, ay) = a.center();
                let (bx, by) = b.center();
                let dist = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
                score -= adj.weight * dist;
            }
        }
        score
    }

    /// Fixed-point loop: while any corridor cell has at most one
    /// non-empty-non-OOB 4-neighbor, clear it.
    fn prune_dead_ends(&mut self) {
        loop {
            let mut changed = false;
            let dead_ends: Vec<(i32, i32)> = self
                .grid
                .iter_cells()
                .filter(|&(x, y, v)| v == CELL_CORRIDOR && self.grid.occupied_neighbor_count(x, y) <= 1)
                .map(|(x, y, _)| (x, y))
                .collect();
            for (x, y) in dead_ends {
                if self.grid.get(x, y) == CELL_CORRIDOR {
                    self.grid.set(x, y, CELL_EMPTY);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn validate_connectivity(&self) -> bool {
        let total = self.grid.count_value(CELL_CORRIDOR);
        if total == 0 {
            return true;
        }
        if self.grid.get(self.start_cell.0, self.start_cell.1) != CELL_CORRIDOR {
            warn!("connectivity validation: start cell is not a corridor cell");
            return false;
        }

        let mut visited = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.start_cell);
        visited.insert(self.start_cell);

        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in GridBuffer::neighbors_4(x, y) {
                if self.grid.get(nx, ny) == CELL_CORRIDOR && !visited.contains(&(nx, ny)) {
                    visited.insert((nx, ny));
                    queue.push_back((nx, ny));
                }
            }
        }

        visited.len() == total
    }
}

fn footprint_cells_for(x: i32, y: i32, w: i32, h: i32, rule: CorridorRule) -> Vec<(i32, i32)> {
    PlacedRoom {
        id: String::new(),
        x,
        y,
        width: w,
        height: h,
        room_index: 0,
        corridor_rule: rule,
    }
    .footprint_cells()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::CorridorRule;

    fn rect_boundary(w: f64, h: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(w, h),
            Vec2::new(0.0, h),
        ]
    }

    #[test]
    fn scenario_a_minimal_discrete() {
        let boundary = rect_boundary(50.0, 40.0);
        let rooms = vec![
            RoomRequest::new("living", 200.0, 1.5).with_corridor_rule(CorridorRule::TwoSides),
            RoomRequest::new("kitchen", 120.0, 1.2).with_corridor_rule(CorridorRule::OneSide),
            RoomRequest::new("bedroom", 150.0, 1.3).with_corridor_rule(CorridorRule::TwoSides),
            RoomRequest::new("bathroom", 60.0, 1.0).with_corridor_rule(CorridorRule::OneSide),
        ];
        let adjacencies = vec![
            Adjacency::new("living", "kitchen").with_weight(2.0),
            Adjacency::new("kitchen", "bathroom").with_weight(1.5),
            Adjacency::new("bedroom", "bathroom").with_weight(1.0),
        ];
        let mut config = DiscreteConfig::default();
        config.max_iterations = 100;
        config.mutation_rate = 0.3;
        config.start_point = Some(Vec2::new(25.0, 20.0));

        let mut solver = DiscreteSolver::new(boundary, rooms, adjacencies, config, 42).unwrap();
        solver.solve();

        assert_eq!(solver.get_grid().width(), 50);
        assert_eq!(solver.get_grid().height(), 40);
        // How many of the four rooms actually get placed depends on the
        // stochastic mutation rounds; pruning fixpoint and bounds are
        // invariants guaranteed by construction regardless of seed.
        assert!(!solver.get_placed_rooms().is_empty());

        for room in solver.get_placed_rooms().values() {
            assert!(room.x >= 0 && room.y >= 0);
            assert!(room.x + room.width <= solver.get_grid().width());
            assert!(room.y + room.height <= solver.get_grid().height());
        }

        for (x, y, v) in solver.get_grid().iter_cells() {
            if v == CELL_CORRIDOR {
                assert!(solver.get_grid().occupied_neighbor_count(x, y) > 1);
            }
        }
    }

    #[test]
    fn scenario_c_single_room_feasibility() {
        let boundary = rect_boundary(10.0, 10.0);
        let rooms = vec![RoomRequest::new("r", 100.0, 1.0).with_corridor_rule(CorridorRule::None)];
        let mut config = DiscreteConfig::default();
        config.start_point = Some(Vec2::new(5.0, 5.0));

        let mut solver = DiscreteSolver::new(boundary, rooms, vec![], config, 7).unwrap();
        solver.solve();

        let placed = solver.get_placed_rooms();
        assert_eq!(placed.len(), 1);
        let r = &placed["r"];
        assert_eq!(r.width, 10);
        assert_eq!(r.height, 10);
        assert_eq!(solver.get_grid().count_value(CELL_CORRIDOR), 0);
        assert!(solver.is_connected());
    }

    #[test]
    fn scenario_b_l_shape_excludes_notch() {
        let boundary = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(50.0, 20.0),
            Vec2::new(30.0, 20.0),
            Vec2::new(30.0, 40.0),
            Vec2::new(0.0, 40.0),
        ];
        let rooms = vec![
            RoomRequest::new("a", 200.0, 1.2).with_corridor_rule(CorridorRule::OneSide),
            RoomRequest::new("b", 200.0, 1.2).with_corridor_rule(CorridorRule::OneSide),
        ];
        let adjacencies = vec![Adjacency::new("a", "b")];
        let mut config = DiscreteConfig::default();
        config.start_point = Some(Vec2::new(10.0, 10.0));

        let mut solver = DiscreteSolver::new(boundary, rooms, adjacencies, config, 1).unwrap();
        solver.solve();

        for room in solver.get_placed_rooms().values() {
            for (cx, cy) in room.core_cells() {
                assert!(!(cx >= 30 && cy >= 20), "room overlaps excluded notch at ({cx},{cy})");
            }
        }
    }

    #[test]
    fn unplaceable_room_is_simply_absent() {
        let boundary = rect_boundary(5.0, 5.0);
        let rooms = vec![
            RoomRequest::new("huge", 10000.0, 1.0).with_corridor_rule(CorridorRule::None),
        ];
        let mut solver =
            DiscreteSolver::new(boundary, rooms, vec![], DiscreteConfig::default(), 3).unwrap();
        solver.solve();
        assert!(!solver.get_placed_rooms().contains_key("huge"));
    }

    #[test]
    fn determinism_same_seed_same_result() {
        let boundary = rect_boundary(50.0, 40.0);
        let rooms = vec![
            RoomRequest::new("living", 200.0, 1.5).with_corridor_rule(CorridorRule::TwoSides),
            RoomRequest::new("kitchen", 120.0, 1.2).with_corridor_rule(CorridorRule::OneSide),
        ];
        let adjacencies = vec![Adjacency::new("living", "kitchen")];
        let mut s1 = DiscreteSolver::new(
            boundary.clone(),
            rooms.clone(),
            adjacencies.clone(),
            DiscreteConfig::default(),
            42,
        )
        .unwrap();
        let mut s2 =
            DiscreteSolver::new(boundary, rooms, adjacencies, DiscreteConfig::default(), 42).unwrap();
        s1.solve();
        s2.solve();
        assert_eq!(s1.get_placed_rooms(), s2.get_placed_rooms());
    }

    #[test]
    fn pruning_reaches_a_fixpoint() {
        let boundary = rect_boundary(20.0, 20.0);
        let rooms = vec![
            RoomRequest::new("a", 30.0, 1.2).with_corridor_rule(CorridorRule::AllSides),
            RoomRequest::new("b", 30.0, 1.2).with_corridor_rule(CorridorRule::AllSides),
            RoomRequest::new("c", 20.0, 1.0).with_corridor_rule(CorridorRule::OneSide),
        ];
        let mut solver =
            DiscreteSolver::new(boundary, rooms, vec![], DiscreteConfig::default(), 11).unwrap();
        solver.solve();
        for (x, y, v) in solver.get_grid().iter_cells() {
            if v == CELL_CORRIDOR {
                assert!(solver.get_grid().occupied_neighbor_count(x, y) > 1);
            }
        }
    }

    #[test]
    fn construction_rejects_invalid_input() {
        let boundary = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let err = DiscreteSolver::new(boundary, vec![], vec![], DiscreteConfig::default(), 1);
        assert!(err.is_err());
    }
}
