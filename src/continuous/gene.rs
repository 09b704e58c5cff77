// src/continuous/gene.rs
//! A single candidate floor plan: a list of continuous room rectangles
//! plus the physics (squish collisions), fitness, mutation, and crossover
//! operators that evolve it.

use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Polygon, Vec2};
use crate::room::Adjacency;
use crate::rng::SeededRng;

use super::config::SpringConfig;

const SQUISH_FACTOR: f64 = 0.5;
const PRESSURE_SENSITIVITY: f64 = 0.3;
const BOUNDARY_CONSTRAIN_ITERATIONS: u32 = 10;
const BOUNDARY_OVERSHOOT: f64 = 1.1;
const CORRIDOR_ID_PREFIX: &str = "corridor-";

/// One room's continuous state inside a gene: an axis-aligned rectangle
/// plus the pressure counters its latest collision response accumulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousRoom {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub target_area: f64,
    pub target_ratio: f64,

    pub pressure_x: f64,
    pub pressure_y: f64,
    pub accumulated_pressure_x: f64,
    pub accumulated_pressure_y: f64,
}

impl ContinuousRoom {
    pub fn new(id: impl Into<String>, x: f64, y: f64, target_area: f64, target_ratio: f64) -> Self {
        let width = (target_area * target_ratio).sqrt();
        let height = target_area / width;
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            target_area,
            target_ratio,
            pressure_x: 0.0,
            pressure_y: 0.0,
            accumulated_pressure_x: 0.0,
            accumulated_pressure_y: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_rect(self.x, self.y, self.width, self.height)
    }

    pub fn polygon(&self) -> Polygon {
        Polygon::create_rectangle(self.x, self.y, self.width, self.height)
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }

    /// The allowed aspect ratio for this room: a global override unless
    /// this id names a corridor, in which case the room's own ratio wins.
    pub fn effective_target_ratio(&self, global_target_ratio: Option<f64>) -> f64 {
        match global_target_ratio {
            Some(g) if !self.id.starts_with(CORRIDOR_ID_PREFIX) => g,
            _ => self.target_ratio,
        }
    }

    pub fn clamp_dimensions(&mut self) {
        self.width = self.width.max(1.0);
        self.height = self.height.max(1.0);
    }
}

/// One candidate floor plan: an ordered list of rooms (same ids/order in
/// every gene of a population) plus its last-computed fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub rooms: Vec<ContinuousRoom>,
    pub fitness_total: f64,
    pub fitness_geometric: f64,
    pub fitness_topological: f64,
}

impl Gene {
    pub fn new(rooms: Vec<ContinuousRoom>) -> Self {
        Self {
            rooms,
            fitness_total: f64::INFINITY,
            fitness_geometric: f64::INFINITY,
            fitness_topological: f64::INFINITY,
        }
    }

    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&ContinuousRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// One physics tick: inflate, attract along adjacencies, resolve
    /// pairwise overlaps by squishing along the shorter overlap axis, then
    /// constrain every room back inside the boundary.
    pub fn apply_squish_collisions(
        &mut self,
        boundary: &Polygon,
        config: &SpringConfig,
        global_target_ratio: Option<f64>,
        adjacencies: &[Adjacency],
    ) {
        for room in &mut self.rooms {
            room.pressure_x = 0.0;
            room.pressure_y = 0.0;
        }

        if config.use_aggressive_inflation {
            for room in &mut self.rooms {
                if room.area() < room.target_area * config.inflation_threshold {
                    room.width *= config.inflation_rate;
                    room.height *= config.inflation_rate;
                }
            }
        }

        if config.use_adjacency_attraction {
            for adj in adjacencies {
                let (Some(i), Some(j)) = (self.room_index(&adj.a), self.room_index(&adj.b)) else {
                    continue;
                };
                if i == j {
                    continue;
                }
                let ci = self.rooms[i].center();
                let cj = self.rooms[j].center();
                let sep = cj.sub(&ci);
                let factor = 0.1 * adj.weight * config.adjacency_attraction_strength;
                let nudge = sep.scale(factor);
                self.rooms[i].x += nudge.x;
                self.rooms[i].y += nudge.y;
                self.rooms[j].x -= nudge.x;
                self.rooms[j].y -= nudge.y;
            }
        }

        let n = self.rooms.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (overlap_x, overlap_y) =
                    Aabb::overlap_extents(&self.rooms[i].aabb(), &self.rooms[j].aabb());
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                if overlap_x < overlap_y {
                    self.squish_horizontal(i, j, overlap_x, global_target_ratio);
                } else {
                    self.squish_vertical(i, j, overlap_y, global_target_ratio);
                }
            }
        }

        for room in &mut self.rooms {
            room.accumulated_pressure_x = room.pressure_x;
            room.accumulated_pressure_y = room.pressure_y;
        }

        for room in &mut self.rooms {
            constrain_to_boundary(room, boundary);
        }

        for room in &mut self.rooms {
            room.clamp_dimensions();
        }
    }

    fn squish_horizontal(&mut self, i: usize, j: usize, overlap: f64, global_target_ratio: Option<f64>) {
        self.rooms[i].pressure_x += overlap;
        self.rooms[j].pressure_x += overlap;

        let squish_amount = 0.5 * SQUISH_FACTOR * overlap + 0.1;

        let trial_ok = |room: &ContinuousRoom| -> bool {
            let w_prime = room.width - squish_amount;
            if w_prime <= 0.0 {
                return false;
            }
            let h_prime = room.target_area / w_prime;
            let ratio = w_prime / h_prime;
            let effective = room.effective_target_ratio(global_target_ratio);
            let (lo, hi) = (1.0 / effective, effective);
            ratio >= lo && ratio <= hi
        };

        let both_ok = trial_ok(&self.rooms[i]) && trial_ok(&self.rooms[j]);

        let (left, right) = if self.rooms[i].x <= self.rooms[j].x { (i, j) } else { (j, i) };

        if both_ok {
            let translate = (1.0 - SQUISH_FACTOR) * 0.5 * overlap;
            let compensate = squish_amount * 0.5;

            let w_left = self.rooms[left].width - squish_amount;
            let h_left = self.rooms[left].target_area / w_left;
            self.rooms[left].width = w_left;
            self.rooms[left].height = h_left;
            self.rooms[left].x -= translate + compensate;

            let w_right = self.rooms[right].width - squish_amount;
            let h_right = self.rooms[right].target_area / w_right;
            self.rooms[right].width = w_right;
            self.rooms[right].height = h_right;
            self.rooms[right].x += translate + compensate;
        } else {
            let translate = 0.5 * overlap + 0.1;
            self.rooms[left].x -= translate;
            self.rooms[right].x += translate;
        }
    }

    fn squish_vertical(&mut self, i: usize, j: usize, overlap: f64, global_target_ratio: Option<f64>) {
        self.rooms[i].pressure_y += overlap;
        self.rooms[j].pressure_y += overlap;

        let squish_amount = 0.5 * SQUISH_FACTOR * overlap + 0.1;

        let trial_ok = |room: &ContinuousRoom| -> bool {
            let h_prime = room.height - squish_amount;
            if h_prime <= 0.0 {
                return false;
            }
            let w_prime = room.target_area / h_prime;
            let ratio = w_prime / h_prime;
            let effective = room.effective_target_ratio(global_target_ratio);
            let (lo, hi) = (1.0 / effective, effective);
            ratio >= lo && ratio <= hi
        };

        let both_ok = trial_ok(&self.rooms[i]) && trial_ok(&self.rooms[j]);

        let (top, bottom) = if self.rooms[i].y <= self.rooms[j].y { (i, j) } else { (j, i) };

        if both_ok {
            let translate = (1.0 - SQUISH_FACTOR) * 0.5 * overlap;
            let compensate = squish_amount * 0.5;

            let h_top = self.rooms[top].height - squish_amount;
            let w_top = self.rooms[top].target_area / h_top;
            self.rooms[top].height = h_top;
            self.rooms[top].width = w_top;
            self.rooms[top].y -= translate + compensate;

            let h_bottom = self.rooms[bottom].height - squish_amount;
            let w_bottom = self.rooms[bottom].target_area / h_bottom;
            self.rooms[bottom].height = h_bottom;
            self.rooms[bottom].width = w_bottom;
            self.rooms[bottom].y += translate + compensate;
        } else {
            let translate = 0.5 * overlap + 0.1;
            self.rooms[top].y -= translate;
            self.rooms[bottom].y += translate;
        }
    }

    /// Lower is better. `geometric` penalizes overlap and boundary
    /// overflow; `topological` penalizes unmet adjacencies.
    pub fn calculate_fitness(
        &mut self,
        boundary: &Polygon,
        adjacencies: &[Adjacency],
        balance: f64,
        config: &SpringConfig,
    ) {
        let mut geometric = 0.0;
        let n = self.rooms.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let aabb_i = self.rooms[i].aabb();
                let aabb_j = self.rooms[j].aabb();
                let area = Aabb::intersection_area(&aabb_i, &aabb_j);
                if area <= 0.0 {
                    continue;
                }
                geometric += if config.use_non_linear_overlap_penalty {
                    // For two axis-aligned rectangles the polygon intersection
                    // area and the plain AABB overlap area are the same number;
                    // the ratio is always 1 here but kept distinct so the
                    // formula generalizes if a room ever stops being a rectangle.
                    let aabb_overlap_area = area;
                    let bonus = 1.0 + (area / aabb_overlap_area).max(0.0);
                    area.powf(config.overlap_penalty_exponent) * bonus
                } else {
                    area
                };
            }
        }

        for room in &self.rooms {
            let poly = room.polygon();
            let inside = poly.area_inside(boundary);
            let outside = (room.area() - inside).max(0.0);
            geometric += 100.0 * outside;
        }

        let mut topological = 0.0;
        for adj in adjacencies {
            let (Some(i), Some(j)) = (self.room_index(&adj.a), self.room_index(&adj.b)) else {
                continue;
            };
            let a = &self.rooms[i];
            let b = &self.rooms[j];
            let ca = a.center();
            let cb = b.center();
            let dx_gap = ((ca.x - cb.x).abs() - (a.width + b.width) / 2.0).max(0.0);
            let dy_gap = ((ca.y - cb.y).abs() - (a.height + b.height) / 2.0).max(0.0);
            let axis_gap_sq = dx_gap * dx_gap + dy_gap * dy_gap;
            let penalty = if config.use_quadratic_penalty {
                axis_gap_sq
            } else {
                axis_gap_sq.sqrt()
            };
            topological += adj.weight * penalty;
        }

        self.fitness_geometric = geometric;
        self.fitness_topological = topological;
        self.fitness_total = geometric * balance + topological * (1.0 - balance);
    }

    pub fn mutate(
        &mut self,
        rng: &mut SeededRng,
        mutation_rate: f64,
        mutation_strength: f64,
        aspect_ratio_mutation_rate: f64,
        global_target_ratio: Option<f64>,
        config: &SpringConfig,
        adjacencies: &[Adjacency],
    ) {
        if config.use_swap_mutation && rng.chance(config.swap_mutation_rate) {
            self.swap_mutate(rng, adjacencies);
        }

        for idx in 0..self.rooms.len() {
            let id = self.rooms[idx].id.clone();
            let mut moved = false;

            if config.use_partner_bias && rng.chance(config.partner_bias_rate) {
                if let Some(partner_pos) = self.random_partner_position(rng, &id, adjacencies) {
                    let room = &mut self.rooms[idx];
                    room.x += (partner_pos.x - room.x) * 0.7;
                    room.y += (partner_pos.y - room.y) * 0.7;
                    moved = true;
                }
            }

            if !moved && rng.chance(mutation_rate) {
                let room = &mut self.rooms[idx];
                room.x += rng.next_float(-mutation_strength / 2.0, mutation_strength / 2.0);
                room.y += rng.next_float(-mutation_strength / 2.0, mutation_strength / 2.0);
            }

            if rng.chance(aspect_ratio_mutation_rate) {
                self.mutate_aspect_ratio(idx, rng, global_target_ratio);
            }
        }

        for room in &mut self.rooms {
            room.clamp_dimensions();
        }
    }

    fn random_partner_position(
        &self,
        rng: &mut SeededRng,
        id: &str,
        adjacencies: &[Adjacency],
    ) -> Option<Vec2> {
        let partners: Vec<&str> = adjacencies
            .iter()
            .filter_map(|adj| adj.other(id))
            .collect();
        let choice = rng.pick_index(partners.len())?;
        let partner_id = partners[choice];
        self.room(partner_id).map(|r| Vec2::new(r.x, r.y))
    }

    fn mutate_aspect_ratio(&mut self, idx: usize, rng: &mut SeededRng, global_target_ratio: Option<f64>) {
        let room = &mut self.rooms[idx];
        let current_ratio = room.width / room.height;
        let jitter = rng.next_float(-0.1, 0.1);
        let mut new_ratio = current_ratio * (1.0 + jitter);

        let total_pressure = room.accumulated_pressure_x + room.accumulated_pressure_y;
        if total_pressure > 0.1 {
            let diff = room.accumulated_pressure_x - room.accumulated_pressure_y;
            if diff != 0.0 {
                new_ratio += PRESSURE_SENSITIVITY * diff.signum();
            }
        }

        let effective = room.effective_target_ratio(global_target_ratio);
        let (lo, hi) = (1.0 / effective, effective);
        new_ratio = new_ratio.clamp(lo, hi);

        let width = (room.target_area * new_ratio).sqrt();
        let height = room.target_area / width;
        room.width = width;
        room.height = height;
    }

    fn swap_mutate(&mut self, rng: &mut SeededRng, adjacencies: &[Adjacency]) {
        let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
        for adj in adjacencies {
            let (Some(i), Some(j)) = (self.room_index(&adj.a), self.room_index(&adj.b)) else {
                continue;
            };
            if i == j {
                continue;
            }
            let ci = self.rooms[i].center();
            let cj = self.rooms[j].center();
            let current_dist = ci.distance(&cj);

            let swapped_ci = Vec2::new(
                self.rooms[j].x + self.rooms[i].width / 2.0,
                self.rooms[j].y + self.rooms[i].height / 2.0,
            );
            let swapped_cj = Vec2::new(
                self.rooms[i].x + self.rooms[j].width / 2.0,
                self.rooms[i].y + self.rooms[j].height / 2.0,
            );
            let swapped_dist = swapped_ci.distance(&swapped_cj);

            let improvement = adj.weight * (current_dist - swapped_dist);
            if improvement > 0.0 {
                candidates.push((i, j, improvement));
            }
        }

        if candidates.is_empty() {
            if self.rooms.len() >= 2 {
                let a = rng.pick_index(self.rooms.len()).unwrap();
                let mut b = rng.pick_index(self.rooms.len()).unwrap();
                while b == a {
                    b = rng.pick_index(self.rooms.len()).unwrap();
                }
                self.swap_positions(a, b);
            }
            return;
        }

        candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap());
        let top_n = candidates.len().min(3);
        let choice = rng.pick_index(top_n).unwrap_or(0);
        let (i, j, _) = candidates[choice];
        self.swap_positions(i, j);
    }

    fn swap_positions(&mut self, i: usize, j: usize) {
        let (xi, yi) = (self.rooms[i].x, self.rooms[i].y);
        let (xj, yj) = (self.rooms[j].x, self.rooms[j].y);
        self.rooms[i].x = xj;
        self.rooms[i].y = yj;
        self.rooms[j].x = xi;
        self.rooms[j].y = yi;
    }

    /// Produces a child with each scalar field independently picked from
    /// either parent. `target_area`/`target_ratio` come from `self`.
    pub fn crossover(&self, other: &Gene, rng: &mut SeededRng) -> Gene {
        let mut child_rooms = Vec::with_capacity(self.rooms.len());
        for left in &self.rooms {
            let right = other.room(&left.id).unwrap_or(left);
            let pick = |l: f64, r: f64| if rng.chance(0.5) { l } else { r };
            child_rooms.push(ContinuousRoom {
                id: left.id.clone(),
                x: pick(left.x, right.x),
                y: pick(left.y, right.y),
                width: pick(left.width, right.width),
                height: pick(left.height, right.height),
                target_area: left.target_area,
                target_ratio: left.target_ratio,
                pressure_x: 0.0,
                pressure_y: 0.0,
                accumulated_pressure_x: (left.accumulated_pressure_x + right.accumulated_pressure_x) / 2.0,
                accumulated_pressure_y: (left.accumulated_pressure_y + right.accumulated_pressure_y) / 2.0,
            });
        }
        Gene::new(child_rooms)
    }
}

fn constrain_to_boundary(room: &mut ContinuousRoom, boundary: &Polygon) {
    for _ in 0..BOUNDARY_CONSTRAIN_ITERATIONS {
        let corners = room.corners();
        let outside: Vec<Vec2> = corners
            .iter()
            .copied()
            .filter(|c| !boundary.contains_point(c))
            .collect();
        if outside.is_empty() {
            break;
        }

        let center = room.center();
        let farthest = outside
            .iter()
            .max_by(|a, b| {
                a.distance(&center)
                    .partial_cmp(&b.distance(&center))
                    .unwrap()
            })
            .copied()
            .unwrap();

        let closest = boundary.closest_point_on_boundary(&farthest);
        let push = closest.sub(&farthest).scale(BOUNDARY_OVERSHOOT);

        room.x += push.x;
        room.y += push.y;
        room.accumulated_pressure_x += push.x.abs() * 10.0;
        room.accumulated_pressure_y += push.y.abs() * 10.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn square_boundary(size: f64) -> Polygon {
        Polygon::create_rectangle(0.0, 0.0, size, size)
    }

    #[test]
    fn new_room_respects_target_ratio() {
        let room = ContinuousRoom::new("r", 0.0, 0.0, 100.0, 4.0);
        assert_approx_eq!(room.width / room.height, 4.0, 1e-9);
        assert_approx_eq!(room.area(), 100.0, 1e-9);
    }

    #[test]
    fn effective_ratio_prefers_global_unless_corridor() {
        let room = ContinuousRoom::new("living", 0.0, 0.0, 100.0, 1.5);
        assert_eq!(room.effective_target_ratio(Some(2.0)), 2.0);
        let corridor = ContinuousRoom::new("corridor-1", 0.0, 0.0, 20.0, 3.0);
        assert_eq!(corridor.effective_target_ratio(Some(2.0)), 3.0);
    }

    #[test]
    fn squish_resolves_overlap_without_shrinking_below_one() {
        let mut gene = Gene::new(vec![
            ContinuousRoom::new("a", 0.0, 0.0, 100.0, 1.0),
            ContinuousRoom::new("b", 5.0, 0.0, 100.0, 1.0),
        ]);
        let boundary = square_boundary(200.0);
        let config = SpringConfig::default();
        for _ in 0..20 {
            gene.apply_squish_collisions(&boundary, &config, None, &[]);
        }
        for room in &gene.rooms {
            assert!(room.width >= 1.0);
            assert!(room.height >= 1.0);
        }
    }

    #[test]
    fn constrain_pushes_room_back_inside() {
        let mut room = ContinuousRoom::new("a", 90.0, 90.0, 100.0, 1.0);
        let boundary = square_boundary(50.0);
        constrain_to_boundary(&mut room, &boundary);
        for corner in room.corners() {
            // At least closer to inside than before; full containment is
            // asymptotic under the iteration cap.
            assert!(corner.x < 150.0);
        }
    }

    #[test]
    fn fitness_is_zero_for_non_overlapping_in_bounds_rooms() {
        let mut gene = Gene::new(vec![
            ContinuousRoom::new("a", 0.0, 0.0, 25.0, 1.0),
            ContinuousRoom::new("b", 10.0, 0.0, 25.0, 1.0),
        ]);
        let boundary = square_boundary(100.0);
        let config = SpringConfig::default();
        gene.calculate_fitness(&boundary, &[], 0.5, &config);
        assert_approx_eq!(gene.fitness_geometric, 0.0, 1e-6);
    }

    #[test]
    fn fitness_penalizes_overlap() {
        let mut gene = Gene::new(vec![
            ContinuousRoom::new("a", 0.0, 0.0, 25.0, 1.0),
            ContinuousRoom::new("b", 2.0, 0.0, 25.0, 1.0),
        ]);
        let boundary = square_boundary(100.0);
        let config = SpringConfig::default();
        gene.calculate_fitness(&boundary, &[], 1.0, &config);
        assert!(gene.fitness_geometric > 0.0);
    }

    #[test]
    fn crossover_picks_fields_from_either_parent() {
        let parent_a = Gene::new(vec![ContinuousRoom::new("a", 0.0, 0.0, 25.0, 1.0)]);
        let mut parent_b = parent_a.clone();
        parent_b.rooms[0].x = 50.0;
        parent_b.rooms[0].y = 50.0;

        let mut rng = SeededRng::new(1);
        let child = parent_a.crossover(&parent_b, &mut rng);
        let child_room = &child.rooms[0];
        assert!(child_room.x == 0.0 || child_room.x == 50.0);
        assert!(child_room.y == 0.0 || child_room.y == 50.0);
    }

    #[test]
    fn mutate_keeps_dimensions_at_least_one() {
        let mut gene = Gene::new(vec![ContinuousRoom::new("a", 0.0, 0.0, 2.0, 1.0)]);
        let config = SpringConfig::default();
        let mut rng = SeededRng::new(9);
        for _ in 0..50 {
            gene.mutate(&mut rng, 1.0, 5.0, 1.0, None, &config, &[]);
        }
        for room in &gene.rooms {
            assert!(room.width >= 1.0);
            assert!(room.height >= 1.0);
        }
    }

    #[test]
    fn clone_then_mutate_does_not_affect_original() {
        let gene = Gene::new(vec![ContinuousRoom::new("a", 0.0, 0.0, 25.0, 1.0)]);
        let original = gene.clone();
        let mut mutant = gene.clone();
        let config = SpringConfig::default();
        let mut rng = SeededRng::new(3);
        mutant.mutate(&mut rng, 1.0, 10.0, 1.0, None, &config, &[]);
        assert_eq!(gene, original);
    }
}
