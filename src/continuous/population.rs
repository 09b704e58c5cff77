// src/continuous/population.rs
//! The continuous geometric refiner: a population of genes evolved by
//! physics (squish collisions), fitness-ranked selection, crossover, and
//! mutation.

use log::{debug, trace};

use crate::error::{FloorplanError, Result};
use crate::geometry::{Polygon, Vec2};
use crate::room::{Adjacency, RoomRequest};
use crate::rng::SeededRng;
use crate::validate::validate_inputs;

use super::config::SpringConfig;
use super::gene::{ContinuousRoom, Gene};

/// Snapshot of one generation's fitness spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
}

pub struct GeneCollection {
    boundary: Polygon,
    adjacencies: Vec<Adjacency>,
    config: SpringConfig,
    global_target_ratio: Option<f64>,
    rng: SeededRng,

    /// The unmutated starting layout, kept to incubate fresh-blood genes.
    base_rooms: Vec<ContinuousRoom>,
    genes: Vec<Gene>,
    generation: u32,
}

impl GeneCollection {
    pub fn new(
        boundary: Vec<Vec2>,
        rooms: Vec<RoomRequest>,
        adjacencies: Vec<Adjacency>,
        config: SpringConfig,
        global_target_ratio: Option<f64>,
        seed: u32,
    ) -> Result<Self> {
        validate_inputs(&boundary, &rooms, &adjacencies)?;
        if config.population_size < 2 {
            return Err(FloorplanError::PopulationTooSmall(config.population_size));
        }

        let boundary = Polygon::new(boundary);
        let mut rng = SeededRng::new(seed);

        let base_rooms = Self::initial_layout(&boundary, &rooms);
        let mut genes = Vec::with_capacity(config.population_size.max(1));
        genes.push(Gene::new(base_rooms.clone()));

        for _ in 1..config.population_size.max(1) {
            let mut gene = Gene::new(base_rooms.clone());
            gene.mutate(
                &mut rng,
                0.5,
                config.mutation_strength * 2.0,
                config.aspect_ratio_mutation_rate,
                global_target_ratio,
                &config,
                &adjacencies,
            );
            genes.push(gene);
        }

        debug!(
            "gene collection initialized: population={}, rooms={}",
            genes.len(),
            rooms.len()
        );

        Ok(Self {
            boundary,
            adjacencies,
            config,
            global_target_ratio,
            rng,
            base_rooms,
            genes,
            generation: 0,
        })
    }

    /// A simple non-overlapping row-packed starting layout: rooms are laid
    /// out left to right, wrapping to a new row when the boundary's width
    /// would be exceeded. Refinement does the rest.
    fn initial_layout(boundary: &Polygon, rooms: &[RoomRequest]) -> Vec<ContinuousRoom> {
        let bbox = boundary.aabb();
        let mut cursor_x = bbox.min_x;
        let mut cursor_y = bbox.min_y;
        let mut row_height = 0.0_f64;

        let mut out = Vec::with_capacity(rooms.len());
        for room in rooms {
            let (_, hi) = room.ratio_bounds();
            let ratio = hi.min(room.target_ratio.max(1.0));
            let width = (room.target_area * ratio).sqrt();
            let height = room.target_area / width;

            if cursor_x + width > bbox.max_x && cursor_x > bbox.min_x {
                cursor_x = bbox.min_x;
                cursor_y += row_height;
                row_height = 0.0;
            }

            out.push(ContinuousRoom::new(room.id.clone(), cursor_x, cursor_y, room.target_area, room.target_ratio));
            out.last_mut().unwrap().width = width;
            out.last_mut().unwrap().height = height;

            cursor_x += width;
            row_height = row_height.max(height);
        }
        out
    }

    pub fn get_all(&self) -> &[Gene] {
        &self.genes
    }

    pub fn get_best(&self) -> Option<&Gene> {
        self.genes
            .iter()
            .min_by(|a, b| a.fitness_total.partial_cmp(&b.fitness_total).unwrap())
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn get_stats(&self) -> GenerationStats {
        let fitnesses: Vec<f64> = self.genes.iter().map(|g| g.fitness_total).collect();
        let best = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
        let worst = fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = if fitnesses.is_empty() {
            0.0
        } else {
            fitnesses.iter().sum::<f64>() / fitnesses.len() as f64
        };
        GenerationStats {
            generation: self.generation,
            best_fitness: best,
            mean_fitness: mean,
            worst_fitness: worst,
        }
    }

    /// True once the population's fitness spread (worst - best) drops below
    /// `epsilon`, meaning further generations are unlikely to help.
    pub fn has_converged(&self, epsilon: f64) -> bool {
        let stats = self.get_stats();
        (stats.worst_fitness - stats.best_fitness).abs() < epsilon
    }

    fn evaluate_all(&mut self) {
        for gene in &mut self.genes {
            gene.apply_squish_collisions(
                &self.boundary,
                &self.config,
                self.global_target_ratio,
                &self.adjacencies,
            );
            gene.calculate_fitness(
                &self.boundary,
                &self.adjacencies,
                self.config.fitness_balance,
                &self.config,
            );
        }
    }

    fn warm_up_ticks(&mut self, gene: &mut Gene, ticks: u32) {
        for _ in 0..ticks {
            gene.apply_squish_collisions(
                &self.boundary,
                &self.config,
                self.global_target_ratio,
                &self.adjacencies,
            );
        }
    }

    fn evaluate_one(&self, gene: &mut Gene) {
        gene.calculate_fitness(
            &self.boundary,
            &self.adjacencies,
            self.config.fitness_balance,
            &self.config,
        );
    }

    /// A brand-new individual from the base template, dimensions reset to
    /// the template's target area/ratio, ready for incubation.
    fn fresh_gene(&self) -> Gene {
        let rooms = self
            .base_rooms
            .iter()
            .map(|base| ContinuousRoom::new(base.id.clone(), base.x, base.y, base.target_area, base.target_ratio))
            .collect();
        Gene::new(rooms)
    }

    /// Repeatedly mutate-then-squish at a high mutation rate so the gene
    /// lands somewhere competitive before it re-enters the population.
    fn incubate(&mut self, gene: &mut Gene, rounds: u32) {
        for _ in 0..rounds {
            gene.mutate(
                &mut self.rng,
                0.9,
                self.config.mutation_strength * 3.0,
                1.0,
                self.global_target_ratio,
                &self.config,
                &self.adjacencies,
            );
            gene.apply_squish_collisions(
                &self.boundary,
                &self.config,
                self.global_target_ratio,
                &self.adjacencies,
            );
        }
        self.evaluate_one(gene);
    }

    /// Runs one generation: evaluate, rank, breed, mutate, cull/refill, and
    /// (periodically) reseed with fresh blood.
    pub fn iterate(&mut self) {
        self.evaluate_all();
        self.genes
            .sort_by(|a, b| a.fitness_total.partial_cmp(&b.fitness_total).unwrap());

        let population_size = self.genes.len();
        let parent_pool_size = ((population_size as f64 * self.config.parent_pool_fraction).ceil() as usize)
            .clamp(1, population_size);
        let offspring_count = (population_size as f64 * self.config.crossover_rate).floor() as usize;

        let mut offspring = Vec::with_capacity(offspring_count);
        for _ in 0..offspring_count {
            let i = self.rng.pick_index(parent_pool_size).unwrap_or(0);
            let j = self.rng.pick_index(parent_pool_size).unwrap_or(0);
            let mut child = self.genes[i].crossover(&self.genes[j], &mut self.rng);
            child.mutate(
                &mut self.rng,
                self.config.mutation_rate,
                self.config.mutation_strength,
                self.config.aspect_ratio_mutation_rate,
                self.global_target_ratio,
                &self.config,
                &self.adjacencies,
            );
            self.warm_up_ticks(&mut child, self.config.clamped_warm_up_iterations());
            self.evaluate_one(&mut child);
            offspring.push(child);
        }

        let mut combined: Vec<Gene> = self.genes.clone();
        combined.extend(offspring);
        combined.sort_by(|a, b| a.fitness_total.partial_cmp(&b.fitness_total).unwrap());

        let combined_size = combined.len();
        let cull_count = ((combined_size as f64 * self.config.selection_pressure).floor() as usize)
            .min(combined_size.saturating_sub(1));
        let mut survivors: Vec<Gene> = combined[..combined_size - cull_count].to_vec();

        while survivors.len() < population_size {
            let pool = survivors.len().max(1);
            let idx = self.rng.pick_index(pool).unwrap_or(0);
            let mut clone = survivors[idx].clone();
            clone.mutate(
                &mut self.rng,
                self.config.mutation_rate,
                self.config.mutation_strength,
                self.config.aspect_ratio_mutation_rate,
                self.global_target_ratio,
                &self.config,
                &self.adjacencies,
            );
            self.warm_up_ticks(&mut clone, self.config.clamped_warm_up_iterations());
            self.evaluate_one(&mut clone);
            survivors.push(clone);
        }
        survivors.truncate(population_size);

        self.generation += 1;

        if self.config.use_fresh_blood
            && self.config.fresh_blood_interval > 0
            && self.generation % self.config.fresh_blood_interval == 0
        {
            survivors.sort_by(|a, b| a.fitness_total.partial_cmp(&b.fitness_total).unwrap());
            let drop_count = (population_size / 4).max(1).min(population_size);
            let incubation_rounds = self.config.fresh_blood_warm_up;
            for slot in (population_size - drop_count)..population_size {
                let mut fresh = self.fresh_gene();
                self.incubate(&mut fresh, incubation_rounds);
                survivors[slot] = fresh;
            }
            trace!(
                "generation {}: fresh blood replaced {} genes",
                self.generation,
                drop_count
            );
        }

        self.genes = survivors;
    }

    /// Runs `generations` iterations, stopping early if `has_converged`.
    pub fn run(&mut self, generations: u32, convergence_epsilon: f64) {
        for _ in 0..generations {
            if self.generation > 0 && self.has_converged(convergence_epsilon) {
                debug!("gene collection converged at generation {}", self.generation);
                break;
            }
            self.iterate();
        }
    }
}
