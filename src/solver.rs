// src/solver.rs
//! A thin common seam over the two concrete solvers, for host code (a
//! viewer's frame loop, a CLI) that wants to drive either one through the
//! same loop without a shared abstract base type.

use crate::continuous::GeneCollection;
use crate::discrete::{DiscreteSolver, GridState};

/// Common driving interface for both solvers. Neither solver needs this
/// internally; it exists only for callers that hold a `Box<dyn
/// FloorplanSolver>` and want to step whichever one they were handed.
pub trait FloorplanSolver {
    /// Advances the solver by one unit of work: the discrete solver's
    /// `solve()` runs to completion the first time this is called and is a
    /// no-op afterward; the continuous refiner's `iterate()` runs exactly
    /// one generation per call.
    fn step(&mut self);

    /// True once further `step()` calls cannot change the result: always
    /// `true` for the discrete solver after its one `solve()` pass, and
    /// always `false` for the continuous refiner, whose convergence is a
    /// host-side judgment call (`GeneCollection::has_converged`).
    fn is_done(&self) -> bool;

    /// The discrete solver has no notion of "generation" (it solves in one
    /// call) and reports 0; the continuous refiner reports its generation
    /// counter.
    fn generation_or_iteration(&self) -> u32;
}

impl FloorplanSolver for DiscreteSolver {
    fn step(&mut self) {
        if !self.is_done() {
            self.solve();
        }
    }

    fn is_done(&self) -> bool {
        matches!(self.state(), GridState::Validated)
    }

    fn generation_or_iteration(&self) -> u32 {
        0
    }
}

impl FloorplanSolver for GeneCollection {
    fn step(&mut self) {
        self.iterate();
    }

    fn is_done(&self) -> bool {
        false
    }

    fn generation_or_iteration(&self) -> u32 {
        self.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuous::SpringConfig;
    use crate::discrete::DiscreteConfig;
    use crate::geometry::Vec2;
    use crate::room::RoomRequest;

    fn square_boundary(size: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ]
    }

    #[test]
    fn discrete_solver_is_done_after_one_step() {
        let rooms = vec![RoomRequest::new("r", 25.0, 1.0)];
        let mut solver =
            DiscreteSolver::new(square_boundary(10.0), rooms, vec![], DiscreteConfig::default(), 1)
                .unwrap();
        assert!(!solver.is_done());
        solver.step();
        assert!(solver.is_done());
        assert_eq!(solver.generation_or_iteration(), 0);
    }

    #[test]
    fn gene_collection_step_advances_generation() {
        let rooms = vec![RoomRequest::new("a", 25.0, 1.0), RoomRequest::new("b", 25.0, 1.0)];
        let mut config = SpringConfig::default();
        config.population_size = 4;
        let mut collection =
            GeneCollection::new(square_boundary(20.0), rooms, vec![], config, None, 1).unwrap();
        assert_eq!(collection.generation_or_iteration(), 0);
        collection.step();
        assert_eq!(collection.generation_or_iteration(), 1);
        assert!(!collection.is_done());
    }
}
