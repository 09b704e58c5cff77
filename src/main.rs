//! A small command-line driver for `floorplan_gen`.
//!
//! Builds the discrete solver's Scenario A fixture (see the crate's test
//! suite), runs it to completion, seeds the continuous refiner from the
//! same room set, and logs the resulting layout. Intended as a smoke-test
//! entry point for hosts integrating the library, not as a product UI.

use std::error::Error;

use log::info;

use floorplan_gen::continuous::{GeneCollection, SpringConfig};
use floorplan_gen::discrete::{DiscreteConfig, DiscreteSolver};
use floorplan_gen::geometry::Vec2;
use floorplan_gen::room::{Adjacency, CorridorRule, RoomRequest};

fn demo_boundary() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(50.0, 0.0),
        Vec2::new(50.0, 40.0),
        Vec2::new(0.0, 40.0),
    ]
}

fn demo_rooms() -> Vec<RoomRequest> {
    vec![
        RoomRequest::new("living", 200.0, 1.5).with_corridor_rule(CorridorRule::TwoSides),
        RoomRequest::new("kitchen", 120.0, 1.2).with_corridor_rule(CorridorRule::OneSide),
        RoomRequest::new("bedroom", 150.0, 1.3).with_corridor_rule(CorridorRule::TwoSides),
        RoomRequest::new("bathroom", 60.0, 1.0).with_corridor_rule(CorridorRule::OneSide),
    ]
}

fn demo_adjacencies() -> Vec<Adjacency> {
    vec![
        Adjacency::new("living", "kitchen").with_weight(2.0),
        Adjacency::new("kitchen", "bathroom").with_weight(1.5),
        Adjacency::new("bedroom", "bathroom").with_weight(1.0),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("floorplan_gen starting");

    let mut discrete_config = DiscreteConfig::default();
    discrete_config.start_point = Some(Vec2::new(25.0, 20.0));

    let rooms = demo_rooms();
    let mut discrete = DiscreteSolver::new(
        demo_boundary(),
        rooms.clone(),
        demo_adjacencies(),
        discrete_config,
        42,
    )?;
    discrete.solve();

    info!(
        "discrete solver: {}/{} rooms placed, connected={}",
        discrete.get_placed_rooms().len(),
        rooms.len(),
        discrete.is_connected()
    );
    for (id, room) in discrete.get_placed_rooms() {
        info!("  {id}: ({}, {}) {}x{}", room.x, room.y, room.width, room.height);
    }

    let mut refiner = GeneCollection::new(
        demo_boundary(),
        rooms,
        demo_adjacencies(),
        SpringConfig::default(),
        None,
        42,
    )?;
    refiner.run(200, 1e-6);

    if let Some(best) = refiner.get_best() {
        info!(
            "continuous refiner: generation={}, fitness_total={:.3} (geometric={:.3}, topological={:.3})",
            refiner.generation(),
            best.fitness_total,
            best.fitness_geometric,
            best.fitness_topological
        );
    }

    info!("floorplan_gen exiting");
    Ok(())
}
