// src/validate.rs
//! Construction-time input validation shared by both solver constructors.

use std::collections::HashSet;

use crate::error::{FloorplanError, Result};
use crate::geometry::Vec2;
use crate::room::{Adjacency, RoomRequest};

/// Validates boundary, rooms, and adjacencies before any solver state is
/// created: boundary vertex count, room id/area/ratio, adjacency
/// references. Construction-time input errors only; nothing past this
/// point is fallible.
pub fn validate_inputs(
    boundary: &[Vec2],
    rooms: &[RoomRequest],
    adjacencies: &[Adjacency],
) -> Result<()> {
    if boundary.len() < 3 {
        return Err(FloorplanError::BoundaryTooSmall(boundary.len()));
    }

    let mut seen_ids = HashSet::with_capacity(rooms.len());
    for room in rooms {
        if room.id.is_empty() {
            return Err(FloorplanError::EmptyRoomId);
        }
        if !seen_ids.insert(room.id.clone()) {
            return Err(FloorplanError::DuplicateRoomId(room.id.clone()));
        }
        if room.target_area <= 0.0 {
            return Err(FloorplanError::NonPositiveArea {
                id: room.id.clone(),
                target_area: room.target_area,
            });
        }
        if room.target_ratio < 1.0 {
            return Err(FloorplanError::InvalidTargetRatio {
                id: room.id.clone(),
                target_ratio: room.target_ratio,
            });
        }
    }

    for adj in adjacencies {
        if !seen_ids.contains(&adj.a) {
            return Err(FloorplanError::UnknownAdjacencyId(adj.a.clone()));
        }
        if !seen_ids.contains(&adj.b) {
            return Err(FloorplanError::UnknownAdjacencyId(adj.b.clone()));
        }
    }

    Ok(())
}
