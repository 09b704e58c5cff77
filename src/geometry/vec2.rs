// src/geometry/vec2.rs

use serde::{Deserialize, Serialize};

/// A 2D point or vector. Used both as a polygon vertex and as a room corner
/// in continuous world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Vec2) -> f64 {
        self.sub(other).magnitude()
    }

    /// Returns (0, 0) for any vector whose magnitude is below 1e-5, to avoid
    /// division blowing up into NaN/inf in downstream mutation code.
    pub fn normalize(&self) -> Vec2 {
        let mag = self.magnitude();
        if mag < 1e-5 {
            Vec2::ZERO
        } else {
            self.scale(1.0 / mag)
        }
    }
}
