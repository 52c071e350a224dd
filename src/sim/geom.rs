//! Axis-aligned geometry shared by every entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    /// Box with top-left corner `pos`; negative sizes collapse to zero
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        let size = size.max(Vec2::ZERO);
        Self {
            left: pos.x,
            right: pos.x + size.x,
            top: pos.y,
            bottom: pos.y + size.y,
        }
    }

    /// Overlap test; shared edges count as touching
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }
}

/// Position, velocity and extent of a movable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(width, height),
            active: true,
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Vec2::new(vx, vy);
        self
    }

    /// Advance one frame
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}
