//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

/// Regular polygon approximating a circle
pub fn circle(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let theta = TAU * i as f32 / segments as f32;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Alternating outer/inner points of a star
pub fn star(center: Vec2, outer: f32, inner: f32, points: u32) -> Vec<Vec2> {
    let points = points.max(2);
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            // Start pointing up
            let theta = TAU * i as f32 / (points * 2) as f32 - TAU / 4.0;
            center + Vec2::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

/// Nose cone pointing right, filling the box's right quarter
pub fn nose_right(pos: Vec2, size: Vec2) -> [Vec2; 3] {
    let base_x = pos.x + size.x * 0.75;
    [
        Vec2::new(base_x, pos.y),
        Vec2::new(pos.x + size.x + size.x * 0.15, pos.y + size.y / 2.0),
        Vec2::new(base_x, pos.y + size.y),
    ]
}

/// Nose cone pointing left
pub fn nose_left(pos: Vec2, size: Vec2) -> [Vec2; 3] {
    let base_x = pos.x + size.x * 0.25;
    [
        Vec2::new(base_x, pos.y),
        Vec2::new(pos.x - size.x * 0.15, pos.y + size.y / 2.0),
        Vec2::new(base_x, pos.y + size.y),
    ]
}
