//! Rendering module
//!
//! The game draws through `RenderSurface`, a small immediate-mode interface
//! over a 1200x800 logical canvas. The browser build backs it with a 2D canvas
//! context; tests and the headless binary use `CommandRecorder`.

pub mod colors;
pub mod draw;
pub mod recorder;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::Color;

pub use draw::render;
pub use recorder::{CommandRecorder, DrawCommand};

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Primitive draw calls; the game never reads pixels back
pub trait RenderSurface {
    /// Push alpha and other state
    fn save(&mut self);
    fn restore(&mut self);
    /// Global alpha multiplier for subsequent calls, 0.0..=1.0
    fn set_alpha(&mut self, alpha: f32);

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);
}
