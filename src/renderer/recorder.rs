//! Surface that records calls instead of drawing
//!
//! Used by tests and the headless binary.

use glam::Vec2;

use super::{RenderSurface, TextAlign};
use crate::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    SetAlpha(f32),
    Clear(Color),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, radius: f32, line_width: f32, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    Text { text: String, pos: Vec2, size: f32, align: TextAlign, color: Color },
}

#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
    depth: usize,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh frame
    pub fn reset(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }

    /// Unbalanced save/restore count; 0 after a well-formed frame
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count_rects_of(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { color: c, .. } if *c == color))
            .count()
    }
}

impl RenderSurface for CommandRecorder {
    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha(alpha));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            line_width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            align,
            color,
        });
    }
}
