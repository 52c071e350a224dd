//! Browser 2D canvas backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::colors::to_css;
use super::{RenderSurface, TextAlign};
use crate::Color;
use crate::error::GameError;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    /// Bind to `canvas`, scaling the logical field onto its pixel size
    pub fn new(canvas: &HtmlCanvasElement, logical_width: f32, logical_height: f32) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| GameError::MissingRenderTarget("2d context unavailable".to_string()))?;

        let sx = canvas.width() as f64 / logical_width as f64;
        let sy = canvas.height() as f64 / logical_height as f64;
        if let Err(e) = ctx.scale(sx, sy) {
            log::warn!("Canvas scale failed: {e:?}");
        }

        Ok(Self {
            ctx,
            width: logical_width as f64,
            height: logical_height as f64,
        })
    }

    fn trace(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x as f64, p.y as f64);
            } else {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        self.ctx.close_path();
    }

    fn arc(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        // Only fails on a negative radius
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl RenderSurface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&to_css(color));
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&to_css(color));
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&to_css(color));
        self.arc(center, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&to_css(color));
        self.ctx.set_line_width(line_width as f64);
        self.arc(center, radius);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.ctx.set_fill_style_str(&to_css(color));
        self.trace(points);
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        self.ctx.set_fill_style_str(&to_css(color));
        self.ctx.set_font(&format!("bold {size}px Arial"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
