//! Bullets and beams
//!
//! One tagged type covers every shot; which collection holds it decides who
//! it can hit.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, UpdateCtx};
use super::geom::Body;
use crate::{Color, rgb};

/// Enemy shots may drift this far past the edge before expiring
const ENEMY_SHOT_MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Standard player round (8x4)
    Bullet,
    /// Wide player beam (20x30)
    Beam,
    /// Hostile round (8x8)
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
    pub color: Color,
    /// Beam pulse phase
    pub glow: f32,
}

impl Projectile {
    pub fn bullet(x: f32, y: f32, vx: f32, vy: f32, color: Color) -> Self {
        Self {
            body: Body::new(x, y, 8.0, 4.0).with_velocity(vx, vy),
            kind: ProjectileKind::Bullet,
            color,
            glow: 0.0,
        }
    }

    pub fn beam(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            body: Body::new(x, y, 20.0, 30.0).with_velocity(vx, vy),
            kind: ProjectileKind::Beam,
            color: rgb(0xFF00FF),
            glow: 0.0,
        }
    }

    pub fn enemy(x: f32, y: f32, vx: f32, vy: f32, color: Color) -> Self {
        Self {
            body: Body::new(x, y, 8.0, 8.0).with_velocity(vx, vy),
            kind: ProjectileKind::Enemy,
            color,
            glow: 0.0,
        }
    }
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.body.integrate();
        let (w, h) = (ctx.config.canvas.width, ctx.config.canvas.height);
        let p = self.body.pos;

        let off_screen = match self.kind {
            ProjectileKind::Bullet | ProjectileKind::Beam => {
                p.x > w || p.x < 0.0 || p.y > h || p.y < 0.0
            }
            ProjectileKind::Enemy => {
                p.x < -ENEMY_SHOT_MARGIN
                    || p.x > w + ENEMY_SHOT_MARGIN
                    || p.y < -ENEMY_SHOT_MARGIN
                    || p.y > h + ENEMY_SHOT_MARGIN
            }
        };

        if self.kind == ProjectileKind::Beam {
            self.glow += 0.3;
        }
        if off_screen {
            self.body.active = false;
        }
    }
}
