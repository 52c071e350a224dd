//! The player's craft

use serde::{Deserialize, Serialize};

use super::entity::{Entity, UpdateCtx};
use super::geom::Body;
use super::projectile::Projectile;
use crate::config::PlayerConfig;
use crate::rgb;

/// Mutually exclusive gun layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Normal,
    Double,
    Triple,
}

impl WeaponMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponMode::Normal => "Normal",
            WeaponMode::Double => "Double Shot",
            WeaponMode::Triple => "Triple Shot",
        }
    }
}

/// Timed buffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    Shield,
    Beam,
    Speed,
    Rapid,
}

impl BuffKind {
    pub const ALL: [BuffKind; 4] = [BuffKind::Shield, BuffKind::Beam, BuffKind::Speed, BuffKind::Rapid];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuffState {
    pub active: bool,
    pub remaining: u32,
}

impl BuffState {
    fn tick(&mut self) {
        if self.active {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.active = false;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub shield: BuffState,
    pub beam: BuffState,
    pub speed: BuffState,
    pub rapid: BuffState,
}

impl Buffs {
    pub fn get(&self, kind: BuffKind) -> &BuffState {
        match kind {
            BuffKind::Shield => &self.shield,
            BuffKind::Beam => &self.beam,
            BuffKind::Speed => &self.speed,
            BuffKind::Rapid => &self.rapid,
        }
    }

    pub fn get_mut(&mut self, kind: BuffKind) -> &mut BuffState {
        match kind {
            BuffKind::Shield => &mut self.shield,
            BuffKind::Beam => &mut self.beam,
            BuffKind::Speed => &mut self.speed,
            BuffKind::Rapid => &mut self.rapid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    base_speed: f32,
    base_fire_interval: f32,
    /// Effective speed after buffs
    pub speed: f32,
    /// Effective frames between shots after buffs
    pub fire_rate: f32,
    pub weapon: WeaponMode,
    pub buffs: Buffs,
    /// Frames until the next shot is allowed
    pub fire_cooldown: f32,
    /// Mega-bomb charges held
    pub mega_bombs: u32,
    /// Shield ring pulse phase
    pub shield_phase: f32,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            body: Body::new(config.start_x, config.start_y, config.width, config.height),
            base_speed: config.base_speed,
            base_fire_interval: config.base_fire_interval,
            speed: config.base_speed,
            fire_rate: config.base_fire_interval,
            weapon: WeaponMode::Normal,
            buffs: Buffs::default(),
            fire_cooldown: 0.0,
            mega_bombs: 0,
            shield_phase: 0.0,
        }
    }

    /// Set velocity from held directions; up and left win ties
    pub fn steer(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.body.vel.y = if up {
            -self.speed
        } else if down {
            self.speed
        } else {
            0.0
        };
        self.body.vel.x = if left {
            -self.speed
        } else if right {
            self.speed
        } else {
            0.0
        };
    }

    /// Shots for this frame; empty while cooling down
    pub fn fire(&mut self) -> Vec<Projectile> {
        if self.fire_cooldown > 0.0 {
            return Vec::new();
        }

        let x = self.body.pos.x + self.body.size.x;
        let center_y = self.body.pos.y + self.body.size.y / 2.0;

        let shots = if self.buffs.beam.active {
            vec![Projectile::beam(x, center_y - 15.0, 12.0, 0.0)]
        } else {
            match self.weapon {
                WeaponMode::Normal => {
                    vec![Projectile::bullet(x, center_y - 2.0, 8.0, 0.0, rgb(0xFFFF00))]
                }
                WeaponMode::Double => {
                    let color = rgb(0xFF6B6B);
                    vec![
                        Projectile::bullet(x, center_y - 10.0, 8.0, 0.0, color),
                        Projectile::bullet(x, center_y + 5.0, 8.0, 0.0, color),
                    ]
                }
                WeaponMode::Triple => {
                    let color = rgb(0x4ECDC4);
                    vec![
                        Projectile::bullet(x, center_y - 2.0, 8.0, 0.0, color),
                        Projectile::bullet(x, center_y - 12.0, 7.0, -1.0, color),
                        Projectile::bullet(x, center_y + 8.0, 7.0, 1.0, color),
                    ]
                }
            }
        };

        self.fire_cooldown = self.fire_rate;
        shots
    }

    pub fn set_weapon(&mut self, weapon: WeaponMode) {
        self.weapon = weapon;
    }

    /// Start or refresh a buff; re-pickups restart the timer
    pub fn activate_buff(&mut self, kind: BuffKind, duration: u32) {
        let buff = self.buffs.get_mut(kind);
        buff.active = duration > 0;
        buff.remaining = duration;
        self.recompute_modifiers();
    }

    pub fn is_shielded(&self) -> bool {
        self.buffs.shield.active
    }

    fn recompute_modifiers(&mut self) {
        let speed_multiplier = if self.buffs.speed.active { 2.0 } else { 1.0 };
        let fire_multiplier = if self.buffs.rapid.active { 0.3 } else { 1.0 };
        self.speed = self.base_speed * speed_multiplier;
        self.fire_rate = self.base_fire_interval * fire_multiplier;
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.body.integrate();

        let canvas = &ctx.config.canvas;
        let max = glam::Vec2::new(canvas.width, canvas.height) - self.body.size;
        self.body.pos = self.body.pos.clamp(glam::Vec2::ZERO, max.max(glam::Vec2::ZERO));

        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= 1.0;
        }

        for kind in BuffKind::ALL {
            self.buffs.get_mut(kind).tick();
        }
        self.recompute_modifiers();

        self.shield_phase += 0.2;
    }
}
