//! Cosmetic particles
//!
//! Fire-and-forget emitters; nothing here feeds back into gameplay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Color, rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Spark,
    Trail,
    Fire,
    Smoke,
    Star,
    Fragment,
}

/// Emitter tuning for one particle kind
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub count: u32,
    pub speed: (f32, f32),
    pub size: (f32, f32),
    pub life: (f32, f32),
    pub colors: &'static [Color],
    pub gravity: Option<f32>,
    pub fade: bool,
}

const EXPLOSION_COLORS: &[Color] = &[
    rgb(0xFF6B35),
    rgb(0xF7931E),
    rgb(0xFFD23F),
    rgb(0xFF4757),
    rgb(0xFF3838),
];
const SPARK_COLORS: &[Color] = &[rgb(0xFFFFFF), rgb(0xFFFF00), rgb(0xFFA500), rgb(0xFF69B4)];
const TRAIL_COLORS: &[Color] = &[rgb(0x00BFFF), rgb(0x0080FF), rgb(0x4169E1), rgb(0x1E90FF)];
const FIRE_COLORS: &[Color] = &[rgb(0xFF4500), rgb(0xFF6347), rgb(0xFFD700), rgb(0xFFA500)];
const SMOKE_COLORS: &[Color] = &[rgb(0x696969), rgb(0xA9A9A9), rgb(0x808080), rgb(0xD3D3D3)];
const STAR_COLORS: &[Color] = &[rgb(0xFFD700), rgb(0xFFFF00), rgb(0xFFFFFF), rgb(0xF0E68C)];
const FRAGMENT_COLORS: &[Color] = &[rgb(0x8B4513), rgb(0xA0522D), rgb(0xCD853F), rgb(0xDEB887)];

impl ParticleKind {
    pub fn preset(self) -> Preset {
        match self {
            ParticleKind::Explosion => Preset {
                count: 20,
                speed: (2.0, 8.0),
                size: (2.0, 6.0),
                life: (20.0, 40.0),
                colors: EXPLOSION_COLORS,
                gravity: Some(0.1),
                fade: true,
            },
            ParticleKind::Spark => Preset {
                count: 15,
                speed: (1.0, 5.0),
                size: (1.0, 3.0),
                life: (15.0, 30.0),
                colors: SPARK_COLORS,
                gravity: Some(0.05),
                fade: true,
            },
            ParticleKind::Trail => Preset {
                count: 5,
                speed: (0.5, 2.0),
                size: (1.0, 4.0),
                life: (10.0, 20.0),
                colors: TRAIL_COLORS,
                gravity: None,
                fade: true,
            },
            ParticleKind::Fire => Preset {
                count: 12,
                speed: (1.0, 4.0),
                size: (2.0, 5.0),
                life: (25.0, 45.0),
                colors: FIRE_COLORS,
                gravity: Some(-0.1),
                fade: true,
            },
            ParticleKind::Smoke => Preset {
                count: 8,
                speed: (0.5, 2.0),
                size: (3.0, 8.0),
                life: (30.0, 60.0),
                colors: SMOKE_COLORS,
                gravity: Some(-0.05),
                fade: true,
            },
            ParticleKind::Star => Preset {
                count: 10,
                speed: (1.0, 3.0),
                size: (1.0, 3.0),
                life: (20.0, 40.0),
                colors: STAR_COLORS,
                gravity: None,
                fade: true,
            },
            ParticleKind::Fragment => Preset {
                count: 25,
                speed: (3.0, 10.0),
                size: (1.0, 4.0),
                life: (15.0, 35.0),
                colors: FRAGMENT_COLORS,
                gravity: Some(0.2),
                fade: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
    pub color: Color,
    pub kind: ParticleKind,
    pub gravity: Option<f32>,
    pub fade: bool,
}

impl Particle {
    /// Opacity for drawing
    pub fn alpha(&self) -> f32 {
        if self.fade && self.max_life > 0 {
            self.life as f32 / self.max_life as f32
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    max_particles: usize,
}

fn between(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
        }
    }

    /// Burst of `kind` particles spread radially, scaled in count, speed and size
    pub fn create_effect(&mut self, pos: Vec2, kind: ParticleKind, scale: f32, rng: &mut impl Rng) {
        let preset = kind.preset();
        let count = (preset.count as f32 * scale).floor() as u32;

        for i in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = std::f32::consts::TAU * i as f32 / count as f32
                + (rng.random::<f32>() - 0.5) * 0.5;
            let speed = between(rng, preset.speed) * scale;
            let size = between(rng, preset.size) * scale;
            let life = between(rng, preset.life).floor().max(1.0) as u32;
            let color = preset.colors[rng.random_range(0..preset.colors.len())];

            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
                size,
                color,
                kind,
                gravity: preset.gravity,
                fade: preset.fade,
            });
        }
    }

    /// Enemy destroyed
    pub fn explosion(&mut self, pos: Vec2, scale: f32, rng: &mut impl Rng) {
        self.create_effect(pos, ParticleKind::Explosion, scale, rng);
        self.create_effect(pos, ParticleKind::Spark, scale * 0.7, rng);
    }

    pub fn power_up_effect(&mut self, pos: Vec2, rng: &mut impl Rng) {
        self.create_effect(pos, ParticleKind::Star, 1.2, rng);
        self.create_effect(pos, ParticleKind::Spark, 0.8, rng);
    }

    pub fn boss_explosion(&mut self, pos: Vec2, rng: &mut impl Rng) {
        self.create_effect(pos, ParticleKind::Explosion, 2.5, rng);
        self.create_effect(pos, ParticleKind::Fire, 1.8, rng);
        self.create_effect(pos, ParticleKind::Fragment, 1.5, rng);
        self.create_effect(pos, ParticleKind::Smoke, 1.2, rng);
    }

    /// Emits on roughly 30% of calls
    pub fn bullet_trail(&mut self, pos: Vec2, rng: &mut impl Rng) {
        if rng.random::<f32>() < 0.3 {
            self.create_effect(pos, ParticleKind::Trail, 0.5, rng);
        }
    }

    pub fn hit_effect(&mut self, pos: Vec2, rng: &mut impl Rng) {
        self.create_effect(pos, ParticleKind::Spark, 0.6, rng);
    }

    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            if let Some(g) = p.gravity {
                p.vel.y += g;
            }
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_effect_count_scales() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new(1000);
        ps.create_effect(Vec2::ZERO, ParticleKind::Explosion, 1.0, &mut rng);
        assert_eq!(ps.len(), 20);
        ps.create_effect(Vec2::ZERO, ParticleKind::Spark, 0.6, &mut rng);
        assert_eq!(ps.len(), 29);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ps = ParticleSystem::new(1000);
        ps.boss_explosion(Vec2::new(600.0, 400.0), &mut rng);
        assert!(!ps.is_empty());
        // Lifetimes are not scaled; smoke tops out at 60 frames
        for _ in 0..60 {
            ps.update();
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_gravity_and_fade() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::new(1000);
        ps.create_effect(Vec2::ZERO, ParticleKind::Fragment, 1.0, &mut rng);
        let before: Vec<f32> = ps.particles.iter().map(|p| p.vel.y).collect();
        ps.update();
        for (p, vy) in ps.particles.iter().zip(before) {
            assert!((p.vel.y - (vy + 0.2)).abs() < 1e-5);
            assert!(p.alpha() < 1.0);
        }
    }

    #[test]
    fn test_cap_drops_overflow() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ps = ParticleSystem::new(30);
        ps.boss_explosion(Vec2::ZERO, &mut rng);
        assert_eq!(ps.len(), 30);
    }
}
