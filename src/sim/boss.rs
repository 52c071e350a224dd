//! Stage bosses
//!
//! One boss per stage, confined to a box on the right side of the field.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, UpdateCtx};
use super::geom::Body;
use super::projectile::Projectile;
use crate::config::{AttackPattern, BossConfig, BossMovePattern, GameConfig};
use crate::rgb;

pub const BOSS_WIDTH: f32 = 120.0;
pub const BOSS_HEIGHT: f32 = 80.0;

/// Frames each sub-pattern of the complex movement lasts
const COMPLEX_PHASE_FRAMES: u32 = 180;

/// Read-only details for the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct BossInfo {
    pub name: String,
    pub description: String,
    pub stage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexPhase {
    Zigzag,
    FigureEight,
    Spiral,
}

impl ComplexPhase {
    fn next(self) -> Self {
        match self {
            ComplexPhase::Zigzag => ComplexPhase::FigureEight,
            ComplexPhase::FigureEight => ComplexPhase::Spiral,
            ComplexPhase::Spiral => ComplexPhase::Zigzag,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub config: BossConfig,
    pub hp: i32,
    pub max_hp: i32,
    pub phase: ComplexPhase,
    move_timer: u32,
    fire_timer: u32,
    pattern_timer: u32,
}

impl Boss {
    pub fn new(x: f32, y: f32, stage: u32, config: &GameConfig) -> Self {
        let config = config.boss_for_stage(stage);
        log::info!("Boss '{}' appears (stage {stage}, {} hp)", config.name, config.hp);
        Self {
            body: Body::new(x, y, BOSS_WIDTH, BOSS_HEIGHT).with_velocity(-0.5, 0.0),
            hp: config.hp,
            max_hp: config.hp,
            config,
            phase: ComplexPhase::Zigzag,
            move_timer: 0,
            fire_timer: 0,
            pattern_timer: 0,
        }
    }

    pub fn stage(&self) -> u32 {
        self.config.stage
    }

    pub fn info(&self) -> BossInfo {
        BossInfo {
            name: self.config.name.clone(),
            description: self.config.description.clone(),
            stage: self.config.stage,
        }
    }

    /// Remaining health in 0.0..=1.0
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Apply damage; returns true when this hit defeated the boss
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        if self.hp <= 0 {
            self.body.active = false;
            log::info!("Boss '{}' defeated", self.config.name);
            return true;
        }
        false
    }

    /// Emit a volley when the fire interval has elapsed
    pub fn update_attack(&mut self) -> Vec<Projectile> {
        if self.fire_timer < self.config.fire_interval {
            return Vec::new();
        }
        self.fire_timer = 0;

        let x = self.body.pos.x - 20.0;
        let y = self.body.pos.y + self.body.size.y / 2.0;
        match self.config.attack {
            AttackPattern::Single => vec![Projectile::enemy(x, y, -5.0, 0.0, rgb(0xFF4500))],
            AttackPattern::Triple => {
                let color = rgb(0xFF00FF);
                vec![
                    Projectile::enemy(x, y, -5.0, 0.0, color),
                    Projectile::enemy(x, y, -4.0, -2.0, color),
                    Projectile::enemy(x, y, -4.0, 2.0, color),
                ]
            }
            AttackPattern::Spread => (-2..=2)
                .map(|i| Projectile::enemy(x, y, -4.0, i as f32 * 1.5, rgb(0xDC143C)))
                .collect(),
        }
    }

    fn steer(&mut self) {
        let t = self.move_timer as f32;
        let vel = &mut self.body.vel;
        match self.config.movement {
            BossMovePattern::Vertical => {
                vel.x = 0.0;
                vel.y = (t * 0.05).sin() * 1.5;
            }
            BossMovePattern::Circle => {
                vel.x = (t * 0.03).sin();
                vel.y = (t * 0.03).cos() * 1.5;
            }
            BossMovePattern::Complex => {
                if self.pattern_timer > COMPLEX_PHASE_FRAMES {
                    self.phase = self.phase.next();
                    self.pattern_timer = 0;
                }
                match self.phase {
                    ComplexPhase::Zigzag => {
                        vel.x = (t * 0.1).sin() * 0.8;
                        vel.y = if self.move_timer % 120 < 60 { 1.5 } else { -1.5 };
                    }
                    ComplexPhase::FigureEight => {
                        vel.x = (t * 0.04).sin() * 1.2;
                        vel.y = (t * 0.08).sin() * 2.0;
                    }
                    ComplexPhase::Spiral => {
                        let radius = (t * 0.02).sin() * 0.5 + 0.5;
                        vel.x = (t * 0.06).cos() * radius;
                        vel.y = (t * 0.06).sin() * radius * 2.0;
                    }
                }
            }
        }
    }
}

impl Entity for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.move_timer += 1;
        self.fire_timer += 1;
        self.pattern_timer += 1;

        self.steer();
        self.body.integrate();

        let arena = &ctx.config.combat;
        self.body.pos.x = self.body.pos.x.clamp(arena.boss_arena_min_x, arena.boss_arena_max_x);
        self.body.pos.y = self.body.pos.y.clamp(arena.boss_arena_min_y, arena.boss_arena_max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(boss: &mut Boss, config: &GameConfig, frames: u32) {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..frames {
            let mut ctx = UpdateCtx {
                config,
                rng: &mut rng,
            };
            boss.update(&mut ctx);
        }
    }

    #[test]
    fn test_stage_configs() {
        let config = GameConfig::default();
        let boss = Boss::new(1000.0, 360.0, 1, &config);
        assert_eq!(boss.hp, 150);
        assert_eq!(boss.info().stage, 1);
        assert_eq!(boss.hp_fraction(), 1.0);

        let unknown = Boss::new(1000.0, 360.0, 7, &config);
        assert_eq!(unknown.hp, 550);
    }

    #[test]
    fn test_attack_patterns() {
        let config = GameConfig::default();
        for (stage, count) in [(1, 1), (2, 3), (3, 5)] {
            let mut boss = Boss::new(1000.0, 360.0, stage, &config);
            assert!(boss.update_attack().is_empty());
            let interval = boss.config.fire_interval;
            run(&mut boss, &config, interval);
            let volley = boss.update_attack();
            assert_eq!(volley.len(), count, "stage {stage}");
            assert!(volley.iter().all(|b| b.body.vel.x < 0.0));
            assert!(boss.update_attack().is_empty(), "timer resets after a volley");
        }
    }

    #[test]
    fn test_spread_vertical_components_evenly_spaced() {
        let config = GameConfig::default();
        let mut boss = Boss::new(1000.0, 360.0, 3, &config);
        run(&mut boss, &config, 30);
        let ys: Vec<f32> = boss.update_attack().iter().map(|b| b.body.vel.y).collect();
        assert_eq!(ys, vec![-3.0, -1.5, 0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_damage_and_defeat() {
        let config = GameConfig::default();
        let mut boss = Boss::new(1000.0, 360.0, 1, &config);
        for _ in 0..14 {
            assert!(!boss.take_damage(10));
        }
        assert!((boss.hp_fraction() - 10.0 / 150.0).abs() < 1e-6);
        assert!(boss.take_damage(10));
        assert!(!boss.is_active());
        assert_eq!(boss.hp_fraction(), 0.0);
    }

    #[test]
    fn test_complex_cycles_sub_patterns() {
        let config = GameConfig::default();
        let mut boss = Boss::new(1000.0, 360.0, 3, &config);
        assert_eq!(boss.phase, ComplexPhase::Zigzag);
        run(&mut boss, &config, 181);
        assert_eq!(boss.phase, ComplexPhase::FigureEight);
        run(&mut boss, &config, 181);
        assert_eq!(boss.phase, ComplexPhase::Spiral);
        run(&mut boss, &config, 181);
        assert_eq!(boss.phase, ComplexPhase::Zigzag);
    }

    proptest! {
        #[test]
        fn prop_boss_stays_in_arena(
            stage in 1u32..5,
            x in -2000.0f32..3000.0,
            y in -2000.0f32..3000.0,
            frames in 1u32..400,
        ) {
            let config = GameConfig::default();
            let mut boss = Boss::new(1000.0, 360.0, stage, &config);
            boss.body.pos = Vec2::new(x, y);
            run(&mut boss, &config, frames);
            prop_assert!((800.0..=1100.0).contains(&boss.body.pos.x));
            prop_assert!((50.0..=700.0).contains(&boss.body.pos.y));
        }
    }
}
