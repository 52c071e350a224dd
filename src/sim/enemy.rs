//! Regular enemies
//!
//! The archetype is picked from the stage table at spawn time and never
//! changes afterwards.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, UpdateCtx};
use super::geom::Body;
use super::projectile::Projectile;
use crate::config::{CombatConfig, EnemyConfig, EnemyMovePattern, GameConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub config: EnemyConfig,
    pub hp: i32,
    pub max_hp: i32,
    /// Horizontal speed rolled at spawn
    pub base_speed: f32,
    move_timer: u32,
    shoot_timer: u32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, stage: u32, config: &GameConfig, rng: &mut impl Rng) -> Self {
        Self::with_config(x, y, config.enemy_for_stage(stage).clone(), rng)
    }

    pub fn with_config(x: f32, y: f32, config: EnemyConfig, rng: &mut impl Rng) -> Self {
        let base_speed =
            config.speed.min + rng.random::<f32>() * (config.speed.max - config.speed.min);
        let mut body = Body::new(x, y, config.width, config.height);
        body.vel.x = -base_speed;

        match config.move_pattern {
            EnemyMovePattern::Straight => body.vel.y = 0.0,
            EnemyMovePattern::Wave => body.vel.y = (rng.random::<f32>() - 0.5) * 2.0,
            EnemyMovePattern::Zigzag => {
                body.vel.y = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            }
            EnemyMovePattern::Rush => {
                body.vel.x = -base_speed * 1.5;
                body.vel.y = (rng.random::<f32>() - 0.5) * 0.5;
            }
        }

        log::debug!("{} spawned at ({x:.0}, {y:.0})", config.name);

        Self {
            body,
            hp: config.hp,
            max_hp: config.hp,
            config,
            base_speed,
            move_timer: 0,
            shoot_timer: 0,
        }
    }

    /// Damage actually applied after armor
    pub fn effective_damage(&self, amount: i32) -> i32 {
        if self.config.special.tough_armor {
            (amount / 2).max(1)
        } else {
            amount
        }
    }

    /// Apply damage; returns true when this hit destroyed the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= self.effective_damage(amount);
        if self.hp <= 0 {
            self.body.active = false;
            log::debug!("{} destroyed", self.config.name);
            return true;
        }
        false
    }

    pub fn can_shoot_back(&self, combat: &CombatConfig) -> bool {
        self.config.special.shoots_back && self.shoot_timer >= combat.return_fire_cooldown
    }

    /// Leftward shot from the nose, if the cooldown allows one
    pub fn create_return_fire(&mut self, combat: &CombatConfig) -> Option<Projectile> {
        if !self.can_shoot_back(combat) {
            return None;
        }
        self.shoot_timer = 0;
        let x = self.body.pos.x - 10.0;
        let y = self.body.pos.y + self.body.size.y / 2.0;
        Some(Projectile::enemy(
            x,
            y,
            combat.return_fire_speed,
            0.0,
            self.config.color,
        ))
    }

    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    fn steer(&mut self, rng: &mut impl Rng) {
        match self.config.move_pattern {
            EnemyMovePattern::Straight => {}
            EnemyMovePattern::Wave => {
                self.body.vel.y = (self.move_timer as f32 * 0.1).sin() * 1.5;
            }
            EnemyMovePattern::Zigzag => {
                if self.move_timer % 60 == 0 {
                    self.body.vel.y = -self.body.vel.y;
                }
            }
            EnemyMovePattern::Rush => {
                if self.move_timer % 30 == 0 {
                    let nudge = (rng.random::<f32>() - 0.5) * 0.5;
                    self.body.vel.y = (self.body.vel.y + nudge).clamp(-2.0, 2.0);
                }
            }
        }
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.move_timer += 1;
        self.shoot_timer += 1;
        self.steer(&mut *ctx.rng);
        self.body.integrate();

        let p = self.body.pos;
        if p.x < -self.body.size.x || p.y < -self.body.size.y || p.y > ctx.config.canvas.height {
            self.body.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tick_n(enemy: &mut Enemy, config: &GameConfig, rng: &mut Pcg32, n: u32) {
        for _ in 0..n {
            let mut ctx = UpdateCtx {
                config,
                rng: &mut *rng,
            };
            enemy.update(&mut ctx);
        }
    }

    #[test]
    fn test_stage_selects_archetype() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(Enemy::new(1200.0, 100.0, 1, &config, &mut rng).config.kind, EnemyKind::Basic);
        assert_eq!(Enemy::new(1200.0, 100.0, 2, &config, &mut rng).config.kind, EnemyKind::Fighter);
        assert_eq!(Enemy::new(1200.0, 100.0, 3, &config, &mut rng).config.kind, EnemyKind::Bomber);
        assert_eq!(Enemy::new(1200.0, 100.0, 4, &config, &mut rng).config.kind, EnemyKind::Basic);
    }

    #[test]
    fn test_speed_within_range() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let e = Enemy::new(1200.0, 100.0, 1, &config, &mut rng);
            assert!((1.0..=2.0).contains(&e.base_speed));
            assert_eq!(e.body.vel.x, -e.base_speed);
            assert_eq!(e.body.vel.y, 0.0);
        }
    }

    #[test]
    fn test_armor_halves_damage_with_floor_of_one() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let bomber = Enemy::new(1200.0, 100.0, 3, &config, &mut rng);
        assert_eq!(bomber.effective_damage(1), 1);
        assert_eq!(bomber.effective_damage(4), 2);
        assert_eq!(bomber.effective_damage(5), 2);

        let basic = Enemy::new(1200.0, 100.0, 1, &config, &mut rng);
        assert_eq!(basic.effective_damage(4), 4);
    }

    #[test]
    fn test_bomber_takes_three_single_hits() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bomber = Enemy::new(1200.0, 100.0, 3, &config, &mut rng);
        assert_eq!(bomber.hp, 3);
        assert!(!bomber.take_damage(1));
        assert!(!bomber.take_damage(1));
        assert!(bomber.is_active());
        assert!(bomber.take_damage(1));
        assert!(bomber.hp <= 0);
        assert!(!bomber.is_active());
    }

    #[test]
    fn test_wave_pattern_oscillates() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fighter = Enemy::new(1200.0, 400.0, 2, &config, &mut rng);
        tick_n(&mut fighter, &config, &mut rng, 10);
        let expected = (10.0f32 * 0.1).sin() * 1.5;
        assert!((fighter.body.vel.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_zigzag_flips_every_sixty_frames() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(13);
        let mut bomber = Enemy::new(1200.0, 400.0, 3, &config, &mut rng);
        let initial = bomber.body.vel.y;
        tick_n(&mut bomber, &config, &mut rng, 59);
        assert_eq!(bomber.body.vel.y, initial);
        tick_n(&mut bomber, &config, &mut rng, 1);
        assert_eq!(bomber.body.vel.y, -initial);
        tick_n(&mut bomber, &config, &mut rng, 60);
        assert_eq!(bomber.body.vel.y, initial);
    }

    #[test]
    fn test_rush_stays_clamped() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(17);
        let mut scout = Enemy::with_config(1200.0, 400.0, EnemyConfig::scout(), &mut rng);
        assert!((scout.body.vel.x + scout.base_speed * 1.5).abs() < 1e-6);
        for _ in 0..600 {
            tick_n(&mut scout, &config, &mut rng, 1);
            assert!((-2.0..=2.0).contains(&scout.body.vel.y));
            scout.body.pos.y = 400.0;
        }
    }

    #[test]
    fn test_return_fire_cooldown() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(19);
        let mut fighter = Enemy::new(1100.0, 400.0, 2, &config, &mut rng);
        assert!(fighter.create_return_fire(&config.combat).is_none());

        tick_n(&mut fighter, &config, &mut rng, 120);
        let shot = fighter
            .create_return_fire(&config.combat)
            .expect("cooldown elapsed");
        assert_eq!(shot.body.vel.x, -3.0);
        assert_eq!(shot.body.vel.y, 0.0);
        assert!(fighter.create_return_fire(&config.combat).is_none());
    }

    #[test]
    fn test_non_shooter_never_fires() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(23);
        let mut basic = Enemy::new(1100.0, 400.0, 1, &config, &mut rng);
        tick_n(&mut basic, &config, &mut rng, 200);
        assert!(basic.create_return_fire(&config.combat).is_none());
    }

    #[test]
    fn test_deactivates_past_left_edge() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(29);
        let mut e = Enemy::new(-39.5, 400.0, 1, &config, &mut rng);
        tick_n(&mut e, &config, &mut rng, 1);
        assert!(!e.is_active());
    }
}
