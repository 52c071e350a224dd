//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one frame. Every timer in the game is
//! a frame count; only the combo window reads the wall clock passed in.

use glam::Vec2;
use rand::Rng;

use super::boss::Boss;
use super::collision::resolve_collisions;
use super::enemy::Enemy;
use super::entity::{Entity, UpdateCtx, reap, update_and_reap};
use super::powerup::{POWERUP_SIZE, PowerUp, PowerUpKind};
use super::projectile::ProjectileKind;
use super::state::{GameEvent, GamePhase, GameState};

/// Where each stage boss enters
const BOSS_SPAWN: Vec2 = Vec2::new(1000.0, 360.0);

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held: fire whenever the cooldown allows
    pub fire: bool,
    /// Edge-triggered mega-bomb request
    pub bomb: bool,
    /// Demo mode - the autopilot flies the ship
    pub idle_mode: bool,
}

impl TickInput {
    /// Combine two input sources; any source holding an intent wins
    pub fn merge(self, other: TickInput) -> TickInput {
        TickInput {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            fire: self.fire || other.fire,
            bomb: self.bomb || other.bomb,
            idle_mode: self.idle_mode || other.idle_mode,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    state.now_ms = now_ms;

    match state.phase {
        GamePhase::Playing => {}
        GamePhase::StageClear => {
            tick_stage_clear(state, input);
            return;
        }
        GamePhase::Title | GamePhase::Ranking | GamePhase::GameOver => return,
    }

    state.frame += 1;

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        *input
    };

    state
        .player
        .steer(input.up, input.down, input.left, input.right);
    if input.fire {
        let shots = state.player.fire();
        state.player_shots.extend(shots);
    }
    if input.bomb {
        trigger_mega_bomb(state);
    }
    if state.phase != GamePhase::Playing {
        // A mega-bomb just felled the boss
        return;
    }

    spawn_enemies(state);
    spawn_boss(state);
    spawn_powerups(state);

    update_entities(state);
    state.combo.update(now_ms);
    state.mega_bomb_effect = state.mega_bomb_effect.saturating_sub(1);

    resolve_collisions(state);

    reap(&mut state.enemies);
    reap(&mut state.player_shots);
    reap(&mut state.enemy_shots);
    reap(&mut state.powerups);
}

/// Announcement pause: things drift, nothing spawns or collides
fn tick_stage_clear(state: &mut GameState, input: &TickInput) {
    state
        .player
        .steer(input.up, input.down, input.left, input.right);

    let mut ctx = UpdateCtx {
        config: &state.config,
        rng: &mut state.rng,
    };
    state.player.update(&mut ctx);
    update_and_reap(&mut state.player_shots, &mut ctx);
    update_and_reap(&mut state.powerups, &mut ctx);
    state.particles.update();
    state.combo.update(state.now_ms);
    state.mega_bomb_effect = state.mega_bomb_effect.saturating_sub(1);

    state.stage_clear_timer = state.stage_clear_timer.saturating_sub(1);
    if state.stage_clear_timer == 0 {
        state.advance_stage();
    }
}

/// Move everything in the fixed order: player, enemies, player shots,
/// enemy shots, power-ups, boss, particles
fn update_entities(state: &mut GameState) {
    let mut ctx = UpdateCtx {
        config: &state.config,
        rng: &mut state.rng,
    };

    state.player.update(&mut ctx);

    for enemy in state.enemies.iter_mut() {
        enemy.update(&mut ctx);
        if enemy.is_active()
            && let Some(shot) = enemy.create_return_fire(&ctx.config.combat)
        {
            state.enemy_shots.push(shot);
        }
    }

    for shot in state.player_shots.iter_mut() {
        shot.update(&mut ctx);
        if shot.is_active() && shot.kind == ProjectileKind::Beam {
            state.particles.bullet_trail(shot.body.center(), &mut *ctx.rng);
        }
    }

    for shot in state.enemy_shots.iter_mut() {
        shot.update(&mut ctx);
    }

    for powerup in state.powerups.iter_mut() {
        powerup.update(&mut ctx);
    }

    if let Some(boss) = state.boss.as_mut().filter(|b| b.is_active()) {
        state.enemy_shots.extend(boss.update_attack());
        boss.update(&mut ctx);
    }

    state.particles.update();
}

/// Timer-gated enemy spawner, silent while a boss is up
fn spawn_enemies(state: &mut GameState) {
    if state.boss_active() {
        return;
    }

    state.enemy_spawn_timer += 1;
    if state.enemy_spawn_timer <= state.config.spawn.enemy_interval(state.stage) {
        return;
    }
    state.enemy_spawn_timer = 0;

    let canvas = &state.config.canvas;
    let height = state.config.enemy_for_stage(state.stage).height;
    let y = state.rng.random::<f32>() * (canvas.height - height).max(0.0);
    let enemy = Enemy::new(canvas.width, y, state.stage, &state.config, &mut state.rng);
    state.enemies.push(enemy);
}

/// Summon this stage's boss once enough kills are banked
fn spawn_boss(state: &mut GameState) {
    if state.boss_spawned || state.kills_this_stage < state.config.stages.enemies_for_boss {
        return;
    }
    state.boss = Some(Boss::new(BOSS_SPAWN.x, BOSS_SPAWN.y, state.stage, &state.config));
    state.boss_spawned = true;
    state.events.push(GameEvent::BossSpawned { stage: state.stage });
}

fn spawn_powerups(state: &mut GameState) {
    state.powerup_spawn_timer += 1;
    if state.powerup_spawn_timer <= state.config.spawn.powerup_interval {
        return;
    }
    state.powerup_spawn_timer = 0;

    let canvas = &state.config.canvas;
    let kind = PowerUpKind::random(&mut state.rng);
    let y = state.rng.random::<f32>() * (canvas.height - POWERUP_SIZE).max(0.0);
    log::debug!("Power-up {kind:?} spawned");
    state.powerups.push(PowerUp::new(canvas.width, y, kind));
}

/// Screen-clearing special attack.
///
/// Needs a charge and no flash already playing. Destroys every enemy at a
/// multiplied score, strikes the boss and wipes hostile fire. Returns
/// whether it went off.
pub fn trigger_mega_bomb(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing
        || state.player.mega_bombs == 0
        || state.mega_bomb_effect > 0
    {
        return false;
    }

    state.player.mega_bombs -= 1;
    let bomb = state.config.mega_bomb.clone();
    log::info!("Mega-bomb detonated, {} charges left", state.player.mega_bombs);

    for ei in 0..state.enemies.len() {
        let enemy = &mut state.enemies[ei];
        if !enemy.is_active() {
            continue;
        }
        enemy.deactivate();
        let base = enemy.config.score * bomb.enemy_score_factor;
        let center = enemy.body.center();
        let points = state.score_kill(base);
        state.kills_this_stage += 1;
        state.particles.explosion(center, 1.5, &mut state.rng);
        state.events.push(GameEvent::EnemyDestroyed { points });
    }

    for shot in state.enemy_shots.iter_mut() {
        shot.deactivate();
    }

    state.mega_bomb_effect = bomb.effect_frames;
    state.events.push(GameEvent::MegaBombDetonated);

    if let Some(boss) = state.boss.as_mut().filter(|b| b.is_active()) {
        let defeated = boss.take_damage(bomb.boss_damage);
        let stage = boss.stage();
        let center = boss.body.center();
        state.score_kill(bomb.boss_score);
        if defeated {
            state.particles.boss_explosion(center, &mut state.rng);
            state.events.push(GameEvent::BossDefeated { stage });
            state.clear_stage();
        } else {
            state.particles.explosion(center, 2.0, &mut state.rng);
        }
    }

    true
}

/// Simple demo pilot: line up with the nearest threat, sidestep incoming
/// fire, keep shooting, and bomb when swarmed
pub fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player.body;
    let center = player.center();
    let reach = player.size.y / 2.0;

    let target_y = match state.boss.as_ref().filter(|b| b.is_active()) {
        Some(boss) => boss.body.center().y,
        None => state
            .enemies
            .iter()
            .filter(|e| e.is_active() && e.body.pos.x > center.x)
            .min_by(|a, b| a.body.pos.x.total_cmp(&b.body.pos.x))
            .map(|e| e.body.center().y)
            .unwrap_or(state.config.canvas.height / 2.0),
    };

    let threat = state.enemy_shots.iter().find(|s| {
        let d = s.body.center() - center;
        d.x > -10.0 && d.x < 160.0 && d.y.abs() < reach + 20.0
    });

    let (up, down) = match threat {
        Some(shot) if shot.body.center().y >= center.y => (true, false),
        Some(_) => (false, true),
        None => (target_y < center.y - 8.0, target_y > center.y + 8.0),
    };

    let active_enemies = state.enemies.iter().filter(|e| e.is_active()).count();

    TickInput {
        up,
        down,
        left: player.pos.x > 140.0,
        right: player.pos.x < 60.0,
        fire: true,
        bomb: active_enemies >= 6 || (state.boss_active() && state.player.mega_bombs > 0),
        idle_mode: true,
    }
}
