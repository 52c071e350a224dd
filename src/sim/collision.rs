//! Per-frame collision resolution
//!
//! Runs once after every entity has moved, in a fixed order so a single shot
//! is never counted against two targets. Hits only flip `active`; the
//! collections are reaped afterwards.

use super::entity::Entity;
use super::player::BuffKind;
use super::powerup::PowerUpKind;
use super::state::{GameEvent, GamePhase, GameState};

/// What the pass did, for callers that care
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub enemies_destroyed: u32,
    pub boss_hits: u32,
    pub player_hits: u32,
    pub pickups: u32,
}

/// Resolve every interaction for this frame
pub fn resolve_collisions(state: &mut GameState) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    shots_vs_enemies(state, &mut outcome);
    shots_vs_boss(state, &mut outcome);

    if !state.player.is_shielded() {
        player_vs_enemies(state, &mut outcome);
        player_vs_enemy_shots(state, &mut outcome);
        player_vs_boss(state, &mut outcome);
    }
    if state.phase == GamePhase::GameOver {
        return outcome;
    }

    player_vs_powerups(state, &mut outcome);
    outcome
}

fn shots_vs_enemies(state: &mut GameState, outcome: &mut CollisionOutcome) {
    let damage = state.config.combat.enemy_hit_damage;

    for si in 0..state.player_shots.len() {
        let shot = &state.player_shots[si];
        if !shot.is_active() {
            continue;
        }
        let Some(ei) = state
            .enemies
            .iter()
            .position(|e| e.is_active() && shot.check_collision(e))
        else {
            continue;
        };

        state.player_shots[si].deactivate();
        let enemy = &mut state.enemies[ei];
        let center = enemy.body.center();
        if enemy.take_damage(damage) {
            let base = enemy.config.score;
            let points = state.score_kill(base);
            state.kills_this_stage += 1;
            state.particles.explosion(center, 1.0, &mut state.rng);
            state.events.push(GameEvent::EnemyDestroyed { points });
            outcome.enemies_destroyed += 1;
        } else {
            state.particles.hit_effect(center, &mut state.rng);
        }
    }
}

/// At most one shot lands on the boss per frame
fn shots_vs_boss(state: &mut GameState, outcome: &mut CollisionOutcome) {
    let damage = state.config.combat.boss_hit_damage;
    let base = state.config.scoring.boss_hit;

    let Some(boss) = state.boss.as_mut().filter(|b| b.is_active()) else {
        return;
    };
    let Some(si) = state
        .player_shots
        .iter()
        .position(|s| s.is_active() && s.check_collision(&*boss))
    else {
        return;
    };

    let hit_at = state.player_shots[si].body.center();
    state.player_shots[si].deactivate();
    let defeated = boss.take_damage(damage);
    let stage = boss.stage();
    let center = boss.body.center();

    state.score_kill(base);
    state.particles.hit_effect(hit_at, &mut state.rng);
    outcome.boss_hits += 1;

    if defeated {
        state.particles.boss_explosion(center, &mut state.rng);
        state.events.push(GameEvent::BossDefeated { stage });
        state.clear_stage();
    }
}

fn player_vs_enemies(state: &mut GameState, outcome: &mut CollisionOutcome) {
    for ei in 0..state.enemies.len() {
        if state.phase == GamePhase::GameOver {
            return;
        }
        let enemy = &state.enemies[ei];
        if !enemy.is_active() || !state.player.check_collision(enemy) {
            continue;
        }
        let center = enemy.body.center();
        state.enemies[ei].deactivate();
        state.particles.explosion(center, 1.0, &mut state.rng);
        state.damage_player();
        outcome.player_hits += 1;
    }
}

fn player_vs_enemy_shots(state: &mut GameState, outcome: &mut CollisionOutcome) {
    for si in 0..state.enemy_shots.len() {
        if state.phase == GamePhase::GameOver {
            return;
        }
        let shot = &state.enemy_shots[si];
        if !shot.is_active() || !state.player.check_collision(shot) {
            continue;
        }
        let at = shot.body.center();
        state.enemy_shots[si].deactivate();
        state.particles.hit_effect(at, &mut state.rng);
        state.damage_player();
        outcome.player_hits += 1;
    }
}

fn player_vs_boss(state: &mut GameState, outcome: &mut CollisionOutcome) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    let touching = state
        .boss
        .as_ref()
        .is_some_and(|b| b.is_active() && state.player.check_collision(b));
    if touching {
        state.damage_player();
        outcome.player_hits += 1;
    }
}

fn player_vs_powerups(state: &mut GameState, outcome: &mut CollisionOutcome) {
    let bonus = state.config.scoring.pickup_bonus;

    for pi in 0..state.powerups.len() {
        let powerup = &state.powerups[pi];
        if !powerup.is_active() || !state.player.check_collision(powerup) {
            continue;
        }
        let kind = powerup.kind;
        let center = powerup.body.center();
        state.powerups[pi].deactivate();

        apply_powerup(state, kind);
        state.award(bonus);
        state.particles.power_up_effect(center, &mut state.rng);
        state.events.push(GameEvent::PowerUpCollected(kind));
        outcome.pickups += 1;
    }
}

/// Apply a collected power-up to the player or the field
pub(crate) fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    let duration = state.config.player.buff_duration;
    let player = &mut state.player;

    match kind {
        PowerUpKind::Double => player.set_weapon(super::player::WeaponMode::Double),
        PowerUpKind::Triple => player.set_weapon(super::player::WeaponMode::Triple),
        PowerUpKind::Shield => player.activate_buff(BuffKind::Shield, duration),
        PowerUpKind::Beam => player.activate_buff(BuffKind::Beam, duration),
        PowerUpKind::Speed => player.activate_buff(BuffKind::Speed, duration),
        PowerUpKind::Rapid => player.activate_buff(BuffKind::Rapid, duration),
        PowerUpKind::Life => state.lives += 1,
        PowerUpKind::MegaBomb => player.mega_bombs += 1,
        PowerUpKind::Bomb => detonate_bomb(state),
    }
    log::debug!("Power-up {kind:?} collected");
}

/// Regular bomb: every on-screen enemy is destroyed for a flat per-enemy
/// base score. These kills do not count toward the boss.
fn detonate_bomb(state: &mut GameState) {
    let base = state.config.scoring.bomb_kill;
    for ei in 0..state.enemies.len() {
        if !state.enemies[ei].is_active() {
            continue;
        }
        state.enemies[ei].deactivate();
        let center = state.enemies[ei].body.center();
        let points = state.score_kill(base);
        state.particles.explosion(center, 1.0, &mut state.rng);
        state.events.push(GameEvent::EnemyDestroyed { points });
    }
}
