//! Game state and orchestrator data
//!
//! `GameState` owns every entity collection, the score, lives and stage
//! progress. Only the simulation mutates it; presentation reads `hud()`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::{Boss, BossInfo};
use super::combo::ComboTracker;
use super::enemy::Enemy;
use super::particles::ParticleSystem;
use super::player::{BuffKind, Player, WeaponMode};
use super::powerup::PowerUp;
use super::projectile::Projectile;
use crate::config::GameConfig;

/// Top-level screen / run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Title,
    /// Active gameplay
    Playing,
    /// Stage-clear announcement; entities drift but nothing spawns or collides
    StageClear,
    /// Viewing the leaderboard
    Ranking,
    /// Run ended (death or final stage cleared)
    GameOver,
}

/// Notable things that happened during a tick, drained by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyDestroyed { points: u64 },
    BossSpawned { stage: u32 },
    BossDefeated { stage: u32 },
    StageCleared { stage: u32, bonus: u64 },
    PowerUpCollected(super::powerup::PowerUpKind),
    PlayerHit { lives_left: u32 },
    MegaBombDetonated,
    GameOver { score: u64, all_stages_cleared: bool },
}

/// Boss line of the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct BossHud {
    pub info: BossInfo,
    /// 0.0..=1.0
    pub hp_fraction: f32,
}

/// Read-only view of the run for an external UI
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub weapon: WeaponMode,
    pub stage: u32,
    pub total_stages: u32,
    pub boss: Option<BossHud>,
    pub combo_count: u32,
    pub combo_multiplier: f64,
    pub combo_visible: bool,
    pub mega_bombs: u32,
    /// Active buffs with frames remaining
    pub buffs: Vec<(BuffKind, u32)>,
    /// Kills still needed to summon the boss; 0 once it is up
    pub kills_until_boss: u32,
    /// Frames left on the stage-clear announcement
    pub stage_clear_frames: u32,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub stage: u32,
    /// Kills counted toward this stage's boss
    pub kills_this_stage: u32,
    pub boss: Option<Boss>,
    /// Set once this stage's boss has appeared
    pub boss_spawned: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    /// Visual only
    pub particles: ParticleSystem,
    pub combo: ComboTracker,
    pub enemy_spawn_timer: u32,
    pub powerup_spawn_timer: u32,
    pub stage_clear_timer: u32,
    /// Frames left on the mega-bomb flash; rendering only
    pub mega_bomb_effect: u32,
    /// Final stage has fallen; the clear pause ends the run
    pub all_stages_cleared: bool,
    /// Simulation frames since the run started
    pub frame: u64,
    /// Wall clock of the current tick, used for combo timing
    pub(crate) now_ms: f64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(&config.player);
        let particles = ParticleSystem::new(config.particles.max_particles);
        let combo = ComboTracker::new(config.combo.clone());
        let lives = config.player.starting_lives;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            score: 0,
            lives,
            stage: 1,
            kills_this_stage: 0,
            boss: None,
            boss_spawned: false,
            player,
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            powerups: Vec::new(),
            particles,
            combo,
            enemy_spawn_timer: 0,
            powerup_spawn_timer: 0,
            stage_clear_timer: 0,
            mega_bomb_effect: 0,
            all_stages_cleared: false,
            frame: 0,
            now_ms: 0.0,
            events: Vec::new(),
            config,
        }
    }

    /// Discard everything from the previous run
    fn reset_run(&mut self) {
        self.score = 0;
        self.lives = self.config.player.starting_lives;
        self.stage = 1;
        self.kills_this_stage = 0;
        self.boss = None;
        self.boss_spawned = false;
        self.player = Player::new(&self.config.player);
        self.enemies.clear();
        self.player_shots.clear();
        self.enemy_shots.clear();
        self.powerups.clear();
        self.particles.clear();
        self.combo.reset();
        self.enemy_spawn_timer = 0;
        self.powerup_spawn_timer = 0;
        self.stage_clear_timer = 0;
        self.mega_bomb_effect = 0;
        self.all_stages_cleared = false;
        self.frame = 0;
        self.events.clear();
    }

    /// Begin a new run from any screen
    pub fn start_game(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run started ({} stages)", self.config.stages.total);
    }

    pub fn show_ranking(&mut self) {
        self.phase = GamePhase::Ranking;
    }

    pub fn show_title(&mut self) {
        self.phase = GamePhase::Title;
    }

    /// Abandon the current run without a game-over
    pub fn quit_to_title(&mut self) {
        if self.is_running() {
            log::info!("Run abandoned at stage {} with {} points", self.stage, self.score);
        }
        self.reset_run();
        self.phase = GamePhase::Title;
    }

    /// Playing or between stages
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::StageClear)
    }

    pub fn boss_active(&self) -> bool {
        self.boss.as_ref().is_some_and(|b| b.body.active)
    }

    pub fn kills_until_boss(&self) -> u32 {
        if self.boss_spawned {
            return 0;
        }
        self.config
            .stages
            .enemies_for_boss
            .saturating_sub(self.kills_this_stage)
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a combo kill worth `base` and bank the multiplied points
    pub(crate) fn score_kill(&mut self, base: u64) -> u64 {
        let points = self.combo.kill_and_score(base, self.now_ms);
        self.score += points;
        points
    }

    /// Flat award outside the combo
    pub(crate) fn award(&mut self, points: u64) {
        self.score += points;
    }

    /// One life lost; ends the run at zero
    pub(crate) fn damage_player(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo.on_damage();
        self.events.push(GameEvent::PlayerHit {
            lives_left: self.lives,
        });
        log::debug!("Player hit, {} lives left", self.lives);
        if self.lives == 0 {
            self.end_run();
        }
    }

    /// Boss down: the stage bonus scores as a combo kill, the final bonus
    /// on the last stage is flat
    pub(crate) fn clear_stage(&mut self) {
        let stages = &self.config.stages;
        let scoring = &self.config.scoring;
        let stage_base = scoring.stage_bonus * self.stage as u64;
        let final_bonus = scoring.final_bonus;
        let is_final = self.stage >= stages.total;
        let pause = stages.clear_pause_frames;

        let mut bonus = self.score_kill(stage_base);
        if is_final {
            self.award(final_bonus);
            bonus += final_bonus;
            self.all_stages_cleared = true;
        }
        self.boss = None;
        self.enemies.clear();
        self.enemy_shots.clear();
        self.stage_clear_timer = pause;
        self.phase = GamePhase::StageClear;
        self.events.push(GameEvent::StageCleared {
            stage: self.stage,
            bonus,
        });
        log::info!(
            "Stage {} cleared, bonus {bonus}{}",
            self.stage,
            if is_final { " (final)" } else { "" }
        );
    }

    /// Leave the stage-clear pause
    pub(crate) fn advance_stage(&mut self) {
        if self.all_stages_cleared {
            self.end_run();
            return;
        }
        self.stage += 1;
        self.kills_this_stage = 0;
        self.boss = None;
        self.boss_spawned = false;
        self.enemy_spawn_timer = 0;
        self.phase = GamePhase::Playing;
        log::info!("Stage {} start", self.stage);
    }

    fn end_run(&mut self) {
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            all_stages_cleared: self.all_stages_cleared,
        });
        log::info!(
            "Game over at stage {} with {} points{}",
            self.stage,
            self.score,
            if self.all_stages_cleared { ", all stages cleared" } else { "" }
        );
    }

    pub fn hud(&self) -> HudSnapshot {
        let boss = self.boss.as_ref().filter(|b| b.body.active).map(|b| BossHud {
            info: b.info(),
            hp_fraction: b.hp_fraction(),
        });
        let buffs = BuffKind::ALL
            .iter()
            .filter_map(|&kind| {
                let buff = self.player.buffs.get(kind);
                buff.active.then_some((kind, buff.remaining))
            })
            .collect();

        HudSnapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            weapon: self.player.weapon,
            stage: self.stage,
            total_stages: self.config.stages.total,
            boss,
            combo_count: self.combo.count,
            combo_multiplier: self.combo.multiplier,
            combo_visible: self.combo.is_displayed(),
            mega_bombs: self.player.mega_bombs,
            buffs,
            kills_until_boss: self.kills_until_boss(),
            stage_clear_frames: self.stage_clear_timer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.start_game();
        state
    }

    #[test]
    fn test_new_state_on_title() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.lives, 3);
        assert_eq!(state.stage, 1);
        assert!(!state.is_running());
    }

    #[test]
    fn test_screen_transitions() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.show_ranking();
        assert_eq!(state.phase, GamePhase::Ranking);
        state.show_title();
        assert_eq!(state.phase, GamePhase::Title);
        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_discards_run() {
        let mut state = running();
        state.score = 1234;
        state.stage = 2;
        state.lives = 1;
        state.quit_to_title();
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.score, 0);
        assert_eq!(state.stage, 1);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_damage_to_zero_ends_run() {
        let mut state = running();
        state.damage_player();
        state.damage_player();
        assert_eq!(state.phase, GamePhase::Playing);
        state.damage_player();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                all_stages_cleared: false,
                ..
            }
        )));
    }

    #[test]
    fn test_mid_stage_clear_advances() {
        let mut state = running();
        state.kills_this_stage = 15;
        state.boss_spawned = true;
        state.clear_stage();
        assert_eq!(state.score, 1000);
        assert_eq!(state.phase, GamePhase::StageClear);
        assert_eq!(state.stage_clear_timer, 180);

        state.advance_stage();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage, 2);
        assert_eq!(state.kills_this_stage, 0);
        assert!(!state.boss_spawned);
    }

    #[test]
    fn test_final_stage_clear_heads_to_game_over() {
        let mut state = running();
        state.stage = 3;
        state.clear_stage();
        assert_eq!(state.score, 3000 + 5000);
        assert!(state.all_stages_cleared);
        assert_eq!(state.phase, GamePhase::StageClear);

        state.advance_stage();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stage, 3);
    }

    #[test]
    fn test_stage_bonus_multiplied_final_bonus_flat() {
        let mut state = running();
        state.stage = 3;
        for _ in 0..5 {
            state.combo.register_kill(0.0);
        }
        state.clear_stage();
        // Sixth kill of the streak prices at x1.2
        assert_eq!(state.score, 3600 + 5000);
        assert_eq!(state.combo.count, 6);
        assert!(state.drain_events().contains(&GameEvent::StageCleared {
            stage: 3,
            bonus: 8600
        }));
    }

    #[test]
    fn test_hud_snapshot() {
        let mut state = running();
        state.kills_this_stage = 4;
        state.player.activate_buff(BuffKind::Rapid, 300);
        let hud = state.hud();
        assert_eq!(hud.kills_until_boss, 11);
        assert_eq!(hud.buffs, vec![(BuffKind::Rapid, 300)]);
        assert_eq!(hud.weapon, WeaponMode::Normal);
        assert!(hud.boss.is_none());

        state.boss = Some(Boss::new(1000.0, 360.0, 1, &state.config));
        state.boss_spawned = true;
        let hud = state.hud();
        let boss = hud.boss.expect("boss on hud");
        assert_eq!(boss.info.name, "Armored Heli");
        assert_eq!(boss.hp_fraction, 1.0);
        assert_eq!(hud.kills_until_boss, 0);
    }
}
