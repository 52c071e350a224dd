//! Game balance tables
//!
//! Built once at startup and handed to the simulation by reference. The
//! defaults are the shipped tables; a JSON document can override any subset.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{Color, rgb};

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Fighter,
    Bomber,
    Scout,
}

/// How an enemy steers after spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyMovePattern {
    Straight,
    Wave,
    Zigzag,
    Rush,
}

/// Optional enemy abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySpecial {
    /// Fires a leftward bullet on a cooldown
    pub shoots_back: bool,
    /// Halves incoming damage (minimum 1)
    pub tough_armor: bool,
}

/// Inclusive float range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub kind: EnemyKind,
    pub name: String,
    pub hp: i32,
    pub speed: Range,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub score: u64,
    pub move_pattern: EnemyMovePattern,
    #[serde(default)]
    pub special: EnemySpecial,
}

impl EnemyConfig {
    pub fn basic() -> Self {
        Self {
            kind: EnemyKind::Basic,
            name: "Recon Plane".to_string(),
            hp: 1,
            speed: Range { min: 1.0, max: 2.0 },
            width: 40.0,
            height: 30.0,
            color: rgb(0xE74C3C),
            score: 100,
            move_pattern: EnemyMovePattern::Straight,
            special: EnemySpecial::default(),
        }
    }

    pub fn fighter() -> Self {
        Self {
            kind: EnemyKind::Fighter,
            name: "Gunship".to_string(),
            hp: 2,
            speed: Range { min: 0.5, max: 1.5 },
            width: 45.0,
            height: 35.0,
            color: rgb(0xFF6B35),
            score: 150,
            move_pattern: EnemyMovePattern::Wave,
            special: EnemySpecial {
                shoots_back: true,
                tough_armor: false,
            },
        }
    }

    pub fn bomber() -> Self {
        Self {
            kind: EnemyKind::Bomber,
            name: "Heavy Bomber".to_string(),
            hp: 3,
            speed: Range { min: 0.8, max: 1.2 },
            width: 60.0,
            height: 40.0,
            color: rgb(0x8B4513),
            score: 200,
            move_pattern: EnemyMovePattern::Zigzag,
            special: EnemySpecial {
                shoots_back: false,
                tough_armor: true,
            },
        }
    }

    /// Fast interceptor; not in the default stage table
    pub fn scout() -> Self {
        Self {
            kind: EnemyKind::Scout,
            name: "Scout".to_string(),
            hp: 1,
            speed: Range { min: 2.0, max: 3.0 },
            width: 35.0,
            height: 25.0,
            color: rgb(0x27AE60),
            score: 120,
            move_pattern: EnemyMovePattern::Rush,
            special: EnemySpecial::default(),
        }
    }
}

/// Boss bullet patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackPattern {
    /// One straight shot
    Single,
    /// Three-way spread
    Triple,
    /// Five-way fan
    Spread,
}

/// Boss movement patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossMovePattern {
    Vertical,
    Circle,
    /// Cycles zigzag, figure-eight and spiral
    Complex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    pub stage: u32,
    pub name: String,
    pub description: String,
    pub hp: i32,
    pub color: Color,
    /// Frames between volleys
    pub fire_interval: u32,
    pub attack: AttackPattern,
    pub movement: BossMovePattern,
}

impl BossConfig {
    /// Stand-in for stages without a table entry
    pub fn fallback(stage: u32) -> Self {
        Self {
            stage,
            name: format!("Unknown Threat Lv.{stage}"),
            description: format!("Unlisted stage {stage} boss"),
            hp: 200 + 50 * stage as i32,
            color: rgb(0x666666),
            fire_interval: 50,
            attack: AttackPattern::Single,
            movement: BossMovePattern::Vertical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: crate::consts::CANVAS_WIDTH,
            height: crate::consts::CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_speed: f32,
    /// Frames between shots before buffs
    pub base_fire_interval: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    pub starting_lives: u32,
    /// Frames a timed power-up lasts
    pub buff_duration: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.0,
            base_fire_interval: 10.0,
            start_x: 50.0,
            start_y: 380.0,
            width: 60.0,
            height: 40.0,
            starting_lives: 3,
            buff_duration: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
    pub total: u32,
    /// Kills within a stage that summon its boss
    pub enemies_for_boss: u32,
    /// Frames the stage-clear announcement holds
    pub clear_pause_frames: u32,
    pub bosses: Vec<BossConfig>,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            total: 3,
            enemies_for_boss: 15,
            clear_pause_frames: 180,
            bosses: vec![
                BossConfig {
                    stage: 1,
                    name: "Armored Heli".to_string(),
                    description: "Heavily plated helicopter".to_string(),
                    hp: 150,
                    color: rgb(0x8B4513),
                    fire_interval: 60,
                    attack: AttackPattern::Single,
                    movement: BossMovePattern::Vertical,
                },
                BossConfig {
                    stage: 2,
                    name: "Alien Cruiser".to_string(),
                    description: "Saucer with a three-way cannon".to_string(),
                    hp: 200,
                    color: rgb(0x800080),
                    fire_interval: 40,
                    attack: AttackPattern::Triple,
                    movement: BossMovePattern::Circle,
                },
                BossConfig {
                    stage: 3,
                    name: "Mecha Dragon".to_string(),
                    description: "Dragon that sprays a five-way fan".to_string(),
                    hp: 250,
                    color: rgb(0xB22222),
                    fire_interval: 30,
                    attack: AttackPattern::Spread,
                    movement: BossMovePattern::Complex,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enemy_base_interval: u32,
    pub enemy_interval_step: u32,
    pub enemy_min_interval: u32,
    pub powerup_interval: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enemy_base_interval: 80,
            enemy_interval_step: 10,
            enemy_min_interval: 40,
            powerup_interval: 400,
        }
    }
}

impl SpawnConfig {
    /// Frames between enemy spawns: max(min, base - step * stage)
    pub fn enemy_interval(&self, stage: u32) -> u32 {
        self.enemy_base_interval
            .saturating_sub(self.enemy_interval_step.saturating_mul(stage))
            .max(self.enemy_min_interval)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Damage a player bullet deals to an enemy
    pub enemy_hit_damage: i32,
    /// Damage a player bullet deals to a boss
    pub boss_hit_damage: i32,
    /// Frames between an enemy's return shots
    pub return_fire_cooldown: u32,
    pub return_fire_speed: f32,
    /// Boss clamp box (top-left corner coordinates)
    pub boss_arena_min_x: f32,
    pub boss_arena_max_x: f32,
    pub boss_arena_min_y: f32,
    pub boss_arena_max_y: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            enemy_hit_damage: 1,
            boss_hit_damage: 10,
            return_fire_cooldown: 120,
            return_fire_speed: -3.0,
            boss_arena_min_x: 800.0,
            boss_arena_max_x: 1100.0,
            boss_arena_min_y: 50.0,
            boss_arena_max_y: 700.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub boss_hit: u64,
    pub pickup_bonus: u64,
    /// Per enemy cleared by a regular bomb pickup
    pub bomb_kill: u64,
    /// Multiplied by the stage number on stage clear
    pub stage_bonus: u64,
    /// Awarded once the final stage falls
    pub final_bonus: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            boss_hit: 20,
            pickup_bonus: 50,
            bomb_kill: 50,
            stage_bonus: 1000,
            final_bonus: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Frames without a kill before the streak breaks
    pub time_window: u32,
    pub max_multiplier: f64,
    /// Frames the combo banner stays up after a kill
    pub display_duration: u32,
    pub break_on_damage: bool,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            time_window: 180,
            max_multiplier: 5.0,
            display_duration: 120,
            break_on_damage: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MegaBombConfig {
    pub boss_damage: i32,
    /// Base points for the boss strike
    pub boss_score: u64,
    /// Enemy score value multiplier
    pub enemy_score_factor: u64,
    pub effect_frames: u32,
}

impl Default for MegaBombConfig {
    fn default() -> Self {
        Self {
            boss_damage: 100,
            boss_score: 500,
            enemy_score_factor: 2,
            effect_frames: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub max_entries: usize,
    pub storage_key: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            storage_key: "sky_striker_rankings".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Hard cap on live particles; emitters drop the overflow
    pub max_particles: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 1000,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub player: PlayerConfig,
    pub stages: StagesConfig,
    /// Enemy archetype per stage, index 0 = stage 1
    pub enemies: Vec<EnemyConfig>,
    pub spawn: SpawnConfig,
    pub combat: CombatConfig,
    pub scoring: ScoringConfig,
    pub combo: ComboConfig,
    pub mega_bomb: MegaBombConfig,
    pub ranking: RankingConfig,
    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            player: PlayerConfig::default(),
            stages: StagesConfig::default(),
            enemies: vec![
                EnemyConfig::basic(),
                EnemyConfig::fighter(),
                EnemyConfig::bomber(),
            ],
            spawn: SpawnConfig::default(),
            combat: CombatConfig::default(),
            scoring: ScoringConfig::default(),
            combo: ComboConfig::default(),
            mega_bomb: MegaBombConfig::default(),
            ranking: RankingConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

static FALLBACK_ENEMY: LazyLock<EnemyConfig> = LazyLock::new(EnemyConfig::basic);

impl GameConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: {} stages, {} enemy types",
            config.stages.total,
            config.enemies.len()
        );
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.stages.total == 0 {
            return Err(ConfigError::Invalid("at least one stage required".into()));
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::Invalid("enemy table is empty".into()));
        }
        if self.combo.max_multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "combo max multiplier {} is below 1.0",
                self.combo.max_multiplier
            )));
        }
        if self.ranking.max_entries == 0 {
            return Err(ConfigError::Invalid("ranking must keep at least one entry".into()));
        }
        Ok(())
    }

    /// Enemy archetype for a stage; unknown stages use the stage-1 entry,
    /// and an empty table the built-in basic plane
    pub fn enemy_for_stage(&self, stage: u32) -> &EnemyConfig {
        stage
            .checked_sub(1)
            .and_then(|i| self.enemies.get(i as usize))
            .or_else(|| self.enemies.first())
            .unwrap_or(&*FALLBACK_ENEMY)
    }

    /// Boss for a stage; unknown stages get a synthesized scaled boss
    pub fn boss_for_stage(&self, stage: u32) -> BossConfig {
        match self.stages.bosses.iter().find(|b| b.stage == stage) {
            Some(boss) => boss.clone(),
            None => {
                log::warn!("No boss configured for stage {stage}, using fallback");
                BossConfig::fallback(stage)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemy_for_stage(1).kind, EnemyKind::Basic);
        assert_eq!(config.enemy_for_stage(2).kind, EnemyKind::Fighter);
        assert_eq!(config.enemy_for_stage(3).kind, EnemyKind::Bomber);
        assert_eq!(config.enemy_for_stage(3).hp, 3);
        assert!(config.enemy_for_stage(3).special.tough_armor);
    }

    #[test]
    fn test_enemy_fallback_to_stage_one() {
        let config = GameConfig::default();
        assert_eq!(config.enemy_for_stage(0).kind, EnemyKind::Basic);
        assert_eq!(config.enemy_for_stage(9).kind, EnemyKind::Basic);
    }

    #[test]
    fn test_empty_enemy_table_falls_back_to_basic() {
        let config = GameConfig {
            enemies: Vec::new(),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.enemy_for_stage(1).kind, EnemyKind::Basic);
        assert_eq!(config.enemy_for_stage(7).hp, EnemyConfig::basic().hp);

        // An unvalidated config still runs
        let mut state = crate::sim::GameState::new(config, 1);
        state.start_game();
        for _ in 0..80 {
            crate::sim::tick(&mut state, &crate::sim::TickInput::default(), 0.0);
        }
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].config.kind, EnemyKind::Basic);
    }

    #[test]
    fn test_boss_fallback_scales_hp() {
        let config = GameConfig::default();
        assert_eq!(config.boss_for_stage(2).hp, 200);
        let boss = config.boss_for_stage(5);
        assert_eq!(boss.stage, 5);
        assert_eq!(boss.hp, 450);
        assert_eq!(boss.attack, AttackPattern::Single);
        assert_eq!(boss.movement, BossMovePattern::Vertical);
    }

    #[test]
    fn test_enemy_interval_by_stage() {
        let spawn = SpawnConfig::default();
        assert_eq!(spawn.enemy_interval(1), 70);
        assert_eq!(spawn.enemy_interval(3), 50);
        assert_eq!(spawn.enemy_interval(4), 40);
        assert_eq!(spawn.enemy_interval(12), 40);
    }

    #[test]
    fn test_partial_json_override() {
        let config =
            GameConfig::from_json(r#"{"combo": {"max_multiplier": 3.0}, "stages": {"total": 2}}"#)
                .unwrap();
        assert_eq!(config.combo.max_multiplier, 3.0);
        assert_eq!(config.combo.time_window, 180);
        assert_eq!(config.stages.total, 2);
        assert_eq!(config.stages.enemies_for_boss, 15);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"stages": {"total": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
