//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - One fixed step per frame; every timer is a frame count
//! - Seeded RNG only
//! - Stable iteration order (collections keep insertion order)
//! - Entities flag themselves inactive; collections are reaped after collisions

pub mod boss;
pub mod collision;
pub mod combo;
pub mod enemy;
pub mod entity;
pub mod geom;
pub mod particles;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossInfo};
pub use collision::{CollisionOutcome, resolve_collisions};
pub use combo::ComboTracker;
pub use enemy::Enemy;
pub use entity::{Entity, UpdateCtx};
pub use geom::{Body, Rect};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::{BuffKind, Player, WeaponMode};
pub use powerup::{PowerUp, PowerUpKind};
pub use projectile::{Projectile, ProjectileKind};
pub use state::{BossHud, GameEvent, GamePhase, GameState, HudSnapshot};
pub use tick::{TickInput, autopilot, tick, trigger_mega_bomb};
