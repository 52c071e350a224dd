//! Shared capability contract for simulated objects
//!
//! Entities never reference each other; the orchestrator scans collections
//! and resolves every relationship. Deactivation only flips `active`; the
//! owning collection is reaped after the frame's collision pass.

use rand_pcg::Pcg32;

use super::geom::{Body, Rect};
use crate::config::GameConfig;

/// Per-frame context handed to `Entity::update`
pub struct UpdateCtx<'a> {
    pub config: &'a GameConfig,
    pub rng: &'a mut Pcg32,
}

pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Integrate velocity, then apply type-specific rules
    fn update(&mut self, ctx: &mut UpdateCtx<'_>);

    fn bounds(&self) -> Rect {
        self.body().bounds()
    }

    fn check_collision(&self, other: &dyn Entity) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    fn is_active(&self) -> bool {
        self.body().active
    }

    fn deactivate(&mut self) {
        self.body_mut().active = false;
    }
}

/// Advance every entity, then drop the ones that went inactive
pub fn update_and_reap<E: Entity>(entities: &mut Vec<E>, ctx: &mut UpdateCtx<'_>) {
    for entity in entities.iter_mut() {
        entity.update(ctx);
    }
    reap(entities);
}

/// Remove inactive entities, keeping order
pub fn reap<E: Entity>(entities: &mut Vec<E>) {
    entities.retain(|e| e.is_active());
}
