//! Drifting pickups

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, UpdateCtx};
use super::geom::Body;

pub const POWERUP_SIZE: f32 = 35.0;
const DRIFT_SPEED: f32 = -2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Double,
    Triple,
    Shield,
    Beam,
    Speed,
    Rapid,
    Life,
    Bomb,
    MegaBomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::Double,
        PowerUpKind::Triple,
        PowerUpKind::Shield,
        PowerUpKind::Beam,
        PowerUpKind::Speed,
        PowerUpKind::Rapid,
        PowerUpKind::Life,
        PowerUpKind::Bomb,
        PowerUpKind::MegaBomb,
    ];

    /// Uniform pick over every kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            body: Body::new(x, y, POWERUP_SIZE, POWERUP_SIZE).with_velocity(DRIFT_SPEED, 0.0),
            kind,
        }
    }
}

impl Entity for PowerUp {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _ctx: &mut UpdateCtx<'_>) {
        self.body.integrate();
        if self.body.pos.x < -self.body.size.x {
            self.body.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_drifts_left_and_expires() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = PowerUp::new(-34.0, 100.0, PowerUpKind::Life);
        let mut ctx = UpdateCtx {
            config: &config,
            rng: &mut rng,
        };
        p.update(&mut ctx);
        assert_eq!(p.body.pos.x, -36.0);
        assert!(!p.is_active());
    }

    #[test]
    fn test_random_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(PowerUpKind::random(&mut rng));
        }
        assert_eq!(seen.len(), PowerUpKind::ALL.len());
    }
}
