//! Palette

use crate::sim::PowerUpKind;
use crate::{Color, rgb};

pub const SKY: Color = rgb(0x87CEEB);
pub const CLOUD: Color = [1.0, 1.0, 1.0, 0.8];

pub const PLAYER_BODY: Color = rgb(0x4A90E2);
pub const PLAYER_COCKPIT: Color = rgb(0x2E5C8A);
pub const SHIELD_RING: Color = rgb(0x00FFFF);
pub const SPEED_STREAK: Color = [1.0, 1.0, 0.0, 0.5];

pub const ENEMY_DETAIL: Color = rgb(0xC0392B);
pub const BOSS_DETAIL: Color = [1.0, 1.0, 1.0, 0.8];

pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
pub const GOLD: Color = rgb(0xFFD700);
pub const WHITE: Color = rgb(0xFFFFFF);
pub const HUD_TEXT: Color = rgb(0x1A1A2E);
pub const BOSS_BAR_BACK: Color = [0.0, 0.0, 0.0, 0.5];
pub const BOSS_BAR_FILL: Color = rgb(0xE74C3C);

pub fn powerup(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Double => rgb(0xFF6B6B),
        PowerUpKind::Triple => rgb(0x4ECDC4),
        PowerUpKind::Shield => rgb(0x00FFFF),
        PowerUpKind::Beam => rgb(0xFF00FF),
        PowerUpKind::Speed => rgb(0xFFFF00),
        PowerUpKind::Rapid => rgb(0xFF8C00),
        PowerUpKind::Life => rgb(0xFF69B4),
        PowerUpKind::Bomb => rgb(0x8B0000),
        PowerUpKind::MegaBomb => rgb(0x4B0082),
    }
}

/// Short glyph drawn on a pickup
pub fn powerup_label(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Double => "2",
        PowerUpKind::Triple => "3",
        PowerUpKind::Shield => "S",
        PowerUpKind::Beam => "B",
        PowerUpKind::Speed => ">",
        PowerUpKind::Rapid => "R",
        PowerUpKind::Life => "+",
        PowerUpKind::Bomb => "*",
        PowerUpKind::MegaBomb => "M",
    }
}

/// Same color at a different opacity
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// CSS `rgba()` string for canvas styles
pub fn to_css(color: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_css() {
        assert_eq!(to_css(rgb(0xFF8000)), "rgba(255, 128, 0, 1)");
        assert_eq!(to_css(OVERLAY), "rgba(0, 0, 0, 0.7)");
    }

    #[test]
    fn test_every_powerup_has_distinct_color() {
        let mut seen: Vec<Color> = Vec::new();
        for kind in PowerUpKind::ALL {
            let c = powerup(kind);
            assert!(!seen.contains(&c), "{kind:?}");
            seen.push(c);
            assert!(!powerup_label(kind).is_empty());
        }
    }
}
