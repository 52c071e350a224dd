//! Sky Striker - a side-scrolling arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, collisions, stage flow, scoring)
//! - `renderer`: Abstract draw surface and entity drawing
//! - `platform`: Input intents and clocks
//! - `persistence`: Key-addressable local storage
//! - `ranking`: Persisted top-N score list
//! - `config`: Immutable game balance tables
//! - `app`: Presentation-side driver around the simulation

pub mod app;
pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod ranking;
pub mod renderer;
pub mod sim;

pub use app::App;
pub use config::GameConfig;
pub use error::{ConfigError, GameError, StorageError};
pub use ranking::{RankingEntry, RankingStore, Rankings};

/// RGBA color, each channel in 0.0..=1.0
pub type Color = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// Game configuration constants
pub mod consts {
    /// Simulation rate the frame-counted timers are tuned for
    pub const FRAMES_PER_SECOND: f64 = 60.0;
    /// Fixed simulation timestep (one frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical play-field dimensions
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;
}

/// Convert a frame count into milliseconds at the nominal frame rate
#[inline]
pub fn frames_to_ms(frames: u32) -> f64 {
    frames as f64 * 1000.0 / consts::FRAMES_PER_SECOND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_channels() {
        let c = rgb(0xFF8000);
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_frames_to_ms() {
        assert_eq!(frames_to_ms(180), 3000.0);
        assert_eq!(frames_to_ms(0), 0.0);
    }
}
