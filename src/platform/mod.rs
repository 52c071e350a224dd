//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (raw key codes to per-frame intents)
//! - Time (wall clock for the combo window, date labels for rankings)
//!
//! Storage lives in `persistence`.

pub mod input;
pub mod time;

pub use input::KeyboardState;
pub use time::{Clock, ManualClock, SystemClock, today_label};
