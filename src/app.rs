//! Presentation-side driver
//!
//! Owns the simulation, a draw surface and the ranking store. A shell (the
//! browser loop or the headless binary) feeds it display-refresh deltas and
//! input; the fixed-step accumulator decides how many frames to simulate.

use crate::config::GameConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::GameError;
use crate::persistence::KeyValueStore;
use crate::platform::today_label;
use crate::ranking::{RankingEntry, RankingStore};
use crate::renderer::{self, RenderSurface};
use crate::sim::{GameEvent, GamePhase, GameState, HudSnapshot, TickInput, tick};

/// Name recorded when the player leaves the prompt empty
pub const DEFAULT_NAME: &str = "Anonymous";

/// Longest frame delta fed to the accumulator, in seconds
const MAX_FRAME_DT: f32 = 0.1;

pub struct App<R: RenderSurface, S: KeyValueStore> {
    state: GameState,
    surface: R,
    ranking: RankingStore<S>,
    accumulator: f32,
    /// Set on game over until a score is submitted or the player moves on
    awaiting_name: bool,
}

impl<R: RenderSurface, S: KeyValueStore> App<R, S> {
    /// Fails fast when there is nothing to draw on
    pub fn new(config: GameConfig, surface: Option<R>, store: S, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let surface = surface.ok_or_else(|| GameError::MissingRenderTarget("no surface".to_string()))?;
        let ranking = RankingStore::load(store, &config.ranking);
        log::info!("Game initialized with seed: {seed}");

        Ok(Self {
            state: GameState::new(config, seed),
            surface,
            ranking,
            accumulator: 0.0,
            awaiting_name: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn rankings(&self) -> &[RankingEntry] {
        self.ranking.top()
    }

    pub fn ranking_store(&self) -> &RankingStore<S> {
        &self.ranking
    }

    /// Advance by one display refresh of `frame_dt` seconds. Runs up to
    /// `MAX_SUBSTEPS` simulation frames; a bomb request applies to the first
    /// of them only. Returns the events those frames produced.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut input = *input;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &input, now_ms);
            self.accumulator -= SIM_DT;
            substeps += 1;
            input.bomb = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than chase it next refresh
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::GameOver { score, .. } => {
                    self.awaiting_name = true;
                    if self.ranking.is_high_score(*score) {
                        log::info!("New high score: {score}");
                    }
                }
                GameEvent::StageCleared { stage, bonus } => {
                    log::info!("Stage {stage} cleared, +{bonus}");
                }
                _ => {}
            }
        }
        events
    }

    /// Draw the current frame
    pub fn render(&mut self, time_ms: f64) {
        renderer::render(&self.state, &mut self.surface, time_ms);
        if self.state.phase == GamePhase::Ranking {
            let canvas = &self.state.config.canvas;
            renderer::draw::draw_ranking(self.ranking.top(), &mut self.surface, canvas.width, canvas.height);
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        self.state.hud()
    }

    /// True after a game over whose score has not been submitted yet
    pub fn awaiting_name(&self) -> bool {
        self.awaiting_name && self.state.phase == GamePhase::GameOver
    }

    pub fn is_high_score(&self, score: u64) -> bool {
        self.ranking.is_high_score(score)
    }

    /// Record the finished run under `name` and open the ranking screen.
    /// Returns the 1-based rank, or `None` when the score did not place or
    /// there is no finished run to submit.
    pub fn submit_score(&mut self, name: &str) -> Result<Option<usize>, GameError> {
        if !self.awaiting_name() {
            return Ok(None);
        }
        self.awaiting_name = false;

        let name = match name.trim() {
            "" => DEFAULT_NAME,
            trimmed => trimmed,
        };
        let rank = self.ranking.save(name, self.state.score, &today_label())?;
        self.state.show_ranking();
        Ok(rank)
    }

    pub fn clear_rankings(&mut self) -> Result<(), GameError> {
        self.ranking.clear()?;
        Ok(())
    }

    pub fn start_game(&mut self) {
        self.awaiting_name = false;
        self.accumulator = 0.0;
        self.state.start_game();
    }

    pub fn show_ranking(&mut self) {
        if !self.state.is_running() {
            self.awaiting_name = false;
            self.state.show_ranking();
        }
    }

    pub fn show_title(&mut self) {
        if !self.state.is_running() {
            self.awaiting_name = false;
            self.state.show_title();
        }
    }

    pub fn quit_to_title(&mut self) {
        self.awaiting_name = false;
        self.state.quit_to_title();
    }
}
