//! Scene drawing
//!
//! Reads a finished frame's `GameState` and emits primitive calls. Nothing
//! here mutates the simulation.

use glam::Vec2;

use super::colors::{self, with_alpha};
use super::shapes;
use super::{RenderSurface, TextAlign};
use crate::ranking::RankingEntry;
use crate::sim::{
    Boss, BuffKind, Enemy, GamePhase, GameState, HudSnapshot, Particle, ParticleKind, Player,
    PowerUp, Projectile, ProjectileKind,
};

const CLOUD_COUNT: usize = 8;
const HUD_FONT: f32 = 20.0;

/// Draw the whole frame for `state`
pub fn render(state: &GameState, surface: &mut dyn RenderSurface, time_ms: f64) {
    let (width, height) = (state.config.canvas.width, state.config.canvas.height);
    surface.clear(colors::SKY);
    draw_clouds(surface, width, time_ms);

    match state.phase {
        GamePhase::Title => draw_title(surface, width, height),
        GamePhase::Ranking => {}
        GamePhase::Playing | GamePhase::StageClear | GamePhase::GameOver => {
            draw_field(state, surface, time_ms);
            if state.mega_bomb_effect > 0 {
                let flash = state.mega_bomb_effect as f32 / state.config.mega_bomb.effect_frames.max(1) as f32;
                surface.fill_rect(0.0, 0.0, width, height, with_alpha(colors::WHITE, flash * 0.6));
            }
            draw_hud(&state.hud(), surface, width);
            draw_combo(state, surface, width);
            match state.phase {
                GamePhase::StageClear => draw_stage_clear(state, surface, width, height),
                GamePhase::GameOver => draw_game_over(state, surface, width, height),
                _ => {}
            }
        }
    }
}

fn draw_clouds(surface: &mut dyn RenderSurface, width: f32, time_ms: f64) {
    let span = width as f64 + 100.0;
    for i in 0..CLOUD_COUNT {
        let x = ((time_ms * 0.05 + i as f64 * 200.0) % span) as f32 - 100.0;
        let y = 50.0 + i as f32 * 100.0;
        surface.fill_circle(Vec2::new(x, y), 30.0, colors::CLOUD);
        surface.fill_circle(Vec2::new(x + 25.0, y), 35.0, colors::CLOUD);
        surface.fill_circle(Vec2::new(x + 50.0, y), 30.0, colors::CLOUD);
    }
}

/// Entities back to front
fn draw_field(state: &GameState, surface: &mut dyn RenderSurface, time_ms: f64) {
    for powerup in &state.powerups {
        draw_powerup(powerup, surface);
    }
    for enemy in &state.enemies {
        draw_enemy(enemy, surface, time_ms);
    }
    if let Some(boss) = state.boss.as_ref().filter(|b| b.body.active) {
        draw_boss(boss, surface, time_ms);
    }
    for shot in state.player_shots.iter().chain(&state.enemy_shots) {
        draw_projectile(shot, surface);
    }
    if state.phase != GamePhase::GameOver {
        draw_player(&state.player, surface);
    }
    for particle in &state.particles.particles {
        draw_particle(particle, surface);
    }
}

pub fn draw_player(player: &Player, surface: &mut dyn RenderSurface) {
    let Vec2 { x, y } = player.body.pos;
    let size = player.body.size;

    if player.is_shielded() {
        surface.save();
        surface.set_alpha(0.5 + player.shield_phase.sin() * 0.3);
        surface.stroke_circle(player.body.center(), size.x / 2.0 + 10.0, 3.0, colors::SHIELD_RING);
        surface.restore();
    }

    surface.fill_rect(x, y, size.x, size.y, colors::PLAYER_BODY);
    surface.fill_polygon(&shapes::nose_right(player.body.pos, size), colors::PLAYER_BODY);
    surface.fill_rect(x + 40.0, y + 15.0, 20.0, 10.0, colors::PLAYER_COCKPIT);
    // Wings
    surface.fill_rect(x + 10.0, y - 5.0, 30.0, 10.0, colors::PLAYER_BODY);
    surface.fill_rect(x + 10.0, y + size.y - 5.0, 30.0, 10.0, colors::PLAYER_BODY);

    if player.buffs.speed.active {
        for i in 0..3 {
            let i = i as f32;
            surface.fill_rect(x - 10.0 - i * 5.0, y + 10.0 + i * 3.0, 8.0, 4.0, colors::SPEED_STREAK);
            surface.fill_rect(x - 10.0 - i * 5.0, y + 25.0 - i * 3.0, 8.0, 4.0, colors::SPEED_STREAK);
        }
    }
}

pub fn draw_enemy(enemy: &Enemy, surface: &mut dyn RenderSurface, time_ms: f64) {
    let pulse = enemy.is_damaged();
    if pulse {
        surface.save();
        surface.set_alpha(0.6 + (time_ms * 0.02).sin() as f32 * 0.4);
    }

    let body = &enemy.body;
    surface.fill_rect(body.pos.x, body.pos.y, body.size.x, body.size.y, enemy.config.color);
    surface.fill_polygon(&shapes::nose_left(body.pos, body.size), colors::ENEMY_DETAIL);

    if pulse {
        surface.restore();
    }
}

pub fn draw_boss(boss: &Boss, surface: &mut dyn RenderSurface, time_ms: f64) {
    let critical = boss.hp_fraction() < 0.3;
    if critical {
        surface.save();
        surface.set_alpha(0.7 + (time_ms * 0.01).sin() as f32 * 0.3);
    }

    let Vec2 { x, y } = boss.body.pos;
    let size = boss.body.size;
    surface.fill_rect(x, y, size.x, size.y, boss.config.color);

    surface.fill_polygon(&shapes::nose_left(boss.body.pos, size), colors::BOSS_DETAIL);

    if critical {
        surface.restore();
    }
}

pub fn draw_projectile(shot: &Projectile, surface: &mut dyn RenderSurface) {
    let body = &shot.body;
    match shot.kind {
        ProjectileKind::Bullet => {
            surface.fill_rect(body.pos.x, body.pos.y, body.size.x, body.size.y, shot.color);
        }
        ProjectileKind::Beam => {
            let glow = 4.0 + shot.glow.sin() * 2.0;
            surface.fill_rect(
                body.pos.x - glow,
                body.pos.y - glow,
                body.size.x + glow * 2.0,
                body.size.y + glow * 2.0,
                with_alpha(shot.color, 0.35),
            );
            surface.fill_rect(body.pos.x, body.pos.y, body.size.x, body.size.y, shot.color);
        }
        ProjectileKind::Enemy => {
            surface.fill_circle(body.center(), body.size.x / 2.0, shot.color);
        }
    }
}

pub fn draw_powerup(powerup: &PowerUp, surface: &mut dyn RenderSurface) {
    let body = &powerup.body;
    let color = colors::powerup(powerup.kind);
    surface.fill_rect(body.pos.x - 3.0, body.pos.y - 3.0, body.size.x + 6.0, body.size.y + 6.0, with_alpha(color, 0.3));
    surface.fill_rect(body.pos.x, body.pos.y, body.size.x, body.size.y, color);
    surface.fill_text(
        colors::powerup_label(powerup.kind),
        body.center() + Vec2::new(0.0, 7.0),
        20.0,
        TextAlign::Center,
        colors::WHITE,
    );
}

fn draw_particle(p: &Particle, surface: &mut dyn RenderSurface) {
    let color = with_alpha(p.color, p.color[3] * p.alpha());
    match p.kind {
        ParticleKind::Star => {
            surface.fill_polygon(&shapes::star(p.pos, p.size * 1.5, p.size * 0.6, 5), color);
        }
        _ => surface.fill_circle(p.pos, p.size, color),
    }
}

/// Text HUD along the top edge
pub fn draw_hud(hud: &HudSnapshot, surface: &mut dyn RenderSurface, width: f32) {
    let left = |row: f32| Vec2::new(16.0, 28.0 + row * 24.0);
    let mut lines = vec![
        format!("SCORE {}", hud.score),
        format!("LIVES {}", hud.lives),
        format!("WEAPON {}", hud.weapon.as_str()),
        format!("STAGE {}/{}", hud.stage, hud.total_stages),
    ];
    if hud.boss.is_some() {
        lines.push("BOSS BATTLE!".to_string());
    } else if hud.phase == GamePhase::StageClear {
        lines.push("STAGE CLEAR!".to_string());
    } else {
        lines.push(format!("BOSS IN {}", hud.kills_until_boss));
    }
    if hud.mega_bombs > 0 {
        lines.push(format!("MEGA BOMB x{}", hud.mega_bombs));
    }
    for (kind, remaining) in &hud.buffs {
        let name = match kind {
            BuffKind::Shield => "SHIELD",
            BuffKind::Beam => "BEAM",
            BuffKind::Speed => "SPEED",
            BuffKind::Rapid => "RAPID",
        };
        lines.push(format!("{name} {}s", remaining.div_ceil(60)));
    }
    for (row, line) in lines.iter().enumerate() {
        surface.fill_text(line, left(row as f32), HUD_FONT, TextAlign::Left, colors::HUD_TEXT);
    }

    if let Some(boss) = &hud.boss {
        let bar_w = 400.0;
        let x = (width - bar_w) / 2.0;
        surface.fill_text(&boss.info.name, Vec2::new(width / 2.0, 28.0), HUD_FONT, TextAlign::Center, colors::HUD_TEXT);
        surface.fill_rect(x, 38.0, bar_w, 14.0, colors::BOSS_BAR_BACK);
        surface.fill_rect(x, 38.0, bar_w * boss.hp_fraction, 14.0, colors::BOSS_BAR_FILL);
    }
}

fn draw_combo(state: &GameState, surface: &mut dyn RenderSurface, width: f32) {
    let combo = &state.combo;
    if !combo.is_displayed() {
        return;
    }
    let fade = combo.display_timer as f32 / state.config.combo.display_duration.max(1) as f32;
    surface.fill_text(
        &format!("{} COMBO x{:.1}", combo.count, combo.multiplier),
        Vec2::new(width / 2.0, 120.0),
        36.0,
        TextAlign::Center,
        with_alpha(colors::GOLD, fade),
    );
}

fn draw_stage_clear(state: &GameState, surface: &mut dyn RenderSurface, width: f32, height: f32) {
    surface.fill_rect(0.0, 0.0, width, height, colors::OVERLAY);
    let cx = width / 2.0;
    surface.fill_text(
        &format!("STAGE {} CLEAR!", state.stage),
        Vec2::new(cx, 350.0),
        48.0,
        TextAlign::Center,
        colors::GOLD,
    );
    let next = if state.all_stages_cleared {
        "ALL STAGES CLEAR! CONGRATULATIONS!".to_string()
    } else {
        format!("STAGE {} START", state.stage + 1)
    };
    surface.fill_text(&next, Vec2::new(cx, 420.0), 32.0, TextAlign::Center, colors::GOLD);
}

fn draw_game_over(state: &GameState, surface: &mut dyn RenderSurface, width: f32, height: f32) {
    surface.fill_rect(0.0, 0.0, width, height, colors::OVERLAY);
    let cx = width / 2.0;
    let title = if state.all_stages_cleared {
        "MISSION COMPLETE"
    } else {
        "GAME OVER"
    };
    surface.fill_text(title, Vec2::new(cx, 330.0), 56.0, TextAlign::Center, colors::WHITE);
    surface.fill_text(
        &format!("SCORE {}", state.score),
        Vec2::new(cx, 400.0),
        32.0,
        TextAlign::Center,
        colors::GOLD,
    );
}

fn draw_title(surface: &mut dyn RenderSurface, width: f32, height: f32) {
    let cx = width / 2.0;
    surface.fill_text("SKY STRIKER", Vec2::new(cx, height * 0.4), 64.0, TextAlign::Center, colors::HUD_TEXT);
    surface.fill_text(
        "ENTER: start   R: ranking",
        Vec2::new(cx, height * 0.4 + 70.0),
        24.0,
        TextAlign::Center,
        colors::HUD_TEXT,
    );
}

/// Leaderboard screen, medals for the top three
pub fn draw_ranking(entries: &[RankingEntry], surface: &mut dyn RenderSurface, width: f32, height: f32) {
    surface.fill_rect(0.0, 0.0, width, height, colors::OVERLAY);
    let cx = width / 2.0;
    surface.fill_text("RANKING", Vec2::new(cx, 120.0), 48.0, TextAlign::Center, colors::GOLD);

    if entries.is_empty() {
        surface.fill_text("No scores yet", Vec2::new(cx, 300.0), 24.0, TextAlign::Center, colors::WHITE);
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        let y = 190.0 + i as f32 * 44.0;
        let color = if i < 3 { colors::GOLD } else { colors::WHITE };
        surface.fill_text(&format!("{}.", i + 1), Vec2::new(cx - 260.0, y), 26.0, TextAlign::Right, color);
        surface.fill_text(&entry.name, Vec2::new(cx - 230.0, y), 26.0, TextAlign::Left, color);
        surface.fill_text(&entry.score.to_string(), Vec2::new(cx + 170.0, y), 26.0, TextAlign::Right, color);
        surface.fill_text(&entry.date, Vec2::new(cx + 190.0, y), 20.0, TextAlign::Left, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::{CommandRecorder, DrawCommand};

    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 3);
        state.start_game();
        let enemy = Enemy::new(900.0, 200.0, 1, &state.config, &mut state.rng);
        state.enemies.push(enemy);
        state.player_shots.extend(state.player.fire());
        state
    }

    #[test]
    fn test_frame_is_balanced_and_starts_with_clear() {
        let mut state = playing_state();
        state.player.activate_buff(BuffKind::Shield, 300);
        let mut boss = Boss::new(1000.0, 360.0, 2, &state.config);
        boss.hp = 10;
        state.boss = Some(boss);
        state.enemies[0].hp -= 1;

        let mut rec = CommandRecorder::new();
        render(&state, &mut rec, 1234.0);
        assert_eq!(rec.commands.first(), Some(&DrawCommand::Clear(colors::SKY)));
        assert_eq!(rec.depth(), 0);
        assert!(rec.commands.iter().any(|c| matches!(c, DrawCommand::Ring { .. })));
    }

    #[test]
    fn test_hud_reports_run_state() {
        let mut state = playing_state();
        state.score = 4321;
        state.player.mega_bombs = 2;
        state.player.activate_buff(BuffKind::Rapid, 61);

        let mut rec = CommandRecorder::new();
        render(&state, &mut rec, 0.0);
        let texts: Vec<&str> = rec.texts().collect();
        assert!(texts.contains(&"SCORE 4321"));
        assert!(texts.contains(&"LIVES 3"));
        assert!(texts.contains(&"STAGE 1/3"));
        assert!(texts.contains(&"MEGA BOMB x2"));
        assert!(texts.contains(&"RAPID 2s"));
    }

    #[test]
    fn test_boss_bar_tracks_hp() {
        let mut state = playing_state();
        let mut boss = Boss::new(1000.0, 360.0, 1, &state.config);
        boss.take_damage(75);
        state.boss = Some(boss);

        let mut rec = CommandRecorder::new();
        render(&state, &mut rec, 0.0);
        assert!(rec.texts().any(|t| t == "Armored Heli"));
        assert_eq!(rec.count_rects_of(colors::BOSS_BAR_FILL), 1);
        let fill = rec.commands.iter().find_map(|c| match c {
            DrawCommand::Rect { w, color, .. } if *color == colors::BOSS_BAR_FILL => Some(*w),
            _ => None,
        });
        assert_eq!(fill, Some(200.0));
    }

    #[test]
    fn test_boss_drawn_as_hull_and_nose_at_every_stage() {
        let state = playing_state();
        for stage in 1..=4 {
            let boss = Boss::new(1000.0, 360.0, stage, &state.config);
            let mut rec = CommandRecorder::new();
            draw_boss(&boss, &mut rec, 0.0);
            assert_eq!(rec.commands.len(), 2, "stage {stage}");
            assert!(matches!(rec.commands[1], DrawCommand::Polygon { color, .. } if color == colors::BOSS_DETAIL));
        }
    }

    #[test]
    fn test_stage_clear_overlay() {
        let mut state = playing_state();
        state.clear_stage();
        let mut rec = CommandRecorder::new();
        render(&state, &mut rec, 0.0);
        let texts: Vec<&str> = rec.texts().collect();
        assert!(texts.contains(&"STAGE 1 CLEAR!"));
        assert!(texts.contains(&"STAGE 2 START"));
    }

    #[test]
    fn test_title_draws_no_entities() {
        let state = GameState::new(GameConfig::default(), 1);
        let mut rec = CommandRecorder::new();
        render(&state, &mut rec, 0.0);
        assert!(rec.texts().any(|t| t == "SKY STRIKER"));
        assert_eq!(rec.count_rects_of(colors::PLAYER_BODY), 0);
    }

    #[test]
    fn test_ranking_screen_lists_entries() {
        let entries = vec![
            RankingEntry {
                name: "Ace".into(),
                score: 9000,
                date: "2026/10/18".into(),
            },
            RankingEntry {
                name: "Bee".into(),
                score: 100,
                date: "2026/10/17".into(),
            },
        ];
        let mut rec = CommandRecorder::new();
        draw_ranking(&entries, &mut rec, 1200.0, 800.0);
        let texts: Vec<&str> = rec.texts().collect();
        assert!(texts.contains(&"Ace"));
        assert!(texts.contains(&"9000"));
        assert!(texts.contains(&"2."));

        rec.reset();
        draw_ranking(&[], &mut rec, 1200.0, 800.0);
        assert!(rec.texts().any(|t| t == "No scores yet"));
    }
}
