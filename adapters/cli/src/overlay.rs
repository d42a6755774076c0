//! Heads-up display and end-of-run panels drawn on top of the 3D view.

use cyberdoom_rendering::{Color, RasterSurface};
use cyberdoom_system_session::{Hud, RunSummary};
use glam::Vec2;

const TEXT: Color = Color::from_rgb_u8(230, 240, 255);
const ACCENT: Color = Color::from_rgb_u8(110, 231, 255);
const HEALTH: Color = Color::from_rgb_u8(255, 92, 122);
const ENERGY: Color = Color::from_rgb_u8(92, 255, 178);
const PANEL: Color = Color::from_rgba_u8(7, 10, 16, 0.78);
const TRACK: Color = Color::from_rgba_u8(255, 255, 255, 0.12);

const MARGIN: f32 = 12.0;
const LINE: f32 = 20.0;
const BAR_WIDTH: f32 = 180.0;
const BAR_HEIGHT: f32 = 10.0;

/// Draws the status panel, resource bars and the current toast.
pub(crate) fn draw_hud(surface: &mut dyn RasterSurface, hud: &Hud) {
    let lines = [
        format!("{} / {}", hud.role_name, hud.level_name),
        format!("Objective: {}", hud.objective),
        format!("Score: {}", hud.score),
    ];
    let width = surface.width() as f32;
    let height = surface.height() as f32;

    surface.fill_rect(MARGIN, MARGIN, 360.0, LINE * 3.0 + 10.0, PANEL);
    for (row, line) in lines.iter().enumerate() {
        let baseline = MARGIN + LINE * (row as f32 + 1.0);
        surface.draw_text(line, Vec2::new(MARGIN + 8.0, baseline), 18.0, TEXT);
    }

    let bottom = height - MARGIN - BAR_HEIGHT;
    draw_bar(surface, bottom - 18.0, hud.health, hud.max_health, HEALTH);
    draw_bar(surface, bottom, hud.energy, hud.max_energy, ENERGY);

    if let Some(toast) = &hud.toast {
        let left = (width * 0.5 - 160.0).max(MARGIN);
        surface.fill_rect(left, height * 0.18, 320.0, 30.0, PANEL);
        surface.draw_text(toast, Vec2::new(left + 10.0, height * 0.18 + 21.0), 18.0, ACCENT);
    }

    // crosshair
    let center = Vec2::new(width * 0.5, height * 0.5);
    surface.line(center - Vec2::X * 6.0, center + Vec2::X * 6.0, ACCENT);
    surface.line(center - Vec2::Y * 6.0, center + Vec2::Y * 6.0, ACCENT);
}

fn draw_bar(surface: &mut dyn RasterSurface, top: f32, value: f32, max: f32, color: Color) {
    let fraction = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    surface.fill_rect(MARGIN, top, BAR_WIDTH, BAR_HEIGHT, TRACK);
    surface.fill_rect(MARGIN, top, BAR_WIDTH * fraction, BAR_HEIGHT, color);
    surface.stroke_rect(MARGIN, top, BAR_WIDTH, BAR_HEIGHT, color.fade(0.6));
}

/// Dims the screen and shows the briefing while the session is paused.
pub(crate) fn draw_paused(surface: &mut dyn RasterSurface, briefing: &str) {
    let (width, height) = (surface.width() as f32, surface.height() as f32);
    surface.fill_rect(0.0, 0.0, width, height, PANEL);
    surface.draw_text("PAUSED", Vec2::new(width * 0.5 - 60.0, height * 0.3), 36.0, ACCENT);
    for (row, line) in briefing.lines().enumerate() {
        let baseline = height * 0.3 + LINE * (row as f32 + 2.0);
        surface.draw_text(line, Vec2::new(width * 0.2, baseline), 18.0, TEXT);
    }
    surface.draw_text(
        "Esc to resume, Q to quit",
        Vec2::new(width * 0.2, height - MARGIN * 3.0),
        16.0,
        TEXT.fade(0.7),
    );
}

/// Shows the end-of-run panel.
pub(crate) fn draw_summary(surface: &mut dyn RasterSurface, summary: &RunSummary, won: bool) {
    let (width, height) = (surface.width() as f32, surface.height() as f32);
    let left = width * 0.2;
    let top = height * 0.25;
    surface.fill_rect(left, top, width * 0.6, height * 0.5, PANEL);
    surface.stroke_rect(left, top, width * 0.6, height * 0.5, ACCENT);

    let prompt = match (won, summary.restarts_campaign) {
        (true, true) => "Press E to restart the campaign",
        (true, false) => "Press E for the next level",
        (false, _) => "Press E to retry",
    };
    let lines = [
        summary.text.clone(),
        format!("Score: {}", summary.score),
        format!("Time: {}", summary.time),
        format!("Neutralized: {}", summary.kills),
    ];

    surface.draw_text(summary.title, Vec2::new(left + 16.0, top + 40.0), 32.0, ACCENT);
    for (row, line) in lines.iter().enumerate() {
        let baseline = top + 80.0 + LINE * row as f32;
        surface.draw_text(line, Vec2::new(left + 16.0, baseline), 18.0, TEXT);
    }
    surface.draw_text(
        prompt,
        Vec2::new(left + 16.0, top + height * 0.5 - 20.0),
        18.0,
        TEXT.fade(0.8),
    );
}
