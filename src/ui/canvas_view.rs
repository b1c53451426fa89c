use egui::{Color32, Pos2, Rect, Sense, Ui};

use crate::config::game::TileMetrics;
use crate::context::GameContext;
use crate::core::geometry::{Point, ScreenRect};
use crate::rendering::painter::EguiSink;
use crate::scene::SceneBehavior;
use crate::ui::hud_view::draw_hud;
use crate::ui::input_bridge::InputBridge;
use crate::ui::theme;

const CHECKER_TILE: f32 = 48.0;

fn checkerboard(painter: &egui::Painter, rect: Rect) {
    let cols = (rect.width() / CHECKER_TILE).ceil() as i32;
    let rows = (rect.height() / CHECKER_TILE).ceil() as i32;
    for r in 0..rows {
        for c in 0..cols {
            let min = Pos2::new(
                rect.left() + c as f32 * CHECKER_TILE,
                rect.top() + r as f32 * CHECKER_TILE,
            );
            let max = Pos2::new(
                (min.x + CHECKER_TILE).min(rect.right()),
                (min.y + CHECKER_TILE).min(rect.bottom()),
            );
            let color = theme::CANVAS_CHECKER[((r + c) % 2) as usize];
            painter.rect_filled(Rect::from_min_max(min, max), 0.0, color);
        }
    }
}

/// 世界画布：收集输入 → 推进一帧 → 用同一份变换快照绘制场景和 HUD
pub fn show_world(
    ui: &mut Ui,
    context: &mut GameContext,
    bridge: &mut InputBridge,
    tiles: TileMetrics,
) {
    let available = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(available, Sense::click_and_drag());

    context.set_viewport(ScreenRect::new(
        0.0,
        0.0,
        rect.width() as f64,
        rect.height() as f64,
    ));

    let events = ui.input(|i| bridge.collect(i, rect));
    let dt = ui.input(|i| i.stable_dt) as f64;
    let params = context.frame(&events, dt);

    let hover: Option<Point> = response
        .hover_pos()
        .map(|p| ((p.x - rect.left()) as f64, (p.y - rect.top()) as f64));
    context.set_hover(hover);

    // ── background ───────────────────────────────────────────
    let painter = ui.painter_at(rect);
    match theme::scene_background(context.current_scene()) {
        Some(color) => {
            painter.rect_filled(rect, 0.0, color);
        }
        None => checkerboard(&painter, rect),
    }

    // ── world ────────────────────────────────────────────────
    let mut sink = EguiSink::new(&painter, rect.min, tiles);
    context.render(&params, &mut sink);

    // ── HUD ──────────────────────────────────────────────────
    draw_hud(&painter, rect.min, context, hover);

    if !context.scene().is_loaded() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "加载中…",
            egui::FontId::proportional(18.0),
            Color32::WHITE,
        );
    }
}
