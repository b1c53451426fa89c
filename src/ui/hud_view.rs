//! # HUD 绘制
//!
//! 只负责画：区域与命中测试都在 `core::hud`，这里按区域动作选择样式。

use egui::{Align2, FontId, Painter, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::core::geometry::{Point, ScreenRect};
use crate::context::GameContext;
use crate::core::hud::{HudAction, HudRegion};
use crate::scene::SceneId;
use crate::ui::theme;

fn to_rect(r: ScreenRect, offset: Vec2) -> Rect {
    Rect::from_min_size(
        Pos2::new(r.x as f32, r.y as f32) + offset,
        Vec2::new(r.w as f32, r.h as f32),
    )
}

/// `hover` 为画布坐标下的指针位置
pub fn draw_hud(painter: &Painter, canvas_min: Pos2, context: &GameContext, hover: Option<Point>) {
    let offset = canvas_min.to_vec2();
    let hovered = hover
        .and_then(|p| context.hud().hit_test(p))
        .map(|r| r.action);

    for region in context.hud_regions() {
        let rect = to_rect(region.rect, offset);
        match region.action {
            HudAction::Panel => draw_panel(painter, rect, context.current_scene()),
            HudAction::MiniMap => draw_minimap(painter, rect, region),
            _ => draw_button(painter, rect, region, hovered == Some(region.action)),
        }
    }
}

fn draw_panel(painter: &Painter, rect: Rect, scene: SceneId) {
    painter.rect_filled(rect, Rounding::ZERO, theme::HUD_PANEL);
    painter.line_segment(
        [rect.left_top(), rect.left_bottom()],
        Stroke::new(1.0, theme::SEPARATOR),
    );
    let title = format!("Isoverse · {}", scene.label());
    painter.text(
        rect.left_top() + Vec2::new(12.0, 20.0),
        Align2::LEFT_CENTER,
        title,
        FontId::proportional(16.0),
        theme::PINK_LIGHT,
    );
}

fn draw_minimap(painter: &Painter, rect: Rect, region: &HudRegion) {
    painter.rect_filled(rect, Rounding::same(4.0), theme::BG_DARK);
    painter.rect_stroke(rect, Rounding::same(4.0), Stroke::new(1.0, theme::SEPARATOR));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &region.label,
        FontId::proportional(12.0),
        theme::TEXT_MUTED,
    );
}

fn draw_button(painter: &Painter, rect: Rect, region: &HudRegion, hovered: bool) {
    let fill = match (region.active, hovered) {
        (true, _) => theme::HUD_BUTTON_ACTIVE,
        (false, true) => theme::BG_WIDGET_HOVER,
        (false, false) => theme::BG_WIDGET,
    };
    let stroke = if hovered {
        Stroke::new(1.0, theme::BLUE_DARK)
    } else {
        Stroke::new(1.0, theme::SEPARATOR)
    };
    painter.rect_filled(rect, Rounding::same(4.0), fill);
    painter.rect_stroke(rect, Rounding::same(4.0), stroke);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &region.label,
        FontId::proportional(13.0),
        if region.active {
            theme::WHITE
        } else {
            theme::TEXT_PRIMARY
        },
    );
}
