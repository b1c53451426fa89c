//! # 粉蓝白主题
//!
//! Isoverse 的配色方案、画布 / HUD 用色，以及应用到 egui Style 的函数。

use egui::style::WidgetVisuals;
use egui::{Color32, Rounding, Stroke, Visuals};

use crate::scene::SceneId;

// ═══════════════════════════════════════════════════════════
// 调色板常量
// ═══════════════════════════════════════════════════════════

/// 粉色（主强调色）
pub const PINK: Color32 = Color32::from_rgb(245, 169, 184);
/// 浅粉（hover / 次级）
pub const PINK_LIGHT: Color32 = Color32::from_rgb(255, 200, 210);
/// 深粉（active / pressed）
pub const PINK_DARK: Color32 = Color32::from_rgb(210, 130, 150);

/// 蓝色（次强调色）
pub const BLUE: Color32 = Color32::from_rgb(91, 206, 250);
/// 浅蓝
pub const BLUE_LIGHT: Color32 = Color32::from_rgb(145, 225, 255);
/// 深蓝
pub const BLUE_DARK: Color32 = Color32::from_rgb(60, 170, 220);

/// 白色
pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);

/// 深色背景
pub const BG_DARK: Color32 = Color32::from_rgb(30, 30, 40);
/// 面板背景
pub const BG_PANEL: Color32 = Color32::from_rgb(38, 38, 52);
/// 窗口背景
pub const BG_WINDOW: Color32 = Color32::from_rgb(42, 42, 58);
/// 控件背景（非激活）
pub const BG_WIDGET: Color32 = Color32::from_rgb(50, 50, 68);
/// 控件背景（hover）
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(62, 62, 82);
/// 控件背景（active）
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(75, 75, 100);

/// 文字颜色
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(180, 180, 200);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 145);

/// 分隔线
pub const SEPARATOR: Color32 = Color32::from_rgb(65, 65, 85);

// ═══════════════════════════════════════════════════════════
// 画布与 HUD
// ═══════════════════════════════════════════════════════════

/// 行星画布棋盘格背景
pub const CANVAS_CHECKER: [Color32; 2] = [Color32::from_gray(28), Color32::from_gray(35)];
/// 恒星系 / 银河的深空背景
pub const SPACE_BG: Color32 = Color32::from_rgb(10, 10, 30);

/// HUD 面板背景（略透明，能看到下面的世界）
pub const HUD_PANEL: Color32 = Color32::from_rgba_premultiplied(34, 34, 48, 235);
/// HUD 按钮：开启 / 选中
pub const HUD_BUTTON_ACTIVE: Color32 = PINK_DARK;

/// 背景色随场景变化
pub fn scene_background(scene: SceneId) -> Option<Color32> {
    match scene {
        SceneId::Planet => None,
        SceneId::System | SceneId::Galaxy => Some(SPACE_BG),
    }
}

// ═══════════════════════════════════════════════════════════
// 应用主题
// ═══════════════════════════════════════════════════════════

fn paint_widget(w: &mut WidgetVisuals, fill: Color32, border: Stroke, fg: Stroke) {
    w.bg_fill = fill;
    w.weak_bg_fill = fill;
    w.bg_stroke = border;
    w.fg_stroke = fg;
    w.rounding = Rounding::same(4.0);
}

/// 暗色基底上套用粉蓝白配色，HUD 按钮与 egui 控件共用同一组底色
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_WINDOW;
    visuals.extreme_bg_color = BG_DARK;
    visuals.faint_bg_color = BG_WIDGET;

    let border = Stroke::new(1.0, SEPARATOR);
    let w = &mut visuals.widgets;
    paint_widget(&mut w.noninteractive, BG_PANEL, Stroke::NONE, Stroke::new(1.0, TEXT_PRIMARY));
    paint_widget(&mut w.inactive, BG_WIDGET, border, Stroke::new(1.0, TEXT_PRIMARY));
    paint_widget(&mut w.hovered, BG_WIDGET_HOVER, Stroke::new(1.0, BLUE), Stroke::new(1.5, WHITE));
    paint_widget(&mut w.active, BG_WIDGET_ACTIVE, Stroke::new(1.5, PINK), Stroke::new(2.0, WHITE));
    paint_widget(&mut w.open, BG_WIDGET_ACTIVE, Stroke::new(1.0, BLUE_LIGHT), Stroke::new(1.0, WHITE));

    visuals.selection.bg_fill = BLUE.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, BLUE_LIGHT);
    visuals.hyperlink_color = BLUE_LIGHT;
    visuals.window_stroke = border;
    visuals.window_rounding = Rounding::same(6.0);

    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
