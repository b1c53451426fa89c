//! # egui 绘制实现
//!
//! [`EguiSink`] 把核心产出的精灵句柄翻译成 egui 形状：瓦片画成带两个
//! 侧面的菱形方块，天体画成圆。核心坐标相对画布左上角，这里加上偏移。

use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, Vec2};

use crate::config::game::TileMetrics;
use crate::core::geometry::Point;
use crate::rendering::frame::{DrawSink, SpriteHandle, TileKind, UnitKind};
use crate::ui::theme;

/// 地块顶面颜色
pub fn tile_color(kind: TileKind) -> Color32 {
    match kind {
        TileKind::Grass => Color32::from_rgb(96, 168, 78),
        TileKind::Water => Color32::from_rgb(64, 124, 204),
        TileKind::Dirt => Color32::from_rgb(139, 101, 62),
        TileKind::Stone => Color32::from_rgb(132, 132, 144),
    }
}

fn shade(color: Color32, factor: f32) -> Color32 {
    let f = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
    Color32::from_rgb(f(color.r()), f(color.g()), f(color.b()))
}

fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

pub struct EguiSink<'a> {
    painter: &'a Painter,
    offset: Vec2,
    tiles: TileMetrics,
}

impl<'a> EguiSink<'a> {
    pub fn new(painter: &'a Painter, canvas_min: Pos2, tiles: TileMetrics) -> Self {
        Self {
            painter,
            offset: canvas_min.to_vec2(),
            tiles,
        }
    }

    fn to_pos(&self, p: Point) -> Pos2 {
        Pos2::new(p.0 as f32, p.1 as f32) + self.offset
    }

    fn diamond(&self, c: Pos2, scale: f32) -> [Pos2; 4] {
        let hw = self.tiles.width as f32 * 0.5 * scale;
        let hh = self.tiles.height as f32 * 0.5 * scale;
        [
            Pos2::new(c.x, c.y - hh),
            Pos2::new(c.x + hw, c.y),
            Pos2::new(c.x, c.y + hh),
            Pos2::new(c.x - hw, c.y),
        ]
    }

    fn block(&self, c: Pos2, kind: TileKind, layer: u8, scale: f32) {
        let [top, right, bottom, left] = self.diamond(c, scale);
        let depth = Vec2::new(0.0, self.tiles.block_height as f32 * scale);
        // 越高的层越亮
        let base = shade(tile_color(kind), 1.0 + layer as f32 * 0.06);

        self.painter.add(Shape::convex_polygon(
            vec![left, bottom, bottom + depth, left + depth],
            shade(base, 0.7),
            Stroke::NONE,
        ));
        self.painter.add(Shape::convex_polygon(
            vec![bottom, right, right + depth, bottom + depth],
            shade(base, 0.55),
            Stroke::NONE,
        ));
        self.painter.add(Shape::convex_polygon(
            vec![top, right, bottom, left],
            base,
            Stroke::NONE,
        ));
    }
}

impl DrawSink for EguiSink<'_> {
    fn draw_sprite(&mut self, screen_pos: Point, sprite: &SpriteHandle, scale: f64) {
        let c = self.to_pos(screen_pos);
        let s = scale as f32;
        match *sprite {
            SpriteHandle::Tile { kind, layer } => self.block(c, kind, layer, s),
            SpriteHandle::TileOutline => {
                let points = self.diamond(c, s).to_vec();
                self.painter.add(Shape::closed_line(
                    points,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 60)),
                ));
            }
            SpriteHandle::PathStep => {
                self.painter.circle_filled(
                    c,
                    3.0 * s,
                    Color32::from_rgba_unmultiplied(255, 230, 120, 160),
                );
            }
            SpriteHandle::Unit { kind, selected } => {
                let color = match kind {
                    UnitKind::Biped => theme::BLUE,
                    UnitKind::Animal => Color32::from_rgb(205, 150, 90),
                };
                let body = c - Vec2::new(0.0, 8.0 * s);
                self.painter.circle_filled(body, 7.0 * s, color);
                if selected {
                    self.painter.circle_stroke(body, 10.0 * s, Stroke::new(2.0, theme::PINK));
                }
            }
            SpriteHandle::Star {
                radius,
                color,
                brightness,
            } => {
                let r = (radius as f32 * s).max(1.0);
                self.painter
                    .circle_filled(c, r, shade(rgb(color), brightness as f32));
            }
            SpriteHandle::Planet {
                radius,
                color,
                selected,
            } => {
                let r = (radius as f32 * s).max(2.0);
                self.painter.circle_filled(c, r, rgb(color));
                if selected {
                    self.painter
                        .circle_stroke(c, r + 4.0, Stroke::new(2.0, theme::PINK));
                }
            }
            SpriteHandle::Orbit { radius } => {
                self.painter.circle_stroke(
                    c,
                    radius as f32 * s,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(180, 180, 220, 50)),
                );
            }
            SpriteHandle::StarSystem { radius, selected } => {
                let r = (radius as f32 * s).max(2.0);
                self.painter.circle_filled(c, r * 0.5, theme::WHITE);
                self.painter.circle_stroke(
                    c,
                    r,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 90)),
                );
                if selected {
                    self.painter
                        .circle_stroke(c, r + 4.0, Stroke::new(2.0, theme::BLUE_LIGHT));
                }
            }
            SpriteHandle::Guide => {
                self.painter
                    .circle_filled(c, 1.5, Color32::from_rgb(40, 60, 140));
            }
        }
    }

    fn draw_label(&mut self, screen_pos: Point, text: &str) {
        self.painter.text(
            self.to_pos(screen_pos),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(12.0),
            theme::TEXT_SECONDARY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_scales_and_saturates() {
        let c = Color32::from_rgb(100, 200, 250);
        assert_eq!(shade(c, 0.5), Color32::from_rgb(50, 100, 125));
        assert_eq!(shade(c, 2.0), Color32::from_rgb(200, 255, 255));
    }

    #[test]
    fn tile_kinds_have_distinct_colors() {
        let kinds = [TileKind::Grass, TileKind::Water, TileKind::Dirt, TileKind::Stone];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(tile_color(*a), tile_color(*b));
            }
        }
    }
}
