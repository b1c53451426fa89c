//! # 绘制接口
//!
//! 核心只产出「在屏幕某处画某个精灵」的调用，资源解析交给宿主实现的
//! [`DrawSink`]。同一帧内所有调用都来自同一份 `TransformParams`。

use crate::core::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Grass,
    Water,
    Dirt,
    Stone,
}

impl TileKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grass => "草地",
            Self::Water => "水域",
            Self::Dirt => "泥土",
            Self::Stone => "岩石",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Biped,
    Animal,
}

/// 精灵句柄：描述「画什么」，不关心怎么画
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteHandle {
    /// 堆叠方块的第 `layer` 层
    Tile { kind: TileKind, layer: u8 },
    TileOutline,
    /// 移动指令途经的格子
    PathStep,
    Unit { kind: UnitKind, selected: bool },
    Star { radius: f64, color: [u8; 3], brightness: f64 },
    Planet { radius: f64, color: [u8; 3], selected: bool },
    Orbit { radius: f64 },
    StarSystem { radius: f64, selected: bool },
    /// 旋臂引导点
    Guide,
}

pub trait DrawSink {
    /// `scale` 为本帧缩放，精灵尺寸按它放大
    fn draw_sprite(&mut self, screen_pos: Point, sprite: &SpriteHandle, scale: f64);

    fn draw_label(&mut self, screen_pos: Point, text: &str);
}

/// 只记录调用，不实际绘制
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sprites: Vec<(Point, SpriteHandle, f64)>,
    pub labels: Vec<(Point, String)>,
}

#[cfg(test)]
impl DrawSink for RecordingSink {
    fn draw_sprite(&mut self, screen_pos: Point, sprite: &SpriteHandle, scale: f64) {
        self.sprites.push((screen_pos, *sprite, scale));
    }

    fn draw_label(&mut self, screen_pos: Point, text: &str) {
        self.labels.push((screen_pos, text.to_string()));
    }
}

#[cfg(test)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&SpriteHandle) -> bool) -> usize {
        self.sprites.iter().filter(|(_, s, _)| pred(s)).count()
    }
}
