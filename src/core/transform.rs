//! # 坐标变换
//!
//! 世界坐标 ↔ 屏幕坐标的纯函数集合。
//!
//! ```text
//! screen = origin + zoom · B · (world − pan)
//! world  = pan + B⁻¹ · (screen − origin) / zoom
//! ```
//!
//! `B` 是投影基：行星层为等距基 `[[tw/2, −tw/2], [th/2, th/2]]`，
//! 恒星系 / 银河层为单位阵。两个方向严格互逆（浮点误差内）。
//! 等距世界坐标以「格」为单位：格 `(gx, gy)` 的中心就是世界点 `(gx, gy)`。

use super::camera::CameraState;
use super::geometry::{Point, ScreenRect, add, scale, sub};

/// 投影基
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Isometric { tile_width: f64, tile_height: f64 },
    Planar,
}

impl Projection {
    pub fn isometric(tile_width: f64, tile_height: f64) -> Self {
        Self::Isometric {
            tile_width,
            tile_height,
        }
    }

    /// `B · v`
    pub fn project(&self, v: Point) -> Point {
        match *self {
            Self::Isometric {
                tile_width,
                tile_height,
            } => (
                (v.0 - v.1) * tile_width * 0.5,
                (v.0 + v.1) * tile_height * 0.5,
            ),
            Self::Planar => v,
        }
    }

    /// `B⁻¹ · v`
    pub fn unproject(&self, v: Point) -> Point {
        match *self {
            Self::Isometric {
                tile_width,
                tile_height,
            } => {
                let a = v.0 / (tile_width * 0.5);
                let b = v.1 / (tile_height * 0.5);
                ((a + b) * 0.5, (b - a) * 0.5)
            }
            Self::Planar => v,
        }
    }
}

/// 一帧内只读的变换快照。
///
/// 每帧由相机生成一次，本帧所有绘制共享同一份，避免瓦片与精灵
/// 在同一遍绘制中看到不同的相机状态。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub camera: CameraState,
    pub projection: Projection,
    /// `pan` 所对应的屏幕点（世界画布中心）
    pub origin: Point,
}

impl TransformParams {
    pub fn new(camera: CameraState, projection: Projection, origin: Point) -> Self {
        Self {
            camera,
            projection,
            origin,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        let rel = sub(world, self.camera.pan);
        add(self.origin, scale(self.projection.project(rel), self.camera.zoom))
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        let rel = scale(sub(screen, self.origin), 1.0 / self.camera.zoom);
        add(self.camera.pan, self.projection.unproject(rel))
    }

    /// 屏幕点所在的格子（格子中心为整数世界坐标，故取四舍五入）
    pub fn screen_to_tile(&self, screen: Point) -> (i64, i64) {
        let w = self.screen_to_world(screen);
        ((w.0 + 0.5).floor() as i64, (w.1 + 0.5).floor() as i64)
    }

    /// 格子中心的屏幕坐标，`lift` 为向上抬升的世界像素（堆叠层高）
    pub fn tile_center(&self, tile: (i64, i64), lift: f64) -> Point {
        let c = self.world_to_screen((tile.0 as f64, tile.1 as f64));
        (c.0, c.1 - lift * self.camera.zoom)
    }

    /// 格子菱形的四个顶点：上、右、下、左
    pub fn tile_corners(&self, tile: (i64, i64), lift: f64) -> [Point; 4] {
        let (x, y) = (tile.0 as f64, tile.1 as f64);
        let z = self.camera.zoom * lift;
        [
            (x - 0.5, y - 0.5),
            (x + 0.5, y - 0.5),
            (x + 0.5, y + 0.5),
            (x - 0.5, y + 0.5),
        ]
        .map(|w| {
            let s = self.world_to_screen(w);
            (s.0, s.1 - z)
        })
    }

    /// 格子在屏幕上的包围盒
    pub fn tile_bounds(&self, tile: (i64, i64)) -> ScreenRect {
        let corners = self.tile_corners(tile, 0.0);
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        ScreenRect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// 视口四角反投影后的世界包围盒 (min, max)
    pub fn visible_world_bounds(&self, viewport: ScreenRect) -> (Point, Point) {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for corner in viewport.corners() {
            let w = self.screen_to_world(corner);
            min = (min.0.min(w.0), min.1.min(w.1));
            max = (max.0.max(w.0), max.1.max(w.1));
        }
        (min, max)
    }

    /// 视口内可见的格子范围（含 `margin` 格余量），限制在 `width × height` 网格内。
    pub fn visible_tiles(
        &self,
        viewport: ScreenRect,
        width: u32,
        height: u32,
        margin: i64,
    ) -> Option<TileRange> {
        if width == 0 || height == 0 {
            return None;
        }
        let (min, max) = self.visible_world_bounds(viewport);
        let x0 = (min.0.floor() as i64 - margin).max(0);
        let y0 = (min.1.floor() as i64 - margin).max(0);
        let x1 = (max.0.ceil() as i64 + margin).min(width as i64 - 1);
        let y1 = (max.1.ceil() as i64 + margin).min(height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(TileRange { x0, y0, x1, y1 })
    }
}

/// 两格之间的欧氏距离（格为单位）
pub fn tile_distance(a: (i64, i64), b: (i64, i64)) -> f64 {
    ((b.0 - a.0) as f64).hypot((b.1 - a.1) as f64)
}

/// 闭区间格子范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl TileRange {
    /// 按 `x + y` 对角线由远到近遍历（等距画家顺序）
    pub fn iter_back_to_front(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let (x0, y0, x1, y1) = (self.x0, self.y0, self.x1, self.y1);
        (x0 + y0..=x1 + y1).flat_map(move |d| {
            let start = x0.max(d - y1);
            let end = x1.min(d - y0);
            (start..=end).map(move |x| (x, d - x))
        })
    }
}
