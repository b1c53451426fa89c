//! # 屏幕几何
//!
//! 坐标统一用 `(f64, f64)` 元组表示；[`ScreenRect`] 是 HUD 命中测试
//! 与视口裁剪共用的轴对齐矩形（y 轴向下）。

/// 二维点 / 向量
pub type Point = (f64, f64);

pub fn add(a: Point, b: Point) -> Point {
    (a.0 + b.0, a.1 + b.1)
}

pub fn sub(a: Point, b: Point) -> Point {
    (a.0 - b.0, a.1 - b.1)
}

pub fn scale(a: Point, k: f64) -> Point {
    (a.0 * k, a.1 * k)
}

pub fn distance(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// 以左上角 + 尺寸定义的矩形
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ScreenRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// 半开区间判定；NaN 坐标永远不在内部。
    pub fn contains(&self, p: Point) -> bool {
        p.0 >= self.x && p.0 < self.right() && p.1 >= self.y && p.1 < self.bottom()
    }

    /// 开区间相交：只共享一条边不算
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// 四周各扩展 `margin`
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// 从右侧切下宽 `width` 的一条，返回 (左侧剩余, 右侧条)
    pub fn split_right(&self, width: f64) -> (Self, Self) {
        let width = width.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, self.w - width, self.h),
            Self::new(self.right() - width, self.y, width, self.h),
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            (self.x, self.y),
            (self.right(), self.y),
            (self.right(), self.bottom()),
            (self.x, self.bottom()),
        ]
    }
}
