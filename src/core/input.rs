//! 宿主无关的输入事件。屏幕坐标，y 轴向下。

use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// 字母与数字键，统一为小写
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Plus,
    Minus,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerDrag {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// `delta > 0` 为放大
    Scroll {
        pos: Point,
        delta: f64,
        modifiers: Modifiers,
    },
    KeyPress {
        key: Key,
        modifiers: Modifiers,
    },
}

// ── 测试用便捷构造 ──────────────────────────────────────

#[cfg(test)]
impl InputEvent {
    pub fn down(pos: Point) -> Self {
        Self::PointerDown {
            pos,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn secondary_down(pos: Point) -> Self {
        Self::PointerDown {
            pos,
            button: PointerButton::Secondary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn drag(pos: Point) -> Self {
        Self::PointerDrag {
            pos,
            modifiers: Modifiers::default(),
        }
    }

    pub fn up(pos: Point) -> Self {
        Self::PointerUp {
            pos,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn scroll(pos: Point, delta: f64) -> Self {
        Self::Scroll {
            pos,
            delta,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key(key: Key) -> Self {
        Self::KeyPress {
            key,
            modifiers: Modifiers::default(),
        }
    }
}
