//! # egui → InputEvent 桥接
//!
//! 把一帧内 egui 的原始事件按到达顺序翻译成核心的 [`InputEvent`] 队列，
//! 坐标换算到画布左上角为原点。只有在画布内按下的按键才会产生后续的
//! 拖拽 / 抬起事件。

use egui::{Event, InputState, Pos2, Rect};

use crate::core::geometry::Point;
use crate::core::input::{InputEvent, Key, Modifiers, PointerButton};

/// 滚轮增量低于此值视为抖动
const SCROLL_DEADZONE: f32 = 0.1;

#[derive(Debug, Default)]
pub struct InputBridge {
    /// 在画布内按下、尚未抬起的按键
    held: Vec<PointerButton>,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_holding(&self, button: PointerButton) -> bool {
        self.held.contains(&button)
    }

    /// 读取本帧的 egui 输入
    pub fn collect(&mut self, input: &InputState, canvas: Rect) -> Vec<InputEvent> {
        let scroll = input.raw_scroll_delta.y;
        let hover = input.pointer.hover_pos();
        self.translate(&input.events, scroll, hover, canvas, convert_modifiers(input.modifiers))
    }

    fn translate(
        &mut self,
        events: &[Event],
        scroll: f32,
        hover: Option<Pos2>,
        canvas: Rect,
        modifiers: Modifiers,
    ) -> Vec<InputEvent> {
        let local = |p: Pos2| -> Point { ((p.x - canvas.min.x) as f64, (p.y - canvas.min.y) as f64) };
        let mut out = Vec::new();

        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    let Some(button) = convert_button(*button) else {
                        continue;
                    };
                    let modifiers = convert_modifiers(*modifiers);
                    if *pressed {
                        if !canvas.contains(*pos) {
                            continue;
                        }
                        if !self.held.contains(&button) {
                            self.held.push(button);
                        }
                        out.push(InputEvent::PointerDown {
                            pos: local(*pos),
                            button,
                            modifiers,
                        });
                    } else if let Some(i) = self.held.iter().position(|b| *b == button) {
                        self.held.remove(i);
                        out.push(InputEvent::PointerUp {
                            pos: local(*pos),
                            button,
                            modifiers,
                        });
                    }
                }
                Event::PointerMoved(pos) if self.is_holding(PointerButton::Primary) => {
                    out.push(InputEvent::PointerDrag {
                        pos: local(*pos),
                        modifiers,
                    });
                }
                Event::PointerGone => self.held.clear(),
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    if let Some(key) = convert_key(*key) {
                        out.push(InputEvent::KeyPress {
                            key,
                            modifiers: convert_modifiers(*modifiers),
                        });
                    }
                }
                _ => {}
            }
        }

        if scroll.abs() > SCROLL_DEADZONE {
            if let Some(pos) = hover.filter(|p| canvas.contains(*p)) {
                out.push(InputEvent::Scroll {
                    pos: local(pos),
                    delta: scroll as f64,
                    modifiers,
                });
            }
        }

        out
    }
}

fn convert_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn convert_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: m.shift,
        ctrl: m.ctrl || m.command,
        alt: m.alt,
    }
}

fn convert_key(key: egui::Key) -> Option<Key> {
    use egui::Key as K;
    let key = match key {
        K::ArrowUp => Key::ArrowUp,
        K::ArrowDown => Key::ArrowDown,
        K::ArrowLeft => Key::ArrowLeft,
        K::ArrowRight => Key::ArrowRight,
        K::Plus | K::Equals => Key::Plus,
        K::Minus => Key::Minus,
        K::Escape => Key::Escape,
        K::Num1 => Key::Char('1'),
        K::Num2 => Key::Char('2'),
        K::Num3 => Key::Char('3'),
        K::C => Key::Char('c'),
        K::I => Key::Char('i'),
        K::R => Key::Char('r'),
        _ => return None,
    };
    Some(key)
}
