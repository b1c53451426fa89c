//! # 输入路由
//!
//! `Idle` / `Dragging` 两态状态机。空闲时每个事件先交给 HUD，
//! HUD 不要才交给当前场景，场景也不要才落到相机；拖拽中的
//! `PointerDrag` 只交给相机，只有主键抬起才结束拖拽。

use tracing::debug;

use super::camera::CameraController;
use super::hud::{HudAction, HudLayout};
use super::input::{InputEvent, Key, PointerButton};
use crate::scene::{SceneBehavior, SceneResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    #[default]
    Idle,
    Dragging,
}

/// 事件最终由谁处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Hud(HudAction),
    Scene,
    Camera,
    /// 相机回到场景默认位置（需要场景信息，由上下文执行）
    CenterCamera,
    DebugInfo,
    Ignored,
}

#[derive(Debug, Default)]
pub struct InputRouter {
    state: RouterState,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn route(
        &mut self,
        event: &InputEvent,
        hud: &HudLayout,
        scene: &mut dyn SceneBehavior,
        camera: &mut CameraController,
    ) -> Routed {
        let routed = match (self.state, event) {
            (RouterState::Dragging, InputEvent::PointerDrag { pos, .. }) => {
                camera.update_drag(*pos);
                Routed::Camera
            }
            (
                RouterState::Dragging,
                InputEvent::PointerUp {
                    pos,
                    button: PointerButton::Primary,
                    ..
                },
            ) => {
                camera.update_drag(*pos);
                camera.end_drag();
                self.state = RouterState::Idle;
                Routed::Camera
            }
            (RouterState::Dragging, InputEvent::PointerDown { .. }) => Routed::Ignored,
            _ => self.route_idle(event, hud, scene, camera),
        };
        debug!(?event, ?routed, state = ?self.state, "输入路由");
        routed
    }

    /// 丢弃进行中的拖拽（场景切换时调用）
    pub fn cancel(&mut self, camera: &mut CameraController) {
        camera.end_drag();
        self.state = RouterState::Idle;
    }

    fn route_idle(
        &mut self,
        event: &InputEvent,
        hud: &HudLayout,
        scene: &mut dyn SceneBehavior,
        camera: &mut CameraController,
    ) -> Routed {
        if let Some(action) = hud.offer(event) {
            return Routed::Hud(action);
        }
        if scene.handle_input(event, &camera.params()) == SceneResponse::Consumed {
            return Routed::Scene;
        }
        self.route_camera(event, camera)
    }

    fn route_camera(&mut self, event: &InputEvent, camera: &mut CameraController) -> Routed {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
                ..
            } if self.state == RouterState::Idle => {
                camera.begin_drag(pos);
                self.state = RouterState::Dragging;
                Routed::Camera
            }
            InputEvent::Scroll { pos, delta, .. } => {
                camera.apply_zoom(delta, pos);
                Routed::Camera
            }
            InputEvent::KeyPress { key, .. } => match key {
                Key::ArrowLeft => nudge(camera, (-1.0, 0.0)),
                Key::ArrowRight => nudge(camera, (1.0, 0.0)),
                Key::ArrowUp => nudge(camera, (0.0, -1.0)),
                Key::ArrowDown => nudge(camera, (0.0, 1.0)),
                Key::Plus => {
                    camera.zoom_in();
                    Routed::Camera
                }
                Key::Minus => {
                    camera.zoom_out();
                    Routed::Camera
                }
                Key::Char('c') => Routed::CenterCamera,
                Key::Char('i') => Routed::DebugInfo,
                _ => Routed::Ignored,
            },
            _ => Routed::Ignored,
        }
    }
}

fn nudge(camera: &mut CameraController, direction: (f64, f64)) -> Routed {
    camera.nudge(direction);
    Routed::Camera
}
