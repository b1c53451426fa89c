//! # 相机控制器
//!
//! 持有平移 / 缩放状态，消费拖拽、滚轮与键盘输入，并为每帧生成
//! [`TransformParams`] 快照。所有越界缩放请求都被静默钳制。

use super::geometry::{Point, scale, sub};
use super::transform::{Projection, TransformParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// 视口中心对应的世界坐标
    pub pan: Point,
    pub zoom: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            pan: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    /// 每个滚轮刻度的缩放倍率（> 1）
    pub step: f64,
}

impl ZoomLimits {
    /// 钳制到 `[min, max]`；NaN 回落到下界。
    pub fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min;
        }
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    limits: ZoomLimits,
    projection: Projection,
    origin: Point,
    /// 拖拽中上一次的指针位置
    drag_anchor: Option<Point>,
    pan_speed: f64,
}

impl CameraController {
    pub fn new(limits: ZoomLimits, pan_speed: f64) -> Self {
        Self {
            state: CameraState {
                pan: (0.0, 0.0),
                zoom: limits.clamp(1.0),
            },
            limits,
            projection: Projection::Planar,
            origin: (0.0, 0.0),
            drag_anchor: None,
            pan_speed,
        }
    }

    // ── accessors ───────────────────────────────────────────

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// 本帧的只读变换快照
    pub fn params(&self) -> TransformParams {
        TransformParams::new(self.state, self.projection, self.origin)
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_zoom_step(&mut self, step: f64) {
        if step > 1.0 && step.is_finite() {
            self.limits.step = step;
        }
    }

    /// 直接设定相机（场景默认值 / 居中），缩放同样被钳制。
    pub fn reset_to(&mut self, state: CameraState) {
        self.state = CameraState {
            pan: state.pan,
            zoom: self.limits.clamp(state.zoom),
        };
    }

    // ── drag ────────────────────────────────────────────────

    pub fn begin_drag(&mut self, screen_pos: Point) {
        self.drag_anchor = Some(screen_pos);
    }

    /// 屏幕位移按当前缩放换算成世界位移，使光标下的内容跟随光标。
    pub fn update_drag(&mut self, screen_pos: Point) {
        let Some(last) = self.drag_anchor else {
            return;
        };
        let delta = sub(screen_pos, last);
        if delta.0.is_finite() && delta.1.is_finite() {
            self.shift_view(delta);
            self.drag_anchor = Some(screen_pos);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    // ── zoom ────────────────────────────────────────────────

    /// 以 `anchor` 为中心缩放：`zoom *= step^sign(delta)`，随后重新求解
    /// `pan`，使锚点下的世界坐标在缩放前后保持不变。
    pub fn apply_zoom(&mut self, delta: f64, anchor: Point) {
        if delta == 0.0 || delta.is_nan() {
            return;
        }
        if !(anchor.0.is_finite() && anchor.1.is_finite()) {
            return;
        }
        let factor = if delta > 0.0 {
            self.limits.step
        } else {
            1.0 / self.limits.step
        };
        self.zoom_at(self.state.zoom * factor, anchor);
    }

    /// 以视口中心缩放（键盘 + / -）
    pub fn zoom_in(&mut self) {
        self.apply_zoom(1.0, self.origin);
    }

    pub fn zoom_out(&mut self) {
        self.apply_zoom(-1.0, self.origin);
    }

    fn zoom_at(&mut self, requested: f64, anchor: Point) {
        let new_zoom = self.limits.clamp(requested);
        if new_zoom == self.state.zoom {
            return;
        }
        let world_anchor = self.params().screen_to_world(anchor);
        let offset = self
            .projection
            .unproject(scale(sub(anchor, self.origin), 1.0 / new_zoom));
        self.state = CameraState {
            pan: sub(world_anchor, offset),
            zoom: new_zoom,
        };
    }

    // ── keyboard pan ────────────────────────────────────────

    /// 键盘平移：`direction` 为屏幕方向（如 (-1, 0) 表示向左看），
    /// 每次移动 `pan_speed` 个屏幕像素。
    pub fn nudge(&mut self, direction: Point) {
        let delta = scale(direction, -self.pan_speed);
        self.shift_view(delta);
    }

    /// 让世界内容在屏幕上移动 `screen_delta`
    fn shift_view(&mut self, screen_delta: Point) {
        let world_delta = self
            .projection
            .unproject(scale(screen_delta, 1.0 / self.state.zoom));
        self.state.pan = sub(self.state.pan, world_delta);
    }

    /// 视口中心的世界坐标移到 `world`
    pub fn look_at(&mut self, world: Point) {
        self.state.pan = world;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn limits() -> ZoomLimits {
        ZoomLimits {
            min: 0.5,
            max: 3.0,
            step: 1.1,
        }
    }

    fn iso_camera() -> CameraController {
        let mut cam = CameraController::new(limits(), 40.0);
        cam.set_projection(Projection::isometric(64.0, 32.0));
        cam.set_origin((650.0, 450.0));
        cam
    }

    fn close(a: Point, b: Point, eps: f64) -> bool {
        (a.0 - b.0).abs() < eps && (a.1 - b.1).abs() < eps
    }

    #[test]
    fn begin_drag_does_not_move_pan() {
        let mut cam = iso_camera();
        cam.begin_drag((100.0, 100.0));
        assert_eq!(cam.state().pan, (0.0, 0.0));
        assert!(cam.is_dragging());
    }

    #[test]
    fn drag_scenario_then_anchored_zoom() {
        let mut cam = iso_camera();
        cam.begin_drag((100.0, 100.0));
        cam.update_drag((150.0, 120.0));
        cam.end_drag();

        let expected = {
            let d = Projection::isometric(64.0, 32.0).unproject((50.0, 20.0));
            (-d.0, -d.1)
        };
        assert!(close(cam.state().pan, expected, 1e-12));

        let before = cam.params().screen_to_world((150.0, 120.0));
        cam.apply_zoom(1.0, (150.0, 120.0));
        let after = cam.params().screen_to_world((150.0, 120.0));
        assert!((cam.state().zoom - 1.1).abs() < 1e-12);
        assert!(close(before, after, 1e-9));
    }

    #[test]
    fn drag_keeps_grabbed_point_under_cursor_at_any_zoom() {
        for zoom in [0.5, 1.0, 2.7] {
            let mut cam = iso_camera();
            cam.reset_to(CameraState {
                pan: (10.0, 4.0),
                zoom,
            });
            let grabbed = cam.params().screen_to_world((300.0, 200.0));
            cam.begin_drag((300.0, 200.0));
            cam.update_drag((340.0, 260.0));
            cam.update_drag((410.0, 180.0));
            let screen = cam.params().world_to_screen(grabbed);
            assert!(close(screen, (410.0, 180.0), 1e-9), "zoom {zoom}: {screen:?}");
        }
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut cam = iso_camera();
        cam.update_drag((500.0, 500.0));
        assert_eq!(cam.state().pan, (0.0, 0.0));
    }

    #[test]
    fn end_drag_clears_anchor() {
        let mut cam = iso_camera();
        cam.begin_drag((1.0, 1.0));
        cam.end_drag();
        assert!(!cam.is_dragging());
    }

    #[test]
    fn zero_delta_is_a_noop() {
        let mut cam = iso_camera();
        let before = cam.state();
        cam.apply_zoom(0.0, (20.0, 20.0));
        assert_eq!(cam.state(), before);
    }

    #[test]
    fn reset_clamps_zoom() {
        let mut cam = iso_camera();
        cam.reset_to(CameraState {
            pan: (1.0, 2.0),
            zoom: 0.0,
        });
        assert_eq!(cam.state().zoom, 0.5);
        cam.reset_to(CameraState {
            pan: (1.0, 2.0),
            zoom: 99.0,
        });
        assert_eq!(cam.state().zoom, 3.0);
    }

    #[test]
    fn nan_zoom_falls_back_to_minimum() {
        assert_eq!(limits().clamp(f64::NAN), 0.5);
    }

    #[test]
    fn nudge_left_moves_content_right() {
        let mut cam = iso_camera();
        let p = cam.params().world_to_screen((3.0, 3.0));
        cam.nudge((-1.0, 0.0));
        let q = cam.params().world_to_screen((3.0, 3.0));
        assert!((q.0 - p.0 - 40.0).abs() < 1e-9);
        assert!((q.1 - p.1).abs() < 1e-9);
    }

    #[test]
    fn keyboard_zoom_keeps_origin_fixed() {
        let mut cam = iso_camera();
        cam.look_at((20.0, 30.0));
        cam.zoom_in();
        assert!(close(cam.params().screen_to_world((650.0, 450.0)), (20.0, 30.0), 1e-9));
    }

    #[test]
    fn zoom_step_override_rejects_non_growing_steps() {
        let mut cam = iso_camera();
        cam.set_zoom_step(0.9);
        assert_eq!(cam.limits().step, 1.1);
        cam.set_zoom_step(1.25);
        assert_eq!(cam.limits().step, 1.25);
    }

    proptest! {
        #[test]
        fn zoom_anchor_is_invariant(
            ax in 0.0f64..1300.0,
            ay in 0.0f64..900.0,
            px in -100.0f64..100.0,
            py in -100.0f64..100.0,
            zoom in 0.5f64..3.0,
            deltas in proptest::collection::vec(-3.0f64..3.0, 1..12),
        ) {
            let mut cam = iso_camera();
            cam.reset_to(CameraState { pan: (px, py), zoom });
            for delta in deltas {
                let before = cam.params().screen_to_world((ax, ay));
                cam.apply_zoom(delta, (ax, ay));
                let after = cam.params().screen_to_world((ax, ay));
                prop_assert!((before.0 - after.0).abs() < 1e-9);
                prop_assert!((before.1 - after.1).abs() < 1e-9);
            }
        }

        #[test]
        fn zoom_stays_within_limits(steps in proptest::collection::vec(-5.0f64..5.0, 1..200)) {
            let mut cam = iso_camera();
            for delta in steps {
                cam.apply_zoom(delta, (200.0, 200.0));
                let z = cam.state().zoom;
                prop_assert!((0.5..=3.0).contains(&z), "zoom {}", z);
            }
        }
    }

    #[test]
    fn repeated_zoom_out_saturates_at_min() {
        let mut cam = iso_camera();
        for _ in 0..500 {
            cam.apply_zoom(-1.0, (10.0, 10.0));
        }
        assert_eq!(cam.state().zoom, 0.5);
        for _ in 0..500 {
            cam.apply_zoom(1.0, (10.0, 10.0));
        }
        assert_eq!(cam.state().zoom, 3.0);
    }
}
