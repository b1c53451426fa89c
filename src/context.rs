//! # 游戏上下文
//!
//! 显式持有相机、输入路由、场景状态机和 HUD 布局，没有全局状态。
//! 每帧由宿主调用 [`GameContext::frame`]：按到达顺序处理输入队列，
//! 推进场景，最后给出本帧唯一的 [`TransformParams`] 快照。

use tracing::{debug, info};

use crate::config::game::{GameConfig, HudConfig};
use crate::core::camera::CameraController;
use crate::core::geometry::{Point, ScreenRect};
use crate::core::hud::{HudAction, HudLayout, HudRegion};
use crate::core::input::InputEvent;
use crate::core::router::{InputRouter, Routed, RouterState};
use crate::core::transform::TransformParams;
use crate::rendering::frame::DrawSink;
use crate::scene::{Scene, SceneBehavior, SceneId, SceneMachine};
use crate::storage::settings::UserSettings;

pub struct GameContext {
    camera: CameraController,
    router: InputRouter,
    scenes: SceneMachine,
    hud: HudLayout,
    hud_config: HudConfig,
    viewport: ScreenRect,
    /// 指针悬停位置（屏幕坐标），仅用于状态栏
    hover: Option<Point>,
}

impl GameContext {
    pub fn new(config: &GameConfig, viewport: ScreenRect) -> Self {
        let mut ctx = Self {
            camera: CameraController::new(config.camera.limits(), config.camera.pan_speed),
            router: InputRouter::new(),
            scenes: SceneMachine::new(config),
            hud: HudLayout::default(),
            hud_config: config.hud.clone(),
            viewport,
            hover: None,
        };
        ctx.apply_scene_camera();
        ctx.rebuild_hud();
        ctx
    }

    // ── 查询 ────────────────────────────────────────────────

    pub fn current_scene(&self) -> SceneId {
        self.scenes.current_scene()
    }

    pub fn scene(&self) -> &Scene {
        self.scenes.active()
    }

    pub fn router_state(&self) -> RouterState {
        self.router.state()
    }

    pub fn hud(&self) -> &HudLayout {
        &self.hud
    }

    pub fn hud_regions(&self) -> &[HudRegion] {
        self.hud.regions()
    }

    // ── 场景切换 ────────────────────────────────────────────

    /// 切换场景并同步相机投影 / 默认值、丢弃拖拽、重建 HUD。
    /// 目标即当前场景时返回 `false`，什么也不改。
    pub fn request_transition(&mut self, target: SceneId) -> bool {
        if !self.scenes.request_transition(target) {
            return false;
        }
        self.router.cancel(&mut self.camera);
        self.apply_scene_camera();
        self.rebuild_hud();
        info!(scene = ?target, regions = self.hud.regions().len(), "HUD 已重建");
        true
    }

    fn apply_scene_camera(&mut self) {
        let scene = self.scenes.active();
        self.camera.set_projection(scene.projection());
        if let Some(defaults) = scene.camera_defaults() {
            self.camera.reset_to(defaults);
        }
    }

    fn rebuild_hud(&mut self) {
        let controls = self.scenes.active().hud_controls();
        self.hud = HudLayout::build(
            self.viewport,
            &self.hud_config,
            self.scenes.current_scene(),
            &controls,
        );
        self.camera.set_origin(self.hud.world_area().center());
    }

    /// 视口尺寸变化时重新布局
    pub fn set_viewport(&mut self, viewport: ScreenRect) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.rebuild_hud();
    }

    pub fn set_hover(&mut self, pos: Option<Point>) {
        self.hover = pos;
    }

    // ── 输入 ────────────────────────────────────────────────

    /// 处理单个事件；HUD 动作与相机居中等需要上下文的后续操作在这里执行。
    pub fn handle_event(&mut self, event: &InputEvent) -> Routed {
        let routed = self.router.route(
            event,
            &self.hud,
            self.scenes.active_mut(),
            &mut self.camera,
        );
        match routed {
            Routed::Hud(action) => self.apply_hud_action(action),
            Routed::CenterCamera => self.center_camera(),
            Routed::DebugInfo => self.log_debug_info(),
            Routed::Scene | Routed::Camera | Routed::Ignored => {}
        }
        routed
    }

    fn apply_hud_action(&mut self, action: HudAction) {
        match action {
            HudAction::SwitchScene(target) => {
                self.request_transition(target);
            }
            HudAction::ToggleLayer(_) | HudAction::SelectCategory(_) => {
                self.scenes.active_mut().apply_hud(action);
                self.rebuild_hud();
            }
            HudAction::MiniMap => debug!("小地图尚未实现点击跳转"),
            HudAction::Panel => {}
        }
    }

    fn center_camera(&mut self) {
        match self.scenes.active().camera_defaults() {
            Some(defaults) => self.camera.reset_to(defaults),
            None => self.camera.look_at((0.0, 0.0)),
        }
    }

    fn log_debug_info(&self) {
        let cam = self.camera.state();
        let limits = self.camera.limits();
        let alive: Vec<SceneId> = SceneId::ALL
            .into_iter()
            .filter(|id| self.scenes.is_instantiated(*id))
            .collect();
        info!(
            scene = ?self.current_scene(),
            pan = ?cam.pan,
            zoom = cam.zoom,
            zoom_range = ?(limits.min, limits.max),
            projection = ?self.camera.projection(),
            origin = ?self.camera.origin(),
            dragging = self.camera.is_dragging(),
            router = ?self.router_state(),
            regions = self.hud.regions().len(),
            policy = ?self.scenes.policy(),
            ?alive,
            "调试信息"
        );
    }

    // ── 帧 ──────────────────────────────────────────────────

    /// 处理本帧输入 → 推进场景 → 返回本帧的变换快照
    pub fn frame(&mut self, events: &[InputEvent], dt: f64) -> TransformParams {
        for event in events {
            self.handle_event(event);
        }
        self.scenes.active_mut().update(dt);
        self.camera.params()
    }

    /// 用同一份快照绘制当前场景（裁剪到世界画布）
    pub fn render(&self, params: &TransformParams, sink: &mut dyn DrawSink) {
        self.scenes.active().render(params, self.hud.world_area(), sink);
    }

    /// 状态栏文本：场景、缩放、悬停坐标、选中信息
    pub fn status_line(&self) -> String {
        let cam = self.camera.state();
        let mut parts = vec![
            self.current_scene().label().to_string(),
            format!("缩放 {:.2}x", cam.zoom),
        ];
        if let Some(pos) = self.hover.filter(|p| self.hud.world_area().contains(*p)) {
            let params = self.camera.params();
            let world = params.screen_to_world(pos);
            if self.current_scene() == SceneId::Planet {
                let tile = params.screen_to_tile(pos);
                parts.push(format!("格 ({}, {})", tile.0, tile.1));
            } else {
                parts.push(format!("({:.0}, {:.0})", world.0, world.1));
            }
        }
        if let Some(status) = self.scenes.active().status() {
            parts.push(status);
        }
        parts.join(" | ")
    }

    // ── 设置 ────────────────────────────────────────────────

    /// 启动时恢复上次保存的设置；非法步长（≤ 1）被忽略
    pub fn apply_settings(&mut self, settings: &UserSettings) {
        if let Some(step) = settings.zoom_step {
            self.camera.set_zoom_step(step);
        }
        if let Some(policy) = settings.retention {
            self.scenes.set_policy(policy);
        }
        if let Some(planet) = self.scenes.planet_mut() {
            planet.set_show_grid(settings.planet_grid);
        }
        if !self.request_transition(settings.last_scene) {
            self.rebuild_hud();
        }
    }

    /// 把当前状态写回设置（其余字段保持原样）
    pub fn capture_settings(&self, base: &UserSettings) -> UserSettings {
        UserSettings {
            last_scene: self.current_scene(),
            planet_grid: self
                .scenes
                .planet()
                .map_or(base.planet_grid, |p| p.show_grid()),
            ..base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::load_game_config;
    use crate::core::geometry::sub;
    use crate::core::hud::LayerToggle;
    use crate::core::input::Key;
    use crate::rendering::frame::{RecordingSink, SpriteHandle};
    use crate::scene::RetentionPolicy;

    const VIEWPORT: ScreenRect = ScreenRect::new(0.0, 0.0, 1300.0, 900.0);

    fn context() -> GameContext {
        GameContext::new(&load_game_config().expect("config"), VIEWPORT)
    }

    fn button(ctx: &GameContext, action: HudAction) -> Point {
        ctx.hud_regions()
            .iter()
            .find(|r| r.action == action)
            .map(|r| r.rect.center())
            .expect("button present")
    }

    fn has_action(ctx: &GameContext, action: HudAction) -> bool {
        ctx.hud_regions().iter().any(|r| r.action == action)
    }

    #[test]
    fn starts_on_planet_centred_on_terrain() {
        let ctx = context();
        assert_eq!(ctx.current_scene(), SceneId::Planet);
        assert_eq!(ctx.camera.state().pan, (49.5, 49.5));
        assert_eq!(ctx.camera.origin(), ctx.hud().world_area().center());
        assert!(has_action(&ctx, HudAction::ToggleLayer(LayerToggle::Grid)));
    }

    #[test]
    fn transition_swaps_regions_atomically() {
        let mut ctx = context();
        assert!(ctx.request_transition(SceneId::System));
        assert_eq!(ctx.current_scene(), SceneId::System);
        assert!(has_action(&ctx, HudAction::ToggleLayer(LayerToggle::Orbits)));
        assert!(!has_action(&ctx, HudAction::ToggleLayer(LayerToggle::Grid)));
        assert!(!has_action(&ctx, HudAction::SelectCategory(0)));
        let active: Vec<_> = ctx.hud_regions().iter().filter(|r| r.active).collect();
        assert!(active.iter().any(|r| r.action == HudAction::SwitchScene(SceneId::System)));
        assert!(!active.iter().any(|r| r.action == HudAction::SwitchScene(SceneId::Planet)));
        assert_eq!(ctx.camera.state().pan, (0.0, 0.0));
    }

    #[test]
    fn transition_to_current_changes_nothing() {
        let mut ctx = context();
        let before = ctx.hud_regions().to_vec();
        assert!(!ctx.request_transition(SceneId::Planet));
        assert_eq!(ctx.hud_regions(), &before[..]);
    }

    #[test]
    fn hud_button_wins_over_world_content() {
        let mut ctx = context();
        let at = button(&ctx, HudAction::SwitchScene(SceneId::Galaxy));
        let routed = ctx.handle_event(&InputEvent::down(at));
        assert_eq!(routed, Routed::Hud(HudAction::SwitchScene(SceneId::Galaxy)));
        assert_eq!(ctx.current_scene(), SceneId::Galaxy);
        assert_eq!(ctx.router_state(), RouterState::Idle);
        assert!(!ctx.camera.is_dragging());
    }

    #[test]
    fn hotkey_mid_drag_discards_the_drag() {
        let mut ctx = context();
        // 隐藏单位，保证按下落到相机
        let units = button(&ctx, HudAction::ToggleLayer(LayerToggle::Units));
        ctx.handle_event(&InputEvent::down(units));
        ctx.handle_event(&InputEvent::down((100.0, 100.0)));
        assert_eq!(ctx.router_state(), RouterState::Dragging);

        let routed = ctx.handle_event(&InputEvent::key(Key::Char('2')));
        assert_eq!(routed, Routed::Hud(HudAction::SwitchScene(SceneId::System)));
        assert_eq!(ctx.router_state(), RouterState::Idle);
        assert!(!ctx.camera.is_dragging());

        let pan = ctx.camera.state().pan;
        ctx.handle_event(&InputEvent::drag((300.0, 300.0)));
        assert_eq!(ctx.camera.state().pan, pan);
    }

    #[test]
    fn drag_then_zoom_scenario() {
        let mut ctx = context();
        let units = button(&ctx, HudAction::ToggleLayer(LayerToggle::Units));
        ctx.handle_event(&InputEvent::down(units));

        let before = ctx.camera.state().pan;
        let params = ctx.frame(
            &[
                InputEvent::down((100.0, 100.0)),
                InputEvent::drag((150.0, 120.0)),
                InputEvent::up((150.0, 120.0)),
            ],
            0.0,
        );
        let expected = sub(before, params.projection.unproject((50.0, 20.0)));
        let pan = ctx.camera.state().pan;
        assert!((pan.0 - expected.0).abs() < 1e-9 && (pan.1 - expected.1).abs() < 1e-9);

        let anchor = (150.0, 120.0);
        let world_before = ctx.camera.params().screen_to_world(anchor);
        ctx.frame(&[InputEvent::scroll(anchor, 1.0)], 0.0);
        let world_after = ctx.camera.params().screen_to_world(anchor);
        assert!(ctx.camera.state().zoom > 1.0);
        assert!((world_before.0 - world_after.0).abs() < 1e-9);
        assert!((world_before.1 - world_after.1).abs() < 1e-9);
    }

    #[test]
    fn layer_toggle_rebuilds_regions() {
        let mut ctx = context();
        let grid = HudAction::ToggleLayer(LayerToggle::Grid);
        let at = button(&ctx, grid);
        ctx.handle_event(&InputEvent::down(at));
        let region = ctx
            .hud_regions()
            .iter()
            .find(|r| r.action == grid)
            .expect("grid toggle");
        assert!(region.active);
    }

    #[test]
    fn centre_key_restores_scene_defaults() {
        let mut ctx = context();
        ctx.handle_event(&InputEvent::key(Key::ArrowLeft));
        ctx.handle_event(&InputEvent::key(Key::Plus));
        assert_ne!(ctx.camera.state().pan, (49.5, 49.5));
        assert_eq!(
            ctx.handle_event(&InputEvent::key(Key::Char('c'))),
            Routed::CenterCamera
        );
        assert_eq!(ctx.camera.state().pan, (49.5, 49.5));
        assert_eq!(ctx.camera.state().zoom, 1.0);
    }

    #[test]
    fn resize_moves_origin_and_panel() {
        let mut ctx = context();
        let wide = ScreenRect::new(0.0, 0.0, 1600.0, 1000.0);
        ctx.set_viewport(wide);
        let panel = ctx
            .hud_regions()
            .iter()
            .find(|r| r.action == HudAction::Panel)
            .expect("panel");
        assert_eq!(panel.rect.x, 1300.0);
        assert_eq!(ctx.camera.origin(), (650.0, 500.0));
    }

    #[test]
    fn render_stays_inside_world_area() {
        let mut ctx = context();
        let params = ctx.frame(&[], 0.016);
        let mut sink = RecordingSink::default();
        ctx.render(&params, &mut sink);
        assert!(sink.count(|s| matches!(s, SpriteHandle::Tile { .. })) > 0);
    }

    #[test]
    fn status_line_reports_scene_and_hover() {
        let mut ctx = context();
        ctx.set_hover(Some(ctx.camera.origin()));
        let line = ctx.status_line();
        assert!(line.starts_with("行星"));
        assert!(line.contains("格 ("));

        ctx.set_hover(Some((1200.0, 10.0)));
        assert!(!ctx.status_line().contains("格 ("));
    }

    #[test]
    fn settings_round_trip_through_context() {
        let mut ctx = context();
        let saved = UserSettings {
            last_scene: SceneId::Galaxy,
            planet_grid: true,
            ..Default::default()
        };
        ctx.apply_settings(&saved);
        assert_eq!(ctx.current_scene(), SceneId::Galaxy);
        let captured = ctx.capture_settings(&UserSettings::default());
        assert_eq!(captured.last_scene, SceneId::Galaxy);
        assert!(captured.planet_grid);
    }

    #[test]
    fn settings_override_zoom_step_and_policy() {
        let mut ctx = context();
        ctx.apply_settings(&UserSettings {
            zoom_step: Some(1.25),
            retention: Some(RetentionPolicy::TearDownAll),
            ..Default::default()
        });
        assert_eq!(ctx.camera.limits().step, 1.25);
        ctx.request_transition(SceneId::System);
        let captured = ctx.capture_settings(&UserSettings::default());
        // 行星已被释放，沿用传入的值
        assert!(!captured.planet_grid);
        assert_eq!(captured.last_scene, SceneId::System);

        ctx.apply_settings(&UserSettings {
            zoom_step: Some(0.5),
            last_scene: SceneId::System,
            ..Default::default()
        });
        assert_eq!(ctx.camera.limits().step, 1.25);
    }
}
