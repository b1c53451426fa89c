//! # 场景状态机
//!
//! 三个顶层场景构成封闭的 [`Scene`] 枚举，共同实现 [`SceneBehavior`]。
//! [`SceneMachine`] 只在收到显式的 `request_transition` 时切换：
//! 旧场景 `on_exit` → 按保留策略决定留存或丢弃 → 目标场景（必要时新建）
//! `on_enter`。初始场景为行星，没有终止状态。

pub mod galaxy;
pub mod pathfind;
pub mod planet;
pub mod system;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::game::GameConfig;
use crate::core::camera::CameraState;
use crate::core::geometry::{Point, ScreenRect, distance};
use crate::core::hud::{HudAction, HudControl};
use crate::core::input::InputEvent;
use crate::core::transform::{Projection, TransformParams};
use crate::rendering::frame::DrawSink;

use galaxy::GalaxyScene;
use planet::PlanetScene;
use system::SystemScene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    #[default]
    Planet,
    System,
    Galaxy,
}

impl SceneId {
    pub const ALL: [SceneId; 3] = [SceneId::Planet, SceneId::System, SceneId::Galaxy];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Planet => "行星",
            Self::System => "恒星系",
            Self::Galaxy => "银河",
        }
    }
}

/// 离开场景后是否保留其资源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// 行星常驻，恒星系 / 银河每次进入时重建
    #[default]
    RetainPlanet,
    RetainAll,
    TearDownAll,
}

impl RetentionPolicy {
    pub fn retains(&self, id: SceneId) -> bool {
        match self {
            Self::RetainPlanet => id == SceneId::Planet,
            Self::RetainAll => true,
            Self::TearDownAll => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneResponse {
    Consumed,
    Ignored,
}

/// 每个场景实现的能力接口
pub trait SceneBehavior {
    fn id(&self) -> SceneId;

    /// 进入时调用；尚未加载的资源在这里生成
    fn on_enter(&mut self) {}

    /// 离开时调用；清理本次访问的临时状态
    fn on_exit(&mut self) {}

    fn is_loaded(&self) -> bool {
        true
    }

    fn projection(&self) -> Projection {
        Projection::Planar
    }

    /// 场景自带的相机默认值；`None` 表示沿用当前相机
    fn camera_defaults(&self) -> Option<CameraState> {
        None
    }

    fn handle_input(&mut self, event: &InputEvent, params: &TransformParams) -> SceneResponse;

    fn hud_controls(&self) -> Vec<HudControl> {
        Vec::new()
    }

    /// HUD 上属于本场景的按钮被点击
    fn apply_hud(&mut self, _action: HudAction) {}

    fn update(&mut self, _dt: f64) {}

    fn render(&self, params: &TransformParams, viewport: ScreenRect, sink: &mut dyn DrawSink);

    /// 状态栏上显示的选中信息
    fn status(&self) -> Option<String> {
        None
    }
}

/// 离 `pos` 最近且落在各自拾取半径内的候选项
pub(crate) fn pick_nearest(
    candidates: impl Iterator<Item = (usize, Point, f64)>,
    pos: Point,
) -> Option<usize> {
    candidates
        .map(|(i, at, radius)| (i, distance(at, pos), radius))
        .filter(|(_, d, radius)| d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _, _)| i)
}

pub enum Scene {
    Planet(PlanetScene),
    System(SystemScene),
    Galaxy(GalaxyScene),
}

impl Scene {
    /// 新建一个未加载的场景实例
    pub fn new(id: SceneId, config: &GameConfig) -> Self {
        match id {
            SceneId::Planet => Self::Planet(PlanetScene::new(
                config.scenes.planet.clone(),
                config.tiles,
            )),
            SceneId::System => Self::System(SystemScene::new(config.scenes.system.clone())),
            SceneId::Galaxy => Self::Galaxy(GalaxyScene::new(config.scenes.galaxy.clone())),
        }
    }

    fn inner(&self) -> &dyn SceneBehavior {
        match self {
            Self::Planet(s) => s,
            Self::System(s) => s,
            Self::Galaxy(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SceneBehavior {
        match self {
            Self::Planet(s) => s,
            Self::System(s) => s,
            Self::Galaxy(s) => s,
        }
    }
}

impl SceneBehavior for Scene {
    fn id(&self) -> SceneId {
        self.inner().id()
    }

    fn on_enter(&mut self) {
        self.inner_mut().on_enter()
    }

    fn on_exit(&mut self) {
        self.inner_mut().on_exit()
    }

    fn is_loaded(&self) -> bool {
        self.inner().is_loaded()
    }

    fn projection(&self) -> Projection {
        self.inner().projection()
    }

    fn camera_defaults(&self) -> Option<CameraState> {
        self.inner().camera_defaults()
    }

    fn handle_input(&mut self, event: &InputEvent, params: &TransformParams) -> SceneResponse {
        self.inner_mut().handle_input(event, params)
    }

    fn hud_controls(&self) -> Vec<HudControl> {
        self.inner().hud_controls()
    }

    fn apply_hud(&mut self, action: HudAction) {
        self.inner_mut().apply_hud(action)
    }

    fn update(&mut self, dt: f64) {
        self.inner_mut().update(dt)
    }

    fn render(&self, params: &TransformParams, viewport: ScreenRect, sink: &mut dyn DrawSink) {
        self.inner().render(params, viewport, sink)
    }

    fn status(&self) -> Option<String> {
        self.inner().status()
    }
}

pub struct SceneMachine {
    active: Scene,
    /// 被保留的非活动场景
    parked: HashMap<SceneId, Scene>,
    policy: RetentionPolicy,
    config: GameConfig,
}

impl SceneMachine {
    /// 以行星为初始场景启动
    pub fn new(config: &GameConfig) -> Self {
        let mut active = Scene::new(SceneId::Planet, config);
        active.on_enter();
        info!(scene = ?SceneId::Planet, "进入初始场景");
        Self {
            active,
            parked: HashMap::new(),
            policy: config.retention,
            config: config.clone(),
        }
    }

    pub fn current_scene(&self) -> SceneId {
        self.active.id()
    }

    pub fn active(&self) -> &Scene {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Scene {
        &mut self.active
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RetentionPolicy) {
        self.policy = policy;
        let dropped: Vec<SceneId> = self
            .parked
            .keys()
            .copied()
            .filter(|id| !policy.retains(*id))
            .collect();
        for id in dropped {
            self.parked.remove(&id);
            debug!(scene = ?id, "保留策略变更，释放场景");
        }
    }

    /// 行星实例（活动或被保留），用于保存行星相关的设置
    pub fn planet(&self) -> Option<&PlanetScene> {
        let scene = if self.active.id() == SceneId::Planet {
            Some(&self.active)
        } else {
            self.parked.get(&SceneId::Planet)
        };
        match scene {
            Some(Scene::Planet(p)) => Some(p),
            _ => None,
        }
    }

    pub fn planet_mut(&mut self) -> Option<&mut PlanetScene> {
        let scene = if self.active.id() == SceneId::Planet {
            Some(&mut self.active)
        } else {
            self.parked.get_mut(&SceneId::Planet)
        };
        match scene {
            Some(Scene::Planet(p)) => Some(p),
            _ => None,
        }
    }

    /// 场景实例是否存在（活动或被保留）
    pub fn is_instantiated(&self, id: SceneId) -> bool {
        self.active.id() == id || self.parked.contains_key(&id)
    }

    /// 切换到 `target`；目标即当前场景时什么也不做，返回 `false`。
    pub fn request_transition(&mut self, target: SceneId) -> bool {
        let from = self.active.id();
        if target == from {
            return false;
        }

        self.active.on_exit();
        let next = match self.parked.remove(&target) {
            Some(scene) => scene,
            None => {
                debug!(scene = ?target, "首次进入，创建场景实例");
                Scene::new(target, &self.config)
            }
        };
        let previous = std::mem::replace(&mut self.active, next);
        if self.policy.retains(from) {
            self.parked.insert(from, previous);
        } else {
            debug!(scene = ?from, "释放场景资源");
            drop(previous);
        }
        self.active.on_enter();

        info!(?from, to = ?target, "场景切换");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::load_game_config;

    fn machine(policy: RetentionPolicy) -> SceneMachine {
        let mut config = load_game_config().expect("config");
        config.retention = policy;
        SceneMachine::new(&config)
    }

    #[test]
    fn starts_on_a_loaded_planet() {
        let m = machine(RetentionPolicy::RetainPlanet);
        assert_eq!(m.current_scene(), SceneId::Planet);
        assert!(m.active().is_loaded());
    }

    #[test]
    fn transition_to_current_is_noop() {
        let mut m = machine(RetentionPolicy::RetainPlanet);
        assert!(!m.request_transition(SceneId::Planet));
        assert_eq!(m.current_scene(), SceneId::Planet);
    }

    #[test]
    fn retain_planet_policy_keeps_planet_and_drops_the_rest() {
        let mut m = machine(RetentionPolicy::RetainPlanet);
        assert!(m.request_transition(SceneId::System));
        assert_eq!(m.current_scene(), SceneId::System);
        assert!(m.active().is_loaded());
        assert!(m.is_instantiated(SceneId::Planet));

        assert!(m.request_transition(SceneId::Galaxy));
        assert!(!m.is_instantiated(SceneId::System));
        assert!(m.is_instantiated(SceneId::Planet));
    }

    #[test]
    fn tear_down_all_keeps_only_the_active_scene() {
        let mut m = machine(RetentionPolicy::TearDownAll);
        m.request_transition(SceneId::Galaxy);
        assert!(!m.is_instantiated(SceneId::Planet));
        m.request_transition(SceneId::Planet);
        assert!(m.active().is_loaded());
        assert!(!m.is_instantiated(SceneId::Galaxy));
    }

    #[test]
    fn retain_all_keeps_every_visited_scene() {
        let mut m = machine(RetentionPolicy::RetainAll);
        m.request_transition(SceneId::System);
        m.request_transition(SceneId::Galaxy);
        for id in SceneId::ALL {
            assert!(m.is_instantiated(id), "{id:?}");
        }
    }

    #[test]
    fn tightening_policy_releases_parked_scenes() {
        let mut m = machine(RetentionPolicy::RetainAll);
        m.request_transition(SceneId::System);
        m.request_transition(SceneId::Galaxy);
        m.set_policy(RetentionPolicy::RetainPlanet);
        assert!(m.is_instantiated(SceneId::Planet));
        assert!(!m.is_instantiated(SceneId::System));
    }

    #[test]
    fn scene_ids_serialize_snake_case() {
        let json = serde_json::to_string(&SceneId::Galaxy).expect("serialize");
        assert_eq!(json, "\"galaxy\"");
    }
}
