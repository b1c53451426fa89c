//! # 恒星系场景
//!
//! 中心恒星 + 3~8 颗沿圆轨道运行的行星，平面投影，世界单位即 zoom = 1 时的像素。

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::{SceneBehavior, SceneId, SceneResponse, pick_nearest};
use crate::config::game::SystemConfig;
use crate::core::camera::CameraState;
use crate::core::geometry::{Point, ScreenRect};
use crate::core::hud::{HudAction, HudControl, LayerToggle};
use crate::core::input::{InputEvent, Key, PointerButton};
use crate::core::transform::TransformParams;
use crate::rendering::frame::{DrawSink, SpriteHandle};

const STAR_RADIUS: f64 = 50.0;
const STAR_COLOR: [u8; 3] = [255, 255, 0];
const FIRST_ORBIT: f64 = 150.0;
const ORBIT_GAP: f64 = 80.0;
/// 小行星在屏幕上也至少留出这么大的拾取半径
const MIN_PICK_RADIUS: f64 = 8.0;

const PLANET_COLORS: [[u8; 3]; 8] = [
    [139, 69, 19],
    [255, 140, 0],
    [0, 191, 255],
    [255, 20, 147],
    [128, 0, 128],
    [255, 215, 0],
    [0, 255, 127],
    [255, 69, 0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingPlanet {
    pub name: String,
    pub orbit_radius: f64,
    /// 当前轨道角（弧度）
    pub angle: f64,
    /// 角速度（弧度 / 秒）
    pub speed: f64,
    pub size: f64,
    pub color: [u8; 3],
}

impl OrbitingPlanet {
    pub fn position(&self) -> Point {
        (
            self.angle.cos() * self.orbit_radius,
            self.angle.sin() * self.orbit_radius,
        )
    }
}

fn generate_planets(config: &SystemConfig) -> Vec<OrbitingPlanet> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let lo = config.min_planets.min(config.max_planets);
    let hi = config.max_planets.max(lo);
    let count = rng.gen_range(lo..=hi);
    (0..count)
        .map(|i| OrbitingPlanet {
            name: format!("行星 {}", i + 1),
            orbit_radius: FIRST_ORBIT + i as f64 * ORBIT_GAP,
            angle: i as f64 / count as f64 * TAU,
            speed: rng.gen_range(0.06..0.3),
            size: f64::from(rng.gen_range(15u32..=35)),
            color: PLANET_COLORS.choose(&mut rng).copied().unwrap_or(PLANET_COLORS[0]),
        })
        .collect()
}

pub struct SystemScene {
    config: SystemConfig,
    planets: Option<Vec<OrbitingPlanet>>,
    selected: Option<usize>,
    show_orbits: bool,
    show_labels: bool,
}

impl SystemScene {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            planets: None,
            selected: None,
            show_orbits: true,
            show_labels: true,
        }
    }

    pub fn planets(&self) -> &[OrbitingPlanet] {
        self.planets.as_deref().unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&OrbitingPlanet> {
        self.selected.and_then(|i| self.planets().get(i))
    }

    fn pick(&self, params: &TransformParams, pos: Point) -> Option<usize> {
        let zoom = params.zoom();
        let candidates = self.planets().iter().enumerate().map(|(i, p)| {
            (
                i,
                params.world_to_screen(p.position()),
                (p.size * zoom).max(MIN_PICK_RADIUS),
            )
        });
        pick_nearest(candidates, pos)
    }
}

impl SceneBehavior for SystemScene {
    fn id(&self) -> SceneId {
        SceneId::System
    }

    fn on_enter(&mut self) {
        if self.planets.is_none() {
            let planets = generate_planets(&self.config);
            info!(planets = planets.len(), "恒星系生成完成");
            self.planets = Some(planets);
        }
    }

    fn on_exit(&mut self) {
        self.selected = None;
    }

    fn is_loaded(&self) -> bool {
        self.planets.is_some()
    }

    fn camera_defaults(&self) -> Option<CameraState> {
        let defaults = self.config.camera?;
        Some(CameraState {
            pan: defaults.pan.map_or((0.0, 0.0), |[x, y]| (x, y)),
            zoom: defaults.zoom,
        })
    }

    fn handle_input(&mut self, event: &InputEvent, params: &TransformParams) -> SceneResponse {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
                ..
            } => match self.pick(params, pos) {
                Some(i) => {
                    self.selected = Some(i);
                    SceneResponse::Consumed
                }
                None => SceneResponse::Ignored,
            },
            InputEvent::KeyPress {
                key: Key::Escape, ..
            } if self.selected.is_some() => {
                self.selected = None;
                SceneResponse::Consumed
            }
            _ => SceneResponse::Ignored,
        }
    }

    fn hud_controls(&self) -> Vec<HudControl> {
        vec![
            HudControl::new(
                "轨道",
                HudAction::ToggleLayer(LayerToggle::Orbits),
                self.show_orbits,
            ),
            HudControl::new(
                "名称",
                HudAction::ToggleLayer(LayerToggle::Labels),
                self.show_labels,
            ),
        ]
    }

    fn apply_hud(&mut self, action: HudAction) {
        match action {
            HudAction::ToggleLayer(LayerToggle::Orbits) => self.show_orbits = !self.show_orbits,
            HudAction::ToggleLayer(LayerToggle::Labels) => self.show_labels = !self.show_labels,
            _ => {}
        }
    }

    fn update(&mut self, dt: f64) {
        let Some(planets) = self.planets.as_mut() else {
            return;
        };
        for p in planets {
            p.angle = (p.angle + p.speed * dt).rem_euclid(TAU);
        }
    }

    fn render(&self, params: &TransformParams, viewport: ScreenRect, sink: &mut dyn DrawSink) {
        if self.planets.is_none() {
            return;
        }
        let zoom = params.zoom();
        let center = params.world_to_screen((0.0, 0.0));

        if self.show_orbits {
            for p in self.planets() {
                sink.draw_sprite(center, &SpriteHandle::Orbit { radius: p.orbit_radius }, zoom);
            }
        }

        if viewport.expand(STAR_RADIUS * zoom).contains(center) {
            sink.draw_sprite(
                center,
                &SpriteHandle::Star {
                    radius: STAR_RADIUS,
                    color: STAR_COLOR,
                    brightness: 1.0,
                },
                zoom,
            );
        }

        for (i, p) in self.planets().iter().enumerate() {
            let pos = params.world_to_screen(p.position());
            if !viewport.expand(p.size * zoom).contains(pos) {
                continue;
            }
            sink.draw_sprite(
                pos,
                &SpriteHandle::Planet {
                    radius: p.size,
                    color: p.color,
                    selected: self.selected == Some(i),
                },
                zoom,
            );
            if self.show_labels {
                sink.draw_label((pos.0, pos.1 + (p.size + 12.0) * zoom), &p.name);
            }
        }
    }

    fn status(&self) -> Option<String> {
        let p = self.selected()?;
        Some(format!(
            "{} · 轨道半径 {:.0} · 角速度 {:.2} rad/s",
            p.name, p.orbit_radius, p.speed
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::load_game_config;
    use crate::core::transform::Projection;
    use crate::rendering::frame::RecordingSink;

    const VIEWPORT: ScreenRect = ScreenRect::new(0.0, 0.0, 1000.0, 800.0);

    fn loaded() -> SystemScene {
        let config = load_game_config().expect("config");
        let mut scene = SystemScene::new(config.scenes.system.clone());
        scene.on_enter();
        scene
    }

    fn params(zoom: f64) -> TransformParams {
        TransformParams::new(
            CameraState {
                pan: (0.0, 0.0),
                zoom,
            },
            Projection::Planar,
            VIEWPORT.center(),
        )
    }

    #[test]
    fn builds_lazily() {
        let config = load_game_config().expect("config");
        let mut scene = SystemScene::new(config.scenes.system.clone());
        assert!(!scene.is_loaded());
        scene.on_enter();
        assert!(scene.is_loaded());
    }

    #[test]
    fn planet_count_and_orbits() {
        let scene = loaded();
        let n = scene.planets().len();
        assert!((3..=8).contains(&n), "{n} planets");
        for (i, p) in scene.planets().iter().enumerate() {
            assert_eq!(p.orbit_radius, 150.0 + i as f64 * 80.0);
            assert!((15.0..=35.0).contains(&p.size));
            assert!((0.06..0.3).contains(&p.speed));
        }
    }

    #[test]
    fn same_seed_same_system() {
        let config = load_game_config().expect("config");
        let a = generate_planets(&config.scenes.system);
        let b = generate_planets(&config.scenes.system);
        assert_eq!(a, b);
    }

    #[test]
    fn update_advances_orbits() {
        let mut scene = loaded();
        let before: Vec<f64> = scene.planets().iter().map(|p| p.angle).collect();
        scene.update(0.5);
        for (p, a0) in scene.planets().iter().zip(before) {
            let moved = (p.angle - a0).rem_euclid(TAU);
            assert!((moved - p.speed * 0.5).abs() < 1e-9);
            assert!(p.angle >= 0.0 && p.angle < TAU);
        }
    }

    #[test]
    fn click_selects_planet() {
        let mut scene = loaded();
        let params = params(1.0);
        let target = params.world_to_screen(scene.planets()[1].position());
        let r = scene.handle_input(&InputEvent::down(target), &params);
        assert_eq!(r, SceneResponse::Consumed);
        assert_eq!(scene.selected().map(|p| p.name.as_str()), Some("行星 2"));
        assert!(scene.status().is_some());

        // 恒星本身不可选，点击交给相机
        let r = scene.handle_input(&InputEvent::down(VIEWPORT.center()), &params);
        assert_eq!(r, SceneResponse::Ignored);
    }

    #[test]
    fn render_culls_planets_outside_viewport() {
        let scene = loaded();
        let far = TransformParams::new(
            CameraState {
                pan: (5000.0, 5000.0),
                zoom: 1.0,
            },
            Projection::Planar,
            VIEWPORT.center(),
        );
        let mut sink = RecordingSink::default();
        scene.render(&far, VIEWPORT, &mut sink);
        assert_eq!(sink.count(|s| matches!(s, SpriteHandle::Planet { .. })), 0);
        assert_eq!(sink.count(|s| matches!(s, SpriteHandle::Star { .. })), 0);

        let mut sink = RecordingSink::default();
        scene.render(&params(0.5), VIEWPORT, &mut sink);
        assert_eq!(sink.count(|s| matches!(s, SpriteHandle::Star { .. })), 1);
        assert!(sink.count(|s| matches!(s, SpriteHandle::Planet { .. })) > 0);
    }

    #[test]
    fn toggles_hide_orbits_and_labels() {
        let mut scene = loaded();
        scene.apply_hud(HudAction::ToggleLayer(LayerToggle::Orbits));
        scene.apply_hud(HudAction::ToggleLayer(LayerToggle::Labels));
        let mut sink = RecordingSink::default();
        scene.render(&params(0.5), VIEWPORT, &mut sink);
        assert_eq!(sink.count(|s| matches!(s, SpriteHandle::Orbit { .. })), 0);
        assert!(sink.labels.is_empty());
        assert!(scene.hud_controls().iter().all(|c| !c.active));
    }

    #[test]
    fn defaults_look_at_the_star() {
        let scene = loaded();
        let cam = scene.camera_defaults().expect("defaults");
        assert_eq!(cam.pan, (0.0, 0.0));
    }
}
