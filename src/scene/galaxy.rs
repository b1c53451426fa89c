//! # 银河场景
//!
//! 三臂旋涡分布的背景恒星 + 若干可选中的恒星系，平面投影。

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::{SceneBehavior, SceneId, SceneResponse, pick_nearest};
use crate::config::game::GalaxyConfig;
use crate::core::camera::CameraState;
use crate::core::geometry::{Point, ScreenRect};
use crate::core::hud::{HudAction, HudControl, LayerToggle};
use crate::core::input::{InputEvent, Key, PointerButton};
use crate::core::transform::TransformParams;
use crate::rendering::frame::{DrawSink, SpriteHandle};

const STAR_COLORS: [[u8; 3]; 7] = [
    [255, 255, 255],
    [255, 255, 200],
    [255, 200, 100],
    [255, 150, 50],
    [255, 100, 100],
    [200, 200, 255],
    [150, 150, 255],
];

const ARM_COUNT: usize = 3;
/// 每条旋臂引导点的角度间隔（度）
const GUIDE_STEP_DEG: usize = 10;
const MIN_PICK_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStar {
    pub pos: Point,
    pub size: f64,
    pub color: [u8; 3],
    pub brightness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarSystemEntry {
    pub name: String,
    pub pos: Point,
    pub size: f64,
    pub planet_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalaxyMap {
    pub stars: Vec<BackgroundStar>,
    pub systems: Vec<StarSystemEntry>,
    /// 旋臂引导点
    pub guides: Vec<Point>,
}

fn polar(angle: f64, distance: f64) -> Point {
    (angle.cos() * distance, angle.sin() * distance)
}

/// 三臂旋涡：半径随角度按 `sin(3θ)` 起伏
fn spiral_offset(angle: f64, amplitude: f64) -> f64 {
    (angle * 3.0).sin() * amplitude
}

impl GalaxyMap {
    pub fn generate(config: &GalaxyConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);

        let stars = (0..config.stars)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let distance = rng.gen_range(0.0..800.0) + spiral_offset(angle, 100.0);
                BackgroundStar {
                    pos: polar(angle, distance),
                    size: f64::from(rng.gen_range(1u32..=3)),
                    color: STAR_COLORS.choose(&mut rng).copied().unwrap_or(STAR_COLORS[0]),
                    brightness: rng.gen_range(0.3..1.0),
                }
            })
            .collect();

        let n = config.systems.max(1) as f64;
        let systems = (0..config.systems)
            .map(|i| {
                let angle = i as f64 / n * TAU;
                let distance = 100.0 + (i % 5) as f64 * 150.0 + spiral_offset(angle, 50.0);
                StarSystemEntry {
                    name: format!("星系 {}", i + 1),
                    pos: polar(angle, distance),
                    size: f64::from(rng.gen_range(8u32..=15)),
                    planet_count: rng.gen_range(1..=8),
                }
            })
            .collect();

        // 每条旋臂是一圈同心环，半径同样随 sin(3θ) 起伏
        let guides = (0..ARM_COUNT)
            .flat_map(|arm| {
                (0..360).step_by(GUIDE_STEP_DEG).map(move |deg| {
                    let angle = (deg as f64).to_radians();
                    let distance = 100.0 + arm as f64 * 200.0 + spiral_offset(angle, 50.0);
                    polar(angle, distance)
                })
            })
            .collect();

        Self {
            stars,
            systems,
            guides,
        }
    }
}

pub struct GalaxyScene {
    config: GalaxyConfig,
    map: Option<GalaxyMap>,
    selected: Option<usize>,
    show_labels: bool,
    show_arms: bool,
}

impl GalaxyScene {
    pub fn new(config: GalaxyConfig) -> Self {
        Self {
            config,
            map: None,
            selected: None,
            show_labels: true,
            show_arms: false,
        }
    }

    pub fn selected(&self) -> Option<&StarSystemEntry> {
        let i = self.selected?;
        self.map.as_ref()?.systems.get(i)
    }

    fn pick(&self, params: &TransformParams, pos: Point) -> Option<usize> {
        let map = self.map.as_ref()?;
        let zoom = params.zoom();
        let candidates = map.systems.iter().enumerate().map(|(i, s)| {
            (
                i,
                params.world_to_screen(s.pos),
                (s.size * zoom).max(MIN_PICK_RADIUS),
            )
        });
        pick_nearest(candidates, pos)
    }
}

impl SceneBehavior for GalaxyScene {
    fn id(&self) -> SceneId {
        SceneId::Galaxy
    }

    fn on_enter(&mut self) {
        if self.map.is_none() {
            let map = GalaxyMap::generate(&self.config);
            info!(stars = map.stars.len(), systems = map.systems.len(), "银河生成完成");
            self.map = Some(map);
        }
    }

    fn on_exit(&mut self) {
        self.selected = None;
    }

    fn is_loaded(&self) -> bool {
        self.map.is_some()
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
                "旋臂",
                HudAction::ToggleLayer(LayerToggle::SpiralArms),
                self.show_arms,
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
            HudAction::ToggleLayer(LayerToggle::SpiralArms) => self.show_arms = !self.show_arms,
            HudAction::ToggleLayer(LayerToggle::Labels) => self.show_labels = !self.show_labels,
            _ => {}
        }
    }

    fn render(&self, params: &TransformParams, viewport: ScreenRect, sink: &mut dyn DrawSink) {
        let Some(map) = &self.map else {
            return;
        };
        let zoom = params.zoom();

        for star in &map.stars {
            let pos = params.world_to_screen(star.pos);
            if viewport.expand(star.size * zoom).contains(pos) {
                sink.draw_sprite(
                    pos,
                    &SpriteHandle::Star {
                        radius: star.size,
                        color: star.color,
                        brightness: star.brightness,
                    },
                    zoom,
                );
            }
        }

        if self.show_arms {
            for guide in &map.guides {
                let pos = params.world_to_screen(*guide);
                if viewport.contains(pos) {
                    sink.draw_sprite(pos, &SpriteHandle::Guide, zoom);
                }
            }
        }

        for (i, system) in map.systems.iter().enumerate() {
            let pos = params.world_to_screen(system.pos);
            if !viewport.expand(system.size * zoom).contains(pos) {
                continue;
            }
            sink.draw_sprite(
                pos,
                &SpriteHandle::StarSystem {
                    radius: system.size,
                    selected: self.selected == Some(i),
                },
                zoom,
            );
            if self.show_labels {
                sink.draw_label((pos.0, pos.1 + (system.size + 10.0) * zoom), &system.name);
            }
        }
    }

    fn status(&self) -> Option<String> {
        let s = self.selected()?;
        Some(format!("{} · {} 颗行星", s.name, s.planet_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::load_game_config;
    use crate::core::transform::Projection;
    use crate::rendering::frame::RecordingSink;

    const VIEWPORT: ScreenRect = ScreenRect::new(0.0, 0.0, 1000.0, 800.0);

    fn loaded() -> GalaxyScene {
        let config = load_game_config().expect("config");
        let mut scene = GalaxyScene::new(config.scenes.galaxy.clone());
        scene.on_enter();
        scene
    }

    fn params(pan: Point, zoom: f64) -> TransformParams {
        TransformParams::new(CameraState { pan, zoom }, Projection::Planar, VIEWPORT.center())
    }

    #[test]
    fn generates_configured_counts() {
        let scene = loaded();
        let map = scene.map.as_ref().expect("map");
        assert_eq!(map.stars.len(), 1000);
        assert_eq!(map.systems.len(), 20);
        assert_eq!(map.guides.len(), ARM_COUNT * 36);
        for star in &map.stars {
            assert!((1.0..=3.0).contains(&star.size));
            assert!((0.3..1.0).contains(&star.brightness));
            let r = star.pos.0.hypot(star.pos.1);
            assert!(r <= 900.0 + 1e-9);
        }
        for s in &map.systems {
            assert!((1..=8).contains(&s.planet_count));
        }
    }

    #[test]
    fn generation_is_seeded() {
        let config = load_game_config().expect("config");
        assert_eq!(
            GalaxyMap::generate(&config.scenes.galaxy),
            GalaxyMap::generate(&config.scenes.galaxy)
        );
    }

    #[test]
    fn systems_follow_the_spiral_rings() {
        let scene = loaded();
        let map = scene.map.as_ref().expect("map");
        let n = map.systems.len() as f64;
        for (i, s) in map.systems.iter().enumerate() {
            let angle = i as f64 / n * TAU;
            let expected = 100.0 + (i % 5) as f64 * 150.0 + (angle * 3.0).sin() * 50.0;
            let (ex, ey) = polar(angle, expected);
            assert!((s.pos.0 - ex).abs() < 1e-9 && (s.pos.1 - ey).abs() < 1e-9);
        }
    }

    #[test]
    fn guides_trace_three_rings() {
        let scene = loaded();
        let map = scene.map.as_ref().expect("map");
        for (arm, ring) in map.guides.chunks(36).enumerate() {
            for (i, g) in ring.iter().enumerate() {
                let angle = (i as f64 * 10.0).to_radians();
                let expected = 100.0 + arm as f64 * 200.0 + (angle * 3.0).sin() * 50.0;
                assert!((g.0.hypot(g.1) - expected).abs() < 1e-9);
            }
        }
        assert_eq!(map.guides.chunks(36).count(), 3);
    }

    #[test]
    fn clicking_a_system_selects_it() {
        let mut scene = loaded();
        let p = params((0.0, 0.0), 1.0);
        let target = scene.map.as_ref().expect("map").systems[3].pos;
        let r = scene.handle_input(&InputEvent::down(p.world_to_screen(target)), &p);
        assert_eq!(r, SceneResponse::Consumed);
        assert_eq!(scene.selected().map(|s| s.name.as_str()), Some("星系 4"));

        let r = scene.handle_input(&InputEvent::key(Key::Escape), &p);
        assert_eq!(r, SceneResponse::Consumed);
        assert!(scene.selected().is_none());
    }

    #[test]
    fn zoomed_in_view_draws_a_subset() {
        let scene = loaded();
        let mut wide = RecordingSink::default();
        scene.render(&params((0.0, 0.0), 0.4), VIEWPORT, &mut wide);
        let mut close = RecordingSink::default();
        scene.render(&params((300.0, 0.0), 3.0), VIEWPORT, &mut close);
        let stars = |s: &RecordingSink| s.count(|h| matches!(h, SpriteHandle::Star { .. }));
        assert_eq!(stars(&wide), 1000);
        assert!(stars(&close) < stars(&wide));
    }

    #[test]
    fn spiral_guides_only_when_enabled() {
        let mut scene = loaded();
        let p = params((0.0, 0.0), 0.5);
        let mut sink = RecordingSink::default();
        scene.render(&p, VIEWPORT, &mut sink);
        assert_eq!(sink.count(|s| *s == SpriteHandle::Guide), 0);

        scene.apply_hud(HudAction::ToggleLayer(LayerToggle::SpiralArms));
        let mut sink = RecordingSink::default();
        scene.render(&p, VIEWPORT, &mut sink);
        assert!(sink.count(|s| *s == SpriteHandle::Guide) > 0);
    }
}
