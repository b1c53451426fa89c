//! # 行星场景
//!
//! 等距瓦片地形 + 少量单位。地形由两层 Perlin 噪声（海拔 / 湿度）
//! 决定地块类型与堆叠高度，按行并行生成。
//!
//! 选中单位后右键可通行的格子即下达移动指令（A* 寻路），单位每帧
//! 沿路径逐格前进。`Ctrl+R` 换一个种子重新生成整个世界。

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::pathfind::{TilePos, find_path};
use super::{SceneBehavior, SceneId, SceneResponse, pick_nearest};
use crate::config::game::{PlanetConfig, TileMetrics};
use crate::core::camera::CameraState;
use crate::core::geometry::{Point, ScreenRect};
use crate::core::hud::{HudAction, HudControl, LayerToggle};
use crate::core::input::{InputEvent, Key, PointerButton};
use crate::core::transform::{Projection, TransformParams, tile_distance};
use crate::rendering::frame::{DrawSink, SpriteHandle, TileKind, UnitKind};

/// 点选单位的屏幕半径（像素）
const UNIT_PICK_RADIUS: f64 = 20.0;
/// 单位精灵与名字标签高出格子顶面的范围（像素）
const UNIT_MARGIN: f64 = 24.0;
const MAX_STACK: u8 = 4;
/// 三层及以上的岩石堆视为峭壁
const MAX_WALKABLE_STACK: u8 = 2;
/// 单位移动速度（格 / 秒）
const UNIT_STEPS_PER_SEC: f64 = 4.0;
const BUILD_CATEGORIES: [&str; 3] = ["建筑", "防御", "单位"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    /// 堆叠方块数，1..=4
    pub height: u8,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            kind: TileKind::Grass,
            height: 1,
        }
    }
}

fn classify(elevation: f64, moisture: f64) -> Tile {
    if moisture < -0.3 {
        return Tile {
            kind: TileKind::Water,
            height: 1,
        };
    }
    if elevation > 0.35 {
        let extra = ((elevation - 0.35) / 0.65 * 3.0).floor() as u8;
        return Tile {
            kind: TileKind::Stone,
            height: (2 + extra).min(MAX_STACK),
        };
    }
    if elevation < -0.35 {
        return Tile {
            kind: TileKind::Dirt,
            height: 1,
        };
    }
    Tile::default()
}

impl Tile {
    pub fn walkable(&self) -> bool {
        self.kind != TileKind::Water && self.height <= MAX_WALKABLE_STACK
    }

    /// 顶层方块相对地面的抬升（世界像素）
    fn lift(&self, block_height: f64) -> f64 {
        f64::from(self.height.saturating_sub(1)) * block_height
    }
}

#[derive(Debug, Clone)]
pub struct Terrain {
    pub width: u32,
    pub height: u32,
    tiles: Vec<Tile>,
}

impl Terrain {
    pub fn generate(config: &PlanetConfig, seed: u64) -> Self {
        let w = config.width as usize;
        let h = config.height as usize;
        let elevation = Perlin::new(seed as u32);
        let moisture = Perlin::new(seed.wrapping_add(1) as u32);

        let mut tiles = vec![Tile::default(); w * h];
        tiles.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            for (x, tile) in row.iter_mut().enumerate() {
                let e = elevation.get([x as f64 * config.height_scale, y as f64 * config.height_scale]);
                let m = moisture.get([x as f64 * config.biome_scale, y as f64 * config.biome_scale]);
                *tile = classify(e, m);
            }
        });

        Self {
            width: config.width,
            height: config.height,
            tiles,
        }
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn walkable(&self, tile: TilePos) -> bool {
        self.get(tile.0, tile.1).is_some_and(|t| t.walkable())
    }
}

fn grid_center(width: u32, height: u32) -> Point {
    (
        (width.saturating_sub(1)) as f64 * 0.5,
        (height.saturating_sub(1)) as f64 * 0.5,
    )
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub kind: UnitKind,
    pub name: String,
    pub tile: TilePos,
    /// 尚未走完的格子，队首是下一步
    pub path: VecDeque<TilePos>,
    /// 走向下一格的进度（格）
    progress: f64,
}

pub struct PlanetScene {
    config: PlanetConfig,
    metrics: TileMetrics,
    /// 当前世界的种子；重新生成时更换
    seed: u64,
    terrain: Option<Terrain>,
    units: Vec<Unit>,
    selected_unit: Option<usize>,
    inspected_tile: Option<TilePos>,
    show_grid: bool,
    show_units: bool,
    build_category: usize,
}

impl PlanetScene {
    pub fn new(config: PlanetConfig, metrics: TileMetrics) -> Self {
        Self {
            seed: config.seed,
            config,
            metrics,
            terrain: None,
            units: Vec::new(),
            selected_unit: None,
            inspected_tile: None,
            show_grid: false,
            show_units: true,
            build_category: 0,
        }
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected_unit.and_then(|i| self.units.get(i))
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    fn stack_lift(&self, tile: TilePos) -> f64 {
        self.terrain
            .as_ref()
            .and_then(|t| t.get(tile.0, tile.1))
            .unwrap_or_default()
            .lift(self.metrics.block_height)
    }

    fn unit_screen_pos(&self, params: &TransformParams, unit: &Unit) -> Point {
        params.tile_center(unit.tile, self.stack_lift(unit.tile))
    }

    fn spawn_units(&mut self, terrain: &Terrain) {
        let mut rng = StdRng::seed_from_u64(self.seed ^ 0x9e37_79b9_7f4a_7c15);
        let mut units = Vec::with_capacity(self.config.bipeds + self.config.animals);
        let wanted = [
            (UnitKind::Biped, self.config.bipeds, "BP"),
            (UnitKind::Animal, self.config.animals, "动物"),
        ];
        for (kind, count, prefix) in wanted {
            for i in 0..count {
                // 避开不可通行与已占用的格子，尝试有限次
                let spot = (0..64).find_map(|_| {
                    let x = rng.gen_range(0..terrain.width as i64);
                    let y = rng.gen_range(0..terrain.height as i64);
                    let free = terrain.walkable((x, y))
                        && !units.iter().any(|u: &Unit| u.tile == (x, y));
                    free.then_some((x, y))
                });
                if let Some(tile) = spot {
                    units.push(Unit {
                        kind,
                        name: format!("{prefix}{}", i + 1),
                        tile,
                        path: VecDeque::new(),
                        progress: 0.0,
                    });
                }
            }
        }
        self.units = units;
    }

    fn pick_unit(&self, params: &TransformParams, pos: Point) -> Option<usize> {
        let candidates = self
            .units
            .iter()
            .enumerate()
            .map(|(i, u)| (i, self.unit_screen_pos(params, u), UNIT_PICK_RADIUS));
        pick_nearest(candidates, pos)
    }

    /// 为单位规划到 `goal` 的路径；不可达时保持原地
    fn order_move(&mut self, unit: usize, goal: TilePos) {
        let Some(terrain) = &self.terrain else {
            return;
        };
        let Some(start) = self.units.get(unit).map(|u| u.tile) else {
            return;
        };
        let Some(path) = find_path(terrain.width, terrain.height, start, goal, |t| {
            terrain.walkable(t)
        }) else {
            debug!(unit, ?start, ?goal, "目标不可达");
            return;
        };
        debug!(unit, ?start, ?goal, steps = path.len() - 1, "移动指令");
        if let Some(u) = self.units.get_mut(unit) {
            u.path = path.into_iter().skip(1).collect();
            u.progress = 0.0;
        }
    }

    fn regenerate(&mut self) {
        self.seed = StdRng::seed_from_u64(self.seed).next_u64();
        info!(seed = self.seed, "重新生成行星");
        self.terrain = None;
        self.selected_unit = None;
        self.inspected_tile = None;
        self.on_enter();
    }

    fn draw_unit(&self, index: usize, pos: Point, zoom: f64, sink: &mut dyn DrawSink) {
        let Some(unit) = self.units.get(index) else {
            return;
        };
        let selected = self.selected_unit == Some(index);
        sink.draw_sprite(
            pos,
            &SpriteHandle::Unit {
                kind: unit.kind,
                selected,
            },
            zoom,
        );
        if selected {
            sink.draw_label((pos.0, pos.1 - UNIT_MARGIN * zoom), &unit.name);
        }
    }
}

impl SceneBehavior for PlanetScene {
    fn id(&self) -> SceneId {
        SceneId::Planet
    }

    fn on_enter(&mut self) {
        if self.terrain.is_some() {
            return;
        }
        let started = Instant::now();
        let terrain = Terrain::generate(&self.config, self.seed);
        self.spawn_units(&terrain);
        info!(
            width = terrain.width,
            height = terrain.height,
            units = self.units.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "行星地形生成完成"
        );
        self.terrain = Some(terrain);
    }

    fn on_exit(&mut self) {
        self.inspected_tile = None;
    }

    fn is_loaded(&self) -> bool {
        self.terrain.is_some()
    }

    fn projection(&self) -> Projection {
        self.metrics.projection()
    }

    fn camera_defaults(&self) -> Option<CameraState> {
        let defaults = self.config.camera?;
        Some(CameraState {
            pan: defaults
                .pan
                .map(|[x, y]| (x, y))
                .unwrap_or_else(|| grid_center(self.config.width, self.config.height)),
            zoom: defaults.zoom,
        })
    }

    fn handle_input(&mut self, event: &InputEvent, params: &TransformParams) -> SceneResponse {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
                ..
            } if self.show_units => match self.pick_unit(params, pos) {
                Some(i) => {
                    self.selected_unit = Some(i);
                    SceneResponse::Consumed
                }
                None => SceneResponse::Ignored,
            },
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Secondary,
                ..
            } => {
                let tile = params.screen_to_tile(pos);
                let inside = self
                    .terrain
                    .as_ref()
                    .is_some_and(|t| t.in_bounds(tile.0, tile.1));
                if !inside {
                    return SceneResponse::Ignored;
                }
                self.inspected_tile = Some(tile);
                if let Some(unit) = self.selected_unit {
                    self.order_move(unit, tile);
                }
                SceneResponse::Consumed
            }
            InputEvent::KeyPress {
                key: Key::Char('r'),
                modifiers,
            } if modifiers.ctrl => {
                self.regenerate();
                SceneResponse::Consumed
            }
            InputEvent::KeyPress {
                key: Key::Escape, ..
            } if self.selected_unit.is_some() || self.inspected_tile.is_some() => {
                self.selected_unit = None;
                self.inspected_tile = None;
                SceneResponse::Consumed
            }
            _ => SceneResponse::Ignored,
        }
    }

    fn hud_controls(&self) -> Vec<HudControl> {
        let mut controls = vec![
            HudControl::new("网格", HudAction::ToggleLayer(LayerToggle::Grid), self.show_grid),
            HudControl::new(
                "单位",
                HudAction::ToggleLayer(LayerToggle::Units),
                self.show_units,
            ),
        ];
        controls.extend(BUILD_CATEGORIES.iter().enumerate().map(|(i, name)| {
            HudControl::new(*name, HudAction::SelectCategory(i), i == self.build_category)
        }));
        controls
    }

    fn apply_hud(&mut self, action: HudAction) {
        match action {
            HudAction::ToggleLayer(LayerToggle::Grid) => self.show_grid = !self.show_grid,
            HudAction::ToggleLayer(LayerToggle::Units) => {
                self.show_units = !self.show_units;
                if !self.show_units {
                    self.selected_unit = None;
                }
            }
            HudAction::SelectCategory(i) if i < BUILD_CATEGORIES.len() => {
                self.build_category = i;
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for unit in &mut self.units {
            if unit.path.is_empty() {
                continue;
            }
            unit.progress += dt * UNIT_STEPS_PER_SEC;
            while unit.progress >= 1.0 {
                let Some(next) = unit.path.pop_front() else {
                    break;
                };
                unit.tile = next;
                unit.progress -= 1.0;
            }
            if unit.path.is_empty() {
                unit.progress = 0.0;
            }
        }
    }

    fn render(&self, params: &TransformParams, viewport: ScreenRect, sink: &mut dyn DrawSink) {
        let Some(terrain) = &self.terrain else {
            return;
        };
        let Some(range) = params.visible_tiles(viewport, terrain.width, terrain.height, 2) else {
            return;
        };
        let zoom = params.zoom();
        let block = self.metrics.block_height * zoom;
        let bounds = viewport.expand(UNIT_MARGIN * zoom);

        let mut occupants: HashMap<TilePos, Vec<usize>> = HashMap::new();
        let mut waypoints: HashSet<TilePos> = HashSet::new();
        if self.show_units {
            for (i, unit) in self.units.iter().enumerate() {
                occupants.entry(unit.tile).or_default().push(i);
                waypoints.extend(unit.path.iter().copied());
            }
        }

        // 单位与标记跟随所在格子一起按画家顺序绘制，前排的岩石堆能挡住后排单位
        for tile in range.iter_back_to_front() {
            let Some(t) = terrain.get(tile.0, tile.1) else {
                continue;
            };
            let diamond = params.tile_bounds(tile);
            let column = ScreenRect::new(
                diamond.x,
                diamond.y - f64::from(t.height.saturating_sub(1)) * block,
                diamond.w,
                diamond.h + f64::from(t.height) * block,
            );
            if !bounds.intersects(&column) {
                continue;
            }

            for layer in 0..t.height {
                let pos = params.tile_center(tile, f64::from(layer) * self.metrics.block_height);
                sink.draw_sprite(pos, &SpriteHandle::Tile { kind: t.kind, layer }, zoom);
            }

            let top = params.tile_center(tile, self.stack_lift(tile));
            if self.show_grid || self.inspected_tile == Some(tile) {
                sink.draw_sprite(top, &SpriteHandle::TileOutline, zoom);
            }
            if waypoints.contains(&tile) {
                sink.draw_sprite(top, &SpriteHandle::PathStep, zoom);
            }
            for &i in occupants.get(&tile).into_iter().flatten() {
                self.draw_unit(i, top, zoom, sink);
            }
        }
    }

    fn status(&self) -> Option<String> {
        let unit = self.selected_unit();
        let tile = self.inspected_tile.and_then(|t| {
            let info = self.terrain.as_ref()?.get(t.0, t.1)?;
            Some((t, info))
        });
        match (unit, tile) {
            (Some(unit), Some((t, info))) => Some(format!(
                "选中 {} · 地块 ({}, {}) {} · 距离 {:.1} 格",
                unit.name,
                t.0,
                t.1,
                info.kind.label(),
                tile_distance(unit.tile, t)
            )),
            (Some(unit), None) => Some(format!(
                "选中 {} @ ({}, {})",
                unit.name, unit.tile.0, unit.tile.1
            )),
            (None, Some((t, info))) => Some(format!(
                "地块 ({}, {}) {} 高度 {}",
                t.0,
                t.1,
                info.kind.label(),
                info.height
            )),
            (None, None) => None,
        }
    }
}
