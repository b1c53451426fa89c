use serde::Deserialize;

use crate::config::ConfigError;
use crate::core::camera::ZoomLimits;
use crate::core::transform::Projection;
use crate::scene::RetentionPolicy;

const GAME_JSON: &str = include_str!("../assets/game.json");

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub tiles: TileMetrics,
    pub hud: HudConfig,
    #[serde(default)]
    pub retention: RetentionPolicy,
    pub scenes: ScenesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    /// 方向键每次平移的屏幕像素
    pub pan_speed: f64,
}

impl CameraConfig {
    pub fn limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.zoom_min,
            max: self.zoom_max,
            step: self.zoom_step,
        }
    }
}

/// 等距瓦片尺寸（像素，zoom = 1 时）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TileMetrics {
    pub width: f64,
    pub height: f64,
    /// 每层堆叠方块的抬升高度
    pub block_height: f64,
}

impl TileMetrics {
    pub fn projection(&self) -> Projection {
        Projection::isometric(self.width, self.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HudConfig {
    pub panel_width: f64,
    pub button_height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenesConfig {
    pub planet: PlanetConfig,
    pub system: SystemConfig,
    pub galaxy: GalaxyConfig,
}

/// 场景自带的相机默认值；缺省时沿用切换前的相机。
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CameraDefaults {
    /// 视口中心对应的世界坐标，缺省由场景自行决定
    #[serde(default)]
    pub pan: Option<[f64; 2]>,
    pub zoom: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanetConfig {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub height_scale: f64,
    pub biome_scale: f64,
    pub bipeds: usize,
    pub animals: usize,
    #[serde(default)]
    pub camera: Option<CameraDefaults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    pub seed: u64,
    pub min_planets: usize,
    pub max_planets: usize,
    #[serde(default)]
    pub camera: Option<CameraDefaults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalaxyConfig {
    pub seed: u64,
    pub stars: usize,
    pub systems: usize,
    #[serde(default)]
    pub camera: Option<CameraDefaults>,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.zoom_min > 0.0 && cam.zoom_min.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom_min 必须为正数，当前 {}",
                cam.zoom_min
            )));
        }
        if !(cam.zoom_max >= cam.zoom_min && cam.zoom_max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom_max ({}) 不能小于 zoom_min ({})",
                cam.zoom_max, cam.zoom_min
            )));
        }
        if !(cam.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step 必须大于 1，当前 {}",
                cam.zoom_step
            )));
        }
        if !(self.tiles.width > 0.0 && self.tiles.height > 0.0) {
            return Err(ConfigError::Invalid("瓦片宽高必须为正数".to_string()));
        }
        let planet = &self.scenes.planet;
        if planet.width == 0 || planet.height == 0 {
            return Err(ConfigError::Invalid("行星地形尺寸不能为 0".to_string()));
        }
        let system = &self.scenes.system;
        if system.min_planets > system.max_planets {
            return Err(ConfigError::Invalid(format!(
                "min_planets ({}) 大于 max_planets ({})",
                system.min_planets, system.max_planets
            )));
        }
        Ok(())
    }
}

pub fn parse_game_config(json: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn load_game_config() -> Result<GameConfig, ConfigError> {
    parse_game_config(GAME_JSON)
}
