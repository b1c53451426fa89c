//! # 用户设置（UserSettings）
//!
//! 持久化到 runtime.json 的 `"settings"` 字段。缺失的字段取默认值，
//! 所以旧文件和手改过的文件都能读。

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StorageError, runtime};
use crate::scene::{RetentionPolicy, SceneId};

const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// 下次启动时直接进入的场景
    pub last_scene: SceneId,
    /// 覆盖配置里的缩放步长
    pub zoom_step: Option<f64>,
    /// 覆盖配置里的保留策略
    pub retention: Option<RetentionPolicy>,
    pub planet_grid: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            last_scene: SceneId::Planet,
            zoom_step: None,
            retention: None,
            planet_grid: false,
        }
    }
}

impl UserSettings {
    pub fn load() -> Self {
        runtime::load_field(SETTINGS_KEY)
            .map(Self::from_value)
            .unwrap_or_default()
    }

    fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "设置字段无法解析，使用默认值");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        runtime::merge_field(SETTINGS_KEY, serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_object_fills_defaults() {
        let s = UserSettings::from_value(json!({ "last_scene": "galaxy" }));
        assert_eq!(s.last_scene, SceneId::Galaxy);
        assert_eq!(s.zoom_step, None);
        assert!(!s.planet_grid);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let s = UserSettings::from_value(json!({ "last_scene": 42 }));
        assert_eq!(s, UserSettings::default());
    }
}
