//! # runtime.json 通用读写
//!
//! 所有需要持久化的状态都挂在 `runtime.json` 的某个顶层字段下，
//! 通过 [`merge_field`] 整体读改写，避免各模块各自覆盖文件。

use std::path::Path;

use serde_json::{Map, Value};

use super::{StorageError, paths};

/// 读取整个文件；不存在或解析失败时返回空对象。
pub fn load() -> Value {
    load_from(&paths::runtime_json_path())
}

pub fn load_field(key: &str) -> Option<Value> {
    load().get(key).cloned()
}

pub fn save(value: &Value) -> Result<(), StorageError> {
    save_to(&paths::runtime_json_path(), value)
}

/// 读取 → 插入 / 替换 `key` → 写回。
pub fn merge_field(key: &str, value: Value) -> Result<(), StorageError> {
    save(&merged(load(), key, value))
}

fn merged(mut root: Value, key: &str, value: Value) -> Value {
    if !root.is_object() {
        root = Value::Object(Map::new());
    }
    if let Some(obj) = root.as_object_mut() {
        obj.insert(key.to_string(), value);
    }
    root
}

// ── 指定路径版本（测试用临时目录） ──────────────────────────

fn load_from(path: &Path) -> Value {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn save_to(path: &Path, value: &Value) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
fn merge_field_at(path: &Path, key: &str, value: Value) -> Result<(), StorageError> {
    save_to(path, &merged(load_from(path), key, value))
}
