//! # 应用路径管理
//!
//! 应用数据目录为 `$XDG_DATA_HOME/isoverse/`，缺省 `~/.local/share/isoverse/`。
//! 首次使用时自动创建。

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::warn;

const APP_DIR: &str = "isoverse";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// 应用数据根目录，首次调用时解析并创建。
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        let dir = resolve_data_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(path = %dir.display(), error = %e, "无法创建数据目录");
        }
        dir
    })
}

pub fn runtime_json_path() -> PathBuf {
    data_dir().join("runtime.json")
}

// ── 内部实现 ────────────────────────────────────────────────

fn resolve_data_dir() -> PathBuf {
    // 1) $XDG_DATA_HOME/isoverse
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        let p = PathBuf::from(xdg).join(APP_DIR);
        if p.parent().is_some_and(|d| d.exists()) {
            return p;
        }
    }
    // 2) ~/.local/share/isoverse
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return home.join(".local").join("share").join(APP_DIR);
    }
    // 3) 可执行文件旁边
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
