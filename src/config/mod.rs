pub mod game;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("配置非法: {0}")]
    Invalid(String),
}
