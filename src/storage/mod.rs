pub mod paths;
pub mod runtime;
pub mod settings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("读写 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}
