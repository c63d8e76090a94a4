//! 配置相关错误类型。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("缺少环境变量 {0}")]
    MissingVar(&'static str),

    #[error("配置项 {name} 的值无效: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("URL 格式错误: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `.env` 存在但无法读取或解析
    #[error(".env 加载失败: {0}")]
    DotEnv(#[from] dotenvy::Error),
}
