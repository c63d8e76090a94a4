//! 资源探测（HEAD 请求）相关错误类型。

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("服务器不支持 Range 请求（Accept-Ranges: {0:?}）")]
    UnsupportedRange(Option<String>),

    #[error("Content-Length 无效: {0}")]
    InvalidLength(String),

    #[error("HEAD 请求失败: {0}")]
    Network(#[from] reqwest::Error),

    /// HEAD 返回非成功状态码，此时不再检查响应头。
    #[error("HEAD 请求返回异常状态码: {0}")]
    Status(StatusCode),
}
