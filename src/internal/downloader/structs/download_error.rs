//! 下载相关错误类型。

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::internal::config::structs::ConfigError;
use crate::internal::resource::structs::ProbeError;

/// 单个分片 Range 请求失败。
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("分片 {offset} 请求失败: {source}")]
    Request {
        offset: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("分片 {offset} 返回异常状态码: {status}（预期 206）")]
    Status { offset: u64, status: StatusCode },

    #[error("分片 {offset} 长度不符: 预期 {expected} 字节，实际 {actual} 字节")]
    LengthMismatch {
        offset: u64,
        expected: u64,
        actual: u64,
    },
}

impl FetchError {
    pub fn offset(&self) -> u64 {
        match self {
            FetchError::Request { offset, .. }
            | FetchError::Status { offset, .. }
            | FetchError::LengthMismatch { offset, .. } => *offset,
        }
    }
}

/// 一次下载的终止错误：只记录第一个失败原因。
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("资源探测失败: {0}")]
    Probe(#[from] ProbeError),

    #[error("分片下载失败: {0}")]
    Fetch(#[from] FetchError),

    #[error("下载超时（{0:?}）")]
    Timeout(Duration),

    #[error("下载被取消")]
    Cancelled,

    /// 合并时发现缺失分片，说明分发逻辑出现了问题。
    #[error("合并失败: {0}")]
    Merge(String),

    /// 同一偏移的分片到达两次。
    #[error("分片 {offset} 重复到达")]
    InternalInvariant { offset: u64 },

    /// 要分发的 worker 已被通知结束，任务通道不存在。
    #[error("worker {worker_id} 的任务通道已关闭，无法分发分片 {offset}")]
    WorkerUnavailable { worker_id: usize, offset: u64 },

    #[error("所有 worker 已退出，但分片尚未收集完")]
    WorkersExited,

    #[error("配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("URL 格式错误: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("分片任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
