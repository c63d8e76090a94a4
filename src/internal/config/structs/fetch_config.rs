use std::time::Duration;

use super::config_error::ConfigError;

/// 默认分片大小：1MB
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// 默认并发 worker 数
pub const DEFAULT_WORKERS: usize = 10;

/// 默认整体超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 一次分片下载的可调参数，在构造 Supervisor 时传入，运行期间不变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// 每个分片的大小（字节）
    pub chunk_size: u64,
    /// worker 数量（同时进行的 Range 请求上限）
    pub workers: usize,
    /// 整体超时，包含 HEAD 探测
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: DEFAULT_WORKERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "chunk_size",
                value: "0".into(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: "workers",
                value: "0".into(),
            });
        }
        Ok(())
    }
}
