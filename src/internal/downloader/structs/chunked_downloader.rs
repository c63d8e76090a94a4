use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::internal::config::structs::FetchConfig;
use crate::internal::downloader::coordinator::{run_supervised_download, SupervisorParams};
use crate::internal::states::unlock_reactive::UnlockReactiveProperty;

use super::download_error::DownloadError;
use super::download_progress::DownloadProgress;
use super::reactive_state::ChunkedDownloaderReactiveState;
use super::supervisor_phase::SupervisorPhase;

/// 分片并发下载器：探测资源大小，用固定数量的 worker 按分片下载，最后按偏移合并。
///
/// 配置方法必须在 [`send`](Self::send) 之前调用。
#[derive(Debug)]
pub struct ChunkedDownloader {
    url: String,
    client: Client,
    config: FetchConfig,
    cancel: CancellationToken,
    reactive_state: ChunkedDownloaderReactiveState,
}

impl ChunkedDownloader {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: Client::new(),
            config: FetchConfig::default(),
            cancel: CancellationToken::new(),
            reactive_state: ChunkedDownloaderReactiveState::default(),
        }
    }

    /// 使用自定义 HTTP 客户端（代理、TLS 等由调用方配置）
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// 一次性替换全部可调参数
    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置分片大小（字节）
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// 设置 worker 数量
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// 设置整体超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// 挂到外部取消令牌下：外部取消时下载以 [`DownloadError::Cancelled`] 结束
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// 取消令牌的句柄，调用 `cancel()` 即可中止下载
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Supervisor 当前阶段，可读取或 watch
    pub fn phase(&self) -> UnlockReactiveProperty<SupervisorPhase> {
        self.reactive_state.phase.clone()
    }

    /// 下载进度，可读取或 watch
    pub fn progress(&self) -> UnlockReactiveProperty<DownloadProgress> {
        self.reactive_state.progress.clone()
    }

    /// 执行下载，成功时返回与远程资源完全一致的字节序列。
    pub async fn send(&self) -> Result<Vec<u8>, DownloadError> {
        let url = Url::parse(&self.url)?;
        run_supervised_download(SupervisorParams {
            client: self.client.clone(),
            url,
            config: self.config.clone(),
            state: self.reactive_state.clone(),
            cancel: self.cancel.clone(),
        })
        .await
    }
}
