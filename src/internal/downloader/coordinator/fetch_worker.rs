//! 分片 worker：循环领取 offset，发起 Range 请求，把完整分片交给收集端。
//!
//! 所有阻塞点（领取任务、HTTP 请求、读响应体、回传结果）都会响应取消信号。

use std::sync::Arc;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::internal::downloader::structs::{DownloadError, FetchError};
use crate::internal::resource::structs::{Chunk, Resource};

use super::range_request::{fetch_range_response, FetchRangeParams};

/// worker 回传给收集端的结果。
#[derive(Debug)]
pub(super) struct WorkerReport {
    pub worker_id: usize,
    pub chunk: Chunk,
}

/// 启动 worker 时的参数（形参超过 3 个，用 struct 承载）。
pub(super) struct FetchWorkerParams {
    pub worker_id: usize,
    pub client: Client,
    pub resource: Arc<Resource>,
    pub work_rx: mpsc::Receiver<u64>,
    pub report_tx: mpsc::Sender<WorkerReport>,
    pub cancel: CancellationToken,
}

/// worker 主循环。
///
/// - 空闲时收到取消信号：直接返回 `Ok(())`
/// - 任务通道关闭（收集端通知结束）：返回 `Ok(())`
/// - 请求进行中被取消、或请求失败：返回错误，不重试
#[instrument(name = "fetch_worker", skip_all, fields(worker_id = params.worker_id))]
pub(super) async fn run_fetch_worker(
    mut params: FetchWorkerParams,
) -> Result<(), DownloadError> {
    loop {
        let offset = tokio::select! {
            biased;

            _ = params.cancel.cancelled() => {
                trace!("空闲时收到取消信号，退出");
                return Ok(());
            }
            next = params.work_rx.recv() => match next {
                Some(offset) => offset,
                None => {
                    trace!("没有剩余分片，退出");
                    return Ok(());
                }
            },
        };

        let chunk = tokio::select! {
            biased;

            _ = params.cancel.cancelled() => return Err(DownloadError::Cancelled),
            fetched = fetch_chunk(&params.client, &params.resource, offset) => fetched?,
        };
        debug!(offset, len = chunk.len(), "分片下载完成");

        let report = WorkerReport {
            worker_id: params.worker_id,
            chunk,
        };
        tokio::select! {
            biased;

            _ = params.cancel.cancelled() => return Err(DownloadError::Cancelled),
            sent = params.report_tx.send(report) => {
                if sent.is_err() {
                    return Err(DownloadError::Cancelled);
                }
            }
        }
    }
}

/// 下载 `[offset, offset + chunk_size)` 的完整数据，并校验长度。
async fn fetch_chunk(
    client: &Client,
    resource: &Resource,
    offset: u64,
) -> Result<Chunk, FetchError> {
    let range = resource.range_header(offset);
    let resp = fetch_range_response(FetchRangeParams {
        client,
        url: resource.url.as_str(),
        range: &range,
    })
    .await
    .map_err(|source| FetchError::Request { offset, source })?;

    let status = resp.status();
    if status != StatusCode::PARTIAL_CONTENT {
        return Err(FetchError::Status { offset, status });
    }

    let expected = resource.expected_len(offset);
    let mut buf = BytesMut::with_capacity(expected as usize);
    let mut stream = resp.bytes_stream();

    while let Some(piece) = stream.next().await {
        let piece = piece.map_err(|source| FetchError::Request { offset, source })?;
        let received = buf.len() as u64 + piece.len() as u64;
        if received > expected {
            return Err(FetchError::LengthMismatch {
                offset,
                expected,
                actual: received,
            });
        }
        buf.extend_from_slice(&piece);
    }

    if buf.len() as u64 != expected {
        return Err(FetchError::LengthMismatch {
            offset,
            expected,
            actual: buf.len() as u64,
        });
    }

    Ok(Chunk::new(offset, buf.freeze()))
}
