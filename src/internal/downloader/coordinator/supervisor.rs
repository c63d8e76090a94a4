//! Supervisor：驱动一次完整的分片下载。
//!
//! 阶段：`Probing → Dispatching → Downloading → {Completed, TimedOut, Failed} → Finalizing → Done`
//!
//! - 分发器、收集端、PendingSet 都只在本任务内修改，与 worker 之间只通过通道通信
//! - 所有 worker 共用一个取消令牌；第一个错误或超时会取消它
//! - 返回任何结果之前都会等待全部 worker 退出

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::internal::config::structs::FetchConfig;
use crate::internal::downloader::structs::{
    ChunkedDownloaderReactiveState, DownloadError, DownloadProgress, SupervisorPhase,
};
use crate::internal::resource::functions::probe_resource;
use crate::internal::resource::structs::Resource;

use super::fetch_worker::{run_fetch_worker, FetchWorkerParams, WorkerReport};
use super::merger::merge_chunks;
use super::offset_dispatcher::OffsetDispatcher;
use super::result_collector::{CollectOutcome, ResultCollector};

/// 启动 Supervisor 时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct SupervisorParams {
    pub client: Client,
    pub url: Url,
    pub config: FetchConfig,
    pub state: ChunkedDownloaderReactiveState,
    /// 外部取消令牌；Supervisor 在其下创建自己的子令牌
    pub cancel: CancellationToken,
}

#[instrument(name = "chunked_download", skip_all, fields(url = %params.url))]
pub(crate) async fn run_supervised_download(
    params: SupervisorParams,
) -> Result<Vec<u8>, DownloadError> {
    let SupervisorParams {
        client,
        url,
        config,
        state,
        cancel,
    } = params;

    let result = supervise(&client, url, &config, &state, cancel).await;

    match &result {
        Ok(bytes) => {
            set_phase(&state, SupervisorPhase::Done);
            info!(bytes = bytes.len(), "下载完成");
        }
        Err(DownloadError::Timeout(_)) => {
            set_phase(&state, SupervisorPhase::TimedOut);
            warn!(timeout = ?config.timeout, "下载超时");
        }
        Err(e) => {
            set_phase(&state, SupervisorPhase::Failed);
            warn!(error = %e, "下载失败");
        }
    }

    result
}

async fn supervise(
    client: &Client,
    url: Url,
    config: &FetchConfig,
    state: &ChunkedDownloaderReactiveState,
    cancel: CancellationToken,
) -> Result<Vec<u8>, DownloadError> {
    config.validate()?;

    let deadline = Instant::now() + config.timeout;
    let scope = cancel.child_token();

    // ---------- Probing ----------
    set_phase(state, SupervisorPhase::Probing);
    let total_length = tokio::select! {
        biased;

        _ = scope.cancelled() => return Err(DownloadError::Cancelled),
        _ = tokio::time::sleep_until(deadline) => {
            return Err(DownloadError::Timeout(config.timeout));
        }
        probed = probe_resource(client, &url) => probed?,
    };
    let resource = Arc::new(Resource::new(url, total_length, config.chunk_size));
    state.progress.update(DownloadProgress {
        bytes_done: 0,
        chunks_done: 0,
        total: Some(total_length),
    });
    info!(
        total_length,
        chunk_size = config.chunk_size,
        chunks = resource.chunk_count(),
        workers = config.workers,
        "开始分片下载"
    );

    // ---------- Dispatching ----------
    set_phase(state, SupervisorPhase::Dispatching);
    let (report_tx, mut report_rx) = mpsc::channel::<WorkerReport>(config.workers);
    let mut workers = JoinSet::new();
    let mut work_txs = Vec::with_capacity(config.workers);

    for worker_id in 0..config.workers {
        let (work_tx, work_rx) = mpsc::channel::<u64>(1);
        work_txs.push(work_tx);
        workers.spawn(run_fetch_worker(FetchWorkerParams {
            worker_id,
            client: client.clone(),
            resource: Arc::clone(&resource),
            work_rx,
            report_tx: report_tx.clone(),
            cancel: scope.clone(),
        }));
    }
    drop(report_tx);

    let mut collector = ResultCollector::new(
        OffsetDispatcher::new(total_length, config.chunk_size, config.workers),
        work_txs,
    );

    // ---------- Downloading ----------
    set_phase(state, SupervisorPhase::Downloading);
    let downloaded = drive_downloads(DriveParams {
        collector: &mut collector,
        report_rx: &mut report_rx,
        workers: &mut workers,
        scope: &scope,
        deadline,
        timeout: config.timeout,
        state,
    })
    .await;

    if let Err(first) = downloaded {
        // 取消所有 worker 并等待它们退出；之后的错误都是取消的连带结果，丢弃
        scope.cancel();
        collector.close_all();
        join_all_workers(&mut workers).await;
        debug!(error = %first, "全部 worker 已退出");
        return Err(first);
    }

    // ---------- Completed ----------
    set_phase(state, SupervisorPhase::Completed);
    collector.close_all();
    while let Some(joined) = workers.join_next().await {
        joined??;
    }

    // ---------- Finalizing ----------
    set_phase(state, SupervisorPhase::Finalizing);
    debug!(
        chunks = collector.pending().len(),
        bytes = collector.pending().bytes(),
        "开始合并分片"
    );
    merge_chunks(collector.pending(), &resource)
}

struct DriveParams<'a> {
    collector: &'a mut ResultCollector,
    report_rx: &'a mut mpsc::Receiver<WorkerReport>,
    workers: &'a mut JoinSet<Result<(), DownloadError>>,
    scope: &'a CancellationToken,
    deadline: Instant,
    timeout: Duration,
    state: &'a ChunkedDownloaderReactiveState,
}

/// 下载阶段主循环：返回 `Ok(())` 表示所有 worker 都已收到结束通知，否则返回第一个失败原因。
async fn drive_downloads(params: DriveParams<'_>) -> Result<(), DownloadError> {
    let DriveParams {
        collector,
        report_rx,
        workers,
        scope,
        deadline,
        timeout,
        state,
    } = params;

    if collector.seed(scope).await? == CollectOutcome::AllDone {
        return Ok(());
    }

    let sleep = tokio::time::sleep_until(deadline);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            biased;

            // 循环内只有外部取消会触发
            _ = scope.cancelled() => return Err(DownloadError::Cancelled),
            _ = &mut sleep => return Err(DownloadError::Timeout(timeout)),
            Some(joined) = workers.join_next() => match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e),
                Err(join_err) => return Err(DownloadError::TaskJoin(join_err)),
            },
            report = report_rx.recv() => {
                let Some(report) = report else {
                    return Err(DownloadError::WorkersExited);
                };
                let len = report.chunk.len();
                let outcome = collector.collect(report, scope).await?;
                state.progress.update_field(|p| {
                    p.bytes_done += len;
                    p.chunks_done += 1;
                });
                if outcome == CollectOutcome::AllDone {
                    return Ok(());
                }
            }
        }
    }
}

async fn join_all_workers(workers: &mut JoinSet<Result<(), DownloadError>>) {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) | Ok(Err(DownloadError::Cancelled)) => {}
            Ok(Err(e)) => debug!(error = %e, "取消后 worker 返回的错误已忽略"),
            Err(e) => debug!(error = %e, "取消后 worker 任务异常"),
        }
    }
}

fn set_phase(state: &ChunkedDownloaderReactiveState, phase: SupervisorPhase) {
    state.phase.update(phase);
}
