//! 结果收集：存入分片、向分发器要下一个 offset 并转交给对应 worker。

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::internal::downloader::structs::DownloadError;

use super::fetch_worker::WorkerReport;
use super::offset_dispatcher::{Dispatch, OffsetDispatcher};
use super::pending_set::PendingSet;

/// 收集一个结果后的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CollectOutcome {
    Continue,
    /// 所有 worker 都已收到结束通知
    AllDone,
}

/// 收集端：独占 PendingSet、分发器和每个 worker 的任务发送端。
pub(super) struct ResultCollector {
    pending: PendingSet,
    dispatcher: OffsetDispatcher,
    /// 下标即 worker_id；`None` 表示该 worker 已被通知结束
    work_txs: Vec<Option<mpsc::Sender<u64>>>,
}

impl ResultCollector {
    pub(super) fn new(
        dispatcher: OffsetDispatcher,
        work_txs: Vec<mpsc::Sender<u64>>,
    ) -> Self {
        Self {
            pending: PendingSet::default(),
            dispatcher,
            work_txs: work_txs.into_iter().map(Some).collect(),
        }
    }

    /// 给每个 worker 发送初始 offset。
    pub(super) async fn seed(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<CollectOutcome, DownloadError> {
        let seeds = self.dispatcher.seed();
        for (worker_id, dispatch) in seeds.into_iter().enumerate() {
            self.forward(worker_id, dispatch, cancel).await?;
        }
        Ok(self.outcome())
    }

    /// 存入 worker 回传的分片，并给该 worker 分发下一步指令。
    pub(super) async fn collect(
        &mut self,
        report: WorkerReport,
        cancel: &CancellationToken,
    ) -> Result<CollectOutcome, DownloadError> {
        self.pending.insert(report.chunk)?;
        let next = self.dispatcher.advance();
        self.forward(report.worker_id, next, cancel).await?;
        Ok(self.outcome())
    }

    pub(super) fn pending(&self) -> &PendingSet {
        &self.pending
    }

    /// 关闭所有任务发送端，空闲的 worker 随之退出。
    pub(super) fn close_all(&mut self) {
        self.work_txs.iter_mut().for_each(|tx| *tx = None);
    }

    fn outcome(&self) -> CollectOutcome {
        if self.dispatcher.is_finished() {
            CollectOutcome::AllDone
        } else {
            CollectOutcome::Continue
        }
    }

    async fn forward(
        &mut self,
        worker_id: usize,
        dispatch: Dispatch,
        cancel: &CancellationToken,
    ) -> Result<(), DownloadError> {
        match dispatch {
            Dispatch::Offset(offset) => {
                let tx = self
                    .work_txs
                    .get(worker_id)
                    .and_then(Option::as_ref)
                    .ok_or(DownloadError::WorkerUnavailable { worker_id, offset })?;
                trace!(worker_id, offset, "分发分片");
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => Err(DownloadError::Cancelled),
                    sent = tx.send(offset) => sent.map_err(|_| DownloadError::Cancelled),
                }
            }
            Dispatch::Done => {
                // 丢弃发送端即关闭该 worker 的任务通道
                if let Some(slot) = self.work_txs.get_mut(worker_id) {
                    *slot = None;
                }
                trace!(
                    worker_id,
                    remaining = self.dispatcher.active_workers(),
                    "通知 worker 结束"
                );
                Ok(())
            }
        }
    }
}
