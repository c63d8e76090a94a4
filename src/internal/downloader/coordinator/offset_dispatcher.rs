//! 分片分发：持有尚未分配的 offset 游标，决定下一个分片或通知 worker 结束。
//!
//! 只由协调任务持有和修改，不需要加锁。

/// 分发给某个 worker 的下一步指令。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Dispatch {
    /// 下载从该偏移开始的分片
    Offset(u64),
    /// 没有剩余分片，该 worker 结束
    Done,
}

#[derive(Debug)]
pub(super) struct OffsetDispatcher {
    cursor: u64,
    total_length: u64,
    chunk_size: u64,
    workers: usize,
    active_workers: usize,
}

impl OffsetDispatcher {
    pub(super) fn new(total_length: u64, chunk_size: u64, workers: usize) -> Self {
        Self {
            cursor: 0,
            total_length,
            chunk_size,
            workers,
            active_workers: workers,
        }
    }

    /// 为每个 worker 生成初始指令：第 i 个 worker 拿到 `i * chunk_size`。
    ///
    /// 超出资源末尾的初始偏移不会被分发，对应 worker 直接收到 `Done`。
    pub(super) fn seed(&mut self) -> Vec<Dispatch> {
        let mut seeds = Vec::with_capacity(self.workers);
        for i in 0..self.workers as u64 {
            let offset = i.saturating_mul(self.chunk_size);
            if offset < self.total_length {
                seeds.push(Dispatch::Offset(offset));
            } else {
                self.active_workers -= 1;
                seeds.push(Dispatch::Done);
            }
        }
        self.cursor = (self.workers as u64).saturating_mul(self.chunk_size);
        seeds
    }

    /// 某个 worker 完成一个分片后调用，返回它的下一步指令。
    pub(super) fn advance(&mut self) -> Dispatch {
        if self.cursor < self.total_length {
            let offset = self.cursor;
            self.cursor = self.cursor.saturating_add(self.chunk_size);
            Dispatch::Offset(offset)
        } else {
            debug_assert!(self.active_workers > 0, "worker 被重复通知结束");
            self.active_workers = self.active_workers.saturating_sub(1);
            Dispatch::Done
        }
    }

    pub(super) fn active_workers(&self) -> usize {
        self.active_workers
    }

    /// 所有 worker 都已收到 `Done`。
    pub(super) fn is_finished(&self) -> bool {
        self.active_workers == 0
    }
}
