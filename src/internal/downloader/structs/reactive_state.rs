use crate::internal::states::unlock_reactive::UnlockReactiveProperty;

use super::download_progress::DownloadProgress;
use super::supervisor_phase::SupervisorPhase;

/// 下载器响应式状态：内部更新，外部通过 watch 监听
#[derive(Debug, Clone)]
pub struct ChunkedDownloaderReactiveState {
    /// Supervisor 当前阶段（只读）
    pub phase: UnlockReactiveProperty<SupervisorPhase>,
    /// 已收集的字节数与分片数（只读）
    pub progress: UnlockReactiveProperty<DownloadProgress>,
}

impl Default for ChunkedDownloaderReactiveState {
    fn default() -> Self {
        Self {
            phase: UnlockReactiveProperty::new(SupervisorPhase::Idle),
            progress: UnlockReactiveProperty::new(DownloadProgress::default()),
        }
    }
}
