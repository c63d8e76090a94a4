/// Supervisor 的运行阶段（由下载器内部维护，外部只读监听）
///
/// `Probing → Dispatching → Downloading → {Completed, TimedOut, Failed} → Finalizing → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupervisorPhase {
    /// 尚未开始
    #[default]
    Idle,
    Probing,
    Dispatching,
    Downloading,
    Completed,
    TimedOut,
    Failed,
    Finalizing,
    Done,
}

impl SupervisorPhase {
    /// 是否为终止阶段（之后不会再变化）。
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SupervisorPhase::Done | SupervisorPhase::TimedOut | SupervisorPhase::Failed
        )
    }
}
