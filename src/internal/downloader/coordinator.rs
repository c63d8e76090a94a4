//! 分片下载协调器：offset 分发、worker 池、结果收集、合并，以及统一的取消/超时管理。

mod fetch_worker;
mod merger;
mod offset_dispatcher;
mod pending_set;
mod range_request;
mod result_collector;
mod supervisor;

pub(super) use supervisor::{run_supervised_download, SupervisorParams};
