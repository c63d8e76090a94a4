pub mod chunked_downloader;
pub mod download_error;
pub mod download_progress;
pub mod reactive_state;
pub mod supervisor_phase;

// 重导出公共类型
pub use chunked_downloader::ChunkedDownloader;
pub use download_error::{DownloadError, FetchError};
pub use download_progress::DownloadProgress;
pub use reactive_state::ChunkedDownloaderReactiveState;
pub use supervisor_phase::SupervisorPhase;
