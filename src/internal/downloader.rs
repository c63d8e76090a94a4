//! 下载器领域模块：分片并发下载的协调器，以及对外暴露的下载器结构体。
//!
//! 使用方式：`ChunkedDownloader::new(url).chunk_size(n).workers(n).send().await`
//! 对外导出以 [`crate::downloader`] 为准，此处仅做模块划分。

mod coordinator;
pub mod structs;
