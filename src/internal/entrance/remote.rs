use reqwest::Client;
use url::Url;

use crate::internal::config::structs::FetchConfig;
use crate::internal::downloader::structs::{ChunkedDownloader, DownloadError};
use crate::internal::resource::functions::probe_resource;
use crate::internal::resource::structs::Resource;

/// 按给定配置分片下载远程资源，返回完整字节序列
///
/// example:
/// ```
/// use range_fetch::{fetch_resource, config::FetchConfig};
///
/// let config = FetchConfig { workers: 4, ..Default::default() };
/// let bytes = fetch_resource("http://localhost:8080/file.bin", config).await?;
/// ```
pub async fn fetch_resource(
    url: &str,
    config: FetchConfig,
) -> Result<Vec<u8>, DownloadError> {
    ChunkedDownloader::new(url).with_config(config).send().await
}

/// 只做资源探测（HEAD），不下载任何分片
///
/// - 注意：返回的 `chunk_size` 取自传入的配置，探测本身不关心分片大小
pub async fn probe_remote_resource(
    url: &str,
    config: &FetchConfig,
) -> Result<Resource, DownloadError> {
    let url = Url::parse(url)?;
    let total_length = probe_resource(&Client::new(), &url).await?;
    Ok(Resource::new(url, total_length, config.chunk_size))
}
