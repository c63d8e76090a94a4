//! 资源探测：发送 HEAD 请求，确认服务器支持 Range 请求并读取资源总大小。

use reqwest::Client;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, HeaderMap};
use tracing::debug;
use url::Url;

use crate::internal::resource::structs::ProbeError;

/// 向 `url` 发送 HEAD 请求，返回资源总字节数。
///
/// 除网络请求外没有任何副作用。
pub async fn probe_resource(
    client: &Client,
    url: &Url,
) -> Result<u64, ProbeError> {
    let resp = client.head(url.as_str()).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status));
    }

    let total_length = inspect_probe_headers(resp.headers())?;
    debug!(%url, total_length, "资源探测完成");

    Ok(total_length)
}

/// 检查 HEAD 响应头：必须声明 `Accept-Ranges: bytes`，且 `Content-Length` 为非负整数。
pub fn inspect_probe_headers(headers: &HeaderMap) -> Result<u64, ProbeError> {
    let accept_ranges = headers
        .get(ACCEPT_RANGES)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let supports_bytes = accept_ranges.as_deref().is_some_and(|v| {
        v.split(',')
            .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
    });
    if !supports_bytes {
        return Err(ProbeError::UnsupportedRange(accept_ranges));
    }

    let raw = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| ProbeError::InvalidLength("缺少 Content-Length".into()))?;
    let text = raw
        .to_str()
        .map_err(|e| ProbeError::InvalidLength(e.to_string()))?;

    text.trim()
        .parse::<u64>()
        .map_err(|_| ProbeError::InvalidLength(text.to_string()))
}
