//! 合并：按偏移升序拼接全部分片，得到与远程资源一致的字节序列。

use crate::internal::downloader::structs::DownloadError;
use crate::internal::resource::structs::Resource;

use super::pending_set::PendingSet;

/// 从偏移 0 开始依次查找分片并追加，直到偏移不小于 `total_length`。
///
/// 任何缺失的分片或最终长度不符都返回 [`DownloadError::Merge`]。
pub(super) fn merge_chunks(
    pending: &PendingSet,
    resource: &Resource,
) -> Result<Vec<u8>, DownloadError> {
    let total = resource.total_length;
    if resource.chunk_size == 0 && total > 0 {
        return Err(DownloadError::Merge("分片大小为 0".into()));
    }

    let mut out = Vec::with_capacity(total as usize);
    let mut offset = 0u64;
    while offset < total {
        let payload = pending
            .get(offset)
            .ok_or_else(|| DownloadError::Merge(format!("缺少偏移 {} 的分片", offset)))?;
        out.extend_from_slice(payload);
        offset += resource.chunk_size;
    }

    if out.len() as u64 != total {
        return Err(DownloadError::Merge(format!(
            "合并后长度 {} 与资源大小 {} 不一致",
            out.len(),
            total
        )));
    }

    Ok(out)
}
