use std::collections::HashMap;

use bytes::Bytes;

use crate::internal::downloader::structs::DownloadError;
use crate::internal::resource::structs::Chunk;

/// 已收集、尚未合并的分片：offset → 数据。
///
/// 只由协调任务写入，不需要加锁。
#[derive(Debug, Default)]
pub(super) struct PendingSet {
    chunks: HashMap<u64, Bytes>,
    bytes: u64,
}

impl PendingSet {
    /// 存入一个分片；同一偏移出现两次视为协议错误。
    pub(super) fn insert(&mut self, chunk: Chunk) -> Result<(), DownloadError> {
        if self.chunks.contains_key(&chunk.offset) {
            return Err(DownloadError::InternalInvariant {
                offset: chunk.offset,
            });
        }
        self.bytes += chunk.len();
        self.chunks.insert(chunk.offset, chunk.payload);
        Ok(())
    }

    pub(super) fn get(&self, offset: u64) -> Option<&Bytes> {
        self.chunks.get(&offset)
    }

    pub(super) fn len(&self) -> usize {
        self.chunks.len()
    }

    /// 已存入的总字节数
    pub(super) fn bytes(&self) -> u64 {
        self.bytes
    }
}
