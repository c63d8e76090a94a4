use bytes::Bytes;

/// 单个分片：在资源中的起始偏移及其数据。
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 分片起始偏移（字节），是 chunk_size 的整数倍
    pub offset: u64,
    /// 分片数据，长度为 min(chunk_size, total_length - offset)
    pub payload: Bytes,
}

impl Chunk {
    pub fn new(offset: u64, payload: Bytes) -> Self {
        Self { offset, payload }
    }

    pub fn len(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
