use url::Url;

/// 探测完成后的远程资源描述，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: Url,
    /// 资源总字节数（来自 HEAD 响应的 Content-Length）
    pub total_length: u64,
    /// 分片大小（字节），来自配置
    pub chunk_size: u64,
}

impl Resource {
    pub fn new(url: Url, total_length: u64, chunk_size: u64) -> Self {
        Self {
            url,
            total_length,
            chunk_size,
        }
    }

    /// 分片总数：ceil(total_length / chunk_size)。
    pub fn chunk_count(&self) -> u64 {
        if self.chunk_size == 0 {
            return 0;
        }
        self.total_length.div_ceil(self.chunk_size)
    }

    /// 从 `offset` 开始的分片实际应有的字节数；末尾分片会被截短。
    pub fn expected_len(&self, offset: u64) -> u64 {
        self.chunk_size
            .min(self.total_length.saturating_sub(offset))
    }

    /// 该分片的 Range 请求头：`bytes=offset-(offset+chunk_size-1)`。
    ///
    /// 末尾分片的上界截断到 `total_length - 1`。
    pub fn range_header(&self, offset: u64) -> String {
        let end_exclusive = offset
            .saturating_add(self.chunk_size)
            .min(self.total_length);
        let end_inclusive = end_exclusive.saturating_sub(1).max(offset);
        format!("bytes={}-{}", offset, end_inclusive)
    }
}
