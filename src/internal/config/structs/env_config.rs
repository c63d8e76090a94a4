use std::path::PathBuf;

use url::Url;

use super::fetch_config::FetchConfig;

/// 二进制入口从环境变量读取的完整配置。
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// 下载源（GET_URL）
    pub url: Url,
    /// 分片下载参数
    pub fetch: FetchConfig,
    /// 本地保存路径
    pub output: PathBuf,
    /// 下载完成后把内容按文本输出到 stdout（FETCH_PRINT_BODY）
    pub print_body: bool,
}
