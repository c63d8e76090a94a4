//! 下载配置：可调参数（分片大小、并发数、超时）以及二进制入口使用的环境变量配置。

pub mod functions;
pub mod structs;
