/// 内部实现模块
mod internal;


/// 导出核心入口函数
pub use internal::entrance::remote::*;

/// 可调参数与环境变量配置
pub mod config {
    use crate::internal;
    pub use internal::config::functions::*;
    pub use internal::config::functions::load_env_config::{
        ENV_CHUNK_SIZE, ENV_OUTPUT, ENV_PRINT_BODY, ENV_TIMEOUT_SECS, ENV_URL, ENV_WORKERS,
    };
    pub use internal::config::structs::*;
    pub use internal::config::structs::fetch_config::{
        DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS,
    };
}

/// 远程资源模型与 HEAD 探测，不能限制死在入口函数中，以防有人自己要用
pub mod resource {
    use crate::internal;
    pub use internal::resource::functions::*;
    pub use internal::resource::structs::*;
}

pub mod states {
    pub mod unlock_reactive {
        use crate::internal;
        pub use internal::states::unlock_reactive::*;
    }
}

pub mod downloader {
    use crate::internal;
    // 下载器：类型与入口（以 lib 为中心，此处统一导出）
    pub use internal::downloader::structs::*;
}
