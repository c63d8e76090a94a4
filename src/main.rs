//! range-fetch：从环境变量读取下载源，分片并发下载后写入本地文件。

use std::process::ExitCode;

use range_fetch::config::{load_process_env_config, EnvConfig};
use range_fetch::downloader::ChunkedDownloader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 初始化日志；`LOG_FORMAT=json` 时输出 JSON。
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("range_fetch=info"));

    if json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match load_process_env_config() {
        Ok(c) => c,
        Err(e) => {
            error!("配置错误: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: EnvConfig) -> Result<(), Box<dyn std::error::Error>> {
    let downloader = ChunkedDownloader::new(config.url.as_str()).with_config(config.fetch);

    // Ctrl+C 取消下载
    let cancel = downloader.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let bytes = downloader.send().await?;
    tokio::fs::write(&config.output, &bytes).await?;

    info!(path = %config.output.display(), bytes = bytes.len(), "已保存");
    if config.print_body {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    println!("{} -> {} ({} bytes)", config.url, config.output.display(), bytes.len());
    Ok(())
}
