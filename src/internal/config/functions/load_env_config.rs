//! 从环境变量读取二进制入口的配置。
//!
//! | 变量                  | 必填 | 含义                         |
//! |-----------------------|------|------------------------------|
//! | `GET_URL`             | 是   | 下载源 URL                   |
//! | `FETCH_CHUNK_SIZE`    | 否   | 分片大小（字节）             |
//! | `FETCH_WORKERS`       | 否   | worker 数量                  |
//! | `FETCH_TIMEOUT_SECS`  | 否   | 整体超时（秒）               |
//! | `FETCH_OUTPUT`        | 否   | 保存路径，默认取 URL 文件名  |
//! | `FETCH_PRINT_BODY`    | 否   | 为真时把内容输出到 stdout    |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::internal::config::structs::{ConfigError, EnvConfig, FetchConfig};

pub const ENV_URL: &str = "GET_URL";
pub const ENV_CHUNK_SIZE: &str = "FETCH_CHUNK_SIZE";
pub const ENV_WORKERS: &str = "FETCH_WORKERS";
pub const ENV_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_OUTPUT: &str = "FETCH_OUTPUT";
pub const ENV_PRINT_BODY: &str = "FETCH_PRINT_BODY";

/// URL 中取不到文件名时使用的保存名
const FALLBACK_OUTPUT: &str = "download.bin";

/// 通过 `lookup` 读取配置项；未设置的可选项使用 [`FetchConfig::default`] 中的值。
pub fn load_env_config<F>(lookup: F) -> Result<EnvConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw_url = lookup(ENV_URL)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingVar(ENV_URL))?;
    let url = Url::parse(raw_url.trim())?;

    let defaults = FetchConfig::default();
    let chunk_size = parse_or(&lookup, ENV_CHUNK_SIZE, defaults.chunk_size)?;
    let workers = parse_or(&lookup, ENV_WORKERS, defaults.workers)?;
    let timeout_secs =
        parse_or(&lookup, ENV_TIMEOUT_SECS, defaults.timeout.as_secs())?;

    let fetch = FetchConfig {
        chunk_size,
        workers,
        timeout: Duration::from_secs(timeout_secs),
    };
    fetch.validate()?;

    let output = lookup(ENV_OUTPUT)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(output_name_from_url(&url)));

    let print_body = parse_flag(&lookup, ENV_PRINT_BODY)?;

    Ok(EnvConfig {
        url,
        fetch,
        output,
        print_body,
    })
}

/// 先加载当前目录下的 `.env`（若存在），再从进程环境变量读取配置。
///
/// `.env` 不存在时忽略；存在但格式错误时返回 [`ConfigError::DotEnv`]。
pub fn load_process_env_config() -> Result<EnvConfig, ConfigError> {
    allow_missing_dotenv(dotenvy::dotenv())?;
    load_env_config(|name| std::env::var(name).ok())
}

/// 只放过“文件不存在”，其余 `.env` 错误原样上报。
fn allow_missing_dotenv<T>(loaded: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// 从 URL 最后一段路径提取保存文件名，做 URL 解码并去掉路径分隔符。
pub fn output_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().to_string())
        .map(|s| s.replace(['/', '\\'], "_"))
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .unwrap_or_else(|| FALLBACK_OUTPUT.to_string())
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name,
            value: v,
        }),
    }
}

/// 开关类变量：未设置或为空视为关闭。
fn parse_flag<F>(lookup: &F, name: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidValue { name, value: raw }),
    }
}
