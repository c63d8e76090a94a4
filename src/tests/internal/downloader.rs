//! 下载器测试：分片分发与合并、空资源、探测失败、分片失败、超时与外部取消。
//!
//! 所有测试都针对本地 wiremock 服务器，不依赖外部网络。

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::FetchConfig;
use crate::downloader::{ChunkedDownloader, DownloadError, FetchError, SupervisorPhase};
use crate::resource::ProbeError;
use crate::tests::{
    get_request_count, mount_get, mount_head, mount_range_resource, random_body,
    requested_ranges, resource_url, start_truncating_server, RangeResponder, Truncation,
    RESOURCE_PATH,
};
use crate::{fetch_resource, probe_remote_resource};

fn small_config(chunk_size: u64, workers: usize) -> FetchConfig {
    FetchConfig {
        chunk_size,
        workers,
        timeout: Duration::from_secs(10),
    }
}

// ═══════════════════════════ 正常下载 ═══════════════════════════

#[tokio::test]
async fn download_250_bytes_with_three_workers() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_range_resource(&server, &body).await;

    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .chunk_size(100)
        .workers(3);
    let bytes = downloader.send().await.expect("下载应成功");

    assert_eq!(bytes.len(), 250);
    assert_eq!(bytes, body);
    assert_eq!(
        requested_ranges(&server).await,
        vec!["bytes=0-99", "bytes=100-199", "bytes=200-249"]
    );
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::Done);
}

#[tokio::test]
async fn download_many_chunks_reassembles_in_order() {
    let server = MockServer::start().await;
    let body = random_body(50_000);
    mount_range_resource(&server, &body).await;

    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_config(small_config(1_000, 8));
    let bytes = downloader.send().await.expect("下载应成功");

    assert_eq!(bytes, body);

    // 每个分片恰好请求一次
    let ranges = requested_ranges(&server).await;
    assert_eq!(ranges.len(), 50);
    let mut deduped = ranges.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), ranges.len());

    let progress = downloader.progress().get_current();
    assert_eq!(progress.bytes_done, 50_000);
    assert_eq!(progress.chunks_done, 50);
    assert_eq!(progress.total, Some(50_000));
    assert!((progress.pct() - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn more_workers_than_chunks() {
    let server = MockServer::start().await;
    let body = random_body(150);
    mount_range_resource(&server, &body).await;

    let bytes = fetch_resource(&resource_url(&server), small_config(100, 8))
        .await
        .expect("下载应成功");

    assert_eq!(bytes, body);
    assert_eq!(
        requested_ranges(&server).await,
        vec!["bytes=0-99", "bytes=100-149"]
    );
}

#[tokio::test]
async fn single_chunk_larger_than_resource() {
    let server = MockServer::start().await;
    let body = random_body(10);
    mount_range_resource(&server, &body).await;

    let bytes = fetch_resource(&resource_url(&server), small_config(4096, 2))
        .await
        .expect("下载应成功");

    assert_eq!(bytes, body);
    assert_eq!(requested_ranges(&server).await, vec!["bytes=0-9"]);
}

#[tokio::test]
async fn empty_resource_issues_no_range_requests() {
    let server = MockServer::start().await;
    mount_range_resource(&server, &[]).await;

    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_config(small_config(100, 3));
    let bytes = downloader.send().await.expect("空资源应下载成功");

    assert!(bytes.is_empty());
    assert_eq!(get_request_count(&server).await, 0);
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::Done);
}

#[tokio::test]
async fn custom_client_is_used_for_every_request() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_range_resource(&server, &body).await;

    let client = reqwest::Client::builder()
        .user_agent("range-fetch-test/1.0")
        .build()
        .unwrap();
    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_client(client)
        .with_config(small_config(100, 3));
    assert_eq!(downloader.config(), &small_config(100, 3));

    let bytes = downloader.send().await.expect("下载应成功");
    assert_eq!(bytes, body);

    // 1 次 HEAD + 3 次 GET，全部带自定义 User-Agent
    let agents: Vec<Option<String>> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| {
            r.headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect();
    assert_eq!(agents.len(), 4);
    assert!(
        agents.iter().all(|a| a.as_deref() == Some("range-fetch-test/1.0")),
        "{:?}",
        agents
    );
}

// ═══════════════════════════ 探测失败 ═══════════════════════════

#[tokio::test]
async fn missing_accept_ranges_fails_before_any_fetch() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_head(&server, body.len(), false).await;
    mount_get(&server, RangeResponder::new(body)).await;

    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_config(small_config(100, 3));
    let err = downloader.send().await.unwrap_err();

    assert!(
        matches!(err, DownloadError::Probe(ProbeError::UnsupportedRange(_))),
        "预期 UnsupportedRange，得到 {:?}",
        err
    );
    assert_eq!(get_request_count(&server).await, 0);
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::Failed);
}

#[tokio::test]
async fn head_not_found_is_a_probe_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(RESOURCE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetch_resource(&resource_url(&server), small_config(100, 3))
        .await
        .unwrap_err();

    match err {
        DownloadError::Probe(ProbeError::Status(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("预期 Probe(Status)，得到 {:?}", other),
    }
}

#[tokio::test]
async fn probe_only_returns_resource() {
    let server = MockServer::start().await;
    mount_range_resource(&server, &random_body(250)).await;

    let resource = probe_remote_resource(&resource_url(&server), &small_config(100, 3))
        .await
        .expect("探测应成功");

    assert_eq!(resource.total_length, 250);
    assert_eq!(resource.chunk_count(), 3);
    assert_eq!(get_request_count(&server).await, 0);
}

// ═══════════════════════════ 分片失败 ═══════════════════════════

#[tokio::test]
async fn failed_chunk_aborts_whole_download() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_head(&server, body.len(), true).await;
    mount_get(&server, RangeResponder::new(body).fail_at(100)).await;

    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_config(small_config(100, 3));
    let err = downloader.send().await.unwrap_err();

    match err {
        DownloadError::Fetch(fetch) => {
            assert_eq!(fetch.offset(), 100);
            match fetch {
                FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
                other => panic!("预期 Status，得到 {:?}", other),
            }
        }
        other => panic!("预期 Fetch(Status)，得到 {:?}", other),
    }
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::Failed);
}

#[tokio::test]
async fn dropped_connection_fails_with_request_error() {
    let body = random_body(250);
    let url = start_truncating_server(
        body,
        Truncation {
            offset: 100,
            sent: 10,
            others_delay: Duration::from_millis(300),
        },
    )
    .await;

    let started = Instant::now();
    let result = fetch_resource(&url, small_config(100, 3)).await;
    let elapsed = started.elapsed();

    match result {
        Err(DownloadError::Fetch(fetch)) => {
            assert!(matches!(fetch, FetchError::Request { .. }), "{:?}", fetch);
            assert_eq!(fetch.offset(), 100);
        }
        Err(other) => panic!("预期 Fetch(Request)，得到 {:?}", other),
        Ok(bytes) => panic!("连接中断时不应产生输出，得到 {} 字节", bytes.len()),
    }
    assert!(elapsed < Duration::from_secs(2), "耗时过长: {:?}", elapsed);
}

#[tokio::test]
async fn server_ignoring_range_is_rejected() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_head(&server, body.len(), true).await;
    // 忽略 Range，直接返回 200 和完整内容
    Mock::given(method("GET"))
        .and(path(RESOURCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let err = fetch_resource(&resource_url(&server), small_config(100, 3))
        .await
        .unwrap_err();

    assert!(
        matches!(err, DownloadError::Fetch(FetchError::Status { .. })),
        "预期 Fetch(Status)，得到 {:?}",
        err
    );
}

#[tokio::test]
async fn oversized_partial_body_is_rejected() {
    let server = MockServer::start().await;
    let body = random_body(250);
    mount_head(&server, body.len(), true).await;
    // 返回 206，但内容是整个资源
    Mock::given(method("GET"))
        .and(path(RESOURCE_PATH))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(body))
        .mount(&server)
        .await;

    let err = fetch_resource(&resource_url(&server), small_config(100, 3))
        .await
        .unwrap_err();

    assert!(
        matches!(err, DownloadError::Fetch(FetchError::LengthMismatch { expected: 100, .. })
            | DownloadError::Fetch(FetchError::LengthMismatch { expected: 50, .. })),
        "预期 Fetch(LengthMismatch)，得到 {:?}",
        err
    );
}

// ═══════════════════════════ 超时与取消 ═══════════════════════════

#[tokio::test]
async fn slow_server_times_out_and_workers_stop() {
    let server = MockServer::start().await;
    let body = random_body(1_000);
    mount_head(&server, body.len(), true).await;
    mount_get(
        &server,
        RangeResponder::new(body).with_delay(Duration::from_secs(5)),
    )
    .await;

    let timeout = Duration::from_millis(300);
    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .chunk_size(100)
        .workers(4)
        .timeout(timeout);

    let started = Instant::now();
    let err = downloader.send().await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(
        matches!(err, DownloadError::Timeout(d) if d == timeout),
        "预期 Timeout，得到 {:?}",
        err
    );
    // send() 返回前已等待所有 worker 退出，因此耗时应远小于服务器延迟
    assert!(elapsed < Duration::from_secs(3), "耗时过长: {:?}", elapsed);
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::TimedOut);
}

#[tokio::test]
async fn external_cancellation_reports_cancelled() {
    let server = MockServer::start().await;
    let body = random_body(1_000);
    mount_head(&server, body.len(), true).await;
    mount_get(
        &server,
        RangeResponder::new(body).with_delay(Duration::from_secs(5)),
    )
    .await;

    let token = CancellationToken::new();
    let downloader = ChunkedDownloader::new(&resource_url(&server))
        .with_config(small_config(100, 4))
        .with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = downloader.send().await.unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, DownloadError::Cancelled), "预期 Cancelled，得到 {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(downloader.phase().get_current(), SupervisorPhase::Failed);
}

// ═══════════════════════════ 参数校验 ═══════════════════════════

#[tokio::test]
async fn invalid_config_is_rejected_before_network() {
    let server = MockServer::start().await;
    mount_range_resource(&server, &random_body(10)).await;

    let err = ChunkedDownloader::new(&resource_url(&server))
        .workers(0)
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::InvalidConfig(_)));
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "参数无效时不应发出任何请求");
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let err = ChunkedDownloader::new("not a url").send().await.unwrap_err();
    assert!(matches!(err, DownloadError::InvalidUrl(_)));
}
