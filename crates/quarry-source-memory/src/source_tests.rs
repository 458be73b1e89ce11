//! Unit tests for the in-memory repository source

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quarry_core::{Connection, QuarryError, RepositorySource, Request};
use serde_json::json;

use super::*;

fn title(text: &str) -> HashMap<String, serde_json::Value> {
    HashMap::from([("title".to_string(), json!(text))])
}

#[test]
fn test_memory_source_name() {
    let source = MemorySource::new("repo");
    assert_eq!(source.name(), "repo");
    assert_eq!(source.node_count(), 0);
}

#[tokio::test]
async fn test_memory_connect_counts() {
    let source = MemorySource::new("repo");
    let _a = source.connect().await.unwrap();
    let _b = source.connect().await.unwrap();
    assert_eq!(source.opened(), 2);
    assert_eq!(source.closed(), 0);
}

#[tokio::test]
async fn test_memory_write_then_read() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();

    conn.execute(Request::write_node("/docs/readme", title("Hello")))
        .await
        .unwrap();
    conn.execute(Request::read_node("/docs/readme"))
        .await
        .unwrap();

    let node = source.node("/docs/readme").unwrap();
    assert_eq!(node.get("title"), Some(&json!("Hello")));
    assert_eq!(source.node_count(), 1);
}

#[tokio::test]
async fn test_memory_read_missing_node() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();

    let result = conn.execute(Request::read_node("/missing")).await;
    assert!(matches!(result, Err(QuarryError::NotFound(_))));
}

#[tokio::test]
async fn test_memory_remove_node() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();

    conn.execute(Request::write_node("/tmp/node", title("x")))
        .await
        .unwrap();
    conn.execute(Request::remove_node("/tmp/node"))
        .await
        .unwrap();
    assert_eq!(source.node_count(), 0);

    let result = conn.execute(Request::remove_node("/tmp/node")).await;
    assert!(matches!(result, Err(QuarryError::NotFound(_))));
}

#[tokio::test]
async fn test_memory_verify_workspace() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();
    conn.execute(Request::verify_workspace("default"))
        .await
        .unwrap();

    let result = conn.execute(Request::verify_workspace("staging")).await;
    assert!(matches!(result, Err(QuarryError::NotFound(_))));

    let source = MemorySource::new("repo").with_workspace("main");
    let conn = source.connect().await.unwrap();
    conn.execute(Request::verify_workspace("main"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_memory_connections_share_nodes() {
    let source = MemorySource::new("repo");
    let writer = source.connect().await.unwrap();
    let reader = source.connect().await.unwrap();

    writer
        .execute(Request::write_node("/shared", title("seen by all")))
        .await
        .unwrap();
    reader.execute(Request::read_node("/shared")).await.unwrap();
}

#[tokio::test]
async fn test_memory_fail_next_connects() {
    let source = MemorySource::new("repo");
    source.fail_next_connects(1);

    let result = source.connect().await;
    assert!(matches!(result, Err(QuarryError::Connection(_))));
    assert_eq!(source.opened(), 0);

    source.connect().await.unwrap();
    assert_eq!(source.opened(), 1);
}

#[tokio::test]
async fn test_memory_ping() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();

    assert!(conn.ping(Duration::from_millis(100)).await.unwrap());

    source.fail_next_pings(1);
    assert!(!conn.ping(Duration::from_millis(100)).await.unwrap());
    assert!(conn.ping(Duration::from_millis(100)).await.unwrap());
}

#[tokio::test]
async fn test_memory_ping_respects_timeout() {
    let source = MemorySource::new("repo").with_latency(Duration::from_millis(50));
    let conn = source.connect().await.unwrap();

    let started = Instant::now();
    let usable = conn.ping(Duration::from_millis(10)).await.unwrap();
    assert!(!usable);
    assert!(started.elapsed() < Duration::from_millis(50));

    assert!(conn.ping(Duration::from_millis(200)).await.unwrap());
}

#[tokio::test]
async fn test_memory_close_is_idempotent() {
    let source = MemorySource::new("repo");
    let conn = source.connect().await.unwrap();

    conn.close().await.unwrap();
    conn.close().await.unwrap();
    assert_eq!(source.closed(), 1);

    let result = conn.execute(Request::read_node("/any")).await;
    assert!(matches!(result, Err(QuarryError::ConnectionClosed)));
    assert!(!conn.ping(Duration::from_millis(10)).await.unwrap());
}

#[tokio::test]
async fn test_memory_latency_applies_to_requests() {
    let source = MemorySource::new("repo").with_latency(Duration::from_millis(20));
    let conn = source.connect().await.unwrap();

    let started = Instant::now();
    conn.execute(Request::write_node("/slow", title("x")))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(20));
}
