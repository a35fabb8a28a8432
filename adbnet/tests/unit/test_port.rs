//! TCP port probe tests

use std::time::{Duration, Instant};

use adbnet::scanner::port::{PortProbe, TcpPortProbe};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_listening_port_is_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    assert!(TcpPortProbe.is_open("127.0.0.1", port, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_closed_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    assert!(!TcpPortProbe.is_open("127.0.0.1", port, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_unanswered_connect_is_bounded() {
    // Unroutable; either times out or fails fast, never hangs past the deadline.
    let start = Instant::now();
    let open = TcpPortProbe
        .is_open("10.255.255.1", 5555, Duration::from_millis(300))
        .await;
    assert!(!open);
    assert!(start.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn test_unresolvable_host() {
    let open = TcpPortProbe
        .is_open("no-such-host.invalid", 5555, Duration::from_millis(500))
        .await;
    assert!(!open);
}
