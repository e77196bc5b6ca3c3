#![allow(clippy::unwrap_used)]
// Connection-level failures, driven by raw local sockets instead of wiremock.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use bbox_api::{BboxClient, ClientConfig, Error, ErrorKind, SessionState};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(addr: &str) -> BboxClient {
    let config = ClientConfig::new(&format!("http://{addr}/api/v1/"))
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    BboxClient::new("s3cret".to_string().into(), config)
}

/// An address nothing listens on: bind an ephemeral port, then release it.
fn closed_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_connection_refused_is_api_error() {
    let mut client = client_for(&closed_addr());

    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::ApiError);
    assert!(!err.is_timeout());
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_read_connection_dropped_is_api_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let router = tokio::spawn(async move {
        // Login: accept, answer 200 and close the connection.
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = vec![0_u8; 8192];
        let _ = sock.read(&mut buf).await.unwrap();
        sock.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        sock.shutdown().await.unwrap();
        drop(sock);

        // Read: hang up without answering.
        let (sock, _) = listener.accept().await.unwrap();
        drop(sock);
    });

    let mut client = client_for(&addr);
    client.authenticate().await.unwrap();
    assert!(client.is_authenticated());

    let err = client.get_wan_ip_stats().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::ApiError);
    // Only a 401 ends the session; a broken connection does not.
    assert_eq!(client.state(), SessionState::Authenticated);

    router.await.unwrap();
}
