mod common;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use print_bridge::bootstrap::ListenerState;
use print_bridge::{Server, ServerState, StartupError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use common::{MockBackend, TOKEN, config_with_token};

fn http_only(port: u16) -> ListenerState {
    ListenerState {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        https_port: None,
        http_port: Some(port),
        certificate_path: None,
    }
}

fn state_on(dir: &tempfile::TempDir, port: u16) -> ServerState {
    ServerState::new(
        config_with_token(dir, Some(TOKEN)),
        http_only(port),
        Arc::new(MockBackend::new()),
    )
}

async fn connect(port: u16) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server never started listening on {port}");
}

#[tokio::test]
async fn occupied_port_reports_port_in_use() {
    let holder = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = holder.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    let result = Server::new(state_on(&dir, port), None)
        .run_until(std::future::pending())
        .await;

    match result {
        Err(StartupError::PortInUse { port: reported }) => assert_eq!(reported, port),
        other => panic!("expected PortInUse, got {other:?}"),
    }
    assert_eq!(StartupError::PortInUse { port }.exit_code(), 5);
}

#[tokio::test]
async fn plaintext_listener_serves_and_shuts_down() {
    let port = {
        let probe = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        probe.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = Server::new(state_on(&dir, port), None).run_until(async move {
        let _ = stop_rx.await;
    });

    let client = async move {
        let mut stream = connect(port).await;
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        let _ = stop_tx.send(());
        response
    };

    let (result, response) = tokio::join!(server, client);
    assert!(result.is_ok(), "server error: {result:?}");
    assert!(response.starts_with("HTTP/1.1 200"), "response: {response}");
    assert!(response.contains(r#""ok":true"#));
    assert!(response.contains(&format!(r#""http":{port}"#)));
}
