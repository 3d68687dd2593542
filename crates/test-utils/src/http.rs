// crates/test-utils/src/http.rs

//! Minimal loopback HTTP servers for download tests.

use std::net::SocketAddr;
use std::sync::Once;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Serve `body` with `200 OK` to every request until the runtime shuts down.
///
/// Returns the URL of `path` on the server.
pub async fn serve_body(path: &str, body: &'static str) -> String {
    serve(path, move |mut stream| async move {
        read_request_head(&mut stream).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/javascript\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    })
    .await
}

/// Serve `404 Not Found` to every request.
pub async fn serve_not_found(path: &str) -> String {
    serve(path, |mut stream| async move {
        read_request_head(&mut stream).await;
        let _ = stream
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await;
        let _ = stream.shutdown().await;
    })
    .await
}

/// Accept connections and read the request, but never answer.
pub async fn serve_nothing(path: &str) -> String {
    serve(path, |mut stream| async move {
        read_request_head(&mut stream).await;
        // Hold the connection open.
        let _stream = stream;
        std::future::pending::<()>().await
    })
    .await
}

async fn serve<H, Fut>(path: &str, handler: H) -> String
where
    H: Fn(TcpStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    bypass_proxies_for_loopback();

    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind loopback listener");
    let addr: SocketAddr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handler(stream));
        }
    });

    format!("http://{addr}{path}")
}

static NO_PROXY: Once = Once::new();

/// Keep a proxy configured in the environment from intercepting requests to
/// the loopback servers.
fn bypass_proxies_for_loopback() {
    NO_PROXY.call_once(|| {
        for var in ["NO_PROXY", "no_proxy"] {
            let current = std::env::var(var).unwrap_or_default();
            let value = if current.is_empty() {
                "127.0.0.1,localhost".to_string()
            } else {
                format!("{current},127.0.0.1,localhost")
            };
            // SAFETY: runs once, before the first request of the test binary.
            unsafe { std::env::set_var(var, value) };
        }
    });
}

/// Consume bytes up to the blank line ending the request head.
async fn read_request_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
}
