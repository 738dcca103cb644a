use super::*;
use crate::acquisition::{AcquisitionTarget, CaptureCommand, CaptureError, CaptureHandler};
use crate::geometry::GeodeticPoint;
use crate::http_handler::http_client::HTTPClient;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answers exactly one HTTP request with `status` and `body`, yields the raw request
/// including its body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if n == 0 {
                break;
            }
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else { continue };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len: usize =
                head.lines().find_map(|l| l.strip_prefix("content-length:")).map_or(0, |v| v.trim().parse().unwrap());
            if buf.len() >= end + 4 + len {
                break;
            }
        }
        let resp = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(resp.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).to_string()
    });
    (url, handle)
}

fn command(target: AcquisitionTarget) -> CaptureCommand {
    let execute_at = Utc.with_ymd_and_hms(2025, 3, 14, 12, 16, 40).unwrap();
    CaptureCommand::new(42, 2, target, execute_at)
}

fn controller(url: &str) -> CameraController { CameraController::new(Arc::new(HTTPClient::new(url).unwrap())) }

#[tokio::test]
async fn test_location_capture() {
    let (url, server) = serve_once("200 OK", r#"{"accepted":true,"image_id":"img-0042"}"#).await;
    let camera = controller(&url);
    let target = AcquisitionTarget::Location { point: GeodeticPoint::new(48.1, 11.5, 520.0), deadline: None };

    let receipt = camera.capture(command(target)).await.unwrap();
    assert_eq!(receipt.image_id(), Some("img-0042"));
    assert_eq!(camera.images_taken(), 1);

    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /acquisition "), "{request}");
    assert!(request.contains(r#""kind":"location""#), "{request}");
    assert!(request.contains(r#""latitude":48.1"#), "{request}");
    assert!(request.contains(r#""instance_id":42"#), "{request}");
    assert!(request.contains(r#""attempt":2"#), "{request}");
    assert!(request.contains("2025-03-14T12:16:40Z"), "{request}");
}

#[tokio::test]
async fn test_refused_capture() {
    let (url, server) = serve_once("200 OK", r#"{"accepted":false,"reason":"sun in view"}"#).await;
    let camera = controller(&url);
    let result = camera.capture(command(AcquisitionTarget::CurrentPosition)).await;
    assert_eq!(result, Err(CaptureError::Rejected));
    assert_eq!(camera.images_taken(), 0);
    assert!(server.await.unwrap().contains(r#""kind":"now""#));
}

#[tokio::test]
async fn test_http_failures() {
    let (url, _server) = serve_once("422 Unprocessable Entity", r#"{"detail":[]}"#).await;
    let result = controller(&url).capture(command(AcquisitionTarget::CurrentPosition)).await;
    assert_eq!(result, Err(CaptureError::Rejected));

    let (url, _server) = serve_once("503 Service Unavailable", "{}").await;
    let result = controller(&url).capture(command(AcquisitionTarget::CurrentPosition)).await;
    assert_eq!(result, Err(CaptureError::HardwareFault));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let result = controller(&url).capture(command(AcquisitionTarget::CurrentPosition)).await;
    assert_eq!(result, Err(CaptureError::Unreachable));
}
