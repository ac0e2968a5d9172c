//! A local stand-in for the fund-administration service. It authenticates
//! requests the way the real service does and echoes what it received.

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;
use subtle::ConstantTimeEq;

pub const API_KEY: &str = "stub-api-key";
pub const API_SECRET: &str = "stub-api-secret";
pub const PASSPHRASE: &str = "stub-passphrase";
pub const API_PREFIX: &str = "/api/v1";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn error_envelope(message: &str) -> HttpResponse {
    // The service answers 200 even on failure; the title carries the outcome.
    HttpResponse::Ok().json(json!({"title": "Error", "errorObject": message}))
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn handle(req: HttpRequest, path: web::Path<String>, body: web::Bytes) -> HttpResponse {
    let endpoint = path.into_inner();

    if endpoint == "gateway" {
        return HttpResponse::BadGateway()
            .content_type("text/html")
            .body("<html>502</html>");
    }

    let (Some(signature), Some(api_key), Some(time_zone), Some(timestamp)) = (
        header(&req, "signature"),
        header(&req, "x-api-key"),
        header(&req, "timezone"),
        header(&req, "timestamp"),
    ) else {
        return error_envelope("Missing authentication headers");
    };

    if api_key.as_bytes().ct_eq(API_KEY.as_bytes()).unwrap_u8() != 1 {
        return error_envelope("Unknown API key");
    }

    let Ok(timestamp_ms) = timestamp.parse::<i64>() else {
        return error_envelope("Invalid timestamp");
    };

    match formidium::verify_signature(&signature, API_KEY, API_SECRET, PASSPHRASE, timestamp_ms) {
        Ok(true) => {}
        _ => return error_envelope("Invalid signature"),
    }

    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return error_envelope("Body is not JSON");
    };

    HttpResponse::Ok().json(json!({
        "title": "Success",
        "responseBody": {
            "endpoint": endpoint,
            "request": request,
            "timeZone": time_zone,
            "timeStamp": timestamp_ms,
            "signature": signature,
            "pageCount": 1
        }
    }))
}

/// Starts the stub on an ephemeral port and returns its address.
pub fn spawn_stub_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let server = HttpServer::new(|| {
                App::new().route(
                    &format!("{}/{{endpoint}}", API_PREFIX),
                    web::post().to(handle),
                )
            })
            .workers(1)
            .bind(("127.0.0.1", 0))?;

            tx.send(server.addrs()[0])
                .expect("test thread waits for the stub address");
            server.run().await
        })
    });

    rx.recv().expect("stub server failed to start")
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}{}", addr, API_PREFIX)
}
