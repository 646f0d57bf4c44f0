#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use bridge_printer::{PrintJob, PrintResult, PrinterBackend, PrinterDescriptor, PrinterDirectory};
use parking_lot::Mutex;
use print_bridge::bootstrap::ListenerState;
use print_bridge::{Config, ServerState, build_app};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TOKEN: &str = "s3cret";

/// Backend that records every job instead of spooling it
pub struct MockBackend {
    pub supported: bool,
    pub accept: bool,
    pub printers: Vec<PrinterDescriptor>,
    pub jobs: Mutex<Vec<PrintJob>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            supported: true,
            accept: true,
            printers: vec![
                PrinterDescriptor {
                    name: "Receipt Printer".into(),
                    is_default: true,
                },
                PrinterDescriptor {
                    name: "Kitchen".into(),
                    is_default: false,
                },
            ],
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::new()
        }
    }

    pub fn without_default() -> Self {
        let mut backend = Self::new();
        for p in &mut backend.printers {
            p.is_default = false;
        }
        backend
    }

    pub fn jobs(&self) -> Vec<PrintJob> {
        self.jobs.lock().clone()
    }
}

impl PrinterDirectory for MockBackend {
    fn list_printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
        Ok(self.printers.clone())
    }

    fn default_printer_name(&self) -> PrintResult<Option<String>> {
        Ok(self
            .printers
            .iter()
            .find(|p| p.is_default)
            .map(|p| p.name.clone()))
    }
}

impl PrinterBackend for MockBackend {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn send_raw_job(&self, job: &PrintJob) -> bool {
        self.jobs.lock().push(job.clone());
        self.accept
    }
}

pub struct TestApp {
    pub app: axum::Router,
    pub config: Config,
    pub _dir: TempDir,
}

pub fn config_with_token(dir: &TempDir, token: Option<&str>) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        token: token.map(String::from),
        ..Config::default()
    }
}

pub fn listeners() -> ListenerState {
    ListenerState {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        https_port: Some(49001),
        http_port: None,
        certificate_path: None,
    }
}

pub fn app_with(config: Config, backend: Arc<dyn PrinterBackend>, dir: TempDir) -> TestApp {
    let state = ServerState::new(config.clone(), listeners(), backend);
    TestApp {
        app: build_app(state),
        config,
        _dir: dir,
    }
}

pub fn app(backend: Arc<dyn PrinterBackend>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_token(&dir, Some(TOKEN));
    app_with(config, backend, dir)
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Send a request to the app and collect status, headers and body text
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    for &(name, value) in headers {
        builder = builder.header(name, value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Authorized POST with a JSON body
pub async fn post(app: &axum::Router, uri: &str, json: &str) -> Reply {
    send(app, Method::POST, uri, &[("X-Bridge-Token", TOKEN)], Some(json)).await
}

/// Authorized GET
pub async fn get(app: &axum::Router, uri: &str) -> Reply {
    send(app, Method::GET, uri, &[("X-Bridge-Token", TOKEN)], None).await
}
