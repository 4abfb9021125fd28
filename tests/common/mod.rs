//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use archive_stream::{HttpServer, ProcessTracker, ServiceConfig, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A running service bound to an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub processes: ProcessTracker,
    shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Archive root with `photos123/{a,b}.jpg` (10 and 20 bytes) and `docs/readme.txt`.
pub fn photo_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let photos = root.path().join("photos123");
    std::fs::create_dir(&photos).unwrap();
    std::fs::write(photos.join("a.jpg"), [0xAAu8; 10]).unwrap();
    std::fs::write(photos.join("b.jpg"), [0xBBu8; 20]).unwrap();

    let docs = root.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("readme.txt"), b"hello").unwrap();
    root
}

/// Default config pointed at `root`.
pub fn config_for(root: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.archive.root_dir = root.to_path_buf();
    config.archive.exit_grace_ms = 2_000;
    config
}

/// Use `sh -c script` as the archiver; the identifier arrives as `$0`.
pub fn with_shell_archiver(config: &mut ServiceConfig, script: &str) {
    config.archive.program = "sh".into();
    config.archive.args = vec!["-c".into(), script.into()];
}

pub async fn start_service(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let processes = server.processes();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService {
        addr,
        processes,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Wait until every archiver has been released, failing after `limit`.
pub async fn wait_until_idle(processes: &ProcessTracker, limit: Duration) {
    tokio::time::timeout(limit, async {
        while processes.active() > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("archiver process still running");
}
