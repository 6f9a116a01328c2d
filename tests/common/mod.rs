//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pdf_unlock::unlock::{DecryptionError, Decryptor};
use pdf_unlock::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

pub const CORRECT_PASSWORD: &str = "correct horse";
pub const LOCKED_PDF: &[u8] = b"%PDF-1.7\n% locked sample\n%%EOF\n";
pub const UNLOCKED_PDF: &[u8] = b"%PDF-1.7\n% unlocked sample\n%%EOF\n";

/// Stand-in engine: accepts exactly one password and counts calls.
#[derive(Debug, Default)]
pub struct FakeDecryptor {
    pub calls: AtomicUsize,
}

impl FakeDecryptor {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Decryptor for FakeDecryptor {
    fn decrypt(&self, bytes: &[u8], password: &str) -> Result<Vec<u8>, DecryptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !bytes.starts_with(b"%PDF-") {
            return Err(DecryptionError::new("invalid document structure"));
        }
        if password == CORRECT_PASSWORD {
            Ok(UNLOCKED_PDF.to_vec())
        } else {
            Err(DecryptionError::new("incorrect password"))
        }
    }
}

/// A running server on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub decryptor: Arc<FakeDecryptor>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServiceConfig::default()).await
    }

    pub async fn start_with(config: ServiceConfig) -> Self {
        let decryptor = Arc::new(FakeDecryptor::default());
        let server = HttpServer::with_decryptor(config, decryptor.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            addr,
            decryptor,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Build the `/unlock` form.
#[allow(dead_code)]
pub fn unlock_form(file: &[u8], password: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(file.to_vec())
        .file_name("document.pdf")
        .mime_str("application/pdf")
        .unwrap();
    reqwest::multipart::Form::new()
        .part("file", part)
        .text("password", password.to_string())
}
