/// Integration tests for the HTTP endpoints.
///
/// Each test spins up the full application router on an ephemeral port and
/// talks to it over real HTTP:
/// ```bash
/// cargo test --test server_integration
/// ```
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use docchat::server::{self, AppState};
use docchat::{AppConfig, DocumentAnswerer, OllamaClientTrait, OllamaError};
use reqwest::blocking::multipart::{Form, Part};

/// Stub LLM client with a canned generation reply.
struct StubLlm {
    response: Option<String>,
}

impl OllamaClientTrait for StubLlm {
    fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        Ok(vec!["llama3".to_string()])
    }

    fn generate(&self, _model: &str, _prompt: &str) -> Result<Option<String>, OllamaError> {
        Ok(self.response.clone())
    }
}

/// Serves the full application router on an ephemeral port.
fn spawn_app(static_dir: &Path, response: Option<&str>) -> SocketAddr {
    let answerer = DocumentAnswerer::new(
        Arc::new(StubLlm {
            response: response.map(str::to_string),
        }),
        &AppConfig::default(),
    );
    let router = server::router(AppState::new(Arc::new(answerer)), static_dir);

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind test port");
    let addr = listener.local_addr().expect("Failed to read test port");
    listener
        .set_nonblocking(true)
        .expect("Failed to configure test listener");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to start test runtime");

        runtime.block_on(async move {
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("Failed to adopt test listener");
            axum::serve(listener, router)
                .await
                .expect("test server failed");
        });
    });

    addr
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

fn upload(addr: SocketAddr, filename: &str, bytes: Vec<u8>) -> reqwest::blocking::Response {
    let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));

    reqwest::blocking::Client::new()
        .post(url(addr, "/api/extract"))
        .multipart(form)
        .send()
        .expect("request should reach the server")
}

fn ask(addr: SocketAddr, body: serde_json::Value) -> reqwest::blocking::Response {
    reqwest::blocking::Client::new()
        .post(url(addr, "/api/ask"))
        .json(&body)
        .send()
        .expect("request should reach the server")
}

#[test]
fn extract_endpoint_returns_filename_and_text() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("unused"));

    let response = upload(addr, "notes.txt", b"hello world".to_vec());

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["filename"], "notes.txt");
    assert_eq!(body["text"], "hello world");
}

#[test]
fn extract_endpoint_rejects_empty_uploads() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("unused"));

    let response = upload(addr, "empty.txt", Vec::new());

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["detail"], "Uploaded file is empty.");
}

#[test]
fn extract_endpoint_requires_a_file_field() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("unused"));

    let form = Form::new().part(
        "attachment",
        Part::bytes(b"hello".to_vec()).file_name("notes.txt"),
    );
    let response = reqwest::blocking::Client::new()
        .post(url(addr, "/api/extract"))
        .multipart(form)
        .send()
        .expect("request should reach the server");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["detail"], "Uploaded file is empty.");
}

#[test]
fn extract_endpoint_degrades_bad_pdfs_to_empty_text() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("unused"));

    let response = upload(addr, "broken.pdf", b"not a pdf at all".to_vec());

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["filename"], "broken.pdf");
    assert_eq!(body["text"], "");
}

#[test]
fn ask_endpoint_answers_with_llm_response() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("42"));

    let response = ask(
        addr,
        serde_json::json!({
            "document_text": "The answer is 42.",
            "question": "What is the answer?"
        }),
    );

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["answer"], "42");
}

#[test]
fn ask_endpoint_requires_document_text() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("42"));

    let response = ask(
        addr,
        serde_json::json!({ "document_text": "   ", "question": "What is the answer?" }),
    );

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["detail"], "No document text provided.");
}

#[test]
fn ask_endpoint_requires_a_question() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), Some("42"));

    let response = ask(
        addr,
        serde_json::json!({ "document_text": "The answer is 42.", "question": "" }),
    );

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["detail"], "Question cannot be empty.");
}

#[test]
fn ask_endpoint_reports_missing_response_text() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let addr = spawn_app(dir.path(), None);

    let response = ask(
        addr,
        serde_json::json!({ "document_text": "doc", "question": "question" }),
    );

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().expect("body should be JSON");
    assert_eq!(body["answer"], "No response text found.");
}

#[test]
fn index_is_served_at_the_root() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("index.html"),
        "<html><body>DocChat test page</body></html>",
    )
    .expect("Failed to write test index");
    let addr = spawn_app(dir.path(), Some("unused"));

    let response = reqwest::blocking::get(url(addr, "/")).expect("request should reach the server");

    assert_eq!(response.status(), 200);
    let text = response.text().expect("body should be text");
    assert!(text.contains("DocChat"));
}

#[test]
fn static_assets_are_served() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("style.css"), "body { margin: 0; }")
        .expect("Failed to write test stylesheet");
    let addr = spawn_app(dir.path(), Some("unused"));

    let response = reqwest::blocking::get(url(addr, "/static/style.css"))
        .expect("request should reach the server");

    assert_eq!(response.status(), 200);
    let text = response.text().expect("body should be text");
    assert!(text.contains("margin"));
}
