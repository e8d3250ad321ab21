//! HTTP tests for the embedding client against a local stub endpoint.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use lexharvest::embedding::{EmbedError, Embedder, HttpEmbedder, EMBEDDING_DIMENSIONS};

struct EmbeddingStub {
    endpoint: String,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl EmbeddingStub {
    /// Serve an OpenAI-style /embeddings endpoint returning `dims`-length
    /// zero vectors, one per input. With `required_token` set, requests
    /// without the matching bearer header get a 401.
    fn spawn(required_token: Option<&str>, dims: usize) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
        let addr = server.server_addr();
        let endpoint = format!("http://{addr}/embeddings");
        let required_token = required_token.map(str::to_string);

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            if let Some(token) = &required_token {
                let expected = format!("Bearer {token}");
                let authorized = request
                    .headers()
                    .iter()
                    .any(|h| h.field.equiv("Authorization") && h.value.as_str() == expected);
                if !authorized {
                    let _ = request.respond(
                        tiny_http::Response::from_string("unauthorized").with_status_code(401),
                    );
                    continue;
                }
            }

            let mut body = String::new();
            use std::io::Read as _;
            if request.as_reader().read_to_string(&mut body).is_err() {
                let _ = request.respond(
                    tiny_http::Response::from_string("bad request").with_status_code(400),
                );
                continue;
            }
            let parsed: serde_json::Value = match serde_json::from_str(&body) {
                Ok(v) => v,
                Err(_) => {
                    let _ = request.respond(
                        tiny_http::Response::from_string("invalid json").with_status_code(400),
                    );
                    continue;
                }
            };
            let count = parsed["input"].as_array().map(|a| a.len()).unwrap_or(0);

            let data: Vec<serde_json::Value> = (0..count)
                .map(|_| serde_json::json!({ "embedding": vec![0.0f32; dims] }))
                .collect();
            let response_body = serde_json::json!({ "data": data }).to_string();
            let json_header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"application/json"[..],
            )
            .expect("static header");
            let _ = request.respond(
                tiny_http::Response::from_string(response_body).with_header(json_header),
            );
        });

        Self {
            endpoint,
            shutdown_tx,
            handle: Some(handle),
        }
    }
}

impl Drop for EmbeddingStub {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn embedder(stub: &EmbeddingStub, api_key: Option<&str>) -> HttpEmbedder {
    HttpEmbedder::new(
        stub.endpoint.clone(),
        "all-MiniLM-L6-v2".to_string(),
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .expect("embedder")
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let stub = EmbeddingStub::spawn(Some("jeton-secret"), EMBEDDING_DIMENSIONS);

    // the stub 401s any request without the exact bearer header
    let vectors = embedder(&stub, Some("jeton-secret"))
        .embed(&["capital social de la SARL", "code du travail"])
        .await
        .expect("authorized embed");
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0].len(), EMBEDDING_DIMENSIONS);
}

#[tokio::test]
async fn missing_token_surfaces_the_api_error() {
    let stub = EmbeddingStub::spawn(Some("jeton-secret"), EMBEDDING_DIMENSIONS);

    let err = embedder(&stub, None)
        .embed(&["texte juridique"])
        .await
        .expect_err("unauthorized embed must fail");
    match err {
        EmbedError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wrong_dimensions_are_rejected() {
    let stub = EmbeddingStub::spawn(None, 3);

    let err = embedder(&stub, None)
        .embed(&["texte juridique"])
        .await
        .expect_err("3-dim vectors must be rejected");
    match err {
        EmbedError::Dimensions { expected, got } => {
            assert_eq!(expected, EMBEDDING_DIMENSIONS);
            assert_eq!(got, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
