use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use base64::Engine;
use hairstyle_studio::{
    gemini::{GeminiClient, GeminiError, GeminiResponse, ImageBackend},
    models::GenerationRequest,
    orchestrator::Orchestrator,
    routes::{router, AppState},
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const KEY: &str = "test-key";

fn app(server: &MockServer, key: Option<&str>) -> Router {
    let client = GeminiClient::new(key.map(String::from), server.uri());
    let api_key_configured = client.has_api_key();
    let backend: Arc<dyn ImageBackend> = Arc::new(client);
    let orchestrator = Orchestrator::new(backend, vec!["fast".into(), "slow".into()], Duration::from_secs(5));
    router(AppState { orchestrator: Arc::new(orchestrator), api_key_configured })
}

/// Real client that records which models it was asked for.
struct Recording {
    inner: GeminiClient,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageBackend for Recording {
    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> Result<GeminiResponse, GeminiError> {
        self.calls.lock().push(model.to_string());
        self.inner.generate_content(model, request).await
    }
}

fn options() -> Value {
    json!({
        "gender": "Female",
        "styleId": "f-wolf",
        "color": "#7caec7",
        "refinements": {"bangs": "Curtain", "volume": "Natural", "rootLift": "Voluminous", "quality": "Normal"}
    })
}

fn image_response(data: &str, text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [
                {"text": text},
                {"inlineData": {"mimeType": "image/png", "data": data}}
            ]},
            "finishReason": "STOP"
        }]
    })
}

fn quota_response() -> ResponseTemplate {
    ResponseTemplate::new(429).set_body_json(json!({
        "error": {"code": 429, "message": "You exceeded your current quota", "status": "RESOURCE_EXHAUSTED"}
    }))
}

async fn mount(server: &MockServer, model: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/models/{model}:generateContent")))
        .and(query_param("key", KEY))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn quota_on_first_model_falls_back_to_second() {
    let server = MockServer::start().await;
    mount(&server, "fast", quota_response(), 1).await;
    mount(&server, "slow", ResponseTemplate::new(200).set_body_json(image_response("RESULT", "狼尾很适合你的脸型")), 1).await;

    let (status, body) = post_json(
        app(&server, Some(KEY)),
        "/api/generate",
        json!({"image": "data:image/webp;base64,UklGRg==", "options": options()}),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imageUrl"], "data:image/png;base64,RESULT");
    assert_eq!(body["textAnalysis"], "狼尾很适合你的脸型");
    assert!(body["id"].is_string());

    let sent = sent_bodies(&server).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    let parts = &sent[1]["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"], json!({"data": "UklGRg==", "mimeType": "image/webp"}));
    let instruction = parts[1]["text"].as_str().unwrap();
    for expected in ["Female", "Wolf Cut", "#7caec7", "Curtain", "Natural", "Voluminous", "Normal"] {
        assert!(instruction.contains(expected), "instruction lacks {expected}");
    }
    assert_eq!(sent[1]["generationConfig"]["temperature"], json!(0.4));
}

#[tokio::test]
async fn safety_block_is_not_retried() {
    let server = MockServer::start().await;
    mount(&server, "fast", ResponseTemplate::new(200).set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})), 1).await;
    mount(&server, "slow", ResponseTemplate::new(200).set_body_json(image_response("RESULT", "ok")), 0).await;

    let (status, body) = post_json(app(&server, Some(KEY)), "/api/generate", json!({"image": "/9j/AAAA", "options": options()})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "safety");
}

#[tokio::test]
async fn all_models_out_of_quota() {
    let server = MockServer::start().await;
    mount(&server, "fast", quota_response(), 1).await;
    mount(&server, "slow", quota_response(), 1).await;

    let (status, body) = post_json(app(&server, Some(KEY)), "/api/generate", json!({"image": "/9j/AAAA", "options": options()})).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "quota");
    assert!(body["detail"].as_str().unwrap().contains("RESOURCE_EXHAUSTED"));
}

#[tokio::test]
async fn text_only_answers_end_in_no_image_error() {
    let server = MockServer::start().await;
    let text_only = json!({"candidates": [{"content": {"parts": [{"text": "I can't edit this"}]}, "finishReason": "STOP"}]});
    mount(&server, "fast", ResponseTemplate::new(200).set_body_json(text_only.clone()), 1).await;
    mount(&server, "slow", ResponseTemplate::new(200).set_body_json(text_only), 1).await;

    let (status, body) = post_json(app(&server, Some(KEY)), "/api/generate", json!({"image": "/9j/AAAA", "options": options()})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "no_image");
    assert_eq!(body["detail"], "model slow returned no image");
}

#[tokio::test]
async fn missing_key_is_rejected_before_any_call() {
    let server = MockServer::start().await;

    let (status, body) = post_json(app(&server, None), "/api/generate", json!({"image": "/9j/AAAA", "options": options()})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    assert!(sent_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn multipart_upload_is_encoded_before_generation() {
    let server = MockServer::start().await;
    mount(&server, "fast", ResponseTemplate::new(200).set_body_json(image_response("UPLOADED", "ok")), 1).await;

    let boundary = "stylist-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"options\"\r\n\r\n{options}\r\n\
         --{boundary}--\r\n",
        options = options()
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();

    let (status, response) = send(app(&server, Some(KEY)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["imageUrl"], "data:image/png;base64,UPLOADED");
    let sent = sent_bodies(&server).await;
    let expected = base64::engine::general_purpose::STANDARD.encode(b"PNGDATA");
    assert_eq!(sent[0]["contents"][0]["parts"][0]["inlineData"], json!({"data": expected, "mimeType": "image/png"}));
}

#[tokio::test]
async fn upload_without_photo_is_bad_request() {
    let server = MockServer::start().await;
    let boundary = "b";
    let body = format!("--{boundary}\r\nContent-Disposition: form-data; name=\"options\"\r\n\r\n{}\r\n--{boundary}--\r\n", options());
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();

    let (status, response) = send(app(&server, Some(KEY)), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "missing 'photo' field");
}

#[tokio::test]
async fn catalog_endpoints() {
    let server = MockServer::start().await;

    let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let (status, styles) = send(app(&server, None), get("/api/styles?gender=Male&category=perm&length=Long")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(styles, json!([{
        "id": "m-long-wavy",
        "label": "艺术中长卷 (Long Wavy)",
        "prompt": "Shoulder length wavy hair for men, artistic, flowy, musician vibe, grunge",
        "gender": "Male",
        "category": "perm",
        "length": "Long",
        "texture": "Wavy",
        "previewUrl": "https://images.unsplash.com/photo-1618641986552-c8d746ec16b8?q=80&w=600&auto=format&fit=crop&face"
    }]));

    let (status, style) = send(app(&server, None), get("/api/styles/f-hime")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(style["length"], "Long");
    assert!(style.get("category").is_none());

    let (status, _) = send(app(&server, None), get("/api/styles/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, colors) = send(app(&server, None), get("/api/colors")).await;
    assert_eq!(colors.as_array().map(Vec::len), Some(24));

    let (_, defaults) = send(app(&server, None), get("/api/options/default")).await;
    assert_eq!(defaults["styleId"], "f-pixie");
    assert_eq!(defaults["refinements"]["rootLift"], "Natural");
}

#[tokio::test]
async fn unreachable_upstream_is_fatal_and_keeps_the_key_private() {
    let secret = "SECRETKEY429xyz";
    let backend = Arc::new(Recording {
        inner: GeminiClient::new(Some(secret.into()), "http://127.0.0.1:9"),
        calls: Mutex::new(Vec::new()),
    });
    let dyn_backend: Arc<dyn ImageBackend> = backend.clone();
    let orchestrator = Orchestrator::new(dyn_backend, vec!["fast".into(), "slow".into()], Duration::from_secs(5));
    let app = router(AppState { orchestrator: Arc::new(orchestrator), api_key_configured: true });

    let (status, body) = post_json(app, "/api/generate", json!({"image": "/9j/AAAA", "options": options()})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "unknown");
    assert!(!body.to_string().contains(secret), "key leaked: {body}");
    assert_eq!(*backend.calls.lock(), vec!["fast"]);
}

#[tokio::test]
async fn header_without_payload_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = post_json(
        app(&server, Some(KEY)),
        "/api/generate",
        json!({"image": "data:image/png;base64,", "options": options()}),
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "image is empty");
    assert!(sent_bodies(&server).await.is_empty());
}
