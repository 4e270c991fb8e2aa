//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use anyhow::Context;
use http_body_util::BodyExt;
use spendlens_core::test_utils::{MockCompletionServer, MockReply};
use spendlens_core::MockBehavior;
use tower::ServiceExt;

const BOUNDARY: &str = "spendlens-test-boundary";

const STATEMENT_CSV: &str = "Account Type,Account Number,Transaction Date,Cheque Number,Description 1,Description 2,CAD$,USD$\n\
\"Debit\",\"123\",\"2024-01-15\",\"\",\"UBER TRIP\",\"\", -15.50, 0\n\
\"Visa\",\"456\",\"2024-01-20\",\"\",\"PAYMENT THANK YOU\",\"\", 100.00, 0\n\
\"Visa\",\"456\",\"2024-02-02\",\"\",\"NETFLIX.COM\",\"\", -16.99, -12.49\n";

const BREAKDOWN_CSV: &str = "amount,category\n-40.00,Dining\n-15.25,Transport\n-4.75,Dining\n";

fn setup_test_app() -> Router {
    create_router_with_ai(ServerConfig::default(), AIClient::mock())
}

fn setup_insight_app(ai: AIClient) -> Router {
    let config = ServerConfig {
        mode: AnalyzeMode::Insight,
        ..Default::default()
    };
    create_router_with_ai(config, ai)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a multipart/form-data body with one text part per (name, content)
fn multipart_body(parts: &[(&str, &str)]) -> Body {
    let mut body = String::new();
    for (name, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}.csv\"\r\n",
            name, name
        ));
        body.push_str("Content-Type: text/csv\r\n\r\n");
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    Body::from(body)
}

fn upload_request(parts: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(parts))
        .unwrap()
}

// ========== Service Descriptor Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_index_describes_service() {
    let app = setup_test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "spendlens");
    assert_eq!(json["mode"], "summary");
    assert!(json["version"].is_string());
    let endpoints = json["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /analyze"));
}

#[tokio::test]
async fn test_index_reports_insight_mode() {
    let app = setup_insight_app(AIClient::mock());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["mode"], "insight");
}

// ========== Summary Mode Tests ==========

#[tokio::test]
async fn test_analyze_statement() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[("file", STATEMENT_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    let overall = &json["overall"];
    assert_eq!(overall["total_cad_spending"], 32.49);
    assert_eq!(overall["total_usd_spending"], 12.49);
    assert_eq!(overall["total_payments"], 100.0);
    assert_eq!(overall["spending_transaction_count"], 2);
    assert_eq!(overall["payment_transaction_count"], 1);
    assert_eq!(overall["date_range"], "2024-01-15 to 2024-02-02");
    assert_eq!(overall["category_breakdown"]["Transportation"], 15.5);
    assert_eq!(overall["category_breakdown"]["Subscriptions & Tech"], 16.99);

    let january = &json["by_month"]["2024-01"];
    assert_eq!(january["total_cad_spending"], 15.5);
    assert_eq!(january["category_breakdown"]["Transportation"], 15.5);
    assert_eq!(january["payment_transaction_count"], 1);
    assert!(json["by_month"]["2024-02"].is_object());
}

#[tokio::test]
async fn test_analyze_ignores_extra_fields() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[
            ("note", "hello"),
            ("file", STATEMENT_CSV),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_header_only() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[(
            "file",
            "Account Type,Account Number,Transaction Date,Cheque Number,Description 1,Description 2,CAD$,USD$\n",
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["overall"]["spending_transaction_count"], 0);
    assert_eq!(json["overall"]["category_breakdown"], serde_json::json!({}));
    assert_eq!(json["by_month"], serde_json::json!({}));
}

#[tokio::test]
async fn test_analyze_undated_rows_is_processing_error() {
    let app = setup_test_app();

    let csv = "h1,h2,h3,h4,h5,h6,h7,h8\nVisa,1,not-a-date,,UBER,,-5.00,0\n";
    let response = app
        .oneshot(upload_request(&[("file", csv)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    // The cause is logged, not returned
    assert_eq!(json, serde_json::json!({ "detail": "Error processing file" }));
}

#[tokio::test]
async fn test_analyze_empty_file_is_processing_error() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[("file", "")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Error processing file");
}

#[tokio::test]
async fn test_analyze_missing_file_field() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request(&[("statement", STATEMENT_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Missing file field");
}

#[tokio::test]
async fn test_analyze_requires_multipart() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_analyze_rejects_get() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/analyze")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ========== Insight Mode Tests ==========

#[tokio::test]
async fn test_insight_returns_summary() {
    let app = setup_insight_app(AIClient::mock_with(MockBehavior::Reply(
        "Dining is your largest category.".into(),
    )));

    let response = app
        .oneshot(upload_request(&[("file", BREAKDOWN_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({ "summary": "Dining is your largest category." })
    );
}

#[tokio::test]
async fn test_insight_rate_limited() {
    let app = setup_insight_app(AIClient::mock_with(MockBehavior::RateLimited));

    let response = app
        .oneshot(upload_request(&[("file", BREAKDOWN_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Rate limit exceeded or quota exhausted.");
}

#[tokio::test]
async fn test_insight_provider_error() {
    let app = setup_insight_app(AIClient::mock_with(MockBehavior::Fail(
        "model 'llama3.2' not found".into(),
    )));

    let response = app
        .oneshot(upload_request(&[("file", BREAKDOWN_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Error from model: model 'llama3.2' not found");
}

#[tokio::test]
async fn test_insight_missing_columns() {
    let app = setup_insight_app(AIClient::mock());

    let response = app
        .oneshot(upload_request(&[("file", "value,label\n1,a\n")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["detail"], "Error processing file");
}

#[tokio::test]
async fn test_insight_against_completion_server() {
    let server = MockCompletionServer::start(MockReply::Text("Cut back on dining.".into())).await;
    let app = setup_insight_app(AIClient::openai_compatible(&server.url(), "llama3.2"));

    let response = app
        .oneshot(upload_request(&[("file", BREAKDOWN_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["summary"], "Cut back on dining.");

    let prompts = server.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Total: $-60.00"));
    assert!(prompts[0].contains("- Dining: $-44.75"));
    assert!(prompts[0].contains("- Transport: $-15.25"));
}

#[tokio::test]
async fn test_insight_completion_server_rate_limited() {
    let server = MockCompletionServer::start(MockReply::RateLimited).await;
    let app = setup_insight_app(AIClient::openai_compatible(&server.url(), "llama3.2"));

    let response = app
        .oneshot(upload_request(&[("file", BREAKDOWN_CSV)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ========== Error Mapping Tests ==========

async fn error_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    (status, get_body_json(response).await)
}

#[tokio::test]
async fn test_error_without_context_is_generic() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into();
    let (status, json) = error_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "detail": "An internal error occurred" }));
}

#[tokio::test]
async fn test_error_context_becomes_detail() {
    let err: AppError = anyhow::anyhow!("No parseable transaction dates")
        .context("Error processing file")
        .into();
    let (status, json) = error_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Error processing file");
}

#[tokio::test]
async fn test_core_error_through_question_mark() {
    fn load() -> Result<(), AppError> {
        spendlens_core::load_transactions("".as_bytes()).context("Error processing file")?;
        Ok(())
    }

    let (status, json) = error_response(load().unwrap_err()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Error processing file");
}

// ========== Configuration Tests ==========

#[test]
fn test_analyze_mode_parsing() {
    assert_eq!("summary".parse::<AnalyzeMode>(), Ok(AnalyzeMode::Summary));
    assert_eq!("Insight".parse::<AnalyzeMode>(), Ok(AnalyzeMode::Insight));
    assert!("fancy".parse::<AnalyzeMode>().is_err());
    assert_eq!(AnalyzeMode::default(), AnalyzeMode::Summary);
    assert_eq!(AnalyzeMode::Insight.to_string(), "insight");
}

#[test]
fn test_parse_allowed_origins() {
    assert_eq!(
        parse_allowed_origins("http://localhost:3000, https://app.example.com,,"),
        vec!["http://localhost:3000", "https://app.example.com"]
    );
    assert!(parse_allowed_origins("").is_empty());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let config = ServerConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        ..Default::default()
    };
    let app = create_router_with_ai(config, AIClient::mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
