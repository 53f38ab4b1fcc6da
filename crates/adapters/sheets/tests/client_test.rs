//! 表格脚本客户端集成测试（本地起一个假的脚本服务）

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, TimeZone, Utc};
use qc_adapter_sheets::{SheetsClient, SheetsConfigBuilder, check_sheets_health};
use qc_config::SubmissionMode;
use qc_errors::AppError;
use qc_ports::{InspectionSubmission, ReferenceDataPort, StandardsSnapshot, SubmissionPort};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct FakeScript {
    received: Arc<Mutex<Vec<Value>>>,
    post_reply: Arc<Mutex<Option<(StatusCode, String)>>>,
}

async fn handle_get(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let body = match params.get("action").map(String::as_str) {
        Some("getMatrix") => json!({
            "success": true,
            "matrix": {
                "Candy Apple 50g": {
                    "itemCode": "CA01",
                    "shelfLifeDays": 365,
                    "box": {"pCode": "CA-BOX", "content": "24", "color": "Red"},
                    "sachet": {"seal": "0%", "pCode": "CA-SCH"}
                }
            }
        }),
        Some("getPersonnel") => json!({
            "success": true,
            "personnel": {"qcPersonnel": ["Rina"], "supervisor": ["Budi"]}
        }),
        Some("getLines") => json!({
            "success": true,
            "lines": [{"name": "Line 1", "capacity": 1200}, {"name": "Line 2"}]
        }),
        Some("getRecentForms") => {
            let limit: usize = params
                .get("limit")
                .and_then(|l| l.parse().ok())
                .unwrap_or(0);
            let forms: Vec<Value> = (0..limit.min(3))
                .map(|i| json!({"formNumber": format!("QC-0000000{}", i)}))
                .collect();
            json!({"success": true, "forms": forms})
        }
        _ => json!({"success": false, "message": "unknown action"}),
    };
    Json(body)
}

async fn handle_post(State(state): State<FakeScript>, Json(body): Json<Value>) -> impl IntoResponse {
    state.received.lock().await.push(body);
    match state.post_reply.lock().await.clone() {
        Some((status, text)) => (status, text),
        None => (
            StatusCode::OK,
            json!({"success": true, "message": "saved"}).to_string(),
        ),
    }
}

async fn spawn_script(state: FakeScript) -> String {
    let app = Router::new()
        .route("/exec", get(handle_get).post(handle_post))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/exec", addr)
}

fn client(endpoint: &str, mode: SubmissionMode) -> SheetsClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let config = SheetsConfigBuilder::new(endpoint)
        .with_timeout(5)
        .with_submission_mode(mode)
        .build();
    SheetsClient::with_http_client(config, http).unwrap()
}

fn sample_submission() -> InspectionSubmission {
    let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    InspectionSubmission {
        form_number: "QC-12345678".to_string(),
        check_date: day,
        prod_date: day,
        exp_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        shift: "1".to_string(),
        product_item: "Candy Apple 50g".to_string(),
        line: "Line 1".to_string(),
        group: "A".to_string(),
        qc_personnel: "Rina".to_string(),
        shift_supervisor: String::new(),
        supervisor: String::new(),
        section_manager: String::new(),
        item_code: "CA01".to_string(),
        standards: StandardsSnapshot::default(),
        pallet_checks: Vec::new(),
        submitted_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_reference_reads() {
    let endpoint = spawn_script(FakeScript::default()).await;
    let client = client(&endpoint, SubmissionMode::Acknowledged);

    let matrix = client.fetch_standard_matrix().await.unwrap();
    let candy = matrix.get("Candy Apple 50g").unwrap();
    assert_eq!(candy.shelf_life_days, 365);
    assert_eq!(candy.box_standard.print_code, "CA-BOX");

    let personnel = client.fetch_personnel().await.unwrap();
    assert_eq!(personnel.qc_personnel, vec!["Rina".to_string()]);
    assert!(personnel.section_manager.is_empty());

    let lines = client.fetch_lines().await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].capacity, Some(1200));
}

#[tokio::test]
async fn test_recent_forms_limit_is_clamped() {
    let endpoint = spawn_script(FakeScript::default()).await;
    let client = client(&endpoint, SubmissionMode::Acknowledged);

    let forms = client.fetch_recent_forms(0).await.unwrap();
    assert_eq!(forms.len(), 1);

    let forms = client.fetch_recent_forms(50).await.unwrap();
    assert_eq!(forms.len(), 3);
    assert_eq!(forms[2].form_number, "QC-00000002");
}

#[tokio::test]
async fn test_acknowledged_submit() {
    let script = FakeScript::default();
    let endpoint = spawn_script(script.clone()).await;
    let client = client(&endpoint, SubmissionMode::Acknowledged);

    let receipt = client.submit(&sample_submission()).await.unwrap();
    assert!(receipt.acknowledged);
    assert_eq!(receipt.message.as_deref(), Some("saved"));

    let received = script.received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["formNumber"], "QC-12345678");
    assert_eq!(received[0]["expDate"], "2026-01-01");
}

#[tokio::test]
async fn test_acknowledged_submit_rejected() {
    let script = FakeScript::default();
    *script.post_reply.lock().await = Some((
        StatusCode::OK,
        json!({"success": false, "error": "sheet full"}).to_string(),
    ));
    let endpoint = spawn_script(script).await;
    let client = client(&endpoint, SubmissionMode::Acknowledged);

    let err = client.submit(&sample_submission()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(ref m) if m.contains("sheet full")));
}

#[tokio::test]
async fn test_acknowledged_submit_unparseable_body() {
    let script = FakeScript::default();
    *script.post_reply.lock().await = Some((StatusCode::OK, "<html>ok</html>".to_string()));
    let endpoint = spawn_script(script).await;
    let client = client(&endpoint, SubmissionMode::Acknowledged);

    let err = client.submit(&sample_submission()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(ref m) if m.contains("unparseable")));
}

#[tokio::test]
async fn test_fire_and_forget_accepts_any_response() {
    let script = FakeScript::default();
    *script.post_reply.lock().await = Some((StatusCode::OK, "<html>ok</html>".to_string()));
    let endpoint = spawn_script(script).await;
    let client = client(&endpoint, SubmissionMode::FireAndForget);

    let receipt = client.submit(&sample_submission()).await.unwrap();
    assert!(!receipt.acknowledged);
}

#[tokio::test]
async fn test_connection_failure_is_external_service_error() {
    // 绑定后立即释放端口，保证没有服务在监听
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{}/exec", addr), SubmissionMode::FireAndForget);
    let err = client.fetch_lines().await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));

    let err = client.submit(&sample_submission()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));

    let health = check_sheets_health(&client).await;
    assert!(!health.healthy);
}
