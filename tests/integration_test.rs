//! 端到端测试：在本地端口启动一个假的分析后端（axum），
//! 通过真实的 `AnalyzeClient` + `SubmissionOrchestrator` 走完整流程。

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use resume_analyzer::config::LlmFlagEncoding;
use resume_analyzer::models::{ErrorKind, SubmissionState};
use resume_analyzer::{
    AnalyzeClient, Config, FeedbackReport, ResumeFile, SubmissionOrchestrator, SubmitOutcome,
    UploadSpec,
};

/// 后端收到的一个表单字段
#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    body: Vec<u8>,
}

#[derive(Default)]
struct Recorder {
    hits: AtomicUsize,
    fields: Mutex<Vec<ReceivedField>>,
    content_type: Mutex<Option<String>>,
}

impl Recorder {
    fn field(&self, name: &str) -> Option<ReceivedField> {
        self.fields
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.name == name)
            .cloned()
    }

    fn text(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(|f| String::from_utf8(f.body).unwrap())
    }
}

async fn record(recorder: &Recorder, headers: &HeaderMap, mut multipart: Multipart) {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    *recorder.content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let body = field.bytes().await.unwrap().to_vec();
        recorder.fields.lock().unwrap().push(ReceivedField {
            name,
            file_name,
            body,
        });
    }
}

/// 启动假后端，返回基础URL
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 在 `path` 上返回固定响应的后端
async fn canned_backend(
    path: &str,
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let router = Router::new()
        .route(
            path,
            post(
                move |State(recorder): State<Arc<Recorder>>,
                      headers: HeaderMap,
                      multipart: Multipart| async move {
                    record(&recorder, &headers, multipart).await;
                    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
                },
            ),
        )
        .route("/health", get(|| async { Json(json!({"ok": true})) }))
        .with_state(recorder.clone());
    (spawn_backend(router).await, recorder)
}

fn config_for(base_url: &str) -> Config {
    let mut config = Config::multi_format();
    config.api_base_url = base_url.to_string();
    config.request_timeout_secs = 10;
    config
}

fn orchestrator(config: &Config) -> SubmissionOrchestrator {
    let client = AnalyzeClient::new(config).unwrap();
    SubmissionOrchestrator::new(config, Arc::new(client))
}

fn pdf_spec() -> UploadSpec {
    UploadSpec::new(ResumeFile::from_bytes(
        "jane-doe.pdf",
        Some("application/pdf".into()),
        b"%PDF-1.7 resume".to_vec(),
    ))
}

fn settled(outcome: SubmitOutcome) -> SubmissionState {
    match outcome {
        SubmitOutcome::Settled(state) => state,
        SubmitOutcome::Discarded => panic!("unexpected discard"),
    }
}

const NESTED_PAYLOAD: &str = r#"{
    "scores": {"final": 91, "ml": 88, "structure": 95},
    "sectionCoverage": {"skills": true, "projects": false},
    "extracted": {"skills": ["rust"], "yearsExperience": 4},
    "featureVector": {"num_projects": 2, "has_github": true},
    "llmFeedback": ["Add metrics"],
    "debug": {"modelUsed": "regression_pipeline"}
}"#;

#[tokio::test]
async fn test_submit_sends_multipart_and_normalizes() {
    let (base, recorder) = canned_backend("/api/analyze", StatusCode::OK, NESTED_PAYLOAD).await;
    let orch = orchestrator(&config_for(&base));

    let spec = pdf_spec().with_job_role("Backend Engineer");
    let state = settled(assert_ok!(orch.submit(spec).await));

    let result = state.result().expect("success state");
    assert_eq!(result.final_score, 91.0);
    assert_eq!(result.ml_score, 88.0);
    assert_eq!(result.structure_score, 95.0);
    assert_eq!(result.feedback, vec!["Add metrics".to_string()]);
    assert_eq!(result.missing_sections(), vec!["projects"]);
    assert_eq!(result.model_used.as_deref(), Some("regression_pipeline"));
    assert_eq!(result.feature_vector.len(), 2);

    assert_eq!(recorder.hits.load(Ordering::SeqCst), 1);
    let file = recorder.field("file").expect("file field");
    assert_eq!(file.file_name.as_deref(), Some("jane-doe.pdf"));
    assert_eq!(file.body, b"%PDF-1.7 resume".to_vec());
    assert_eq!(recorder.text("job_role").as_deref(), Some("Backend Engineer"));
    assert_eq!(recorder.text("use_llm").as_deref(), Some("true"));

    let content_type = recorder.content_type.lock().unwrap().clone().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_one_or_omit_flag_and_alternate_path() {
    let (base, recorder) = canned_backend(
        "/analyze",
        StatusCode::OK,
        r#"{"ml_score": 80, "structure_score": 60, "feedback": ["Use action verbs"]}"#,
    )
    .await;

    let mut config = config_for(&base);
    config.analyze_path = "/analyze".to_string();
    config.llm_flag.field_name = "generate_llm".to_string();
    config.llm_flag.encoding = LlmFlagEncoding::OneOrOmit;
    let orch = orchestrator(&config);

    let state = settled(orch.submit(pdf_spec().with_llm(false)).await.unwrap());
    let result = state.result().unwrap();
    assert_eq!(result.final_score, 74.0);
    assert_eq!(result.feedback, vec!["Use action verbs".to_string()]);

    assert!(recorder.field("generate_llm").is_none());
    assert!(recorder.field("job_role").is_none());

    let (base, recorder) = canned_backend("/analyze", StatusCode::OK, "{}").await;
    config.api_base_url = base;
    let orch = orchestrator(&config);
    orch.submit(pdf_spec().with_llm(true)).await.unwrap();
    assert_eq!(recorder.text("generate_llm").as_deref(), Some("1"));
    assert_eq!(orch.state().result().map(|r| r.final_score), Some(0.0));
}

#[tokio::test]
async fn test_server_error_message_is_surfaced_verbatim() {
    let (base, _) = canned_backend(
        "/api/analyze",
        StatusCode::PAYLOAD_TOO_LARGE,
        r#"{"error":"file too large"}"#,
    )
    .await;
    let orch = orchestrator(&config_for(&base));

    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    let info = state.error().expect("failed state");
    assert_eq!(info.message, "file too large");
    assert_eq!(info.kind, ErrorKind::Transport);
}

#[tokio::test]
async fn test_non_json_error_uses_status_line() {
    let (base, _) = canned_backend(
        "/api/analyze",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Traceback (most recent call last)",
    )
    .await;
    let orch = orchestrator(&config_for(&base));

    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    assert_eq!(
        state.error().map(|e| e.message.as_str()),
        Some("HTTP 500 Internal Server Error")
    );
}

#[tokio::test]
async fn test_unparsable_success_body_is_malformed() {
    let (base, _) = canned_backend("/api/analyze", StatusCode::OK, "<html>ok</html>").await;
    let orch = orchestrator(&config_for(&base));

    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    let info = state.error().expect("failed state");
    assert!(info.message.starts_with("malformed response"), "{}", info.message);
    assert_eq!(info.kind, ErrorKind::Transport);

    // 失败后可以再次提交，不会卡住
    assert!(orch.state().accepts_submit());
    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    assert!(state.error().is_some());
}

#[tokio::test]
async fn test_rejected_file_never_reaches_backend() {
    let (base, recorder) = canned_backend("/api/analyze", StatusCode::OK, NESTED_PAYLOAD).await;
    let orch = orchestrator(&config_for(&base));

    let spec = UploadSpec::new(ResumeFile::from_bytes("avatar.png", None, vec![0u8; 16]));
    let state = settled(orch.submit(spec).await.unwrap());
    assert_eq!(state.error().map(|e| e.kind), Some(ErrorKind::Validation));
    assert_eq!(recorder.hits.load(Ordering::SeqCst), 0);

    // 同一个编排器，合法文件可以继续提交
    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    assert!(state.result().is_some());
    assert_eq!(recorder.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_backend_fails_cleanly() {
    let orch = orchestrator(&config_for("http://127.0.0.1:9"));
    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    let info = state.error().expect("failed state");
    assert_eq!(info.kind, ErrorKind::Transport);
    assert!(info.message.contains("unreachable"));
}

#[tokio::test]
async fn test_health_probe() {
    let (base, _) = canned_backend("/api/analyze", StatusCode::OK, "{}").await;
    let client = AnalyzeClient::new(&config_for(&base)).unwrap();
    assert!(client.ping().await);

    let bare = spawn_backend(Router::new()).await;
    let client = AnalyzeClient::new(&config_for(&bare)).unwrap();
    assert!(!client.ping().await);
}

#[tokio::test]
async fn test_file_from_disk_and_export() {
    let (base, recorder) = canned_backend(
        "/api/analyze",
        StatusCode::OK,
        r#"{"score": 68, "feedback": {"ruleBased": ["Add a summary"], "llm": ["Quantify impact"]}}"#,
    )
    .await;
    let orch = orchestrator(&config_for(&base));

    let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    tmp.write_all(b"Jane Doe\nSoftware Engineer").unwrap();
    let resume = ResumeFile::from_path(tmp.path(), None).await.unwrap();

    let state = settled(orch.submit(UploadSpec::new(resume)).await.unwrap());
    let result = state.result().unwrap();
    assert_eq!(result.final_score, 68.0);
    assert_eq!(result.feedback, vec!["Quantify impact".to_string()]);
    assert_eq!(
        recorder.field("file").unwrap().body,
        b"Jane Doe\nSoftware Engineer".to_vec()
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.txt");
    FeedbackReport::from_result(result).write_to(&path).await.unwrap();
    let text = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(text.contains("RULE-BASED FEEDBACK:\n- Add a summary"));
    assert!(text.ends_with("AI-GENERATED FEEDBACK:\n- Quantify impact"));
}

#[tokio::test]
async fn test_submit_after_success_requires_reset() {
    let (base, _) = canned_backend("/api/analyze", StatusCode::OK, NESTED_PAYLOAD).await;
    let orch = orchestrator(&config_for(&base));

    orch.submit(pdf_spec()).await.unwrap();
    assert_err!(orch.submit(pdf_spec()).await);

    orch.reset();
    assert_eq!(orch.state(), SubmissionState::Idle);
    let state = settled(orch.submit(pdf_spec()).await.unwrap());
    assert!(state.result().is_some());
}
