#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use overseace::{
    AppState, Config,
    config::{AuditConfig, FormsConfig, ObservabilityConfig, RateLimitConfig, ServerConfig},
};
use overseace_notification::{EmailConfig, MailError, Mailer, OutgoingEmail};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const RECIPIENT: &str = "sales@overseace.test";

/// Keeps every email it is handed; optionally reports a transport failure.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);

        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }

        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub mailer: RecordingMailer,
    pub audit_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn audit_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.audit_path)
            .map(|content| content.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    pub async fn post_form(&self, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/process-form")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub fn test_config(audit_path: &std::path::Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        forms: FormsConfig {
            recipient: RECIPIENT.to_string(),
            company_name: "OVERSEACE HITECH".to_string(),
            timezone: "Africa/Dar_es_Salaam".to_string(),
        },
        email: EmailConfig::default(),
        audit: AuditConfig {
            enabled: true,
            path: audit_path.to_string_lossy().into_owned(),
        },
        rate_limit: RateLimitConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub fn create_test_app(mailer: RecordingMailer) -> TestApp {
    create_test_app_with(mailer, |_| {})
}

pub fn create_test_app_with(
    mailer: RecordingMailer,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let audit_path = dir.child("form_submissions.log");

    let mut config = test_config(&audit_path);
    configure(&mut config);

    let state = AppState::new(config, Arc::new(mailer.clone()));

    TestApp {
        router: overseace::create_app(state),
        mailer,
        audit_path,
        _dir: dir,
    }
}
