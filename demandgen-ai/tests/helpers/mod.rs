//! Shared fixtures for demandgen-ai integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use demandgen_ai::model::{Attachment, GenerativeModel, ModelError};
use demandgen_ai::pipeline::ExhibitPipeline;
use demandgen_ai::utils::RetryPolicy;
use demandgen_ai::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BOUNDARY: &str = "demandgen-test-boundary";

/// Document content that makes the fake model fail permanently
pub const BROKEN_DOCUMENT: &str = "%PDF broken";

/// Model double keyed on attachment content
///
/// Extraction calls look up the document bytes; the analysis call (no
/// attachment) returns `analysis` or a server error when it is `None`.
pub struct ScriptedModel {
    extractions: HashMap<String, String>,
    analysis: Option<String>,
    pub extraction_calls: AtomicUsize,
    pub analysis_prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(analysis: Option<&str>) -> Self {
        Self {
            extractions: HashMap::new(),
            analysis: analysis.map(str::to_string),
            extraction_calls: AtomicUsize::new(0),
            analysis_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_extraction(mut self, document: &str, response: &str) -> Self {
        self.extractions
            .insert(document.to_string(), response.to_string());
        self
    }

    pub fn extraction_calls(&self) -> usize {
        self.extraction_calls.load(Ordering::SeqCst)
    }

    pub fn last_analysis_prompt(&self) -> Option<String> {
        self.analysis_prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ModelError> {
        match attachment {
            Some(attachment) => {
                self.extraction_calls.fetch_add(1, Ordering::SeqCst);
                let document = String::from_utf8_lossy(&attachment.data).to_string();
                if document == BROKEN_DOCUMENT {
                    return Err(ModelError::Api(400, "unreadable document".to_string()));
                }
                self.extractions
                    .get(&document)
                    .cloned()
                    .ok_or_else(|| ModelError::Api(404, format!("no script for {}", document)))
            }
            None => {
                self.analysis_prompts
                    .lock()
                    .unwrap()
                    .push(prompt.to_string());
                self.analysis
                    .clone()
                    .ok_or_else(|| ModelError::Api(503, "overloaded".to_string()))
            }
        }
    }
}

/// Extraction response for one exhibit
pub fn extraction(heading: &str, summary: &str, expenses: f64, client_name: Option<&str>) -> String {
    serde_json::json!({
        "heading": heading,
        "summary": summary,
        "expenses": expenses,
        "clientInfo": {
            "clientName": client_name,
            "policyNumber": null,
            "claimNumber": null,
            "dateOfLoss": null
        }
    })
    .to_string()
}

/// Analysis response that leaves the aggregated identity alone
pub fn analysis_response() -> String {
    serde_json::json!({
        "clientInfo": {
            "clientName": null,
            "policyNumber": null,
            "claimNumber": null,
            "dateOfLoss": null
        },
        "claimDescription": "Rear-end collision on Main Street.",
        "facts": "The insured failed to stop at a red light.",
        "liability": "The insured breached the duty of care.",
        "injuries": ["Cervical strain"],
        "damages": {
            "specialDamages": {"total": 0, "items": []},
            "futureMedicalExpenses": {"total": 0, "items": []},
            "generalDamages": {"total": 25000, "items": []}
        }
    })
    .to_string()
}

pub fn app_with(model: Arc<ScriptedModel>) -> axum::Router {
    let pipeline = ExhibitPipeline::new(model, RetryPolicy::immediate(3));
    build_router(AppState::new(Some(pipeline), 10 * 1024 * 1024))
}

pub fn app_without_model() -> axum::Router {
    build_router(AppState::new(None, 10 * 1024 * 1024))
}

/// Multipart body builder
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn file(mut self, file_name: &str, content: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"pdfs\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n{}\r\n",
                BOUNDARY, file_name, content
            )
            .as_bytes(),
        );
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub async fn send(app: axum::Router, request: Request<Body>) -> (u16, Value) {
    let response: Response<Body> = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
