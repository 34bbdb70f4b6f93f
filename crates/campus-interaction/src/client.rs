//! HttpPortalClient - REST implementation of [`PortalApi`].
//!
//! Every call carries the configured timeout and, when a session exists, an
//! `Authorization: Bearer` header taken from the injected [`TokenSource`].

use crate::error::{map_http_error, map_transport_error};
use async_trait::async_trait;
use campus_core::api::{PortalApi, TokenSource};
use campus_core::chat::{ChatReply, ChatRequest};
use campus_core::config::PortalConfig;
use campus_core::notification::Notification;
use campus_core::request::{NewServiceRequest, RequestPage, RequestQuery, ServiceRequest};
use campus_core::review::{QueueKind, ReviewDecision, ReviewItem, WorkflowAction};
use campus_core::scholarship::{
    ApplicationStatus, ApplicationSummary, DeleteReceipt, DocumentBlob, ScholarshipForm,
    SubmitReceipt, UploadFile, UploadReceipt, VerificationReport,
};
use campus_core::session::{Credentials, TokenResponse};
use campus_core::{PortalError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

const SCHOLARSHIP: &str = "scholarship-verification";
const ADMIN_PAGE_SIZE: u32 = 100;

#[derive(Deserialize)]
struct ApplicationsEnvelope<T> {
    #[serde(default = "Vec::new")]
    applications: Vec<T>,
}

/// REST client for the portal backend.
#[derive(Clone)]
pub struct HttpPortalClient {
    client: Client,
    config: PortalConfig,
    tokens: Arc<dyn TokenSource>,
}

impl HttpPortalClient {
    pub fn new(config: PortalConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PortalError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn timeout_secs(&self) -> u64 {
        self.config.request_timeout().as_secs()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("[Http] {} /{}", method, path.trim_start_matches('/'));
        let builder = self
            .client
            .request(method, self.config.endpoint(path))
            .timeout(self.config.request_timeout());

        match self.tokens.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| map_transport_error(&e, self.timeout_secs()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = map_http_error(status.as_u16(), &body);
        tracing::warn!("[Http] {} returned {}: {}", url, status, err.user_message());
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(&e, self.timeout_secs()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }
}

/// Pulls the row list out of a queue response.
fn rows_of(mut body: Value, key: Option<&str>) -> Result<Vec<Value>> {
    let rows = match key {
        Some(key) => body.get_mut(key).map(Value::take).unwrap_or(Value::Null),
        None => body,
    };
    match rows {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(PortalError::Serialization {
            format: "JSON".to_string(),
            message: format!("expected a list of queue rows, got {other}"),
        }),
    }
}

/// File name announced by a `Content-Disposition` header.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    for part in value.split(';').map(str::trim) {
        if let Some(encoded) = part.strip_prefix("filename*=") {
            let encoded = encoded.trim_matches('"');
            let name = encoded.splitn(3, '\'').nth(2).unwrap_or(encoded);
            return Some(percent_decode(name)).filter(|n| !n.is_empty());
        }
        if let Some(name) = part.strip_prefix("filename=") {
            plain = Some(name.trim_matches('"').to_string());
        }
    }
    plain.filter(|n| !n.is_empty())
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[async_trait]
impl PortalApi for HttpPortalClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.send_json(self.request(Method::POST, "auth/login").json(credentials))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let body = json!({ "refresh_token": refresh_token });
        self.send_json(self.request(Method::POST, "auth/refresh").json(&body))
            .await
    }

    async fn list_requests(&self, query: &RequestQuery) -> Result<RequestPage> {
        self.send_json(self.request(Method::GET, "requests").query(query))
            .await
    }

    async fn submit_request(&self, request: &NewServiceRequest) -> Result<ServiceRequest> {
        self.send_json(self.request(Method::POST, "requests").json(request))
            .await
    }

    async fn submit_scholarship(&self, form: &ScholarshipForm) -> Result<SubmitReceipt> {
        let path = format!("{SCHOLARSHIP}/submit");
        self.send_json(self.request(Method::POST, &path).json(form))
            .await
    }

    async fn my_applications(&self) -> Result<Vec<ApplicationSummary>> {
        let path = format!("{SCHOLARSHIP}/my-applications");
        let envelope: ApplicationsEnvelope<ApplicationSummary> =
            self.send_json(self.request(Method::GET, &path)).await?;
        Ok(envelope.applications)
    }

    async fn application_status(&self, request_id: &str) -> Result<ApplicationStatus> {
        let path = format!("{SCHOLARSHIP}/status/{request_id}");
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn delete_application(&self, request_id: &str) -> Result<DeleteReceipt> {
        let path = format!("{SCHOLARSHIP}/delete/{request_id}");
        self.send_json(self.request(Method::DELETE, &path)).await
    }

    async fn upload_document(
        &self,
        request_id: &str,
        document_type: &str,
        file: UploadFile,
    ) -> Result<UploadReceipt> {
        let content_type = file.content_type.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|_| {
                PortalError::validation("file", format!("Unsupported content type '{content_type}'"))
            })?;
        let form = Form::new()
            .part("file", part)
            .text("document_type", document_type.to_string());

        let path = format!("{SCHOLARSHIP}/upload/{request_id}");
        self.send_json(self.request(Method::POST, &path).multipart(form))
            .await
    }

    async fn fetch_document(&self, document_id: &str) -> Result<DocumentBlob> {
        let path = format!("{SCHOLARSHIP}/document/{document_id}");
        let response = self.send(self.request(Method::GET, &path)).await?;

        let headers = response.headers();
        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(&e, self.timeout_secs()))?;

        Ok(DocumentBlob {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn verification_details(&self, request_id: &str) -> Result<VerificationReport> {
        let path = format!("{SCHOLARSHIP}/verification-details/{request_id}");
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn list_review_queue(&self, kind: QueueKind) -> Result<Vec<ReviewItem>> {
        let (builder, key) = match kind {
            QueueKind::Requests => {
                let query = RequestQuery {
                    page_size: ADMIN_PAGE_SIZE,
                    ..RequestQuery::default()
                };
                (self.request(Method::GET, "requests").query(&query), Some("requests"))
            }
            QueueKind::Scholarships => (
                self.request(Method::GET, &format!("{SCHOLARSHIP}/admin/pending")),
                Some("applications"),
            ),
            QueueKind::MemoCards => (self.request(Method::GET, "memo-cards/admin/all"), None),
            QueueKind::BusPasses => (self.request(Method::GET, "bus-passes/admin/all"), None),
        };

        let body: Value = self.send_json(builder).await?;
        rows_of(body, key)?
            .into_iter()
            .map(|row| ReviewItem::from_row(kind, row))
            .collect()
    }

    async fn submit_review(
        &self,
        kind: QueueKind,
        id: &str,
        decision: &ReviewDecision,
    ) -> Result<()> {
        if !kind.supports(decision.action) {
            return Err(PortalError::validation(
                "action",
                format!("{kind} can only be approved or rejected"),
            ));
        }

        let status = decision.action.as_str();
        let comments = decision.comments.clone().unwrap_or_default();

        let builder = match kind {
            QueueKind::Requests => self
                .request(Method::POST, &format!("requests/{id}/workflow"))
                .json(&WorkflowAction::from(decision)),
            QueueKind::Scholarships => {
                let mut form = vec![("status", status.to_string())];
                if !comments.is_empty() {
                    form.push(("notes", comments));
                }
                self.request(Method::POST, &format!("{SCHOLARSHIP}/admin/review/{id}"))
                    .form(&form)
            }
            QueueKind::MemoCards | QueueKind::BusPasses => {
                let base = if kind == QueueKind::MemoCards {
                    "memo-cards"
                } else {
                    "bus-passes"
                };
                let mut form = vec![("status", status.to_string())];
                if !comments.is_empty() {
                    form.push(("admin_comments", comments));
                }
                self.request(Method::PUT, &format!("{base}/admin/{id}/review"))
                    .form(&form)
            }
        };

        self.send_empty(builder).await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.send_json(self.request(Method::GET, "notifications"))
            .await
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::PUT, &format!("notifications/{id}/read")))
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.send_empty(self.request(Method::PUT, "notifications/read-all"))
            .await
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.send_json(self.request(Method::POST, "rag/chat").json(request))
            .await
    }
}
