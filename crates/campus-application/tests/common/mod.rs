#![allow(dead_code)]

use async_trait::async_trait;
use campus_core::api::PortalApi;
use campus_core::chat::{ChatReply, ChatRequest};
use campus_core::notification::Notification;
use campus_core::request::{
    NewServiceRequest, Priority, RequestPage, RequestQuery, RequestStatus, ServiceRequest,
};
use campus_core::review::{QueueKind, ReviewDecision, ReviewItem};
use campus_core::scholarship::{
    ApplicationStatus, ApplicationSummary, DeleteReceipt, Document, DocumentBlob, ScholarshipForm,
    SubmitReceipt, UploadFile, UploadReceipt, VerificationReport, VerificationStatus,
};
use campus_core::session::{AuthUser, Credentials, TokenResponse, UserRole};
use campus_core::{PortalError, Result};
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory backend that records every call.
#[derive(Default)]
pub struct MockPortalApi {
    pub calls: Mutex<Vec<String>>,
    /// When set, every call fails with this error.
    pub fail_with: Mutex<Option<PortalError>>,
    /// Review ids whose decision fails.
    pub failing_ids: Mutex<HashSet<String>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub queue: Mutex<Vec<ReviewItem>>,
    pub documents: Mutex<Vec<Document>>,
    pub requests: Mutex<Vec<ServiceRequest>>,
    pub decisions: Mutex<Vec<(String, ReviewDecision)>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    /// Calls that never complete, like a backend that stopped answering.
    pub hanging: Mutex<HashSet<String>>,
}

impl MockPortalApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: PortalError) -> Self {
        let api = Self::default();
        *api.fail_with.lock().unwrap() = Some(err);
        api
    }

    pub fn set_failure(&self, err: Option<PortalError>) {
        *self.fail_with.lock().unwrap() = err;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn set_hanging(&self, name: &str, hang: bool) {
        let mut hanging = self.hanging.lock().unwrap();
        if hang {
            hanging.insert(name.to_string());
        } else {
            hanging.remove(name);
        }
    }

    async fn stall(&self, name: &str) {
        let hang = self.hanging.lock().unwrap().contains(name);
        if hang {
            std::future::pending::<()>().await;
        }
    }

    fn status(&self, request_id: &str) -> ApplicationStatus {
        ApplicationStatus {
            request_id: request_id.to_string(),
            application_number: "SCH-20240601-A1B2".to_string(),
            status: RequestStatus::Pending,
            submitted_date: Some("2024-06-01T10:00:00".to_string()),
            documents: self.documents.lock().unwrap().clone(),
        }
    }
}

pub fn student() -> AuthUser {
    AuthUser {
        id: "11".to_string(),
        username: "asha".to_string(),
        email: "asha@campus.edu".to_string(),
        full_name: Some("Asha Rao".to_string()),
        role: UserRole::Student,
        status: Some("active".to_string()),
    }
}

pub fn admin() -> AuthUser {
    AuthUser {
        id: "1".to_string(),
        username: "registrar".to_string(),
        email: "registrar@campus.edu".to_string(),
        full_name: None,
        role: UserRole::Admin,
        status: Some("active".to_string()),
    }
}

pub fn notification(id: &str, is_read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        title: format!("Notification {id}"),
        message: "Your request was updated".to_string(),
        notification_type: Some("status_update".to_string()),
        is_read,
        request_id: None,
        sent_at: None,
        action_url: None,
    }
}

pub fn queue_item(id: &str, status: RequestStatus) -> ReviewItem {
    ReviewItem {
        id: id.to_string(),
        reference: format!("REF-{id}"),
        title: format!("Item {id}"),
        status,
        submitted_date: None,
        documents_count: None,
        raw: serde_json::Value::Null,
    }
}

pub fn valid_form() -> ScholarshipForm {
    ScholarshipForm {
        full_name: "A B".to_string(),
        email: "a@b.com".to_string(),
        phone: "9876543210".to_string(),
        course: "CS".to_string(),
        year_of_study: "2".to_string(),
        reason: "need".to_string(),
    }
}

pub fn pdf(name: &str) -> UploadFile {
    UploadFile::new(name, "application/pdf", b"%PDF-1.4".to_vec())
}

#[async_trait]
impl PortalApi for MockPortalApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.record("login")?;
        let user = if credentials.username == "registrar" {
            admin()
        } else {
            student()
        };
        Ok(TokenResponse {
            access_token: format!("access-{}", credentials.username),
            refresh_token: format!("refresh-{}", credentials.username),
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.record("refresh")?;
        Ok(TokenResponse {
            access_token: format!("{refresh_token}-renewed"),
            refresh_token: format!("{refresh_token}-next"),
            token_type: "bearer".to_string(),
            user: student(),
        })
    }

    async fn list_requests(&self, query: &RequestQuery) -> Result<RequestPage> {
        self.record("list_requests")?;
        self.stall("list_requests").await;
        let requests = self.requests.lock().unwrap().clone();
        Ok(RequestPage {
            total: requests.len() as u64,
            page: query.page,
            page_size: query.page_size,
            requests,
        })
    }

    async fn submit_request(&self, request: &NewServiceRequest) -> Result<ServiceRequest> {
        self.record("submit_request")?;
        let mut requests = self.requests.lock().unwrap();
        let created = ServiceRequest {
            id: (requests.len() + 1).to_string(),
            request_number: Some(format!("REQ-{}", requests.len() + 1)),
            title: request.title.clone(),
            request_type: request.request_type.clone(),
            status: RequestStatus::Pending,
            priority: Priority::Medium,
            description: request.description.clone(),
            created_at: None,
            updated_at: None,
        };
        requests.push(created.clone());
        Ok(created)
    }

    async fn submit_scholarship(&self, _form: &ScholarshipForm) -> Result<SubmitReceipt> {
        self.record("submit_scholarship")?;
        self.stall("submit_scholarship").await;
        Ok(SubmitReceipt {
            request_id: "42".to_string(),
            application_number: "SCH-20240601-A1B2".to_string(),
            message: Some("Application submitted successfully".to_string()),
        })
    }

    async fn my_applications(&self) -> Result<Vec<ApplicationSummary>> {
        self.record("my_applications")?;
        Ok(Vec::new())
    }

    async fn application_status(&self, request_id: &str) -> Result<ApplicationStatus> {
        self.record("application_status")?;
        self.stall("application_status").await;
        Ok(self.status(request_id))
    }

    async fn delete_application(&self, _request_id: &str) -> Result<DeleteReceipt> {
        self.record("delete_application")?;
        Ok(DeleteReceipt {
            message: None,
            deleted_documents: self.documents.lock().unwrap().len() as u32,
        })
    }

    async fn upload_document(
        &self,
        _request_id: &str,
        document_type: &str,
        file: UploadFile,
    ) -> Result<UploadReceipt> {
        self.record("upload_document")?;
        self.stall("upload_document").await;
        let mut documents = self.documents.lock().unwrap();
        let id = format!("doc-{}", documents.len() + 1);
        documents.push(Document {
            id: id.clone(),
            doc_type: document_type.to_string(),
            filename: file.file_name,
            verification_status: VerificationStatus::PendingReview,
            score: None,
            ocr_text: None,
            uploaded_at: None,
        });
        Ok(UploadReceipt {
            document_id: id,
            verification_status: VerificationStatus::PendingReview,
            message: None,
        })
    }

    async fn fetch_document(&self, document_id: &str) -> Result<DocumentBlob> {
        self.record("fetch_document")?;
        Ok(DocumentBlob {
            filename: Some(format!("{document_id}.pdf")),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.4 body".to_vec(),
        })
    }

    async fn verification_details(&self, request_id: &str) -> Result<VerificationReport> {
        self.record("verification_details")?;
        Ok(VerificationReport {
            request_id: request_id.to_string(),
            application_number: Some("SCH-20240601-A1B2".to_string()),
            overall_score: Some(87.5),
            status: RequestStatus::InProgress,
            documents: self.documents.lock().unwrap().clone(),
            verification_results: serde_json::Value::Null,
        })
    }

    async fn list_review_queue(&self, _kind: QueueKind) -> Result<Vec<ReviewItem>> {
        self.record("list_review_queue")?;
        self.stall("list_review_queue").await;
        Ok(self.queue.lock().unwrap().clone())
    }

    async fn submit_review(
        &self,
        _kind: QueueKind,
        id: &str,
        decision: &ReviewDecision,
    ) -> Result<()> {
        self.record("submit_review")?;
        if self.failing_ids.lock().unwrap().contains(id) {
            return Err(PortalError::api(500, format!("Failed to review {id}")));
        }
        self.decisions
            .lock()
            .unwrap()
            .push((id.to_string(), decision.clone()));
        let status = match decision.action {
            campus_core::review::ReviewAction::Approved => RequestStatus::Approved,
            campus_core::review::ReviewAction::Rejected => RequestStatus::Rejected,
            campus_core::review::ReviewAction::PendingApproval => RequestStatus::NeedsAction,
        };
        for item in self.queue.lock().unwrap().iter_mut() {
            if item.id == id {
                item.status = status;
            }
        }
        Ok(())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.record("list_notifications")?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.record("mark_notification_read")?;
        for n in self.notifications.lock().unwrap().iter_mut() {
            if n.id == id {
                n.is_read = true;
            }
        }
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.record("mark_all_notifications_read")?;
        for n in self.notifications.lock().unwrap().iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.record("send_chat")?;
        self.stall("send_chat").await;
        self.chat_requests.lock().unwrap().push(request.clone());
        Ok(ChatReply {
            response: format!("You asked: {}", request.message),
            chat_id: Some(request.chat_id.clone().unwrap_or_else(|| "chat-1".to_string())),
            sources: Vec::new(),
            language: Some(request.language.clone()),
        })
    }
}
