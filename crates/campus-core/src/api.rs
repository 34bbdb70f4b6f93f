//! The REST boundary of the portal.
//!
//! Workflows only ever talk to the backend through [`PortalApi`], so tests can
//! substitute an in-memory implementation and the HTTP client stays the only
//! place that knows about paths, headers and timeouts.

use crate::chat::{ChatReply, ChatRequest};
use crate::error::Result;
use crate::notification::Notification;
use crate::request::{NewServiceRequest, RequestPage, RequestQuery, ServiceRequest};
use crate::review::{QueueKind, ReviewDecision, ReviewItem};
use crate::scholarship::{
    ApplicationStatus, ApplicationSummary, DeleteReceipt, DocumentBlob, ScholarshipForm,
    SubmitReceipt, UploadFile, UploadReceipt, VerificationReport,
};
use crate::session::{Credentials, TokenResponse};
use async_trait::async_trait;

/// Supplies the bearer token attached to authenticated calls.
pub trait TokenSource: Send + Sync {
    /// The current access token, or `None` when signed out.
    fn access_token(&self) -> Option<String>;
}

/// Typed access to every backend endpoint the client uses.
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse>;

    /// `POST /auth/refresh`
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse>;

    /// `GET /requests`
    async fn list_requests(&self, query: &RequestQuery) -> Result<RequestPage>;

    /// `POST /requests`
    async fn submit_request(&self, request: &NewServiceRequest) -> Result<ServiceRequest>;

    /// Submits the scholarship form and allocates the request id.
    async fn submit_scholarship(&self, form: &ScholarshipForm) -> Result<SubmitReceipt>;

    async fn my_applications(&self) -> Result<Vec<ApplicationSummary>>;

    /// Current status and document list of one application.
    async fn application_status(&self, request_id: &str) -> Result<ApplicationStatus>;

    async fn delete_application(&self, request_id: &str) -> Result<DeleteReceipt>;

    /// Uploads one document as multipart (`file`, `document_type`).
    async fn upload_document(
        &self,
        request_id: &str,
        document_type: &str,
        file: UploadFile,
    ) -> Result<UploadReceipt>;

    /// Fetches the stored binary of a document.
    async fn fetch_document(&self, document_id: &str) -> Result<DocumentBlob>;

    async fn verification_details(&self, request_id: &str) -> Result<VerificationReport>;

    /// Lists the admin queue of the given kind, normalised to [`ReviewItem`]s.
    async fn list_review_queue(&self, kind: QueueKind) -> Result<Vec<ReviewItem>>;

    /// Posts an admin decision on one item of the given queue.
    async fn submit_review(
        &self,
        kind: QueueKind,
        id: &str,
        decision: &ReviewDecision,
    ) -> Result<()>;

    async fn list_notifications(&self) -> Result<Vec<Notification>>;

    async fn mark_notification_read(&self, id: &str) -> Result<()>;

    async fn mark_all_notifications_read(&self) -> Result<()>;

    /// `POST /rag/chat`
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}
