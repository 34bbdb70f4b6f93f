//! Scholarship application domain model.

use crate::ids::string_or_number;
use crate::request::RequestStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Document slots offered by the scholarship wizard.
pub const DOCUMENT_SLOTS: &[&str] = &[
    "ID Proof",
    "Income Certificate",
    "Academic Transcript",
    "Bank Passbook",
];

/// Fields of the application form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    Email,
    Phone,
    Course,
    YearOfStudy,
    Reason,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::FullName,
        FormField::Email,
        FormField::Phone,
        FormField::Course,
        FormField::YearOfStudy,
        FormField::Reason,
    ];

    /// Wire name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::FullName => "full_name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Course => "course",
            FormField::YearOfStudy => "year_of_study",
            FormField::Reason => "reason",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FullName => "Full name",
            FormField::Email => "Email",
            FormField::Phone => "Phone number",
            FormField::Course => "Course",
            FormField::YearOfStudy => "Year of study",
            FormField::Reason => "Reason for application",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Body of `POST /scholarship-verification/submit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub year_of_study: String,
    #[serde(default)]
    pub reason: String,
}

impl ScholarshipForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Course => &self.course,
            FormField::YearOfStudy => &self.year_of_study,
            FormField::Reason => &self.reason,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::FullName => self.full_name = value,
            FormField::Email => self.email = value,
            FormField::Phone => self.phone = value,
            FormField::Course => self.course = value,
            FormField::YearOfStudy => self.year_of_study = value,
            FormField::Reason => self.reason = value,
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        let mut form = Self::default();
        for field in FormField::ALL {
            form.set(field, self.get(field).trim());
        }
        form
    }
}

/// Response of the submit endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    pub application_number: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Verification state of an uploaded document. Driven by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    PendingReview,
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn from_backend(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "verified" | "approved" => VerificationStatus::Verified,
            "pending_review" | "manual_review" => VerificationStatus::PendingReview,
            "failed" | "rejected" => VerificationStatus::Failed,
            _ => VerificationStatus::Pending,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, VerificationStatus::Verified | VerificationStatus::Failed)
    }
}

impl<'de> Deserialize<'de> for VerificationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(VerificationStatus::from_backend(&raw))
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::PendingReview => "pending_review",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// An uploaded document as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub filename: String,
    #[serde(rename = "status")]
    pub verification_status: VerificationStatus,
    pub score: Option<f64>,
    pub ocr_text: Option<String>,
    pub uploaded_at: Option<String>,
}

/// The backend reports documents in two shapes (status list and
/// verification details); both land here.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(rename = "type", alias = "document_type", default)]
    doc_type: String,
    #[serde(alias = "original_filename", default)]
    filename: String,
    #[serde(default, alias = "verification_status")]
    status: Option<VerificationStatus>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default, alias = "overall_confidence", alias = "ocr_confidence")]
    score: Option<f64>,
    #[serde(default)]
    ocr_text: Option<String>,
    #[serde(default)]
    uploaded_at: Option<String>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let verification_status = match (raw.status, raw.is_verified) {
            (Some(status), _) => status,
            (None, Some(true)) => VerificationStatus::Verified,
            (None, _) => VerificationStatus::Pending,
        };
        Self {
            id: raw.id,
            doc_type: raw.doc_type,
            filename: raw.filename,
            verification_status,
            score: raw.score,
            ocr_text: raw.ocr_text,
            uploaded_at: raw.uploaded_at,
        }
    }
}

/// One row of `GET .../my-applications`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    pub application_number: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApplicationSummary {
    /// Recovers the submitted form from the stored request data.
    pub fn form(&self) -> ScholarshipForm {
        self.data
            .as_ref()
            .and_then(|data| serde_json::from_value(data.clone()).ok())
            .unwrap_or_default()
    }
}

/// Response of `GET .../status/{request_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationStatus {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    pub application_number: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Response of the delete endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted_documents: u32,
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Response of `POST .../upload/{request_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub document_id: String,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Binary content of a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBlob {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Response of `GET .../verification-details/{request_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerificationReport {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    #[serde(default)]
    pub application_number: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    pub status: RequestStatus,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub verification_results: serde_json::Value,
}

/// Reference to an application whose id may not be known yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationRef {
    pub request_id: Option<String>,
    pub application_number: Option<String>,
}

impl ApplicationRef {
    pub fn is_allocated(&self) -> bool {
        self.request_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
