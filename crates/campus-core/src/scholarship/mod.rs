//! Scholarship application domain module.
//!
//! # Module Structure
//!
//! - `model`: Form, application, document and verification DTOs
//! - `validation`: Local form checks run before submission

mod model;
pub mod validation;

pub use model::{
    ApplicationRef, ApplicationStatus, ApplicationSummary, DOCUMENT_SLOTS, DeleteReceipt,
    Document, DocumentBlob, FormField, ScholarshipForm, SubmitReceipt, UploadFile, UploadReceipt,
    VerificationReport, VerificationStatus,
};
pub use validation::{validate_field, validate_form};
