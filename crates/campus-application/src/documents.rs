//! Document upload and verification tracking for one application.

use crate::busy::BusyFlag;
use campus_core::api::PortalApi;
use campus_core::scholarship::{ApplicationRef, Document, UploadFile};
use campus_core::{PortalError, Result};
use campus_infrastructure::files;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// What the button of a document slot does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Upload,
    Replace,
}

/// A fetched document written to a temporary file.
///
/// The file exists exactly as long as this value; dropping it deletes the file.
#[derive(Debug)]
pub struct ViewedDocument {
    file: NamedTempFile,
    filename: Option<String>,
    content_type: Option<String>,
}

impl ViewedDocument {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

pub struct DocumentTracker {
    api: Arc<dyn PortalApi>,
    application: ApplicationRef,
    documents: Vec<Document>,
    uploading: BusyFlag,
    error: Option<String>,
}

impl DocumentTracker {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self::with_documents(api, ApplicationRef::default(), Vec::new())
    }

    pub fn with_documents(
        api: Arc<dyn PortalApi>,
        application: ApplicationRef,
        documents: Vec<Document>,
    ) -> Self {
        Self {
            api,
            application,
            documents,
            uploading: BusyFlag::default(),
            error: None,
        }
    }

    pub fn application(&self) -> &ApplicationRef {
        &self.application
    }

    pub fn set_application(&mut self, application: ApplicationRef) {
        self.application = application;
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_for(&self, slot: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.doc_type == slot)
    }

    pub fn slot_action(&self, slot: &str) -> SlotAction {
        if self.document_for(slot).is_some() {
            SlotAction::Replace
        } else {
            SlotAction::Upload
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_set()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn request_id(&self) -> Result<String> {
        self.application
            .request_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(PortalError::MissingRequestId)
    }

    fn fail<T>(&mut self, err: PortalError) -> Result<T> {
        self.error = Some(err.user_message());
        Err(err)
    }

    /// Uploads `file` into `slot`.
    ///
    /// Without an allocated request id nothing is sent. An existing document of
    /// the same slot is replaced in place, otherwise the new one is appended.
    pub async fn upload(&mut self, slot: &str, file: UploadFile) -> Result<&Document> {
        let request_id = match self.request_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("[Documents] Upload of '{}' blocked: no request id", slot);
                return self.fail(e);
            }
        };
        let busy = self.uploading.enter()?;
        self.error = None;
        let filename = file.file_name.clone();
        let result = self.api.upload_document(&request_id, slot, file).await;
        drop(busy);

        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!("[Documents] Upload of '{}' failed: {}", slot, e);
                return self.fail(e);
            }
        };

        tracing::info!(
            "[Documents] Uploaded '{}' as {} ({})",
            slot,
            receipt.document_id,
            receipt.verification_status
        );

        let document = Document {
            id: receipt.document_id,
            doc_type: slot.to_string(),
            filename,
            verification_status: receipt.verification_status,
            score: None,
            ocr_text: None,
            uploaded_at: None,
        };

        let index = match self.documents.iter().position(|doc| doc.doc_type == slot) {
            Some(index) => {
                self.documents[index] = document;
                index
            }
            None => {
                self.documents.push(document);
                self.documents.len() - 1
            }
        };
        Ok(&self.documents[index])
    }

    /// Re-fetches the document list, picking up backend-driven status changes.
    pub async fn refresh(&mut self) -> Result<()> {
        let request_id = self.request_id()?;
        match self.api.application_status(&request_id).await {
            Ok(status) => {
                self.documents = status.documents;
                if self.application.application_number.is_none() {
                    self.application.application_number = Some(status.application_number);
                }
                self.error = None;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Saves a document into `dir` under its server file name.
    pub async fn download(&self, document_id: &str, dir: &Path) -> Result<PathBuf> {
        let blob = self.api.fetch_document(document_id).await?;
        files::save_download(dir, &blob, document_id).await
    }

    /// Fetches a document into a temporary file that lives as long as the guard.
    pub async fn view(&self, document_id: &str) -> Result<ViewedDocument> {
        let blob = self.api.fetch_document(document_id).await?;
        let suffix = blob
            .filename
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("campus-doc-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&blob.bytes)?;
        file.flush()?;

        tracing::debug!("[Documents] Viewing {} at {}", document_id, file.path().display());
        Ok(ViewedDocument {
            file,
            filename: blob.filename,
            content_type: blob.content_type,
        })
    }
}
