//! Multi-step scholarship application wizard.
//!
//! Steps are `Details` (form), `Documents` (upload) and `Review` (finish).
//! Leaving `Details` submits the form, which is what allocates the request
//! id every later step depends on.

use crate::busy::BusyFlag;
use crate::documents::DocumentTracker;
use campus_core::api::PortalApi;
use campus_core::scholarship::{
    ApplicationRef, ApplicationStatus, Document, FormField, ScholarshipForm, UploadFile,
    validate_form,
};
use campus_core::{PortalError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Details,
    Documents,
    Review,
}

impl WizardStep {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Details => 0,
            WizardStep::Documents => 1,
            WizardStep::Review => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Details => "Application details",
            WizardStep::Documents => "Upload documents",
            WizardStep::Review => "Review & submit",
        }
    }

    fn previous(&self) -> WizardStep {
        match self {
            WizardStep::Details | WizardStep::Documents => WizardStep::Details,
            WizardStep::Review => WizardStep::Documents,
        }
    }
}

pub struct ApplicationWizard {
    api: Arc<dyn PortalApi>,
    active_step: WizardStep,
    form: ScholarshipForm,
    tracker: DocumentTracker,
    submitting: BusyFlag,
    error: Option<String>,
    completed: Option<ApplicationStatus>,
    edit_mode: bool,
}

impl ApplicationWizard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            tracker: DocumentTracker::new(api.clone()),
            api,
            active_step: WizardStep::Details,
            form: ScholarshipForm::default(),
            submitting: BusyFlag::default(),
            error: None,
            completed: None,
            edit_mode: false,
        }
    }

    /// Re-opens an existing application at the document step.
    pub fn resume(api: Arc<dyn PortalApi>, status: ApplicationStatus, form: ScholarshipForm) -> Self {
        let application = ApplicationRef {
            request_id: Some(status.request_id),
            application_number: Some(status.application_number),
        };
        tracing::debug!(
            "[Wizard] Resuming {:?} with {} document(s)",
            application.application_number,
            status.documents.len()
        );
        Self {
            tracker: DocumentTracker::with_documents(api.clone(), application, status.documents),
            api,
            active_step: WizardStep::Documents,
            form,
            submitting: BusyFlag::default(),
            error: None,
            completed: None,
            edit_mode: true,
        }
    }

    pub fn active_step(&self) -> WizardStep {
        self.active_step
    }

    pub fn form(&self) -> &ScholarshipForm {
        &self.form
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn application(&self) -> &ApplicationRef {
        self.tracker.application()
    }

    pub fn documents(&self) -> &[Document] {
        self.tracker.documents()
    }

    pub fn tracker(&self) -> &DocumentTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut DocumentTracker {
        &mut self.tracker
    }

    /// Inline error of the current step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    /// Status fetched when the wizard finished.
    pub fn final_status(&self) -> Option<&ApplicationStatus> {
        self.completed.as_ref()
    }

    fn fail<T>(&mut self, err: PortalError) -> Result<T> {
        self.error = Some(err.user_message());
        Err(err)
    }

    /// Advances one step, doing whatever the current step requires first.
    pub async fn next(&mut self) -> Result<WizardStep> {
        if self.submitting.is_set() {
            return Err(PortalError::Busy);
        }

        match self.active_step {
            WizardStep::Details => self.submit_details().await?,
            WizardStep::Documents => {
                self.error = None;
                self.active_step = WizardStep::Review;
            }
            WizardStep::Review => self.finish().await?,
        }

        Ok(self.active_step)
    }

    /// Goes back one step without side effects.
    pub fn back(&mut self) -> WizardStep {
        self.active_step = self.active_step.previous();
        self.error = None;
        self.active_step
    }

    async fn submit_details(&mut self) -> Result<()> {
        let form = self.form.trimmed();
        if let Err(e) = validate_form(&form) {
            return self.fail(e);
        }

        // The request already exists; edits to the form are local only.
        if self.tracker.application().is_allocated() {
            self.form = form;
            self.error = None;
            self.active_step = WizardStep::Documents;
            return Ok(());
        }

        self.error = None;
        let result = {
            let _busy = self.submitting.enter()?;
            self.api.submit_scholarship(&form).await
        };

        match result {
            Ok(receipt) => {
                tracing::info!(
                    "[Wizard] Application {} submitted (request {})",
                    receipt.application_number,
                    receipt.request_id
                );
                self.tracker.set_application(ApplicationRef {
                    request_id: Some(receipt.request_id),
                    application_number: Some(receipt.application_number),
                });
                self.form = form;
                self.active_step = WizardStep::Documents;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Wizard] Submit failed: {}", e);
                self.fail(e)
            }
        }
    }

    async fn finish(&mut self) -> Result<()> {
        let request_id = match self.tracker.application().request_id.clone() {
            Some(id) => id,
            None => return self.fail(PortalError::MissingRequestId),
        };

        let result = {
            let _busy = self.submitting.enter()?;
            self.api.application_status(&request_id).await
        };

        match result {
            Ok(status) => {
                tracing::info!(
                    "[Wizard] Application {} complete with {} document(s)",
                    status.application_number,
                    status.documents.len()
                );
                self.tracker = DocumentTracker::with_documents(
                    self.api.clone(),
                    self.tracker.application().clone(),
                    status.documents.clone(),
                );
                self.completed = Some(status);
                self.error = None;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Uploads into `slot` for the application this wizard created.
    pub async fn upload(&mut self, slot: &str, file: UploadFile) -> Result<&Document> {
        let result = self.tracker.upload(slot, file).await.map(|_| ());
        if let Err(e) = result {
            return self.fail(e);
        }
        self.error = None;
        self.tracker
            .document_for(slot)
            .ok_or_else(|| PortalError::internal(format!("uploaded document for '{slot}' missing")))
    }
}
