mod common;

use campus_application::{ApplicationWizard, SlotAction, WizardStep};
use campus_core::PortalError;
use campus_core::scholarship::{ApplicationStatus, FormField, ScholarshipForm};
use common::{MockPortalApi, pdf, valid_form};
use std::sync::Arc;
use std::time::Duration;

fn wizard_with(api: &Arc<MockPortalApi>, form: ScholarshipForm) -> ApplicationWizard {
    let mut wizard = ApplicationWizard::new(api.clone());
    for field in FormField::ALL {
        wizard.set_field(field, form.get(field).to_string());
    }
    wizard
}

#[tokio::test]
async fn test_valid_form_allocates_id_before_documents() {
    let api = Arc::new(MockPortalApi::new());
    let mut wizard = wizard_with(&api, valid_form());

    assert_eq!(wizard.active_step(), WizardStep::Details);
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Documents);
    assert_eq!(wizard.active_step().index(), 1);
    assert_eq!(wizard.application().request_id.as_deref(), Some("42"));
    assert!(wizard.error().is_none());

    wizard.upload("ID Proof", pdf("id.pdf")).await.unwrap();
    let docs = wizard.documents();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].doc_type, "ID Proof");
    assert_eq!(wizard.tracker().slot_action("ID Proof"), SlotAction::Replace);
}

#[tokio::test]
async fn test_empty_field_stays_on_details() {
    let api = Arc::new(MockPortalApi::new());
    let mut form = valid_form();
    form.course = "   ".to_string();
    let mut wizard = wizard_with(&api, form);

    let err = wizard.next().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(wizard.active_step(), WizardStep::Details);
    assert_eq!(wizard.error(), Some("Course is required"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_email_stays_on_details() {
    let api = Arc::new(MockPortalApi::new());
    let mut form = valid_form();
    form.email = "a@b".to_string();
    let mut wizard = wizard_with(&api, form);

    assert!(wizard.next().await.is_err());
    assert_eq!(wizard.active_step(), WizardStep::Details);
    assert_eq!(wizard.error(), Some("Please enter a valid email address"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_short_phone_stays_on_details() {
    let api = Arc::new(MockPortalApi::new());
    let mut form = valid_form();
    form.phone = "98765".to_string();
    let mut wizard = wizard_with(&api, form);

    assert!(wizard.next().await.is_err());
    assert_eq!(wizard.active_step(), WizardStep::Details);
    assert_eq!(
        wizard.error(),
        Some("Please enter a valid 10-digit phone number")
    );
}

#[tokio::test]
async fn test_submit_failure_shows_server_detail() {
    let api = Arc::new(MockPortalApi::failing(PortalError::api(
        400,
        "An application is already in progress",
    )));
    let mut wizard = wizard_with(&api, valid_form());

    assert!(wizard.next().await.is_err());
    assert_eq!(wizard.active_step(), WizardStep::Details);
    assert_eq!(wizard.error(), Some("An application is already in progress"));
    assert!(!wizard.application().is_allocated());
    assert!(!wizard.is_submitting());
}

#[tokio::test]
async fn test_back_has_no_side_effects() {
    let api = Arc::new(MockPortalApi::new());
    let mut wizard = wizard_with(&api, valid_form());
    wizard.next().await.unwrap();
    let calls = api.calls().len();

    assert_eq!(wizard.back(), WizardStep::Details);
    assert_eq!(wizard.back(), WizardStep::Details);
    assert_eq!(api.calls().len(), calls);

    // Moving forward again does not submit a second application.
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Documents);
    assert_eq!(api.count("submit_scholarship"), 1);
}

#[tokio::test]
async fn test_finish_fetches_status_once() {
    let api = Arc::new(MockPortalApi::new());
    let mut wizard = wizard_with(&api, valid_form());
    wizard.next().await.unwrap();
    wizard.upload("Income Certificate", pdf("income.pdf")).await.unwrap();

    assert_eq!(wizard.next().await.unwrap(), WizardStep::Review);
    assert!(!wizard.is_complete());
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Review);
    assert!(wizard.is_complete());
    assert_eq!(api.count("application_status"), 1);
    assert_eq!(wizard.final_status().unwrap().documents.len(), 1);
}

#[tokio::test]
async fn test_resume_starts_at_documents() {
    let api = Arc::new(MockPortalApi::new());
    let status = ApplicationStatus {
        request_id: "42".to_string(),
        application_number: "SCH-20240601-A1B2".to_string(),
        status: campus_core::request::RequestStatus::Pending,
        submitted_date: None,
        documents: Vec::new(),
    };

    let mut wizard = ApplicationWizard::resume(api.clone(), status, valid_form());
    assert!(wizard.is_edit_mode());
    assert_eq!(wizard.active_step(), WizardStep::Documents);

    wizard.upload("Bank Passbook", pdf("bank.pdf")).await.unwrap();
    assert_eq!(api.count("submit_scholarship"), 0);
    assert_eq!(api.count("upload_document"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_submit_can_be_retried() {
    let api = Arc::new(MockPortalApi::new());
    let mut wizard = wizard_with(&api, valid_form());

    api.set_hanging("submit_scholarship", true);
    let abandoned = tokio::time::timeout(Duration::from_secs(30), wizard.next()).await;
    assert!(abandoned.is_err());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.active_step(), WizardStep::Details);

    api.set_hanging("submit_scholarship", false);
    assert_eq!(wizard.next().await.unwrap(), WizardStep::Documents);
    assert_eq!(api.count("submit_scholarship"), 2);
}
