use super::{Prompter, or_dash, prompt};
use crate::app::AppContext;
use crate::commands::requests::display_status;
use anyhow::{Result, bail};
use campus_application::{ApplicationWizard, DocumentTracker, SlotAction};
use campus_core::api::PortalApi;
use campus_core::scholarship::{
    ApplicationRef, ApplicationStatus, DOCUMENT_SLOTS, Document, FormField, ScholarshipForm,
};
use campus_core::session::Route;
use campus_infrastructure::files;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ScholarshipAction {
    /// Fill in the application form, submit it and upload documents
    Apply {
        #[command(flatten)]
        form: FormArgs,
        /// Document to upload, as SLOT=PATH (repeatable)
        #[arg(long = "document", value_name = "SLOT=PATH", value_parser = parse_document)]
        documents: Vec<(String, PathBuf)>,
    },
    /// Continue an existing application at the document step
    Resume {
        request_id: String,
        #[arg(long = "document", value_name = "SLOT=PATH", value_parser = parse_document)]
        documents: Vec<(String, PathBuf)>,
    },
    /// List your applications
    List,
    /// Show an application and its document verification
    Status { request_id: String },
    /// Delete an application and its documents
    Delete {
        request_id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Upload or replace one document of an application
    Upload {
        request_id: String,
        slot: String,
        path: PathBuf,
    },
    /// Save a document to disk
    Download {
        document_id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Open a document through a temporary file
    View { document_id: String },
}

#[derive(Args)]
pub struct FormArgs {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    course: Option<String>,
    #[arg(long)]
    year_of_study: Option<String>,
    #[arg(long)]
    reason: Option<String>,
}

impl FormArgs {
    fn value(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::FullName => self.full_name.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Phone => self.phone.as_deref(),
            FormField::Course => self.course.as_deref(),
            FormField::YearOfStudy => self.year_of_study.as_deref(),
            FormField::Reason => self.reason.as_deref(),
        }
    }
}

fn parse_document(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((slot, path)) if !slot.trim().is_empty() && !path.is_empty() => {
            Ok((slot.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected SLOT=PATH, got '{raw}'")),
    }
}

pub async fn run(ctx: &AppContext, action: ScholarshipAction) -> Result<()> {
    ctx.require(Route::Scholarship)?;
    let api = ctx.api();

    match action {
        ScholarshipAction::Apply { form, documents } => {
            let mut wizard = ApplicationWizard::new(api);
            for field in FormField::ALL {
                let value = match form.value(field) {
                    Some(value) => value.to_string(),
                    None => prompt(&format!("{}: ", field.label()))?,
                };
                wizard.set_field(field, value);
            }
            submit_details(&mut wizard).await?;
            upload_all(&mut wizard, documents).await?;
            finish(&mut wizard).await
        }
        ScholarshipAction::Resume {
            request_id,
            documents,
        } => {
            let status = api.application_status(&request_id).await?;
            let form = find_form(api.as_ref(), &request_id).await;
            let mut wizard = ApplicationWizard::resume(api, status, form);
            print_step(&wizard);
            upload_all(&mut wizard, documents).await?;
            finish(&mut wizard).await
        }
        ScholarshipAction::List => {
            let applications = api.my_applications().await?;
            if applications.is_empty() {
                println!("No applications.");
            }
            for app in applications {
                println!(
                    "{:<8} {:<20} {:<12} {}",
                    app.request_id,
                    app.application_number,
                    display_status(app.status),
                    or_dash(app.submitted_date.as_deref())
                );
            }
            Ok(())
        }
        ScholarshipAction::Status { request_id } => {
            let status = api.application_status(&request_id).await?;
            print_status(&status);
            Ok(())
        }
        ScholarshipAction::Delete { request_id, yes } => {
            if !yes {
                let answer = prompt(&format!("Delete application {request_id}? [y/N] "))?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let receipt = api.delete_application(&request_id).await?;
            println!(
                "{} ({} document(s) removed)",
                or_dash(receipt.message.as_deref()),
                receipt.deleted_documents
            );
            Ok(())
        }
        ScholarshipAction::Upload {
            request_id,
            slot,
            path,
        } => {
            let application = ApplicationRef {
                request_id: Some(request_id),
                application_number: None,
            };
            let mut tracker = DocumentTracker::with_documents(api, application, Vec::new());
            tracker.refresh().await?;
            let verb = match tracker.slot_action(&slot) {
                SlotAction::Upload => "Uploaded",
                SlotAction::Replace => "Replaced",
            };
            let file = files::read_upload(&path).await?;
            let document = tracker.upload(&slot, file).await?;
            println!("{verb} {}", document_line(document));
            Ok(())
        }
        ScholarshipAction::Download { document_id, dir } => {
            let tracker = DocumentTracker::new(api);
            let path = tracker.download(&document_id, &dir).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        ScholarshipAction::View { document_id } => {
            let tracker = DocumentTracker::new(api);
            let viewed = tracker.view(&document_id).await?;
            println!(
                "{} ({}) is at {}",
                or_dash(viewed.filename()),
                or_dash(viewed.content_type()),
                viewed.path().display()
            );
            Prompter::new()?.line("Press Enter to close it.")?;
            Ok(())
        }
    }
}

async fn find_form(api: &dyn PortalApi, request_id: &str) -> ScholarshipForm {
    match api.my_applications().await {
        Ok(apps) => apps
            .iter()
            .find(|app| app.request_id == request_id)
            .map(|app| app.form())
            .unwrap_or_default(),
        Err(e) => {
            tracing::warn!("[Cli] Could not load the form of {}: {}", request_id, e);
            ScholarshipForm::default()
        }
    }
}

fn print_step(wizard: &ApplicationWizard) {
    let step = wizard.active_step();
    println!(
        "Step {}/{}: {}",
        step.index() + 1,
        campus_application::WizardStep::COUNT,
        step.title()
    );
}

async fn submit_details(wizard: &mut ApplicationWizard) -> Result<()> {
    print_step(wizard);
    if wizard.next().await.is_err() {
        bail!("{}", wizard.error().unwrap_or("Submitting the form failed"));
    }
    println!(
        "Submitted application {}",
        or_dash(wizard.application().application_number.as_deref())
    );
    Ok(())
}

async fn upload_all(wizard: &mut ApplicationWizard, documents: Vec<(String, PathBuf)>) -> Result<()> {
    print_step(wizard);
    if documents.is_empty() {
        println!("No documents given. Required slots: {}", DOCUMENT_SLOTS.join(", "));
    }
    for (slot, path) in documents {
        if !DOCUMENT_SLOTS.contains(&slot.as_str()) {
            tracing::warn!("[Cli] '{}' is not a standard document slot", slot);
        }
        let file = files::read_upload(&path).await?;
        match wizard.upload(&slot, file).await {
            Ok(document) => println!("  {}", document_line(document)),
            Err(e) => eprintln!("  {slot}: {}", e.user_message()),
        }
    }
    Ok(())
}

async fn finish(wizard: &mut ApplicationWizard) -> Result<()> {
    // Documents -> Review, then Review -> done.
    for _ in 0..2 {
        if wizard.next().await.is_err() {
            bail!("{}", wizard.error().unwrap_or("Finishing the application failed"));
        }
    }
    if let Some(status) = wizard.final_status() {
        print_status(status);
    }
    Ok(())
}

fn document_line(document: &Document) -> String {
    let score = document
        .score
        .map(|s| format!(" {s:.1}%"))
        .unwrap_or_default();
    format!(
        "{:<22} {:<28} {}{} [{}]",
        document.doc_type, document.filename, document.verification_status, score, document.id
    )
}

fn print_status(status: &ApplicationStatus) {
    println!(
        "Application {} (request {}): {}",
        status.application_number,
        status.request_id,
        display_status(status.status)
    );
    println!("Submitted: {}", or_dash(status.submitted_date.as_deref()));
    if status.documents.is_empty() {
        println!("No documents uploaded.");
    }
    for document in &status.documents {
        println!("  {}", document_line(document));
    }
}
