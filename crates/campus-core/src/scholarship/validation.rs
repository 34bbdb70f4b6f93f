//! Local validation of the application form.
//!
//! Runs before any network call. The first failing field wins so the wizard
//! can show a single specific message.

use super::model::{FormField, ScholarshipForm};
use crate::error::{PortalError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value.trim())
}

/// Validates a single field.
pub fn validate_field(field: FormField, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::validation(
            field.key(),
            format!("{} is required", field.label()),
        ));
    }
    match field {
        FormField::Email if !is_valid_email(value) => Err(PortalError::validation(
            field.key(),
            "Please enter a valid email address",
        )),
        FormField::Phone if !is_valid_phone(value) => Err(PortalError::validation(
            field.key(),
            "Please enter a valid 10-digit phone number",
        )),
        _ => Ok(()),
    }
}

/// Validates the whole form in display order.
pub fn validate_form(form: &ScholarshipForm) -> Result<()> {
    FormField::ALL
        .into_iter()
        .try_for_each(|field| validate_field(field, form.get(field)))
}
