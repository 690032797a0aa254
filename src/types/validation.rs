use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Lead, LeadSource, LeadStage, LeadStatus};

const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 32;
const MAX_NOTES_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one lead payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Lead fields exactly as a caller supplied them.
///
/// For creation, absent fields take their defaults. For updates, absent fields are
/// left untouched and an empty `phone` or `notes` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Normalized fields for a new lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub stage: LeadStage,
    pub source: LeadSource,
    pub notes: Option<String>,
}

impl LeadFields {
    #[must_use]
    pub fn into_lead(self, id: String, now: DateTime<Utc>) -> Lead {
        Lead {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status,
            stage: self.stage,
            source: self.source,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Normalized partial update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub stage: Option<LeadStage>,
    pub source: Option<LeadSource>,
    pub notes: Option<Option<String>>,
}

impl LeadChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the changes and bumps `updated_at`, never below `created_at`.
    pub fn apply(self, lead: &mut Lead, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            lead.name = name;
        }
        if let Some(email) = self.email {
            lead.email = email;
        }
        if let Some(phone) = self.phone {
            lead.phone = phone;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(stage) = self.stage {
            lead.stage = stage;
        }
        if let Some(source) = self.source {
            lead.source = source;
        }
        if let Some(notes) = self.notes {
            lead.notes = notes;
        }
        lead.updated_at = now.max(lead.created_at);
    }
}

pub fn validate_new_lead(draft: &LeadDraft) -> Result<LeadFields, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match draft.name.as_deref() {
        Some(raw) => check_name(raw, &mut errors),
        None => {
            errors.push("name", "is required");
            String::new()
        }
    };
    let email = match draft.email.as_deref() {
        Some(raw) => check_email(raw, &mut errors),
        None => {
            errors.push("email", "is required");
            String::new()
        }
    };
    let phone = draft
        .phone
        .as_deref()
        .and_then(|raw| check_phone(raw, &mut errors));
    let notes = draft
        .notes
        .as_deref()
        .and_then(|raw| check_notes(raw, &mut errors));
    let status = parse_label(draft.status.as_deref(), &mut errors).unwrap_or_default();
    let stage = parse_label(draft.stage.as_deref(), &mut errors).unwrap_or_default();
    let source = parse_label(draft.source.as_deref(), &mut errors).unwrap_or_default();

    errors.into_result(LeadFields {
        name,
        email,
        phone,
        status,
        stage,
        source,
        notes,
    })
}

pub fn validate_lead_changes(draft: &LeadDraft) -> Result<LeadChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let changes = LeadChanges {
        name: draft.name.as_deref().map(|raw| check_name(raw, &mut errors)),
        email: draft
            .email
            .as_deref()
            .map(|raw| check_email(raw, &mut errors)),
        phone: draft
            .phone
            .as_deref()
            .map(|raw| check_phone(raw, &mut errors)),
        status: parse_label(draft.status.as_deref(), &mut errors),
        stage: parse_label(draft.stage.as_deref(), &mut errors),
        source: parse_label(draft.source.as_deref(), &mut errors),
        notes: draft
            .notes
            .as_deref()
            .map(|raw| check_notes(raw, &mut errors)),
    };

    errors.into_result(changes)
}

/// Checks the invariants every stored lead must hold. The store runs this before
/// each write, whatever path the record came through.
pub fn validate_record(lead: &Lead) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if lead.id.trim().is_empty() {
        errors.push("id", "cannot be empty");
    }
    if check_name(&lead.name, &mut errors) != lead.name {
        errors.push("name", "must be trimmed");
    }
    if check_email(&lead.email, &mut errors) != lead.email {
        errors.push("email", "must be trimmed and lowercase");
    }
    if let Some(phone) = &lead.phone {
        if check_phone(phone, &mut errors).is_none() {
            errors.push("phone", "cannot be empty when present");
        }
    }
    if lead.updated_at < lead.created_at {
        errors.push("updatedAt", "cannot precede createdAt");
    }

    errors.into_result(())
}

fn check_name(raw: &str, errors: &mut ValidationErrors) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errors.push("name", "cannot be empty");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push("name", format!("cannot exceed {MAX_NAME_LEN} characters"));
    }
    name.to_string()
}

fn check_email(raw: &str, errors: &mut ValidationErrors) -> String {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        errors.push("email", "cannot be empty");
        return email;
    }
    if email.len() > MAX_EMAIL_LEN {
        errors.push("email", format!("cannot exceed {MAX_EMAIL_LEN} characters"));
        return email;
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        errors.push("email", "must be a valid email address");
    }
    email
}

fn check_phone(raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let phone = raw.trim();
    if phone.is_empty() {
        return None;
    }
    if phone.len() > MAX_PHONE_LEN {
        errors.push("phone", format!("cannot exceed {MAX_PHONE_LEN} characters"));
    } else if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.' | 'x'))
    {
        errors.push("phone", "can only contain digits, spaces, and + - ( ) . x");
    } else if !phone.chars().any(|c| c.is_ascii_digit()) {
        errors.push("phone", "must contain at least one digit");
    }
    Some(phone.to_string())
}

fn check_notes(raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let notes = raw.trim();
    if notes.is_empty() {
        return None;
    }
    if notes.chars().count() > MAX_NOTES_LEN {
        errors.push("notes", format!("cannot exceed {MAX_NOTES_LEN} characters"));
    }
    Some(notes.to_string())
}

fn parse_label<T>(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<T>
where
    T: std::str::FromStr<Err = super::UnknownVariant>,
{
    match raw?.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e.field, e.to_string());
            None
        }
    }
}
