mod lead;
mod validation;

pub use lead::{
    Lead, LeadPage, LeadSource, LeadStage, LeadStats, LeadStatus, UnknownVariant, timestamp_now,
};
pub use validation::{
    FieldError, LeadChanges, LeadDraft, LeadFields, ValidationErrors, validate_lead_changes,
    validate_new_lead, validate_record,
};
