//! Form validation and per-field error accumulation
//!
//! The POST endpoint answers validation failures with
//! `{"error": {"<field>": ["<message>", ...]}}`, so every check — derive
//! rules on the raw form and domain conflicts in the store — funnels into
//! a [`FieldErrors`] map that serializes to exactly that shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, Result};

/// Accumulated validation messages keyed by form field (or category).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(flatten)]
    errors: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(|v| v.as_slice())
    }

    /// Errors-present check that callers use as a guard before touching
    /// the store.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut result = FieldErrors::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                if let Some(message) = &error.message {
                    result.add(field, message.to_string());
                } else {
                    result.add(field, format!("Validation failed for field '{}'", field));
                }
            }
        }

        result
    }
}

/// The role-assignment form as submitted: raw string values keyed by the
/// field names the modal form uses.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentForm {
    // Missing fields fall through to the length rule instead of a
    // deserialization rejection, so the client always gets the structured
    // per-field body.
    #[serde(default)]
    #[validate(length(min = 1, message = "Required"))]
    pub schedule: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Required"))]
    pub role: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Required"))]
    pub person: String,
}

/// Ids extracted from a well-formed [`AssignmentForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRequest {
    pub schedule_id: u64,
    pub role_id: u64,
    pub teacher_id: u64,
}

impl AssignmentForm {
    /// Checks the derive rules, then parses the ids. All failures are
    /// reported together so the user sees every problem at once.
    pub fn parse(&self) -> Result<AssignmentRequest> {
        let mut errors: FieldErrors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };

        let schedule_id = parse_id(&mut errors, "schedule", &self.schedule);
        let role_id = parse_id(&mut errors, "role", &self.role);
        let teacher_id = parse_id(&mut errors, "person", &self.person);

        errors.into_result()?;

        Ok(AssignmentRequest {
            // Guarded by into_result above; empty fields never reach here.
            schedule_id: schedule_id.unwrap_or_default(),
            role_id: role_id.unwrap_or_default(),
            teacher_id: teacher_id.unwrap_or_default(),
        })
    }
}

fn parse_id(errors: &mut FieldErrors, field: &str, value: &str) -> Option<u64> {
    if value.is_empty() {
        // The length rule already reported this field.
        return None;
    }
    match value.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Invalid selection");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_report_required_for_each() {
        let form = AssignmentForm {
            schedule: String::new(),
            role: String::new(),
            person: "3".to_string(),
        };

        let err = form.parse().unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.messages_for("schedule"), Some(&["Required".to_string()][..]));
        assert_eq!(errors.messages_for("role"), Some(&["Required".to_string()][..]));
        assert!(errors.messages_for("person").is_none());
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let form = AssignmentForm {
            schedule: "1".to_string(),
            role: "not-a-number".to_string(),
            person: "2".to_string(),
        };

        let err = form.parse().unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.messages_for("role"),
            Some(&["Invalid selection".to_string()][..])
        );
    }

    #[test]
    fn well_formed_ids_parse() {
        let form = AssignmentForm {
            schedule: "1".to_string(),
            role: "2".to_string(),
            person: " 3 ".to_string(),
        };

        let request = form.parse().unwrap();
        assert_eq!(
            request,
            AssignmentRequest {
                schedule_id: 1,
                role_id: 2,
                teacher_id: 3,
            }
        );
    }

    #[test]
    fn field_errors_serialize_as_flat_mapping() {
        let mut errors = FieldErrors::new();
        errors.add("role", "Required");
        errors.add("date", "Invalid date");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["role"][0], "Required");
        assert_eq!(value["date"][0], "Invalid date");
    }

    #[test]
    fn merge_appends_messages_per_field() {
        let mut a = FieldErrors::new();
        a.add("role", "Required");

        let mut b = FieldErrors::new();
        b.add("role", "Unknown role");
        b.add("person", "Required");

        a.merge(b);
        assert_eq!(a.messages_for("role").unwrap().len(), 2);
        assert_eq!(a.messages_for("person").unwrap().len(), 1);
    }
}
