//! `taskboard validate`: check a create form without touching a backend

use chrono::NaiveDate;
use serde::Serialize;
use taskboard_core::{
    sanitize_task_data, validate_task_on, SanitizedFields, TaskFields, ValidationResult,
};

/// Sanitized form plus the verdict on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    /// Fields after sanitization
    pub sanitized: SanitizedFields,
    /// Verdict on the sanitized fields
    pub result: ValidationResult,
}

impl FormReport {
    /// Whether the form can be submitted
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.result.is_valid
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Task Form ===\n\n");
        report.push_str(&format!("Title:       {:?}\n", self.sanitized.title));
        report.push_str(&format!("Description: {:?}\n", self.sanitized.description));
        report.push_str(&format!("Assignee:    {:?}\n", self.sanitized.assignee_id));
        report.push_str(&format!("Due date:    {:?}\n", self.sanitized.due_date));

        if !self.result.errors.is_empty() {
            report.push_str("\n=== Errors ===\n");
            for error in &self.result.errors {
                report.push_str(&format!("- {error}\n"));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.is_valid() { "VALID" } else { "INVALID" }
        ));
        report
    }
}

/// Sanitize `fields` and validate the result against `today`
#[must_use]
pub fn check_form(fields: &TaskFields, today: NaiveDate) -> FormReport {
    let sanitized = sanitize_task_data(fields);
    let result = validate_task_on(&sanitized.to_fields(), today);
    FormReport { sanitized, result }
}
