//! Field validation and sanitization for task forms
//!
//! Two pure transforms over the raw create-form fields:
//! - [`validate_task`] judges the fields and reports every violation
//! - [`sanitize_task_data`] normalizes whitespace and never rejects
//!
//! [`prepare_new_task`] chains both into the form submission path.

use crate::types::{NewTask, TaskStatus};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum title length after trimming
pub const TITLE_MIN_CHARS: usize = 3;
/// Maximum title length, untrimmed
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length, untrimmed
pub const DESCRIPTION_MAX_CHARS: usize = 500;

static ASSIGNEE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("assignee pattern compiles"));

const LOCAL_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Raw create-form fields, all optional at the boundary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Task title
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Assignee identifier
    #[serde(default)]
    pub assignee_id: Option<String>,
    /// Due date as typed
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TaskFields {
    /// Empty field set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// With due date
    #[inline]
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `assigneeId`
    AssigneeId,
    /// `dueDate`
    DueDate,
}

impl Field {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::AssigneeId => "assigneeId",
            Self::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Offending field
    pub field: Field,
    /// User-facing message
    pub message: String,
}

impl ValidationError {
    /// Create new validation error
    #[inline]
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Verdict over a field set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub is_valid: bool,
    /// Violations in field order: title, description, assignee, due date
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// First message reported for `field`
    #[must_use]
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Validate against the local calendar date
#[must_use]
pub fn validate_task(fields: &TaskFields) -> ValidationResult {
    validate_task_on(fields, Local::now().date_naive())
}

/// Validate with an explicit "today"
///
/// Every field is checked; only the title rules short-circuit among
/// themselves.
#[must_use]
pub fn validate_task_on(fields: &TaskFields, today: NaiveDate) -> ValidationResult {
    let errors = [
        check_title(fields.title.as_deref()),
        check_description(fields.description.as_deref()),
        check_assignee(fields.assignee_id.as_deref()),
        check_due_date(fields.due_date.as_deref(), today),
    ]
    .into_iter()
    .flatten()
    .collect();

    ValidationResult::from_errors(errors)
}

fn check_title(title: Option<&str>) -> Option<ValidationError> {
    let raw = title.unwrap_or_default();
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        Some(ValidationError::new(Field::Title, "Task title is required"))
    } else if trimmed.chars().count() < TITLE_MIN_CHARS {
        Some(ValidationError::new(
            Field::Title,
            format!("Task title must be at least {TITLE_MIN_CHARS} characters long"),
        ))
    } else if raw.chars().count() > TITLE_MAX_CHARS {
        Some(ValidationError::new(
            Field::Title,
            format!("Task title cannot exceed {TITLE_MAX_CHARS} characters"),
        ))
    } else {
        None
    }
}

fn check_description(description: Option<&str>) -> Option<ValidationError> {
    let description = description?;
    (description.chars().count() > DESCRIPTION_MAX_CHARS).then(|| {
        ValidationError::new(
            Field::Description,
            format!("Description cannot exceed {DESCRIPTION_MAX_CHARS} characters"),
        )
    })
}

fn check_assignee(assignee_id: Option<&str>) -> Option<ValidationError> {
    let trimmed = assignee_id?.trim();
    if trimmed.is_empty() || ASSIGNEE_PATTERN.is_match(trimmed) {
        return None;
    }
    Some(ValidationError::new(
        Field::AssigneeId,
        "Assignee ID can only contain letters, numbers, hyphens, and underscores",
    ))
}

fn check_due_date(due_date: Option<&str>, today: NaiveDate) -> Option<ValidationError> {
    let trimmed = due_date?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match parse_due_date(trimmed) {
        None => Some(ValidationError::new(Field::DueDate, "Please enter a valid date")),
        Some(date) if date < today => Some(ValidationError::new(
            Field::DueDate,
            "Due date cannot be in the past",
        )),
        Some(_) => None,
    }
}

/// Parse the calendar date out of a due-date string
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, local `YYYY-MM-DD[T ]HH:MM[:SS]`,
/// `YYYY/MM/DD`, `MM/DD/YYYY` and English month names (`Sep 1, 2025`,
/// `1 September 2025`). Time of day is dropped.
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            LOCAL_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        })
}

/// Normalized form fields; absent inputs become empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedFields {
    /// Trimmed, whitespace-collapsed title
    pub title: String,
    /// Trimmed, whitespace-collapsed description
    pub description: String,
    /// Trimmed, whitespace-collapsed assignee
    pub assignee_id: String,
    /// Trimmed due date
    pub due_date: String,
}

impl SanitizedFields {
    /// View as raw fields again (for validation or re-sanitizing)
    #[must_use]
    pub fn to_fields(&self) -> TaskFields {
        TaskFields {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            assignee_id: Some(self.assignee_id.clone()),
            due_date: Some(self.due_date.clone()),
        }
    }

    /// Build the create request; empty optional fields are dropped
    #[must_use]
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: non_empty(self.description),
            assignee_id: non_empty(self.assignee_id),
            due_date: self.due_date,
            status: TaskStatus::Todo,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Trim and collapse every whitespace run to a single space
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Best-effort normalizer for form input
///
/// Text fields are trimmed and whitespace-collapsed; the due date is only
/// trimmed.
#[must_use]
pub fn sanitize_task_data(fields: &TaskFields) -> SanitizedFields {
    SanitizedFields {
        title: fields.title.as_deref().map(sanitize_input).unwrap_or_default(),
        description: fields
            .description
            .as_deref()
            .map(sanitize_input)
            .unwrap_or_default(),
        assignee_id: fields
            .assignee_id
            .as_deref()
            .map(sanitize_input)
            .unwrap_or_default(),
        due_date: fields
            .due_date
            .as_deref()
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Sanitize, validate and build a create request
///
/// # Errors
/// Returns the validation errors of the sanitized fields when any rule fails.
pub fn prepare_new_task(
    fields: &TaskFields,
    today: NaiveDate,
) -> Result<NewTask, Vec<ValidationError>> {
    let sanitized = sanitize_task_data(fields);
    let verdict = validate_task_on(&sanitized.to_fields(), today);
    if verdict.is_valid {
        Ok(sanitized.into_new_task())
    } else {
        Err(verdict.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    #[test]
    fn title_is_required() {
        let result = validate_task_on(&TaskFields::new().with_title(""), today());
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![ValidationError::new(Field::Title, "Task title is required")]
        );

        let missing = validate_task_on(&TaskFields::new(), today());
        assert_eq!(
            missing.message_for(Field::Title),
            Some("Task title is required")
        );
    }

    #[test]
    fn title_minimum_uses_trimmed_length() {
        let result = validate_task_on(&TaskFields::new().with_title("  Hi   "), today());
        assert_eq!(
            result.message_for(Field::Title),
            Some("Task title must be at least 3 characters long")
        );
    }

    #[test]
    fn title_maximum_uses_raw_length() {
        let padded = format!(" {} ", "x".repeat(99));
        let result = validate_task_on(&TaskFields::new().with_title(padded), today());
        assert_eq!(
            result.message_for(Field::Title),
            Some("Task title cannot exceed 100 characters")
        );

        let exact = validate_task_on(&TaskFields::new().with_title("x".repeat(100)), today());
        assert!(exact.is_valid);
    }

    #[test]
    fn description_limit() {
        let fields = TaskFields::new()
            .with_title("Valid")
            .with_description("d".repeat(501));
        let result = validate_task_on(&fields, today());
        assert_eq!(
            result.errors,
            vec![ValidationError::new(
                Field::Description,
                "Description cannot exceed 500 characters"
            )]
        );
    }

    #[test]
    fn assignee_format() {
        let bad = TaskFields::new()
            .with_title("Valid Title")
            .with_assignee("user@domain.com");
        assert_eq!(
            validate_task_on(&bad, today()).message_for(Field::AssigneeId),
            Some("Assignee ID can only contain letters, numbers, hyphens, and underscores")
        );

        let padded = TaskFields::new()
            .with_title("Valid Title")
            .with_assignee("  user_1-a  ");
        assert!(validate_task_on(&padded, today()).is_valid);

        let blank = TaskFields::new().with_title("Valid Title").with_assignee("   ");
        assert!(validate_task_on(&blank, today()).is_valid);
    }

    #[test]
    fn due_date_rules() {
        let base = TaskFields::new().with_title("Valid Title");

        let past = base.clone().with_due_date("2025-08-14");
        assert_eq!(
            validate_task_on(&past, today()).message_for(Field::DueDate),
            Some("Due date cannot be in the past")
        );

        let same_day = base.clone().with_due_date("2025-08-15T00:00:00Z");
        assert!(validate_task_on(&same_day, today()).is_valid);

        let garbage = base.clone().with_due_date("next tuesday");
        assert_eq!(
            validate_task_on(&garbage, today()).message_for(Field::DueDate),
            Some("Please enter a valid date")
        );

        let impossible = base.with_due_date("2025-02-30");
        assert!(!validate_task_on(&impossible, today()).is_valid);
    }

    #[test]
    fn errors_collected_across_fields_in_order() {
        let fields = TaskFields::new()
            .with_title("")
            .with_description("d".repeat(600))
            .with_assignee("a b")
            .with_due_date("yesterday-ish");
        let result = validate_task_on(&fields, today());

        let order: Vec<Field> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            order,
            vec![
                Field::Title,
                Field::Description,
                Field::AssigneeId,
                Field::DueDate
            ]
        );
    }

    #[test]
    fn parse_accepts_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 1);
        assert_eq!(parse_due_date("2025-12-01"), expected);
        assert_eq!(parse_due_date(" 2025-12-01 "), expected);
        assert_eq!(parse_due_date("2025-12-01T09:30"), expected);
        assert_eq!(parse_due_date("2025-12-01 09:30:15"), expected);
        assert_eq!(parse_due_date("2025-12-01T09:30:00+02:00"), expected);
        assert_eq!(parse_due_date("12/01/2025"), expected);
        assert_eq!(parse_due_date("soon"), None);
    }

    #[test]
    fn parse_accepts_slashes_and_month_names() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 1);
        assert_eq!(parse_due_date("2025/09/01"), expected);
        assert_eq!(parse_due_date("Sep 1, 2025"), expected);
        assert_eq!(parse_due_date("September 1, 2025"), expected);
        assert_eq!(parse_due_date("1 Sep 2025"), expected);
        assert_eq!(parse_due_date("2025/13/01"), None);
    }

    #[test]
    fn sanitize_trims_and_collapses() {
        let result = sanitize_task_data(
            &TaskFields::new()
                .with_title("  Multiple   spaces   task  ")
                .with_description(" \n Description with\n\n newlines   ")
                .with_assignee("  user123  ")
                .with_due_date("  2025-09-01  "),
        );

        assert_eq!(
            result,
            SanitizedFields {
                title: "Multiple spaces task".to_string(),
                description: "Description with newlines".to_string(),
                assignee_id: "user123".to_string(),
                due_date: "2025-09-01".to_string(),
            }
        );
    }

    #[test]
    fn sanitize_maps_absent_to_empty() {
        let result = sanitize_task_data(&TaskFields {
            title: None,
            description: Some(String::new()),
            assignee_id: None,
            due_date: Some(String::new()),
        });
        assert_eq!(result, SanitizedFields::default());
    }

    #[test]
    fn sanitize_never_collapses_due_date() {
        let result = sanitize_task_data(&TaskFields::new().with_due_date("  2025 09  01 "));
        assert_eq!(result.due_date, "2025 09  01");
    }

    #[test]
    fn prepare_builds_request_from_clean_fields() {
        let fields = TaskFields::new()
            .with_title("  Ship   release ")
            .with_description("   ")
            .with_assignee(" ops-team ")
            .with_due_date(" 2025-09-01 ");

        let new_task = prepare_new_task(&fields, today()).unwrap();
        assert_eq!(
            new_task,
            NewTask::new("Ship release", "2025-09-01").with_assignee("ops-team")
        );
    }

    #[test]
    fn prepare_rejects_invalid_forms() {
        let fields = TaskFields::new().with_title("Hi").with_assignee("a@b");
        let errors = prepare_new_task(&fields, today()).unwrap_err();
        let expected = validate_task_on(&sanitize_task_data(&fields).to_fields(), today()).errors;
        assert_eq!(errors, expected);
        assert_eq!(errors.len(), 2);
    }
}
