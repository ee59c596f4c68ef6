use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use taskboard_core::{sanitize_task_data, validate_task_on, Field, TaskFields};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn title_errors(fields: &TaskFields) -> Vec<String> {
    validate_task_on(fields, today())
        .errors
        .into_iter()
        .filter(|e| e.field == Field::Title)
        .map(|e| e.message)
        .collect()
}

#[test]
fn test_valid_form_has_no_errors() {
    let fields = TaskFields::new()
        .with_title("Valid Task Title")
        .with_description("Valid description")
        .with_assignee("user123")
        .with_due_date((today() + Duration::days(7)).format("%Y-%m-%d").to_string());

    let result = validate_task_on(&fields, today());
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_sanitize_examples() {
    let title = sanitize_task_data(&TaskFields::new().with_title("  a   b  "));
    assert_eq!(title.title, "a b");

    let due = sanitize_task_data(&TaskFields::new().with_due_date("  2025-09-01  "));
    assert_eq!(due.due_date, "2025-09-01");
}

proptest! {
    #[test]
    fn prop_blank_titles_report_required(title in "[ \t\n]{0,8}") {
        let errors = title_errors(&TaskFields::new().with_title(title));
        prop_assert_eq!(errors, vec!["Task title is required".to_string()]);
    }

    #[test]
    fn prop_short_titles_report_minimum(
        pad_left in "[ ]{0,4}",
        core in "[A-Za-z0-9]{1,2}",
        pad_right in "[ ]{0,4}",
    ) {
        let fields = TaskFields::new().with_title(format!("{pad_left}{core}{pad_right}"));
        let result = validate_task_on(&fields, today());
        prop_assert!(!result.is_valid);
        prop_assert_eq!(
            title_errors(&fields),
            vec!["Task title must be at least 3 characters long".to_string()]
        );
    }

    #[test]
    fn prop_valid_inputs_pass(
        title in "[A-Za-z][A-Za-z0-9 ]{1,97}[A-Za-z]",
        description in proptest::option::of("[a-z ]{0,500}"),
        assignee in proptest::option::of("[A-Za-z0-9_-]{1,20}"),
        days_ahead in proptest::option::of(0i64..3650),
    ) {
        let mut fields = TaskFields::new().with_title(title);
        fields.description = description;
        fields.assignee_id = assignee;
        fields.due_date = days_ahead
            .map(|d| (today() + Duration::days(d)).format("%Y-%m-%d").to_string());

        let result = validate_task_on(&fields, today());
        prop_assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
        prop_assert!(result.errors.is_empty());
    }

    #[test]
    fn prop_sanitize_is_idempotent(
        title in proptest::option::of("\\PC{0,40}"),
        description in proptest::option::of("[ \\ta-z\\n]{0,60}"),
        assignee in proptest::option::of("[ a-z_-]{0,20}"),
        due in proptest::option::of("[ 0-9-]{0,14}"),
    ) {
        let fields = TaskFields { title, description, assignee_id: assignee, due_date: due };
        let once = sanitize_task_data(&fields);
        let twice = sanitize_task_data(&once.to_fields());
        prop_assert_eq!(once, twice);
    }
}
