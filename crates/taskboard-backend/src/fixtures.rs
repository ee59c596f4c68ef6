//! Sample board used to seed the simulated backend

use serde_json::json;
use taskboard_core::{Comment, Task};

/// Five tasks spread across all three board columns
#[must_use]
pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new("1", "Train support staff", "2025-08-09")
            .with_description("Comprehensive training program for customer support team")
            .with_assignee("1001")
            .with_comment(Comment::new("Initial spec done"))
            .with_metadata("priority", "medium")
            .with_metadata("tags", json!(["frontend"])),
        Task::new("2", "Migrate database schema", "2025-08-27")
            .with_description("Update database structure for new features")
            .with_assignee("1002")
            .with_status("done")
            .with_comment(Comment::new("Debugged last night"))
            .with_metadata("priority", "high"),
        Task::new("3", "Write unit tests", "2025-08-03")
            .with_description("Create comprehensive test coverage for core components")
            .with_assignee("1003"),
        Task::new("4", "Benchmark database queries", "2025-09-14")
            .with_description("Analyze and optimize slow database operations")
            .with_assignee("1003")
            .with_status("in-progress")
            .with_metadata("priority", "low"),
        Task::new("5", "Resolve customer complaints", "2025-08-10")
            .with_description("Address high-priority customer issues")
            .with_assignee("1002")
            .with_comment(Comment::new("Fixed edge case")),
    ]
}
