//! Task status and priority vocabularies, and the task list ordering rule.
//!
//! Both enums are stored as TEXT in the database and serialized with the
//! exact labels the client uses (`"To-Do"`, `"High"`, ...).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Kanban column of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To-Do")]
    ToDo,
    Doing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::Doing, TaskStatus::Done];

    /// Database / wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To-Do",
            TaskStatus::Doing => "Doing",
            TaskStatus::Done => "Done",
        }
    }

    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown task status '{s}'")))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether moving from `previous` to `next` should stamp `completed_at`.
///
/// Only a transition *into* Done counts; re-saving a Done task or leaving
/// Done never touches the timestamp.
pub fn completes_task(previous: TaskStatus, next: TaskStatus) -> bool {
    next.is_done() && !previous.is_done()
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    /// Sort rank: lower ranks are listed first.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown task priority '{s}'")))
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// The fields that decide where a task appears in a dream's task list.
pub trait TaskOrderKey {
    fn status(&self) -> TaskStatus;
    fn priority(&self) -> TaskPriority;
    fn due_date(&self) -> Option<Timestamp>;
}

/// Compare two pending tasks: priority rank, then due date ascending with
/// undated tasks last.
fn compare_pending<T: TaskOrderKey>(a: &T, b: &T) -> Ordering {
    a.priority()
        .rank()
        .cmp(&b.priority().rank())
        .then_with(|| match (a.due_date(), b.due_date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Arrange tasks for display.
///
/// `tasks` must be in storage order. Non-Done tasks come first, ordered by
/// [`compare_pending`]; Done tasks follow in their original order. The sort
/// is stable, so ties keep storage order.
pub fn order_tasks<T: TaskOrderKey>(tasks: Vec<T>) -> Vec<T> {
    let (mut pending, done): (Vec<T>, Vec<T>) =
        tasks.into_iter().partition(|t| !t.status().is_done());
    pending.sort_by(compare_pending);
    pending.extend(done);
    pending
}

/// Share of Done tasks as a whole percentage, rounded half away from zero.
///
/// Returns 0 for an empty list.
pub fn progress_percentage<I>(statuses: I) -> u8
where
    I: IntoIterator<Item = TaskStatus>,
{
    let (done, total) = statuses
        .into_iter()
        .fold((0u32, 0u32), |(done, total), s| {
            (done + u32::from(s.is_done()), total + 1)
        });
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(done) / f64::from(total)).round() as u8
}
