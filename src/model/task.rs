use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::slug::{avatar_url, slugify};

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Human-readable label used in listings
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Todo => ' ',
            TaskStatus::InProgress => '>',
            TaskStatus::Done => 'x',
        }
    }

    /// Parse the wire name (`todo`, `in-progress`, `done`)
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Urgency tone of a due label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueTone {
    Danger,
    Warning,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    NoPriority,
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::NoPriority => "No priority",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "no-priority" => Some(Priority::NoPriority),
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// A person a task can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    /// Materialize a user from a display name; the id is the slugified name.
    pub fn from_name(name: &str, role: Option<&str>) -> User {
        User {
            id: slugify(name),
            name: name.to_string(),
            avatar_url: Some(avatar_url(name)),
            role: role.map(str::to_string),
        }
    }
}

/// A task with its display fields and group membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable, unique identifier
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_tone: Option<DueTone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Rich-text (HTML) description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // --- Membership (denormalized) ---
    pub workstream_id: String,
    pub workstream_name: String,
    pub project_id: String,
    pub project_name: String,

    /// Status to restore when a done task is toggled back open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopen_status: Option<TaskStatus>,
}

impl Task {
    /// Create a todo task with no membership yet
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            name: name.into(),
            status: TaskStatus::Todo,
            due_label: None,
            due_tone: None,
            assignee: None,
            start_date: None,
            priority: None,
            tag: None,
            description: None,
            workstream_id: String::new(),
            workstream_name: String::new(),
            project_id: String::new(),
            project_name: String::new(),
            reopen_status: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: Option<User>) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn with_due(mut self, label: &str, tone: DueTone) -> Self {
        self.due_label = Some(label.to_string());
        self.due_tone = Some(tone);
        self
    }

    pub fn in_workstream(mut self, id: &str, name: &str) -> Self {
        self.workstream_id = id.to_string();
        self.workstream_name = name.to_string();
        self
    }

    pub fn in_project(mut self, id: &str, name: &str) -> Self {
        self.project_id = id.to_string();
        self.project_name = name.to_string();
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Flip between done and the status the task had before it was done.
    pub fn toggle_done(&mut self) {
        if self.status == TaskStatus::Done {
            self.status = self.reopen_status.take().unwrap_or(TaskStatus::Todo);
        } else {
            self.reopen_status = Some(self.status);
            self.status = TaskStatus::Done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_done_restores_prior_status() {
        let mut task = Task::new("t1", "Draft").with_status(TaskStatus::InProgress);
        task.toggle_done();
        assert_eq!(task.status, TaskStatus::Done);
        task.toggle_done();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.reopen_status, None);
    }

    #[test]
    fn test_toggle_done_falls_back_to_todo() {
        let mut task = Task::new("t1", "Draft").with_status(TaskStatus::Done);
        task.toggle_done();
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(TaskStatus::parse("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn test_user_from_name() {
        let user = User::from_name("Jason Duong", Some("PIC"));
        assert_eq!(user.id, "jason-duong");
        assert_eq!(user.role.as_deref(), Some("PIC"));
        assert!(user.avatar_url.is_some());
    }
}
