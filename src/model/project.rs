use serde::{Deserialize, Serialize};

use super::task::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    #[default]
    Planned,
    Backlog,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "In Progress",
            ProjectStatus::Planned => "Planned",
            ProjectStatus::Backlog => "Backlog",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }
}

/// A project as listed in the seed data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Client display name (matched against `Client::name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    /// Member display names; the first is the person in charge
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Project {
    /// Placeholder used when a project id is not in the seed
    pub fn untitled(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Untitled project {}", id),
            client: None,
            status: ProjectStatus::Planned,
            priority: Priority::Medium,
            members: Vec::new(),
            type_label: None,
            duration_label: None,
        }
    }

    /// Sprint label, e.g. "MVP 2 weeks"
    pub fn sprint_label(&self) -> String {
        match (&self.type_label, &self.duration_label) {
            (Some(t), Some(d)) => format!("{} {}", t, d),
            (None, Some(d)) => d.clone(),
            _ => "MVP 2 weeks".to_string(),
        }
    }
}
