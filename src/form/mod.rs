pub mod client_form;
pub mod project_wizard;
pub mod rich_text;
pub mod task_form;

use crate::ops::board_ops::BoardError;

/// Validation failure on commit. The form stays open and nothing is saved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Client name is required")]
    NameRequired,
    #[error("Project is required")]
    ProjectRequired,
    /// The store refused the new record, e.g. a colliding id
    #[error("Could not create task: {0}")]
    Rejected(#[from] BoardError),
}

/// Trimmed value, or `None` when blank
pub fn trimmed(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}
