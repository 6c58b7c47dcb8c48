use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::board::{Board, GroupKind};
use crate::model::task::Task;

/// Structured result from `tb check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A broken board invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same task ID appears more than once
    #[serde(rename = "duplicate_id")]
    DuplicateId {
        task_id: String,
        group_ids: Vec<String>,
    },
    /// A task's membership attribute disagrees with the group holding it
    #[serde(rename = "membership_mismatch")]
    MembershipMismatch {
        group_id: String,
        task_id: String,
        recorded: String,
    },
}

/// Something worth a look that does not break the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    #[serde(rename = "empty_group")]
    EmptyGroup { group_id: String },
    #[serde(rename = "unassigned")]
    Unassigned { group_id: String, task_id: String },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a board. Read-only.
///
/// Errors: duplicate task IDs, tasks whose membership (workstream or
/// project, by board kind) names another group. Warnings: empty groups,
/// unassigned tasks.
pub fn check_board(board: &Board) -> CheckResult {
    let mut result = CheckResult::default();

    for (task_id, group_ids) in find_duplicate_ids(board) {
        result
            .errors
            .push(CheckError::DuplicateId { task_id, group_ids });
    }

    for group in &board.groups {
        if group.is_empty() {
            result.warnings.push(CheckWarning::EmptyGroup {
                group_id: group.id.clone(),
            });
        }
        for task in &group.tasks {
            let recorded = membership(board.kind, task);
            if recorded != group.id {
                result.errors.push(CheckError::MembershipMismatch {
                    group_id: group.id.clone(),
                    task_id: task.id.clone(),
                    recorded: recorded.to_string(),
                });
            }
            if task.assignee.is_none() {
                result.warnings.push(CheckWarning::Unassigned {
                    group_id: group.id.clone(),
                    task_id: task.id.clone(),
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn membership(kind: GroupKind, task: &Task) -> &str {
    match kind {
        GroupKind::Workstream => &task.workstream_id,
        GroupKind::Project => &task.project_id,
    }
}

fn find_duplicate_ids(board: &Board) -> Vec<(String, Vec<String>)> {
    let mut seen: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for group in &board.groups {
        for task in &group.tasks {
            seen.entry(task.id.as_str())
                .or_default()
                .push(group.id.clone());
        }
    }
    seen.into_iter()
        .filter(|(_, groups)| groups.len() > 1)
        .map(|(id, groups)| (id.to_string(), groups))
        .collect()
}
