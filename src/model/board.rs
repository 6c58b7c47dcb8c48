use serde::{Deserialize, Serialize};

use super::task::Task;

/// What the groups of a board represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Workstreams of a single project
    Workstream,
    /// One group per project (aggregated task view)
    Project,
}

/// An ordered container of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Display/execution order
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Completion summary: (done, total, rounded percent)
    pub fn progress(&self) -> Progress {
        let total = self.tasks.len();
        let done = self.tasks.iter().filter(|t| t.is_done()).count();
        let percent = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as u8
        };
        Progress {
            done,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

/// The full ordered set of groups and their tasks.
///
/// Operations in `ops::board_ops` treat a board as an immutable snapshot and
/// return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub kind: GroupKind,
    pub groups: Vec<Group>,
}

impl Board {
    pub fn new(kind: GroupKind, groups: Vec<Group>) -> Self {
        Board { kind, groups }
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    /// Locate a task: (group index, task index)
    pub fn locate(&self, task_id: &str) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(gi, g)| g.position(task_id).map(|ti| (gi, ti)))
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.locate(task_id)
            .map(|(gi, ti)| &self.groups[gi].tasks[ti])
    }

    /// The id of the group currently holding `task_id`
    pub fn group_of(&self, task_id: &str) -> Option<&str> {
        self.locate(task_id)
            .map(|(gi, _)| self.groups[gi].id.as_str())
    }

    /// All tasks in group order (flat projection)
    pub fn flat(&self) -> impl Iterator<Item = &Task> {
        self.groups.iter().flat_map(|g| g.tasks.iter())
    }

    pub fn total_tasks(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Task ids per group, in order. Handy for comparing orderings.
    pub fn order(&self) -> Vec<(String, Vec<String>)> {
        self.groups
            .iter()
            .map(|g| {
                (
                    g.id.clone(),
                    g.tasks.iter().map(|t| t.id.clone()).collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;

    fn board() -> Board {
        Board::new(
            GroupKind::Workstream,
            vec![
                Group::new("design", "Design").with_tasks(vec![
                    Task::new("a", "A"),
                    Task::new("b", "B").with_status(TaskStatus::Done),
                ]),
                Group::new("dev", "Dev").with_tasks(vec![Task::new("c", "C")]),
                Group::new("empty", "Empty"),
            ],
        )
    }

    #[test]
    fn test_locate_and_group_of() {
        let board = board();
        assert_eq!(board.locate("c"), Some((1, 0)));
        assert_eq!(board.group_of("b"), Some("design"));
        assert_eq!(board.locate("zzz"), None);
    }

    #[test]
    fn test_flat_projection_in_group_order() {
        let board = board();
        let ids: Vec<&str> = board.flat().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_progress() {
        let board = board();
        assert_eq!(
            board.groups[0].progress(),
            Progress {
                done: 1,
                total: 2,
                percent: 50
            }
        );
        assert_eq!(board.groups[2].progress().percent, 0);
    }
}
