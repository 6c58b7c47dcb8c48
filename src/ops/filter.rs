use serde::Serialize;

use crate::model::board::{Board, Group};
use crate::model::task::{Task, TaskStatus};
use crate::ops::query::Queryable;

/// A filter chip from the view toolbar, e.g. `members: jason`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: String,
    pub value: String,
}

impl FilterChip {
    pub fn new(key: &str, value: &str) -> Self {
        FilterChip {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn member(value: &str) -> Self {
        FilterChip::new("members", value)
    }

    fn is_member_chip(&self) -> bool {
        let key = self.key.to_lowercase();
        key.starts_with("member") || key == "pic"
    }
}

/// Keep tasks matching any member chip. Without member chips nothing is
/// filtered.
///
/// `no member` keeps unassigned tasks, `current member` keeps assigned
/// ones, anything else is a substring of the assignee name.
pub fn filter_tasks_by_chips<'a>(tasks: &'a [Task], chips: &[FilterChip]) -> Vec<&'a Task> {
    let values: Vec<String> = chips
        .iter()
        .filter(|c| c.is_member_chip())
        .map(|c| c.value.to_lowercase())
        .collect();
    if values.is_empty() {
        return tasks.iter().collect();
    }

    tasks
        .iter()
        .filter(|task| {
            let name = task
                .assignee
                .as_ref()
                .map(|a| a.name.to_lowercase())
                .unwrap_or_default();
            values.iter().any(|v| match v.as_str() {
                "no member" => task.assignee.is_none(),
                "current member" => task.assignee.is_some(),
                v => !v.is_empty() && name.contains(v),
            })
        })
        .collect()
}

/// Apply chips per group and drop groups left empty.
pub fn filter_board(board: &Board, chips: &[FilterChip]) -> Board {
    if chips.is_empty() {
        return board.clone();
    }
    let groups = board
        .groups
        .iter()
        .map(|g| Group {
            id: g.id.clone(),
            name: g.name.clone(),
            tasks: filter_tasks_by_chips(&g.tasks, chips)
                .into_iter()
                .cloned()
                .collect(),
        })
        .filter(|g| !g.is_empty())
        .collect();
    Board::new(board.kind, groups)
}

/// Badge counts shown beside the member filter options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemberCounts {
    pub no_member: usize,
    pub current: usize,
    pub jason: usize,
}

pub fn member_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> MemberCounts {
    let mut counts = MemberCounts::default();
    for task in tasks {
        match &task.assignee {
            None => counts.no_member += 1,
            Some(a) => {
                counts.current += 1;
                if a.name.to_lowercase().contains("jason duong") {
                    counts.jason += 1;
                }
            }
        }
    }
    counts
}

impl Queryable for Task {
    type Category = TaskStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> TaskStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.workstream_name.as_str()];
        fields.extend(self.assignee.as_ref().map(|a| a.name.as_str()));
        fields.extend(self.tag.as_deref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::GroupKind;
    use crate::model::task::User;
    use pretty_assertions::assert_eq;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("1", "Kickoff").with_assignee(Some(User::from_name("Jason Duong", None))),
            Task::new("2", "Wireframes"),
            Task::new("3", "Review").with_assignee(Some(User::from_name("Emma Wright", None))),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_no_member_chips_keeps_everything() {
        let tasks = tasks();
        let chips = vec![FilterChip::new("status", "done")];
        assert_eq!(filter_tasks_by_chips(&tasks, &chips).len(), 3);
    }

    #[test]
    fn test_member_name_substring() {
        let tasks = tasks();
        let chips = vec![FilterChip::member("JASON")];
        assert_eq!(ids(&filter_tasks_by_chips(&tasks, &chips)), vec!["1"]);
    }

    #[test]
    fn test_no_member_and_current_member() {
        let tasks = tasks();
        let chips = vec![FilterChip::new("PIC", "no member")];
        assert_eq!(ids(&filter_tasks_by_chips(&tasks, &chips)), vec!["2"]);

        let chips = vec![FilterChip::member("current member")];
        assert_eq!(ids(&filter_tasks_by_chips(&tasks, &chips)), vec!["1", "3"]);
    }

    #[test]
    fn test_chips_are_ored() {
        let tasks = tasks();
        let chips = vec![FilterChip::member("emma"), FilterChip::member("no member")];
        assert_eq!(ids(&filter_tasks_by_chips(&tasks, &chips)), vec!["2", "3"]);
    }

    #[test]
    fn test_filter_board_drops_empty_groups() {
        let board = Board::new(
            GroupKind::Project,
            vec![
                Group::new("p1", "One").with_tasks(tasks()),
                Group::new("p2", "Two").with_tasks(vec![Task::new("4", "Solo")]),
            ],
        );
        let filtered = filter_board(&board, &[FilterChip::member("jason")]);
        assert_eq!(filtered.groups.len(), 1);
        assert_eq!(filtered.groups[0].tasks.len(), 1);
    }

    #[test]
    fn test_member_counts() {
        let tasks = tasks();
        assert_eq!(
            member_counts(&tasks),
            MemberCounts {
                no_member: 1,
                current: 2,
                jason: 1
            }
        );
    }
}
