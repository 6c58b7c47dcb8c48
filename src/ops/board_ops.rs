use tracing::{debug, info};

use crate::model::board::{Board, Group, GroupKind};
use crate::model::task::Task;

/// Error type for board operations.
///
/// The public operations swallow these and return the board unchanged; the
/// `try_*` variants expose them to callers that want to report the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("task {task} is not in group {group}")]
    NotInGroup { task: String, group: String },
    #[error("index {index} out of range for group {group} (len {len})")]
    IndexOutOfRange {
        group: String,
        index: usize,
        len: usize,
    },
    #[error("task id already on the board: {0}")]
    DuplicateTask(String),
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Flip a task between done and its prior open status.
pub fn try_toggle_status(board: &Board, task_id: &str) -> Result<Board, BoardError> {
    let (gi, ti) = board
        .locate(task_id)
        .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))?;
    let mut next = board.clone();
    let task = &mut next.groups[gi].tasks[ti];
    task.toggle_done();
    info!(task = task_id, status = ?task.status, "toggled task status");
    Ok(next)
}

pub fn toggle_status(board: &Board, task_id: &str) -> Board {
    or_unchanged(board, try_toggle_status(board, task_id), "toggle_status")
}

// ---------------------------------------------------------------------------
// Reorder / move
// ---------------------------------------------------------------------------

/// Remove the task at `from` and reinsert it at `to` within one group.
pub fn try_reorder_within_group(
    board: &Board,
    group_id: &str,
    from: usize,
    to: usize,
) -> Result<Board, BoardError> {
    let gi = board
        .group_index(group_id)
        .ok_or_else(|| BoardError::GroupNotFound(group_id.to_string()))?;
    let len = board.groups[gi].len();
    for index in [from, to] {
        if index >= len {
            return Err(BoardError::IndexOutOfRange {
                group: group_id.to_string(),
                index,
                len,
            });
        }
    }

    let mut next = board.clone();
    if from != to {
        let tasks = &mut next.groups[gi].tasks;
        let task = tasks.remove(from);
        tasks.insert(to, task);
        info!(group = group_id, from, to, "reordered task");
    }
    Ok(next)
}

pub fn reorder_within_group(board: &Board, group_id: &str, from: usize, to: usize) -> Board {
    or_unchanged(
        board,
        try_reorder_within_group(board, group_id, from, to),
        "reorder_within_group",
    )
}

/// Move a task out of `source_group_id` into `target_group_id` at
/// `target_index` (clamped to the target's length). The task's membership
/// fields for the board's group kind follow it.
///
/// Within one group this is a reorder, with the index clamped to the last
/// position.
pub fn try_move_across_groups(
    board: &Board,
    source_group_id: &str,
    task_id: &str,
    target_group_id: &str,
    target_index: usize,
) -> Result<Board, BoardError> {
    let si = board
        .group_index(source_group_id)
        .ok_or_else(|| BoardError::GroupNotFound(source_group_id.to_string()))?;
    let from = board.groups[si]
        .position(task_id)
        .ok_or_else(|| BoardError::NotInGroup {
            task: task_id.to_string(),
            group: source_group_id.to_string(),
        })?;

    if source_group_id == target_group_id {
        let to = target_index.min(board.groups[si].len() - 1);
        return try_reorder_within_group(board, source_group_id, from, to);
    }

    let ti = board
        .group_index(target_group_id)
        .ok_or_else(|| BoardError::GroupNotFound(target_group_id.to_string()))?;

    let mut next = board.clone();
    let mut task = next.groups[si].tasks.remove(from);
    assign_membership(&mut task, board.kind, &next.groups[ti]);
    let target = &mut next.groups[ti].tasks;
    let index = target_index.min(target.len());
    target.insert(index, task);

    info!(
        task = task_id,
        from = source_group_id,
        to = target_group_id,
        index,
        "moved task across groups"
    );
    Ok(next)
}

pub fn move_across_groups(
    board: &Board,
    source_group_id: &str,
    task_id: &str,
    target_group_id: &str,
    target_index: usize,
) -> Board {
    or_unchanged(
        board,
        try_move_across_groups(board, source_group_id, task_id, target_group_id, target_index),
        "move_across_groups",
    )
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Append a task at the tail of `group_id`. A missing group is synthesized
/// from the task's membership and prepended to the board.
pub fn try_append_item(board: &Board, group_id: &str, mut task: Task) -> Result<Board, BoardError> {
    if board.locate(&task.id).is_some() {
        return Err(BoardError::DuplicateTask(task.id));
    }

    let mut next = board.clone();
    match next.group_index(group_id) {
        Some(gi) => {
            assign_membership(&mut task, board.kind, &next.groups[gi]);
            next.groups[gi].tasks.push(task);
        }
        None => {
            let name = match board.kind {
                GroupKind::Workstream => &task.workstream_name,
                GroupKind::Project => &task.project_name,
            };
            let name = if name.is_empty() { group_id } else { name.as_str() };
            let mut group = Group::new(group_id, name);
            assign_membership(&mut task, board.kind, &group);
            group.tasks.push(task);
            debug!(group = group_id, "synthesized group for new task");
            next.groups.insert(0, group);
        }
    }
    info!(group = group_id, "appended task");
    Ok(next)
}

pub fn append_item(board: &Board, group_id: &str, task: Task) -> Board {
    or_unchanged(board, try_append_item(board, group_id, task), "append_item")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn or_unchanged(board: &Board, result: Result<Board, BoardError>, op: &'static str) -> Board {
    match result {
        Ok(next) => next,
        Err(e) => {
            debug!(op, error = %e, "operation rejected; board unchanged");
            board.clone()
        }
    }
}

/// Point the task's membership fields for `kind` at `group`.
fn assign_membership(task: &mut Task, kind: GroupKind, group: &Group) {
    match kind {
        GroupKind::Workstream => {
            task.workstream_id = group.id.clone();
            task.workstream_name = group.name.clone();
        }
        GroupKind::Project => {
            task.project_id = group.id.clone();
            task.project_name = group.name.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use pretty_assertions::assert_eq;

    fn task(id: &str, group: &str, status: TaskStatus) -> Task {
        Task::new(id, id)
            .with_status(status)
            .in_workstream(&group.to_lowercase(), group)
            .in_project("p1", "Project One")
    }

    fn sample_board() -> Board {
        Board::new(
            GroupKind::Workstream,
            vec![
                Group::new("design", "Design").with_tasks(vec![
                    task("A", "Design", TaskStatus::Todo),
                    task("B", "Design", TaskStatus::Todo),
                    task("C", "Design", TaskStatus::Done),
                ]),
                Group::new("dev", "Dev").with_tasks(vec![task("D", "Dev", TaskStatus::Todo)]),
            ],
        )
    }

    fn ids(board: &Board, group_id: &str) -> Vec<String> {
        board
            .group(group_id)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    // --- Status ---

    #[test]
    fn test_toggle_status_round_trip() {
        let board = sample_board();
        let done = toggle_status(&board, "A");
        assert_eq!(done.find_task("A").unwrap().status, TaskStatus::Done);
        // Input snapshot untouched
        assert_eq!(board.find_task("A").unwrap().status, TaskStatus::Todo);

        let reopened = toggle_status(&done, "A");
        assert_eq!(reopened.find_task("A").unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn test_toggle_status_done_item_stays_in_place() {
        let board = sample_board();
        let next = toggle_status(&board, "C");
        assert_eq!(next.find_task("C").unwrap().status, TaskStatus::Todo);
        assert_eq!(next.order(), board.order());
    }

    #[test]
    fn test_toggle_status_unknown_is_noop() {
        let board = sample_board();
        assert_eq!(toggle_status(&board, "nope"), board);
        assert_eq!(
            try_toggle_status(&board, "nope"),
            Err(BoardError::TaskNotFound("nope".into()))
        );
    }

    // --- Reorder ---

    #[test]
    fn test_reorder_first_to_last() {
        let next = reorder_within_group(&sample_board(), "design", 0, 2);
        assert_eq!(ids(&next, "design"), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_reorder_last_to_first() {
        let next = reorder_within_group(&sample_board(), "design", 2, 0);
        assert_eq!(ids(&next, "design"), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reorder_same_index_is_equal() {
        let board = sample_board();
        assert_eq!(reorder_within_group(&board, "design", 1, 1), board);
    }

    #[test]
    fn test_reorder_out_of_range_rejected() {
        let board = sample_board();
        assert_eq!(reorder_within_group(&board, "design", 0, 3), board);
        assert_eq!(
            try_reorder_within_group(&board, "design", 5, 0),
            Err(BoardError::IndexOutOfRange {
                group: "design".into(),
                index: 5,
                len: 3
            })
        );
        assert_eq!(reorder_within_group(&board, "ghost", 0, 0), board);
    }

    // --- Move ---

    #[test]
    fn test_move_across_groups_updates_membership() {
        let board = Board::new(
            GroupKind::Workstream,
            vec![
                Group::new("design", "Design").with_tasks(vec![
                    task("A", "Design", TaskStatus::Todo),
                    task("B", "Design", TaskStatus::Todo),
                ]),
                Group::new("dev", "Dev").with_tasks(vec![task("C", "Dev", TaskStatus::Todo)]),
            ],
        );
        let next = move_across_groups(&board, "design", "B", "dev", 0);
        assert_eq!(ids(&next, "design"), vec!["A"]);
        assert_eq!(ids(&next, "dev"), vec!["B", "C"]);
        let moved = next.find_task("B").unwrap();
        assert_eq!(moved.workstream_name, "Dev");
        assert_eq!(moved.workstream_id, "dev");
        // Project membership is untouched on a workstream board
        assert_eq!(moved.project_id, "p1");
    }

    #[test]
    fn test_move_across_groups_clamps_index() {
        let next = move_across_groups(&sample_board(), "design", "A", "dev", 99);
        assert_eq!(ids(&next, "dev"), vec!["D", "A"]);
    }

    #[test]
    fn test_move_on_project_board_updates_project_fields() {
        let board = Board::new(
            GroupKind::Project,
            vec![
                Group::new("p1", "Project One").with_tasks(vec![task("A", "Design", TaskStatus::Todo)]),
                Group::new("p2", "Project Two"),
            ],
        );
        let next = move_across_groups(&board, "p1", "A", "p2", 0);
        let moved = next.find_task("A").unwrap();
        assert_eq!(moved.project_id, "p2");
        assert_eq!(moved.project_name, "Project Two");
        assert_eq!(moved.workstream_name, "Design");
    }

    #[test]
    fn test_move_same_group_degenerates_to_reorder() {
        let board = sample_board();
        let next = move_across_groups(&board, "design", "A", "design", 2);
        assert_eq!(next, reorder_within_group(&board, "design", 0, 2));
    }

    #[test]
    fn test_move_rejections_leave_board_unchanged() {
        let board = sample_board();
        assert_eq!(move_across_groups(&board, "design", "A", "ghost", 0), board);
        assert_eq!(move_across_groups(&board, "dev", "A", "design", 0), board);
        assert_eq!(move_across_groups(&board, "ghost", "A", "dev", 0), board);
    }

    #[test]
    fn test_move_preserves_total_count() {
        let board = sample_board();
        let next = move_across_groups(&board, "design", "C", "dev", 1);
        assert_eq!(next.total_tasks(), board.total_tasks());
        assert_eq!(next.flat().filter(|t| t.id == "C").count(), 1);
    }

    // --- Append ---

    #[test]
    fn test_append_item_to_tail() {
        let next = append_item(&sample_board(), "dev", Task::new("E", "New"));
        assert_eq!(ids(&next, "dev"), vec!["D", "E"]);
        assert_eq!(next.find_task("E").unwrap().workstream_name, "Dev");
    }

    #[test]
    fn test_append_item_synthesizes_group_at_front() {
        let new_task = Task::new("E", "New").in_workstream("qa", "QA");
        let next = append_item(&sample_board(), "qa", new_task);
        assert_eq!(next.groups[0].id, "qa");
        assert_eq!(next.groups[0].name, "QA");
        assert_eq!(ids(&next, "qa"), vec!["E"]);
        assert_eq!(next.groups.len(), 3);
    }

    #[test]
    fn test_append_duplicate_id_rejected() {
        let board = sample_board();
        assert_eq!(append_item(&board, "dev", Task::new("A", "Dup")), board);
    }
}
