use serde::Serialize;

use crate::model::board::{Board, Group, GroupKind};
use crate::model::client::{Client, ClientStatus};
use crate::model::project::Project;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::ops::drag::{DropOutcome, NoOpReason};
use crate::ops::filter::MemberCounts;
use crate::ops::query::{self, QueryResult};
use crate::util::text::{fit_to_width, plain_text, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub workstream: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub id: String,
    pub name: String,
    pub progress: ProgressJson,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub kind: GroupKind,
    pub groups: Vec<GroupJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_counts: Option<MemberCounts>,
}

#[derive(Serialize)]
pub struct ClientRowJson {
    pub id: String,
    pub name: String,
    pub status: ClientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub projects: usize,
}

#[derive(Serialize)]
pub struct ClientPageJson {
    pub clients: Vec<ClientRowJson>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub pages: String,
}

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct ClientDetailJson<'a> {
    #[serde(flatten)]
    pub client: &'a Client,
    pub projects: Vec<ProjectJson>,
}

#[derive(Serialize)]
pub struct BoardCheckJson {
    pub board: String,
    #[serde(flatten)]
    pub result: CheckResult,
}

#[derive(Serialize)]
pub struct CheckReportJson {
    pub valid: bool,
    pub boards: Vec<BoardCheckJson>,
}

#[derive(Serialize)]
pub struct DropJson {
    pub changed: bool,
    pub outcome: String,
    pub board: BoardJson,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        name: task.name.clone(),
        status: task.status,
        workstream: task.workstream_name.clone(),
        project: task.project_name.clone(),
        assignee: task.assignee.as_ref().map(|a| a.name.clone()),
        due: task.due_label.clone(),
        priority: task.priority,
        tag: task.tag.clone(),
    }
}

pub fn group_to_json(group: &Group) -> GroupJson {
    let p = group.progress();
    GroupJson {
        id: group.id.clone(),
        name: group.name.clone(),
        progress: ProgressJson {
            done: p.done,
            total: p.total,
            percent: p.percent,
        },
        tasks: group.tasks.iter().map(task_to_json).collect(),
    }
}

pub fn board_to_json(board: &Board, member_counts: Option<MemberCounts>) -> BoardJson {
    BoardJson {
        kind: board.kind,
        groups: board.groups.iter().map(group_to_json).collect(),
        member_counts,
    }
}

pub fn client_to_row_json(client: &Client, project_count: usize) -> ClientRowJson {
    ClientRowJson {
        id: client.id.clone(),
        name: client.name.clone(),
        status: client.status,
        contact: client.primary_contact_name.clone(),
        email: client.primary_contact_email.clone(),
        projects: project_count,
    }
}

pub fn project_to_json(project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id.clone(),
        name: project.name.clone(),
        status: project.status.label().to_string(),
    }
}

pub fn page_to_json(result: &QueryResult<'_, Client>, projects: &[Project]) -> ClientPageJson {
    let p = &result.pagination;
    ClientPageJson {
        clients: result
            .visible
            .iter()
            .map(|c| {
                client_to_row_json(
                    c,
                    crate::ops::client_ops::project_count_for_client(projects, &c.name),
                )
            })
            .collect(),
        total_matches: result.total_matches,
        page: p.current_page,
        total_pages: p.total_pages,
        page_size: p.page_size,
        pages: query::format_page_links(&p.links(), p.current_page),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] {} {}",
        task.status.checkbox_char(),
        task.id,
        task.name
    );
    if let Some(a) = &task.assignee {
        line.push_str(&format!(" @{}", a.name));
    }
    if let Some(due) = &task.due_label {
        line.push_str(&format!(" ({})", due));
    }
    if let Some(tag) = &task.tag {
        line.push_str(&format!(" #{}", tag));
    }
    line
}

/// Group header with completion, e.g. `== Design (ws-2) 1/3 33% ==`
pub fn format_group_header(group: &Group) -> String {
    let p = group.progress();
    format!(
        "== {} ({}) {}/{} {}% ==",
        group.name, group.id, p.done, p.total, p.percent
    )
}

pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in board.groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_group_header(group));
        for task in &group.tasks {
            lines.push(format!("  {}", format_task_line(task)));
        }
    }
    lines
}

pub fn format_member_counts(counts: &MemberCounts) -> String {
    format!(
        "no member: {}  assigned: {}  jason: {}",
        counts.no_member, counts.current, counts.jason
    )
}

/// One client table row with fixed-width columns
pub fn format_client_row(client: &Client, project_count: usize) -> String {
    format!(
        "{} {} {} {} {:>3}",
        fit_to_width(&client.id, 16),
        fit_to_width(&client.name, 24),
        fit_to_width(client.status.label(), 9),
        fit_to_width(client.primary_contact_name.as_deref().unwrap_or("-"), 16),
        project_count
    )
}

pub fn format_client_page(result: &QueryResult<'_, Client>, projects: &[Project]) -> Vec<String> {
    let p = &result.pagination;
    let mut lines: Vec<String> = result
        .visible
        .iter()
        .map(|c| {
            format_client_row(
                c,
                crate::ops::client_ops::project_count_for_client(projects, &c.name),
            )
        })
        .collect();
    if lines.is_empty() {
        lines.push("No clients match.".to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "{} match(es), page {} of {}: {}",
        result.total_matches,
        p.current_page,
        p.total_pages,
        query::format_page_links(&p.links(), p.current_page)
    ));
    lines
}

pub fn format_client_detail(client: &Client, projects: &[&Project]) -> Vec<String> {
    let mut lines = vec![format!("{} ({}) [{}]", client.name, client.id, client.status.label())];
    let fields = [
        ("industry", &client.industry),
        ("segment", &client.segment),
        ("location", &client.location),
        ("website", &client.website),
        ("owner", &client.owner),
        ("contact", &client.primary_contact_name),
        ("email", &client.primary_contact_email),
        ("last activity", &client.last_activity_label),
    ];
    for (label, value) in fields {
        if let Some(v) = value {
            lines.push(format!("{}: {}", label, v));
        }
    }
    if let Some(notes) = &client.notes {
        lines.push(format!("notes: {}", truncate_to_width(&plain_text(notes), 72)));
    }
    lines.push(String::new());
    lines.push(format!("projects ({}):", projects.len()));
    for p in projects {
        lines.push(format!("  {} {} [{}]", p.id, p.name, p.status.label()));
    }
    lines
}

pub fn describe_outcome(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::NoOp(reason) => match reason {
            NoOpReason::NoTarget => "no-op: dropped outside any task".to_string(),
            NoOpReason::SameItem => "no-op: dropped on itself".to_string(),
            NoOpReason::Unresolved => "no-op: task not on this board".to_string(),
            NoOpReason::CrossGroupDisallowed => {
                "no-op: cross-group drops are disabled for this view".to_string()
            }
        },
        DropOutcome::Reordered { group_id, from, to } => {
            format!("reordered {}: {} -> {}", group_id, from, to)
        }
        DropOutcome::Moved {
            task_id,
            from_group,
            to_group,
            index,
        } => format!("moved {} from {} to {} at {}", task_id, from_group, to_group, index),
    }
}

pub fn format_check_error(err: &CheckError) -> String {
    match err {
        CheckError::DuplicateId { task_id, group_ids } => {
            format!("{} is duplicated in groups: {}", task_id, group_ids.join(", "))
        }
        CheckError::MembershipMismatch {
            group_id,
            task_id,
            recorded,
        } => format!("[{}] {} records membership {}", group_id, task_id, recorded),
    }
}

pub fn format_check_warning(warning: &CheckWarning) -> String {
    match warning {
        CheckWarning::EmptyGroup { group_id } => format!("[{}] has no tasks", group_id),
        CheckWarning::Unassigned { group_id, task_id } => {
            format!("[{}] {} has no assignee", group_id, task_id)
        }
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

pub fn parse_client_status(s: &str) -> Result<ClientStatus, String> {
    ClientStatus::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: prospect, active, on_hold, archived)",
            s
        )
    })
}

pub fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s)
        .ok_or_else(|| format!("unknown status '{}' (expected: todo, in-progress, done)", s))
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| {
        format!(
            "unknown priority '{}' (expected: no-priority, low, medium, high, urgent)",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{DueTone, User};

    #[test]
    fn test_format_task_line() {
        let task = Task::new("1-ws-1-t2", "Define problem statement")
            .with_status(TaskStatus::InProgress)
            .with_assignee(Some(User::from_name("Jason Duong", None)))
            .with_due("Tomorrow", DueTone::Warning);
        insta::assert_snapshot!(
            format_task_line(&task),
            @"[>] 1-ws-1-t2 Define problem statement @Jason Duong (Tomorrow)"
        );
    }

    #[test]
    fn test_format_group_header() {
        let group = Group::new("ws-1", "Design").with_tasks(vec![
            Task::new("a", "A").with_status(TaskStatus::Done),
            Task::new("b", "B"),
            Task::new("c", "C"),
        ]);
        insta::assert_snapshot!(format_group_header(&group), @"== Design (ws-1) 1/3 33% ==");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_client_status("on_hold").is_ok());
        assert!(parse_client_status("paused").is_err());
        assert!(parse_task_status("in-progress").is_ok());
        assert!(parse_priority("whenever").is_err());
    }
}
