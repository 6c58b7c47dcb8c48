use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::form::FormError;
use crate::io::seed::{self, Seed};
use crate::model::board::{Board, GroupKind};
use crate::model::config::DefaultsConfig;
use crate::model::task::{Priority, Task, TaskStatus, User};
use crate::ops::board_ops;
use crate::toast::Toast;

/// Where the quick-create form was opened from
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    pub project_id: Option<String>,
    pub workstream_id: Option<String>,
    pub workstream_name: Option<String>,
}

/// Field values of the quick-create form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub workstream_id: Option<String>,
    pub workstream_name: Option<String>,
    /// Assignee display name
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
}

/// Quick task creation form
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub draft: TaskDraft,
    /// Keep the form open after creating
    pub create_more: bool,
    open: bool,
}

impl TaskForm {
    /// Open with defaults. The workstream comes from the context, else the
    /// project's first workstream.
    pub fn open(seed: &Seed, context: &TaskContext, defaults: &DefaultsConfig, today: NaiveDate) -> Self {
        let mut form = TaskForm {
            draft: TaskDraft {
                title: String::new(),
                description: None,
                project_id: context.project_id.clone(),
                workstream_id: None,
                workstream_name: None,
                assignee: Some(defaults.task_assignee.clone()),
                status: TaskStatus::Todo,
                start_date: Some(today),
                target_date: None,
                priority: Some(Priority::NoPriority),
                tag: None,
            },
            create_more: false,
            open: true,
        };
        form.pick_workstream(seed, context.workstream_id.as_deref());
        if context.workstream_name.is_some() {
            form.draft.workstream_name = context.workstream_name.clone();
        }
        form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Switch project; the workstream resets to the new project's first.
    pub fn set_project(&mut self, seed: &Seed, project_id: &str) {
        self.draft.project_id = Some(project_id.to_string());
        self.draft.workstream_id = None;
        self.draft.workstream_name = None;
        self.pick_workstream(seed, None);
    }

    fn pick_workstream(&mut self, seed: &Seed, wanted: Option<&str>) {
        let Some(project) = self.draft.project_id.as_deref().and_then(|id| seed.project(id)) else {
            return;
        };
        let workstreams = seed::project_workstreams(project);
        let chosen = wanted
            .and_then(|id| workstreams.iter().find(|g| g.id == id))
            .or_else(|| workstreams.first());
        if let Some(ws) = chosen {
            self.draft.workstream_id = Some(ws.id.clone());
            self.draft.workstream_name = Some(ws.name.clone());
        }
    }

    /// The task the current draft would create at `now`. `None` when no
    /// project can be resolved.
    pub fn build(&self, seed: &Seed, now: DateTime<Utc>) -> Option<Task> {
        let project_id = self
            .draft
            .project_id
            .clone()
            .or_else(|| seed.projects.first().map(|p| p.id.clone()))?;
        let project = seed.project(&project_id)?;
        let d = &self.draft;

        let title = d.title.trim();
        let mut task = Task::new(
            format!("{}-task-{}", project_id, now.timestamp_millis()),
            if title.is_empty() { "Untitled task" } else { title },
        )
        .with_status(d.status)
        .with_assignee(d.assignee.as_deref().map(|name| User::from_name(name, None)))
        .in_project(&project_id, &project.name)
        .in_workstream(
            &d.workstream_id
                .clone()
                .unwrap_or_else(|| format!("{}-ws", project_id)),
            d.workstream_name.as_deref().unwrap_or("General"),
        );
        task.due_label = d.target_date.map(|date| date.format("%d/%m/%Y").to_string());
        task.start_date = d.start_date;
        task.priority = d.priority;
        task.tag = d.tag.clone();
        task.description = d.description.clone();
        Some(task)
    }

    /// Create the task and append it to `board`, grouped by the board's
    /// kind. Returns the new board and the task.
    ///
    /// If the store rejects the append the error is toasted, the draft is
    /// kept and the form stays open.
    pub fn create(
        &mut self,
        seed: &Seed,
        board: &Board,
        toast: &mut dyn Toast,
        now: DateTime<Utc>,
    ) -> Result<(Board, Task), FormError> {
        let Some(task) = self.build(seed, now) else {
            debug!("quick create without a project");
            toast.error(&FormError::ProjectRequired.to_string());
            return Err(FormError::ProjectRequired);
        };
        let group_id = match board.kind {
            GroupKind::Workstream => task.workstream_id.clone(),
            GroupKind::Project => task.project_id.clone(),
        };
        let next = match board_ops::try_append_item(board, &group_id, task.clone()) {
            Ok(next) => next,
            Err(e) => {
                let e = FormError::from(e);
                warn!(error = %e, "quick create rejected");
                toast.error(&e.to_string());
                return Err(e);
            }
        };

        if self.create_more {
            toast.success("Task created! Ready for another.");
            self.draft.title.clear();
            self.draft.description = None;
            self.draft.status = TaskStatus::Todo;
            self.draft.target_date = None;
        } else {
            toast.success("Task created successfully");
            self.open = false;
        }
        Ok((next, task))
    }
}
