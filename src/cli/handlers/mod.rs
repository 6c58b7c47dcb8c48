use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::form::client_form::{ClientDraftPatch, ClientForm};
use crate::form::task_form::{TaskContext, TaskForm};
use crate::io::config_io::{self, Workspace};
use crate::io::seed;
use crate::model::board::Board;
use crate::model::project::Project;
use crate::ops::client_ops::{self, ClientQuery, ClientSortKey};
use crate::ops::detail::{self, DetailLoad};
use crate::ops::drag::{DragInterpreter, DragPolicy};
use crate::ops::filter::{self, FilterChip};
use crate::ops::query::SortDirection;
use crate::ops::{board_ops, check};
use crate::toast::RecordingToast;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let cwd = std::env::current_dir()?;
    let ws = config_io::load_workspace(
        cli.config.as_deref().map(Path::new),
        cli.seed.as_deref().map(Path::new),
        &cwd,
    )?;
    debug!(
        clients = ws.seed.clients.len(),
        projects = ws.seed.projects.len(),
        "workspace loaded"
    );

    match cli.command {
        // Read commands
        Commands::Tasks(args) => cmd_tasks(&ws, args, json),
        Commands::Workstreams(args) => cmd_workstreams(&ws, args, json),
        Commands::Clients(args) => cmd_clients(&ws, args, json),
        Commands::Client(args) => cmd_client(&ws, args, json),
        Commands::Check => cmd_check(&ws, json),

        // Write commands
        Commands::ClientAdd(args) => cmd_client_add(ws, args, json),
        Commands::Toggle(args) => cmd_toggle(&ws, args, json),
        Commands::Reorder(args) => cmd_reorder(&ws, args, json),
        Commands::Move(args) => cmd_move(&ws, args, json),
        Commands::Drag(args) => cmd_drag(&ws, args, json),
        Commands::TaskAdd(args) => cmd_task_add(&ws, args, json),
    }
}

fn print_board(board: &Board, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(board, None))?);
    } else {
        for line in format_board(board) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Project whose workstreams hold `task_id`
fn project_of_task(ws: &Workspace, task_id: &str) -> Option<String> {
    ws.seed
        .projects
        .iter()
        .find(|p| {
            seed::workstream_board(&ws.seed, &p.id)
                .find_task(task_id)
                .is_some()
        })
        .map(|p| p.id.clone())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tasks(ws: &Workspace, args: TasksArgs, json: bool) -> CmdResult {
    let board = seed::my_tasks_board(&ws.seed);
    let counts = filter::member_counts(board.flat());
    let chips: Vec<FilterChip> = args.member.iter().map(|m| FilterChip::member(m)).collect();
    let filtered = filter::filter_board(&board, &chips);

    if json {
        let out = board_to_json(&filtered, Some(counts));
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_member_counts(&counts));
        println!();
        for line in format_board(&filtered) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_workstreams(ws: &Workspace, args: WorkstreamsArgs, json: bool) -> CmdResult {
    let board = seed::workstream_board(&ws.seed, &args.project);
    if !json {
        let project = ws
            .seed
            .project(&args.project)
            .cloned()
            .unwrap_or_else(|| Project::untitled(&args.project));
        println!("{} ({}) [{}]", project.name, project.id, project.sprint_label());
        println!();
    }
    print_board(&board, json)
}

fn cmd_clients(ws: &Workspace, args: ClientsArgs, json: bool) -> CmdResult {
    let status = args
        .status
        .as_deref()
        .map(parse_client_status)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let page_size = args.page_size.unwrap_or(ws.config.clients.page_size);

    let mut q = ClientQuery::new(page_size).status(status);
    q.params.search_text = args.search.unwrap_or_default();
    q.params.page = args.page;
    q.params.sort_direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    q.sort_key = match args.sort {
        SortColumn::Name => ClientSortKey::Name,
        SortColumn::Projects => ClientSortKey::Projects,
    };

    let result = client_ops::query_clients(&ws.seed.clients, &ws.seed.projects, &q);
    if json {
        let out = page_to_json(&result, &ws.seed.projects);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_client_page(&result, &ws.seed.projects) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_client(ws: &Workspace, args: ClientArgs, json: bool) -> CmdResult {
    let delay = Duration::from_millis(ws.config.detail.load_delay_ms);
    let started = Instant::now();
    let mut load = DetailLoad::start(&args.id, started, delay);
    let client = load
        .poll(started + delay, &ws.seed.clients)
        .ok_or("no clients to show")?;
    if client.id != args.id {
        info!(requested = %args.id, shown = %client.id, "unknown client, showing first");
    }

    let detail = detail::client_detail(client, &ws.seed.projects);
    if json {
        let out = ClientDetailJson {
            client: detail.client,
            projects: detail.projects.iter().map(|p| project_to_json(p)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_client_detail(detail.client, &detail.projects) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(ws: &Workspace, json: bool) -> CmdResult {
    let mut boards: Vec<(String, Board)> = ws
        .seed
        .projects
        .iter()
        .map(|p| (format!("workstreams:{}", p.id), seed::workstream_board(&ws.seed, &p.id)))
        .collect();
    boards.push(("my-tasks".to_string(), seed::my_tasks_board(&ws.seed)));

    let results: Vec<BoardCheckJson> = boards
        .into_iter()
        .map(|(label, board)| BoardCheckJson {
            board: label,
            result: check::check_board(&board),
        })
        .collect();
    let valid = results.iter().all(|r| r.result.valid);

    if json {
        let out = CheckReportJson {
            valid,
            boards: results,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let errors: Vec<String> = results
            .iter()
            .flat_map(|r| {
                r.result
                    .errors
                    .iter()
                    .map(move |e| format!("  {}: {}", r.board, format_check_error(e)))
            })
            .collect();
        let warnings: Vec<String> = results
            .iter()
            .flat_map(|r| {
                r.result
                    .warnings
                    .iter()
                    .map(move |w| format!("  {}: {}", r.board, format_check_warning(w)))
            })
            .collect();
        if !errors.is_empty() {
            println!("Errors:");
            for e in &errors {
                println!("{}", e);
            }
        }
        if !warnings.is_empty() {
            if !errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for w in &warnings {
                println!("{}", w);
            }
        }
        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed.");
        }
    }

    if !valid {
        return Err("check found errors".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_client_add(ws: Workspace, args: ClientAddArgs, json: bool) -> CmdResult {
    let mut clients = ws.seed.clients;
    let status = args
        .status
        .as_deref()
        .map(parse_client_status)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;

    let mut form = match &args.edit {
        Some(id) => {
            let existing = client_ops::client_by_id(&clients, id)
                .ok_or_else(|| format!("client not found: {}", id))?;
            ClientForm::edit(existing)
        }
        None => ClientForm::create(&ws.config.defaults),
    };
    form.update_field(ClientDraftPatch {
        // Editing keeps the current name unless one is given
        name: if args.edit.is_some() && args.name.is_empty() {
            None
        } else {
            Some(args.name)
        },
        status,
        primary_contact_name: args.contact_name,
        primary_contact_email: args.contact_email,
        industry: args.industry,
        website: args.website,
        location: args.location,
        owner: args.owner,
        notes: args.notes,
    });

    let mut toast = RecordingToast::new();
    let saved = form.save(&mut clients, &mut toast)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        if let Some((_, message)) = toast.last() {
            println!("{}", message);
        }
        let count = client_ops::project_count_for_client(&ws.seed.projects, &saved.name);
        println!("{}", format_client_row(&saved, count));
    }
    Ok(())
}

fn cmd_toggle(ws: &Workspace, args: ToggleArgs, json: bool) -> CmdResult {
    let project = project_of_task(ws, &args.id).ok_or_else(|| format!("task not found: {}", args.id))?;
    let board = seed::workstream_board(&ws.seed, &project);
    let next = board_ops::try_toggle_status(&board, &args.id)?;
    let task = next
        .find_task(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_reorder(ws: &Workspace, args: ReorderArgs, json: bool) -> CmdResult {
    let board = seed::workstream_board(&ws.seed, &args.project);
    let next = board_ops::try_reorder_within_group(&board, &args.group, args.from, args.to)?;
    let group = next
        .group(&args.group)
        .ok_or_else(|| format!("workstream not found: {}", args.group))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&group_to_json(group))?);
    } else {
        println!("{}", format_group_header(group));
        for task in &group.tasks {
            println!("  {}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_move(ws: &Workspace, args: MoveArgs, json: bool) -> CmdResult {
    let board = seed::workstream_board(&ws.seed, &args.project);
    let source = board
        .group_of(&args.task)
        .ok_or_else(|| format!("task not found: {}", args.task))?
        .to_string();
    let index = match args.index {
        Some(i) => i,
        None => board
            .group(&args.target)
            .map(|g| g.len())
            .ok_or_else(|| format!("workstream not found: {}", args.target))?,
    };
    let next = board_ops::try_move_across_groups(&board, &source, &args.task, &args.target, index)?;
    print_board(&next, json)
}

fn cmd_drag(ws: &Workspace, args: DragArgs, json: bool) -> CmdResult {
    let (board, allow_cross_group) = match args.view {
        DragView::Tasks => (
            seed::my_tasks_board(&ws.seed),
            ws.config.drag.my_tasks_cross_group,
        ),
        DragView::Workstreams => {
            let project = match args.project {
                Some(p) => p,
                None => project_of_task(ws, &args.active)
                    .ok_or_else(|| format!("task not found: {}", args.active))?,
            };
            (
                seed::workstream_board(&ws.seed, &project),
                ws.config.drag.workstreams_cross_group,
            )
        }
    };

    let mut drag = DragInterpreter::new(DragPolicy { allow_cross_group });
    drag.on_drag_start(&args.active);
    drag.on_drag_over(args.over.as_deref());
    let over = drag.over_id().map(str::to_string);
    let (next, outcome) = drag.on_drag_end(&board, &args.active, over.as_deref());
    debug!(?outcome, "drop resolved");

    if json {
        let out = DropJson {
            changed: outcome.changed(),
            outcome: describe_outcome(&outcome),
            board: board_to_json(&next, None),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", describe_outcome(&outcome));
        println!();
        for line in format_board(&next) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_task_add(ws: &Workspace, args: TaskAddArgs, json: bool) -> CmdResult {
    if ws.seed.project(&args.project).is_none() {
        return Err(format!("project not found: {}", args.project).into());
    }
    let status = args
        .status
        .as_deref()
        .map(parse_task_status)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let priority = args
        .priority
        .as_deref()
        .map(parse_priority)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let due = args
        .due
        .as_deref()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{}': {}", d, e))
        })
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;

    let context = TaskContext {
        project_id: Some(args.project.clone()),
        workstream_id: args.workstream,
        workstream_name: None,
    };
    let today = Local::now().date_naive();
    let mut form = TaskForm::open(&ws.seed, &context, &ws.config.defaults, today);
    form.draft.title = args.title;
    if let Some(s) = status {
        form.draft.status = s;
    }
    if priority.is_some() {
        form.draft.priority = priority;
    }
    form.draft.target_date = due;
    form.draft.tag = args.tag;

    let board = seed::workstream_board(&ws.seed, &args.project);
    let mut toast = RecordingToast::new();
    let (next, task) = form.create(&ws.seed, &board, &mut toast, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        if let Some((_, message)) = toast.last() {
            println!("{}", message);
        }
        let group = next
            .group(&task.workstream_id)
            .ok_or_else(|| format!("workstream not found: {}", task.workstream_id))?;
        println!("{}", format_group_header(group));
        for t in &group.tasks {
            println!("  {}", format_task_line(t));
        }
    }
    Ok(())
}
