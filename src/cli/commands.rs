use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - projects, workstreams and clients"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ./taskboard.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Seed data JSON file (default: built-in mock data)
    #[arg(long, global = true)]
    pub seed: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the aggregated task board, grouped by project
    Tasks(TasksArgs),
    /// Show one project's workstreams
    Workstreams(WorkstreamsArgs),
    /// List clients (filter, search, sort, paginate)
    Clients(ClientsArgs),
    /// Show a client with its projects
    Client(ClientArgs),
    /// Create or update a client
    ClientAdd(ClientAddArgs),
    /// Toggle a task between done and open
    Toggle(ToggleArgs),
    /// Reorder a task within a workstream
    Reorder(ReorderArgs),
    /// Move a task to another workstream
    Move(MoveArgs),
    /// Simulate dragging one task onto another
    Drag(DragArgs),
    /// Quick-create a task
    TaskAdd(TaskAddArgs),
    /// Validate every board
    Check,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TasksArgs {
    /// Member filter chip: a name, "no member" or "current member" (repeatable)
    #[arg(long)]
    pub member: Vec<String>,
}

#[derive(Args)]
pub struct WorkstreamsArgs {
    /// Project ID
    pub project: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Name,
    Projects,
}

#[derive(Args)]
pub struct ClientsArgs {
    /// Status filter (prospect, active, on_hold, archived)
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive search over name, contact and email
    #[arg(long)]
    pub search: Option<String>,
    /// Sort column
    #[arg(long, value_enum, default_value = "name")]
    pub sort: SortColumn,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Page to show (clamped to the available pages)
    #[arg(long, default_value = "1")]
    pub page: usize,
    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args)]
pub struct ClientArgs {
    /// Client ID (unknown IDs show the first client)
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ClientAddArgs {
    /// Client name (required, trimmed)
    #[arg(long, default_value = "")]
    pub name: String,
    /// Edit this existing client instead of creating one
    #[arg(long)]
    pub edit: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub contact_name: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID, e.g. 1-ws-1-t2
    pub id: String,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Project ID
    pub project: String,
    /// Workstream ID
    pub group: String,
    /// Current index (0-based)
    pub from: usize,
    /// New index (0-based)
    pub to: usize,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Project ID
    pub project: String,
    /// Task ID
    pub task: String,
    /// Target workstream ID
    pub target: String,
    /// Insert position in the target (default: end)
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DragView {
    /// Aggregated board; same-project drops only by default
    Tasks,
    /// One project's workstreams; cross-workstream drops allowed by default
    Workstreams,
}

#[derive(Args)]
pub struct DragArgs {
    /// Task being dragged
    pub active: String,
    /// Task it is dropped on
    pub over: Option<String>,
    #[arg(long, value_enum, default_value = "workstreams")]
    pub view: DragView,
    /// Project for the workstreams view (default: the dragged task's project)
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Project ID
    #[arg(long)]
    pub project: String,
    /// Workstream ID (default: the project's first)
    #[arg(long)]
    pub workstream: Option<String>,
    /// Task title (blank becomes "Untitled task")
    #[arg(long, default_value = "")]
    pub title: String,
    /// Status (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Priority (no-priority, low, medium, high, urgent)
    #[arg(long)]
    pub priority: Option<String>,
    /// Target date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
}
