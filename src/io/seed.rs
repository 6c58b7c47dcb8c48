use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::config_io::WorkspaceError;
use crate::model::board::{Board, Group, GroupKind};
use crate::model::client::{Client, ClientStatus};
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::TaskStatus::{Done, InProgress, Todo};
use crate::model::task::{DueTone, Priority, Task, TaskStatus, User};

/// The in-memory data source every view starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Default for Seed {
    fn default() -> Self {
        Seed {
            clients: clients(),
            projects: projects(),
        }
    }
}

impl Seed {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

/// Read a seed from a JSON file.
pub fn load_seed(path: &Path) -> Result<Seed, WorkspaceError> {
    let text = fs::read_to_string(path).map_err(|e| WorkspaceError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

// id, name, status, industry, website, location, owner, contact, email,
// segment, last activity
type ClientRow = (
    &'static str,
    &'static str,
    ClientStatus,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

/// Built-in client list
#[rustfmt::skip]
pub fn clients() -> Vec<Client> {
    use ClientStatus::*;
    let rows: &[ClientRow] = &[
        ("acme", "Acme Corp", Active, "Fintech", "https://acme.example", "Singapore",
         "Jason Duong", "Sarah Lee", "sarah.lee@acme.example", "Enterprise", "3 days ago"),
        ("healthplus", "HealthPlus", Prospect, "Healthcare", "https://healthplus.example", "Australia",
         "Alex Chen", "Maria Gomez", "maria.gomez@healthplus.example", "Prospect", "Yesterday"),
        ("shopline", "Shopline Retail", Active, "E-commerce", "https://shopline.example", "Vietnam",
         "Jason Duong", "Thanh Nguyen", "thanh.nguyen@shopline.example", "Growth", "1 hour ago"),
        ("northwind", "Northwind Bank", OnHold, "Banking", "https://northwind.example", "United Kingdom",
         "Emma Wright", "Oliver Smith", "oliver.smith@northwind.example", "Enterprise", "2 weeks ago"),
        ("atlas-logistics", "Atlas Logistics", Active, "Logistics", "https://atlaslogistics.example", "Germany",
         "Alex Morgan", "Hannah Bauer", "hannah.bauer@atlaslogistics.example", "Mid-market", "5 hours ago"),
        ("greenleaf", "GreenLeaf Health", Prospect, "Healthcare", "https://greenleaf.example", "Canada",
         "Sarah Chen", "Daniel Ross", "daniel.ross@greenleaf.example", "Prospect", "3 days ago"),
        ("stellar-pay", "StellarPay", Active, "Payments", "https://stellarpay.example", "United States",
         "Jason Duong", "Linda Johnson", "linda.johnson@stellarpay.example", "Growth", "Today"),
        ("orbit-travel", "Orbit Travel", Archived, "Travel", "https://orbittravel.example", "Spain",
         "Alex Chen", "Carlos Diaz", "carlos.diaz@orbittravel.example", "SMB", "6 months ago"),
        ("bright-edu", "Bright Education Group", Active, "Education", "https://brightedu.example", "Singapore",
         "Emma Wright", "Grace Tan", "grace.tan@brightedu.example", "Mid-market", "4 days ago"),
        ("nova-insights", "Nova Insights", Prospect, "Analytics", "https://novainsights.example", "United States",
         "Sarah Chen", "Ethan Lee", "ethan.lee@novainsights.example", "Prospect", "2 hours ago"),
        ("harbor-retail", "Harbor Retail Group", OnHold, "Retail", "https://harborretail.example", "Australia",
         "Jason Duong", "Amelia Clark", "amelia.clark@harborretail.example", "SMB", "1 month ago"),
        ("quantum-hr", "Quantum HR Solutions", Active, "HR Tech", "https://quantumhr.example", "Netherlands",
         "Alex Morgan", "Noah Visser", "noah.visser@quantumhr.example", "Mid-market", "Yesterday"),
        ("sunrise-homes", "Sunrise Homes", Active, "Real Estate", "https://sunrisehomes.example", "Vietnam",
         "Jason Duong", "Minh Tran", "minh.tran@sunrisehomes.example", "SMB", "5 days ago"),
        ("polar-tech", "Polar Tech Labs", Prospect, "SaaS", "https://polartech.example", "Sweden",
         "Sarah Chen", "Sofia Lind", "sofia.lind@polartech.example", "Prospect", "Today"),
        ("metro-media", "Metro Media", Archived, "Media", "https://metromedia.example", "United States",
         "Alex Chen", "James Carter", "james.carter@metromedia.example", "Enterprise", "1 year ago"),
        ("alpha-sports", "Alpha Sports", Active, "Sports", "https://alphasports.example", "Canada",
         "Emma Wright", "Lucas Martin", "lucas.martin@alphasports.example", "Growth", "2 days ago"),
        ("zen-finance", "Zen Finance", OnHold, "Fintech", "https://zenfinance.example", "Hong Kong",
         "Jason Duong", "Karen Wong", "karen.wong@zenfinance.example", "Mid-market", "3 weeks ago"),
        ("vista-energy", "Vista Energy", Active, "Energy", "https://vistaenergy.example", "United States",
         "Alex Morgan", "Robert King", "robert.king@vistaenergy.example", "Enterprise", "8 hours ago"),
        ("cloudworks", "CloudWorks Studio", Prospect, "Design", "https://cloudworks.example", "France",
         "Sarah Chen", "Chloe Dubois", "chloe.dubois@cloudworks.example", "Prospect", "4 hours ago"),
        ("rapid-lanes", "Rapid Lanes Logistics", Active, "Logistics", "https://rapidlanes.example", "Malaysia",
         "Emma Wright", "Ahmad Zain", "ahmad.zain@rapidlanes.example", "SMB", "Yesterday"),
        ("horizon-foods", "Horizon Foods", Archived, "FMCG", "https://horizonfoods.example", "Thailand",
         "Jason Duong", "Ananda Chai", "ananda.chai@horizonfoods.example", "Mid-market", "9 months ago"),
    ];

    rows.iter()
        .map(
            |&(id, name, status, industry, website, location, owner, contact, email, segment, activity)| {
                Client {
                    id: id.to_string(),
                    name: name.to_string(),
                    status,
                    industry: Some(industry.to_string()),
                    website: Some(website.to_string()),
                    location: Some(location.to_string()),
                    owner: Some(owner.to_string()),
                    primary_contact_name: Some(contact.to_string()),
                    primary_contact_email: Some(email.to_string()),
                    notes: client_notes(id).map(str::to_string),
                    segment: Some(segment.to_string()),
                    last_activity_label: Some(activity.to_string()),
                }
            },
        )
        .collect()
}

fn client_notes(id: &str) -> Option<&'static str> {
    match id {
        "acme" => Some("Key strategic client with multiple ongoing projects."),
        "healthplus" => Some("Early stage discussions for a new platform redesign."),
        "shopline" => Some("Multiple workstreams across web and mobile."),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn project(
    id: &str,
    name: &str,
    client: &str,
    status: ProjectStatus,
    priority: Priority,
    members: &[&str],
) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        client: Some(client.to_string()),
        status,
        priority,
        members: members.iter().map(|m| m.to_string()).collect(),
        type_label: Some("MVP".to_string()),
        duration_label: Some("2 weeks".to_string()),
    }
}

/// Built-in project list
pub fn projects() -> Vec<Project> {
    vec![
        project(
            "1",
            "Fintech Mobile App Redesign",
            "Acme Corp",
            ProjectStatus::Active,
            Priority::High,
            &["Jason Duong", "Emma Wright"],
        ),
        project(
            "2",
            "Patient Portal Discovery",
            "HealthPlus",
            ProjectStatus::Planned,
            Priority::Medium,
            &["Alex Chen"],
        ),
        project(
            "3",
            "Checkout Flow Revamp",
            "Shopline Retail",
            ProjectStatus::Active,
            Priority::Urgent,
            &["Jason Duong", "Sarah Chen"],
        ),
        project(
            "4",
            "Fleet Tracking Dashboard",
            "Atlas Logistics",
            ProjectStatus::Backlog,
            Priority::Low,
            &["Alex Morgan"],
        ),
        project(
            "5",
            "Payments SDK Documentation",
            "StellarPay",
            ProjectStatus::Completed,
            Priority::Medium,
            &[],
        ),
        project(
            "6",
            "Partner Knowledge Base",
            "Acme Corp",
            ProjectStatus::Planned,
            Priority::Low,
            &["Emma Wright"],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// Person in charge: the first member, or Jason Duong for projects
/// without members.
fn pic(project: &Project) -> User {
    let name = project
        .members
        .first()
        .map(String::as_str)
        .unwrap_or("Jason Duong");
    User::from_name(name, Some("PIC"))
}

struct TaskSeed {
    name: &'static str,
    status: TaskStatus,
    due: Option<(&'static str, DueTone)>,
    assigned: bool,
}

const fn step(
    name: &'static str,
    status: TaskStatus,
    due: Option<(&'static str, DueTone)>,
    assigned: bool,
) -> TaskSeed {
    TaskSeed {
        name,
        status,
        due,
        assigned,
    }
}

const GENERIC_WORKSTREAMS: &[(&str, &[TaskSeed])] = &[
    (
        "Initial discovery & alignment",
        &[
            step("Kickoff with stakeholders", Done, Some(("Today", DueTone::Muted)), true),
            step("Define problem statement", InProgress, Some(("Tomorrow", DueTone::Warning)), true),
            step("Collect existing assets", Todo, None, false),
        ],
    ),
    (
        "Design & validation",
        &[
            step("Draft wireframes", Todo, None, false),
            step("Review with team", Todo, None, false),
        ],
    ),
];

const FLAGSHIP_WORKSTREAMS: &[(&str, &[TaskSeed])] = &[
    (
        "Processing documents for signing the deal",
        &[
            step("Processing documents for signing the deal", Done, Some(("Today", DueTone::Muted)), true),
            step("Internal approval & sign-off", Todo, Some(("Today", DueTone::Danger)), true),
            step("Send contract to client", Todo, Some(("Tomorrow", DueTone::Warning)), true),
            step("Track client signature", Todo, None, true),
        ],
    ),
    (
        "Client onboarding setup",
        &[
            step("Collect onboarding requirements", InProgress, Some(("This week", DueTone::Muted)), true),
            step("Configure sandbox account", Todo, None, true),
            step("Schedule onboarding session", Todo, None, true),
        ],
    ),
    (
        "Product wireframe & review",
        &[
            step("Prepare low-fidelity wireframes", Todo, None, true),
            step("Review with stakeholders", Todo, None, true),
        ],
    ),
    (
        "Demo UI Concept",
        &[step("Prepare clickable prototype", Todo, None, true)],
    ),
    (
        "Feedback and iteration with stakeholders",
        &[step("Collect feedback from stakeholders", Todo, None, true)],
    ),
];

/// Workstreams of a project. Project `1` has its own plan; every other
/// project gets the two generic workstreams.
pub fn project_workstreams(project: &Project) -> Vec<Group> {
    let plan = if project.id == "1" {
        FLAGSHIP_WORKSTREAMS
    } else {
        GENERIC_WORKSTREAMS
    };
    let assignee = pic(project);

    plan.iter()
        .enumerate()
        .map(|(wi, (ws_name, tasks))| {
            let ws_id = format!("{}-ws-{}", project.id, wi + 1);
            let tasks = tasks
                .iter()
                .enumerate()
                .map(|(ti, s)| {
                    let mut task = Task::new(format!("{}-t{}", ws_id, ti + 1), s.name)
                        .with_status(s.status)
                        .with_assignee(s.assigned.then(|| assignee.clone()))
                        .in_workstream(&ws_id, ws_name)
                        .in_project(&project.id, &project.name);
                    if let Some((label, tone)) = s.due {
                        task = task.with_due(label, tone);
                    }
                    task
                })
                .collect();
            Group::new(ws_id, *ws_name).with_tasks(tasks)
        })
        .collect()
}

/// Workstream board of one project; unknown ids get an untitled project.
pub fn workstream_board(seed: &Seed, project_id: &str) -> Board {
    let project = seed
        .project(project_id)
        .cloned()
        .unwrap_or_else(|| Project::untitled(project_id));
    Board::new(GroupKind::Workstream, project_workstreams(&project))
}

/// Aggregated board: one group per project that has tasks.
pub fn my_tasks_board(seed: &Seed) -> Board {
    let groups = seed
        .projects
        .iter()
        .map(|p| {
            let tasks = project_workstreams(p)
                .into_iter()
                .flat_map(|g| g.tasks)
                .collect();
            Group::new(p.id.clone(), p.name.clone()).with_tasks(tasks)
        })
        .filter(|g| !g.is_empty())
        .collect();
    Board::new(GroupKind::Project, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_clients() {
        let clients = clients();
        assert_eq!(clients.len(), 21);
        assert_eq!(clients[0].id, "acme");
        assert_eq!(clients[0].primary_contact_name.as_deref(), Some("Sarah Lee"));
        assert_eq!(
            clients
                .iter()
                .filter(|c| c.status == ClientStatus::Archived)
                .count(),
            3
        );
        assert_eq!(clients.iter().filter(|c| c.notes.is_some()).count(), 3);
    }

    #[test]
    fn test_generic_workstreams() {
        let seed = Seed::default();
        let board = workstream_board(&seed, "2");
        assert_eq!(board.kind, GroupKind::Workstream);
        let order: Vec<(String, usize)> = board
            .order()
            .into_iter()
            .map(|(group, ids)| (group, ids.len()))
            .collect();
        assert_eq!(order, vec![("2-ws-1".to_string(), 3), ("2-ws-2".to_string(), 2)]);
        let kickoff = board.find_task("2-ws-1-t1").unwrap();
        assert_eq!(kickoff.status, TaskStatus::Done);
        assert_eq!(kickoff.assignee.as_ref().unwrap().name, "Alex Chen");
        assert_eq!(kickoff.project_name, "Patient Portal Discovery");
        assert!(board.find_task("2-ws-1-t3").unwrap().assignee.is_none());
    }

    #[test]
    fn test_flagship_project_plan() {
        let board = workstream_board(&Seed::default(), "1");
        assert_eq!(board.groups.len(), 5);
        assert_eq!(board.total_tasks(), 11);
        assert_eq!(board.groups[3].name, "Demo UI Concept");
        assert!(board.flat().all(|t| t.assignee.is_some()));
    }

    #[test]
    fn test_memberless_project_defaults_pic() {
        let board = workstream_board(&Seed::default(), "5");
        let task = board.find_task("5-ws-1-t1").unwrap();
        assert_eq!(task.assignee.as_ref().unwrap().name, "Jason Duong");
        assert_eq!(task.assignee.as_ref().unwrap().id, "jason-duong");
    }

    #[test]
    fn test_unknown_project_is_untitled() {
        let board = workstream_board(&Seed::default(), "99");
        assert_eq!(board.flat().next().unwrap().project_name, "Untitled project 99");
    }

    #[test]
    fn test_my_tasks_board_groups_by_project() {
        let seed = Seed::default();
        let board = my_tasks_board(&seed);
        assert_eq!(board.kind, GroupKind::Project);
        assert_eq!(board.groups.len(), seed.projects.len());
        assert_eq!(board.groups[0].len(), 11);
        assert!(board.groups[1].tasks.iter().all(|t| t.project_id == "2"));
    }

    #[test]
    fn test_load_seed_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"clients":[{{"id":"x","name":"X","status":"on_hold"}}],"projects":[]}}"#
        )
        .unwrap();
        let seed = load_seed(file.path()).unwrap();
        assert_eq!(seed.clients.len(), 1);
        assert_eq!(seed.clients[0].status, ClientStatus::OnHold);
        assert!(seed.projects.is_empty());
    }

    #[test]
    fn test_load_seed_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_seed(file.path()),
            Err(WorkspaceError::SeedParseError(_))
        ));
    }
}
