use serde::{Deserialize, Serialize};

/// Configuration from taskboard.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub clients: ClientsConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub detail: DetailConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        ClientsConfig {
            page_size: default_page_size(),
        }
    }
}

/// Whether drops may move a task into another group, per view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Aggregated "my tasks" view, grouped by project
    #[serde(default)]
    pub my_tasks_cross_group: bool,
    /// Per-project view, grouped by workstream
    #[serde(default = "default_true")]
    pub workstreams_cross_group: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            my_tasks_cross_group: false,
            workstreams_cross_group: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_client_owner")]
    pub client_owner: String,
    #[serde(default = "default_project_owner")]
    pub project_owner: String,
    #[serde(default = "default_contributors")]
    pub contributors: Vec<String>,
    #[serde(default = "default_stakeholders")]
    pub stakeholders: Vec<String>,
    #[serde(default = "default_client_owner")]
    pub task_assignee: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            client_owner: default_client_owner(),
            project_owner: default_project_owner(),
            contributors: default_contributors(),
            stakeholders: default_stakeholders(),
            task_assignee: default_client_owner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
}

impl Default for DetailConfig {
    fn default() -> Self {
        DetailConfig {
            load_delay_ms: default_load_delay_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    7
}

fn default_client_owner() -> String {
    "Jason Duong".to_string()
}

fn default_project_owner() -> String {
    "jason-d".to_string()
}

fn default_contributors() -> Vec<String> {
    vec!["harrold".to_string()]
}

fn default_stakeholders() -> Vec<String> {
    vec!["james".to_string(), "mitch".to_string()]
}

fn default_load_delay_ms() -> u64 {
    400
}
