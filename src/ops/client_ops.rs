use tracing::info;

use crate::model::client::{Client, ClientStatus};
use crate::model::project::Project;
use crate::ops::query::{self, CategoryFilter, QueryParams, QueryResult, Queryable, SortValue};

impl Queryable for Client {
    type Category = ClientStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ClientStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.primary_contact_name.as_deref());
        fields.extend(self.primary_contact_email.as_deref());
        fields
    }
}

/// Sortable columns of the client table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientSortKey {
    #[default]
    Name,
    /// Number of projects linked to the client
    Projects,
}

impl ClientSortKey {
    pub fn parse(s: &str) -> Option<ClientSortKey> {
        match s {
            "name" => Some(ClientSortKey::Name),
            "projects" => Some(ClientSortKey::Projects),
            _ => None,
        }
    }
}

/// Client table query
#[derive(Debug, Clone)]
pub struct ClientQuery {
    pub params: QueryParams<ClientStatus>,
    pub sort_key: ClientSortKey,
}

impl ClientQuery {
    pub fn new(page_size: usize) -> Self {
        ClientQuery {
            params: QueryParams::new(page_size),
            sort_key: ClientSortKey::Name,
        }
    }

    pub fn status(mut self, status: Option<ClientStatus>) -> Self {
        self.params.category = match status {
            Some(s) => CategoryFilter::Only(s),
            None => CategoryFilter::All,
        };
        self
    }
}

/// Run the client table pipeline. Name sorting ignores case; project
/// sorting counts projects whose client name matches exactly.
pub fn query_clients<'a>(
    clients: &'a [Client],
    projects: &[Project],
    q: &ClientQuery,
) -> QueryResult<'a, Client> {
    query::query(clients, &q.params, |c| match q.sort_key {
        ClientSortKey::Name => SortValue::Text(c.name.to_lowercase()),
        ClientSortKey::Projects => SortValue::Count(project_count_for_client(projects, &c.name)),
    })
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn client_by_id<'a>(clients: &'a [Client], id: &str) -> Option<&'a Client> {
    clients.iter().find(|c| c.id == id)
}

/// Case- and surrounding-whitespace-insensitive name lookup
pub fn client_by_name<'a>(clients: &'a [Client], name: &str) -> Option<&'a Client> {
    let normalized = name.trim().to_lowercase();
    clients
        .iter()
        .find(|c| c.name.trim().to_lowercase() == normalized)
}

pub fn project_count_for_client(projects: &[Project], client_name: &str) -> usize {
    related_projects(projects, client_name).count()
}

pub fn related_projects<'a>(
    projects: &'a [Project],
    client_name: &'a str,
) -> impl Iterator<Item = &'a Project> {
    projects
        .iter()
        .filter(move |p| p.client.as_deref() == Some(client_name))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert or update by id. On update, the fields the client form edits are
/// replaced as given (a `None` clears them); `segment` and
/// `last_activity_label` are kept unless the input sets them.
pub fn upsert_client(clients: &mut Vec<Client>, input: Client) -> Client {
    if let Some(existing) = clients.iter_mut().find(|c| c.id == input.id) {
        let segment = input.segment.or_else(|| existing.segment.take());
        let last_activity_label = input
            .last_activity_label
            .or_else(|| existing.last_activity_label.take());
        *existing = Client {
            segment,
            last_activity_label,
            ..input
        };
        info!(client = %existing.id, "updated client");
        return existing.clone();
    }
    info!(client = %input.id, "created client");
    clients.push(input.clone());
    input
}

/// Toast text for archiving the selected rows, `None` when nothing is
/// selected.
pub fn archive_message(selected: usize) -> Option<String> {
    match selected {
        0 => None,
        1 => Some("Archived 1 client (mock)".to_string()),
        n => Some(format!("Archived {} clients (mock)", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::seed;
    use pretty_assertions::assert_eq;

    fn client(id: &str, name: &str, status: ClientStatus) -> Client {
        Client {
            id: id.into(),
            name: name.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_search_matches_contact_name_any_case() {
        let clients = seed::clients();
        let mut q = ClientQuery::new(50);
        q.params.search_text = "sarah".into();
        let result = query_clients(&clients, &[], &q);
        let names: Vec<&str> = result.visible.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Corp"]);

        q.params.search_text = "SARAH".into();
        assert_eq!(query_clients(&clients, &[], &q).total_matches, 1);
    }

    #[test]
    fn test_search_matches_email() {
        let clients = seed::clients();
        let mut q = ClientQuery::new(50);
        q.params.search_text = "@northwind.example".into();
        let result = query_clients(&clients, &[], &q);
        assert_eq!(result.visible_ids(), vec!["northwind"]);
    }

    #[test]
    fn test_status_filter_before_search() {
        let clients = seed::clients();
        let q = ClientQuery::new(50).status(Some(ClientStatus::Archived));
        let result = query_clients(&clients, &[], &q);
        assert!(result.visible.iter().all(|c| c.status == ClientStatus::Archived));
        assert_eq!(result.total_matches, 3);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let clients = vec![
            client("b", "beta", ClientStatus::Active),
            client("a", "Alpha", ClientStatus::Active),
            client("c", "Gamma", ClientStatus::Active),
        ];
        let mut q = ClientQuery::new(50);
        assert_eq!(query_clients(&clients, &[], &q).visible_ids(), vec!["a", "b", "c"]);
        q.params.sort_direction = query::SortDirection::Desc;
        assert_eq!(query_clients(&clients, &[], &q).visible_ids(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_by_project_count_is_stable() {
        let clients = vec![
            client("x", "X", ClientStatus::Active),
            client("y", "Y", ClientStatus::Active),
            client("z", "Z", ClientStatus::Active),
        ];
        let mut p = Project::untitled("1");
        p.client = Some("Y".into());
        let projects = vec![p];
        let mut q = ClientQuery::new(50);
        q.sort_key = ClientSortKey::Projects;
        assert_eq!(query_clients(&clients, &projects, &q).visible_ids(), vec!["x", "z", "y"]);
    }

    #[test]
    fn test_client_by_name_normalizes() {
        let clients = seed::clients();
        assert_eq!(client_by_name(&clients, "  acme corp ").unwrap().id, "acme");
        assert!(client_by_name(&clients, "acme").is_none());
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let mut clients = vec![Client {
            segment: Some("Enterprise".into()),
            notes: Some("old".into()),
            ..client("acme", "Acme", ClientStatus::Active)
        }];

        upsert_client(&mut clients, client("new", "New", ClientStatus::Prospect));
        assert_eq!(clients.len(), 2);

        let saved = upsert_client(&mut clients, client("acme", "Acme Corp", ClientStatus::OnHold));
        assert_eq!(clients.len(), 2);
        assert_eq!(saved.name, "Acme Corp");
        assert_eq!(saved.status, ClientStatus::OnHold);
        assert_eq!(saved.segment.as_deref(), Some("Enterprise"));
        assert_eq!(saved.notes, None);
    }

    #[test]
    fn test_archive_message() {
        assert_eq!(archive_message(0), None);
        assert_eq!(archive_message(1).unwrap(), "Archived 1 client (mock)");
        assert_eq!(archive_message(3).unwrap(), "Archived 3 clients (mock)");
    }
}
