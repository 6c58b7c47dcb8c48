use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::client::Client;
use crate::model::project::Project;
use crate::ops::client_ops;

/// Simulated fetch of one client's detail view.
///
/// The data is already in memory; the delay only drives the loading
/// skeleton. The clock is passed in so callers and tests control it.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailLoad {
    Loading { client_id: String, deadline: Instant },
    Ready(Client),
    Cancelled,
}

impl DetailLoad {
    pub fn start(client_id: &str, now: Instant, delay: Duration) -> Self {
        debug!(client = client_id, delay_ms = delay.as_millis() as u64, "detail load started");
        DetailLoad::Loading {
            client_id: client_id.to_string(),
            deadline: now + delay,
        }
    }

    /// Advance the load. Once the deadline passes the client is resolved,
    /// falling back to the first client for unknown ids.
    pub fn poll(&mut self, now: Instant, clients: &[Client]) -> Option<&Client> {
        if let DetailLoad::Loading {
            client_id,
            deadline,
        } = self
        {
            if now < *deadline {
                return None;
            }
            let client = client_ops::client_by_id(clients, client_id).or_else(|| clients.first());
            match client {
                Some(c) => *self = DetailLoad::Ready(c.clone()),
                None => {
                    debug!(client = %client_id, "no clients to show");
                    *self = DetailLoad::Cancelled;
                }
            }
        }
        match self {
            DetailLoad::Ready(c) => Some(c),
            _ => None,
        }
    }

    /// Drop the pending load, e.g. on navigating away. A finished load is
    /// left as is.
    pub fn cancel(&mut self) {
        if matches!(self, DetailLoad::Loading { .. }) {
            *self = DetailLoad::Cancelled;
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailLoad::Loading { .. })
    }
}

/// A resolved client with the projects linked to it by name
#[derive(Debug, Clone)]
pub struct ClientDetail<'a> {
    pub client: &'a Client,
    pub projects: Vec<&'a Project>,
}

pub fn client_detail<'a>(client: &'a Client, projects: &'a [Project]) -> ClientDetail<'a> {
    ClientDetail {
        client,
        projects: client_ops::related_projects(projects, &client.name).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::seed;

    const DELAY: Duration = Duration::from_millis(400);

    #[test]
    fn test_loading_until_deadline() {
        let clients = seed::clients();
        let t0 = Instant::now();
        let mut load = DetailLoad::start("shopline", t0, DELAY);

        assert!(load.poll(t0 + Duration::from_millis(399), &clients).is_none());
        assert!(load.is_loading());

        let client = load.poll(t0 + DELAY, &clients).unwrap();
        assert_eq!(client.name, "Shopline Retail");
        assert!(!load.is_loading());
    }

    #[test]
    fn test_unknown_id_falls_back_to_first_client() {
        let clients = seed::clients();
        let t0 = Instant::now();
        let mut load = DetailLoad::start("nope", t0, Duration::ZERO);
        assert_eq!(load.poll(t0, &clients).unwrap().id, "acme");
    }

    #[test]
    fn test_cancel_drops_pending_load() {
        let clients = seed::clients();
        let t0 = Instant::now();
        let mut load = DetailLoad::start("acme", t0, DELAY);
        load.cancel();
        assert_eq!(load, DetailLoad::Cancelled);
        assert!(load.poll(t0 + DELAY, &clients).is_none());
    }

    #[test]
    fn test_cancel_after_ready_is_ignored() {
        let clients = seed::clients();
        let t0 = Instant::now();
        let mut load = DetailLoad::start("acme", t0, Duration::ZERO);
        load.poll(t0, &clients);
        load.cancel();
        assert!(matches!(load, DetailLoad::Ready(_)));
    }

    #[test]
    fn test_client_detail_lists_related_projects() {
        let clients = seed::clients();
        let projects = seed::projects();
        let acme = client_ops::client_by_id(&clients, "acme").unwrap();
        let detail = client_detail(acme, &projects);
        assert!(!detail.projects.is_empty());
        assert!(
            detail
                .projects
                .iter()
                .all(|p| p.client.as_deref() == Some("Acme Corp"))
        );
    }
}
