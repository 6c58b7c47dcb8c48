use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::form::rich_text::{RichTextEditor, SectionFlags, TemplateKind};
use crate::model::config::DefaultsConfig;
use crate::util::slug::initials;

// ---------------------------------------------------------------------------
// Draft record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    Quick,
    Guided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectIntent {
    Delivery,
    Experiment,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessType {
    Deliverable,
    Metric,
    #[default]
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineType {
    #[default]
    None,
    Target,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStructure {
    Linear,
    Milestones,
    Multistream,
}

/// Access granted to a contributor or stakeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    CanEdit,
    CanView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub account_id: String,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// New-project wizard state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub mode: Option<ProjectMode>,
    pub intent: Option<ProjectIntent>,
    pub success_type: SuccessType,
    pub deliverables: Vec<Deliverable>,
    pub metrics: Vec<Metric>,
    pub description: Option<String>,
    pub deadline_type: DeadlineType,
    pub deadline_date: Option<NaiveDate>,
    pub owner_id: Option<String>,
    pub contributor_ids: Vec<String>,
    pub stakeholder_ids: Vec<String>,
    pub contributor_ownerships: Vec<Ownership>,
    pub stakeholder_ownerships: Vec<Ownership>,
    pub structure: Option<WorkStructure>,
    pub add_starter_tasks: bool,
    pub client_id: Option<String>,
}

/// Partial update of a [`ProjectDraft`]. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraftPatch {
    pub mode: Option<ProjectMode>,
    pub intent: Option<ProjectIntent>,
    pub success_type: Option<SuccessType>,
    pub deliverables: Option<Vec<Deliverable>>,
    pub metrics: Option<Vec<Metric>>,
    pub description: Option<String>,
    pub deadline_type: Option<DeadlineType>,
    pub deadline_date: Option<NaiveDate>,
    pub owner_id: Option<String>,
    pub contributor_ids: Option<Vec<String>>,
    pub stakeholder_ids: Option<Vec<String>>,
    pub contributor_ownerships: Option<Vec<Ownership>>,
    pub stakeholder_ownerships: Option<Vec<Ownership>>,
    pub structure: Option<WorkStructure>,
    pub add_starter_tasks: Option<bool>,
    pub client_id: Option<String>,
}

macro_rules! merge {
    ($draft:expr, $patch:expr, [$($field:ident),* $(,)?], [$($opt:ident),* $(,)?]) => {
        $(if let Some(v) = $patch.$field { $draft.$field = v; })*
        $(if let Some(v) = $patch.$opt { $draft.$opt = Some(v); })*
    };
}

impl ProjectDraft {
    /// Shallow merge; fields absent from the patch are kept.
    pub fn update_field(&mut self, patch: ProjectDraftPatch) {
        merge!(
            self,
            patch,
            [
                success_type,
                deliverables,
                metrics,
                deadline_type,
                contributor_ids,
                stakeholder_ids,
                contributor_ownerships,
                stakeholder_ownerships,
                add_starter_tasks,
            ],
            [
                mode,
                intent,
                description,
                deadline_date,
                owner_id,
                structure,
                client_id,
            ]
        );
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Someone who can own or follow a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub initials: String,
}

impl Account {
    fn new(id: &str, name: &str, email: &str) -> Self {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            initials: initials(name),
        }
    }
}

pub fn default_accounts() -> Vec<Account> {
    vec![
        Account::new("jason-d", "Jason D", "jason.duong@mail.com"),
        Account::new("alex-morgan", "Alex Morgan", "alex.morgan@workspace.com"),
        Account::new("sarah-chen", "Sarah Chen", "sarah.chen@workspace.com"),
        Account::new("mike-ross", "Mike Ross", "mike.ross@workspace.com"),
        Account::new("harrold", "Harrold", "harrold@workspace.com"),
        Account::new("james", "James", "james.boarnd@workspace.com"),
        Account::new("mitch", "Mitch", "mitch.sato@workspace.com"),
    ]
}

/// Which ownership list an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Contributor,
    Stakeholder,
}

impl Role {
    pub fn default_access(self) -> Access {
        match self {
            Role::Contributor => Access::CanEdit,
            Role::Stakeholder => Access::CanView,
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Project wizard: the draft, the known accounts and the description editor.
#[derive(Debug, Clone)]
pub struct ProjectWizard {
    draft: ProjectDraft,
    accounts: Vec<Account>,
    editor: RichTextEditor,
}

impl ProjectWizard {
    /// Fresh wizard. Ownership defaults are applied here and nowhere else,
    /// so a list the user empties stays empty.
    pub fn new(defaults: &DefaultsConfig) -> Self {
        let mut wizard = ProjectWizard::resume(ProjectDraft::default());
        wizard.apply_defaults(defaults);
        wizard
    }

    /// Reopen an existing draft. Defaults are never applied to it.
    pub fn resume(draft: ProjectDraft) -> Self {
        let editor = RichTextEditor::new(draft.description.as_deref().unwrap_or(""));
        ProjectWizard {
            draft,
            accounts: default_accounts(),
            editor,
        }
    }

    fn apply_defaults(&mut self, defaults: &DefaultsConfig) {
        if self.draft.owner_id.is_none() {
            self.draft.owner_id = Some(defaults.project_owner.clone());
        }
        if self.draft.contributor_ownerships.is_empty() {
            self.sync(Role::Contributor, ownerships(&defaults.contributors, Access::CanEdit));
        }
        if self.draft.stakeholder_ownerships.is_empty() {
            self.sync(Role::Stakeholder, ownerships(&defaults.stakeholders, Access::CanView));
        }
        debug!("project wizard defaults applied");
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Owner account, falling back to the first known account
    pub fn owner(&self) -> Option<&Account> {
        self.draft
            .owner_id
            .as_deref()
            .and_then(|id| self.account(id))
            .or_else(|| self.accounts.first())
    }

    pub fn sections(&self) -> SectionFlags {
        self.editor.sections()
    }

    pub fn editor_html(&self) -> &str {
        self.editor.html()
    }

    /// Merge a patch; a new description is pushed into the editor.
    pub fn update_field(&mut self, patch: ProjectDraftPatch) {
        self.draft.update_field(patch);
        self.editor
            .sync_from_external(self.draft.description.as_deref());
    }

    /// A description edit made in the editor
    pub fn edit_description(&mut self, html: &str) {
        let html = self.editor.on_update(html).to_string();
        self.draft.description = Some(html);
    }

    pub fn insert_template(&mut self, kind: TemplateKind) {
        let html = self.editor.insert_template(kind).to_string();
        self.draft.description = Some(html);
    }

    fn list(&self, role: Role) -> &[Ownership] {
        match role {
            Role::Contributor => &self.draft.contributor_ownerships,
            Role::Stakeholder => &self.draft.stakeholder_ownerships,
        }
    }

    /// Set an ownership list and the matching id list together.
    fn sync(&mut self, role: Role, list: Vec<Ownership>) {
        let ids = list.iter().map(|o| o.account_id.clone()).collect();
        match role {
            Role::Contributor => {
                self.draft.contributor_ownerships = list;
                self.draft.contributor_ids = ids;
            }
            Role::Stakeholder => {
                self.draft.stakeholder_ownerships = list;
                self.draft.stakeholder_ids = ids;
            }
        }
    }

    /// Add someone by email or name. Unknown values become a temporary
    /// account. Returns the account id, or `None` for a blank query or an
    /// account already on the list.
    pub fn add_member(&mut self, role: Role, query: &str) -> Option<String> {
        let value = query.trim();
        if value.is_empty() {
            return None;
        }
        let needle = value.to_lowercase();
        let existing = self
            .accounts
            .iter()
            .find(|a| a.email.to_lowercase() == needle || a.name.to_lowercase() == needle)
            .map(|a| a.id.clone());
        let account_id = match existing {
            Some(id) => id,
            None => self.add_temp_account(value),
        };

        if self.list(role).iter().any(|o| o.account_id == account_id) {
            return None;
        }
        let mut next = self.list(role).to_vec();
        next.push(Ownership {
            account_id: account_id.clone(),
            access: role.default_access(),
        });
        self.sync(role, next);
        Some(account_id)
    }

    fn add_temp_account(&mut self, value: &str) -> String {
        let (name, email) = match value.split_once('@') {
            Some((local, _)) => (local.replace(['.', '_'], " "), value.to_string()),
            None => (value.to_string(), String::new()),
        };
        let mut stamp = chrono::Utc::now().timestamp_millis();
        while self.account(&format!("temp-{}", stamp)).is_some() {
            stamp += 1;
        }
        let id = format!("temp-{}", stamp);
        self.accounts.push(Account {
            id: id.clone(),
            initials: initials(&name),
            name,
            email,
        });
        id
    }

    pub fn set_access(&mut self, role: Role, account_id: &str, access: Access) {
        let next = self
            .list(role)
            .iter()
            .map(|o| {
                if o.account_id == account_id {
                    Ownership {
                        account_id: o.account_id.clone(),
                        access,
                    }
                } else {
                    o.clone()
                }
            })
            .collect();
        self.sync(role, next);
    }

    pub fn remove_member(&mut self, role: Role, account_id: &str) {
        let next = self
            .list(role)
            .iter()
            .filter(|o| o.account_id != account_id)
            .cloned()
            .collect();
        self.sync(role, next);
    }
}

fn ownerships(ids: &[String], access: Access) -> Vec<Ownership> {
    ids.iter()
        .map(|id| Ownership {
            account_id: id.clone(),
            access,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wizard() -> ProjectWizard {
        ProjectWizard::new(&DefaultsConfig::default())
    }

    #[test]
    fn test_defaults_on_mount() {
        let w = wizard();
        let d = w.draft();
        assert_eq!(d.owner_id.as_deref(), Some("jason-d"));
        assert_eq!(d.contributor_ids, vec!["harrold"]);
        assert_eq!(d.contributor_ownerships[0].access, Access::CanEdit);
        assert_eq!(d.stakeholder_ids, vec!["james", "mitch"]);
        assert!(d.stakeholder_ownerships.iter().all(|o| o.access == Access::CanView));
        assert_eq!(w.owner().unwrap().name, "Jason D");
    }

    #[test]
    fn test_defaults_not_reapplied_after_clearing() {
        let mut w = wizard();
        w.remove_member(Role::Contributor, "harrold");
        w.update_field(ProjectDraftPatch {
            intent: Some(ProjectIntent::Experiment),
            ..Default::default()
        });
        assert!(w.draft().contributor_ids.is_empty());
        assert!(w.draft().contributor_ownerships.is_empty());
    }

    #[test]
    fn test_resume_keeps_draft_as_is() {
        let w = ProjectWizard::resume(ProjectDraft::default());
        assert_eq!(w.draft().owner_id, None);
        assert!(w.draft().stakeholder_ids.is_empty());
    }

    #[test]
    fn test_update_field_shallow_merge() {
        let mut w = wizard();
        w.update_field(ProjectDraftPatch {
            mode: Some(ProjectMode::Guided),
            deadline_type: Some(DeadlineType::Fixed),
            ..Default::default()
        });
        w.update_field(ProjectDraftPatch {
            add_starter_tasks: Some(true),
            ..Default::default()
        });
        let d = w.draft();
        assert_eq!(d.mode, Some(ProjectMode::Guided));
        assert_eq!(d.deadline_type, DeadlineType::Fixed);
        assert!(d.add_starter_tasks);
        assert_eq!(d.owner_id.as_deref(), Some("jason-d"));
    }

    #[test]
    fn test_add_existing_account_by_email_or_name() {
        let mut w = wizard();
        assert_eq!(
            w.add_member(Role::Contributor, "  SARAH.CHEN@workspace.com "),
            Some("sarah-chen".to_string())
        );
        assert_eq!(
            w.add_member(Role::Stakeholder, "mike ross"),
            Some("mike-ross".to_string())
        );
        assert_eq!(w.draft().contributor_ids, vec!["harrold", "sarah-chen"]);
        assert_eq!(
            w.draft().stakeholder_ownerships.last().unwrap(),
            &Ownership {
                account_id: "mike-ross".into(),
                access: Access::CanView
            }
        );
    }

    #[test]
    fn test_add_duplicate_and_blank_are_ignored() {
        let mut w = wizard();
        assert_eq!(w.add_member(Role::Contributor, "Harrold"), None);
        assert_eq!(w.add_member(Role::Contributor, "   "), None);
        assert_eq!(w.draft().contributor_ids, vec!["harrold"]);
    }

    #[test]
    fn test_add_unknown_email_creates_temp_account() {
        let mut w = wizard();
        let id = w.add_member(Role::Contributor, "lee_ann.park@corp.example").unwrap();
        assert!(id.starts_with("temp-"));
        let account = w.account(&id).unwrap();
        assert_eq!(account.name, "lee ann park");
        assert_eq!(account.email, "lee_ann.park@corp.example");

        let other = w.add_member(Role::Stakeholder, "Rita").unwrap();
        assert_ne!(other, id);
        assert_eq!(w.account(&other).unwrap().email, "");
    }

    #[test]
    fn test_set_access_and_remove_keep_lists_in_sync() {
        let mut w = wizard();
        w.set_access(Role::Stakeholder, "james", Access::CanEdit);
        assert_eq!(w.draft().stakeholder_ownerships[0].access, Access::CanEdit);
        assert_eq!(w.draft().stakeholder_ownerships[1].access, Access::CanView);

        w.remove_member(Role::Stakeholder, "james");
        assert_eq!(w.draft().stakeholder_ids, vec!["mitch"]);
        assert_eq!(w.draft().stakeholder_ownerships.len(), 1);
    }

    #[test]
    fn test_description_round_trips_through_editor() {
        let mut w = wizard();
        w.insert_template(TemplateKind::Goal);
        assert!(w.sections().goal);
        assert_eq!(w.draft().description.as_deref(), Some(w.editor_html()));

        w.update_field(ProjectDraftPatch {
            description: Some("<p>External</p>".into()),
            ..Default::default()
        });
        assert_eq!(w.editor_html(), "<p>External</p>");
        assert!(!w.sections().goal);

        w.edit_description("<p><strong>Key feature:</strong></p>");
        assert!(w.sections().feature);
        assert_eq!(
            w.draft().description.as_deref(),
            Some("<p><strong>Key feature:</strong></p>")
        );
    }
}
