use tracing::warn;

use crate::form::{FormError, trimmed};
use crate::model::client::{Client, ClientStatus};
use crate::model::config::DefaultsConfig;
use crate::ops::client_ops;
use crate::toast::Toast;
use crate::util::slug::slugify;

/// Raw field values as typed into the client form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientDraft {
    pub name: String,
    pub status: ClientStatus,
    pub primary_contact_name: String,
    pub primary_contact_email: String,
    pub industry: String,
    pub website: String,
    pub location: String,
    pub owner: String,
    pub notes: String,
}

/// Partial update; `None` fields are left alone
#[derive(Debug, Clone, Default)]
pub struct ClientDraftPatch {
    pub name: Option<String>,
    pub status: Option<ClientStatus>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

impl ClientDraft {
    fn from_client(client: &Client) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        ClientDraft {
            name: client.name.clone(),
            status: client.status,
            primary_contact_name: text(&client.primary_contact_name),
            primary_contact_email: text(&client.primary_contact_email),
            industry: text(&client.industry),
            website: text(&client.website),
            location: text(&client.location),
            owner: text(&client.owner),
            notes: text(&client.notes),
        }
    }

    pub fn update_field(&mut self, patch: ClientDraftPatch) {
        let ClientDraftPatch {
            name,
            status,
            primary_contact_name,
            primary_contact_email,
            industry,
            website,
            location,
            owner,
            notes,
        } = patch;
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = primary_contact_name {
            self.primary_contact_name = v;
        }
        if let Some(v) = primary_contact_email {
            self.primary_contact_email = v;
        }
        if let Some(v) = industry {
            self.industry = v;
        }
        if let Some(v) = website {
            self.website = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = owner {
            self.owner = v;
        }
        if let Some(v) = notes {
            self.notes = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the client with this id
    Edit(String),
}

/// Create/edit client form
#[derive(Debug, Clone)]
pub struct ClientForm {
    mode: FormMode,
    pub draft: ClientDraft,
    open: bool,
}

impl ClientForm {
    /// Empty form with the configured default owner
    pub fn create(defaults: &DefaultsConfig) -> Self {
        ClientForm {
            mode: FormMode::Create,
            draft: ClientDraft {
                owner: defaults.client_owner.clone(),
                ..Default::default()
            },
            open: true,
        }
    }

    pub fn edit(client: &Client) -> Self {
        ClientForm {
            mode: FormMode::Edit(client.id.clone()),
            draft: ClientDraft::from_client(client),
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn update_field(&mut self, patch: ClientDraftPatch) {
        self.draft.update_field(patch);
    }

    /// Normalized record for the current draft
    fn build(&self) -> Result<Client, FormError> {
        let name = self.draft.name.trim();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }
        let id = match &self.mode {
            FormMode::Edit(id) => id.clone(),
            FormMode::Create => slugify(name),
        };
        let d = &self.draft;
        Ok(Client {
            id,
            name: name.to_string(),
            status: d.status,
            industry: trimmed(&d.industry),
            website: trimmed(&d.website),
            location: trimmed(&d.location),
            owner: trimmed(&d.owner),
            primary_contact_name: trimmed(&d.primary_contact_name),
            primary_contact_email: trimmed(&d.primary_contact_email),
            notes: trimmed(&d.notes),
            segment: None,
            last_activity_label: None,
        })
    }

    /// Validate and upsert. On failure the error is toasted, the form stays
    /// open and `clients` is untouched.
    pub fn save(
        &mut self,
        clients: &mut Vec<Client>,
        toast: &mut dyn Toast,
    ) -> Result<Client, FormError> {
        let record = match self.build() {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "client form rejected");
                toast.error(&e.to_string());
                return Err(e);
            }
        };
        let saved = client_ops::upsert_client(clients, record);
        toast.success(match self.mode {
            FormMode::Edit(_) => "Client updated",
            FormMode::Create => "Client created",
        });
        self.open = false;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::seed;
    use crate::toast::{RecordingToast, ToastKind};
    use pretty_assertions::assert_eq;

    fn patch_name(name: &str) -> ClientDraftPatch {
        ClientDraftPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let mut clients = seed::clients();
        let before = clients.clone();
        let mut toast = RecordingToast::new();
        let mut form = ClientForm::create(&DefaultsConfig::default());
        form.update_field(patch_name("   "));

        assert_eq!(form.save(&mut clients, &mut toast), Err(FormError::NameRequired));
        assert_eq!(clients, before);
        assert!(form.is_open());
        assert_eq!(
            toast.last(),
            Some(&(ToastKind::Error, "Client name is required".to_string()))
        );
    }

    #[test]
    fn test_create_normalizes_fields() {
        let mut clients = Vec::new();
        let mut toast = RecordingToast::new();
        let mut form = ClientForm::create(&DefaultsConfig::default());
        form.update_field(ClientDraftPatch {
            name: Some("  Blue  Ocean Labs ".into()),
            primary_contact_email: Some(" ana@blue.example ".into()),
            website: Some("   ".into()),
            ..Default::default()
        });

        let saved = form.save(&mut clients, &mut toast).unwrap();
        assert_eq!(saved.id, "blue-ocean-labs");
        assert_eq!(saved.name, "Blue  Ocean Labs");
        assert_eq!(saved.primary_contact_email.as_deref(), Some("ana@blue.example"));
        assert_eq!(saved.website, None);
        assert_eq!(saved.owner.as_deref(), Some("Jason Duong"));
        assert_eq!(clients.len(), 1);
        assert!(!form.is_open());
        assert_eq!(toast.last().unwrap().1, "Client created");
    }

    #[test]
    fn test_update_field_keeps_other_fields() {
        let mut form = ClientForm::create(&DefaultsConfig::default());
        form.update_field(ClientDraftPatch {
            industry: Some("Fintech".into()),
            ..Default::default()
        });
        form.update_field(patch_name("Acme"));
        assert_eq!(form.draft.industry, "Fintech");
        assert_eq!(form.draft.name, "Acme");
        assert_eq!(form.draft.owner, "Jason Duong");
    }

    #[test]
    fn test_edit_reuses_id_and_updates_in_place() {
        let mut clients = seed::clients();
        let acme = clients[0].clone();
        let mut toast = RecordingToast::new();
        let mut form = ClientForm::edit(&acme);
        assert_eq!(form.mode(), &FormMode::Edit("acme".into()));
        form.update_field(patch_name("Acme Holdings"));

        let saved = form.save(&mut clients, &mut toast).unwrap();
        assert_eq!(saved.id, "acme");
        assert_eq!(clients.len(), 21);
        assert_eq!(clients[0].name, "Acme Holdings");
        assert_eq!(clients[0].segment.as_deref(), Some("Enterprise"));
        assert_eq!(toast.last().unwrap().1, "Client updated");
    }
}
