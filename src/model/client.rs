use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Prospect,
    #[default]
    Active,
    OnHold,
    Archived,
}

impl ClientStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Prospect => "Prospect",
            ClientStatus::Active => "Active",
            ClientStatus::OnHold => "On hold",
            ClientStatus::Archived => "Archived",
        }
    }

    /// Parse the wire name (`prospect`, `active`, `on_hold`, `archived`)
    pub fn parse(s: &str) -> Option<ClientStatus> {
        match s {
            "prospect" => Some(ClientStatus::Prospect),
            "active" => Some(ClientStatus::Active),
            "on_hold" => Some(ClientStatus::OnHold),
            "archived" => Some(ClientStatus::Archived),
            _ => None,
        }
    }
}

/// A client account and its primary contact
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_label: Option<String>,
}
