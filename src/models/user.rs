use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

/// Row shape read for the admin client picker.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<ClientRow> for ClientSummary {
    fn from(row: ClientRow) -> Self {
        let name = [row.first_name.as_deref(), row.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let name = if name.is_empty() {
            row.email.clone()
        } else {
            name
        };

        Self {
            id: row.id,
            name,
            email: row.email,
        }
    }
}
