use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MosqueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    Imam,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Imam => "imam",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = MosqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "imam" => Ok(Role::Imam),
            "admin" => Ok(Role::Admin),
            _ => Err(MosqueError::validation(format!(
                "unknown role '{}', expected guest, imam or admin",
                s
            ))),
        }
    }
}

/// Who is acting, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub role: Role,
    /// Mosque the imam is associated with, once an admin has verified it.
    pub mosque_id: Option<i64>,
}

impl Session {
    pub fn guest() -> Self {
        Self {
            user: "guest".to_string(),
            role: Role::Guest,
            mosque_id: None,
        }
    }
}
