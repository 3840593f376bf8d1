use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::StorageScope;

/// Access/refresh token pair handed out by an authentication provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// Profile ids are numeric for credential logins and fabricated strings for guests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_guest: bool,
}

/// An authenticated session and the storage scope it lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub tokens: AuthTokens,
    pub user: UserProfile,
    pub scope: StorageScope,
}
