use serde::{Deserialize, Serialize};

use crate::models::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Anything other than "admin" is an ordinary user.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Who is browsing. Built once and handed to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub token: Option<String>,
    pub role: Role,
    pub user_id: Option<u64>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, role: Role, user_id: u64) -> Self {
        Self {
            token: Some(token.into()),
            role,
            user_id: Some(user_id),
        }
    }

    /// Bearer token, if one is present and not blank.
    pub fn bearer(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, listing: &Listing) -> bool {
        matches!((self.user_id, listing.user_id), (Some(me), Some(seller)) if me == seller)
    }

    pub fn can_delete(&self, listing: &Listing) -> bool {
        self.is_authenticated() && (self.owns(listing) || self.is_admin())
    }

    /// Ratings are only offered to signed-in users.
    pub fn can_rate(&self) -> bool {
        self.is_authenticated()
    }
}
