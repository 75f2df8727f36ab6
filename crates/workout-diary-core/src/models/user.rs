// ABOUTME: User account and role models
// ABOUTME: Users carry a bcrypt password hash and references to their roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::NameRef;
use crate::document::{Document, Metadata, NamedDocument, UpdatableField};
use crate::errors::AppResult;

/// Application roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    /// Regular user
    #[serde(rename = "ROLE_USER")]
    User,
    /// Catalog curator
    #[serde(rename = "ROLE_MODERATOR")]
    Moderator,
    /// Full access
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl RoleName {
    /// Every role, in seeding order
    pub const ALL: [Self; 3] = [Self::User, Self::Moderator, Self::Admin];

    /// Stored name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Moderator => "ROLE_MODERATOR",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse a stored name (`ROLE_ADMIN`) or the short sign-up form (`admin`, `mod`, `user`)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ROLE_USER" | "USER" => Some(Self::User),
            "ROLE_MODERATOR" | "MODERATOR" | "MOD" => Some(Self::Moderator),
            "ROLE_ADMIN" | "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Role document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// `ROLE_*` name
    pub name: String,
}

impl Role {
    /// New role document
    #[must_use]
    pub fn new(name: RoleName) -> Self {
        Self {
            meta: Metadata::new(),
            name: name.as_str().to_owned(),
        }
    }

    /// Parsed role, if the stored name is known
    #[must_use]
    pub fn role_name(&self) -> Option<RoleName> {
        RoleName::parse(&self.name)
    }
}

impl Document for Role {
    const COLLECTION: &'static str = "user_roles";
    const LABEL: &'static str = "Role";
    const UNIQUE_NAME: bool = true;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn normalize_fields(&mut self) {
        self.name = Self::normalize_name(&self.name);
    }
}

impl NamedDocument for Role {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_name(name: &str) -> String {
        RoleName::parse(name).map_or_else(|| name.trim().to_uppercase(), |role| role.as_str().to_owned())
    }

    fn from_name(name: &str) -> Option<Self> {
        RoleName::parse(name).map(Self::new)
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Unique username
    pub name: String,
    /// Unique email, also the JWT subject
    pub email: String,
    /// bcrypt hash
    pub password: String,
    /// Date of birth
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Avatar URL
    #[serde(default, rename = "profilePicURL")]
    pub profile_pic_url: Option<String>,
    /// Free-form gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Granted roles
    #[serde(default)]
    pub roles: Vec<NameRef>,
}

impl User {
    /// New user with a pre-hashed password
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            meta: Metadata::new(),
            name,
            email,
            password: password_hash,
            birthday: None,
            profile_pic_url: None,
            gender: None,
            roles: Vec::new(),
        }
    }

    /// Parsed role names
    #[must_use]
    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles
            .iter()
            .filter_map(|role| RoleName::parse(&role.name))
            .collect()
    }

    /// Check for a role
    #[must_use]
    pub fn has_role(&self, role: RoleName) -> bool {
        self.role_names().contains(&role)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";
    const UNIQUE_NAME: bool = true;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[
            UpdatableField::required("name"),
            UpdatableField::required("email"),
            UpdatableField::secret("password"),
            UpdatableField::optional("birthday"),
            UpdatableField::optional("profilePicURL"),
            UpdatableField::optional("gender"),
        ];
        FIELDS
    }

    fn public_view(&self) -> AppResult<Value> {
        let mut view = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut view {
            map.remove("password");
        }
        Ok(view)
    }
}

impl NamedDocument for User {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_parsing() {
        assert_eq!(RoleName::parse("admin"), Some(RoleName::Admin));
        assert_eq!(RoleName::parse("mod"), Some(RoleName::Moderator));
        assert_eq!(RoleName::parse("ROLE_USER"), Some(RoleName::User));
        assert_eq!(RoleName::parse("owner"), None);
        assert_eq!(Role::normalize_name("admin"), "ROLE_ADMIN");
        assert!(Role::from_name("superuser").is_none());
    }

    #[test]
    fn test_public_view_hides_password() {
        let user = User::new("jack".into(), "jack@example.com".into(), "$2b$hash".into());
        let view = user.public_view().unwrap();

        assert!(view.get("password").is_none());
        assert_eq!(view["name"], "jack");
        assert!(view.get("profilePicURL").is_some());
    }
}
