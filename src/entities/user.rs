//! User entity

use super::enums::UserRole;
use crate::dtos::{CreateUserDTO, UpdateUserDTO, UserQuery};
use crate::repositories::filter::{Conditions, eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use bcrypt::{DEFAULT_COST, hash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Never selected from the database and never sent to clients
    #[serde(skip_serializing, default)]
    #[sqlx(default)]
    pub password_hash: Option<String>,
}

impl User {
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Resource for User {
    type Create = CreateUserDTO;
    type Update = UpdateUserDTO;
    type Filter = UserQuery;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "first_name",
        "last_name",
        "role",
        "phone",
        "company",
        "is_active",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(id: RecordId, data: CreateUserDTO, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let password_hash = Self::hash_password(&data.password)?;
        Ok(Self {
            id,
            email: normalize_email(&data.email),
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role.unwrap_or_default(),
            phone: data.phone,
            company: data.company,
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            password_hash: Some(password_hash),
        })
    }

    fn apply(&mut self, data: UpdateUserDTO, now: DateTime<Utc>) {
        patch(&mut self.email, data.email.as_deref().map(normalize_email));
        patch(&mut self.first_name, data.first_name);
        patch(&mut self.last_name, data.last_name);
        patch(&mut self.role, data.role);
        patch_opt(&mut self.phone, data.phone);
        patch_opt(&mut self.company, data.company);
        patch(&mut self.is_active, data.is_active);
        self.updated_at = now;
    }

    fn matches(&self, filter: &UserQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[
                Some(self.email.as_str()),
                Some(self.first_name.as_str()),
                Some(self.last_name.as_str()),
                self.company.as_deref(),
            ],
        ) && eq_matches(filter.role.as_ref(), &self.role)
            && eq_matches(filter.is_active.as_ref(), &self.is_active)
    }

    fn push_filters(filter: &UserQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(
            &["email", "first_name", "last_name", "company"],
            filter.search.as_deref(),
        );
        conditions.eq("role", filter.role);
        conditions.eq("is_active", filter.is_active);
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.email)
            .push_bind(self.first_name)
            .push_bind(self.last_name)
            .push_bind(self.role)
            .push_bind(self.phone)
            .push_bind(self.company)
            .push_bind(self.is_active)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }

    fn hidden_values(&self) -> Vec<(&'static str, String)> {
        self.password_hash
            .iter()
            .map(|hash| ("password_hash", hash.clone()))
            .collect()
    }

    fn unique_key(&self) -> Option<String> {
        Some(normalize_email(&self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateUserDTO {
        CreateUserDTO {
            email: "  Jane.Doe@Example.COM ".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password: "s3cret-pass".to_string(),
            role: None,
            phone: None,
            company: Some("Acme Builders".to_string()),
            is_active: None,
        }
    }

    #[test]
    fn test_build_hashes_password_and_applies_defaults() {
        let user = User::build("7".to_string(), create_dto(), Utc::now()).unwrap();
        assert_eq!(user.email, "jane.doe@example.com");
        assert_eq!(user.role, UserRole::Viewer);
        assert!(user.is_active);

        let stored = user.password_hash.as_deref().unwrap();
        assert_ne!(stored, "s3cret-pass");
        assert!(bcrypt::verify("s3cret-pass", stored).unwrap());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::build("7".to_string(), create_dto(), Utc::now()).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(user.hidden_values().len(), 1);
    }

    #[test]
    fn test_search_covers_company() {
        let user = User::build("7".to_string(), create_dto(), Utc::now()).unwrap();
        let filter = UserQuery {
            search: Some("acme".to_string()),
            ..UserQuery::default()
        };
        assert!(user.matches(&filter));
    }
}
