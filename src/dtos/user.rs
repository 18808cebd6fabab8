//! User DTOs

use crate::entities::UserRole;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

/// `POST /users` body. The password is hashed before storage and never echoed.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDTO {
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub is_active: Option<bool>,
}

/// `PUT /users/:id` body; the password cannot be changed here
#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDTO {
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}
