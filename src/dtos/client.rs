//! Client DTOs

use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ClientQuery {
    pub search: Option<String>,
}
