//! Client entity - the customer a project is built for

use crate::dtos::{ClientQuery, CreateClientDTO, UpdateClientDTO};
use crate::repositories::filter::{Conditions, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Client {
    type Create = CreateClientDTO;
    type Update = UpdateClientDTO;
    type Filter = ClientQuery;

    const TABLE: &'static str = "clients";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "company",
        "address",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Client";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn build(id: RecordId, data: CreateClientDTO, now: DateTime<Utc>) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            company: data.company,
            address: data.address,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateClientDTO, now: DateTime<Utc>) {
        patch(&mut self.name, data.name);
        patch_opt(&mut self.email, data.email);
        patch_opt(&mut self.phone, data.phone);
        patch_opt(&mut self.company, data.company);
        patch_opt(&mut self.address, data.address);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ClientQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[
                Some(self.name.as_str()),
                self.email.as_deref(),
                self.company.as_deref(),
            ],
        )
    }

    fn push_filters(filter: &ClientQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["name", "email", "company"], filter.search.as_deref());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name)
            .push_bind(self.email)
            .push_bind(self.phone)
            .push_bind(self.company)
            .push_bind(self.address)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
