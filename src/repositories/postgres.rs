//! PgRepository - production storage
//!
//! Queries are assembled at runtime from [`Resource::COLUMNS`], so a single
//! generic implementation serves every table. Only the listed columns are
//! ever selected.

use super::filter::Conditions;
use super::traits::{Create, Delete, List, Page, Read, Resource, Update, new_record_id};
use super::StoreError;
use crate::dtos::Pagination;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

pub struct PgRepository<R> {
    pool: PgPool,
    _entity: PhantomData<fn() -> R>,
}

impl<R: Resource> PgRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn columns() -> String {
        R::COLUMNS.join(", ")
    }

    fn select() -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!("SELECT {} FROM {}", Self::columns(), R::TABLE))
    }
}

impl<R: Resource> Create<R, R::Create> for PgRepository<R> {
    #[instrument(skip(self, data), fields(table = R::TABLE))]
    async fn create(&self, data: R::Create) -> Result<R, StoreError> {
        let record = R::build(new_record_id(), data, Utc::now())?;
        let hidden = record.hidden_values();

        let mut query = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", R::TABLE));
        query.push(Self::columns());
        for (column, _) in &hidden {
            query.push(", ").push(*column);
        }
        query.push(") VALUES (");
        {
            let mut row = query.separated(", ");
            record.bind_values(&mut row);
            for (_, value) in hidden {
                row.push_bind(value);
            }
        }
        query.push(") RETURNING ").push(Self::columns());

        let created = query.build_query_as::<R>().fetch_one(&self.pool).await?;
        info!(id = created.id(), "Record inserted");
        Ok(created)
    }
}

impl<R: Resource> Read<R> for PgRepository<R> {
    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn read(&self, id: &str) -> Result<Option<R>, StoreError> {
        let mut query = Self::select();
        query.push(" WHERE id = ").push_bind(id.to_string());
        let record = query.build_query_as::<R>().fetch_optional(&self.pool).await?;
        Ok(record)
    }
}

impl<R: Resource> List<R, R::Filter> for PgRepository<R> {
    #[instrument(skip(self, filter), fields(table = R::TABLE, page = pagination.page, limit = pagination.limit))]
    async fn list(&self, filter: &R::Filter, pagination: Pagination) -> Result<Page<R>, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        R::push_filters(filter, &mut Conditions::new(&mut count));
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool).await?;

        let mut query = Self::select();
        R::push_filters(filter, &mut Conditions::new(&mut query));
        query
            .push(format!(" ORDER BY {} DESC, id ASC LIMIT ", R::SORT_COLUMN))
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pagination.offset()).unwrap_or(i64::MAX));
        let items = query.build_query_as::<R>().fetch_all(&self.pool).await?;

        debug!(total, returned = items.len(), "Listed records");
        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

impl<R: Resource> Update<R, R::Update> for PgRepository<R> {
    /// Read-modify-write under `SELECT ... FOR UPDATE`, so concurrent patches
    /// to the same row apply one after the other
    #[instrument(skip(self, data), fields(table = R::TABLE))]
    async fn update(&self, id: &str, data: R::Update) -> Result<R, StoreError> {
        let mut tx = self.pool.begin().await?;

        let mut select = Self::select();
        select
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" FOR UPDATE");
        let mut record = select
            .build_query_as::<R>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        record.apply(data, Utc::now());

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET ({}) = ROW(",
            R::TABLE,
            Self::columns()
        ));
        {
            let mut row = query.separated(", ");
            record.bind_values(&mut row);
        }
        query
            .push(") WHERE id = ")
            .push_bind(id.to_string())
            .push(" RETURNING ")
            .push(Self::columns());
        let updated = query.build_query_as::<R>().fetch_one(&mut *tx).await?;

        tx.commit().await?;
        info!("Record updated");
        Ok(updated)
    }
}

impl<R: Resource> Delete for PgRepository<R> {
    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("DELETE FROM {} WHERE id = ", R::TABLE));
        query.push_bind(id.to_string());
        let result = query.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        info!("Record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Project, User};

    #[test]
    fn test_column_list_never_includes_password_hash() {
        let columns = PgRepository::<User>::columns();
        assert!(columns.starts_with("id, email"));
        assert!(!columns.contains("password"));
    }

    #[test]
    fn test_select_statement() {
        let query = PgRepository::<Project>::select();
        assert!(query.sql().starts_with("SELECT id, name, project_type, "));
        assert!(query.sql().ends_with(" FROM projects"));
    }
}
