//! MemoryRepository - demo-mode storage
//!
//! Each collection is a `Vec` behind one `tokio::sync::RwLock`: reads run
//! concurrently, writes are serialized. Unique keys are enforced here with the
//! same `StoreError::Conflict` the database reports.

use super::traits::{Create, Delete, List, Page, Read, Resource, Update, new_record_id};
use super::StoreError;
use crate::dtos::Pagination;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

pub struct MemoryRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Resource> MemoryRepository<R> {
    pub fn new(seed: Vec<R>) -> Self {
        Self {
            records: RwLock::new(seed),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Newest first, then id ascending
fn listing_order<R: Resource>(a: &R, b: &R) -> Ordering {
    b.sort_key()
        .cmp(&a.sort_key())
        .then_with(|| a.id().cmp(b.id()))
}

/// Fails when another record already holds `candidate`'s unique key
fn ensure_unique<R: Resource>(records: &[R], candidate: &R) -> Result<(), StoreError> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };
    let taken = records
        .iter()
        .filter(|r| r.id() != candidate.id())
        .any(|r| r.unique_key().as_deref() == Some(key.as_str()));
    if taken {
        return Err(StoreError::Conflict(format!("{}: {}", R::TABLE, key)));
    }
    Ok(())
}

impl<R: Resource> Create<R, R::Create> for MemoryRepository<R> {
    #[instrument(skip(self, data), fields(table = R::TABLE))]
    async fn create(&self, data: R::Create) -> Result<R, StoreError> {
        let record = R::build(new_record_id(), data, Utc::now())?;

        let mut records = self.records.write().await;
        ensure_unique(&records, &record)?;
        records.push(record.clone());

        info!(id = record.id(), "Record created in memory");
        Ok(record)
    }
}

impl<R: Resource> Read<R> for MemoryRepository<R> {
    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn read(&self, id: &str) -> Result<Option<R>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }
}

impl<R: Resource> List<R, R::Filter> for MemoryRepository<R> {
    #[instrument(skip(self, filter), fields(table = R::TABLE, page = pagination.page, limit = pagination.limit))]
    async fn list(&self, filter: &R::Filter, pagination: Pagination) -> Result<Page<R>, StoreError> {
        let records = self.records.read().await;
        let mut matching: Vec<&R> = records.iter().filter(|r| r.matches(filter)).collect();
        matching.sort_by(|a, b| listing_order(*a, *b));

        let total = matching.len() as u64;
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let items: Vec<R> = matching
            .into_iter()
            .skip(offset)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        debug!(total, returned = items.len(), "Listed records");
        Ok(Page { items, total })
    }
}

impl<R: Resource> Update<R, R::Update> for MemoryRepository<R> {
    #[instrument(skip(self, data), fields(table = R::TABLE))]
    async fn update(&self, id: &str, data: R::Update) -> Result<R, StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;

        let mut record = records[index].clone();
        record.apply(data, Utc::now());
        ensure_unique(&records, &record)?;
        records[index] = record.clone();

        info!("Record updated in memory");
        Ok(record)
    }
}

impl<R: Resource> Delete for MemoryRepository<R> {
    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;
        records.remove(index);

        info!("Record deleted from memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::{ClientQuery, CreateClientDTO, CreateTeamMemberDTO, UpdateClientDTO};
    use crate::dtos::{TeamMemberQuery, UpdateTeamMemberDTO};
    use crate::entities::{Client, TeamMember};
    use chrono::{Duration, TimeZone};

    fn client(id: &str, name: &str, minutes: i64) -> Client {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes);
        Client {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            company: None,
            address: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn new_client(name: &str) -> CreateClientDTO {
        CreateClientDTO {
            name: name.to_string(),
            email: None,
            phone: None,
            company: Some("Northwind".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let repo = MemoryRepository::<Client>::new(Vec::new());
        let created = repo.create(new_client("Harbour Authority")).await.unwrap();
        assert!(!created.id.is_empty());

        let fetched = repo.read(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Harbour Authority");
        assert!(repo.read("404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_id_tie_break() {
        let repo = MemoryRepository::new(vec![
            client("1", "Oldest", 0),
            client("3", "Tied B", 10),
            client("2", "Tied A", 10),
            client("4", "Newest", 20),
        ]);
        let page = repo
            .list(&ClientQuery::default(), Pagination::default())
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["4", "2", "3", "1"]);
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_filters_apply_before_pagination() {
        let seed = (1..=25)
            .map(|i| client(&i.to_string(), &format!("Site {}", i), i))
            .chain([client("99", "Quarry Co", 0)])
            .collect();
        let repo = MemoryRepository::new(seed);

        let filter = ClientQuery {
            search: Some("site".to_string()),
        };
        let page = repo
            .list(&filter, Pagination { page: 2, limit: 20 })
            .await
            .unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.items.len(), 5);

        let beyond = repo
            .list(&filter, Pagination { page: 9, limit: 20 })
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 25);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() {
        let repo = MemoryRepository::new(vec![client("1", "Acme", 0)]);

        let updated = repo
            .update(
                "1",
                UpdateClientDTO {
                    address: Some("1 Quay St".to_string()),
                    ..UpdateClientDTO::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address.as_deref(), Some("1 Quay St"));
        assert_eq!(updated.name, "Acme");
        assert!(updated.updated_at > updated.created_at);

        assert!(matches!(
            repo.update("2", UpdateClientDTO::default()).await,
            Err(StoreError::NotFound)
        ));
        repo.delete("1").await.unwrap();
        assert!(matches!(repo.delete("1").await, Err(StoreError::NotFound)));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_unique_key_conflict() {
        let repo = MemoryRepository::<TeamMember>::new(Vec::new());
        let member = || CreateTeamMemberDTO {
            project_id: "1".to_string(),
            user_id: "2".to_string(),
            role: "site_manager".to_string(),
        };
        let first = repo.create(member()).await.unwrap();
        assert!(matches!(
            repo.create(member()).await,
            Err(StoreError::Conflict(_))
        ));

        // Updating the holder itself is not a conflict
        let same = repo
            .update(
                &first.id,
                UpdateTeamMemberDTO {
                    role: Some("foreman".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(same.role, "foreman");

        let filter = TeamMemberQuery {
            project_id: Some("1".to_string()),
            ..TeamMemberQuery::default()
        };
        let page = repo.list(&filter, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }
}
