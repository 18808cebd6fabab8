//! Store - the repository a resource uses for the whole process lifetime.
//!
//! The backend is picked once at startup; handlers only see the CRUD traits.

use super::memory::MemoryRepository;
use super::postgres::PgRepository;
use super::traits::{Create, Delete, List, Page, Read, Resource, Update};
use super::StoreError;
use crate::dtos::Pagination;
use sqlx::PgPool;

pub enum Store<R> {
    Memory(MemoryRepository<R>),
    Postgres(PgRepository<R>),
}

impl<R: Resource> Store<R> {
    pub fn memory(seed: Vec<R>) -> Self {
        Self::Memory(MemoryRepository::new(seed))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(PgRepository::new(pool))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl<R: Resource> Create<R, R::Create> for Store<R> {
    async fn create(&self, data: R::Create) -> Result<R, StoreError> {
        match self {
            Self::Memory(repo) => repo.create(data).await,
            Self::Postgres(repo) => repo.create(data).await,
        }
    }
}

impl<R: Resource> Read<R> for Store<R> {
    async fn read(&self, id: &str) -> Result<Option<R>, StoreError> {
        match self {
            Self::Memory(repo) => repo.read(id).await,
            Self::Postgres(repo) => repo.read(id).await,
        }
    }
}

impl<R: Resource> List<R, R::Filter> for Store<R> {
    async fn list(&self, filter: &R::Filter, pagination: Pagination) -> Result<Page<R>, StoreError> {
        match self {
            Self::Memory(repo) => repo.list(filter, pagination).await,
            Self::Postgres(repo) => repo.list(filter, pagination).await,
        }
    }
}

impl<R: Resource> Update<R, R::Update> for Store<R> {
    async fn update(&self, id: &str, data: R::Update) -> Result<R, StoreError> {
        match self {
            Self::Memory(repo) => repo.update(id, data).await,
            Self::Postgres(repo) => repo.update(id, data).await,
        }
    }
}

impl<R: Resource> Delete for Store<R> {
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(repo) => repo.delete(id).await,
            Self::Postgres(repo) => repo.delete(id).await,
        }
    }
}
