//! Repositories module - data access for every resource
//!
//! Two interchangeable backends implement the same CRUD traits:
//! - [`MemoryRepository`]: demo mode, seeded from [`fixtures`]
//! - [`PgRepository`]: production mode, PostgreSQL through `sqlx`
//!
//! [`Store`] wraps whichever backend was chosen at startup.
//!
//! Queries are built at runtime with `sqlx::QueryBuilder` rather than the
//! `query!` macros, so the crate compiles without a database at hand. Every
//! value still goes through a bind parameter; only the identifiers from
//! [`Resource`] constants are spliced into the SQL text.

pub mod error;
pub mod filter;
pub mod fixtures;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use store::Store;
pub use traits::{
    Create, Delete, Immutable, List, Page, Read, RecordId, Resource, Update, new_record_id,
    patch, patch_opt,
};
