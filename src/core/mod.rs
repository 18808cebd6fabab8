//! Core Module - infrastructure shared by the whole application
//!
//! - Demo identity middleware
//! - Configuration
//! - Error handling and the response envelope
//! - Request extractors
//! - Application state and startup mode selection

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod state;

// Re-exports for shorter imports
pub use auth::{CurrentUser, demo_user_middleware};
pub use config::Config;
pub use error::AppError;
pub use extract::{AppQuery, RecordIdPath, ValidatedJson, is_valid_record_id};
pub use response::{error_response, paginated_response, success_response};
pub use state::{AppState, DataMode};
