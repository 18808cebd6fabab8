//! Entities module - the records served by the REST API
//!
//! Every entity maps to one table (see `migrations/`) and implements
//! [`Resource`](crate::repositories::Resource), which both repository
//! backends are written against.

pub mod activity;
pub mod client;
pub mod enums;
pub mod material_spec;
pub mod notification;
pub mod procurement;
pub mod project;
pub mod project_update;
pub mod shop_drawing;
pub mod task;
pub mod team_member;
pub mod user;

pub use activity::Activity;
pub use client::Client;
pub use enums::{
    DrawingStatus, MaterialStatus, NotificationType, ProcurementStatus, ProjectStatus,
    ProjectType, ResourceKind, TaskPriority, TaskStatus, UpdateType, UserRole,
};
pub use material_spec::MaterialSpec;
pub use notification::Notification;
pub use procurement::ProcurementItem;
pub use project::Project;
pub use project_update::ProjectUpdate;
pub use shop_drawing::ShopDrawing;
pub use task::Task;
pub use team_member::TeamMember;
pub use user::User;
