//! DTOs module - Data Transfer Objects
//!
//! Request bodies (`Create*DTO`, `Update*DTO`), list filters (`*Query`) and
//! the realtime frames. DTOs keep the wire representation separate from the
//! stored entities.

pub mod activity;
pub mod client;
pub mod material_spec;
pub mod notification;
pub mod procurement;
pub mod project;
pub mod project_update;
pub mod query;
pub mod shop_drawing;
pub mod task;
pub mod team_member;
pub mod user;
pub mod ws_event;

pub use activity::{ActivityQuery, CreateActivityDTO};
pub use client::{ClientQuery, CreateClientDTO, UpdateClientDTO};
pub use material_spec::{CreateMaterialSpecDTO, MaterialSpecQuery, UpdateMaterialSpecDTO};
pub use notification::{CreateNotificationDTO, NotificationQuery, UpdateNotificationDTO};
pub use procurement::{CreateProcurementItemDTO, ProcurementQuery, UpdateProcurementItemDTO};
pub use project::{CreateProjectDTO, ProjectQuery, UpdateProjectDTO};
pub use project_update::{CreateProjectUpdateDTO, ProjectUpdateQuery, UpdateProjectUpdateDTO};
pub use query::{Pagination, PaginationQuery};
pub use shop_drawing::{CreateShopDrawingDTO, ShopDrawingQuery, UpdateShopDrawingDTO};
pub use task::{CreateTaskDTO, TaskQuery, UpdateTaskDTO};
pub use team_member::{CreateTeamMemberDTO, TeamMemberQuery, UpdateTeamMemberDTO};
pub use user::{CreateUserDTO, UpdateUserDTO, UserQuery};
pub use ws_event::{ActivityEvent, ClientEvent, NotificationEvent, ServerEvent};

use serde::{Deserialize, Deserializer};

/// Strips surrounding whitespace so that `length(min = 1)` rejects blank text
pub(crate) fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

pub(crate) fn trimmed_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| s.trim().to_string()))
}
