//! Enumerations used by the entities
//!
//! Each enum maps to a PostgreSQL enum type of the same name (see
//! `migrations/`) and serializes in snake_case on the wire.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Admin,
    ProjectManager,
    Architect,
    Engineer,
    Contractor,
    Client,
    #[default]
    Viewer,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "project_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectType {
    Residential,
    #[default]
    Commercial,
    Industrial,
    Infrastructure,
    Renovation,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Completed,
    Blocked,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "drawing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DrawingStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    ReviseResubmit,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "material_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaterialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Ordered,
    Delivered,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "update_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateType {
    Progress,
    Issue,
    Milestone,
    #[default]
    General,
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, sqlx::Type,
)]
#[sqlx(type_name = "procurement_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcurementStatus {
    #[default]
    Requested,
    Quoted,
    Ordered,
    Shipped,
    Delivered,
    Cancelled,
}

/// The eleven resource types. The snake_case name is the realtime `type`
/// (`{type}_updated`) and the activity `entityType`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    User,
    Project,
    Task,
    Client,
    TeamMember,
    Notification,
    ShopDrawing,
    MaterialSpec,
    Activity,
    Update,
    ProcurementItem,
}

impl ResourceKind {
    /// URL segment under `/api/v1`
    pub fn segment(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Project => "projects",
            Self::Task => "tasks",
            Self::Client => "clients",
            Self::TeamMember => "team-members",
            Self::Notification => "notifications",
            Self::ShopDrawing => "shop-drawings",
            Self::MaterialSpec => "material-specs",
            Self::Activity => "activities",
            Self::Update => "updates",
            Self::ProcurementItem => "procurement",
        }
    }

    pub fn updated_event(&self) -> String {
        format!("{}_updated", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wire_names_match_display() {
        for kind in ResourceKind::iter() {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, kind.to_string());
        }
        assert_eq!(ProjectStatus::OnHold.to_string(), "on_hold");
        assert_eq!(
            serde_json::to_value(DrawingStatus::ReviseResubmit).unwrap(),
            "revise_resubmit"
        );
    }

    #[test]
    fn test_updated_event_names() {
        assert_eq!(ResourceKind::ShopDrawing.updated_event(), "shop_drawing_updated");
        assert_eq!(ResourceKind::Project.updated_event(), "project_updated");
        assert_eq!(ResourceKind::TeamMember.segment(), "team-members");
    }
}
