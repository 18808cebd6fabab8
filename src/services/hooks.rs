//! Per-resource wiring: which store serves the resource, the defaults taken
//! from the requesting user and the realtime events a write triggers.

use super::RestResource;
use crate::core::{AppState, CurrentUser};
use crate::dtos::{
    ActivityEvent, CreateActivityDTO, CreateProjectDTO, CreateProjectUpdateDTO, NotificationEvent,
};
use crate::entities::{
    Activity, Client, MaterialSpec, Notification, NotificationType, ProcurementItem, Project,
    ProjectUpdate, ResourceKind, ShopDrawing, Task, TeamMember, User,
};
use crate::repositories::Store;
use crate::ws::{broadcast_activity, broadcast_notification, broadcast_project_update, project_update};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

fn to_payload<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or_else(|e| {
        error!("Failed to serialize broadcast payload: {:?}", e);
        Value::Null
    })
}

impl RestResource for Project {
    const KIND: ResourceKind = ResourceKind::Project;
    const PLURAL: &'static str = "Projects";

    fn store(state: &AppState) -> &Store<Self> {
        &state.projects
    }

    fn prepare_create(data: &mut CreateProjectDTO, user: &CurrentUser) {
        data.created_by = Some(user.id.clone());
    }

    fn created(state: &AppState, project: &Self, user: &CurrentUser) {
        let activity = ActivityEvent::new("created", Self::KIND, Some(project.id.clone()))
            .in_project(Some(project.id.clone()))
            .by(user.id.clone())
            .describe(format!("Created project \"{}\"", project.name));
        broadcast_activity(&state.hub, &activity);

        let notification = NotificationEvent {
            title: "New project created".to_string(),
            message: format!("{} created project \"{}\"", user.display_name(), project.name),
            notification_type: NotificationType::Info,
            project_id: Some(project.id.clone()),
            timestamp: Utc::now(),
        };
        let reached = broadcast_notification(&state.hub, &notification, None);
        debug!(reached, "Project creation announced");
    }

    fn updated(state: &AppState, project: &Self, user: &CurrentUser) {
        broadcast_project_update(
            &state.hub,
            &project.id,
            project_update::UPDATED,
            to_payload(project),
        );

        let activity = ActivityEvent::new("updated", Self::KIND, Some(project.id.clone()))
            .in_project(Some(project.id.clone()))
            .by(user.id.clone())
            .describe(format!("Updated project \"{}\"", project.name));
        broadcast_activity(&state.hub, &activity);
    }

    fn deleted(state: &AppState, id: &str, _user: &CurrentUser) {
        broadcast_project_update(
            &state.hub,
            id,
            project_update::DELETED,
            json!({ "id": id }),
        );
    }
}

impl RestResource for Notification {
    const KIND: ResourceKind = ResourceKind::Notification;
    const PLURAL: &'static str = "Notifications";

    fn store(state: &AppState) -> &Store<Self> {
        &state.notifications
    }

    fn created(state: &AppState, notification: &Self, _user: &CurrentUser) {
        broadcast_notification(&state.hub, notification, Some(&notification.user_id));
    }
}

impl RestResource for Activity {
    const KIND: ResourceKind = ResourceKind::Activity;
    const PLURAL: &'static str = "Activities";

    fn store(state: &AppState) -> &Store<Self> {
        &state.activities
    }

    fn prepare_create(data: &mut CreateActivityDTO, user: &CurrentUser) {
        if data.user_id.is_none() {
            data.user_id = Some(user.id.clone());
        }
    }

    fn created(state: &AppState, activity: &Self, _user: &CurrentUser) {
        broadcast_activity(&state.hub, &ActivityEvent::from(activity));
    }
}

impl RestResource for ProjectUpdate {
    const KIND: ResourceKind = ResourceKind::Update;
    const PLURAL: &'static str = "Project updates";

    fn store(state: &AppState) -> &Store<Self> {
        &state.updates
    }

    fn prepare_create(data: &mut CreateProjectUpdateDTO, user: &CurrentUser) {
        if data.author_id.is_none() {
            data.author_id = Some(user.id.clone());
        }
    }

    fn created(state: &AppState, update: &Self, _user: &CurrentUser) {
        broadcast_project_update(
            &state.hub,
            &update.project_id,
            project_update::UPDATE_POSTED,
            to_payload(update),
        );
    }
}

impl RestResource for User {
    const KIND: ResourceKind = ResourceKind::User;
    const PLURAL: &'static str = "Users";

    fn store(state: &AppState) -> &Store<Self> {
        &state.users
    }
}

impl RestResource for Task {
    const KIND: ResourceKind = ResourceKind::Task;
    const PLURAL: &'static str = "Tasks";

    fn store(state: &AppState) -> &Store<Self> {
        &state.tasks
    }
}

impl RestResource for Client {
    const KIND: ResourceKind = ResourceKind::Client;
    const PLURAL: &'static str = "Clients";

    fn store(state: &AppState) -> &Store<Self> {
        &state.clients
    }
}

impl RestResource for TeamMember {
    const KIND: ResourceKind = ResourceKind::TeamMember;
    const PLURAL: &'static str = "Team members";

    fn store(state: &AppState) -> &Store<Self> {
        &state.team_members
    }
}

impl RestResource for ShopDrawing {
    const KIND: ResourceKind = ResourceKind::ShopDrawing;
    const PLURAL: &'static str = "Shop drawings";

    fn store(state: &AppState) -> &Store<Self> {
        &state.shop_drawings
    }
}

impl RestResource for MaterialSpec {
    const KIND: ResourceKind = ResourceKind::MaterialSpec;
    const PLURAL: &'static str = "Material specs";

    fn store(state: &AppState) -> &Store<Self> {
        &state.material_specs
    }
}

impl RestResource for ProcurementItem {
    const KIND: ResourceKind = ResourceKind::ProcurementItem;
    const PLURAL: &'static str = "Procurement items";

    fn store(state: &AppState) -> &Store<Self> {
        &state.procurement
    }
}
