//! Demo fixtures - the data served when no database is reachable.
//!
//! Identifiers are small integers rendered as strings; new records created
//! at runtime get UUIDs, so the two never collide. Timestamps are relative to
//! process start so the demo always looks recent.

use crate::entities::{
    Activity, Client, DrawingStatus, MaterialSpec, MaterialStatus, Notification,
    NotificationType, ProcurementItem, ProcurementStatus, Project, ProjectStatus, ProjectType,
    ProjectUpdate, ShopDrawing, Task, TaskPriority, TaskStatus, TeamMember, UpdateType, User,
    UserRole,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;

pub struct DemoData {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub clients: Vec<Client>,
    pub team_members: Vec<TeamMember>,
    pub notifications: Vec<Notification>,
    pub shop_drawings: Vec<ShopDrawing>,
    pub material_specs: Vec<MaterialSpec>,
    pub activities: Vec<Activity>,
    pub updates: Vec<ProjectUpdate>,
    pub procurement: Vec<ProcurementItem>,
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn id(value: u32) -> String {
    value.to_string()
}

impl DemoData {
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let days_ago = |days: i64| now - Duration::days(days);
        let hours_ago = |hours: i64| now - Duration::hours(hours);

        let user = |n: u32, email: &str, first: &str, last: &str, role: UserRole, company: &str| {
            User {
                id: id(n),
                email: email.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role,
                phone: None,
                company: text(company),
                is_active: true,
                created_at: days_ago(120),
                updated_at: days_ago(30 - i64::from(n)),
                password_hash: None,
            }
        };
        let users = vec![
            user(1, "demo@sitelink.dev", "Demo", "User", UserRole::Admin, "SiteLink"),
            user(2, "maria.lopez@sitelink.dev", "Maria", "Lopez", UserRole::ProjectManager, "SiteLink"),
            user(3, "tom.becker@northarch.com", "Tom", "Becker", UserRole::Architect, "North Architecture"),
            user(4, "aisha.khan@steelworks.com", "Aisha", "Khan", UserRole::Contractor, "Steelworks Ltd"),
        ];

        let client = |n: u32, name: &str, email: &str, company: &str, address: &str| Client {
            id: id(n),
            name: name.to_string(),
            email: text(email),
            phone: text("+1 555 0100"),
            company: text(company),
            address: text(address),
            created_at: days_ago(200),
            updated_at: days_ago(60 + i64::from(n)),
        };
        let clients = vec![
            client(1, "Harbour City Council", "projects@harbourcity.gov", "Harbour City", "1 Civic Plaza"),
            client(2, "Greenfield Developments", "build@greenfield.dev", "Greenfield", "88 Market St"),
            client(3, "Ridgeway Logistics", "facilities@ridgeway.com", "Ridgeway", "5 Depot Rd"),
        ];

        let projects = vec![
            Project {
                id: id(1),
                name: "Riverside Office Tower".to_string(),
                project_type: ProjectType::Commercial,
                description: text("Twelve storey office tower with two levels of basement parking"),
                status: ProjectStatus::Active,
                client_id: Some(id(2)),
                budget: Some(48_500_000.0),
                location: text("Riverside, Harbour City"),
                start_date: date(2024, 2, 1),
                end_date: date(2026, 6, 30),
                progress: 45,
                created_by: Some(id(1)),
                created_at: days_ago(150),
                updated_at: hours_ago(3),
            },
            Project {
                id: id(2),
                name: "Maple Street Townhouses".to_string(),
                project_type: ProjectType::Residential,
                description: text("Eighteen townhouses in three blocks"),
                status: ProjectStatus::Planning,
                client_id: Some(id(2)),
                budget: Some(9_200_000.0),
                location: text("Maple Street, Westbury"),
                start_date: date(2025, 1, 15),
                end_date: date(2026, 3, 31),
                progress: 10,
                created_by: Some(id(2)),
                created_at: days_ago(90),
                updated_at: days_ago(2),
            },
            Project {
                id: id(3),
                name: "North Quay Bridge Refurbishment".to_string(),
                project_type: ProjectType::Infrastructure,
                description: text("Deck replacement and bearing renewal"),
                status: ProjectStatus::OnHold,
                client_id: Some(id(1)),
                budget: Some(3_750_000.0),
                location: text("North Quay, Harbour City"),
                start_date: date(2024, 9, 1),
                end_date: None,
                progress: 20,
                created_by: Some(id(1)),
                created_at: days_ago(80),
                updated_at: days_ago(5),
            },
            Project {
                id: id(4),
                name: "Ridgeway Distribution Centre".to_string(),
                project_type: ProjectType::Industrial,
                description: text("Cold storage warehouse with loading docks"),
                status: ProjectStatus::Completed,
                client_id: Some(id(3)),
                budget: Some(15_000_000.0),
                location: text("Ridgeway Industrial Park"),
                start_date: date(2023, 3, 1),
                end_date: date(2024, 8, 30),
                progress: 100,
                created_by: Some(id(2)),
                created_at: days_ago(400),
                updated_at: days_ago(40),
            },
        ];

        let task = |n: u32,
                    project: u32,
                    title: &str,
                    status: TaskStatus,
                    priority: TaskPriority,
                    assignee: Option<u32>,
                    age_hours: i64| Task {
            id: id(n),
            project_id: id(project),
            title: title.to_string(),
            description: None,
            status,
            priority,
            assignee_id: assignee.map(id),
            due_date: None,
            created_at: days_ago(30),
            updated_at: hours_ago(age_hours),
        };
        let tasks = vec![
            task(1, 1, "Pour level 6 slab", TaskStatus::InProgress, TaskPriority::High, Some(4), 5),
            task(2, 1, "Review curtain wall submittal", TaskStatus::Review, TaskPriority::Medium, Some(3), 20),
            task(3, 1, "Install tower crane anemometer", TaskStatus::Completed, TaskPriority::Low, Some(4), 48),
            task(4, 2, "Finalise site survey", TaskStatus::Todo, TaskPriority::Medium, Some(2), 30),
            task(5, 3, "Resolve bearing supplier delay", TaskStatus::Blocked, TaskPriority::Urgent, Some(2), 72),
            task(6, 2, "Apply for building consent", TaskStatus::InProgress, TaskPriority::High, None, 10),
        ];

        let member = |n: u32, project: u32, user: u32, role: &str| TeamMember {
            id: id(n),
            project_id: id(project),
            user_id: id(user),
            role: role.to_string(),
            created_at: days_ago(100 - i64::from(n)),
            updated_at: days_ago(100 - i64::from(n)),
        };
        let team_members = vec![
            member(1, 1, 2, "project_manager"),
            member(2, 1, 3, "architect"),
            member(3, 1, 4, "site_manager"),
            member(4, 2, 2, "project_manager"),
        ];

        let notifications = vec![
            Notification {
                id: id(1),
                user_id: id(1),
                title: "Submittal awaiting review".to_string(),
                message: "Curtain wall shop drawing SD-104 was submitted".to_string(),
                notification_type: NotificationType::Info,
                is_read: false,
                project_id: Some(id(1)),
                created_at: hours_ago(2),
                updated_at: hours_ago(2),
            },
            Notification {
                id: id(2),
                user_id: id(1),
                title: "Task blocked".to_string(),
                message: "Bearing supplier delay is blocking North Quay works".to_string(),
                notification_type: NotificationType::Warning,
                is_read: false,
                project_id: Some(id(3)),
                created_at: hours_ago(26),
                updated_at: hours_ago(26),
            },
            Notification {
                id: id(3),
                user_id: id(2),
                title: "Delivery confirmed".to_string(),
                message: "Reinforcing steel delivery confirmed for Monday".to_string(),
                notification_type: NotificationType::Success,
                is_read: true,
                project_id: Some(id(1)),
                created_at: days_ago(3),
                updated_at: days_ago(3),
            },
        ];

        let shop_drawings = vec![
            ShopDrawing {
                id: id(1),
                project_id: id(1),
                title: "Curtain wall elevations".to_string(),
                drawing_number: "SD-104".to_string(),
                revision: "B".to_string(),
                status: DrawingStatus::UnderReview,
                submitted_by: Some(id(4)),
                reviewed_by: Some(id(3)),
                file_url: None,
                notes: text("Revised mullion spacing"),
                created_at: days_ago(12),
                updated_at: hours_ago(2),
            },
            ShopDrawing {
                id: id(2),
                project_id: id(1),
                title: "Stair 2 steel framing".to_string(),
                drawing_number: "SD-087".to_string(),
                revision: "A".to_string(),
                status: DrawingStatus::Approved,
                submitted_by: Some(id(4)),
                reviewed_by: Some(id(3)),
                file_url: None,
                notes: None,
                created_at: days_ago(40),
                updated_at: days_ago(20),
            },
            ShopDrawing {
                id: id(3),
                project_id: id(3),
                title: "Bearing replacement details".to_string(),
                drawing_number: "SD-012".to_string(),
                revision: "C".to_string(),
                status: DrawingStatus::ReviseResubmit,
                submitted_by: Some(id(4)),
                reviewed_by: Some(id(2)),
                file_url: None,
                notes: text("Confirm jacking loads"),
                created_at: days_ago(25),
                updated_at: days_ago(6),
            },
        ];

        let material = |n: u32,
                        project: u32,
                        name: &str,
                        category: &str,
                        manufacturer: &str,
                        quantity: f64,
                        unit: &str,
                        unit_cost: f64,
                        status: MaterialStatus| MaterialSpec {
            id: id(n),
            project_id: id(project),
            name: name.to_string(),
            category: category.to_string(),
            manufacturer: text(manufacturer),
            model: None,
            specification: None,
            quantity: Some(quantity),
            unit: text(unit),
            unit_cost: Some(unit_cost),
            status,
            created_at: days_ago(50),
            updated_at: days_ago(i64::from(n) * 4),
        };
        let material_specs = vec![
            material(1, 1, "Double glazed unit 6/12/6", "glazing", "ClearView", 840.0, "m2", 185.0, MaterialStatus::Approved),
            material(2, 1, "Ready-mix concrete 40 MPa", "concrete", "Harbour Concrete", 1200.0, "m3", 210.0, MaterialStatus::Ordered),
            material(3, 2, "Fibre cement cladding", "cladding", "Ridgeline", 1500.0, "m2", 62.5, MaterialStatus::Pending),
        ];

        let activity = |n: u32, action: &str, entity: &str, entity_id: u32, project: u32, description: &str, age_hours: i64| {
            Activity {
                id: id(n),
                action: action.to_string(),
                entity_type: entity.to_string(),
                entity_id: Some(id(entity_id)),
                project_id: Some(id(project)),
                user_id: Some(id(1)),
                description: text(description),
                metadata: None,
                created_at: hours_ago(age_hours),
                updated_at: hours_ago(age_hours),
            }
        };
        let mut activities = vec![
            activity(1, "created", "project", 2, 2, "Created project Maple Street Townhouses", 24 * 90),
            activity(2, "updated", "task", 1, 1, "Started pouring level 6 slab", 5),
            activity(3, "submitted", "shop_drawing", 1, 1, "Submitted SD-104 rev B", 2),
        ];
        activities.push(Activity {
            metadata: Some(json!({ "from": "active", "to": "on_hold" })),
            ..activity(4, "updated", "project", 3, 3, "Put North Quay on hold", 24 * 5)
        });

        let update = |n: u32, project: u32, title: &str, content: &str, kind: UpdateType, age_hours: i64| {
            ProjectUpdate {
                id: id(n),
                project_id: id(project),
                title: title.to_string(),
                content: content.to_string(),
                update_type: kind,
                author_id: Some(id(2)),
                created_at: hours_ago(age_hours),
                updated_at: hours_ago(age_hours),
            }
        };
        let updates = vec![
            update(1, 1, "Level 6 slab underway", "Formwork complete, pour scheduled for Thursday.", UpdateType::Progress, 6),
            update(2, 3, "Works paused", "Bearing supplier has pushed delivery by six weeks.", UpdateType::Issue, 24 * 5),
            update(3, 1, "Structure 50% complete", "Half of the superstructure is now poured.", UpdateType::Milestone, 24 * 14),
        ];

        let procurement = vec![
            ProcurementItem {
                id: id(1),
                project_id: id(1),
                name: "Reinforcing steel N16".to_string(),
                supplier: text("Steelworks Ltd"),
                quantity: 42.0,
                unit: text("t"),
                unit_price: Some(1450.0),
                total_cost: Some(60_900.0),
                status: ProcurementStatus::Ordered,
                order_date: date(2024, 10, 2),
                expected_delivery: date(2024, 10, 21),
                created_at: days_ago(20),
                updated_at: days_ago(3),
            },
            ProcurementItem {
                id: id(2),
                project_id: id(1),
                name: "Tower crane hire".to_string(),
                supplier: text("LiftCo"),
                quantity: 12.0,
                unit: text("month"),
                unit_price: Some(18_000.0),
                total_cost: Some(216_000.0),
                status: ProcurementStatus::Delivered,
                order_date: date(2024, 1, 10),
                expected_delivery: date(2024, 2, 1),
                created_at: days_ago(160),
                updated_at: days_ago(140),
            },
            ProcurementItem {
                id: id(3),
                project_id: id(3),
                name: "Elastomeric bearings".to_string(),
                supplier: text("Bridgeparts"),
                quantity: 16.0,
                unit: text("ea"),
                unit_price: None,
                total_cost: None,
                status: ProcurementStatus::Quoted,
                order_date: None,
                expected_delivery: None,
                created_at: days_ago(30),
                updated_at: days_ago(6),
            },
        ];

        Self {
            users,
            projects,
            tasks,
            clients,
            team_members,
            notifications,
            shop_drawings,
            material_specs,
            activities,
            updates,
            procurement,
        }
    }
}
