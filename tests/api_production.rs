//! Integration tests against PostgreSQL (production mode)
//!
//! `#[sqlx::test]` creates an isolated database per test, applies the
//! migrations from `migrations/` and the scripts listed from `fixtures/`,
//! then drops the database. `DATABASE_URL` must point at a reachable server.

mod common;

#[cfg(test)]
mod production_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sitelink::DataMode;
    use sqlx::PgPool;

    // ============================================================
    // CRUD round trip
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_create_get_and_update_project(pool: PgPool) {
        let state = create_production_state(pool);
        assert_eq!(state.mode, DataMode::Production);
        let server = create_test_server(state);

        let response = server
            .post("/api/v1/projects")
            .json(&json!({ "name": "Test", "type": "commercial", "clientId": "1" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["data"]["status"], "draft");
        assert_eq!(created["data"]["createdBy"], "1");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let fetched: Value = server
            .get(&format!("/api/v1/projects/{}", id))
            .await
            .json();
        assert_eq!(fetched["data"]["name"], "Test");
        assert_eq!(fetched["data"]["clientId"], "1");

        let response = server
            .put(&format!("/api/v1/projects/{}", id))
            .json(&json!({ "progress": 40, "status": "active" }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["data"]["progress"], 40);
        assert_eq!(updated["data"]["status"], "active");
        assert_eq!(updated["data"]["name"], "Test");
        assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_delete_project_cascades_to_tasks(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let task: Value = server
            .post("/api/v1/tasks")
            .json(&json!({ "projectId": "3", "title": "Grade the yard" }))
            .await
            .json();
        let task_id = task["data"]["id"].as_str().unwrap().to_string();

        let response = server.delete("/api/v1/projects/3").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"], json!({ "id": "3" }));

        server.get("/api/v1/projects/3").await.assert_status_not_found();
        server
            .get(&format!("/api/v1/tasks/{}", task_id))
            .await
            .assert_status_not_found();
        server.delete("/api/v1/projects/3").await.assert_status_not_found();
    }

    // ============================================================
    // constraint violations
    // ============================================================

    #[sqlx::test]
    async fn test_duplicate_email_is_a_conflict(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "email": "site.lead@sitelink.dev",
                "firstName": "Site",
                "lastName": "Lead",
                "password": "first-pass",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert!(body["data"].get("passwordHash").is_none());

        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "email": "Site.Lead@SiteLink.dev",
                "firstName": "Other",
                "lastName": "Lead",
                "password": "second-pass",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User already exists");
        assert!(body["details"].as_str().unwrap().contains("users_email_key"));
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_team_membership_is_unique_per_project(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let user: Value = server
            .post("/api/v1/users")
            .json(&json!({
                "email": "estimator@sitelink.dev",
                "firstName": "Ana",
                "lastName": "Reyes",
                "password": "estimates",
            }))
            .await
            .json();
        let user_id = user["data"]["id"].as_str().unwrap().to_string();

        let member = json!({ "projectId": "1", "userId": user_id, "role": "estimator" });
        server
            .post("/api/v1/team-members")
            .json(&member)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/api/v1/team-members").json(&member).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert!(
            body["details"]
                .as_str()
                .unwrap()
                .contains("team_members_project_user_key")
        );
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_unknown_reference_is_a_bad_request(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let response = server
            .post("/api/v1/projects")
            .json(&json!({ "name": "Orphan", "type": "renovation", "clientId": "999" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Referenced record does not exist");
        assert!(body["details"].as_str().unwrap().contains("projects_client_id_fkey"));

        server
            .post("/api/v1/tasks")
            .json(&json!({ "projectId": "999", "title": "Nowhere" }))
            .await
            .assert_status_bad_request();
    }

    // ============================================================
    // listing
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_filtered_listing_and_paging(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("status", "active")
            .await
            .json();
        assert_eq!(body["pagination"]["total"], 2);

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("type", "residential")
            .await
            .json();
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["name"], "Elm Street Homes");

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("search", "HARBOUR")
            .await
            .json();
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["id"], "1");

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("clientId", "1")
            .add_query_param("status", "active")
            .await
            .json();
        assert_eq!(body["pagination"]["total"], 2);

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("limit", "2")
            .await
            .json();
        assert_eq!(body["data"][0]["id"], "1");
        assert_eq!(body["data"][1]["id"], "2");

        let body: Value = server
            .get("/api/v1/projects")
            .add_query_param("page", "2")
            .add_query_param("limit", "2")
            .await
            .json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], "3");
        assert_eq!(
            body["pagination"],
            json!({ "page": 2, "limit": 2, "total": 3, "totalPages": 2 })
        );
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_procurement_total_cost_is_derived_and_repriced(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let response = server
            .post("/api/v1/procurement")
            .json(&json!({ "projectId": "1", "name": "Rebar ties", "quantity": 3, "unitPrice": 2.5 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["totalCost"], 7.5);
        assert_eq!(body["data"]["status"], "requested");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let body: Value = server
            .put(&format!("/api/v1/procurement/{}", id))
            .json(&json!({ "quantity": 4, "status": "ordered" }))
            .await
            .json();
        assert_eq!(body["data"]["totalCost"], 10.0);
        assert_eq!(body["data"]["status"], "ordered");

        let body: Value = server
            .get("/api/v1/procurement")
            .add_query_param("status", "ordered")
            .await
            .json();
        assert_eq!(body["pagination"]["total"], 1);
    }

    // ============================================================
    // realtime fan-out and health
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("clients", "projects")))]
    async fn test_project_create_broadcasts_without_opt_in(pool: PgPool) {
        let state = create_production_state(pool);
        let addr = spawn_server(state.clone()).await;
        let rest = create_test_server(state);

        let mut observer = connect(addr).await;
        authenticate(&mut observer, "3").await;

        let created: Value = rest
            .post("/api/v1/projects")
            .json(&json!({ "name": "Test", "type": "commercial", "clientId": "1" }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap();

        let activity = expect_event(&mut observer, "global_activity_update").await;
        assert_eq!(activity["action"], "created");
        assert_eq!(activity["entityId"], id);

        let notification = expect_event(&mut observer, "notification_received").await;
        assert_eq!(notification["title"], "New project created");
    }

    #[sqlx::test]
    async fn test_health_reports_connected_database(pool: PgPool) {
        let server = create_test_server(create_production_state(pool));

        let body: Value = server.get("/health").await.json();
        assert_eq!(body["data"]["mode"], "production");
        assert_eq!(body["data"]["database"], "connected");
    }
}
