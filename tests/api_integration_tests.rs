//! End-to-end tests for the HTTP surface: authentication, role gating,
//! validation, and the customer -> vehicle -> check-in flow.

mod test_utils;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use test_utils::{TEST_TOKEN, seed_roles, start_test_server};

fn authed(request: reqwest::RequestBuilder, user_id: Uuid) -> reqwest::RequestBuilder {
    request
        .bearer_auth(TEST_TOKEN)
        .header("X-User-Id", user_id.to_string())
}

async fn create_customer(base: &str, client: &Client, staff: Uuid) -> Result<Value> {
    let response = authed(client.post(format!("{}/api/v1/customers", base)), staff)
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Lee",
            "customer_type": "Individual",
            "membership_level": "Premium",
            "email": "ana@example.com"
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(response.json().await?)
}

async fn create_vehicle(base: &str, client: &Client, staff: Uuid, customer_id: &str) -> Result<Value> {
    let response = authed(client.post(format!("{}/api/v1/vehicles", base)), staff)
        .json(&json!({
            "customer_id": customer_id,
            "year": 1969,
            "make": "Chevrolet",
            "model": "Camaro SS",
            "battery_type": "LeadAcid",
            "fuel_level": 60,
            "drivers": [{ "name": "Ana Lee" }]
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(response.json().await?)
}

#[tokio::test]
async fn root_reports_service_info() -> Result<()> {
    let (base, _db) = start_test_server().await?;
    let client = Client::new();

    let response = client.get(format!("{}/", base)).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["service"], "motorvault");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let (base, _db) = start_test_server().await?;
    let client = Client::new();

    let response = client.get(format!("{}/openapi.json", base)).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert!(body["paths"]["/api/v1/customers"].is_object());
    Ok(())
}

#[tokio::test]
async fn healthz_reports_ok() -> Result<()> {
    let (base, _db) = start_test_server().await?;
    let client = Client::new();

    let response = client.get(format!("{}/healthz", base)).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn api_rejects_missing_and_bad_tokens() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let missing = client
        .get(format!("{}/api/v1/customers", base))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = client
        .get(format!("{}/api/v1/customers", base))
        .bearer_auth("not-the-token")
        .header("X-User-Id", roles.viewer.to_string())
        .send()
        .await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_user_header_is_rejected() -> Result<()> {
    let (base, db) = start_test_server().await?;
    seed_roles(&db).await?;
    let client = Client::new();

    let response = authed(
        client.get(format!("{}/api/v1/customers", base)),
        Uuid::new_v4(),
    )
    .send()
    .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn viewer_reads_but_cannot_write() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let list = authed(client.get(format!("{}/api/v1/customers", base)), roles.viewer)
        .send()
        .await?;
    assert_eq!(list.status(), StatusCode::OK);

    let create = authed(client.post(format!("{}/api/v1/customers", base)), roles.viewer)
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Lee",
            "customer_type": "Individual",
            "membership_level": "Basic",
            "email": "ana@example.com"
        }))
        .send()
        .await?;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn staff_cannot_delete_but_manager_can() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let customer = create_customer(&base, &client, roles.staff).await?;
    let id = customer["id"].as_str().unwrap().to_string();

    let staff_delete = authed(
        client.delete(format!("{}/api/v1/customers/{}", base, id)),
        roles.staff,
    )
    .send()
    .await?;
    assert_eq!(staff_delete.status(), StatusCode::FORBIDDEN);

    let manager_delete = authed(
        client.delete(format!("{}/api/v1/customers/{}", base, id)),
        roles.manager,
    )
    .send()
    .await?;
    assert_eq!(manager_delete.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn customer_create_returns_initial_password_without_hash() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let body = create_customer(&base, &client, roles.staff).await?;
    assert_eq!(body["initial_password"], "analee123");
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["has_portal_credential"], true);

    let id = body["id"].as_str().unwrap();
    let fetched = authed(
        client.get(format!("{}/api/v1/customers/{}", base, id)),
        roles.viewer,
    )
    .send()
    .await?;
    let fetched: Value = fetched.json().await?;
    assert!(fetched.get("password_hash").is_none());
    assert!(fetched.get("initial_password").is_none());
    Ok(())
}

#[tokio::test]
async fn customer_validation_failures_report_fields() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let response = authed(client.post(format!("{}/api/v1/customers", base)), roles.staff)
        .json(&json!({
            "first_name": "",
            "last_name": "Lee",
            "customer_type": "Individual",
            "membership_level": "Basic",
            "email": "not-an-email"
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["details"]["first_name"].is_string());
    assert!(body["details"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn vehicle_response_carries_derived_fields() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let customer = create_customer(&base, &client, roles.staff).await?;
    let vehicle = create_vehicle(&base, &client, roles.staff, customer["id"].as_str().unwrap()).await?;

    assert_eq!(vehicle["fuel_band"], "yellow");
    assert_eq!(vehicle["registration_expired"], false);
    assert_eq!(vehicle["drivers"][0]["name"], "Ana Lee");
    Ok(())
}

#[tokio::test]
async fn check_in_flow_prefill_create_and_service_items() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let customer = create_customer(&base, &client, roles.staff).await?;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    let vehicle = create_vehicle(&base, &client, roles.staff, &customer_id).await?;
    let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

    let prefill = authed(
        client.get(format!(
            "{}/api/v1/check-in-outs/prefill?vehicle_id={}",
            base, vehicle_id
        )),
        roles.staff,
    )
    .send()
    .await?;
    assert_eq!(prefill.status(), StatusCode::OK);
    let prefill: Value = prefill.json().await?;
    assert_eq!(prefill["contact_name"], "Ana Lee");
    assert_eq!(prefill["fuel_level"], 60);

    let created = authed(client.post(format!("{}/api/v1/check-in-outs", base)), roles.staff)
        .json(&json!({
            "vehicle_id": vehicle_id,
            "customer_id": customer_id,
            "date": "2026-03-14",
            "check_type": "CHECK_IN",
            "service_items": [{ "description": "Oil change", "cost": "120.00" }]
        }))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let visit: Value = created.json().await?;
    assert_eq!(visit["status"], "CHECKED_IN");
    let visit_id = visit["id"].as_str().unwrap().to_string();

    let added = authed(
        client.post(format!("{}/api/v1/check-in-outs/{}/service-items", base, visit_id)),
        roles.staff,
    )
    .json(&json!({ "description": "Detail", "cost": "350.00" }))
    .send()
    .await?;
    assert_eq!(added.status(), StatusCode::CREATED);

    let completed = authed(
        client.patch(format!(
            "{}/api/v1/check-in-outs/{}/service-items/0",
            base, visit_id
        )),
        roles.staff,
    )
    .json(&json!({ "completed": true }))
    .send()
    .await?;
    assert_eq!(completed.status(), StatusCode::OK);

    let detail = authed(
        client.get(format!("{}/api/v1/check-in-outs/{}", base, visit_id)),
        roles.viewer,
    )
    .send()
    .await?;
    let detail: Value = detail.json().await?;
    assert_eq!(detail["service_items"].as_array().unwrap().len(), 2);
    assert_eq!(detail["totals"]["item_count"], 2);
    assert_eq!(detail["totals"]["completed_count"], 1);
    Ok(())
}

#[tokio::test]
async fn photo_attach_and_remove_update_slots() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let customer = create_customer(&base, &client, roles.staff).await?;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    let vehicle = create_vehicle(&base, &client, roles.staff, &customer_id).await?;
    let visit = authed(client.post(format!("{}/api/v1/check-in-outs", base)), roles.staff)
        .json(&json!({
            "vehicle_id": vehicle["id"],
            "customer_id": customer_id,
            "date": "2026-03-14",
            "check_type": "CHECK_IN"
        }))
        .send()
        .await?;
    let visit: Value = visit.json().await?;
    let visit_id = visit["id"].as_str().unwrap().to_string();

    let attached = authed(
        client.post(format!("{}/api/v1/check-in-outs/{}/photos/attach", base, visit_id)),
        roles.staff,
    )
    .json(&json!({ "slot": "front", "url": "https://media.test/front.jpg" }))
    .send()
    .await?;
    assert_eq!(attached.status(), StatusCode::OK);
    let photos: Value = attached.json().await?;
    assert_eq!(photos["front"], "https://media.test/front.jpg");

    let removed = authed(
        client.post(format!("{}/api/v1/check-in-outs/{}/photos/remove", base, visit_id)),
        roles.staff,
    )
    .json(&json!({ "slot": "front" }))
    .send()
    .await?;
    assert_eq!(removed.status(), StatusCode::OK);
    let photos: Value = removed.json().await?;
    assert!(photos.get("front").is_none());
    Ok(())
}

#[tokio::test]
async fn user_management_is_admin_only() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let denied = authed(client.get(format!("{}/api/v1/users", base)), roles.manager)
        .send()
        .await?;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = authed(client.post(format!("{}/api/v1/users", base)), roles.admin)
        .json(&json!({
            "first_name": "Max",
            "last_name": "Stone",
            "email": "max@motorvault.local",
            "role": "Staff"
        }))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = created.json().await?;
    assert_eq!(body["initial_password"], "maxstone123");
    assert!(body.get("password_hash").is_none());

    let user_id = body["id"].as_str().unwrap();
    let reset = authed(
        client.post(format!("{}/api/v1/users/{}/reset-password", base, user_id)),
        roles.admin,
    )
    .send()
    .await?;
    assert_eq!(reset.status(), StatusCode::OK);
    let reset: Value = reset.json().await?;
    assert_eq!(reset["new_password"].as_str().unwrap().len(), 16);
    Ok(())
}

#[tokio::test]
async fn search_groups_and_caps_results() -> Result<()> {
    let (base, db) = start_test_server().await?;
    let roles = seed_roles(&db).await?;
    let client = Client::new();

    let customer = create_customer(&base, &client, roles.staff).await?;
    create_vehicle(&base, &client, roles.staff, customer["id"].as_str().unwrap()).await?;

    let response = authed(client.get(format!("{}/api/v1/search?q=camaro", base)), roles.viewer)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["vehicles"].as_array().unwrap().len(), 1);
    assert_eq!(body["customers"].as_array().unwrap().len(), 0);

    let blank = authed(client.get(format!("{}/api/v1/search?q=", base)), roles.viewer)
        .send()
        .await?;
    let blank: Value = blank.json().await?;
    assert!(blank["vehicles"].as_array().unwrap().is_empty());
    Ok(())
}
