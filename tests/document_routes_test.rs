// ABOUTME: Integration tests for the generic base and named document controllers
// ABOUTME: Exercised through the muscle group, exercise type, difficulty, role, and user collections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_session, create_test_app, moderator_session, send, signin, user_session, Session,
    TEST_PASSWORD,
};
use axum::Router;
use serde_json::{json, Value};

async fn add_muscle_groups(app: &Router, session: &Session, names: &[&str]) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/v1/muscleGroup/add/namelist",
        Some(session),
        Some(json!({ "names": names })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body
}

fn ids_of(data: &Value) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn test_add_name_list_normalizes_and_skips_existing() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;

    let body = add_muscle_groups(&app, &moderator, &["chest", "back", " "]).await;
    assert_eq!(body["message"], "Added entity(s).");
    assert_eq!(body["data"][0]["name"], "CHEST");
    assert_eq!(body["data"][1]["name"], "BACK");

    let again = add_muscle_groups(&app, &moderator, &["Chest"]).await;
    assert_eq!(again["message"], "Nothing is added.");
    assert_eq!(again["data"], json!([]));
}

#[tokio::test]
async fn test_add_name_list_requires_curator_role() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/exerciseType/add/namelist",
        Some(&jack),
        Some(json!({ "names": ["strength"] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_exercises_cannot_be_created_from_names() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/exercise/add/namelist",
        Some(&moderator),
        Some(json!({ "names": ["Squat"] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_names_reports_missing_name() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;
    add_muscle_groups(&app, &moderator, &["chest", "back"]).await;

    let found = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/getByNames?names=chest,back",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.message(), "Found entity(s).");
    assert_eq!(found.body["data"].as_array().unwrap().len(), 2);

    let missing = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/getByNames?names=chest,legs",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error_message(), "Muscle group not found with name: legs");
}

#[tokio::test]
async fn test_seeded_difficulties_and_roles_are_listed() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;

    let difficulties = send(&app, Method::GET, "/api/v1/difficulty/getAll", Some(&admin), None).await;
    assert_eq!(difficulties.status, StatusCode::OK);
    assert_eq!(difficulties.message(), "All documents.");
    let names: Vec<&str> = difficulties.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["EASY", "INTERMEDIATE", "ADVANCED", "EXPERT"]);

    let roles = send(&app, Method::GET, "/api/v1/userRole/getAllIds", Some(&admin), None).await;
    assert_eq!(roles.body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_all_requires_admin() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;

    let response = send(&app, Method::GET, "/api/v1/difficulty/getAll", Some(&moderator), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_query_field_and_projections() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;
    add_muscle_groups(&app, &moderator, &["chest", "back"]).await;

    let names = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/queryField?fieldName=name&distinct=true",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(names.message(), "Queried field(s): name");
    assert_eq!(names.body["data"], json!(["CHEST", "BACK"]));

    let spaced = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/queryField?fieldName=first%20name",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(spaced.status, StatusCode::BAD_REQUEST);

    let include = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/projectWithInclude?fields=name&className=MuscleGroup",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(include.message(), "Include fields projection!");
    let first = include.body["data"][0].as_object().unwrap();
    assert!(first.contains_key("id"));
    assert!(first.contains_key("name"));
    assert!(!first.contains_key("createdAt"));

    let exclude = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/projectWithExclude?fields=createdAt,updatedAt",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(exclude.message(), "Exclude fields projection!");
    let first = exclude.body["data"][0].as_object().unwrap();
    assert!(first.contains_key("name"));
    assert!(!first.contains_key("updatedAt"));
}

#[tokio::test]
async fn test_update_by_id_reports_unchanged_fields() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;
    let added = add_muscle_groups(&app, &moderator, &["chest"]).await;
    let id = ids_of(&added["data"]).remove(0);

    let blank = send(
        &app,
        Method::PUT,
        &format!("/api/v1/muscleGroup/updateById?id={id}"),
        Some(&moderator),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(blank.status, StatusCode::OK);
    assert_eq!(blank.message(), "Entity updated. Unchanged fields: [name]");
    assert_eq!(blank.body["data"]["name"], "CHEST");

    let renamed = send(
        &app,
        Method::PUT,
        &format!("/api/v1/muscleGroup/updateById?id={id}"),
        Some(&moderator),
        Some(json!({ "name": "PECTORALS" })),
    )
    .await;
    assert_eq!(renamed.message(), "Entity updated.");
    assert_eq!(renamed.body["data"]["name"], "PECTORALS");

    let missing = send(
        &app,
        Method::PUT,
        "/api/v1/muscleGroup/updateById?id=does-not-exist",
        Some(&moderator),
        Some(json!({ "name": "X" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_renamed_muscle_group_keeps_upper_case_name() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;
    let added = add_muscle_groups(&app, &moderator, &["chest", "back"]).await;
    let ids = ids_of(&added["data"]);

    let renamed = send(
        &app,
        Method::PUT,
        &format!("/api/v1/muscleGroup/updateById?id={}", ids[0]),
        Some(&moderator),
        Some(json!({ "name": "shoulders" })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK, "{}", renamed.body);
    assert_eq!(renamed.body["data"]["name"], "SHOULDERS");

    let found = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/getByNames?names=shoulders",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(found.status, StatusCode::OK, "{}", found.body);
    assert_eq!(ids_of(&found.body["data"]), [ids[0].clone()]);

    let again = add_muscle_groups(&app, &moderator, &["Shoulders"]).await;
    assert_eq!(again["message"], "Nothing is added.");

    let modified = send(
        &app,
        Method::PUT,
        &format!("/api/v1/muscleGroup/addOrModifyFieldByIds?ids={}", ids[1]),
        Some(&moderator),
        Some(json!({
            "fieldName": "name",
            "fieldTypeClass": "java.lang.String",
            "value": "lats",
        })),
    )
    .await;
    assert_eq!(modified.status, StatusCode::OK, "{}", modified.body);
    assert_eq!(modified.body["data"][0]["name"], "LATS");

    let all_ids = send(&app, Method::GET, "/api/v1/muscleGroup/getAllIds", Some(&moderator), None).await;
    assert_eq!(all_ids.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_soft_delete_hides_names_until_restored() {
    let (app, _) = create_test_app().await;
    let moderator = moderator_session(&app, "mod").await;
    let added = add_muscle_groups(&app, &moderator, &["chest"]).await;
    let id = ids_of(&added["data"]).remove(0);

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/muscleGroup/softDeleteByIds?ids={id}"),
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), format!("Entity(s) soft deleted on: [{id}]"));
    assert_eq!(deleted.body["data"][0]["softDeleted"], true);

    let hidden = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/getByNames?names=chest",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let re_add = add_muscle_groups(&app, &moderator, &["chest"]).await;
    assert_eq!(re_add["message"], "Nothing is added.");

    let restored = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/muscleGroup/unsoftDeleteByIds?ids={id}"),
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(restored.message(), format!("Entity(s) restored on: [{id}]"));

    let visible = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/getByNames?names=chest",
        Some(&moderator),
        None,
    )
    .await;
    assert_eq!(visible.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_by_ids_is_all_or_nothing() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;
    let added = add_muscle_groups(&app, &admin, &["chest", "back"]).await;
    let ids = ids_of(&added["data"]);

    let partial = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/muscleGroup/deleteByIds?ids={},missing-id", ids[0]),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(partial.status, StatusCode::NOT_FOUND);

    let all_ids = send(&app, Method::GET, "/api/v1/muscleGroup/getAllIds", Some(&admin), None).await;
    assert_eq!(all_ids.body["data"].as_array().unwrap().len(), 2);

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/muscleGroup/deleteByIds?ids={},{}", ids[0], ids[1]),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        deleted.message(),
        format!("Entity(s) deleted on: [{}, {}]", ids[0], ids[1])
    );
}

#[tokio::test]
async fn test_delete_by_names() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;
    add_muscle_groups(&app, &admin, &["chest", "back"]).await;

    let response = send(
        &app,
        Method::DELETE,
        "/api/v1/muscleGroup/deleteByNames?names=chest",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Deleted entities by name(s).");

    let remaining = send(
        &app,
        Method::GET,
        "/api/v1/muscleGroup/queryField?fieldName=name",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(remaining.body["data"], json!(["BACK"]));
}

#[tokio::test]
async fn test_admin_updates_user_roles_by_name() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;
    user_session(&app, "jack").await;

    let jack = send(&app, Method::GET, "/api/v1/user/getByNames?names=jack", Some(&admin), None).await;
    let jack_id = jack.body["data"][0]["id"].as_str().unwrap().to_owned();

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/v1/user/updateById?id={jack_id}"),
        Some(&admin),
        Some(json!({ "roles": ["mod", "user", "mod"], "gender": "male" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(
        response.message(),
        "Entity updated. Unchanged fields: [name, email, password]"
    );
    assert_eq!(response.body["data"]["gender"], "male");
    let roles: Vec<&str> = response.body["data"]["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|role| role["name"].as_str().unwrap())
        .collect();
    assert_eq!(roles, ["ROLE_MODERATOR", "ROLE_USER"]);
}

#[tokio::test]
async fn test_modify_password_field_stores_a_hash() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;
    user_session(&app, "jack").await;

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/user/addOrModifyFieldByNames?names=jack",
        Some(&admin),
        Some(json!({
            "fieldName": "password",
            "fieldTypeClass": "java.lang.String",
            "value": "brand-new-secret",
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(
        response.message(),
        "Added/Modified field with specified value on entity(s): [jack]"
    );

    let old = signin(&app, "jack@example.com", TEST_PASSWORD).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    let new = signin(&app, "jack@example.com", "brand-new-secret").await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_remove_field_refuses_required_fields() {
    let (app, _) = create_test_app().await;
    let admin = admin_session(&app, "root").await;
    let added = add_muscle_groups(&app, &admin, &["chest"]).await;
    let id = ids_of(&added["data"]).remove(0);

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/v1/muscleGroup/removeFieldByIds?ids={id}&fieldName=name"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
