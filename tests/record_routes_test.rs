// ABOUTME: Integration tests for exercise and physique records
// ABOUTME: Covers slot merging, newest-first paging, precise and bulk deletion, and upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{admin_session, create_test_app, send, user_session, Session, TestResponse};
use serde_json::{json, Value};

async fn add_record(app: &Router, session: &Session, datetime: &str, body: Value) -> TestResponse {
    send(
        app,
        Method::POST,
        &format!(
            "/api/v1/exerciseRecord/add?username={}&datetime={datetime}",
            session.username
        ),
        Some(session),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn test_records_in_the_same_slot_are_merged() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;

    let first = add_record(
        &app,
        &jack,
        "2024-05-01_18-05",
        json!({ "exerciseName": "Squat", "sets": [[135.0, 135.0]], "note": "warm up" }),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.message(), "Added record successfully.");

    let second = add_record(
        &app,
        &jack,
        "2024-05-01_18-25",
        json!({ "exerciseName": "Squat", "sets": [{ "repetitions": [185.0, 185.0, 185.0] }] }),
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["id"], first.body["data"]["id"]);
    assert_eq!(second.body["data"]["sets"].as_array().unwrap().len(), 2);
    assert_eq!(second.body["data"]["note"], "warm up");

    let next_slot = add_record(
        &app,
        &jack,
        "2024-05-01_18-30",
        json!({ "exerciseName": "Squat", "sets": [[225.0]] }),
    )
    .await;
    assert_ne!(next_slot.body["data"]["id"], first.body["data"]["id"]);
}

#[tokio::test]
async fn test_add_record_rejects_unknown_user_and_bad_datetime() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;

    let unknown = send(
        &app,
        Method::POST,
        "/api/v1/exerciseRecord/add?username=ghost",
        Some(&jack),
        Some(json!({ "exerciseName": "Squat", "sets": [] })),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let malformed = add_record(
        &app,
        &jack,
        "yesterday",
        json!({ "exerciseName": "Squat", "sets": [] }),
    )
    .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_user_exercise_pages_newest_first() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;

    for datetime in ["2024-05-01_08-00", "2024-05-02_08-00", "2024-05-03_08-00"] {
        add_record(&app, &jack, datetime, json!({ "exerciseName": "Squat", "sets": [[100.0]] })).await;
    }
    add_record(
        &app,
        &jack,
        "2024-05-04_08-00",
        json!({ "exerciseName": "Deadlift", "sets": [[200.0]] }),
    )
    .await;

    let first = send(
        &app,
        Method::GET,
        "/api/v1/exerciseRecord/getByUserExername?name=jack&exerciseName=Squat&limit=2",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.message(), "Found records.");
    assert_eq!(first.body["hasNextPage"], true);
    let dates: Vec<&str> = first.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates.len(), 2);
    assert!(dates[0].starts_with("2024-05-03"));
    assert!(dates[1].starts_with("2024-05-02"));

    let rest = send(
        &app,
        Method::GET,
        "/api/v1/exerciseRecord/getByUserExername?name=jack&exerciseName=Squat&skipCount=2&limit=2",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(rest.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(rest.body["hasNextPage"], false);

    let ghost = send(
        &app,
        Method::GET,
        "/api/v1/exerciseRecord/getByUserExername?name=ghost&exerciseName=Squat",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(ghost.status, StatusCode::NOT_FOUND);
    assert_eq!(ghost.error_message(), "Cannot find user by name ghost");
}

#[tokio::test]
async fn test_delete_by_precision_removes_one_slot() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;
    let admin = admin_session(&app, "root").await;
    add_record(&app, &jack, "2024-05-01_18-10", json!({ "exerciseName": "Squat", "sets": [[100.0]] })).await;

    let denied = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteByPrecision?name=jack&exerciseName=Squat&datetime=2024-05-01_18-00",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let deleted = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteByPrecision?name=jack&exerciseName=Squat&datetime=2024-05-01_18-29",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK, "{}", deleted.body);
    assert_eq!(deleted.message(), "Excercise record has been deleted.");

    let again = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteByPrecision?name=jack&exerciseName=Squat&datetime=2024-05-01_18-00",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.error_message(), "Record not found.");

    let ghost = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteByPrecision?name=ghost&exerciseName=Squat&datetime=2024-05-01_18-00",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(ghost.error_message(), "Username not found.");
}

#[tokio::test]
async fn test_delete_all_by_exercise_name_for_user() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;
    let admin = admin_session(&app, "root").await;
    for datetime in ["2024-05-01_08-00", "2024-05-02_08-00"] {
        add_record(&app, &jack, datetime, json!({ "exerciseName": "Squat", "sets": [[100.0]] })).await;
    }
    add_record(&app, &jack, "2024-05-03_08-00", json!({ "exerciseName": "Bench", "sets": [[90.0]] })).await;

    let deleted = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteAllByExerNameForUser?name=jack&exerciseName=Squat",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), "Deleted document count.");
    assert_eq!(deleted.body["data"], 2);

    let none_left = send(
        &app,
        Method::DELETE,
        "/api/v1/exerciseRecord/deleteAllByExerNameForUser?name=jack&exerciseName=Squat",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(none_left.message(), "No document was found.");
    assert_eq!(none_left.body["data"], 0);

    let bench = send(
        &app,
        Method::GET,
        "/api/v1/exerciseRecord/getByUserExername?name=jack&exerciseName=Bench",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(bench.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_physique_records_upsert_per_slot() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;

    let first = send(
        &app,
        Method::POST,
        "/api/v1/physiqueRecord/add?username=jack&datetime=2024-05-01_07-00",
        Some(&jack),
        Some(json!({ "weight": 180.5, "height": "5'11\"" })),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.message(), "Added record successfully.");

    let second = send(
        &app,
        Method::POST,
        "/api/v1/physiqueRecord/add?username=jack&datetime=2024-05-01_07-20",
        Some(&jack),
        Some(json!({ "weight": 179.0, "height": "5'11\"" })),
    )
    .await;
    assert_eq!(second.body["data"]["id"], first.body["data"]["id"]);
    assert_eq!(second.body["data"]["weight"], 179.0);

    let grouped = send(
        &app,
        Method::GET,
        "/api/v1/physiqueRecord/getByUsernames?usernames=jack",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(grouped.status, StatusCode::OK);
    assert_eq!(grouped.body["data"][0].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_by_usernames_groups_per_user() {
    let (app, _) = create_test_app().await;
    let jack = user_session(&app, "jack").await;
    let jill = user_session(&app, "jill").await;
    add_record(&app, &jack, "2024-05-01_08-00", json!({ "exerciseName": "Squat", "sets": [[100.0]] })).await;
    add_record(&app, &jill, "2024-05-01_08-00", json!({ "exerciseName": "Squat", "sets": [[80.0]] })).await;
    add_record(&app, &jill, "2024-05-02_08-00", json!({ "exerciseName": "Row", "sets": [[60.0]] })).await;

    let response = send(
        &app,
        Method::GET,
        "/api/v1/exerciseRecord/getByUsernames?usernames=jack,jill",
        Some(&jack),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"][1].as_array().unwrap().len(), 2);
}
