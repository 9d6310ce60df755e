mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use common::{
    admin_token, create_task, create_user, future_due_date, get, json_request, send, token_for,
};
use task_manager_api::{
    db::entities::prelude::{Task, TaskComment},
    test_helpers::test_app,
};

#[tokio::test]
async fn create_task_with_priority_label() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;

    let response = create_task(
        &app,
        &token,
        json!({
            "title": "Test Task",
            "due_date": future_due_date(),
            "completed": false,
            "priority": "High",
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["priority"], "High");
    assert_eq!(response.body["title"], "Test Task");
    assert_eq!(response.body["completed"], false);
    assert_eq!(response.body["created_at"], response.body["updated_at"]);

    let me = send(&app, get("/users/me", &token)).await;
    assert_eq!(response.body["created_by"], me.body["id"]);
}

#[tokio::test]
async fn unknown_priority_writes_nothing() {
    let (app, state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;

    let response = create_task(
        &app,
        &token,
        json!({ "title": "Nope", "due_date": future_due_date(), "priority": "Urgent" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["detail"], "Priority not found");
    assert_eq!(Task::find().count(&state.db).await.expect("count"), 0);
}

#[tokio::test]
async fn unknown_assignee_is_rejected() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;

    let response = create_task(
        &app,
        &token,
        json!({ "title": "Orphan", "due_date": future_due_date(), "assigned_to": 9999 }),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["detail"], "Assignee not found");
}

#[tokio::test]
async fn partial_update_keeps_omitted_fields() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let created = create_task(
        &app,
        &token,
        json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "due_date": future_due_date(),
            "priority": "Low",
        }),
    )
    .await;
    let id = created.body["id"].as_i64().expect("task id");

    let updated = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}"),
            Some(&token),
            Some(json!({ "completed": true })),
        ),
    )
    .await;

    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["completed"], true);
    for field in ["title", "description", "priority", "due_date", "created_at", "created_by"] {
        assert_eq!(updated.body[field], created.body[field], "{field} changed");
    }
    let before =
        chrono::DateTime::parse_from_rfc3339(created.body["updated_at"].as_str().expect("ts"))
            .expect("parse");
    let after =
        chrono::DateTime::parse_from_rfc3339(updated.body["updated_at"].as_str().expect("ts"))
            .expect("parse");
    assert!(after > before);

    let cleared = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}"),
            Some(&token),
            Some(json!({ "priority": null, "description": null })),
        ),
    )
    .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.body["priority"].is_null());
    assert!(cleared.body["description"].is_null());
    assert_eq!(cleared.body["completed"], true);
}

#[tokio::test]
async fn update_rejects_unknown_priority_and_mismatched_id() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let created = create_task(
        &app,
        &token,
        json!({ "title": "Stable", "due_date": future_due_date(), "priority": "Medium" }),
    )
    .await;
    let id = created.body["id"].as_i64().expect("task id");

    let bad_priority = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}"),
            Some(&token),
            Some(json!({ "priority": "Urgent", "title": "Changed" })),
        ),
    )
    .await;
    assert_eq!(bad_priority.status, StatusCode::NOT_FOUND);

    let mismatched = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}"),
            Some(&token),
            Some(json!({ "id": id + 1, "title": "Changed" })),
        ),
    )
    .await;
    assert_eq!(mismatched.status, StatusCode::BAD_REQUEST);

    let current = send(&app, get(&format!("/tasks/{id}"), &token)).await;
    assert_eq!(current.body["title"], "Stable");
    assert_eq!(current.body["priority"], "Medium");
}

#[tokio::test]
async fn missing_and_malformed_task_ids() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;

    let missing = send(&app, get("/tasks/4242", &token)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["detail"], "Task not found");

    let malformed = send(&app, get("/tasks/abc", &token)).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.body["detail"], "Invalid task id");
}

#[tokio::test]
async fn delete_task_removes_its_comments() {
    let (app, state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let created = create_task(
        &app,
        &token,
        json!({ "title": "Short lived", "due_date": future_due_date() }),
    )
    .await;
    let id = created.body["id"].as_i64().expect("task id");

    for text in ["first", "second"] {
        let comment = send(
            &app,
            json_request(
                Method::POST,
                &format!("/tasks/{id}/comments/"),
                Some(&token),
                Some(json!({ "description": text })),
            ),
        )
        .await;
        assert_eq!(comment.status, StatusCode::OK);
    }

    let deleted = send(
        &app,
        json_request(Method::DELETE, &format!("/tasks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);
    assert_eq!(deleted.body["task"]["title"], "Short lived");

    assert_eq!(TaskComment::find().count(&state.db).await.expect("count"), 0);
    let comments = send(&app, get(&format!("/tasks/{id}/comments/"), &token)).await;
    assert_eq!(comments.status, StatusCode::NOT_FOUND);
    let again = send(&app, get(&format!("/tasks/{id}"), &token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_and_limit() {
    let (app, _state) = test_app().await.expect("test app");
    let admin = admin_token(&app).await;
    let erin_id = create_user(&app, &admin, "erin", "erin-password").await;
    let erin = token_for(&app, "erin", "erin-password").await;

    create_task(&app, &admin, json!({ "title": "a", "due_date": future_due_date() })).await;
    create_task(
        &app,
        &admin,
        json!({ "title": "b", "due_date": future_due_date(), "assigned_to": erin_id }),
    )
    .await;
    create_task(&app, &erin, json!({ "title": "c", "due_date": future_due_date() })).await;

    let all = send(&app, get("/tasks/", &erin)).await;
    assert_eq!(all.body.as_array().map(Vec::len), Some(3));

    let assigned = send(&app, get(&format!("/tasks/?assignedTo={erin_id}"), &erin)).await;
    assert_eq!(titles(&assigned.body), vec!["b"]);

    let by_erin = send(&app, get(&format!("/tasks/?created_by={erin_id}"), &erin)).await;
    assert_eq!(by_erin.body[0]["title"], "c");
    assert_eq!(by_erin.body.as_array().map(Vec::len), Some(1));

    let page = send(&app, get("/tasks/?offset=1&limit=1", &erin)).await;
    assert_eq!(page.body.as_array().map(Vec::len), Some(1));
    assert_eq!(page.body[0]["title"], "b");

    let too_many = send(&app, get("/tasks/?limit=21", &erin)).await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_partition_by_completion() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    for (title, completed) in [("one", true), ("two", false), ("three", false)] {
        create_task(
            &app,
            &token,
            json!({ "title": title, "due_date": future_due_date(), "completed": completed }),
        )
        .await;
    }

    let stats = send(&app, get("/tasks/statistics", &token)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body, json!({ "completed": 1, "no_completed": 2, "total": 3 }));

    let only_done = send(&app, get("/tasks/statistics?completed=true", &token)).await;
    assert_eq!(only_done.body, json!({ "completed": 1, "no_completed": 0, "total": 1 }));

    let past = send(&app, get("/tasks/statistics?due_to=2000-01-01", &token)).await;
    assert_eq!(past.body["total"], 0);
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .expect("array")
        .iter()
        .map(|task| task["title"].as_str().expect("title").to_string())
        .collect()
}

fn query_value(timestamp: &str) -> String {
    timestamp.replace('+', "%2B")
}

#[tokio::test]
async fn date_ranges_include_start_and_exclude_end() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;

    let mut created_at = Vec::new();
    for (title, due) in [
        ("before", "2030-05-01T09:59:59.999999Z"),
        ("at-start", "2030-05-01T10:00:00Z"),
        ("inside", "2030-05-01T10:00:00.5Z"),
        ("at-end", "2030-05-01T12:00:00+01:00"),
    ] {
        let response = create_task(&app, &token, json!({ "title": title, "due_date": due })).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        created_at.push(
            response.body["created_at"]
                .as_str()
                .expect("created_at")
                .to_string(),
        );
    }

    let window = format!(
        "due_from=2030-05-01T10:00:00Z&due_to={}",
        query_value("2030-05-01T12:00:00+01:00")
    );
    let listed = send(&app, get(&format!("/tasks/?{window}"), &token)).await;
    assert_eq!(titles(&listed.body), vec!["at-start", "inside"]);
    let stats = send(&app, get(&format!("/tasks/statistics?{window}"), &token)).await;
    assert_eq!(stats.body["total"], 2);

    let before = send(
        &app,
        get("/tasks/statistics?due_to=2030-05-01T10:00:00Z", &token),
    )
    .await;
    assert_eq!(before.body["total"], 1);

    let from_end = send(&app, get("/tasks/?due_from=2030-05-01T11:00:00Z", &token)).await;
    assert_eq!(titles(&from_end.body), vec!["at-end"]);

    let created_window = format!(
        "created_from={}&created_to={}",
        query_value(&created_at[1]),
        query_value(&created_at[3])
    );
    let created = send(&app, get(&format!("/tasks/?{created_window}"), &token)).await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    assert_eq!(titles(&created.body), vec!["at-start", "inside"]);

    let created_stats = send(
        &app,
        get(&format!("/tasks/statistics?{created_window}"), &token),
    )
    .await;
    assert_eq!(created_stats.body["total"], 2);
}
