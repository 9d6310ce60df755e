mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{admin_token, create_task, future_due_date, get, json_request, send};
use task_manager_api::test_helpers::test_app;

async fn add_comment(app: &axum::Router, token: &str, task_id: i64, text: &str) -> Value {
    let response = send(
        app,
        json_request(
            Method::POST,
            &format!("/tasks/{task_id}/comments/"),
            Some(token),
            Some(json!({ "description": text })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body
}

#[tokio::test]
async fn delete_one_comment_leaves_the_other_usable() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let task = create_task(
        &app,
        &token,
        json!({ "title": "Discuss", "due_date": future_due_date() }),
    )
    .await;
    let task_id = task.body["id"].as_i64().expect("task id");

    let first = add_comment(&app, &token, task_id, "first").await;
    let second = add_comment(&app, &token, task_id, "second").await;
    let first_id = first["id"].as_i64().expect("id");
    let second_id = second["id"].as_i64().expect("id");

    let deleted = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/tasks/{task_id}/comments/{first_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);
    assert_eq!(deleted.body["comment"]["description"], "first");

    let gone = send(&app, get(&format!("/tasks/{task_id}/comments/{first_id}"), &token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["detail"], "Comment not found");

    let updated = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{task_id}/comments/{second_id}"),
            Some(&token),
            Some(json!({ "description": "second, edited" })),
        ),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["description"], "second, edited");
    assert_eq!(updated.body["created_at"], second["created_at"]);

    let fetched = send(&app, get(&format!("/tasks/{task_id}/comments/{second_id}"), &token)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["description"], "second, edited");
}

#[tokio::test]
async fn comments_list_oldest_first() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let task = create_task(
        &app,
        &token,
        json!({ "title": "Thread", "due_date": future_due_date() }),
    )
    .await;
    let task_id = task.body["id"].as_i64().expect("task id");

    for text in ["one", "two", "three"] {
        add_comment(&app, &token, task_id, text).await;
    }

    let listed = send(&app, get(&format!("/tasks/{task_id}/comments"), &token)).await;
    let texts: Vec<_> = listed
        .body
        .as_array()
        .expect("array")
        .iter()
        .map(|comment| comment["description"].clone())
        .collect();
    assert_eq!(texts, vec![json!("one"), json!("two"), json!("three")]);
}

#[tokio::test]
async fn comment_is_only_reachable_through_its_task() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let due = future_due_date();
    let owner = create_task(&app, &token, json!({ "title": "Owner", "due_date": due })).await;
    let other = create_task(&app, &token, json!({ "title": "Other", "due_date": due })).await;
    let owner_id = owner.body["id"].as_i64().expect("id");
    let other_id = other.body["id"].as_i64().expect("id");

    let comment = add_comment(&app, &token, owner_id, "mine").await;
    let comment_id = comment["id"].as_i64().expect("id");

    let wrong_parent = send(
        &app,
        get(&format!("/tasks/{other_id}/comments/{comment_id}"), &token),
    )
    .await;
    assert_eq!(wrong_parent.status, StatusCode::NOT_FOUND);

    let missing_task = send(&app, get(&format!("/tasks/9999/comments/{comment_id}"), &token)).await;
    assert_eq!(missing_task.status, StatusCode::NOT_FOUND);
    assert_eq!(missing_task.body["detail"], "Task not found");
}

#[tokio::test]
async fn empty_description_is_invalid() {
    let (app, _state) = test_app().await.expect("test app");
    let token = admin_token(&app).await;
    let task = create_task(
        &app,
        &token,
        json!({ "title": "Quiet", "due_date": future_due_date() }),
    )
    .await;
    let task_id = task.body["id"].as_i64().expect("task id");

    let response = send(
        &app,
        json_request(
            Method::POST,
            &format!("/tasks/{task_id}/comments/"),
            Some(&token),
            Some(json!({ "description": "   " })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["detail"].is_string());
}
