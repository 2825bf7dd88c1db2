use crate::helpers::spawn_app;
use referral_notify::push::{FailureKind, SendOutcome};
use serde_json::json;

#[tokio::test]
async fn a_created_request_dispatches_to_the_assignee() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);

    // act
    let response = app
        .post_json(
            "/events/requests/created",
            json!({
                "id": "R1",
                "data": { "assigneeId": "U1", "serviceName": "Plumbing" }
            }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());

    let saved = app.notifications();
    assert_eq!(1, saved.len());
    assert_eq!(saved[0].recipient_id, "U1");
    assert_eq!(saved[0].category, "new-request");
    assert_eq!(saved[0].entity_id.as_deref(), Some("R1"));
    assert!(saved[0].message.contains("Plumbing"));
    assert!(!saved[0].read);

    let calls = app.push_gateway.calls();
    assert_eq!(1, calls.len());
    assert_eq!(calls[0].tokens, vec!["token-1".to_string()]);
    assert_eq!(
        calls[0].message.data.get("deepLink").map(String::as_str),
        Some("app://requests/R1")
    );
    assert_eq!(
        calls[0].message.data.get("category").map(String::as_str),
        Some("new-request")
    );
}

#[tokio::test]
async fn a_created_request_without_an_assignee_is_ignored() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json(
            "/events/requests/created",
            json!({ "id": "R1", "data": { "serviceName": "Plumbing" } }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert!(app.notifications().is_empty());
    assert!(app.push_gateway.calls().is_empty());
}

#[tokio::test]
async fn the_legacy_assignee_field_is_honored() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U2", vec!["token-2".into()]);

    // act
    app.post_json(
        "/events/requests/created",
        json!({ "id": "R2", "data": { "professionalId": "U2" } }),
    )
    .await;

    // assert
    let saved = app.notifications();
    assert_eq!(1, saved.len());
    assert_eq!(saved[0].recipient_id, "U2");
    // No service field at all falls back to the default wording.
    assert!(saved[0].message.contains("a service"));
}

#[tokio::test]
async fn the_nested_service_title_is_used_when_flat_fields_are_missing() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);

    // act
    app.post_json(
        "/events/requests/created",
        json!({
            "id": "R3",
            "data": { "assigneeId": "U1", "service": { "title": "Gardening" } }
        }),
    )
    .await;

    // assert
    let saved = app.notifications();
    assert_eq!(1, saved.len());
    assert!(saved[0].message.contains("Gardening"));
}

#[tokio::test]
async fn a_missing_user_still_gets_an_inbox_record_but_no_push() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json(
            "/events/requests/created",
            json!({ "id": "R1", "data": { "assigneeId": "ghost" } }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(1, app.notifications().len());
    assert!(app.push_gateway.calls().is_empty());
}

#[tokio::test]
async fn a_user_with_no_usable_tokens_gets_an_inbox_record_but_no_push() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["".into()]);

    // act
    app.post_json(
        "/events/requests/created",
        json!({ "id": "R1", "data": { "assigneeId": "U1" } }),
    )
    .await;

    // assert
    assert_eq!(1, app.notifications().len());
    assert!(app.push_gateway.calls().is_empty());
}

#[tokio::test]
async fn exactly_the_invalid_tokens_are_pruned() {
    // arrange
    let app = spawn_app().await;
    app.seed_user(
        "U1",
        vec!["alive".into(), "gone".into(), "mangled".into(), "flaky".into()],
    );
    app.push_gateway.respond_with(vec![
        SendOutcome::Delivered,
        SendOutcome::Failed(FailureKind::Unregistered),
        SendOutcome::Failed(FailureKind::InvalidToken),
        SendOutcome::Failed(FailureKind::Other("Unavailable".into())),
    ]);

    // act
    let response = app
        .post_json(
            "/events/requests/created",
            json!({ "id": "R1", "data": { "assigneeId": "U1" } }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        app.user_tokens("U1"),
        vec!["alive".to_string(), "flaky".to_string()]
    );
}

#[tokio::test]
async fn a_gateway_outage_is_swallowed_and_the_record_survives() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);
    app.push_gateway.fail_next("connection reset");

    // act
    let response = app
        .post_json(
            "/events/requests/created",
            json!({ "id": "R1", "data": { "assigneeId": "U1" } }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(1, app.notifications().len());
    assert_eq!(app.user_tokens("U1"), vec!["token-1".to_string()]);
}

#[tokio::test]
async fn an_unchanged_status_dispatches_nothing() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);

    // act
    let response = app
        .post_json(
            "/events/requests/updated",
            json!({
                "id": "R1",
                "before": { "assigneeId": "U1", "status": "accepted" },
                "after": { "assigneeId": "U1", "status": "accepted" }
            }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert!(app.notifications().is_empty());
    assert!(app.push_gateway.calls().is_empty());
}

#[tokio::test]
async fn an_accepted_status_dispatches_a_client_accepted_notification() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);

    // act
    app.post_json(
        "/events/requests/updated",
        json!({
            "id": "R1",
            "before": { "assigneeId": "U1", "status": "created" },
            "after": { "assigneeId": "U1", "status": "accepted", "serviceName": "Plumbing" }
        }),
    )
    .await;

    // assert
    let saved = app.notifications();
    assert_eq!(1, saved.len());
    assert_eq!(saved[0].category, "client-accepted");
    assert!(saved[0].message.contains("Plumbing"));
}

#[tokio::test]
async fn declined_statuses_dispatch_a_client_declined_notification() {
    for status in ["declined", "declined-by-requester"] {
        // arrange
        let app = spawn_app().await;
        app.seed_user("U1", vec!["token-1".into()]);

        // act
        app.post_json(
            "/events/requests/updated",
            json!({
                "id": "R1",
                "before": { "assigneeId": "U1", "status": "created" },
                "after": { "assigneeId": "U1", "status": status }
            }),
        )
        .await;

        // assert
        let saved = app.notifications();
        assert_eq!(1, saved.len(), "status {} produced no dispatch", status);
        assert_eq!(saved[0].category, "client-declined");
    }
}

#[tokio::test]
async fn other_status_values_dispatch_nothing() {
    // arrange
    let app = spawn_app().await;
    app.seed_user("U1", vec!["token-1".into()]);

    // act
    let response = app
        .post_json(
            "/events/requests/updated",
            json!({
                "id": "R1",
                "before": { "assigneeId": "U1", "status": "created" },
                "after": { "assigneeId": "U1", "status": "cancelled" }
            }),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    assert!(app.notifications().is_empty());
}
