use dashwrite::config::AppConfig;
use dashwrite::error::Error;
use dashwrite::files::Selection;
use dashwrite::form::FormPhase;
use dashwrite::session::Route;
use dashwrite::todos::TodoItem;
use dashwrite::Dashwrite;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DB: &str = "main";
const COLLECTION: &str = "todos";
const BUCKET: &str = "pictures";

fn client_for(server: &MockServer) -> Dashwrite {
    let config = AppConfig::new(&server.uri(), "proj_test")
        .expect("endpoint should parse")
        .with_database(DB, COLLECTION)
        .with_bucket(BUCKET)
        .with_verification_url("https://dash.example.com/verify-email");
    Dashwrite::new(config)
}

fn todo_doc(id: &str, email: &str, todo: &str) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": COLLECTION,
        "$databaseId": DB,
        "$createdAt": "2026-08-01T00:00:00.000+00:00",
        "$updatedAt": "2026-08-01T00:00:00.000+00:00",
        "email": email,
        "todo": todo
    })
}

fn session_doc(email: &str) -> serde_json::Value {
    json!({
        "$id": "sess_1",
        "userId": "user_1",
        "providerUid": email,
        "expire": "2026-09-01T00:00:00.000+00:00",
        "secret": "opaque-session-secret"
    })
}

fn user_doc(email: &str) -> serde_json::Value {
    json!({
        "$id": "user_1",
        "name": "Test User",
        "email": email,
        "emailVerification": false
    })
}

async fn mount_document_list(server: &MockServer, documents: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents",
            DB, COLLECTION
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": documents.len(),
            "documents": documents
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn register_with_empty_credentials_never_reaches_the_service() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    let result = auth.register("Test User", "", "password123").await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let result = auth.register("Test User", "test@example.com", "").await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // The guard intercepted both attempts before any request was issued.
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn register_runs_all_three_steps_and_reports_success() {
    let mock_server = MockServer::start().await;

    let unique = Uuid::new_v4().to_string();
    let email = format!("test-{}@example.com", unique);

    Mock::given(method("POST"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_doc(&email)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_doc(&email)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/account/verification"))
        .and(body_partial_json(json!({
            "url": "https://dash.example.com/verify-email"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "token_1",
            "userId": "user_1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    let session = auth
        .register("Test User", &email, "password123")
        .await
        .expect("registration should succeed");

    assert_eq!(session.provider_uid, email);
    assert_eq!(
        auth.form().message(),
        Some("Registration successful! Please check your email for verification.")
    );
}

#[tokio::test]
async fn registration_step_failure_collapses_to_one_service_error() {
    let mock_server = MockServer::start().await;

    // Account creation succeeds, session creation is rejected.
    Mock::given(method("POST"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_doc("test@example.com")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "Rate limit exceeded",
            "code": 429,
            "type": "general_rate_limit_exceeded"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    let result = auth
        .register("Test User", "test@example.com", "password123")
        .await;

    assert!(matches!(result, Err(Error::Service(_))));
    assert_eq!(
        auth.form().message(),
        Some("An error occurred during registration.")
    );
}

#[tokio::test]
async fn login_success_routes_to_dashboard_with_the_supplied_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_doc("test@example.com")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_doc("test@example.com")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    let (session, route) = auth
        .login("test@example.com", "password123")
        .await
        .expect("login should succeed");

    assert_eq!(route, Route::Dashboard);
    // Dashboard greets with the email exactly as supplied at login.
    assert_eq!(session.provider_uid, "test@example.com");

    let gate = client.session_gate();
    let verified = gate
        .dashboard_entry()
        .await
        .expect("gate should pass with an active session");
    assert_eq!(verified.provider_uid, "test@example.com");
}

#[tokio::test]
async fn login_failure_does_not_route_to_dashboard() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials. Please check the email and password.",
            "code": 401,
            "type": "user_invalid_credentials"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    let result = auth.login("test@example.com", "wrong").await;

    // No route is produced on failure; the caller stays on the login view.
    assert!(matches!(result, Err(Error::Service(_))));
    assert_eq!(
        auth.form().message(),
        Some("An error occurred during login.")
    );
}

#[tokio::test]
async fn unauthenticated_dashboard_entry_redirects_before_any_fetch() {
    let mock_server = MockServer::start().await;
    mount_document_list(&mock_server, vec![todo_doc("doc_1", "a@example.com", "x")]).await;

    let client = client_for(&mock_server);
    let gate = client.session_gate();

    let route = gate
        .dashboard_entry()
        .await
        .expect_err("gate must fail without a session");
    assert_eq!(route, Route::Login);

    // The redirect happened before any todo data was fetched.
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn empty_todo_text_fails_validation_without_a_request() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let mut todos = client.todo_store();

    for text in ["", "   ", "\t\n"] {
        let result = todos.add("a@example.com", text).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    assert!(todos.list().is_empty());
    assert_eq!(todos.form().message(), Some("Please enter a valid TODO item."));

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn created_todo_appears_exactly_once_in_the_next_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents",
            DB, COLLECTION
        )))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(todo_doc("doc_9", "a@example.com", "buy milk")),
        )
        .mount(&mock_server)
        .await;

    mount_document_list(
        &mock_server,
        vec![
            todo_doc("doc_1", "a@example.com", "water plants"),
            todo_doc("doc_9", "a@example.com", "buy milk"),
        ],
    )
    .await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();

    let created = todos
        .add("a@example.com", "buy milk")
        .await
        .expect("create should succeed");
    assert_eq!(created.owner_email, "a@example.com");

    // Appended to the local cache immediately.
    assert_eq!(todos.list().len(), 1);

    let listed = todos.refresh().await.expect("refresh should succeed");
    let matches: Vec<_> = listed.iter().filter(|item| item.id == "doc_9").collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "buy milk");
}

#[tokio::test]
async fn edited_todo_changes_exactly_one_item() {
    let mock_server = MockServer::start().await;

    mount_document_list(
        &mock_server,
        vec![
            todo_doc("doc_1", "a@example.com", "water plants"),
            todo_doc("doc_2", "a@example.com", "buy milk"),
        ],
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents/doc_2",
            DB, COLLECTION
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(todo_doc("doc_2", "a@example.com", "buy oat milk")),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();
    todos.refresh().await.expect("refresh should succeed");

    todos
        .edit("doc_2", "buy oat milk")
        .await
        .expect("edit should succeed");

    let listed = todos.list();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].text, "water plants");
    assert_eq!(listed[1].id, "doc_2");
    assert_eq!(listed[1].text, "buy oat milk");
}

#[tokio::test]
async fn removed_todo_disappears_from_the_cache() {
    let mock_server = MockServer::start().await;

    mount_document_list(
        &mock_server,
        vec![
            todo_doc("doc_1", "a@example.com", "water plants"),
            todo_doc("doc_2", "a@example.com", "buy milk"),
        ],
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents/doc_1",
            DB, COLLECTION
        )))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();
    todos.refresh().await.expect("refresh should succeed");

    todos.remove("doc_1").await.expect("delete should succeed");

    assert!(todos.list().iter().all(|item| item.id != "doc_1"));
    assert_eq!(todos.list().len(), 1);
}

#[tokio::test]
async fn service_rejection_of_a_mutation_is_surfaced_not_swallowed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents",
            DB, COLLECTION
        )))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (documents.write)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();

    let result = todos.add("a@example.com", "buy milk").await;

    assert!(matches!(result, Err(Error::Service(_))));
    assert!(todos.list().is_empty());
    assert_eq!(todos.form().message(), Some("Failed to add todo."));
}

#[tokio::test]
async fn stale_refresh_result_is_discarded() {
    let mock_server = MockServer::start().await;
    mount_document_list(&mock_server, vec![todo_doc("doc_2", "a@example.com", "new")]).await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();

    // Two refreshes race: the older ticket resolves last.
    let stale_ticket = todos.begin_refresh();
    let fresh_ticket = todos.begin_refresh();

    let fresh_items = todos.fetch().await.expect("fetch should succeed");
    assert!(todos.complete_refresh(fresh_ticket, fresh_items));

    let stale_items = vec![TodoItem {
        id: "doc_1".to_string(),
        owner_email: "a@example.com".to_string(),
        text: "old".to_string(),
    }];
    assert!(!todos.complete_refresh(stale_ticket, stale_items));

    // The newer result wins regardless of resolution order.
    assert_eq!(todos.list().len(), 1);
    assert_eq!(todos.list()[0].id, "doc_2");
}

#[tokio::test]
async fn upload_without_selection_never_reaches_the_bucket() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let mut files = client.file_store();

    let result = files.upload(None).await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(
        files.form().message(),
        Some("Please select a file to upload.")
    );

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn upload_refreshes_the_listing_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/storage/buckets/{}/files", BUCKET)))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "file_9",
            "name": "cat.png",
            "sizeOriginal": 2048,
            "mimeType": "image/png",
            "$createdAt": "2026-08-01T00:00:00.000+00:00"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/storage/buckets/{}/files", BUCKET)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "files": [{
                "$id": "file_9",
                "name": "cat.png",
                "sizeOriginal": 2048,
                "mimeType": "image/png",
                "$createdAt": "2026-08-01T00:00:00.000+00:00"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut files = client.file_store();

    let uploaded = files
        .upload(Some(Selection {
            file_name: "cat.png".to_string(),
            bytes: bytes::Bytes::from_static(b"png-bytes"),
        }))
        .await
        .expect("upload should succeed");

    assert_eq!(uploaded.id, "file_9");
    assert_eq!(uploaded.size_bytes, 2048);
    assert_eq!(files.form().message(), Some("File uploaded successfully!"));

    // The listing was refreshed after the upload.
    assert_eq!(files.list().len(), 1);
    assert_eq!(files.list()[0].name, "cat.png");
}

#[tokio::test]
async fn download_handle_is_a_side_effect_only_url() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let files = client.file_store();

    let url = files
        .download_handle("file_1")
        .expect("handle should resolve");

    assert!(url
        .as_str()
        .ends_with("/storage/buckets/pictures/files/file_1/download?project=proj_test"));

    // Resolving the handle issues no request by itself.
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn logout_destroys_the_session_and_routes_to_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_doc("test@example.com")))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut auth = client.auth_flow();

    auth.login("test@example.com", "password123")
        .await
        .expect("login should succeed");

    let route = auth.logout().await.expect("logout should succeed");

    assert_eq!(route, Route::Login);
    assert!(client.account().current_session().is_none());
}

#[tokio::test]
async fn form_returns_to_submittable_state_after_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/databases/{}/collections/{}/documents",
            DB, COLLECTION
        )))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Internal server error",
            "code": 500,
            "type": "general_unknown"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut todos = client.todo_store();

    // Failures are terminal for the attempt but not for the form: an
    // immediate re-attempt goes straight back out.
    for _ in 0..2 {
        let result = todos.add("a@example.com", "buy milk").await;
        assert!(result.is_err());
        assert!(matches!(todos.form(), FormPhase::Failed(_)));
    }
}
