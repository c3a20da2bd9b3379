// Integration tests for user-records

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use user_records::api::{HttpRecordsApi, Operation, RecordsApi, UserPayload, UserRecord};
use user_records::app::dispatch::{ApiOutcome, ApiRequest, Dispatcher, execute};
use user_records::error::ApiError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpRecordsApi {
    HttpRecordsApi::new(&format!("{}/api/users/", server.uri()), Duration::from_secs(5))
        .expect("valid url")
}

fn payload(name: &str, email: &str) -> UserPayload {
    UserPayload {
        name: name.into(),
        email: email.into(),
    }
}

// 1) HTTP client against a mock collection endpoint
mod http_client {
    use super::*;

    #[tokio::test]
    async fn list_parses_records_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "name": "bob", "email": "bob@example.com"},
                {"id": 1, "name": "alice", "email": "alice@example.com"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let users = client_for(&server).list_users().await.unwrap();
        assert_eq!(
            users,
            vec![
                UserRecord::new(2, "bob", "bob@example.com"),
                UserRecord::new(1, "alice", "alice@example.com"),
            ]
        );
    }

    #[tokio::test]
    async fn list_failure_reports_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "Service down"})))
            .mount(&server)
            .await;

        let err = client_for(&server).list_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
        assert_eq!(err.user_message(Operation::Fetch), "Service down");
    }

    #[tokio::test]
    async fn list_with_html_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { body: None, .. }));
        assert_eq!(err.user_message(Operation::Fetch), "Failed to fetch users");
    }

    #[tokio::test]
    async fn create_posts_name_and_email_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/"))
            .and(body_json(json!({"name": "cara", "email": "cara@example.com"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "✅ User created successfully!",
                "data": {"id": 11, "name": "cara", "email": "cara@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let msg = client_for(&server)
            .create_user(&payload("cara", "cara@example.com"))
            .await
            .unwrap();
        assert_eq!(msg.as_deref(), Some("✅ User created successfully!"));
    }

    #[tokio::test]
    async fn create_with_plain_record_body_has_no_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "x", "email": "y"})))
            .mount(&server)
            .await;

        let msg = client_for(&server).create_user(&payload("x", "y")).await.unwrap();
        assert_eq!(msg, None);
    }

    #[tokio::test]
    async fn update_hits_record_path_and_flattens_errors() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/5/"))
            .and(body_json(json!({"name": "finn", "email": "dup@example.com"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"email": ["already exists"]})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update_user(5, &payload("finn", "dup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(Operation::Update), "already exists");
    }

    #[tokio::test]
    async fn delete_hits_record_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/7/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_user(7).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpRecordsApi::new(&format!("http://127.0.0.1:{port}/api/users/"), Duration::from_secs(2)).unwrap();
        let err = client.delete_user(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message(Operation::Delete), "Failed to delete user");
    }
}

// 2) Request execution and dispatch
mod dispatch {
    use super::*;

    #[tokio::test]
    async fn execute_reduces_errors_to_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "name": ["This field may not be blank."],
                "email": ["Enter a valid email address."]
            })))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let outcome = execute(&api, ApiRequest::Create(payload("", "nope"))).await;
        assert_eq!(
            outcome,
            ApiOutcome::Created(Err(
                "This field may not be blank., Enter a valid email address.".to_string()
            ))
        );
    }

    #[test]
    fn dispatcher_reports_outcome_over_channel() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .and(path("/api/users/7/"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/users/"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let api: Arc<dyn RecordsApi> = Arc::new(client_for(&server));
        let (dispatcher, outcomes) = Dispatcher::new(api, runtime.handle().clone());

        let mut app = user_records::app::AppState::default();
        app.users = vec![UserRecord::new(7, "gus", "gus@example.com")];
        app.request_delete(7);
        dispatcher.dispatch(app.confirm_delete().expect("delete request"));

        let outcome = outcomes.recv_timeout(Duration::from_secs(5)).expect("delete outcome");
        assert_eq!(outcome, ApiOutcome::Deleted(Ok(())));
        let refetch = app.apply_outcome(outcome).expect("list re-fetch");
        assert!(!app.confirm.is_active());

        dispatcher.dispatch(refetch);
        let listed = outcomes.recv_timeout(Duration::from_secs(5)).expect("list outcome");
        assert_eq!(app.apply_outcome(listed), None);
        assert!(app.users.is_empty());

        runtime.block_on(server.verify());
    }

    #[test]
    fn created_record_appears_after_refetch() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/users/"))
                .and(body_json(json!({"name": "hana", "email": "hana@example.com"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "message": "User created",
                    "data": {"id": 12, "name": "hana", "email": "hana@example.com"}
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/users/"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": 1, "name": "alice", "email": "alice@example.com"},
                    {"id": 12, "name": "hana", "email": "hana@example.com"}
                ])))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let api: Arc<dyn RecordsApi> = Arc::new(client_for(&server));
        let (dispatcher, outcomes) = Dispatcher::new(api, runtime.handle().clone());

        let mut app = user_records::app::AppState::default();
        app.users = vec![UserRecord::new(1, "alice", "alice@example.com")];
        app.draft.name = "hana".into();
        app.draft.email = "hana@example.com".into();
        dispatcher.dispatch(app.create_user().expect("create request"));

        let created = outcomes.recv_timeout(Duration::from_secs(5)).expect("create outcome");
        let refetch = app.apply_outcome(created).expect("list re-fetch");
        assert_eq!(refetch, ApiRequest::List);
        assert_eq!(app.notification.message, "User created");

        dispatcher.dispatch(refetch);
        let listed = outcomes.recv_timeout(Duration::from_secs(5)).expect("list outcome");
        assert_eq!(app.apply_outcome(listed), None);
        assert!(app.users.contains(&UserRecord::new(12, "hana", "hana@example.com")));
        assert_eq!(app.users.len(), 2);

        runtime.block_on(server.verify());
    }
}

// 3) Theme and keymap config files
#[test]
fn theme_and_keymap_files_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use user_records::app::Theme;
    use user_records::app::keymap::{KeyAction, Keymap};

    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let tmp = |tag: &str| -> String {
        let mut p: PathBuf = std::env::temp_dir();
        p.push(format!("urt_{}_{}_{}.conf", tag, std::process::id(), nonce));
        p.to_string_lossy().to_string()
    };

    // Theme write/read keeps every color.
    let theme_path = tmp("theme");
    let t = Theme::mocha();
    t.write_file(&theme_path).expect("write theme");
    assert_eq!(Theme::from_file(&theme_path), Some(t));

    // A partial override only touches the named key.
    fs::write(&theme_path, "error = #FF0000\nbogus = #000000\n").unwrap();
    let partial = Theme::from_file(&theme_path).unwrap();
    assert_eq!(partial.error, ratatui::style::Color::Rgb(0xff, 0, 0));
    assert_eq!(partial.text, Theme::mocha().text);

    // Keymap: init writes a file that loads back to the same bindings.
    let keys_path = tmp("keys");
    let _ = fs::remove_file(&keys_path);
    let _km = Keymap::load_or_init(&keys_path);
    assert!(PathBuf::from(&keys_path).exists());
    let reloaded = Keymap::from_file(&keys_path).unwrap();
    assert_eq!(reloaded.keys_for(KeyAction::Quit), vec!["q"]);

    // Custom binding on top of defaults.
    fs::write(&keys_path, "Refresh = Ctrl+r\n").unwrap();
    let custom = Keymap::from_file(&keys_path).unwrap();
    let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
    assert_eq!(custom.resolve(&ctrl_r), Some(KeyAction::Refresh));

    let _ = fs::remove_file(&theme_path);
    let _ = fs::remove_file(&keys_path);
}

// 4) Rendering through a test backend
mod rendering {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use user_records::api::UserRecord;
    use user_records::app::AppState;
    use user_records::app::timers::NotificationKind;
    use user_records::ui;

    fn screen(app: &mut AppState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| ui::render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn empty_list_shows_placeholder_row() {
        let mut app = AppState::default();
        let lines = screen(&mut app);
        let hits = lines.iter().filter(|l| l.contains("No users found")).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn records_and_form_are_drawn() {
        let mut app = AppState::default();
        app.users = vec![
            UserRecord::new(1, "alice", "alice@example.com"),
            UserRecord::new(2, "bob", "bob@example.com"),
        ];
        let bob = app.users[1].clone();
        app.begin_edit(&bob);
        let text = screen(&mut app).join("\n");
        assert!(text.contains("alice@example.com"));
        assert!(text.contains("Edit user #2"));
        assert!(!text.contains("No users found"));
    }

    #[test]
    fn dialog_and_notification_overlay() {
        let mut app = AppState::default();
        app.users = vec![UserRecord::new(7, "gus", "gus@example.com")];
        app.request_delete(7);
        app.notify("User deleted successfully", NotificationKind::Success);
        let text = screen(&mut app).join("\n");
        assert!(text.contains("Delete user 'gus' (id 7)?"));
        assert!(text.contains("User deleted successfully"));
    }
}
