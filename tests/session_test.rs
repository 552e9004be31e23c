use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use defensoria::{config::settings::Settings, modules, AppState};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_test_server(groq_base_url: String) -> TestServer {
    let settings = Settings {
        groq_base_url,
        ..Settings::default()
    };
    let state = AppState::new(settings);

    let app = Router::new()
        .merge(modules::session::routes::routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

async fn create_session(server: &TestServer) -> String {
    let response = server.post("/api/session").await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_session() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());

    let response = server.post("/api/session").await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["message_count"], 0);
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_session() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());
    let id = create_session(&server).await;

    let response = server.get(&format!("/api/session/{}", id)).await;

    response.assert_status(StatusCode::OK);
    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["id"], id.as_str());
}

#[tokio::test]
async fn test_get_session_not_found() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());

    let response = server
        .get("/api/session/6f1c2a9e-8d3b-4c6f-9a7e-2b5d8c1e4f03")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_session_invalid_id() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());

    let response = server.get("/api/session/invalid-id").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_sessions() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());
    create_session(&server).await;
    create_session(&server).await;

    let response = server.get("/api/sessions").await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_delete_session() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());
    let id = create_session(&server).await;

    let delete_response = server.delete(&format!("/api/session/{}", id)).await;
    delete_response.assert_status(StatusCode::OK);

    let get_response = server.get(&format!("/api/session/{}", id)).await;
    get_response.assert_status(StatusCode::NOT_FOUND);

    let again = server.delete(&format!("/api/session/{}", id)).await;
    again.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_records_user_then_assistant() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "llama3-70b-8192" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Oi!" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = setup_test_server(mock_server.uri());
    let id = create_session(&server).await;

    let response = server
        .post(&format!("/api/session/{}/chat", id))
        .json(&json!({ "message": "Olá", "api_key": "test-key" }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["session_id"], id.as_str());
    assert_eq!(body["message"]["speaker"], "user");
    assert_eq!(body["message"]["text"], "Olá");
    assert_eq!(body["response"]["speaker"], "assistant");
    assert_eq!(body["response"]["text"], "Oi!");
    assert!(body.get("error_kind").is_none());

    let session: serde_json::Value = server.get(&format!("/api/session/{}", id)).await.json();
    let messages = session["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["speaker"], "user");
    assert_eq!(messages[0]["text"], "Olá");
    assert_eq!(messages[1]["speaker"], "assistant");
    assert_eq!(messages[1]["text"], "Oi!");
}

#[tokio::test]
async fn test_chat_without_credential_records_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let server = setup_test_server(mock_server.uri());
    let id = create_session(&server).await;

    let response = server
        .post(&format!("/api/session/{}/chat", id))
        .json(&json!({ "message": "Posso ser despejado?" }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["response"]["text"], "missing credential");
    assert_eq!(body["error_kind"], "configuration");

    let session: serde_json::Value = server.get(&format!("/api/session/{}", id)).await.json();
    assert_eq!(session["message_count"], 2);
}

#[tokio::test]
async fn test_chat_upstream_failure_is_contained() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&mock_server)
        .await;

    let server = setup_test_server(mock_server.uri());
    let id = create_session(&server).await;

    let response = server
        .post(&format!("/api/session/{}/chat", id))
        .json(&json!({ "message": "Olá", "api_key": "key" }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error_kind"], "unexpected_shape");
    assert!(!body["response"]["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_blank_message_never_calls_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let server = setup_test_server(mock_server.uri());
    let id = create_session(&server).await;

    for message in ["", "   "] {
        let response = server
            .post(&format!("/api/session/{}/chat", id))
            .json(&json!({ "message": message, "api_key": "key" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let session: serde_json::Value = server.get(&format!("/api/session/{}", id)).await.json();
    assert_eq!(session["message_count"], 0);
}

#[tokio::test]
async fn test_chat_unknown_session() {
    let server = setup_test_server("http://127.0.0.1:9".to_string());

    let response = server
        .post("/api/session/6f1c2a9e-8d3b-4c6f-9a7e-2b5d8c1e4f03/chat")
        .json(&json!({ "message": "Olá", "api_key": "key" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
