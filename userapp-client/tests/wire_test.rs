// End-to-end calls against a local mock of the UserApp service

use base64::Engine;
use mockito::{Matcher, Server, ServerGuard};
use userapp_client::{logging, param_array, param_struct, Client, ClientOptions, UserAppError};

fn basic(user: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
    format!("Basic {}", encoded)
}

fn options_for(server: &ServerGuard) -> ClientOptions {
    ClientOptions::new("app-id")
        .secure(false)
        .base_address(server.host_with_port())
        .timeout_ms(5000)
}

#[tokio::test]
async fn test_session_lifecycle_over_http() -> anyhow::Result<()> {
    logging::init_test_logging();
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/v1/user.login")
        .match_header("authorization", basic("app-id", "").as_str())
        .match_header("content-type", "application/json")
        .match_body(r#"{"login":"johndoe81","password":"iwasfirst!111"}"#)
        .with_body(r#"{"token":"abc123","user_id":"u1"}"#)
        .create_async()
        .await;

    let get = server
        .mock("POST", "/v1/user.get")
        .match_header("authorization", basic("app-id", "abc123").as_str())
        .match_body(Matcher::Json(serde_json::json!({"user_id": "self"})))
        .with_body(r#"[{"user_id":"u1","first_name":"John"}]"#)
        .create_async()
        .await;

    let logout = server
        .mock("POST", "/v1/user.logout")
        .match_header("authorization", basic("app-id", "abc123").as_str())
        .with_body("{}")
        .create_async()
        .await;

    let after_logout = server
        .mock("POST", "/v1/user.hasPermission")
        .match_header("authorization", basic("app-id", "").as_str())
        .with_body(r#"{"missing_permissions":["admin"]}"#)
        .create_async()
        .await;

    let client = Client::new(options_for(&server))?;

    let result = client
        .method("user.login")
        .parameter("login", "johndoe81")
        .parameter("password", "iwasfirst!111")
        .call()
        .await?;
    assert_eq!(result.get("token").as_string()?, "abc123");

    let user = client.method("user.get").parameter("user_id", "self").call().await?;
    assert_eq!(user.get(0).get("first_name").as_string()?, "John");

    client.method("user.logout").call().await?;

    let permissions = client
        .method("user.hasPermission")
        .parameter("permission", "admin")
        .call()
        .await?;
    assert_eq!(permissions.get("missing_permissions").len(), 1);

    login.assert_async().await;
    get.assert_async().await;
    logout.assert_async().await;
    after_logout.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_nested_parameters_on_the_wire() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/user.invoice.search")
        .match_body(
            r#"{"user_id":"self","sort":{"created_at":"asc","updated_at":"asc"},"fields":["invoice_id","created_at"]}"#,
        )
        .with_body(r#"{"items":[{"invoice_id":"i1"},{"invoice_id":"i2"}],"total_items":2}"#)
        .create_async()
        .await;

    let client = Client::new(options_for(&server))?;
    let invoices = client
        .method("user.invoice.search")
        .parameter("user_id", "self")
        .parameter(
            "sort",
            param_struct! {
                "created_at" => "asc",
                "updated_at" => "asc",
            },
        )
        .parameter("fields", param_array!["invoice_id", "created_at"])
        .call()
        .await?;

    mock.assert_async().await;
    assert_eq!(invoices.get("items").as_array()?.len(), 2);
    assert_eq!(invoices.get("total_items").as_integer()?, 2);
    assert_eq!(invoices.get("items").get(1).get("invoice_id").as_string()?, "i2");
    Ok(())
}

#[tokio::test]
async fn test_api_version_in_path() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/user.get")
        .with_body("[]")
        .create_async()
        .await;

    let client = Client::new(options_for(&server).version(2))?;
    let result = client.method("user.get").call().await?;

    mock.assert_async().await;
    assert!(result.exists());
    assert!(result.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_service_errors_over_http() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _invalid = server
        .mock("POST", "/v1/user.nope")
        .with_status(400)
        .with_body(r#"{"error_code":"INVALID_METHOD","message":"no such method"}"#)
        .create_async()
        .await;
    let _business = server
        .mock("POST", "/v1/user.login")
        .with_status(401)
        .with_body(r#"{"error_code":"INVALID_CREDENTIALS","message":"Login failed"}"#)
        .create_async()
        .await;

    let lenient = Client::new(options_for(&server).throw_errors(false))?;
    match lenient.method("user.nope").call().await {
        Err(UserAppError::InvalidMethod(message)) => assert_eq!(message, "no such method"),
        other => panic!("expected InvalidMethod, got {:?}", other),
    }

    let result = lenient.method("user.login").call().await?;
    assert_eq!(result.get("error_code").as_string()?, "INVALID_CREDENTIALS");
    assert!(lenient.session_token().await.is_none());

    let strict = Client::new(options_for(&server))?;
    let err = strict.method("user.login").call().await.unwrap_err();
    assert!(matches!(
        err,
        UserAppError::Service { ref code, ref message } if code == "INVALID_CREDENTIALS" && message == "Login failed"
    ));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() -> anyhow::Result<()> {
    let client = Client::new(
        ClientOptions::new("app-id")
            .secure(false)
            .base_address("127.0.0.1:9")
            .timeout_ms(2000),
    )?;

    let err = client.method("user.get").call().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {:?}", err);
    Ok(())
}
