mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{address_payload, call, create_user, failing_app, send, user_payload};
use itermob_api::messages;
use serde_json::json;

#[tokio::test]
async fn listing_users_on_empty_store_is_not_found() {
    let app = common::app();
    let (status, body) = call(&app, Method::GET, "/v1/itermob/usuarios", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);
    assert_eq!(body["message"], messages::ERROR_NO_RECORDS);
}

#[tokio::test]
async fn listing_users_returns_every_stored_user() {
    let app = common::app();
    for cpf in ["111", "222", "333"] {
        create_user(&app, user_payload(cpf)).await;
    }
    let (status, body) = call(&app, Method::GET, "/v1/itermob/usuarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["quantidade"], 3);
    assert_eq!(body["usuarios"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn inserted_user_is_retrievable() {
    let app = common::app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/itermob/inserirUsuario",
        Some(user_payload("123.456.789-00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["message"], messages::SUCCESS_CREATED_ITEM);
    assert!(body.get("endereco").is_none());
    let id = body["usuario"]["id"].as_i64().unwrap();

    let (status, body) = call(&app, Method::GET, &format!("/v1/itermob/usuario/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["cpf"], "123.456.789-00");
    assert_eq!(body["usuario"]["nome"], "Maria");
}

#[tokio::test]
async fn missing_required_field_is_bad_request() {
    let app = common::app();
    for field in ["cpf", "nome", "sobrenome", "email", "telefone"] {
        let mut payload = user_payload("1");
        payload.as_object_mut().unwrap().remove(field);
        let (status, body) =
            call(&app, Method::POST, "/v1/itermob/inserirUsuario", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(body["message"], messages::ERROR_REQUIRED_FIELDS, "{field}");
    }
    let (status, _) = call(&app, Method::GET, "/v1/itermob/usuarios", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_with_nested_address_is_linked() {
    let app = common::app();
    let mut payload = user_payload("1");
    payload["dadosEndereco"] = address_payload();
    let (status, body) = call(&app, Method::POST, "/v1/itermob/inserirUsuario", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["usuario"]["id"].as_i64().unwrap();
    assert_eq!(body["endereco"]["id_usuario"], id);

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/v1/itermob/usuario/{id}/endereco"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["id"], id);
    assert_eq!(body["endereco"]["cidade"], "Jandira");
}

#[tokio::test]
async fn incomplete_nested_address_stores_nothing() {
    let app = common::app();
    let mut payload = user_payload("1");
    payload["dadosEndereco"] = json!({ "logradouro": "Rua Sem Número" });
    let (status, body) = call(&app, Method::POST, "/v1/itermob/inserirUsuario", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "required_fields");

    let (status, _) = call(&app, Method::GET, "/v1/itermob/usuarios", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::GET, "/v1/itermob/enderecos", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_without_address_has_null_endereco() {
    let app = common::app();
    let id = create_user(&app, user_payload("1")).await;
    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/v1/itermob/usuario/{id}/endereco"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endereco"].is_null());

    let (status, _) = call(&app, Method::GET, "/v1/itermob/usuario/999/endereco", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_user_is_not_found() {
    let app = common::app();
    let id = create_user(&app, user_payload("1")).await;
    let uri = format!("/v1/itermob/usuario/{id}");

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], messages::SUCCESS_DELETED_ITEM);

    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], messages::ERROR_NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_ids_are_bad_request() {
    let app = common::app();
    for uri in [
        "/v1/itermob/usuario/abc",
        "/v1/itermob/usuario/0",
        "/v1/itermob/usuario/-1/endereco",
    ] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], messages::ERROR_INVALID_ID);
    }
    let (status, _) = call(&app, Method::DELETE, "/v1/itermob/usuario/x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_update_changes_only_given_fields() {
    let app = common::app();
    let id = create_user(&app, user_payload("1")).await;
    let uri = format!("/v1/itermob/usuario/{id}");

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "nova@example.com", "id": 777 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], messages::SUCCESS_UPDATED_ITEM);
    assert_eq!(body["usuario"]["id"], id);

    let (_, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(body["usuario"]["email"], "nova@example.com");
    assert_eq!(body["usuario"]["nome"], "Maria");
}

#[tokio::test]
async fn update_rejects_empty_or_blank_fields() {
    let app = common::app();
    let id = create_user(&app, user_payload("1")).await;
    let uri = format!("/v1/itermob/usuario/{id}");

    let (status, _) = call(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::PUT, &uri, Some(json!({ "nome": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(
        &app,
        Method::PUT,
        "/v1/itermob/usuario/4242",
        Some(json!({ "nome": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn body_routes_require_json_content_type() {
    let app = common::app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/itermob/inserirUsuario")
        .header("content-type", "text/plain")
        .body(Body::from(user_payload("1").to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status_code"], 415);
    assert_eq!(body["message"], messages::ERROR_CONTENT_TYPE);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = common::app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/itermob/inserirUsuario")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"cpf": "#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_body");
}

#[tokio::test]
async fn insert_failure_is_internal_error() {
    let app = failing_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/itermob/inserirUsuario",
        Some(user_payload("1")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], messages::ERROR_INTERNAL_SERVER);
}

#[tokio::test]
async fn lookup_failure_is_database_error() {
    let app = failing_app();
    let (status, body) = call(&app, Method::GET, "/v1/itermob/usuario/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "database_error");
}

#[tokio::test]
async fn cors_is_allowed_on_api_routes() {
    let app = common::app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/itermob/usuarios")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn health_and_readiness() {
    let (status, body) = call(&common::app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&common::app(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (status, body) = call(&failing_app(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn nested_address_user_reference_is_ignored() {
    let app = common::app();
    let mut address = address_payload();
    address["id_usuario"] = json!(0);
    let mut payload = user_payload("1");
    payload["dadosEndereco"] = address;

    let (status, body) = call(&app, Method::POST, "/v1/itermob/inserirUsuario", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["usuario"]["id"].as_i64().unwrap();
    assert_eq!(body["endereco"]["id_usuario"], id);

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/v1/itermob/usuario/{id}/endereco"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endereco"]["id_usuario"], id);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let app = itermob_api::build_router(
        itermob_api::AppState::new(itermob_api::MemoryStore::new()),
        64,
    );
    let mut payload = user_payload("1");
    payload["nome"] = json!("M".repeat(200));
    let (status, body) = call(&app, Method::POST, "/v1/itermob/inserirUsuario", Some(payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "payload_too_large");
    assert_eq!(body["message"], messages::ERROR_PAYLOAD_TOO_LARGE);

    let (status, _) = call(&app, Method::GET, "/v1/itermob/usuarios", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
