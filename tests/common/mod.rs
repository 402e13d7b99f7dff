#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use itermob_api::model::{
    Address, AddressChanges, NewAddress, NewUser, User, UserChanges, UserWithAddress,
};
use itermob_api::{build_router, AddressStore, AppState, MemoryStore, Store, StoreError, UserStore};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

pub fn app() -> Router {
    build_router(AppState::new(MemoryStore::new()), 1024 * 1024)
}

/// Send a request; a JSON body is sent with `content-type: application/json`.
pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse JSON body")
    };
    (status, body)
}

pub fn user_payload(cpf: &str) -> Value {
    json!({
        "cpf": cpf,
        "nome": "Maria",
        "sobrenome": "Oliveira",
        "email": "maria@example.com",
        "telefone": "11912345678"
    })
}

pub fn address_payload() -> Value {
    json!({
        "logradouro": "Rua das Flores",
        "numero": "42",
        "complemento": "Apto 3",
        "bairro": "Jardim",
        "cidade": "Jandira",
        "estado": "SP",
        "cep": "06600-000"
    })
}

/// POST a user and return its id.
pub async fn create_user(app: &Router, body: Value) -> i64 {
    let (status, body) = call(app, Method::POST, "/v1/itermob/inserirUsuario", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["usuario"]["id"].as_i64().unwrap()
}

/// POST an address and return its id.
pub async fn create_address(app: &Router, body: Value) -> i64 {
    let (status, body) = call(app, Method::POST, "/v1/itermob/inserirEndereco", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["endereco"]["id"].as_i64().unwrap()
}

/// A store whose every call fails like an unreachable database.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Db(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for FailingStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Err(down())
    }

    async fn find_user(&self, _id: i32) -> Result<Option<User>, StoreError> {
        Err(down())
    }

    async fn find_user_with_address(&self, _id: i32) -> Result<Option<UserWithAddress>, StoreError> {
        Err(down())
    }

    async fn insert_user(
        &self,
        _user: &NewUser,
        _address: Option<&NewAddress>,
    ) -> Result<UserWithAddress, StoreError> {
        Err(down())
    }

    async fn update_user(&self, _id: i32, _changes: &UserChanges) -> Result<Option<User>, StoreError> {
        Err(down())
    }

    async fn delete_user(&self, _id: i32) -> Result<bool, StoreError> {
        Err(down())
    }
}

#[async_trait]
impl AddressStore for FailingStore {
    async fn list_addresses(&self) -> Result<Vec<Address>, StoreError> {
        Err(down())
    }

    async fn find_address(&self, _id: i32) -> Result<Option<Address>, StoreError> {
        Err(down())
    }

    async fn insert_address(&self, _address: &NewAddress) -> Result<Address, StoreError> {
        Err(down())
    }

    async fn update_address(
        &self,
        _id: i32,
        _changes: &AddressChanges,
    ) -> Result<Option<Address>, StoreError> {
        Err(down())
    }

    async fn delete_address(&self, _id: i32) -> Result<bool, StoreError> {
        Err(down())
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

pub fn failing_app() -> Router {
    build_router(AppState::new(FailingStore), 1024 * 1024)
}
