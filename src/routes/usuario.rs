//! User routes under the API base path.

use crate::controller::{CreatedUserBody, UpdatedUserBody, UserBody, UserController, UserList};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{UserInput, UserPatch, UserWithAddress};
use crate::response::{self, MessageBody, Reply};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

async fn list(State(state): State<AppState>) -> Result<Reply<UserList>, AppError> {
    let usuarios = UserController::list(state.store.as_ref()).await?;
    if usuarios.is_empty() {
        return Err(AppError::NoRecords);
    }
    Ok(response::ok(UserList {
        quantidade: usuarios.len(),
        usuarios,
    }))
}

async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<UserBody>, AppError> {
    UserController::get(state.store.as_ref(), &id).await
}

async fn read_with_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<UserWithAddress>, AppError> {
    UserController::get_with_address(state.store.as_ref(), &id).await
}

async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UserInput>,
) -> Result<Reply<CreatedUserBody>, AppError> {
    UserController::insert(state.store.as_ref(), body).await
}

async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<MessageBody>, AppError> {
    UserController::delete(state.store.as_ref(), &id).await
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UserPatch>,
) -> Result<Reply<UpdatedUserBody>, AppError> {
    UserController::update(state.store.as_ref(), &id, body).await
}

pub fn usuario_routes(state: AppState) -> Router {
    Router::new()
        .route("/usuarios", get(list))
        .route("/usuario/:id", get(read).delete(delete).put(update))
        .route("/usuario/:id/endereco", get(read_with_address))
        .route("/inserirUsuario", post(create))
        .with_state(state)
}
