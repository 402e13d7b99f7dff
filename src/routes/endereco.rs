//! Address routes under the API base path.

use crate::controller::{
    AddressBody, AddressController, AddressList, CreatedAddressBody, UpdatedAddressBody,
};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{AddressInput, AddressPatch};
use crate::response::{self, MessageBody, Reply};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

async fn list(State(state): State<AppState>) -> Result<Reply<AddressList>, AppError> {
    let enderecos = AddressController::list(state.store.as_ref()).await?;
    if enderecos.is_empty() {
        return Err(AppError::NoRecords);
    }
    Ok(response::ok(AddressList {
        quantidade: enderecos.len(),
        enderecos,
    }))
}

async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<AddressBody>, AppError> {
    AddressController::get(state.store.as_ref(), &id).await
}

async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddressInput>,
) -> Result<Reply<CreatedAddressBody>, AppError> {
    AddressController::insert(state.store.as_ref(), body).await
}

async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Reply<MessageBody>, AppError> {
    AddressController::delete(state.store.as_ref(), &id).await
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AddressPatch>,
) -> Result<Reply<UpdatedAddressBody>, AppError> {
    AddressController::update(state.store.as_ref(), &id, body).await
}

pub fn endereco_routes(state: AppState) -> Router {
    Router::new()
        .route("/enderecos", get(list))
        .route("/endereco/:id", get(read).delete(delete).put(update))
        .route("/inserirEndereco", post(create))
        .with_state(state)
}
