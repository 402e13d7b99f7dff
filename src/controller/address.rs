use super::parse_id;
use crate::error::AppError;
use crate::messages;
use crate::model::{Address, AddressInput, AddressPatch};
use crate::response::{self, MessageBody, Reply};
use crate::store::Store;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AddressList {
    pub quantidade: usize,
    pub enderecos: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct AddressBody {
    pub endereco: Address,
}

#[derive(Debug, Serialize)]
pub struct CreatedAddressBody {
    pub message: &'static str,
    pub endereco: Address,
}

#[derive(Debug, Serialize)]
pub struct UpdatedAddressBody {
    pub message: &'static str,
    pub endereco: Address,
}

pub struct AddressController;

impl AddressController {
    pub async fn list(store: &dyn Store) -> Result<Vec<Address>, AppError> {
        Ok(store.list_addresses().await?)
    }

    pub async fn get(store: &dyn Store, raw_id: &str) -> Result<Reply<AddressBody>, AppError> {
        let id = parse_id(raw_id)?;
        let endereco = store.find_address(id).await?.ok_or(AppError::NotFound)?;
        Ok(response::ok(AddressBody { endereco }))
    }

    pub async fn insert(
        store: &dyn Store,
        input: AddressInput,
    ) -> Result<Reply<CreatedAddressBody>, AppError> {
        let address = input.validate()?;
        let endereco = store.insert_address(&address).await?;
        tracing::info!(id = endereco.id, id_usuario = ?endereco.id_usuario, "address created");
        Ok(response::created(CreatedAddressBody {
            message: messages::SUCCESS_CREATED_ITEM,
            endereco,
        }))
    }

    pub async fn delete(store: &dyn Store, raw_id: &str) -> Result<Reply<MessageBody>, AppError> {
        let id = parse_id(raw_id)?;
        if !store.delete_address(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(id, "address deleted");
        Ok(response::ok(MessageBody {
            message: messages::SUCCESS_DELETED_ITEM,
        }))
    }

    pub async fn update(
        store: &dyn Store,
        raw_id: &str,
        patch: AddressPatch,
    ) -> Result<Reply<UpdatedAddressBody>, AppError> {
        let id = parse_id(raw_id)?;
        let changes = patch.validate()?;
        let endereco = store
            .update_address(id, &changes)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(response::ok(UpdatedAddressBody {
            message: messages::SUCCESS_UPDATED_ITEM,
            endereco,
        }))
    }
}
