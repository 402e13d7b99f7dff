use super::parse_id;
use crate::error::AppError;
use crate::messages;
use crate::model::{Address, User, UserInput, UserPatch, UserWithAddress};
use crate::response::{self, MessageBody, Reply};
use crate::store::Store;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserList {
    pub quantidade: usize,
    pub usuarios: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub usuario: User,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserBody {
    pub message: &'static str,
    pub usuario: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Address>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserBody {
    pub message: &'static str,
    pub usuario: User,
}

pub struct UserController;

impl UserController {
    /// All users; an empty list is the caller's "no records" case.
    pub async fn list(store: &dyn Store) -> Result<Vec<User>, AppError> {
        Ok(store.list_users().await?)
    }

    pub async fn get(store: &dyn Store, raw_id: &str) -> Result<Reply<UserBody>, AppError> {
        let id = parse_id(raw_id)?;
        let usuario = store.find_user(id).await?.ok_or(AppError::NotFound)?;
        Ok(response::ok(UserBody { usuario }))
    }

    /// The user with `endereco: null` when no address is linked.
    pub async fn get_with_address(
        store: &dyn Store,
        raw_id: &str,
    ) -> Result<Reply<UserWithAddress>, AppError> {
        let id = parse_id(raw_id)?;
        let found = store
            .find_user_with_address(id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(response::ok(found))
    }

    /// Any store failure here answers with the generic internal error.
    pub async fn insert(store: &dyn Store, input: UserInput) -> Result<Reply<CreatedUserBody>, AppError> {
        let (user, address) = input.validate()?;
        let created = store
            .insert_user(&user, address.as_ref())
            .await
            .map_err(|e| AppError::Internal(format!("insert user: {}", e)))?;
        tracing::info!(
            id = created.usuario.id,
            with_address = created.endereco.is_some(),
            "user created"
        );
        Ok(response::created(CreatedUserBody {
            message: messages::SUCCESS_CREATED_ITEM,
            usuario: created.usuario,
            endereco: created.endereco,
        }))
    }

    pub async fn delete(store: &dyn Store, raw_id: &str) -> Result<Reply<MessageBody>, AppError> {
        let id = parse_id(raw_id)?;
        if !store.delete_user(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(id, "user deleted");
        Ok(response::ok(MessageBody {
            message: messages::SUCCESS_DELETED_ITEM,
        }))
    }

    pub async fn update(
        store: &dyn Store,
        raw_id: &str,
        patch: UserPatch,
    ) -> Result<Reply<UpdatedUserBody>, AppError> {
        let id = parse_id(raw_id)?;
        let changes = patch.validate()?;
        let usuario = store
            .update_user(id, &changes)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(response::ok(UpdatedUserBody {
            message: messages::SUCCESS_UPDATED_ITEM,
            usuario,
        }))
    }
}
