//! Data-access interface: one trait per entity, implemented for PostgreSQL and in memory.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::StoreError;
use crate::model::{Address, AddressChanges, NewAddress, NewUser, User, UserChanges, UserWithAddress};
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError>;

    /// The user and its first linked address (lowest address id).
    async fn find_user_with_address(&self, id: i32) -> Result<Option<UserWithAddress>, StoreError>;

    /// Insert a user and, if given, an address owned by it. Both writes succeed or neither does.
    /// The address's `id_usuario` is replaced by the new user's id.
    async fn insert_user(
        &self,
        user: &NewUser,
        address: Option<&NewAddress>,
    ) -> Result<UserWithAddress, StoreError>;

    /// Returns the updated row, or `None` if no user has this id.
    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError>;

    /// Returns whether a row was removed. Addresses owned by the user are kept, unlinked.
    async fn delete_user(&self, id: i32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AddressStore: Send + Sync {
    async fn list_addresses(&self) -> Result<Vec<Address>, StoreError>;

    async fn find_address(&self, id: i32) -> Result<Option<Address>, StoreError>;

    /// Fails with `StoreError::UnknownUser` if `id_usuario` names no user.
    async fn insert_address(&self, address: &NewAddress) -> Result<Address, StoreError>;

    async fn update_address(
        &self,
        id: i32,
        changes: &AddressChanges,
    ) -> Result<Option<Address>, StoreError>;

    async fn delete_address(&self, id: i32) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from a backend.
#[async_trait]
pub trait Store: UserStore + AddressStore {
    /// Cheap liveness check used by `/ready`.
    async fn ping(&self) -> Result<(), StoreError>;
}
