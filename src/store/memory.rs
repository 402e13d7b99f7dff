//! In-process store with the same semantics as the PostgreSQL tables.

use super::{AddressStore, Store, UserStore};
use crate::error::StoreError;
use crate::model::{Address, AddressChanges, NewAddress, NewUser, User, UserChanges, UserWithAddress};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    addresses: BTreeMap<i32, Address>,
    last_user_id: i32,
    last_address_id: i32,
}

impl Tables {
    fn next_user_id(&mut self) -> i32 {
        self.last_user_id += 1;
        self.last_user_id
    }

    fn next_address_id(&mut self) -> i32 {
        self.last_address_id += 1;
        self.last_address_id
    }

    fn check_owner(&self, owner: Option<i32>) -> Result<(), StoreError> {
        match owner {
            Some(id) if !self.users.contains_key(&id) => Err(StoreError::UnknownUser(id)),
            _ => Ok(()),
        }
    }

    fn build_address(&mut self, address: &NewAddress, owner: Option<i32>) -> Address {
        Address {
            id: self.next_address_id(),
            id_usuario: owner,
            logradouro: address.logradouro.clone(),
            numero: address.numero.clone(),
            complemento: address.complemento.clone(),
            bairro: address.bairro.clone(),
            cidade: address.cidade.clone(),
            estado: address.estado.clone(),
            cep: address.cep.clone(),
        }
    }
}

/// Ids are generated sequentially from 1 and never reused, like `SERIAL`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read().users.values().cloned().collect())
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn find_user_with_address(&self, id: i32) -> Result<Option<UserWithAddress>, StoreError> {
        let tables = self.read();
        Ok(tables.users.get(&id).map(|usuario| UserWithAddress {
            usuario: usuario.clone(),
            endereco: tables
                .addresses
                .values()
                .find(|a| a.id_usuario == Some(id))
                .cloned(),
        }))
    }

    async fn insert_user(
        &self,
        user: &NewUser,
        address: Option<&NewAddress>,
    ) -> Result<UserWithAddress, StoreError> {
        let mut tables = self.write();
        let usuario = User {
            id: tables.next_user_id(),
            cpf: user.cpf.clone(),
            nome: user.nome.clone(),
            sobrenome: user.sobrenome.clone(),
            email: user.email.clone(),
            telefone: user.telefone.clone(),
        };
        tables.users.insert(usuario.id, usuario.clone());
        let endereco = address.map(|a| tables.build_address(a, Some(usuario.id)));
        if let Some(a) = &endereco {
            tables.addresses.insert(a.id, a.clone());
        }
        Ok(UserWithAddress { usuario, endereco })
    }

    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let mut tables = self.write();
        Ok(tables.users.get_mut(&id).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.write();
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        for address in tables.addresses.values_mut() {
            if address.id_usuario == Some(id) {
                address.id_usuario = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn list_addresses(&self) -> Result<Vec<Address>, StoreError> {
        Ok(self.read().addresses.values().cloned().collect())
    }

    async fn find_address(&self, id: i32) -> Result<Option<Address>, StoreError> {
        Ok(self.read().addresses.get(&id).cloned())
    }

    async fn insert_address(&self, address: &NewAddress) -> Result<Address, StoreError> {
        let mut tables = self.write();
        tables.check_owner(address.id_usuario)?;
        let row = tables.build_address(address, address.id_usuario);
        tables.addresses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_address(
        &self,
        id: i32,
        changes: &AddressChanges,
    ) -> Result<Option<Address>, StoreError> {
        let mut tables = self.write();
        if !tables.addresses.contains_key(&id) {
            return Ok(None);
        }
        tables.check_owner(changes.id_usuario.flatten())?;
        Ok(tables.addresses.get_mut(&id).map(|address| {
            changes.apply_to(address);
            address.clone()
        }))
    }

    async fn delete_address(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.write().addresses.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
