//! Users, addresses and the request payloads that create or change them.
//!
//! Payload types are deserialized as-is from the request body and turned into
//! validated values (`NewUser`, `UserChanges`, ...) before they reach a store.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};

pub const CPF_MAX: usize = 14;
pub const NOME_MAX: usize = 100;
pub const SOBRENOME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 255;
pub const TELEFONE_MAX: usize = 20;
pub const LOGRADOURO_MAX: usize = 150;
pub const NUMERO_MAX: usize = 10;
pub const COMPLEMENTO_MAX: usize = 100;
pub const BAIRRO_MAX: usize = 100;
pub const CIDADE_MAX: usize = 100;
pub const ESTADO_MAX: usize = 50;
pub const CEP_MAX: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub cpf: String,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub telefone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: i32,
    pub id_usuario: Option<i32>,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
}

/// A user together with its address, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithAddress {
    pub usuario: User,
    pub endereco: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub cpf: String,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub telefone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub id_usuario: Option<i32>,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
}

/// Fields to overwrite on a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub cpf: Option<String>,
    pub nome: Option<String>,
    pub sobrenome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
}

/// Fields to overwrite on an address. The nullable columns use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub id_usuario: Option<Option<i32>>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<Option<String>>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        *self == UserChanges::default()
    }

    pub fn apply_to(&self, user: &mut User) {
        set_if(&mut user.cpf, &self.cpf);
        set_if(&mut user.nome, &self.nome);
        set_if(&mut user.sobrenome, &self.sobrenome);
        set_if(&mut user.email, &self.email);
        set_if(&mut user.telefone, &self.telefone);
    }
}

impl AddressChanges {
    pub fn is_empty(&self) -> bool {
        *self == AddressChanges::default()
    }

    pub fn apply_to(&self, address: &mut Address) {
        set_if(&mut address.id_usuario, &self.id_usuario);
        set_if(&mut address.logradouro, &self.logradouro);
        set_if(&mut address.numero, &self.numero);
        set_if(&mut address.complemento, &self.complemento);
        set_if(&mut address.bairro, &self.bairro);
        set_if(&mut address.cidade, &self.cidade);
        set_if(&mut address.estado, &self.estado);
        set_if(&mut address.cep, &self.cep);
    }
}

fn set_if<T: Clone>(slot: &mut T, change: &Option<T>) {
    if let Some(v) = change {
        *slot = v.clone();
    }
}

/// Body of `POST /inserirUsuario`.
#[derive(Debug, Default, Deserialize)]
pub struct UserInput {
    pub cpf: Option<String>,
    pub nome: Option<String>,
    pub sobrenome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    #[serde(rename = "dadosEndereco")]
    pub dados_endereco: Option<AddressInput>,
}

/// Body of `POST /inserirEndereco`, also nested as `dadosEndereco`.
#[derive(Debug, Default, Deserialize)]
pub struct AddressInput {
    pub id_usuario: Option<i32>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

/// Body of `PUT /usuario/:id`. An explicit `null` is kept apart from an absent key.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub cpf: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub nome: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub sobrenome: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub telefone: Option<Option<String>>,
}

/// Body of `PUT /endereco/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct AddressPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub id_usuario: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub logradouro: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub numero: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub complemento: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bairro: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cidade: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub estado: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cep: Option<Option<String>>,
}

fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A required text field: present, not blank, at most `max` characters. Returned trimmed.
fn required(value: Option<String>, max: usize) -> Result<String, AppError> {
    let v = value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(AppError::RequiredFields)?;
    if v.chars().count() > max {
        return Err(AppError::RequiredFields);
    }
    Ok(v)
}

/// An optional text field; blank counts as absent.
fn optional(value: Option<String>, max: usize) -> Result<Option<String>, AppError> {
    match value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(v) if v.chars().count() > max => Err(AppError::RequiredFields),
        other => Ok(other),
    }
}

fn user_ref(id: i32) -> Result<i32, AppError> {
    if id <= 0 {
        return Err(AppError::RequiredFields);
    }
    Ok(id)
}

/// A required field in a patch: absent is fine, `null` or blank is not.
fn required_change(value: Option<Option<String>>, max: usize) -> Result<Option<String>, AppError> {
    value.map(|v| required(v, max)).transpose()
}

impl UserInput {
    /// Validates the user and the nested address, if one was sent.
    pub fn validate(self) -> Result<(NewUser, Option<NewAddress>), AppError> {
        let user = NewUser {
            cpf: required(self.cpf, CPF_MAX)?,
            nome: required(self.nome, NOME_MAX)?,
            sobrenome: required(self.sobrenome, SOBRENOME_MAX)?,
            email: required(self.email, EMAIL_MAX)?,
            telefone: required(self.telefone, TELEFONE_MAX)?,
        };
        // The nested address always belongs to the user being created.
        let address = self
            .dados_endereco
            .map(|a| AddressInput { id_usuario: None, ..a }.validate())
            .transpose()?;
        Ok((user, address))
    }
}

impl AddressInput {
    pub fn validate(self) -> Result<NewAddress, AppError> {
        Ok(NewAddress {
            id_usuario: self.id_usuario.map(user_ref).transpose()?,
            logradouro: required(self.logradouro, LOGRADOURO_MAX)?,
            numero: required(self.numero, NUMERO_MAX)?,
            complemento: optional(self.complemento, COMPLEMENTO_MAX)?,
            bairro: required(self.bairro, BAIRRO_MAX)?,
            cidade: required(self.cidade, CIDADE_MAX)?,
            estado: required(self.estado, ESTADO_MAX)?,
            cep: required(self.cep, CEP_MAX)?,
        })
    }
}

impl UserPatch {
    /// At least one field must be present and every present field must be valid.
    pub fn validate(self) -> Result<UserChanges, AppError> {
        let changes = UserChanges {
            cpf: required_change(self.cpf, CPF_MAX)?,
            nome: required_change(self.nome, NOME_MAX)?,
            sobrenome: required_change(self.sobrenome, SOBRENOME_MAX)?,
            email: required_change(self.email, EMAIL_MAX)?,
            telefone: required_change(self.telefone, TELEFONE_MAX)?,
        };
        if changes.is_empty() {
            return Err(AppError::RequiredFields);
        }
        Ok(changes)
    }
}

impl AddressPatch {
    pub fn validate(self) -> Result<AddressChanges, AppError> {
        let changes = AddressChanges {
            id_usuario: self
                .id_usuario
                .map(|v| v.map(user_ref).transpose())
                .transpose()?,
            logradouro: required_change(self.logradouro, LOGRADOURO_MAX)?,
            numero: required_change(self.numero, NUMERO_MAX)?,
            complemento: self
                .complemento
                .map(|v| optional(v, COMPLEMENTO_MAX))
                .transpose()?,
            bairro: required_change(self.bairro, BAIRRO_MAX)?,
            cidade: required_change(self.cidade, CIDADE_MAX)?,
            estado: required_change(self.estado, ESTADO_MAX)?,
            cep: required_change(self.cep, CEP_MAX)?,
        };
        if changes.is_empty() {
            return Err(AppError::RequiredFields);
        }
        Ok(changes)
    }
}
