//! PostgreSQL store. Tables live in a configurable schema (default `itermob`).

use super::{AddressStore, Store, UserStore};
use crate::error::StoreError;
use crate::model::{Address, AddressChanges, NewAddress, NewUser, User, UserChanges, UserWithAddress};
use crate::sql::{bind_all, quoted, PgBindValue, QueryBuf, Table};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgExecutor, PgPool};
use std::str::FromStr;

pub const USER_TABLE: &str = "tbl_usuario";
pub const ADDRESS_TABLE: &str = "tbl_endereco";

const USER_COLUMNS: &[&str] = &["id", "cpf", "nome", "sobrenome", "email", "telefone"];
const ADDRESS_COLUMNS: &[&str] = &[
    "id",
    "id_usuario",
    "logradouro",
    "numero",
    "complemento",
    "bairro",
    "cidade",
    "estado",
    "cep",
];

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    users: Table,
    addresses: Table,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgStore {
            pool,
            users: Table::new(schema, USER_TABLE, USER_COLUMNS),
            addresses: Table::new(schema, ADDRESS_TABLE, ADDRESS_COLUMNS),
        }
    }

    /// Create the schema and both tables if they do not exist.
    pub async fn ensure_tables(&self) -> Result<(), StoreError> {
        let schema = quoted(&self.users.schema);
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(&self.pool)
            .await?;

        let users = self.users.qualified();
        let users_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                cpf VARCHAR(14) NOT NULL,
                nome VARCHAR(100) NOT NULL,
                sobrenome VARCHAR(100) NOT NULL,
                email VARCHAR(255) NOT NULL,
                telefone VARCHAR(20) NOT NULL
            )
            "#,
            users
        );
        sqlx::query(&users_ddl).execute(&self.pool).await?;

        let addresses = self.addresses.qualified();
        let addresses_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                id_usuario INTEGER REFERENCES {} (id) ON DELETE SET NULL,
                logradouro VARCHAR(150) NOT NULL,
                numero VARCHAR(10) NOT NULL,
                complemento VARCHAR(100),
                bairro VARCHAR(100) NOT NULL,
                cidade VARCHAR(100) NOT NULL,
                estado VARCHAR(50) NOT NULL,
                cep VARCHAR(9) NOT NULL
            )
            "#,
            addresses, users
        );
        sqlx::query(&addresses_ddl).execute(&self.pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (id_usuario)",
            quoted(&format!("{}_id_usuario_idx", ADDRESS_TABLE)),
            addresses
        );
        sqlx::query(&index).execute(&self.pool).await?;
        tracing::info!(schema = %self.users.schema, "tables ready");
        Ok(())
    }
}

fn user_values(user: &NewUser) -> Vec<(&'static str, PgBindValue)> {
    vec![
        ("cpf", user.cpf.clone().into()),
        ("nome", user.nome.clone().into()),
        ("sobrenome", user.sobrenome.clone().into()),
        ("email", user.email.clone().into()),
        ("telefone", user.telefone.clone().into()),
    ]
}

fn address_values(address: &NewAddress, owner: Option<i32>) -> Vec<(&'static str, PgBindValue)> {
    vec![
        ("id_usuario", owner.into()),
        ("logradouro", address.logradouro.clone().into()),
        ("numero", address.numero.clone().into()),
        ("complemento", address.complemento.clone().into()),
        ("bairro", address.bairro.clone().into()),
        ("cidade", address.cidade.clone().into()),
        ("estado", address.estado.clone().into()),
        ("cep", address.cep.clone().into()),
    ]
}

fn user_assignments(changes: &UserChanges) -> Vec<(&'static str, PgBindValue)> {
    let mut out = Vec::new();
    let text = [
        ("cpf", &changes.cpf),
        ("nome", &changes.nome),
        ("sobrenome", &changes.sobrenome),
        ("email", &changes.email),
        ("telefone", &changes.telefone),
    ];
    for (col, value) in text {
        if let Some(v) = value {
            out.push((col, PgBindValue::Text(v.clone())));
        }
    }
    out
}

fn address_assignments(changes: &AddressChanges) -> Vec<(&'static str, PgBindValue)> {
    let mut out = Vec::new();
    if let Some(owner) = changes.id_usuario {
        out.push(("id_usuario", owner.into()));
    }
    let required = [
        ("logradouro", &changes.logradouro),
        ("numero", &changes.numero),
    ];
    for (col, value) in required {
        if let Some(v) = value {
            out.push((col, PgBindValue::Text(v.clone())));
        }
    }
    if let Some(complemento) = &changes.complemento {
        out.push(("complemento", complemento.clone().into()));
    }
    let required = [
        ("bairro", &changes.bairro),
        ("cidade", &changes.cidade),
        ("estado", &changes.estado),
        ("cep", &changes.cep),
    ];
    for (col, value) in required {
        if let Some(v) = value {
            out.push((col, PgBindValue::Text(v.clone())));
        }
    }
    out
}

/// Foreign key violations on `id_usuario` become `UnknownUser`.
fn map_fk(e: sqlx::Error, owner: Option<i32>) -> StoreError {
    if let (sqlx::Error::Database(db), Some(id)) = (&e, owner) {
        if db.is_foreign_key_violation() {
            return StoreError::UnknownUser(id);
        }
    }
    StoreError::Db(e)
}

async fn fetch_returning<'e, O, E>(executor: E, q: QueryBuf) -> Result<Option<O>, sqlx::Error>
where
    E: PgExecutor<'e>,
    O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let QueryBuf { sql, params } = q;
    bind_all(sqlx::query_as::<_, O>(&sql), params)
        .fetch_optional(executor)
        .await
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = self.users.select_all();
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        let sql = self.users.select_by_id();
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_with_address(&self, id: i32) -> Result<Option<UserWithAddress>, StoreError> {
        let Some(usuario) = self.find_user(id).await? else {
            return Ok(None);
        };
        let sql = self.addresses.select_first_where("id_usuario");
        tracing::debug!(sql = %sql, id, "query");
        let endereco = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(Some(UserWithAddress { usuario, endereco }))
    }

    async fn insert_user(
        &self,
        user: &NewUser,
        address: Option<&NewAddress>,
    ) -> Result<UserWithAddress, StoreError> {
        let mut tx = self.pool.begin().await?;
        let usuario: User = fetch_returning(&mut *tx, self.users.insert(user_values(user)))
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        let endereco = match address {
            Some(a) => {
                let q = self.addresses.insert(address_values(a, Some(usuario.id)));
                let row: Option<Address> = fetch_returning(&mut *tx, q).await?;
                Some(row.ok_or(StoreError::Db(sqlx::Error::RowNotFound))?)
            }
            None => None,
        };
        tx.commit().await?;
        Ok(UserWithAddress { usuario, endereco })
    }

    async fn update_user(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let assignments = user_assignments(changes);
        if assignments.is_empty() {
            return self.find_user(id).await;
        }
        let q = self.users.update(id, assignments);
        Ok(fetch_returning(&self.pool, q).await?)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, StoreError> {
        let sql = self.users.delete();
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AddressStore for PgStore {
    async fn list_addresses(&self) -> Result<Vec<Address>, StoreError> {
        let sql = self.addresses.select_all();
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Address>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_address(&self, id: i32) -> Result<Option<Address>, StoreError> {
        let sql = self.addresses.select_by_id();
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_address(&self, address: &NewAddress) -> Result<Address, StoreError> {
        let q = self.addresses.insert(address_values(address, address.id_usuario));
        fetch_returning(&self.pool, q)
            .await
            .map_err(|e| map_fk(e, address.id_usuario))?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn update_address(
        &self,
        id: i32,
        changes: &AddressChanges,
    ) -> Result<Option<Address>, StoreError> {
        let assignments = address_assignments(changes);
        if assignments.is_empty() {
            return self.find_address(id).await;
        }
        let q = self.addresses.update(id, assignments);
        fetch_returning(&self.pool, q)
            .await
            .map_err(|e| map_fk(e, changes.id_usuario.flatten()))
    }

    async fn delete_address(&self, id: i32) -> Result<bool, StoreError> {
        let sql = self.addresses.delete();
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::Db(sqlx::Error::Configuration("DATABASE_URL: no path".into())))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim().to_string();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name))
}
