//! Values bound to query parameters.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value that can be bound to a PostgreSQL query. Nulls carry their column type
/// so PostgreSQL does not have to infer it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Text(String),
    Int(i32),
    NullText,
    NullInt,
}

impl From<String> for PgBindValue {
    fn from(s: String) -> Self {
        PgBindValue::Text(s)
    }
}

impl From<Option<String>> for PgBindValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(PgBindValue::NullText, PgBindValue::Text)
    }
}

impl From<Option<i32>> for PgBindValue {
    fn from(v: Option<i32>) -> Self {
        v.map_or(PgBindValue::NullInt, PgBindValue::Int)
    }
}

/// Bind every parameter, in order, to a `query_as`.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: Vec<PgBindValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            PgBindValue::Text(s) => query.bind(s),
            PgBindValue::Int(n) => query.bind(n),
            PgBindValue::NullText => query.bind(None::<String>),
            PgBindValue::NullInt => query.bind(None::<i32>),
        };
    }
    query
}
