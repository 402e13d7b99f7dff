//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for a table.

use super::params::PgBindValue;

/// Quote identifier for PostgreSQL (safe: only from code and validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// A table with an integer `id` primary key and a fixed column list (`id` first).
#[derive(Clone, Debug)]
pub struct Table {
    pub schema: String,
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Table {
    pub fn new(schema: impl Into<String>, name: &'static str, columns: &'static [&'static str]) -> Self {
        Table {
            schema: schema.into(),
            name,
            columns,
        }
    }

    pub fn qualified(&self) -> String {
        qualified_table(&self.schema, self.name)
    }

    fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| quoted(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SELECT every row ordered by id.
    pub fn select_all(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY \"id\"",
            self.column_list(),
            self.qualified()
        )
    }

    /// SELECT by primary key. Caller binds the id as $1.
    pub fn select_by_id(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE \"id\" = $1",
            self.column_list(),
            self.qualified()
        )
    }

    /// SELECT the first row (lowest id) where `column = $1`.
    pub fn select_first_where(&self, column: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY \"id\" LIMIT 1",
            self.column_list(),
            self.qualified(),
            quoted(column)
        )
    }

    /// INSERT the given columns; the store generates the id. Returns the full row.
    pub fn insert(&self, values: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
        let mut q = QueryBuf::new();
        let mut cols = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        for (col, val) in values {
            cols.push(quoted(col));
            placeholders.push(format!("${}", q.push_param(val)));
        }
        q.sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.qualified(),
            cols.join(", "),
            placeholders.join(", "),
            self.column_list()
        );
        q
    }

    /// UPDATE only the assigned columns of row `id`. Returns the full row, none if absent.
    pub fn update(&self, id: i32, assignments: Vec<(&'static str, PgBindValue)>) -> QueryBuf {
        let mut q = QueryBuf::new();
        let mut set_parts = Vec::with_capacity(assignments.len());
        for (col, val) in assignments {
            let n = q.push_param(val);
            set_parts.push(format!("{} = ${}", quoted(col), n));
        }
        let id_param = q.push_param(PgBindValue::Int(id));
        q.sql = format!(
            "UPDATE {} SET {} WHERE \"id\" = ${} RETURNING {}",
            self.qualified(),
            set_parts.join(", "),
            id_param,
            self.column_list()
        );
        q
    }

    /// DELETE by primary key. Caller binds the id as $1.
    pub fn delete(&self) -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1", self.qualified())
    }
}
