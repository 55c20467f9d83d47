//! Generic table editor
//!
//! Browse and edit whatever base tables exist in a Postgres schema. Column
//! names and types come from `information_schema` at runtime, so every
//! statement is assembled here from quoted identifiers and bound parameters.
//! Values are bound as text and cast to the column's own type in SQL.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

/// One column as reported by `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ColumnMeta {
    pub name: String,
    pub data_type: String,
    pub is_nullable: String,
    pub udt_schema: String,
    pub udt_name: String,
}

impl ColumnMeta {
    /// Type expression used to cast a bound text parameter into this column
    pub fn cast_type(&self) -> String {
        format!("{}.{}", quote_ident(&self.udt_schema), quote_ident(&self.udt_name))
    }
}

/// How form input for a column is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Boolean,
    Other,
}

impl ColumnKind {
    pub fn classify(data_type: &str) -> Self {
        let dt = data_type.to_lowercase();
        if dt.contains("char") || dt.contains("text") {
            ColumnKind::Text
        } else if dt.contains("int") && !dt.contains("interval") && !dt.contains("point") {
            ColumnKind::Integer
        } else if dt.contains("bool") {
            ColumnKind::Boolean
        } else {
            ColumnKind::Other
        }
    }
}

/// A single cell value for writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form bound as the statement parameter
    pub fn to_param(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

/// Interpret raw form input for a column of `data_type`.
///
/// Empty input is NULL. Input that does not parse as the column's kind is
/// kept as text and left for Postgres to accept or reject.
pub fn coerce_input(data_type: &str, raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }

    match ColumnKind::classify(data_type) {
        ColumnKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
        ColumnKind::Boolean => match raw.trim().to_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "on" => CellValue::Bool(true),
            "false" | "f" | "0" | "no" | "n" | "off" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        },
        ColumnKind::Text | ColumnKind::Other => CellValue::Text(raw.to_string()),
    }
}

/// Case-insensitive substring filter over table names
pub fn filter_tables<'a>(tables: &'a [String], search: &str) -> Vec<&'a String> {
    let needle = search.trim().to_lowercase();
    tables
        .iter()
        .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
        .collect()
}

/// Quote an identifier for Postgres, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// SQL text plus its positional text parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Option<String>>,
}

/// Accumulates parameters and renders `$n` placeholders, cast when the
/// column's type is known.
struct ParamList<'a> {
    columns: &'a [ColumnMeta],
    params: Vec<Option<String>>,
}

impl<'a> ParamList<'a> {
    fn new(columns: &'a [ColumnMeta]) -> Self {
        Self {
            columns,
            params: Vec::new(),
        }
    }

    fn push(&mut self, column: &str, value: &CellValue) -> String {
        self.params.push(value.to_param());
        let placeholder = format!("${}", self.params.len());
        match self.columns.iter().find(|c| c.name == column) {
            Some(meta) => format!("CAST({} AS {})", placeholder, meta.cast_type()),
            None => placeholder,
        }
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            params: self.params,
        }
    }
}

pub fn build_select(schema: &str, table: &str) -> String {
    format!(
        "SELECT row_to_json(t)::text FROM (SELECT * FROM {} LIMIT $1) t",
        qualified(schema, table)
    )
}

pub fn build_insert(
    schema: &str,
    table: &str,
    row: &[(String, CellValue)],
    columns: &[ColumnMeta],
) -> Statement {
    let mut params = ParamList::new(columns);
    let names: Vec<String> = row.iter().map(|(c, _)| quote_ident(c)).collect();
    let values: Vec<String> = row.iter().map(|(c, v)| params.push(c, v)).collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(schema, table),
        names.join(", "),
        values.join(", ")
    );
    params.finish(sql)
}

/// UPDATE of every non-key column; `None` when the row has no such column
pub fn build_update(
    schema: &str,
    table: &str,
    row: &[(String, CellValue)],
    pk_cols: &[String],
    columns: &[ColumnMeta],
) -> Option<Statement> {
    let set_cols: Vec<&(String, CellValue)> =
        row.iter().filter(|(c, _)| !pk_cols.contains(c)).collect();
    if set_cols.is_empty() {
        return None;
    }

    let mut params = ParamList::new(columns);
    let set_clause: Vec<String> = set_cols
        .iter()
        .map(|(c, v)| format!("{} = {}", quote_ident(c), params.push(c, v)))
        .collect();
    let where_clause: Vec<String> = pk_cols
        .iter()
        .map(|pk| {
            let placeholder = params.push(pk, lookup(row, pk).unwrap_or(&CellValue::Null));
            format!("{} = {}", quote_ident(pk), placeholder)
        })
        .collect();

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        qualified(schema, table),
        set_clause.join(", "),
        where_clause.join(" AND ")
    );
    Some(params.finish(sql))
}

pub fn build_delete(
    schema: &str,
    table: &str,
    pk_cols: &[String],
    pk_vals: &[CellValue],
    columns: &[ColumnMeta],
) -> Result<Statement> {
    if pk_cols.is_empty() {
        bail!("Cannot delete from {}: table has no primary key", table);
    }
    if pk_cols.len() != pk_vals.len() {
        bail!(
            "Primary key of {} has {} columns but {} values were given",
            table,
            pk_cols.len(),
            pk_vals.len()
        );
    }

    let mut params = ParamList::new(columns);
    let where_clause: Vec<String> = pk_cols
        .iter()
        .zip(pk_vals)
        .map(|(pk, v)| format!("{} = {}", quote_ident(pk), params.push(pk, v)))
        .collect();

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        qualified(schema, table),
        where_clause.join(" AND ")
    );
    Ok(params.finish(sql))
}

/// Choose the write for a row: UPDATE when every key column has a non-null
/// value and some other column is present, INSERT otherwise. `None` for an
/// empty row.
pub fn plan_upsert(
    schema: &str,
    table: &str,
    row: &[(String, CellValue)],
    pk_cols: &[String],
    columns: &[ColumnMeta],
) -> Option<Statement> {
    if row.is_empty() {
        return None;
    }

    let has_key = !pk_cols.is_empty()
        && pk_cols
            .iter()
            .all(|pk| lookup(row, pk).is_some_and(|v| !v.is_null()));
    if has_key {
        if let Some(update) = build_update(schema, table, row, pk_cols, columns) {
            return Some(update);
        }
    }

    Some(build_insert(schema, table, row, columns))
}

fn lookup<'a>(row: &'a [(String, CellValue)], column: &str) -> Option<&'a CellValue> {
    row.iter().find(|(c, _)| c == column).map(|(_, v)| v)
}

/// Table browser and editor bound to one schema
#[derive(Debug, Clone)]
pub struct TableEditor {
    pool: PgPool,
    schema: String,
}

impl TableEditor {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Base tables in the schema, ordered by name
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .bind(&self.schema)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tables")?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(Into::into))
            .collect()
    }

    /// Columns of `table` in ordinal order
    pub async fn table_columns(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        sqlx::query_as::<_, ColumnMeta>(
            r#"
            SELECT column_name::text AS name,
                   data_type::text AS data_type,
                   is_nullable::text AS is_nullable,
                   udt_schema::text AS udt_schema,
                   udt_name::text AS udt_name
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read columns of {}", table))
    }

    /// Primary key columns of `table` in key order
    pub async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT kcu.column_name::text AS column_name
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
              ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
            WHERE tc.table_schema = $1 AND tc.table_name = $2
              AND tc.constraint_type = 'PRIMARY KEY'
            ORDER BY kcu.ordinal_position
            "#,
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read primary key of {}", table))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("column_name").map_err(Into::into))
            .collect()
    }

    /// Up to `limit` rows of `table`, each as a column → value object
    pub async fn fetch_rows(&self, table: &str, limit: i64) -> Result<Vec<Value>> {
        let rows = sqlx::query(&build_select(&self.schema, table))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch rows of {}", table))?;

        rows.iter()
            .map(|row| -> Result<Value> {
                let text: String = row.try_get(0)?;
                serde_json::from_str(&text).map_err(|e| anyhow!("Malformed row of {}: {}", table, e))
            })
            .collect()
    }

    /// Update the row identified by `pk_cols`, or insert it when the key is
    /// incomplete. Returns the number of affected rows.
    pub async fn upsert_row(
        &self,
        table: &str,
        row: &[(String, CellValue)],
        pk_cols: &[String],
    ) -> Result<u64> {
        let columns = self.table_columns(table).await?;
        let Some(statement) = plan_upsert(&self.schema, table, row, pk_cols, &columns) else {
            debug!("Nothing to write to {}", table);
            return Ok(0);
        };
        self.execute(statement).await
    }

    /// Insert `row` regardless of any key columns it carries
    pub async fn insert_row(&self, table: &str, row: &[(String, CellValue)]) -> Result<u64> {
        self.upsert_row(table, row, &[]).await
    }

    pub async fn delete_row(
        &self,
        table: &str,
        pk_cols: &[String],
        pk_vals: &[CellValue],
    ) -> Result<u64> {
        let columns = self.table_columns(table).await?;
        let statement = build_delete(&self.schema, table, pk_cols, pk_vals, &columns)?;
        self.execute(statement).await
    }

    async fn execute(&self, statement: Statement) -> Result<u64> {
        debug!("Executing: {}", statement.sql);

        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = query.bind(param.clone());
        }
        let result = query
            .execute(&self.pool)
            .await
            .context("Failed to execute table edit")?;

        info!(
            "Table edit affected {} row(s): {}",
            result.rows_affected(),
            statement.sql
        );
        Ok(result.rows_affected())
    }
}
