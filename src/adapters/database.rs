use crate::config::credentials::{DbCredentials, Dialect};
use crate::core::transform::NULL_SENTINEL;
use crate::domain::job::LoadMethod;
use crate::domain::model::{Cell, RecordSet};
use crate::domain::ports::TableLoader;
use crate::utils::error::Result;
use crate::utils::validation::validate_sql_identifier;
use async_trait::async_trait;
use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Connection};

/// How every cell of one column is bound.
///
/// Ordered from narrowest to widest; a column takes the widest kind any of
/// its non-null cells needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindKind {
    Int,
    Float,
    Text,
}

impl BindKind {
    /// CSV cells arrive as text, so numeric columns are recognized here: a
    /// numeric column rejects a text parameter on Postgres. A column is
    /// numeric only when all of its non-null cells parse; zero-padded values
    /// such as `007` keep their column text.
    pub fn for_column<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut kind = BindKind::Int;
        for cell in cells {
            let cell_kind = match cell {
                Cell::Null => continue,
                Cell::Text(s) if s == NULL_SENTINEL => continue,
                Cell::Number(n) if is_exact_int(*n) => BindKind::Int,
                Cell::Number(_) => BindKind::Float,
                Cell::Text(s) => text_kind(s),
            };
            kind = kind.max(cell_kind);
            if kind == BindKind::Text {
                break;
            }
        }
        kind
    }

    pub fn for_records(records: &RecordSet) -> Vec<Self> {
        (0..records.columns().len())
            .map(|index| Self::for_column(records.rows().iter().map(|row| &row[index])))
            .collect()
    }
}

/// A cell converted to the value bound for it.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlParam {
    pub fn from_cell(cell: &Cell, kind: BindKind) -> Self {
        match (cell, kind) {
            (Cell::Null, _) => SqlParam::Null,
            (Cell::Text(s), _) if s == NULL_SENTINEL => SqlParam::Null,
            (Cell::Number(n), BindKind::Text) => SqlParam::Text(n.to_string()),
            (Cell::Number(n), BindKind::Int) => SqlParam::Int(*n as i64),
            (Cell::Number(n), BindKind::Float) => SqlParam::Float(*n),
            (Cell::Text(s), BindKind::Text) => SqlParam::Text(s.clone()),
            (Cell::Text(s), BindKind::Int) => s
                .trim()
                .parse()
                .map(SqlParam::Int)
                .unwrap_or_else(|_| SqlParam::Text(s.clone())),
            (Cell::Text(s), BindKind::Float) => s
                .trim()
                .parse()
                .map(SqlParam::Float)
                .unwrap_or_else(|_| SqlParam::Text(s.clone())),
        }
    }
}

fn is_exact_int(n: f64) -> bool {
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    n.fract() == 0.0 && n.abs() < EXACT
}

fn text_kind(s: &str) -> BindKind {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let zero_padded = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if trimmed.is_empty() || zero_padded {
        return BindKind::Text;
    }

    if trimmed.parse::<i64>().is_ok() {
        return BindKind::Int;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => BindKind::Float,
        _ => BindKind::Text,
    }
}

/// `INSERT INTO <table> VALUES (p1, ..., pn)` with dialect placeholders.
pub fn insert_statement(dialect: Dialect, table: &str, columns: usize) -> String {
    let placeholders: Vec<String> = (1..=columns).map(|i| dialect.placeholder(i)).collect();
    format!("INSERT INTO {} VALUES ({})", table, placeholders.join(", "))
}

fn bind_param<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    param: SqlParam,
) -> Query<'q, Any, AnyArguments<'q>> {
    match param {
        SqlParam::Null => query.bind(None::<String>),
        SqlParam::Int(v) => query.bind(v),
        SqlParam::Float(v) => query.bind(v),
        SqlParam::Text(v) => query.bind(v),
    }
}

/// Loads record sets through a fresh connection per call.
#[derive(Debug, Clone)]
pub struct SqlTableLoader {
    credentials: DbCredentials,
}

impl SqlTableLoader {
    pub fn new(credentials: DbCredentials) -> Self {
        Self { credentials }
    }

    async fn write_rows(
        conn: &mut AnyConnection,
        dialect: Dialect,
        table: &str,
        records: &RecordSet,
        method: LoadMethod,
    ) -> Result<u64> {
        // Dropping the transaction on error rolls it back.
        let mut tx = conn.begin().await?;

        if method == LoadMethod::Replace {
            let deleted = sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!("Deleted {} existing rows from {}", deleted, table);
        }

        let statement = insert_statement(dialect, table, records.columns().len());
        let kinds = BindKind::for_records(records);
        tracing::debug!("Binding columns of {} as {:?}", table, kinds);
        let mut inserted = 0u64;
        for row in records.rows() {
            let query = row
                .iter()
                .zip(&kinds)
                .map(|(cell, kind)| SqlParam::from_cell(cell, *kind))
                .fold(sqlx::query(&statement), bind_param);
            inserted += query.execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[async_trait]
impl TableLoader for SqlTableLoader {
    async fn load(&self, table: &str, records: &RecordSet, method: LoadMethod) -> Result<u64> {
        validate_sql_identifier("table", table)?;
        let dialect = self.credentials.dialect()?;

        sqlx::any::install_default_drivers();
        let mut conn = AnyConnection::connect(&self.credentials.connection_url()?).await?;
        tracing::debug!("Connected to {:?} database {}", dialect, self.credentials.database);

        let result = Self::write_rows(&mut conn, dialect, table, records, method).await;

        if let Err(e) = conn.close().await {
            tracing::warn!("Failed to close database connection: {}", e);
        }
        result
    }
}
