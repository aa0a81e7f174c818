pub mod error;
pub mod game;
pub mod manufacturer;

use std::{fmt::Display, str::FromStr as _};

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 50;

/// SQL expression producing current time with millisecond precision,
/// same format as column defaults in migrations
pub(crate) const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Opens pool (creating database file if needed) and brings schema up to date
pub async fn new_pool(database_url: &str, max_connections: u32) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    info!("Database {database_url} ready");
    Ok(pool)
}

pub(crate) trait FromRowPrefixed: Sized {
    fn from_row_prefixed(row: &ChosenRow) -> Result<Self, sqlx::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "{} DESC", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

/// Exact match condition on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub offset: i64,
    pub limit: i64,
}

/// Query descriptor consumed by repositories' `list`.
///
/// Without paging all matching records are returned, without order records come
/// in natural (id) order, filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub paging: Option<Paging>,
    pub order: Option<Vec<Order>>,
    pub filters: Vec<Filter>,
    pub include_related: bool,
}

impl ListingParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            paging: Some(Paging { offset, limit }),
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_related(mut self) -> Self {
        self.include_related = true;
        self
    }

    pub fn ordering(&self, valid_fields: &[&str], alias: &str) -> Result<String> {
        let ordering = self
            .order
            .as_ref()
            .map(|o| {
                o.iter()
                    .map(|o| {
                        if valid_fields.contains(&o.as_ref()) {
                            Ok(format!("{alias}.{o}"))
                        } else {
                            Err(Error::InvalidOrderByField(o.as_ref().to_string()))
                        }
                    })
                    .collect::<Result<Vec<String>>>()
                    .map(|o| o.join(", "))
            })
            .transpose()?
            .unwrap_or_default();
        Ok(ordering)
    }

    /// Full ORDER BY content, id is always last key so order is stable
    pub(crate) fn ordering_with_id(&self, valid_fields: &[&str], alias: &str) -> Result<String> {
        let ordering = self.ordering(valid_fields, alias)?;
        if ordering.is_empty() {
            Ok(format!("{alias}.id"))
        } else {
            Ok(format!("{ordering}, {alias}.id"))
        }
    }

    pub fn filtering(&self, valid_fields: &[&str], alias: &str) -> Result<String> {
        if self.filters.is_empty() {
            return Ok(String::new());
        }
        let conditions = self
            .filters
            .iter()
            .map(|f| {
                if valid_fields.contains(&f.field.as_str()) {
                    Ok(format!("{alias}.{} = ?", f.field))
                } else {
                    Err(Error::InvalidFilterField(f.field.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("WHERE {}", conditions.join(" AND ")))
    }

    pub(crate) fn paging_clause(&self) -> &'static str {
        if self.paging.is_some() {
            "LIMIT ? OFFSET ?"
        } else {
            ""
        }
    }
}
