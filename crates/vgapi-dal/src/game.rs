use std::fmt::Display;

use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, QueryBuilder, Row as _};
use tracing::debug;

use crate::{
    ChosenDB, ChosenRow, Error, FromRowPrefixed, ListingParams, NOW, error::Result,
    manufacturer::{self, ManufacturerRecord},
};

pub const ENTITY: &str = "Videojuego";

pub const VALID_ORDER_FIELDS: &[&str] = &["id", "created_at", "updated_at", "title", "price"];
pub const VALID_FILTER_FIELDS: &[&str] = &["categorie", "status", "manufacturer"];

const GAME_COLUMNS: &str =
    "j.id, j.title, j.categorie, j.manufacturer, j.price, j.status, j.created_at, j.updated_at";

const MANUFACTURER_COLUMNS: &str = "f.id AS fabricante_id, f.name AS fabricante_name, f.surname AS fabricante_surname, \
f.created_at AS fabricante_created_at, f.updated_at AS fabricante_updated_at";
const NO_MANUFACTURER_COLUMNS: &str = "NULL AS fabricante_id";
const MANUFACTURER_JOIN: &str = "LEFT JOIN fabricantes f ON j.manufacturer = f.id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Inactive,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Inactive => "inactive",
        }
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain game row, as nested under its manufacturer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: i64,
    pub title: Option<String>,
    pub categorie: Option<String>,
    #[serde(rename = "manufacturer")]
    #[sqlx(rename = "manufacturer")]
    pub manufacturer_id: Option<i64>,
    pub price: Option<f64>,
    pub status: Option<GameStatus>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

/// Game with its manufacturer eagerly loaded
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub title: Option<String>,
    pub categorie: Option<String>,
    #[serde(rename = "manufacturer")]
    pub manufacturer_id: Option<i64>,
    pub price: Option<f64>,
    pub status: Option<GameStatus>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
    #[serde(rename = "fabricante", default)]
    pub manufacturer: Option<ManufacturerRecord>,
}

impl sqlx::FromRow<'_, ChosenRow> for Game {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let manufacturer = if row.try_get::<Option<i64>, _>("fabricante_id")?.is_some() {
            Some(ManufacturerRecord::from_row_prefixed(row)?)
        } else {
            None
        };
        Ok(Game {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            categorie: row.try_get("categorie")?,
            manufacturer_id: row.try_get("manufacturer")?,
            price: row.try_get("price")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            manufacturer,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateGame {
    #[garde(length(max = 255))]
    pub title: Option<String>,
    #[garde(length(max = 255))]
    pub categorie: Option<String>,
    #[garde(range(min = 1))]
    #[serde(rename = "manufacturer")]
    pub manufacturer_id: Option<i64>,
    #[garde(skip)]
    pub price: Option<f64>,
    #[garde(skip)]
    pub status: Option<GameStatus>,
}

/// Partial update, only supplied fields are changed
pub type UpdateGame = CreateGame;

pub type GameRepository = GameRepositoryImpl<Pool<ChosenDB>>;

pub struct GameRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GameRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateGame) -> Result<Game> {
        let mut tx = self.executor.begin().await?;
        check_manufacturer(payload.manufacturer_id, &mut *tx).await?;
        let result = sqlx::query(
            "INSERT INTO juegos (title, categorie, manufacturer, price, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.categorie)
        .bind(payload.manufacturer_id)
        .bind(payload.price)
        .bind(payload.status)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from_write(e, manufacturer::ENTITY))?;
        let id = result.last_insert_rowid();
        let record = get(id, true, &mut *tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    pub async fn list(&self, params: ListingParams) -> Result<Vec<Game>> {
        let filter = params.filtering(VALID_FILTER_FIELDS, "j")?;
        let order = params.ordering_with_id(VALID_ORDER_FIELDS, "j")?;
        let (related, join) = related_parts(params.include_related);
        let sql = format!(
            "SELECT {GAME_COLUMNS}, {related} FROM juegos j {join} {filter} ORDER BY {order} {}",
            params.paging_clause()
        );
        debug!("Listing games: {sql}");

        let mut query = sqlx::query_as::<_, Game>(&sql);
        for f in &params.filters {
            query = query.bind(f.value.as_str());
        }
        if let Some(paging) = params.paging {
            query = query.bind(paging.limit).bind(paging.offset);
        }
        let records = query.fetch(&self.executor).try_collect::<Vec<_>>().await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Game> {
        get(id, true, &self.executor).await
    }

    /// Returns number of changed rows - 0 when no supplied field differs from stored value
    pub async fn update(&self, id: i64, payload: UpdateGame) -> Result<u64> {
        let mut tx = self.executor.begin().await?;
        let current = get(id, false, &mut *tx).await?;

        let mut query = QueryBuilder::<ChosenDB>::new("UPDATE juegos SET ");
        let mut set = query.separated(", ");
        let mut changed = false;
        if let Some(title) = payload.title.filter(|t| current.title.as_ref() != Some(t)) {
            set.push("title = ").push_bind_unseparated(title);
            changed = true;
        }
        if let Some(categorie) = payload
            .categorie
            .filter(|c| current.categorie.as_ref() != Some(c))
        {
            set.push("categorie = ").push_bind_unseparated(categorie);
            changed = true;
        }
        if let Some(manufacturer_id) = payload
            .manufacturer_id
            .filter(|m| current.manufacturer_id != Some(*m))
        {
            check_manufacturer(Some(manufacturer_id), &mut *tx).await?;
            set.push("manufacturer = ")
                .push_bind_unseparated(manufacturer_id);
            changed = true;
        }
        if let Some(price) = payload.price.filter(|p| current.price != Some(*p)) {
            set.push("price = ").push_bind_unseparated(price);
            changed = true;
        }
        if let Some(status) = payload.status.filter(|s| current.status != Some(*s)) {
            set.push("status = ").push_bind_unseparated(status);
            changed = true;
        }
        if !changed {
            debug!("No changes for game {id}");
            return Ok(0);
        }
        set.push(format!("updated_at = {NOW}"));
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::from_write(e, manufacturer::ENTITY))?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM juegos WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(Error::RecordNotFound(ENTITY.to_string()));
        }
        sqlx::query("DELETE FROM juegos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn related_parts(include_related: bool) -> (&'static str, &'static str) {
    if include_related {
        (MANUFACTURER_COLUMNS, MANUFACTURER_JOIN)
    } else {
        (NO_MANUFACTURER_COLUMNS, "")
    }
}

async fn check_manufacturer<'c, E>(manufacturer_id: Option<i64>, executor: E) -> Result<()>
where
    E: Executor<'c, Database = ChosenDB>,
{
    let Some(id) = manufacturer_id else {
        return Ok(());
    };
    if manufacturer::exists(id, executor).await? {
        Ok(())
    } else {
        debug!("Game references missing manufacturer {id}");
        Err(Error::InvalidReference(format!(
            "{} {id} no existe",
            manufacturer::ENTITY
        )))
    }
}

async fn get<'c, E>(id: i64, include_related: bool, executor: E) -> Result<Game>
where
    E: Executor<'c, Database = ChosenDB>,
{
    let (related, join) = related_parts(include_related);
    let sql = format!("SELECT {GAME_COLUMNS}, {related} FROM juegos j {join} WHERE j.id = ?");
    sqlx::query_as::<_, Game>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound(ENTITY.to_string()))
}
