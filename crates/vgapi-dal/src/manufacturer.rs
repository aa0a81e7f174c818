use std::collections::HashMap;

use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, QueryBuilder, Row as _};
use tracing::debug;

use crate::{
    ChosenDB, ChosenRow, Error, FromRowPrefixed, ListingParams, NOW, error::Result,
    game::GameRecord,
};

pub const ENTITY: &str = "Fabricante";

const VALID_ORDER_FIELDS: &[&str] = &["id", "created_at", "updated_at", "name", "surname"];
const VALID_FILTER_FIELDS: &[&str] = &["name", "surname"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerRecord {
    pub id: i64,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

impl FromRowPrefixed for ManufacturerRecord {
    fn from_row_prefixed(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        Ok(ManufacturerRecord {
            id: row.try_get("fabricante_id")?,
            name: row.try_get("fabricante_name")?,
            surname: row.try_get("fabricante_surname")?,
            created_at: row.try_get("fabricante_created_at")?,
            updated_at: row.try_get("fabricante_updated_at")?,
        })
    }
}

/// Manufacturer together with games it owns
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub id: i64,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
    #[serde(rename = "juegos", default, skip_serializing_if = "Option::is_none")]
    pub games: Option<Vec<GameRecord>>,
}

impl Manufacturer {
    fn new(record: ManufacturerRecord, games: Option<Vec<GameRecord>>) -> Self {
        Manufacturer {
            id: record.id,
            name: record.name,
            surname: record.surname,
            created_at: record.created_at,
            updated_at: record.updated_at,
            games,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateManufacturer {
    #[garde(length(max = 255))]
    pub name: Option<String>,
    #[garde(length(max = 255))]
    pub surname: Option<String>,
}

/// Partial update, only supplied fields are changed
pub type UpdateManufacturer = CreateManufacturer;

pub type ManufacturerRepository = ManufacturerRepositoryImpl<Pool<ChosenDB>>;

pub struct ManufacturerRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ManufacturerRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateManufacturer) -> Result<Manufacturer> {
        let result = sqlx::query("INSERT INTO fabricantes (name, surname) VALUES (?, ?)")
            .bind(&payload.name)
            .bind(&payload.surname)
            .execute(&self.executor)
            .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn list(&self, params: ListingParams) -> Result<Vec<Manufacturer>> {
        let filter = params.filtering(VALID_FILTER_FIELDS, "f")?;
        let order = params.ordering_with_id(VALID_ORDER_FIELDS, "f")?;
        let sql = format!(
            "SELECT f.id, f.name, f.surname, f.created_at, f.updated_at FROM fabricantes f {filter} ORDER BY {order} {}",
            params.paging_clause()
        );
        let mut query = sqlx::query_as::<_, ManufacturerRecord>(&sql);
        for f in &params.filters {
            query = query.bind(f.value.as_str());
        }
        if let Some(paging) = params.paging {
            query = query.bind(paging.limit).bind(paging.offset);
        }
        let records = query.fetch(&self.executor).try_collect::<Vec<_>>().await?;

        if !params.include_related || records.is_empty() {
            return Ok(records
                .into_iter()
                .map(|r| Manufacturer::new(r, None))
                .collect());
        }

        let mut games = self
            .games_for(records.iter().map(|r| r.id).collect::<Vec<_>>().as_slice())
            .await?;
        Ok(records
            .into_iter()
            .map(|r| {
                let owned = games.remove(&r.id).unwrap_or_default();
                Manufacturer::new(r, Some(owned))
            })
            .collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Manufacturer>> {
        self.list(ListingParams::default().with_related()).await
    }

    async fn games_for(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<GameRecord>>> {
        let mut query = QueryBuilder::<ChosenDB>::new(
            "SELECT id, title, categorie, manufacturer, price, status, created_at, updated_at FROM juegos WHERE manufacturer IN (",
        );
        let mut list = query.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        query.push(") ORDER BY id");

        let mut grouped: HashMap<i64, Vec<GameRecord>> = HashMap::with_capacity(ids.len());
        let mut rows = query.build_query_as::<GameRecord>().fetch(&self.executor);
        while let Some(game) = rows.try_next().await? {
            if let Some(owner) = game.manufacturer_id {
                grouped.entry(owner).or_default().push(game);
            }
        }
        Ok(grouped)
    }

    pub async fn get(&self, id: i64) -> Result<Manufacturer> {
        let record = get_record(id, &self.executor).await?;
        let games = sqlx::query_as::<_, GameRecord>(
            "SELECT id, title, categorie, manufacturer, price, status, created_at, updated_at FROM juegos WHERE manufacturer = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.executor)
        .await?;
        Ok(Manufacturer::new(record, Some(games)))
    }

    /// Returns number of changed rows - 0 when no supplied field differs from stored value
    pub async fn update(&self, id: i64, payload: UpdateManufacturer) -> Result<u64> {
        let mut tx = self.executor.begin().await?;
        let current = get_record(id, &mut *tx).await?;

        let mut query = QueryBuilder::<ChosenDB>::new("UPDATE fabricantes SET ");
        let mut set = query.separated(", ");
        let mut changed = false;
        if let Some(name) = payload.name.filter(|n| current.name.as_ref() != Some(n)) {
            set.push("name = ").push_bind_unseparated(name);
            changed = true;
        }
        if let Some(surname) = payload
            .surname
            .filter(|s| current.surname.as_ref() != Some(s))
        {
            set.push("surname = ").push_bind_unseparated(surname);
            changed = true;
        }
        if !changed {
            debug!("No changes for manufacturer {id}");
            return Ok(0);
        }
        set.push(format!("updated_at = {NOW}"));
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Deletion is restricted while any game references the manufacturer
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        get_record(id, &mut *tx).await?;

        let dependants: i64 = sqlx::query_scalar("SELECT count(*) FROM juegos WHERE manufacturer = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if dependants > 0 {
            return Err(Error::Restricted {
                entity: ENTITY.to_string(),
                id,
                dependants,
            });
        }

        sqlx::query("DELETE FROM fabricantes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::from_write(e, ENTITY))?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        exists(id, &self.executor).await
    }
}

pub(crate) async fn exists<'c, E>(id: i64, executor: E) -> Result<bool>
where
    E: Executor<'c, Database = ChosenDB>,
{
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM fabricantes WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

async fn get_record<'c, E>(id: i64, executor: E) -> Result<ManufacturerRecord>
where
    E: Executor<'c, Database = ChosenDB>,
{
    sqlx::query_as::<_, ManufacturerRecord>(
        "SELECT id, name, surname, created_at, updated_at FROM fabricantes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::RecordNotFound(ENTITY.to_string()))
}
