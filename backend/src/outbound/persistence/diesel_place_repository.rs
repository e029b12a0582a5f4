//! PostgreSQL-backed `PlaceRepository` implementation using Diesel ORM.
//!
//! Places and their menus are written in one transaction so a failed menu
//! insert never leaves a place with a partial menu. Listing reads places,
//! menus and latest comments inside one transaction to observe a single
//! snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{PlaceRepository, PlaceRepositoryError};
use crate::domain::{
    CategoryFilter, NewPlace, Place, PlaceCategory, PlaceCounts, PlaceId, PlacePatch, PlaceSummary,
};

use super::diesel_error_mapping::{DatabaseFailure, classify_diesel_error};
use super::models::{MenuItemRow, NewPlaceRow, PlaceChangeset, PlaceRow, menu_rows};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, menu_items, places};

/// Diesel-backed implementation of the place repository port.
#[derive(Clone)]
pub struct DieselPlaceRepository {
    pool: DbPool,
}

impl DieselPlaceRepository {
    /// Build the repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlaceRepositoryError {
    DatabaseFailure::from_pool(error)
        .into_basic(PlaceRepositoryError::connection, PlaceRepositoryError::query)
}

fn map_diesel_error(error: diesel::result::Error) -> PlaceRepositoryError {
    classify_diesel_error(error)
        .into_basic(PlaceRepositoryError::connection, PlaceRepositoryError::query)
}

fn row_to_place(row: PlaceRow, menu: Vec<MenuItemRow>) -> Result<Place, PlaceRepositoryError> {
    row.into_place(menu).map_err(PlaceRepositoryError::query)
}

fn category_from_label(label: &str) -> Result<PlaceCategory, PlaceRepositoryError> {
    label
        .parse::<PlaceCategory>()
        .map_err(|err| PlaceRepositoryError::query(err.to_string()))
}

#[async_trait]
impl PlaceRepository for DieselPlaceRepository {
    async fn list(&self, filter: CategoryFilter) -> Result<Vec<PlaceSummary>, PlaceRepositoryError> {
        if filter == CategoryFilter::Unknown {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (place_rows, menus, latest) = conn
            .transaction(|conn| {
                async move {
                    let mut query = places::table
                        .select(PlaceRow::as_select())
                        .order((places::created_at, places::id))
                        .into_boxed();
                    if let CategoryFilter::Only(category) = filter {
                        query = query.filter(places::category.eq(category.label()));
                    }
                    let place_rows: Vec<PlaceRow> = query.load(conn).await?;

                    let menus: Vec<MenuItemRow> = MenuItemRow::belonging_to(&place_rows)
                        .select(MenuItemRow::as_select())
                        .order((menu_items::place_id, menu_items::position))
                        .load(conn)
                        .await?;

                    let ids: Vec<Uuid> = place_rows.iter().map(|row| row.id).collect();
                    let latest: Vec<(Uuid, String)> = comments::table
                        .filter(comments::place_id.eq_any(&ids))
                        .distinct_on(comments::place_id)
                        .order((comments::place_id, comments::seq.desc()))
                        .select((comments::place_id, comments::text))
                        .load(conn)
                        .await?;

                    Ok((place_rows, menus, latest))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let grouped_menus = menus.grouped_by(&place_rows);
        let mut latest_by_place: HashMap<Uuid, String> = latest.into_iter().collect();
        place_rows
            .into_iter()
            .zip(grouped_menus)
            .map(|(row, menu)| {
                let latest_comment = latest_by_place.remove(&row.id);
                Ok(PlaceSummary {
                    place: row_to_place(row, menu)?,
                    latest_comment,
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let place_id = *id.as_uuid();

        let found = conn
            .transaction(|conn| {
                async move {
                    let Some(row) = places::table
                        .find(place_id)
                        .select(PlaceRow::as_select())
                        .first::<PlaceRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let menu: Vec<MenuItemRow> = MenuItemRow::belonging_to(&row)
                        .select(MenuItemRow::as_select())
                        .order(menu_items::position)
                        .load(conn)
                        .await?;
                    Ok(Some((row, menu)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        found.map(|(row, menu)| row_to_place(row, menu)).transpose()
    }

    async fn create(&self, id: &PlaceId, place: &NewPlace) -> Result<(), PlaceRepositoryError> {
        let place_id = *id.as_uuid();
        let new_row = NewPlaceRow {
            id: place_id,
            name: place.name.as_ref(),
            category: place.category.label(),
            image_url: place.image_url.as_deref(),
            schedule: place.schedule.as_value(),
        };
        let items = menu_rows(place_id, &place.menu).map_err(PlaceRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(places::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                if !items.is_empty() {
                    diesel::insert_into(menu_items::table)
                        .values(&items)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<bool, PlaceRepositoryError> {
        let place_id = *id.as_uuid();
        let changeset = PlaceChangeset {
            name: patch.name.as_ref().map(AsRef::as_ref),
            category: patch.category.map(PlaceCategory::label),
            image_url: patch.image_url.as_ref().map(Option::as_deref),
            schedule: patch.schedule.as_ref().map(|schedule| schedule.as_value()),
        };
        let items = patch
            .menu
            .as_deref()
            .map(|menu| menu_rows(place_id, menu))
            .transpose()
            .map_err(PlaceRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                // An empty changeset is rejected by Diesel, so only check existence.
                let touched = if changeset.is_empty() {
                    diesel::select(diesel::dsl::exists(places::table.find(place_id)))
                        .get_result::<bool>(conn)
                        .await?
                } else {
                    diesel::update(places::table.find(place_id))
                        .set(&changeset)
                        .execute(conn)
                        .await?
                        > 0
                };
                if !touched {
                    return Ok(false);
                }

                if let Some(rows) = &items {
                    diesel::delete(menu_items::table.filter(menu_items::place_id.eq(place_id)))
                        .execute(conn)
                        .await?;
                    if !rows.is_empty() {
                        diesel::insert_into(menu_items::table)
                            .values(rows)
                            .execute(conn)
                            .await?;
                    }
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &PlaceId) -> Result<bool, PlaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Menu items and comments go with the place via ON DELETE CASCADE.
        let deleted = diesel::delete(places::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn counts(&self) -> Result<PlaceCounts, PlaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let groups: Vec<(String, i64)> = places::table
            .group_by(places::category)
            .select((places::category, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let tallies = groups
            .into_iter()
            .map(|(label, raw_count)| {
                let count = u64::try_from(raw_count)
                    .map_err(|_| PlaceRepositoryError::query("negative category count"))?;
                Ok((category_from_label(&label)?, count))
            })
            .collect::<Result<Vec<_>, PlaceRepositoryError>>()?;
        Ok(PlaceCounts::from_grouped(tallies))
    }
}
