//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the rows so every adapter validates stored data the same way.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentId, CommentText, DisplayName, EmailAddress, MenuItem, Place, PlaceCategory,
    PlaceId, PlaceName, PlaceRating, PasswordHash, Schedule, User, UserId,
};
use crate::domain::ports::UserAccount;

use super::schema::{comments, menu_items, places, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let name = DisplayName::new(self.name).map_err(|err| err.to_string())?;
        let email = EmailAddress::new(&self.email).map_err(|err| err.to_string())?;
        Ok(User::new(UserId::from_uuid(self.id), name, email))
    }

    pub(crate) fn into_account(self) -> Result<UserAccount, String> {
        let password_hash = PasswordHash::from_encoded(self.password_hash.clone());
        Ok(UserAccount {
            user: self.into_user()?,
            password_hash,
        })
    }
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaceRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub schedule: serde_json::Value,
    pub rating: f64,
    pub num_ratings: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = places)]
pub(crate) struct NewPlaceRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: &'a str,
    pub image_url: Option<&'a str>,
    pub schedule: &'a serde_json::Value,
}

/// Changeset for place patches. `None` fields are skipped by Diesel;
/// `image_url: Some(None)` writes `NULL`.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = places)]
pub(crate) struct PlaceChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub image_url: Option<Option<&'a str>>,
    pub schedule: Option<&'a serde_json::Value>,
}

impl PlaceChangeset<'_> {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.schedule.is_none()
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = places)]
pub(crate) struct PlaceRatingChangeset {
    pub rating: f64,
    pub num_ratings: i32,
}

impl PlaceRow {
    pub(crate) fn into_place(self, menu_rows: Vec<MenuItemRow>) -> Result<Place, String> {
        let category = self
            .category
            .parse::<PlaceCategory>()
            .map_err(|err| err.to_string())?;
        let num_ratings = u32::try_from(self.num_ratings)
            .map_err(|_| format!("negative num_ratings for place {}", self.id))?;
        let menu = menu_rows
            .into_iter()
            .map(MenuItemRow::into_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Place {
            id: PlaceId::from_uuid(self.id),
            name: PlaceName::new(self.name).map_err(|err| err.to_string())?,
            category,
            image_url: self.image_url,
            schedule: Schedule::from_value(self.schedule),
            menu,
            rating: PlaceRating::from_stored(self.rating, num_ratings),
        })
    }
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = menu_items)]
#[diesel(belongs_to(PlaceRow, foreign_key = place_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Stored dish. Queries order by `menu_items.position`, which is only
/// written, never read back.
pub(crate) struct MenuItemRow {
    pub id: Uuid,
    pub place_id: Uuid,
    pub category: String,
    pub dish_name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_items)]
pub(crate) struct NewMenuItemRow<'a> {
    pub id: Uuid,
    pub place_id: Uuid,
    pub position: i32,
    pub category: &'a str,
    pub dish_name: &'a str,
    pub price: f64,
}

impl MenuItemRow {
    fn into_item(self) -> Result<MenuItem, String> {
        MenuItem::new(self.category, self.dish_name, self.price).map_err(|err| err.to_string())
    }
}

/// Build insertable rows for a menu, numbering entries in order.
pub(crate) fn menu_rows(place_id: Uuid, menu: &[MenuItem]) -> Result<Vec<NewMenuItemRow<'_>>, String> {
    menu.iter()
        .enumerate()
        .map(|(index, item)| {
            let position = i32::try_from(index).map_err(|_| "menu too long".to_owned())?;
            Ok(NewMenuItemRow {
                id: Uuid::new_v4(),
                place_id,
                position,
                category: item.category(),
                dish_name: item.dish_name(),
                price: item.price().value(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: &'a str,
    pub rating: i32,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = comments)]
pub(crate) struct CommentChangeset<'a> {
    pub text: Option<&'a str>,
    pub rating: Option<i32>,
}

impl CommentRow {
    pub(crate) fn into_comment(self, user_name: String) -> Result<Comment, String> {
        Ok(Comment {
            id: CommentId::from_uuid(self.id),
            place_id: PlaceId::from_uuid(self.place_id),
            user_id: UserId::from_uuid(self.user_id),
            user_name: DisplayName::new(user_name).map_err(|err| err.to_string())?,
            text: CommentText::new(self.text).map_err(|err| err.to_string())?,
            rating: self.rating,
        })
    }
}
