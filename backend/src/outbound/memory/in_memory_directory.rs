//! In-memory implementation of every persistence port.
//!
//! One mutex guards users, places and comments together so each operation
//! sees a consistent view and cascades happen atomically. Data is lost when
//! the process exits.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, PlaceRatingRepository, PlaceRatingRepositoryError,
    PlaceRepository, PlaceRepositoryError, UserAccount, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CategoryFilter, Comment, CommentId, CommentPatch, CommentText, NewComment, NewPlace, Place,
    PlaceCounts, PlaceId, PlacePatch, PlaceRating, PlaceSummary, User, UserId,
};

const POISONED: &str = "in-memory directory lock poisoned";

#[derive(Debug, Clone)]
struct StoredComment {
    id: CommentId,
    place_id: PlaceId,
    user_id: UserId,
    text: CommentText,
    rating: i32,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<UserAccount>,
    /// Insertion order is listing order.
    places: Vec<Place>,
    /// Insertion order is comment order.
    comments: Vec<StoredComment>,
}

impl DirectoryState {
    fn place_mut(&mut self, id: &PlaceId) -> Option<&mut Place> {
        self.places.iter_mut().find(|place| place.id == *id)
    }

    fn has_place(&self, id: &PlaceId) -> bool {
        self.places.iter().any(|place| place.id == *id)
    }

    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id() == id)
    }

    fn resolve(&self, stored: &StoredComment) -> Option<Comment> {
        let author = self.user(&stored.user_id)?;
        Some(Comment {
            id: stored.id,
            place_id: stored.place_id,
            user_id: stored.user_id,
            user_name: author.name().clone(),
            text: stored.text.clone(),
            rating: stored.rating,
        })
    }

    fn latest_comment(&self, place_id: &PlaceId) -> Option<String> {
        self.comments
            .iter()
            .rev()
            .find(|comment| comment.place_id == *place_id)
            .map(|comment| comment.text.as_ref().to_owned())
    }
}

/// Shared in-memory store implementing the user, place, comment and rating
/// repositories.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

impl InMemoryDirectory {
    /// Empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, query: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, DirectoryState>, E> {
        self.state.lock().map_err(|_| query(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(UserPersistenceError::query)?;
        let email = account.user.email();
        if state.users.iter().any(|existing| existing.user.email() == email) {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        state.users.push(account.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|account| account.user.email().as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.user(id).cloned())
    }
}

#[async_trait]
impl PlaceRepository for InMemoryDirectory {
    async fn list(&self, filter: CategoryFilter) -> Result<Vec<PlaceSummary>, PlaceRepositoryError> {
        let state = self.lock(PlaceRepositoryError::query)?;
        Ok(state
            .places
            .iter()
            .filter(|place| filter.matches(place.category))
            .map(|place| PlaceSummary {
                place: place.clone(),
                latest_comment: state.latest_comment(&place.id),
            })
            .collect())
    }

    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlaceRepositoryError> {
        let state = self.lock(PlaceRepositoryError::query)?;
        Ok(state.places.iter().find(|place| place.id == *id).cloned())
    }

    async fn create(&self, id: &PlaceId, place: &NewPlace) -> Result<(), PlaceRepositoryError> {
        let mut state = self.lock(PlaceRepositoryError::query)?;
        if state.has_place(id) {
            return Err(PlaceRepositoryError::query(format!("place {id} already exists")));
        }
        let NewPlace {
            name,
            category,
            image_url,
            schedule,
            menu,
        } = place.clone();
        state.places.push(Place {
            id: *id,
            name,
            category,
            image_url,
            schedule,
            menu,
            rating: PlaceRating::unrated(),
        });
        Ok(())
    }

    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<bool, PlaceRepositoryError> {
        let mut state = self.lock(PlaceRepositoryError::query)?;
        let Some(place) = state.place_mut(id) else {
            return Ok(false);
        };
        patch.clone().apply_to(place);
        Ok(true)
    }

    async fn delete(&self, id: &PlaceId) -> Result<bool, PlaceRepositoryError> {
        let mut state = self.lock(PlaceRepositoryError::query)?;
        let before = state.places.len();
        state.places.retain(|place| place.id != *id);
        if state.places.len() == before {
            return Ok(false);
        }
        state.comments.retain(|comment| comment.place_id != *id);
        Ok(true)
    }

    async fn counts(&self) -> Result<PlaceCounts, PlaceRepositoryError> {
        let state = self.lock(PlaceRepositoryError::query)?;
        Ok(PlaceCounts::from_grouped(
            state.places.iter().map(|place| (place.category, 1)),
        ))
    }
}

#[async_trait]
impl CommentRepository for InMemoryDirectory {
    async fn list_for_place(
        &self,
        place_id: &PlaceId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.lock(CommentRepositoryError::query)?;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.place_id == *place_id)
            .filter_map(|comment| state.resolve(comment))
            .collect())
    }

    async fn create(
        &self,
        id: &CommentId,
        comment: &NewComment,
    ) -> Result<(), CommentRepositoryError> {
        let mut state = self.lock(CommentRepositoryError::query)?;
        if !state.has_place(&comment.place_id) {
            return Err(CommentRepositoryError::place_not_found(
                comment.place_id.to_string(),
            ));
        }
        if state.user(&comment.user_id).is_none() {
            return Err(CommentRepositoryError::user_not_found(
                comment.user_id.to_string(),
            ));
        }
        state.comments.push(StoredComment {
            id: *id,
            place_id: comment.place_id,
            user_id: comment.user_id,
            text: comment.text.clone(),
            rating: comment.rating,
        });
        Ok(())
    }

    async fn update(
        &self,
        id: &CommentId,
        patch: &CommentPatch,
    ) -> Result<Option<PlaceId>, CommentRepositoryError> {
        let mut state = self.lock(CommentRepositoryError::query)?;
        let Some(stored) = state.comments.iter_mut().find(|comment| comment.id == *id) else {
            return Ok(None);
        };
        if let Some(text) = &patch.text {
            stored.text = text.clone();
        }
        if let Some(rating) = patch.rating {
            stored.rating = rating;
        }
        Ok(Some(stored.place_id))
    }

    async fn delete(&self, id: &CommentId) -> Result<Option<PlaceId>, CommentRepositoryError> {
        let mut state = self.lock(CommentRepositoryError::query)?;
        let Some(index) = state.comments.iter().position(|comment| comment.id == *id) else {
            return Ok(None);
        };
        Ok(Some(state.comments.remove(index).place_id))
    }
}

#[async_trait]
impl PlaceRatingRepository for InMemoryDirectory {
    async fn place_exists(&self, place_id: &PlaceId) -> Result<bool, PlaceRatingRepositoryError> {
        let state = self.lock(PlaceRatingRepositoryError::query)?;
        Ok(state.has_place(place_id))
    }

    async fn comment_ratings(
        &self,
        place_id: &PlaceId,
    ) -> Result<Vec<i32>, PlaceRatingRepositoryError> {
        let state = self.lock(PlaceRatingRepositoryError::query)?;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.place_id == *place_id)
            .map(|comment| comment.rating)
            .collect())
    }

    async fn store_rating(
        &self,
        place_id: &PlaceId,
        rating: PlaceRating,
    ) -> Result<bool, PlaceRatingRepositoryError> {
        let mut state = self.lock(PlaceRatingRepositoryError::query)?;
        let Some(place) = state.place_mut(place_id) else {
            return Ok(false);
        };
        place.rating = rating;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "in_memory_directory_tests.rs"]
mod tests;
