//! Behaviour tests for place rating aggregation.
//!
//! Steps drive the comment ports of an in-memory directory and read the
//! aggregate back through the place query port.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::future::Future;
use std::sync::Mutex;

use cuceifoods::domain::{CommentId, CommentPatch, CommentText, NewComment, PlaceCategory, PlaceId};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

mod support;

use support::{Directory, in_memory_directory, seed_place, seed_user};

struct RatingWorld {
    runtime: Runtime,
    directory: Directory,
    place_id: Option<PlaceId>,
    comment_ids: Vec<CommentId>,
}

impl RatingWorld {
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn place_id(&self) -> PlaceId {
        self.place_id.expect("a place should have been created")
    }

    fn add_comment(&mut self, rating: i32) {
        let state = &self.directory.state;
        let place_id = self.place_id();
        let email = format!("estudiante{}@alumnos.udg.mx", self.comment_ids.len());
        let id = self.runtime.block_on(async {
            let user_id = seed_user(state, "Estudiante", &email).await;
            state
                .comments
                .add_comment(NewComment {
                    place_id,
                    user_id,
                    text: CommentText::new("Rico").expect("valid text"),
                    rating,
                })
                .await
                .expect("add comment")
        });
        self.comment_ids.push(id);
    }
}

impl std::fmt::Debug for RatingWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingWorld")
            .field("place_id", &self.place_id)
            .field("comment_ids", &self.comment_ids)
            .finish_non_exhaustive()
    }
}

#[fixture]
fn world() -> Mutex<RatingWorld> {
    Mutex::new(RatingWorld {
        runtime: Runtime::new().expect("create runtime"),
        directory: in_memory_directory(),
        place_id: None,
        comment_ids: Vec::new(),
    })
}

#[given("a place with comments rated {first} and {second}")]
fn a_place_with_two_comments(world: &Mutex<RatingWorld>, first: i32, second: i32) {
    let mut world = world.lock().expect("world lock");
    let place_id = world.block_on(seed_place(
        &world.directory.state,
        "Cafetería Central",
        PlaceCategory::DrinksAndCoffee,
    ));
    world.place_id = Some(place_id);
    world.add_comment(first);
    world.add_comment(second);
}

#[when("a comment rated {rating} is added")]
fn a_comment_is_added(world: &Mutex<RatingWorld>, rating: i32) {
    world.lock().expect("world lock").add_comment(rating);
}

#[when("every comment on the place is deleted")]
fn every_comment_is_deleted(world: &Mutex<RatingWorld>) {
    let mut world = world.lock().expect("world lock");
    let ids = std::mem::take(&mut world.comment_ids);
    let state = &world.directory.state;
    world.block_on(async {
        for id in &ids {
            state.comments.delete_comment(id).await.expect("delete comment");
        }
    });
}

#[when("the first comment is re-rated {rating}")]
fn the_first_comment_is_rerated(world: &Mutex<RatingWorld>, rating: i32) {
    let world = world.lock().expect("world lock");
    let id = *world.comment_ids.first().expect("a comment exists");
    let patch = CommentPatch {
        text: None,
        rating: Some(rating),
    };
    world
        .block_on(world.directory.state.comments.update_comment(&id, patch))
        .expect("update comment");
}

#[then("the place has {count} ratings averaging {mean}")]
fn the_place_has_ratings(world: &Mutex<RatingWorld>, count: u32, mean: f64) {
    let world = world.lock().expect("world lock");
    let place_id = world.place_id();
    let place = world
        .block_on(world.directory.state.places_query.get_place(&place_id))
        .expect("get place");
    assert_eq!(place.rating.num_ratings(), count);
    assert!(
        (place.rating.rating() - mean).abs() < 1e-9,
        "expected mean {mean}, got {}",
        place.rating.rating()
    );
}

#[scenario(
    path = "tests/features/rating_aggregation.feature",
    name = "Comments drive the mean and the count"
)]
fn comments_drive_the_mean_and_the_count(world: Mutex<RatingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rating_aggregation.feature",
    name = "Removing every comment resets the aggregate"
)]
fn removing_every_comment_resets_the_aggregate(world: Mutex<RatingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/rating_aggregation.feature",
    name = "Editing a rating recomputes the mean"
)]
fn editing_a_rating_recomputes_the_mean(world: Mutex<RatingWorld>) {
    drop(world);
}
