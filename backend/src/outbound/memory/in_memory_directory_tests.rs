//! Tests for the in-memory directory adapter.

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::{
    DisplayName, EmailAddress, MenuItem, PasswordHash, PlaceCategory, PlaceName, Schedule,
};

#[fixture]
fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
}

fn account(name: &str, email: &str) -> UserAccount {
    UserAccount {
        user: User::new(
            UserId::random(),
            DisplayName::new(name).expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
        ),
        password_hash: PasswordHash::from_encoded("$argon2id$stub"),
    }
}

fn new_place(name: &str, category: PlaceCategory) -> NewPlace {
    NewPlace {
        name: PlaceName::new(name).expect("valid name"),
        category,
        image_url: None,
        schedule: Schedule::from_value(json!({})),
        menu: vec![MenuItem::new("Tortas", "Torta ahogada", 45.0).expect("valid item")],
    }
}

fn comment(place_id: PlaceId, user_id: UserId, text: &str, rating: i32) -> NewComment {
    NewComment {
        place_id,
        user_id,
        text: CommentText::new(text).expect("valid text"),
        rating,
    }
}

async fn seeded(directory: &InMemoryDirectory) -> (PlaceId, UserId) {
    let user = account("Ana", "ana@alumnos.udg.mx");
    let user_id = *user.user.id();
    UserRepository::create(directory, &user).await.expect("user");
    let place_id = PlaceId::random();
    PlaceRepository::create(
        directory,
        &place_id,
        &new_place("Cafetería", PlaceCategory::DrinksAndCoffee),
    )
    .await
    .expect("place");
    (place_id, user_id)
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(directory: InMemoryDirectory) {
    UserRepository::create(&directory, &account("Ana", "ana@alumnos.udg.mx"))
        .await
        .expect("first insert");
    let err = UserRepository::create(&directory, &account("Otra", "ana@alumnos.udg.mx"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn listing_filters_by_category_and_keeps_insertion_order(directory: InMemoryDirectory) {
    for (name, category) in [
        ("Tacos", PlaceCategory::BreakfastAndMeals),
        ("Café", PlaceCategory::DrinksAndCoffee),
        ("Comedor", PlaceCategory::BreakfastAndMeals),
    ] {
        PlaceRepository::create(&directory, &PlaceId::random(), &new_place(name, category))
            .await
            .expect("place");
    }

    let meals = directory
        .list(CategoryFilter::Only(PlaceCategory::BreakfastAndMeals))
        .await
        .expect("list");
    let names: Vec<_> = meals
        .iter()
        .map(|summary| summary.place.name.as_ref())
        .collect();
    assert_eq!(names, ["Tacos", "Comedor"]);
    let unknown = directory.list(CategoryFilter::Unknown).await.expect("list");
    assert!(unknown.is_empty());

    let counts = directory.counts().await.expect("counts");
    assert_eq!(counts.all(), 3);
    assert_eq!(counts.count(PlaceCategory::BreakfastAndMeals), 2);
    assert_eq!(counts.count(PlaceCategory::Snacks), 0);
}

#[rstest]
#[tokio::test]
async fn latest_comment_is_the_most_recently_added(directory: InMemoryDirectory) {
    let (place_id, user_id) = seeded(&directory).await;
    for text in ["primero", "segundo"] {
        CommentRepository::create(
            &directory,
            &CommentId::random(),
            &comment(place_id, user_id, text, 4),
        )
        .await
        .expect("comment");
    }

    let listed = directory.list(CategoryFilter::All).await.expect("list");
    assert_eq!(listed[0].latest_comment.as_deref(), Some("segundo"));

    let comments = directory.list_for_place(&place_id).await.expect("comments");
    let texts: Vec<_> = comments.iter().map(|c| c.text.as_ref()).collect();
    assert_eq!(texts, ["primero", "segundo"]);
    assert_eq!(comments[0].user_name.as_ref(), "Ana");
}

#[rstest]
#[tokio::test]
async fn comments_require_existing_place_and_user(directory: InMemoryDirectory) {
    let (place_id, user_id) = seeded(&directory).await;

    let err = CommentRepository::create(
        &directory,
        &CommentId::random(),
        &comment(PlaceId::random(), user_id, "hola", 5),
    )
    .await
    .expect_err("missing place");
    assert!(matches!(err, CommentRepositoryError::PlaceNotFound { .. }));

    let err = CommentRepository::create(
        &directory,
        &CommentId::random(),
        &comment(place_id, UserId::random(), "hola", 5),
    )
    .await
    .expect_err("missing user");
    assert!(matches!(err, CommentRepositoryError::UserNotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn deleting_a_place_cascades_to_its_comments(directory: InMemoryDirectory) {
    let (place_id, user_id) = seeded(&directory).await;
    let comment_id = CommentId::random();
    CommentRepository::create(&directory, &comment_id, &comment(place_id, user_id, "rico", 5))
        .await
        .expect("comment");

    assert!(PlaceRepository::delete(&directory, &place_id).await.expect("delete"));
    assert!(!PlaceRepository::delete(&directory, &place_id).await.expect("second delete"));
    assert!(CommentRepository::list_for_place(&directory, &place_id).await.expect("comments").is_empty());
    assert_eq!(
        CommentRepository::delete(&directory, &comment_id)
            .await
            .expect("delete comment"),
        None
    );
    assert!(directory.comment_ratings(&place_id).await.expect("ratings").is_empty());
}

#[rstest]
#[tokio::test]
async fn patches_apply_to_places_and_comments(directory: InMemoryDirectory) {
    let (place_id, user_id) = seeded(&directory).await;
    let comment_id = CommentId::random();
    CommentRepository::create(&directory, &comment_id, &comment(place_id, user_id, "meh", 2))
        .await
        .expect("comment");

    let owner = CommentRepository::update(
        &directory,
        &comment_id,
        &CommentPatch {
            text: None,
            rating: Some(5),
        },
    )
    .await
    .expect("update");
    assert_eq!(owner, Some(place_id));
    assert_eq!(directory.comment_ratings(&place_id).await.expect("ratings"), [5]);

    let patched = PlaceRepository::update(
        &directory,
        &place_id,
        &PlacePatch {
            menu: Some(Vec::new()),
            ..PlacePatch::default()
        },
    )
    .await
    .expect("update");
    assert!(patched);
    let place = PlaceRepository::find_by_id(&directory, &place_id)
        .await
        .expect("lookup")
        .expect("place exists");
    assert!(place.menu.is_empty());
    assert_eq!(place.name.as_ref(), "Cafetería");
}

#[rstest]
#[tokio::test]
async fn stored_ratings_are_visible_on_the_place(directory: InMemoryDirectory) {
    let (place_id, _) = seeded(&directory).await;
    let rating = PlaceRating::from_stored(4.5, 2);
    assert!(directory.store_rating(&place_id, rating).await.expect("store"));
    assert!(!directory
        .store_rating(&PlaceId::random(), rating)
        .await
        .expect("store"));

    let place = PlaceRepository::find_by_id(&directory, &place_id)
        .await
        .expect("lookup")
        .expect("place exists");
    assert_eq!(place.rating, rating);
}
