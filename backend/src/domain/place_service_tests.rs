//! Tests for the place service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockPlaceRepository, MockUploadStore};
use crate::domain::{
    ErrorCode, ImageUpload, MenuItem, NewPlace, PlaceCategory, PlaceName, PlaceRating, Schedule,
};

fn new_place() -> NewPlace {
    NewPlace {
        name: PlaceName::new("Cafetería Central").expect("valid name"),
        category: PlaceCategory::DrinksAndCoffee,
        image_url: None,
        schedule: Schedule::from_value(json!({"lun": "7-15"})),
        menu: vec![MenuItem::new("Bebidas", "Americano", 25.0).expect("valid item")],
    }
}

#[fixture]
fn uploads() -> MockUploadStore {
    MockUploadStore::new()
}

fn service(
    places: MockPlaceRepository,
    uploads: MockUploadStore,
) -> PlaceService<MockPlaceRepository, MockUploadStore> {
    PlaceService::new(Arc::new(places), Arc::new(uploads))
}

#[rstest]
#[tokio::test]
async fn create_without_image_persists_the_place(uploads: MockUploadStore) {
    let mut places = MockPlaceRepository::new();
    places
        .expect_create()
        .withf(|_, place| place.image_url.is_none() && place.menu.len() == 1)
        .times(1)
        .return_once(|_, _| Ok(()));

    let id = service(places, uploads)
        .create_place(CreatePlaceRequest {
            place: new_place(),
            image: None,
        })
        .await
        .expect("create succeeds");
    assert_ne!(id.as_uuid(), &uuid::Uuid::nil());
}

#[tokio::test]
async fn create_with_image_stores_it_and_links_the_url() {
    let mut uploads = MockUploadStore::new();
    uploads
        .expect_save()
        .withf(|upload| upload.filename.as_ref() == "front.png" && upload.bytes == [1, 2, 3])
        .times(1)
        .return_once(|_| Ok(()));
    let mut places = MockPlaceRepository::new();
    places
        .expect_create()
        .withf(|_, place| place.image_url.as_deref() == Some("/uploads/front.png"))
        .times(1)
        .return_once(|_, _| Ok(()));

    let filename = UploadFilename::from_client("front.png").expect("allowed");
    service(places, uploads)
        .create_place(CreatePlaceRequest {
            place: new_place(),
            image: Some(ImageUpload {
                filename,
                bytes: vec![1, 2, 3],
            }),
        })
        .await
        .expect("create succeeds");
}

#[tokio::test]
async fn failed_upload_does_not_create_the_place() {
    let mut uploads = MockUploadStore::new();
    uploads
        .expect_save()
        .return_once(|_| Err(UploadStoreError::io("disk full")));
    let mut places = MockPlaceRepository::new();
    places.expect_create().never();

    let filename = UploadFilename::from_client("front.png").expect("allowed");
    let err = service(places, uploads)
        .create_place(CreatePlaceRequest {
            place: new_place(),
            image: Some(ImageUpload {
                filename,
                bytes: Vec::new(),
            }),
        })
        .await
        .expect_err("upload failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[case(false, Some(ErrorCode::NotFound))]
#[case(true, None)]
#[tokio::test]
async fn update_reports_missing_places(
    uploads: MockUploadStore,
    #[case] exists: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let id = PlaceId::random();
    let mut places = MockPlaceRepository::new();
    places
        .expect_update()
        .withf(move |candidate, _| *candidate == id)
        .return_once(move |_, _| Ok(exists));

    let result = service(places, uploads)
        .update_place(&id, PlacePatch::default())
        .await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_place_is_not_found(uploads: MockUploadStore) {
    let id = PlaceId::random();
    let mut places = MockPlaceRepository::new();
    places
        .expect_delete()
        .with(eq(id))
        .return_once(|_| Ok(false));

    let err = service(places, uploads)
        .delete_place(&id)
        .await
        .expect_err("missing place");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Place not found");
}

#[rstest]
#[tokio::test]
async fn get_place_maps_connection_errors(uploads: MockUploadStore) {
    let mut places = MockPlaceRepository::new();
    places
        .expect_find_by_id()
        .return_once(|_| Err(PlaceRepositoryError::connection("refused")));

    let err = service(places, uploads)
        .get_place(&PlaceId::random())
        .await
        .expect_err("connection failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn get_place_returns_the_stored_place(uploads: MockUploadStore) {
    let id = PlaceId::random();
    let NewPlace {
        name,
        category,
        image_url,
        schedule,
        menu,
    } = new_place();
    let stored = Place {
        id,
        name,
        category,
        image_url,
        schedule,
        menu,
        rating: PlaceRating::unrated(),
    };
    let expected = stored.clone();
    let mut places = MockPlaceRepository::new();
    places
        .expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(stored)));

    let place = service(places, uploads)
        .get_place(&id)
        .await
        .expect("place exists");
    assert_eq!(place, expected);
}

#[rstest]
#[case("../secret.png")]
#[case("notes.txt")]
#[tokio::test]
async fn unsanitary_image_names_are_not_found_without_touching_storage(
    #[case] filename: &str,
) {
    let mut uploads = MockUploadStore::new();
    uploads.expect_open().never();

    let err = service(MockPlaceRepository::new(), uploads)
        .place_image(filename)
        .await
        .expect_err("rejected name");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn stored_images_carry_their_content_type() {
    let mut uploads = MockUploadStore::new();
    uploads
        .expect_open()
        .return_once(|_| Ok(Some(vec![0x47, 0x49, 0x46])));

    let image = service(MockPlaceRepository::new(), uploads)
        .place_image("logo.gif")
        .await
        .expect("image exists");
    assert_eq!(image.content_type, "image/gif");
    assert_eq!(image.bytes, [0x47, 0x49, 0x46]);
}
