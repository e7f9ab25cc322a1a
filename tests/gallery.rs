use seafood_catalog_api::{
    error::AppError,
    gallery::{EMPTY_GALLERY_MESSAGE, ImageGallery, MoveDirection},
};

fn gallery() -> ImageGallery {
    ImageGallery::from_urls(["/uploads/products/1-a.jpg", "/uploads/products/2-b.jpg", "/uploads/products/3-c.jpg"])
}

#[test]
fn append_then_remove_leaves_nothing_to_commit() {
    let mut gallery = ImageGallery::new();
    gallery.append("/uploads/products/1-a.jpg", Some("data:image/jpeg;base64,AAAA".into()));
    assert_eq!(gallery.len(), 1);

    let removed = gallery.remove(0).expect("removed");
    assert_eq!(removed.url, "/uploads/products/1-a.jpg");
    assert!(gallery.is_empty());

    match gallery.commit() {
        Err(AppError::BadRequest(message)) => assert_eq!(message, EMPTY_GALLERY_MESSAGE),
        other => panic!("expected empty gallery error, got {other:?}"),
    }
}

#[test]
fn moves_past_either_end_are_no_ops() {
    let mut images = gallery();
    let before = images.clone();

    assert!(!images.move_image(0, MoveDirection::Left));
    assert!(!images.move_image(images.len() - 1, MoveDirection::Right));
    assert!(!images.move_image(7, MoveDirection::Left));
    assert_eq!(images, before);
}

#[test]
fn moving_swaps_neighbours_and_changes_primary() {
    let mut images = gallery();
    assert!(images.move_image(1, MoveDirection::Left));
    assert_eq!(images.primary().map(|i| i.url.as_str()), Some("/uploads/products/2-b.jpg"));

    assert!(images.move_image(1, MoveDirection::Right));
    let urls: Vec<&str> = images.urls().collect();
    assert_eq!(
        urls,
        ["/uploads/products/2-b.jpg", "/uploads/products/3-c.jpg", "/uploads/products/1-a.jpg"]
    );
}

#[test]
fn removing_primary_promotes_next() {
    let mut images = gallery();
    images.remove(0);
    assert_eq!(images.primary().map(|i| i.url.as_str()), Some("/uploads/products/2-b.jpg"));
    assert!(images.remove(5).is_none());
}

#[test]
fn commit_drops_previews_and_trims_urls() {
    let mut images = ImageGallery::new();
    images.append("  https://cdn.example.com/tuna.jpg ", Some("data:image/png;base64,AA".into()));
    assert_eq!(images.commit().expect("urls"), vec!["https://cdn.example.com/tuna.jpg"]);

    let blank = ImageGallery::from_urls(["   "]);
    assert!(blank.commit().is_err());
}
