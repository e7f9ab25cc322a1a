use std::{collections::HashSet, time::Duration};

use seafood_catalog_api::{
    error::AppError,
    storage::{
        INVALID_TYPE_MESSAGE, IncomingFile, MAX_UPLOAD_BYTES, NO_FILE_MESSAGE, TOO_LARGE_MESSAGE,
        UploadStore, public_url, sanitize_file_name, stored_name, validate_upload,
    },
};

fn file(content_type: &str, len: usize) -> IncomingFile {
    IncomingFile {
        file_name: Some("tuna.jpg".into()),
        content_type: Some(content_type.into()),
        bytes: vec![0; len],
    }
}

fn message(result: Result<&IncomingFile, AppError>) -> String {
    match result {
        Err(AppError::BadRequest(message)) => message,
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[test]
fn validation_checks_presence_type_then_size() {
    assert_eq!(message(validate_upload(None)), NO_FILE_MESSAGE);

    let pdf = file("application/pdf", MAX_UPLOAD_BYTES + 1);
    assert_eq!(message(validate_upload(Some(&pdf))), INVALID_TYPE_MESSAGE);

    let big = file("image/jpeg", MAX_UPLOAD_BYTES + 1);
    assert_eq!(message(validate_upload(Some(&big))), TOO_LARGE_MESSAGE);

    let exact = file("image/webp", MAX_UPLOAD_BYTES);
    assert!(validate_upload(Some(&exact)).is_ok());

    let with_params = file("IMAGE/PNG; charset=binary", 10);
    assert!(validate_upload(Some(&with_params)).is_ok());
}

#[test]
fn file_names_are_sanitized() {
    assert_eq!(sanitize_file_name("fresh  catch.jpg"), "fresh-catch.jpg");
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("C:\\photos\\sea bass.png"), "sea-bass.png");
    assert_eq!(sanitize_file_name(""), "image");
    assert_eq!(sanitize_file_name(".."), "image");
}

#[test]
fn stored_names_round_trip_through_urls() {
    let url = public_url("1700000000000-tuna.jpg");
    assert_eq!(url, "/uploads/products/1700000000000-tuna.jpg");
    assert_eq!(stored_name(&url), Some("1700000000000-tuna.jpg"));
    assert_eq!(stored_name("https://cdn.example.com/tuna.jpg"), None);
    assert_eq!(stored_name("/uploads/products/"), None);
    assert_eq!(stored_name("/uploads/products/a/b.jpg"), None);
}

#[tokio::test]
async fn store_never_overwrites() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = UploadStore::new(dir.path().join("products"));

    let first = store.store("tuna.jpg", b"one").await?;
    let second = store.store("tuna.jpg", b"two").await?;
    assert_ne!(first.filename, second.filename);
    assert!(store.exists(&first.filename).await);
    assert_eq!(std::fs::read(store.dir().join(&first.filename))?, b"one");
    assert_eq!(std::fs::read(store.dir().join(&second.filename))?, b"two");
    Ok(())
}

#[tokio::test]
async fn sweep_removes_only_unreferenced_files_past_grace() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = UploadStore::new(dir.path());

    let kept = store.store("kept.jpg", b"k").await?;
    let orphan = store.store("orphan.jpg", b"o").await?;
    let referenced: HashSet<String> = [kept.filename.clone()].into_iter().collect();

    let report = store
        .sweep_orphans(&referenced, Duration::from_secs(3600))
        .await?;
    assert_eq!(report.scanned, 2);
    assert!(report.removed.is_empty());

    let report = store.sweep_orphans(&referenced, Duration::ZERO).await?;
    assert_eq!(report.removed, vec![orphan.filename.clone()]);
    assert!(store.exists(&kept.filename).await);
    assert!(!store.exists(&orphan.filename).await);
    Ok(())
}

#[tokio::test]
async fn sweep_of_missing_directory_is_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = UploadStore::new(dir.path().join("never-created"));
    let report = store.sweep_orphans(&HashSet::new(), Duration::ZERO).await?;
    assert_eq!(report.scanned, 0);
    Ok(())
}
