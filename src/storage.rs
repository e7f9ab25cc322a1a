//! Local filesystem sink for product images.
//!
//! Files land in a single directory and are served under [`PUBLIC_PREFIX`].
//! Names are `<unix-millis>-<sanitized original name>` and are never reused.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use serde::Serialize;
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const PUBLIC_PREFIX: &str = "/uploads/products";
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Only images are allowed.";
pub const TOO_LARGE_MESSAGE: &str = "File size exceeds 5MB limit.";

const FALLBACK_NAME: &str = "image";
const MAX_NAME_ATTEMPTS: i64 = 16;

/// A file part received from a multipart form.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    fn mime(&self) -> Option<String> {
        self.content_type.as_deref().map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Presence and type only. Used for crop sources, whose size is bounded by
/// the request body limit; the cropped result goes through [`validate_upload`].
pub fn validate_image_part(file: Option<&IncomingFile>) -> AppResult<&IncomingFile> {
    let file = file.ok_or_else(|| AppError::bad_request(NO_FILE_MESSAGE))?;

    let allowed = file
        .mime()
        .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime.as_str()));
    if !allowed {
        return Err(AppError::bad_request(INVALID_TYPE_MESSAGE));
    }

    Ok(file)
}

/// Checks presence, then type, then size. Nothing is written on failure.
pub fn validate_upload(file: Option<&IncomingFile>) -> AppResult<&IncomingFile> {
    let file = validate_image_part(file)?;

    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::bad_request(TOO_LARGE_MESSAGE));
    }

    Ok(file)
}

/// Keeps the last path component and replaces whitespace runs with `-`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut out = String::with_capacity(base.len());
    let mut in_space = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else if !ch.is_control() {
            out.push(ch);
            in_space = false;
        }
    }

    if out.is_empty() || out == "." || out == ".." {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

pub fn public_url(filename: &str) -> String {
    format!("{PUBLIC_PREFIX}/{filename}")
}

/// File name of a URL served by this store, if it is one.
pub fn stored_name(url: &str) -> Option<&str> {
    url.strip_prefix(PUBLIC_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

/// Writes `bytes` to a freshly created file. A failed write removes the
/// partial file so the directory only ever holds complete uploads.
async fn write_or_discard<W>(mut file: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %cleanup, "partial upload not removed");
        }
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a fresh timestamped name. An existing file is
    /// never overwritten; on a name clash the timestamp is bumped.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredFile> {
        fs::create_dir_all(&self.dir).await?;

        let sanitized = sanitize_file_name(original_name);
        let timestamp = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = format!("{}-{}", timestamp + attempt, sanitized);
            let path = self.dir.join(&filename);
            let file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            };

            write_or_discard(file, &path, bytes).await?;

            tracing::info!(filename = %filename, size = bytes.len(), "image stored");
            return Ok(StoredFile {
                url: public_url(&filename),
                filename,
            });
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "could not allocate a unique upload name for {sanitized}"
        )))
    }

    pub async fn exists(&self, filename: &str) -> bool {
        fs::try_exists(self.dir.join(filename)).await.unwrap_or(false)
    }

    /// Deletes stored files that no product references and that are older than
    /// `grace`. Recent files are kept so that an edit session still in
    /// progress does not lose its uploads.
    pub async fn sweep_orphans(
        &self,
        referenced: &HashSet<String>,
        grace: Duration,
    ) -> AppResult<SweepReport> {
        let mut report = SweepReport::default();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(report),
            Err(err) => return Err(err.into()),
        };

        let now = SystemTime::now();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            report.scanned += 1;

            let name = entry.file_name().to_string_lossy().into_owned();
            if referenced.contains(&name) {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < grace {
                continue;
            }

            fs::remove_file(entry.path()).await?;
            tracing::info!(filename = %name, "orphaned upload removed");
            report.removed.push(name);
        }

        report.removed.sort();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    use tokio::io::AsyncWrite;

    use super::write_or_discard;

    struct DiskFull;

    impl AsyncWrite for DiskFull {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("1700000000000-tuna.jpg");
        std::fs::write(&path, b"half").expect("partial file");

        let result = write_or_discard(DiskFull, &path, b"full image").await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
