use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const EMPTY_GALLERY_MESSAGE: &str = "Please add at least one image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    /// Local preview shown while editing; never persisted.
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Left,
    Right,
}

/// Ordered image list of a product being edited. Index 0 is the primary image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageGallery {
    images: Vec<GalleryImage>,
}

impl ImageGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: urls
                .into_iter()
                .map(|url| GalleryImage {
                    url: url.into(),
                    preview: None,
                })
                .collect(),
        }
    }

    pub fn append(&mut self, url: impl Into<String>, preview: Option<String>) {
        self.images.push(GalleryImage {
            url: url.into(),
            preview,
        });
    }

    /// Removes the entry at `index`; later entries shift left, so removing the
    /// primary promotes the next image.
    pub fn remove(&mut self, index: usize) -> Option<GalleryImage> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    /// Swaps the entry with its neighbour. Returns `false` and leaves the list
    /// untouched when the neighbour does not exist.
    pub fn move_image(&mut self, index: usize, direction: MoveDirection) -> bool {
        let target = match direction {
            MoveDirection::Left => index.checked_sub(1),
            MoveDirection::Right => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.images.len() && target < self.images.len() => {
                self.images.swap(index, target);
                true
            }
            _ => false,
        }
    }

    pub fn primary(&self) -> Option<&GalleryImage> {
        self.images.first()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.url.as_str())
    }

    /// Final ordered URL list for `Product.images`. Previews are dropped.
    pub fn commit(self) -> AppResult<Vec<String>> {
        if self.images.is_empty() {
            return Err(AppError::bad_request(EMPTY_GALLERY_MESSAGE));
        }
        let mut urls = Vec::with_capacity(self.images.len());
        for image in self.images {
            let url = image.url.trim();
            if url.is_empty() {
                return Err(AppError::bad_request("Image URL must not be empty"));
            }
            urls.push(url.to_string());
        }
        Ok(urls)
    }
}
