//! Image blob store
//!
//! Images are written to `{folder}/{image_id}{image_type}` and indexed in
//! memory. A failed write may leave a partial file behind; it is never
//! indexed.
use super::error::{Result, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 16;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist a complete image and return its generated ID
    async fn save(&self, laptop_id: &str, image_type: &str, data: Vec<u8>) -> Result<String>;

    /// Metadata of a stored image
    fn find(&self, image_id: &str) -> Option<StoredImage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub laptop_id: String,
    pub image_type: String,
    pub path: PathBuf,
}

/// Image types become file extensions: either empty or `.` followed by a
/// short run of ASCII alphanumerics (`.jpg`, `.png`).
pub fn is_valid_image_type(image_type: &str) -> bool {
    match image_type.strip_prefix('.') {
        None => image_type.is_empty(),
        Some(ext) => {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

#[derive(Debug)]
pub struct DiskImageStore {
    folder: PathBuf,
    images: RwLock<HashMap<String, StoredImage>>,
}

impl DiskImageStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            images: RwLock::new(HashMap::new()),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, laptop_id: &str, image_type: &str, data: Vec<u8>) -> Result<String> {
        if !is_valid_image_type(image_type) {
            return Err(StoreError::InvalidImageType(image_type.to_string()));
        }

        let image_id = Uuid::new_v4().to_string();
        let path = self.folder.join(format!("{}{}", image_id, image_type));

        tokio::fs::create_dir_all(&self.folder).await?;
        tokio::fs::write(&path, &data).await?;

        info!(
            image_id = %image_id,
            laptop_id = %laptop_id,
            size = data.len(),
            path = %path.display(),
            "Image written"
        );

        self.images.write().insert(
            image_id.clone(),
            StoredImage {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
                path,
            },
        );

        Ok(image_id)
    }

    fn find(&self, image_id: &str) -> Option<StoredImage> {
        self.images.read().get(image_id).cloned()
    }
}
