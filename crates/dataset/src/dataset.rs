//! The COCO dataset: correlated collections plus the files behind them.

use crate::config::DatasetConfig;
use crate::document::{self, Document, ANNOTATIONS, CATEGORIES, IMAGES, LICENSES};
use crate::error::{DatasetError, Result};
use crate::models::{Annotations, Categories, Image, Images, Info, Licenses};
use crate::orchestrator::{propagate, Collections, DatasetFilters};
use crate::store::ImageStore;
use cocoql_core::{Collection, RecordId};
use std::path::{Path, PathBuf};

/// Outcome of copying a dataset's image files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    /// File names that could not be copied.
    pub failed: Vec<String>,
}

impl CopyReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A COCO dataset bound to its document path and, optionally, its image directory.
#[derive(Clone, Debug)]
pub struct CocoDataset {
    path: PathBuf,
    config: DatasetConfig,
    store: Option<ImageStore>,
    pub info: Info,
    pub images: Images,
    pub annotations: Annotations,
    pub categories: Categories,
    pub licenses: Licenses,
}

impl CocoDataset {
    /// Creates an empty dataset that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::new_with(path, DatasetConfig::default())
    }

    pub fn new_with(path: impl Into<PathBuf>, config: DatasetConfig) -> Self {
        let policy = config.id_policy;
        Self {
            path: path.into(),
            store: config.images_dir.clone().map(ImageStore::new),
            config,
            info: Info::default(),
            images: Collection::with_policy(policy),
            annotations: Collection::with_policy(policy),
            categories: Collection::with_policy(policy),
            licenses: Collection::with_policy(policy),
        }
    }

    /// Loads the document at `path` if it exists, or creates an empty dataset.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, DatasetConfig::default())
    }

    pub fn open_with(path: impl Into<PathBuf>, config: DatasetConfig) -> Result<Self> {
        let path = path.into();
        if path.is_file() {
            Self::load_with(path, config)
        } else {
            tracing::debug!(path = %path.display(), "no dataset document, starting empty");
            Ok(Self::new_with(path, config))
        }
    }

    /// Loads the document at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load_with(path, DatasetConfig::default())
    }

    pub fn load_with(path: impl Into<PathBuf>, config: DatasetConfig) -> Result<Self> {
        let path = path.into();
        let document = Document::read(&path)?;
        Self::from_document(path, document, config)
    }

    /// Builds a dataset from a parsed document.
    pub fn from_document(
        path: impl Into<PathBuf>,
        document: Document,
        config: DatasetConfig,
    ) -> Result<Self> {
        let policy = config.id_policy;
        let images = document::decode(IMAGES, document.images, policy)?;
        let annotations = document::decode(ANNOTATIONS, document.annotations, policy)?;
        let categories = document::decode(CATEGORIES, document.categories, policy)?;
        let licenses = document::decode(LICENSES, document.licenses.unwrap_or_default(), policy)?;
        Ok(Self {
            path: path.into(),
            store: config.images_dir.clone().map(ImageStore::new),
            config,
            info: document.info.unwrap_or_default(),
            images,
            annotations,
            categories,
            licenses,
        })
    }

    pub fn to_document(&self) -> Document {
        Document {
            info: Some(self.info.clone()),
            images: document::encode(&self.images),
            annotations: document::encode(&self.annotations),
            categories: document::encode(&self.categories),
            licenses: Some(document::encode(&self.licenses)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// The image store, if the dataset has an image directory.
    pub fn store(&self) -> Option<&ImageStore> {
        self.store.as_ref()
    }

    pub fn set_images_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        self.config.images_dir = Some(dir.clone());
        self.store = Some(ImageStore::new(dir));
    }

    /// Writes the document to `path`, or to the dataset's own path.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = path.unwrap_or(&self.path);
        self.to_document().write(path, self.config.indent)
    }

    /// Writes the document and copies every image file into `images_dir`.
    pub fn save_with_images(
        &self,
        path: Option<&Path>,
        images_dir: impl AsRef<Path>,
    ) -> Result<CopyReport> {
        self.save(path)?;
        self.copy_images_to(images_dir)
    }

    /// Filters the dataset and keeps its collections consistent.
    ///
    /// With `inplace`, the dataset's own collections are replaced once the whole
    /// propagation succeeded. With `images_dir`, the surviving image files are
    /// copied there and the returned dataset uses it as its image directory.
    pub fn filter(
        &mut self,
        filters: &DatasetFilters,
        inplace: bool,
        images_dir: Option<&Path>,
    ) -> Result<CocoDataset> {
        let propagated = propagate(
            Collections {
                images: &self.images,
                annotations: &self.annotations,
                categories: &self.categories,
                licenses: &self.licenses,
            },
            filters,
        )?;

        let mut filtered = Self {
            path: self.path.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
            info: self.info.clone(),
            images: propagated.images,
            annotations: propagated.annotations,
            categories: propagated.categories,
            licenses: propagated.licenses,
        };
        if let Some(dir) = images_dir {
            let report = filtered.copy_images_to(dir)?;
            tracing::info!(
                dir = %dir.display(),
                copied = report.copied,
                failed = report.failed.len(),
                "copied filtered images"
            );
            filtered.set_images_dir(dir);
        }
        if inplace {
            self.images = filtered.images.clone();
            self.annotations = filtered.annotations.clone();
            self.categories = filtered.categories.clone();
            self.licenses = filtered.licenses.clone();
        }
        Ok(filtered)
    }

    /// Copies the file of every image into `dir`.
    ///
    /// A file that cannot be copied is logged and reported, and does not stop the
    /// remaining copies.
    pub fn copy_images_to(&self, dir: impl AsRef<Path>) -> Result<CopyReport> {
        let store = self.store.as_ref().ok_or(DatasetError::NoImageDir)?;
        let dir = dir.as_ref();
        let mut report = CopyReport::default();
        for image in self.images.iter() {
            match store.copy_to(&image.file_name, dir) {
                Ok(_) => report.copied += 1,
                Err(err) => {
                    tracing::warn!(file_name = %image.file_name, error = %err, "image copy failed");
                    report.failed.push(image.file_name.clone());
                }
            }
        }
        Ok(report)
    }

    /// Appends an image record and, with `bytes`, writes its file.
    ///
    /// If the file cannot be written the record is removed again.
    pub fn append_with_image(&mut self, image: Image, bytes: Option<&[u8]>) -> Result<RecordId> {
        let store = match bytes {
            Some(_) => Some(self.store.as_ref().ok_or(DatasetError::NoImageDir)?),
            None => None,
        };
        let file_name = image.file_name.clone();
        let id = self.images.append(image)?;
        if let (Some(store), Some(bytes)) = (store, bytes) {
            if let Err(err) = store.save(&file_name, bytes) {
                self.images.delete(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Replaces the image record with the same id and, with `bytes`, its file.
    ///
    /// Returns None, touching no file, if no image has that id.
    pub fn update_with_image(
        &mut self,
        image: Image,
        bytes: Option<&[u8]>,
    ) -> Result<Option<RecordId>> {
        let Some(old) = self.images.get_by_id(image.id) else {
            return Ok(None);
        };
        let old_file_name = old.file_name.clone();
        let new_file_name = image.file_name.clone();
        let store = match bytes {
            Some(_) => Some(self.store.as_ref().ok_or(DatasetError::NoImageDir)?),
            None => None,
        };
        if let (Some(store), Some(bytes)) = (store, bytes) {
            store.save(&new_file_name, bytes)?;
            if old_file_name != new_file_name && store.exists(&old_file_name) {
                store.delete(&old_file_name)?;
            }
        }
        Ok(self.images.update(image))
    }

    /// Deletes an image record and, with `delete_file`, its file.
    pub fn delete_with_image(&mut self, id: RecordId, delete_file: bool) -> Result<Option<Image>> {
        let store = if delete_file {
            Some(self.store.as_ref().ok_or(DatasetError::NoImageDir)?)
        } else {
            None
        };
        let removed = self.images.delete(id);
        if let (Some(store), Some(image)) = (store, removed.as_ref()) {
            store.delete(&image.file_name)?;
        }
        Ok(removed)
    }
}
