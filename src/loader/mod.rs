use std::io;
use std::path::{Path, PathBuf};

use crate::geometry::ImageSize;
use thiserror::Error;

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image source is empty")]
    MissingSource,
    #[error("unsupported image source `{0}`")]
    UnsupportedSource(String),
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read image header of {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Resolves an image reference to its intrinsic pixel size.
pub trait ImageLoader {
    fn natural_size(&self, source: &str) -> LoadResult<ImageSize>;
}

/// Reads image headers from the local filesystem.
///
/// Sources may be absolute paths, `file://` URLs, or paths relative to
/// `asset_root` (how public pages reference uploads, e.g. `/uploads/a.jpg`).
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader {
    asset_root: Option<PathBuf>,
}

impl FileImageLoader {
    pub const fn new() -> Self {
        Self { asset_root: None }
    }

    pub fn with_asset_root(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(asset_root.into()),
        }
    }

    pub fn asset_root(&self) -> Option<&Path> {
        self.asset_root.as_deref()
    }

    pub fn resolve(&self, source: &str) -> LoadResult<PathBuf> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(LoadError::MissingSource);
        }
        if let Some(path) = trimmed.strip_prefix(FILE_SCHEME) {
            return Ok(PathBuf::from(path));
        }
        if trimmed.contains("://") {
            return Err(LoadError::UnsupportedSource(trimmed.to_string()));
        }

        match &self.asset_root {
            Some(root) => Ok(root.join(trimmed.trim_start_matches('/'))),
            None => Ok(PathBuf::from(trimmed)),
        }
    }
}

impl ImageLoader for FileImageLoader {
    fn natural_size(&self, source: &str) -> LoadResult<ImageSize> {
        let path = self.resolve(source)?;
        let (width, height) = image::image_dimensions(&path).map_err(|err| match err {
            image::ImageError::IoError(source) => LoadError::Io {
                path: path.clone(),
                source,
            },
            source => LoadError::Decode {
                path: path.clone(),
                source,
            },
        })?;
        tracing::debug!(path = %path.display(), width, height, "probed image dimensions");
        Ok(ImageSize::new(width, height))
    }
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> LoadResult<ImageSize>,
{
    fn natural_size(&self, source: &str) -> LoadResult<ImageSize> {
        self(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_site_relative_paths_onto_asset_root() {
        let loader = FileImageLoader::with_asset_root("/srv/public");
        assert_eq!(
            loader.resolve("/uploads/coach.jpg").expect("path should resolve"),
            PathBuf::from("/srv/public/uploads/coach.jpg")
        );
        assert_eq!(
            loader.resolve("file:///tmp/a.png").expect("file url should resolve"),
            PathBuf::from("/tmp/a.png")
        );
    }

    #[test]
    fn resolve_rejects_empty_and_remote_sources() {
        let loader = FileImageLoader::new();
        assert!(matches!(loader.resolve("  "), Err(LoadError::MissingSource)));
        assert!(matches!(
            loader.resolve("https://cdn.example.com/a.jpg"),
            Err(LoadError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn natural_size_reads_png_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("wide.png");
        image::RgbImage::new(32, 18)
            .save(&path)
            .expect("png should be written");

        let loader = FileImageLoader::with_asset_root(dir.path());
        assert_eq!(
            loader.natural_size("wide.png").expect("size should load"),
            ImageSize::new(32, 18)
        );
    }

    #[test]
    fn natural_size_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loader = FileImageLoader::with_asset_root(dir.path());
        let err = loader
            .natural_size("missing.png")
            .expect_err("missing file should fail");
        assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn natural_size_reports_garbage_as_decode_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("broken.png"), b"not a png").expect("write");
        let loader = FileImageLoader::with_asset_root(dir.path());
        let err = loader
            .natural_size("broken.png")
            .expect_err("garbage should fail");
        assert!(matches!(err, LoadError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn closures_act_as_loaders() {
        let loader = |_: &str| -> LoadResult<ImageSize> { Ok(ImageSize::new(4, 3)) };
        assert_eq!(
            loader.natural_size("anything").expect("closure loader"),
            ImageSize::new(4, 3)
        );
    }
}
