//! Logo image resolution.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;
use tracing::{debug, warn};

/// Maps an image reference to a decoded image of exactly `width` x `height`.
///
/// Returns `None` when the reference is empty, cannot be located, or fails
/// to decode. Callers substitute a placeholder.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, reference: &str, width: u32, height: u32) -> Option<RgbaImage>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _reference: &str, _width: u32, _height: u32) -> Option<RgbaImage> {
        None
    }
}

/// Looks up references on disk: the literal path first, then the file name
/// under `logos_dir`.
#[derive(Debug, Clone)]
pub struct FsImageResolver {
    logos_dir: PathBuf,
}

impl FsImageResolver {
    pub fn new(logos_dir: impl Into<PathBuf>) -> Self {
        Self {
            logos_dir: logos_dir.into(),
        }
    }

    /// First existing file for `reference`, if any.
    pub fn locate(&self, reference: &str) -> Option<PathBuf> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        let literal = Path::new(reference);
        if literal.is_file() {
            return Some(literal.to_path_buf());
        }

        let under_logos = self.logos_dir.join(literal.file_name()?);
        under_logos.is_file().then_some(under_logos)
    }
}

impl ImageResolver for FsImageResolver {
    fn resolve(&self, reference: &str, width: u32, height: u32) -> Option<RgbaImage> {
        if reference.trim().is_empty() {
            return None;
        }

        let Some(path) = self.locate(reference) else {
            warn!(reference, "logo not found");
            return None;
        };

        match image::open(&path) {
            Ok(img) => {
                debug!(path = %path.display(), width, height, "loaded logo");
                Some(
                    img.resize_exact(width.max(1), height.max(1), FilterType::Lanczos3)
                        .to_rgba8(),
                )
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to decode logo");
                None
            }
        }
    }
}
