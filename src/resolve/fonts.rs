//! Font resolution by family name and pixel size.
//!
//! Fallback chain for a family:
//!
//! 1. `{fonts_dir}/{family}.ttf`, then `{fonts_dir}/{family}.otf`
//! 2. Each configured system font path, in order
//! 3. The built-in bitmap font
//!
//! Faces are parsed once per family and shared across sizes and threads.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ab_glyph::FontArc;
use tracing::{debug, warn};

use crate::text::FontHandle;

/// Maps a (family, size) request to a renderable font. Never fails.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, family: &str, size: u32) -> FontHandle;
}

/// Always returns the built-in bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFonts;

impl FontResolver for BuiltinFonts {
    fn resolve(&self, _family: &str, size: u32) -> FontHandle {
        FontHandle::builtin(size)
    }
}

/// Filesystem-backed resolver with a per-family face cache.
pub struct FsFontResolver {
    fonts_dir: PathBuf,
    system_fonts: Vec<PathBuf>,
    /// `None` records a family that fell through to the built-in font.
    faces: Mutex<HashMap<String, Option<FontArc>>>,
}

impl FsFontResolver {
    pub fn new(fonts_dir: impl Into<PathBuf>, system_fonts: Vec<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            system_fonts,
            faces: Mutex::new(HashMap::new()),
        }
    }

    fn candidates(&self, family: &str) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2 + self.system_fonts.len());
        if !family.is_empty() {
            paths.push(self.fonts_dir.join(format!("{}.ttf", family)));
            paths.push(self.fonts_dir.join(format!("{}.otf", family)));
        }
        paths.extend(self.system_fonts.iter().cloned());
        paths
    }

    fn load_face(&self, family: &str) -> Option<FontArc> {
        for path in self.candidates(family) {
            if let Some(font) = load_font_file(&path) {
                debug!(family, path = %path.display(), "loaded font");
                return Some(font);
            }
        }
        warn!(family, "no usable font file found, using built-in bitmap font");
        None
    }
}

impl FontResolver for FsFontResolver {
    fn resolve(&self, family: &str, size: u32) -> FontHandle {
        let cached = self
            .faces
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(family)
            .cloned();

        // File I/O happens without the lock. Two threads may both load a new
        // family; the first insert wins and both get the same face.
        let face = match cached {
            Some(face) => face,
            None => {
                let loaded = self.load_face(family);
                let mut faces = self.faces.lock().unwrap_or_else(|e| e.into_inner());
                faces.entry(family.to_string()).or_insert(loaded).clone()
            }
        };

        match face {
            Some(font) => FontHandle::outline(font, size),
            None => FontHandle::builtin(size),
        }
    }
}

fn load_font_file(path: &Path) -> Option<FontArc> {
    if !path.is_file() {
        return None;
    }
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read font file");
            return None;
        }
    };
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse font file");
            None
        }
    }
}
