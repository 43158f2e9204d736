//! Where canvas text gets its faces from.
//!
//! A [`FontConfig`] is cheap to build and describe; turning it into a
//! [`FontBook`] scans the filesystem, so do that once and share the book
//! between every canvas you create.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

const DISPLAY_BOLD: &[u8] = include_bytes!("../fonts/dejavu/DejaVuSansCondensed-Bold.ttf");
const MONO_BOLD: &[u8] = include_bytes!("../fonts/dejavu/DejaVuSansMono-Bold.ttf");

/// Family the bundled condensed face is registered under.
pub const BUNDLED_SANS_FAMILY: &str = "DejaVu Sans Condensed";
/// Family the bundled monospace face is registered under.
pub const BUNDLED_MONO_FAMILY: &str = "DejaVu Sans Mono";

#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Scan the platform font directories.
    pub system_fonts: bool,
    /// Register the faces compiled into this crate, so text always has a
    /// fallback even on a machine without any fonts installed.
    pub bundled_fonts: bool,
    /// Extra directories to scan, after the system ones.
    pub font_dirs: Vec<PathBuf>,
    /// In-memory font files, registered last.
    pub embedded: Vec<EmbeddedFont>,
    /// Faces standing in for `sans-serif`, `monospace` and `serif`.
    pub fallbacks: FamilyFallbacks,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            system_fonts: true,
            bundled_fonts: true,
            font_dirs: vec![],
            embedded: vec![],
            fallbacks: FamilyFallbacks::poster(),
        }
    }
}

impl FontConfig {
    /// Configuration that only sees the given directories and the bundled faces.
    pub fn from_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            system_fonts: false,
            font_dirs: dirs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Build the face database.
    pub fn resolve(&self) -> FontBook {
        FontBook::load(self)
    }
}

/// A TTF/OTF file held in memory.
#[derive(Clone, Debug)]
pub struct EmbeddedFont {
    pub bytes: Arc<Vec<u8>>,
    /// Register the face under this family instead of the one in its name table.
    pub family: Option<String>,
}

impl EmbeddedFont {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            family: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

/// The faces shipped inside the crate: a condensed bold sans for headlines
/// and a bold monospace for labels.
pub fn bundled_fonts() -> Vec<EmbeddedFont> {
    vec![
        EmbeddedFont::new(DISPLAY_BOLD.to_vec()).with_family(BUNDLED_SANS_FAMILY),
        EmbeddedFont::new(MONO_BOLD.to_vec()).with_family(BUNDLED_MONO_FAMILY),
    ]
}

/// Candidate families for each generic CSS family. The first one present
/// in the database wins.
#[derive(Clone, Debug, Default)]
pub struct FamilyFallbacks {
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
    pub serif: Vec<String>,
}

impl FamilyFallbacks {
    /// Condensed display faces first, so headlines stay narrow without Oswald.
    pub fn poster() -> Self {
        let owned = |names: &[&str]| -> Vec<String> { names.iter().map(|n| n.to_string()).collect() };
        Self {
            sans_serif: owned(&[
                "Oswald",
                "Bebas Neue",
                "Impact",
                "Arial Narrow",
                "Liberation Sans Narrow",
                "DejaVu Sans Condensed",
                "DejaVu Sans",
            ]),
            monospace: owned(&[
                "Courier Prime",
                "Courier New",
                "Liberation Mono",
                "DejaVu Sans Mono",
            ]),
            serif: owned(&["Liberation Serif", "DejaVu Serif"]),
        }
    }
}

/// A loaded face database. Clones share nothing with the filesystem.
#[derive(Clone)]
pub struct FontBook {
    pub(crate) db: fontdb::Database,
}

impl FontBook {
    fn load(config: &FontConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            log::debug!("scanning font directory {}", dir.display());
            db.load_fonts_dir(dir);
        }
        if config.bundled_fonts {
            for font in &bundled_fonts() {
                load_embedded(&mut db, font);
            }
        }
        for font in &config.embedded {
            load_embedded(&mut db, font);
        }

        let mut book = Self { db };
        book.pick_fallbacks(&config.fallbacks);
        log::debug!("font book holds {} faces", book.face_count());
        book
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Family names known to the book, sorted.
    pub fn families(&self) -> BTreeSet<String> {
        self.db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect()
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.db
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    }

    /// Bind each generic family to its first available candidate, or to the
    /// first known family when none of them is present.
    fn pick_fallbacks(&mut self, fallbacks: &FamilyFallbacks) {
        let known = self.families();
        let first = |candidates: &[String]| {
            candidates
                .iter()
                .find(|c| known.contains(*c))
                .or_else(|| known.first())
                .cloned()
        };

        if let Some(family) = first(&fallbacks.sans_serif) {
            self.db.set_sans_serif_family(family);
        }
        if let Some(family) = first(&fallbacks.monospace) {
            self.db.set_monospace_family(family);
        }
        if let Some(family) = first(&fallbacks.serif) {
            self.db.set_serif_family(family);
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontBook({} faces)", self.db.len())
    }
}

fn load_embedded(db: &mut fontdb::Database, font: &EmbeddedFont) {
    let ids = db.load_font_source(fontdb::Source::Binary(font.bytes.clone()));
    if let Some(family) = &font.family {
        for id in ids {
            rename_family(db, id, family);
        }
    }
}

fn rename_family(db: &mut fontdb::Database, id: fontdb::ID, family: &str) {
    let Some(mut face) = db.face(id).cloned() else {
        return;
    };
    db.remove_face(id);
    face.families = vec![(family.to_string(), fontdb::Language::English_UnitedStates)];
    db.push_face_info(face);
}
