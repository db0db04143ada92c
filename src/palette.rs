//! Source palettes and the on-disk palette cache.
//!
//! A sync run starts from exactly one [`Palette`]: either the branded
//! static literal, or the colors the wallpaper-extraction tool (pywal)
//! last wrote to its cache. The static path also materializes its
//! palette into that same cache so independent consumers observe one
//! palette regardless of which source produced it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::color::Rgb;
use crate::error::SyncError;

/// UI font that ships with the branded theme.
pub const BRAND_FONT: &str = "NDOT 47 (inspired by NOTHING)";

/// Name under which the branded theme is installed into targets.
pub const BRAND_THEME_NAME: &str = "Nothing";

/// Theme name used for dynamically extracted palettes.
pub const WAL_THEME_NAME: &str = "Pywal";

/// The source color set every derivation starts from: background,
/// foreground, cursor and the 16 indexed terminal colors.
///
/// Constructed once per run and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub cursor: Rgb,
    pub colors: [Rgb; 16],
}

impl Palette {
    /// Indexed color accessor (`color0` .. `color15`).
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index]
    }

    /// The branded monochrome-plus-red palette.
    pub fn nothing() -> Self {
        const fn c(r: u8, g: u8, b: u8) -> Rgb {
            Rgb::new(r, g, b)
        }
        let red = c(0xd7, 0x19, 0x21);
        Palette {
            background: c(0x00, 0x00, 0x00),
            foreground: c(0xff, 0xff, 0xff),
            cursor: red,
            colors: [
                c(0x00, 0x00, 0x00),
                red,
                c(0x4a, 0x4a, 0x4a),
                c(0x80, 0x80, 0x80),
                c(0xb0, 0xb0, 0xb0),
                red,
                c(0xe0, 0xe0, 0xe0),
                c(0xff, 0xff, 0xff),
                c(0x66, 0x66, 0x66),
                red,
                c(0x5a, 0x5a, 0x5a),
                c(0x90, 0x90, 0x90),
                c(0xc0, 0xc0, 0xc0),
                red,
                c(0xf0, 0xf0, 0xf0),
                c(0xff, 0xff, 0xff),
            ],
        }
    }
}

// ============================================================================
// Cache document shape
// ============================================================================

/// `special` block of the cache document.
#[derive(Debug, Serialize, Deserialize)]
struct SpecialColors {
    background: Rgb,
    foreground: Rgb,
    cursor: Rgb,
}

/// `colors` block of the cache document. The fixed shape makes a
/// missing entry a parse error rather than a latent panic.
#[derive(Debug, Serialize, Deserialize)]
struct IndexedColors {
    color0: Rgb,
    color1: Rgb,
    color2: Rgb,
    color3: Rgb,
    color4: Rgb,
    color5: Rgb,
    color6: Rgb,
    color7: Rgb,
    color8: Rgb,
    color9: Rgb,
    color10: Rgb,
    color11: Rgb,
    color12: Rgb,
    color13: Rgb,
    color14: Rgb,
    color15: Rgb,
}

/// The cache document written by pywal (and by us on the static path):
/// `{ "special": {...}, "colors": {...} }`.
#[derive(Debug, Serialize, Deserialize)]
struct CacheDocument {
    special: SpecialColors,
    colors: IndexedColors,
}

impl From<&Palette> for CacheDocument {
    fn from(p: &Palette) -> Self {
        let c = &p.colors;
        CacheDocument {
            special: SpecialColors {
                background: p.background,
                foreground: p.foreground,
                cursor: p.cursor,
            },
            colors: IndexedColors {
                color0: c[0],
                color1: c[1],
                color2: c[2],
                color3: c[3],
                color4: c[4],
                color5: c[5],
                color6: c[6],
                color7: c[7],
                color8: c[8],
                color9: c[9],
                color10: c[10],
                color11: c[11],
                color12: c[12],
                color13: c[13],
                color14: c[14],
                color15: c[15],
            },
        }
    }
}

impl From<CacheDocument> for Palette {
    fn from(doc: CacheDocument) -> Self {
        let c = doc.colors;
        Palette {
            background: doc.special.background,
            foreground: doc.special.foreground,
            cursor: doc.special.cursor,
            colors: [
                c.color0, c.color1, c.color2, c.color3, c.color4, c.color5, c.color6,
                c.color7, c.color8, c.color9, c.color10, c.color11, c.color12, c.color13,
                c.color14, c.color15,
            ],
        }
    }
}

// ============================================================================
// Cache store
// ============================================================================

/// The well-known per-user palette cache directory (`~/.cache/wal`).
///
/// Holds two representations of the same palette: `colors.json`
/// (structured) and `colors.sh` (flat `key='#rrggbb'` lines for
/// consumers that source it as shell variables).
#[derive(Debug, Clone)]
pub struct PaletteCache {
    dir: PathBuf,
}

impl PaletteCache {
    pub fn new(dir: PathBuf) -> Self {
        PaletteCache { dir }
    }

    /// The location pywal writes to.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir()
            .map(|h| h.join(".cache").join("wal"))
            .unwrap_or_else(|| std::env::temp_dir().join("wal"));
        PaletteCache::new(dir)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join("colors.json")
    }

    pub fn sh_path(&self) -> PathBuf {
        self.dir.join("colors.sh")
    }

    /// Load a palette from the cache.
    ///
    /// Absent or malformed cache files report [`SyncError::PaletteUnavailable`]
    /// so callers can skip dynamic-palette work instead of crashing.
    pub fn load(&self) -> Result<Palette, SyncError> {
        let path = self.json_path();
        let raw = fs::read_to_string(&path).map_err(|e| {
            SyncError::PaletteUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let doc: CacheDocument = serde_json::from_str(&raw).map_err(|e| {
            SyncError::PaletteUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(doc.into())
    }

    /// Write both cache representations for `palette`.
    ///
    /// The cache is exclusively owned by palette producers, so plain
    /// overwrites are sufficient here.
    pub fn write(&self, palette: &Palette) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache dir: {}", self.dir.display()))?;

        let doc = CacheDocument::from(palette);
        let json = serde_json::to_string_pretty(&doc).context("Failed to serialize palette")?;
        fs::write(self.json_path(), json)
            .with_context(|| format!("Failed to write {}", self.json_path().display()))?;

        let mut flat = String::new();
        for (i, color) in palette.colors.iter().enumerate() {
            flat.push_str(&format!("color{}='{}'\n", i, color));
        }
        flat.push_str(&format!("background='{}'\n", palette.background));
        flat.push_str(&format!("foreground='{}'\n", palette.foreground));
        flat.push_str(&format!("cursor='{}'\n", palette.cursor));
        fs::write(self.sh_path(), flat)
            .with_context(|| format!("Failed to write {}", self.sh_path().display()))?;

        info!(dir = %self.dir.display(), "Palette cache written");
        Ok(())
    }
}

// ============================================================================
// Extraction tool invocation
// ============================================================================

/// Locate the wallpaper color-extraction tool.
///
/// Prefers `wal` on PATH, then falls back to the per-user Python bin
/// directories pip installs into.
pub fn find_wal() -> Option<PathBuf> {
    if let Ok(path) = which::which("wal") {
        return Some(path);
    }

    let home = dirs::home_dir()?;
    for version in ["3.14", "3.13", "3.12", "3.11", "3.10", "3.9"] {
        let candidate = home
            .join("Library")
            .join("Python")
            .join(version)
            .join("bin")
            .join("wal");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

/// Run the extraction tool against `image`, regenerating the palette
/// cache. Fails before any target is attempted if the tool or the
/// image is missing or the tool exits nonzero.
pub fn extract_palette(image: &Path) -> Result<(), SyncError> {
    if !image.exists() {
        return Err(SyncError::PaletteUnavailable(format!(
            "wallpaper not found: {}",
            image.display()
        )));
    }

    let wal = find_wal().ok_or_else(|| SyncError::CommandFailed {
        command: "wal".to_string(),
        message: "not found on PATH or in per-user Python bin directories".to_string(),
    })?;

    info!(image = %image.display(), tool = %wal.display(), "Extracting palette from wallpaper");

    // -s/-t skip shell and tty re-theming, -n leaves the wallpaper
    // alone; only the cache regeneration matters here.
    let output = Command::new(&wal)
        .args(["-s", "-t", "-n", "-i"])
        .arg(image)
        .output()
        .map_err(|e| SyncError::CommandFailed {
            command: wal.display().to_string(),
            message: e.to_string(),
        })?;

    if output.status.success() {
        info!("Palette extracted");
        Ok(())
    } else {
        warn!(status = ?output.status.code(), "Palette extraction failed");
        Err(SyncError::CommandFailed {
            command: wal.display().to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (PaletteCache, TempDir) {
        let tmp = TempDir::new().unwrap();
        (PaletteCache::new(tmp.path().to_path_buf()), tmp)
    }

    #[test]
    fn test_nothing_palette_literal() {
        let p = Palette::nothing();
        assert_eq!(p.background.to_string(), "#000000");
        assert_eq!(p.foreground.to_string(), "#ffffff");
        assert_eq!(p.cursor.to_string(), "#d71921");
        assert_eq!(p.color(1).to_string(), "#d71921");
        assert_eq!(p.color(8).to_string(), "#666666");
        assert_eq!(p.color(15).to_string(), "#ffffff");
    }

    #[test]
    fn test_cache_write_then_load_roundtrip() {
        let (cache, _tmp) = create_test_cache();
        let palette = Palette::nothing();

        cache.write(&palette).unwrap();
        let loaded = cache.load().unwrap();

        assert_eq!(loaded, palette);
    }

    #[test]
    fn test_cache_json_document_shape() {
        let (cache, _tmp) = create_test_cache();
        cache.write(&Palette::nothing()).unwrap();

        let raw = fs::read_to_string(cache.json_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["special"]["background"], "#000000");
        assert_eq!(value["special"]["cursor"], "#d71921");
        assert_eq!(value["colors"]["color0"], "#000000");
        assert_eq!(value["colors"]["color15"], "#ffffff");
    }

    #[test]
    fn test_cache_sh_document_shape() {
        let (cache, _tmp) = create_test_cache();
        cache.write(&Palette::nothing()).unwrap();

        let flat = fs::read_to_string(cache.sh_path()).unwrap();
        let lines: Vec<&str> = flat.lines().collect();
        assert_eq!(lines.len(), 19);
        assert_eq!(lines[0], "color0='#000000'");
        assert_eq!(lines[1], "color1='#d71921'");
        assert_eq!(lines[16], "background='#000000'");
        assert_eq!(lines[18], "cursor='#d71921'");
    }

    #[test]
    fn test_load_missing_cache_is_unavailable() {
        let (cache, _tmp) = create_test_cache();
        let err = cache.load().unwrap_err();
        assert!(matches!(err, SyncError::PaletteUnavailable(_)));
    }

    #[test]
    fn test_load_malformed_cache_is_unavailable() {
        let (cache, _tmp) = create_test_cache();
        fs::create_dir_all(cache.json_path().parent().unwrap()).unwrap();
        fs::write(cache.json_path(), "not valid json").unwrap();

        let err = cache.load().unwrap_err();
        assert!(matches!(err, SyncError::PaletteUnavailable(_)));
    }

    #[test]
    fn test_load_incomplete_cache_is_unavailable() {
        let (cache, _tmp) = create_test_cache();
        fs::create_dir_all(cache.json_path().parent().unwrap()).unwrap();
        // color15 (and most others) missing
        fs::write(
            cache.json_path(),
            r##"{"special":{"background":"#000000","foreground":"#ffffff","cursor":"#d71921"},"colors":{"color0":"#000000"}}"##,
        )
        .unwrap();

        let err = cache.load().unwrap_err();
        assert!(matches!(err, SyncError::PaletteUnavailable(_)));
    }

    #[test]
    fn test_extract_palette_missing_image() {
        let err = extract_palette(Path::new("/nonexistent/wallpaper.png")).unwrap_err();
        assert!(matches!(err, SyncError::PaletteUnavailable(_)));
    }
}
