//! Palette cache materialization as the first integration on the
//! branded-theme path.
//!
//! Writing the static palette into the same cache the extraction tool
//! uses means downstream consumers (status-bar plugins sourcing
//! `colors.sh`, anything reading `colors.json`) observe one palette no
//! matter which source produced it.

use crate::error::{Result, SyncError};
use crate::palette::{Palette, PaletteCache};
use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

pub struct WalCacheTarget {
    cache: PaletteCache,
    palette: Palette,
}

impl WalCacheTarget {
    pub fn new(cache: PaletteCache, palette: Palette) -> Self {
        WalCacheTarget { cache, palette }
    }
}

impl TargetIntegration for WalCacheTarget {
    fn name(&self) -> &str {
        "palette-cache"
    }

    /// The cache directory is created on demand, so this target is
    /// always applicable.
    fn precondition(&self) -> bool {
        true
    }

    /// Writes the source palette, not the derived tokens: the cache is
    /// the palette's canonical on-disk form for other consumers.
    fn apply(&self, _tokens: &SemanticTokens) -> Result<()> {
        self.cache
            .write(&self.palette)
            .map_err(|e| SyncError::write_failed(self.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_materializes_both_representations() {
        let tmp = TempDir::new().unwrap();
        let cache = PaletteCache::new(tmp.path().to_path_buf());
        let palette = Palette::nothing();
        let target = WalCacheTarget::new(cache.clone(), palette.clone());

        assert!(target.precondition());
        let tokens = SemanticTokens::derive(&palette);
        target.apply(&tokens).unwrap();

        assert!(cache.json_path().exists());
        assert!(cache.sh_path().exists());
        assert_eq!(cache.load().unwrap(), palette);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let cache = PaletteCache::new(tmp.path().to_path_buf());
        let palette = Palette::nothing();
        let target = WalCacheTarget::new(cache.clone(), palette.clone());
        let tokens = SemanticTokens::derive(&palette);

        target.apply(&tokens).unwrap();
        let first = std::fs::read_to_string(cache.json_path()).unwrap();
        target.apply(&tokens).unwrap();
        let second = std::fs::read_to_string(cache.json_path()).unwrap();
        assert_eq!(first, second);
    }
}
