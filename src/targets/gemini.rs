//! Gemini CLI integration: install a custom theme into its settings
//! document and select it.
//!
//! The document is third-party and loosely shaped, so it is modeled as
//! "optional structured document, defaulting to an empty object when
//! absent or malformed"; typed mutations touch only the subtrees this
//! system owns (`ui.customThemes.<name>` and `ui.theme`).

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::error::{Result, SyncError};
use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

pub struct GeminiTarget {
    settings_path: PathBuf,
    theme_name: String,
}

impl GeminiTarget {
    pub fn new(theme_name: &str) -> Self {
        GeminiTarget::with_path(
            PathBuf::from(shellexpand::tilde("~/.gemini/settings.json").as_ref()),
            theme_name,
        )
    }

    pub fn with_path(settings_path: PathBuf, theme_name: &str) -> Self {
        GeminiTarget {
            settings_path,
            theme_name: theme_name.to_string(),
        }
    }

    fn render_theme(&self, t: &SemanticTokens) -> Value {
        let bg = t.background.to_string();
        let fg = t.foreground.to_string();
        let accent = t.accent.to_string();
        let muted = t.muted.to_string();
        let icon = t.icon.to_string();
        let green = t.string.base.to_string();
        let yellow = t.function.base.to_string();
        let diff_removed = t.accent.darken(0.6).to_string();

        json!({
            "type": "custom",
            "name": self.theme_name,
            "text": {
                "primary": fg,
                "secondary": muted,
                "link": accent,
                "accent": accent
            },
            "background": {
                "primary": bg,
                "diff": {
                    "added": t.string.dim.to_string(),
                    "removed": diff_removed
                }
            },
            "border": {
                "default": t.surface.to_string(),
                "focused": accent
            },
            "ui": {
                "comment": t.comment.to_string(),
                "symbol": icon,
                "gradient": [accent, yellow, fg]
            },
            "status": {
                "error": accent,
                "success": green,
                "warning": yellow
            },
            "Background": bg,
            "Foreground": fg,
            "LightBlue": icon,
            "AccentBlue": icon,
            "AccentPurple": t.variable_special.to_string(),
            "AccentCyan": t.label.to_string(),
            "AccentGreen": green,
            "AccentYellow": yellow,
            "AccentRed": accent,
            "DiffAdded": t.string.dim.to_string(),
            "DiffRemoved": diff_removed,
            "Comment": t.comment.to_string(),
            "Gray": muted,
            "GradientColors": [accent, yellow, fg]
        })
    }

    fn patch(&self, tokens: &SemanticTokens) -> anyhow::Result<()> {
        let mut settings: Map<String, Value> = match fs::read_to_string(&self.settings_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %self.settings_path.display(), error = %e,
                    "Settings unreadable, starting from an empty document");
                Map::new()
            }),
            Err(_) => Map::new(),
        };

        // ui and ui.customThemes must be objects before we can insert
        let ui = settings
            .entry("ui".to_string())
            .or_insert_with(|| json!({}));
        if !ui.is_object() {
            *ui = json!({});
        }
        let ui = ui.as_object_mut().expect("just normalized to object");

        let themes = ui
            .entry("customThemes".to_string())
            .or_insert_with(|| json!({}));
        if !themes.is_object() {
            *themes = json!({});
        }
        themes
            .as_object_mut()
            .expect("just normalized to object")
            .insert(self.theme_name.clone(), self.render_theme(tokens));
        ui.insert("theme".to_string(), Value::String(self.theme_name.clone()));

        let json = serde_json::to_string_pretty(&Value::Object(settings))
            .context("Failed to serialize settings")?;
        fs::write(&self.settings_path, json)
            .with_context(|| format!("Failed to write {}", self.settings_path.display()))?;

        info!(path = %self.settings_path.display(), theme = %self.theme_name, "Custom theme installed");
        Ok(())
    }
}

impl TargetIntegration for GeminiTarget {
    fn name(&self) -> &str {
        "gemini"
    }

    /// The settings file itself may not exist yet; the config
    /// directory marks the tool as installed.
    fn precondition(&self) -> bool {
        self.settings_path
            .parent()
            .map(|dir| dir.exists())
            .unwrap_or(false)
    }

    fn apply(&self, tokens: &SemanticTokens) -> Result<()> {
        self.patch(tokens)
            .map_err(|e| SyncError::write_failed(self.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use tempfile::TempDir;

    fn create_test_target() -> (GeminiTarget, TempDir) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        (GeminiTarget::with_path(path, "Nothing"), tmp)
    }

    fn tokens() -> SemanticTokens {
        SemanticTokens::derive(&Palette::nothing())
    }

    #[test]
    fn test_precondition_is_the_config_dir() {
        let tmp = TempDir::new().unwrap();
        let target =
            GeminiTarget::with_path(tmp.path().join("missing").join("settings.json"), "Nothing");
        assert!(!target.precondition());

        let (target, _tmp) = create_test_target();
        assert!(target.precondition());
    }

    #[test]
    fn test_apply_creates_document_from_nothing() {
        let (target, _tmp) = create_test_target();
        target.apply(&tokens()).unwrap();

        let doc: Value =
            serde_json::from_str(&fs::read_to_string(&target.settings_path).unwrap()).unwrap();
        assert_eq!(doc["ui"]["theme"], "Nothing");
        assert_eq!(doc["ui"]["customThemes"]["Nothing"]["type"], "custom");
        assert_eq!(
            doc["ui"]["customThemes"]["Nothing"]["AccentRed"],
            "#d71921"
        );
    }

    #[test]
    fn test_apply_preserves_foreign_keys() {
        let (target, _tmp) = create_test_target();
        fs::write(
            &target.settings_path,
            r#"{
  "model": "gemini-pro",
  "ui": { "hideBanner": true, "customThemes": { "Existing": { "type": "custom" } } }
}"#,
        )
        .unwrap();

        target.apply(&tokens()).unwrap();

        let doc: Value =
            serde_json::from_str(&fs::read_to_string(&target.settings_path).unwrap()).unwrap();
        assert_eq!(doc["model"], "gemini-pro");
        assert_eq!(doc["ui"]["hideBanner"], true);
        assert_eq!(doc["ui"]["customThemes"]["Existing"]["type"], "custom");
        assert_eq!(doc["ui"]["theme"], "Nothing");
    }

    #[test]
    fn test_apply_tolerates_malformed_document() {
        let (target, _tmp) = create_test_target();
        fs::write(&target.settings_path, "{ not json").unwrap();

        target.apply(&tokens()).unwrap();

        let doc: Value =
            serde_json::from_str(&fs::read_to_string(&target.settings_path).unwrap()).unwrap();
        assert_eq!(doc["ui"]["theme"], "Nothing");
    }

    #[test]
    fn test_apply_normalizes_wrongly_typed_subtrees() {
        let (target, _tmp) = create_test_target();
        fs::write(&target.settings_path, r#"{ "ui": "dark" }"#).unwrap();

        target.apply(&tokens()).unwrap();

        let doc: Value =
            serde_json::from_str(&fs::read_to_string(&target.settings_path).unwrap()).unwrap();
        assert_eq!(doc["ui"]["theme"], "Nothing");
        assert!(doc["ui"]["customThemes"]["Nothing"].is_object());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (target, _tmp) = create_test_target();
        target.apply(&tokens()).unwrap();
        let first = fs::read_to_string(&target.settings_path).unwrap();
        target.apply(&tokens()).unwrap();
        let second = fs::read_to_string(&target.settings_path).unwrap();
        assert_eq!(first, second);
    }
}
