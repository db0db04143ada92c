//! Zed integration: a theme-family document this system exclusively
//! owns, plus a narrow text patch of the user's settings to select it.
//!
//! The theme file is a full rewrite (atomic temp+rename) rendered
//! entirely from tokens, so running it twice produces byte-identical
//! output. The settings document is JSONC with user formatting and
//! comments, so selection is a scoped pattern replace: a failed match
//! leaves the document untouched.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

pub struct ZedTarget {
    themes_dir: PathBuf,
    settings_path: PathBuf,
    theme_name: String,
    /// UI font to pin in settings (branded theme only).
    font_family: Option<String>,
}

impl ZedTarget {
    pub fn new(theme_name: &str, font_family: Option<&str>) -> Self {
        ZedTarget::with_paths(
            PathBuf::from(shellexpand::tilde("~/.config/zed/themes").as_ref()),
            PathBuf::from(shellexpand::tilde("~/.config/zed/settings.json").as_ref()),
            theme_name,
            font_family,
        )
    }

    pub fn with_paths(
        themes_dir: PathBuf,
        settings_path: PathBuf,
        theme_name: &str,
        font_family: Option<&str>,
    ) -> Self {
        ZedTarget {
            themes_dir,
            settings_path,
            theme_name: theme_name.to_string(),
            font_family: font_family.map(str::to_string),
        }
    }

    fn theme_path(&self) -> PathBuf {
        self.themes_dir
            .join(format!("{}.json", self.theme_name.to_lowercase()))
    }

    /// Render the complete theme-family document from tokens.
    fn render_theme(&self, t: &SemanticTokens) -> Value {
        let bg = t.background.to_string();
        let label = t.label.to_string();
        let muted = t.muted.to_string();
        let accent = t.accent.to_string();
        let icon = t.icon.to_string();
        let surface = t.surface.to_string();
        let elevated = t.elevated.to_string();
        let selection = t.selection.to_string();
        let transparent = "#00000000";

        let term = &t.terminal;
        let ansi = |i: usize| term.ansi[i].to_string();

        json!({
            "$schema": "https://zed.dev/schema/themes/v0.1.0.json",
            "name": self.theme_name,
            "author": "theme-sync",
            "themes": [
                {
                    "name": self.theme_name,
                    "appearance": "dark",
                    "style": {
                        "border": surface,
                        "border.variant": elevated,
                        "border.focused": accent,
                        "border.selected": accent,
                        "border.transparent": transparent,
                        "border.disabled": surface,
                        "elevated_surface.background": elevated,
                        "surface.background": surface,
                        "background": bg,
                        "element.background": surface,
                        "element.hover": selection,
                        "element.active": selection,
                        "element.selected": selection,
                        "element.disabled": bg,
                        "drop_target.background": t.selection.rgba_hex(0xcc),
                        "ghost_element.background": transparent,
                        "ghost_element.hover": selection,
                        "ghost_element.active": selection,
                        "ghost_element.selected": selection,
                        "ghost_element.disabled": bg,
                        "text": label,
                        "text.muted": muted,
                        "text.placeholder": muted,
                        "text.disabled": muted,
                        "text.accent": accent,
                        "icon": icon,
                        "icon.muted": muted,
                        "icon.disabled": muted,
                        "icon.accent": accent,
                        "status_bar.background": surface,
                        "title_bar.background": bg,
                        "toolbar.background": surface,
                        "tab_bar.background": surface,
                        "tab.inactive_background": surface,
                        "tab.active_background": bg,
                        "search.match_background": selection,
                        "panel.background": elevated,
                        "panel.focused_border": accent,
                        "pane.focused_border": accent,
                        "scrollbar.thumb.background": t.selection.rgba_hex(0x80),
                        "scrollbar.thumb.hover_background": t.selection.rgba_hex(0xcc),
                        "scrollbar.thumb.border": transparent,
                        "scrollbar.track.background": transparent,
                        "scrollbar.track.border": transparent,
                        "editor.foreground": label,
                        "editor.background": bg,
                        "editor.gutter.background": bg,
                        "editor.subheader.background": surface,
                        "editor.active_line.background": t.active.to_string(),
                        "editor.highlighted_line.background": t.active.to_string(),
                        "editor.line_number": muted,
                        "editor.active_line_number": label,
                        "editor.invisible": muted,
                        "editor.document_highlight.read_background": t.selection.rgba_hex(0x80),
                        "editor.document_highlight.write_background": t.selection.rgba_hex(0x80),
                        "terminal.background": term.background.to_string(),
                        "terminal.foreground": term.foreground.to_string(),
                        "terminal.ansi.black": ansi(0),
                        "terminal.ansi.red": ansi(1),
                        "terminal.ansi.green": ansi(2),
                        "terminal.ansi.yellow": ansi(3),
                        "terminal.ansi.blue": ansi(4),
                        "terminal.ansi.magenta": ansi(5),
                        "terminal.ansi.cyan": ansi(6),
                        "terminal.ansi.white": ansi(7),
                        "terminal.ansi.bright_black": ansi(8),
                        "terminal.ansi.bright_red": ansi(9),
                        "terminal.ansi.bright_green": ansi(10),
                        "terminal.ansi.bright_yellow": ansi(11),
                        "terminal.ansi.bright_blue": ansi(12),
                        "terminal.ansi.bright_magenta": ansi(13),
                        "terminal.ansi.bright_cyan": ansi(14),
                        "terminal.ansi.bright_white": ansi(15),
                        "terminal.ansi.dim_black": ansi(0),
                        "terminal.ansi.dim_red": ansi(1),
                        "terminal.ansi.dim_green": ansi(2),
                        "terminal.ansi.dim_yellow": ansi(3),
                        "terminal.ansi.dim_blue": ansi(4),
                        "terminal.ansi.dim_magenta": ansi(5),
                        "terminal.ansi.dim_cyan": ansi(6),
                        "terminal.ansi.dim_white": ansi(7),
                        "link_text.hover": accent,
                        "conflict": accent,
                        "created": t.string.base.to_string(),
                        "deleted": accent,
                        "error": accent,
                        "error.border": accent,
                        "hidden": muted,
                        "hint": icon,
                        "ignored": muted,
                        "info": icon,
                        "modified": t.function.base.to_string(),
                        "predictive": muted,
                        "renamed": t.string.base.to_string(),
                        "success": t.string.base.to_string(),
                        "warning": t.function.base.to_string(),
                        "players": [],
                        "syntax": {
                            "attribute": { "color": t.attribute.to_string() },
                            "boolean": { "color": t.keyword.light.to_string(), "font_weight": 700 },
                            "comment": { "color": t.comment.to_string(), "font_style": "italic" },
                            "comment.doc": { "color": t.comment_doc.to_string(), "font_style": "italic" },
                            "constant": { "color": t.keyword.base.to_string(), "font_weight": 700 },
                            "constructor": { "color": t.function.light.to_string(), "font_weight": 700 },
                            "embedded": { "color": t.variable.to_string() },
                            "emphasis": { "font_style": "italic" },
                            "emphasis.strong": { "font_weight": 700 },
                            "enum": { "color": t.types.light.to_string(), "font_weight": 700 },
                            "function": { "color": t.function.base.to_string(), "font_weight": 700 },
                            "keyword": { "color": t.keyword.base.to_string(), "font_weight": 700 },
                            "label": { "color": t.label.to_string() },
                            "link_text": { "color": t.keyword.light.to_string(), "font_style": "italic" },
                            "link_uri": { "color": t.string.light.to_string() },
                            "number": { "color": t.keyword.dim.to_string() },
                            "operator": { "color": t.operator.to_string() },
                            "preproc": { "color": t.keyword.dim.to_string() },
                            "primary": { "color": t.label.to_string() },
                            "property": { "color": t.property.to_string() },
                            "punctuation": { "color": t.punctuation.to_string() },
                            "punctuation.bracket": { "color": t.bracket.to_string() },
                            "punctuation.delimiter": { "color": t.punctuation.to_string() },
                            "string": { "color": t.string.base.to_string() },
                            "string.escape": { "color": t.string.dim.to_string() },
                            "string.regex": { "color": t.string.light.to_string() },
                            "string.special": { "color": t.string.light.to_string() },
                            "tag": { "color": t.types.base.to_string() },
                            "title": { "color": t.keyword.light.to_string(), "font_weight": 700 },
                            "type": { "color": t.types.base.to_string(), "font_weight": 700 },
                            "variable": { "color": t.variable.to_string() },
                            "variable.special": { "color": t.variable_special.to_string(), "font_style": "italic" },
                            "variant": { "color": t.types.dim.to_string() }
                        }
                    }
                }
            ]
        })
    }

    fn write_theme_file(&self, tokens: &SemanticTokens) -> anyhow::Result<()> {
        fs::create_dir_all(&self.themes_dir).with_context(|| {
            format!("Failed to create themes dir: {}", self.themes_dir.display())
        })?;

        let document = self.render_theme(tokens);
        let json =
            serde_json::to_string_pretty(&document).context("Failed to serialize theme")?;

        // Atomic write: temp file, then rename
        let path = self.theme_path();
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &json)
            .with_context(|| format!("Failed to write temp theme file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

        info!(path = %path.display(), bytes = json.len(), "Theme file written");
        Ok(())
    }

    /// Replace the theme-selection region of the settings document,
    /// leaving all other keys and formatting untouched.
    ///
    /// Known fragility: the pattern assumes the `"theme"` object has no
    /// nested braces before its `"dark"` entry. A differently shaped
    /// object fails the match, which leaves the file unmodified.
    fn patch_settings(&self) -> Result<()> {
        if !self.settings_path.exists() {
            debug!(path = %self.settings_path.display(), "No settings file, skipping selection patch");
            return Ok(());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| SyncError::write_failed(self.name(), e))?;

        let theme_pattern = r#""theme":\s*\{[^}]*"dark":\s*"[^"]*""#;
        let re = Regex::new(theme_pattern).expect("static pattern");
        if !re.is_match(&content) {
            return Err(SyncError::PatchRegionNotFound {
                path: self.settings_path.display().to_string(),
                pattern: theme_pattern.to_string(),
            });
        }
        let replacement = format!(
            "\"theme\": {{\n    \"mode\": \"system\",\n    \"light\": \"Ayu Light\",\n    \"dark\": \"{}\"",
            self.theme_name
        );
        let mut updated = re.replace(&content, replacement.as_str()).into_owned();

        if let Some(font) = &self.font_family {
            let font_re = Regex::new(r#""ui_font_family":\s*"[^"]*""#).expect("static pattern");
            if font_re.is_match(&updated) {
                updated = font_re
                    .replace(&updated, format!("\"ui_font_family\": \"{}\"", font).as_str())
                    .into_owned();
            } else {
                updated = updated.replacen(
                    "\"theme\":",
                    &format!("\"ui_font_family\": \"{}\",\n  \"theme\":", font),
                    1,
                );
            }
        }

        if updated != content {
            fs::write(&self.settings_path, updated)
                .map_err(|e| SyncError::write_failed(self.name(), e))?;
            info!(path = %self.settings_path.display(), theme = %self.theme_name, "Settings patched");
        }
        Ok(())
    }
}

impl TargetIntegration for ZedTarget {
    fn name(&self) -> &str {
        "zed"
    }

    fn precondition(&self) -> bool {
        self.themes_dir.exists()
    }

    fn apply(&self, tokens: &SemanticTokens) -> Result<()> {
        self.write_theme_file(tokens)
            .map_err(|e| SyncError::write_failed(self.name(), e))?;
        self.patch_settings()
    }
}
