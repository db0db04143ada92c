//! VS Code-family integration: a structured patch of the user's
//! settings document.
//!
//! The settings file belongs to the user; only the two color
//! customization subtrees are owned by this system and replaced
//! wholesale. Every other key round-trips untouched. Antigravity is a
//! VS Code fork and shares the integration wholesale, differing only
//! in its settings path.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{Result, SyncError};
use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

/// The two settings subtrees this system owns once present.
const WORKBENCH_KEY: &str = "workbench.colorCustomizations";
const TOKEN_COLORS_KEY: &str = "editor.tokenColorCustomizations";

pub struct VscodeTarget {
    app_name: String,
    settings_path: PathBuf,
}

impl VscodeTarget {
    /// Stock VS Code.
    pub fn code() -> Self {
        VscodeTarget::with_path("vscode", app_support_settings("Code"))
    }

    /// The Antigravity fork keeps VS Code's settings shape.
    pub fn antigravity() -> Self {
        VscodeTarget::with_path("antigravity", app_support_settings("Antigravity"))
    }

    pub fn with_path(app_name: &str, settings_path: PathBuf) -> Self {
        VscodeTarget {
            app_name: app_name.to_string(),
            settings_path,
        }
    }

    fn render_workbench(&self, t: &SemanticTokens) -> Value {
        let bg = t.background.to_string();
        let label = t.label.to_string();
        let muted = t.muted.to_string();
        let accent = t.accent.to_string();
        let icon = t.icon.to_string();
        let selection = t.selection.to_string();
        let term = &t.terminal;
        let ansi = |i: usize| term.ansi[i].to_string();

        json!({
            "editor.background": bg,
            "editor.foreground": label,
            "editorCursor.foreground": t.cursor.to_string(),
            "editorLineNumber.foreground": muted,
            "editorLineNumber.activeForeground": label,
            "editorGutter.background": bg,
            "editorGutter.addedBackground": t.string.base.to_string(),
            "editorGutter.modifiedBackground": t.function.base.to_string(),
            "editorGutter.deletedBackground": accent,
            "editor.lineHighlightBackground": t.surface.to_string(),
            "editor.selectionBackground": selection,
            "editor.inactiveSelectionBackground": t.surface.to_string(),
            "activityBar.background": bg,
            "activityBar.foreground": icon,
            "activityBar.inactiveForeground": muted,
            "activityBarBadge.background": accent,
            "activityBarBadge.foreground": bg,
            "sideBar.background": t.elevated.to_string(),
            "sideBar.foreground": label,
            "statusBar.background": bg,
            "statusBar.foreground": muted,
            "titleBar.activeBackground": bg,
            "titleBar.activeForeground": label,
            "titleBar.inactiveBackground": bg,
            "titleBar.inactiveForeground": muted,
            "panel.background": t.elevated.to_string(),
            "panelTitle.activeBorder": accent,
            "panelTitle.activeForeground": label,
            "panelTitle.inactiveForeground": muted,
            "focusBorder": accent,
            "tab.activeBackground": bg,
            "tab.activeForeground": label,
            "tab.inactiveBackground": t.surface.to_string(),
            "tab.inactiveForeground": muted,
            "tab.activeBorderTop": accent,
            "editorGroupHeader.tabsBackground": t.surface.to_string(),
            "breadcrumb.foreground": muted,
            "breadcrumb.focusForeground": label,
            "breadcrumb.activeSelectionForeground": accent,
            "list.activeSelectionBackground": selection,
            "list.activeSelectionForeground": label,
            "list.inactiveSelectionBackground": t.surface.to_string(),
            "list.hoverBackground": t.active.to_string(),
            "list.focusBackground": selection,
            "list.highlightForeground": accent,
            "button.background": accent,
            "button.foreground": bg,
            "button.hoverBackground": t.accent.lighten(0.15).to_string(),
            "input.background": bg,
            "input.foreground": label,
            "input.placeholderForeground": muted,
            "dropdown.background": t.elevated.to_string(),
            "dropdown.foreground": label,
            "notifications.background": t.elevated.to_string(),
            "notifications.foreground": label,
            "notificationsErrorIcon.foreground": accent,
            "notificationsWarningIcon.foreground": t.function.base.to_string(),
            "notificationsInfoIcon.foreground": icon,
            "quickInput.background": t.elevated.to_string(),
            "quickInputList.focusBackground": selection,
            "badge.background": accent,
            "badge.foreground": bg,
            "progressBar.background": accent,
            "editorWidget.background": t.elevated.to_string(),
            "editorHoverWidget.background": t.elevated.to_string(),
            "editorSuggestWidget.background": t.elevated.to_string(),
            "editorSuggestWidget.selectedBackground": selection,
            "scrollbarSlider.background": t.selection.rgba_hex(0x80),
            "scrollbarSlider.hoverBackground": t.selection.rgba_hex(0xcc),
            "scrollbarSlider.activeBackground": t.selection.rgba_hex(0xcc),
            "settings.modifiedItemIndicator": accent,
            "terminal.background": term.background.to_string(),
            "terminal.foreground": term.foreground.to_string(),
            "terminal.ansiBlack": ansi(0),
            "terminal.ansiRed": ansi(1),
            "terminal.ansiGreen": ansi(2),
            "terminal.ansiYellow": ansi(3),
            "terminal.ansiBlue": ansi(4),
            "terminal.ansiMagenta": ansi(5),
            "terminal.ansiCyan": ansi(6),
            "terminal.ansiWhite": ansi(7),
            "terminal.ansiBrightBlack": ansi(8),
            "terminal.ansiBrightRed": ansi(9),
            "terminal.ansiBrightGreen": ansi(10),
            "terminal.ansiBrightYellow": ansi(11),
            "terminal.ansiBrightBlue": ansi(12),
            "terminal.ansiBrightMagenta": ansi(13),
            "terminal.ansiBrightCyan": ansi(14),
            "terminal.ansiBrightWhite": ansi(15),
            "terminalCursor.background": term.background.to_string(),
            "terminalCursor.foreground": t.cursor.to_string()
        })
    }

    fn render_token_colors(&self, t: &SemanticTokens) -> Value {
        json!({
            "comments": { "foreground": t.comment.to_string(), "fontStyle": "italic" },
            "keywords": { "foreground": t.keyword.base.to_string(), "fontStyle": "bold" },
            "functions": { "foreground": t.function.base.to_string(), "fontStyle": "bold" },
            "variables": { "foreground": t.variable.to_string() },
            "strings": { "foreground": t.string.base.to_string() },
            "types": { "foreground": t.types.base.to_string(), "fontStyle": "bold" },
            "numbers": { "foreground": t.keyword.dim.to_string() },
            "textMateRules": [
                {
                    "scope": ["storage.type", "storage.modifier"],
                    "settings": { "foreground": t.keyword.base.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": ["entity.name.type", "entity.name.class"],
                    "settings": { "foreground": t.types.base.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": ["entity.name.type.interface", "entity.name.type.enum"],
                    "settings": { "foreground": t.types.light.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": ["entity.name.function", "support.function"],
                    "settings": { "foreground": t.function.base.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": ["entity.name.function.member", "entity.name.function.constructor"],
                    "settings": { "foreground": t.function.light.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": "variable.parameter",
                    "settings": { "foreground": t.parameter.to_string(), "fontStyle": "italic" }
                },
                {
                    "scope": "constant.language",
                    "settings": { "foreground": t.keyword.light.to_string(), "fontStyle": "bold" }
                },
                {
                    "scope": "constant.numeric",
                    "settings": { "foreground": t.keyword.dim.to_string() }
                },
                {
                    "scope": ["variable.other.property", "variable.other.object.property"],
                    "settings": { "foreground": t.property.to_string() }
                },
                {
                    "scope": ["variable.language", "variable.language.this"],
                    "settings": { "foreground": t.variable_special.to_string(), "fontStyle": "italic" }
                },
                {
                    "scope": ["punctuation.definition.string", "constant.character.escape"],
                    "settings": { "foreground": t.string.dim.to_string() }
                },
                {
                    "scope": "string.regexp",
                    "settings": { "foreground": t.string.light.to_string() }
                },
                {
                    "scope": ["punctuation.separator", "punctuation.terminator"],
                    "settings": { "foreground": t.punctuation.to_string() }
                },
                {
                    "scope": ["meta.brace", "punctuation.definition.block"],
                    "settings": { "foreground": t.bracket.to_string() }
                },
                {
                    "scope": "keyword.operator",
                    "settings": { "foreground": t.operator.to_string() }
                },
                {
                    "scope": ["entity.name.function.decorator", "entity.other.attribute-name"],
                    "settings": { "foreground": t.attribute.to_string() }
                },
                {
                    "scope": "entity.name.tag",
                    "settings": { "foreground": t.types.base.to_string() }
                },
                {
                    "scope": ["comment.block.documentation"],
                    "settings": { "foreground": t.comment_doc.to_string(), "fontStyle": "italic" }
                }
            ]
        })
    }

    fn patch(&self, tokens: &SemanticTokens) -> anyhow::Result<()> {
        let raw = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read {}", self.settings_path.display()))?;
        let mut settings: Map<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.settings_path.display()))?;

        settings.insert(WORKBENCH_KEY.to_string(), self.render_workbench(tokens));
        settings.insert(TOKEN_COLORS_KEY.to_string(), self.render_token_colors(tokens));

        let json = serde_json::to_string_pretty(&Value::Object(settings))
            .context("Failed to serialize settings")?;
        fs::write(&self.settings_path, json)
            .with_context(|| format!("Failed to write {}", self.settings_path.display()))?;

        info!(app = %self.app_name, path = %self.settings_path.display(), "Color customizations replaced");
        Ok(())
    }
}

/// `~/Library/Application Support/<app>/User/settings.json`
fn app_support_settings(app: &str) -> PathBuf {
    dirs::home_dir()
        .map(|h| {
            h.join("Library")
                .join("Application Support")
                .join(app)
                .join("User")
                .join("settings.json")
        })
        .unwrap_or_else(|| PathBuf::from(format!("/tmp/{}-settings.json", app)))
}

impl TargetIntegration for VscodeTarget {
    fn name(&self) -> &str {
        &self.app_name
    }

    fn precondition(&self) -> bool {
        self.settings_path.exists()
    }

    fn apply(&self, tokens: &SemanticTokens) -> Result<()> {
        self.patch(tokens)
            .map_err(|e| SyncError::write_failed(self.name(), e))
    }
}
