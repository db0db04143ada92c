//! Semantic color tokens derived from a source palette.
//!
//! Derivation is the single place color math happens: every target
//! integration consumes [`SemanticTokens`], never raw palette entries,
//! so role semantics stay centralized. Deriving is deterministic and
//! idempotent — the same palette always yields the same token set.

use crate::color::Rgb;
use crate::palette::Palette;

/// Three-step tone ramp for one syntax role family. Gives every
/// highlighter a consistent base/light/dim spread without extra
/// hand-picked palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRamp {
    pub base: Rgb,
    pub light: Rgb,
    pub dim: Rgb,
}

impl ToneRamp {
    fn new(base: Rgb, light_amount: f32, dim_amount: f32) -> Self {
        ToneRamp {
            base,
            light: base.lighten(light_amount),
            dim: base.darken(dim_amount),
        }
    }
}

/// Terminal ANSI roles: the 16 indexed colors mapped 1:1 onto the
/// standard slots (0..7 normal, 8..15 bright) plus terminal bg/fg.
/// Dim variants reuse the base value to match limited-precision
/// terminal semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalColors {
    pub background: Rgb,
    pub foreground: Rgb,
    pub ansi: [Rgb; 16],
}

/// The full role set derived from one [`Palette`].
///
/// Total over the fixed role set: every role any target integration
/// needs is present after derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticTokens {
    // Base roles
    pub background: Rgb,
    pub foreground: Rgb,
    pub cursor: Rgb,
    /// `color1` verbatim, never transformed: the maximally saturated
    /// visual anchor.
    pub accent: Rgb,
    pub icon: Rgb,
    pub label: Rgb,
    pub muted: Rgb,

    // Surface hierarchy: strictly increasing lightness with UI
    // elevation, all derived from the one background color.
    pub surface: Rgb,
    pub elevated: Rgb,
    pub active: Rgb,
    pub selection: Rgb,

    // Syntax role families
    pub keyword: ToneRamp,
    pub string: ToneRamp,
    pub function: ToneRamp,
    pub types: ToneRamp,
    pub comment: Rgb,
    pub comment_doc: Rgb,

    // Neutral tones sitting between "muted" and "primary text"
    pub punctuation: Rgb,
    pub operator: Rgb,
    pub bracket: Rgb,
    pub variable: Rgb,
    pub variable_special: Rgb,
    pub parameter: Rgb,
    pub property: Rgb,
    pub attribute: Rgb,

    pub terminal: TerminalColors,
}

impl SemanticTokens {
    /// Expand `palette` into the full semantic role set.
    pub fn derive(palette: &Palette) -> Self {
        let bg = palette.background;
        let label = palette.color(6);
        let muted = palette.color(8);

        SemanticTokens {
            background: bg,
            foreground: palette.foreground,
            cursor: palette.cursor,
            accent: palette.color(1),
            icon: palette.color(4),
            label,
            muted,

            surface: bg.lighten(0.04),
            elevated: bg.lighten(0.08),
            active: bg.lighten(0.12),
            selection: bg.lighten(0.25),

            keyword: ToneRamp::new(palette.color(1), 0.15, 0.20),
            string: ToneRamp::new(palette.color(2), 0.20, 0.15),
            function: ToneRamp::new(palette.color(3), 0.15, 0.20),
            types: ToneRamp::new(palette.color(4), 0.15, 0.20),
            comment: muted,
            comment_doc: muted.lighten(0.15),

            punctuation: muted.blend(label, 0.3),
            operator: label.blend(palette.color(3), 0.25),
            bracket: muted.blend(label, 0.5),
            variable: label,
            variable_special: label.blend(palette.color(5), 0.3),
            parameter: label.blend(palette.color(4), 0.2),
            property: label.blend(palette.color(6), 0.4),
            attribute: palette.color(4).blend(palette.color(6), 0.4),

            terminal: TerminalColors {
                background: bg,
                foreground: palette.foreground,
                ansi: palette.colors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(s: &str) -> Rgb {
        s.parse().unwrap()
    }

    fn test_palette() -> Palette {
        Palette {
            background: rgb("#101418"),
            foreground: rgb("#e6e1d7"),
            cursor: rgb("#e6e1d7"),
            colors: [
                rgb("#101418"),
                rgb("#a54242"),
                rgb("#8c9440"),
                rgb("#de935f"),
                rgb("#5f819d"),
                rgb("#85678f"),
                rgb("#5e8d87"),
                rgb("#707880"),
                rgb("#373b41"),
                rgb("#cc6666"),
                rgb("#b5bd68"),
                rgb("#f0c674"),
                rgb("#81a2be"),
                rgb("#b294bb"),
                rgb("#8abeb7"),
                rgb("#c5c8c6"),
            ],
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let palette = test_palette();
        assert_eq!(
            SemanticTokens::derive(&palette),
            SemanticTokens::derive(&palette)
        );
    }

    #[test]
    fn test_accent_is_verbatim_color1() {
        let tokens = SemanticTokens::derive(&Palette::nothing());
        assert_eq!(tokens.accent.to_string(), "#d71921");

        let tokens = SemanticTokens::derive(&test_palette());
        assert_eq!(tokens.accent.to_string(), "#a54242");
    }

    #[test]
    fn test_surface_hierarchy_strictly_lightens() {
        let tokens = SemanticTokens::derive(&Palette::nothing());
        let bg = tokens.background;

        let per_channel_above = |a: Rgb, b: Rgb| a.r > b.r && a.g > b.g && a.b > b.b;
        assert!(per_channel_above(tokens.surface, bg));
        assert!(per_channel_above(tokens.elevated, tokens.surface));
        assert!(per_channel_above(tokens.active, tokens.elevated));
        assert!(per_channel_above(tokens.selection, tokens.active));
    }

    #[test]
    fn test_syntax_ramps_spread_around_base() {
        let tokens = SemanticTokens::derive(&test_palette());
        for ramp in [tokens.keyword, tokens.string, tokens.function, tokens.types] {
            assert!(ramp.light.r >= ramp.base.r);
            assert!(ramp.light.g >= ramp.base.g);
            assert!(ramp.light.b >= ramp.base.b);
            assert!(ramp.dim.r <= ramp.base.r);
            assert!(ramp.dim.g <= ramp.base.g);
            assert!(ramp.dim.b <= ramp.base.b);
            assert_ne!(ramp.light, ramp.dim);
        }
    }

    #[test]
    fn test_syntax_ramp_bases_are_verbatim() {
        let palette = test_palette();
        let tokens = SemanticTokens::derive(&palette);
        assert_eq!(tokens.keyword.base, palette.color(1));
        assert_eq!(tokens.string.base, palette.color(2));
        assert_eq!(tokens.function.base, palette.color(3));
        assert_eq!(tokens.types.base, palette.color(4));
    }

    #[test]
    fn test_terminal_slots_map_one_to_one() {
        let palette = test_palette();
        let tokens = SemanticTokens::derive(&palette);
        assert_eq!(tokens.terminal.background, palette.background);
        assert_eq!(tokens.terminal.foreground, palette.foreground);
        for i in 0..16 {
            assert_eq!(tokens.terminal.ansi[i], palette.color(i));
        }
    }

    #[test]
    fn test_neutrals_sit_between_their_sources() {
        let palette = test_palette();
        let tokens = SemanticTokens::derive(&palette);
        let muted = palette.color(8);
        let label = palette.color(6);

        // A blend channel never leaves the interval of its endpoints.
        let between = |x: u8, a: u8, b: u8| x >= a.min(b) && x <= a.max(b);
        assert!(between(tokens.punctuation.r, muted.r, label.r));
        assert!(between(tokens.punctuation.g, muted.g, label.g));
        assert!(between(tokens.punctuation.b, muted.b, label.b));
        assert!(between(tokens.bracket.r, muted.r, label.r));
    }
}
