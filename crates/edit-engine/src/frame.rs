//! Boot model for the framed variant.
//!
//! The framed engine isolates the surface in a nested browsing context. The
//! engine does not touch a DOM; it produces a [`FrameDocument`] describing
//! the minimal document the host writes into the frame: root CSS variables,
//! the `container > gutter + main` flex layout, the pre-wrap surface, the
//! layered overlay, and the caret blink keyframes. The host reports back what
//! the write produced and the boot fallbacks kick in from there.

use serde::Serialize;

use crate::config::EngineConfig;

/// Element tags the surface must never be created as.
const UNSAFE_TAGS: [&str; 9] = [
    "script", "style", "iframe", "object", "embed", "link", "meta", "base", "form",
];

/// Fallback tag when the requested one is deny-listed.
pub const SAFE_FALLBACK_TAG: &str = "input";

/// Colors injected as root CSS variables.
#[derive(Debug, Clone, Serialize)]
pub struct FramePalette {
    /// Secondary caret color.
    pub cursor_color: String,
    /// Secondary selection color.
    pub selection_color: String,
    /// Gutter background.
    pub gutter_background: String,
    /// Gutter foreground.
    pub gutter_foreground: String,
}

impl Default for FramePalette {
    fn default() -> Self {
        Self {
            cursor_color: "#e05252".to_string(),
            selection_color: "rgba(224, 82, 82, 0.25)".to_string(),
            gutter_background: "#f4f4f4".to_string(),
            gutter_foreground: "#9a9a9a".to_string(),
        }
    }
}

/// The document the host writes into the nested browsing context.
#[derive(Debug, Clone, Serialize)]
pub struct FrameDocument {
    /// Sanitized surface tag.
    pub surface_tag: String,
    /// Stylesheet text for the frame document.
    pub css: String,
}

/// Replace deny-listed surface tags.
pub fn sanitize_tag(tag: &str) -> String {
    let lowered = tag.trim().to_ascii_lowercase();
    if lowered.is_empty() || UNSAFE_TAGS.contains(&lowered.as_str()) {
        SAFE_FALLBACK_TAG.to_string()
    } else {
        lowered
    }
}

impl FrameDocument {
    /// Build the boot document for `config` with `palette`.
    pub fn build(config: &EngineConfig, palette: &FramePalette) -> Self {
        let surface_tag = sanitize_tag(&config.tag);
        let css = format!(
            ":root {{\n\
             \x20 --engine-cursor-color: {cursor};\n\
             \x20 --engine-selection-color: {selection};\n\
             \x20 --engine-gutter-background: {gutter_bg};\n\
             \x20 --engine-gutter-foreground: {gutter_fg};\n\
             }}\n\
             .engine-container {{ display: flex; height: 100%; }}\n\
             .engine-gutter {{ background: var(--engine-gutter-background); color: var(--engine-gutter-foreground); user-select: none; }}\n\
             .engine-main {{ position: relative; flex: 1; }}\n\
             .engine-surface {{ white-space: pre-wrap; width: 100%; height: 100%; box-sizing: border-box; }}\n\
             .engine-overlay {{ position: absolute; inset: 0; pointer-events: none; }}\n\
             .engine-overlay-cursors, .engine-overlay-decorations {{ position: absolute; inset: 0; }}\n\
             .engine-secondary-caret {{ position: absolute; width: 2px; background: var(--engine-cursor-color); animation: engine-caret-blink 1s steps(1) infinite; }}\n\
             .engine-secondary-selection {{ position: absolute; background: var(--engine-selection-color); }}\n\
             @keyframes engine-caret-blink {{ 0%, 49% {{ opacity: 1; }} 50%, 100% {{ opacity: 0; }} }}\n",
            cursor = palette.cursor_color,
            selection = palette.selection_color,
            gutter_bg = palette.gutter_background,
            gutter_fg = palette.gutter_foreground,
        );

        Self { surface_tag, css }
    }
}

/// What the host's frame write actually produced, driving boot fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameWriteReport {
    /// The nested document existed after the write.
    pub document_created: bool,
    /// The main node was present after the write.
    pub main_present: bool,
}

/// Resolved fallbacks after the frame write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBoot {
    /// Use the host document instead of the nested one.
    pub use_host_document: bool,
    /// Insert a fresh main node into the container.
    pub rebuild_main: bool,
}

impl FrameBoot {
    /// Decide the fallbacks for a write report.
    pub fn resolve(report: FrameWriteReport) -> Self {
        Self {
            use_host_document: !report.document_created,
            rebuild_main: !report.main_present,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_tags_fall_back_to_input() {
        assert_eq!(sanitize_tag("script"), "input");
        assert_eq!(sanitize_tag("IFRAME"), "input");
        assert_eq!(sanitize_tag(""), "input");
        assert_eq!(sanitize_tag("textarea"), "textarea");
    }

    #[test]
    fn document_carries_palette_variables() {
        let config = EngineConfig::default();
        let doc = FrameDocument::build(&config, &FramePalette::default());
        assert!(doc.css.contains("--engine-cursor-color"));
        assert!(doc.css.contains("pre-wrap"));
        assert!(doc.css.contains("engine-caret-blink"));
        assert_eq!(doc.surface_tag, "textarea");
    }

    #[test]
    fn missing_write_results_trigger_fallbacks() {
        let boot = FrameBoot::resolve(FrameWriteReport {
            document_created: false,
            main_present: false,
        });
        assert!(boot.use_host_document);
        assert!(boot.rebuild_main);
    }
}
