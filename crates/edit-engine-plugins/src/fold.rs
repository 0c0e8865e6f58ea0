//! Region folding over heading-delimited sections.
//!
//! Sections are delimited by heading lines (`!`-prefixed wiki headings or
//! `#`-prefixed markdown headings); a section runs from its heading to the
//! line before the next heading of the same or a higher level. The plugin
//! tracks collapsed regions and draws a placeholder decoration per region;
//! actually hiding the lines is the host's rendering concern.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::overlay::DecorationNode;
use edit_engine::runtime::{CommandSpec, Plugin, PluginModule, VariantSupport};

/// Decoration owner tag for fold placeholders.
pub const FOLD_OWNER: &str = "fold";

/// A foldable section, in logical line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// The heading line.
    pub heading_line: usize,
    /// First body line (heading + 1).
    pub first_line: usize,
    /// Last body line, inclusive.
    pub last_line: usize,
}

fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let bangs = trimmed.chars().take_while(|c| *c == '!').count();
    if bangs > 0 {
        return Some(bangs);
    }
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes > 0 && trimmed.chars().nth(hashes) == Some(' ') {
        return Some(hashes);
    }
    None
}

/// All foldable sections of `text`, in document order.
pub fn section_regions(text: &str) -> Vec<FoldRegion> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut regions = Vec::new();

    for (line_number, line) in lines.iter().enumerate() {
        let Some(level) = heading_level(line) else {
            continue;
        };
        let mut last = lines.len() - 1;
        for (next_number, next) in lines.iter().enumerate().skip(line_number + 1) {
            if heading_level(next).is_some_and(|next_level| next_level <= level) {
                last = next_number - 1;
                break;
            }
        }
        if last > line_number {
            regions.push(FoldRegion {
                heading_line: line_number,
                first_line: line_number + 1,
                last_line: last,
            });
        }
    }

    regions
}

/// The folding plugin.
pub struct FoldPlugin {
    folded: Vec<FoldRegion>,
}

impl FoldPlugin {
    fn new() -> Self {
        Self { folded: Vec::new() }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "fold",
            description: "Fold and unfold heading-delimited sections",
            category: "view",
            default_enabled: true,
            supports: VariantSupport::FRAMED_ONLY,
            config_key: Some("config/editor/fold"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(FoldPlugin::new()))),
        }
    }

    /// The currently collapsed regions.
    pub fn folded_regions(&self) -> &[FoldRegion] {
        &self.folded
    }

    fn region_at_caret(&self, engine: &Engine) -> Option<FoldRegion> {
        let index = engine.line_index();
        let caret_line = index.line_of(engine.cursors().primary().start);
        section_regions(&engine.text())
            .into_iter()
            .filter(|region| region.heading_line <= caret_line && caret_line <= region.last_line)
            .last()
    }

    fn redraw(&self, engine: &mut Engine) {
        engine.clear_decorations(Some(FOLD_OWNER));
        let index = engine.line_index();
        for region in &self.folded {
            let start = index.line_start(region.first_line);
            let end = index.line_end(region.last_line);
            for rect in engine.geometry_range(start, end) {
                engine.add_decoration(DecorationNode {
                    owner: Some(FOLD_OWNER.to_string()),
                    rect,
                    class: "fold-placeholder".to_string(),
                    label: Some("…".to_string()),
                });
            }
        }
    }

    /// Drop folded regions the text no longer supports.
    fn revalidate(&mut self, engine: &Engine) {
        let regions = section_regions(&engine.text());
        self.folded.retain(|folded| regions.contains(folded));
    }
}

impl Plugin for FoldPlugin {
    fn name(&self) -> &str {
        "fold"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::FoldSection => {
                self.revalidate(engine);
                if let Some(region) = self.region_at_caret(engine)
                    && !self.folded.contains(&region)
                {
                    self.folded.push(region);
                    self.folded.sort_by_key(|r| r.heading_line);
                }
                self.redraw(engine);
                Ok(true)
            }
            EngineMessage::UnfoldSection => {
                self.revalidate(engine);
                if let Some(region) = self.region_at_caret(engine) {
                    self.folded.retain(|folded| *folded != region);
                }
                self.redraw(engine);
                Ok(true)
            }
            EngineMessage::FoldAll => {
                self.folded = section_regions(&engine.text());
                self.redraw(engine);
                Ok(true)
            }
            EngineMessage::UnfoldAll => {
                self.folded.clear();
                self.redraw(engine);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec {
                id: "fold.all".to_string(),
                name: "Fold All Sections".to_string(),
                category: "View".to_string(),
                shortcut: None,
                description: None,
                message: EngineMessage::FoldAll,
            },
            CommandSpec {
                id: "fold.none".to_string(),
                name: "Unfold All Sections".to_string(),
                category: "View".to_string(),
                shortcut: None,
                description: None,
                message: EngineMessage::UnfoldAll,
            },
        ]
    }

    fn disable(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        self.folded.clear();
        engine.clear_decorations(Some(FOLD_OWNER));
        Ok(())
    }

    fn destroy(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        engine.clear_decorations(Some(FOLD_OWNER));
        Ok(())
    }
}
