//! Structural selection: expand word → line → section → document, with a
//! shrink stack to walk back.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};
use edit_engine::text::{byte_of_char, char_len, char_of_byte, line_end_at, line_start_at};
use unicode_segmentation::UnicodeSegmentation;

use crate::fold::section_regions;

fn word_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let start_byte = byte_of_char(text, start);
    let end_byte = byte_of_char(text, end);
    let mut result: Option<(usize, usize)> = None;
    for (word_start, word) in text.split_word_bound_indices() {
        let word_end = word_start + word.len();
        if word_start <= start_byte && end_byte <= word_end {
            result = Some((char_of_byte(text, word_start), char_of_byte(text, word_end)));
            break;
        }
    }
    result.filter(|&(s, e)| (s, e) != (start, end))
}

fn line_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let range = (line_start_at(text, start), line_end_at(text, end));
    (range != (start, end)).then_some(range)
}

fn section_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let lines_start: Vec<usize> = {
        let mut starts = vec![0usize];
        for (index, ch) in text.chars().enumerate() {
            if ch == '\n' {
                starts.push(index + 1);
            }
        }
        starts
    };

    let mut best: Option<(usize, usize)> = None;
    for region in section_regions(text) {
        let region_start = lines_start[region.heading_line];
        let region_end = lines_start
            .get(region.last_line + 1)
            .map(|next| next.saturating_sub(1))
            .unwrap_or_else(|| char_len(text));
        if region_start <= start && end <= region_end && (region_start, region_end) != (start, end)
        {
            // Innermost enclosing section wins.
            best = match best {
                Some((bs, be)) if (region_end - region_start) >= (be - bs) => best,
                _ => Some((region_start, region_end)),
            };
        }
    }
    best
}

/// The structural-selection plugin.
pub struct StructurePlugin {
    shrink_stack: Vec<(usize, usize)>,
}

impl StructurePlugin {
    fn new() -> Self {
        Self {
            shrink_stack: Vec::new(),
        }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "structure",
            description: "Structural selection expand/shrink",
            category: "editing",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/structure"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(StructurePlugin::new()))),
        }
    }

    fn expand(&mut self, engine: &mut Engine) {
        let text = engine.text();
        let primary = engine.cursors().primary();
        let (start, end) = (primary.start, primary.end);

        let next = word_range(&text, start, end)
            .or_else(|| line_range(&text, start, end))
            .or_else(|| section_range(&text, start, end))
            .or_else(|| {
                let whole = (0, char_len(&text));
                (whole != (start, end)).then_some(whole)
            });

        if let Some((new_start, new_end)) = next {
            self.shrink_stack.push((start, end));
            engine.set_primary_selection(new_start, new_end);
        }
    }

    fn shrink(&mut self, engine: &mut Engine) {
        if let Some((start, end)) = self.shrink_stack.pop() {
            engine.set_primary_selection(start, end);
        }
    }
}

impl Plugin for StructurePlugin {
    fn name(&self) -> &str {
        "structure"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::ExpandSelection => {
                self.expand(engine);
                Ok(true)
            }
            EngineMessage::ShrinkSelection => {
                self.shrink(engine);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
