// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measuring tokens into words and composing paragraph skeletons.

use crate::layout::data::{Glyph, LayoutKey, Line, ParagraphSkeleton, Word};
use crate::layout::line_break::break_lines;
use crate::measure::{FontMeasureCache, GlyphMeasurer};
use crate::style::{ParagraphStyle, TextStyle};
use crate::tokenize::tokenize;

/// Tabs advance by this many measured space widths.
const TAB_SPACE_FACTOR: f32 = 4.0;

/// Everything needed to lay out one paragraph.
#[derive(Debug)]
pub struct ParagraphLayoutInput<'a> {
    /// Stable paragraph id.
    pub paragraph_id: &'a str,
    /// Index of the paragraph in the document.
    pub para_index: usize,
    /// The paragraph's text, no separators.
    pub text: &'a str,
    /// Start of the paragraph's span in the document buffer.
    pub source_start: usize,
    /// End of the paragraph's span in the document buffer.
    pub source_end: usize,
    /// Resolved paragraph style.
    pub paragraph_style: &'a ParagraphStyle,
    /// Resolved text style.
    pub text_style: &'a TextStyle,
    /// Paragraph revision.
    pub revision: u64,
    /// Width of the container the lines must fit.
    pub container_width: f32,
    /// Glyph cache epoch.
    pub font_epoch: u64,
}

/// Tokenizes `text` and measures every token into a [`Word`].
///
/// Each character is measured through the glyph cache; tabs are measured as
/// a space glyph but reported at a fixed tab width. Content width and
/// trailing-whitespace width are kept separate so a line's trailing space
/// never counts toward overflow decisions.
pub fn measure_words<M: GlyphMeasurer>(
    text: &str,
    source_start: usize,
    text_style: &TextStyle,
    font_cache: &mut FontMeasureCache<M>,
) -> Vec<Word> {
    let tab_width = font_cache.measure_glyph(' ', text_style).width * TAB_SPACE_FACTOR;
    let letter_spacing = text_style.letter_spacing;

    tokenize(text, source_start)
        .into_iter()
        .map(|seed| {
            let slice = &text[seed.source_start - source_start..seed.source_end - source_start];
            let mut glyphs = Vec::new();
            let mut content_glyph_count = 0;
            for (offset, ch) in slice.char_indices() {
                let source_offset = seed.source_start + offset;
                let metrics = font_cache.measure_glyph(if ch == '\t' { ' ' } else { ch }, text_style);
                let width = if ch == '\t' { tab_width } else { metrics.width };
                if source_offset < seed.content_end {
                    content_glyph_count += 1;
                }
                glyphs.push(Glyph {
                    ch,
                    width,
                    source_offset,
                    ascent: metrics.ascent,
                    descent: metrics.descent,
                });
            }

            let content_width_raw: f32 = glyphs[..content_glyph_count]
                .iter()
                .map(|glyph| glyph.width)
                .sum();
            let trailing_width_raw: f32 = glyphs[content_glyph_count..]
                .iter()
                .map(|glyph| glyph.width)
                .sum();
            let internal_spacing = glyphs.len().saturating_sub(1) as f32 * letter_spacing;
            let content_spacing = content_glyph_count.saturating_sub(1) as f32 * letter_spacing;
            let trailing_spacing = internal_spacing - content_spacing;

            Word {
                content_glyph_count,
                width: content_width_raw + trailing_width_raw + internal_spacing,
                content_width: content_width_raw + content_spacing,
                trailing_whitespace_width: trailing_width_raw + trailing_spacing.max(0.0),
                break_after: seed.break_after,
                source_start: seed.source_start,
                source_end: seed.source_end,
                glyphs,
            }
        })
        .collect()
}

/// Lays out one paragraph into an immutable [`ParagraphSkeleton`].
pub fn layout_paragraph<M: GlyphMeasurer>(
    input: &ParagraphLayoutInput<'_>,
    font_cache: &mut FontMeasureCache<M>,
) -> ParagraphSkeleton {
    let words = measure_words(input.text, input.source_start, input.text_style, font_cache);
    let base = font_cache.measure_glyph('M', input.text_style);
    let line_height = (base.ascent + base.descent)
        .max(input.text_style.font_size * input.paragraph_style.line_height);
    let lines = break_lines(words, input.container_width, line_height);
    let content_height: f32 = lines.iter().map(|line: &Line| line.height).sum();
    let spacing_before = input.paragraph_style.spacing_before;
    let spacing_after = input.paragraph_style.spacing_after;

    ParagraphSkeleton {
        para_index: input.para_index,
        paragraph_id: input.paragraph_id.to_owned(),
        source_start: input.source_start,
        source_end: input.source_end,
        text: input.text.to_owned(),
        lines,
        content_height,
        spacing_before,
        spacing_after,
        total_height: spacing_before + content_height + spacing_after,
        line_height,
        layout_key: LayoutKey {
            revision: input.revision,
            container_width: input.container_width,
            font_epoch: input.font_epoch,
            paragraph_style: input.paragraph_style.clone(),
            text_style: input.text_style.clone(),
        },
        revision: input.revision,
        container_width: input.container_width,
    }
}
