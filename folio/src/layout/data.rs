// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data types produced by layout: glyphs, words, lines, skeletons, pages.

use std::sync::Arc;

use crate::style::{ParagraphStyle, TextStyle};

/// One measured character.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Glyph {
    /// The source character.
    pub ch: char,
    /// Horizontal advance, letter spacing excluded.
    pub width: f32,
    /// Byte offset of the character in the document buffer.
    pub source_offset: usize,
    /// Distance from the baseline to the top of the glyph box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyph box.
    pub descent: f32,
}

/// A measured breakable unit: content glyphs plus optional trailing
/// whitespace glyphs.
#[derive(Clone, PartialEq, Debug)]
pub struct Word {
    /// Every glyph of the word, content first, trailing whitespace after.
    pub glyphs: Vec<Glyph>,
    /// How many leading entries of `glyphs` are content (the rest are
    /// trailing whitespace).
    pub content_glyph_count: usize,
    /// Total advance including trailing whitespace and internal letter
    /// spacing.
    pub width: f32,
    /// Advance of the content glyphs plus their internal letter spacing.
    pub content_width: f32,
    /// Advance of the trailing whitespace glyphs plus their share of letter
    /// spacing.
    pub trailing_whitespace_width: f32,
    /// Whether a line break is allowed after this word.
    pub break_after: bool,
    /// Start of the word's span in the document buffer.
    pub source_start: usize,
    /// End of the word's span in the document buffer.
    pub source_end: usize,
}

impl Word {
    /// The word's full text, trailing whitespace included.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|glyph| glyph.ch).collect()
    }

    /// The word's visible content, without trailing whitespace.
    pub fn content_text(&self) -> String {
        self.glyphs[..self.content_glyph_count]
            .iter()
            .map(|glyph| glyph.ch)
            .collect()
    }

    /// The word's trailing whitespace.
    pub fn trailing_whitespace_text(&self) -> String {
        self.glyphs[self.content_glyph_count..]
            .iter()
            .map(|glyph| glyph.ch)
            .collect()
    }

    /// The advance that counts toward overflow decisions.
    pub fn visible_width(&self) -> f32 {
        self.width - self.trailing_whitespace_width
    }

    /// Whether the word has visible content that an oversized-token split
    /// could distribute across lines.
    pub fn is_splittable(&self) -> bool {
        let glyphs = if self.content_glyph_count > 0 {
            &self.glyphs[..self.content_glyph_count]
        } else {
            &self.glyphs[..]
        };
        glyphs.iter().any(|glyph| !glyph.ch.is_whitespace())
    }
}

/// One laid-out line of a paragraph.
#[derive(Clone, PartialEq, Debug)]
pub struct Line {
    /// The words on the line, in order.
    pub words: Vec<Word>,
    /// Total advance of the line's words.
    pub width: f32,
    /// `width` minus the final word's trailing whitespace.
    pub content_width: f32,
    /// Trailing whitespace advance of the final word.
    pub trailing_whitespace_width: f32,
    /// Height of the line box.
    pub height: f32,
    /// Maximum ascent across the line's glyphs.
    pub ascent: f32,
    /// Maximum descent across the line's glyphs.
    pub descent: f32,
    /// Baseline offset from the top of the line box.
    pub baseline: f32,
    /// Start of the line's span in the document buffer.
    pub source_start: usize,
    /// End of the line's span in the document buffer.
    pub source_end: usize,
}

/// Cache-validity fingerprint for a paragraph skeleton.
///
/// Two skeletons with equal keys and equal source text are
/// layout-equivalent; equality is field-wise exact, never a formatted
/// string.
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutKey {
    /// Paragraph revision at layout time.
    pub revision: u64,
    /// Container (content box) width the lines were broken against.
    pub container_width: f32,
    /// Glyph cache epoch at layout time.
    pub font_epoch: u64,
    /// Resolved paragraph style.
    pub paragraph_style: ParagraphStyle,
    /// Resolved text style.
    pub text_style: TextStyle,
}

/// The immutable layout result for one paragraph, independent of
/// pagination.
#[derive(Clone, PartialEq, Debug)]
pub struct ParagraphSkeleton {
    /// Index of the paragraph in the document.
    pub para_index: usize,
    /// Stable paragraph id.
    pub paragraph_id: String,
    /// Start of the paragraph's span in the document buffer.
    pub source_start: usize,
    /// End of the paragraph's span in the document buffer.
    pub source_end: usize,
    /// The paragraph's source text at layout time.
    pub text: String,
    /// The broken lines.
    pub lines: Vec<Line>,
    /// Sum of the line heights.
    pub content_height: f32,
    /// Spacing above the paragraph.
    pub spacing_before: f32,
    /// Spacing below the paragraph.
    pub spacing_after: f32,
    /// `spacing_before + content_height + spacing_after`.
    pub total_height: f32,
    /// The paragraph's configured line height.
    pub line_height: f32,
    /// Cache-validity key.
    pub layout_key: LayoutKey,
    /// Paragraph revision at layout time.
    pub revision: u64,
    /// Container width the skeleton was computed for.
    pub container_width: f32,
}

impl ParagraphSkeleton {
    /// Returns a copy of this skeleton with every source offset shifted to
    /// the new span, without re-measuring or re-breaking anything.
    ///
    /// Used when an edit in an earlier paragraph changed the buffer length
    /// but this paragraph's content, style, and width are unchanged.
    pub fn rebased(&self, source_start: usize, source_end: usize) -> Self {
        let delta = source_start as isize - self.source_start as isize;
        if delta == 0 && source_end == self.source_end {
            return self.clone();
        }
        let shift = |offset: usize| (offset as isize + delta) as usize;
        let mut skeleton = self.clone();
        skeleton.source_start = source_start;
        skeleton.source_end = source_end;
        for line in &mut skeleton.lines {
            line.source_start = shift(line.source_start);
            line.source_end = shift(line.source_end);
            for word in &mut line.words {
                word.source_start = shift(word.source_start);
                word.source_end = shift(word.source_end);
                for glyph in &mut word.glyphs {
                    glyph.source_offset = shift(glyph.source_offset);
                }
            }
        }
        skeleton
    }
}

/// A contiguous run of one paragraph's lines placed on one page.
#[derive(Clone, PartialEq, Debug)]
pub struct ParagraphSlice {
    /// Index of the sliced paragraph.
    pub para_index: usize,
    /// Stable id of the sliced paragraph.
    pub paragraph_id: String,
    /// First line of the slice.
    pub line_start: usize,
    /// One past the last line of the slice.
    pub line_end: usize,
    /// Offset of the slice from the top of the page's content box.
    pub top: f32,
    /// Height of the slice, any included spacing counted.
    pub height: f32,
    /// Whether this slice carries the paragraph's spacing-before.
    pub includes_spacing_before: bool,
    /// Whether this slice carries the paragraph's spacing-after.
    pub includes_spacing_after: bool,
}

/// One fixed-size page of laid-out slices.
#[derive(Clone, PartialEq, Debug)]
pub struct Page {
    /// Zero-based page index.
    pub page_index: usize,
    /// Top of the page in document coordinates (`page_index * page_height`).
    pub top: f32,
    /// Full page height.
    pub height: f32,
    /// Offset of the content box from the top of the page.
    pub content_top: f32,
    /// Height of the content box.
    pub content_height: f32,
    /// Content-box height actually consumed by slices.
    pub used_height: f32,
    /// The slices on this page, in order.
    pub slices: Vec<ParagraphSlice>,
}

/// Reuse statistics for one layout pass.
///
///// The three paragraph lists are disjoint: a paragraph is either reused
/// untouched (pure cache hit), rebased (content unchanged, offsets
/// shifted), or reflowed from scratch.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct LayoutStats {
    /// Paragraphs laid out from scratch.
    pub reflowed_paragraphs: Vec<usize>,
    /// Paragraphs reused verbatim from the cache.
    pub reused_paragraphs: Vec<usize>,
    /// Paragraphs reused after an offset rebase.
    pub rebased_paragraphs: Vec<usize>,
    /// First page index that was recomputed.
    pub repaginated_from_page: usize,
    /// Number of pages kept unchanged from the previous pass.
    pub reused_pages: usize,
}

/// A complete, read-only layout of the document.
///
/// The engine never mutates a published snapshot; skeletons and pages are
/// shared with the engine's caches through [`Arc`].
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutSnapshot {
    /// Document version the snapshot was computed from.
    pub version: u64,
    /// Glyph cache epoch the snapshot was computed under.
    pub font_epoch: u64,
    /// Every paragraph's skeleton, in document order.
    pub paragraphs: Vec<Arc<ParagraphSkeleton>>,
    /// Every page, in order.
    pub pages: Vec<Arc<Page>>,
    /// Reuse statistics for the pass that produced this snapshot.
    pub stats: LayoutStats,
}
