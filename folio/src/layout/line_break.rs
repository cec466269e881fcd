// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking, including oversized-token splitting.

use crate::layout::data::{Glyph, Line, Word};

/// Recovers the letter spacing a word was measured with from its widths.
///
/// Continuation fragments are synthesized long after measurement, so the
/// spacing is derived rather than threaded through.
fn derived_letter_spacing(word: &Word) -> f32 {
    if word.glyphs.len() <= 1 {
        return 0.0;
    }
    let glyph_width: f32 = word.glyphs.iter().map(|glyph| glyph.width).sum();
    (word.width - glyph_width) / (word.glyphs.len() - 1) as f32
}

fn glyph_slice_width(glyphs: &[Glyph], letter_spacing: f32) -> f32 {
    let width: f32 = glyphs.iter().map(|glyph| glyph.width).sum();
    width + glyphs.len().saturating_sub(1) as f32 * letter_spacing
}

/// Builds a fragment of `word` from a sub-range of its content glyphs.
///
/// Fragments must preserve the original source offsets exactly; only the
/// final fragment is allowed to retain the original trailing whitespace and
/// break-after flag.
fn word_from_glyph_slice(
    word: &Word,
    content_start: usize,
    content_end: usize,
    include_trailing_whitespace: bool,
) -> Word {
    let letter_spacing = derived_letter_spacing(word);
    let content_glyphs = &word.glyphs[content_start..content_end];
    let trailing_glyphs: &[Glyph] = if include_trailing_whitespace {
        &word.glyphs[word.content_glyph_count..]
    } else {
        &[]
    };
    let content_width = glyph_slice_width(content_glyphs, letter_spacing);
    let trailing_width: f32 = trailing_glyphs.iter().map(|glyph| glyph.width).sum::<f32>()
        + trailing_glyphs.len() as f32 * letter_spacing;
    let mut glyphs = Vec::with_capacity(content_glyphs.len() + trailing_glyphs.len());
    glyphs.extend_from_slice(content_glyphs);
    glyphs.extend_from_slice(trailing_glyphs);
    let source_start = glyphs
        .first()
        .map_or(word.source_start, |glyph| glyph.source_offset);
    let source_end = glyphs
        .last()
        .map_or(source_start, |glyph| glyph.source_offset + glyph.ch.len_utf8());
    Word {
        content_glyph_count: content_glyphs.len(),
        width: content_width + trailing_width,
        content_width,
        trailing_whitespace_width: trailing_width,
        break_after: if include_trailing_whitespace {
            word.break_after
        } else {
            false
        },
        source_start,
        source_end,
        glyphs,
    }
}

/// Finds the largest prefix of content glyphs whose cumulative width
/// (letter spacing included) fits `max_visible_width`.
///
/// Never returns zero: when even the first glyph is too wide, one glyph is
/// forced through so splitting always makes progress.
fn largest_fitting_content_glyph_count(word: &Word, max_visible_width: f32) -> usize {
    let content_glyph_count = word.content_glyph_count;
    if content_glyph_count <= 1 {
        return content_glyph_count;
    }
    let letter_spacing = derived_letter_spacing(word);
    let mut width = 0.0;
    let mut best = 0;
    for (index, glyph) in word.glyphs[..content_glyph_count].iter().enumerate() {
        if index > 0 {
            width += letter_spacing;
        }
        width += glyph.width;
        if width <= max_visible_width {
            best = index + 1;
        } else {
            break;
        }
    }
    best.max(1)
}

/// Splits an oversized word into a head fragment that fits
/// `available_width` and a tail carrying the rest.
///
/// Returns the word unchanged when it already fits or cannot be split
/// further (a single content glyph is allowed to overflow its line).
fn split_oversized_word(word: Word, available_width: f32, max_width: f32) -> (Word, Option<Word>) {
    let resolved_available = if available_width > 0.0 {
        available_width
    } else {
        max_width
    };
    if word.visible_width() <= resolved_available || word.content_glyph_count <= 1 {
        return (word, None);
    }
    let fitting = largest_fitting_content_glyph_count(&word, resolved_available);
    if fitting >= word.content_glyph_count {
        return (word, None);
    }
    let head = word_from_glyph_slice(&word, 0, fitting, false);
    let tail = word_from_glyph_slice(&word, fitting, word.content_glyph_count, true);
    (head, Some(tail))
}

#[derive(Default)]
struct LineBuilder {
    words: Vec<Word>,
    width: f32,
}

impl LineBuilder {
    fn push(&mut self, word: Word) {
        self.width += word.width;
        self.words.push(word);
    }

    fn flush(&mut self, lines: &mut Vec<Line>, line_height: f32) {
        let words = core::mem::take(&mut self.words);
        let width = core::mem::take(&mut self.width);
        let trailing_whitespace_width = words
            .last()
            .map_or(0.0, |word| word.trailing_whitespace_width);
        let glyphs = words.iter().flat_map(|word| word.glyphs.iter());
        let ascent = glyphs
            .clone()
            .map(|glyph| glyph.ascent)
            .fold(0.0_f32, f32::max);
        let descent = glyphs.map(|glyph| glyph.descent).fold(0.0_f32, f32::max);
        let content_metrics_height = ascent + descent;
        let height = line_height.max(content_metrics_height);
        let baseline = (height - content_metrics_height) / 2.0 + ascent;
        let source_start = words.first().map_or(0, |word| word.source_start);
        let source_end = words.last().map_or(source_start, |word| word.source_end);
        lines.push(Line {
            width,
            content_width: width - trailing_whitespace_width,
            trailing_whitespace_width,
            height,
            ascent,
            descent,
            baseline,
            source_start,
            source_end,
            words,
        });
    }
}

/// Greedy first-fit line breaking.
///
/// Overflow decisions use *visible* width: a word's trailing whitespace may
/// hang past `max_width` without forcing a break. A word too wide for an
/// empty line is split glyph-wise when it has visible content; otherwise it
/// is placed as-is and the line simply overflows.
///
/// An empty word list still yields exactly one zero-content line so empty
/// paragraphs keep a line box for caret placement.
pub fn break_lines(words: Vec<Word>, max_width: f32, line_height: f32) -> Vec<Line> {
    if words.is_empty() {
        return vec![Line {
            words: Vec::new(),
            width: 0.0,
            content_width: 0.0,
            trailing_whitespace_width: 0.0,
            height: line_height,
            ascent: 0.0,
            descent: 0.0,
            baseline: line_height / 2.0,
            source_start: 0,
            source_end: 0,
        }];
    }

    let mut lines = Vec::new();
    let mut current = LineBuilder::default();

    for mut word in words {
        loop {
            let candidate_visible = current.width + word.visible_width();
            if !current.words.is_empty() && candidate_visible > max_width {
                current.flush(&mut lines, line_height);
                continue;
            }

            if current.words.is_empty()
                && word.visible_width() > max_width
                && word.is_splittable()
            {
                let (head, tail) = split_oversized_word(word, max_width, max_width);
                current.push(head);
                current.flush(&mut lines, line_height);
                if let Some(tail) = tail {
                    word = tail;
                    continue;
                }
            } else {
                current.push(word);
            }
            break;
        }
    }

    if !current.words.is_empty() {
        current.flush(&mut lines, line_height);
    }

    lines
}
