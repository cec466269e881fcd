// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret geometry: mapping between document byte offsets and on-screen
//! positions.
//!
//! All of this is pure computation over a [`LayoutSnapshot`]; nothing here
//! touches the engine. Horizontal positions are relative to the page
//! content box, vertical positions are in stacked-document coordinates
//! where pages follow each other separated by `page_gap`.

use folio::{
    LayoutSettings, LayoutSnapshot, Line, ParagraphSkeleton, ParagraphStyle, TextAlign,
};

/// Where to draw the caret for a document offset.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CaretPlacement {
    /// The (clamped) byte offset the placement was resolved for.
    pub index: usize,
    /// Page the caret lands on.
    pub page_index: usize,
    /// Horizontal position within the page content box.
    pub x: f32,
    /// Vertical position in stacked-document coordinates.
    pub y: f32,
    /// Caret height (the line box height).
    pub height: f32,
}

/// Direction of a line-wise caret move.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VerticalMotion {
    /// Toward the previous line.
    Up,
    /// Toward the next line.
    Down,
}

/// One line of one slice, flattened into page coordinates.
struct LineBox<'a> {
    page_index: usize,
    paragraph: &'a ParagraphSkeleton,
    line: &'a Line,
    top: f32,
    height: f32,
    start_index: usize,
    end_index: usize,
}

/// Top of a page in stacked-document coordinates.
pub fn page_top(page_index: usize, settings: &LayoutSettings, page_gap: f32) -> f32 {
    page_index as f32 * (settings.page_height + page_gap)
}

/// Empty lines carry no source span of their own; the caret sits at the
/// paragraph start.
fn line_start_index(line: &Line, paragraph: &ParagraphSkeleton) -> usize {
    if line.words.is_empty() {
        paragraph.source_start
    } else {
        line.source_start
    }
}

fn line_end_index(line: &Line, paragraph: &ParagraphSkeleton) -> usize {
    if line.words.is_empty() {
        paragraph.source_start
    } else {
        line.source_end
    }
}

fn alignment_offset(line: &Line, style: &ParagraphStyle, content_width: f32) -> f32 {
    match style.align {
        TextAlign::Right => (content_width - line.content_width).max(0.0),
        TextAlign::Center => ((content_width - line.content_width) / 2.0).max(0.0),
        TextAlign::Left => 0.0,
    }
}

fn line_end_x(line: &Line, letter_spacing: f32) -> f32 {
    let mut x = 0.0;
    for word in &line.words {
        for (glyph_index, glyph) in word.glyphs.iter().enumerate() {
            x += glyph.width;
            if glyph_index < word.glyphs.len() - 1 {
                x += letter_spacing;
            }
        }
    }
    x
}

fn caret_x_for_index(
    line: &Line,
    paragraph: &ParagraphSkeleton,
    letter_spacing: f32,
    index: usize,
) -> f32 {
    let line_start = line_start_index(line, paragraph);
    if index <= line_start || line.words.is_empty() {
        return 0.0;
    }

    let mut x = 0.0;
    for word in &line.words {
        for (glyph_index, glyph) in word.glyphs.iter().enumerate() {
            if index <= glyph.source_offset {
                return x;
            }
            x += glyph.width;
            if index == glyph.source_offset + glyph.ch.len_utf8() {
                return x;
            }
            if glyph_index < word.glyphs.len() - 1 {
                x += letter_spacing;
            }
        }
    }
    x
}

/// Finds the glyph boundary on `line` closest to the horizontal position
/// `x`.
fn nearest_index_on_line(
    line: &Line,
    paragraph: &ParagraphSkeleton,
    letter_spacing: f32,
    x: f32,
) -> usize {
    let line_start = line_start_index(line, paragraph);
    let line_end = line_end_index(line, paragraph);
    if x <= 0.0 || line.words.is_empty() {
        return line_start;
    }
    if x >= line_end_x(line, letter_spacing) {
        return line_end;
    }

    let mut best_index = line_start;
    let mut best_distance = x.abs();
    let mut current_x = 0.0;
    for word in &line.words {
        for (glyph_index, glyph) in word.glyphs.iter().enumerate() {
            current_x += glyph.width;
            let boundary_index = glyph.source_offset + glyph.ch.len_utf8();
            let distance = (x - current_x).abs();
            if distance < best_distance {
                best_distance = distance;
                best_index = boundary_index;
            }
            if glyph_index < word.glyphs.len() - 1 {
                current_x += letter_spacing;
            }
        }
    }
    best_index
}

/// Flattens every page's slices into per-line boxes in page coordinates.
fn build_line_boxes(snapshot: &LayoutSnapshot) -> Vec<LineBox<'_>> {
    let mut boxes = Vec::new();
    for page in &snapshot.pages {
        for slice in &page.slices {
            let paragraph = &snapshot.paragraphs[slice.para_index];
            let mut top = slice.top
                + if slice.includes_spacing_before {
                    paragraph.spacing_before
                } else {
                    0.0
                };
            for line in &paragraph.lines[slice.line_start..slice.line_end] {
                boxes.push(LineBox {
                    page_index: page.page_index,
                    paragraph,
                    line,
                    top,
                    height: line.height,
                    start_index: line_start_index(line, paragraph),
                    end_index: line_end_index(line, paragraph),
                });
                top += line.height;
            }
        }
    }
    boxes
}

/// Resolves where the caret for byte offset `index` should be drawn.
///
/// The offset is clamped to the document; returns `None` only when the
/// snapshot has no lines at all.
pub fn caret_placement(
    snapshot: &LayoutSnapshot,
    settings: &LayoutSettings,
    page_gap: f32,
    index: usize,
) -> Option<CaretPlacement> {
    let boxes = build_line_boxes(snapshot);
    let (first, last) = match (boxes.first(), boxes.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };

    let max_index = snapshot
        .paragraphs
        .last()
        .map_or(0, |paragraph| paragraph.source_end);
    let clamped = index.min(max_index);

    let target = boxes
        .iter()
        .find(|line_box| clamped >= line_box.start_index && clamped <= line_box.end_index)
        .unwrap_or(if clamped <= first.start_index { first } else { last });

    let content_width = settings.content_width();
    let paragraph_style = &target.paragraph.layout_key.paragraph_style;
    let letter_spacing = target.paragraph.layout_key.text_style.letter_spacing;
    let align_offset = alignment_offset(target.line, paragraph_style, content_width);

    Some(CaretPlacement {
        index: clamped,
        page_index: target.page_index,
        x: align_offset + caret_x_for_index(target.line, target.paragraph, letter_spacing, clamped),
        y: page_top(target.page_index, settings, page_gap) + settings.margins.top + target.top,
        height: target.height,
    })
}

/// Maps a point in page-local coordinates (relative to the page's top-left
/// corner) to the nearest insertion offset on that page.
pub fn offset_at_page_point(
    snapshot: &LayoutSnapshot,
    settings: &LayoutSettings,
    page_index: usize,
    local_x: f32,
    local_y: f32,
) -> usize {
    if page_index >= snapshot.pages.len() {
        return 0;
    }

    let content_width = settings.content_width();
    let content_height = settings.content_height();
    let content_x = (local_x - settings.margins.left).clamp(0.0, content_width);
    let content_y = (local_y - settings.margins.top).clamp(0.0, content_height);

    let boxes: Vec<LineBox<'_>> = build_line_boxes(snapshot)
        .into_iter()
        .filter(|line_box| line_box.page_index == page_index)
        .collect();
    let Some(first) = boxes.first() else {
        return 0;
    };

    let mut target = first;
    if content_y > first.top {
        let last = &boxes[boxes.len() - 1];
        if content_y >= last.top + last.height {
            target = last;
        } else {
            for (index, current) in boxes.iter().enumerate() {
                let current_bottom = current.top + current.height;
                if content_y >= current.top && content_y <= current_bottom {
                    target = current;
                    break;
                }
                if let Some(next) = boxes.get(index + 1) {
                    if content_y > current_bottom && content_y < next.top {
                        target = if content_y - current_bottom <= next.top - content_y {
                            current
                        } else {
                            next
                        };
                        break;
                    }
                }
            }
        }
    }

    let paragraph_style = &target.paragraph.layout_key.paragraph_style;
    let letter_spacing = target.paragraph.layout_key.text_style.letter_spacing;
    let align_offset = alignment_offset(target.line, paragraph_style, content_width);

    nearest_index_on_line(
        target.line,
        target.paragraph,
        letter_spacing,
        content_x - align_offset,
    )
}

/// Maps a point in stacked-document coordinates to the nearest insertion
/// offset, picking the page from the vertical position.
pub fn offset_at_document_point(
    snapshot: &LayoutSnapshot,
    settings: &LayoutSettings,
    page_gap: f32,
    local_x: f32,
    document_y: f32,
) -> usize {
    if snapshot.pages.is_empty() {
        return 0;
    }

    let page_span = settings.page_height + page_gap;
    let max_y = page_top(snapshot.pages.len() - 1, settings, page_gap) + settings.page_height;
    let clamped_y = document_y.clamp(0.0, max_y);
    let page_index =
        ((clamped_y / page_span).floor() as usize).min(snapshot.pages.len() - 1);

    offset_at_page_point(
        snapshot,
        settings,
        page_index,
        local_x,
        clamped_y - page_top(page_index, settings, page_gap),
    )
}

/// Moves a caret offset one line up or down, keeping its horizontal
/// position (or an explicit `desired_x`, for repeated vertical motion).
pub fn vertical_caret_index(
    snapshot: &LayoutSnapshot,
    settings: &LayoutSettings,
    page_gap: f32,
    index: usize,
    motion: VerticalMotion,
    desired_x: Option<f32>,
) -> usize {
    let Some(placement) = caret_placement(snapshot, settings, page_gap, index) else {
        return index;
    };

    let document_y = match motion {
        VerticalMotion::Up => placement.y - 1.0,
        VerticalMotion::Down => placement.y + placement.height + 1.0,
    };

    offset_at_document_point(
        snapshot,
        settings,
        page_gap,
        settings.margins.left + desired_x.unwrap_or(placement.x),
        document_y,
    )
}
