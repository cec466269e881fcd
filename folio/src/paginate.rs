// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy pagination of paragraph skeletons into fixed-size pages.

use std::sync::Arc;

use crate::doc::LayoutSettings;
use crate::layout::{Page, ParagraphSkeleton, ParagraphSlice};

/// Where pagination picks up when a prefix of pages is being reused.
#[derive(Copy, Clone, Default, Debug)]
pub struct PaginateOptions {
    /// Index assigned to the first emitted page.
    pub page_index_start: usize,
    /// First paragraph to place. May be past the end of the paragraph list,
    /// in which case no pages are emitted.
    pub paragraph_index_start: usize,
}

struct PageBuilder {
    page_height: f32,
    content_top: f32,
    content_height: f32,
    page_index: usize,
    used_height: f32,
    slices: Vec<ParagraphSlice>,
    pages: Vec<Page>,
}

impl PageBuilder {
    fn new(settings: &LayoutSettings, page_index_start: usize) -> Self {
        Self {
            page_height: settings.page_height,
            content_top: settings.margins.top,
            content_height: settings.content_height(),
            page_index: page_index_start,
            used_height: 0.0,
            slices: Vec::new(),
            pages: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if self.slices.is_empty() && self.used_height == 0.0 {
            return;
        }
        let slices = core::mem::take(&mut self.slices);
        self.pages.push(Page {
            page_index: self.page_index,
            top: self.page_index as f32 * self.page_height,
            height: self.page_height,
            content_top: self.content_top,
            content_height: self.content_height,
            used_height: self.used_height,
            slices,
        });
        self.page_index += 1;
        self.used_height = 0.0;
    }
}

/// Greedily fills pages with paragraph slices.
///
/// A paragraph that does not fit the remaining space is split at a line
/// boundary; the slice carrying the first line also carries the paragraph's
/// spacing-before, and the slice carrying the last line carries its
/// spacing-after. A line taller than the whole content box is force-placed
/// on an otherwise empty page and allowed to overflow it.
pub fn paginate_paragraphs(
    paragraphs: &[Arc<ParagraphSkeleton>],
    settings: &LayoutSettings,
    options: PaginateOptions,
) -> Vec<Page> {
    let mut builder = PageBuilder::new(settings, options.page_index_start);
    let content_height = builder.content_height;

    for paragraph in paragraphs.iter().skip(options.paragraph_index_start) {
        let mut line_index = 0;
        let mut slice_line_start = 0;
        let mut slice_top = builder.used_height;
        let mut slice_height = 0.0;
        let mut includes_spacing_before = false;

        while line_index < paragraph.lines.len() {
            let is_first_line = line_index == 0;
            let is_last_line = line_index == paragraph.lines.len() - 1;
            let line = &paragraph.lines[line_index];
            let leading = if is_first_line {
                paragraph.spacing_before
            } else {
                0.0
            };
            let trailing = if is_last_line {
                paragraph.spacing_after
            } else {
                0.0
            };
            let required_height = leading + line.height + trailing;

            if builder.used_height + required_height > content_height && builder.used_height > 0.0
            {
                if slice_height > 0.0 {
                    builder.slices.push(ParagraphSlice {
                        para_index: paragraph.para_index,
                        paragraph_id: paragraph.paragraph_id.clone(),
                        line_start: slice_line_start,
                        line_end: line_index,
                        top: slice_top,
                        height: slice_height,
                        includes_spacing_before,
                        includes_spacing_after: false,
                    });
                }
                builder.flush();
                slice_line_start = line_index;
                slice_top = 0.0;
                slice_height = 0.0;
                includes_spacing_before = false;
                continue;
            }

            if slice_height == 0.0 {
                slice_line_start = line_index;
                slice_top = builder.used_height;
            }

            if is_first_line {
                builder.used_height += leading;
                slice_height += leading;
                includes_spacing_before = leading > 0.0;
            }

            builder.used_height += line.height;
            slice_height += line.height;

            if is_last_line {
                builder.used_height += trailing;
                slice_height += trailing;
            }

            line_index += 1;

            if is_last_line {
                builder.slices.push(ParagraphSlice {
                    para_index: paragraph.para_index,
                    paragraph_id: paragraph.paragraph_id.clone(),
                    line_start: slice_line_start,
                    line_end: line_index,
                    top: slice_top,
                    height: slice_height,
                    includes_spacing_before,
                    includes_spacing_after: trailing > 0.0,
                });
            }
        }
    }

    builder.flush();
    builder.pages
}
