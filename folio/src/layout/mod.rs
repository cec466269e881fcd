// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout: measuring, line breaking, and skeleton construction.

mod data;
mod line_break;
mod paragraph;

pub use data::{
    Glyph, LayoutKey, LayoutSnapshot, LayoutStats, Line, Page, ParagraphSkeleton, ParagraphSlice,
    Word,
};
pub use line_break::break_lines;
pub use paragraph::{layout_paragraph, measure_words, ParagraphLayoutInput};
