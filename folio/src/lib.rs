// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental, page-aware plain text layout.
//!
//! Folio lays a multi-paragraph document out into fixed-size pages and keeps
//! that layout cheap to maintain under edits. The document lives in a flat
//! text buffer with a newline-offset paragraph index; each paragraph is
//! measured, broken into lines, and cached as an immutable skeleton; pages
//! are filled greedily with paragraph slices. An edit dirties the smallest
//! paragraph range it can, and the next layout pass reuses, rebases, or
//! reflows each paragraph and repaginates only from the first dirty page.
//!
//! Glyph metrics come from a host-supplied [`GlyphMeasurer`] and are
//! memoized per font in a [`FontMeasureCache`], whose epoch feeds the
//! paragraph layout keys so wholesale metric invalidation forces relayout.
//!
//! The entry point is [`LayoutEngine`]: build a [`DocumentInput`], normalize
//! it, and drive edits and layout passes through the engine.

pub mod doc;
pub mod error;
pub mod index;
pub mod layout;
pub mod measure;
pub mod paginate;
pub mod style;
pub mod tokenize;

mod engine;

pub use doc::{Document, DocumentInput, LayoutSettings, PageMargins, ParagraphBlock, ParagraphInput};
pub use engine::LayoutEngine;
pub use error::Error;
pub use index::{DocumentIndex, EditKind, EditResult, TextEdit};
pub use layout::{LayoutSnapshot, LayoutStats, Line, Page, ParagraphSkeleton, ParagraphSlice, Word};
pub use measure::{FontMeasureCache, GlyphMeasurer, GlyphMetrics};
pub use style::{
    FontSlant, ParagraphStyle, ParagraphStyleOverrides, TextAlign, TextStyle, TextStyleOverrides,
};
