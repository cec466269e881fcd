// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The incremental layout engine: paragraph cache, page cache, and the
//! dirty-tracking pass that ties them together.

use std::sync::Arc;

use crate::doc::{Document, LayoutSettings};
use crate::error::Error;
use crate::index::{DocumentIndex, EditResult, TextEdit};
use crate::layout::{
    layout_paragraph, LayoutKey, LayoutSnapshot, LayoutStats, Page, ParagraphLayoutInput,
    ParagraphSkeleton,
};
use crate::measure::{FontMeasureCache, GlyphMeasurer};
use crate::paginate::{paginate_paragraphs, PaginateOptions};
use crate::style::{ParagraphStyleOverrides, TextStyleOverrides};

/// Sentinel meaning "nothing is dirty".
const CLEAN: usize = usize::MAX;

/// An incremental, page-aware layout engine.
///
/// The engine owns the document index and the glyph cache, and keeps the
/// previous pass's paragraph skeletons and pages. Each [`layout`] pass
/// classifies every paragraph as reused, rebased, or reflowed, and
/// repaginates only from the first page a dirty paragraph touches; clean
/// prefix pages are carried over by reference.
///
/// [`layout`]: Self::layout
#[derive(Debug)]
pub struct LayoutEngine<M> {
    document: DocumentIndex,
    settings: LayoutSettings,
    font_cache: FontMeasureCache<M>,
    paragraph_cache: Vec<Arc<ParagraphSkeleton>>,
    pages: Vec<Arc<Page>>,
    dirty_from_paragraph: usize,
    layout_pending: bool,
    last_snapshot: Option<LayoutSnapshot>,
}

impl<M: GlyphMeasurer> LayoutEngine<M> {
    /// Creates an engine over a normalized document with a default-sized
    /// glyph cache.
    pub fn new(document: Document, measurer: M) -> Self {
        Self::with_font_cache(document, FontMeasureCache::new(measurer))
    }

    /// Creates an engine over a normalized document and a caller-built
    /// glyph cache.
    pub fn with_font_cache(document: Document, font_cache: FontMeasureCache<M>) -> Self {
        let index = DocumentIndex::new(&document.blocks, document.version);
        Self {
            document: index,
            settings: document.settings,
            font_cache,
            paragraph_cache: Vec::new(),
            pages: Vec::new(),
            dirty_from_paragraph: 0,
            layout_pending: false,
            last_snapshot: None,
        }
    }

    /// The engine's document index.
    pub fn document(&self) -> &DocumentIndex {
        &self.document
    }

    /// The engine's page settings.
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// The engine's glyph cache.
    pub fn font_cache(&self) -> &FontMeasureCache<M> {
        &self.font_cache
    }

    /// Mutable access to the glyph cache, for host-driven eviction.
    ///
    /// Epoch changes are picked up on the next layout pass through the
    /// paragraph layout keys; no explicit invalidation is needed.
    pub fn font_cache_mut(&mut self) -> &mut FontMeasureCache<M> {
        &mut self.font_cache
    }

    /// The snapshot produced by the most recent layout pass, if any.
    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Applies a text edit to the document and records what it dirtied.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<EditResult, Error> {
        let result = self.document.apply_edit(edit)?;
        self.mark_dirty(result.dirty_from_paragraph);
        Ok(result)
    }

    /// Restyles one paragraph and records it as dirty.
    pub fn update_paragraph_styles(
        &mut self,
        index: usize,
        paragraph_style: Option<&ParagraphStyleOverrides>,
        text_style: Option<&TextStyleOverrides>,
    ) -> Result<(), Error> {
        self.document
            .update_paragraph_styles(index, paragraph_style, text_style)?;
        self.mark_dirty(index);
        Ok(())
    }

    /// Widens the dirty range to include `paragraph_index`.
    ///
    /// The dirty marker only ever moves toward the start of the document;
    /// layout resets it once the pass completes.
    pub fn mark_dirty(&mut self, paragraph_index: usize) {
        self.dirty_from_paragraph = self.dirty_from_paragraph.min(paragraph_index);
    }

    /// Drops every cached skeleton and page.
    ///
    /// The next layout pass reflows the whole document. Container size
    /// changes are cheaper to express through the layout key, so this is
    /// only needed when the caches themselves can no longer be trusted.
    pub fn invalidate_all(&mut self) {
        self.dirty_from_paragraph = 0;
        self.paragraph_cache.clear();
        self.pages.clear();
    }

    /// Requests a layout pass.
    ///
    /// Returns `true` if this call armed the pass and `false` if one was
    /// already pending, so any number of edits coalesce into a single
    /// [`run_scheduled_layout`] invocation.
    ///
    /// [`run_scheduled_layout`]: Self::run_scheduled_layout
    pub fn schedule_layout(&mut self) -> bool {
        if self.layout_pending {
            return false;
        }
        self.layout_pending = true;
        true
    }

    /// Runs the pending layout pass, if one was scheduled.
    pub fn run_scheduled_layout(&mut self) -> Option<LayoutSnapshot> {
        if !self.layout_pending {
            return None;
        }
        self.layout_pending = false;
        Some(self.layout())
    }

    /// Runs a full incremental layout pass and publishes a snapshot.
    pub fn layout(&mut self) -> LayoutSnapshot {
        let paragraph_count = self.document.paragraph_count();
        let content_width = self.settings.content_width();
        let font_epoch = self.font_cache.epoch();

        self.paragraph_cache.truncate(paragraph_count);

        let mut next_paragraphs: Vec<Arc<ParagraphSkeleton>> =
            Vec::with_capacity(paragraph_count);
        let mut reflowed_paragraphs = Vec::new();
        let mut reused_paragraphs = Vec::new();
        let mut rebased_paragraphs = Vec::new();

        for index in 0..paragraph_count {
            let paragraph = self.document.paragraph(index);
            let expected_key = LayoutKey {
                revision: paragraph.revision,
                container_width: content_width,
                font_epoch,
                paragraph_style: paragraph.paragraph_style.clone(),
                text_style: paragraph.text_style.clone(),
            };

            if let Some(cached) = self.paragraph_cache.get(index) {
                if index < self.dirty_from_paragraph && cached.layout_key == expected_key {
                    next_paragraphs.push(Arc::clone(cached));
                    reused_paragraphs.push(index);
                    continue;
                }
                if cached.layout_key == expected_key && cached.text == paragraph.text {
                    if cached.source_start == paragraph.start
                        && cached.source_end == paragraph.end
                    {
                        next_paragraphs.push(Arc::clone(cached));
                    } else {
                        next_paragraphs
                            .push(Arc::new(cached.rebased(paragraph.start, paragraph.end)));
                    }
                    rebased_paragraphs.push(index);
                    continue;
                }
            }

            let skeleton = layout_paragraph(
                &ParagraphLayoutInput {
                    paragraph_id: paragraph.id,
                    para_index: index,
                    text: paragraph.text,
                    source_start: paragraph.start,
                    source_end: paragraph.end,
                    paragraph_style: paragraph.paragraph_style,
                    text_style: paragraph.text_style,
                    revision: paragraph.revision,
                    container_width: content_width,
                    font_epoch,
                },
                &mut self.font_cache,
            );
            next_paragraphs.push(Arc::new(skeleton));
            reflowed_paragraphs.push(index);
        }

        let repaginated_from_page = self.find_dirty_page_start(self.dirty_from_paragraph);
        let reused_pages = repaginated_from_page;
        let repaginate_from_paragraph = if repaginated_from_page < self.pages.len() {
            self.pages[repaginated_from_page]
                .slices
                .first()
                .map_or(self.dirty_from_paragraph, |slice| slice.para_index)
        } else {
            self.dirty_from_paragraph
        };

        let mut next_pages = self.pages[..repaginated_from_page].to_vec();
        next_pages.extend(
            paginate_paragraphs(
                &next_paragraphs,
                &self.settings,
                PaginateOptions {
                    page_index_start: repaginated_from_page,
                    paragraph_index_start: repaginate_from_paragraph,
                },
            )
            .into_iter()
            .map(Arc::new),
        );

        self.paragraph_cache = next_paragraphs;
        self.pages = next_pages;
        self.dirty_from_paragraph = CLEAN;

        tracing::debug!(
            version = self.document.version(),
            font_epoch,
            reflowed = reflowed_paragraphs.len(),
            reused = reused_paragraphs.len(),
            rebased = rebased_paragraphs.len(),
            repaginated_from_page,
            "layout pass complete"
        );

        let snapshot = LayoutSnapshot {
            version: self.document.version(),
            font_epoch,
            paragraphs: self.paragraph_cache.clone(),
            pages: self.pages.clone(),
            stats: LayoutStats {
                reflowed_paragraphs,
                reused_paragraphs,
                rebased_paragraphs,
                repaginated_from_page,
                reused_pages,
            },
        };
        self.last_snapshot = Some(snapshot.clone());
        snapshot
    }

    /// Finds the first page the dirty range touches.
    ///
    /// Prefers the page whose slice range covers the first dirty paragraph;
    /// when no page covers it (the paragraph count shrank, say), falls back
    /// to the first page ending at or after it. Returns `pages.len()` when
    /// every page is clean.
    fn find_dirty_page_start(&self, dirty_from_paragraph: usize) -> usize {
        if self.pages.is_empty() || dirty_from_paragraph == 0 {
            return 0;
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            match (page.slices.first(), page.slices.last()) {
                (Some(first), Some(last)) => {
                    if first.para_index <= dirty_from_paragraph
                        && dirty_from_paragraph <= last.para_index
                    {
                        return page_index;
                    }
                }
                _ => return page_index,
            }
        }

        for (page_index, page) in self.pages.iter().enumerate() {
            if page
                .slices
                .last()
                .is_some_and(|slice| slice.para_index >= dirty_from_paragraph)
            {
                return page_index;
            }
        }

        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{DocumentInput, PageMargins, ParagraphInput};
    use crate::layout::Word;
    use crate::measure::GlyphMetrics;
    use crate::style::{ParagraphStyle, TextAlign, TextStyle};

    struct Monospace;

    impl GlyphMeasurer for Monospace {
        fn measure_glyph(&self, ch: char, _style: &TextStyle) -> GlyphMetrics {
            GlyphMetrics {
                width: match ch {
                    ' ' => 4.0,
                    '\t' => 16.0,
                    _ => 8.0,
                },
                ascent: 7.0,
                descent: 3.0,
            }
        }
    }

    fn settings() -> LayoutSettings {
        LayoutSettings {
            page_width: 160.0,
            page_height: 120.0,
            margins: PageMargins {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 10.0,
            },
            default_text_style: TextStyle {
                font_family: "Test Sans".to_owned(),
                font_size: 10.0,
                font_weight: 400,
                font_slant: Default::default(),
                letter_spacing: 0.0,
            },
            default_paragraph_style: ParagraphStyle {
                align: TextAlign::Left,
                line_height: 1.2,
                spacing_before: 4.0,
                spacing_after: 6.0,
            },
        }
    }

    fn engine_for(texts: &[&str], settings: LayoutSettings) -> LayoutEngine<Monospace> {
        let document = DocumentInput {
            id: None,
            version: None,
            settings,
            blocks: texts
                .iter()
                .map(|text| ParagraphInput {
                    text: (*text).to_owned(),
                    ..Default::default()
                })
                .collect(),
        }
        .normalize()
        .unwrap();
        LayoutEngine::with_font_cache(document, FontMeasureCache::with_capacity(Monospace, 4))
    }

    fn edit(position: usize, delete_count: usize, insert_text: &str) -> TextEdit {
        TextEdit {
            position,
            delete_count,
            insert_text: insert_text.to_owned(),
        }
    }

    #[test]
    fn local_edits_reflow_one_paragraph_and_rebase_the_rest() {
        let mut engine = engine_for(
            &["hello world", "second paragraph", "third paragraph"],
            settings(),
        );
        let first = engine.layout();
        engine.apply_edit(&edit(1, 0, "!")).unwrap();
        let second = engine.layout();

        assert_eq!(first.paragraphs.len(), 3);
        assert_eq!(second.stats.reflowed_paragraphs, [0]);
        assert_eq!(second.stats.rebased_paragraphs, [1, 2]);
        assert!(second.stats.reused_paragraphs.is_empty());
        assert_eq!(second.paragraphs[0].text, "h!ello world");
    }

    #[test]
    fn relayout_without_edits_reuses_everything() {
        let mut engine = engine_for(&["hello world", "second paragraph"], settings());
        let first = engine.layout();
        let second = engine.layout();

        assert!(second.stats.reflowed_paragraphs.is_empty());
        assert_eq!(second.stats.reused_paragraphs, [0, 1]);
        assert_eq!(second.stats.reused_pages, first.pages.len());
        assert_eq!(second.stats.repaginated_from_page, first.pages.len());
        for (before, after) in first.pages.iter().zip(&second.pages) {
            assert!(Arc::ptr_eq(before, after));
        }
    }

    #[test]
    fn page_prefixes_survive_edits_to_later_paragraphs() {
        let mut page_settings = settings();
        page_settings.page_height = 80.0;
        let mut engine = engine_for(
            &[
                "one two three four five six seven eight nine ten",
                "eleven twelve thirteen fourteen fifteen sixteen",
                "seventeen eighteen nineteen twenty twentyone twentytwo",
                "twentythree twentyfour twentyfive twentysix twentyseven",
            ],
            page_settings,
        );
        let first = engine.layout();
        let dirty_paragraph = 3;
        let expected_dirty_page = first
            .pages
            .iter()
            .position(|page| {
                page.slices
                    .iter()
                    .any(|slice| slice.para_index == dirty_paragraph)
            })
            .unwrap();
        assert!(expected_dirty_page > 0);

        let edit_position = engine.document().paragraph(dirty_paragraph).start + 1;
        engine.apply_edit(&edit(edit_position, 0, "!")).unwrap();
        let second = engine.layout();

        assert_eq!(second.stats.reflowed_paragraphs, [dirty_paragraph]);
        assert_eq!(second.stats.reused_paragraphs, [0, 1, 2]);
        assert_eq!(second.stats.repaginated_from_page, expected_dirty_page);
        assert_eq!(second.stats.reused_pages, expected_dirty_page);
        for page_index in 0..expected_dirty_page {
            assert!(Arc::ptr_eq(
                &first.pages[page_index],
                &second.pages[page_index]
            ));
        }
    }

    #[test]
    fn structural_edits_repaginate_from_the_first_dirty_page() {
        let mut page_settings = settings();
        page_settings.page_height = 70.0;
        let mut engine = engine_for(
            &[
                "one two three four five six",
                "seven eight nine ten eleven twelve",
                "thirteen fourteen fifteen sixteen",
            ],
            page_settings,
        );
        engine.layout();
        engine.apply_edit(&edit(3, 0, "\nextra")).unwrap();
        let snapshot = engine.layout();

        assert_eq!(snapshot.stats.reflowed_paragraphs, [0, 1, 2, 3]);
        assert_eq!(snapshot.stats.repaginated_from_page, 0);
        assert!(!snapshot.pages.is_empty());
        assert_eq!(snapshot.paragraphs[0].text, "one");
        assert_eq!(snapshot.paragraphs[1].text, "extra two three four five six");
    }

    #[test]
    fn an_epoch_bump_reflows_every_paragraph() {
        let mut engine = engine_for(
            &["hello world", "second paragraph", "third paragraph"],
            settings(),
        );
        engine.layout();
        engine.font_cache_mut().bump_epoch();
        let snapshot = engine.layout();

        assert_eq!(snapshot.stats.reflowed_paragraphs, [0, 1, 2]);
        assert!(snapshot.stats.reused_paragraphs.is_empty());
        assert!(snapshot.stats.rebased_paragraphs.is_empty());
    }

    #[test]
    fn invalidate_all_forces_a_full_reflow() {
        let mut engine = engine_for(&["alpha beta", "gamma delta"], settings());
        engine.layout();
        engine.invalidate_all();
        let snapshot = engine.layout();

        assert_eq!(snapshot.stats.reflowed_paragraphs, [0, 1]);
        assert!(snapshot.stats.reused_paragraphs.is_empty());
    }

    #[test]
    fn style_updates_dirty_the_restyled_paragraph() {
        let mut engine = engine_for(&["alpha beta", "gamma delta"], settings());
        engine.layout();
        engine
            .update_paragraph_styles(
                1,
                Some(&ParagraphStyleOverrides {
                    spacing_before: Some(20.0),
                    ..Default::default()
                }),
                None,
            )
            .unwrap();
        let snapshot = engine.layout();

        assert_eq!(snapshot.stats.reflowed_paragraphs, [1]);
        assert_eq!(snapshot.stats.reused_paragraphs, [0]);
        assert_eq!(snapshot.paragraphs[1].spacing_before, 20.0);
    }

    #[test]
    fn oversized_tokens_wrap_without_overflowing_lines() {
        let mut page_settings = settings();
        page_settings.page_width = 44.0;
        let content_width = page_settings.content_width();
        let mut engine = engine_for(&["encyclopedia"], page_settings);
        let snapshot = engine.layout();
        let paragraph = &snapshot.paragraphs[0];

        assert!(paragraph.lines.len() > 1);
        let joined: String = paragraph
            .lines
            .iter()
            .flat_map(|line| line.words.iter())
            .map(Word::text)
            .collect();
        assert_eq!(joined, "encyclopedia");
        assert!(paragraph
            .lines
            .iter()
            .all(|line| line.content_width <= content_width));
    }

    #[test]
    fn scheduled_layout_calls_coalesce() {
        let mut engine = engine_for(&["hello world"], settings());
        assert!(engine.schedule_layout());
        assert!(!engine.schedule_layout());
        let snapshot = engine.run_scheduled_layout();
        assert!(snapshot.is_some());
        assert!(engine.run_scheduled_layout().is_none());
        assert!(engine.snapshot().is_some());
    }
}
