// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editing session: mutations, caret tracking, and change
//! notification.

use folio::{
    DocumentInput, EditResult, Error, FontMeasureCache, GlyphMeasurer, LayoutEngine,
    LayoutSnapshot, ParagraphStyleOverrides, TextEdit, TextStyleOverrides,
};

use crate::caret::{self, VerticalMotion};

/// A host-level edit, expressed against the flat document buffer.
///
/// Inserted text may use any line-ending convention; `\r\n` and bare `\r`
/// are normalized to `\n` before the edit is applied.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Mutation {
    /// Insert `text` at byte offset `index`.
    Insert {
        /// Byte offset of the insertion point.
        index: usize,
        /// The text to insert.
        text: String,
    },
    /// Delete `count` bytes at byte offset `index`.
    Delete {
        /// Byte offset of the first deleted byte.
        index: usize,
        /// Number of bytes to delete.
        count: usize,
    },
}

/// The observable state of an [`Editor`], rebuilt after every effective
/// mutation.
#[derive(Clone, Debug)]
pub struct EditorState {
    /// Current document version.
    pub version: u64,
    /// The full document text, paragraphs joined by `\n`.
    pub text: String,
    /// Caret position as a byte offset into `text`.
    pub caret_index: usize,
    /// The current layout.
    pub snapshot: LayoutSnapshot,
}

/// The outcome of [`Editor::apply_mutation`].
#[derive(Clone, Debug)]
pub struct Transaction {
    /// The mutation that was applied.
    pub mutation: Mutation,
    /// Whether the document changed. Empty inserts and zero-count deletes
    /// are no-ops and do not notify subscribers.
    pub changed: bool,
    /// The underlying edit result, when the document changed.
    pub edit_result: Option<EditResult>,
}

/// Handle returned by [`Editor::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&EditorState)>;

/// A subscribable editing session over a [`LayoutEngine`].
///
/// The editor keeps its layout snapshot current synchronously: every
/// effective mutation runs a (cheap, incremental) layout pass before
/// subscribers are notified, so listeners always observe a consistent
/// text/layout pair.
pub struct Editor<M> {
    engine: LayoutEngine<M>,
    state: EditorState,
    listeners: Vec<(u64, Listener)>,
    next_subscription: u64,
}

impl<M> core::fmt::Debug for Editor<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Editor")
            .field("version", &self.state.version)
            .field("caret_index", &self.state.caret_index)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn clamp_caret(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl<M: GlyphMeasurer> Editor<M> {
    /// Creates an editor and computes the initial layout synchronously.
    pub fn new(document: DocumentInput, measurer: M) -> Result<Self, Error> {
        Self::with_font_cache(document, FontMeasureCache::new(measurer))
    }

    /// Creates an editor around a caller-built glyph cache.
    pub fn with_font_cache(
        document: DocumentInput,
        font_cache: FontMeasureCache<M>,
    ) -> Result<Self, Error> {
        let document = document.normalize()?;
        let mut engine = LayoutEngine::with_font_cache(document, font_cache);
        let snapshot = engine.layout();
        let state = EditorState {
            version: engine.document().version(),
            text: engine.document().text().to_owned(),
            caret_index: 0,
            snapshot,
        };
        Ok(Self {
            engine,
            state,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// The current editor state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The current document text.
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// The current caret byte offset.
    pub fn caret_index(&self) -> usize {
        self.state.caret_index
    }

    /// The current layout snapshot.
    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.state.snapshot
    }

    /// The current document version.
    pub fn version(&self) -> u64 {
        self.state.version
    }

    /// The document index, with current paragraph ids, spans, and styles.
    pub fn document(&self) -> &folio::DocumentIndex {
        self.engine.document()
    }

    /// The underlying layout engine.
    pub fn engine(&self) -> &LayoutEngine<M> {
        &self.engine
    }

    /// Mutable access to the glyph cache, for host-driven eviction.
    ///
    /// Follow cache changes with [`recompute_layout`] so the published
    /// snapshot picks up the new epoch.
    ///
    /// [`recompute_layout`]: Self::recompute_layout
    pub fn font_cache_mut(&mut self) -> &mut FontMeasureCache<M> {
        self.engine.font_cache_mut()
    }

    /// Registers a listener called once per effective change.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorState) + 'static) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    /// Moves the caret, clamping to the text and snapping down to a char
    /// boundary. Notifies subscribers only when the caret actually moved.
    pub fn set_caret_index(&mut self, index: usize) -> &EditorState {
        let next = clamp_caret(&self.state.text, index);
        if next == self.state.caret_index {
            return &self.state;
        }
        self.state.caret_index = next;
        self.notify();
        &self.state
    }

    /// Moves the caret one line up or down, keeping its horizontal
    /// position.
    pub fn move_caret_vertically(&mut self, motion: VerticalMotion, page_gap: f32) -> &EditorState {
        let next = caret::vertical_caret_index(
            &self.state.snapshot,
            self.engine.settings(),
            page_gap,
            self.state.caret_index,
            motion,
            None,
        );
        self.set_caret_index(next)
    }

    /// Applies a mutation, relayouts, and notifies subscribers.
    ///
    /// No-op mutations (empty insert, zero-count delete) return a
    /// `changed: false` transaction without touching the document or
    /// notifying anyone. Invalid mutations (out-of-bounds positions,
    /// offsets off a char boundary) fail without side effects.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<Transaction, Error> {
        let edit = match &mutation {
            Mutation::Insert { index, text } => {
                let insert_text = normalize_line_endings(text);
                if insert_text.is_empty() {
                    None
                } else {
                    Some(TextEdit {
                        position: *index,
                        delete_count: 0,
                        insert_text,
                    })
                }
            }
            Mutation::Delete { index, count } => {
                if *count == 0 {
                    None
                } else {
                    Some(TextEdit {
                        position: *index,
                        delete_count: *count,
                        insert_text: String::new(),
                    })
                }
            }
        };
        let Some(edit) = edit else {
            return Ok(Transaction {
                mutation,
                changed: false,
                edit_result: None,
            });
        };

        let edit_result = self.engine.apply_edit(&edit)?;
        tracing::debug!(
            position = edit.position,
            deleted = edit.delete_count,
            inserted = edit.insert_text.len(),
            kind = ?edit_result.kind,
            version = edit_result.version,
            "mutation applied"
        );

        let next_caret = match &mutation {
            Mutation::Insert { index, .. } => index + edit.insert_text.len(),
            Mutation::Delete { index, .. } => *index,
        };
        let snapshot = self.engine.layout();
        self.rebuild_state(snapshot, next_caret);
        self.notify();

        Ok(Transaction {
            mutation,
            changed: true,
            edit_result: Some(edit_result),
        })
    }

    /// Restyles one paragraph, relayouts, and notifies subscribers.
    pub fn update_paragraph_styles(
        &mut self,
        index: usize,
        paragraph_style: Option<&ParagraphStyleOverrides>,
        text_style: Option<&TextStyleOverrides>,
    ) -> Result<&EditorState, Error> {
        self.engine
            .update_paragraph_styles(index, paragraph_style, text_style)?;
        let snapshot = self.engine.layout();
        let caret = self.state.caret_index;
        self.rebuild_state(snapshot, caret);
        self.notify();
        Ok(&self.state)
    }

    /// Re-runs layout without a document change and notifies subscribers.
    ///
    /// Use this after mutating the glyph cache, when the epoch moved
    /// without an edit.
    pub fn recompute_layout(&mut self) -> &EditorState {
        let snapshot = self.engine.layout();
        let caret = self.state.caret_index;
        self.rebuild_state(snapshot, caret);
        self.notify();
        &self.state
    }

    fn rebuild_state(&mut self, snapshot: LayoutSnapshot, caret_index: usize) {
        let text = self.engine.document().text().to_owned();
        self.state = EditorState {
            version: self.engine.document().version(),
            caret_index: clamp_caret(&text, caret_index),
            text,
            snapshot,
        };
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}
