// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An editable paragraph index over a flat text buffer.
//!
//! The document is stored as one `String` with paragraphs separated by
//! `\n`. Paragraph boundaries are tracked as a sorted list of newline byte
//! offsets, so mapping a position to its paragraph is a binary search and an
//! edit only rewrites the offsets at or after its position.

use crate::doc::ParagraphBlock;
use crate::error::Error;
use crate::style::{
    ParagraphStyle, ParagraphStyleOverrides, TextStyle, TextStyleOverrides,
};

/// A single text edit: delete `delete_count` bytes at `position`, then
/// insert `insert_text` there.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TextEdit {
    /// Byte offset of the edit. Must lie on a char boundary.
    pub position: usize,
    /// Number of bytes to delete. The deleted range must end on a char
    /// boundary.
    pub delete_count: usize,
    /// Text to insert at `position`.
    pub insert_text: String,
}

/// Whether an edit crossed a paragraph boundary.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EditKind {
    /// The edit stayed inside one paragraph.
    Local,
    /// The edit inserted or deleted paragraph breaks.
    Structural,
}

/// What an applied edit changed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EditResult {
    /// Local or structural.
    pub kind: EditKind,
    /// First paragraph whose layout can no longer be trusted.
    pub dirty_from_paragraph: usize,
    /// The paragraph the edit landed in.
    pub affected_paragraph: usize,
    /// Document version after the edit.
    pub version: u64,
    /// Signed change in buffer length, in bytes.
    pub delta: isize,
}

/// Per-paragraph state that survives across edits.
#[derive(Clone, Debug)]
struct ParagraphState {
    id: String,
    paragraph_style: ParagraphStyle,
    text_style: TextStyle,
    revision: u64,
}

/// A borrowed view of one paragraph.
#[derive(Copy, Clone, Debug)]
pub struct ParagraphRecord<'a> {
    /// Stable paragraph id.
    pub id: &'a str,
    /// Index of the paragraph in the document.
    pub index: usize,
    /// Byte offset of the paragraph's first character.
    pub start: usize,
    /// Byte offset one past the paragraph's last character (its newline, or
    /// the end of the buffer).
    pub end: usize,
    /// The paragraph's text.
    pub text: &'a str,
    /// Resolved paragraph style.
    pub paragraph_style: &'a ParagraphStyle,
    /// Resolved text style.
    pub text_style: &'a TextStyle,
    /// Revision counter, bumped whenever the paragraph's content or style
    /// changes.
    pub revision: u64,
}

/// The paragraph index: text buffer, break offsets, and per-paragraph
/// state.
#[derive(Clone, Debug)]
pub struct DocumentIndex {
    text: String,
    break_offsets: Vec<usize>,
    states: Vec<ParagraphState>,
    version: u64,
    next_paragraph_id: usize,
}

fn newline_offsets(text: &str, base: usize) -> Vec<usize> {
    text.bytes()
        .enumerate()
        .filter(|&(_, byte)| byte == b'\n')
        .map(|(offset, _)| base + offset)
        .collect()
}

impl DocumentIndex {
    /// Builds the index from normalized paragraph blocks.
    pub fn new(blocks: &[ParagraphBlock], version: u64) -> Self {
        let text = blocks
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let break_offsets = newline_offsets(&text, 0);
        let states = blocks
            .iter()
            .map(|block| ParagraphState {
                id: block.id.clone(),
                paragraph_style: block.paragraph_style.clone(),
                text_style: block.text_style.clone(),
                revision: 1,
            })
            .collect::<Vec<_>>();
        let next_paragraph_id = states.len();
        Self {
            text,
            break_offsets,
            states,
            version,
            next_paragraph_id,
        }
    }

    /// The current document version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The full text buffer, paragraphs joined by `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offsets of the paragraph-separating newlines.
    pub fn break_offsets(&self) -> &[usize] {
        &self.break_offsets
    }

    /// Number of paragraphs. Always at least 1 once constructed from a
    /// normalized document.
    pub fn paragraph_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the paragraph at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds; use [`Self::paragraph_count`]
    /// to stay in range.
    pub fn paragraph(&self, index: usize) -> ParagraphRecord<'_> {
        assert!(
            index < self.states.len(),
            "paragraph index {index} out of bounds for {} paragraphs",
            self.states.len()
        );
        let state = &self.states[index];
        let start = if index == 0 {
            0
        } else {
            self.break_offsets[index - 1] + 1
        };
        let end = self
            .break_offsets
            .get(index)
            .copied()
            .unwrap_or(self.text.len());
        ParagraphRecord {
            id: &state.id,
            index,
            start,
            end,
            text: &self.text[start..end],
            paragraph_style: &state.paragraph_style,
            text_style: &state.text_style,
            revision: state.revision,
        }
    }

    /// Iterates over all paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = ParagraphRecord<'_>> {
        (0..self.states.len()).map(|index| self.paragraph(index))
    }

    /// Maps a byte position to the paragraph containing it.
    ///
    /// Positions are clamped to the buffer; a position on a newline belongs
    /// to the paragraph the newline terminates.
    pub fn find_paragraph_index(&self, position: usize) -> usize {
        let position = position.min(self.text.len());
        self.break_offsets
            .partition_point(|&offset| offset < position)
    }

    /// Applies a text edit and reports what it invalidated.
    ///
    /// Local edits bump only the affected paragraph's revision. Structural
    /// edits rebuild paragraph state from the first affected paragraph: the
    /// first replacement paragraph keeps the original's id and styles, the
    /// rest get freshly minted ids and inherit the original's styles.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<EditResult, Error> {
        let TextEdit {
            position,
            delete_count,
            ref insert_text,
        } = *edit;

        if position > self.text.len() {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.text.len(),
            });
        }
        let delete_end = position.checked_add(delete_count).filter(|&end| {
            end <= self.text.len()
        });
        let Some(delete_end) = delete_end else {
            return Err(Error::DeleteOutOfBounds {
                position,
                delete_count,
                len: self.text.len(),
            });
        };
        if !self.text.is_char_boundary(position) {
            return Err(Error::NotCharBoundary { position });
        }
        if !self.text.is_char_boundary(delete_end) {
            return Err(Error::NotCharBoundary {
                position: delete_end,
            });
        }

        let dirty_from_paragraph = self.find_paragraph_index(position);
        let deleted_break_count = self.text[position..delete_end]
            .bytes()
            .filter(|&byte| byte == b'\n')
            .count();
        let inserted_break_offsets = newline_offsets(insert_text, position);
        let inserted_break_count = inserted_break_offsets.len();
        let delta = insert_text.len() as isize - delete_count as isize;

        self.text
            .replace_range(position..delete_end, insert_text);

        let mut break_offsets = Vec::with_capacity(
            self.break_offsets.len() - deleted_break_count + inserted_break_count,
        );
        for &offset in &self.break_offsets {
            if offset < position {
                break_offsets.push(offset);
            } else if offset >= delete_end {
                break_offsets.push((offset as isize + delta) as usize);
            }
        }
        break_offsets.extend(inserted_break_offsets);
        break_offsets.sort_unstable();
        self.break_offsets = break_offsets;

        self.version += 1;

        if deleted_break_count == 0 && inserted_break_count == 0 {
            self.states[dirty_from_paragraph].revision += 1;
            return Ok(EditResult {
                kind: EditKind::Local,
                dirty_from_paragraph,
                affected_paragraph: dirty_from_paragraph,
                version: self.version,
                delta,
            });
        }

        let base_state = self.states[dirty_from_paragraph].clone();
        let replacement_count = inserted_break_count + 1;
        let replacement = (0..replacement_count).map(|index| ParagraphState {
            id: if index == 0 {
                base_state.id.clone()
            } else {
                format!("paragraph-{}", self.next_paragraph_id + index - 1)
            },
            paragraph_style: base_state.paragraph_style.clone(),
            text_style: base_state.text_style.clone(),
            revision: self.version,
        });

        let suffix_start =
            (dirty_from_paragraph + deleted_break_count + 1).min(self.states.len());
        let mut states =
            Vec::with_capacity(dirty_from_paragraph + replacement_count
                + (self.states.len() - suffix_start));
        states.extend_from_slice(&self.states[..dirty_from_paragraph]);
        states.extend(replacement);
        states.extend_from_slice(&self.states[suffix_start..]);
        self.states = states;
        self.next_paragraph_id += replacement_count - 1;

        Ok(EditResult {
            kind: EditKind::Structural,
            dirty_from_paragraph,
            affected_paragraph: dirty_from_paragraph,
            version: self.version,
            delta,
        })
    }

    /// Merges style overrides into one paragraph and bumps its revision and
    /// the document version.
    pub fn update_paragraph_styles(
        &mut self,
        index: usize,
        paragraph_style: Option<&ParagraphStyleOverrides>,
        text_style: Option<&TextStyleOverrides>,
    ) -> Result<(), Error> {
        let count = self.states.len();
        let Some(state) = self.states.get_mut(index) else {
            return Err(Error::ParagraphOutOfBounds { index, count });
        };
        if let Some(overrides) = paragraph_style {
            state.paragraph_style = overrides.resolve(&state.paragraph_style);
        }
        if let Some(overrides) = text_style {
            state.text_style = overrides.resolve(&state.text_style);
        }
        state.revision += 1;
        self.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(texts: &[&str]) -> DocumentIndex {
        let blocks = texts
            .iter()
            .enumerate()
            .map(|(index, text)| ParagraphBlock {
                id: format!("paragraph-{index}"),
                text: (*text).to_owned(),
                paragraph_style: ParagraphStyle::default(),
                text_style: TextStyle::default(),
            })
            .collect::<Vec<_>>();
        DocumentIndex::new(&blocks, 1)
    }

    fn edit(position: usize, delete_count: usize, insert_text: &str) -> TextEdit {
        TextEdit {
            position,
            delete_count,
            insert_text: insert_text.to_owned(),
        }
    }

    #[test]
    fn indexes_paragraphs_by_newline_offsets() {
        let index = index_of(&["alpha", "beta", "gamma"]);
        assert_eq!(index.text(), "alpha\nbeta\ngamma");
        assert_eq!(index.break_offsets(), &[5, 10]);
        assert_eq!(index.find_paragraph_index(0), 0);
        assert_eq!(index.find_paragraph_index(5), 0);
        assert_eq!(index.find_paragraph_index(6), 1);
        assert_eq!(index.find_paragraph_index(index.text().len()), 2);
    }

    #[test]
    fn local_edits_touch_only_the_edited_paragraph() {
        let mut index = index_of(&["hello world", "second"]);
        let before: Vec<u64> = index.paragraphs().map(|p| p.revision).collect();
        let result = index.apply_edit(&edit(6, 0, "wide ")).unwrap();
        let after: Vec<u64> = index.paragraphs().map(|p| p.revision).collect();

        assert_eq!(result.kind, EditKind::Local);
        assert_eq!(result.dirty_from_paragraph, 0);
        assert_eq!(result.delta, 5);
        assert_eq!(index.paragraph(0).text, "hello wide world");
        assert_eq!(after[0], before[0] + 1);
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn structural_edits_rebuild_from_the_affected_paragraph() {
        let mut index = index_of(&["hello world", "second line"]);
        let result = index.apply_edit(&edit(5, 1, "\n")).unwrap();

        assert_eq!(result.kind, EditKind::Structural);
        assert_eq!(index.paragraph_count(), 3);
        assert_eq!(index.paragraph(0).text, "hello");
        assert_eq!(index.paragraph(1).text, "world");
        assert_eq!(index.paragraph(2).text, "second line");
    }

    #[test]
    fn deleting_a_newline_merges_paragraphs() {
        let mut index = index_of(&["first", "second", "third"]);
        let result = index.apply_edit(&edit(5, 1, "")).unwrap();

        assert_eq!(result.kind, EditKind::Structural);
        assert_eq!(result.dirty_from_paragraph, 0);
        assert_eq!(index.paragraph_count(), 2);
        assert_eq!(index.paragraph(0).text, "firstsecond");
        assert_eq!(index.paragraph(1).text, "third");
    }

    #[test]
    fn inserting_multiple_newlines_splits_into_multiple_paragraphs() {
        let mut index = index_of(&["alpha", "omega"]);
        let result = index.apply_edit(&edit(2, 0, "X\nY\n")).unwrap();

        assert_eq!(result.kind, EditKind::Structural);
        assert_eq!(result.dirty_from_paragraph, 0);
        assert_eq!(index.paragraph_count(), 4);
        let texts: Vec<&str> = index.paragraphs().map(|p| p.text).collect();
        assert_eq!(texts, ["alX", "Y", "pha", "omega"]);
    }

    #[test]
    fn split_paragraphs_keep_the_original_id_first_and_mint_the_rest() {
        let mut index = index_of(&["alpha", "omega"]);
        index.apply_edit(&edit(2, 0, "\n")).unwrap();
        let ids: Vec<&str> = index.paragraphs().map(|p| p.id).collect();
        assert_eq!(ids, ["paragraph-0", "paragraph-2", "paragraph-1"]);
    }

    #[test]
    fn deleting_across_boundaries_collapses_paragraphs() {
        let mut index = index_of(&["alpha", "beta", "gamma", "delta"]);
        let delete_start = index.text().find('\n').unwrap();
        let delete_count = index.text().find("delta").unwrap() - delete_start;
        let result = index
            .apply_edit(&edit(delete_start, delete_count, ""))
            .unwrap();

        assert_eq!(result.kind, EditKind::Structural);
        assert_eq!(index.paragraph_count(), 1);
        assert_eq!(index.paragraph(0).text, "alphadelta");
    }

    #[test]
    fn style_updates_bump_revision_and_version() {
        let mut index = index_of(&["styled"]);
        let before_revision = index.paragraph(0).revision;
        let before_version = index.version();

        index
            .update_paragraph_styles(
                0,
                Some(&ParagraphStyleOverrides {
                    spacing_after: Some(24.0),
                    ..Default::default()
                }),
                Some(&TextStyleOverrides {
                    font_size: Some(14.0),
                    ..Default::default()
                }),
            )
            .unwrap();

        let after = index.paragraph(0);
        assert_eq!(index.version(), before_version + 1);
        assert_eq!(after.revision, before_revision + 1);
        assert_eq!(after.paragraph_style.spacing_after, 24.0);
        assert_eq!(
            after.paragraph_style.line_height,
            ParagraphStyle::default().line_height
        );
        assert_eq!(after.text_style.font_size, 14.0);
        assert_eq!(
            after.text_style.font_family,
            TextStyle::default().font_family
        );
    }

    #[test]
    fn rejects_out_of_bounds_and_unaligned_edits() {
        let mut index = index_of(&["héllo"]);
        assert!(matches!(
            index.apply_edit(&edit(100, 0, "x")),
            Err(Error::PositionOutOfBounds { .. })
        ));
        assert!(matches!(
            index.apply_edit(&edit(0, 100, "")),
            Err(Error::DeleteOutOfBounds { .. })
        ));
        // "é" starts at byte 1 and is two bytes wide.
        assert!(matches!(
            index.apply_edit(&edit(2, 0, "x")),
            Err(Error::NotCharBoundary { position: 2 })
        ));
        assert!(matches!(
            index.apply_edit(&edit(1, 1, "")),
            Err(Error::NotCharBoundary { position: 2 })
        ));
    }
}
