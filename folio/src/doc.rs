// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document input model: page settings and paragraph blocks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::style::{
    ParagraphStyle, ParagraphStyleOverrides, TextStyle, TextStyleOverrides,
};

const DEFAULT_DOCUMENT_ID: &str = "document-0";

/// Page margins in layout units.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageMargins {
    /// Top margin.
    pub top: f32,
    /// Right margin.
    pub right: f32,
    /// Bottom margin.
    pub bottom: f32,
    /// Left margin.
    pub left: f32,
}

/// Page geometry and document-level style defaults.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSettings {
    /// Full page width.
    pub page_width: f32,
    /// Full page height.
    pub page_height: f32,
    /// Margins defining the content box.
    pub margins: PageMargins,
    /// Document-default text style.
    pub default_text_style: TextStyle,
    /// Document-default paragraph style.
    pub default_paragraph_style: ParagraphStyle,
}

impl LayoutSettings {
    /// Width of the content box lines must fit into.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Height of the content box pages are filled up to.
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }
}

/// One paragraph of host-supplied document input.
#[derive(Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParagraphInput {
    /// Optional stable id; minted as `paragraph-{index}` when absent.
    pub id: Option<String>,
    /// The paragraph's text. Must not contain line breaks.
    pub text: String,
    /// Paragraph style overrides, merged over the document default.
    pub paragraph_style: Option<ParagraphStyleOverrides>,
    /// Text style overrides, merged over the document default.
    pub text_style: Option<TextStyleOverrides>,
}

/// A complete host-supplied document.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocumentInput {
    /// Optional document id.
    pub id: Option<String>,
    /// Optional declared version; must be positive when present.
    pub version: Option<u64>,
    /// Page geometry and style defaults.
    pub settings: LayoutSettings,
    /// The document's paragraphs, in order.
    pub blocks: Vec<ParagraphInput>,
}

/// A normalized paragraph: concrete id and fully resolved styles.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParagraphBlock {
    /// Stable paragraph id.
    pub id: String,
    /// The paragraph's text.
    pub text: String,
    /// Resolved paragraph style.
    pub paragraph_style: ParagraphStyle,
    /// Resolved text style.
    pub text_style: TextStyle,
}

/// A normalized document, ready to feed the engine.
#[derive(Clone, PartialEq, Debug)]
pub struct Document {
    /// Document id.
    pub id: String,
    /// Document version, at least 1.
    pub version: u64,
    /// Page geometry and style defaults.
    pub settings: LayoutSettings,
    /// Normalized paragraphs.
    pub blocks: Vec<ParagraphBlock>,
}

impl DocumentInput {
    /// Validates and normalizes the input.
    ///
    /// An empty block list becomes a single empty paragraph so the document
    /// always has at least one line box. Fails if any paragraph contains a
    /// raw line break or the declared version is zero.
    pub fn normalize(self) -> Result<Document, Error> {
        if self.version == Some(0) {
            return Err(Error::InvalidDocumentVersion);
        }
        let blocks = if self.blocks.is_empty() {
            vec![ParagraphInput::default()]
        } else {
            self.blocks
        };
        let blocks = blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                if block.text.contains(['\n', '\r']) {
                    return Err(Error::ParagraphContainsLineBreak { index });
                }
                Ok(ParagraphBlock {
                    id: block
                        .id
                        .unwrap_or_else(|| format!("paragraph-{index}")),
                    text: block.text,
                    paragraph_style: block
                        .paragraph_style
                        .unwrap_or_default()
                        .resolve(&self.settings.default_paragraph_style),
                    text_style: block
                        .text_style
                        .unwrap_or_default()
                        .resolve(&self.settings.default_text_style),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Document {
            id: self.id.unwrap_or_else(|| DEFAULT_DOCUMENT_ID.to_owned()),
            version: self.version.unwrap_or(1),
            settings: self.settings,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            default_text_style: TextStyle::default(),
            default_paragraph_style: ParagraphStyle::default(),
        }
    }

    #[test]
    fn content_box_subtracts_margins() {
        let settings = settings();
        assert_eq!(settings.content_width(), 140.0);
        assert_eq!(settings.content_height(), 100.0);
    }

    #[test]
    fn empty_documents_get_one_empty_paragraph() {
        let document = DocumentInput {
            id: None,
            version: None,
            settings: settings(),
            blocks: Vec::new(),
        }
        .normalize()
        .unwrap();
        assert_eq!(document.version, 1);
        assert_eq!(document.blocks.len(), 1);
        assert_eq!(document.blocks[0].text, "");
        assert_eq!(document.blocks[0].id, "paragraph-0");
    }

    #[test]
    fn rejects_embedded_line_breaks() {
        let result = DocumentInput {
            id: None,
            version: None,
            settings: settings(),
            blocks: vec![
                ParagraphInput {
                    text: "fine".to_owned(),
                    ..Default::default()
                },
                ParagraphInput {
                    text: "not\nfine".to_owned(),
                    ..Default::default()
                },
            ],
        }
        .normalize();
        assert_eq!(result, Err(Error::ParagraphContainsLineBreak { index: 1 }));
    }

    #[test]
    fn rejects_a_zero_version() {
        let result = DocumentInput {
            id: None,
            version: Some(0),
            settings: settings(),
            blocks: Vec::new(),
        }
        .normalize();
        assert_eq!(result, Err(Error::InvalidDocumentVersion));
    }

    #[test]
    fn block_overrides_merge_over_document_defaults() {
        let document = DocumentInput {
            id: Some("doc".to_owned()),
            version: Some(3),
            settings: settings(),
            blocks: vec![ParagraphInput {
                id: Some("intro".to_owned()),
                text: "hello".to_owned(),
                paragraph_style: Some(ParagraphStyleOverrides {
                    spacing_after: Some(12.0),
                    ..Default::default()
                }),
                text_style: None,
            }],
        }
        .normalize()
        .unwrap();
        let block = &document.blocks[0];
        assert_eq!(block.id, "intro");
        assert_eq!(block.paragraph_style.spacing_after, 12.0);
        assert_eq!(
            block.paragraph_style.line_height,
            ParagraphStyle::default().line_height
        );
        assert_eq!(block.text_style, TextStyle::default());
    }
}
