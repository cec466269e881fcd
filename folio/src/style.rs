// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styling: resolved paragraph and text styles, overrides, and font keys.
//!
//! Styles in the engine are always fully resolved: every field of
//! [`TextStyle`] and [`ParagraphStyle`] holds a concrete value. Hosts express
//! partial styling through [`TextStyleOverrides`] and
//! [`ParagraphStyleOverrides`], which merge over a concrete base with a fixed
//! three-level precedence: caller override, then the paragraph's declared
//! default, then the document default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slant of a font face.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontSlant {
    /// An upright face.
    #[default]
    Normal,
    /// An italic face.
    Italic,
}

/// Horizontal alignment of the lines of a paragraph.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TextAlign {
    /// Align content to the left edge of the container.
    #[default]
    Left,
    /// Center each line within the container.
    Center,
    /// Align content to the right edge of the container.
    Right,
}

/// Fully resolved character-level style.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in layout units.
    pub font_size: f32,
    /// Font weight (CSS-style, 100..=900).
    pub font_weight: u16,
    /// Font slant.
    pub font_slant: FontSlant,
    /// Extra spacing inserted between adjacent glyphs of a word.
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::from("sans-serif"),
            font_size: 16.0,
            font_weight: 400,
            font_slant: FontSlant::Normal,
            letter_spacing: 0.0,
        }
    }
}

/// Fully resolved paragraph-level style.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParagraphStyle {
    /// Horizontal alignment of the paragraph's lines.
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Vertical spacing above the paragraph.
    pub spacing_before: f32,
    /// Vertical spacing below the paragraph.
    pub spacing_after: f32,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            align: TextAlign::Left,
            line_height: 1.4,
            spacing_before: 0.0,
            spacing_after: 0.0,
        }
    }
}

/// Partial character-level style, merged over a concrete base.
#[derive(Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStyleOverrides {
    /// Overrides the base font family.
    pub font_family: Option<String>,
    /// Overrides the base font size.
    pub font_size: Option<f32>,
    /// Overrides the base font weight.
    pub font_weight: Option<u16>,
    /// Overrides the base font slant.
    pub font_slant: Option<FontSlant>,
    /// Overrides the base letter spacing.
    pub letter_spacing: Option<f32>,
}

impl TextStyleOverrides {
    /// Merges these overrides over `base`, producing a fully resolved style.
    pub fn resolve(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| base.font_family.clone()),
            font_size: self.font_size.unwrap_or(base.font_size),
            font_weight: self.font_weight.unwrap_or(base.font_weight),
            font_slant: self.font_slant.unwrap_or(base.font_slant),
            letter_spacing: self.letter_spacing.unwrap_or(base.letter_spacing),
        }
    }
}

/// Partial paragraph-level style, merged over a concrete base.
#[derive(Clone, Default, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParagraphStyleOverrides {
    /// Overrides the base alignment.
    pub align: Option<TextAlign>,
    /// Overrides the base line height multiplier.
    pub line_height: Option<f32>,
    /// Overrides the base spacing before the paragraph.
    pub spacing_before: Option<f32>,
    /// Overrides the base spacing after the paragraph.
    pub spacing_after: Option<f32>,
}

impl ParagraphStyleOverrides {
    /// Merges these overrides over `base`, producing a fully resolved style.
    pub fn resolve(&self, base: &ParagraphStyle) -> ParagraphStyle {
        ParagraphStyle {
            align: self.align.unwrap_or(base.align),
            line_height: self.line_height.unwrap_or(base.line_height),
            spacing_before: self.spacing_before.unwrap_or(base.spacing_before),
            spacing_after: self.spacing_after.unwrap_or(base.spacing_after),
        }
    }
}

/// Key identifying one glyph-cache bucket.
///
/// Letter spacing is deliberately excluded: spacing is applied at word
/// assembly time and must never be baked into a cached glyph metric. The
/// font size is keyed by bit pattern so equality is field-wise exact.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontKey {
    family: String,
    size_bits: u32,
    weight: u16,
    slant: FontSlant,
}

impl FontKey {
    /// Derives the bucket key for a resolved text style.
    pub fn new(style: &TextStyle) -> Self {
        Self {
            family: style.font_family.clone(),
            size_bits: style.font_size.to_bits(),
            weight: style.font_weight,
            slant: style.font_slant,
        }
    }
}
