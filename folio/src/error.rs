// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types reported by the engine.

use thiserror::Error;

/// Validation failure raised at the point of the offending call.
///
/// Every variant describes malformed input from the host. The engine never
/// partially applies a failed operation: when a method returns an error, all
/// internal state is exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// An edit or caret position lies outside the current text buffer.
    #[error("position {position} is out of bounds for a buffer of length {len}")]
    PositionOutOfBounds {
        /// The offending byte position.
        position: usize,
        /// The buffer length at the time of the call.
        len: usize,
    },
    /// A delete range extends past the end of the buffer.
    #[error("deleting {delete_count} bytes at {position} overruns a buffer of length {len}")]
    DeleteOutOfBounds {
        /// Start of the delete range.
        position: usize,
        /// Number of bytes requested for deletion.
        delete_count: usize,
        /// The buffer length at the time of the call.
        len: usize,
    },
    /// A byte position does not fall on a `char` boundary.
    #[error("position {position} is not a char boundary")]
    NotCharBoundary {
        /// The offending byte position.
        position: usize,
    },
    /// Paragraph input text contains a raw paragraph separator.
    #[error("paragraph {index} contains a line break; paragraph text must be a single line")]
    ParagraphContainsLineBreak {
        /// Index of the offending paragraph in the input block list.
        index: usize,
    },
    /// A declared document version was not a positive integer.
    #[error("document version must be a positive integer")]
    InvalidDocumentVersion,
    /// A host-supplied paragraph index is beyond the current paragraph count.
    #[error("paragraph index {index} is out of bounds ({count} paragraphs)")]
    ParagraphOutOfBounds {
        /// The offending paragraph index.
        index: usize,
        /// The paragraph count at the time of the call.
        count: usize,
    },
}
