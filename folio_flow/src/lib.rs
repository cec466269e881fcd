// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `folio_flow`: an editing session and caret geometry on top of Folio.
//!
//! This crate adds a small host-facing layer over the core layout engine:
//! - [`Editor`]: a subscribable session that owns a [`folio::LayoutEngine`],
//!   applies insert/delete mutations, keeps layout current, and tracks a
//!   caret position.
//! - [`caret`]: pure geometry helpers that map between document byte
//!   offsets and on-screen caret positions across pages, including
//!   click-to-offset hit testing and vertical caret movement.
//!
//! Quick usage outline:
//! - Build a [`folio::DocumentInput`] and a glyph measurer, then create an
//!   [`Editor`]; the initial layout is computed synchronously.
//! - Apply [`Mutation`]s as the user types; subscribers are notified once
//!   per effective change with the fresh [`EditorState`].
//! - Use [`caret::caret_placement`] and [`caret::offset_at_page_point`] to
//!   draw the caret and handle clicks.

pub mod caret;

mod editor;

pub use editor::{Editor, EditorState, Mutation, Subscription, Transaction};

pub use folio::Error;
