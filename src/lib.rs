/***************************************************************************************************
 * Copyright (c) 2020-2022, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_tree module definition
 *
 * A streaming CBOR (RFC 8949) decoder that builds an owned, refcounted item tree, plus structural
 * copy and canonicalization over that tree.
 **************************************************************************************************/

#![warn(missing_docs)]

//! # cbor_tree
//!
//! `cbor_tree` decodes a complete CBOR data item from a byte slice into an owned tree of
//! [`item::Item`] nodes, each held behind an [`item::ItemRef`] (a reference-counted handle).
//! Unlike a zero-copy decoder, every item owns its payload: byte strings, text strings, array
//! elements and map pairs are all copied out of the input buffer once, during decode, so the
//! resulting tree outlives the buffer it was parsed from.
//!
//! The implementation is organized the way a hand-rolled C decoder of the same shape would be:
//!
//! - [`stream`] is the byte-level event decoder. One call to [`stream::decode`] consumes one
//!   data item head (and, for definite-length strings, its inline payload) and dispatches a
//!   typed event to a [`stream::Callbacks`] implementation. It never recurses and never buffers
//!   more than the current item head.
//! - [`builder`] implements `Callbacks` and assembles events into an [`item::Item`] tree using an
//!   explicit stack of open containers, so nesting depth is bounded by a caller-supplied limit
//!   rather than the Rust call stack.
//! - [`driver`] drives the decode/build loop to completion and reports structured errors with the
//!   byte offset at which decoding stopped.
//! - [`copy`] provides structural and canonicalizing deep copies over an already-built tree.
//!
//! ## Example
//!
//! ```
//! use cbor_tree::driver::load;
//! use cbor_tree::item::Item;
//!
//! let item = load(&[0x82, 0x01, 0x02]).unwrap();
//! match &*item {
//!     Item::ArrayDefinite { items, .. } => assert_eq!(items.len(), 2),
//!     other => panic!("unexpected item {other:?}"),
//! }
//! ```
//!
//! ## Features
//!
//! - `std` (default): required to build the item tree at all, since it uses `Rc` and `Vec`'s
//!   fallible-allocation API.
//! - `float` (default): decode IEEE-754 half/single/double floats (`FLOAT_CTRL` widths 2/4/8).
//!   Without it, those widths decode as [`error::ErrorCode::Malformed`].
//! - `trace`: log function entry/exit via `func_trace`, for debugging. Off by default; adds
//!   measurable overhead.

#[cfg(feature = "float")]
extern crate half;

// Internal plumbing: the byte-level event decoder and the stack-based builder that drives it are
// implementation details of `driver::load`, not a public API surface.
pub(crate) mod bytes;
pub(crate) mod constants;
pub(crate) mod stream;
pub(crate) mod builder;

/// Error types returned by [`driver::load`] and [`driver::load_with_max_depth`].
pub mod error;

/// The owned item tree: [`item::Item`], [`item::ItemRef`], and the refcount-parity helper
/// functions.
pub mod item;

/// The top-level decode loop.
pub mod driver;

/// Structural copy and canonicalization over an already-built item tree.
pub mod copy;
