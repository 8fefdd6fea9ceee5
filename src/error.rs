/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * cbor_tree Error API
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for `Result<T, LoadError>` used throughout this crate.
pub type Result<T> = result::Result<T, LoadError>;

/// The outcome of a failed [`crate::driver::load`] call: a structured code plus the byte offset
/// at which parsing stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{code} at byte offset {position}")]
pub struct LoadError {
    pub code: ErrorCode,
    pub position: usize,
}

impl LoadError {
    pub(crate) fn new(code: ErrorCode, position: usize) -> LoadError {
        LoadError { code, position }
    }
}

/// The distinct failure modes a `load` can report, kept separate rather than collapsed into one
/// generic "parse failed" code so callers can tell a truncated buffer from a malformed one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ErrorCode {
    /// `load` was called with an empty byte slice.
    #[error("no data")]
    NoData,
    /// The buffer ended before a complete item head, inline payload, or argument could be read.
    /// The caller may supply more bytes and retry from the same offset.
    #[error("not enough data")]
    NotEnoughData,
    /// The stream decoder itself rejected the input: a reserved Additional Info value, or an
    /// indefinite-length/break marker on a major type that does not permit it.
    #[error("malformed encoding")]
    Malformed,
    /// A builder callback failed to allocate storage for an item or a container slot.
    #[error("allocation failure while building the item tree")]
    MemoryError,
    /// The event stream was well-formed CBOR but violated the builder's structural rules: break
    /// outside any open indefinite container, an indefinite string chunk of the wrong major
    /// type, or a map closed on an odd number of children.
    #[error("syntax error in CBOR item structure")]
    SyntaxError,
}
