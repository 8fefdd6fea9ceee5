/***************************************************************************************************
 * Copyright (c) 2020-2022 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Item Model
 *
 * A tagged node representing one CBOR data item, with its width/definiteness metadata. Containers
 * own their children directly as `Rc<Item>`, using the refcount only for explicit user-visible
 * sharing. Recursive release on drop is `Rc`'s own `Drop`, so there is no hand-written
 * decref-and-recurse loop.
 **************************************************************************************************/
use std::collections::TryReserveError;
use std::rc::Rc;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// A handle to a CBOR item. Shared ownership is explicit: cloning an `ItemRef` increments the
/// underlying `Rc` strong count, the same operation [`incref`] performs.
pub type ItemRef = Rc<Item>;

/// Width of an encoded unsigned or negative integer, in bytes. Mirrors the AI 24/25/26/27
/// following-byte widths; width is preserved on copy and is not collapsed to the smallest form
/// that could represent the same value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntWidth {
    W1,
    W2,
    W4,
    W8,
}

/// The payload of a `FLOAT_CTRL` item (major type 7), discriminated by encoded width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FloatCtrl {
    /// Width 0: an AI-immediate or one-byte "simple value" 0..=255. `false`/`true`/`null`/
    /// `undefined` are simple values 20..=23 by RFC 8949 convention; other codes are
    /// user-defined and carried as-is.
    Simple(u8),
    /// Width 2: IEEE-754 binary16, widened to `f32` (no native `f16` arithmetic type in `std`).
    #[cfg(feature = "float")]
    Half(f32),
    /// Width 4: IEEE-754 binary32.
    #[cfg(feature = "float")]
    Single(f32),
    /// Width 8: IEEE-754 binary64.
    #[cfg(feature = "float")]
    Double(f64),
}

impl FloatCtrl {
    /// The encoded width in bytes: 0 for simple values, 2/4/8 for the float widths.
    pub fn width(&self) -> u8 {
        match self {
            FloatCtrl::Simple(_) => 0,
            #[cfg(feature = "float")]
            FloatCtrl::Half(_) => 2,
            #[cfg(feature = "float")]
            FloatCtrl::Single(_) => 4,
            #[cfg(feature = "float")]
            FloatCtrl::Double(_) => 8,
        }
    }
}

/// A CBOR data item.
#[derive(Debug)]
pub enum Item {
    /// Major type 0: non-negative integer, with the width actually seen on the wire.
    Uint { width: IntWidth, value: u64 },
    /// Major type 1: negative integer. The represented value is `-1 - value`, so `value == 0`
    /// is `-1` and `value == u64::MAX` is `-2^64`, preserved as-is with no range check (matching
    /// libcbor's `negint64` callback, which takes the full `u64` range).
    NegInt { width: IntWidth, value: u64 },
    /// Major type 2, definite length: an owned byte buffer.
    ByteStringDefinite { bytes: Vec<u8> },
    /// Major type 2, indefinite length: an ordered sequence of definite-chunk items, each of
    /// which must itself be a `ByteStringDefinite`.
    ByteStringIndefinite { chunks: Vec<ItemRef> },
    /// Major type 3, definite length: an owned UTF-8(-ish) buffer plus a best-effort codepoint
    /// count. Ill-formed UTF-8 is accepted, not rejected.
    StringDefinite { bytes: Vec<u8>, codepoint_count: usize },
    /// Major type 3, indefinite length: chunks, each a `StringDefinite`.
    StringIndefinite { chunks: Vec<ItemRef> },
    /// Major type 4, definite length: `items.len() <= capacity` while under construction; once
    /// returned by the driver, `items.len() == capacity`.
    ArrayDefinite { capacity: usize, items: Vec<ItemRef> },
    /// Major type 4, indefinite length: closed by a `break` event.
    ArrayIndefinite { items: Vec<ItemRef> },
    /// Major type 5, definite length: `capacity` is the declared pair count.
    MapDefinite { capacity: usize, pairs: Vec<(ItemRef, ItemRef)> },
    /// Major type 5, indefinite length: closed by a `break` event.
    MapIndefinite { pairs: Vec<(ItemRef, ItemRef)> },
    /// Major type 6: a tag value and its exactly-one content item.
    Tag { tag: u64, content: ItemRef },
    /// Major type 7: a simple value or IEEE-754 float, see [`FloatCtrl`].
    FloatCtrl(FloatCtrl),
}

/// The major type of an item, independent of width/definiteness metadata. Returned by
/// [`Item::type_of`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ItemType {
    Uint,
    NegInt,
    ByteString,
    String,
    Array,
    Map,
    Tag,
    FloatCtrl,
}

impl Item {
    /// The major type of this item.
    #[cfg_attr(feature = "trace", trace)]
    pub fn type_of(&self) -> ItemType {
        match self {
            Item::Uint { .. } => ItemType::Uint,
            Item::NegInt { .. } => ItemType::NegInt,
            Item::ByteStringDefinite { .. } | Item::ByteStringIndefinite { .. } => ItemType::ByteString,
            Item::StringDefinite { .. } | Item::StringIndefinite { .. } => ItemType::String,
            Item::ArrayDefinite { .. } | Item::ArrayIndefinite { .. } => ItemType::Array,
            Item::MapDefinite { .. } | Item::MapIndefinite { .. } => ItemType::Map,
            Item::Tag { .. } => ItemType::Tag,
            Item::FloatCtrl(_) => ItemType::FloatCtrl,
        }
    }

    /// Whether this item's representation is the definite-length form. Scalars (ints, tags,
    /// float/ctrl) are always "definite" in the sense that they have no break-closed form.
    pub fn is_definite(&self) -> bool {
        !matches!(
            self,
            Item::ByteStringIndefinite { .. }
                | Item::StringIndefinite { .. }
                | Item::ArrayIndefinite { .. }
                | Item::MapIndefinite { .. }
        )
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Item::Uint { .. })
    }
    pub fn is_negint(&self) -> bool {
        matches!(self, Item::NegInt { .. })
    }
    pub fn is_int(&self) -> bool {
        self.is_uint() || self.is_negint()
    }
    pub fn is_bytestring(&self) -> bool {
        matches!(self, Item::ByteStringDefinite { .. } | Item::ByteStringIndefinite { .. })
    }
    pub fn is_string(&self) -> bool {
        matches!(self, Item::StringDefinite { .. } | Item::StringIndefinite { .. })
    }
    pub fn is_array(&self) -> bool {
        matches!(self, Item::ArrayDefinite { .. } | Item::ArrayIndefinite { .. })
    }
    pub fn is_map(&self) -> bool {
        matches!(self, Item::MapDefinite { .. } | Item::MapIndefinite { .. })
    }
    pub fn is_tag(&self) -> bool {
        matches!(self, Item::Tag { .. })
    }
    pub fn is_float(&self) -> bool {
        #[cfg(feature = "float")]
        {
            matches!(
                self,
                Item::FloatCtrl(FloatCtrl::Half(_)) | Item::FloatCtrl(FloatCtrl::Single(_)) | Item::FloatCtrl(FloatCtrl::Double(_))
            )
        }
        #[cfg(not(feature = "float"))]
        {
            false
        }
    }
    pub fn is_bool(&self) -> bool {
        matches!(self, Item::FloatCtrl(FloatCtrl::Simple(v)) if *v == crate::constants::SIMPLE_FALSE || *v == crate::constants::SIMPLE_TRUE)
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Item::FloatCtrl(FloatCtrl::Simple(v)) if *v == crate::constants::SIMPLE_NULL)
    }
    pub fn is_undef(&self) -> bool {
        matches!(self, Item::FloatCtrl(FloatCtrl::Simple(v)) if *v == crate::constants::SIMPLE_UNDEFINED)
    }

    /// The number of entries currently pushed into a container (chunks, array items, or map
    /// pairs). Returns `None` for non-container items.
    pub fn length(&self) -> Option<usize> {
        match self {
            Item::ByteStringIndefinite { chunks } | Item::StringIndefinite { chunks } => Some(chunks.len()),
            Item::ArrayDefinite { items, .. } | Item::ArrayIndefinite { items } => Some(items.len()),
            Item::MapDefinite { pairs, .. } | Item::MapIndefinite { pairs } => Some(pairs.len()),
            _ => None,
        }
    }

    /// The reserved capacity of a definite array (item slots) or definite map (pairs). `None`
    /// for anything else, including indefinite containers, which grow geometrically instead.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Item::ArrayDefinite { capacity, .. } => Some(*capacity),
            Item::MapDefinite { capacity, .. } => Some(*capacity),
            _ => None,
        }
    }
}

/// Best-effort UTF-8 codepoint count: counts bytes that are not UTF-8 continuation bytes (top two
/// bits `10`). For well-formed UTF-8 this equals the exact codepoint count; for ill-formed input
/// it is an approximation rather than a validation verdict.
pub(crate) fn count_codepoints_best_effort(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count()
}

// ---------------------------------------------------------------------------------------------
// Builders. There is no external encoder in this crate, so these are implemented directly here:
// each returns a fresh item with strong count 1, or a `TryReserveError` on allocation failure.
// ---------------------------------------------------------------------------------------------

pub(crate) fn build_uint(width: IntWidth, value: u64) -> ItemRef {
    Rc::new(Item::Uint { width, value })
}

pub(crate) fn build_negint(width: IntWidth, value: u64) -> ItemRef {
    Rc::new(Item::NegInt { width, value })
}

pub(crate) fn build_bytestring_definite(bytes: Vec<u8>) -> ItemRef {
    Rc::new(Item::ByteStringDefinite { bytes })
}

pub(crate) fn build_string_definite(bytes: Vec<u8>) -> ItemRef {
    let codepoint_count = count_codepoints_best_effort(&bytes);
    Rc::new(Item::StringDefinite { bytes, codepoint_count })
}

pub(crate) fn new_indefinite_bytestring() -> ItemRef {
    Rc::new(Item::ByteStringIndefinite { chunks: Vec::new() })
}

pub(crate) fn new_indefinite_string() -> ItemRef {
    Rc::new(Item::StringIndefinite { chunks: Vec::new() })
}

pub(crate) fn new_definite_array(capacity: usize) -> Result<ItemRef, TryReserveError> {
    let mut items = Vec::new();
    items.try_reserve_exact(capacity)?;
    Ok(Rc::new(Item::ArrayDefinite { capacity, items }))
}

pub(crate) fn new_indefinite_array() -> ItemRef {
    Rc::new(Item::ArrayIndefinite { items: Vec::new() })
}

pub(crate) fn new_definite_map(capacity: usize) -> Result<ItemRef, TryReserveError> {
    let mut pairs = Vec::new();
    pairs.try_reserve_exact(capacity)?;
    Ok(Rc::new(Item::MapDefinite { capacity, pairs }))
}

pub(crate) fn new_indefinite_map() -> ItemRef {
    Rc::new(Item::MapIndefinite { pairs: Vec::new() })
}

pub(crate) fn build_tag(tag: u64, content: ItemRef) -> ItemRef {
    Rc::new(Item::Tag { tag, content })
}

pub(crate) fn build_ctrl(simple: u8) -> ItemRef {
    Rc::new(Item::FloatCtrl(FloatCtrl::Simple(simple)))
}

#[cfg(feature = "float")]
pub(crate) fn build_float2(value: f32) -> ItemRef {
    Rc::new(Item::FloatCtrl(FloatCtrl::Half(value)))
}

#[cfg(feature = "float")]
pub(crate) fn build_float4(value: f32) -> ItemRef {
    Rc::new(Item::FloatCtrl(FloatCtrl::Single(value)))
}

#[cfg(feature = "float")]
pub(crate) fn build_float8(value: f64) -> ItemRef {
    Rc::new(Item::FloatCtrl(FloatCtrl::Double(value)))
}

/// Push a chunk onto an open indefinite byte/text string, or an item onto an open array, or
/// mutate a map's pending-pair state. Succeeds only while `item` is uniquely owned (strong
/// count 1), which is always true for a frame's container while it is still on the builder
/// stack, since items are mutated only while under construction. Returns `false` (rather than
/// panicking) on allocation failure or if `item` is unexpectedly shared, so that callers can
/// translate it into a memory error.
pub(crate) fn push_chunk(item: &mut ItemRef, chunk: ItemRef) -> bool {
    match Rc::get_mut(item) {
        Some(Item::ByteStringIndefinite { chunks }) | Some(Item::StringIndefinite { chunks }) => {
            if chunks.try_reserve(1).is_err() {
                return false;
            }
            chunks.push(chunk);
            true
        }
        _ => false,
    }
}

pub(crate) fn array_push(item: &mut ItemRef, child: ItemRef) -> bool {
    match Rc::get_mut(item) {
        Some(Item::ArrayDefinite { capacity, items }) => {
            if items.len() >= *capacity {
                return false;
            }
            items.push(child);
            true
        }
        Some(Item::ArrayIndefinite { items }) => {
            if items.try_reserve(1).is_err() {
                return false;
            }
            items.push(child);
            true
        }
        _ => false,
    }
}

pub(crate) fn map_push_pair(item: &mut ItemRef, key: ItemRef, value: ItemRef) -> bool {
    match Rc::get_mut(item) {
        Some(Item::MapDefinite { capacity, pairs }) => {
            if pairs.len() >= *capacity {
                return false;
            }
            pairs.push((key, value));
            true
        }
        Some(Item::MapIndefinite { pairs }) => {
            if pairs.try_reserve(1).is_err() {
                return false;
            }
            pairs.push((key, value));
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------------------------
// Reference-count API. `Rc` makes most of this a thin wrapper; `move_item` is a pass-through,
// since transferring an owned `ItemRef` into a parent's `Vec` is already a move in Rust, with no
// separate accounting step required.
// ---------------------------------------------------------------------------------------------

/// Raise the strong count: an explicit clone of the handle.
pub fn incref(item: &ItemRef) -> ItemRef {
    Rc::clone(item)
}

/// Lower the strong count by dropping `*slot` and leaving `None` behind, so a caller's pointer is
/// nulled rather than left dangling.
pub fn decref(slot: &mut Option<ItemRef>) {
    *slot = None;
}

/// Lower the strong count without nulling anything, for callers that already intend to let
/// `item` go out of scope.
pub fn decref_intermediate(item: ItemRef) {
    drop(item);
}

/// Transfer ownership of `item` into a parent without incrementing the strong count. Rust's
/// move semantics already do this for any owned `ItemRef`; this function exists so call sites
/// can name the operation explicitly.
pub fn move_item(item: ItemRef) -> ItemRef {
    item
}

/// The current strong count of `item`.
pub fn refcount(item: &ItemRef) -> usize {
    Rc::strong_count(item)
}
