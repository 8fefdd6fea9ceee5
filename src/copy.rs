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
 * Copy & Canonicalize
 *
 * `copy` produces a deep clone preserving every structural distinction (integer width,
 * definiteness, chunk layout, tag value, float width, simple-value code). `copy_definite` is the
 * same traversal except indefinite strings are concatenated and indefinite containers are
 * collapsed to definite form sized to their current length.
 *
 * Both return `None` on allocation failure at any point, mirroring the C original's "release all
 * partially constructed state and return no item" (the partial `ItemRef`s built so far simply go
 * out of scope and their `Rc` machinery recursively drops them — no manual unwind is needed).
 **************************************************************************************************/
use std::rc::Rc;

use crate::item::{self, Item, ItemRef};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

fn try_clone_bytes(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len()).ok()?;
    buf.extend_from_slice(bytes);
    Some(buf)
}

/// Deep-copy `item`, preserving its exact structural form: int widths are never collapsed to the
/// smallest form that could represent the same value.
#[cfg_attr(feature = "trace", trace)]
pub fn copy(item: &ItemRef) -> Option<ItemRef> {
    match &**item {
        Item::Uint { width, value } => Some(item::build_uint(*width, *value)),
        Item::NegInt { width, value } => Some(item::build_negint(*width, *value)),
        Item::ByteStringDefinite { bytes } => Some(item::build_bytestring_definite(try_clone_bytes(bytes)?)),
        Item::ByteStringIndefinite { chunks } => {
            let mut out = item::new_indefinite_bytestring();
            for chunk in chunks {
                if !item::push_chunk(&mut out, copy(chunk)?) {
                    return None;
                }
            }
            Some(out)
        }
        Item::StringDefinite { bytes, .. } => Some(item::build_string_definite(try_clone_bytes(bytes)?)),
        Item::StringIndefinite { chunks } => {
            let mut out = item::new_indefinite_string();
            for chunk in chunks {
                if !item::push_chunk(&mut out, copy(chunk)?) {
                    return None;
                }
            }
            Some(out)
        }
        Item::ArrayDefinite { capacity, items } => {
            let mut out = item::new_definite_array(*capacity).ok()?;
            for child in items {
                if !item::array_push(&mut out, copy(child)?) {
                    return None;
                }
            }
            Some(out)
        }
        Item::ArrayIndefinite { items } => {
            let mut out = item::new_indefinite_array();
            for child in items {
                if !item::array_push(&mut out, copy(child)?) {
                    return None;
                }
            }
            Some(out)
        }
        Item::MapDefinite { capacity, pairs } => {
            let mut out = item::new_definite_map(*capacity).ok()?;
            for (k, v) in pairs {
                let (ck, cv) = (copy(k)?, copy(v)?);
                if !item::map_push_pair(&mut out, ck, cv) {
                    return None;
                }
            }
            Some(out)
        }
        Item::MapIndefinite { pairs } => {
            let mut out = item::new_indefinite_map();
            for (k, v) in pairs {
                let (ck, cv) = (copy(k)?, copy(v)?);
                if !item::map_push_pair(&mut out, ck, cv) {
                    return None;
                }
            }
            Some(out)
        }
        Item::Tag { tag, content } => Some(item::build_tag(*tag, copy(content)?)),
        Item::FloatCtrl(fc) => Some(Rc::new(Item::FloatCtrl(*fc))),
    }
}

/// Deep-copy `item`, collapsing indefinite-length strings and containers into definite form.
/// Tag wrappers and scalars keep their form; only the indefinite/definite distinction on
/// strings, byte strings, arrays, and maps changes.
#[cfg_attr(feature = "trace", trace)]
pub fn copy_definite(item: &ItemRef) -> Option<ItemRef> {
    match &**item {
        Item::Uint { width, value } => Some(item::build_uint(*width, *value)),
        Item::NegInt { width, value } => Some(item::build_negint(*width, *value)),
        Item::ByteStringDefinite { bytes } => Some(item::build_bytestring_definite(try_clone_bytes(bytes)?)),
        Item::ByteStringIndefinite { chunks } => {
            let total: usize = chunks
                .iter()
                .map(|c| match &**c {
                    Item::ByteStringDefinite { bytes } => bytes.len(),
                    _ => 0,
                })
                .sum();
            let mut buf = Vec::new();
            buf.try_reserve_exact(total).ok()?;
            for chunk in chunks {
                if let Item::ByteStringDefinite { bytes } = &**chunk {
                    buf.extend_from_slice(bytes);
                }
            }
            Some(item::build_bytestring_definite(buf))
        }
        Item::StringDefinite { bytes, .. } => Some(item::build_string_definite(try_clone_bytes(bytes)?)),
        Item::StringIndefinite { chunks } => {
            let total: usize = chunks
                .iter()
                .map(|c| match &**c {
                    Item::StringDefinite { bytes, .. } => bytes.len(),
                    _ => 0,
                })
                .sum();
            let mut buf = Vec::new();
            buf.try_reserve_exact(total).ok()?;
            for chunk in chunks {
                if let Item::StringDefinite { bytes, .. } = &**chunk {
                    buf.extend_from_slice(bytes);
                }
            }
            Some(item::build_string_definite(buf))
        }
        Item::ArrayDefinite { items, .. } | Item::ArrayIndefinite { items } => {
            let mut out = item::new_definite_array(items.len()).ok()?;
            for child in items {
                if !item::array_push(&mut out, copy_definite(child)?) {
                    return None;
                }
            }
            Some(out)
        }
        Item::MapDefinite { pairs, .. } | Item::MapIndefinite { pairs } => {
            let mut out = item::new_definite_map(pairs.len()).ok()?;
            for (k, v) in pairs {
                let (ck, cv) = (copy_definite(k)?, copy_definite(v)?);
                if !item::map_push_pair(&mut out, ck, cv) {
                    return None;
                }
            }
            Some(out)
        }
        Item::Tag { tag, content } => Some(item::build_tag(*tag, copy_definite(content)?)),
        Item::FloatCtrl(fc) => Some(Rc::new(Item::FloatCtrl(*fc))),
    }
}
