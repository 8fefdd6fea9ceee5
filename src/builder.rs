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
 * Builder Context & Stack
 *
 * Turns the stream decoder's events into the item tree. Keeps an explicit heap-allocated stack
 * of frames for partially-built containers, since recursive descent over untrusted CBOR invites
 * stack overflow on deeply nested input. Each frame tracks how many more entries it expects
 * before it can propagate upward as a finished value.
 **************************************************************************************************/
use crate::constants::{DEFAULT_MAX_DEPTH, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};
use crate::item::{self, IntWidth, Item, ItemRef};
use crate::stream::Callbacks;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// How many more child events a frame expects before it is complete.
#[derive(Copy, Clone, Debug)]
enum Remaining {
    /// Definite container: this many more child events close it.
    Count(u64),
    /// Indefinite container: closed only by an explicit `break` event.
    Unbounded,
}

/// A partially constructed container sitting on the builder stack.
enum Frame {
    Array { item: ItemRef, remaining: Remaining },
    Map { item: ItemRef, remaining: Remaining, pending_key: Option<ItemRef> },
    /// One-shot: resolves into a `Tag` item as soon as its single child arrives.
    Tag { tag: u64 },
    ByteStringChunks { item: ItemRef },
    TextStringChunks { item: ItemRef },
}

/// Drives the stack and owns the event callbacks that turn decode events into item-tree nodes.
/// One `BuilderContext` is used for exactly one top-level `load` call.
pub(crate) struct BuilderContext {
    stack: Vec<Frame>,
    max_depth: usize,
    pub(crate) root: Option<ItemRef>,
    pub(crate) creation_failed: bool,
    pub(crate) syntax_error: bool,
}

impl BuilderContext {
    pub(crate) fn new(max_depth: usize) -> BuilderContext {
        BuilderContext {
            stack: Vec::new(),
            max_depth,
            root: None,
            creation_failed: false,
            syntax_error: false,
        }
    }

    pub(crate) fn with_default_depth() -> BuilderContext {
        BuilderContext::new(DEFAULT_MAX_DEPTH)
    }

    /// True once the root item has been assigned: the driver stops issuing further decode calls.
    pub(crate) fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    fn push_frame(&mut self, frame: Frame) {
        if self.stack.len() >= self.max_depth {
            self.creation_failed = true;
            return;
        }
        self.stack.push(frame);
    }

    /// Feed one finished value (a scalar, or a container that has just received its final
    /// child) into the top frame, cascading upward through however many frames complete as a
    /// result.
    fn emit_value(&mut self, value: ItemRef) {
        let mut current = value;
        loop {
            let frame = match self.stack.pop() {
                None => {
                    self.root = Some(current);
                    return;
                }
                Some(f) => f,
            };
            match frame {
                Frame::ByteStringChunks { mut item: container } => {
                    if !matches!(&*current, Item::ByteStringDefinite { .. }) {
                        self.syntax_error = true;
                        return;
                    }
                    if !item::push_chunk(&mut container, current) {
                        self.creation_failed = true;
                        return;
                    }
                    self.stack.push(Frame::ByteStringChunks { item: container });
                    return;
                }
                Frame::TextStringChunks { mut item: container } => {
                    if !matches!(&*current, Item::StringDefinite { .. }) {
                        self.syntax_error = true;
                        return;
                    }
                    if !item::push_chunk(&mut container, current) {
                        self.creation_failed = true;
                        return;
                    }
                    self.stack.push(Frame::TextStringChunks { item: container });
                    return;
                }
                Frame::Array { mut item: container, remaining } => {
                    if !item::array_push(&mut container, current) {
                        self.creation_failed = true;
                        return;
                    }
                    match remaining {
                        Remaining::Count(n) => {
                            let n = n - 1;
                            if n == 0 {
                                current = container;
                                continue;
                            }
                            self.stack.push(Frame::Array { item: container, remaining: Remaining::Count(n) });
                            return;
                        }
                        Remaining::Unbounded => {
                            self.stack.push(Frame::Array { item: container, remaining: Remaining::Unbounded });
                            return;
                        }
                    }
                }
                Frame::Map { mut item: container, remaining, pending_key } => match pending_key {
                    None => {
                        let remaining = match remaining {
                            Remaining::Count(n) => Remaining::Count(n - 1),
                            Remaining::Unbounded => Remaining::Unbounded,
                        };
                        self.stack.push(Frame::Map { item: container, remaining, pending_key: Some(current) });
                        return;
                    }
                    Some(key) => {
                        if !item::map_push_pair(&mut container, key, current) {
                            self.creation_failed = true;
                            return;
                        }
                        match remaining {
                            Remaining::Count(n) => {
                                let n = n - 1;
                                if n == 0 {
                                    current = container;
                                    continue;
                                }
                                self.stack.push(Frame::Map { item: container, remaining: Remaining::Count(n), pending_key: None });
                                return;
                            }
                            Remaining::Unbounded => {
                                self.stack.push(Frame::Map { item: container, remaining: Remaining::Unbounded, pending_key: None });
                                return;
                            }
                        }
                    }
                },
                Frame::Tag { tag } => {
                    current = item::build_tag(tag, current);
                    continue;
                }
            }
        }
    }

    /// Close the innermost indefinite container, or set `syntax_error` if there is none open,
    /// the open frame is definite, or a map's key has no matching value yet.
    fn handle_break(&mut self) {
        match self.stack.pop() {
            None => self.syntax_error = true,
            Some(Frame::ByteStringChunks { item }) => self.emit_value(item),
            Some(Frame::TextStringChunks { item }) => self.emit_value(item),
            Some(Frame::Array { item, remaining: Remaining::Unbounded }) => self.emit_value(item),
            Some(Frame::Map { item, remaining: Remaining::Unbounded, pending_key }) => {
                if pending_key.is_some() {
                    self.syntax_error = true;
                } else {
                    self.emit_value(item);
                }
            }
            Some(Frame::Array { remaining: Remaining::Count(_), .. })
            | Some(Frame::Map { remaining: Remaining::Count(_), .. })
            | Some(Frame::Tag { .. }) => {
                self.syntax_error = true;
            }
        }
    }
}

impl Callbacks for BuilderContext {
    #[cfg_attr(feature = "trace", trace)]
    fn uint(&mut self, width: IntWidth, value: u64) {
        self.emit_value(item::build_uint(width, value));
    }

    fn negint(&mut self, width: IntWidth, value: u64) {
        self.emit_value(item::build_negint(width, value));
    }

    fn byte_string(&mut self, bytes: &[u8]) {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(bytes.len()).is_err() {
            self.creation_failed = true;
            return;
        }
        buf.extend_from_slice(bytes);
        self.emit_value(item::build_bytestring_definite(buf));
    }

    fn byte_string_start(&mut self) {
        self.push_frame(Frame::ByteStringChunks { item: item::new_indefinite_bytestring() });
    }

    fn string(&mut self, bytes: &[u8]) {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(bytes.len()).is_err() {
            self.creation_failed = true;
            return;
        }
        buf.extend_from_slice(bytes);
        self.emit_value(item::build_string_definite(buf));
    }

    fn string_start(&mut self) {
        self.push_frame(Frame::TextStringChunks { item: item::new_indefinite_string() });
    }

    fn array_start(&mut self, len: u64) {
        match item::new_definite_array(len as usize) {
            Ok(array) => {
                if len == 0 {
                    self.emit_value(array);
                } else {
                    self.push_frame(Frame::Array { item: array, remaining: Remaining::Count(len) });
                }
            }
            Err(_) => self.creation_failed = true,
        }
    }

    fn indef_array_start(&mut self) {
        self.push_frame(Frame::Array { item: item::new_indefinite_array(), remaining: Remaining::Unbounded });
    }

    fn map_start(&mut self, pairs: u64) {
        match item::new_definite_map(pairs as usize) {
            Ok(map) => {
                if pairs == 0 {
                    self.emit_value(map);
                } else {
                    self.push_frame(Frame::Map { item: map, remaining: Remaining::Count(pairs * 2), pending_key: None });
                }
            }
            Err(_) => self.creation_failed = true,
        }
    }

    fn indef_map_start(&mut self) {
        self.push_frame(Frame::Map { item: item::new_indefinite_map(), remaining: Remaining::Unbounded, pending_key: None });
    }

    fn tag(&mut self, value: u64) {
        self.push_frame(Frame::Tag { tag: value });
    }

    fn boolean(&mut self, value: bool) {
        let simple = if value { SIMPLE_TRUE } else { SIMPLE_FALSE };
        self.emit_value(item::build_ctrl(simple));
    }

    fn null(&mut self) {
        self.emit_value(item::build_ctrl(SIMPLE_NULL));
    }

    fn undefined(&mut self) {
        self.emit_value(item::build_ctrl(SIMPLE_UNDEFINED));
    }

    fn simple(&mut self, value: u8) {
        self.emit_value(item::build_ctrl(value));
    }

    #[cfg(feature = "float")]
    fn float2(&mut self, value: f32) {
        self.emit_value(item::build_float2(value));
    }

    #[cfg(feature = "float")]
    fn float4(&mut self, value: f32) {
        self.emit_value(item::build_float4(value));
    }

    #[cfg(feature = "float")]
    fn float8(&mut self, value: f64) {
        self.emit_value(item::build_float8(value));
    }

    fn indef_break(&mut self) {
        self.handle_break();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::decode;

    fn build(bytes: &[u8]) -> BuilderContext {
        let mut ctx = BuilderContext::with_default_depth();
        let mut read = 0;
        loop {
            match decode(&bytes[read..], &mut ctx) {
                crate::stream::DecodeStatus::Finished(n) => {
                    read += n;
                    if ctx.is_complete() || ctx.creation_failed || ctx.syntax_error {
                        break;
                    }
                }
                _ => break,
            }
        }
        ctx
    }

    #[test]
    fn indefinite_array_of_two_uints() {
        let ctx = build(&[0x9f, 0x01, 0x02, 0xff]);
        assert!(!ctx.syntax_error);
        let root = ctx.root.expect("root item");
        match &*root {
            Item::ArrayIndefinite { items } => assert_eq!(items.len(), 2),
            other => panic!("expected indefinite array, got {other:?}"),
        }
    }

    #[test]
    fn indefinite_map_with_one_pair() {
        let ctx = build(&[0xbf, 0x61, 0x61, 0x01, 0xff]);
        assert!(!ctx.syntax_error);
        let root = ctx.root.expect("root item");
        match &*root {
            Item::MapIndefinite { pairs } => assert_eq!(pairs.len(), 1),
            other => panic!("expected indefinite map, got {other:?}"),
        }
    }

    #[test]
    fn break_with_no_open_container_is_syntax_error() {
        let ctx = build(&[0xff]);
        assert!(ctx.syntax_error);
        assert!(ctx.root.is_none());
    }

    #[test]
    fn odd_map_children_before_break_is_syntax_error() {
        // {_ "a": } -- break arrives while a key is pending.
        let ctx = build(&[0xbf, 0x61, 0x61, 0xff]);
        assert!(ctx.syntax_error);
    }

    #[test]
    fn empty_definite_array_completes_without_children() {
        let ctx = build(&[0x80]);
        assert!(!ctx.syntax_error);
        let root = ctx.root.expect("root item");
        match &*root {
            Item::ArrayDefinite { capacity, items } => {
                assert_eq!(*capacity, 0);
                assert_eq!(items.len(), 0);
            }
            other => panic!("expected empty definite array, got {other:?}"),
        }
    }

    #[test]
    fn tag_wraps_its_single_content_item() {
        let ctx = build(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]);
        assert!(!ctx.syntax_error);
        let root = ctx.root.expect("root item");
        match &*root {
            Item::Tag { tag, content } => {
                assert_eq!(*tag, 1);
                assert!(matches!(&**content, Item::Uint { value: 1363896240, .. }));
            }
            other => panic!("expected tag, got {other:?}"),
        }
    }
}
