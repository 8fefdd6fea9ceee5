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
 * Loader Driver
 *
 * Repeatedly invokes the stream decoder over the remaining input, feeding events to a builder
 * context, until either a root item is complete or an error condition is reached.
 **************************************************************************************************/
use crate::builder::BuilderContext;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::{ErrorCode, LoadError, Result};
use crate::item::ItemRef;
use crate::stream::{decode, DecodeStatus};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Parse exactly one top-level CBOR data item from `source`, returning the root item or a
/// structured error with the byte offset at which parsing stopped. Trailing bytes after the one
/// top-level item are ignored: this is not a CBOR Sequences decoder.
#[cfg_attr(feature = "trace", trace)]
pub fn load(source: &[u8]) -> Result<ItemRef> {
    load_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// As [`load`], but with an explicit bound on container nesting depth: a maximum-depth guard is
/// a cheap way to reject adversarially nested input without limiting legitimate protocol use.
pub fn load_with_max_depth(source: &[u8], max_depth: usize) -> Result<ItemRef> {
    if source.is_empty() {
        return Err(LoadError::new(ErrorCode::NoData, 0));
    }

    let mut context = BuilderContext::new(max_depth);
    let mut read: usize = 0;

    loop {
        if read >= source.len() {
            return Err(LoadError::new(ErrorCode::NotEnoughData, read));
        }
        let start = read;
        match decode(&source[read..], &mut context) {
            DecodeStatus::Finished(n) => {
                read += n;

                // Builder-level failures are reported at the offset where the offending event
                // began, not where it ended: a lone `break` (one byte) that has no open
                // container to close is a syntax error "at" that break, not past it.
                if context.creation_failed {
                    return Err(LoadError::new(ErrorCode::MemoryError, start));
                }
                if context.syntax_error {
                    return Err(LoadError::new(ErrorCode::SyntaxError, start));
                }
                if context.is_complete() {
                    // context.root is dropped along with context's stack (already empty here);
                    // take it out first so it survives past that point.
                    return Ok(context.root.take().expect("is_complete implies root is Some"));
                }
            }
            DecodeStatus::NeedData => return Err(LoadError::new(ErrorCode::NotEnoughData, read)),
            DecodeStatus::Error => return Err(LoadError::new(ErrorCode::Malformed, read)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{IntWidth, Item};

    #[test]
    fn empty_input_is_no_data() {
        let err = load(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoData);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn uint_zero() {
        let item = load(&[0x00]).unwrap();
        assert!(matches!(&*item, Item::Uint { width: IntWidth::W1, value: 0 }));
    }

    #[test]
    fn uint_width8_max_reads_nine_bytes() {
        let buf = [0x1bu8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let item = load(&buf).unwrap();
        assert!(matches!(&*item, Item::Uint { width: IntWidth::W8, value } if *value == u64::MAX));
    }

    #[test]
    fn indefinite_array_roundtrip() {
        let item = load(&[0x9f, 0x01, 0x02, 0xff]).unwrap();
        match &*item {
            Item::ArrayIndefinite { items } => assert_eq!(items.len(), 2),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn tag_one_epoch_seconds() {
        let item = load(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]).unwrap();
        match &*item {
            Item::Tag { tag, content } => {
                assert_eq!(*tag, 1);
                assert!(matches!(&**content, Item::Uint { value: 1363896240, .. }));
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[cfg(feature = "float")]
    #[test]
    fn float_one_point_five() {
        use crate::item::FloatCtrl;
        let item = load(&[0xf9, 0x3e, 0x00]).unwrap();
        assert!(matches!(&*item, Item::FloatCtrl(FloatCtrl::Half(v)) if *v == 1.5));
    }

    #[test]
    fn reserved_ai_is_malformed_at_position_zero() {
        let err = load(&[0x1f]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Malformed);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn lone_break_is_syntax_error() {
        let err = load(&[0xff]).unwrap_err();
        assert_eq!(err.code, ErrorCode::SyntaxError);
        assert_eq!(err.position, 0);
    }

    #[test]
    fn truncated_array_is_not_enough_data_at_two() {
        // `82 01`: array of 2 items, but only one is present.
        let err = load(&[0x82, 0x01]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotEnoughData);
        assert_eq!(err.position, 2);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let item = load(&[0x00, 0xff, 0xff]).unwrap();
        assert!(matches!(&*item, Item::Uint { value: 0, .. }));
    }
}
