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
use cbor_tree::driver::{load, load_with_max_depth};
use cbor_tree::error::ErrorCode;
use cbor_tree::item::{IntWidth, Item};

#[test]
fn uint_zero_width_one() {
    let item = load(&[0x00]).unwrap();
    assert!(matches!(&*item, Item::Uint { width: IntWidth::W1, value: 0 }));
}

#[test]
fn uint_width_eight_max_value() {
    let buf = [0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let item = load(&buf).unwrap();
    assert!(matches!(&*item, Item::Uint { width: IntWidth::W8, value } if *value == u64::MAX));
}

#[test]
fn negint_max_represents_minus_two_pow_64() {
    // `3b ff ff ff ff ff ff ff ff`: NEGINT width 8, value u64::MAX, representing -1 - u64::MAX.
    let buf = [0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let item = load(&buf).unwrap();
    assert!(matches!(&*item, Item::NegInt { width: IntWidth::W8, value } if *value == u64::MAX));
}

#[test]
fn indefinite_array_of_two_uints() {
    let item = load(&[0x9f, 0x01, 0x02, 0xff]).unwrap();
    match &*item {
        Item::ArrayIndefinite { items } => {
            assert_eq!(items.len(), 2);
            assert!(matches!(&*items[0], Item::Uint { value: 1, .. }));
            assert!(matches!(&*items[1], Item::Uint { value: 2, .. }));
        }
        other => panic!("unexpected item {other:?}"),
    }
}

#[test]
fn indefinite_map_with_one_pair() {
    let item = load(&[0xbf, 0x61, 0x61, 0x01, 0xff]).unwrap();
    match &*item {
        Item::MapIndefinite { pairs } => {
            assert_eq!(pairs.len(), 1);
            assert!(matches!(&*pairs[0].0, Item::StringDefinite { ref bytes, .. } if bytes.as_slice() == b"a"));
            assert!(matches!(&*pairs[0].1, Item::Uint { value: 1, .. }));
        }
        other => panic!("unexpected item {other:?}"),
    }
}

#[test]
fn tag_one_wraps_epoch_seconds() {
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
fn half_float_one_point_five() {
    use cbor_tree::item::FloatCtrl;
    let item = load(&[0xf9, 0x3e, 0x00]).unwrap();
    assert!(matches!(&*item, Item::FloatCtrl(FloatCtrl::Half(v)) if *v == 1.5));
}

#[test]
fn reserved_additional_info_is_malformed() {
    for ai in [0x1cu8, 0x1d, 0x1e] {
        let err = load(&[ai]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Malformed);
        assert_eq!(err.position, 0);
    }
}

#[test]
fn lone_break_is_syntax_error_at_zero() {
    let err = load(&[0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::SyntaxError);
    assert_eq!(err.position, 0);
}

#[test]
fn truncated_two_element_array_is_not_enough_data_at_two() {
    let err = load(&[0x82, 0x01]).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotEnoughData);
    assert_eq!(err.position, 2);
}

#[test]
fn empty_input_is_no_data_at_zero() {
    let err = load(&[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoData);
    assert_eq!(err.position, 0);
}

#[test]
fn every_truncation_point_of_a_tagged_array_fails_cleanly() {
    // `c1 82 01 02`: tag 1 wrapping a two-element array. Every proper prefix must fail with
    // either NotEnoughData or NoData, never panic or succeed.
    let full = [0xc1u8, 0x82, 0x01, 0x02];
    for n in 0..full.len() {
        let err = load(&full[..n]).unwrap_err();
        assert!(matches!(err.code, ErrorCode::NoData | ErrorCode::NotEnoughData));
    }
    assert!(load(&full).is_ok());
}

#[test]
fn wrong_major_type_chunk_in_indefinite_bytestring_is_syntax_error() {
    // `5f 01 ff`: indefinite bytestring containing a UINT chunk instead of a definite bytestring.
    let err = load(&[0x5f, 0x01, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::SyntaxError);
}

#[test]
fn break_outside_any_open_container_is_syntax_error() {
    // `82 01 ff`: array of 2 declared, but the second child slot is filled with a break instead
    // of a value. The array frame is definite (`Remaining::Count`), so the break cannot close it.
    let err = load(&[0x82, 0x01, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::SyntaxError);
}

#[test]
fn odd_map_children_before_break_is_syntax_error() {
    // `bf 61 61 ff`: indefinite map with a key and no matching value before the break.
    let err = load(&[0xbf, 0x61, 0x61, 0xff]).unwrap_err();
    assert_eq!(err.code, ErrorCode::SyntaxError);
}

#[test]
fn trailing_bytes_after_one_top_level_item_are_ignored() {
    let item = load(&[0x00, 0xff, 0xff, 0xff]).unwrap();
    assert!(matches!(&*item, Item::Uint { value: 0, .. }));
}

#[test]
fn nesting_deeper_than_max_depth_is_memory_error() {
    // 16 nested one-element arrays, each holding the next: `81 81 81 ... 00`.
    let mut buf = vec![0x81u8; 16];
    buf.push(0x00);
    let err = load_with_max_depth(&buf, 4).unwrap_err();
    assert_eq!(err.code, ErrorCode::MemoryError);
}

#[test]
fn nesting_within_max_depth_succeeds() {
    let mut buf = vec![0x81u8; 16];
    buf.push(0x00);
    let item = load_with_max_depth(&buf, 32).unwrap();
    let mut depth = 0;
    let mut current = item;
    loop {
        match &*current {
            Item::ArrayIndefinite { .. } => unreachable!(),
            Item::ArrayDefinite { items, .. } if items.len() == 1 => {
                depth += 1;
                let next = items[0].clone();
                current = next;
            }
            Item::Uint { value: 0, .. } => break,
            other => panic!("unexpected item {other:?}"),
        }
    }
    assert_eq!(depth, 16);
}
