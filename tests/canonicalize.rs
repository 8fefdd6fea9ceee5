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
use cbor_tree::copy::{copy, copy_definite};
use cbor_tree::driver::load;
use cbor_tree::item::{IntWidth, Item};

#[test]
fn copy_of_indefinite_bytestring_keeps_chunk_layout() {
    let original = load(&[0x5f, 0x42, 0xab, 0xcd, 0x41, 0xef, 0xff]).unwrap();
    let copied = copy(&original).unwrap();
    match &*copied {
        Item::ByteStringIndefinite { chunks } => {
            assert_eq!(chunks.len(), 2);
            assert!(matches!(&*chunks[0], Item::ByteStringDefinite { bytes } if bytes.as_slice() == [0xab, 0xcd]));
            assert!(matches!(&*chunks[1], Item::ByteStringDefinite { bytes } if bytes.as_slice() == [0xef]));
        }
        other => panic!("expected indefinite bytestring, got {other:?}"),
    }
}

#[test]
fn copy_definite_concatenates_indefinite_bytestring_chunks() {
    let original = load(&[0x5f, 0x42, 0xab, 0xcd, 0x41, 0xef, 0xff]).unwrap();
    let definite = copy_definite(&original).unwrap();
    match &*definite {
        Item::ByteStringDefinite { bytes } => assert_eq!(bytes.as_slice(), &[0xab, 0xcd, 0xef]),
        other => panic!("expected definite bytestring, got {other:?}"),
    }
}

#[test]
fn copy_definite_collapses_indefinite_array_to_its_current_length() {
    let original = load(&[0x9f, 0x01, 0x02, 0x03, 0xff]).unwrap();
    let definite = copy_definite(&original).unwrap();
    match &*definite {
        Item::ArrayDefinite { capacity, items } => {
            assert_eq!(*capacity, 3);
            assert_eq!(items.len(), 3);
        }
        other => panic!("expected definite array, got {other:?}"),
    }
}

#[test]
fn copy_definite_recurses_into_nested_containers() {
    // `81 9f 01 ff`: a definite array of 1 holding an indefinite array of 1 holding a UINT.
    let original = load(&[0x81, 0x9f, 0x01, 0xff]).unwrap();
    let definite = copy_definite(&original).unwrap();
    match &*definite {
        Item::ArrayDefinite { items, .. } => match &*items[0] {
            Item::ArrayDefinite { capacity, items: inner } => {
                assert_eq!(*capacity, 1);
                assert_eq!(inner.len(), 1);
            }
            other => panic!("expected inner array to become definite, got {other:?}"),
        },
        other => panic!("expected definite array, got {other:?}"),
    }
}

#[test]
fn copy_preserves_tag_and_int_width() {
    let original = load(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]).unwrap();
    let copied = copy(&original).unwrap();
    match &*copied {
        Item::Tag { tag, content } => {
            assert_eq!(*tag, 1);
            assert!(matches!(&**content, Item::Uint { width: IntWidth::W4, value: 1363896240 }));
        }
        other => panic!("expected tag, got {other:?}"),
    }
}

#[test]
fn copy_is_independent_of_the_original() {
    let original = load(&[0x82, 0x01, 0x02]).unwrap();
    let copied = copy(&original).unwrap();
    assert!(!std::rc::Rc::ptr_eq(&original, &copied));
}
