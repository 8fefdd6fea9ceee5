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
 * cbor_tree wire-format constants
 *
 * Major Type / Additional Information layout of the CBOR initial byte (RFC 8949 §3).
 **************************************************************************************************/

/// Major Type bitmask (top 3 bits of the initial byte).
pub const MT_MASK: u8 = 0b111_00000;
/// Additional Information bitmask (low 5 bits of the initial byte).
pub const AI_MASK: u8 = 0b000_11111;
/// Number of bits the Major Type is shifted by in the initial byte.
pub const MT_SHIFT: u8 = 5;

/// Major Type 0: unsigned integer.
pub const MT_UINT: u8 = 0;
/// Major Type 1: negative integer.
pub const MT_NEGINT: u8 = 1;
/// Major Type 2: byte string.
pub const MT_BYTESTRING: u8 = 2;
/// Major Type 3: text string.
pub const MT_STRING: u8 = 3;
/// Major Type 4: array.
pub const MT_ARRAY: u8 = 4;
/// Major Type 5: map.
pub const MT_MAP: u8 = 5;
/// Major Type 6: tag.
pub const MT_TAG: u8 = 6;
/// Major Type 7: floating point / simple / control values.
pub const MT_FLOAT_CTRL: u8 = 7;

/// AI 0..=23 is an immediate value equal to the AI itself.
pub const AI_IMMEDIATE_MAX: u8 = 23;
/// AI 24: a following 1-byte big-endian unsigned integer carries the value.
pub const AI_ONE_BYTE: u8 = 24;
/// AI 25: a following 2-byte big-endian unsigned integer carries the value.
pub const AI_TWO_BYTES: u8 = 25;
/// AI 26: a following 4-byte big-endian unsigned integer carries the value.
pub const AI_FOUR_BYTES: u8 = 26;
/// AI 27: a following 8-byte big-endian unsigned integer carries the value.
pub const AI_EIGHT_BYTES: u8 = 27;
/// AI 28..=30 is reserved; any first byte encoding it is malformed.
pub const AI_RESERVED_MIN: u8 = 28;
pub const AI_RESERVED_MAX: u8 = 30;
/// AI 31: indefinite-length marker (MT 2-5), or the "break" stop code (MT 7).
pub const AI_INDEFINITE: u8 = 31;

/// Simple value 20: `false`.
pub const SIMPLE_FALSE: u8 = 20;
/// Simple value 21: `true`.
pub const SIMPLE_TRUE: u8 = 21;
/// Simple value 22: `null`.
pub const SIMPLE_NULL: u8 = 22;
/// Simple value 23: `undefined`.
pub const SIMPLE_UNDEFINED: u8 = 23;

/// Default maximum nesting depth for the builder stack. Chosen generously for realistic
/// protocol use while still bounding recursion on adversarial input; callers that need a
/// tighter bound should call [`crate::driver::load_with_max_depth`] directly.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Split an initial byte into its Major Type (0..=7) and Additional Info (0..=31).
#[inline]
pub fn split_initial_byte(b: u8) -> (u8, u8) {
    ((b & MT_MASK) >> MT_SHIFT, b & AI_MASK)
}
