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
 * Byte Loaders
 *
 * Pure functions over `(buffer, offset)` returning a fixed-width big-endian value. Callers (the
 * stream decoder) must pre-validate that `offset + width <= buffer.len()`; these functions do not
 * bounds-check.
 **************************************************************************************************/
#[cfg(feature = "float")]
use half::f16;

/// Read a big-endian `u8` at `offset`. Width 1.
#[inline]
pub fn load_u8(buf: &[u8], offset: usize) -> u8 {
    buf[offset]
}

/// Read a big-endian `u16` at `offset`. Width 2.
#[inline]
pub fn load_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

/// Read a big-endian `u32` at `offset`. Width 4.
#[inline]
pub fn load_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Read a big-endian `u64` at `offset`. Width 8.
#[inline]
pub fn load_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

/// Decode an IEEE-754 binary16 (half-precision) value at `offset`. Sign, 5-bit biased exponent
/// (bias 15), 10-bit mantissa; subnormals and infinities follow the standard expansion via the
/// `half` crate.
#[cfg(feature = "float")]
#[inline]
pub fn load_f16(buf: &[u8], offset: usize) -> f32 {
    f16::from_be_bytes([buf[offset], buf[offset + 1]]).to_f32()
}

/// Decode an IEEE-754 binary32 (single-precision) value at `offset`.
#[cfg(feature = "float")]
#[inline]
pub fn load_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_be_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Decode an IEEE-754 binary64 (double-precision) value at `offset`.
#[cfg(feature = "float")]
#[inline]
pub fn load_f64(buf: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    f64::from_be_bytes(bytes)
}
