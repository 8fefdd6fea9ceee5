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
 * Stream Decoder
 *
 * Consumes exactly one CBOR data item head (plus, for definite strings, its inline payload) from
 * a byte slice and dispatches typed events to a `Callbacks` implementation. Does not recurse and
 * does not suspend: one call to `decode` handles one item head. Nested containers are driven by
 * repeated calls from the builder/driver, which keep an iterative stack instead of recursing, so
 * that nesting depth on untrusted input is bounded by a caller-supplied limit rather than the
 * Rust call stack.
 **************************************************************************************************/
use crate::bytes::{load_u16, load_u32, load_u64, load_u8};
use crate::constants::*;
use crate::item::IntWidth;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Outcome of one `decode` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeStatus {
    /// One full item head (and, for definite strings, its payload) was consumed. The `usize` is
    /// the number of bytes consumed from the start of the buffer.
    Finished(usize),
    /// The buffer ended before a complete head, argument, or definite string payload could be
    /// read. The caller may retry from the same offset once more bytes are available.
    NeedData,
    /// The first byte (or an indefinite-length/break marker on a major type that forbids it) is
    /// malformed: a reserved Additional Info value, or AI 31 on major type 0, 1, or 6.
    Error,
}

/// Receives one event per `decode` call. Implemented by the builder context. Width-specific
/// integer events are consolidated into a single method parameterized by [`IntWidth`] rather than
/// one callback per width (`uint8`/`uint16`/...), since the width is already carried as data.
pub trait Callbacks {
    fn uint(&mut self, width: IntWidth, value: u64);
    fn negint(&mut self, width: IntWidth, value: u64);
    fn byte_string(&mut self, bytes: &[u8]);
    fn byte_string_start(&mut self);
    fn string(&mut self, bytes: &[u8]);
    fn string_start(&mut self);
    fn array_start(&mut self, len: u64);
    fn indef_array_start(&mut self);
    fn map_start(&mut self, pairs: u64);
    fn indef_map_start(&mut self);
    fn tag(&mut self, value: u64);
    fn boolean(&mut self, value: bool);
    fn null(&mut self);
    fn undefined(&mut self);
    fn simple(&mut self, value: u8);
    #[cfg(feature = "float")]
    fn float2(&mut self, value: f32);
    #[cfg(feature = "float")]
    fn float4(&mut self, value: f32);
    #[cfg(feature = "float")]
    fn float8(&mut self, value: f64);
    fn indef_break(&mut self);
}

/// Read the AI 0..=27 argument following the initial byte. Returns `(width, value, consumed)`
/// where `consumed` includes the initial byte itself, or `None` if the buffer is too short.
/// `ai` must already be known not to be 28..=31.
fn read_argument(buf: &[u8], ai: u8) -> Option<(IntWidth, u64, usize)> {
    match ai {
        0..=AI_IMMEDIATE_MAX => Some((IntWidth::W1, ai as u64, 1)),
        AI_ONE_BYTE => (buf.len() >= 2).then(|| (IntWidth::W1, load_u8(buf, 1) as u64, 2)),
        AI_TWO_BYTES => (buf.len() >= 3).then(|| (IntWidth::W2, load_u16(buf, 1) as u64, 3)),
        AI_FOUR_BYTES => (buf.len() >= 5).then(|| (IntWidth::W4, load_u32(buf, 1) as u64, 5)),
        AI_EIGHT_BYTES => (buf.len() >= 9).then(|| (IntWidth::W8, load_u64(buf, 1) as u64, 9)),
        _ => None,
    }
}

/// Consume one data item head from `buf`, dispatching to `callbacks`. See the module doc for the
/// full dispatch table.
#[cfg_attr(feature = "trace", trace)]
pub fn decode<C: Callbacks>(buf: &[u8], callbacks: &mut C) -> DecodeStatus {
    if buf.is_empty() {
        return DecodeStatus::NeedData;
    }
    let (mt, ai) = split_initial_byte(buf[0]);
    if (AI_RESERVED_MIN..=AI_RESERVED_MAX).contains(&ai) {
        return DecodeStatus::Error;
    }

    if ai == AI_INDEFINITE {
        return match mt {
            MT_BYTESTRING => {
                callbacks.byte_string_start();
                DecodeStatus::Finished(1)
            }
            MT_STRING => {
                callbacks.string_start();
                DecodeStatus::Finished(1)
            }
            MT_ARRAY => {
                callbacks.indef_array_start();
                DecodeStatus::Finished(1)
            }
            MT_MAP => {
                callbacks.indef_map_start();
                DecodeStatus::Finished(1)
            }
            MT_FLOAT_CTRL => {
                callbacks.indef_break();
                DecodeStatus::Finished(1)
            }
            // MT 0, 1, 6: indefinite length / break makes no sense on an integer or tag.
            _ => DecodeStatus::Error,
        };
    }

    match mt {
        MT_UINT => match read_argument(buf, ai) {
            Some((width, value, consumed)) => {
                callbacks.uint(width, value);
                DecodeStatus::Finished(consumed)
            }
            None => DecodeStatus::NeedData,
        },
        MT_NEGINT => match read_argument(buf, ai) {
            Some((width, value, consumed)) => {
                callbacks.negint(width, value);
                DecodeStatus::Finished(consumed)
            }
            None => DecodeStatus::NeedData,
        },
        MT_BYTESTRING => decode_definite_payload(buf, ai, callbacks, false),
        MT_STRING => decode_definite_payload(buf, ai, callbacks, true),
        MT_ARRAY => match read_argument(buf, ai) {
            Some((_, len, consumed)) => {
                callbacks.array_start(len);
                DecodeStatus::Finished(consumed)
            }
            None => DecodeStatus::NeedData,
        },
        MT_MAP => match read_argument(buf, ai) {
            Some((_, pairs, consumed)) => {
                callbacks.map_start(pairs);
                DecodeStatus::Finished(consumed)
            }
            None => DecodeStatus::NeedData,
        },
        MT_TAG => match read_argument(buf, ai) {
            Some((_, value, consumed)) => {
                callbacks.tag(value);
                DecodeStatus::Finished(consumed)
            }
            None => DecodeStatus::NeedData,
        },
        MT_FLOAT_CTRL => decode_float_ctrl(buf, ai, callbacks),
        _ => unreachable!("major type is 3 bits, all 8 values are handled above"),
    }
}

/// MT 2/3 definite-length: read the length argument, then require that many inline payload
/// bytes be present, emitting the whole head+payload as one event.
fn decode_definite_payload<C: Callbacks>(buf: &[u8], ai: u8, callbacks: &mut C, is_text: bool) -> DecodeStatus {
    let (_, len, head_len) = match read_argument(buf, ai) {
        Some(v) => v,
        None => return DecodeStatus::NeedData,
    };
    let len = len as usize;
    let total = match head_len.checked_add(len) {
        Some(t) => t,
        // The declared length implies more data than any buffer could ever supply; treat it as
        // truncation rather than a malformed encoding.
        None => return DecodeStatus::NeedData,
    };
    if buf.len() < total {
        return DecodeStatus::NeedData;
    }
    let payload = &buf[head_len..total];
    if is_text {
        callbacks.string(payload);
    } else {
        callbacks.byte_string(payload);
    }
    DecodeStatus::Finished(total)
}

/// MT 7: simple values, booleans, null/undefined, and IEEE-754 floats.
fn decode_float_ctrl<C: Callbacks>(buf: &[u8], ai: u8, callbacks: &mut C) -> DecodeStatus {
    match ai {
        0..=19 => {
            callbacks.simple(ai);
            DecodeStatus::Finished(1)
        }
        SIMPLE_FALSE => {
            callbacks.boolean(false);
            DecodeStatus::Finished(1)
        }
        SIMPLE_TRUE => {
            callbacks.boolean(true);
            DecodeStatus::Finished(1)
        }
        SIMPLE_NULL => {
            callbacks.null();
            DecodeStatus::Finished(1)
        }
        SIMPLE_UNDEFINED => {
            callbacks.undefined();
            DecodeStatus::Finished(1)
        }
        AI_ONE_BYTE => {
            if buf.len() < 2 {
                return DecodeStatus::NeedData;
            }
            callbacks.simple(load_u8(buf, 1));
            DecodeStatus::Finished(2)
        }
        #[cfg(feature = "float")]
        AI_TWO_BYTES => {
            if buf.len() < 3 {
                return DecodeStatus::NeedData;
            }
            let bits = load_u16(buf, 1);
            callbacks.float2(half::f16::from_bits(bits).to_f32());
            DecodeStatus::Finished(3)
        }
        #[cfg(not(feature = "float"))]
        AI_TWO_BYTES => DecodeStatus::Error,
        #[cfg(feature = "float")]
        AI_FOUR_BYTES => {
            if buf.len() < 5 {
                return DecodeStatus::NeedData;
            }
            callbacks.float4(f32::from_bits(load_u32(buf, 1)));
            DecodeStatus::Finished(5)
        }
        #[cfg(not(feature = "float"))]
        AI_FOUR_BYTES => DecodeStatus::Error,
        #[cfg(feature = "float")]
        AI_EIGHT_BYTES => {
            if buf.len() < 9 {
                return DecodeStatus::NeedData;
            }
            callbacks.float8(f64::from_bits(load_u64(buf, 1)));
            DecodeStatus::Finished(9)
        }
        #[cfg(not(feature = "float"))]
        AI_EIGHT_BYTES => DecodeStatus::Error,
        _ => unreachable!("AI 28..=31 handled by the caller"),
    }
}
