// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Endpoint operations on stream values, and the four public entry points.
//!
//! These are the leaves every composite (sequence/array/constructed type)
//! streaming procedure decays to: aligned primitive transfer with byte
//! swapping, length-prefixed strings, and bit-bounded enums. Each shape has
//! four operations, one per stream mode; the generated switchboxes pick the
//! matching one at code-generation time.

use crate::endian::Endianness;
use crate::props::{get_type_props, BitBound, EntityProperties, PropertyTree};
use crate::status::{CdrError, SerializationStatus};
use crate::stream::{CdrStream, StreamMode, UNBOUNDED};

/// A fixed-width transfer primitive of the CDR wire formats.
pub trait CdrPrimitive: Copy + Default {
    const SIZE: usize;
    fn write_to(self, window: &mut [u8], endianness: Endianness);
    fn read_from(window: &[u8], endianness: Endianness) -> Self;
}

macro_rules! impl_cdr_primitive {
    ($($t:ty : $size:expr),*) => {$(
        impl CdrPrimitive for $t {
            const SIZE: usize = $size;

            fn write_to(self, window: &mut [u8], endianness: Endianness) {
                use crate::endian::{swap_necessary, ByteSwap};
                let value = if swap_necessary(endianness) { self.byte_swap() } else { self };
                window[..$size].copy_from_slice(&value.to_ne_bytes());
            }

            fn read_from(window: &[u8], endianness: Endianness) -> Self {
                use crate::endian::{swap_necessary, ByteSwap};
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(&window[..$size]);
                let value = <$t>::from_ne_bytes(bytes);
                if swap_necessary(endianness) { value.byte_swap() } else { value }
            }
        }
    )*};
}

impl_cdr_primitive!(u8:1, i8:1, u16:2, i16:2, u32:4, i32:4, u64:8, i64:8, f32:4, f64:8);

impl CdrPrimitive for bool {
    const SIZE: usize = 1;

    fn write_to(self, window: &mut [u8], _endianness: Endianness) {
        window[0] = u8::from(self);
    }

    fn read_from(window: &[u8], _endianness: Endianness) -> Self {
        window[0] != 0
    }
}

/// Read a primitive from the stream into `out`.
pub fn read_primitive<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, out: &mut T) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, false);
    if !state.inside_buffer(T::SIZE) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    let endianness = state.stream_endianness;
    match state.read_window(T::SIZE) {
        Some(window) => *out = T::read_from(window, endianness),
        None => {
            state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
            return;
        }
    }
    state.incr_position(T::SIZE);
}

/// Write a primitive to the stream.
pub fn write_primitive<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, value: T) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, true);
    if !state.inside_buffer(T::SIZE) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    let endianness = state.stream_endianness;
    match state.write_window(T::SIZE) {
        Some(window) => value.write_to(window, endianness),
        None => {
            state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
            return;
        }
    }
    state.incr_position(T::SIZE);
}

/// Move the cursor as a write of the value would.
pub fn move_primitive<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, _value: T) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, false);
    state.incr_position(T::SIZE);
}

/// Move the cursor by the maximum size of the primitive type.
pub fn max_primitive<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S) {
    move_primitive(streamer, T::default());
}

/// Read a contiguous block of primitives (fixed arrays, primitive
/// sequence bodies).
pub fn read_slice<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, out: &mut [T]) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, false);
    let total = T::SIZE * out.len();
    if !state.inside_buffer(total) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    let endianness = state.stream_endianness;
    match state.read_window(total) {
        Some(window) => {
            for (chunk, slot) in window.chunks_exact(T::SIZE).zip(out.iter_mut()) {
                *slot = T::read_from(chunk, endianness);
            }
        }
        None => {
            state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
            return;
        }
    }
    state.incr_position(total);
}

/// Write a contiguous block of primitives.
pub fn write_slice<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, values: &[T]) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, true);
    let total = T::SIZE * values.len();
    if !state.inside_buffer(total) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    let endianness = state.stream_endianness;
    match state.write_window(total) {
        Some(window) => {
            for (chunk, value) in window.chunks_exact_mut(T::SIZE).zip(values.iter()) {
                value.write_to(chunk, endianness);
            }
        }
        None => {
            state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
            return;
        }
    }
    state.incr_position(total);
}

/// Move the cursor as a write of `count` primitives would.
pub fn move_slice<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, count: usize) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let state = streamer.state_mut();
    state.align(T::SIZE, false);
    state.incr_position(T::SIZE * count);
}

/// Move the cursor by the maximum size of `count` primitives.
pub fn max_slice<'buf, S: CdrStream<'buf>, T: CdrPrimitive>(streamer: &mut S, count: usize) {
    move_slice::<S, T>(streamer, count);
}

/// Read a length-prefixed string. The wire length includes the terminating
/// NUL, which is stripped; a zero length never occurs in a valid stream.
/// `bound` 0 means unbounded.
pub fn read_string<'buf, S: CdrStream<'buf>>(streamer: &mut S, out: &mut String, bound: usize) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let mut string_length = 0u32;
    read_primitive(streamer, &mut string_length);
    if streamer.abort_status() {
        return;
    }
    if string_length == 0 && streamer.raise(SerializationStatus::ILLEGAL_FIELD_VALUE) {
        return;
    }
    if bound != 0
        && string_length as usize > bound + 1
        && streamer.raise(SerializationStatus::READ_BOUND_EXCEEDED)
    {
        return;
    }
    let state = streamer.state_mut();
    if !state.inside_buffer(string_length as usize) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    let chars = (string_length as usize).saturating_sub(1);
    let take = if bound != 0 { chars.min(bound) } else { chars };
    if let Some(window) = state.read_window(take) {
        out.clear();
        out.push_str(&String::from_utf8_lossy(window));
    }
    state.incr_position(string_length as usize);
    // strings leave the stream char-aligned
    state.set_alignment(1);
}

/// Write a length-prefixed string, including the terminating NUL.
pub fn write_string<'buf, S: CdrStream<'buf>>(streamer: &mut S, value: &str, bound: usize) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let string_length = value.len() + 1;
    if bound != 0
        && string_length > bound + 1
        && streamer.raise(SerializationStatus::WRITE_BOUND_EXCEEDED)
    {
        return;
    }
    write_primitive(streamer, string_length as u32);
    if streamer.abort_status() {
        return;
    }
    let state = streamer.state_mut();
    if !state.inside_buffer(string_length) {
        state.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
        return;
    }
    if let Some(window) = state.write_window(string_length) {
        window[..value.len()].copy_from_slice(value.as_bytes());
        window[value.len()] = 0;
    }
    state.incr_position(string_length);
    state.set_alignment(1);
}

/// Move the cursor as a write of the string would.
pub fn move_string<'buf, S: CdrStream<'buf>>(streamer: &mut S, value: &str, bound: usize) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    let string_length = value.len() + 1;
    if bound != 0
        && string_length > bound + 1
        && streamer.raise(SerializationStatus::MOVE_BOUND_EXCEEDED)
    {
        return;
    }
    move_primitive(streamer, 0u32);
    let state = streamer.state_mut();
    state.incr_position(string_length);
    state.set_alignment(1);
}

/// Move the cursor by the maximum size of a bounded string; an unbounded
/// string pins the position to [`UNBOUNDED`].
pub fn max_string<'buf, S: CdrStream<'buf>>(streamer: &mut S, bound: usize) {
    if streamer.abort_status() || streamer.position() == UNBOUNDED {
        return;
    }
    if bound == 0 {
        streamer.state_mut().set_position(UNBOUNDED);
        return;
    }
    max_primitive::<S, u32>(streamer);
    let state = streamer.state_mut();
    state.incr_position(bound + 1);
    state.set_alignment(1);
}

/// Implemented by generated code for every idl enum: the declared bit
/// bound and the wire conversion through the generated switch, with the
/// default enumerator catching unknown values.
pub trait CdrEnum: Copy + 'static {
    const BIT_BOUND: BitBound;
    fn to_wire(self) -> u32;
    fn from_wire(value: u32) -> Self;
}

/// Read an enum at the width the dialect assigns to its bit bound.
pub fn read_enum<'buf, S: CdrStream<'buf>, E: CdrEnum>(streamer: &mut S, out: &mut E) {
    let wire = match streamer.enum_width(E::BIT_BOUND) {
        BitBound::B8 => {
            let mut v = 0u8;
            read_primitive(streamer, &mut v);
            u32::from(v)
        }
        BitBound::B16 => {
            let mut v = 0u16;
            read_primitive(streamer, &mut v);
            u32::from(v)
        }
        BitBound::B64 => {
            let mut v = 0u64;
            read_primitive(streamer, &mut v);
            v as u32
        }
        _ => {
            let mut v = 0u32;
            read_primitive(streamer, &mut v);
            v
        }
    };
    if streamer.abort_status() {
        return;
    }
    *out = E::from_wire(wire);
}

/// Write an enum at the width the dialect assigns to its bit bound.
pub fn write_enum<'buf, S: CdrStream<'buf>, E: CdrEnum>(streamer: &mut S, value: E) {
    match streamer.enum_width(E::BIT_BOUND) {
        BitBound::B8 => write_primitive(streamer, value.to_wire() as u8),
        BitBound::B16 => write_primitive(streamer, value.to_wire() as u16),
        BitBound::B64 => write_primitive(streamer, u64::from(value.to_wire())),
        _ => write_primitive(streamer, value.to_wire()),
    }
}

/// Move the cursor as a write of the enum would.
pub fn move_enum<'buf, S: CdrStream<'buf>, E: CdrEnum>(streamer: &mut S, _value: E) {
    match streamer.enum_width(E::BIT_BOUND) {
        BitBound::B8 => move_primitive(streamer, 0u8),
        BitBound::B16 => move_primitive(streamer, 0u16),
        BitBound::B64 => move_primitive(streamer, 0u64),
        _ => move_primitive(streamer, 0u32),
    }
}

/// Move the cursor by the maximum size of the enum.
pub fn max_enum<'buf, S: CdrStream<'buf>, E: CdrEnum>(streamer: &mut S) {
    move_enum(streamer, E::from_wire(0));
}

/// Streaming procedures of a constructed type, instantiated per dialect by
/// the generic entry points below. Implementations come out of `xcdr-gen`.
pub trait Streamable: PropertyTree + Sized {
    fn stream_write<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    );

    fn stream_read<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &mut Self,
        props: &mut EntityProperties,
        as_key: bool,
    );

    fn stream_move<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    );

    fn stream_max<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    );
}

fn fault_result<'buf, S: CdrStream<'buf>>(streamer: &S) -> Result<(), CdrError> {
    if streamer.abort_status() {
        Err(CdrError::Faulted(streamer.status()))
    } else {
        Ok(())
    }
}

/// Serialize `instance` (or its key projection) into the stream's buffer.
pub fn write<'buf, S: CdrStream<'buf>, T: Streamable>(
    streamer: &mut S,
    instance: &T,
    as_key: bool,
) -> Result<(), CdrError> {
    let mut props = get_type_props::<T>();
    let state = streamer.state_mut();
    state.mode = StreamMode::Write;
    state.key = as_key;
    T::stream_write(streamer, instance, &mut props, as_key);
    fault_result(streamer)
}

/// Deserialize from the stream's buffer into `instance`. Reports
/// [`CdrError::Incomplete`] when the stream was well-formed but a
/// must-understand member of the type never arrived.
pub fn read<'buf, S: CdrStream<'buf>, T: Streamable>(
    streamer: &mut S,
    instance: &mut T,
    as_key: bool,
) -> Result<(), CdrError> {
    let mut props = get_type_props::<T>();
    let state = streamer.state_mut();
    state.mode = StreamMode::Read;
    state.key = as_key;
    T::stream_read(streamer, instance, &mut props, as_key);
    fault_result(streamer)?;
    if props.is_present {
        Ok(())
    } else {
        Err(CdrError::Incomplete)
    }
}

/// Move the cursor by the serialized size of `instance` without writing.
/// The position afterwards is the exact buffer size a write needs.
pub fn move_size<'buf, S: CdrStream<'buf>, T: Streamable>(
    streamer: &mut S,
    instance: &T,
    as_key: bool,
) -> Result<(), CdrError> {
    let mut props = get_type_props::<T>();
    let state = streamer.state_mut();
    state.mode = StreamMode::Move;
    state.key = as_key;
    T::stream_move(streamer, instance, &mut props, as_key);
    fault_result(streamer)
}

/// Move the cursor by the maximum serialized size of the type; the
/// position ends at [`UNBOUNDED`] when the type has unbounded members.
pub fn max_size<'buf, S: CdrStream<'buf>, T: Streamable>(
    streamer: &mut S,
    instance: &T,
    as_key: bool,
) -> Result<(), CdrError> {
    let mut props = get_type_props::<T>();
    let state = streamer.state_mut();
    state.mode = StreamMode::Max;
    state.key = as_key;
    T::stream_max(streamer, instance, &mut props, as_key);
    fault_result(streamer)
}
