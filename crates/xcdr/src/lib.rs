// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XTypes CDR serialization engine.
//!
//! Implements the three OMG XTypes wire dialects over a shared streaming
//! core:
//!
//! - **Basic CDR** ([`BasicCdrStream`]) - the legacy format, no evolution;
//! - **XCDR v1** ([`XcdrV1Stream`]) - parameter-list encoding for mutable
//!   types;
//! - **XCDR v2** ([`XcdrV2Stream`]) - delimited (DHEADER) and enhanced
//!   parameter-list (EMHEADER) encodings for appendable and mutable types.
//!
//! A value streams together with the *property tree* of its type
//! ([`EntityProperties`], produced by `xcdr-gen` and memoized through
//! [`get_type_props`]) in one of four modes: `read`, `write`, `move`
//! (sizing) and `max` (worst case sizing). The usual write sequence sizes
//! first, then replays against an exactly-sized buffer:
//!
//! ```ignore
//! let mut sizer = XcdrV2Stream::new(Endianness::LittleEndian);
//! xcdr::move_size(&mut sizer, &sample, false)?;
//! let mut buffer = vec![0u8; sizer.position()];
//! let mut writer = XcdrV2Stream::new(Endianness::LittleEndian);
//! writer.set_buffer(&mut buffer);
//! xcdr::write(&mut writer, &sample, false)?;
//! ```
//!
//! Faults accumulate in a status bitmask on the stream; an aborted stream
//! turns every further operation into a no-op and the entry points report
//! the word as [`CdrError`].

pub mod basic;
pub mod endian;
pub mod ops;
pub mod props;
pub mod status;
pub mod stream;
pub mod xcdr1;
pub mod xcdr2;

pub use basic::BasicCdrStream;
pub use endian::{swap_necessary, ByteSwap, Endianness};
pub use ops::{max_size, move_size, read, write, CdrEnum, CdrPrimitive, Streamable};
pub use props::{
    get_type_props, BitBound, EntityProperties, Extensibility, MemberListType, PropertyTree,
};
pub use status::{CdrError, SerializationStatus};
pub use stream::{CdrStream, Entity, StreamMode, StreamState, UNBOUNDED};
pub use xcdr1::XcdrV1Stream;
pub use xcdr2::XcdrV2Stream;
