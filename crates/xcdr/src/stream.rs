// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream base: cursor, alignment and status bookkeeping shared by the
//! three dialect streams, plus the [`CdrStream`] trait the generated
//! switchboxes drive.
//!
//! Buffers are borrowed from the caller and never reallocated. Sizing a
//! write is done by running the same procedure in move mode first, then
//! replaying in write mode against a buffer of exactly `position()` bytes.

use crate::endian::Endianness;
use crate::props::{BitBound, EntityProperties, MemberListType};
use crate::status::SerializationStatus;

/// The position value marking an unbounded maximum size.
pub const UNBOUNDED: usize = usize::MAX;

/// Type of streaming operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    #[default]
    Read,
    Write,
    /// Move the cursor as a write would, without touching a buffer.
    Move,
    /// Move the cursor by the maximum amount possible for the type.
    Max,
}

/// Borrowed byte buffer a stream operates on.
#[derive(Default)]
enum StreamBuffer<'buf> {
    #[default]
    None,
    Reading(&'buf [u8]),
    Writing(&'buf mut [u8]),
}

/// Cursor over one member list, kept on the iterator stack while a struct
/// level is being walked.
#[derive(Debug, Clone, Copy)]
struct IterCursor {
    list: MemberListType,
    index: usize,
}

/// Entity handed to a switchbox by [`CdrStream::next_entity`].
pub enum Entity {
    /// A member of the property tree, addressed by list and index.
    Member(MemberListType, usize),
    /// A member header read from the stream that matches nothing in the
    /// tree; carries the parsed header fields.
    Unknown(EntityProperties),
}

/// State shared by every stream implementation.
pub struct StreamState<'buf> {
    pub stream_endianness: Endianness,
    pub local_endianness: Endianness,
    position: usize,
    max_alignment: usize,
    current_alignment: usize,
    buffer: StreamBuffer<'buf>,
    buffer_size: usize,
    status: SerializationStatus,
    fault_mask: u64,
    pub mode: StreamMode,
    pub key: bool,
    stack: Vec<IterCursor>,
}

impl<'buf> StreamState<'buf> {
    /// `ignore_faults` masks status flags that should not abort the stream.
    pub fn new(endianness: Endianness, max_alignment: usize, ignore_faults: u64) -> Self {
        Self {
            stream_endianness: endianness,
            local_endianness: Endianness::native(),
            position: 0,
            max_alignment,
            current_alignment: 0,
            buffer: StreamBuffer::None,
            buffer_size: 0,
            status: SerializationStatus::empty(),
            fault_mask: !ignore_faults,
            mode: StreamMode::Read,
            key: false,
            stack: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Moves the cursor unless a maximum-size pass already pinned it.
    pub fn incr_position(&mut self, by: usize) {
        if self.position != UNBOUNDED {
            self.position += by;
        }
    }

    pub fn alignment(&self) -> usize {
        self.current_alignment
    }

    pub fn set_alignment(&mut self, alignment: usize) {
        self.current_alignment = alignment;
    }

    pub fn max_alignment(&self) -> usize {
        self.max_alignment
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Attach a writable buffer; position, alignment, status and the
    /// iterator stack are reset since they belong to the previous buffer.
    pub fn set_buffer(&mut self, buffer: &'buf mut [u8]) {
        self.buffer_size = buffer.len();
        self.buffer = StreamBuffer::Writing(buffer);
        self.reset();
    }

    /// Attach a read-only buffer.
    pub fn set_input(&mut self, buffer: &'buf [u8]) {
        self.buffer_size = buffer.len();
        self.buffer = StreamBuffer::Reading(buffer);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.current_alignment = 0;
        self.status = SerializationStatus::empty();
        self.stack.clear();
    }

    pub fn reset_position(&mut self) {
        self.reset();
    }

    pub fn status(&self) -> SerializationStatus {
        self.status
    }

    /// Add a fault to the status word; returns whether the stream is now
    /// aborted.
    pub fn raise(&mut self, fault: SerializationStatus) -> bool {
        self.status |= fault;
        self.abort_status()
    }

    /// True once a non-ignored fault was raised; every streaming function
    /// is a no-op from then on.
    pub fn abort_status(&self) -> bool {
        (self.status.0 & self.fault_mask) != 0
    }

    pub fn swap_endianness(&self) -> bool {
        self.stream_endianness != self.local_endianness
    }

    pub fn inside_buffer(&self, n_bytes: usize) -> bool {
        self.position != UNBOUNDED && self.position.saturating_add(n_bytes) <= self.buffer_size
    }

    /// Align the cursor to `new_alignment` (capped at the dialect maximum),
    /// zero-filling the padding when requested and a buffer is attached.
    /// No-op when the stream is already at that alignment. Returns the
    /// number of padding bytes inserted.
    pub fn align(&mut self, new_alignment: usize, add_zeroes: bool) -> usize {
        if self.current_alignment == new_alignment || self.position == UNBOUNDED {
            return 0;
        }
        self.current_alignment = new_alignment.min(self.max_alignment).max(1);

        let to_move =
            (self.current_alignment - self.position % self.current_alignment) % self.current_alignment;
        if to_move > 0 {
            if add_zeroes {
                if let StreamBuffer::Writing(buffer) = &mut self.buffer {
                    let from = self.position.min(buffer.len());
                    let to = (self.position + to_move).min(buffer.len());
                    buffer[from..to].fill(0);
                }
            }
            self.position += to_move;
        }
        to_move
    }

    /// Bytes at the cursor, for reading. `None` when no buffer is attached
    /// or the window runs past its end.
    pub fn read_window(&self, len: usize) -> Option<&[u8]> {
        let bytes: &[u8] = match &self.buffer {
            StreamBuffer::None => return None,
            StreamBuffer::Reading(b) => b,
            StreamBuffer::Writing(b) => b,
        };
        bytes.get(self.position..self.position.checked_add(len)?)
    }

    /// Bytes at the cursor, for writing.
    pub fn write_window(&mut self, len: usize) -> Option<&mut [u8]> {
        let end = self.position.checked_add(len)?;
        match &mut self.buffer {
            StreamBuffer::Writing(b) => b.get_mut(self.position..end),
            _ => None,
        }
    }

    /// Patch an already-written 32-bit word at an absolute offset, in the
    /// stream's endianness. Used to complete header length fields. Without
    /// a writable buffer (move/max passes) this does nothing.
    pub fn patch_u32(&mut self, at: usize, value: u32) {
        let bytes = match self.stream_endianness {
            Endianness::LittleEndian => value.to_le_bytes(),
            Endianness::BigEndian => value.to_be_bytes(),
        };
        if let StreamBuffer::Writing(buffer) = &mut self.buffer {
            if let Some(window) = buffer.get_mut(at..at + 4) {
                window.copy_from_slice(&bytes);
            }
        }
    }

    /// Advance past an entity using the size taken from its header and
    /// invalidate the alignment cache.
    pub fn skip_entity(&mut self, prop: &EntityProperties) {
        self.incr_position(prop.e_sz as usize);
        self.current_alignment = 0;
    }

    /// Member payload start bookkeeping.
    pub fn record_member_start(&mut self, prop: &mut EntityProperties) {
        prop.e_off = self.position;
        prop.is_present = true;
    }

    /// Struct body start bookkeeping.
    pub fn record_struct_start(&mut self, props: &mut EntityProperties) {
        props.is_present = true;
        props.d_off = self.position;
    }

    /// On read, jump over the remainder of a member that was not (fully)
    /// consumed, using the header size.
    pub fn go_to_next_member(&mut self, prop: &EntityProperties) {
        if prop.e_sz > 0 && self.mode == StreamMode::Read {
            self.position = prop.e_off + prop.e_sz as usize;
            self.current_alignment = 0;
        }
    }

    /// Iterate one member list of `props`. The first call pushes a cursor
    /// for the list on the stack; subsequent calls advance it. Returns the
    /// index of the current entry; reaching the final entry pops the
    /// cursor and returns its index.
    pub fn next_prop(
        &mut self,
        props: &EntityProperties,
        list: MemberListType,
        firstcall: &mut bool,
    ) -> usize {
        if *firstcall {
            self.stack.push(IterCursor { list, index: 0 });
            *firstcall = false;
        } else if let Some(top) = self.stack.last_mut() {
            if !props.list(top.list)[top.index].is_final() {
                top.index += 1;
            }
        }

        let index = self.stack.last().map(|top| top.index).unwrap_or(0);
        if props.list(list)[index].is_final() {
            self.stack.pop();
        }
        index
    }

    /// Pop the iterator cursor early, when a dialect ends the walk before
    /// the final entry is reached (delimited and parameter-list reads).
    pub fn pop_cursor(&mut self) {
        self.stack.pop();
    }

    /// For read passes of mutable structs the wire drives the walk instead
    /// of the member list; the stack still tracks the nesting level so
    /// `reset` unwinds cleanly.
    pub fn push_wire_cursor(&mut self) {
        self.stack.push(IterCursor {
            list: MemberListType::MembersById,
            index: 0,
        });
    }

    /// Read-mode struct completeness: an aborted stream, or any member of
    /// the given list that is must-understand but never arrived, marks the
    /// whole struct absent.
    pub fn check_struct_completeness(
        &mut self,
        props: &mut EntityProperties,
        list: MemberListType,
    ) {
        if self.mode != StreamMode::Read {
            return;
        }
        if self.abort_status() {
            props.is_present = false;
            return;
        }
        let incomplete = props
            .list(list)
            .iter()
            .filter(|m| !m.is_final())
            .any(|m| m.must_understand_local && !m.is_present);
        if incomplete {
            log::debug!(
                "struct incomplete: a must-understand member never arrived (m_id set: {:?})",
                props
                    .list(list)
                    .iter()
                    .filter(|m| !m.is_final() && !m.is_present)
                    .map(|m| m.m_id)
                    .collect::<Vec<_>>()
            );
            props.is_present = false;
        }
    }
}

/// Contract between generated streaming procedures and a dialect stream.
///
/// Implementations interpose on struct entry/exit and on every member to
/// emit or parse the dialect's headers. Dispatch is compile-time generic:
/// the generated code is instantiated once per (type, dialect) pair.
pub trait CdrStream<'buf> {
    fn state(&self) -> &StreamState<'buf>;
    fn state_mut(&mut self) -> &mut StreamState<'buf>;

    /// Actions on entering a constructed type (delimiters, bookkeeping).
    fn start_struct(&mut self, props: &mut EntityProperties, mode: StreamMode, as_key: bool);

    /// Actions on leaving a constructed type (delimiter patching, sentinel
    /// emission, completeness checking).
    fn finish_struct(&mut self, props: &mut EntityProperties, mode: StreamMode, as_key: bool);

    /// Actions before a member's payload (member headers, presence flags).
    fn start_member(&mut self, prop: &mut EntityProperties, mode: StreamMode, present: bool);

    /// Actions after a member's payload (length patching, absent-member
    /// recovery).
    fn finish_member(&mut self, prop: &mut EntityProperties, mode: StreamMode, present: bool);

    /// The next entity to operate on, or `None` when the current level is
    /// exhausted.
    fn next_entity(
        &mut self,
        props: &mut EntityProperties,
        as_key: bool,
        mode: StreamMode,
        firstcall: &mut bool,
    ) -> Option<Entity>;

    /// Width used to marshal an enum with the given declared bit bound.
    /// Basic CDR flattens every enum to 32 bits; the XCDR dialects honor
    /// the bound except in key mode.
    fn enum_width(&self, declared: BitBound) -> BitBound;

    fn skip_entity(&mut self, prop: &EntityProperties) {
        self.state_mut().skip_entity(prop);
    }

    /// Attach the buffer a write pass fills.
    fn set_buffer(&mut self, buffer: &'buf mut [u8]) {
        self.state_mut().set_buffer(buffer);
    }

    /// Attach the buffer a read pass consumes.
    fn set_input(&mut self, buffer: &'buf [u8]) {
        self.state_mut().set_input(buffer);
    }

    fn position(&self) -> usize {
        self.state().position()
    }

    fn alignment(&self) -> usize {
        self.state().alignment()
    }

    fn status(&self) -> SerializationStatus {
        self.state().status()
    }

    fn raise(&mut self, fault: SerializationStatus) -> bool {
        self.state_mut().raise(fault)
    }

    fn abort_status(&self) -> bool {
        self.state().abort_status()
    }

    fn reset_position(&mut self) {
        self.state_mut().reset_position();
    }
}
