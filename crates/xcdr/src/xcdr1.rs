// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XCDR version 1: parameter-list encoding for mutable types.
//!
//! Final and appendable structs stream like basic CDR. Mutable structs
//! precede every member with a 32-bit PL header `(flags|pid) << 16 | length`
//! and close with a sentinel header; members whose size the bit bound does
//! not pin (strings, sequences, nested types) use the extended header form,
//! whose length field is patched once the payload size is known. Optional
//! members of final/appendable structs are gated by the same 4-byte header,
//! with length 0 marking absence.
//!
//! The alignment cache is invalidated after every header: lengths taken
//! from headers may move the cursor to positions the cache knows nothing
//! about, and padding is always recomputed from the absolute offset.

use crate::ops::{move_primitive, read_primitive, write_primitive};
use crate::props::{BitBound, EntityProperties, Extensibility, MemberListType};
use crate::status::SerializationStatus;
use crate::stream::{CdrStream, Entity, StreamMode, StreamState};
use crate::Endianness;

/// Short-header pid announcing the 8-byte extended header form.
const PID_EXTENDED: u16 = 0x3F01;
/// Short-header pid closing a parameter list.
const PID_LIST_END: u16 = 0x3F02;
/// Must-understand flag in the short-header pid field.
const PID_FLAG_MUST_UNDERSTAND: u16 = 0x4000;
/// Pid bits that are not flags.
const PID_MASK: u16 = 0x3FFF;
/// First pid value that no longer fits the short form.
const PID_SHORT_LIMIT: u32 = 0x3F00;
/// Must-understand flag in the extended header id word.
const EXTENDED_FLAG_MUST_UNDERSTAND: u32 = 0x4000_0000;
/// Member id bits of the extended header id word.
const EXTENDED_ID_MASK: u32 = 0x0FFF_FFFF;

pub struct XcdrV1Stream<'buf> {
    state: StreamState<'buf>,
}

impl<'buf> XcdrV1Stream<'buf> {
    pub fn new(endianness: Endianness) -> Self {
        Self::with_ignored_faults(endianness, 0)
    }

    /// `ignore_faults` masks status flags that should not abort the stream.
    pub fn with_ignored_faults(endianness: Endianness, ignore_faults: u64) -> Self {
        Self {
            state: StreamState::new(endianness, 8, ignore_faults),
        }
    }

    /// Whether the member's header can carry its length immediately: the
    /// bit bound pins the payload size and the id fits the short pid field.
    fn short_form(prop: &EntityProperties) -> bool {
        prop.e_bb.bytes() > 0 && prop.m_id < PID_SHORT_LIMIT
    }

    /// Emit (or move over) the member header for a present member.
    fn put_member_header(&mut self, prop: &mut EntityProperties, mode: StreamMode) {
        if Self::short_form(prop) {
            if mode == StreamMode::Write {
                // length covers the padding up to the payload as well
                self.state.align(4, true);
                let size = prop.e_bb.bytes();
                let payload_at = self.state.position() + 4;
                let payload_align = size.min(self.state.max_alignment());
                let pad = (payload_align - payload_at % payload_align) % payload_align;
                let mut pid = prop.m_id as u16;
                if prop.must_understand {
                    pid |= PID_FLAG_MUST_UNDERSTAND;
                }
                let header = (u32::from(pid) << 16) | (pad + size) as u32;
                write_primitive(self, header);
            } else {
                move_primitive(self, 0u32);
            }
        } else if mode == StreamMode::Write {
            let short = (u32::from(PID_EXTENDED | PID_FLAG_MUST_UNDERSTAND) << 16) | 8;
            write_primitive(self, short);
            let mut id_word = prop.m_id & EXTENDED_ID_MASK;
            if prop.must_understand {
                id_word |= EXTENDED_FLAG_MUST_UNDERSTAND;
            }
            write_primitive(self, id_word);
            // length patched in finish_member once the payload is streamed
            write_primitive(self, 0u32);
        } else {
            move_primitive(self, 0u32);
            move_primitive(self, 0u32);
            move_primitive(self, 0u32);
        }
        prop.e_off = self.state.position();
        prop.is_present = true;
        self.state.set_alignment(0);
    }

    /// Emit a zero-length gate header for an absent optional member.
    fn put_absent_header(&mut self, prop: &mut EntityProperties, mode: StreamMode) {
        if mode == StreamMode::Write {
            let mut pid = prop.m_id as u16;
            if prop.must_understand {
                pid |= PID_FLAG_MUST_UNDERSTAND;
            }
            write_primitive(self, u32::from(pid) << 16);
        } else {
            move_primitive(self, 0u32);
        }
        prop.e_off = self.state.position();
        prop.is_present = false;
        self.state.set_alignment(0);
    }

    /// Parse the gate header of an optional member in a final/appendable
    /// struct; presence is a nonzero length.
    fn read_optional_header(&mut self, prop: &mut EntityProperties) {
        let mut header = 0u32;
        read_primitive(self, &mut header);
        if self.abort_status() {
            return;
        }
        let pid_raw = (header >> 16) as u16;
        let mut length = header & 0xFFFF;
        let mut id = u32::from(pid_raw & PID_MASK);
        if pid_raw & PID_MASK == PID_EXTENDED {
            if length != 8 {
                self.raise(SerializationStatus::INVALID_PL_ENTRY);
                return;
            }
            let mut id_word = 0u32;
            read_primitive(self, &mut id_word);
            let mut extended_length = 0u32;
            read_primitive(self, &mut extended_length);
            if self.abort_status() {
                return;
            }
            id = id_word & EXTENDED_ID_MASK;
            length = extended_length;
        }
        if id != prop.m_id {
            log::debug!("optional gate header id {} does not match member {}", id, prop.m_id);
            self.raise(SerializationStatus::INVALID_PL_ENTRY);
            return;
        }
        prop.e_sz = length;
        prop.is_present = length > 0;
        prop.e_off = self.state.position();
        self.state.set_alignment(0);
    }

    /// Read the next PL header of a mutable struct and resolve it against
    /// the member-id ordering.
    fn next_pl_entity(&mut self, props: &mut EntityProperties) -> Option<Entity> {
        let mut header = 0u32;
        read_primitive(self, &mut header);
        if self.abort_status() {
            return None;
        }
        let pid_raw = (header >> 16) as u16;
        let short_length = header & 0xFFFF;
        let pid = pid_raw & PID_MASK;
        self.state.set_alignment(0);

        if pid == PID_LIST_END {
            return None;
        }

        let (id, must_understand, length) = if pid == PID_EXTENDED {
            if short_length != 8 {
                self.raise(SerializationStatus::INVALID_PL_ENTRY);
                return None;
            }
            let mut id_word = 0u32;
            read_primitive(self, &mut id_word);
            let mut extended_length = 0u32;
            read_primitive(self, &mut extended_length);
            if self.abort_status() {
                return None;
            }
            self.state.set_alignment(0);
            (
                id_word & EXTENDED_ID_MASK,
                id_word & EXTENDED_FLAG_MUST_UNDERSTAND != 0,
                extended_length,
            )
        } else {
            (
                u32::from(pid),
                pid_raw & PID_FLAG_MUST_UNDERSTAND != 0,
                short_length,
            )
        };

        let found = props
            .members_by_id
            .iter()
            .position(|m| !m.is_final() && m.m_id == id);
        match found {
            Some(index) => {
                let member = &mut props.members_by_id[index];
                member.e_sz = length;
                member.e_off = self.state.position();
                member.is_present = !member.is_optional || length > 0;
                Some(Entity::Member(MemberListType::MembersById, index))
            }
            None => Some(Entity::Unknown(EntityProperties {
                m_id: id,
                must_understand,
                e_sz: length,
                ..EntityProperties::default()
            })),
        }
    }
}

impl<'buf> CdrStream<'buf> for XcdrV1Stream<'buf> {
    fn state(&self) -> &StreamState<'buf> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState<'buf> {
        &mut self.state
    }

    fn start_struct(&mut self, props: &mut EntityProperties, _mode: StreamMode, _as_key: bool) {
        self.state.record_struct_start(props);
    }

    fn finish_struct(&mut self, props: &mut EntityProperties, mode: StreamMode, as_key: bool) {
        if props.e_ext == Extensibility::Mutable && !as_key && mode != StreamMode::Read {
            if mode == StreamMode::Write {
                write_primitive(
                    self,
                    u32::from(PID_LIST_END | PID_FLAG_MUST_UNDERSTAND) << 16,
                );
            } else {
                move_primitive(self, 0u32);
            }
            self.state.set_alignment(0);
        }
        let list = if as_key {
            MemberListType::Keys
        } else if props.e_ext == Extensibility::Mutable {
            MemberListType::MembersById
        } else {
            MemberListType::MembersBySeq
        };
        self.state.check_struct_completeness(props, list);
    }

    fn start_member(&mut self, prop: &mut EntityProperties, mode: StreamMode, present: bool) {
        match mode {
            StreamMode::Read => {
                if prop.p_ext == Extensibility::Mutable {
                    // header handled in next_entity
                } else if prop.is_optional {
                    self.read_optional_header(prop);
                } else {
                    self.state.record_member_start(prop);
                }
            }
            _ => {
                if prop.p_ext == Extensibility::Mutable {
                    if present {
                        self.put_member_header(prop, mode);
                    } else {
                        // absent optionals are omitted from mutable structs
                        prop.is_present = false;
                    }
                } else if prop.is_optional {
                    if present {
                        self.put_member_header(prop, mode);
                    } else {
                        self.put_absent_header(prop, mode);
                    }
                } else {
                    self.state.record_member_start(prop);
                }
            }
        }
    }

    fn finish_member(&mut self, prop: &mut EntityProperties, mode: StreamMode, present: bool) {
        match mode {
            StreamMode::Read => {
                if !prop.is_present {
                    self.state.go_to_next_member(prop);
                }
            }
            StreamMode::Write => {
                let has_header = prop.p_ext == Extensibility::Mutable || prop.is_optional;
                if has_header && present && !Self::short_form(prop) && !self.abort_status() {
                    let length = (self.state.position() - prop.e_off) as u32;
                    prop.e_sz = length;
                    self.state.patch_u32(prop.e_off - 4, length);
                }
            }
            _ => {}
        }
    }

    fn next_entity(
        &mut self,
        props: &mut EntityProperties,
        as_key: bool,
        mode: StreamMode,
        firstcall: &mut bool,
    ) -> Option<Entity> {
        if self.abort_status() {
            return None;
        }
        if mode == StreamMode::Read && !as_key && props.e_ext == Extensibility::Mutable {
            *firstcall = false;
            return self.next_pl_entity(props);
        }
        let list = if as_key {
            MemberListType::Keys
        } else {
            MemberListType::MembersBySeq
        };
        let index = self.state.next_prop(props, list, firstcall);
        let prop = &props.list(list)[index];
        if prop.is_final() {
            return None;
        }
        Some(Entity::Member(list, index))
    }

    fn enum_width(&self, declared: BitBound) -> BitBound {
        // key streams flatten enums like basic cdr does
        if self.state.key || declared == BitBound::Unset {
            BitBound::B32
        } else {
            declared
        }
    }
}
