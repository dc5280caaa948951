// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XCDR version 2: delimited and enhanced-parameter-list encodings.
//!
//! Appendable structs are framed by a 32-bit DHEADER carrying the body
//! length, which lets readers stop early when the sender appended members
//! they do not know. Mutable structs add a 32-bit EMHEADER1 per member,
//! `must_understand << 31 | length_code << 28 | member_id`; length codes
//! 0..3 encode the fixed sizes 1/2/4/8, code 4 takes the length from a
//! following NEXTINT word, and codes 5..7 reuse the element count leading
//! the payload. Writers emit codes 0..4 only; readers accept all of them.
//! Maximum alignment drops to 4 in this dialect.

use crate::ops::{move_primitive, read_primitive, write_primitive};
use crate::props::{BitBound, EntityProperties, Extensibility, MemberListType};
use crate::status::SerializationStatus;
use crate::stream::{CdrStream, Entity, StreamMode, StreamState};
use crate::Endianness;

/// Must-understand bit of an EMHEADER1.
const EM_FLAG_MUST_UNDERSTAND: u32 = 0x8000_0000;
/// Member id bits of an EMHEADER1.
const EM_ID_MASK: u32 = 0x0FFF_FFFF;
/// Length code announcing a NEXTINT length word.
const LC_NEXTINT: u32 = 4;

pub struct XcdrV2Stream<'buf> {
    state: StreamState<'buf>,
}

impl<'buf> XcdrV2Stream<'buf> {
    pub fn new(endianness: Endianness) -> Self {
        Self::with_ignored_faults(endianness, 0)
    }

    /// `ignore_faults` masks status flags that should not abort the stream.
    pub fn with_ignored_faults(endianness: Endianness, ignore_faults: u64) -> Self {
        Self {
            state: StreamState::new(endianness, 4, ignore_faults),
        }
    }

    /// Whether the struct is framed by a DHEADER in the current pass.
    fn delimited(props: &EntityProperties, as_key: bool) -> bool {
        !as_key && props.e_ext != Extensibility::Final
    }

    /// Write-side length code for a member.
    fn length_code(prop: &EntityProperties) -> u32 {
        match prop.e_bb {
            BitBound::B8 => 0,
            BitBound::B16 => 1,
            BitBound::B32 => 2,
            BitBound::B64 => 3,
            BitBound::Unset => LC_NEXTINT,
        }
    }

    fn end_of_struct(props: &EntityProperties) -> usize {
        props.d_off + props.d_sz as usize
    }

    /// Emit (or move over) the EMHEADER of a present mutable member.
    fn put_member_header(&mut self, prop: &mut EntityProperties, mode: StreamMode) {
        let lc = Self::length_code(prop);
        if mode == StreamMode::Write {
            let mut header = (lc << 28) | (prop.m_id & EM_ID_MASK);
            if prop.must_understand {
                header |= EM_FLAG_MUST_UNDERSTAND;
            }
            write_primitive(self, header);
            if lc == LC_NEXTINT {
                // patched in finish_member once the payload is streamed
                write_primitive(self, 0u32);
            }
        } else {
            move_primitive(self, 0u32);
            if lc == LC_NEXTINT {
                move_primitive(self, 0u32);
            }
        }
        prop.e_off = self.state.position();
        prop.is_present = true;
        self.state.set_alignment(0);
    }

    /// Read the next EMHEADER of a mutable struct and resolve it against
    /// the member-id ordering.
    fn next_em_entity(&mut self, props: &mut EntityProperties) -> Option<Entity> {
        let end = Self::end_of_struct(props);
        if self.state.position() >= end {
            return None;
        }
        self.state.align(4, false);
        if self.state.position() >= end {
            return None;
        }

        let mut header = 0u32;
        read_primitive(self, &mut header);
        if self.abort_status() {
            return None;
        }
        let must_understand = header & EM_FLAG_MUST_UNDERSTAND != 0;
        let lc = (header >> 28) & 0x7;
        let id = header & EM_ID_MASK;

        let length: u32 = match lc {
            0..=3 => 1u32 << lc,
            LC_NEXTINT => {
                let mut next_int = 0u32;
                read_primitive(self, &mut next_int);
                if self.abort_status() {
                    return None;
                }
                next_int
            }
            _ => {
                // 5..7: the leading element count of the payload doubles as
                // the length word and stays part of the member
                let multiplier = match lc {
                    5 => 1u64,
                    6 => 4u64,
                    _ => 8u64,
                };
                let count = match self.state.read_window(4) {
                    Some(window) => {
                        let mut bytes = [0u8; 4];
                        bytes.copy_from_slice(window);
                        match self.state.stream_endianness {
                            Endianness::LittleEndian => u32::from_le_bytes(bytes),
                            Endianness::BigEndian => u32::from_be_bytes(bytes),
                        }
                    }
                    None => {
                        self.raise(SerializationStatus::BUFFER_SIZE_EXCEEDED);
                        return None;
                    }
                };
                let total = 4u64 + u64::from(count) * multiplier;
                if total > u64::from(u32::MAX) {
                    self.raise(SerializationStatus::INVALID_DL_ENTRY);
                    return None;
                }
                total as u32
            }
        };

        self.state.set_alignment(0);
        let found = props
            .members_by_id
            .iter()
            .position(|m| !m.is_final() && m.m_id == id);
        match found {
            Some(index) => {
                let member = &mut props.members_by_id[index];
                member.e_sz = length;
                member.e_off = self.state.position();
                member.is_present = true;
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

impl<'buf> CdrStream<'buf> for XcdrV2Stream<'buf> {
    fn state(&self) -> &StreamState<'buf> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState<'buf> {
        &mut self.state
    }

    fn start_struct(&mut self, props: &mut EntityProperties, mode: StreamMode, as_key: bool) {
        if !Self::delimited(props, as_key) {
            self.state.record_struct_start(props);
            return;
        }
        match mode {
            StreamMode::Write => {
                // body length patched in finish_struct
                write_primitive(self, 0u32);
            }
            StreamMode::Move | StreamMode::Max => {
                move_primitive(self, 0u32);
            }
            StreamMode::Read => {
                let mut d_sz = 0u32;
                read_primitive(self, &mut d_sz);
                if self.abort_status() {
                    return;
                }
                props.d_sz = d_sz;
                if !self.state.inside_buffer(d_sz as usize) {
                    log::debug!("dheader length {} runs past the buffer", d_sz);
                    self.raise(SerializationStatus::INVALID_DL_ENTRY);
                    return;
                }
            }
        }
        props.is_present = true;
        props.d_off = self.state.position();
    }

    fn finish_struct(&mut self, props: &mut EntityProperties, mode: StreamMode, as_key: bool) {
        if Self::delimited(props, as_key) && !self.abort_status() {
            match mode {
                StreamMode::Write => {
                    let body = (self.state.position() - props.d_off) as u32;
                    props.d_sz = body;
                    self.state.patch_u32(props.d_off - 4, body);
                }
                StreamMode::Read => {
                    // land exactly past the body, skipping appended members
                    self.state.set_position(Self::end_of_struct(props));
                    self.state.set_alignment(0);
                }
                _ => {}
            }
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
        let mutable_parent = prop.p_ext == Extensibility::Mutable;
        match mode {
            StreamMode::Read => {
                if mutable_parent {
                    // header handled in next_entity
                } else if prop.is_optional {
                    let mut flag = 0u8;
                    read_primitive(self, &mut flag);
                    prop.is_present = flag != 0;
                    prop.e_off = self.state.position();
                    prop.e_sz = 0;
                } else {
                    self.state.record_member_start(prop);
                }
            }
            _ => {
                if mutable_parent {
                    if present {
                        self.put_member_header(prop, mode);
                    } else {
                        // absence is the absence of the header
                        prop.is_present = false;
                    }
                } else if prop.is_optional {
                    if mode == StreamMode::Write {
                        write_primitive(self, u8::from(present));
                    } else {
                        move_primitive(self, 0u8);
                    }
                    prop.e_off = self.state.position();
                    prop.is_present = present;
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
                if prop.p_ext == Extensibility::Mutable
                    && present
                    && Self::length_code(prop) == LC_NEXTINT
                    && !self.abort_status()
                {
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
            return self.next_em_entity(props);
        }
        // appendable bodies may end before the declared member list does
        if mode == StreamMode::Read
            && !as_key
            && props.e_ext == Extensibility::Appendable
            && self.state.position() >= Self::end_of_struct(props)
        {
            if !*firstcall {
                self.state.pop_cursor();
            }
            return None;
        }
        let list = if as_key {
            MemberListType::Keys
        } else {
            MemberListType::MembersBySeq
        };
        let index = self.state.next_prop(props, list, firstcall);
        if props.list(list)[index].is_final() {
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
