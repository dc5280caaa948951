// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Basic (plain) CDR: the legacy representation without type evolution.
//!
//! No headers and no envelopes; members stream in declaration order with
//! 8-byte maximum alignment, and every enum is flattened to 32 bits.
//! Optional members cannot be represented and fault the stream.

use crate::props::{BitBound, EntityProperties, MemberListType};
use crate::status::SerializationStatus;
use crate::stream::{CdrStream, Entity, StreamMode, StreamState};
use crate::Endianness;

pub struct BasicCdrStream<'buf> {
    state: StreamState<'buf>,
}

impl<'buf> BasicCdrStream<'buf> {
    pub fn new(endianness: Endianness) -> Self {
        Self::with_ignored_faults(endianness, 0)
    }

    /// `ignore_faults` masks status flags that should not abort the stream.
    pub fn with_ignored_faults(endianness: Endianness, ignore_faults: u64) -> Self {
        Self {
            state: StreamState::new(endianness, 8, ignore_faults),
        }
    }

    fn member_list(&self, as_key: bool) -> MemberListType {
        if as_key {
            MemberListType::Keys
        } else {
            MemberListType::MembersBySeq
        }
    }
}

impl<'buf> CdrStream<'buf> for BasicCdrStream<'buf> {
    fn state(&self) -> &StreamState<'buf> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState<'buf> {
        &mut self.state
    }

    fn start_struct(&mut self, props: &mut EntityProperties, _mode: StreamMode, _as_key: bool) {
        self.state.record_struct_start(props);
    }

    fn finish_struct(&mut self, props: &mut EntityProperties, _mode: StreamMode, as_key: bool) {
        let list = self.member_list(as_key);
        self.state.check_struct_completeness(props, list);
    }

    fn start_member(&mut self, prop: &mut EntityProperties, _mode: StreamMode, _present: bool) {
        self.state.record_member_start(prop);
    }

    fn finish_member(&mut self, prop: &mut EntityProperties, mode: StreamMode, _present: bool) {
        if mode == StreamMode::Read && !prop.is_present {
            self.state.go_to_next_member(prop);
        }
    }

    fn next_entity(
        &mut self,
        props: &mut EntityProperties,
        as_key: bool,
        _mode: StreamMode,
        firstcall: &mut bool,
    ) -> Option<Entity> {
        if self.abort_status() {
            return None;
        }
        let list = self.member_list(as_key);
        let index = self.state.next_prop(props, list, firstcall);
        let prop = &props.list(list)[index];
        if prop.is_final() {
            return None;
        }
        if prop.is_optional && self.raise(SerializationStatus::UNSUPPORTED_PROPERTY) {
            return None;
        }
        Some(Entity::Member(list, index))
    }

    fn enum_width(&self, _declared: BitBound) -> BitBound {
        // basic cdr treats all enums as 32 bit integers
        BitBound::B32
    }
}
