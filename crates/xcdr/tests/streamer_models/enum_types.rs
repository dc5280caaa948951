// Generated by xcdr-gen from enum_types.idl. Do not edit.
#![allow(non_camel_case_types)]

use xcdr::ops;
use xcdr::{
    BitBound, CdrEnum, CdrStream, Entity, EntityProperties, PropertyTree, SerializationStatus,
    StreamMode, Streamable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum enum_8 {
    first_8 = 0,
    second_8 = 1,
    third_8 = 2,
    fourth_8 = 3,
}

impl Default for enum_8 {
    fn default() -> Self {
        enum_8::first_8
    }
}

impl CdrEnum for enum_8 {
    const BIT_BOUND: BitBound = BitBound::B8;

    fn to_wire(self) -> u32 {
        self as u32
    }

    fn from_wire(value: u32) -> Self {
        match value {
            0 => enum_8::first_8,
            1 => enum_8::second_8,
            2 => enum_8::third_8,
            3 => enum_8::fourth_8,
            _ => enum_8::first_8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum enum_16 {
    first_16 = 0,
    second_16 = 1,
    third_16 = 2,
    fourth_16 = 3,
}

impl Default for enum_16 {
    fn default() -> Self {
        enum_16::first_16
    }
}

impl CdrEnum for enum_16 {
    const BIT_BOUND: BitBound = BitBound::B16;

    fn to_wire(self) -> u32 {
        self as u32
    }

    fn from_wire(value: u32) -> Self {
        match value {
            0 => enum_16::first_16,
            1 => enum_16::second_16,
            2 => enum_16::third_16,
            3 => enum_16::fourth_16,
            _ => enum_16::first_16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum enum_32 {
    first_32 = 0,
    second_32 = 1,
    third_32 = 2,
    fourth_32 = 3,
}

impl Default for enum_32 {
    fn default() -> Self {
        enum_32::first_32
    }
}

impl CdrEnum for enum_32 {
    const BIT_BOUND: BitBound = BitBound::B32;

    fn to_wire(self) -> u32 {
        self as u32
    }

    fn from_wire(value: u32) -> Self {
        match value {
            0 => enum_32::first_32,
            1 => enum_32::second_32,
            2 => enum_32::third_32,
            3 => enum_32::fourth_32,
            _ => enum_32::first_32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct enum_struct {
    pub c: enum_8,
    pub b: enum_16,
    pub a: enum_32,
}

impl PropertyTree for enum_struct {
    fn build_props() -> EntityProperties {
        let mut props = EntityProperties::root();
        {
            let member = props.push_member(EntityProperties::member(0, false));
            member.e_bb = BitBound::B8;
            member.is_key = true;
        }
        {
            let member = props.push_member(EntityProperties::member(1, false));
            member.e_bb = BitBound::B16;
        }
        {
            let member = props.push_member(EntityProperties::member(2, false));
            member.e_bb = BitBound::B32;
        }
        debug_assert!(!props.keylist_is_pragma);
        props.finish();
        props
    }
}

impl Streamable for enum_struct {
    fn stream_write<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    ) {
        streamer.start_struct(props, StreamMode::Write, as_key);
        let mut firstcall = true;
        while let Some(entity) =
            streamer.next_entity(props, as_key, StreamMode::Write, &mut firstcall)
        {
            match entity {
                Entity::Unknown(_) => {}
                Entity::Member(list, index) => {
                    let prop = props.entity_mut(list, index);
                    match prop.m_id {
                        0 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_enum(streamer, instance.c);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_enum(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_enum(streamer, instance.a);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        _ => {
                            streamer.skip_entity(prop);
                        }
                    }
                }
            }
        }
        streamer.finish_struct(props, StreamMode::Write, as_key);
    }

    fn stream_read<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &mut Self,
        props: &mut EntityProperties,
        as_key: bool,
    ) {
        streamer.start_struct(props, StreamMode::Read, as_key);
        let mut firstcall = true;
        while let Some(entity) =
            streamer.next_entity(props, as_key, StreamMode::Read, &mut firstcall)
        {
            match entity {
                Entity::Unknown(header) => {
                    if header.must_understand
                        && streamer.raise(SerializationStatus::MUST_UNDERSTAND_FAIL)
                    {
                        return;
                    }
                    streamer.skip_entity(&header);
                }
                Entity::Member(list, index) => {
                    let prop = props.entity_mut(list, index);
                    if prop.ignore {
                        streamer.skip_entity(prop);
                        continue;
                    }
                    match prop.m_id {
                        0 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_enum(streamer, &mut instance.c);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_enum(streamer, &mut instance.b);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_enum(streamer, &mut instance.a);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        _ => {
                            if prop.must_understand
                                && streamer.raise(SerializationStatus::MUST_UNDERSTAND_FAIL)
                            {
                                return;
                            }
                            streamer.skip_entity(prop);
                        }
                    }
                }
            }
        }
        streamer.finish_struct(props, StreamMode::Read, as_key);
    }

    fn stream_move<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    ) {
        streamer.start_struct(props, StreamMode::Move, as_key);
        let mut firstcall = true;
        while let Some(entity) =
            streamer.next_entity(props, as_key, StreamMode::Move, &mut firstcall)
        {
            match entity {
                Entity::Unknown(_) => {}
                Entity::Member(list, index) => {
                    let prop = props.entity_mut(list, index);
                    match prop.m_id {
                        0 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_enum(streamer, instance.c);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_enum(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_enum(streamer, instance.a);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        _ => {
                            streamer.skip_entity(prop);
                        }
                    }
                }
            }
        }
        streamer.finish_struct(props, StreamMode::Move, as_key);
    }

    fn stream_max<'buf, S: CdrStream<'buf>>(
        streamer: &mut S,
        _instance: &Self,
        props: &mut EntityProperties,
        as_key: bool,
    ) {
        streamer.start_struct(props, StreamMode::Max, as_key);
        let mut firstcall = true;
        while let Some(entity) =
            streamer.next_entity(props, as_key, StreamMode::Max, &mut firstcall)
        {
            match entity {
                Entity::Unknown(_) => {}
                Entity::Member(list, index) => {
                    let prop = props.entity_mut(list, index);
                    match prop.m_id {
                        0 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_enum::<S, enum_8>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_enum::<S, enum_16>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_enum::<S, enum_32>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        _ => {
                            streamer.skip_entity(prop);
                        }
                    }
                }
            }
        }
        streamer.finish_struct(props, StreamMode::Max, as_key);
    }
}
