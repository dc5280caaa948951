// Generated by xcdr-gen from optional_types.idl. Do not edit.
#![allow(non_camel_case_types)]

use xcdr::ops;
use xcdr::{
    BitBound, CdrStream, Entity, EntityProperties, Extensibility, PropertyTree,
    SerializationStatus, StreamMode, Streamable,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct optional_final_struct {
    pub a: Option<u8>,
    pub b: u8,
    pub c: u8,
}

impl PropertyTree for optional_final_struct {
    fn build_props() -> EntityProperties {
        let mut props = EntityProperties::root();
        props.e_ext = Extensibility::Final;
        {
            let member = props.push_member(EntityProperties::member(0, true));
            member.p_ext = Extensibility::Final;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(1, false));
            member.p_ext = Extensibility::Final;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(2, false));
            member.p_ext = Extensibility::Final;
            member.e_bb = BitBound::B8;
            member.is_key = true;
        }
        debug_assert!(!props.keylist_is_pragma);
        props.finish();
        props
    }
}

impl Streamable for optional_final_struct {
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
                            streamer.start_member(prop, StreamMode::Write, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::write_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Write, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.c);
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
                            if prop.is_present {
                                let mut value = <u8>::default();
                                ops::read_primitive(streamer, &mut value);
                                instance.a = Some(value);
                            } else {
                                instance.a = None;
                            }
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.b);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.c);
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
                            streamer.start_member(prop, StreamMode::Move, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::move_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Move, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.c);
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
        instance: &Self,
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
                            streamer.start_member(prop, StreamMode::Max, instance.a.is_some());
                            if instance.a.is_some() {
                                ops::max_primitive::<S, u8>(streamer);
                            }
                            streamer.finish_member(prop, StreamMode::Max, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
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

#[derive(Debug, Clone, Default, PartialEq)]
pub struct optional_appendable_struct {
    pub a: Option<u8>,
    pub b: u8,
    pub c: u8,
}

impl PropertyTree for optional_appendable_struct {
    fn build_props() -> EntityProperties {
        let mut props = EntityProperties::root();
        props.e_ext = Extensibility::Appendable;
        {
            let member = props.push_member(EntityProperties::member(0, true));
            member.p_ext = Extensibility::Appendable;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(1, false));
            member.p_ext = Extensibility::Appendable;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(2, false));
            member.p_ext = Extensibility::Appendable;
            member.e_bb = BitBound::B8;
            member.is_key = true;
        }
        debug_assert!(!props.keylist_is_pragma);
        props.finish();
        props
    }
}

impl Streamable for optional_appendable_struct {
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
                            streamer.start_member(prop, StreamMode::Write, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::write_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Write, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.c);
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
                            if prop.is_present {
                                let mut value = <u8>::default();
                                ops::read_primitive(streamer, &mut value);
                                instance.a = Some(value);
                            } else {
                                instance.a = None;
                            }
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.b);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.c);
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
                            streamer.start_member(prop, StreamMode::Move, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::move_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Move, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.c);
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
        instance: &Self,
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
                            streamer.start_member(prop, StreamMode::Max, instance.a.is_some());
                            if instance.a.is_some() {
                                ops::max_primitive::<S, u8>(streamer);
                            }
                            streamer.finish_member(prop, StreamMode::Max, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
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

#[derive(Debug, Clone, Default, PartialEq)]
pub struct optional_mutable_struct {
    pub a: Option<u8>,
    pub b: u8,
    pub c: u8,
}

impl PropertyTree for optional_mutable_struct {
    fn build_props() -> EntityProperties {
        let mut props = EntityProperties::root();
        props.e_ext = Extensibility::Mutable;
        {
            let member = props.push_member(EntityProperties::member(0, true));
            member.p_ext = Extensibility::Mutable;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(1, false));
            member.p_ext = Extensibility::Mutable;
            member.e_bb = BitBound::B8;
        }
        {
            let member = props.push_member(EntityProperties::member(2, false));
            member.p_ext = Extensibility::Mutable;
            member.e_bb = BitBound::B8;
            member.is_key = true;
        }
        debug_assert!(!props.keylist_is_pragma);
        props.finish();
        props
    }
}

impl Streamable for optional_mutable_struct {
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
                            streamer.start_member(prop, StreamMode::Write, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::write_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Write, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Write, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Write, true);
                            ops::write_primitive(streamer, instance.c);
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
                            if prop.is_present {
                                let mut value = <u8>::default();
                                ops::read_primitive(streamer, &mut value);
                                instance.a = Some(value);
                            } else {
                                instance.a = None;
                            }
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.b);
                            streamer.finish_member(prop, StreamMode::Read, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Read, true);
                            ops::read_primitive(streamer, &mut instance.c);
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
                            streamer.start_member(prop, StreamMode::Move, instance.a.is_some());
                            if let Some(value) = instance.a.as_ref() {
                                ops::move_primitive(streamer, (*value));
                            }
                            streamer.finish_member(prop, StreamMode::Move, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.b);
                            streamer.finish_member(prop, StreamMode::Move, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Move, true);
                            ops::move_primitive(streamer, instance.c);
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
        instance: &Self,
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
                            streamer.start_member(prop, StreamMode::Max, instance.a.is_some());
                            if instance.a.is_some() {
                                ops::max_primitive::<S, u8>(streamer);
                            }
                            streamer.finish_member(prop, StreamMode::Max, instance.a.is_some());
                        }
                        1 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
                            streamer.finish_member(prop, StreamMode::Max, true);
                        }
                        2 => {
                            streamer.start_member(prop, StreamMode::Max, true);
                            ops::max_primitive::<S, u8>(streamer);
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
