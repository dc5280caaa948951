// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The streaming backend: turns an [`IdlModule`] into one Rust source
//! artifact containing, per constructed type, the type definition, the
//! property-tree initializer (`PropertyTree`) and the four-mode streaming
//! procedures (`Streamable`).
//!
//! Structure follows the member switchbox model: every procedure opens the
//! struct, loops over `next_entity`, dispatches on the member id, streams
//! the member between `start_member`/`finish_member`, and closes the
//! struct. Sequences and arrays are unrolled into linear calls; typedefs
//! become free functions specialized for the aliased shape; inheritance is
//! flattened base-first.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{
    CaseDef, Definition, EnumDef, Extensibility, IdlModule, MemberDef, PrimitiveKind, StructDef,
    TypeRef, TypedefDef, UnionDef,
};
use crate::emit::{Streams, ALL, CONST, MAX, MOVE, NOMAX, READ, WRITE};
use crate::names::{escape_identifier, escape_scoped, primitive_size, primitive_type, rust_field_type, rust_type};

/// Semantic failures while generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    UnknownType { referenced_by: String, name: String },
    BadKeyPath { struct_name: String, path: String },
    MixedKeys { struct_name: String },
    DuplicateMemberId { struct_name: String, id: u32 },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::UnknownType { referenced_by, name } => {
                write!(f, "{} references unknown type {}", referenced_by, name)
            }
            GenError::BadKeyPath { struct_name, path } => {
                write!(f, "keylist of {} names unknown field path {}", struct_name, path)
            }
            GenError::MixedKeys { struct_name } => {
                write!(f, "{} mixes #pragma keylist with @key annotations", struct_name)
            }
            GenError::DuplicateMemberId { struct_name, id } => {
                write!(f, "{} declares member id {} twice", struct_name, id)
            }
        }
    }
}

impl std::error::Error for GenError {}

/// What a member type resolves to once typedefs and names are chased.
enum Shape<'a> {
    Primitive(PrimitiveKind),
    Str { bound: u32 },
    Enum(&'a EnumDef),
    Constructed(String),
    Sequence { element: &'a TypeRef, bound: u32 },
    Alias(&'a TypedefDef),
}

pub struct Generator<'a> {
    module: &'a IdlModule,
    index: HashMap<&'a str, &'a Definition>,
}

impl<'a> Generator<'a> {
    pub fn new(module: &'a IdlModule) -> Self {
        let mut index = HashMap::new();
        for def in &module.definitions {
            index.insert(def.name(), def);
        }
        Self { module, index }
    }

    /// Generate the complete artifact for the module.
    pub fn generate(&self) -> Result<String, GenError> {
        let mut body = String::new();
        for def in &self.module.definitions {
            match def {
                Definition::Struct(s) => self.process_struct(s, &mut body)?,
                Definition::Union(u) => self.process_union(u, &mut body)?,
                Definition::Enum(e) => self.process_enum(e, &mut body),
                Definition::Typedef(t) => self.process_typedef(t, &mut body)?,
            }
        }

        let mut out = String::new();
        out.push_str(&format!(
            "// Generated by xcdr-gen from {}.idl. Do not edit.\n",
            self.module.name
        ));
        out.push_str("#![allow(non_camel_case_types)]\n\n");
        if body.contains("ops::") {
            out.push_str("use xcdr::ops;\n");
        }
        let mut imports = Vec::new();
        if body.contains("get_type_props::<") {
            imports.push("get_type_props");
        }
        for (name, marker) in [
            ("BitBound", "BitBound::"),
            ("CdrEnum", "impl CdrEnum"),
            ("CdrStream", "CdrStream<'buf>"),
            ("Entity", "Entity::"),
            ("EntityProperties", "EntityProperties"),
            ("Extensibility", "Extensibility::"),
            ("PropertyTree", "impl PropertyTree"),
            ("SerializationStatus", "SerializationStatus::"),
            ("StreamMode", "StreamMode::"),
            ("Streamable", "impl Streamable"),
        ] {
            if body.contains(marker) {
                imports.push(name);
            }
        }
        if !imports.is_empty() {
            let joined = imports.join(", ");
            if joined.len() <= 80 {
                out.push_str(&format!("use xcdr::{{{}}};\n", joined));
            } else {
                out.push_str("use xcdr::{\n");
                let mut line = String::from("    ");
                for (position, import) in imports.iter().enumerate() {
                    let last = position + 1 == imports.len();
                    let piece = if last {
                        format!("{},", import)
                    } else {
                        format!("{}, ", import)
                    };
                    if line.len() + piece.len() > 96 {
                        out.push_str(line.trim_end());
                        out.push('\n');
                        line = String::from("    ");
                    }
                    line.push_str(&piece);
                }
                out.push_str(line.trim_end());
                out.push('\n');
                out.push_str("};\n");
            }
        }
        out.push_str(&body);
        Ok(out)
    }

    fn resolve(&self, referenced_by: &str, name: &str) -> Result<&'a Definition, GenError> {
        self.index.get(name).copied().ok_or_else(|| GenError::UnknownType {
            referenced_by: referenced_by.to_string(),
            name: name.to_string(),
        })
    }

    fn shape_of(&self, referenced_by: &str, ty: &'a TypeRef) -> Result<Shape<'a>, GenError> {
        Ok(match ty {
            TypeRef::Primitive(kind) => Shape::Primitive(*kind),
            TypeRef::String { bound } => Shape::Str { bound: *bound },
            TypeRef::Sequence { element, bound } => Shape::Sequence {
                element,
                bound: *bound,
            },
            TypeRef::Named(name) => match self.resolve(referenced_by, name)? {
                Definition::Enum(def) => Shape::Enum(def),
                Definition::Struct(_) | Definition::Union(_) => {
                    Shape::Constructed(escape_scoped(name))
                }
                Definition::Typedef(def) => Shape::Alias(def),
            },
        })
    }

    /// Bit bound of a member type, when it has one (primitives, enums).
    fn bit_bound_of(&self, referenced_by: &str, ty: &'a TypeRef) -> Result<Option<usize>, GenError> {
        Ok(match self.shape_of(referenced_by, ty)? {
            Shape::Primitive(kind) => Some(primitive_size(kind)),
            Shape::Enum(def) => Some((def.bit_bound.unwrap_or(32) / 8).max(1) as usize),
            _ => None,
        })
    }

    /// Walk the inheritance chain root-first and flatten the members, with
    /// ids defaulted to the flattened declaration index.
    fn flattened_members(&self, def: &'a StructDef) -> Result<Vec<(u32, &'a MemberDef)>, GenError> {
        let mut chain = vec![def];
        let mut current = def;
        while let Some(base_name) = &current.base {
            match self.resolve(&current.name, base_name)? {
                Definition::Struct(base) => {
                    chain.push(base);
                    current = base;
                }
                _ => {
                    return Err(GenError::UnknownType {
                        referenced_by: current.name.clone(),
                        name: base_name.clone(),
                    })
                }
            }
        }
        chain.reverse();

        let mut members = Vec::new();
        let mut next_id = 0u32;
        for level in chain {
            for member in &level.members {
                let id = member.id.unwrap_or(next_id);
                next_id = id + 1;
                members.push((id, member));
            }
        }
        for (position, (id, _)) in members.iter().enumerate() {
            if members.iter().skip(position + 1).any(|(other, _)| other == id) {
                return Err(GenError::DuplicateMemberId {
                    struct_name: def.name.clone(),
                    id: *id,
                });
            }
        }
        Ok(members)
    }

    fn ext_variant(ext: Extensibility) -> &'static str {
        match ext {
            Extensibility::Final => "Final",
            Extensibility::Appendable => "Appendable",
            Extensibility::Mutable => "Mutable",
        }
    }

    // ---------------------------------------------------------------
    // structs
    // ---------------------------------------------------------------

    fn process_struct(&self, def: &'a StructDef, out: &mut String) -> Result<(), GenError> {
        if def.keylist.is_some() && def.members.iter().any(|m| m.key) {
            return Err(GenError::MixedKeys {
                struct_name: def.name.clone(),
            });
        }
        let members = self.flattened_members(def)?;
        let type_name = escape_identifier(&def.name);

        self.emit_struct_definition(&type_name, &members, out);
        self.emit_struct_props(def, &type_name, &members, out)?;
        self.emit_struct_streamable(def, &type_name, &members, out)?;
        Ok(())
    }

    fn emit_struct_definition(&self, type_name: &str, members: &[(u32, &MemberDef)], out: &mut String) {
        out.push_str("\n#[derive(Debug, Clone, Default, PartialEq)]\n");
        out.push_str(&format!("pub struct {} {{\n", type_name));
        for (_, member) in members {
            out.push_str(&format!(
                "    pub {}: {},\n",
                escape_identifier(&member.name),
                rust_field_type(&member.ty, &member.dimensions, member.optional)
            ));
        }
        out.push_str("}\n");
    }

    fn emit_struct_props(
        &self,
        def: &'a StructDef,
        type_name: &str,
        members: &[(u32, &'a MemberDef)],
        out: &mut String,
    ) -> Result<(), GenError> {
        let mut streams = Streams::new();
        streams.put_props(&format!("\nimpl PropertyTree for {} {{\n", type_name));
        streams.put_props("    fn build_props() -> EntityProperties {\n");
        streams.put_props("        let mut props = EntityProperties::root();\n");
        if def.extensibility != Extensibility::Final {
            streams.put_props(&format!(
                "        props.e_ext = Extensibility::{};\n",
                Self::ext_variant(def.extensibility)
            ));
        }

        for (id, member) in members {
            let constructed = matches!(
                self.shape_of(&def.name, &member.ty)?,
                Shape::Constructed(_)
            ) && member.dimensions.is_empty();

            let mut assignments = Vec::new();
            if def.extensibility != Extensibility::Final {
                assignments.push(format!(
                    "member.p_ext = Extensibility::{};",
                    Self::ext_variant(def.extensibility)
                ));
            }
            if constructed {
                if let TypeRef::Named(name) = &member.ty {
                    let member_ext = match self.resolve(&def.name, name)? {
                        Definition::Struct(s) => s.extensibility,
                        Definition::Union(u) => u.extensibility,
                        _ => Extensibility::Final,
                    };
                    if member_ext != Extensibility::Final {
                        assignments.push(format!(
                            "member.e_ext = Extensibility::{};",
                            Self::ext_variant(member_ext)
                        ));
                    }
                }
            } else if member.dimensions.is_empty() {
                if let Some(bytes) = self.bit_bound_of(&def.name, &member.ty)? {
                    assignments.push(format!("member.e_bb = BitBound::B{};", bytes * 8));
                }
            }
            if member.key {
                assignments.push("member.is_key = true;".to_string());
            }
            if member.must_understand {
                assignments.push("member.must_understand = true;".to_string());
            }

            let push_expr = if constructed {
                format!("props.push_member(get_type_props::<{}>())", rust_type(&member.ty))
            } else {
                format!(
                    "props.push_member(EntityProperties::member({}, {}))",
                    id, member.optional
                )
            };

            if !constructed && assignments.is_empty() {
                streams.put_props(&format!("        {};\n", push_expr));
                continue;
            }
            streams.put_props("        {\n");
            streams.put_props(&format!("            let member = {};\n", push_expr));
            if constructed {
                streams.put_props(&format!(
                    "            member.set_member_props({}, {});\n",
                    id, member.optional
                ));
            }
            for assignment in &assignments {
                streams.put_props(&format!("            {}\n", assignment));
            }
            streams.put_props("        }\n");
        }

        if let Some(keylist) = &def.keylist {
            let mut rendered_paths = Vec::new();
            for path in keylist {
                let ids = self.resolve_key_path(def, path)?;
                rendered_paths.push(format!(
                    "vec![{}]",
                    ids.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
                ));
            }
            streams.put_props(&format!(
                "        // #pragma keylist {} {}\n",
                def.name,
                keylist
                    .iter()
                    .map(|p| p.join("."))
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
            streams.put_props(&format!(
                "        props.process_keylist(&[{}]);\n",
                rendered_paths.join(", ")
            ));
        } else {
            streams.put_props("        debug_assert!(!props.keylist_is_pragma);\n");
        }
        streams.put_props("        props.finish();\n");
        streams.put_props("        props\n");
        streams.put_props("    }\n");
        streams.put_props("}\n");
        streams.flush_props(out);
        Ok(())
    }

    /// Resolve one dotted keylist path to the member-id chain the runtime
    /// marking function takes.
    fn resolve_key_path(&self, def: &'a StructDef, path: &[String]) -> Result<Vec<u32>, GenError> {
        let mut ids = Vec::new();
        let mut level = def;
        for (position, field) in path.iter().enumerate() {
            let members = self.flattened_members(level)?;
            let found = members
                .iter()
                .find(|(_, m)| m.name == *field)
                .map(|(id, m)| (*id, *m));
            let (id, member) = found.ok_or_else(|| GenError::BadKeyPath {
                struct_name: def.name.clone(),
                path: path.join("."),
            })?;
            ids.push(id);
            if position + 1 < path.len() {
                level = match &member.ty {
                    TypeRef::Named(name) => match self.resolve(&level.name, name)? {
                        Definition::Struct(next) => next,
                        _ => {
                            return Err(GenError::BadKeyPath {
                                struct_name: def.name.clone(),
                                path: path.join("."),
                            })
                        }
                    },
                    _ => {
                        return Err(GenError::BadKeyPath {
                            struct_name: def.name.clone(),
                            path: path.join("."),
                        })
                    }
                };
            }
        }
        Ok(ids)
    }

    fn emit_struct_streamable(
        &self,
        def: &'a StructDef,
        type_name: &str,
        members: &[(u32, &'a MemberDef)],
        out: &mut String,
    ) -> Result<(), GenError> {
        let mut streams = Streams::new();

        streams.put(ALL, "        streamer.start_struct(props, StreamMode::{M}, as_key);\n");
        streams.put(ALL, "        let mut firstcall = true;\n");
        streams.put(
            ALL,
            "        while let Some(entity) =\n            streamer.next_entity(props, as_key, StreamMode::{M}, &mut firstcall)\n        {\n            match entity {\n",
        );
        streams.put(CONST, "                Entity::Unknown(_) => {}\n");
        streams.put(
            READ,
            "                Entity::Unknown(header) => {\n                    if header.must_understand\n                        && streamer.raise(SerializationStatus::MUST_UNDERSTAND_FAIL)\n                    {\n                        return;\n                    }\n                    streamer.skip_entity(&header);\n                }\n",
        );
        streams.put(
            ALL,
            "                Entity::Member(list, index) => {\n                    let prop = props.entity_mut(list, index);\n",
        );
        streams.put(
            READ,
            "                    if prop.ignore {\n                        streamer.skip_entity(prop);\n                        continue;\n                    }\n",
        );
        streams.put(ALL, "                    match prop.m_id {\n");

        for (id, member) in members {
            self.process_member(def, *id, member, &mut streams)?;
        }

        streams.put(
            CONST,
            "                        _ => {\n                            streamer.skip_entity(prop);\n                        }\n",
        );
        streams.put(
            READ,
            "                        _ => {\n                            if prop.must_understand\n                                && streamer.raise(SerializationStatus::MUST_UNDERSTAND_FAIL)\n                            {\n                                return;\n                            }\n                            streamer.skip_entity(prop);\n                        }\n",
        );
        streams.put(ALL, "                    }\n                }\n            }\n        }\n");
        streams.put(ALL, "        streamer.finish_struct(props, StreamMode::{M}, as_key);\n");

        out.push_str(&format!("\nimpl Streamable for {} {{", type_name));
        Self::emit_mode_functions(&streams, out);
        out.push_str("}\n");
        Ok(())
    }

    /// Wrap the four assembled bodies in their trait-method signatures.
    /// The instance parameter is underscored when a body never touches it
    /// (typically the max pass).
    fn emit_mode_functions(streams: &Streams, out: &mut String) {
        let bodies = [
            ("write", "&Self", &streams.write),
            ("read", "&mut Self", &streams.read),
            ("move", "&Self", &streams.mov),
            ("max", "&Self", &streams.max),
        ];
        for (mode, borrow, body) in bodies {
            let instance = if body.contains("instance") {
                "instance"
            } else {
                "_instance"
            };
            out.push_str(&format!(
                "\n    fn stream_{}<'buf, S: CdrStream<'buf>>(\n        streamer: &mut S,\n        {}: {},\n        props: &mut EntityProperties,\n        as_key: bool,\n    ) {{\n",
                mode, instance, borrow
            ));
            out.push_str(body);
            out.push_str("    }\n");
        }
    }

    fn process_member(
        &self,
        def: &'a StructDef,
        id: u32,
        member: &'a MemberDef,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let field = escape_identifier(&member.name);
        let accessor = format!("instance.{}", field);
        streams.put(ALL, &format!("                        {} => {{\n", id));

        if member.optional {
            streams.put(
                CONST,
                &format!(
                    "                            streamer.start_member(prop, StreamMode::{{M}}, {}.is_some());\n",
                    accessor
                ),
            );
            streams.put(
                READ,
                "                            streamer.start_member(prop, StreamMode::Read, true);\n",
            );
            self.process_optional_entity(def, member, &accessor, streams)?;
            streams.put(
                CONST,
                &format!(
                    "                            streamer.finish_member(prop, StreamMode::{{M}}, {}.is_some());\n",
                    accessor
                ),
            );
            streams.put(
                READ,
                "                            streamer.finish_member(prop, StreamMode::Read, true);\n",
            );
        } else {
            streams.put(
                ALL,
                "                            streamer.start_member(prop, StreamMode::{M}, true);\n",
            );
            self.process_entity(def, member, &accessor, 28, streams)?;
            streams.put(
                ALL,
                "                            streamer.finish_member(prop, StreamMode::{M}, true);\n",
            );
        }
        streams.put(ALL, "                        }\n");
        Ok(())
    }

    /// Optional members: presence-guarded streaming around a temporary on
    /// the read side.
    fn process_optional_entity(
        &self,
        def: &'a StructDef,
        member: &'a MemberDef,
        accessor: &str,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let value_type = rust_field_type(&member.ty, &member.dimensions, false);

        streams.put(
            WRITE | MOVE,
            &format!(
                "                            if let Some(value) = {}.as_ref() {{\n",
                accessor
            ),
        );
        streams.put(
            MAX,
            &format!("                            if {}.is_some() {{\n", accessor),
        );
        {
            let mut body = Streams::new();
            self.emit_value_ops(def, member, "(*value)", "(*value)", 32, &mut body)?;
            streams.put(WRITE, &body.write);
            streams.put(MOVE, &body.mov);
            streams.put(MAX, &body.max);
        }
        streams.put(CONST, "                            }\n");

        streams.put(
            READ,
            &format!(
                "                            if prop.is_present {{\n                                let mut value = <{}>::default();\n",
                value_type
            ),
        );
        {
            let mut body = Streams::new();
            self.emit_value_ops(def, member, "value", "value", 32, &mut body)?;
            streams.put(READ, &body.read);
        }
        streams.put(
            READ,
            &format!(
                "                                {} = Some(value);\n                            }} else {{\n                                {} = None;\n                            }}\n",
                accessor, accessor
            ),
        );
        Ok(())
    }

    /// Streaming expression for a (non-optional) member, arrays unrolled.
    fn process_entity(
        &self,
        def: &'a StructDef,
        member: &'a MemberDef,
        accessor: &str,
        indent: usize,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        if member.dimensions.is_empty() {
            return self.emit_value_ops(def, member, accessor, accessor, indent, streams);
        }
        self.unroll_array(def, member, accessor, indent, streams)
    }

    fn unroll_array(
        &self,
        def: &'a StructDef,
        member: &'a MemberDef,
        accessor: &str,
        indent: usize,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let pad = " ".repeat(indent);
        let shape = self.shape_of(&def.name, &member.ty)?;

        // primitive elements transfer as one block per innermost row
        if let Shape::Primitive(kind) = shape {
            if kind != PrimitiveKind::Bool && member.dimensions.len() == 1 {
                let count = member.dimensions[0];
                streams.put(
                    WRITE,
                    &format!("{}ops::write_slice(streamer, &{});\n", pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_slice(streamer, &mut {});\n", pad, accessor),
                );
                streams.put(
                    MOVE | MAX,
                    &format!(
                        "{}ops::{{T}}_slice::<S, {}>(streamer, {});\n",
                        pad,
                        primitive_type(kind),
                        count
                    ),
                );
                return Ok(());
            }
        }

        // anything else walks every element; constructed element types
        // stream against a freshly fetched tree of their own
        if let Shape::Constructed(type_name) = &shape {
            streams.put(
                ALL,
                &format!(
                    "{}let mut elem_props = get_type_props::<{}>();\n",
                    pad, type_name
                ),
            );
        }
        let mut indexed = accessor.to_string();
        let mut depth = 0;
        for dim in &member.dimensions {
            streams.put(
                ALL,
                &format!("{}for a_{} in 0..{} {{\n", " ".repeat(indent + depth * 4), depth, dim),
            );
            indexed = format!("{}[a_{}]", indexed, depth);
            depth += 1;
        }
        let inner_indent = indent + depth * 4;
        if let Shape::Constructed(type_name) = &shape {
            let inner_pad = " ".repeat(inner_indent);
            streams.put(
                WRITE | MOVE | MAX,
                &format!(
                    "{}{}::stream_{{T}}(streamer, &{}, &mut elem_props, as_key);\n",
                    inner_pad, type_name, indexed
                ),
            );
            streams.put(
                READ,
                &format!(
                    "{}{}::stream_read(streamer, &mut {}, &mut elem_props, as_key);\n",
                    inner_pad, type_name, indexed
                ),
            );
        } else {
            let element = MemberDef {
                dimensions: Vec::new(),
                ..member.clone()
            };
            let mut body = Streams::new();
            self.emit_value_ops(def, &element, &indexed, &indexed, inner_indent, &mut body)?;
            streams.put(WRITE, &body.write);
            streams.put(READ, &body.read);
            streams.put(MOVE, &body.mov);
            streams.put(MAX, &body.max);
        }
        while depth > 0 {
            depth -= 1;
            streams.put(ALL, &format!("{}}}\n", " ".repeat(indent + depth * 4)));
        }
        Ok(())
    }

    /// The four operations for one undimensioned value.
    fn emit_value_ops(
        &self,
        def: &'a StructDef,
        member: &'a MemberDef,
        accessor: &str,
        read_accessor: &str,
        indent: usize,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let pad = " ".repeat(indent);
        match self.shape_of(&def.name, &member.ty)? {
            Shape::Primitive(kind) => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_primitive(streamer, {});\n", pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_primitive(streamer, &mut {});\n", pad, read_accessor),
                );
                streams.put(
                    MAX,
                    &format!(
                        "{}ops::max_primitive::<S, {}>(streamer);\n",
                        pad,
                        primitive_type(kind)
                    ),
                );
            }
            Shape::Str { bound } => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_string(streamer, &{}, {});\n", pad, accessor, bound),
                );
                streams.put(
                    READ,
                    &format!(
                        "{}ops::read_string(streamer, &mut {}, {});\n",
                        pad, read_accessor, bound
                    ),
                );
                streams.put(MAX, &format!("{}ops::max_string(streamer, {});\n", pad, bound));
            }
            Shape::Enum(enum_def) => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_enum(streamer, {});\n", pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_enum(streamer, &mut {});\n", pad, read_accessor),
                );
                streams.put(
                    MAX,
                    &format!(
                        "{}ops::max_enum::<S, {}>(streamer);\n",
                        pad,
                        escape_identifier(&enum_def.name)
                    ),
                );
            }
            Shape::Constructed(type_name) => {
                streams.put(
                    WRITE | MOVE | MAX,
                    &format!(
                        "{}{}::stream_{{T}}(streamer, &{}, prop, as_key);\n",
                        pad, type_name, accessor
                    ),
                );
                streams.put(
                    READ,
                    &format!(
                        "{}{}::stream_read(streamer, &mut {}, prop, as_key);\n",
                        pad, type_name, read_accessor
                    ),
                );
            }
            Shape::Alias(alias) => {
                let alias_fn = escape_identifier(&alias.name);
                streams.put(
                    WRITE | MOVE | MAX,
                    &format!("{}{{T}}_{}(streamer, &{}, as_key);\n", pad, alias_fn, accessor),
                );
                streams.put(
                    READ,
                    &format!(
                        "{}read_{}(streamer, &mut {}, as_key);\n",
                        pad, alias_fn, read_accessor
                    ),
                );
            }
            Shape::Sequence { element, bound } => {
                self.unroll_sequence(
                    def,
                    element,
                    bound,
                    0,
                    accessor,
                    read_accessor,
                    indent,
                    streams,
                )?;
            }
        }
        Ok(())
    }

    /// Sequence unrolling: bound check, length transfer, resize on read,
    /// then the element body (block transfer for primitives, an indexed
    /// loop otherwise, recursion for sequences of sequences).
    #[allow(clippy::too_many_arguments)]
    fn unroll_sequence(
        &self,
        def: &'a StructDef,
        element: &'a TypeRef,
        bound: u32,
        depth: usize,
        accessor: &str,
        read_accessor: &str,
        indent: usize,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let pad = " ".repeat(indent);
        let inner = " ".repeat(indent + 4);
        let body_pad = " ".repeat(indent + 8);
        let se = format!("se_{}", depth);

        streams.put(NOMAX, &format!("{}{{\n", pad));
        streams.put(
            WRITE | MOVE,
            &format!("{}let {} = {}.len() as u32;\n", inner, se, accessor),
        );
        streams.put(
            READ,
            &format!(
                "{}let mut {} = 0u32;\n{}ops::read_primitive(streamer, &mut {});\n",
                inner, se, inner, se
            ),
        );
        if bound != 0 {
            streams.put(
                NOMAX,
                &format!(
                    "{}if {} > {}\n{}    && streamer.raise(SerializationStatus::{{U}}_BOUND_EXCEEDED)\n{}{{\n{}    return;\n{}}}\n",
                    inner, se, bound, inner, inner, inner, inner
                ),
            );
        }
        streams.put(
            WRITE | MOVE,
            &format!("{}ops::{{T}}_primitive(streamer, {});\n", inner, se),
        );
        streams.put(
            READ,
            &format!(
                "{}{}.resize({} as usize, Default::default());\n",
                inner, read_accessor, se
            ),
        );
        streams.put(NOMAX, &format!("{}if {} > 0 {{\n", inner, se));

        let shape = self.shape_of(&def.name, element)?;
        match &shape {
            Shape::Primitive(kind) if *kind != PrimitiveKind::Bool => {
                streams.put(
                    WRITE,
                    &format!("{}ops::write_slice(streamer, &{});\n", body_pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_slice(streamer, &mut {});\n", body_pad, read_accessor),
                );
                streams.put(
                    MOVE,
                    &format!(
                        "{}ops::move_slice::<S, {}>(streamer, {} as usize);\n",
                        body_pad,
                        primitive_type(*kind),
                        se
                    ),
                );
            }
            _ => {
                let loop_var = format!("i_{}", depth);
                let element_accessor = format!("{}[{}]", accessor, loop_var);
                let element_read_accessor = format!("{}[{}]", read_accessor, loop_var);
                if let Shape::Constructed(type_name) = &shape {
                    streams.put(
                        NOMAX,
                        &format!(
                            "{}let mut elem_props_{} = get_type_props::<{}>();\n",
                            body_pad, depth, type_name
                        ),
                    );
                }
                streams.put(
                    NOMAX,
                    &format!(
                        "{}for {} in 0..{} as usize {{\n",
                        body_pad, loop_var, se
                    ),
                );
                let loop_pad = " ".repeat(indent + 12);
                match &shape {
                    Shape::Primitive(_) => {
                        // bool elements round-trip one wire byte each
                        streams.put(
                            WRITE | MOVE,
                            &format!(
                                "{}ops::{{T}}_primitive(streamer, {});\n",
                                loop_pad, element_accessor
                            ),
                        );
                        streams.put(
                            READ,
                            &format!(
                                "{}ops::read_primitive(streamer, &mut {});\n",
                                loop_pad, element_read_accessor
                            ),
                        );
                    }
                    Shape::Str { bound } => {
                        streams.put(
                            WRITE | MOVE,
                            &format!(
                                "{}ops::{{T}}_string(streamer, &{}, {});\n",
                                loop_pad, element_accessor, bound
                            ),
                        );
                        streams.put(
                            READ,
                            &format!(
                                "{}ops::read_string(streamer, &mut {}, {});\n",
                                loop_pad, element_read_accessor, bound
                            ),
                        );
                    }
                    Shape::Enum(_) => {
                        streams.put(
                            WRITE | MOVE,
                            &format!(
                                "{}ops::{{T}}_enum(streamer, {});\n",
                                loop_pad, element_accessor
                            ),
                        );
                        streams.put(
                            READ,
                            &format!(
                                "{}ops::read_enum(streamer, &mut {});\n",
                                loop_pad, element_read_accessor
                            ),
                        );
                    }
                    Shape::Constructed(type_name) => {
                        streams.put(
                            WRITE | MOVE,
                            &format!(
                                "{}{}::stream_{{T}}(streamer, &{}, &mut elem_props_{}, as_key);\n",
                                loop_pad, type_name, element_accessor, depth
                            ),
                        );
                        streams.put(
                            READ,
                            &format!(
                                "{}{}::stream_read(streamer, &mut {}, &mut elem_props_{}, as_key);\n",
                                loop_pad, type_name, element_read_accessor, depth
                            ),
                        );
                    }
                    Shape::Alias(alias) => {
                        let alias_fn = escape_identifier(&alias.name);
                        streams.put(
                            WRITE | MOVE,
                            &format!(
                                "{}{{T}}_{}(streamer, &{}, as_key);\n",
                                loop_pad, alias_fn, element_accessor
                            ),
                        );
                        streams.put(
                            READ,
                            &format!(
                                "{}read_{}(streamer, &mut {}, as_key);\n",
                                loop_pad, alias_fn, element_read_accessor
                            ),
                        );
                    }
                    Shape::Sequence {
                        element: nested,
                        bound: nested_bound,
                    } => {
                        let mut nested_streams = Streams::new();
                        self.unroll_sequence(
                            def,
                            nested,
                            *nested_bound,
                            depth + 1,
                            &element_accessor,
                            &element_read_accessor,
                            indent + 12,
                            &mut nested_streams,
                        )?;
                        streams.put(WRITE, &nested_streams.write);
                        streams.put(READ, &nested_streams.read);
                        streams.put(MOVE, &nested_streams.mov);
                    }
                }
                streams.put(NOMAX, &format!("{}}}\n", body_pad));
            }
        }

        streams.put(NOMAX, &format!("{}}}\n", inner));
        streams.put(NOMAX, &format!("{}}}\n", pad));

        // maximum sizes come from the declared bound alone
        if bound == 0 {
            streams.put(MAX, &format!("{}{{\n", pad));
            streams.put(
                MAX,
                &format!("{}ops::max_primitive::<S, u32>(streamer);\n", inner),
            );
            streams.put(
                MAX,
                &format!("{}streamer.state_mut().set_position(xcdr::UNBOUNDED);\n", inner),
            );
            streams.put(MAX, &format!("{}}}\n", pad));
        } else {
            streams.put(MAX, &format!("{}{{\n", pad));
            streams.put(
                MAX,
                &format!("{}ops::max_primitive::<S, u32>(streamer);\n", inner),
            );
            match &shape {
                Shape::Primitive(kind) if *kind != PrimitiveKind::Bool => {
                    streams.put(
                        MAX,
                        &format!(
                            "{}ops::max_slice::<S, {}>(streamer, {});\n",
                            inner,
                            primitive_type(*kind),
                            bound
                        ),
                    );
                }
                Shape::Primitive(_) => {
                    streams.put(
                        MAX,
                        &format!(
                            "{}ops::max_slice::<S, bool>(streamer, {});\n",
                            inner, bound
                        ),
                    );
                }
                Shape::Str { bound: element_bound } => {
                    streams.put(
                        MAX,
                        &format!(
                            "{}for _ in 0..{} {{\n{}    ops::max_string(streamer, {});\n{}}}\n",
                            inner, bound, inner, element_bound, inner
                        ),
                    );
                }
                Shape::Enum(enum_def) => {
                    streams.put(
                        MAX,
                        &format!(
                            "{}for _ in 0..{} {{\n{}    ops::max_enum::<S, {}>(streamer);\n{}}}\n",
                            inner,
                            bound,
                            inner,
                            escape_identifier(&enum_def.name),
                            inner
                        ),
                    );
                }
                Shape::Constructed(type_name) => {
                    streams.put(
                        MAX,
                        &format!(
                            "{}let mut elem_props_{} = get_type_props::<{}>();\n{}let max_element = <{}>::default();\n{}for _ in 0..{} {{\n{}    {}::stream_max(streamer, &max_element, &mut elem_props_{}, as_key);\n{}}}\n",
                            inner, depth, type_name, inner, type_name, inner, bound, inner,
                            type_name, depth, inner
                        ),
                    );
                }
                Shape::Alias(alias) => {
                    let alias_fn = escape_identifier(&alias.name);
                    let alias_ty = escape_identifier(&alias.name);
                    streams.put(
                        MAX,
                        &format!(
                            "{}let max_element = <{}>::default();\n{}for _ in 0..{} {{\n{}    max_{}(streamer, &max_element, as_key);\n{}}}\n",
                            inner, alias_ty, inner, bound, inner, alias_fn, inner
                        ),
                    );
                }
                Shape::Sequence { element: nested, bound: nested_bound } => {
                    let mut nested_streams = Streams::new();
                    self.unroll_sequence(
                        def,
                        nested,
                        *nested_bound,
                        depth + 1,
                        accessor,
                        read_accessor,
                        indent + 4,
                        &mut nested_streams,
                    )?;
                    streams.put(
                        MAX,
                        &format!("{}for _ in 0..{} {{\n", inner, bound),
                    );
                    streams.put(MAX, &nested_streams.max);
                    streams.put(MAX, &format!("{}}}\n", inner));
                }
            }
            streams.put(MAX, &format!("{}}}\n", pad));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // unions
    // ---------------------------------------------------------------

    fn process_union(&self, def: &'a UnionDef, out: &mut String) -> Result<(), GenError> {
        let type_name = escape_identifier(&def.name);
        let branch_name = format!("{}_branch", def.name);
        let disc_type = match &def.switch {
            TypeRef::Primitive(kind) => primitive_type(*kind).to_string(),
            TypeRef::Named(name) => match self.resolve(&def.name, name)? {
                Definition::Enum(_) => escape_scoped(name),
                _ => {
                    return Err(GenError::UnknownType {
                        referenced_by: def.name.clone(),
                        name: name.clone(),
                    })
                }
            },
            _ => {
                return Err(GenError::UnknownType {
                    referenced_by: def.name.clone(),
                    name: "switch type".to_string(),
                })
            }
        };

        self.emit_union_definition(def, &type_name, &branch_name, &disc_type, out);
        out.push_str(&format!("\nimpl PropertyTree for {} {{\n", type_name));
        out.push_str("    fn build_props() -> EntityProperties {\n");
        out.push_str("        let mut props = EntityProperties::root();\n");
        if def.extensibility != Extensibility::Final {
            out.push_str(&format!(
                "        props.e_ext = Extensibility::{};\n",
                Self::ext_variant(def.extensibility)
            ));
        }
        out.push_str("        props.finish();\n");
        out.push_str("        props\n    }\n}\n");
        self.emit_union_streamable(def, &type_name, &disc_type, out)?;
        Ok(())
    }

    fn emit_union_definition(
        &self,
        def: &UnionDef,
        type_name: &str,
        branch_name: &str,
        disc_type: &str,
        out: &mut String,
    ) {
        out.push_str("\n#[derive(Debug, Clone, PartialEq)]\n");
        out.push_str(&format!("pub enum {} {{\n", branch_name));
        for case in &def.cases {
            out.push_str(&format!(
                "    {}({}),\n",
                escape_identifier(&case.name),
                rust_type(&case.ty)
            ));
        }
        out.push_str("}\n");

        out.push_str("\n#[derive(Debug, Clone, PartialEq)]\n");
        out.push_str(&format!("pub struct {} {{\n", type_name));
        out.push_str(&format!("    m_d: {},\n", disc_type));
        out.push_str(&format!("    m_u: {},\n", branch_name));
        out.push_str("}\n");

        let first_case = escape_identifier(&def.cases[0].name);
        out.push_str(&format!("\nimpl Default for {} {{\n", type_name));
        out.push_str("    fn default() -> Self {\n");
        out.push_str(&format!("        {} {{\n", type_name));
        out.push_str("            m_d: Default::default(),\n");
        out.push_str(&format!(
            "            m_u: {}::{}(Default::default()),\n",
            branch_name, first_case
        ));
        out.push_str("        }\n    }\n}\n");

        out.push_str(&format!("\nimpl {} {{\n", type_name));
        out.push_str(&format!("    pub fn d(&self) -> {} {{\n        self.m_d\n    }}\n", disc_type));
        out.push_str(&format!(
            "\n    pub fn set_d(&mut self, d: {}) {{\n        self.m_d = d;\n    }}\n",
            disc_type
        ));
        for case in &def.cases {
            let getter = escape_identifier(&case.name);
            let case_type = rust_type(&case.ty);
            let copyable = matches!(
                &case.ty,
                TypeRef::Primitive(_)
            ) || matches!(&case.ty, TypeRef::Named(name)
                if matches!(self.index.get(name.as_str()), Some(Definition::Enum(_))));
            let fallback = if def.cases.len() > 1 {
                "\n            _ => Default::default(),".to_string()
            } else {
                String::new()
            };
            if copyable {
                out.push_str(&format!(
                    "\n    pub fn {}(&self) -> {} {{\n        match &self.m_u {{\n            {}::{}(value) => *value,{}\n        }}\n    }}\n",
                    getter, case_type, format!("{}_branch", def.name), getter, fallback
                ));
            } else {
                out.push_str(&format!(
                    "\n    pub fn {}(&self) -> {} {{\n        match &self.m_u {{\n            {}::{}(value) => value.clone(),{}\n        }}\n    }}\n",
                    getter, case_type, format!("{}_branch", def.name), getter, fallback
                ));
            }

            let single_label = case.labels.len() == 1 && !case.is_default;
            if single_label {
                out.push_str(&format!(
                    "\n    pub fn set_{}(&mut self, value: {}) {{\n        self.m_u = {}::{}(value);\n        self.m_d = {};\n    }}\n",
                    getter, case_type, format!("{}_branch", def.name), getter, case.labels[0]
                ));
            } else {
                out.push_str(&format!(
                    "\n    pub fn set_{}(&mut self, value: {}, d: {}) {{\n        self.m_u = {}::{}(value);\n        self.m_d = d;\n    }}\n",
                    getter, case_type, disc_type, format!("{}_branch", def.name), getter
                ));
            }
        }
        out.push_str("}\n");
    }

    fn emit_union_streamable(
        &self,
        def: &'a UnionDef,
        type_name: &str,
        disc_type: &str,
        out: &mut String,
    ) -> Result<(), GenError> {
        let mut streams = Streams::new();
        let switch_shape = self.shape_of(&def.name, &def.switch)?;
        let disc_is_enum = matches!(switch_shape, Shape::Enum(_));

        streams.put(ALL, "        streamer.start_struct(props, StreamMode::{M}, as_key);\n");

        // discriminator
        streams.put(WRITE | MOVE, "        let d = instance.d();\n");
        if disc_is_enum {
            streams.put(WRITE | MOVE, "        ops::{T}_enum(streamer, d);\n");
            streams.put(
                READ,
                &format!(
                    "        let mut d = <{}>::default();\n        ops::read_enum(streamer, &mut d);\n",
                    disc_type
                ),
            );
            streams.put(
                MAX,
                &format!("        ops::max_enum::<S, {}>(streamer);\n", disc_type),
            );
        } else {
            streams.put(WRITE | MOVE, "        ops::{T}_primitive(streamer, d);\n");
            streams.put(
                READ,
                &format!(
                    "        let mut d = <{}>::default();\n        ops::read_primitive(streamer, &mut d);\n",
                    disc_type
                ),
            );
            streams.put(
                MAX,
                &format!("        ops::max_primitive::<S, {}>(streamer);\n", disc_type),
            );
        }
        streams.put(
            MAX,
            "        let mut union_max = streamer.position();\n        let mut alignment_max = streamer.alignment();\n",
        );

        streams.put(NOMAX, "        match d {\n");
        let mut has_default = false;
        for case in &def.cases {
            has_default |= case.is_default;
            self.process_case(def, case, &mut streams)?;
        }
        if !has_default {
            streams.put(NOMAX, "            _ => {}\n");
        }
        streams.put(NOMAX, "        }\n");
        streams.put(READ, "        instance.set_d(d);\n");
        streams.put(
            MAX,
            "        streamer.state_mut().set_position(union_max);\n        streamer.state_mut().set_alignment(alignment_max);\n",
        );
        streams.put(ALL, "        streamer.finish_struct(props, StreamMode::{M}, as_key);\n");

        out.push_str(&format!("\nimpl Streamable for {} {{", type_name));
        Self::emit_mode_functions(&streams, out);
        out.push_str("}\n");
        Ok(())
    }

    fn process_case(
        &self,
        def: &'a UnionDef,
        case: &'a CaseDef,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let case_name = escape_identifier(&case.name);
        let case_type = rust_type(&case.ty);
        let label = if case.is_default {
            "_".to_string()
        } else {
            case.labels.join(" | ")
        };
        streams.put(NOMAX, &format!("            {} => {{\n", label));
        streams.put(
            READ,
            &format!("                let mut obj = <{}>::default();\n", case_type),
        );

        let guard = def.switch_is_key;
        if guard {
            streams.put(NOMAX, "                if !as_key {\n");
        }
        let pad = if guard { 20 } else { 16 };
        {
            let mut body = Streams::new();
            let member = MemberDef {
                name: case.name.clone(),
                ty: case.ty.clone(),
                id: None,
                key: false,
                optional: false,
                must_understand: false,
                dimensions: Vec::new(),
            };
            // union branches stream through the case accessor on the way
            // out and through the local temporary on the way in
            self.emit_case_value(def, &member, &format!("instance.{}()", case_name), "obj", pad, &mut body)?;
            streams.put(WRITE, &body.write);
            streams.put(READ, &body.read);
            streams.put(MOVE, &body.mov);
        }
        if guard {
            streams.put(NOMAX, "                }\n");
        }

        let single_label = case.labels.len() == 1 && !case.is_default;
        if single_label {
            streams.put(
                READ,
                &format!("                instance.set_{}(obj);\n", case_name),
            );
        } else {
            streams.put(
                READ,
                &format!("                instance.set_{}(obj, d);\n", case_name),
            );
        }
        streams.put(NOMAX, "            }\n");

        // maximum: every case is evaluated from the post-discriminator
        // position and the largest cursor wins
        streams.put(MAX, "        {\n            let position = streamer.position();\n            let alignment = streamer.alignment();\n");
        if def.switch_is_key {
            streams.put(MAX, "            if !as_key {\n");
        }
        {
            let mut body = Streams::new();
            let member = MemberDef {
                name: case.name.clone(),
                ty: case.ty.clone(),
                id: None,
                key: false,
                optional: false,
                must_understand: false,
                dimensions: Vec::new(),
            };
            self.emit_case_value(def, &member, "max", "max", if def.switch_is_key { 16 } else { 12 }, &mut body)?;
            streams.put(MAX, &body.max);
        }
        if def.switch_is_key {
            streams.put(MAX, "            }\n");
        }
        streams.put(
            MAX,
            "            if union_max < streamer.position() {\n                union_max = streamer.position();\n                alignment_max = streamer.alignment();\n            }\n            streamer.state_mut().set_position(position);\n            streamer.state_mut().set_alignment(alignment);\n        }\n",
        );
        Ok(())
    }

    /// Case payload ops; unions do not pass a sub-tree, so constructed
    /// branch types fetch their own properties.
    fn emit_case_value(
        &self,
        def: &'a UnionDef,
        member: &'a MemberDef,
        accessor: &str,
        read_accessor: &str,
        indent: usize,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let pad = " ".repeat(indent);
        match self.shape_of(&def.name, &member.ty)? {
            Shape::Primitive(kind) => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_primitive(streamer, {});\n", pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_primitive(streamer, &mut {});\n", pad, read_accessor),
                );
                streams.put(
                    MAX,
                    &format!("{}ops::max_primitive::<S, {}>(streamer);\n", pad, primitive_type(kind)),
                );
            }
            Shape::Str { bound } => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_string(streamer, &{}, {});\n", pad, accessor, bound),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_string(streamer, &mut {}, {});\n", pad, read_accessor, bound),
                );
                streams.put(MAX, &format!("{}ops::max_string(streamer, {});\n", pad, bound));
            }
            Shape::Enum(enum_def) => {
                streams.put(
                    WRITE | MOVE,
                    &format!("{}ops::{{T}}_enum(streamer, {});\n", pad, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}ops::read_enum(streamer, &mut {});\n", pad, read_accessor),
                );
                streams.put(
                    MAX,
                    &format!(
                        "{}ops::max_enum::<S, {}>(streamer);\n",
                        pad,
                        escape_identifier(&enum_def.name)
                    ),
                );
            }
            Shape::Constructed(type_name) => {
                streams.put(
                    NOMAX,
                    &format!(
                        "{}let mut case_props = get_type_props::<{}>();\n",
                        pad, type_name
                    ),
                );
                streams.put(
                    WRITE | MOVE,
                    &format!(
                        "{}{}::stream_{{T}}(streamer, &{}, &mut case_props, as_key);\n",
                        pad, type_name, accessor
                    ),
                );
                streams.put(
                    READ,
                    &format!(
                        "{}{}::stream_read(streamer, &mut {}, &mut case_props, as_key);\n",
                        pad, type_name, read_accessor
                    ),
                );
                streams.put(
                    MAX,
                    &format!(
                        "{}let mut case_props = get_type_props::<{}>();\n{}let max_case = <{}>::default();\n{}{}::stream_max(streamer, &max_case, &mut case_props, as_key);\n",
                        pad, type_name, pad, type_name, pad, type_name
                    ),
                );
            }
            Shape::Alias(alias) => {
                let alias_fn = escape_identifier(&alias.name);
                streams.put(
                    WRITE | MOVE,
                    &format!("{}{{T}}_{}(streamer, &{}, as_key);\n", pad, alias_fn, accessor),
                );
                streams.put(
                    READ,
                    &format!("{}read_{}(streamer, &mut {}, as_key);\n", pad, alias_fn, read_accessor),
                );
                streams.put(
                    MAX,
                    &format!(
                        "{}let max_case = <{}>::default();\n{}max_{}(streamer, &max_case, as_key);\n",
                        pad,
                        escape_identifier(&alias.name),
                        pad,
                        alias_fn
                    ),
                );
            }
            Shape::Sequence { .. } => {
                return Err(GenError::UnknownType {
                    referenced_by: def.name.clone(),
                    name: "anonymous sequence case (use a typedef)".to_string(),
                });
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // enums
    // ---------------------------------------------------------------

    fn process_enum(&self, def: &EnumDef, out: &mut String) {
        let type_name = escape_identifier(&def.name);
        out.push_str("\n#[derive(Debug, Clone, Copy, PartialEq, Eq)]\n");
        out.push_str(&format!("pub enum {} {{\n", type_name));
        for enumerator in &def.enumerators {
            out.push_str(&format!(
                "    {} = {},\n",
                escape_identifier(&enumerator.name),
                enumerator.value
            ));
        }
        out.push_str("}\n");

        let default_name = def
            .default_enumerator
            .as_deref()
            .unwrap_or(&def.enumerators[0].name);
        let default_name = escape_identifier(default_name);

        out.push_str(&format!("\nimpl Default for {} {{\n", type_name));
        out.push_str(&format!(
            "    fn default() -> Self {{\n        {}::{}\n    }}\n}}\n",
            type_name, default_name
        ));

        let bits = def.bit_bound.unwrap_or(32);
        out.push_str(&format!("\nimpl CdrEnum for {} {{\n", type_name));
        out.push_str(&format!("    const BIT_BOUND: BitBound = BitBound::B{};\n", bits));
        out.push_str("\n    fn to_wire(self) -> u32 {\n        self as u32\n    }\n");
        out.push_str("\n    fn from_wire(value: u32) -> Self {\n        match value {\n");
        let mut seen = Vec::new();
        for enumerator in &def.enumerators {
            if seen.contains(&enumerator.value) {
                continue;
            }
            seen.push(enumerator.value);
            out.push_str(&format!(
                "            {} => {}::{},\n",
                enumerator.value,
                type_name,
                escape_identifier(&enumerator.name)
            ));
        }
        out.push_str(&format!("            _ => {}::{},\n", type_name, default_name));
        out.push_str("        }\n    }\n}\n");
    }

    // ---------------------------------------------------------------
    // typedefs
    // ---------------------------------------------------------------

    fn process_typedef(&self, def: &'a TypedefDef, out: &mut String) -> Result<(), GenError> {
        let alias = escape_identifier(&def.name);
        out.push_str(&format!("\npub type {} = {};\n", alias, rust_type(&def.ty)));

        // a free streaming function per mode, specialized for the shape
        let mut streams = Streams::new();

        // constructed element types share one fetched property tree
        if let TypeRef::Sequence { element, .. } = &def.ty {
            if let Shape::Constructed(type_name) = self.shape_of(&def.name, element)? {
                streams.put(
                    NOMAX,
                    &format!("    let mut prop = get_type_props::<{}>();\n", type_name),
                );
            }
        }

        let fake_struct = StructDef {
            name: def.name.clone(),
            extensibility: Extensibility::Final,
            base: None,
            members: Vec::new(),
            keylist: None,
        };
        match &def.ty {
            TypeRef::Sequence { element, bound } => {
                if *bound != 0 {
                    if let Shape::Constructed(type_name) = self.shape_of(&def.name, element)? {
                        streams.put(
                            MAX,
                            &format!("    let mut prop = get_type_props::<{}>();\n", type_name),
                        );
                    }
                }
                self.unroll_typedef_sequence(&fake_struct, element, *bound, &mut streams)?;
            }
            TypeRef::Named(name) if matches!(self.resolve(&def.name, name)?, Definition::Struct(_) | Definition::Union(_)) => {
                let type_name = escape_scoped(name);
                streams.put(
                    ALL,
                    &format!("    let mut prop = get_type_props::<{}>();\n", type_name),
                );
                streams.put(
                    WRITE | MOVE,
                    &format!(
                        "    {}::stream_{{T}}(streamer, instance, &mut prop, as_key);\n",
                        type_name
                    ),
                );
                streams.put(
                    READ,
                    &format!(
                        "    {}::stream_read(streamer, instance, &mut prop, as_key);\n",
                        type_name
                    ),
                );
                streams.put(
                    MAX,
                    &format!(
                        "    let max_value = <{}>::default();\n    {}::stream_max(streamer, &max_value, &mut prop, as_key);\n",
                        type_name, type_name
                    ),
                );
            }
            other => {
                let member = MemberDef {
                    name: "instance".to_string(),
                    ty: other.clone(),
                    id: None,
                    key: false,
                    optional: false,
                    must_understand: false,
                    dimensions: Vec::new(),
                };
                self.emit_value_ops(&fake_struct, &member, "(*instance)", "(*instance)", 4, &mut streams)?;
            }
        }

        let bodies = [
            ("write", format!("&{}", alias), &streams.write),
            ("read", format!("&mut {}", alias), &streams.read),
            ("move", format!("&{}", alias), &streams.mov),
            ("max", format!("&{}", alias), &streams.max),
        ];
        for (mode, borrow, body) in bodies {
            let instance = if body.contains("instance") {
                "instance"
            } else {
                "_instance"
            };
            let as_key = if body.contains("as_key") { "as_key" } else { "_as_key" };
            out.push_str(&format!(
                "\npub fn {}_{}<'buf, S: CdrStream<'buf>>(streamer: &mut S, {}: {}, {}: bool) {{\n",
                mode, alias, instance, borrow, as_key
            ));
            out.push_str(body);
            out.push_str("}\n");
        }
        Ok(())
    }

    /// Typedef'd sequences unroll like member sequences, with the alias
    /// instance as the accessor and the hoisted `prop` for elements.
    fn unroll_typedef_sequence(
        &self,
        fake_struct: &StructDef,
        element: &'a TypeRef,
        bound: u32,
        streams: &mut Streams,
    ) -> Result<(), GenError> {
        let shape = self.shape_of(&fake_struct.name, element)?;

        streams.put(NOMAX, "    {\n");
        streams.put(WRITE | MOVE, "        let se_0 = instance.len() as u32;\n");
        streams.put(
            READ,
            "        let mut se_0 = 0u32;\n        ops::read_primitive(streamer, &mut se_0);\n",
        );
        if bound != 0 {
            streams.put(
                NOMAX,
                &format!(
                    "        if se_0 > {}\n            && streamer.raise(SerializationStatus::{{U}}_BOUND_EXCEEDED)\n        {{\n            return;\n        }}\n",
                    bound
                ),
            );
        }
        streams.put(WRITE | MOVE, "        ops::{T}_primitive(streamer, se_0);\n");
        streams.put(
            READ,
            "        instance.resize(se_0 as usize, Default::default());\n",
        );
        streams.put(NOMAX, "        if se_0 > 0 {\n");
        match &shape {
            Shape::Primitive(kind) if *kind != PrimitiveKind::Bool => {
                streams.put(WRITE, "            ops::write_slice(streamer, instance);\n");
                streams.put(READ, "            ops::read_slice(streamer, instance);\n");
                streams.put(
                    MOVE,
                    &format!(
                        "            ops::move_slice::<S, {}>(streamer, se_0 as usize);\n",
                        primitive_type(*kind)
                    ),
                );
            }
            Shape::Constructed(type_name) => {
                streams.put(
                    NOMAX,
                    "            for i_0 in 0..instance.len() {\n",
                );
                streams.put(
                    WRITE | MOVE,
                    &format!(
                        "                {}::stream_{{T}}(streamer, &instance[i_0], &mut prop, as_key);\n",
                        type_name
                    ),
                );
                streams.put(
                    READ,
                    &format!(
                        "                {}::stream_read(streamer, &mut instance[i_0], &mut prop, as_key);\n",
                        type_name
                    ),
                );
                streams.put(NOMAX, "            }\n");
            }
            _ => {
                streams.put(NOMAX, "            for i_0 in 0..instance.len() {\n");
                let mut body = Streams::new();
                let member = MemberDef {
                    name: "element".to_string(),
                    ty: element.clone(),
                    id: None,
                    key: false,
                    optional: false,
                    must_understand: false,
                    dimensions: Vec::new(),
                };
                self.emit_value_ops(
                    fake_struct,
                    &member,
                    "instance[i_0]",
                    "instance[i_0]",
                    16,
                    &mut body,
                )?;
                streams.put(WRITE, &body.write);
                streams.put(READ, &body.read);
                streams.put(MOVE, &body.mov);
                streams.put(NOMAX, "            }\n");
            }
        }
        streams.put(NOMAX, "        }\n    }\n");

        if bound == 0 {
            streams.put(
                MAX,
                "    {\n        ops::max_primitive::<S, u32>(streamer);\n        streamer.state_mut().set_position(xcdr::UNBOUNDED);\n    }\n",
            );
        } else {
            streams.put(MAX, "    {\n        ops::max_primitive::<S, u32>(streamer);\n");
            match &shape {
                Shape::Primitive(kind) => {
                    streams.put(
                        MAX,
                        &format!(
                            "        ops::max_slice::<S, {}>(streamer, {});\n",
                            primitive_type(*kind),
                            bound
                        ),
                    );
                }
                Shape::Constructed(type_name) => {
                    streams.put(
                        MAX,
                        &format!(
                            "        let max_element = <{}>::default();\n        for _ in 0..{} {{\n            {}::stream_max(streamer, &max_element, &mut prop, as_key);\n        }}\n",
                            type_name, bound, type_name
                        ),
                    );
                }
                Shape::Str { bound: element_bound } => {
                    streams.put(
                        MAX,
                        &format!(
                            "        for _ in 0..{} {{\n            ops::max_string(streamer, {});\n        }}\n",
                            bound, element_bound
                        ),
                    );
                }
                Shape::Enum(enum_def) => {
                    streams.put(
                        MAX,
                        &format!(
                            "        for _ in 0..{} {{\n            ops::max_enum::<S, {}>(streamer);\n        }}\n",
                            bound,
                            escape_identifier(&enum_def.name)
                        ),
                    );
                }
                _ => {}
            }
            streams.put(MAX, "    }\n");
        }
        Ok(())
    }
}
