// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed IDL abstract syntax tree.
//!
//! The IDL parser lives outside this tool; front ends hand over the parsed
//! module as data (the CLI path deserializes it from JSON). The shapes
//! below cover the constructs the streaming backend understands: structs
//! with inheritance and key annotations, unions, enums with bit bounds,
//! typedefs, and the usual collection types.

use serde::{Deserialize, Serialize};

/// One IDL compilation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlModule {
    pub name: String,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    Struct(StructDef),
    Union(UnionDef),
    Enum(EnumDef),
    Typedef(TypedefDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Struct(def) => &def.name,
            Definition::Union(def) => &def.name,
            Definition::Enum(def) => &def.name,
            Definition::Typedef(def) => &def.name,
        }
    }
}

/// `@extensibility` annotation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extensibility {
    #[default]
    Final,
    Appendable,
    Mutable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub extensibility: Extensibility,
    /// Base struct for single inheritance; serialized base-first.
    #[serde(default)]
    pub base: Option<String>,
    pub members: Vec<MemberDef>,
    /// Legacy `#pragma keylist`: dotted field paths, mutually exclusive
    /// with `@key` annotations.
    #[serde(default)]
    pub keylist: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Explicit `@id`; defaults to the declaration index.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub must_understand: bool,
    /// Array dimensions on the declarator (`long l[5][3]`).
    #[serde(default)]
    pub dimensions: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionDef {
    pub name: String,
    #[serde(default)]
    pub extensibility: Extensibility,
    pub switch: TypeRef,
    /// `@key` on the switch: key projection carries the discriminator only.
    #[serde(default)]
    pub switch_is_key: bool,
    pub cases: Vec<CaseDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDef {
    /// Literal label tokens, already rendered for the target language
    /// (e.g. `0x61`, `3`); empty for a pure default case.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    /// `@bit_bound` in bits (8/16/32/64); 32 when absent.
    #[serde(default)]
    pub bit_bound: Option<u32>,
    pub enumerators: Vec<EnumeratorDef>,
    /// `@default_literal` enumerator catching unknown wire values; the
    /// first enumerator when absent.
    #[serde(default)]
    pub default_enumerator: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumeratorDef {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedefDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// Bounded string; bound 0 means unbounded.
    String { bound: u32 },
    /// Bounded sequence; bound 0 means unbounded.
    Sequence { element: Box<TypeRef>, bound: u32 },
    /// Reference to a named struct, union, enum or typedef.
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Char,
    Octet,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
}
